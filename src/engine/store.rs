//! Observable value store.
//!
//! Replaces module-level listener arrays: a `Store<T>` is an ordinary value owned by whoever
//! publishes, and subscribers register against that instance.

use slotmap::{SlotMap, new_key_type};

new_key_type! {
    /// Handle returned by [`Store::subscribe`]; pass it back to unsubscribe.
    pub struct Subscription;
}

type Listener<T> = Box<dyn FnMut(&T)>;

pub struct Store<T> {
    value: T,
    listeners: SlotMap<Subscription, Listener<T>>,
    // Insertion order; SlotMap iteration order is slot order, which reuses freed slots.
    order: Vec<Subscription>,
}

impl<T> Store<T> {
    pub fn new(initial: T) -> Self {
        Self {
            value: initial,
            listeners: SlotMap::with_key(),
            order: Vec::new(),
        }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    /// Replace the value and notify every subscriber in subscription order.
    pub fn set(&mut self, value: T) {
        self.value = value;
        for key in &self.order {
            if let Some(listener) = self.listeners.get_mut(*key) {
                listener(&self.value);
            }
        }
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&T) + 'static) -> Subscription {
        let key = self.listeners.insert(Box::new(listener));
        self.order.push(key);
        key
    }

    /// Returns false if the subscription was already gone.
    pub fn unsubscribe(&mut self, sub: Subscription) -> bool {
        self.order.retain(|k| *k != sub);
        self.listeners.remove(sub).is_some()
    }
}

impl<T: PartialEq> Store<T> {
    /// Like [`Store::set`], but skips notification when the value is unchanged.
    pub fn replace_if_changed(&mut self, value: T) -> bool {
        if self.value == value {
            return false;
        }
        self.set(value);
        true
    }
}

impl<T: Default> Default for Store<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Store<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("value", &self.value)
            .field("subscribers", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn initial_value_is_visible() {
        let store: Store<Option<String>> = Store::new(None);
        assert_eq!(store.get(), &None);
    }

    #[test]
    fn notifies_in_subscription_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut store = Store::new(0);

        let a = seen.clone();
        store.subscribe(move |v| a.borrow_mut().push(("a", *v)));
        let b = seen.clone();
        store.subscribe(move |v| b.borrow_mut().push(("b", *v)));

        store.set(7);
        assert_eq!(*seen.borrow(), vec![("a", 7), ("b", 7)]);
        assert_eq!(*store.get(), 7);
    }

    #[test]
    fn order_survives_slot_reuse() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut store = Store::new(0);

        let s = seen.clone();
        let first = store.subscribe(move |_| s.borrow_mut().push(1));
        let s = seen.clone();
        store.subscribe(move |_| s.borrow_mut().push(2));
        store.unsubscribe(first);
        let s = seen.clone();
        store.subscribe(move |_| s.borrow_mut().push(3));

        store.set(1);
        assert_eq!(*seen.borrow(), vec![2, 3]);
    }

    #[test]
    fn unsubscribe_stops_notifications() {
        let hits = Rc::new(RefCell::new(0));
        let mut store = Store::new(false);

        let h = hits.clone();
        let sub = store.subscribe(move |_| *h.borrow_mut() += 1);
        store.set(true);
        assert!(store.unsubscribe(sub));
        assert!(!store.unsubscribe(sub));
        store.set(false);

        assert_eq!(*hits.borrow(), 1);
        assert!(store.listeners.is_empty());
        assert!(store.order.is_empty());
    }

    #[test]
    fn unchanged_value_is_not_republished() {
        let hits = Rc::new(RefCell::new(0));
        let mut store = Store::new(Some("COMP 484".to_string()));
        let h = hits.clone();
        store.subscribe(move |_| *h.borrow_mut() += 1);

        assert!(!store.replace_if_changed(Some("COMP 484".to_string())));
        assert!(store.replace_if_changed(None));
        assert_eq!(*hits.borrow(), 1);
    }
}
