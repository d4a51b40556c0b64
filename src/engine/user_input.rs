//! Input handling (winit -> engine state).
//!
//! Goal: keep `Windowing` focused on window lifecycle + rendering, while `UserInput`
//! owns interpreting window events into a small, reusable `InputState`.

use std::collections::HashSet;

use glam::Vec2;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};

/// Cursor travel (pixels) between press and release below which a press counts as a click.
pub const CLICK_SLOP_PX: f32 = 4.0;

/// Pixel-delta wheels (touchpads) report pixels; this many pixels make one notch.
const PIXELS_PER_NOTCH: f32 = 40.0;

/// Snapshot of user input accumulated since the last `end_frame`.
///
/// Held buttons, cursor position, drag and wheel deltas, and left clicks
/// (press + release without dragging).
#[derive(Default, Debug, Clone)]
pub struct InputState {
    pub mouse_down: HashSet<MouseButton>,

    /// Cursor position in physical pixels (as reported by winit).
    pub cursor_pos: Option<Vec2>,

    /// Cursor movement accumulated this frame.
    mouse_movement: Vec2,

    /// Accumulated wheel notches this frame (positive = away from the user).
    pub wheel_delta: f32,

    /// Where the left button went down, for click-vs-drag detection.
    press_origin: Option<Vec2>,

    /// Cursor position of a completed left click this frame.
    click: Option<Vec2>,
}

impl InputState {
    /// Clears per-frame transition state.
    pub fn end_frame(&mut self) {
        self.wheel_delta = 0.0;
        self.mouse_movement = Vec2::ZERO;
        self.click = None;
    }

    #[inline]
    pub fn mouse_held(&self, button: MouseButton) -> bool {
        self.mouse_down.contains(&button)
    }

    /// Drag delta while the left button is held and the press has left the click slop.
    pub fn left_drag(&self) -> Vec2 {
        if self.mouse_held(MouseButton::Left) && self.press_origin.is_none() {
            self.mouse_movement
        } else {
            Vec2::ZERO
        }
    }

    #[inline]
    pub fn left_click(&self) -> Option<Vec2> {
        self.click
    }
}

/// Stateful input event processor.
#[derive(Default, Debug, Clone)]
pub struct UserInput {
    state: InputState,
}

impl UserInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &InputState {
        &self.state
    }

    pub fn end_frame(&mut self) {
        self.state.end_frame();
    }

    /// Feed a winit event into this input handler.
    ///
    /// Returns `true` if the event was recognized/consumed as input.
    pub fn handle_window_event(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::MouseInput { state, button, .. } => {
                self.mouse_button(*button, *state);
                true
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.cursor_moved(Vec2::new(position.x as f32, position.y as f32));
                true
            }

            WindowEvent::CursorLeft { .. } => {
                self.state.cursor_pos = None;
                self.state.press_origin = None;
                true
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let notches = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / PIXELS_PER_NOTCH,
                };
                self.state.wheel_delta += notches;
                true
            }

            _ => false,
        }
    }

    pub fn mouse_button(&mut self, button: MouseButton, state: ElementState) {
        let s = &mut self.state;
        match state {
            ElementState::Pressed => {
                s.mouse_down.insert(button);
                if button == MouseButton::Left {
                    s.press_origin = s.cursor_pos;
                }
            }
            ElementState::Released => {
                s.mouse_down.remove(&button);
                if button == MouseButton::Left {
                    // Still inside the slop: this was a click, not a drag.
                    if let (Some(_), Some(pos)) = (s.press_origin.take(), s.cursor_pos) {
                        s.click = Some(pos);
                    }
                }
            }
        }
    }

    pub fn cursor_moved(&mut self, pos: Vec2) {
        let s = &mut self.state;
        if let Some(prev) = s.cursor_pos {
            s.mouse_movement += pos - prev;
        }
        s.cursor_pos = Some(pos);

        if let Some(origin) = s.press_origin {
            if origin.distance(pos) > CLICK_SLOP_PX {
                s.press_origin = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input_at(x: f32, y: f32) -> UserInput {
        let mut input = UserInput::new();
        input.cursor_moved(Vec2::new(x, y));
        input.end_frame();
        input
    }

    #[test]
    fn press_release_in_place_is_a_click() {
        let mut input = input_at(100.0, 100.0);
        input.mouse_button(MouseButton::Left, ElementState::Pressed);
        input.cursor_moved(Vec2::new(102.0, 101.0));
        input.mouse_button(MouseButton::Left, ElementState::Released);

        assert_eq!(input.state().left_click(), Some(Vec2::new(102.0, 101.0)));
        assert_eq!(input.state().left_drag(), Vec2::ZERO);

        input.end_frame();
        assert_eq!(input.state().left_click(), None);
    }

    #[test]
    fn drag_is_not_a_click() {
        let mut input = input_at(100.0, 100.0);
        input.mouse_button(MouseButton::Left, ElementState::Pressed);
        input.cursor_moved(Vec2::new(130.0, 90.0));

        assert_eq!(input.state().left_drag(), Vec2::new(30.0, -10.0));

        input.mouse_button(MouseButton::Left, ElementState::Released);
        assert_eq!(input.state().left_click(), None);
    }

    #[test]
    fn drag_accumulates_until_end_of_frame() {
        let mut input = input_at(0.0, 0.0);
        input.mouse_button(MouseButton::Left, ElementState::Pressed);
        input.cursor_moved(Vec2::new(5.0, 0.0));
        input.cursor_moved(Vec2::new(8.0, 4.0));
        assert_eq!(input.state().left_drag(), Vec2::new(8.0, 4.0));
        input.end_frame();
        assert_eq!(input.state().left_drag(), Vec2::ZERO);
        assert!(input.state().mouse_held(MouseButton::Left));
    }

    #[test]
    fn right_button_never_clicks() {
        let mut input = input_at(10.0, 10.0);
        input.mouse_button(MouseButton::Right, ElementState::Pressed);
        input.mouse_button(MouseButton::Right, ElementState::Released);
        assert_eq!(input.state().left_click(), None);
        assert!(!input.state().mouse_held(MouseButton::Right));
    }
}
