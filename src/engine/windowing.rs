use std::sync::Arc;

use glam::Vec2;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{CursorIcon, Window, WindowAttributes, WindowId};

use crate::engine::graphics::{Renderer, VisualWorld};
use crate::engine::user_input::UserInput;
use crate::engine::{EngineError, EngineResult, Universe};

const WINDOW_TITLE: &str = "Course Galaxy";

fn title_for(selection: &Option<String>) -> String {
    match selection {
        Some(label) => format!("{WINDOW_TITLE} - {label}"),
        None => WINDOW_TITLE.to_string(),
    }
}

/// Minimal winit wrapper (2025 winit style: ApplicationHandler).
pub struct Windowing;

impl Windowing {
    pub fn run_app(universe: Universe, renderer: Renderer) -> EngineResult<()> {
        let event_loop = EventLoop::new().map_err(|e| EngineError::Window(e.to_string()))?;
        event_loop.set_control_flow(ControlFlow::Wait);

        let mut app = App {
            window: None,
            universe,
            renderer,
            user_input: UserInput::new(),
            visuals: VisualWorld::new(),
            pointer_shown: false,
            fatal: None,
        };

        event_loop
            .run_app(&mut app)
            .map_err(|e| EngineError::Window(e.to_string()))?;

        match app.fatal.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

struct App {
    window: Option<Arc<Window>>,
    universe: Universe,
    renderer: Renderer,
    user_input: UserInput,
    visuals: VisualWorld,
    pointer_shown: bool,
    /// First unrecoverable error; the loop exits and `run_app` returns it.
    fatal: Option<EngineError>,
}

impl App {
    fn fail(&mut self, event_loop: &ActiveEventLoop, err: EngineError) {
        log::error!("{err}");
        self.fatal.get_or_insert(err);
        event_loop.exit();
    }

    fn init_window(&mut self, event_loop: &ActiveEventLoop) -> EngineResult<()> {
        let attrs: WindowAttributes = Window::default_attributes()
            .with_title(WINDOW_TITLE)
            .with_inner_size(winit::dpi::LogicalSize::new(1280.0, 800.0));

        let window = event_loop
            .create_window(attrs)
            .map_err(|e| EngineError::Window(e.to_string()))?;
        let window = Arc::new(window);

        self.renderer.init_for_window(&window).map_err(EngineError::render)?;
        self.universe.upload_fields(&mut self.renderer)?;

        let size = window.inner_size();
        self.universe
            .attach_viewport(Vec2::new(size.width as f32, size.height as f32));

        let title_window = window.clone();
        self.universe
            .selection_mut()
            .subscribe(move |selection| title_window.set_title(&title_for(selection)));

        window.request_redraw();
        self.window = Some(window);
        Ok(())
    }

    fn redraw(&mut self) -> EngineResult<()> {
        self.universe.tick(self.user_input.state());
        self.universe.sync_visuals(&mut self.visuals);

        self.renderer
            .render_visual_world(&mut self.visuals)
            .map_err(EngineError::render)?;

        self.user_input.end_frame();

        if let Some(w) = &self.window {
            let over_sphere = self.universe.hovered_course().is_some();
            if over_sphere != self.pointer_shown {
                self.pointer_shown = over_sphere;
                w.set_cursor(if over_sphere { CursorIcon::Pointer } else { CursorIcon::Default });
            }
            w.pre_present_notify();
            w.request_redraw();
        }
        Ok(())
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(err) = self.init_window(event_loop) {
            self.fail(event_loop, err);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        self.user_input.handle_window_event(&event);

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key: Key::Named(NamedKey::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => event_loop.exit(),

            WindowEvent::Resized(size) => {
                self.renderer.resize(size);
                if size.width > 0 && size.height > 0 {
                    self.universe
                        .attach_viewport(Vec2::new(size.width as f32, size.height as f32));
                }
                if let Some(w) = &self.window {
                    w.request_redraw();
                }
            }

            WindowEvent::RedrawRequested => {
                if let Err(err) = self.redraw() {
                    self.fail(event_loop, err);
                }
            }

            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_follows_selection() {
        assert_eq!(title_for(&None), "Course Galaxy");
        assert_eq!(
            title_for(&Some("Senior Design Project".into())),
            "Course Galaxy - Senior Design Project"
        );
    }
}
