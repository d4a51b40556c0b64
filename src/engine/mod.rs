pub mod animation_loop;
pub mod camera;
pub mod cli;
pub mod config;
pub mod fields;
pub mod focus;
pub mod graphics;
pub mod picking;
pub mod shooting_stars;
pub mod store;
pub mod universe;
pub mod user_input;
pub mod windowing;

pub use universe::Universe;
pub use windowing::Windowing;

/// Engine-level error type.
///
/// The procedural fields and the focus controller never fail; everything here comes from
/// the host side (window, GPU, config files).
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("window: {0}")]
    Window(String),

    #[error("render: {0}")]
    Render(String),

    #[error("config: {0}")]
    Config(String),

    #[error("invalid color {0:?} (expected #RRGGBB)")]
    InvalidColor(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl EngineError {
    /// Wrap a boxed backend error (vulkano paths return `Box<dyn Error>`).
    pub fn render(e: Box<dyn std::error::Error>) -> Self {
        Self::Render(e.to_string())
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
