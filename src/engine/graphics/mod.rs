pub mod pipeline_descriptor_set_layouts;
pub mod primitives;
pub mod renderer;
pub mod sprite;
pub mod visual_world;
pub mod vulkano_renderer;

pub use primitives::{FieldHandle, PointVertex, TextureHandle, field_vertices};
pub use renderer::{FieldUploader, Renderer};
pub use visual_world::{FieldDraw, VisualWorld};
