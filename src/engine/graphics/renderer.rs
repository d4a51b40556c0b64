use crate::engine::fields::ParticleField;
use crate::engine::graphics::primitives::FieldHandle;

/// The renderer the window drives.
pub type Renderer = crate::engine::graphics::vulkano_renderer::VulkanoRenderer;

/// Anything that can take a CPU-side field and hand back a draw handle.
///
/// The scene uploads through this seam so it can be exercised without a GPU.
pub trait FieldUploader {
    fn upload_field(
        &mut self,
        field: &ParticleField,
    ) -> Result<FieldHandle, Box<dyn std::error::Error>>;
}
