use glam::Vec3;
use vulkano::buffer::BufferContents;
use vulkano::pipeline::graphics::vertex_input::Vertex;

use crate::engine::fields::ParticleField;

/// Renderer-owned handle to an uploaded point field (vertex buffer on the GPU).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldHandle(pub u32);

/// Handle to a texture uploaded by the renderer. `0` is reserved for the star sprite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u32);

/// One point as the vertex shader sees it.
///
/// Layout (stride 32): position @0, color @12, size @24, phase @28.
#[derive(BufferContents, Vertex, Clone, Copy, Debug, Default, PartialEq)]
#[repr(C)]
pub struct PointVertex {
    #[format(R32G32B32_SFLOAT)]
    pub position: [f32; 3],
    #[format(R32G32B32_SFLOAT)]
    pub color: [f32; 3],
    #[format(R32_SFLOAT)]
    pub size: f32,
    #[format(R32_SFLOAT)]
    pub phase: f32,
}

impl PointVertex {
    pub fn new(position: Vec3, color: Vec3, size: f32, phase: f32) -> Self {
        Self {
            position: position.to_array(),
            color: color.to_array(),
            size,
            phase,
        }
    }
}

/// Interleave a field's attribute buffers into upload-ready vertices.
pub fn field_vertices(field: &ParticleField) -> Vec<PointVertex> {
    field
        .iter()
        .map(|(pos, color, size, phase)| PointVertex::new(pos, color, size, phase))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::fields::{FibonacciSphereParams, fibonacci_sphere};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::mem::{offset_of, size_of};

    #[test]
    fn vertex_layout_matches_the_shader() {
        assert_eq!(size_of::<PointVertex>(), 32);
        assert_eq!(offset_of!(PointVertex, color), 12);
        assert_eq!(offset_of!(PointVertex, size), 24);
        assert_eq!(offset_of!(PointVertex, phase), 28);
    }

    #[test]
    fn interleaves_every_particle() {
        let params = FibonacciSphereParams {
            count: 50,
            ..Default::default()
        };
        let field = fibonacci_sphere(&params, &mut StdRng::seed_from_u64(9));
        let verts = field_vertices(&field);

        assert_eq!(verts.len(), field.len());
        for (v, (pos, color, size, phase)) in verts.iter().zip(field.iter()) {
            assert_eq!(v.position, pos.to_array());
            assert_eq!(v.color, color.to_array());
            assert_eq!(v.size, size);
            assert_eq!(v.phase, phase);
        }
    }
}
