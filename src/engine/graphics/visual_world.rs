use glam::{Mat4, Vec2, Vec3};

use crate::engine::fields::ShimmerParams;
use crate::engine::graphics::primitives::{FieldHandle, PointVertex};

/// Per-draw payload for one uploaded field. Becomes the push-constant block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldDraw {
    pub handle: FieldHandle,
    pub model: Mat4,
    pub shimmer: ShimmerParams,
    /// Multiplied into every point's colour (hover highlight).
    pub tint: Vec3,
    pub alpha: f32,
}

/// Renderer-friendly cache, rebuilt from the scene every frame.
///
/// Static fields are referenced by handle; meteor heads and trails are small enough to be
/// re-sent as host-visible vertex data each frame.
#[derive(Debug, Default)]
pub struct VisualWorld {
    fields: Vec<FieldDraw>,
    streak_heads: Vec<PointVertex>,
    /// Line list: consecutive pairs are (tail, head).
    streak_lines: Vec<PointVertex>,

    view: Mat4,
    proj: Mat4,
    viewport: Vec2,
    time: f32,
}

impl VisualWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.fields.clear();
        self.streak_heads.clear();
        self.streak_lines.clear();
    }

    pub fn push_field(&mut self, draw: FieldDraw) {
        self.fields.push(draw);
    }

    pub fn fields(&self) -> &[FieldDraw] {
        &self.fields
    }

    /// Queue a meteor: `head_size` point at `head`, line back to `tail` fading to black.
    pub fn push_streak(&mut self, tail: Vec3, head: Vec3, color: Vec3, head_size: f32) {
        self.streak_heads.push(PointVertex::new(head, color, head_size, 0.0));
        self.streak_lines.push(PointVertex::new(tail, color, 1.0, 0.0));
        self.streak_lines.push(PointVertex::new(head, color, 1.0, 0.0));
    }

    pub fn streak_heads(&self) -> &[PointVertex] {
        &self.streak_heads
    }

    pub fn streak_lines(&self) -> &[PointVertex] {
        &self.streak_lines
    }

    pub fn set_camera(&mut self, view: Mat4, proj: Mat4) {
        self.view = view;
        self.proj = proj;
    }

    pub fn camera_view(&self) -> [[f32; 4]; 4] {
        self.view.to_cols_array_2d()
    }

    pub fn camera_proj(&self) -> [[f32; 4]; 4] {
        self.proj.to_cols_array_2d()
    }

    /// Output size in pixels, kept current by the renderer.
    pub fn set_viewport(&mut self, size: Vec2) {
        self.viewport = size;
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    pub fn set_time(&mut self, seconds: f32) {
        self.time = seconds;
    }

    pub fn time(&self) -> f32 {
        self.time
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::fields::FieldKind;

    #[test]
    fn streaks_emit_a_head_and_a_line_pair() {
        let mut vw = VisualWorld::new();
        vw.push_streak(Vec3::ZERO, Vec3::X * 90.0, Vec3::new(1.0, 0.5, 0.25), 12.0);

        assert_eq!(vw.streak_heads().len(), 1);
        assert_eq!(vw.streak_heads()[0].size, 12.0);
        assert_eq!(vw.streak_lines().len(), 2);
        assert_eq!(vw.streak_lines()[0].color, [1.0, 0.5, 0.25]);
        assert_eq!(vw.streak_lines()[1].color, [1.0, 0.5, 0.25]);
        assert_eq!(vw.streak_lines()[1].position, [90.0, 0.0, 0.0]);
    }

    #[test]
    fn clear_keeps_camera_and_viewport() {
        let mut vw = VisualWorld::new();
        vw.set_viewport(Vec2::new(800.0, 600.0));
        vw.set_camera(Mat4::IDENTITY, Mat4::IDENTITY);
        vw.push_field(FieldDraw {
            handle: FieldHandle(0),
            model: Mat4::IDENTITY,
            shimmer: ShimmerParams::for_kind(FieldKind::Galaxy),
            tint: Vec3::ONE,
            alpha: 1.0,
        });
        vw.push_streak(Vec3::ZERO, Vec3::Y, Vec3::ONE, 1.0);

        vw.clear();
        assert!(vw.fields().is_empty());
        assert!(vw.streak_lines().is_empty());
        assert_eq!(vw.viewport(), Vec2::new(800.0, 600.0));
        assert_eq!(vw.camera_view(), Mat4::IDENTITY.to_cols_array_2d());
    }
}
