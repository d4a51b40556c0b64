use glam::{Mat4, Vec2, Vec3};

use crate::engine::focus::CameraPose;
use crate::engine::picking::Ray;

/// Perspective camera lens (flat screen).
///
/// Placement lives in `CameraPose`; this only knows how to project.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub fov_y_radians: f32,
    pub z_near: f32,
    pub z_far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            fov_y_radians: 60.0_f32.to_radians(),
            z_near: 0.1,
            z_far: 5000.0,
        }
    }
}

impl Camera {
    pub fn view(&self, pose: &CameraPose) -> Mat4 {
        Mat4::look_at_rh(pose.position, pose.target, Vec3::Y)
    }

    /// Right-handed perspective with Vulkan conventions: depth in `[0, 1]`, clip-space +Y down.
    pub fn projection(&self, aspect: f32) -> Mat4 {
        let mut proj = Mat4::perspective_rh(self.fov_y_radians, aspect.max(1e-4), self.z_near, self.z_far);
        proj.y_axis.y = -proj.y_axis.y;
        proj
    }

    /// World-space ray through a cursor position given in pixels from the top-left corner.
    pub fn screen_ray(&self, cursor: Vec2, viewport: Vec2, pose: &CameraPose) -> Ray {
        let ndc_x = 2.0 * cursor.x / viewport.x.max(1.0) - 1.0;
        let ndc_y = 1.0 - 2.0 * cursor.y / viewport.y.max(1.0);
        let aspect = viewport.x.max(1.0) / viewport.y.max(1.0);
        let half_h = (self.fov_y_radians * 0.5).tan();

        let forward = (pose.target - pose.position).try_normalize().unwrap_or(Vec3::NEG_Z);
        let right = forward.cross(Vec3::Y).try_normalize().unwrap_or(Vec3::X);
        let up = right.cross(forward);

        let dir = forward + right * (ndc_x * half_h * aspect) + up * (ndc_y * half_h);
        Ray::new(pose.position, dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn pose() -> CameraPose {
        CameraPose::new(Vec3::new(0.0, 0.0, 72.0), Vec3::ZERO)
    }

    #[test]
    fn centre_ray_points_at_target() {
        let ray = Camera::default().screen_ray(Vec2::new(400.0, 300.0), Vec2::new(800.0, 600.0), &pose());
        assert_relative_eq!(ray.dir.z, -1.0, epsilon = 1e-5);
        assert_relative_eq!(ray.origin.z, 72.0);
    }

    #[test]
    fn top_right_ray_leans_up_and_right() {
        let ray = Camera::default().screen_ray(Vec2::new(800.0, 0.0), Vec2::new(800.0, 600.0), &pose());
        assert!(ray.dir.x > 0.0);
        assert!(ray.dir.y > 0.0);
    }

    #[test]
    fn projection_flips_y_for_vulkan() {
        let cam = Camera::default();
        let clip = cam.projection(1.0) * cam.view(&pose()) * Vec3::new(0.0, 10.0, 0.0).extend(1.0);
        assert!(clip.y / clip.w < 0.0);
        let depth = clip.z / clip.w;
        assert!((0.0..=1.0).contains(&depth));
    }
}
