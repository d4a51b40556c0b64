use std::f32::consts::{PI, TAU};

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::CameraPose;

/// Free-orbit behaviour limits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitLimits {
    pub min_distance: f32,
    pub max_distance: f32,
    /// Radians of rotation per pixel of drag.
    pub rotate_speed: f32,
    /// Distance multiplier per wheel notch toward the target.
    pub zoom_step: f32,
    /// 1.0 = one full turn per minute.
    pub auto_rotate_speed: f32,
}

impl Default for OrbitLimits {
    fn default() -> Self {
        Self {
            min_distance: 24.0,
            max_distance: 300.0,
            rotate_speed: 0.005,
            zoom_step: 0.95,
            auto_rotate_speed: 0.2,
        }
    }
}

// Keep the camera off the exact poles so the spherical azimuth stays defined.
const POLAR_EPS: f32 = 0.01;

/// Orbit-around-target camera handle (no panning).
///
/// Owns the `CameraPose` that the focus controller eases. Spherical angles are derived from
/// the pose on every call, so it is fine for someone else to move the pose between calls.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    pose: CameraPose,
    limits: OrbitLimits,
}

impl OrbitControls {
    pub fn new(pose: CameraPose, limits: OrbitLimits) -> Self {
        Self { pose, limits }
    }

    pub fn pose(&self) -> &CameraPose {
        &self.pose
    }

    pub fn pose_mut(&mut self) -> &mut CameraPose {
        &mut self.pose
    }

    /// Orbit by a drag of `(dx, dy)` pixels.
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        let (radius, azimuth, polar) = self.spherical();
        let azimuth = azimuth - dx * self.limits.rotate_speed;
        let polar = polar - dy * self.limits.rotate_speed;
        self.set_spherical(radius, azimuth, polar);
    }

    /// Zoom by wheel notches; positive moves toward the target.
    pub fn zoom(&mut self, notches: f32) {
        if notches == 0.0 {
            return;
        }
        let (radius, azimuth, polar) = self.spherical();
        let radius = (radius * self.limits.zoom_step.powf(notches))
            .clamp(self.limits.min_distance, self.limits.max_distance);
        self.set_spherical(radius, azimuth, polar);
    }

    pub fn auto_rotate(&mut self, dt_sec: f32) {
        if dt_sec <= 0.0 || self.limits.auto_rotate_speed == 0.0 {
            return;
        }
        let (radius, azimuth, polar) = self.spherical();
        let step = TAU / 60.0 * self.limits.auto_rotate_speed * dt_sec;
        self.set_spherical(radius, azimuth - step, polar);
    }

    /// `(radius, azimuth about +Y measured from +Z, polar from +Y)`
    fn spherical(&self) -> (f32, f32, f32) {
        let offset = self.pose.position - self.pose.target;
        let radius = offset.length();
        if radius <= f32::EPSILON {
            return (0.0, 0.0, PI * 0.5);
        }
        let azimuth = offset.x.atan2(offset.z);
        let polar = (offset.y / radius).clamp(-1.0, 1.0).acos();
        (radius, azimuth, polar)
    }

    fn set_spherical(&mut self, radius: f32, azimuth: f32, polar: f32) {
        let polar = polar.clamp(POLAR_EPS, PI - POLAR_EPS);
        let offset = Vec3::new(
            radius * polar.sin() * azimuth.sin(),
            radius * polar.cos(),
            radius * polar.sin() * azimuth.cos(),
        );
        self.pose.position = self.pose.target + offset;
    }
}
