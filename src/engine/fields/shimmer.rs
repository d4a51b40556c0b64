use std::f32::consts::TAU;

use glam::{EulerRot, Mat4, Vec3};

use super::FieldKind;

/// Point-size modulation constants for one field kind.
///
/// The vertex shader evaluates the same formula as [`shimmer`]; these values travel to it
/// through push constants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShimmerParams {
    pub frequency: f32,
    pub amplitude: f32,
    pub baseline: f32,
    /// Perspective scale: on-screen size is `size * shimmer * attenuation / view_depth`.
    pub size_attenuation: f32,
}

impl ShimmerParams {
    pub const fn for_kind(kind: FieldKind) -> Self {
        match kind {
            FieldKind::Starfield => Self {
                frequency: 1.0,
                amplitude: 0.35,
                baseline: 1.0,
                size_attenuation: 260.0,
            },
            FieldKind::Sphere => Self {
                frequency: 1.1,
                amplitude: 0.3,
                baseline: 1.0,
                size_attenuation: 220.0,
            },
            FieldKind::Galaxy => Self {
                frequency: 0.5,
                amplitude: 0.12,
                baseline: 1.0,
                size_attenuation: 250.0,
            },
        }
    }
}

/// `sin(time * freq + phase * 2π) * amplitude + baseline`
#[inline]
pub fn shimmer(time: f32, phase: f32, params: &ShimmerParams) -> f32 {
    (time * params.frequency + phase * TAU).sin() * params.amplitude + params.baseline
}

/// Slow whole-field rotation, in radians per second about each axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldAnimation {
    pub spin: Vec3,
}

impl FieldAnimation {
    pub const fn for_kind(kind: FieldKind) -> Self {
        let spin = match kind {
            FieldKind::Starfield => Vec3::new(0.0, 0.01, 0.0),
            FieldKind::Sphere => Vec3::new(0.03, 0.09, 0.0),
            FieldKind::Galaxy => Vec3::new(0.0, 0.03, 0.0),
        };
        Self { spin }
    }

    /// Model matrix at `elapsed` seconds for a field anchored at `origin`.
    pub fn model(&self, origin: Vec3, elapsed: f32) -> Mat4 {
        let angles = self.spin * elapsed;
        Mat4::from_translation(origin) * Mat4::from_euler(EulerRot::XYZ, angles.x, angles.y, angles.z)
    }
}
