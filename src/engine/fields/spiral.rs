use std::f32::consts::TAU;

use glam::Vec3;
use rand::Rng;

use super::palette::galaxy_blend;
use super::{FieldKind, ParticleField};

/// Spiral galaxy disk in the local XZ plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpiralGalaxyParams {
    pub count: usize,
    pub radius: f32,
    pub arms: usize,
    /// Full turns an arm makes between the core and the rim.
    pub spin: f32,
    pub randomness: f32,
    /// Disk thickness at the core; tapers linearly to zero at the rim.
    pub thickness: f32,
    pub brightness: f32,
    pub core_color: Vec3,
    pub arm_color: Vec3,
    pub dust_color: Vec3,
}

impl Default for SpiralGalaxyParams {
    fn default() -> Self {
        Self {
            count: 14_000,
            radius: 220.0,
            arms: 4,
            spin: 2.4,
            randomness: 0.42,
            thickness: 10.0,
            brightness: 0.55,
            core_color: Vec3::ONE,
            arm_color: Vec3::new(0.655, 0.545, 0.98),
            dust_color: Vec3::new(0.133, 0.827, 0.933),
        }
    }
}

/// Density exponent on the radius draw. Values above 1 pull particles toward the core.
const CORE_BIAS: f32 = 1.9;

impl SpiralGalaxyParams {
    /// Arm a particle belongs to. Arms are assigned round-robin by index.
    #[inline]
    pub fn arm_index(&self, i: usize) -> usize {
        i % self.arms.max(1)
    }

    /// Vertical extent allowed at radius `r`.
    #[inline]
    pub fn thickness_at(&self, r: f32) -> f32 {
        self.thickness * (1.0 - (r / self.radius).clamp(0.0, 1.0))
    }
}

/// Build a logarithmic-spiral galaxy disk.
pub fn spiral_galaxy(params: &SpiralGalaxyParams, rng: &mut impl Rng) -> ParticleField {
    let mut field = ParticleField::with_capacity(FieldKind::Galaxy, params.count);
    let arms = params.arms.max(1) as f32;

    for i in 0..params.count {
        let r = rng.random::<f32>().powf(CORE_BIAS) * params.radius;
        let norm = r / params.radius;

        let arm_angle = params.arm_index(i) as f32 / arms * TAU;
        let angle = arm_angle + norm * TAU * params.spin;

        // One jitter draw drives both offsets so scattered stars stay on the arm's curve.
        let jitter = (rng.random::<f32>() - 0.5) * 2.0;
        let final_r = r + jitter * params.randomness * (params.radius - r) * 0.15;
        let final_a = angle + jitter * params.randomness * 0.35;

        let y = (rng.random::<f32>() - 0.5) * params.thickness_at(r);
        let position = Vec3::new(final_a.cos() * final_r, y, final_a.sin() * final_r);

        let core_weight = 1.0 - norm;
        let dust_mix = rng.random::<f32>() * 0.25;
        let color = galaxy_blend(
            params.core_color,
            params.arm_color,
            params.dust_color,
            core_weight,
            dust_mix,
        ) * params.brightness;

        let size = (1.0 + 2.2 * core_weight) * (0.6 + rng.random::<f32>() * 1.2);

        field.push(position, color, size, rng.random::<f32>());
    }

    field
}
