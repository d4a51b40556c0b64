use std::f32::consts::TAU;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::palette::star_color;
use super::{FieldKind, ParticleField};

/// Background starfield: points scattered over shells between `radius_min` and `radius_max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellParams {
    pub count: usize,
    pub radius_min: f32,
    pub radius_max: f32,
    /// Multiplier applied to palette colours.
    pub brightness: f32,
}

impl Default for ShellParams {
    fn default() -> Self {
        Self {
            count: 6000,
            radius_min: 100.0,
            radius_max: 400.0,
            brightness: 0.7,
        }
    }
}

/// Build a starfield.
///
/// The polar angle comes from `acos(2v - 1)` rather than a uniform angle, so the points do
/// not bunch up at the poles.
pub fn shell(params: &ShellParams, rng: &mut impl Rng) -> ParticleField {
    let mut field = ParticleField::with_capacity(FieldKind::Starfield, params.count);
    let span = params.radius_max - params.radius_min;

    for _ in 0..params.count {
        let r = params.radius_min + rng.random::<f32>() * span;
        let azimuth = rng.random::<f32>() * TAU;
        let polar = (rng.random::<f32>() * 2.0 - 1.0).clamp(-1.0, 1.0).acos();

        let position = glam::Vec3::new(
            r * polar.sin() * azimuth.cos(),
            r * polar.sin() * azimuth.sin(),
            r * polar.cos(),
        );

        let color = star_color(rng.random::<f32>()) * params.brightness;
        let size = 1.2 + rng.random::<f32>() * 2.0;

        field.push(position, color, size, rng.random::<f32>());
    }

    field
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn radii_stay_inside_the_shell() {
        let params = ShellParams {
            count: 4000,
            ..ShellParams::default()
        };
        let field = shell(&params, &mut StdRng::seed_from_u64(7));

        assert_eq!(field.len(), 4000);
        for (p, ..) in field.iter() {
            let r = p.length();
            assert!(r >= params.radius_min - 1e-3, "r={r}");
            assert!(r <= params.radius_max + 1e-3, "r={r}");
        }
    }

    #[test]
    fn no_pole_clustering() {
        // For a uniform sphere, the normalised polar coordinate (here z / r) is uniform on
        // [-1, 1]. Bucket it and make sure every bucket is close to the mean.
        let params = ShellParams {
            count: 40_000,
            ..ShellParams::default()
        };
        let field = shell(&params, &mut StdRng::seed_from_u64(11));

        let mut buckets = [0usize; 10];
        for (p, ..) in field.iter() {
            let c = (p.z / p.length()).clamp(-1.0, 0.999_999);
            buckets[((c + 1.0) * 5.0) as usize] += 1;
        }

        let expected = params.count as f32 / 10.0;
        for (i, &n) in buckets.iter().enumerate() {
            let dev = (n as f32 - expected).abs() / expected;
            assert!(dev < 0.1, "bucket {i} has {n}, expected ~{expected}");
        }
    }

    #[test]
    fn sizes_and_phases_in_range() {
        let field = shell(&ShellParams::default(), &mut StdRng::seed_from_u64(3));
        assert!(field.sizes.iter().all(|s| (1.2..3.2).contains(s)));
        assert!(field.phases.iter().all(|p| (0.0..1.0).contains(p)));
    }

    #[test]
    fn same_seed_same_field() {
        let params = ShellParams {
            count: 64,
            ..ShellParams::default()
        };
        let a = shell(&params, &mut StdRng::seed_from_u64(99));
        let b = shell(&params, &mut StdRng::seed_from_u64(99));
        assert_eq!(a.positions, b.positions);
        assert_eq!(a.colors, b.colors);
    }
}
