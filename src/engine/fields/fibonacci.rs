use glam::Vec3;
use rand::Rng;

use super::{FieldKind, ParticleField};

/// Golden angle in radians (`π * (3 - √5)`), as used for the per-index spiral step.
pub const GOLDEN_ANGLE: f64 = 2.399_963_23;

/// Course sphere: `count` points on a sphere of `radius`, all tinted `color * brightness`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FibonacciSphereParams {
    pub count: usize,
    pub radius: f32,
    pub color: Vec3,
    pub brightness: f32,
}

impl Default for FibonacciSphereParams {
    fn default() -> Self {
        Self {
            count: 2600,
            radius: 9.2,
            color: Vec3::ONE,
            brightness: 0.8,
        }
    }
}

/// Unit-sphere point `i` of `count` on the golden-angle spiral.
///
/// `y` walks from `+1` to `-1` in equal steps; a single-point field sits on the `+y` pole.
pub fn fibonacci_point(i: usize, count: usize) -> Vec3 {
    if count <= 1 {
        return Vec3::Y;
    }

    let y = 1.0 - (i as f64 / (count - 1) as f64) * 2.0;
    let radial = (1.0 - y * y).max(0.0).sqrt();
    let angle = i as f64 * GOLDEN_ANGLE;

    Vec3::new(
        (angle.cos() * radial) as f32,
        y as f32,
        (angle.sin() * radial) as f32,
    )
}

/// Build a particle sphere. Placement is deterministic; only sizes and phases are random.
pub fn fibonacci_sphere(params: &FibonacciSphereParams, rng: &mut impl Rng) -> ParticleField {
    let mut field = ParticleField::with_capacity(FieldKind::Sphere, params.count);
    let color = params.color * params.brightness;

    for i in 0..params.count {
        let position = fibonacci_point(i, params.count) * params.radius;
        let size = 2.6 + rng.random::<f32>() * 2.0;
        field.push(position, color, size, rng.random::<f32>());
    }

    field
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    proptest! {
        #[test]
        fn prop_every_point_on_the_surface(count in 2usize..3000, radius in 0.1f32..500.0) {
            let params = FibonacciSphereParams { count, radius, ..Default::default() };
            let field = fibonacci_sphere(&params, &mut StdRng::seed_from_u64(1));

            prop_assert_eq!(field.len(), count);
            for (p, ..) in field.iter() {
                prop_assert!((p.length() - radius).abs() <= radius * 1e-4);
            }
        }
    }

    #[test]
    fn single_particle_sits_on_the_pole() {
        let params = FibonacciSphereParams {
            count: 1,
            radius: 9.2,
            ..Default::default()
        };
        let field = fibonacci_sphere(&params, &mut StdRng::seed_from_u64(1));

        assert_eq!(field.len(), 1);
        let p = field.position(0);
        assert!(!p.is_nan());
        assert_relative_eq!(p.y, 9.2);
        assert_relative_eq!(p.x, 0.0);
        assert_relative_eq!(p.z, 0.0);
    }

    #[test]
    fn empty_field() {
        let params = FibonacciSphereParams {
            count: 0,
            ..Default::default()
        };
        assert!(fibonacci_sphere(&params, &mut StdRng::seed_from_u64(1)).is_empty());
    }

    #[test]
    fn placement_ignores_the_rng() {
        let params = FibonacciSphereParams {
            count: 50,
            ..Default::default()
        };
        let a = fibonacci_sphere(&params, &mut StdRng::seed_from_u64(1));
        let b = fibonacci_sphere(&params, &mut StdRng::seed_from_u64(2));

        assert_eq!(a.positions, b.positions);
        assert_ne!(a.sizes, b.sizes);
    }

    #[test]
    fn endpoints_are_the_poles() {
        assert_relative_eq!(fibonacci_point(0, 10).y, 1.0);
        assert_relative_eq!(fibonacci_point(9, 10).y, -1.0);
    }

    #[test]
    fn color_is_scaled_base_color() {
        let params = FibonacciSphereParams {
            count: 3,
            color: Vec3::new(0.5, 1.0, 0.25),
            brightness: 0.8,
            ..Default::default()
        };
        let field = fibonacci_sphere(&params, &mut StdRng::seed_from_u64(5));
        for i in 0..3 {
            assert_relative_eq!(field.color(i).x, 0.4);
            assert_relative_eq!(field.color(i).y, 0.8);
            assert_relative_eq!(field.color(i).z, 0.2);
        }
    }
}
