//! Pointer hit-testing against course spheres.

use glam::Vec3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit length.
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self {
            origin,
            dir: dir.try_normalize().unwrap_or(Vec3::NEG_Z),
        }
    }

    /// Distance along the ray to the first hit on the sphere, if any.
    ///
    /// A ray starting inside the sphere hits at `t = 0`.
    pub fn intersect_sphere(&self, center: Vec3, radius: f32) -> Option<f32> {
        let oc = self.origin - center;
        let b = oc.dot(self.dir);
        let c = oc.length_squared() - radius * radius;
        if c <= 0.0 {
            return Some(0.0);
        }
        let disc = b * b - c;
        if disc < 0.0 {
            return None;
        }
        let t = -b - disc.sqrt();
        (t >= 0.0).then_some(t)
    }
}

/// A clickable sphere bound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickTarget {
    pub center: Vec3,
    pub radius: f32,
}

/// Index of the nearest target hit by `ray`.
pub fn pick_nearest(ray: &Ray, targets: &[PickTarget]) -> Option<usize> {
    targets
        .iter()
        .enumerate()
        .filter_map(|(i, t)| ray.intersect_sphere(t.center, t.radius).map(|d| (i, d)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn hits_sphere_in_front() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 72.0), Vec3::NEG_Z);
        let t = ray.intersect_sphere(Vec3::ZERO, 10.0).unwrap();
        assert_relative_eq!(t, 62.0, epsilon = 1e-4);
        assert_relative_eq!((ray.origin + ray.dir * t).z, 10.0, epsilon = 1e-4);
    }

    #[test]
    fn misses_sphere_behind_or_beside() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 72.0), Vec3::Z);
        assert!(ray.intersect_sphere(Vec3::ZERO, 10.0).is_none());

        let ray = Ray::new(Vec3::new(0.0, 0.0, 72.0), Vec3::NEG_Z);
        assert!(ray.intersect_sphere(Vec3::new(50.0, 0.0, 0.0), 10.0).is_none());
    }

    #[test]
    fn nearest_target_wins() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 300.0), Vec3::NEG_Z);
        let targets = [
            PickTarget { center: Vec3::ZERO, radius: 10.0 },
            PickTarget { center: Vec3::new(0.0, 0.0, 200.0), radius: 9.2 },
            PickTarget { center: Vec3::new(200.0, 0.0, 0.0), radius: 9.2 },
        ];
        assert_eq!(pick_nearest(&ray, &targets), Some(1));
        assert_eq!(pick_nearest(&Ray::new(Vec3::ZERO + Vec3::Y * 500.0, Vec3::Y), &targets), None);
    }
}
