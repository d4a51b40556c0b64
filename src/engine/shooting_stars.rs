//! Meteor streaks: a small recycled pool of head + trail pairs.

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShootingStarParams {
    pub pool_size: usize,
    /// Expected spawns per second (spawn chance per frame is `rate * dt`).
    pub spawn_rate: f32,
    pub speed_min: f32,
    pub speed_max: f32,
    pub trail_length: f32,
    pub lifetime: f32,
    pub spawn_box: Vec3,
    pub spawn_center: Vec3,
    pub base_direction: Vec3,
    pub head_size: f32,
}

impl Default for ShootingStarParams {
    fn default() -> Self {
        Self {
            pool_size: 10,
            spawn_rate: 0.45,
            speed_min: 240.0,
            speed_max: 420.0,
            trail_length: 90.0,
            lifetime: 1.1,
            spawn_box: Vec3::new(900.0, 420.0, 900.0),
            spawn_center: Vec3::new(0.0, 220.0, 0.0),
            base_direction: Vec3::new(1.0, -0.35, 0.2),
            head_size: 12.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Star {
    active: bool,
    age: f32,
    speed: f32,
    pos: Vec3,
    vel: Vec3,
}

/// Visible streak: trail end and head position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Streak {
    pub tail: Vec3,
    pub head: Vec3,
}

#[derive(Debug, Clone)]
pub struct ShootingStars {
    params: ShootingStarParams,
    pool: Vec<Star>,
}

impl ShootingStars {
    pub fn new(params: ShootingStarParams) -> Self {
        Self {
            pool: vec![Star::default(); params.pool_size],
            params,
        }
    }

    pub fn params(&self) -> &ShootingStarParams {
        &self.params
    }

    pub fn active_count(&self) -> usize {
        self.pool.iter().filter(|s| s.active).count()
    }

    /// Activate the first free slot. Returns false when the pool is exhausted.
    pub fn spawn(&mut self, rng: &mut impl Rng) -> bool {
        let p = self.params;
        let Some(star) = self.pool.iter_mut().find(|s| !s.active) else {
            return false;
        };

        let speed = p.speed_min + rng.random::<f32>() * (p.speed_max - p.speed_min);
        let offset = Vec3::new(
            (rng.random::<f32>() - 0.5) * p.spawn_box.x,
            (rng.random::<f32>() - 0.5) * p.spawn_box.y,
            (rng.random::<f32>() - 0.5) * p.spawn_box.z,
        );
        let jitter = Vec3::new(
            (rng.random::<f32>() - 0.5) * 0.25,
            (rng.random::<f32>() - 0.5) * 0.18,
            (rng.random::<f32>() - 0.5) * 0.25,
        );
        let base = p.base_direction.try_normalize().unwrap_or(Vec3::X);
        let dir = (base + jitter).try_normalize().unwrap_or(base);

        *star = Star {
            active: true,
            age: 0.0,
            speed,
            pos: p.spawn_center + offset,
            vel: dir * speed,
        };
        true
    }

    /// Advance every live star by `dt_sec`, maybe spawning one first.
    pub fn update(&mut self, dt_sec: f32, rng: &mut impl Rng) {
        if dt_sec <= 0.0 {
            return;
        }

        if rng.random::<f32>() < self.params.spawn_rate * dt_sec {
            self.spawn(rng);
        }

        let lifetime = self.params.lifetime;
        for star in self.pool.iter_mut().filter(|s| s.active) {
            star.age += dt_sec;
            star.pos += star.vel * dt_sec;
            if star.age > lifetime {
                star.active = false;
            }
        }
    }

    /// Streaks for every live star. Trails point back along the velocity.
    pub fn streaks(&self) -> impl Iterator<Item = Streak> + '_ {
        let trail = self.params.trail_length;
        self.pool.iter().filter(|s| s.active).map(move |s| Streak {
            tail: s.pos - s.vel * (trail / s.speed.max(f32::EPSILON)),
            head: s.pos,
        })
    }
}
