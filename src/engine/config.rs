//! Scene tuning: counts, radii, colours, camera speeds.
//!
//! Every field has a default, so a tuning file only needs the values it changes.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::engine::fields::{FibonacciSphereParams, ShellParams, SpiralGalaxyParams};
use crate::engine::focus::{FocusTuning, OrbitLimits};
use crate::engine::shooting_stars::ShootingStarParams;
use crate::engine::{EngineError, EngineResult};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Fixed RNG seed; a fresh OS seed is used when absent.
    pub seed: Option<u64>,
    pub scene: SceneTuning,
    pub camera: FocusTuning,
    pub orbit: OrbitLimits,
    pub starfield: ShellParams,
    pub galaxy: GalaxyTuning,
    pub shooting_stars: ShootingStarParams,
    pub courses: CourseList,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneTuning {
    pub ring_radius: f32,
    pub sphere_radius: f32,
    pub sphere_particles: usize,
    pub center_radius: f32,
    pub center_particles: usize,
    pub particle_brightness: f32,
    /// Click bound as a multiple of the sphere radius (points have visible size).
    pub pick_radius_scale: f32,
}

impl Default for SceneTuning {
    fn default() -> Self {
        Self {
            ring_radius: 200.0,
            sphere_radius: 9.2,
            sphere_particles: 2600,
            center_radius: 10.0,
            center_particles: 3400,
            particle_brightness: 0.8,
            pick_radius_scale: 1.15,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalaxyTuning {
    /// Height of the disk below the course ring.
    pub y: f32,
    pub radius: f32,
    pub count: usize,
    pub arms: usize,
    pub spin: f32,
    pub randomness: f32,
    pub thickness: f32,
    pub brightness: f32,
    pub core_color: String,
    pub arm_color: String,
    pub dust_color: String,
}

impl Default for GalaxyTuning {
    fn default() -> Self {
        Self {
            y: -90.0,
            radius: 220.0,
            count: 14_000,
            arms: 4,
            spin: 2.4,
            randomness: 0.42,
            thickness: 10.0,
            brightness: 0.55,
            core_color: "#FFFFFF".into(),
            arm_color: "#A78BFA".into(),
            dust_color: "#22D3EE".into(),
        }
    }
}

impl GalaxyTuning {
    pub fn params(&self) -> EngineResult<SpiralGalaxyParams> {
        Ok(SpiralGalaxyParams {
            count: self.count,
            radius: self.radius,
            arms: self.arms,
            spin: self.spin,
            randomness: self.randomness,
            thickness: self.thickness,
            brightness: self.brightness,
            core_color: parse_hex_color(&self.core_color)?,
            arm_color: parse_hex_color(&self.arm_color)?,
            dust_color: parse_hex_color(&self.dust_color)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseEntry {
    pub label: String,
    pub color: String,
}

impl CourseEntry {
    fn new(label: &str, color: &str) -> Self {
        Self {
            label: label.into(),
            color: color.into(),
        }
    }
}

/// The ring of course spheres plus the one at the centre.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CourseList {
    pub ring: Vec<CourseEntry>,
    pub center: CourseEntry,
}

impl Default for CourseList {
    fn default() -> Self {
        Self {
            ring: vec![
                CourseEntry::new("COMP 484: Web Engineering", "#22D3EE"),
                CourseEntry::new("COMP 584: Advanced Web Engineering", "#A78BFA"),
                CourseEntry::new("COMP 467: Multimedia System Design", "#F472B6"),
                CourseEntry::new("COMP 582: Software Verification and Validation", "#34D399"),
                CourseEntry::new("COMP 587: Software Requirements and Verification", "#FB7185"),
                CourseEntry::new("Senior Design Project", "#FBBF24"),
                CourseEntry::new("Pokemon TCG Shop", "#F97316"),
            ],
            center: CourseEntry::new("About Me", "#60A5FA"),
        }
    }
}

impl Tuning {
    pub fn load(path: &Path) -> EngineResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let tuning: Self = serde_json::from_str(&text)?;
        tuning.validate()?;
        log::info!("loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Reject values the generators cannot use. Only "sane positive number" checks.
    pub fn validate(&self) -> EngineResult<()> {
        fn positive(name: &str, v: f32) -> EngineResult<()> {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(EngineError::Config(format!("{name} must be positive, got {v}")))
            }
        }
        fn fraction(name: &str, v: f32) -> EngineResult<()> {
            if v > 0.0 && v <= 1.0 {
                Ok(())
            } else {
                Err(EngineError::Config(format!("{name} must be in (0, 1], got {v}")))
            }
        }

        let s = &self.scene;
        positive("scene.ring_radius", s.ring_radius)?;
        positive("scene.sphere_radius", s.sphere_radius)?;
        positive("scene.center_radius", s.center_radius)?;
        positive("scene.pick_radius_scale", s.pick_radius_scale)?;

        let c = &self.camera;
        positive("camera.focus_distance", c.focus_distance)?;
        positive("camera.settle_distance", c.settle_distance)?;
        fraction("camera.focus_lerp_speed", c.focus_lerp_speed)?;
        fraction("camera.target_lerp_speed", c.target_lerp_speed)?;
        fraction("camera.return_lerp_speed", c.return_lerp_speed)?;

        let o = &self.orbit;
        positive("orbit.min_distance", o.min_distance)?;
        if o.max_distance < o.min_distance {
            return Err(EngineError::Config(format!(
                "orbit.max_distance ({}) is below orbit.min_distance ({})",
                o.max_distance, o.min_distance
            )));
        }

        let st = &self.starfield;
        positive("starfield.radius_min", st.radius_min)?;
        if st.radius_max < st.radius_min {
            return Err(EngineError::Config(format!(
                "starfield.radius_max ({}) is below starfield.radius_min ({})",
                st.radius_max, st.radius_min
            )));
        }

        let g = &self.galaxy;
        positive("galaxy.radius", g.radius)?;
        if g.arms == 0 {
            return Err(EngineError::Config("galaxy.arms must be at least 1".into()));
        }
        g.params()?;

        let sh = &self.shooting_stars;
        positive("shooting_stars.speed_min", sh.speed_min)?;
        positive("shooting_stars.lifetime", sh.lifetime)?;
        if sh.speed_max < sh.speed_min {
            return Err(EngineError::Config(
                "shooting_stars.speed_max is below shooting_stars.speed_min".into(),
            ));
        }

        for course in self.courses.ring.iter().chain(std::iter::once(&self.courses.center)) {
            parse_hex_color(&course.color)?;
        }

        Ok(())
    }

    pub fn sphere_params(&self, color: Vec3) -> FibonacciSphereParams {
        FibonacciSphereParams {
            count: self.scene.sphere_particles,
            radius: self.scene.sphere_radius,
            color,
            brightness: self.scene.particle_brightness,
        }
    }

    pub fn center_params(&self, color: Vec3) -> FibonacciSphereParams {
        FibonacciSphereParams {
            count: self.scene.center_particles,
            radius: self.scene.center_radius,
            color,
            brightness: self.scene.particle_brightness,
        }
    }
}

/// Parse `#RRGGBB` (the leading `#` is optional) into linear 0..1 channels.
pub fn parse_hex_color(s: &str) -> EngineResult<Vec3> {
    let hex = s.strip_prefix('#').unwrap_or(s);
    if hex.len() != 6 || !hex.is_ascii() {
        return Err(EngineError::InvalidColor(s.to_string()));
    }

    let channel = |i: usize| {
        u8::from_str_radix(&hex[i..i + 2], 16)
            .map(|v| f32::from(v) / 255.0)
            .map_err(|_| EngineError::InvalidColor(s.to_string()))
    };

    Ok(Vec3::new(channel(0)?, channel(2)?, channel(4)?))
}
