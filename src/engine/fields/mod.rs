//! Procedural particle fields.
//!
//! Every generator here is a pure function of its parameters plus an injected RNG and
//! returns a `ParticleField`: four parallel, fixed-length attribute buffers ready to be
//! interleaved into a vertex buffer. Nothing in this module knows about the renderer.
//!
//! Animated shimmer is *not* baked into the buffers; see `shimmer`.

pub mod fibonacci;
pub mod palette;
pub mod shell;
pub mod shimmer;
pub mod spiral;

pub use fibonacci::{FibonacciSphereParams, GOLDEN_ANGLE, fibonacci_sphere};
pub use shell::{ShellParams, shell};
pub use shimmer::{FieldAnimation, ShimmerParams, shimmer};
pub use spiral::{SpiralGalaxyParams, spiral_galaxy};

use glam::Vec3;
use serde::Serialize;

/// Which distribution produced a field. Selects shimmer/spin constants downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Starfield,
    Sphere,
    Galaxy,
}

impl FieldKind {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "starfield" | "stars" => Some(Self::Starfield),
            "sphere" => Some(Self::Sphere),
            "galaxy" => Some(Self::Galaxy),
            _ => None,
        }
    }
}

/// Static attribute buffers for one batch of points.
///
/// Contract:
/// - `positions` and `colors` hold `3 * count` floats (xyz / rgb).
/// - `sizes` and `phases` hold `count` floats; phases are in `[0, 1)`.
/// - The particle count never changes after construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParticleField {
    pub kind: FieldKind,
    positions: Vec<f32>,
    colors: Vec<f32>,
    sizes: Vec<f32>,
    phases: Vec<f32>,
}

impl ParticleField {
    pub(crate) fn with_capacity(kind: FieldKind, count: usize) -> Self {
        Self {
            kind,
            positions: Vec::with_capacity(count * 3),
            colors: Vec::with_capacity(count * 3),
            sizes: Vec::with_capacity(count),
            phases: Vec::with_capacity(count),
        }
    }

    pub(crate) fn push(&mut self, position: Vec3, color: Vec3, size: f32, phase: f32) {
        self.positions.extend_from_slice(&position.to_array());
        self.colors.extend_from_slice(&color.to_array());
        self.sizes.push(size);
        self.phases.push(phase);
    }

    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    #[inline]
    pub fn position(&self, i: usize) -> Vec3 {
        Vec3::from_slice(&self.positions[i * 3..i * 3 + 3])
    }

    #[inline]
    pub fn color(&self, i: usize) -> Vec3 {
        Vec3::from_slice(&self.colors[i * 3..i * 3 + 3])
    }

    /// Iterate `(position, color, size, phase)` per particle.
    pub fn iter(&self) -> impl Iterator<Item = (Vec3, Vec3, f32, f32)> + '_ {
        (0..self.len()).map(|i| (self.position(i), self.color(i), self.sizes[i], self.phases[i]))
    }
}
