//! Procedural star sprite: a soft radial falloff used as every point's footprint.

use image::{Rgba, RgbaImage};

pub const STAR_SPRITE_SIZE: u32 = 64;

/// Alpha stops along the normalised radius (centre = 0, edge = 1).
const FALLOFF: [(f32, f32); 3] = [(0.0, 1.0), (0.35, 0.6), (1.0, 0.0)];

/// Piecewise-linear falloff between the [`FALLOFF`] stops; zero outside the disc.
pub fn falloff(r: f32) -> f32 {
    if r <= 0.0 {
        return FALLOFF[0].1;
    }
    for pair in FALLOFF.windows(2) {
        let (r0, a0) = pair[0];
        let (r1, a1) = pair[1];
        if r <= r1 {
            let t = (r - r0) / (r1 - r0);
            return a0 + (a1 - a0) * t;
        }
    }
    0.0
}

/// White RGBA image whose alpha follows [`falloff`].
pub fn star_sprite(size: u32) -> RgbaImage {
    let half = size as f32 * 0.5;
    RgbaImage::from_fn(size, size, |x, y| {
        let dx = (x as f32 + 0.5 - half) / half;
        let dy = (y as f32 + 0.5 - half) / half;
        let a = falloff((dx * dx + dy * dy).sqrt());
        Rgba([255, 255, 255, (a * 255.0).round() as u8])
    })
}
