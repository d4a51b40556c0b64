use glam::Vec3;

/// Starfield colour bins, checked from the top: the first threshold below the draw wins.
///
/// Effective probabilities: bright 35%, accent 20%, mid2 15%, mid1 15%, dark 15%.
pub const STAR_BINS: [(f32, Vec3); 5] = [
    (0.65, Vec3::new(1.0, 1.0, 1.0)),
    (0.45, Vec3::new(1.0, 0.24, 0.51)),
    (0.30, Vec3::new(0.62, 0.0, 1.0)),
    (0.15, Vec3::new(0.0, 0.9, 1.0)),
    (f32::NEG_INFINITY, Vec3::new(0.0, 0.0, 0.0)),
];

/// Map a uniform draw in `[0, 1)` onto the weighted star palette.
pub fn star_color(draw: f32) -> Vec3 {
    STAR_BINS
        .iter()
        .find(|(threshold, _)| draw > *threshold)
        .map(|(_, c)| *c)
        .unwrap_or(Vec3::ZERO)
}

/// Three-way galaxy blend: arm → core by `core_weight`, then → dust by `dust_mix`.
pub fn galaxy_blend(core: Vec3, arm: Vec3, dust: Vec3, core_weight: f32, dust_mix: f32) -> Vec3 {
    arm.lerp(core, core_weight).lerp(dust, dust_mix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bins_follow_thresholds() {
        assert_eq!(star_color(0.99), Vec3::ONE);
        assert_eq!(star_color(0.5), Vec3::new(1.0, 0.24, 0.51));
        assert_eq!(star_color(0.4), Vec3::new(0.62, 0.0, 1.0));
        assert_eq!(star_color(0.2), Vec3::new(0.0, 0.9, 1.0));
        assert_eq!(star_color(0.1), Vec3::ZERO);
        assert_eq!(star_color(0.0), Vec3::ZERO);
    }

    #[test]
    fn blend_endpoints() {
        let core = Vec3::ONE;
        let arm = Vec3::new(0.5, 0.0, 0.0);
        let dust = Vec3::new(0.0, 0.0, 1.0);

        assert_eq!(galaxy_blend(core, arm, dust, 0.0, 0.0), arm);
        assert_eq!(galaxy_blend(core, arm, dust, 1.0, 0.0), core);
        assert_eq!(galaxy_blend(core, arm, dust, 1.0, 1.0), dust);
    }
}
