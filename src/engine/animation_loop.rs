use std::time::Instant;

/// Longest step fed to the scene. Larger gaps (window dragged, debugger pause) are cut
/// down so easing and meteors don't jump.
pub const MAX_FRAME_DT: f32 = 0.1;

/// Wall-clock frame timing: per-frame delta plus monotonic elapsed time.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last_frame: Option<Instant>,
    elapsed: f32,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last_frame: None,
            elapsed: 0.0,
        }
    }

    /// Start of a frame: raw seconds since the previous call, zero on the first.
    pub fn wall_delta(&mut self) -> f32 {
        let now = Instant::now();
        self.last_frame
            .replace(now)
            .map(|prev| now.saturating_duration_since(prev).as_secs_f32())
            .unwrap_or(0.0)
    }

    /// Advance by a delta, clamped to `0..=MAX_FRAME_DT`; returns the step actually taken.
    pub fn advance(&mut self, dt_sec: f32) -> f32 {
        let dt = if dt_sec.is_finite() { dt_sec.clamp(0.0, MAX_FRAME_DT) } else { 0.0 };
        self.elapsed += dt;
        dt
    }

    /// Seconds of animation time since the first frame.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_frame_has_zero_delta() {
        let mut clock = FrameClock::new();
        let dt = clock.wall_delta();
        assert_eq!(dt, 0.0);
        assert_eq!(clock.advance(dt), 0.0);
        assert_eq!(clock.elapsed(), 0.0);
    }

    #[test]
    fn elapsed_is_monotonic() {
        let mut clock = FrameClock::new();
        let mut last = clock.elapsed();
        for dt in [0.016, -5.0, 0.5, f32::NAN, 0.0, 0.033] {
            clock.advance(dt);
            assert!(clock.elapsed() >= last);
            last = clock.elapsed();
        }
        assert!((clock.elapsed() - (0.016 + MAX_FRAME_DT + 0.033)).abs() < 1e-6);
    }

    #[test]
    fn real_ticks_never_go_backwards() {
        let mut clock = FrameClock::new();
        for _ in 0..5 {
            let dt = clock.wall_delta();
            assert!(dt >= 0.0);
            assert!(clock.advance(dt) <= MAX_FRAME_DT);
        }
    }
}
