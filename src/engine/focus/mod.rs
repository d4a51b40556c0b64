//! Click-to-focus camera navigation.
//!
//! `CameraFocusController` is a four-state machine that eases a `CameraPose` toward a
//! selected point and back to a default pose. While it is idle (or locked on a target) the
//! free-orbit handle in [`orbit`] owns the pose instead.

pub mod orbit;

pub use orbit::{OrbitControls, OrbitLimits};

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Easing fractions are specified per 60 Hz frame.
const REFERENCE_FPS: f32 = 60.0;

/// Camera position plus the point it orbits around / looks at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub target: Vec3,
}

impl CameraPose {
    pub fn new(position: Vec3, target: Vec3) -> Self {
        Self { position, target }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FocusState {
    /// Free orbit; the controller leaves the pose alone.
    Idle,
    /// Easing toward a standoff point in front of `target`.
    Focusing { target: Vec3 },
    /// Arrived. The user may orbit around `target` until the selection is cleared.
    Locked { target: Vec3 },
    /// Easing back to the default pose.
    Returning,
}

impl FocusState {
    pub fn target(&self) -> Option<Vec3> {
        match *self {
            Self::Focusing { target } | Self::Locked { target } => Some(target),
            Self::Idle | Self::Returning => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Focusing { .. } => "focusing",
            Self::Locked { .. } => "locked",
            Self::Returning => "returning",
        }
    }
}

/// Controller constants. Speeds are the fraction of the remaining gap closed per 60 Hz frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FocusTuning {
    pub focus_distance: f32,
    pub focus_lerp_speed: f32,
    pub target_lerp_speed: f32,
    pub return_lerp_speed: f32,
    /// Distance below which focusing locks and returning settles.
    pub settle_distance: f32,
    pub default_position: Vec3,
    pub default_target: Vec3,
}

impl Default for FocusTuning {
    fn default() -> Self {
        Self {
            focus_distance: 55.0,
            focus_lerp_speed: 0.08,
            target_lerp_speed: 0.12,
            return_lerp_speed: 0.08,
            settle_distance: 0.5,
            default_position: Vec3::new(0.0, 0.0, 72.0),
            default_target: Vec3::ZERO,
        }
    }
}

impl FocusTuning {
    pub fn default_pose(&self) -> CameraPose {
        CameraPose::new(self.default_position, self.default_target)
    }
}

/// Fraction of the gap to close this tick for a per-frame `speed` at `dt_sec`.
///
/// Equals `speed` at exactly one 60 Hz frame. Always in `[0, 1]`; zero for `dt_sec <= 0`.
#[inline]
pub fn ease_factor(speed: f32, dt_sec: f32) -> f32 {
    if dt_sec <= 0.0 || speed <= 0.0 {
        return 0.0;
    }
    let speed = speed.min(1.0);
    (1.0 - (1.0 - speed).powf(dt_sec * REFERENCE_FPS)).clamp(0.0, 1.0)
}

#[derive(Debug, Clone)]
pub struct CameraFocusController {
    tuning: FocusTuning,
    state: FocusState,
}

impl CameraFocusController {
    pub fn new(tuning: FocusTuning) -> Self {
        Self {
            tuning,
            state: FocusState::Idle,
        }
    }

    pub fn state(&self) -> FocusState {
        self.state
    }

    /// Start (or redirect) a focus flight toward `point`.
    ///
    /// Re-selecting the point already being approached only rewrites the stored target.
    pub fn select(&mut self, point: Vec3) {
        self.transition(FocusState::Focusing { target: point });
    }

    /// Drop the selection and fly back to the default pose.
    pub fn clear_selection(&mut self) {
        match self.state {
            FocusState::Focusing { .. } | FocusState::Locked { .. } => {
                self.transition(FocusState::Returning)
            }
            FocusState::Idle | FocusState::Returning => {}
        }
    }

    /// Whether free-orbit drag/zoom input may move the camera this frame.
    pub fn controls_input(&self) -> bool {
        matches!(self.state, FocusState::Idle | FocusState::Locked { .. })
    }

    /// Whether the orbit handle may auto-rotate (only with nothing selected and no flight).
    pub fn auto_rotate_allowed(&self) -> bool {
        matches!(self.state, FocusState::Idle)
    }

    /// Where the camera wants to be while focusing, given the current pose.
    ///
    /// Keeps the camera's bearing from the orbit target and only fixes the standoff distance.
    pub fn focused_position(&self, pose: &CameraPose) -> Vec3 {
        let dir = (pose.position - pose.target).try_normalize().unwrap_or(Vec3::Z);
        pose.target + dir * self.tuning.focus_distance
    }

    /// Advance one frame.
    ///
    /// `pose` is `None` until the orbit handle exists; the step is skipped in that case.
    pub fn update(&mut self, dt_sec: f32, pose: Option<&mut CameraPose>) {
        let Some(pose) = pose else {
            return;
        };

        let t = &self.tuning;

        if let Some(target) = self.state.target() {
            pose.target = pose.target.lerp(target, ease_factor(t.target_lerp_speed, dt_sec));
        }

        match self.state {
            FocusState::Focusing { target } => {
                let desired = self.focused_position(pose);
                pose.position = pose
                    .position
                    .lerp(desired, ease_factor(t.focus_lerp_speed, dt_sec));

                if pose.position.distance(desired) < t.settle_distance {
                    self.transition(FocusState::Locked { target });
                }
            }
            FocusState::Returning => {
                let k = ease_factor(t.return_lerp_speed, dt_sec);
                pose.target = pose.target.lerp(t.default_target, k);
                pose.position = pose.position.lerp(t.default_position, k);

                if pose.position.distance(t.default_position) < t.settle_distance
                    && pose.target.distance(t.default_target) < t.settle_distance
                {
                    self.transition(FocusState::Idle);
                }
            }
            FocusState::Idle | FocusState::Locked { .. } => {}
        }
    }

    fn transition(&mut self, next: FocusState) {
        if std::mem::discriminant(&self.state) != std::mem::discriminant(&next) {
            log::debug!("camera focus: {} -> {}", self.state.name(), next.name());
        }
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const DT: f32 = 1.0 / 60.0;

    fn controller() -> (CameraFocusController, CameraPose) {
        let tuning = FocusTuning::default();
        (CameraFocusController::new(tuning), tuning.default_pose())
    }

    fn run_until<F>(c: &mut CameraFocusController, pose: &mut CameraPose, max_frames: usize, done: F) -> usize
    where
        F: Fn(&CameraFocusController) -> bool,
    {
        for frame in 0..max_frames {
            if done(c) {
                return frame;
            }
            c.update(DT, Some(pose));
        }
        panic!("did not settle within {max_frames} frames (state={:?})", c.state());
    }

    #[test]
    fn ease_factor_matches_speed_at_60hz() {
        assert_relative_eq!(ease_factor(0.08, DT), 0.08, epsilon = 1e-5);
        assert_eq!(ease_factor(0.08, 0.0), 0.0);
        assert_eq!(ease_factor(0.08, -1.0), 0.0);
        assert!(ease_factor(0.08, 10.0) <= 1.0);
        // Two half-frames close the same gap as one full frame.
        let half = ease_factor(0.08, DT / 2.0);
        assert_relative_eq!(1.0 - (1.0 - half) * (1.0 - half), 0.08, epsilon = 1e-5);
    }

    #[test]
    fn select_from_idle_starts_focusing() {
        let (mut c, _) = controller();
        let p = Vec3::new(200.0, 0.0, 0.0);
        c.select(p);
        assert_eq!(c.state(), FocusState::Focusing { target: p });
        assert_eq!(c.state().target(), Some(p));
    }

    #[test]
    fn missing_pose_is_a_no_op() {
        let (mut c, _) = controller();
        c.select(Vec3::X * 200.0);
        c.update(DT, None);
        assert!(matches!(c.state(), FocusState::Focusing { .. }));
    }

    #[test]
    fn focusing_closes_in_monotonically_then_locks() {
        // With the orbit target already on the point, the desired pose is fixed and the
        // camera gap must shrink every frame.
        let (mut c, mut pose) = controller();
        let p = Vec3::new(200.0, 0.0, 0.0);
        pose.target = p;
        c.select(p);

        let mut last = f32::INFINITY;
        let mut frames = 0;
        while matches!(c.state(), FocusState::Focusing { .. }) {
            c.update(DT, Some(&mut pose));
            let gap = pose.position.distance(c.focused_position(&pose));
            assert!(gap < last, "frame {frames}: gap {gap} did not shrink from {last}");
            last = gap;
            frames += 1;
            assert!(frames < 2000, "never locked");
        }

        assert!(matches!(c.state(), FocusState::Locked { .. }));
        assert!(last < 0.5);
    }

    #[test]
    fn locked_stays_locked_and_camera_holds_still() {
        let (mut c, mut pose) = controller();
        c.select(Vec3::new(200.0, 0.0, 0.0));
        run_until(&mut c, &mut pose, 2000, |c| matches!(c.state(), FocusState::Locked { .. }));

        let parked = pose.position;
        for _ in 0..600 {
            c.update(DT, Some(&mut pose));
        }
        assert!(matches!(c.state(), FocusState::Locked { .. }));
        assert_eq!(pose.position, parked);
    }

    #[test]
    fn focus_converges_to_the_standoff_distance() {
        let (mut c, mut pose) = controller();
        let p = Vec3::new(200.0, 0.0, 0.0);
        c.select(p);
        run_until(&mut c, &mut pose, 2000, |c| matches!(c.state(), FocusState::Locked { .. }));

        // Let the orbit target finish its approach.
        for _ in 0..600 {
            c.update(DT, Some(&mut pose));
        }

        assert_relative_eq!(pose.target.distance(p), 0.0, epsilon = 1e-2);
        let dist = pose.position.distance(p);
        assert!(dist > 55.0 && dist < 56.0, "{dist}");

        let start_ray = FocusTuning::default().default_position - p;
        let off_ray = (pose.position - p).angle_between(start_ray).to_degrees();
        assert!(off_ray > 3.0 && off_ray < 8.0, "{off_ray}");
        // The camera stays in the plane it started in and on the near side of the target.
        assert_relative_eq!(pose.position.y, 0.0, epsilon = 1e-4);
        assert!(pose.position.z > 0.0);
        assert!(pose.position.x < p.x);
    }

    #[test]
    fn clear_from_locked_returns_home_then_idles() {
        let (mut c, mut pose) = controller();
        c.select(Vec3::new(200.0, 0.0, 0.0));
        run_until(&mut c, &mut pose, 2000, |c| matches!(c.state(), FocusState::Locked { .. }));

        c.clear_selection();
        assert_eq!(c.state(), FocusState::Returning);
        assert_eq!(c.state().target(), None);

        let home = FocusTuning::default();
        let mut last_pos = pose.position.distance(home.default_position);
        let mut last_tgt = pose.target.distance(home.default_target);
        while c.state() == FocusState::Returning {
            c.update(DT, Some(&mut pose));
            let d_pos = pose.position.distance(home.default_position);
            let d_tgt = pose.target.distance(home.default_target);
            assert!(d_pos < last_pos);
            assert!(d_tgt < last_tgt);
            last_pos = d_pos;
            last_tgt = d_tgt;
        }

        assert_eq!(c.state(), FocusState::Idle);
        assert!(last_pos < 0.5 && last_tgt < 0.5);
    }

    #[test]
    fn idle_leaves_the_pose_alone() {
        let (mut c, mut pose) = controller();
        pose.position = Vec3::new(10.0, 20.0, 30.0);
        let before = pose;
        for _ in 0..10 {
            c.update(DT, Some(&mut pose));
        }
        assert_eq!(pose, before);
    }

    #[test]
    fn reselecting_same_point_keeps_progress() {
        let (mut c, mut pose) = controller();
        let p = Vec3::new(200.0, 0.0, 0.0);
        c.select(p);
        for _ in 0..20 {
            c.update(DT, Some(&mut pose));
        }
        let mid = pose;

        c.select(p);
        assert_eq!(c.state(), FocusState::Focusing { target: p });
        assert_eq!(pose, mid);
    }

    #[test]
    fn select_while_locked_refocuses() {
        let (mut c, mut pose) = controller();
        c.select(Vec3::new(200.0, 0.0, 0.0));
        run_until(&mut c, &mut pose, 2000, |c| matches!(c.state(), FocusState::Locked { .. }));

        let q = Vec3::new(0.0, 0.0, -200.0);
        c.select(q);
        assert_eq!(c.state(), FocusState::Focusing { target: q });
    }

    #[test]
    fn clear_in_idle_is_ignored() {
        let (mut c, _) = controller();
        c.clear_selection();
        assert_eq!(c.state(), FocusState::Idle);
    }

    #[test]
    fn input_ownership_by_state() {
        let (mut c, mut pose) = controller();
        assert!(c.controls_input() && c.auto_rotate_allowed());

        c.select(Vec3::X * 200.0);
        assert!(!c.controls_input() && !c.auto_rotate_allowed());

        run_until(&mut c, &mut pose, 2000, |c| matches!(c.state(), FocusState::Locked { .. }));
        assert!(c.controls_input() && !c.auto_rotate_allowed());

        c.clear_selection();
        assert!(!c.controls_input());
    }

    #[test]
    fn degenerate_bearing_falls_back_to_z() {
        let (c, _) = controller();
        let pose = CameraPose::new(Vec3::ONE, Vec3::ONE);
        assert_eq!(c.focused_position(&pose), Vec3::ONE + Vec3::Z * 55.0);
    }
}
