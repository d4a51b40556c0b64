//! The course galaxy scene: every field, the camera rig and the selection store.

use std::f32::consts::TAU;

use glam::{Vec2, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::engine::animation_loop::FrameClock;
use crate::engine::camera::Camera;
use crate::engine::config::{Tuning, parse_hex_color};
use crate::engine::fields::{
    FieldAnimation, FieldKind, ParticleField, ShimmerParams, fibonacci_sphere, shell, spiral_galaxy,
};
use crate::engine::focus::{CameraFocusController, CameraPose, OrbitControls};
use crate::engine::graphics::{FieldDraw, FieldHandle, FieldUploader, VisualWorld};
use crate::engine::picking::{PickTarget, pick_nearest};
use crate::engine::shooting_stars::ShootingStars;
use crate::engine::store::Store;
use crate::engine::user_input::InputState;
use crate::engine::{EngineError, EngineResult};

/// Colour multiplier for the sphere under the cursor.
const HOVER_TINT: f32 = 1.3;

const STREAK_COLOR: Vec3 = Vec3::ONE;

/// A clickable course sphere.
#[derive(Debug, Clone, PartialEq)]
pub struct Course {
    pub label: String,
    pub center: Vec3,
    pub pick_radius: f32,
}

/// One placed field plus its GPU handle once uploaded.
#[derive(Debug, Clone)]
pub struct SceneField {
    pub points: ParticleField,
    pub origin: Vec3,
    pub animation: FieldAnimation,
    pub shimmer: ShimmerParams,
    /// Index into [`Universe::courses`] for clickable spheres.
    pub course: Option<usize>,
    handle: Option<FieldHandle>,
}

impl SceneField {
    fn new(points: ParticleField, origin: Vec3, course: Option<usize>) -> Self {
        let kind = points.kind;
        Self {
            points,
            origin,
            animation: FieldAnimation::for_kind(kind),
            shimmer: ShimmerParams::for_kind(kind),
            course,
            handle: None,
        }
    }
}

/// Centre of ring slot `i` of `count`, evenly spaced on the XZ plane.
pub fn ring_position(i: usize, count: usize, radius: f32) -> Vec3 {
    let a = i as f32 / count.max(1) as f32 * TAU;
    Vec3::new(a.cos() * radius, 0.0, a.sin() * radius)
}

/// Generate a single field of `kind` from `tuning`. Spheres take the first course colour.
pub fn generate_field(tuning: &Tuning, kind: FieldKind, rng: &mut impl Rng) -> EngineResult<ParticleField> {
    Ok(match kind {
        FieldKind::Starfield => shell(&tuning.starfield, rng),
        FieldKind::Sphere => {
            let entry = tuning.courses.ring.first().unwrap_or(&tuning.courses.center);
            let color = parse_hex_color(&entry.color)?;
            fibonacci_sphere(&tuning.sphere_params(color), rng)
        }
        FieldKind::Galaxy => spiral_galaxy(&tuning.galaxy.params()?, rng),
    })
}

/// Scene RNG: fixed when a seed is configured, OS-seeded otherwise.
pub fn scene_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

pub struct Universe {
    tuning: Tuning,
    rng: StdRng,
    camera: Camera,

    fields: Vec<SceneField>,
    courses: Vec<Course>,

    /// Free-orbit handle; absent until a viewport is attached.
    orbit: Option<OrbitControls>,
    focus: CameraFocusController,
    shooting_stars: ShootingStars,
    selection: Store<Option<String>>,

    hovered: Option<usize>,
    viewport: Vec2,
    clock: FrameClock,
}

impl Universe {
    /// Build every field up front. Fails only on malformed colours in `tuning`.
    pub fn new(tuning: Tuning) -> EngineResult<Self> {
        let mut rng = scene_rng(tuning.seed);
        let scene = &tuning.scene;

        let mut fields = Vec::new();
        let mut courses = Vec::new();

        fields.push(SceneField::new(shell(&tuning.starfield, &mut rng), Vec3::ZERO, None));

        let ring_count = tuning.courses.ring.len();
        for (i, entry) in tuning.courses.ring.iter().enumerate() {
            let center = ring_position(i, ring_count, scene.ring_radius);
            let color = parse_hex_color(&entry.color)?;
            let points = fibonacci_sphere(&tuning.sphere_params(color), &mut rng);

            fields.push(SceneField::new(points, center, Some(courses.len())));
            courses.push(Course {
                label: entry.label.clone(),
                center,
                pick_radius: scene.sphere_radius * scene.pick_radius_scale,
            });
        }

        let center_entry = &tuning.courses.center;
        let color = parse_hex_color(&center_entry.color)?;
        let points = fibonacci_sphere(&tuning.center_params(color), &mut rng);
        fields.push(SceneField::new(points, Vec3::ZERO, Some(courses.len())));
        courses.push(Course {
            label: center_entry.label.clone(),
            center: Vec3::ZERO,
            pick_radius: scene.center_radius * scene.pick_radius_scale,
        });

        let galaxy = spiral_galaxy(&tuning.galaxy.params()?, &mut rng);
        fields.push(SceneField::new(galaxy, Vec3::new(0.0, tuning.galaxy.y, 0.0), None));

        let total: usize = fields.iter().map(|f| f.points.len()).sum();
        log::info!("scene built: {} fields, {} courses, {total} particles", fields.len(), courses.len());

        Ok(Self {
            focus: CameraFocusController::new(tuning.camera),
            shooting_stars: ShootingStars::new(tuning.shooting_stars),
            tuning,
            rng,
            camera: Camera::default(),
            fields,
            courses,
            orbit: None,
            selection: Store::new(None),
            hovered: None,
            viewport: Vec2::ZERO,
            clock: FrameClock::new(),
        })
    }

    /// Upload every field that has no handle yet. Empty fields stay unuploaded and are never drawn.
    pub fn upload_fields(&mut self, uploader: &mut impl FieldUploader) -> EngineResult<()> {
        for field in self.fields.iter_mut().filter(|f| f.handle.is_none()) {
            if field.points.is_empty() {
                log::debug!("skipping empty {:?} field", field.points.kind);
                continue;
            }
            field.handle = Some(uploader.upload_field(&field.points).map_err(EngineError::render)?);
        }
        Ok(())
    }

    /// Record the output size; the first call brings up the orbit handle.
    pub fn attach_viewport(&mut self, size: Vec2) {
        self.viewport = size;
        if self.orbit.is_none() {
            self.orbit = Some(OrbitControls::new(self.tuning.camera.default_pose(), self.tuning.orbit));
        }
    }

    /// Current camera pose (the default pose until the orbit handle exists).
    pub fn pose(&self) -> CameraPose {
        self.orbit
            .as_ref()
            .map(|o| *o.pose())
            .unwrap_or_else(|| self.tuning.camera.default_pose())
    }

    pub fn hovered_course(&self) -> Option<&Course> {
        self.hovered.and_then(|i| self.courses.get(i))
    }

    pub fn selection_mut(&mut self) -> &mut Store<Option<String>> {
        &mut self.selection
    }

    /// Advance by the wall-clock time since the previous tick.
    pub fn tick(&mut self, input: &InputState) {
        let dt = self.clock.wall_delta();
        self.update(dt, input);
    }

    /// One frame of `dt_sec` (clamped like a real frame): orbit input, picking, focus
    /// easing, meteors.
    pub fn update(&mut self, dt_sec: f32, input: &InputState) {
        let dt_sec = self.clock.advance(dt_sec);

        if let Some(orbit) = self.orbit.as_mut() {
            let drag = input.left_drag();
            if self.focus.controls_input() {
                if drag != Vec2::ZERO {
                    orbit.rotate(drag.x, drag.y);
                }
                orbit.zoom(input.wheel_delta);
            }
            if self.focus.auto_rotate_allowed() && drag == Vec2::ZERO {
                orbit.auto_rotate(dt_sec);
            }
        }

        self.update_picking(input);

        self.focus.update(dt_sec, self.orbit.as_mut().map(|o| o.pose_mut()));
        self.shooting_stars.update(dt_sec, &mut self.rng);
    }

    fn pick_at(&self, cursor: Vec2) -> Option<usize> {
        let ray = self.camera.screen_ray(cursor, self.viewport, &self.pose());
        let targets: Vec<PickTarget> = self
            .courses
            .iter()
            .map(|c| PickTarget {
                center: c.center,
                radius: c.pick_radius,
            })
            .collect();
        pick_nearest(&ray, &targets)
    }

    fn update_picking(&mut self, input: &InputState) {
        if self.orbit.is_none() || self.viewport.min_element() <= 0.0 {
            self.hovered = None;
            return;
        }

        self.hovered = input.cursor_pos.and_then(|pos| self.pick_at(pos));

        let Some(click) = input.left_click() else {
            return;
        };

        match self.pick_at(click) {
            Some(i) => {
                let course = &self.courses[i];
                self.focus.select(course.center);
                if self.selection.replace_if_changed(Some(course.label.clone())) {
                    log::info!("selected {:?}", course.label);
                }
            }
            None => {
                self.focus.clear_selection();
                if self.selection.replace_if_changed(None) {
                    log::info!("selection cleared");
                }
            }
        }
    }

    /// Rebuild the draw list for this frame.
    pub fn sync_visuals(&self, visuals: &mut VisualWorld) {
        visuals.clear();

        let size = if visuals.viewport().min_element() > 0.0 {
            visuals.viewport()
        } else {
            self.viewport
        };
        let aspect = if size.y > 0.0 { size.x / size.y } else { 1.0 };
        let pose = self.pose();
        visuals.set_camera(self.camera.view(&pose), self.camera.projection(aspect));
        let elapsed = self.clock.elapsed();
        visuals.set_time(elapsed);

        let hovered = self.hovered;
        for field in &self.fields {
            let Some(handle) = field.handle else {
                continue;
            };
            let lit = hovered.is_some() && field.course == hovered;
            visuals.push_field(FieldDraw {
                handle,
                model: field.animation.model(field.origin, elapsed),
                shimmer: field.shimmer,
                tint: if lit { Vec3::splat(HOVER_TINT) } else { Vec3::ONE },
                alpha: 1.0,
            });
        }

        let head_size = self.shooting_stars.params().head_size;
        for streak in self.shooting_stars.streaks() {
            visuals.push_streak(streak.tail, streak.head, STREAK_COLOR, head_size);
        }
    }
}
