//! The simulation context.
//!
//! `Scene` owns every piece of simulation state (clock, cameras, ball,
//! target queue, attractor ring, decay staging, pointer state, ripple state,
//! material cycle) and exposes the per-frame `step` plus the event
//! entry points the window driver wires up. Nothing here touches the GPU;
//! the whole struct is driveable from tests.

use crate::attractors::{random_position, AttractorRing, DEFAULT_MAX_ATTRACTORS};
use crate::camera::{OrbitEye, SceneCamera};
use crate::clock::FrameClock;
use crate::input::MouseButton;
use crate::materials::{ball_hue, hsl_to_rgb, MaterialSet};
use crate::motion::{integrate, Ball, Decay};
use crate::proximity::{classify, Proximity};
use crate::ripple::{RippleState, RippleUniforms};
use crate::targets::TargetQueue;
use glam::{Vec2, Vec3};
use std::time::Instant;

/// Raw-unprojected distance from the press point beyond which a press
/// becomes a drag.
pub const MOVE_TOLERANCE: f32 = 0.01;

/// Pointer interaction phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Idle,
    Pressed,
    Dragging,
}

/// All simulation state for one demo instance.
pub struct Scene {
    pub clock: FrameClock,
    pub camera: SceneCamera,
    pub secondary: OrbitEye,
    pub ball: Ball,
    pub targets: TargetQueue,
    pub attractors: AttractorRing,
    pub decay: Decay,
    pub ripple: RippleState,
    pub materials: MaterialSet,
    proximity: Proximity,
    last_proximity: Proximity,
    pointer: PointerPhase,
    press_anchor: Option<Vec3>,
    pointer_plane: Option<Vec3>,
    reflection_enabled: bool,
    preview_enabled: bool,
}

impl Scene {
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_attractor_capacity(width, height, DEFAULT_MAX_ATTRACTORS)
    }

    pub fn with_attractor_capacity(width: u32, height: u32, capacity: usize) -> Self {
        Self {
            clock: FrameClock::new(),
            camera: SceneCamera::new(width, height),
            secondary: OrbitEye::new(width, height),
            ball: Ball::new(),
            targets: TargetQueue::new(),
            attractors: AttractorRing::new(capacity),
            decay: Decay::new(),
            ripple: RippleState::new(),
            materials: MaterialSet::new(),
            proximity: Proximity::None,
            last_proximity: Proximity::None,
            pointer: PointerPhase::Idle,
            press_anchor: None,
            pointer_plane: None,
            reflection_enabled: false,
            preview_enabled: false,
        }
    }

    // ========== Per-frame pipeline ==========

    /// Run one frame of the simulation.
    pub fn step(&mut self, now: Instant) {
        let time = self.clock.tick();

        self.proximity = classify(self.ball.position, self.ball.radius, &self.attractors);
        if self.proximity != self.last_proximity {
            log::info!("proximity changed to {:?}", self.proximity);
        }
        self.last_proximity = self.proximity;

        let drag_point = if self.pointer == PointerPhase::Dragging {
            self.pointer_plane
        } else {
            None
        };
        integrate(
            &mut self.ball,
            &mut self.targets,
            &self.attractors,
            &mut self.decay,
            drag_point,
            self.proximity,
            self.camera.frustum_size(),
            now,
        );

        self.attractors.rotate_all();
        self.ripple.expire(time);
    }

    /// Current simulation time.
    #[inline]
    pub fn time(&self) -> f32 {
        self.clock.time()
    }

    #[inline]
    pub fn proximity(&self) -> Proximity {
        self.proximity
    }

    #[inline]
    pub fn pointer_phase(&self) -> PointerPhase {
        self.pointer
    }

    #[inline]
    pub fn reflection_enabled(&self) -> bool {
        self.reflection_enabled
    }

    #[inline]
    pub fn preview_enabled(&self) -> bool {
        self.preview_enabled
    }

    /// The ball's hue-cycled color for this frame.
    pub fn ball_color(&self) -> Vec3 {
        hsl_to_rgb(ball_hue(self.time()), 1.0, 0.5)
    }

    /// Uniform block for the ripple pass.
    pub fn ripple_uniforms(&self) -> RippleUniforms {
        self.ripple
            .uniforms(&self.ball, self.time(), self.camera.frustum_size())
    }

    // ========== Pointer events ==========

    /// Primary button went down: remember the press anchor for drag
    /// thresholding.
    pub fn pointer_down(&mut self, button: MouseButton, ndc: Vec2) {
        if button != MouseButton::Left {
            return;
        }
        if let Some(hit) = self.camera.plane_hit(ndc) {
            self.press_anchor = Some(hit.raw);
            self.pointer_plane = Some(hit.plane);
            self.pointer = PointerPhase::Pressed;
        }
    }

    /// Pointer moved: refresh the drag destination and promote a press to a
    /// drag once it leaves the tolerance radius.
    pub fn pointer_moved(&mut self, ndc: Vec2) {
        let Some(anchor) = self.press_anchor else {
            return;
        };
        let Some(hit) = self.camera.plane_hit(ndc) else {
            return;
        };
        self.pointer_plane = Some(hit.plane);
        if hit.raw.distance(anchor) > MOVE_TOLERANCE {
            self.pointer = PointerPhase::Dragging;
        }
    }

    /// Button released. A primary release that never became a drag is a
    /// click: it pulses the ripple and queues a target.
    pub fn pointer_up(&mut self, button: MouseButton, ndc: Vec2) {
        let was_drag = self.pointer == PointerPhase::Dragging;
        self.press_anchor = None;
        self.pointer_plane = None;
        self.pointer = PointerPhase::Idle;

        if button != MouseButton::Left || was_drag {
            return;
        }
        self.click(ndc);
    }

    /// Pointer left the surface: the drag ends but the press anchor
    /// survives, so re-entering can resume it.
    pub fn pointer_out(&mut self) {
        if self.pointer == PointerPhase::Dragging {
            self.pointer = PointerPhase::Pressed;
        }
    }

    /// Secondary-button click: place an attractor at the pointer.
    pub fn right_click(&mut self, ndc: Vec2) {
        if let Some(hit) = self.camera.plane_hit(ndc) {
            self.add_attractor(Some(hit.plane));
        }
    }

    fn click(&mut self, ndc: Vec2) {
        let Some(hit) = self.camera.plane_hit(ndc) else {
            return;
        };
        self.decay.on_click();
        self.ripple.trigger(
            hit.plane,
            self.camera.frustum_size(),
            self.time(),
            rand::random::<f32>(),
        );
        self.targets.enqueue(hit.plane, rand::random::<f32>());
    }

    // ========== UI action hooks ==========

    /// Cycle the ball's material.
    pub fn switch_material(&mut self) {
        self.materials.advance(self.reflection_enabled);
    }

    /// Place an attractor, at a given point or somewhere random in view.
    /// Placement pulses the ripple like a click does.
    pub fn add_attractor(&mut self, position: Option<Vec3>) {
        let frustum = self.camera.frustum_size();
        let pos =
            position.unwrap_or_else(|| random_position(frustum, &mut rand::thread_rng()));
        self.ripple
            .trigger(pos, frustum, self.time(), rand::random::<f32>());
        self.attractors.add(pos);
    }

    /// Toggle the secondary camera and the environment map it feeds.
    pub fn toggle_reflection(&mut self) {
        self.reflection_enabled = !self.reflection_enabled;
        if !self.reflection_enabled {
            self.materials.on_reflection_disabled();
        }
    }

    /// Toggle the picture-in-picture preview pane. Only drawn while the
    /// secondary camera is enabled.
    pub fn toggle_preview(&mut self) {
        self.preview_enabled = !self.preview_enabled;
    }

    // ========== Resize ==========

    /// Viewport changed: update camera aspects and invalidate queued targets,
    /// which were placed against the old frustum geometry.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.targets.clear();
        self.camera.set_viewport(width, height);
        self.secondary.set_viewport(width, height);
        log::debug!("viewport resized to {}x{}", width, height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::CLICK_SLOW_FACTOR;

    fn scene() -> Scene {
        let mut scene = Scene::new(800, 600);
        scene.clock.start();
        scene
    }

    #[test]
    fn test_click_enqueues_target_and_pulses_ripple() {
        let mut scene = scene();
        scene.pointer_down(MouseButton::Left, Vec2::ZERO);
        scene.pointer_up(MouseButton::Left, Vec2::ZERO);

        assert_eq!(scene.targets.len(), 1);
        assert!(scene.ripple.is_active());
        assert_eq!(scene.decay.slow_factor, CLICK_SLOW_FACTOR);
        // Click at screen center lands on the plane origin.
        assert!(scene.targets.peek().unwrap().position.length() < 1e-3);
    }

    #[test]
    fn test_drag_release_does_not_enqueue() {
        let mut scene = scene();
        scene.pointer_down(MouseButton::Left, Vec2::ZERO);
        scene.pointer_moved(Vec2::new(0.5, 0.5));
        assert_eq!(scene.pointer_phase(), PointerPhase::Dragging);

        scene.pointer_up(MouseButton::Left, Vec2::new(0.5, 0.5));
        assert!(scene.targets.is_empty());
        assert_eq!(scene.pointer_phase(), PointerPhase::Idle);
    }

    #[test]
    fn test_small_motion_stays_a_click() {
        let mut scene = scene();
        scene.pointer_down(MouseButton::Left, Vec2::ZERO);
        scene.pointer_moved(Vec2::new(1e-4, 0.0));
        assert_eq!(scene.pointer_phase(), PointerPhase::Pressed);

        scene.pointer_up(MouseButton::Left, Vec2::new(1e-4, 0.0));
        assert_eq!(scene.targets.len(), 1);
    }

    #[test]
    fn test_pointer_out_pauses_drag_but_keeps_anchor() {
        let mut scene = scene();
        scene.pointer_down(MouseButton::Left, Vec2::ZERO);
        scene.pointer_moved(Vec2::new(0.5, 0.0));
        scene.pointer_out();
        assert_eq!(scene.pointer_phase(), PointerPhase::Pressed);

        scene.pointer_moved(Vec2::new(0.6, 0.0));
        assert_eq!(scene.pointer_phase(), PointerPhase::Dragging);
    }

    #[test]
    fn test_right_click_places_attractor_not_target() {
        let mut scene = scene();
        scene.right_click(Vec2::new(0.3, 0.3));

        assert_eq!(scene.attractors.len(), 1);
        assert!(scene.targets.is_empty());
        assert!(scene.ripple.is_active());
    }

    #[test]
    fn test_add_attractor_without_position_lands_in_view() {
        let mut scene = scene();
        scene.add_attractor(None);
        let half = scene.camera.frustum_size() * 0.5;
        let p = scene.attractors.get(0).unwrap().position;
        assert!(p.x.abs() <= half.x);
        assert!(p.y.abs() <= half.y);
    }

    #[test]
    fn test_resize_clears_targets_and_updates_frustum() {
        let mut scene = scene();
        scene.pointer_down(MouseButton::Left, Vec2::ZERO);
        scene.pointer_up(MouseButton::Left, Vec2::ZERO);
        assert_eq!(scene.targets.len(), 1);

        let before = scene.camera.frustum_size();
        scene.resize(400, 600);
        assert!(scene.targets.is_empty());
        let after = scene.camera.frustum_size();
        assert_eq!(after.y, before.y);
        assert!((after.x - after.y * (400.0 / 600.0)).abs() < 1e-4);
    }

    #[test]
    fn test_step_advances_ball_with_initial_drift() {
        let mut scene = scene();
        let x0 = scene.ball.position.x;
        scene.step(Instant::now());
        assert!(scene.ball.position.x > x0);
    }

    #[test]
    fn test_step_spins_attractors() {
        let mut scene = scene();
        scene.add_attractor(Some(Vec3::new(3.0, 0.0, 0.0)));
        scene.step(Instant::now());
        scene.step(Instant::now());
        assert!(scene.attractors.get(0).unwrap().rotation > 0.0);
    }

    #[test]
    fn test_toggle_reflection_falls_back_material() {
        let mut scene = scene();
        scene.toggle_reflection();
        scene.switch_material();
        scene.switch_material();
        scene.switch_material();
        assert_eq!(scene.materials.index(), 3);

        scene.toggle_reflection();
        assert!(!scene.reflection_enabled());
        assert_ne!(scene.materials.index(), 3);
    }
}
