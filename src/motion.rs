//! The per-frame motion integrator.
//!
//! Each frame the ball's velocity is set by exactly one of three regimes,
//! checked in precedence order: target-seeking, drag-following, idle decay.
//! Attractor gravity is then added on top of whatever the regime produced,
//! the position is integrated, and wall collisions reflect and clamp it back
//! inside the visible frustum. The regime-overwrites-then-gravity-adds
//! ordering is load-bearing: gravity applied before regime selection would be
//! discarded and the dynamics would change materially.

use crate::attractors::AttractorRing;
use crate::proximity::Proximity;
use crate::targets::{TargetQueue, TARGET_TOLERANCE};
use glam::{Vec2, Vec3};
use std::time::{Duration, Instant};

/// Ball radius in world units.
pub const BALL_RADIUS: f32 = 0.5;
/// Constant pursuit speed toward the head target, units per frame.
pub const SEEK_SPEED: f32 = 0.05;
/// Constant speed toward the pointer while dragging, units per frame.
pub const DRAG_SPEED: f32 = 0.01;
/// Attractor pull scale; the applied force is this over the distance.
pub const ATTRACTION_STRENGTH: f32 = 0.0005;
/// Squared speed below which velocity snaps to exactly zero.
pub const VELOCITY_SNAP_EPS: f32 = 1e-8;

/// Near-frictionless decay before any interaction.
pub const INITIAL_SLOW_FACTOR: f32 = 0.99999;
/// Decay after the first click.
pub const CLICK_SLOW_FACTOR: f32 = 0.99;
/// Decay after the rest check fires away from every attractor.
pub const REST_SLOW_FACTOR: f32 = 0.95;
/// Wall-clock delay before the rest check fires.
pub const REST_CHECK_DELAY: Duration = Duration::from_millis(500);

/// The ball: position pinned to the z=0 plane, velocity applied per frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ball {
    pub position: Vec3,
    pub velocity: Vec3,
    pub radius: f32,
}

impl Ball {
    pub fn new() -> Self {
        Self {
            position: Vec3::ZERO,
            // Initial slow drift so the demo moves before any input.
            velocity: Vec3::new(0.04, 0.0, 0.0),
            radius: BALL_RADIUS,
        }
    }
}

impl Default for Ball {
    fn default() -> Self {
        Self::new()
    }
}

/// Where the idle rest check currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecayStage {
    /// No check pending; a click is needed to arm one.
    Disarmed,
    /// A click armed the check; the next idle frame schedules it.
    Armed,
    /// Deadline set; fires once it passes.
    Scheduled(Instant),
}

/// Staged idle deceleration.
///
/// The slow factor starts near-frictionless, tightens on the first click of
/// an interaction, and tightens again when the rest check fires with the ball
/// away from every attractor. Enqueuing a target never changes it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decay {
    pub slow_factor: f32,
    stage: DecayStage,
}

impl Decay {
    pub fn new() -> Self {
        Self {
            slow_factor: INITIAL_SLOW_FACTOR,
            stage: DecayStage::Disarmed,
        }
    }

    /// A primary click arms the rest check and tightens the slow factor.
    pub fn on_click(&mut self) {
        if self.stage == DecayStage::Disarmed {
            self.slow_factor = CLICK_SLOW_FACTOR;
            self.stage = DecayStage::Armed;
        }
    }

    /// Schedule the rest check once per idle period.
    fn schedule(&mut self, now: Instant) {
        if self.stage == DecayStage::Armed {
            self.stage = DecayStage::Scheduled(now + REST_CHECK_DELAY);
        }
    }

    /// Fire the rest check if its deadline has passed.
    ///
    /// The deadline fires regardless of what arrived in the queue meanwhile;
    /// only proximity gates the tighter factor.
    fn run(&mut self, now: Instant, proximity: Proximity) {
        if let DecayStage::Scheduled(deadline) = self.stage {
            if now >= deadline {
                if proximity == Proximity::None {
                    self.slow_factor = REST_SLOW_FACTOR;
                    log::info!("ball at rest, slow factor -> {}", REST_SLOW_FACTOR);
                }
                self.stage = DecayStage::Disarmed;
            }
        }
    }

    pub fn stage(&self) -> DecayStage {
        self.stage
    }
}

impl Default for Decay {
    fn default() -> Self {
        Self::new()
    }
}

/// Advance the ball by one frame.
///
/// `drag_point` is the pointer's ground-plane position while a drag is
/// active, `frustum` the current visible extent of the plane. After this
/// returns, the ball's center lies inside the frustum bounds inset by its
/// radius on both axes.
pub fn integrate(
    ball: &mut Ball,
    targets: &mut TargetQueue,
    attractors: &AttractorRing,
    decay: &mut Decay,
    drag_point: Option<Vec3>,
    proximity: Proximity,
    frustum: Vec2,
    now: Instant,
) {
    // Velocity regime, exactly one per frame.
    if let Some(head) = targets.peek() {
        let dist = ball.position.distance(head.position);
        if dist <= TARGET_TOLERANCE {
            targets.dequeue();
        } else {
            ball.velocity = (head.position - ball.position).normalize() * SEEK_SPEED;
        }
    } else if let Some(point) = drag_point {
        // Pointer exactly on the ball gives no direction; keep the current
        // velocity for that frame.
        if let Some(dir) = (point - ball.position).try_normalize() {
            ball.velocity = dir * DRAG_SPEED;
        }
    } else {
        decay.schedule(now);
        ball.velocity *= decay.slow_factor;
    }

    decay.run(now, proximity);

    // Attractor gravity, summed at the pre-update ball position.
    let origin = ball.position;
    for attractor in attractors.iter() {
        let dist = origin.distance(attractor.position);
        if dist > f32::EPSILON {
            ball.velocity +=
                (attractor.position - origin).normalize() * (ATTRACTION_STRENGTH / dist);
        }
    }

    ball.position += ball.velocity;

    // Wall reflection with clamping, per axis.
    let half = frustum * 0.5;
    if ball.position.x + ball.radius > half.x || ball.position.x - ball.radius < -half.x {
        ball.velocity.x = -ball.velocity.x;
    }
    if ball.position.y + ball.radius > half.y || ball.position.y - ball.radius < -half.y {
        ball.velocity.y = -ball.velocity.y;
    }
    ball.position.x = ball
        .position
        .x
        .max(-half.x + ball.radius)
        .min(half.x - ball.radius);
    ball.position.y = ball
        .position
        .y
        .max(-half.y + ball.radius)
        .min(half.y - ball.radius);

    if ball.velocity.length_squared() < VELOCITY_SNAP_EPS {
        ball.velocity = Vec3::ZERO;
    }
}
