//! Ripple field state and shader uniforms.
//!
//! The background is a full-frame procedural wave pattern driven entirely by
//! the ball's position, velocity direction and the simulation time; it has no
//! persistence of its own. The one exception is the click pulse: a decaying
//! circular wavefront centered on the most recent click, alive for exactly
//! one simulated time unit. A new click overwrites the previous pulse, so at
//! most one is ever in flight.

use crate::motion::Ball;
use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

/// Lifetime of the click pulse in simulation-time units.
pub const CLICK_PULSE_DURATION: f32 = 1.0;

/// CPU-side ripple state carried between frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RippleState {
    active: bool,
    /// Pulse center in [0,1] UV across the frustum.
    position: Vec2,
    start_time: f32,
    click_hue: f32,
}

impl RippleState {
    pub fn new() -> Self {
        Self {
            active: false,
            position: Vec2::new(0.5, 0.5),
            start_time: 0.0,
            click_hue: 0.0,
        }
    }

    /// Start (or restart) the click pulse at a ground-plane position.
    ///
    /// The world point is mapped across the current frustum extent into
    /// [0,1] UV so the pulse lands where the click did regardless of
    /// viewport size.
    pub fn trigger(&mut self, world: Vec3, frustum: Vec2, time: f32, hue: f32) {
        self.position = Vec2::new(
            (world.x + frustum.x / 2.0) / frustum.x,
            (world.y + frustum.y / 2.0) / frustum.y,
        );
        self.start_time = time;
        self.click_hue = hue;
        self.active = true;
    }

    /// Retire the pulse once it has outlived its duration.
    pub fn expire(&mut self, time: f32) {
        if self.active && time - self.start_time > CLICK_PULSE_DURATION {
            self.active = false;
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    #[inline]
    pub fn start_time(&self) -> f32 {
        self.start_time
    }

    #[inline]
    pub fn click_hue(&self) -> f32 {
        self.click_hue
    }

    /// Pack the full ripple uniform block for the current frame.
    pub fn uniforms(&self, ball: &Ball, time: f32, frustum: Vec2) -> RippleUniforms {
        let dir = ball.velocity.try_normalize().unwrap_or(Vec3::X);
        RippleUniforms {
            ball_position: [ball.position.x, ball.position.y],
            ball_velocity_dir: [dir.x, dir.y],
            debug_pos: self.position.into(),
            frustum: frustum.into(),
            time,
            debug_start_time: self.start_time,
            click_hue: self.click_hue,
            debug_active: self.active as u32,
        }
    }
}

impl Default for RippleState {
    fn default() -> Self {
        Self::new()
    }
}

/// Uniform block for the ripple pass. Layout matches the WGSL struct.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct RippleUniforms {
    pub ball_position: [f32; 2],
    pub ball_velocity_dir: [f32; 2],
    pub debug_pos: [f32; 2],
    pub frustum: [f32; 2],
    pub time: f32,
    pub debug_start_time: f32,
    pub click_hue: f32,
    pub debug_active: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRUSTUM: Vec2 = Vec2::new(20.0, 10.0);

    #[test]
    fn test_center_click_maps_to_uv_center() {
        let mut ripple = RippleState::new();
        ripple.trigger(Vec3::ZERO, FRUSTUM, 1.0, 0.5);
        assert_eq!(ripple.position(), Vec2::new(0.5, 0.5));
    }

    #[test]
    fn test_corner_click_maps_to_uv_corner() {
        let mut ripple = RippleState::new();
        ripple.trigger(Vec3::new(10.0, -5.0, 0.0), FRUSTUM, 1.0, 0.5);
        assert_eq!(ripple.position(), Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_pulse_lifetime_window() {
        let mut ripple = RippleState::new();
        ripple.trigger(Vec3::ZERO, FRUSTUM, 2.0, 0.5);

        ripple.expire(2.0);
        assert!(ripple.is_active());
        ripple.expire(2.99);
        assert!(ripple.is_active());
        ripple.expire(3.01);
        assert!(!ripple.is_active());
    }

    #[test]
    fn test_second_click_discards_first_pulse() {
        let mut ripple = RippleState::new();
        ripple.trigger(Vec3::ZERO, FRUSTUM, 2.0, 0.25);
        ripple.trigger(Vec3::new(1.0, 1.0, 0.0), FRUSTUM, 2.5, 0.75);

        assert_eq!(ripple.start_time(), 2.5);
        assert_eq!(ripple.click_hue(), 0.75);
        // The reset start time extends the pulse past the first one's expiry.
        ripple.expire(3.2);
        assert!(ripple.is_active());
        ripple.expire(3.6);
        assert!(!ripple.is_active());
    }

    #[test]
    fn test_uniforms_fall_back_to_x_direction_when_stationary() {
        let ripple = RippleState::new();
        let mut ball = Ball::new();
        ball.velocity = Vec3::ZERO;
        let uniforms = ripple.uniforms(&ball, 0.0, FRUSTUM);
        assert_eq!(uniforms.ball_velocity_dir, [1.0, 0.0]);
    }

    #[test]
    fn test_uniform_block_size_is_16_aligned() {
        assert_eq!(std::mem::size_of::<RippleUniforms>() % 16, 0);
    }
}
