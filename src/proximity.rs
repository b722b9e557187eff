//! Ball-to-attractor proximity classification.
//!
//! Every frame the ball's distance to each attractor is folded into one
//! coarse state. The only downstream consumer is the idle-decay gate, which
//! distinguishes `None` from everything else; the finer bands exist for
//! logging.

use crate::attractors::AttractorRing;
use glam::Vec3;

/// Distance band beyond the combined radii that still counts as proximal.
pub const EFFECT_RADIUS: f32 = 2.0;

/// Coarse ball-to-attractor distance classification.
///
/// The discriminants mirror the band order used when folding states across
/// attractors: an overlap wins immediately, otherwise the numeric maximum of
/// the per-attractor bands is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Proximity {
    #[default]
    None = 0,
    Overlapping = 1,
    WithinBallRadius = 2,
    WithinEffectRadius = 3,
}

/// Classify the ball against every attractor in the ring.
pub fn classify(ball_position: Vec3, ball_radius: f32, attractors: &AttractorRing) -> Proximity {
    let mut state = Proximity::None;
    for attractor in attractors.iter() {
        let dist = ball_position.distance(attractor.position);
        let combined = attractor.bounding_radius + ball_radius;

        if dist < combined {
            return Proximity::Overlapping;
        } else if dist < combined + ball_radius {
            state = state.max(Proximity::WithinBallRadius);
        } else if dist < combined + EFFECT_RADIUS {
            state = state.max(Proximity::WithinEffectRadius);
        }
    }
    state
}
