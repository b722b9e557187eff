//! Gravity-well attractors.
//!
//! Attractors are a small bounded collection of objects that pull the ball
//! with an inverse-distance force and spin idly for visual feedback. The
//! collection is an explicit fixed-capacity ring buffer: once full, each new
//! placement overwrites the oldest slot instead of allocating. Attractors are
//! never individually deleted.

use glam::{Vec2, Vec3};
use rand::Rng;

/// Circumscribed radius of the attractor's dodecahedron.
pub const ATTRACTOR_RADIUS: f32 = 0.3;
/// Default ring capacity.
pub const DEFAULT_MAX_ATTRACTORS: usize = 1;
/// Idle spin applied around +y, radians per frame.
pub const ATTRACTOR_SPIN_STEP: f32 = 0.01;

/// One gravity well.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attractor {
    pub position: Vec3,
    pub bounding_radius: f32,
    pub rotation: f32,
}

impl Attractor {
    fn new(position: Vec3) -> Self {
        Self {
            position,
            bounding_radius: ATTRACTOR_RADIUS,
            rotation: 0.0,
        }
    }
}

/// Fixed-capacity ring buffer of attractors.
#[derive(Debug)]
pub struct AttractorRing {
    slots: Vec<Attractor>,
    capacity: usize,
    total_added: u64,
}

impl AttractorRing {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity.max(1)),
            capacity: capacity.max(1),
            total_added: 0,
        }
    }

    /// Place an attractor, overwriting the oldest slot once the ring is full.
    ///
    /// Returns the slot index that received the position.
    pub fn add(&mut self, position: Vec3) -> usize {
        let index = (self.total_added % self.capacity as u64) as usize;
        if self.slots.len() < self.capacity {
            self.slots.push(Attractor::new(position));
        } else {
            // Overwrite keeps the slot's accumulated rotation, like moving
            // the existing object rather than replacing it.
            self.slots[index].position = position;
        }
        self.total_added += 1;
        index
    }

    pub fn iter(&self) -> impl Iterator<Item = &Attractor> {
        self.slots.iter()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn get(&self, index: usize) -> Option<&Attractor> {
        self.slots.get(index)
    }

    /// Advance every attractor's idle spin by one frame.
    pub fn rotate_all(&mut self) {
        for attractor in &mut self.slots {
            attractor.rotation += ATTRACTOR_SPIN_STEP;
        }
    }
}

/// Sample a placement position inside the visible frustum, leaving a one-unit
/// margin on each dimension.
pub fn random_position(frustum: Vec2, rng: &mut impl Rng) -> Vec3 {
    let span_x = (frustum.x - 1.0).max(0.0);
    let span_y = (frustum.y - 1.0).max(0.0);
    Vec3::new(
        (rng.gen::<f32>() - 0.5) * span_x,
        (rng.gen::<f32>() - 0.5) * span_y,
        0.0,
    )
}
