//! Click-target queue.
//!
//! Primary clicks enqueue destination points the ball chases in strict
//! arrival order. Only the head target influences motion; the rest are inert
//! until they reach the head. There is no priority and no de-duplication:
//! rapid clicking simply queues more stops.

use glam::Vec3;
use std::collections::VecDeque;

/// Distance at which the head target counts as reached and is dequeued.
pub const TARGET_TOLERANCE: f32 = 0.5;

/// A queued destination with the ripple hue assigned at click time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Target {
    pub position: Vec3,
    pub hue: f32,
}

/// FIFO queue of click targets.
///
/// Cleared wholesale on viewport resize; queued points are tied to the old
/// frustum geometry and must not persist across it.
#[derive(Debug, Default)]
pub struct TargetQueue {
    queue: VecDeque<Target>,
}

impl TargetQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a destination to the tail.
    pub fn enqueue(&mut self, position: Vec3, hue: f32) {
        self.queue.push_back(Target { position, hue });
    }

    /// The target currently being pursued, if any.
    pub fn peek(&self) -> Option<&Target> {
        self.queue.front()
    }

    /// Remove and return the head target.
    pub fn dequeue(&mut self) -> Option<Target> {
        self.queue.pop_front()
    }

    /// Drop every queued target.
    pub fn clear(&mut self) {
        self.queue.clear();
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
