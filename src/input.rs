//! Pointer input handling.
//!
//! `PointerTracker` keeps the latest cursor position in pixels and normalized
//! device coordinates. winit mouse-button events do not carry a position, so
//! the window driver reads the tracked NDC at press/release time and feeds it
//! to the simulation's event entry points.

use glam::Vec2;
use winit::event::MouseButton as WinitMouseButton;

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl From<WinitMouseButton> for MouseButton {
    fn from(btn: WinitMouseButton) -> Self {
        match btn {
            WinitMouseButton::Left => MouseButton::Left,
            WinitMouseButton::Right => MouseButton::Right,
            WinitMouseButton::Middle => MouseButton::Middle,
            _ => MouseButton::Left, // Default for other buttons
        }
    }
}

/// Tracks cursor position over the window.
#[derive(Debug)]
pub struct PointerTracker {
    position: Vec2,
    ndc: Vec2,
    window_size: (u32, u32),
}

impl PointerTracker {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            position: Vec2::ZERO,
            ndc: Vec2::ZERO,
            window_size: (width, height),
        }
    }

    /// Update window size for NDC calculations.
    pub fn set_window_size(&mut self, width: u32, height: u32) {
        self.window_size = (width, height);
    }

    /// Record a cursor move in window pixels.
    pub fn cursor_moved(&mut self, x: f32, y: f32) {
        self.position = Vec2::new(x, y);
        let (w, h) = self.window_size;
        if w > 0 && h > 0 {
            self.ndc = Vec2::new(
                (x / w as f32) * 2.0 - 1.0,
                1.0 - (y / h as f32) * 2.0, // Y flipped
            );
        }
    }

    /// Cursor position in window pixels.
    #[inline]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Cursor position in normalized device coordinates (-1 to 1).
    ///
    /// Origin is at the center of the window, Y increases upward.
    #[inline]
    pub fn ndc(&self) -> Vec2 {
        self.ndc
    }
}
