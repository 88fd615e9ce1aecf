//! Pointer-look accumulator.
//!
//! [`MouseState`] sums raw pointer motion between polls. Motion only turns
//! the view while the cursor is captured; cursor positions are tracked but
//! never feed the look delta.

use glam::Vec2;

#[derive(Debug, Clone, Default)]
pub struct MouseState {
    position: Vec2,
    delta: Vec2,
    captured: bool,
}

impl MouseState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a `CursorMoved` event. Records the position only.
    pub fn on_cursor_moved(&mut self, x: f64, y: f64) {
        self.position = Vec2::new(x as f32, y as f32);
    }

    /// Process a `DeviceEvent::MouseMotion` raw delta. Only counts while captured.
    pub fn on_raw_motion(&mut self, dx: f64, dy: f64) {
        if self.captured {
            self.delta += Vec2::new(dx as f32, dy as f32);
        }
    }

    /// Pointer lock on or off. The host applies the actual cursor grab.
    pub fn set_captured(&mut self, captured: bool) {
        self.captured = captured;
    }

    #[must_use]
    pub fn is_captured(&self) -> bool {
        self.captured
    }

    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Motion accumulated since the last [`take_delta`](Self::take_delta) or
    /// [`clear_transients`](Self::clear_transients).
    #[must_use]
    pub fn delta(&self) -> Vec2 {
        self.delta
    }

    /// Read and reset the accumulated motion.
    pub fn take_delta(&mut self) -> Vec2 {
        std::mem::take(&mut self.delta)
    }

    pub fn clear_transients(&mut self) {
        self.delta = Vec2::ZERO;
    }
}
