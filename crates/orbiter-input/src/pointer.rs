//! Pointer drag tracking and wheel normalization.

use glam::Vec2;
use winit::event::{ElementState, MouseButton, MouseScrollDelta};

/// Pixels per wheel line when the platform reports pixel deltas.
const PIXELS_PER_LINE: f64 = 40.0;

/// Tracks a drag with the left button.
///
/// Deltas are produced only while the drag is active. The anchor is reset on
/// every press, so movement between drags never leaks into the next one.
#[derive(Debug, Clone, Default)]
pub struct PointerDrag {
    cursor: Vec2,
    last: Option<Vec2>,
}

impl PointerDrag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a `MouseInput` event. Only the left button starts or ends a drag.
    pub fn on_button(&mut self, button: MouseButton, state: ElementState) {
        if button != MouseButton::Left {
            return;
        }
        self.last = match state {
            ElementState::Pressed => Some(self.cursor),
            ElementState::Released => None,
        };
    }

    /// Handle a `CursorMoved` event, returning the movement since the previous
    /// drag event when a drag is active.
    pub fn on_cursor_moved(&mut self, x: f64, y: f64) -> Option<Vec2> {
        self.cursor = Vec2::new(x as f32, y as f32);
        let last = self.last.as_mut()?;
        let delta = self.cursor - *last;
        *last = self.cursor;
        Some(delta)
    }

    /// End any drag in progress, e.g. when the cursor leaves the window.
    pub fn cancel(&mut self) {
        self.last = None;
    }

    /// True between press and release.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.last.is_some()
    }
}

/// Convert a wheel event into signed lines. Positive means scrolling forward
/// (away from the user).
#[must_use]
pub fn wheel_lines(delta: MouseScrollDelta) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_x, y) => y,
        MouseScrollDelta::PixelDelta(pos) => (pos.y / PIXELS_PER_LINE) as f32,
    }
}
