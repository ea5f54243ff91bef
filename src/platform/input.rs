//! Input translation
//!
//! Browser events are reduced to plain values here so the gameplay side never
//! touches `web_sys` types.

use glam::Vec2;

/// Keys the games react to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    Jump,
}

impl Key {
    /// Map a `KeyboardEvent.key` value
    pub fn from_dom(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" => Some(Key::Left),
            "ArrowRight" => Some(Key::Right),
            " " => Some(Key::Jump),
            _ => None,
        }
    }
}

/// Result of feeding a touch-move into the tracker
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TouchUpdate {
    /// Horizontal drag since the previous move
    pub dx: f32,
    /// Upward swipe exceeded the threshold
    pub jump: bool,
}

/// Tracks a single touch for horizontal drag and swipe-up detection
#[derive(Debug, Clone, Default)]
pub struct SwipeTracker {
    start: Option<Vec2>,
    last_x: Option<f32>,
}

impl SwipeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, pos: Vec2) {
        self.start = Some(pos);
        self.last_x = Some(pos.x);
    }

    /// Feed a move; `threshold` is the upward distance that counts as a jump.
    /// A detected swipe ends the gesture.
    pub fn update(&mut self, pos: Vec2, threshold: f32) -> TouchUpdate {
        let Some(start) = self.start else {
            return TouchUpdate::default();
        };

        let dx = self.last_x.map(|last| pos.x - last).unwrap_or(0.0);
        self.last_x = Some(pos.x);

        let jump = pos.y - start.y < -threshold;
        if jump {
            self.end();
        }
        TouchUpdate { dx, jump }
    }

    pub fn end(&mut self) {
        self.start = None;
        self.last_x = None;
    }
}
