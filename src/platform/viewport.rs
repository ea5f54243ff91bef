//! Drawing surface dimensions

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::BASE_UNIT_DIVISOR;

/// Size of the drawing surface in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }

    /// Scale factor every entity and font size is expressed in
    #[inline]
    pub fn base_unit(&self) -> f32 {
        self.width.min(self.height) / BASE_UNIT_DIVISOR
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Convert viewport (client) coordinates to canvas-local coordinates
    #[inline]
    pub fn client_to_canvas(client: Vec2, canvas_origin: Vec2) -> Vec2 {
        client - canvas_origin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_unit_uses_short_side() {
        assert_eq!(Viewport::new(900.0, 600.0).base_unit(), 20.0);
        assert_eq!(Viewport::new(300.0, 1200.0).base_unit(), 10.0);
    }

    #[test]
    fn test_degenerate_size_is_clamped() {
        let vp = Viewport::new(0.0, -5.0);
        assert!(vp.base_unit() > 0.0);
    }

    #[test]
    fn test_client_to_canvas() {
        let p = Viewport::client_to_canvas(Vec2::new(120.0, 80.0), Vec2::new(20.0, 30.0));
        assert_eq!(p, Vec2::new(100.0, 50.0));
    }
}
