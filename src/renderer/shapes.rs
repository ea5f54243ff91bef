//! Shape generation for 2D primitives

use glam::Vec2;
use std::f32::consts::PI;

/// Points of a five-point star drawn as a single self-intersecting path.
/// Consecutive points skip one vertex (144° apart), which yields the star
/// outline with the default nonzero fill.
pub fn star_points(center: Vec2, radius: f32, rotation: f32) -> Vec<Vec2> {
    (0..5)
        .map(|i| {
            let angle = (i as f32 * 4.0 * PI) / 5.0 + rotation;
            center + Vec2::new(angle.cos(), angle.sin()) * radius
        })
        .collect()
}

/// Geometry of the player's face, all derived from the base unit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Face {
    pub left_eye: Vec2,
    pub right_eye: Vec2,
    pub eye_radius: f32,
    pub mouth_center: Vec2,
    pub mouth_radius: f32,
    pub line_width: f32,
}

/// Two eyes above centre and a smile below
pub fn face(center: Vec2, base_unit: f32) -> Face {
    let eye_offset = base_unit * 0.35;
    let eye_y = center.y - eye_offset * 0.7;
    Face {
        left_eye: Vec2::new(center.x - eye_offset, eye_y),
        right_eye: Vec2::new(center.x + eye_offset, eye_y),
        eye_radius: base_unit * 0.15,
        mouth_center: Vec2::new(center.x, center.y + base_unit * 0.25),
        mouth_radius: base_unit * 0.4,
        line_width: base_unit * 0.1,
    }
}
