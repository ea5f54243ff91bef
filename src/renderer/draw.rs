//! Draw commands for the 2D canvas
//!
//! Scenes are built as a flat list of these and replayed by the canvas
//! executor, so everything above the executor stays testable natively.

use glam::Vec2;

/// Soft shadow around a filled shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glow {
    pub color: &'static str,
    pub blur: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextBaseline {
    Alphabetic,
    Middle,
}

/// A single drawing operation
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Clear {
        width: f32,
        height: f32,
    },
    Circle {
        center: Vec2,
        radius: f32,
        fill: &'static str,
        alpha: f32,
        glow: Option<Glow>,
    },
    /// Closed filled path through `points`
    Polygon {
        points: Vec<Vec2>,
        fill: &'static str,
        glow: Option<Glow>,
    },
    /// Stroked circular arc, angles in radians
    Arc {
        center: Vec2,
        radius: f32,
        start: f32,
        end: f32,
        stroke: &'static str,
        line_width: f32,
    },
    Text {
        pos: Vec2,
        text: String,
        size: f32,
        color: &'static str,
        bold: bool,
        align: TextAlign,
        baseline: TextBaseline,
    },
}

impl DrawCmd {
    /// Centred HUD text on the alphabetic baseline
    pub fn label(pos: Vec2, text: impl Into<String>, size: f32, color: &'static str) -> Self {
        DrawCmd::Text {
            pos,
            text: text.into(),
            size,
            color,
            bold: false,
            align: TextAlign::Center,
            baseline: TextBaseline::Alphabetic,
        }
    }

    /// Text payload, if this is a text command
    pub fn text(&self) -> Option<&str> {
        match self {
            DrawCmd::Text { text, .. } => Some(text),
            _ => None,
        }
    }
}
