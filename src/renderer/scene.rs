//! Scene building
//!
//! Pure functions from game state to draw commands. Nothing here mutates the
//! simulation.

use glam::Vec2;

use super::draw::{DrawCmd, Glow, TextAlign, TextBaseline};
use super::shapes::{face, star_points};
use crate::settings::Settings;
use crate::sim::{GamePhase, JumpState, PowerUpKind, SequenceState};

const WHITE: &str = "white";
const BLACK: &str = "black";
const STAR_YELLOW: &str = "yellow";
const GOLD: &str = "#FFD700";
const SPEED_GREEN: &str = "#00FF00";
const FROZEN_CYAN: &str = "#00FFFF";

/// Opacity of the decorative bubbles
const DRIFT_ALPHA: f32 = 0.3;

/// Per-frame values that are not part of the simulation
#[derive(Debug, Clone, Copy)]
pub struct FrameInfo<'a> {
    pub settings: &'a Settings,
    /// Session clock (ms), used for the speed-bonus hint
    pub now_ms: f64,
    pub fps: Option<u32>,
}

fn glow(settings: &Settings, color: &'static str, blur: f32) -> Option<Glow> {
    settings.glow.then_some(Glow { color, blur })
}

fn fps_counter(cmds: &mut Vec<DrawCmd>, info: &FrameInfo, base_unit: f32) {
    if let (true, Some(fps)) = (info.settings.show_fps, info.fps) {
        cmds.push(DrawCmd::Text {
            pos: Vec2::new(base_unit * 0.5, base_unit),
            text: format!("{} fps", fps),
            size: base_unit * 0.8,
            color: WHITE,
            bold: false,
            align: TextAlign::Left,
            baseline: TextBaseline::Alphabetic,
        });
    }
}

/// Bubble Jump: drift bubbles, stars, then the player on top
pub fn jump_scene(state: &JumpState, info: &FrameInfo) -> Vec<DrawCmd> {
    let vp = state.viewport;
    let bu = vp.base_unit();
    let mut cmds = Vec::with_capacity(state.bubbles.len() + state.stars.len() + 8);

    cmds.push(DrawCmd::Clear {
        width: vp.width,
        height: vp.height,
    });

    for bubble in &state.bubbles {
        cmds.push(DrawCmd::Circle {
            center: bubble.pos,
            radius: bubble.radius,
            fill: bubble.color.css(),
            alpha: DRIFT_ALPHA,
            glow: None,
        });
    }

    for star in &state.stars {
        let rotation = if info.settings.spin_stars() { star.rotation } else { 0.0 };
        cmds.push(DrawCmd::Polygon {
            points: star_points(star.pos, star.radius, rotation),
            fill: STAR_YELLOW,
            glow: glow(info.settings, STAR_YELLOW, bu),
        });
    }

    let player = &state.player;
    cmds.push(DrawCmd::Circle {
        center: player.pos,
        radius: player.radius,
        fill: WHITE,
        alpha: 1.0,
        glow: glow(info.settings, WHITE, bu * 0.75),
    });

    let f = face(player.pos, bu);
    for eye in [f.left_eye, f.right_eye] {
        cmds.push(DrawCmd::Circle {
            center: eye,
            radius: f.eye_radius,
            fill: BLACK,
            alpha: 1.0,
            glow: None,
        });
    }
    cmds.push(DrawCmd::Arc {
        center: f.mouth_center,
        radius: f.mouth_radius,
        start: 0.0,
        end: std::f32::consts::PI,
        stroke: BLACK,
        line_width: f.line_width,
    });

    fps_counter(&mut cmds, info, bu);
    cmds
}

/// Bubble Sequence: numbered bubbles plus timer/level/combo/power-up HUD
pub fn sequence_scene(state: &SequenceState, info: &FrameInfo) -> Vec<DrawCmd> {
    let vp = state.viewport;
    let bu = vp.base_unit();
    let mut cmds = Vec::with_capacity(state.bubbles.len() * 2 + 8);

    cmds.push(DrawCmd::Clear {
        width: vp.width,
        height: vp.height,
    });

    for bubble in state.bubbles.iter().filter(|b| b.is_visible()) {
        let color = bubble.css_color();
        cmds.push(DrawCmd::Circle {
            center: bubble.pos,
            radius: bubble.radius * bubble.scale,
            fill: color,
            alpha: 1.0,
            glow: glow(info.settings, color, bu * 0.5 * bubble.scale),
        });
        cmds.push(DrawCmd::Text {
            pos: bubble.pos,
            text: (bubble.index + 1).to_string(),
            size: bu * 1.5 * bubble.scale,
            color: WHITE,
            bold: true,
            align: TextAlign::Center,
            baseline: TextBaseline::Middle,
        });
    }

    let cx = vp.width / 2.0;
    let size = bu * 1.2;
    cmds.push(DrawCmd::label(
        Vec2::new(cx, bu * 2.0),
        format!("Time: {}s", state.time_left.max(0.0).ceil()),
        size,
        WHITE,
    ));
    cmds.push(DrawCmd::label(
        Vec2::new(cx, bu * 4.0),
        format!("Level {}", state.level),
        size,
        WHITE,
    ));

    if state.combo > 1 {
        cmds.push(DrawCmd::label(
            Vec2::new(cx, vp.height - bu * 4.0),
            format!("Combo x{}!", state.combo),
            size,
            GOLD,
        ));
    }

    if state.phase == GamePhase::Playing && state.last_tap_ms.is_some() && info.settings.speed_hint() {
        let potential = state.current_speed_multiplier(info.now_ms);
        if potential > 1.0 {
            cmds.push(DrawCmd::label(
                Vec2::new(cx, vp.height - bu * 6.0),
                format!("Speed x{:.1}", potential),
                size,
                SPEED_GREEN,
            ));
        }
    }

    let indicators = [
        (PowerUpKind::TimeFreeze, FROZEN_CYAN, bu * 6.0),
        (PowerUpKind::ScoreDoubler, GOLD, bu * 8.0),
    ];
    for (kind, color, y) in indicators {
        if state.powerups.is_active(kind) {
            cmds.push(DrawCmd::label(Vec2::new(cx, y), kind.label(), size, color));
        }
    }

    fps_counter(&mut cmds, info, bu);
    cmds
}
