//! Canvas 2D executor
//!
//! Replays `DrawCmd` lists on a `CanvasRenderingContext2d`. Every command is
//! wrapped in save/restore so shadow and alpha state never leak.

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::draw::{DrawCmd, Glow, TextAlign, TextBaseline};

fn apply_glow(ctx: &CanvasRenderingContext2d, glow: &Option<Glow>) {
    match glow {
        Some(g) => {
            ctx.set_shadow_color(g.color);
            ctx.set_shadow_blur(g.blur as f64);
        }
        None => ctx.set_shadow_blur(0.0),
    }
}

fn draw_one(ctx: &CanvasRenderingContext2d, cmd: &DrawCmd) -> Result<(), JsValue> {
    match cmd {
        DrawCmd::Clear { width, height } => {
            ctx.clear_rect(0.0, 0.0, *width as f64, *height as f64);
        }
        DrawCmd::Circle {
            center,
            radius,
            fill,
            alpha,
            glow,
        } => {
            apply_glow(ctx, glow);
            ctx.set_global_alpha(*alpha as f64);
            ctx.begin_path();
            ctx.arc(
                center.x as f64,
                center.y as f64,
                radius.max(0.0) as f64,
                0.0,
                std::f64::consts::TAU,
            )?;
            ctx.set_fill_style_str(fill);
            ctx.fill();
        }
        DrawCmd::Polygon { points, fill, glow } => {
            apply_glow(ctx, glow);
            ctx.begin_path();
            for (i, p) in points.iter().enumerate() {
                if i == 0 {
                    ctx.move_to(p.x as f64, p.y as f64);
                } else {
                    ctx.line_to(p.x as f64, p.y as f64);
                }
            }
            ctx.close_path();
            ctx.set_fill_style_str(fill);
            ctx.fill();
        }
        DrawCmd::Arc {
            center,
            radius,
            start,
            end,
            stroke,
            line_width,
        } => {
            ctx.set_shadow_blur(0.0);
            ctx.begin_path();
            ctx.arc(
                center.x as f64,
                center.y as f64,
                *radius as f64,
                *start as f64,
                *end as f64,
            )?;
            ctx.set_stroke_style_str(stroke);
            ctx.set_line_width(*line_width as f64);
            ctx.stroke();
        }
        DrawCmd::Text {
            pos,
            text,
            size,
            color,
            bold,
            align,
            baseline,
        } => {
            let weight = if *bold { "bold " } else { "" };
            ctx.set_font(&format!("{}{}px Arial", weight, size));
            ctx.set_text_align(match align {
                TextAlign::Left => "left",
                TextAlign::Center => "center",
            });
            ctx.set_text_baseline(match baseline {
                TextBaseline::Alphabetic => "alphabetic",
                TextBaseline::Middle => "middle",
            });
            ctx.set_fill_style_str(color);
            ctx.fill_text(text, pos.x as f64, pos.y as f64)?;
        }
    }
    Ok(())
}

/// Draw a full scene; a failing command is logged and skipped
pub fn draw(ctx: &CanvasRenderingContext2d, cmds: &[DrawCmd]) {
    for cmd in cmds {
        ctx.save();
        if let Err(e) = draw_one(ctx, cmd) {
            log::warn!("Canvas draw failed: {:?}", e);
        }
        ctx.restore();
    }
}
