//! Debug keybindings and the inspect overlay.

use glam::Vec2;

use crate::api::engine::Engine;
use crate::api::types::ObjId;
use crate::error::Result;
use crate::math::{clamp, Color};
use crate::renderer::DrawOpts;
use crate::systems::text::{format_text, TextOpts};

/// Step applied by f7/f9.
pub const TIME_SCALE_STEP: f32 = 0.2;

const INSPECT_TEXT_SIZE: f32 = 12.0;
const INSPECT_PAD: f32 = 4.0;

impl Engine {
    /// f1 inspect, f2 clear log, f7/f9 time scale, f8 pause, f10 step.
    pub(crate) fn reg_debug_input(&mut self) {
        self.key_press("f1", |k| {
            k.debug.inspect = !k.debug.inspect;
            Ok(())
        });
        self.key_press("f2", |k| {
            k.log.clear();
            Ok(())
        });
        self.key_press("f8", |k| {
            k.debug.paused = !k.debug.paused;
            let msg = if k.debug.paused { "paused" } else { "unpaused" };
            k.log.info(msg);
            Ok(())
        });
        self.key_press("f7", |k| {
            k.shift_time_scale(-TIME_SCALE_STEP);
            Ok(())
        });
        self.key_press("f9", |k| {
            k.shift_time_scale(TIME_SCALE_STEP);
            Ok(())
        });
        self.key_press("f10", |k| {
            k.step_frame()?;
            k.log.info("stepped frame");
            Ok(())
        });
    }

    fn shift_time_scale(&mut self, by: f32) {
        let ts = clamp(self.debug.time_scale + by, 0.0, 2.0);
        self.debug.time_scale = ts;
        self.log.info(format!("time scale: {:.1}", ts));
    }
}

/// Outline every visible area, describe the hovered object at the mouse and
/// print the fps in the corner.
pub(crate) fn draw_inspect(k: &mut Engine) -> Result<()> {
    let color = k.config.inspect_color;
    let gfx_scale = k.gfx.scale();
    let mut inspecting: Option<ObjId> = None;

    for id in k.world.sorted_ids() {
        let Some(obj) = k.world.obj(id) else {
            continue;
        };
        if obj.hidden || !obj.has("area") {
            continue;
        }
        let Some(area) = k.world_area(id) else {
            continue;
        };
        let cam = k.world.is_cam_layer(obj.str("layer"));
        let scale = if cam {
            let s = k.world.cam.scale;
            gfx_scale * (s.x + s.y) / 2.0
        } else {
            gfx_scale
        };
        if inspecting.is_none() && k.is_hovered(id) {
            inspecting = Some(id);
        }
        let lw = (if inspecting == Some(id) { 6.0 } else { 2.0 }) / scale;

        k.gfx.push_transform();
        if cam {
            let m = k.world.cam_matrix;
            k.gfx.push_matrix(&m);
        }
        k.gfx
            .draw_rect_stroke(area.p1, area.width(), area.height(), lw, color);
        k.gfx.pop_transform();
    }

    if let Some(id) = inspecting {
        let lines = inspect_lines(k, id);
        let at = k.input.mouse_pos();
        draw_inspect_text(k, at, &lines.join("\n"), gfx_scale);
    }
    let fps = k.fps().to_string();
    draw_inspect_text(k, Vec2::ZERO, &fps, gfx_scale);
    Ok(())
}

/// Quoted tags, then each component's `label: value` lines.
pub fn inspect_lines(k: &Engine, id: ObjId) -> Vec<String> {
    let Some(obj) = k.obj(id) else {
        return Vec::new();
    };
    let mut lines: Vec<String> = obj.tags().iter().map(|t| format!("\"{}\"", t)).collect();
    for inspector in obj.events.inspectors() {
        for (label, value) in inspector(k, id) {
            lines.push(format!("{}: {}", label, value));
        }
    }
    lines
}

fn draw_inspect_text(k: &mut Engine, pos: Vec2, txt: &str, scale: f32) {
    let Some(font) = k.assets.def_font() else {
        return;
    };
    let pad = INSPECT_PAD / scale;
    let ftext = format_text(
        txt,
        font,
        &TextOpts {
            pos: pos + Vec2::splat(pad),
            size: Some(INSPECT_TEXT_SIZE / scale),
            ..Default::default()
        },
    );
    let bg = DrawOpts::at(pos).with_color(Color::BLACK);
    k.gfx
        .draw_rect(pos, ftext.width + pad * 2.0, ftext.height + pad * 2.0, &bg);
    k.gfx.draw_text(&ftext);
}
