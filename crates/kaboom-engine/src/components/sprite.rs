//! Sprite component: textured quad with frame animation.

use glam::Vec2;

use crate::api::engine::Engine;
use crate::api::types::ObjId;
use crate::assets::SpriteData;
use crate::components::area::{area, area_from_size};
use crate::components::transform::{draw_opts, obj_origin};
use crate::core::comp::Comp;
use crate::core::value::Value;
use crate::error::{KaboomError, Result};
use crate::math::Quad;

pub const DEF_ANIM_SPEED: f32 = 0.1;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SpriteConf {
    pub frame: usize,
    /// Seconds per frame.
    pub anim_speed: Option<f32>,
    /// Sub-rect of each frame to show.
    pub quad: Option<Quad>,
    /// Target size; one side alone keeps the aspect ratio.
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub no_area: bool,
    pub flip_x: bool,
    pub flip_y: bool,
}

fn tex_scale(frame_size: Vec2, w: Option<f32>, h: Option<f32>) -> Vec2 {
    match (w, h) {
        (Some(w), Some(h)) => Vec2::new(w / frame_size.x, h / frame_size.y),
        (Some(w), None) => Vec2::splat(w / frame_size.x),
        (None, Some(h)) => Vec2::splat(h / frame_size.y),
        (None, None) => Vec2::ONE,
    }
}

fn frame_size(spr: &SpriteData, quad: Option<Quad>) -> Vec2 {
    let mut q = spr.frames.first().copied().unwrap_or(Quad::FULL);
    if let Some(sub) = quad {
        q = q.scale(sub);
    }
    Vec2::new(spr.tex_size.x * q.w, spr.tex_size.y * q.h)
}

/// `sprite(name, conf)`.
///
/// `add` installs a placeholder area; `load` resolves the sprite, sizes the
/// object and replaces the placeholder with a sized area.
pub fn sprite(name: &str, conf: SpriteConf) -> Comp {
    Comp::new("sprite")
        .field("sprite", name)
        .field("width", 0.0)
        .field("height", 0.0)
        .field("frame", conf.frame as f32)
        .field("anim_speed", conf.anim_speed.unwrap_or(DEF_ANIM_SPEED))
        .field("quad", conf.quad.unwrap_or(Quad::FULL))
        .field("flip_x", conf.flip_x)
        .field("flip_y", conf.flip_y)
        .field("anim", Value::Null)
        .field("anim_loop", false)
        .field("anim_timer", 0.0)
        .field("auto_area", false)
        .on_add(move |k, id| {
            let obj = k.obj_mut(id).ok_or(KaboomError::ObjectNotFound(id))?;
            if conf.no_area || obj.has("area") {
                return Ok(());
            }
            obj.set("auto_area", true);
            k.use_comp(id, area(Vec2::ZERO, Vec2::ZERO))
        })
        .on_load(move |k, id| resize(k, id, conf))
        .on_update(update)
        .on_draw(draw)
        .func("play", |k, id, args| {
            let name = args
                .first()
                .and_then(Value::as_str)
                .ok_or_else(|| KaboomError::InvalidComp("play expects an anim name".into()))?
                .to_string();
            let looping = args.get(1).and_then(Value::as_bool).unwrap_or(true);
            play(k, id, &name, looping)?;
            Ok(Value::Null)
        })
        .func("stop", |k, id, _| {
            stop(k, id)?;
            Ok(Value::Null)
        })
        .func("changeSprite", move |k, id, args| {
            let name = args
                .first()
                .and_then(Value::as_str)
                .ok_or_else(|| KaboomError::InvalidComp("changeSprite expects a name".into()))?
                .to_string();
            change_sprite(k, id, &name, conf)?;
            Ok(Value::Null)
        })
        .func("numFrames", |k, id, _| Ok(Value::Num(num_frames(k, id) as f32)))
        .func("curAnim", |k, id, _| Ok(cur_anim(k, id).into()))
        .func("flipX", |k, id, args| {
            set_flag(k, id, "flip_x", args)?;
            Ok(Value::Null)
        })
        .func("flipY", |k, id, args| {
            set_flag(k, id, "flip_y", args)?;
            Ok(Value::Null)
        })
        .inspect(|k, id| match cur_anim(k, id) {
            Some(anim) => vec![("curAnim".to_string(), format!("\"{}\"", anim))],
            None => Vec::new(),
        })
}

fn set_flag(k: &mut Engine, id: ObjId, field: &str, args: &[Value]) -> Result<()> {
    let on = args.first().map(Value::truthy).unwrap_or(false);
    let obj = k.obj_mut(id).ok_or(KaboomError::ObjectNotFound(id))?;
    obj.set(field, on);
    Ok(())
}

fn sprite_name(k: &Engine, id: ObjId) -> Result<String> {
    k.obj(id)
        .and_then(|o| o.str("sprite"))
        .map(str::to_string)
        .ok_or(KaboomError::ObjectNotFound(id))
}

/// Size the object from its sprite and refresh the automatic area.
fn resize(k: &mut Engine, id: ObjId, conf: SpriteConf) -> Result<()> {
    let name = sprite_name(k, id)?;
    let size = {
        let spr = k.assets().sprite(&name)?;
        let fs = frame_size(spr, conf.quad);
        fs * tex_scale(fs, conf.width, conf.height)
    };
    let obj = k.obj_mut(id).ok_or(KaboomError::ObjectNotFound(id))?;
    obj.set("width", size.x);
    obj.set("height", size.y);
    if obj.flag("auto_area") {
        let origin = obj_origin(obj);
        k.use_comp(id, area_from_size(size.x, size.y, origin))?;
    }
    Ok(())
}

fn update(k: &mut Engine, id: ObjId) -> Result<()> {
    let Some(anim) = cur_anim(k, id) else {
        return Ok(());
    };
    let name = sprite_name(k, id)?;
    let range = *k
        .assets()
        .sprite(&name)?
        .anims
        .get(&anim)
        .ok_or_else(|| KaboomError::AnimNotFound(anim.clone()))?;
    let dt = k.dt();
    let obj = k.obj_mut(id).ok_or(KaboomError::ObjectNotFound(id))?;
    let speed = obj.num("anim_speed").unwrap_or(DEF_ANIM_SPEED);
    let timer = obj.num("anim_timer").unwrap_or(0.0) + dt;
    obj.set("anim_timer", timer);
    if timer < speed {
        return Ok(());
    }

    let mut frame = obj.num("frame").unwrap_or(0.0) as usize + 1;
    let mut ended = false;
    if frame > range.to {
        if obj.flag("anim_loop") {
            frame = range.from;
        } else {
            frame -= 1;
            ended = true;
        }
    }
    obj.set("frame", frame as f32);
    if ended {
        stop(k, id)?;
    } else {
        obj.set("anim_timer", timer - speed);
    }
    Ok(())
}

fn draw(k: &mut Engine, id: ObjId) -> Result<()> {
    let name = sprite_name(k, id)?;
    let Some(obj) = k.obj(id) else {
        return Ok(());
    };
    let spr = k.assets().sprite(&name)?;
    let frame = obj.num("frame").unwrap_or(0.0) as usize;
    let base = spr.frames.get(frame).copied().unwrap_or(Quad::FULL);
    let sub = obj.get("quad").and_then(Value::as_quad).unwrap_or(Quad::FULL);
    let mut opts = draw_opts(obj);
    opts.quad = base.scale(sub);
    opts.flip_x = obj.flag("flip_x");
    opts.flip_y = obj.flag("flip_y");
    let (tex, tex_size) = (spr.tex, spr.tex_size);
    k.gfx_mut().draw_texture(tex, tex_size, &opts);
    Ok(())
}

/// Start animation `anim`. Before assets are ready the call is deferred.
pub fn play(k: &mut Engine, id: ObjId, anim: &str, looping: bool) -> Result<()> {
    if !k.is_loaded() {
        let anim = anim.to_string();
        return k.ready(move |k| play(k, id, &anim, looping));
    }
    let name = sprite_name(k, id)?;
    let range = *k
        .assets()
        .sprite(&name)?
        .anims
        .get(anim)
        .ok_or_else(|| KaboomError::AnimNotFound(anim.to_string()))?;
    if cur_anim(k, id).is_some() {
        stop(k, id)?;
    }
    let obj = k.obj_mut(id).ok_or(KaboomError::ObjectNotFound(id))?;
    obj.set("anim", anim);
    obj.set("anim_loop", looping);
    obj.set("anim_timer", 0.0);
    obj.set("frame", range.from as f32);
    k.trigger_obj(id, "animPlay", &[Value::from(anim)])
}

/// Stop the current animation, keeping the current frame.
pub fn stop(k: &mut Engine, id: ObjId) -> Result<()> {
    let Some(prev) = cur_anim(k, id) else {
        return Ok(());
    };
    if let Some(obj) = k.obj_mut(id) {
        obj.set("anim", Value::Null);
    }
    k.trigger_obj(id, "animEnd", &[Value::Str(prev)])
}

pub fn change_sprite(k: &mut Engine, id: ObjId, name: &str, conf: SpriteConf) -> Result<()> {
    if !k.is_loaded() {
        let name = name.to_string();
        return k.ready(move |k| change_sprite(k, id, &name, conf));
    }
    k.assets().sprite(name)?;
    let obj = k.obj_mut(id).ok_or(KaboomError::ObjectNotFound(id))?;
    obj.set("sprite", name);
    obj.set("anim", Value::Null);
    obj.set("frame", 0.0);
    resize(
        k,
        id,
        SpriteConf {
            width: None,
            height: None,
            ..conf
        },
    )
}

pub fn num_frames(k: &Engine, id: ObjId) -> usize {
    sprite_name(k, id)
        .ok()
        .and_then(|name| k.assets().sprite(&name).ok())
        .map(|s| s.frames.len())
        .unwrap_or(0)
}

pub fn cur_anim(k: &Engine, id: ObjId) -> Option<String> {
    k.obj(id)?.str("anim").map(str::to_string)
}
