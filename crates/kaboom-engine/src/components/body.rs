//! Platformer body: gravity, landing, head bumps and sticky platforms.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::api::engine::Engine;
use crate::api::types::ObjId;
use crate::components::transform::move_by;
use crate::core::comp::Comp;
use crate::core::value::Value;
use crate::error::{KaboomError, Result};
use crate::systems::collision::Side;

/// Terminal fall speed.
pub const DEF_MAX_VEL: f32 = 960.0;
pub const DEF_JUMP_FORCE: f32 = 480.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BodyConf {
    pub jump_force: Option<f32>,
    pub max_vel: Option<f32>,
}

/// `solid()`: other bodies are pushed out of this object.
pub fn solid() -> Comp {
    Comp::new("solid").field("solid", true)
}

/// `body(conf)`: falls under world gravity and resolves against solids.
pub fn body(conf: BodyConf) -> Comp {
    Comp::new("body")
        .require(&["pos"])
        .field("vel_y", 0.0)
        .field("jump_force", conf.jump_force.unwrap_or(DEF_JUMP_FORCE))
        .field("max_vel", conf.max_vel.unwrap_or(DEF_MAX_VEL))
        .field("platform", Value::Null)
        .field("platform_pos", Value::Null)
        .on_update(update)
        .func("jump", |k, id, args| {
            jump(k, id, args.first().and_then(Value::as_f32))?;
            Ok(Value::Null)
        })
        .func("grounded", |k, id, _| Ok(Value::Bool(is_grounded(k, id))))
        .func("falling", |k, id, _| {
            Ok(Value::Bool(BodyState::load(k, id).vel_y > 0.0))
        })
        .func("curPlatform", |k, id, _| {
            Ok(BodyState::load(k, id).platform.into())
        })
}

/// Body fields pulled out of the object for one update step.
struct BodyState {
    vel_y: f32,
    max_vel: f32,
    platform: Option<ObjId>,
    platform_pos: Option<Vec2>,
}

impl BodyState {
    fn load(k: &Engine, id: ObjId) -> Self {
        let obj = k.obj(id);
        Self {
            vel_y: obj.and_then(|o| o.num("vel_y")).unwrap_or(0.0),
            max_vel: obj.and_then(|o| o.num("max_vel")).unwrap_or(DEF_MAX_VEL),
            platform: obj.and_then(|o| o.get("platform")).and_then(Value::as_obj),
            platform_pos: obj.and_then(|o| o.vec2("platform_pos")),
        }
    }

    fn store(&self, k: &mut Engine, id: ObjId) {
        if let Some(obj) = k.obj_mut(id) {
            obj.set("vel_y", self.vel_y);
            obj.set("platform", self.platform);
            obj.set("platform_pos", self.platform_pos);
        }
    }
}

fn update(k: &mut Engine, id: ObjId) -> Result<()> {
    let vel_y = BodyState::load(k, id).vel_y;
    move_by(k, id, Vec2::new(0.0, vel_y))?;
    let contacts = k.push_out_all(id);

    let mut st = BodyState::load(k, id);
    let mut just_off = false;

    if let Some(platform) = st.platform {
        if !k.exists(platform) || !k.is_collided(id, platform) {
            st.platform = None;
            st.platform_pos = None;
            just_off = true;
        } else if let Some(last) = st.platform_pos {
            let now = k.obj(platform).and_then(|o| o.vec2("pos")).unwrap_or(last);
            if let Some(obj) = k.obj_mut(id) {
                let p = obj.vec2("pos").unwrap_or(Vec2::ZERO);
                obj.set("pos", p + (now - last));
            }
            st.platform_pos = Some(now);
        }
    }

    if st.platform.is_none() {
        st.vel_y = (st.vel_y + k.gravity() * k.dt()).min(st.max_vel);

        for c in contacts {
            if c.side == Side::Bottom && st.vel_y > 0.0 {
                st.platform = Some(c.obj);
                st.vel_y = 0.0;
                st.platform_pos = k.obj(c.obj).and_then(|o| o.vec2("pos"));
                if !just_off {
                    st.store(k, id);
                    k.trigger_obj(id, "grounded", &[Value::Obj(c.obj)])?;
                    st = BodyState::load(k, id);
                }
            } else if c.side == Side::Top && st.vel_y < 0.0 {
                st.vel_y = 0.0;
                st.store(k, id);
                k.trigger_obj(id, "headbutt", &[Value::Obj(c.obj)])?;
                st = BodyState::load(k, id);
            }
        }
    }

    st.store(k, id);
    Ok(())
}

/// Leave the current platform with upward speed `force` (or the body's
/// `jump_force` when `None` or zero).
pub fn jump(k: &mut Engine, id: ObjId, force: Option<f32>) -> Result<()> {
    let obj = k.obj_mut(id).ok_or(KaboomError::ObjectNotFound(id))?;
    let force = force
        .filter(|f| *f != 0.0)
        .or_else(|| obj.num("jump_force"))
        .unwrap_or(DEF_JUMP_FORCE);
    obj.set("platform", Value::Null);
    obj.set("platform_pos", Value::Null);
    obj.set("vel_y", -force);
    Ok(())
}

pub fn is_grounded(k: &Engine, id: ObjId) -> bool {
    BodyState::load(k, id).platform.is_some()
}
