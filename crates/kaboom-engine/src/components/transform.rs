//! Placement components: position, scale, rotation, tint and origin.

use glam::Vec2;

use crate::api::engine::Engine;
use crate::api::types::ObjId;
use crate::core::comp::Comp;
use crate::core::object::GameObject;
use crate::core::value::Value;
use crate::error::{KaboomError, Result};
use crate::math::{Color, Origin};
use crate::renderer::{world_to_screen, DrawOpts};

/// Read a velocity from method args: one `Vec2`, or `x, y` numbers.
pub(crate) fn arg_vec2(args: &[Value]) -> Option<Vec2> {
    match args {
        [Value::Vec2(v), ..] => Some(*v),
        [x, y, ..] => Some(Vec2::new(x.as_f32()?, y.as_f32()?)),
        _ => None,
    }
}

/// `pos(x, y)`: field `pos`, methods `move` and `screenPos`.
pub fn pos(x: f32, y: f32) -> Comp {
    Comp::new("pos")
        .field("pos", Vec2::new(x, y))
        .func("move", |k, id, args| {
            let vel = arg_vec2(args).ok_or_else(|| {
                KaboomError::InvalidComp("move expects a vec2 or two numbers".into())
            })?;
            move_by(k, id, vel)?;
            Ok(Value::Null)
        })
        .func("screenPos", |k, id, _| Ok(Value::Vec2(screen_pos(k, id))))
        .inspect(|k, id| {
            let p = k.obj(id).and_then(|o| o.vec2("pos")).unwrap_or(Vec2::ZERO);
            vec![("pos".to_string(), format!("({:.0}, {:.0})", p.x, p.y))]
        })
}

/// Move an object by `vel` units per second for this frame.
pub fn move_by(k: &mut Engine, id: ObjId, vel: Vec2) -> Result<()> {
    let dt = k.dt();
    let obj = k.obj_mut(id).ok_or(KaboomError::ObjectNotFound(id))?;
    let p = obj.vec2("pos").unwrap_or(Vec2::ZERO);
    obj.set("pos", p + vel * dt);
    Ok(())
}

/// Where the object's position lands on screen.
pub fn screen_pos(k: &Engine, id: ObjId) -> Vec2 {
    let p = k.obj(id).and_then(|o| o.vec2("pos")).unwrap_or(Vec2::ZERO);
    if k.world().is_cam_layer(k.world().layer_of(id)) {
        world_to_screen(&k.world().cam_matrix(), p)
    } else {
        p
    }
}

pub fn scale(x: f32, y: f32) -> Comp {
    Comp::new("scale").field("scale", Vec2::new(x, y))
}

/// Rotation in radians.
pub fn rotate(angle: f32) -> Comp {
    Comp::new("rotate").field("angle", angle)
}

pub fn color(c: Color) -> Comp {
    Comp::new("color").field("color", c)
}

pub fn origin(o: Origin) -> Comp {
    Comp::new("origin").field("origin", o.name())
}

/// Origin an object is anchored by; top-left when unset.
pub fn obj_origin(obj: &GameObject) -> Origin {
    obj.str("origin")
        .and_then(Origin::from_name)
        .unwrap_or_default()
}

/// Draw placement from the object's transform fields.
pub fn draw_opts(obj: &GameObject) -> DrawOpts {
    DrawOpts {
        pos: obj.vec2("pos").unwrap_or(Vec2::ZERO),
        scale: obj.vec2("scale").unwrap_or(Vec2::ONE),
        angle: obj.num("angle").unwrap_or(0.0),
        color: obj
            .get("color")
            .and_then(Value::as_color)
            .unwrap_or(Color::WHITE),
        origin: obj_origin(obj),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::config::EngineConfig;
    use crate::comps;
    use crate::renderer::DrawList;

    #[test]
    fn move_scales_by_dt() {
        let mut k = Engine::new(
            EngineConfig::default(),
            Box::new(DrawList::new(640.0, 480.0, 1.0)),
        );
        k.tick(0.0);
        let id = k.add(comps![pos(0.0, 0.0)]).unwrap();
        k.tick(0.5);
        k.call(id, "move", &[Value::Num(10.0), Value::Num(-4.0)])
            .unwrap();
        assert_eq!(k.obj(id).unwrap().vec2("pos"), Some(Vec2::new(5.0, -2.0)));
        assert!(k.call(id, "move", &[]).is_err());
    }

    #[test]
    fn draw_opts_reads_transform_fields() {
        let obj = GameObject::build(comps![
            pos(1.0, 2.0),
            scale(3.0, 3.0),
            rotate(0.5),
            color(Color::BLACK),
            origin(Origin::Center)
        ])
        .unwrap();
        let opts = draw_opts(&obj);
        assert_eq!(opts.pos, Vec2::new(1.0, 2.0));
        assert_eq!(opts.scale, Vec2::splat(3.0));
        assert_eq!(opts.angle, 0.5);
        assert_eq!(opts.color, Color::BLACK);
        assert_eq!(opts.origin, Origin::Center);
    }

    #[test]
    fn arg_vec2_accepts_both_forms() {
        assert_eq!(arg_vec2(&[Value::Vec2(Vec2::X)]), Some(Vec2::X));
        assert_eq!(
            arg_vec2(&[Value::Num(1.0), Value::Num(2.0)]),
            Some(Vec2::new(1.0, 2.0))
        );
        assert_eq!(arg_vec2(&[Value::Str("x".into())]), None);
    }
}
