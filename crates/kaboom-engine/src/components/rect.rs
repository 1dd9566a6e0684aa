//! Solid-color rectangle.

use crate::components::area::area_from_size;
use crate::components::transform::{draw_opts, obj_origin};
use crate::core::comp::Comp;
use crate::error::KaboomError;

/// `rect(w, h)`: draws a filled rectangle and, unless the object already
/// has an area or sets `no_area`, installs an area of the same size.
///
/// ```ignore
/// k.add(comps![pos(0.0, 0.0), rect(20.0, 8.0).field("no_area", true)])?;
/// ```
pub fn rect(w: f32, h: f32) -> Comp {
    Comp::new("rect")
        .field("width", w)
        .field("height", h)
        .on_add(|k, id| {
            let obj = k.obj(id).ok_or(KaboomError::ObjectNotFound(id))?;
            if obj.has("area") || obj.flag("no_area") {
                return Ok(());
            }
            let w = obj.num("width").unwrap_or(0.0);
            let h = obj.num("height").unwrap_or(0.0);
            let origin = obj_origin(obj);
            k.use_comp(id, area_from_size(w, h, origin))
        })
        .on_draw(|k, id| {
            let Some(obj) = k.obj(id) else {
                return Ok(());
            };
            let opts = draw_opts(obj);
            let w = obj.num("width").unwrap_or(0.0);
            let h = obj.num("height").unwrap_or(0.0);
            k.gfx_mut().draw_rect(opts.pos, w, h, &opts);
            Ok(())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::config::EngineConfig;
    use crate::api::engine::Engine;
    use crate::comps;
    use crate::components::transform::{origin, pos};
    use crate::math::{Origin, Rect};
    use crate::renderer::commands::CMD_RECT;
    use crate::renderer::DrawList;
    use glam::Vec2;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn installs_area_from_size_and_origin() {
        let mut k = Engine::new(
            EngineConfig::default(),
            Box::new(DrawList::new(640.0, 480.0, 1.0)),
        );
        let id = k
            .add(comps![pos(0.0, 0.0), origin(Origin::Center), rect(10.0, 4.0)])
            .unwrap();
        let a = k.obj(id).unwrap().get("area").and_then(|v| v.as_rect());
        assert_eq!(
            a,
            Some(Rect::new(Vec2::new(-5.0, -2.0), Vec2::new(5.0, 2.0)))
        );

        let bare = k
            .add(comps![pos(0.0, 0.0), rect(10.0, 4.0).field("no_area", true)])
            .unwrap();
        assert!(!k.obj(bare).unwrap().has("area"));
    }

    #[test]
    fn draws_one_rect() {
        let gfx = Rc::new(RefCell::new(DrawList::new(640.0, 480.0, 1.0)));
        let mut k = Engine::new(EngineConfig::default(), Box::new(gfx.clone()));
        k.tick(0.0);
        k.add(comps![pos(3.0, 4.0), rect(10.0, 4.0)]).unwrap();
        k.tick(0.016);
        let list = gfx.borrow();
        let rects: Vec<_> = list.commands().iter().filter(|c| c.kind == CMD_RECT).collect();
        assert_eq!(rects.len(), 1);
        assert_eq!(rects[0].pos(), Vec2::new(3.0, 4.0));
        assert_eq!((rects[0].w, rects[0].h), (10.0, 4.0));
    }
}
