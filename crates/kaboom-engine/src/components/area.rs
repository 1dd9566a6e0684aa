//! Collision area component.

use glam::Vec2;

use crate::core::comp::Comp;
use crate::math::{Origin, Rect};

/// `area(p1, p2)`: local bounding box relative to `pos`, scaled by `scale`.
///
/// Queries live on the engine: [`crate::Engine::world_area`],
/// [`crate::Engine::is_collided`], [`crate::Engine::push_out`] and friends.
pub fn area(p1: Vec2, p2: Vec2) -> Comp {
    Comp::new("area")
        .field("area", Rect::new(p1, p2))
        .inspect(|k, id| match k.world_area(id) {
            Some(r) => vec![(
                "area".to_string(),
                format!("{:.0}x{:.0}", r.width(), r.height()),
            )],
            None => Vec::new(),
        })
}

/// Local box of a `w` x `h` shape anchored at `origin`.
pub fn rect_from_size(size: Vec2, origin: Origin) -> Rect {
    let offset = origin.pt() * size * -0.5;
    Rect::new(offset - size * 0.5, offset + size * 0.5)
}

/// Area covering a `w` x `h` shape anchored at `origin`.
pub fn area_from_size(w: f32, h: f32, origin: Origin) -> Comp {
    let r = rect_from_size(Vec2::new(w, h), origin);
    area(r.p1, r.p2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_box_follows_origin() {
        let size = Vec2::new(10.0, 20.0);
        let tl = rect_from_size(size, Origin::TopLeft);
        assert_eq!(tl, Rect::new(Vec2::ZERO, size));
        let c = rect_from_size(size, Origin::Center);
        assert_eq!(c, Rect::new(Vec2::new(-5.0, -10.0), Vec2::new(5.0, 10.0)));
        let br = rect_from_size(size, Origin::BotRight);
        assert_eq!(br, Rect::new(-size, Vec2::ZERO));
    }
}
