//! Area queries, pushout and edge-triggered contact events.
//!
//! World areas are recomputed on every query from the object's `pos`,
//! `scale` and local `area` fields; nothing is cached across frames.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use glam::Vec2;

use crate::api::engine::Engine;
use crate::api::types::{Cancel, ObjId};
use crate::core::tags::TagMatch;
use crate::error::Result;
use crate::math::{col_rect_pt, col_rect_rect, overlap_rect_rect, Rect};

/// Which side of the moved object touched the solid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

impl Side {
    pub fn name(self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
            Side::Top => "top",
            Side::Bottom => "bottom",
        }
    }
}

/// One resolved pushout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub obj: ObjId,
    pub side: Side,
    /// Signed distance the object was moved along the resolved axis.
    pub dis: f32,
}

/// Who each object touched last frame, by stable object key.
type PairMap = Rc<RefCell<HashMap<u64, HashSet<u64>>>>;

/// Replace `seen` with `touching` and return the entries that are new.
fn newly_touching(seen: &mut HashSet<u64>, touching: Vec<(u64, ObjId)>) -> Vec<ObjId> {
    let entered = touching
        .iter()
        .filter(|(key, _)| !seen.contains(key))
        .map(|(_, id)| *id)
        .collect();
    *seen = touching.into_iter().map(|(key, _)| key).collect();
    entered
}

impl Engine {
    /// Absolute area of an object, or `None` if it has no `area`.
    pub fn world_area(&self, id: ObjId) -> Option<Rect> {
        let obj = self.world.obj(id)?;
        let area = obj.get("area")?.as_rect()?;
        let pos = obj.vec2("pos").unwrap_or(Vec2::ZERO);
        let scale = obj.vec2("scale").unwrap_or(Vec2::ONE);
        Some(Rect::new(pos + area.p1 * scale, pos + area.p2 * scale).normalized())
    }

    fn area_pair(&self, a: ObjId, b: ObjId) -> Option<(Rect, Rect)> {
        if a == b || !self.world.same_layer(a, b) {
            return None;
        }
        Some((self.world_area(a)?, self.world_area(b)?))
    }

    /// Inclusive contact: touching edges count.
    pub fn is_collided(&self, a: ObjId, b: ObjId) -> bool {
        self.area_pair(a, b)
            .map(|(r1, r2)| col_rect_rect(&r1, &r2))
            .unwrap_or(false)
    }

    /// Strict overlap: touching edges do not count.
    pub fn is_overlapped(&self, a: ObjId, b: ObjId) -> bool {
        self.area_pair(a, b)
            .map(|(r1, r2)| overlap_rect_rect(&r1, &r2))
            .unwrap_or(false)
    }

    pub fn has_pt(&self, id: ObjId, pt: Vec2) -> bool {
        self.world_area(id)
            .map(|r| col_rect_pt(&r, pt))
            .unwrap_or(false)
    }

    /// Whether the mouse is over the object, in the object's layer space.
    /// On touch devices the pointer must also be down.
    pub fn is_hovered(&self, id: ObjId) -> bool {
        if self.input.is_touch && !self.input.mouse_down() {
            return false;
        }
        let pt = self.mouse_pos(self.world.layer_of(id));
        self.has_pt(id, pt)
    }

    pub fn is_clicked(&self, id: ObjId) -> bool {
        self.input.mouse_clicked() && self.is_hovered(id)
    }

    /// Move `id` out of `other` along the axis of least penetration.
    ///
    /// Candidates are compared left, right, top, bottom; a later candidate
    /// wins only if strictly smaller.
    pub fn push_out(&mut self, id: ObjId, other: ObjId) -> Option<Contact> {
        let (a1, a2) = self.area_pair(id, other)?;
        if !col_rect_rect(&a1, &a2) {
            return None;
        }
        let candidates = [
            (a1.p2.x - a2.p1.x, Side::Right, Vec2::NEG_X),
            (a2.p2.x - a1.p1.x, Side::Left, Vec2::X),
            (a1.p2.y - a2.p1.y, Side::Bottom, Vec2::NEG_Y),
            (a2.p2.y - a1.p1.y, Side::Top, Vec2::Y),
        ];
        let mut best = candidates[0];
        for c in &candidates[1..] {
            if c.0 < best.0 {
                best = *c;
            }
        }
        let (dis, side, dir) = best;
        let obj = self.world.obj_mut(id)?;
        let pos = obj.vec2("pos").unwrap_or(Vec2::ZERO);
        obj.set("pos", pos + dir * dis);
        let signed = if dir.x + dir.y < 0.0 { -dis } else { dis };
        Some(Contact {
            obj: other,
            side,
            dis: signed,
        })
    }

    /// Push `id` out of every solid object.
    pub fn push_out_all(&mut self, id: ObjId) -> Vec<Contact> {
        let solids: Vec<ObjId> = self
            .world
            .sorted_ids()
            .into_iter()
            .filter(|other| {
                self.world
                    .obj(*other)
                    .map(|o| o.flag("solid") || o.is("solid"))
                    .unwrap_or(false)
            })
            .collect();
        solids
            .into_iter()
            .filter_map(|other| self.push_out(id, other))
            .collect()
    }

    fn contacts_of(
        &self,
        id: ObjId,
        tag: &TagMatch,
        test: fn(&Engine, ObjId, ObjId) -> bool,
    ) -> Vec<(u64, ObjId)> {
        self.world
            .get(tag.clone())
            .into_iter()
            .filter(|other| test(self, id, *other))
            .filter_map(|other| Some((self.world.key_of(other)?, other)))
            .collect()
    }

    /// Shared body of `collides`/`overlaps`. An object's entry is dropped
    /// when it is destroyed.
    fn edge_triggered<F>(
        &mut self,
        t1: TagMatch,
        t2: TagMatch,
        test: fn(&Engine, ObjId, ObjId) -> bool,
        f: F,
    ) -> (Cancel, PairMap)
    where
        F: Fn(&mut Engine, ObjId, ObjId) -> Result<()> + 'static,
    {
        let pairs: PairMap = Rc::new(RefCell::new(HashMap::new()));
        let map = pairs.clone();
        let update = self.on("update", t1, move |k, id, _| {
            let Some(key) = k.world.key_of(id) else {
                return Ok(());
            };
            let touching = k.contacts_of(id, &t2, test);
            let entered = newly_touching(map.borrow_mut().entry(key).or_default(), touching);
            for other in entered {
                if k.exists(id) && k.exists(other) {
                    f(k, id, other)?;
                }
            }
            Ok(())
        });
        let map = pairs.clone();
        let forget = self.on("destroy", TagMatch::Any, move |k, id, _| {
            if let Some(key) = k.world.key_of(id) {
                map.borrow_mut().remove(&key);
            }
            Ok(())
        });
        let cancel = Cancel::many(self.world.generation, vec![update, forget]);
        (cancel, pairs)
    }

    /// Fire once when an object tagged `t1` starts touching one tagged `t2`.
    pub fn collides<F>(&mut self, t1: impl Into<TagMatch>, t2: impl Into<TagMatch>, f: F) -> Cancel
    where
        F: Fn(&mut Engine, ObjId, ObjId) -> Result<()> + 'static,
    {
        self.edge_triggered(t1.into(), t2.into(), Engine::is_collided, f).0
    }

    /// Fire once when an object tagged `t1` starts strictly overlapping one
    /// tagged `t2`.
    pub fn overlaps<F>(&mut self, t1: impl Into<TagMatch>, t2: impl Into<TagMatch>, f: F) -> Cancel
    where
        F: Fn(&mut Engine, ObjId, ObjId) -> Result<()> + 'static,
    {
        self.edge_triggered(t1.into(), t2.into(), Engine::is_overlapped, f).0
    }

    /// Per-object form of [`Engine::collides`].
    pub fn obj_collides<F>(&mut self, id: ObjId, tag: impl Into<TagMatch>, f: F) -> Result<Cancel>
    where
        F: Fn(&mut Engine, ObjId, ObjId) -> Result<()> + 'static,
    {
        self.obj_edge_triggered(id, tag.into(), Engine::is_collided, f)
    }

    /// Per-object form of [`Engine::overlaps`].
    pub fn obj_overlaps<F>(&mut self, id: ObjId, tag: impl Into<TagMatch>, f: F) -> Result<Cancel>
    where
        F: Fn(&mut Engine, ObjId, ObjId) -> Result<()> + 'static,
    {
        self.obj_edge_triggered(id, tag.into(), Engine::is_overlapped, f)
    }

    fn obj_edge_triggered<F>(
        &mut self,
        id: ObjId,
        tag: TagMatch,
        test: fn(&Engine, ObjId, ObjId) -> bool,
        f: F,
    ) -> Result<Cancel>
    where
        F: Fn(&mut Engine, ObjId, ObjId) -> Result<()> + 'static,
    {
        let seen: Rc<RefCell<HashSet<u64>>> = Rc::new(RefCell::new(HashSet::new()));
        self.obj_action(id, move |k, id| {
            let touching = k.contacts_of(id, &tag, test);
            let entered = newly_touching(&mut seen.borrow_mut(), touching);
            for other in entered {
                if k.exists(id) && k.exists(other) {
                    f(k, id, other)?;
                }
            }
            Ok(())
        })
    }

    /// Every frame an object tagged `tag` is clicked.
    pub fn clicks<F>(&mut self, tag: impl Into<TagMatch>, f: F) -> Cancel
    where
        F: Fn(&mut Engine, ObjId) -> Result<()> + 'static,
    {
        self.on("update", tag, move |k, id, _| {
            if k.is_clicked(id) {
                f(k, id)
            } else {
                Ok(())
            }
        })
    }

    /// Every frame an object tagged `tag` is hovered.
    pub fn hovers<F>(&mut self, tag: impl Into<TagMatch>, f: F) -> Cancel
    where
        F: Fn(&mut Engine, ObjId) -> Result<()> + 'static,
    {
        self.on("update", tag, move |k, id, _| {
            if k.is_hovered(id) {
                f(k, id)
            } else {
                Ok(())
            }
        })
    }

    pub fn obj_clicks<F>(&mut self, id: ObjId, f: F) -> Result<Cancel>
    where
        F: Fn(&mut Engine, ObjId) -> Result<()> + 'static,
    {
        self.obj_action(id, move |k, id| {
            if k.is_clicked(id) {
                f(k, id)
            } else {
                Ok(())
            }
        })
    }

    /// Per-object hover with an optional not-hovered callback.
    pub fn obj_hovers<F, G>(&mut self, id: ObjId, on_hover: F, on_leave: Option<G>) -> Result<Cancel>
    where
        F: Fn(&mut Engine, ObjId) -> Result<()> + 'static,
        G: Fn(&mut Engine, ObjId) -> Result<()> + 'static,
    {
        self.obj_action(id, move |k, id| {
            if k.is_hovered(id) {
                on_hover(k, id)
            } else if let Some(g) = &on_leave {
                g(k, id)
            } else {
                Ok(())
            }
        })
    }
}
