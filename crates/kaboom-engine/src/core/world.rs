//! The live simulation state of one scene.
//!
//! A `World` is created at engine start and replaced wholesale on every
//! scene transition. Objects are owned here and referenced everywhere else
//! by [`ObjId`].

use std::collections::HashMap;

use glam::{Mat4, Vec2};

use crate::api::types::{Action, EventListener, ObjId, TagListener, Timer};
use crate::components::layer::LayerTable;
use crate::core::object::GameObject;
use crate::core::registry::IdList;
use crate::core::tags::TagMatch;
use crate::core::value::Value;
use crate::renderer::camera::Camera;

/// Default gravity, in world units per second squared.
pub const DEF_GRAVITY: f32 = 980.0;

pub struct World {
    /// Bumped on every replacement; disposers from older worlds are inert.
    pub(crate) generation: u64,
    pub(crate) objs: IdList<GameObject>,
    /// Global events (`input`, `load`, `nextFrame`, touch events...).
    pub(crate) events: HashMap<String, IdList<EventListener>>,
    /// Tag-scoped object events registered with `on(event, tag, cb)`.
    pub(crate) obj_events: HashMap<String, IdList<TagListener>>,
    pub(crate) actions: IdList<Action>,
    pub(crate) renders: IdList<Action>,
    pub(crate) timers: IdList<Timer>,
    pub cam: Camera,
    pub(crate) cam_matrix: Mat4,
    /// Mouse position mapped through last frame's camera matrix.
    pub(crate) cam_mouse_pos: Vec2,
    pub layers: LayerTable,
    pub gravity: f32,
    /// Free-form scene data bag.
    pub data: HashMap<String, Value>,
    pub(crate) named: HashMap<String, ObjId>,
    /// Current handle of every readded object, by stable key.
    pub(crate) rehomed: HashMap<u64, ObjId>,
    /// Objects this peer mirrors to others.
    pub(crate) travelers: Vec<ObjId>,
    /// Objects mirrored from other peers: peer id -> remote id -> local object.
    pub(crate) visitors: HashMap<String, HashMap<u64, ObjId>>,
}

impl World {
    /// A fresh world. Object handles start at `first_obj` so handles from a
    /// previous scene can never alias objects in this one.
    pub fn new(generation: u64, first_obj: u64, screen: Vec2, mouse: Vec2) -> Self {
        Self {
            generation,
            objs: IdList::starting_at(first_obj),
            events: HashMap::new(),
            obj_events: HashMap::new(),
            actions: IdList::new(),
            renders: IdList::new(),
            timers: IdList::new(),
            cam: Camera::new(screen),
            cam_matrix: Mat4::IDENTITY,
            cam_mouse_pos: mouse,
            layers: LayerTable::new(),
            gravity: DEF_GRAVITY,
            data: HashMap::new(),
            named: HashMap::new(),
            rehomed: HashMap::new(),
            travelers: Vec::new(),
            visitors: HashMap::new(),
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn obj(&self, id: ObjId) -> Option<&GameObject> {
        self.objs.get(id.0)
    }

    pub fn obj_mut(&mut self, id: ObjId) -> Option<&mut GameObject> {
        self.objs.get_mut(id.0)
    }

    pub fn exists(&self, id: ObjId) -> bool {
        self.objs.contains(id.0)
    }

    /// Live handle of the object first added as `key`.
    pub(crate) fn resolve(&self, key: u64) -> Option<ObjId> {
        let id = self.rehomed.get(&key).copied().unwrap_or(ObjId(key));
        self.objs.get(id.0).filter(|o| o.key == key).map(|_| id)
    }

    pub(crate) fn key_of(&self, id: ObjId) -> Option<u64> {
        self.obj(id).map(|o| o.key)
    }

    pub fn obj_count(&self) -> usize {
        self.objs.len()
    }

    /// Next object handle this world will assign.
    pub fn next_obj_id(&self) -> u64 {
        self.objs.last_id()
    }

    pub fn cam_matrix(&self) -> Mat4 {
        self.cam_matrix
    }

    pub fn named(&self, name: &str) -> Option<ObjId> {
        self.named.get(name).copied()
    }

    /// Layer name an object sits on (its own `layer` field, if any).
    pub fn layer_of(&self, id: ObjId) -> Option<&str> {
        self.obj(id).and_then(|o| o.str("layer"))
    }

    /// Live objects in insertion order.
    pub fn ids(&self) -> Vec<ObjId> {
        self.objs.handles().into_iter().map(ObjId).collect()
    }

    /// Live objects sorted by layer order. The sort is stable, so insertion
    /// order holds within a layer.
    pub fn sorted_ids(&self) -> Vec<ObjId> {
        let mut ids: Vec<(i32, ObjId)> = self
            .objs
            .iter()
            .map(|(h, o)| (self.layers.order_of(o.str("layer")), ObjId(h)))
            .collect();
        ids.sort_by_key(|(order, _)| *order);
        ids.into_iter().map(|(_, id)| id).collect()
    }

    /// Layer-sorted objects matching `tag`.
    pub fn get(&self, tag: impl Into<TagMatch>) -> Vec<ObjId> {
        let tag = tag.into();
        self.sorted_ids()
            .into_iter()
            .filter(|id| self.obj(*id).map(|o| o.matches(&tag)).unwrap_or(false))
            .collect()
    }

    pub fn same_layer(&self, a: ObjId, b: ObjId) -> bool {
        self.layers.same_layer(self.layer_of(a), self.layer_of(b))
    }

    pub fn is_cam_layer(&self, layer: Option<&str>) -> bool {
        self.layers.is_cam_layer(layer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comps;
    use crate::components::layer::layer;

    fn world() -> World {
        World::new(0, 0, Vec2::new(640.0, 480.0), Vec2::ZERO)
    }

    fn spawn(w: &mut World, specs: Vec<crate::core::comp::CompSpec>) -> ObjId {
        let mut obj = GameObject::build(specs).unwrap();
        let id = ObjId(w.objs.last_id());
        obj.id = Some(id);
        obj.key = id.0;
        w.objs.push(obj);
        id
    }

    #[test]
    fn get_filters_by_tag() {
        let mut w = world();
        let a = spawn(&mut w, comps!["enemy"]);
        let _b = spawn(&mut w, comps!["hero"]);
        let c = spawn(&mut w, comps!["enemy"]);
        assert_eq!(w.get("enemy"), vec![a, c]);
        assert_eq!(w.get("*").len(), 3);
    }

    #[test]
    fn sorted_ids_respect_layer_order_stably() {
        let mut w = world();
        w.layers.define(&["bg", "game", "ui"], Some("game"));
        let ui = spawn(&mut w, comps![layer("ui")]);
        let g1 = spawn(&mut w, comps![]);
        let bg = spawn(&mut w, comps![layer("bg")]);
        let g2 = spawn(&mut w, comps![layer("game")]);
        assert_eq!(w.sorted_ids(), vec![bg, g1, g2, ui]);
    }

    #[test]
    fn new_world_continues_object_numbering() {
        let w = World::new(1, 42, Vec2::ONE, Vec2::ZERO);
        assert_eq!(w.next_obj_id(), 42);
        assert_eq!(w.gravity, DEF_GRAVITY);
    }
}
