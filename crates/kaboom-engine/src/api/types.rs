use std::cell::Cell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::api::engine::Engine;
use crate::core::registry::Handle;
use crate::core::tags::TagMatch;
use crate::core::value::Value;
use crate::error::Result;

/// Identifies a game object in the live world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjId(pub u64);

/// Per-object event callback. Receives the owning object's handle and the
/// event payload.
pub type ObjListener = Rc<dyn Fn(&mut Engine, ObjId, &[Value]) -> Result<()>>;

/// Global (untagged) event callback.
pub type EventListener = Rc<dyn Fn(&mut Engine, &[Value]) -> Result<()>>;

/// Untagged per-frame action / render callback, timer body.
pub type Action = Rc<dyn Fn(&mut Engine) -> Result<()>>;

/// Callable method a component installs on its object.
pub type Method = Rc<dyn Fn(&mut Engine, ObjId, &[Value]) -> Result<Value>>;

/// Inspector contributing `(label, value)` lines to the debug overlay.
pub type Inspector = Rc<dyn Fn(&Engine, ObjId) -> Vec<(String, String)>>;

/// Scene constructor; receives the arguments passed to `go`.
pub type SceneFn = Rc<dyn Fn(&mut Engine, &[Value]) -> Result<()>>;

/// A listener registered with `on(event, tag, cb)`.
#[derive(Clone)]
pub struct TagListener {
    pub tag: TagMatch,
    pub cb: ObjListener,
}

/// A countdown timer.
#[derive(Clone)]
pub struct Timer {
    pub time: f32,
    pub cb: Action,
}

/// Disposer returned by every subscription.
///
/// Cancelling removes the registry entry. Cancelling twice, or after the
/// scene that owned the entry has been replaced, does nothing.
#[derive(Clone)]
pub struct Cancel {
    pub(crate) generation: u64,
    pub(crate) target: CancelTarget,
}

#[derive(Clone)]
pub(crate) enum CancelTarget {
    Event { event: String, id: Handle },
    TagEvent { event: String, id: Handle },
    /// `obj` is the object's stable key, so the disposer still works after
    /// a `readd`.
    ObjEvent { obj: u64, event: String, id: Handle },
    Action(Handle),
    Render(Handle),
    Timer(Handle),
    Flag(Rc<Cell<bool>>),
    Many(Vec<Cancel>),
}

impl Cancel {
    pub(crate) fn new(generation: u64, target: CancelTarget) -> Self {
        Self { generation, target }
    }

    pub(crate) fn many(generation: u64, list: Vec<Cancel>) -> Self {
        Self::new(generation, CancelTarget::Many(list))
    }

    /// Remove the subscription.
    pub fn cancel(&self, engine: &mut Engine) {
        if let CancelTarget::Flag(stopped) = &self.target {
            stopped.set(true);
            return;
        }
        if let CancelTarget::Many(list) = &self.target {
            for c in list {
                c.cancel(engine);
            }
            return;
        }
        let world = engine.world_mut();
        if world.generation != self.generation {
            return;
        }
        match &self.target {
            CancelTarget::Event { event, id } => {
                if let Some(list) = world.events.get_mut(event) {
                    list.delete(*id);
                }
            }
            CancelTarget::TagEvent { event, id } => {
                if let Some(list) = world.obj_events.get_mut(event) {
                    list.delete(*id);
                }
            }
            CancelTarget::ObjEvent { obj, event, id } => {
                if let Some(o) = world.resolve(*obj).and_then(|cur| world.objs.get_mut(cur.0)) {
                    o.events.remove(event, *id);
                }
            }
            CancelTarget::Action(id) => {
                world.actions.delete(*id);
            }
            CancelTarget::Render(id) => {
                world.renders.delete(*id);
            }
            CancelTarget::Timer(id) => {
                world.timers.delete(*id);
            }
            CancelTarget::Flag(_) | CancelTarget::Many(_) => {}
        }
    }
}
