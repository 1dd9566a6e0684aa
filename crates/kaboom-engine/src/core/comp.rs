//! Component descriptions.
//!
//! A [`Comp`] is a bundle of fields, methods and lifecycle hooks. Keyed
//! components get their own namespace on the object; anonymous ones merge
//! into the object's shared custom namespace. Bare strings in a construction
//! list become tags.

use std::rc::Rc;

use crate::api::engine::Engine;
use crate::api::types::{Inspector, Method, ObjId, ObjListener};
use crate::core::value::Value;
use crate::error::Result;

/// Lifecycle hook names. Functions with these names are registered on the
/// object's event bus instead of becoming methods.
pub const COMP_EVENTS: [&str; 6] = ["add", "load", "update", "draw", "destroy", "inspect"];

pub fn is_comp_event(name: &str) -> bool {
    COMP_EVENTS.contains(&name)
}

#[derive(Clone)]
pub(crate) enum Member {
    Data(Value),
    /// Classified at attach time: hook if the name is a lifecycle event,
    /// method otherwise.
    Func(Method),
    Hook(ObjListener),
    Inspect(Inspector),
}

/// A component: optional key, dependency list and members.
#[derive(Clone, Default)]
pub struct Comp {
    pub(crate) id: Option<String>,
    pub(crate) require: Vec<String>,
    pub(crate) members: Vec<(String, Member)>,
}

impl Comp {
    /// A keyed component with its own namespace.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Default::default()
        }
    }

    /// An anonymous component; its fields land in the shared custom namespace.
    pub fn anon() -> Self {
        Self::default()
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Declare components that must also be present on the object.
    pub fn require(mut self, deps: &[&str]) -> Self {
        self.require.extend(deps.iter().map(|d| d.to_string()));
        self
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.members.push((name.into(), Member::Data(value.into())));
        self
    }

    /// Initial value of a data member; the last one wins.
    pub fn data(&self, name: &str) -> Option<&Value> {
        self.members.iter().rev().find_map(|(n, m)| match m {
            Member::Data(v) if n == name => Some(v),
            _ => None,
        })
    }

    /// A function member. Named like a lifecycle event it becomes a hook
    /// (its return value is ignored); otherwise a callable method.
    pub fn func<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&mut Engine, ObjId, &[Value]) -> Result<Value> + 'static,
    {
        self.members.push((name.into(), Member::Func(Rc::new(f))));
        self
    }

    /// Register a handler for any event name on the owning object.
    pub fn on<F>(mut self, event: impl Into<String>, f: F) -> Self
    where
        F: Fn(&mut Engine, ObjId) -> Result<()> + 'static,
    {
        let listener: ObjListener = Rc::new(move |k, id, _| f(k, id));
        self.members.push((event.into(), Member::Hook(listener)));
        self
    }

    pub fn on_add<F>(self, f: F) -> Self
    where
        F: Fn(&mut Engine, ObjId) -> Result<()> + 'static,
    {
        self.on("add", f)
    }

    pub fn on_load<F>(self, f: F) -> Self
    where
        F: Fn(&mut Engine, ObjId) -> Result<()> + 'static,
    {
        self.on("load", f)
    }

    pub fn on_update<F>(self, f: F) -> Self
    where
        F: Fn(&mut Engine, ObjId) -> Result<()> + 'static,
    {
        self.on("update", f)
    }

    pub fn on_draw<F>(self, f: F) -> Self
    where
        F: Fn(&mut Engine, ObjId) -> Result<()> + 'static,
    {
        self.on("draw", f)
    }

    pub fn on_destroy<F>(self, f: F) -> Self
    where
        F: Fn(&mut Engine, ObjId) -> Result<()> + 'static,
    {
        self.on("destroy", f)
    }

    pub fn inspect<F>(mut self, f: F) -> Self
    where
        F: Fn(&Engine, ObjId) -> Vec<(String, String)> + 'static,
    {
        self.members.push(("inspect".to_string(), Member::Inspect(Rc::new(f))));
        self
    }
}

/// One entry of an object construction list.
#[derive(Clone)]
pub enum CompSpec {
    Tag(String),
    Comp(Comp),
    /// Skipped; lets optional components sit in a list.
    None,
}

impl From<&str> for CompSpec {
    fn from(tag: &str) -> Self {
        CompSpec::Tag(tag.to_string())
    }
}

impl From<String> for CompSpec {
    fn from(tag: String) -> Self {
        CompSpec::Tag(tag)
    }
}

impl From<Comp> for CompSpec {
    fn from(comp: Comp) -> Self {
        CompSpec::Comp(comp)
    }
}

impl From<Option<Comp>> for CompSpec {
    fn from(comp: Option<Comp>) -> Self {
        comp.map(CompSpec::Comp).unwrap_or(CompSpec::None)
    }
}

/// Build a `Vec<CompSpec>` from mixed tags and components.
///
/// ```ignore
/// k.add(comps![pos(10.0, 20.0), area(p1, p2), "player"])?;
/// ```
#[macro_export]
macro_rules! comps {
    ($($c:expr),* $(,)?) => {
        vec![$($crate::core::comp::CompSpec::from($c)),*]
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hook_names_are_recognized() {
        assert!(is_comp_event("update"));
        assert!(is_comp_event("inspect"));
        assert!(!is_comp_event("jump"));
    }

    #[test]
    fn builder_collects_members() {
        let c = Comp::new("health")
            .require(&["pos"])
            .field("hp", 10.0)
            .on_update(|_, _| Ok(()));
        assert_eq!(c.id(), Some("health"));
        assert_eq!(c.require, vec!["pos".to_string()]);
        assert_eq!(c.members.len(), 2);
    }

    #[test]
    fn specs_from_mixed_values() {
        let list: Vec<CompSpec> = comps!["enemy", Comp::anon(), None::<Comp>];
        assert!(matches!(list[0], CompSpec::Tag(ref t) if t == "enemy"));
        assert!(matches!(list[1], CompSpec::Comp(_)));
        assert!(matches!(list[2], CompSpec::None));
    }
}
