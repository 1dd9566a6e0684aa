//! Game objects and their two-tier field storage.
//!
//! Every keyed component owns a [`CompState`] namespace; anonymous
//! components share the object's custom namespace. A per-object accessor
//! table, filled while components attach, maps each field name to the
//! namespace that stores it, so the object exposes one flat field surface
//! while each component keeps its own state.

use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::api::types::{Inspector, Method, ObjId, ObjListener};
use crate::core::comp::{is_comp_event, Comp, CompSpec, Member};
use crate::core::registry::{Handle, IdList};
use crate::core::tags::TagMatch;
use crate::core::value::Value;
use crate::error::{KaboomError, Result};

/// Storage namespace of one component.
#[derive(Clone, Default)]
pub struct CompState {
    key: Option<String>,
    require: Vec<String>,
    fields: HashMap<String, Value>,
    methods: HashMap<String, Method>,
}

impl CompState {
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(field.into(), value.into());
    }

    pub fn method(&self, name: &str) -> Option<Method> {
        self.methods.get(name).cloned()
    }

    pub fn fields(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Keyed(usize),
    Custom,
}

/// Per-object event bus: one ordered listener list per event name.
#[derive(Clone, Default)]
pub(crate) struct EventBus {
    events: HashMap<String, IdList<ObjListener>>,
    inspectors: IdList<Inspector>,
}

impl EventBus {
    pub fn on(&mut self, event: &str, cb: ObjListener) -> Handle {
        self.events.entry(event.to_string()).or_default().push(cb)
    }

    pub fn on_inspect(&mut self, f: Inspector) -> Handle {
        self.inspectors.push(f)
    }

    pub fn remove(&mut self, event: &str, id: Handle) {
        if let Some(list) = self.events.get_mut(event) {
            list.delete(id);
        }
    }

    pub fn listeners(&self, event: &str) -> Vec<ObjListener> {
        self.events.get(event).map(IdList::snapshot).unwrap_or_default()
    }

    pub fn inspectors(&self) -> Vec<Inspector> {
        self.inspectors.snapshot()
    }
}

/// Serializable view of an object, used for network mirroring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjSnapshot {
    /// The object's first handle, which `readd` does not change.
    pub id: Option<ObjId>,
    pub tags: Vec<String>,
    pub fields: BTreeMap<String, Value>,
}

/// The addressable simulation unit.
#[derive(Clone, Default)]
pub struct GameObject {
    pub(crate) id: Option<ObjId>,
    /// First handle the object was added under. Survives `readd`.
    pub(crate) key: u64,
    /// Hidden objects are skipped by the draw pass.
    pub hidden: bool,
    /// Paused objects are skipped by the update pass.
    pub paused: bool,
    tags: Vec<String>,
    states: Vec<CompState>,
    custom: CompState,
    accessors: HashMap<String, Slot>,
    pub(crate) events: EventBus,
}

impl GameObject {
    /// Build an object from a construction list. Tags and components are
    /// attached in order; dependency checks run once everything is attached.
    pub(crate) fn build(specs: Vec<CompSpec>) -> Result<Self> {
        let mut obj = GameObject::default();
        for spec in specs {
            obj.use_spec(spec)?;
        }
        obj.check_requires()?;
        Ok(obj)
    }

    /// Handle in the live registry; `None` once destroyed.
    pub fn id(&self) -> Option<ObjId> {
        self.id
    }

    pub fn exists(&self) -> bool {
        self.id.is_some()
    }

    pub fn is(&self, tag: impl Into<TagMatch>) -> bool {
        tag.into().matches(&self.tags)
    }

    pub(crate) fn matches(&self, tag: &TagMatch) -> bool {
        tag.matches(&self.tags)
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn add_tag(&mut self, tag: impl Into<String>) {
        let tag = tag.into();
        if !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
    }

    pub fn rm_tag(&mut self, tag: &str) {
        self.tags.retain(|t| t != tag);
    }

    /// Namespace of the keyed component `key`.
    pub fn c(&self, key: &str) -> Option<&CompState> {
        self.states.iter().find(|s| s.key() == Some(key))
    }

    pub fn c_mut(&mut self, key: &str) -> Option<&mut CompState> {
        self.states.iter_mut().find(|s| s.key() == Some(key))
    }

    pub fn has_comp(&self, key: &str) -> bool {
        self.c(key).is_some()
    }

    /// Whether a field accessor is installed for `field`.
    pub fn has(&self, field: &str) -> bool {
        self.accessors.contains_key(field)
    }

    /// Read a field through the accessor table.
    pub fn get(&self, field: &str) -> Option<&Value> {
        match self.accessors.get(field)? {
            Slot::Keyed(idx) => self.states[*idx].fields.get(field),
            Slot::Custom => self.custom.fields.get(field),
        }
    }

    /// Write a field through the accessor table. Unknown fields are created
    /// in the custom namespace.
    pub fn set(&mut self, field: &str, value: impl Into<Value>) {
        let slot = *self
            .accessors
            .entry(field.to_string())
            .or_insert(Slot::Custom);
        self.namespace_mut(slot).fields.insert(field.to_string(), value.into());
    }

    pub fn num(&self, field: &str) -> Option<f32> {
        self.get(field).and_then(Value::as_f32)
    }

    pub fn vec2(&self, field: &str) -> Option<Vec2> {
        self.get(field).and_then(Value::as_vec2)
    }

    pub fn str(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(Value::as_str)
    }

    /// Truthiness of a field; missing fields are false.
    pub fn flag(&self, field: &str) -> bool {
        self.get(field).map(Value::truthy).unwrap_or(false)
    }

    /// Look up a callable method through the accessor table.
    pub fn method(&self, name: &str) -> Option<Method> {
        match self.accessors.get(name)? {
            Slot::Keyed(idx) => self.states[*idx].method(name),
            Slot::Custom => self.custom.method(name),
        }
    }

    pub fn snapshot(&self) -> ObjSnapshot {
        let fields = self
            .accessors
            .keys()
            .filter_map(|k| self.get(k).map(|v| (k.clone(), v.clone())))
            .collect();
        ObjSnapshot {
            id: self.id.map(|_| ObjId(self.key)),
            tags: self.tags.clone(),
            fields,
        }
    }

    pub(crate) fn use_spec(&mut self, spec: CompSpec) -> Result<()> {
        match spec {
            CompSpec::Tag(tag) => self.add_tag(tag),
            CompSpec::Comp(comp) => self.attach(comp)?,
            CompSpec::None => {}
        }
        Ok(())
    }

    /// Install a component. Re-using a key replaces that namespace in place.
    ///
    /// `inspect` only accepts an inspector; a function or hook under that
    /// name is rejected before anything is attached.
    fn attach(&mut self, comp: Comp) -> Result<()> {
        let bad_inspect = comp
            .members
            .iter()
            .any(|(name, m)| name == "inspect" && !matches!(m, Member::Inspect(_)));
        if bad_inspect {
            return Err(KaboomError::InvalidComp(format!(
                "{}: \"inspect\" must be an inspector",
                comp.id.as_deref().unwrap_or("anonymous comp")
            )));
        }

        let slot = match comp.id {
            Some(key) => {
                let fresh = CompState {
                    key: Some(key.clone()),
                    require: comp.require,
                    ..Default::default()
                };
                match self.states.iter().position(|s| s.key() == Some(&key)) {
                    Some(idx) => {
                        self.states[idx] = fresh;
                        Slot::Keyed(idx)
                    }
                    None => {
                        self.states.push(fresh);
                        Slot::Keyed(self.states.len() - 1)
                    }
                }
            }
            None => Slot::Custom,
        };

        for (name, member) in comp.members {
            match member {
                Member::Hook(cb) => {
                    self.events.on(&name, cb);
                    continue;
                }
                Member::Inspect(f) => {
                    self.events.on_inspect(f);
                    continue;
                }
                Member::Func(f) if is_comp_event(&name) => {
                    let cb: ObjListener = Rc::new(move |k, id, args| f(k, id, args).map(|_| ()));
                    self.events.on(&name, cb);
                    continue;
                }
                Member::Func(f) => {
                    self.namespace_mut(slot).methods.insert(name.clone(), f);
                }
                Member::Data(v) => {
                    self.namespace_mut(slot).fields.insert(name.clone(), v);
                }
            }
            // First installed accessor wins; storage stays with its owner.
            self.accessors.entry(name).or_insert(slot);
        }
        Ok(())
    }

    fn check_requires(&self) -> Result<()> {
        for state in &self.states {
            for dep in &state.require {
                if !self.has_comp(dep) {
                    return Err(KaboomError::MissingDependency {
                        comp: state.key.clone().unwrap_or_default(),
                        dep: dep.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    fn namespace_mut(&mut self, slot: Slot) -> &mut CompState {
        match slot {
            Slot::Keyed(idx) => &mut self.states[idx],
            Slot::Custom => &mut self.custom,
        }
    }
}
