use std::collections::HashMap;
use std::rc::Rc;

use crate::api::engine::Engine;
use crate::api::types::SceneFn;
use crate::core::value::Value;
use crate::error::{KaboomError, Result};

/// Named scene constructors.
/// A scene is a function that populates a fresh world; `go` swaps the world
/// and runs it at the next frame boundary.
#[derive(Default)]
pub struct SceneRegistry {
    scenes: HashMap<String, SceneFn>,
}

impl SceneRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a scene constructor.
    pub fn register<F>(&mut self, id: impl Into<String>, f: F)
    where
        F: Fn(&mut Engine, &[Value]) -> Result<()> + 'static,
    {
        self.scenes.insert(id.into(), Rc::new(f));
    }

    pub fn get(&self, id: &str) -> Result<SceneFn> {
        self.scenes
            .get(id)
            .cloned()
            .ok_or_else(|| KaboomError::SceneNotFound(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.scenes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_and_get() {
        let mut reg = SceneRegistry::new();
        reg.register("main", |_, _| Ok(()));
        assert!(reg.contains("main"));
        assert!(reg.get("main").is_ok());
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn unknown_scene_errors() {
        let reg = SceneRegistry::new();
        match reg.get("nope") {
            Err(KaboomError::SceneNotFound(id)) => assert_eq!(id, "nope"),
            _ => panic!("expected SceneNotFound"),
        }
    }
}
