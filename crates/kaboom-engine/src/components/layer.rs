//! Named layers: draw/update ordering buckets with an optional camera
//! exemption.

use std::collections::HashMap;

use crate::core::comp::Comp;

/// A declared layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerDef {
    pub alpha: f32,
    /// Sort key; layers are drawn back-to-front by ascending order.
    pub order: i32,
    /// Camera-exempt layers draw in screen space.
    pub no_cam: bool,
}

/// Layer table of the active scene.
#[derive(Debug, Clone, Default)]
pub struct LayerTable {
    layers: HashMap<String, LayerDef>,
    default: Option<String>,
}

impl LayerTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare layers in back-to-front order, optionally naming the default
    /// one used by objects without a `layer` component.
    pub fn define(&mut self, names: &[&str], default: Option<&str>) {
        for (idx, name) in names.iter().enumerate() {
            self.layers.insert(
                name.to_string(),
                LayerDef {
                    alpha: 1.0,
                    order: idx as i32 + 1,
                    no_cam: false,
                },
            );
        }
        if let Some(def) = default {
            self.default = Some(def.to_string());
        }
    }

    /// Exempt the named layers from the camera transform.
    pub fn ignore_cam(&mut self, names: &[&str]) {
        for name in names {
            if let Some(layer) = self.layers.get_mut(*name) {
                layer.no_cam = true;
            }
        }
    }

    pub fn default_layer(&self) -> Option<&str> {
        self.default.as_deref()
    }

    /// Effective layer name: the object's own, else the default.
    pub fn resolve<'a>(&'a self, layer: Option<&'a str>) -> Option<&'a str> {
        layer.or(self.default.as_deref())
    }

    pub fn get(&self, layer: Option<&str>) -> Option<&LayerDef> {
        self.resolve(layer).and_then(|name| self.layers.get(name))
    }

    /// Sort key; undeclared layers sort as 0.
    pub fn order_of(&self, layer: Option<&str>) -> i32 {
        self.get(layer).map(|l| l.order).unwrap_or(0)
    }

    pub fn is_cam_layer(&self, layer: Option<&str>) -> bool {
        !self.get(layer).map(|l| l.no_cam).unwrap_or(false)
    }

    pub fn same_layer(&self, a: Option<&str>, b: Option<&str>) -> bool {
        self.resolve(a) == self.resolve(b)
    }
}

/// `layer(name)` component: puts the object on a named layer.
pub fn layer(name: &str) -> Comp {
    Comp::new("layer")
        .field("layer", name)
        .inspect(|k, id| {
            let name = k
                .obj(id)
                .and_then(|o| o.str("layer").map(str::to_string))
                .or_else(|| k.world().layers.default_layer().map(str::to_string))
                .unwrap_or_default();
            vec![("layer".to_string(), name)]
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_follows_declaration() {
        let mut table = LayerTable::new();
        table.define(&["bg", "game", "ui"], Some("game"));
        assert!(table.order_of(Some("bg")) < table.order_of(Some("game")));
        assert!(table.order_of(Some("game")) < table.order_of(Some("ui")));
        assert_eq!(table.order_of(None), table.order_of(Some("game")));
        assert_eq!(table.order_of(Some("nope")), 0);
    }

    #[test]
    fn cam_ignore_marks_layers() {
        let mut table = LayerTable::new();
        table.define(&["game", "ui"], None);
        table.ignore_cam(&["ui"]);
        assert!(table.is_cam_layer(Some("game")));
        assert!(!table.is_cam_layer(Some("ui")));
        assert!(table.is_cam_layer(None));
    }

    #[test]
    fn same_layer_uses_default() {
        let mut table = LayerTable::new();
        table.define(&["a", "b"], Some("a"));
        assert!(table.same_layer(None, Some("a")));
        assert!(!table.same_layer(None, Some("b")));
    }
}
