//! Declarative component descriptions, loadable from JSON.
//!
//! Each entry is an array `[kind, arg, arg2?]`:
//!
//! ```json
//! [["sprite", "hero"], ["pos", [10, 20]], ["scale", 2], ["text", "hi", 24]]
//! ```

use glam::Vec2;
use serde::Deserialize;

use crate::components::sprite::{sprite, SpriteConf};
use crate::components::text::{text, TextConf};
use crate::components::transform::{pos, scale};
use crate::core::comp::{Comp, CompSpec};
use crate::error::{KaboomError, Result};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "serde_json::Value")]
pub enum CompDesc {
    Sprite(String),
    Pos(Vec2),
    Scale(Vec2),
    Text(String, Option<f32>),
    /// Unknown kind; becomes an empty component.
    Other(String),
}

impl CompDesc {
    pub fn to_spec(&self) -> CompSpec {
        match self {
            CompDesc::Sprite(name) => sprite(name, SpriteConf::default()).into(),
            CompDesc::Pos(p) => pos(p.x, p.y).into(),
            CompDesc::Scale(s) => scale(s.x, s.y).into(),
            CompDesc::Text(t, size) => text(t, *size, TextConf::default()).into(),
            CompDesc::Other(_) => Comp::anon().into(),
        }
    }

    /// Parse a JSON list of descriptions.
    pub fn parse_list(json: &str) -> Result<Vec<CompDesc>> {
        Ok(serde_json::from_str(json)?)
    }
}

fn bad(msg: &str) -> KaboomError {
    KaboomError::InvalidComp(msg.to_string())
}

fn vec2_of(v: &serde_json::Value) -> Option<Vec2> {
    match v {
        serde_json::Value::Number(n) => n.as_f64().map(|n| Vec2::splat(n as f32)),
        serde_json::Value::Array(a) => match a.as_slice() {
            [x, y] => Some(Vec2::new(x.as_f64()? as f32, y.as_f64()? as f32)),
            _ => None,
        },
        _ => None,
    }
}

impl TryFrom<serde_json::Value> for CompDesc {
    type Error = KaboomError;

    fn try_from(v: serde_json::Value) -> Result<Self> {
        let items = v.as_array().ok_or_else(|| bad("comp desc must be an array"))?;
        let kind = items
            .first()
            .and_then(|k| k.as_str())
            .ok_or_else(|| bad("comp desc needs a kind"))?;
        let arg = items.get(1).unwrap_or(&serde_json::Value::Null);
        let desc = match kind {
            "sprite" => CompDesc::Sprite(
                arg.as_str().ok_or_else(|| bad("sprite desc needs a name"))?.to_string(),
            ),
            "pos" => CompDesc::Pos(vec2_of(arg).ok_or_else(|| bad("pos desc needs [x, y]"))?),
            "scale" => CompDesc::Scale(vec2_of(arg).unwrap_or(Vec2::ONE)),
            "text" => CompDesc::Text(
                arg.as_str().map(str::to_string).unwrap_or_else(|| arg.to_string()),
                items.get(2).and_then(|s| s.as_f64()).map(|s| s as f32),
            ),
            other => CompDesc::Other(other.to_string()),
        };
        Ok(desc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::config::EngineConfig;
    use crate::api::engine::Engine;
    use crate::renderer::DrawList;

    #[test]
    fn parses_array_entries() {
        let descs = CompDesc::parse_list(
            r#"[["sprite", "hero"], ["pos", [10, 20]], ["scale", 2], ["text", "hi", 24], ["wobble", 1]]"#,
        )
        .unwrap();
        assert_eq!(
            descs,
            vec![
                CompDesc::Sprite("hero".into()),
                CompDesc::Pos(Vec2::new(10.0, 20.0)),
                CompDesc::Scale(Vec2::splat(2.0)),
                CompDesc::Text("hi".into(), Some(24.0)),
                CompDesc::Other("wobble".into()),
            ]
        );
    }

    #[test]
    fn rejects_malformed_pos() {
        assert!(CompDesc::parse_list(r#"[["pos", "here"]]"#).is_err());
    }

    #[test]
    fn registers_named_object() {
        let mut k = Engine::new(
            EngineConfig::default(),
            Box::new(DrawList::new(640.0, 480.0, 1.0)),
        );
        let descs = CompDesc::parse_list(r#"[["pos", [3, 4]], ["scale", [2, 1]], ["mystery"]]"#).unwrap();
        let id = k.register_named_desc("thing", &descs).unwrap();
        assert_eq!(k.named("thing"), Some(id));
        let obj = k.obj(id).unwrap();
        assert_eq!(obj.vec2("pos"), Some(Vec2::new(3.0, 4.0)));
        assert_eq!(obj.vec2("scale"), Some(Vec2::new(2.0, 1.0)));
    }
}
