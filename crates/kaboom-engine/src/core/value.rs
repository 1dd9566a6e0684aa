//! Dynamic field values stored in component namespaces.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::api::types::ObjId;
use crate::math::{Color, Quad, Rect};

/// A component field value.
///
/// Built-in components store their state as `Value`s so that every field,
/// whichever component owns it, is reachable through the object's flat
/// field surface.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Num(f32),
    Str(String),
    Vec2(Vec2),
    Color(Color),
    Rect(Rect),
    Quad(Quad),
    Obj(ObjId),
    List(Vec<Value>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// JS-style truthiness: null, false, 0 and "" are falsy.
    pub fn truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Num(n) => *n != 0.0 && !n.is_nan(),
            Value::Str(s) => !s.is_empty(),
            _ => true,
        }
    }

    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Value::Num(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_vec2(&self) -> Option<Vec2> {
        match self {
            Value::Vec2(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<Color> {
        match self {
            Value::Color(c) => Some(*c),
            _ => None,
        }
    }

    pub fn as_rect(&self) -> Option<Rect> {
        match self {
            Value::Rect(r) => Some(*r),
            _ => None,
        }
    }

    pub fn as_quad(&self) -> Option<Quad> {
        match self {
            Value::Quad(q) => Some(*q),
            _ => None,
        }
    }

    pub fn as_obj(&self) -> Option<ObjId> {
        match self {
            Value::Obj(id) => Some(*id),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Num(n) => write!(f, "{}", n),
            Value::Str(s) => write!(f, "{}", s),
            Value::Vec2(v) => write!(f, "({}, {})", v.x, v.y),
            Value::Color(c) => write!(f, "rgba({}, {}, {}, {})", c.r, c.g, c.b, c.a),
            Value::Rect(r) => write!(f, "[({}, {}), ({}, {})]", r.p1.x, r.p1.y, r.p2.x, r.p2.y),
            Value::Quad(q) => write!(f, "quad({}, {}, {}, {})", q.x, q.y, q.w, q.h),
            Value::Obj(id) => write!(f, "obj#{}", id.0),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Value::Num(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Vec2> for Value {
    fn from(v: Vec2) -> Self {
        Value::Vec2(v)
    }
}

impl From<Color> for Value {
    fn from(c: Color) -> Self {
        Value::Color(c)
    }
}

impl From<Rect> for Value {
    fn from(r: Rect) -> Self {
        Value::Rect(r)
    }
}

impl From<Quad> for Value {
    fn from(q: Quad) -> Self {
        Value::Quad(q)
    }
}

impl From<ObjId> for Value {
    fn from(id: ObjId) -> Self {
        Value::Obj(id)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthiness_follows_js() {
        assert!(!Value::Null.truthy());
        assert!(!Value::Num(0.0).truthy());
        assert!(!Value::from("").truthy());
        assert!(Value::Bool(true).truthy());
        assert!(Value::Vec2(Vec2::ZERO).truthy());
    }

    #[test]
    fn option_converts_to_null() {
        let none: Option<f32> = None;
        assert_eq!(Value::from(none), Value::Null);
        assert_eq!(Value::from(Some(2.0)), Value::Num(2.0));
    }

    #[test]
    fn serializes_through_json() {
        let v = Value::List(vec![Value::Num(1.5), Value::from("hi"), Value::Vec2(Vec2::new(1.0, 2.0))]);
        let json = serde_json::to_string(&v).unwrap();
        let back: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(back, v);
    }
}
