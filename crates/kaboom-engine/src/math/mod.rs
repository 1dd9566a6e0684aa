// math/mod.rs
//
// Scalar helpers and value types shared by every layer of the engine.
// All value types are Copy; transforms return new values.

pub mod color;
pub mod rect;
pub mod rng;

use glam::Vec2;
use serde::{Deserialize, Serialize};

pub use color::Color;
pub use rect::{col_rect_pt, col_rect_rect, overlap_rect_rect, Rect};
pub use rng::Rng;

pub fn deg2rad(deg: f32) -> f32 {
    deg * std::f32::consts::PI / 180.0
}

pub fn rad2deg(rad: f32) -> f32 {
    rad * 180.0 / std::f32::consts::PI
}

/// Clamp that tolerates `min > max` by swapping the bounds.
pub fn clamp(val: f32, min: f32, max: f32) -> f32 {
    if min > max {
        return clamp(val, max, min);
    }
    val.max(min).min(max)
}

/// Linear interpolation between `a` and `b` by `t`. `t` is not clamped.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[inline]
pub fn lerp_vec2(a: Vec2, b: Vec2, t: f32) -> Vec2 {
    Vec2::new(lerp(a.x, b.x, t), lerp(a.y, b.y, t))
}

/// Map `v` from the range `[l1, h1]` into `[l2, h2]`.
pub fn map(v: f32, l1: f32, h1: f32, l2: f32, h2: f32) -> f32 {
    l2 + (v - l1) / (h1 - l1) * (h2 - l2)
}

/// Like [`map`], but clamps the result into the target range.
pub fn mapc(v: f32, l1: f32, h1: f32, l2: f32, h2: f32) -> f32 {
    clamp(map(v, l1, h1, l2, h2), l2, h2)
}

/// Sine wave oscillating between `lo` and `hi` over time `t`.
pub fn wave(lo: f32, hi: f32, t: f32) -> f32 {
    lo + (t.sin() + 1.0) / 2.0 * (hi - lo)
}

/// Unit vector pointing at `angle` radians.
pub fn vec2_from_angle(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// A sub-rectangle of a texture in normalized UV space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quad {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Quad {
    /// The full texture.
    pub const FULL: Quad = Quad { x: 0.0, y: 0.0, w: 1.0, h: 1.0 };

    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Select `other` (expressed relative to this quad) inside this quad.
    pub fn scale(self, other: Quad) -> Quad {
        Quad {
            x: self.x + self.w * other.x,
            y: self.y + self.h * other.y,
            w: self.w * other.w,
            h: self.h * other.h,
        }
    }
}

impl Default for Quad {
    fn default() -> Self {
        Self::FULL
    }
}

/// Anchor point of a drawn or collided shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    #[default]
    TopLeft,
    Top,
    TopRight,
    Left,
    Center,
    Right,
    BotLeft,
    Bot,
    BotRight,
}

impl Origin {
    /// Anchor in the `[-1, 1]` box, y down.
    pub fn pt(self) -> Vec2 {
        match self {
            Origin::TopLeft => Vec2::new(-1.0, -1.0),
            Origin::Top => Vec2::new(0.0, -1.0),
            Origin::TopRight => Vec2::new(1.0, -1.0),
            Origin::Left => Vec2::new(-1.0, 0.0),
            Origin::Center => Vec2::new(0.0, 0.0),
            Origin::Right => Vec2::new(1.0, 0.0),
            Origin::BotLeft => Vec2::new(-1.0, 1.0),
            Origin::Bot => Vec2::new(0.0, 1.0),
            Origin::BotRight => Vec2::new(1.0, 1.0),
        }
    }

    pub fn from_name(name: &str) -> Option<Origin> {
        Some(match name {
            "topleft" => Origin::TopLeft,
            "top" => Origin::Top,
            "topright" => Origin::TopRight,
            "left" => Origin::Left,
            "center" => Origin::Center,
            "right" => Origin::Right,
            "botleft" => Origin::BotLeft,
            "bot" => Origin::Bot,
            "botright" => Origin::BotRight,
            _ => return None,
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            Origin::TopLeft => "topleft",
            Origin::Top => "top",
            Origin::TopRight => "topright",
            Origin::Left => "left",
            Origin::Center => "center",
            Origin::Right => "right",
            Origin::BotLeft => "botleft",
            Origin::Bot => "bot",
            Origin::BotRight => "botright",
        }
    }

    /// Offset from the anchor to the top-left corner of a `size` box.
    pub fn offset(self, size: Vec2) -> Vec2 {
        (self.pt() + Vec2::ONE) * size * -0.5
    }
}
