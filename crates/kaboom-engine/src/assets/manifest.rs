use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Printable ASCII, the default glyph order of grid fonts.
pub const ASCII_CHARS: &str =
    " !\"#$%&'()*+,-./0123456789:;<=>?@ABCDEFGHIJKLMNOPQRSTUVWXYZ[\\]^_`abcdefghijklmnopqrstuvwxyz{|}~";

/// Asset manifest describing every sprite, font and sound a game loads.
/// Loaded from a JSON file at runtime; paths are relative to `root`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetManifest {
    #[serde(default)]
    pub root: String,
    #[serde(default)]
    pub sprites: HashMap<String, SpriteDescriptor>,
    #[serde(default)]
    pub fonts: HashMap<String, FontDescriptor>,
    #[serde(default)]
    pub sounds: HashMap<String, SoundDescriptor>,
}

/// A sprite sheet sliced into a grid of frames.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpriteDescriptor {
    pub path: String,
    /// Frames per row (default: 1).
    #[serde(default = "default_slice")]
    pub slice_x: u32,
    /// Frames per column (default: 1).
    #[serde(default = "default_slice")]
    pub slice_y: u32,
    #[serde(default)]
    pub anims: HashMap<String, AnimRange>,
}

/// Inclusive frame range of a named animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimRange {
    pub from: usize,
    pub to: usize,
}

/// A grid glyph atlas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FontDescriptor {
    pub path: String,
    pub glyph_width: u32,
    pub glyph_height: u32,
    #[serde(default = "default_chars")]
    pub chars: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoundDescriptor {
    pub path: String,
}

fn default_slice() -> u32 {
    1
}

fn default_chars() -> String {
    ASCII_CHARS.to_string()
}

impl AssetManifest {
    /// Parse a manifest from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
