use serde::{Deserialize, Serialize};

use crate::math::Color;

/// Engine configuration, provided by the game (or parsed from the host's
/// JSON).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Canvas width in game units (default: 640).
    pub width: f32,
    /// Canvas height in game units (default: 480).
    pub height: f32,
    /// Pixels per game unit (default: 1).
    pub scale: f32,
    /// Register the debug keybindings (f1, f2, f7-f10).
    pub debug: bool,
    /// Debug log capacity (default: 8).
    pub log_max: usize,
    pub clear_color: Option<Color>,
    /// Relay URL; the host opens the transport when set.
    pub connect: Option<String>,
    /// Outline color of the inspect overlay.
    pub inspect_color: Color,
    pub rng_seed: u64,
    /// Let touches drive the mouse state.
    pub touch_to_mouse: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: 640.0,
            height: 480.0,
            scale: 1.0,
            debug: false,
            log_max: 8,
            clear_color: None,
            connect: None,
            inspect_color: Color::rgba(0.0, 1.0, 1.0, 1.0),
            rng_seed: 1,
            touch_to_mouse: true,
        }
    }
}

impl EngineConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}
