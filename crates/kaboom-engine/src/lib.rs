pub mod api;
pub mod assets;
pub mod bridge;
pub mod components;
pub mod core;
pub mod error;
pub mod input;
pub mod math;
pub mod renderer;
pub mod systems;

// Re-export key types at crate root for convenience
pub use api::bindings::Keys;
pub use api::config::EngineConfig;
pub use api::engine::{DebugState, Engine, FrameState};
pub use api::game::{start, Game};
pub use api::types::{Cancel, ObjId};
pub use assets::{AnimRange, AssetManifest, AssetStore, LoadTicket, SpriteData, DEF_FONT};
pub use bridge::{AudioSink, FileStorage, MemoryStorage, Net, NetMessage, PlayConf, Storage, Transport};
pub use components::level::{add_level, Level, LevelConf};
pub use core::comp::{Comp, CompSpec};
pub use core::object::{GameObject, ObjSnapshot};
pub use core::tags::TagMatch;
pub use core::value::Value;
pub use error::{KaboomError, Result};
pub use input::{InputEvent, InputQueue};
pub use math::{Color, Origin, Quad, Rect};
pub use renderer::{DrawCmd, DrawList, DrawOpts, Renderer, TexId};
pub use systems::collision::{Contact, Side};
pub use systems::text::{FontData, FormattedText};
