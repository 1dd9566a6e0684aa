pub mod manifest;
pub mod store;

pub use manifest::{AnimRange, AssetManifest, ASCII_CHARS};
pub use store::{AssetKind, AssetStore, LoadTicket, SoundData, SpriteData, DEF_FONT};
