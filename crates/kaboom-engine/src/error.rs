//! Engine error type.
//!
//! Construction errors (missing component dependency, unknown asset, bad
//! component) surface from `add`; anything escaping a running frame is
//! frame-fatal and halts the engine.

use crate::api::types::ObjId;

/// Every fallible engine operation returns this error.
#[derive(Debug, thiserror::Error)]
pub enum KaboomError {
    #[error("comp '{comp}' requires comp '{dep}'")]
    MissingDependency { comp: String, dep: String },

    #[error("invalid comp: {0}")]
    InvalidComp(String),

    #[error("sprite not found: \"{0}\"")]
    SpriteNotFound(String),

    #[error("anim not found: {0}")]
    AnimNotFound(String),

    #[error("font not found: {0}")]
    FontNotFound(String),

    #[error("sound not found: \"{0}\"")]
    SoundNotFound(String),

    #[error("scene not found: \"{0}\"")]
    SceneNotFound(String),

    #[error("not connected to any websockets")]
    NotConnected,

    #[error("object {0:?} does not exist")]
    ObjectNotFound(ObjId),

    #[error("object {obj:?} has no method '{method}'")]
    MethodNotFound { obj: ObjId, method: String },

    #[error("failed to load \"{name}\": {reason}")]
    AssetLoad { name: String, reason: String },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, KaboomError>;
