pub mod queue;
pub mod state;

pub use queue::{normalize_key, InputEvent, InputQueue};
pub use state::{BtnState, InputState, Touch, TouchPhase};
