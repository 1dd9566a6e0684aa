pub mod camera;
pub mod commands;
pub mod traits;

pub use camera::{screen_to_world, world_to_screen, Camera};
pub use commands::{DrawCmd, DrawList};
pub use traits::{DrawOpts, Renderer, TexId};
