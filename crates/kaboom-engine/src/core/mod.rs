pub mod comp;
pub mod object;
pub mod registry;
pub mod scene;
pub mod tags;
pub mod time;
pub mod value;
pub mod world;
