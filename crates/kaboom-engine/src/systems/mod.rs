pub mod collision;
pub mod debug;
pub mod frame;
pub mod log;
pub mod mirror;
pub mod text;
