pub mod area;
pub mod body;
pub mod desc;
pub mod layer;
pub mod level;
pub mod rect;
pub mod sprite;
pub mod text;
pub mod transform;

pub use area::{area, area_from_size};
pub use body::{body, solid, BodyConf};
pub use desc::CompDesc;
pub use layer::layer;
pub use level::{add_level, gridder, Level, LevelConf};
pub use rect::rect;
pub use sprite::{sprite, SpriteConf};
pub use text::{text, TextConf};
pub use transform::{color, origin, pos, rotate, scale};
