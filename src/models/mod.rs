pub mod level;

pub use level::{LevelData, Position, TileData};
