pub mod config;
pub mod dictionary;
pub mod error;
pub mod game;
pub mod levels;
pub mod models;
pub mod utils;

pub use config::Config;
pub use dictionary::Dictionary;
pub use error::LevelError;
pub use game::GameSession;
