use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::str::FromStr;

use crate::game::graph::OverlapTolerance;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub game: GameConfig,
    pub board: BoardConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GameConfig {
    pub min_word_length: usize,
    pub holder_slots: usize,
    pub booster_uses: u32,
    pub first_unlocked_level: i64,
    pub start_level: i64,
    /// Stop the autoplay run after this many levels
    pub max_levels: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BoardConfig {
    pub overlap_dx: f32,
    pub overlap_dy: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub dictionary_path: String,
    pub levels_dir: String,
    pub progress_path: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            min_word_length: 2,
            holder_slots: 7,
            booster_uses: 2,
            first_unlocked_level: 1,
            start_level: 1,
            max_levels: None,
        }
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        let tolerance = OverlapTolerance::default();
        Self {
            overlap_dx: tolerance.dx,
            overlap_dy: tolerance.dy,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dictionary_path: "./dictionary.txt".to_string(),
            levels_dir: "./levels".to_string(),
            progress_path: "./progress.json".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key lookup, falling back to defaults
    /// for missing keys. Present but malformed values are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let game_defaults = GameConfig::default();
        let board_defaults = BoardConfig::default();
        let storage_defaults = StorageConfig::default();

        let game = GameConfig {
            min_word_length: parse_or(&lookup, "MIN_WORD_LENGTH", game_defaults.min_word_length)?,
            holder_slots: parse_or(&lookup, "HOLDER_SLOTS", game_defaults.holder_slots)?,
            booster_uses: parse_or(&lookup, "BOOSTER_USES", game_defaults.booster_uses)?,
            first_unlocked_level: parse_or(
                &lookup,
                "FIRST_UNLOCKED_LEVEL",
                game_defaults.first_unlocked_level,
            )?,
            start_level: parse_or(&lookup, "START_LEVEL", game_defaults.start_level)?,
            max_levels: match lookup("MAX_LEVELS") {
                Some(raw) => Some(
                    raw.trim()
                        .parse()
                        .context("MAX_LEVELS must be a number")?,
                ),
                None => game_defaults.max_levels,
            },
        };

        if game.holder_slots == 0 {
            anyhow::bail!("HOLDER_SLOTS must be at least 1");
        }

        let board = BoardConfig {
            overlap_dx: parse_or(&lookup, "OVERLAP_DX", board_defaults.overlap_dx)?,
            overlap_dy: parse_or(&lookup, "OVERLAP_DY", board_defaults.overlap_dy)?,
        };

        let storage = StorageConfig {
            dictionary_path: lookup("DICTIONARY_PATH")
                .unwrap_or(storage_defaults.dictionary_path),
            levels_dir: lookup("LEVELS_DIR").unwrap_or(storage_defaults.levels_dir),
            progress_path: lookup("PROGRESS_PATH").unwrap_or(storage_defaults.progress_path),
        };

        Ok(Config {
            game,
            board,
            storage,
        })
    }

    pub fn tolerance(&self) -> OverlapTolerance {
        OverlapTolerance {
            dx: self.board.overlap_dx,
            dy: self.board.overlap_dy,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            game: GameConfig::default(),
            board: BoardConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} must be a number, got {:?}", key, raw)),
        None => Ok(default),
    }
}
