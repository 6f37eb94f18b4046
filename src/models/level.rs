use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::{error::LevelError, utils::letters::normalize_tile_letter};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    /// Stacking depth; smaller values lie on top
    pub z: f32,
}

/// A tile as stored in a level file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TileData {
    pub id: i32,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub character: String,
    #[serde(default)]
    pub children: Vec<i32>,
}

impl TileData {
    /// The upper-cased letter shown on the tile
    pub fn letter(&self) -> char {
        normalize_tile_letter(&self.character)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LevelData {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub tiles: Vec<TileData>,
}

impl LevelData {
    /// Parse and validate a level from its JSON text
    pub fn from_json(text: &str) -> Result<Self, LevelError> {
        let level: LevelData = serde_json::from_str(text)?;
        level.validate()?;
        Ok(level)
    }

    /// Read, parse and validate a level file
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self, LevelError> {
        let text = tokio::fs::read_to_string(path.as_ref()).await?;
        let level = Self::from_json(&text)?;
        tracing::debug!(
            "Loaded level '{}' with {} tiles from {}",
            level.title,
            level.tiles.len(),
            path.as_ref().display()
        );
        Ok(level)
    }

    /// Check the structural rules every playable level must satisfy
    pub fn validate(&self) -> Result<(), LevelError> {
        if self.tiles.is_empty() {
            return Err(LevelError::EmptyTiles);
        }

        let mut ids = HashSet::with_capacity(self.tiles.len());
        for tile in &self.tiles {
            if !ids.insert(tile.id) {
                return Err(LevelError::DuplicateTileId(tile.id));
            }
        }

        for tile in &self.tiles {
            if let Some(&child) = tile.children.iter().find(|child| !ids.contains(child)) {
                return Err(LevelError::DanglingChild {
                    tile: tile.id,
                    child,
                });
            }
        }

        Ok(())
    }

    /// Map from tile id to its index in `tiles`
    pub fn id_to_index(&self) -> HashMap<i32, usize> {
        self.tiles
            .iter()
            .enumerate()
            .map(|(idx, tile)| (tile.id, idx))
            .collect()
    }
}
