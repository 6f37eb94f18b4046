use anyhow::{Context, Result};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

pub const KEY_MAX_COMPLETED: &str = "max_completed_level";

pub fn high_score_key(level: i64) -> String {
    format!("level_{}_highscore", level)
}

/// Key to integer storage for progress and high scores
pub trait ProgressStore {
    fn get(&self, key: &str) -> Option<i64>;
    fn set(&mut self, key: &str, value: i64);
}

/// Store that lives only as long as the process
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, i64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressStore for MemoryStore {
    fn get(&self, key: &str) -> Option<i64> {
        self.values.get(key).copied()
    }

    fn set(&mut self, key: &str, value: i64) {
        self.values.insert(key.to_string(), value);
    }
}

/// Store persisted as a flat JSON object, rewritten on every `set`.
///
/// Uses blocking `std::fs` because `ProgressStore` is synchronous; the file
/// is a handful of keys.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, i64>,
}

impl JsonFileStore {
    /// Open the store at `path`; a missing file starts empty
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let values = match std::fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text)
                .with_context(|| format!("Corrupt progress file {}", path.display()))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", path.display()))
            }
        };
        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<()> {
        let text = serde_json::to_string_pretty(&self.values)?;
        std::fs::write(&self.path, text)
            .with_context(|| format!("Failed to write {}", self.path.display()))
    }
}

impl ProgressStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<i64> {
        self.values.get(key).copied()
    }

    fn set(&mut self, key: &str, value: i64) {
        self.values.insert(key.to_string(), value);
        if let Err(e) = self.save() {
            tracing::warn!("Progress not saved: {:#}", e);
        }
    }
}

/// Highest completed level, or `first_unlocked - 1` when nothing is stored
pub fn max_completed(store: &dyn ProgressStore, first_unlocked: i64) -> i64 {
    store.get(KEY_MAX_COMPLETED).unwrap_or(first_unlocked - 1)
}

/// Highest level the player may start
pub fn max_playable(store: &dyn ProgressStore, first_unlocked: i64) -> i64 {
    first_unlocked.max(max_completed(store, first_unlocked) + 1)
}

/// Record `level` as completed if it beats the stored value
pub fn set_max_completed_if_greater(store: &mut dyn ProgressStore, level: i64) -> bool {
    let old = store.get(KEY_MAX_COMPLETED).unwrap_or(0);
    if level > old {
        store.set(KEY_MAX_COMPLETED, level);
        true
    } else {
        false
    }
}

pub fn high_score(store: &dyn ProgressStore, level: i64) -> i64 {
    store.get(&high_score_key(level)).unwrap_or(0)
}

/// Store `score` as the level's high score if it beats the old one
pub fn try_update_high_score(store: &mut dyn ProgressStore, level: i64, score: i64) -> bool {
    let key = high_score_key(level);
    let old = store.get(&key).unwrap_or(0);
    if score > old {
        store.set(&key, score);
        true
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_high_score_only_increases() {
        let mut store = MemoryStore::new();
        assert_eq!(high_score(&store, 3), 0);
        assert!(try_update_high_score(&mut store, 3, 40));
        assert!(!try_update_high_score(&mut store, 3, 40));
        assert!(!try_update_high_score(&mut store, 3, 12));
        assert_eq!(high_score(&store, 3), 40);
        assert_eq!(store.get("level_3_highscore"), Some(40));
        assert!(!try_update_high_score(&mut store, 4, 0));
    }

    #[test]
    fn test_max_completed_and_playable() {
        let mut store = MemoryStore::new();
        assert_eq!(max_completed(&store, 1), 0);
        assert_eq!(max_playable(&store, 1), 1);

        assert!(set_max_completed_if_greater(&mut store, 2));
        assert!(!set_max_completed_if_greater(&mut store, 1));
        assert_eq!(max_completed(&store, 1), 2);
        assert_eq!(max_playable(&store, 1), 3);
        assert_eq!(max_playable(&store, 5), 5);
    }

    #[test]
    fn test_json_store_round_trips_through_disk() {
        let path = std::env::temp_dir().join(format!("tile-word-progress-{}.json", std::process::id()));
        std::fs::remove_file(&path).ok();

        {
            let mut store = JsonFileStore::open(&path).unwrap();
            assert_eq!(store.get(KEY_MAX_COMPLETED), None);
            assert!(set_max_completed_if_greater(&mut store, 4));
            assert!(try_update_high_score(&mut store, 4, 31));
        }

        let store = JsonFileStore::open(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(store.get(KEY_MAX_COMPLETED), Some(4));
        assert_eq!(high_score(&store, 4), 31);
    }

    #[test]
    fn test_json_store_rejects_corrupt_file() {
        let path = std::env::temp_dir().join(format!("tile-word-corrupt-{}.json", std::process::id()));
        std::fs::write(&path, "[1, 2").unwrap();
        let result = JsonFileStore::open(&path);
        std::fs::remove_file(&path).ok();
        assert!(result.is_err());
    }
}
