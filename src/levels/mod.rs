use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::{
    game::progress::{self, ProgressStore},
    models::LevelData,
};

/// A level file found on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelEntry {
    pub number: i64,
    pub title: String,
    pub path: PathBuf,
}

/// A level as listed in the level picker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogRow {
    pub number: i64,
    pub title: String,
    pub high_score: i64,
    pub locked: bool,
}

/// Parse the number out of a `level_<N>` file stem
pub fn level_number_from_name(name: &str) -> Option<i64> {
    let stem = name.strip_suffix(".json").unwrap_or(name);
    let digits = stem.to_ascii_lowercase();
    let digits = digits.strip_prefix("level_")?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// List every `level_<N>.json` in `dir`, sorted by number. Files whose
/// contents do not parse still appear, with an empty title.
pub async fn discover_levels<P: AsRef<Path>>(dir: P) -> Result<Vec<LevelEntry>> {
    let dir = dir.as_ref();
    let mut reader = fs::read_dir(dir)
        .await
        .with_context(|| format!("Failed to list levels in {}", dir.display()))?;

    let mut entries = Vec::new();
    while let Some(entry) = reader.next_entry().await? {
        let path = entry.path();
        let Some(number) = path
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(level_number_from_name)
        else {
            continue;
        };

        let title = match LevelData::load(&path).await {
            Ok(level) => level.title,
            Err(e) => {
                tracing::warn!("Level {} at {} is unreadable: {}", number, path.display(), e);
                String::new()
            }
        };

        entries.push(LevelEntry {
            number,
            title,
            path,
        });
    }

    entries.sort_by_key(|entry| entry.number);
    tracing::info!("Found {} levels in {}", entries.len(), dir.display());
    Ok(entries)
}

/// Combine discovered levels with stored progress
pub fn build_catalog(
    entries: &[LevelEntry],
    store: &dyn ProgressStore,
    first_unlocked: i64,
) -> Vec<CatalogRow> {
    let max_playable = progress::max_playable(store, first_unlocked);
    entries
        .iter()
        .map(|entry| CatalogRow {
            number: entry.number,
            title: entry.title.clone(),
            high_score: progress::high_score(store, entry.number),
            locked: entry.number > max_playable,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::progress::MemoryStore;

    #[test]
    fn test_level_number_from_name() {
        assert_eq!(level_number_from_name("level_3.json"), Some(3));
        assert_eq!(level_number_from_name("Level_12"), Some(12));
        assert_eq!(level_number_from_name("level_.json"), None);
        assert_eq!(level_number_from_name("level_2b.json"), None);
        assert_eq!(level_number_from_name("bonus.json"), None);
    }

    #[test]
    fn test_discover_levels_sorts_and_skips_foreign_files() {
        let dir = std::env::temp_dir().join(format!("tile-word-levels-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("level_10.json"),
            r#"{ "title": "Ten", "tiles": [ { "id": 1, "character": "A" } ] }"#,
        )
        .unwrap();
        std::fs::write(
            dir.join("level_2.json"),
            r#"{ "title": "Two", "tiles": [ { "id": 1, "character": "B" } ] }"#,
        )
        .unwrap();
        std::fs::write(dir.join("level_3.json"), "broken").unwrap();
        std::fs::write(dir.join("notes.txt"), "ignore me").unwrap();

        let entries = tokio_test::block_on(discover_levels(&dir)).unwrap();
        std::fs::remove_dir_all(&dir).ok();

        let summary: Vec<(i64, &str)> = entries
            .iter()
            .map(|entry| (entry.number, entry.title.as_str()))
            .collect();
        assert_eq!(summary, vec![(2, "Two"), (3, ""), (10, "Ten")]);
    }

    #[test]
    fn test_catalog_locks_levels_beyond_progress() {
        let entries: Vec<LevelEntry> = (1..=4)
            .map(|number| LevelEntry {
                number,
                title: format!("Level {}", number),
                path: PathBuf::from(format!("levels/level_{}.json", number)),
            })
            .collect();

        let mut store = MemoryStore::new();
        progress::set_max_completed_if_greater(&mut store, 2);
        progress::try_update_high_score(&mut store, 1, 17);

        let rows = build_catalog(&entries, &store, 1);
        let locked: Vec<bool> = rows.iter().map(|row| row.locked).collect();
        assert_eq!(locked, vec![false, false, false, true]);
        assert_eq!(rows[0].high_score, 17);
        assert_eq!(rows[1].high_score, 0);
    }
}
