use std::sync::Arc;

use anyhow::{Context, Result};
use tile_word_core::{
    config::Config,
    dictionary::Dictionary,
    game::{
        progress::{self, JsonFileStore, MemoryStore, ProgressStore},
        GameSession, LevelSummary, SessionSettings, SubmitOutcome,
    },
    levels,
    models::LevelData,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tile_word_core=debug,tile_word_autoplay=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting tile word autoplay...");

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!("Configuration loaded");

    // Load dictionary
    let dictionary = match Dictionary::load(&config.storage.dictionary_path).await {
        Ok(dict) => {
            tracing::info!("Dictionary loaded successfully");
            dict
        }
        Err(e) => {
            tracing::warn!("Failed to load dictionary: {}. Using empty dictionary.", e);
            tracing::warn!(
                "Put a word list at {} for full functionality",
                config.storage.dictionary_path
            );
            Dictionary::empty()
        }
    };

    let store: Box<dyn ProgressStore> = match JsonFileStore::open(&config.storage.progress_path) {
        Ok(store) => Box::new(store),
        Err(e) => {
            tracing::warn!("{:#}. Progress will not be saved this run.", e);
            Box::new(MemoryStore::new())
        }
    };

    let entries = levels::discover_levels(&config.storage.levels_dir).await?;
    for row in levels::build_catalog(&entries, &*store, config.game.first_unlocked_level) {
        tracing::debug!(
            "Level {:>3} {:<24} high score {:>4}{}",
            row.number,
            row.title,
            row.high_score,
            if row.locked { " (locked)" } else { "" }
        );
    }

    let mut session =
        GameSession::new(Arc::new(dictionary), SessionSettings::from(&config)).with_store(store);

    let mut level_number = config.game.start_level;
    let mut played = 0u32;

    loop {
        if config.game.max_levels.is_some_and(|max| played >= max) {
            break;
        }

        let max_playable = session
            .progress_store()
            .map(|store| progress::max_playable(store, config.game.first_unlocked_level))
            .unwrap_or(config.game.first_unlocked_level);
        if level_number > max_playable {
            tracing::warn!("Level {} is locked (max playable {})", level_number, max_playable);
            break;
        }

        let Some(entry) = entries.iter().find(|entry| entry.number == level_number) else {
            tracing::info!(
                "No level {} in {}, stopping",
                level_number,
                config.storage.levels_dir
            );
            break;
        };

        let level = LevelData::load(&entry.path)
            .await
            .with_context(|| format!("Failed to load level {}", level_number))?;
        session.initialize(level_number, &level)?;

        match play_level(&mut session) {
            Some(summary) => {
                tracing::info!(
                    "Finished level {} '{}' with {} points{}",
                    summary.level,
                    summary.title,
                    summary.total_score,
                    if summary.is_new_high { ", new high score" } else { "" }
                );
                level_number = summary.next_level;
            }
            None => {
                tracing::warn!(
                    "Stuck on level {} with {} points and no playable word",
                    level_number,
                    session.total_score()
                );
                break;
            }
        }
        played += 1;
    }

    tracing::info!("Autoplay finished after {} levels", played);
    Ok(())
}

/// Spell the best playable word until the level completes. Returns `None`
/// when the only words left were already scored.
fn play_level(session: &mut GameSession) -> Option<LevelSummary> {
    if let Some(summary) = session.check_end_after_submit() {
        return Some(summary);
    }

    loop {
        let solution = session.find_playable_word()?;
        for &tile_index in &solution.path {
            if !session.place_tile(tile_index) {
                tracing::warn!("Could not place tile index {}", tile_index);
                session.return_from_slot(0);
                return None;
            }
        }

        match session.submit_current_word() {
            SubmitOutcome::Accepted {
                level_completed: Some(summary),
                ..
            } => return Some(summary),
            SubmitOutcome::Accepted { .. } => {}
            rejected => {
                tracing::warn!("\"{}\" was rejected: {:?}", solution.word, rejected);
                session.return_from_slot(0);
                return None;
            }
        }
    }
}
