// Integration tests for the tile word core
// These drive the public API from files on disk through a finished level

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;

use tile_word_core::config::Config;
use tile_word_core::dictionary::Dictionary;
use tile_word_core::game::events::OpenStateChanged;
use tile_word_core::game::progress::{self, JsonFileStore, MemoryStore};
use tile_word_core::game::{GameSession, LevelSummary, SessionSettings, SubmitOutcome};
use tile_word_core::levels::{build_catalog, discover_levels};
use tile_word_core::models::LevelData;

// C A T lie flat, S is hidden under T
const LEVEL_ONE: &str = r#"{
    "title": "First Steps",
    "tiles": [
        { "id": 10, "position": { "x": 0, "y": 0, "z": 0 }, "character": "c" },
        { "id": 11, "position": { "x": 100, "y": 0, "z": 0 }, "character": "a" },
        { "id": 12, "position": { "x": 200, "y": 0, "z": 0 }, "character": "t", "children": [13] },
        { "id": 13, "position": { "x": 200, "y": 0, "z": 1 }, "character": "s" }
    ]
}"#;

const LEVEL_TWO: &str = r#"{
    "title": "Second",
    "tiles": [
        { "id": 1, "position": { "x": 0, "y": 0, "z": 0 }, "character": "A" },
        { "id": 2, "position": { "x": 100, "y": 0, "z": 0 }, "character": "T" }
    ]
}"#;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("tile-word-it-{}-{}", name, std::process::id()));
    std::fs::remove_dir_all(&dir).ok();
    std::fs::create_dir_all(dir.join("levels")).unwrap();
    std::fs::write(dir.join("dictionary.txt"), "cat\nact\nat\n").unwrap();
    std::fs::write(dir.join("levels").join("level_1.json"), LEVEL_ONE).unwrap();
    std::fs::write(dir.join("levels").join("level_2.json"), LEVEL_TWO).unwrap();
    dir
}

fn play_to_completion(session: &mut GameSession) -> LevelSummary {
    loop {
        let solution = session
            .find_playable_word()
            .expect("a playable word should remain until the level ends");
        for &tile_index in &solution.path {
            assert!(session.place_tile(tile_index));
        }
        match session.submit_current_word() {
            SubmitOutcome::Accepted {
                level_completed: Some(summary),
                ..
            } => return summary,
            SubmitOutcome::Accepted { .. } => {}
            other => panic!("{} should be accepted, got {:?}", solution.word, other),
        }
    }
}

#[test]
fn test_files_to_saved_progress() {
    let dir = scratch_dir("progress");

    let dictionary = tokio_test::block_on(Dictionary::load(dir.join("dictionary.txt"))).unwrap();
    let entries = tokio_test::block_on(discover_levels(dir.join("levels"))).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].title, "First Steps");

    let store = JsonFileStore::open(dir.join("progress.json")).unwrap();
    let catalog = build_catalog(&entries, &store, 1);
    assert!(!catalog[0].locked);
    assert!(catalog[1].locked);

    let level = tokio_test::block_on(LevelData::load(&entries[0].path)).unwrap();
    let mut session = GameSession::new(Arc::new(dictionary), SessionSettings::default())
        .with_store(Box::new(store));
    session.initialize(entries[0].number, &level).unwrap();

    let summary = play_to_completion(&mut session);
    assert_eq!(summary.level, 1);
    assert_eq!(summary.title, "First Steps");
    assert_eq!(summary.total_score, 5);
    assert!(summary.is_new_high);
    assert_eq!(summary.next_level, 2);
    drop(session);

    let reopened = JsonFileStore::open(dir.join("progress.json")).unwrap();
    std::fs::remove_dir_all(&dir).ok();

    assert_eq!(progress::max_completed(&reopened, 1), 1);
    assert_eq!(progress::high_score(&reopened, 1), 5);
    let catalog = build_catalog(&entries, &reopened, 1);
    assert!(catalog.iter().all(|row| !row.locked));
}

#[test]
fn test_replaying_a_level_keeps_best_score() {
    let dictionary = Arc::new(Dictionary::from_words(["CAT", "AT"]));
    let level = LevelData::from_json(LEVEL_ONE).unwrap();
    let mut session = GameSession::new(dictionary, SessionSettings::default())
        .with_store(Box::new(MemoryStore::new()));

    session.initialize(1, &level).unwrap();
    assert!(play_to_completion(&mut session).is_new_high);

    // Spelling AT first scores less and leaves C behind
    session.initialize(1, &level).unwrap();
    for tile_index in [1, 2] {
        assert!(session.place_tile(tile_index));
    }
    match session.submit_current_word() {
        SubmitOutcome::Accepted {
            level_completed: Some(summary),
            ..
        } => {
            assert_eq!(summary.total_score, 2);
            assert!(!summary.is_new_high);
        }
        other => panic!("expected AT to finish the level, got {:?}", other),
    }

    let store = session.progress_store().unwrap();
    assert_eq!(progress::high_score(store, 1), 5);
}

#[test]
fn test_open_state_events_follow_moves() {
    let dictionary = Arc::new(Dictionary::from_words(["CAT"]));
    let level = LevelData::from_json(LEVEL_ONE).unwrap();
    let mut session = GameSession::new(dictionary, SessionSettings::default());
    session.initialize(1, &level).unwrap();

    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = events.clone();
    session
        .board_mut()
        .unwrap()
        .subscribe_open_changes(move |event: &OpenStateChanged| sink.borrow_mut().push(*event));

    let pending = session.begin_move(2).unwrap();
    assert!(session.cancel_move(pending));
    assert!(session.place_tile(2));
    assert_eq!(session.return_from_slot(0), 1);

    let open_s = OpenStateChanged {
        tile_index: 3,
        open: true,
    };
    let close_s = OpenStateChanged {
        tile_index: 3,
        open: false,
    };
    let tile_s: Vec<OpenStateChanged> = events
        .borrow()
        .iter()
        .filter(|event| event.tile_index == 3)
        .copied()
        .collect();
    assert_eq!(tile_s, vec![open_s, close_s, open_s, close_s]);
}

#[test]
fn test_settings_from_config() {
    let config = Config::from_lookup(|key| match key {
        "HOLDER_SLOTS" => Some("2".to_string()),
        "BOOSTER_USES" => Some("1".to_string()),
        _ => None,
    })
    .unwrap();
    let settings = SessionSettings::from(&config);
    assert_eq!(settings.holder_slots, 2);

    let dictionary = Arc::new(Dictionary::from_words(["CAT", "AT"]));
    let level = LevelData::from_json(LEVEL_ONE).unwrap();
    let mut session = GameSession::new(dictionary, settings);
    session.initialize(1, &level).unwrap();

    // only two slots, so the booster settles for AT
    assert_eq!(session.use_booster().unwrap().word, "AT");
    assert_eq!(session.booster_uses_left(), 0);
    assert!(!session.place_tile(0));
}
