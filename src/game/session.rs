use std::sync::Arc;

use crate::{
    config::Config,
    dictionary::Dictionary,
    error::LevelError,
    game::{
        answer::{AnswerTracker, Rejection},
        board::{BoardState, OpenTile},
        events::{AnswerChanged, ScoreChanged},
        graph::OverlapTolerance,
        holders::{HeldTile, LetterHolders, Slot},
        progress::{self, ProgressStore},
        scorer::ScoreKeeper,
        solver::{Solution, WordSolver},
    },
    models::LevelData,
};

/// Tunables that stay fixed for the lifetime of a session
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionSettings {
    pub min_word_length: usize,
    pub holder_slots: usize,
    pub booster_uses: u32,
    pub tolerance: OverlapTolerance,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            min_word_length: 2,
            holder_slots: 7,
            booster_uses: 2,
            tolerance: OverlapTolerance::default(),
        }
    }
}

impl From<&Config> for SessionSettings {
    fn from(config: &Config) -> Self {
        Self {
            min_word_length: config.game.min_word_length,
            holder_slots: config.game.holder_slots,
            booster_uses: config.game.booster_uses,
            tolerance: config.tolerance(),
        }
    }
}

/// A tile on its way to a slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingMove {
    pub tile_index: usize,
    pub slot: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelSummary {
    pub level: i64,
    pub title: String,
    pub total_score: i32,
    pub is_new_high: bool,
    pub next_level: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Accepted {
        word: String,
        score: i32,
        level_completed: Option<LevelSummary>,
    },
    Invalid,
    AlreadySubmitted,
}

/// One player's run through the levels: board, slot row, answer and score
pub struct GameSession {
    settings: SessionSettings,
    dictionary: Arc<Dictionary>,
    scores: ScoreKeeper,
    board: Option<BoardState>,
    answer: AnswerTracker,
    holders: LetterHolders,
    store: Option<Box<dyn ProgressStore>>,
    level_number: i64,
    level_title: String,
    booster_uses_left: u32,
    win_triggered: bool,
}

impl GameSession {
    pub fn new(dictionary: Arc<Dictionary>, settings: SessionSettings) -> Self {
        Self {
            answer: AnswerTracker::new(dictionary.clone(), settings.min_word_length),
            holders: LetterHolders::new(settings.holder_slots),
            booster_uses_left: settings.booster_uses,
            settings,
            dictionary,
            scores: ScoreKeeper::new(),
            board: None,
            store: None,
            level_number: 0,
            level_title: String::new(),
            win_triggered: false,
        }
    }

    /// Attach the store that receives high scores and level progress
    pub fn with_store(mut self, store: Box<dyn ProgressStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn progress_store(&self) -> Option<&dyn ProgressStore> {
        self.store.as_deref()
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    pub fn subscribe_answer<F>(&mut self, callback: F)
    where
        F: FnMut(&AnswerChanged) + 'static,
    {
        self.answer.subscribe(callback);
    }

    pub fn subscribe_score<F>(&mut self, callback: F)
    where
        F: FnMut(&ScoreChanged) + 'static,
    {
        self.scores.subscribe(callback);
    }

    /// Start `level` from scratch. On error the previous board is dropped
    /// and the session has no playable level.
    pub fn initialize(&mut self, level_number: i64, level: &LevelData) -> Result<(), LevelError> {
        let board = match BoardState::new(level, self.settings.tolerance) {
            Ok(board) => board,
            Err(e) => {
                self.board = None;
                tracing::error!("Level {} rejected: {}", level_number, e);
                return Err(e);
            }
        };

        self.board = Some(board);
        self.level_number = level_number;
        self.level_title = level.title.clone();
        self.holders.clear_all();
        self.scores.reset();
        self.answer.on_level_started();
        self.answer.clear();
        self.booster_uses_left = self.settings.booster_uses;
        self.win_triggered = false;

        tracing::info!(
            "Level {} '{}' started with {} tiles",
            level_number,
            self.level_title,
            level.tiles.len()
        );
        Ok(())
    }

    pub fn level_number(&self) -> i64 {
        self.level_number
    }

    pub fn level_title(&self) -> &str {
        &self.level_title
    }

    pub fn total_score(&self) -> i32 {
        self.scores.total()
    }

    pub fn booster_uses_left(&self) -> u32 {
        self.booster_uses_left
    }

    pub fn is_level_complete(&self) -> bool {
        self.win_triggered
    }

    pub fn board(&self) -> Option<&BoardState> {
        self.board.as_ref()
    }

    /// Mutable board access, e.g. to subscribe to open-state changes
    pub fn board_mut(&mut self) -> Option<&mut BoardState> {
        self.board.as_mut()
    }

    pub fn answer(&self) -> &AnswerTracker {
        &self.answer
    }

    pub fn holders(&self) -> &LetterHolders {
        &self.holders
    }

    pub fn open_tiles(&self) -> Vec<OpenTile> {
        self.board
            .as_ref()
            .map(BoardState::open_tiles)
            .unwrap_or_default()
    }

    // ---------------- Moves ----------------

    /// Reserve the cursor slot for an open tile and lift it off the board
    pub fn begin_move(&mut self, tile_index: usize) -> Option<PendingMove> {
        let board = self.board.as_mut()?;
        if self.win_triggered || !board.is_open_index(tile_index) {
            tracing::debug!("Tile index {} cannot be picked now", tile_index);
            return None;
        }

        let held = HeldTile {
            tile_index,
            tile_id: board.tile_id(tile_index)?,
            letter: board.letter(tile_index)?,
            was_open: true,
            source: board.position(tile_index)?,
        };
        let slot = self.holders.try_reserve_at_cursor(held)?;
        board.picking_begin(tile_index);

        Some(PendingMove { tile_index, slot })
    }

    /// Land a pending move in its slot
    pub fn commit_move(&mut self, pending: PendingMove) -> bool {
        if !self.is_reserved_for(pending) {
            return false;
        }
        self.holders.commit(pending.slot);
        if let Some(board) = self.board.as_mut() {
            board.commit_pick(pending.tile_index);
        }
        self.answer.recompute(self.holders.slots());
        true
    }

    /// Abort a pending move; the tile goes back to the board
    pub fn cancel_move(&mut self, pending: PendingMove) -> bool {
        if !self.is_reserved_for(pending) {
            return false;
        }
        self.holders.cancel_reserve(pending.slot);
        if let Some(board) = self.board.as_mut() {
            board.pick_canceled(pending.tile_index);
        }
        true
    }

    fn is_reserved_for(&self, pending: PendingMove) -> bool {
        matches!(
            self.holders.slots().get(pending.slot),
            Some(Slot::Reserved(tile)) if tile.tile_index == pending.tile_index
        )
    }

    /// Move an open tile straight into the next slot
    pub fn place_tile(&mut self, tile_index: usize) -> bool {
        match self.begin_move(tile_index) {
            Some(pending) => self.commit_move(pending),
            None => false,
        }
    }

    /// Send the tile in `slot` and every occupied slot after it back to the
    /// board. Returns how many tiles went back.
    pub fn return_from_slot(&mut self, slot: usize) -> usize {
        let released = self.holders.return_from(slot);
        self.return_to_board(&released);
        released.len()
    }

    /// Send the rightmost placed tile back to the board
    pub fn undo_last_move(&mut self) -> bool {
        match self.holders.take_last() {
            Some(tile) => {
                self.return_to_board(&[tile]);
                true
            }
            None => false,
        }
    }

    fn return_to_board(&mut self, tiles: &[HeldTile]) {
        if let Some(board) = self.board.as_mut() {
            for tile in tiles {
                board.tile_returned(tile.tile_index);
            }
        }
        self.answer.recompute(self.holders.slots());
    }

    // ---------------- Submission ----------------

    /// Score the spelled word, consume its tiles and check for the end of
    /// the level
    pub fn submit_current_word(&mut self) -> SubmitOutcome {
        let word = match self.answer.take_submission() {
            Ok(word) => word,
            Err(Rejection::Invalid) => {
                tracing::debug!("Rejected \"{}\": not a word", self.answer.current_answer());
                return SubmitOutcome::Invalid;
            }
            Err(Rejection::AlreadySubmitted) => {
                tracing::debug!(
                    "Rejected \"{}\": already submitted",
                    self.answer.current_answer()
                );
                return SubmitOutcome::AlreadySubmitted;
            }
        };

        let score = self.scores.add_word_score(&word);
        let consumed = self.holders.consume_from_start();
        self.answer.recompute(self.holders.slots());

        tracing::info!(
            "Accepted \"{}\" for {} points ({} tiles consumed, total {})",
            word,
            score,
            consumed.len(),
            self.scores.total()
        );

        SubmitOutcome::Accepted {
            word,
            score,
            level_completed: self.check_end_after_submit(),
        }
    }

    /// Complete the level when the board is cleared or no word can be
    /// spelled from the open tiles. Fires at most once per level.
    ///
    /// Words already scored this level still count as spellable, so a board
    /// whose only remaining words were all submitted stays incomplete while
    /// [`GameSession::find_playable_word`] returns `None`. Callers must treat
    /// that pair as a stalled level.
    pub fn check_end_after_submit(&mut self) -> Option<LevelSummary> {
        if self.win_triggered {
            return None;
        }
        let board = self.board.as_ref()?;

        let finished = board.is_board_empty()
            || !WordSolver::new(&self.dictionary, self.settings.min_word_length)
                .exists_any_valid_word(&board.open_tiles());
        if !finished {
            return None;
        }
        Some(self.trigger_win())
    }

    fn trigger_win(&mut self) -> LevelSummary {
        self.win_triggered = true;
        self.holders.clear_all();
        self.answer.recompute(self.holders.slots());

        let level = self.level_number;
        let total_score = self.scores.total();
        let is_new_high = match self.store.as_deref_mut() {
            Some(store) => {
                let new_high = progress::try_update_high_score(store, level, total_score.into());
                progress::set_max_completed_if_greater(store, level);
                new_high
            }
            None => {
                tracing::warn!("No progress store attached; level {} result not saved", level);
                false
            }
        };

        tracing::info!(
            "Level {} complete with {} points{}",
            level,
            total_score,
            if is_new_high { " (new high score)" } else { "" }
        );

        LevelSummary {
            level,
            title: self.level_title.clone(),
            total_score,
            is_new_high,
            next_level: level + 1,
        }
    }

    // ---------------- Hints ----------------

    pub fn find_best_open_word(&self) -> Option<Solution> {
        let board = self.board.as_ref()?;
        WordSolver::new(&self.dictionary, self.settings.min_word_length)
            .find_best_open_word(&board.open_tiles())
    }

    /// Best word that fits the slot row and has not been scored this level
    pub fn find_playable_word(&self) -> Option<Solution> {
        let board = self.board.as_ref()?;
        WordSolver::new(&self.dictionary, self.settings.min_word_length)
            .with_max_length(self.holders.len())
            .excluding(self.answer.submitted_words())
            .find_best_open_word(&board.open_tiles())
    }

    pub fn can_use_booster(&self) -> bool {
        self.board.is_some()
            && !self.win_triggered
            && self.booster_uses_left > 0
            && self.holders.slots().iter().all(|slot| *slot == Slot::Empty)
    }

    /// Spell [`GameSession::find_playable_word`] into the slot row. Spends a
    /// use only when a word was found.
    pub fn use_booster(&mut self) -> Option<Solution> {
        if !self.can_use_booster() {
            tracing::debug!("Booster unavailable ({} uses left)", self.booster_uses_left);
            return None;
        }

        let solution = self.find_playable_word()?;

        for &tile_index in &solution.path {
            if !self.place_tile(tile_index) {
                tracing::warn!(
                    "Booster stopped placing \"{}\" at tile index {}",
                    solution.word,
                    tile_index
                );
                break;
            }
        }

        self.booster_uses_left -= 1;
        tracing::info!(
            "Booster spelled \"{}\" ({} uses left)",
            solution.word,
            self.booster_uses_left
        );
        Some(solution)
    }
}
