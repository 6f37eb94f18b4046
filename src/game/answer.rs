use std::collections::HashSet;
use std::sync::Arc;

use crate::{
    dictionary::Dictionary,
    game::{
        events::{AnswerChanged, Notifier},
        holders::Slot,
    },
};

/// Why a word cannot be submitted right now
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Too short or not in the dictionary
    Invalid,
    /// Already scored earlier in this level
    AlreadySubmitted,
}

/// Tracks the word spelled by the slot row and the words already scored
/// this level
pub struct AnswerTracker {
    dictionary: Arc<Dictionary>,
    min_word_length: usize,
    current: String,
    valid: bool,
    submitted: HashSet<String>,
    changes: Notifier<AnswerChanged>,
}

impl AnswerTracker {
    pub fn new(dictionary: Arc<Dictionary>, min_word_length: usize) -> Self {
        Self {
            dictionary,
            min_word_length,
            current: String::new(),
            valid: false,
            submitted: HashSet::new(),
            changes: Notifier::new(),
        }
    }

    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: FnMut(&AnswerChanged) + 'static,
    {
        self.changes.subscribe(callback);
    }

    pub fn current_answer(&self) -> &str {
        &self.current
    }

    pub fn is_current_valid(&self) -> bool {
        self.valid
    }

    pub fn min_word_length(&self) -> usize {
        self.min_word_length
    }

    /// Re-read the word from the slot row. Letters are taken from slot 0
    /// up to the first slot without a landed tile.
    pub fn recompute(&mut self, slots: &[Slot]) {
        let word: String = slots
            .iter()
            .map_while(|slot| slot.current())
            .flat_map(|tile| tile.letter.to_uppercase())
            .collect();
        let valid = word.chars().count() >= self.min_word_length && self.dictionary.is_word(&word);
        self.set_answer(word, valid);
    }

    /// Drop the current answer without looking at any slots
    pub fn clear(&mut self) {
        self.set_answer(String::new(), false);
    }

    fn set_answer(&mut self, word: String, valid: bool) {
        if self.current == word && self.valid == valid {
            return;
        }

        self.current = word;
        self.valid = valid;
        if valid {
            tracing::debug!("Valid word spelled: \"{}\"", self.current);
        }

        self.changes.emit(&AnswerChanged {
            word: self.current.clone(),
            valid,
        });
    }

    /// Re-send the current state, e.g. to a subscriber added late
    pub fn force_notify(&mut self) {
        self.changes.emit(&AnswerChanged {
            word: self.current.clone(),
            valid: self.valid,
        });
    }

    pub fn is_already_submitted(&self, word: &str) -> bool {
        self.submitted.contains(&word.to_uppercase())
    }

    pub fn check_submittable(&self) -> Result<(), Rejection> {
        if !self.valid {
            Err(Rejection::Invalid)
        } else if self.is_already_submitted(&self.current) {
            Err(Rejection::AlreadySubmitted)
        } else {
            Ok(())
        }
    }

    pub fn can_submit(&self) -> bool {
        self.check_submittable().is_ok()
    }

    /// Record the current answer as submitted and hand it back
    pub fn take_submission(&mut self) -> Result<String, Rejection> {
        self.check_submittable()?;
        let word = self.current.clone();
        self.submitted.insert(word.clone());
        Ok(word)
    }

    /// Forget the submitted words of the previous level
    pub fn on_level_started(&mut self) {
        self.submitted.clear();
    }

    /// Words scored so far this level, upper case
    pub fn submitted_words(&self) -> &HashSet<String> {
        &self.submitted
    }

    pub fn submitted_count(&self) -> usize {
        self.submitted.len()
    }
}
