use crate::{
    game::events::{Notifier, ScoreChanged},
    utils::letters::letter_value,
};

pub struct Scorer;

impl Scorer {
    /// Sum of the letter values of `word`, case-insensitive.
    /// Letters missing from the table count as zero and are logged.
    pub fn compute_word_score(word: &str) -> i32 {
        word.chars()
            .map(|ch| match letter_value(ch) {
                Some(value) => value as i32,
                None => {
                    tracing::warn!("No point value for letter '{}' in \"{}\"", ch, word);
                    0
                }
            })
            .sum()
    }
}

/// Running score for the level in progress
pub struct ScoreKeeper {
    total: i32,
    changes: Notifier<ScoreChanged>,
}

impl ScoreKeeper {
    pub fn new() -> Self {
        Self {
            total: 0,
            changes: Notifier::new(),
        }
    }

    pub fn total(&self) -> i32 {
        self.total
    }

    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: FnMut(&ScoreChanged) + 'static,
    {
        self.changes.subscribe(callback);
    }

    /// Add the score of `word` to the total and return the points gained
    pub fn add_word_score(&mut self, word: &str) -> i32 {
        if word.is_empty() {
            return 0;
        }

        let score = Scorer::compute_word_score(word);
        self.total += score;
        tracing::info!("\"{}\" scored {} points, total {}", word, score, self.total);
        self.changes.emit(&ScoreChanged { total: self.total });
        score
    }

    pub fn reset(&mut self) {
        self.total = 0;
        self.changes.emit(&ScoreChanged { total: 0 });
    }
}

impl Default for ScoreKeeper {
    fn default() -> Self {
        Self::new()
    }
}
