use std::collections::HashSet;

use crate::{
    dictionary::Dictionary,
    game::{board::OpenTile, scorer::Scorer},
};

/// Best word found on the open tiles and the tiles that spell it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    pub word: String,
    /// Tile indices in spelling order
    pub path: Vec<usize>,
    pub score: i32,
}

/// Exhaustive search over the open tiles with dictionary prefix pruning
pub struct WordSolver<'a> {
    dictionary: &'a Dictionary,
    min_word_length: usize,
    max_word_length: Option<usize>,
    excluded: Option<&'a HashSet<String>>,
}

struct Search<'t> {
    letters: Vec<char>,
    tiles: &'t [OpenTile],
    used: Vec<bool>,
    current: String,
    path: Vec<usize>,
}

impl<'t> Search<'t> {
    fn new(tiles: &'t [OpenTile]) -> Self {
        Self {
            letters: tiles
                .iter()
                .map(|tile| tile.letter.to_uppercase().next().unwrap_or(tile.letter))
                .collect(),
            tiles,
            used: vec![false; tiles.len()],
            current: String::with_capacity(tiles.len()),
            path: Vec::with_capacity(tiles.len()),
        }
    }

    /// Indices of unused tiles worth descending into from the current node.
    /// Identical letters at the same depth spell identical subtrees, so only
    /// the first tile of each letter is tried.
    fn branches(&self) -> Vec<usize> {
        let mut seen = Vec::with_capacity(self.letters.len());
        (0..self.letters.len())
            .filter(|&i| {
                if self.used[i] || seen.contains(&self.letters[i]) {
                    return false;
                }
                seen.push(self.letters[i]);
                true
            })
            .collect()
    }

    fn push(&mut self, i: usize) {
        self.used[i] = true;
        self.current.push(self.letters[i]);
        self.path.push(self.tiles[i].tile_index);
    }

    fn pop(&mut self, i: usize) {
        self.path.pop();
        self.current.pop();
        self.used[i] = false;
    }
}

impl<'a> WordSolver<'a> {
    pub fn new(dictionary: &'a Dictionary, min_word_length: usize) -> Self {
        Self {
            dictionary,
            min_word_length,
            max_word_length: None,
            excluded: None,
        }
    }

    /// Skip words in `words` (upper case), e.g. the ones already scored
    pub fn excluding(mut self, words: &'a HashSet<String>) -> Self {
        self.excluded = Some(words);
        self
    }

    /// Never build words longer than `max` letters (e.g. the slot row length)
    pub fn with_max_length(mut self, max: usize) -> Self {
        self.max_word_length = Some(max);
        self
    }

    fn at_max_length(&self, search: &Search) -> bool {
        self.max_word_length
            .is_some_and(|max| search.path.len() >= max)
    }

    /// Longest dictionary word spellable from `open_tiles`, higher score
    /// breaking length ties and the first one found winning exact ties
    pub fn find_best_open_word(&self, open_tiles: &[OpenTile]) -> Option<Solution> {
        if open_tiles.is_empty() {
            return None;
        }

        let mut search = Search::new(open_tiles);
        let mut best = None;
        self.search_best(&mut search, &mut best);

        match &best {
            Some(solution) => tracing::debug!(
                "Best open word \"{}\" ({} points) from {} open tiles",
                solution.word,
                solution.score,
                open_tiles.len()
            ),
            None => tracing::debug!("No word found among {} open tiles", open_tiles.len()),
        }
        best
    }

    /// True as soon as any word of the minimum length is spellable
    pub fn exists_any_valid_word(&self, open_tiles: &[OpenTile]) -> bool {
        if open_tiles.is_empty() {
            return false;
        }
        self.search_any(&mut Search::new(open_tiles))
    }

    fn is_candidate(&self, search: &Search) -> bool {
        search.path.len() >= self.min_word_length
            && self.dictionary.is_word(&search.current)
            && !self
                .excluded
                .is_some_and(|words| words.contains(&search.current))
    }

    fn search_best(&self, search: &mut Search, best: &mut Option<Solution>) {
        if !search.current.is_empty() && !self.dictionary.is_prefix(&search.current) {
            return;
        }

        if self.is_candidate(search) {
            let length = search.path.len();
            let score = Scorer::compute_word_score(&search.current);
            let better = match best {
                None => true,
                Some(current_best) => {
                    let best_length = current_best.path.len();
                    length > best_length || (length == best_length && score > current_best.score)
                }
            };
            if better {
                *best = Some(Solution {
                    word: search.current.clone(),
                    path: search.path.clone(),
                    score,
                });
            }
        }

        if self.at_max_length(search) {
            return;
        }
        for i in search.branches() {
            search.push(i);
            self.search_best(search, best);
            search.pop(i);
        }
    }

    fn search_any(&self, search: &mut Search) -> bool {
        if !search.current.is_empty() && !self.dictionary.is_prefix(&search.current) {
            return false;
        }

        if self.is_candidate(search) {
            return true;
        }

        if self.at_max_length(search) {
            return false;
        }
        for i in search.branches() {
            search.push(i);
            let found = self.search_any(search);
            search.pop(i);
            if found {
                return true;
            }
        }
        false
    }
}
