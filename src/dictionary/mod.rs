use std::borrow::Cow;
use std::collections::HashSet;
use std::path::Path;
use tokio::fs;
use anyhow::{Context, Result};

/// Word list with a companion prefix set.
///
/// Every entry is stored upper-cased. The prefix set holds every non-empty
/// leading substring of every word, so both lookups are plain hash probes.
pub struct Dictionary {
    words: HashSet<String>,
    prefixes: HashSet<String>,
}

impl Dictionary {
    /// Load dictionary from a file (one word per line)
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read dictionary {}", path.display()))?;
        let dictionary = Self::from_words(content.lines());

        tracing::info!("Loaded {} words into dictionary", dictionary.len());

        Ok(dictionary)
    }

    /// Build a dictionary from any sequence of words
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut dictionary = Self::empty();
        for raw in words {
            let word = raw.as_ref().trim().to_uppercase();
            if word.is_empty() {
                continue;
            }
            for (idx, ch) in word.char_indices() {
                dictionary.prefixes.insert(word[..idx + ch.len_utf8()].to_string());
            }
            dictionary.words.insert(word);
        }
        dictionary
    }

    /// Create an empty dictionary
    pub fn empty() -> Self {
        Self {
            words: HashSet::new(),
            prefixes: HashSet::new(),
        }
    }

    /// Check if a word exists in the dictionary
    pub fn is_word(&self, word: &str) -> bool {
        self.words.contains(normalize(word).as_ref())
    }

    /// Check if some dictionary word starts with `prefix`
    pub fn is_prefix(&self, prefix: &str) -> bool {
        if prefix.is_empty() {
            return !self.is_empty();
        }
        self.prefixes.contains(normalize(prefix).as_ref())
    }

    /// Get the number of words in the dictionary
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Check if dictionary is empty
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

// Solver queries are already upper-case; skip the allocation for them.
fn normalize(s: &str) -> Cow<'_, str> {
    if s.chars().any(|ch| ch.is_lowercase()) {
        Cow::Owned(s.to_uppercase())
    } else {
        Cow::Borrowed(s)
    }
}
