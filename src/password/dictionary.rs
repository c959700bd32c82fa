//! Word list used by the strength checker.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use tracing::warn;

use crate::errors::Result;

/// Words shorter than this are ignored.
const MIN_WORD_LEN: usize = 3;

/// A set of lowercase dictionary words.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    words: BTreeSet<String>,
}

impl Dictionary {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a dictionary from any list of words.
    pub fn from_words<I, W>(words: I) -> Self
    where
        I: IntoIterator<Item = W>,
        W: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| w.chars().count() >= MIN_WORD_LEN)
            .collect();
        Self { words }
    }

    /// Load a newline-separated word list.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)?;
        let contents = String::from_utf8_lossy(&bytes);
        Ok(Self::from_words(contents.lines()))
    }

    /// Load a word list, falling back to an empty dictionary (with a
    /// warning) if no path is configured or the file is unreadable.
    pub fn load_or_empty(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::empty();
        };
        match Self::load(path) {
            Ok(dict) => dict,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "dictionary unavailable");
                Self::empty()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }
}
