//! Word list cleaning and validation.
//!
//! The builder only accepts lists of at least two unique, non-empty,
//! purely alphabetic words. [`WordList::clean`] produces such a list from
//! raw tokens; [`validate`] checks an existing one without changing it.

use ahash::AHashSet;

use crate::error::{BuildError, Result};

/// Fewest words a tree can be built from: a root and one child.
pub const MIN_WORDS: usize = 2;

/// A cleaned, deduplicated, sorted word list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordList {
    words: Vec<String>,
}

impl WordList {
    /// Drop every token that is not purely alphabetic, remove duplicates and
    /// sort ascending.
    ///
    /// Punctuation-bearing and empty tokens are dropped by the alphabetic
    /// check. Fails if fewer than two words remain.
    pub fn clean<I, S>(raw: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = AHashSet::new();
        let mut words: Vec<String> = raw
            .into_iter()
            .filter(|token| is_alphabetic_word(token.as_ref()))
            .filter(|token| seen.insert(token.as_ref().to_string()))
            .map(|token| token.as_ref().to_string())
            .collect();
        words.sort_unstable();

        if words.len() < MIN_WORDS {
            return Err(BuildError::invalid(format!(
                "need at least {MIN_WORDS} distinct alphabetic words after cleaning, got {}",
                words.len()
            )));
        }
        Ok(Self { words })
    }

    /// Split on whitespace, then [`clean`](Self::clean).
    pub fn parse(text: &str) -> Result<Self> {
        Self::clean(text.split_whitespace())
    }

    pub fn as_slice(&self) -> &[String] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn into_inner(self) -> Vec<String> {
        self.words
    }
}

impl AsRef<[String]> for WordList {
    fn as_ref(&self) -> &[String] {
        &self.words
    }
}

/// Check the builder's preconditions.
///
/// Requires at least two words, each non-empty, purely alphabetic and
/// unique. Order is not checked; the first word becomes the root.
pub fn validate<S: AsRef<str>>(words: &[S]) -> Result<()> {
    if words.len() < MIN_WORDS {
        return Err(BuildError::invalid(format!(
            "word list must contain at least {MIN_WORDS} words, got {}",
            words.len()
        )));
    }

    let mut seen: AHashSet<&str> = AHashSet::with_capacity(words.len());
    for (position, word) in words.iter().enumerate() {
        let word = word.as_ref();
        if word.is_empty() {
            return Err(BuildError::invalid(format!("empty word at position {position}")));
        }
        if !is_alphabetic_word(word) {
            return Err(BuildError::invalid(format!(
                "word '{word}' at position {position} contains non-alphabetic characters"
            )));
        }
        if !seen.insert(word) {
            return Err(BuildError::invalid(format!(
                "duplicate word '{word}' at position {position}"
            )));
        }
    }
    Ok(())
}

#[inline]
fn is_alphabetic_word(word: &str) -> bool {
    !word.is_empty() && word.chars().all(char::is_alphabetic)
}
