//! Character storage with in-place search.
//!
//! [`TextStore`] is a [`GapSequence<char>`] that can search for a pattern by
//! walking logical positions straight through the gap, without first copying
//! the document into a contiguous string.

use crate::error::{Error, Result};
use crate::storage::GapSequence;
use crate::unicode::chars_match;
use std::fmt;
use std::ops::Range;

/// Gap-buffered document characters.
#[derive(Clone, Default, PartialEq)]
pub struct TextStore {
    chars: GapSequence<char>,
}

impl TextStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store with room for `capacity` characters.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            chars: GapSequence::with_capacity(capacity),
        }
    }

    /// Create a store holding `text`.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Character at `offset`.
    #[inline]
    #[must_use]
    pub fn char_at(&self, offset: usize) -> Option<char> {
        self.chars.get(offset)
    }

    /// Iterate every character.
    pub fn chars(&self) -> impl DoubleEndedIterator<Item = char> + '_ {
        self.chars.iter()
    }

    /// Iterate the characters in `range` (clamped).
    pub fn chars_in(&self, range: Range<usize>) -> impl DoubleEndedIterator<Item = char> + '_ {
        self.chars.iter_range(range.start, range.end)
    }

    /// Copy `range` (clamped) into a `String`.
    #[must_use]
    pub fn slice(&self, range: Range<usize>) -> String {
        self.chars_in(range).collect()
    }

    /// Insert `text` at `offset`, returning the number of characters inserted.
    pub fn insert(&mut self, offset: usize, text: &str) -> Result<usize> {
        self.chars.insert_iter(offset, text.chars())
    }

    /// Remove `range`.
    pub fn remove(&mut self, range: Range<usize>) -> Result<()> {
        if range.start > range.end {
            return Err(Error::InvalidRange {
                begin: range.start,
                end: range.end,
                len: self.len(),
            });
        }
        self.chars.remove_range(range.start, range.len())
    }

    /// Replace the whole content.
    pub fn set_text(&mut self, text: &str) {
        self.chars = text.chars().collect();
    }

    /// First occurrence of `pattern` starting at or after `start`.
    #[must_use]
    pub fn index_of(&self, pattern: &str, start: usize, case_sensitive: bool) -> Option<usize> {
        self.index_of_in(pattern, start..self.len(), case_sensitive)
    }

    /// First occurrence of `pattern` whose start lies in `range`.
    ///
    /// The match itself may extend past `range.end`. Use this to split a long
    /// scan into chunks and check for cancellation in between.
    #[must_use]
    pub fn index_of_in(
        &self,
        pattern: &str,
        range: Range<usize>,
        case_sensitive: bool,
    ) -> Option<usize> {
        let needle: Vec<char> = pattern.chars().collect();
        let len = self.len();
        if needle.is_empty() {
            return (range.start <= len && range.start <= range.end).then_some(range.start);
        }
        if needle.len() > len {
            return None;
        }
        let last_start = len - needle.len();
        let end = range.end.min(last_start + 1);
        (range.start..end).find(|&pos| self.matches_at(&needle, pos, case_sensitive))
    }

    /// Last occurrence of `pattern` that ends at or before `end`.
    #[must_use]
    pub fn last_index_of(&self, pattern: &str, end: usize, case_sensitive: bool) -> Option<usize> {
        let needle: Vec<char> = pattern.chars().collect();
        let end = end.min(self.len());
        if needle.is_empty() {
            return Some(end);
        }
        if needle.len() > end {
            return None;
        }
        (0..=end - needle.len())
            .rev()
            .find(|&pos| self.matches_at(&needle, pos, case_sensitive))
    }

    fn matches_at(&self, needle: &[char], pos: usize, case_sensitive: bool) -> bool {
        self.chars
            .iter_range(pos, pos + needle.len())
            .zip(needle.iter())
            .all(|(a, &b)| chars_match(a, b, case_sensitive))
    }
}

impl fmt::Display for TextStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (front, back) = self.chars.as_slices();
        for ch in front.iter().chain(back.iter()) {
            fmt::Write::write_char(f, *ch)?;
        }
        Ok(())
    }
}

impl fmt::Debug for TextStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TextStore({:?})", self.to_string())
    }
}
