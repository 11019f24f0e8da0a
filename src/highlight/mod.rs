//! Character classification for highlighters.
//!
//! The document stores one [`CharClass`] per character in a run-length side
//! table but never interprets it. A [`Highlighter`] gets a [`HighlightScope`]
//! for the duration of one call: read access to the text and write access to
//! the class table, nothing that outlives the call.

mod registry;

pub use registry::HighlighterRegistry;

use crate::error::{Error, Result};
use crate::storage::{RunLengthArray, TextStore};
use std::ops::Range;

/// Opaque per-character class value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CharClass(pub u16);

impl CharClass {
    /// Class of unclassified text.
    pub const NORMAL: Self = Self(0);
}

/// Pattern-matching add-on that classifies characters.
pub trait Highlighter {
    /// Classify the characters in `dirty`.
    ///
    /// Implementations may widen or shrink `dirty` to report the range they
    /// actually processed.
    fn highlight(&mut self, scope: &mut HighlightScope<'_>, dirty: &mut Range<usize>);
}

/// Access granted to a highlighter for one call.
pub struct HighlightScope<'a> {
    text: &'a TextStore,
    classes: &'a mut RunLengthArray<CharClass>,
}

impl<'a> HighlightScope<'a> {
    pub(crate) fn new(text: &'a TextStore, classes: &'a mut RunLengthArray<CharClass>) -> Self {
        Self { text, classes }
    }

    /// Document length in characters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    #[must_use]
    pub fn char_at(&self, offset: usize) -> Option<char> {
        self.text.char_at(offset)
    }

    /// Characters in `range` (clamped).
    pub fn chars_in(&self, range: Range<usize>) -> impl DoubleEndedIterator<Item = char> + '_ {
        self.text.chars_in(range)
    }

    #[must_use]
    pub fn class_at(&self, offset: usize) -> Option<CharClass> {
        self.classes.get(offset)
    }

    /// Classify one character.
    pub fn set_class(&mut self, offset: usize, class: CharClass) -> Result<()> {
        self.classes.set(offset, class)
    }

    /// Classify every character in `range`.
    pub fn set_class_range(&mut self, range: Range<usize>, class: CharClass) -> Result<()> {
        if range.end > self.text.len() || range.start > range.end {
            return Err(Error::InvalidRange {
                begin: range.start,
                end: range.end,
                len: self.text.len(),
            });
        }
        self.classes.set_range(range, class)
    }
}
