//! Anchor/caret selection.

use std::ops::Range;

/// A selection as an anchor and a caret, both character offsets.
///
/// The anchor stays where the selection started; the caret moves. They may
/// appear in either order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Selection {
    pub anchor: usize,
    pub caret: usize,
}

impl Selection {
    #[must_use]
    pub fn new(anchor: usize, caret: usize) -> Self {
        Self { anchor, caret }
    }

    /// Empty selection at `offset`.
    #[must_use]
    pub fn caret_at(offset: usize) -> Self {
        Self::new(offset, offset)
    }

    /// Normalized `begin..end` range.
    #[must_use]
    pub fn range(&self) -> Range<usize> {
        self.begin()..self.end()
    }

    #[must_use]
    pub fn begin(&self) -> usize {
        self.anchor.min(self.caret)
    }

    #[must_use]
    pub fn end(&self) -> usize {
        self.anchor.max(self.caret)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.anchor == self.caret
    }

    /// Whether the caret sits before the anchor.
    #[must_use]
    pub fn is_reversed(&self) -> bool {
        self.caret < self.anchor
    }

    /// Shift both ends for a replacement of `range` by `new_len` characters.
    #[must_use]
    pub fn adjusted(self, range: Range<usize>, new_len: usize) -> Self {
        Self {
            anchor: adjust_offset(self.anchor, &range, new_len),
            caret: adjust_offset(self.caret, &range, new_len),
        }
    }
}

/// Map an offset across a replacement of `range` by `new_len` characters.
///
/// Offsets at or after `range.end` shift by the length difference, offsets
/// strictly inside collapse to the end of the new text, and offsets before
/// the range (or at its start, for a non-empty range) stay put.
#[must_use]
pub fn adjust_offset(offset: usize, range: &Range<usize>, new_len: usize) -> usize {
    if offset >= range.end {
        offset - range.len() + new_len
    } else if offset > range.start {
        range.start + new_len
    } else {
        offset
    }
}

/// Owner of the current selection.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionManager {
    current: Selection,
}

impl SelectionManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self) -> Selection {
        self.current
    }

    pub(crate) fn set(&mut self, selection: Selection) {
        self.current = selection;
    }

    /// Normalized selected range.
    #[must_use]
    pub fn range(&self) -> Range<usize> {
        self.current.range()
    }

    #[must_use]
    pub fn caret(&self) -> usize {
        self.current.caret
    }

    #[must_use]
    pub fn anchor(&self) -> usize {
        self.current.anchor
    }

    pub(crate) fn adjust_for_edit(&mut self, range: Range<usize>, new_len: usize) {
        self.current = self.current.adjusted(range, new_len);
    }
}
