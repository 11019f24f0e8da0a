//! Line head index with incremental maintenance.
//!
//! The index stores the offset of the first character of every line as a
//! strictly increasing sequence starting at `0`. Whether a position `p` is a
//! line head depends only on the characters at `p - 1` and `p`: it is one when
//! `p - 1` holds `\n`, or holds `\r` not followed by `\n`. An edit of
//! `begin..begin + old_len` into `begin..begin + new_len` can therefore only
//! change the status of positions `begin..=begin + new_len`; every head before
//! `begin` stays put and every head after the edit shifts by the length
//! difference. This keeps a `\r\n` pair a single terminator whichever side of
//! an edit boundary its halves end up on.

use crate::error::{Error, Result};
use crate::storage::{GapSequence, TextStore};
use crate::text::dirty::{DirtyTable, LineDirtyState};
use crate::unicode::{find_line_breaks, is_line_head};
use std::ops::Range;

/// Sorted line heads plus the parallel [`DirtyTable`].
#[derive(Clone, Debug, PartialEq)]
pub struct LineIndex {
    heads: GapSequence<usize>,
    dirty: DirtyTable,
}

impl LineIndex {
    /// Index of an empty document: one line starting at 0.
    #[must_use]
    pub fn new() -> Self {
        Self {
            heads: GapSequence::from_slice(&[0]),
            dirty: DirtyTable::new(),
        }
    }

    /// Build the index by scanning `store`. Every line starts clean.
    #[must_use]
    pub fn from_store(store: &TextStore) -> Self {
        let heads = Self::scan(store.chars());
        let dirty = DirtyTable::with_lines(heads.len());
        Self {
            heads: GapSequence::from_slice(&heads),
            dirty,
        }
    }

    /// Line heads of `chars` computed from scratch.
    pub fn scan<I>(chars: I) -> Vec<usize>
    where
        I: IntoIterator<Item = char>,
    {
        std::iter::once(0)
            .chain(find_line_breaks(chars).heads())
            .collect()
    }

    /// Number of lines; at least 1.
    #[inline]
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.heads.len()
    }

    /// Offset of the first character of `line`.
    #[inline]
    #[must_use]
    pub fn line_head(&self, line: usize) -> Option<usize> {
        self.heads.get(line)
    }

    /// Line containing `offset`. Offsets past the end map to the last line.
    #[must_use]
    pub fn line_of_offset(&self, offset: usize) -> usize {
        match self.heads.binary_search(&offset) {
            Ok(line) => line,
            Err(line) => line.saturating_sub(1),
        }
    }

    /// Range of `line` including its terminator.
    #[must_use]
    pub fn line_range(&self, line: usize, store: &TextStore) -> Option<Range<usize>> {
        let head = self.heads.get(line)?;
        let end = self.heads.get(line + 1).unwrap_or(store.len());
        Some(head..end)
    }

    /// Range of `line` excluding its terminator.
    #[must_use]
    pub fn line_content_range(&self, line: usize, store: &TextStore) -> Option<Range<usize>> {
        let range = self.line_range(line, store)?;
        let mut end = range.end;
        if end > range.start && store.char_at(end - 1) == Some('\n') {
            end -= 1;
        }
        if end > range.start && store.char_at(end - 1) == Some('\r') {
            end -= 1;
        }
        Some(range.start..end)
    }

    /// Snapshot of every head.
    #[must_use]
    pub fn heads(&self) -> Vec<usize> {
        self.heads.iter().collect()
    }

    #[must_use]
    pub fn dirty(&self) -> &DirtyTable {
        &self.dirty
    }

    pub(crate) fn dirty_mut(&mut self) -> &mut DirtyTable {
        &mut self.dirty
    }

    /// Lines whose content or terminator an edit touching `begin..end` can
    /// change.
    #[must_use]
    pub fn affected_lines(&self, begin: usize, end: usize) -> Range<usize> {
        let first = self.heads.partition_point(|&h| h < begin.max(1));
        let last = self.heads.partition_point(|&h| h <= end);
        first.saturating_sub(1)..last.max(first)
    }

    /// Update after `len` characters were removed at `begin` from `store`.
    pub fn on_remove(&mut self, store: &TextStore, begin: usize, len: usize) -> Result<Range<usize>> {
        self.reindex(store, begin, len, 0)
    }

    /// Update after `len` characters were inserted at `begin` into `store`.
    pub fn on_insert(&mut self, store: &TextStore, begin: usize, len: usize) -> Result<Range<usize>> {
        self.reindex(store, begin, 0, len)
    }

    /// Re-derive heads around an edit that turned `begin..begin + old_len`
    /// into `begin..begin + new_len`. `store` already holds the new text.
    ///
    /// Returns the affected lines in the new numbering (see
    /// [`affected_lines`](Self::affected_lines)). Re-derived lines are
    /// inserted `Dirty`, and the line containing `begin` is marked `Dirty`.
    fn reindex(
        &mut self,
        store: &TextStore,
        begin: usize,
        old_len: usize,
        new_len: usize,
    ) -> Result<Range<usize>> {
        let old_end = begin + old_len;
        let new_end = begin + new_len;
        let scan_from = begin.max(1);

        let lo = self.heads.partition_point(|&h| h < scan_from);
        let hi = self.heads.partition_point(|&h| h <= old_end);
        if hi > lo {
            self.heads.remove_range(lo, hi - lo)?;
            self.dirty.remove(lo, hi - lo)?;
        }

        if new_len != old_len {
            self.heads
                .for_each_from_mut(lo, |head| *head = *head - old_len + new_len);
        }

        let fresh: Vec<usize> = (scan_from..=new_end)
            .filter(|&q| is_line_head(store.char_at(q - 1), store.char_at(q)))
            .collect();
        self.heads.insert_range(lo, &fresh)?;
        self.dirty.insert(lo, LineDirtyState::Dirty, fresh.len())?;

        let first = lo - 1;
        let edited_line = if fresh.first() == Some(&begin) { lo } else { first };
        self.dirty.set(edited_line, LineDirtyState::Dirty)?;

        tracing::trace!(
            begin,
            old_len,
            new_len,
            removed = hi - lo,
            added = fresh.len(),
            "reindexed lines"
        );
        Ok(first..lo + fresh.len())
    }

    /// Compare the maintained index against a full rescan of `store`.
    pub fn check(&self, store: &TextStore) -> Result<()> {
        let expected = Self::scan(store.chars());
        let actual = self.heads();
        if actual != expected {
            return Err(Error::Integrity(format!(
                "line heads {actual:?} differ from rescan {expected:?}"
            )));
        }
        if self.dirty.len() != self.heads.len() {
            return Err(Error::Integrity(format!(
                "{} dirty states for {} lines",
                self.dirty.len(),
                self.heads.len()
            )));
        }
        Ok(())
    }
}

impl Default for LineIndex {
    fn default() -> Self {
        Self::new()
    }
}
