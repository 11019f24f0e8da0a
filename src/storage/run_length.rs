//! Run-length encoded side table.
//!
//! Per-character annotations (classification, marking flags) are usually
//! uniform over long stretches. [`RunLengthArray`] stores them as runs and
//! keeps the runs coalesced: two adjacent runs never hold equal values, so the
//! run count is bounded by the number of actual value transitions.

use crate::error::{Error, Result};
use std::ops::Range;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Run<T> {
    start: usize,
    len: usize,
    value: T,
}

impl<T> Run<T> {
    #[inline]
    fn end(&self) -> usize {
        self.start + self.len
    }
}

/// Logically a `[T]` of arbitrary length, physically `(value, length)` runs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunLengthArray<T> {
    runs: Vec<Run<T>>,
    len: usize,
}

impl<T: Copy + PartialEq> RunLengthArray<T> {
    /// Create an empty array.
    #[must_use]
    pub fn new() -> Self {
        Self {
            runs: Vec::new(),
            len: 0,
        }
    }

    /// Create an array of `len` copies of `value`.
    #[must_use]
    pub fn filled(value: T, len: usize) -> Self {
        let mut array = Self::new();
        if len > 0 {
            array.runs.push(Run {
                start: 0,
                len,
                value,
            });
            array.len = len;
        }
        array
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of stored runs.
    #[must_use]
    pub fn run_count(&self) -> usize {
        self.runs.len()
    }

    /// Index of the run containing `index`. Requires `index < len`.
    #[inline]
    fn run_index(&self, index: usize) -> usize {
        self.runs.partition_point(|run| run.end() <= index)
    }

    /// Value at `index`, or `None` past the end.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<T> {
        if index >= self.len {
            return None;
        }
        Some(self.runs[self.run_index(index)].value)
    }

    /// Set one element.
    pub fn set(&mut self, index: usize, value: T) -> Result<()> {
        if index >= self.len {
            return Err(Error::OutOfRange {
                index,
                len: self.len,
            });
        }
        self.set_range(index..index + 1, value)
    }

    /// Set every element in `range` to `value`.
    pub fn set_range(&mut self, range: Range<usize>, value: T) -> Result<()> {
        self.check_range(&range)?;
        if range.is_empty() {
            return Ok(());
        }
        let first = self.split_at(range.start);
        let last = self.split_at(range.end);
        self.runs.splice(
            first..last,
            std::iter::once(Run {
                start: range.start,
                len: range.len(),
                value,
            }),
        );
        self.coalesce(first.saturating_sub(1), first + 1);
        Ok(())
    }

    /// Replace every element `v` in `range` with `f(v)`.
    pub fn update_range<F>(&mut self, range: Range<usize>, f: F) -> Result<()>
    where
        F: Fn(T) -> T,
    {
        self.check_range(&range)?;
        if range.is_empty() {
            return Ok(());
        }
        let first = self.split_at(range.start);
        let last = self.split_at(range.end);
        for run in &mut self.runs[first..last] {
            run.value = f(run.value);
        }
        self.coalesce(first.saturating_sub(1), last);
        Ok(())
    }

    /// Insert `count` copies of `value` at `index`.
    pub fn insert(&mut self, index: usize, value: T, count: usize) -> Result<()> {
        if index > self.len {
            return Err(Error::OutOfRange {
                index,
                len: self.len,
            });
        }
        if count == 0 {
            return Ok(());
        }
        let at = self.split_at(index);
        self.shift_from(at, count, true);
        self.runs.insert(
            at,
            Run {
                start: index,
                len: count,
                value,
            },
        );
        self.len += count;
        self.coalesce(at.saturating_sub(1), at + 1);
        Ok(())
    }

    /// Insert `values` so that the first one lands at `index`.
    pub fn insert_range(&mut self, index: usize, values: &[T]) -> Result<()> {
        if index > self.len {
            return Err(Error::OutOfRange {
                index,
                len: self.len,
            });
        }
        let mut at = index;
        for group in values.chunk_by(|a, b| a == b) {
            self.insert(at, group[0], group.len())?;
            at += group.len();
        }
        Ok(())
    }

    /// Remove the elements in `range`.
    pub fn remove_range(&mut self, range: Range<usize>) -> Result<()> {
        self.check_range(&range)?;
        if range.is_empty() {
            return Ok(());
        }
        let first = self.split_at(range.start);
        let last = self.split_at(range.end);
        self.runs.drain(first..last);
        self.shift_from(first, range.len(), false);
        self.len -= range.len();
        self.coalesce(first.saturating_sub(1), first);
        Ok(())
    }

    /// Drop every element.
    pub fn clear(&mut self) {
        self.runs.clear();
        self.len = 0;
    }

    /// Iterate runs as `(range, value)` pairs.
    pub fn runs(&self) -> impl Iterator<Item = (Range<usize>, T)> + '_ {
        self.runs.iter().map(|run| (run.start..run.end(), run.value))
    }

    /// Iterate every element.
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        self.runs
            .iter()
            .flat_map(|run| std::iter::repeat_n(run.value, run.len))
    }

    fn check_range(&self, range: &Range<usize>) -> Result<()> {
        if range.start > range.end || range.end > self.len {
            return Err(Error::InvalidRange {
                begin: range.start,
                end: range.end,
                len: self.len,
            });
        }
        Ok(())
    }

    /// Ensure a run boundary at `offset` and return the index of the run that
    /// starts there (`runs.len()` when `offset == len`).
    fn split_at(&mut self, offset: usize) -> usize {
        if offset >= self.len {
            return self.runs.len();
        }
        let idx = self.run_index(offset);
        let run = self.runs[idx];
        if run.start == offset {
            return idx;
        }
        let head = offset - run.start;
        self.runs[idx].len = head;
        self.runs.insert(
            idx + 1,
            Run {
                start: offset,
                len: run.len - head,
                value: run.value,
            },
        );
        idx + 1
    }

    fn shift_from(&mut self, from: usize, delta: usize, forward: bool) {
        for run in &mut self.runs[from..] {
            if forward {
                run.start += delta;
            } else {
                run.start -= delta;
            }
        }
    }

    /// Merge equal neighbours among runs `from..=to`.
    fn coalesce(&mut self, from: usize, to: usize) {
        let mut i = from;
        let mut to = to.min(self.runs.len().saturating_sub(1));
        while i < to {
            if self.runs[i].value == self.runs[i + 1].value {
                self.runs[i].len += self.runs[i + 1].len;
                self.runs.remove(i + 1);
                to -= 1;
            } else {
                i += 1;
            }
        }
        debug_assert!(self.is_coalesced(), "adjacent runs hold equal values");
    }

    fn is_coalesced(&self) -> bool {
        self.runs
            .windows(2)
            .all(|pair| pair[0].value != pair[1].value && pair[0].end() == pair[1].start)
    }
}

impl<T: Copy + PartialEq> Default for RunLengthArray<T> {
    fn default() -> Self {
        Self::new()
    }
}
