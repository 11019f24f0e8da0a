//! Per-line dirty state.

use crate::error::Result;
use crate::storage::GapSequence;

/// Redraw/save state of one line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LineDirtyState {
    /// Unchanged since load or since the last [`clear`](DirtyTable::clear_all).
    #[default]
    Clean,
    /// Modified and not yet saved.
    Dirty,
    /// Modified, then saved.
    Saved,
}

/// One [`LineDirtyState`] per line, kept parallel to the line index.
#[derive(Clone, Debug, PartialEq)]
pub struct DirtyTable {
    states: GapSequence<LineDirtyState>,
}

impl DirtyTable {
    /// Table for a single clean line.
    #[must_use]
    pub fn new() -> Self {
        Self::with_lines(1)
    }

    /// Table of `lines` clean lines.
    #[must_use]
    pub fn with_lines(lines: usize) -> Self {
        Self {
            states: GapSequence::from_slice(&vec![LineDirtyState::Clean; lines]),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    #[must_use]
    pub fn get(&self, line: usize) -> Option<LineDirtyState> {
        self.states.get(line)
    }

    pub fn set(&mut self, line: usize, state: LineDirtyState) -> Result<()> {
        self.states.set(line, state)
    }

    /// Insert `count` entries of `state` before `line`.
    pub(crate) fn insert(&mut self, line: usize, state: LineDirtyState, count: usize) -> Result<()> {
        self.states
            .insert_iter(line, std::iter::repeat_n(state, count))
            .map(|_| ())
    }

    pub(crate) fn remove(&mut self, line: usize, count: usize) -> Result<()> {
        self.states.remove_range(line, count)
    }

    /// States of `lines` (clamped).
    #[must_use]
    pub fn states(&self, first: usize, end: usize) -> Vec<LineDirtyState> {
        self.states.to_vec_range(first, end)
    }

    /// Overwrite consecutive states starting at `first`.
    pub(crate) fn restore(&mut self, first: usize, states: &[LineDirtyState]) -> Result<()> {
        for (i, &state) in states.iter().enumerate() {
            self.states.set(first + i, state)?;
        }
        Ok(())
    }

    /// Turn every `Dirty` line into `Saved`.
    pub fn mark_saved(&mut self) {
        self.states.for_each_from_mut(0, |state| {
            if *state == LineDirtyState::Dirty {
                *state = LineDirtyState::Saved;
            }
        });
    }

    /// Turn every line `Clean`.
    pub fn clear_all(&mut self) {
        self.states
            .for_each_from_mut(0, |state| *state = LineDirtyState::Clean);
    }

    pub fn iter(&self) -> impl Iterator<Item = LineDirtyState> + '_ {
        self.states.iter()
    }
}

impl Default for DirtyTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_saved_only_touches_dirty() {
        let mut table = DirtyTable::with_lines(3);
        table.set(1, LineDirtyState::Dirty).unwrap();
        table.mark_saved();
        assert_eq!(
            table.iter().collect::<Vec<_>>(),
            vec![
                LineDirtyState::Clean,
                LineDirtyState::Saved,
                LineDirtyState::Clean
            ]
        );
        table.clear_all();
        assert!(table.iter().all(|s| s == LineDirtyState::Clean));
    }

    #[test]
    fn test_insert_remove_restore() {
        let mut table = DirtyTable::new();
        table.insert(1, LineDirtyState::Dirty, 2).unwrap();
        assert_eq!(table.len(), 3);
        let saved = table.states(0, 3);
        table.remove(1, 1).unwrap();
        assert_eq!(table.len(), 2);
        table.insert(1, LineDirtyState::Clean, 1).unwrap();
        table.restore(0, &saved).unwrap();
        assert_eq!(table.states(0, 3), saved);
        assert!(table.set(5, LineDirtyState::Dirty).is_err());
    }
}
