//! Bounded undo/redo history.
//!
//! Actions are recorded in groups; one group is one user-visible undo step.
//! Outside of an explicit group every action forms its own group. Recording
//! clears the redo stack (linear history), and once more than `capacity`
//! groups are on the undo stack the oldest are evicted for good.

use crate::text::dirty::LineDirtyState;
use crate::text::selection::Selection;

/// Default maximum number of undo groups to retain.
pub const DEFAULT_HISTORY_CAPACITY: usize = 1000;

/// Kind of a recorded edit, derived from what it inserted and deleted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditKind {
    Insert,
    Delete,
    Replace,
}

/// One recorded primitive edit.
///
/// Holds everything needed to replay the edit in either direction
/// byte-for-byte, including the dirty states of the lines it touched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditAction {
    begin: usize,
    deleted: String,
    deleted_len: usize,
    inserted: String,
    inserted_len: usize,
    selection_before: Selection,
    selection_after: Selection,
    first_line: usize,
    dirty_before: Vec<LineDirtyState>,
    dirty_after: Vec<LineDirtyState>,
}

impl EditAction {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        begin: usize,
        deleted: String,
        inserted: String,
        selection_before: Selection,
        selection_after: Selection,
        first_line: usize,
        dirty_before: Vec<LineDirtyState>,
        dirty_after: Vec<LineDirtyState>,
    ) -> Self {
        Self {
            begin,
            deleted_len: deleted.chars().count(),
            deleted,
            inserted_len: inserted.chars().count(),
            inserted,
            selection_before,
            selection_after,
            first_line,
            dirty_before,
            dirty_after,
        }
    }

    #[must_use]
    pub fn kind(&self) -> EditKind {
        match (self.deleted.is_empty(), self.inserted.is_empty()) {
            (true, _) => EditKind::Insert,
            (false, true) => EditKind::Delete,
            (false, false) => EditKind::Replace,
        }
    }

    /// Offset where the edit starts.
    #[must_use]
    pub fn begin(&self) -> usize {
        self.begin
    }

    #[must_use]
    pub fn deleted(&self) -> &str {
        &self.deleted
    }

    #[must_use]
    pub fn inserted(&self) -> &str {
        &self.inserted
    }

    /// Length of the deleted text in characters.
    #[must_use]
    pub fn deleted_len(&self) -> usize {
        self.deleted_len
    }

    /// Length of the inserted text in characters.
    #[must_use]
    pub fn inserted_len(&self) -> usize {
        self.inserted_len
    }

    #[must_use]
    pub fn selection_before(&self) -> Selection {
        self.selection_before
    }

    #[must_use]
    pub fn selection_after(&self) -> Selection {
        self.selection_after
    }

    pub(crate) fn first_line(&self) -> usize {
        self.first_line
    }

    pub(crate) fn dirty_before(&self) -> &[LineDirtyState] {
        &self.dirty_before
    }

    pub(crate) fn dirty_after(&self) -> &[LineDirtyState] {
        &self.dirty_after
    }
}

/// Result of an undo or redo request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HistoryStatus {
    /// A group of `actions` edits was replayed.
    Applied { actions: usize },
    NothingToUndo,
    NothingToRedo,
}

impl HistoryStatus {
    #[must_use]
    pub fn is_applied(self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

/// Undo and redo stacks of action groups.
#[derive(Clone, Debug)]
pub struct EditHistory {
    undo_stack: Vec<Vec<EditAction>>,
    redo_stack: Vec<Vec<EditAction>>,
    open_group: Vec<EditAction>,
    group_depth: usize,
    capacity: usize,
}

impl Default for EditHistory {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }
}

impl EditHistory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// History retaining at most `capacity` undo groups.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            open_group: Vec::new(),
            group_depth: 0,
            capacity,
        }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Change the capacity, evicting the oldest groups if needed.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
        self.evict();
    }

    /// Record an action. Clears the redo stack.
    pub fn record(&mut self, action: EditAction) {
        self.redo_stack.clear();
        if self.group_depth > 0 {
            self.open_group.push(action);
        } else {
            self.push_undo(vec![action]);
        }
    }

    /// Start a group; nested calls join the outermost group.
    pub fn begin_group(&mut self) {
        self.group_depth += 1;
    }

    /// Close a group. The outermost close commits it as one undo step.
    pub fn end_group(&mut self) {
        match self.group_depth {
            0 => {}
            1 => {
                self.group_depth = 0;
                self.commit_open_group();
            }
            _ => self.group_depth -= 1,
        }
    }

    #[must_use]
    pub fn is_grouping(&self) -> bool {
        self.group_depth > 0
    }

    fn commit_open_group(&mut self) {
        if !self.open_group.is_empty() {
            let group = std::mem::take(&mut self.open_group);
            self.push_undo(group);
        }
    }

    fn push_undo(&mut self, group: Vec<EditAction>) {
        self.undo_stack.push(group);
        self.evict();
    }

    fn evict(&mut self) {
        if self.undo_stack.len() > self.capacity {
            let excess = self.undo_stack.len() - self.capacity;
            self.undo_stack.drain(..excess);
            tracing::debug!(evicted = excess, capacity = self.capacity, "evicted undo groups");
        }
    }

    /// Pop the newest undo group, closing any open group first.
    pub(crate) fn pop_undo(&mut self) -> Option<Vec<EditAction>> {
        self.group_depth = 0;
        self.commit_open_group();
        self.undo_stack.pop()
    }

    pub(crate) fn push_redo(&mut self, group: Vec<EditAction>) {
        self.redo_stack.push(group);
    }

    pub(crate) fn pop_redo(&mut self) -> Option<Vec<EditAction>> {
        self.redo_stack.pop()
    }

    /// Put a redone group back without clearing the redo stack.
    pub(crate) fn push_redone(&mut self, group: Vec<EditAction>) {
        self.push_undo(group);
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty() || !self.open_group.is_empty()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of undo groups available, counting an open group.
    #[must_use]
    pub fn undo_len(&self) -> usize {
        self.undo_stack.len() + usize::from(!self.open_group.is_empty())
    }

    #[must_use]
    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.open_group.clear();
        self.group_depth = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn action(begin: usize, inserted: &str) -> EditAction {
        EditAction::new(
            begin,
            String::new(),
            inserted.to_string(),
            Selection::default(),
            Selection::default(),
            0,
            Vec::new(),
            Vec::new(),
        )
    }

    #[test]
    fn test_kind() {
        assert_eq!(action(0, "a").kind(), EditKind::Insert);
        let delete = EditAction::new(
            0,
            "x".into(),
            String::new(),
            Selection::default(),
            Selection::default(),
            0,
            Vec::new(),
            Vec::new(),
        );
        assert_eq!(delete.kind(), EditKind::Delete);
        assert_eq!(delete.deleted_len(), 1);
    }

    #[test]
    fn test_record_clears_redo() {
        let mut history = EditHistory::new();
        history.record(action(0, "a"));
        let group = history.pop_undo().unwrap();
        history.push_redo(group);
        assert!(history.can_redo());

        history.record(action(0, "b"));
        assert!(!history.can_redo());
        assert_eq!(history.undo_len(), 1);
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut history = EditHistory::with_capacity(2);
        for i in 0..3 {
            history.record(action(i, "x"));
        }
        assert_eq!(history.undo_len(), 2);
        assert_eq!(history.pop_undo().unwrap()[0].begin(), 2);
        assert_eq!(history.pop_undo().unwrap()[0].begin(), 1);
        assert!(history.pop_undo().is_none());
    }

    #[test]
    fn test_nested_groups_form_one_step() {
        let mut history = EditHistory::new();
        history.begin_group();
        history.record(action(0, "a"));
        history.begin_group();
        history.record(action(1, "b"));
        history.end_group();
        assert!(history.is_grouping());
        history.record(action(2, "c"));
        history.end_group();
        assert!(!history.is_grouping());

        assert_eq!(history.undo_len(), 1);
        assert_eq!(history.pop_undo().unwrap().len(), 3);
    }

    #[test]
    fn test_pop_undo_closes_open_group() {
        let mut history = EditHistory::new();
        history.begin_group();
        history.record(action(0, "a"));
        assert!(history.can_undo());
        assert_eq!(history.pop_undo().unwrap().len(), 1);
        assert!(!history.is_grouping());
    }

    #[test]
    fn test_shrinking_capacity() {
        let mut history = EditHistory::new();
        for i in 0..5 {
            history.record(action(i, "x"));
        }
        history.set_capacity(1);
        assert_eq!(history.undo_len(), 1);
        history.clear();
        assert!(!history.can_undo());
    }
}
