//! The document: text, line index, history, selection and side tables kept
//! in step.
//!
//! Every mutation funnels through [`Document::replace`] (or history replay),
//! which validates first and only then touches any component, so a rejected
//! call leaves the document exactly as it was.
//!
//! # Examples
//!
//! ```
//! use gapdoc::Document;
//!
//! let mut doc = Document::from_text("ab\r\ncd");
//! assert_eq!(doc.line_heads(), vec![0, 4]);
//!
//! doc.replace(2..3, "").unwrap();
//! assert_eq!(doc.text(), "ab\ncd");
//! assert_eq!(doc.line_heads(), vec![0, 3]);
//!
//! doc.undo().unwrap();
//! assert_eq!(doc.text(), "ab\r\ncd");
//! ```

use crate::error::{Error, Result};
use crate::event::{EditEvent, EditOrigin, ObserverId, Observers};
use crate::highlight::{CharClass, HighlightScope, Highlighter, HighlighterRegistry};
use crate::storage::{RunLengthArray, TextStore};
use crate::text::dirty::LineDirtyState;
use crate::text::history::{DEFAULT_HISTORY_CAPACITY, EditAction, EditHistory, HistoryStatus};
use crate::text::line_index::LineIndex;
use crate::text::marks::MarkFlags;
use crate::text::selection::{Selection, SelectionManager, adjust_offset};
use crate::unicode::{self, LineEnding};
use std::fmt;
use std::ops::Range;
use tracing::{debug, trace, warn};

/// Default gap-buffer preallocation in characters.
const DEFAULT_INITIAL_CAPACITY: usize = 64;

/// Document configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DocumentOptions {
    /// Maximum number of undo groups retained.
    pub history_capacity: usize,
    /// Characters preallocated for the text store.
    pub initial_capacity: usize,
    /// Re-derive the line index after every mutation and panic on mismatch.
    pub verify_integrity: bool,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            verify_integrity: cfg!(debug_assertions),
        }
    }
}

impl DocumentOptions {
    #[must_use]
    pub fn history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    #[must_use]
    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    #[must_use]
    pub fn verify_integrity(mut self, enabled: bool) -> Self {
        self.verify_integrity = enabled;
        self
    }
}

/// An editable text document.
#[derive(Debug)]
pub struct Document {
    store: TextStore,
    lines: LineIndex,
    history: EditHistory,
    selection: SelectionManager,
    classes: RunLengthArray<CharClass>,
    marks: RunLengthArray<MarkFlags>,
    observers: Observers,
    highlight_dirty: Option<Range<usize>>,
    line_ending: LineEnding,
    options: DocumentOptions,
    revision: u64,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(DocumentOptions::default())
    }

    /// Create an empty document.
    #[must_use]
    pub fn with_options(options: DocumentOptions) -> Self {
        Self {
            store: TextStore::with_capacity(options.initial_capacity),
            lines: LineIndex::new(),
            history: EditHistory::with_capacity(options.history_capacity),
            selection: SelectionManager::new(),
            classes: RunLengthArray::new(),
            marks: RunLengthArray::new(),
            observers: Observers::default(),
            highlight_dirty: None,
            line_ending: LineEnding::default(),
            options,
            revision: 0,
        }
    }

    /// Create a document holding `text`, with no history and all lines clean.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        let mut doc = Self::new();
        doc.load(text);
        doc
    }

    /// Replace the whole content in one pass.
    ///
    /// Resets selection, history, dirty states and side tables; observers are
    /// notified of a full-document change.
    pub fn set_text(&mut self, text: &str) {
        let old_len = self.len();
        self.load(text);
        self.finish_edit(EditEvent {
            offset: 0,
            old_len,
            new_len: self.len(),
            origin: EditOrigin::Edit,
        });
    }

    fn load(&mut self, text: &str) {
        self.store.set_text(text);
        self.lines = LineIndex::from_store(&self.store);
        let len = self.store.len();
        self.classes = RunLengthArray::filled(CharClass::NORMAL, len);
        self.marks = RunLengthArray::filled(MarkFlags::empty(), len);
        self.selection.set(Selection::default());
        self.history.clear();
        self.highlight_dirty = (len > 0).then_some(0..len);
        self.line_ending = LineEnding::detect(self.store.chars());
        self.revision += 1;
        debug!(
            chars = len,
            lines = self.lines.line_count(),
            line_ending = ?self.line_ending,
            "loaded document"
        );
    }

    // ------------------------------------------------------------------
    // Character access
    // ------------------------------------------------------------------

    /// Length in characters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    #[must_use]
    pub fn char_at(&self, offset: usize) -> Option<char> {
        self.store.char_at(offset)
    }

    /// Iterate every character.
    pub fn chars(&self) -> impl DoubleEndedIterator<Item = char> + '_ {
        self.store.chars()
    }

    /// Full text as a `String`.
    #[must_use]
    pub fn text(&self) -> String {
        self.store.to_string()
    }

    /// Text in `range`.
    pub fn slice(&self, range: Range<usize>) -> Result<String> {
        self.check_range(&range)?;
        Ok(self.store.slice(range))
    }

    /// The underlying character store.
    #[must_use]
    pub fn store(&self) -> &TextStore {
        &self.store
    }

    /// Detached copy of the text for reading without holding the document.
    #[must_use]
    pub fn snapshot(&self) -> TextStore {
        self.store.clone()
    }

    /// Incremented on every mutation.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Most frequent terminator seen when the text was loaded.
    #[must_use]
    pub fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    pub fn set_line_ending(&mut self, line_ending: LineEnding) {
        self.line_ending = line_ending;
    }

    #[must_use]
    pub fn options(&self) -> DocumentOptions {
        self.options
    }

    // ------------------------------------------------------------------
    // Lines
    // ------------------------------------------------------------------

    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.line_count()
    }

    /// Offset of the first character of `line`.
    pub fn line_head_offset(&self, line: usize) -> Result<usize> {
        self.lines.line_head(line).ok_or(Error::OutOfRange {
            index: line,
            len: self.line_count(),
        })
    }

    /// Line containing `offset`, which may equal `len()`.
    pub fn line_of_offset(&self, offset: usize) -> Result<usize> {
        self.check_offset(offset)?;
        Ok(self.lines.line_of_offset(offset))
    }

    /// `(line, column)` of `offset`, the column counted in characters.
    pub fn line_column_of(&self, offset: usize) -> Result<(usize, usize)> {
        let line = self.line_of_offset(offset)?;
        let head = self.line_head_offset(line)?;
        Ok((line, offset - head))
    }

    /// Offset of `column` on `line`, clamped to the end of the line's content.
    pub fn offset_of(&self, line: usize, column: usize) -> Result<usize> {
        let range = self.line_content_range(line)?;
        Ok(range.start.saturating_add(column).min(range.end))
    }

    /// Range of `line` including its terminator.
    pub fn line_range(&self, line: usize) -> Result<Range<usize>> {
        self.lines
            .line_range(line, &self.store)
            .ok_or(Error::OutOfRange {
                index: line,
                len: self.line_count(),
            })
    }

    /// Range of `line` excluding its terminator.
    pub fn line_content_range(&self, line: usize) -> Result<Range<usize>> {
        self.lines
            .line_content_range(line, &self.store)
            .ok_or(Error::OutOfRange {
                index: line,
                len: self.line_count(),
            })
    }

    /// Text of `line` without its terminator.
    pub fn line_text(&self, line: usize) -> Result<String> {
        Ok(self.store.slice(self.line_content_range(line)?))
    }

    /// Snapshot of every line head.
    #[must_use]
    pub fn line_heads(&self) -> Vec<usize> {
        self.lines.heads()
    }

    #[must_use]
    pub fn line_index(&self) -> &LineIndex {
        &self.lines
    }

    #[must_use]
    pub fn line_dirty_state(&self, line: usize) -> Option<LineDirtyState> {
        self.lines.dirty().get(line)
    }

    pub fn set_line_dirty_state(&mut self, line: usize, state: LineDirtyState) -> Result<()> {
        self.lines.dirty_mut().set(line, state)
    }

    /// Snapshot of every line's dirty state.
    #[must_use]
    pub fn dirty_states(&self) -> Vec<LineDirtyState> {
        self.lines.dirty().iter().collect()
    }

    /// Turn every `Dirty` line into `Saved`, e.g. after writing to disk.
    pub fn mark_saved(&mut self) {
        self.lines.dirty_mut().mark_saved();
    }

    /// Turn every line `Clean`.
    pub fn clear_dirty_states(&mut self) {
        self.lines.dirty_mut().clear_all();
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    #[must_use]
    pub fn selection(&self) -> Selection {
        self.selection.get()
    }

    pub fn set_selection(&mut self, anchor: usize, caret: usize) -> Result<()> {
        self.check_offset(anchor)?;
        self.check_offset(caret)?;
        self.selection.set(Selection::new(anchor, caret));
        Ok(())
    }

    /// Collapse the selection to a caret at `offset`.
    pub fn set_caret(&mut self, offset: usize) -> Result<()> {
        self.set_selection(offset, offset)
    }

    pub fn select_all(&mut self) {
        self.selection.set(Selection::new(0, self.len()));
    }

    /// Selected text.
    #[must_use]
    pub fn selected_text(&self) -> String {
        self.store.slice(self.selection.range())
    }

    // ------------------------------------------------------------------
    // Editing
    // ------------------------------------------------------------------

    /// Replace `range` with `text`. The single mutation entry point.
    ///
    /// Fails with [`Error::InvalidRange`] unless
    /// `range.start <= range.end <= len()`, leaving the document untouched.
    /// Replacing an empty range with empty text is a no-op.
    pub fn replace(&mut self, range: Range<usize>, text: &str) -> Result<()> {
        self.edit(range, text, false)
    }

    fn edit(&mut self, range: Range<usize>, text: &str, collapse: bool) -> Result<()> {
        if let Err(err) = self.check_range(&range) {
            warn!(?range, len = self.len(), "rejected edit");
            return Err(err);
        }
        if range.is_empty() && text.is_empty() {
            return Ok(());
        }

        let begin = range.start;
        let selection_before = self.selection.get();
        let before = self.lines.affected_lines(begin, range.end);
        let dirty_before = self.lines.dirty().states(before.start, before.end);
        let deleted = self.store.slice(range.clone());

        let new_len = self.apply(begin, range.len(), text)?;
        if collapse {
            self.selection.set(Selection::caret_at(begin + new_len));
        }

        let after = self.lines.affected_lines(begin, begin + new_len);
        let dirty_after = self.lines.dirty().states(after.start, after.end);
        self.history.record(EditAction::new(
            begin,
            deleted,
            text.to_string(),
            selection_before,
            self.selection.get(),
            before.start,
            dirty_before,
            dirty_after,
        ));

        self.finish_edit(EditEvent {
            offset: begin,
            old_len: range.len(),
            new_len,
            origin: EditOrigin::Edit,
        });
        Ok(())
    }

    /// Like [`replace`](Self::replace), but refuses to split a grapheme
    /// cluster at either end of `range`.
    pub fn replace_clusters(&mut self, range: Range<usize>, text: &str) -> Result<()> {
        self.check_range(&range)?;
        for offset in [range.start, range.end] {
            if !self.is_divisible(offset) {
                warn!(offset, "edit would split a grapheme cluster");
                return Err(Error::ClusterBoundary { offset });
            }
        }
        self.replace(range, text)
    }

    /// Insert `text` at `offset`.
    pub fn insert(&mut self, offset: usize, text: &str) -> Result<()> {
        self.replace(offset..offset, text)
    }

    /// Delete `range`.
    pub fn delete(&mut self, range: Range<usize>) -> Result<()> {
        self.replace(range, "")
    }

    /// Replace the current selection with `text`, leaving the caret after
    /// the inserted text.
    pub fn replace_selection(&mut self, text: &str) -> Result<()> {
        self.edit(self.selection.range(), text, true)
    }

    /// Splice text, side tables, line index and selection. Ranges must
    /// already be validated.
    fn apply(&mut self, begin: usize, old_len: usize, text: &str) -> Result<usize> {
        let end = begin + old_len;
        if old_len > 0 {
            self.store.remove(begin..end)?;
            self.classes.remove_range(begin..end)?;
            self.marks.remove_range(begin..end)?;
            self.lines.on_remove(&self.store, begin, old_len)?;
        }

        let new_len = self.store.insert(begin, text)?;
        if new_len > 0 {
            self.classes.insert(begin, CharClass::NORMAL, new_len)?;
            self.marks.insert(begin, MarkFlags::empty(), new_len)?;
            self.lines.on_insert(&self.store, begin, new_len)?;
        }

        self.selection.adjust_for_edit(begin..end, new_len);
        self.extend_highlight_dirty(begin..end, new_len);
        self.revision += 1;
        Ok(new_len)
    }

    fn extend_highlight_dirty(&mut self, range: Range<usize>, new_len: usize) {
        let begin = range.start;
        let changed = begin..begin + new_len;
        self.highlight_dirty = Some(match self.highlight_dirty.take() {
            Some(pending) => {
                let start = adjust_offset(pending.start, &range, new_len);
                let end = adjust_offset(pending.end, &range, new_len);
                start.min(changed.start)..end.max(changed.end)
            }
            None => changed,
        });
    }

    fn finish_edit(&mut self, event: EditEvent) {
        if self.options.verify_integrity {
            if let Err(err) = self.check_integrity() {
                panic!("{err}");
            }
        }
        trace!(
            offset = event.offset,
            old_len = event.old_len,
            new_len = event.new_len,
            origin = ?event.origin,
            revision = self.revision,
            "edit applied"
        );
        if !self.observers.is_empty() {
            let mut observers = std::mem::take(&mut self.observers);
            observers.notify(self, &event);
            self.observers = observers;
        }
    }

    // ------------------------------------------------------------------
    // History
    // ------------------------------------------------------------------

    /// Undo the newest group of edits.
    pub fn undo(&mut self) -> Result<HistoryStatus> {
        let Some(group) = self.history.pop_undo() else {
            return Ok(HistoryStatus::NothingToUndo);
        };
        for action in group.iter().rev() {
            self.replay(
                action.begin(),
                action.inserted_len(),
                action.deleted(),
                action.first_line(),
                action.dirty_before(),
                action.selection_before(),
                EditOrigin::Undo,
            )?;
        }
        let actions = group.len();
        self.history.push_redo(group);
        debug!(actions, "undo");
        Ok(HistoryStatus::Applied { actions })
    }

    /// Redo the newest undone group.
    pub fn redo(&mut self) -> Result<HistoryStatus> {
        let Some(group) = self.history.pop_redo() else {
            return Ok(HistoryStatus::NothingToRedo);
        };
        for action in &group {
            self.replay(
                action.begin(),
                action.deleted_len(),
                action.inserted(),
                action.first_line(),
                action.dirty_after(),
                action.selection_after(),
                EditOrigin::Redo,
            )?;
        }
        let actions = group.len();
        self.history.push_redone(group);
        debug!(actions, "redo");
        Ok(HistoryStatus::Applied { actions })
    }

    #[allow(clippy::too_many_arguments)]
    fn replay(
        &mut self,
        begin: usize,
        old_len: usize,
        text: &str,
        first_line: usize,
        dirty: &[LineDirtyState],
        selection: Selection,
        origin: EditOrigin,
    ) -> Result<()> {
        let new_len = self.apply(begin, old_len, text)?;
        self.lines.dirty_mut().restore(first_line, dirty)?;
        self.selection.set(selection);
        self.finish_edit(EditEvent {
            offset: begin,
            old_len,
            new_len,
            origin,
        });
        Ok(())
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Start grouping edits into one undo step.
    pub fn begin_group(&mut self) {
        self.history.begin_group();
    }

    /// Close the group opened by [`begin_group`](Self::begin_group).
    pub fn end_group(&mut self) {
        self.history.end_group();
    }

    /// Run `f` with every edit it makes grouped into one undo step.
    pub fn group<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.history.begin_group();
        let result = f(self);
        self.history.end_group();
        result
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    #[must_use]
    pub fn history(&self) -> &EditHistory {
        &self.history
    }

    #[must_use]
    pub fn history_capacity(&self) -> usize {
        self.history.capacity()
    }

    /// Change the undo capacity; shrinking evicts the oldest groups.
    pub fn set_history_capacity(&mut self, capacity: usize) {
        self.options.history_capacity = capacity;
        self.history.set_capacity(capacity);
    }

    // ------------------------------------------------------------------
    // Search
    // ------------------------------------------------------------------

    /// First match of `pattern` at or after `start`.
    #[must_use]
    pub fn find_next(&self, pattern: &str, start: usize, case_sensitive: bool) -> Option<usize> {
        self.store.index_of(pattern, start, case_sensitive)
    }

    /// First match of `pattern` starting inside `range`, for chunked scans.
    #[must_use]
    pub fn find_next_in(
        &self,
        pattern: &str,
        range: Range<usize>,
        case_sensitive: bool,
    ) -> Option<usize> {
        self.store.index_of_in(pattern, range, case_sensitive)
    }

    /// Last match of `pattern` ending at or before `end`.
    #[must_use]
    pub fn find_prev(&self, pattern: &str, end: usize, case_sensitive: bool) -> Option<usize> {
        self.store.last_index_of(pattern, end, case_sensitive)
    }

    // ------------------------------------------------------------------
    // Grapheme clusters
    // ------------------------------------------------------------------

    /// Whether a caret or edit boundary may sit at `offset`.
    #[must_use]
    pub fn is_divisible(&self, offset: usize) -> bool {
        unicode::is_divisible(&self.store, offset)
    }

    #[must_use]
    pub fn next_cluster_index(&self, offset: usize) -> usize {
        unicode::next_cluster_index(&self.store, offset)
    }

    #[must_use]
    pub fn prev_cluster_index(&self, offset: usize) -> usize {
        unicode::prev_cluster_index(&self.store, offset)
    }

    // ------------------------------------------------------------------
    // Side tables
    // ------------------------------------------------------------------

    #[must_use]
    pub fn char_class_at(&self, offset: usize) -> Option<CharClass> {
        self.classes.get(offset)
    }

    pub fn set_char_class(&mut self, offset: usize, class: CharClass) -> Result<()> {
        self.classes.set(offset, class)
    }

    /// Class runs as `(range, class)` pairs.
    pub fn char_class_runs(&self) -> impl Iterator<Item = (Range<usize>, CharClass)> + '_ {
        self.classes.runs()
    }

    /// Characters changed since the last highlight pass.
    #[must_use]
    pub fn highlight_dirty_range(&self) -> Option<Range<usize>> {
        self.highlight_dirty.clone()
    }

    /// Run `highlighter` over the pending dirty range.
    ///
    /// Returns the range the highlighter reports having processed, clamped to
    /// the document, or `None` when nothing was pending.
    pub fn highlight(&mut self, highlighter: &mut dyn Highlighter) -> Option<Range<usize>> {
        let len = self.store.len();
        let pending = self.highlight_dirty.take()?;
        let mut dirty = pending.start.min(len)..pending.end.min(len);
        let mut scope = HighlightScope::new(&self.store, &mut self.classes);
        highlighter.highlight(&mut scope, &mut dirty);
        let end = dirty.end.min(len);
        let start = dirty.start.min(end);
        trace!(start, end, "highlighted");
        Some(start..end)
    }

    /// Run the highlighter registered as `name`. `None` if there is no such
    /// highlighter or nothing was pending.
    pub fn highlight_with(
        &mut self,
        registry: &mut HighlighterRegistry,
        name: &str,
    ) -> Option<Range<usize>> {
        let highlighter = registry.get_mut(name)?;
        self.highlight(highlighter)
    }

    #[must_use]
    pub fn marks_at(&self, offset: usize) -> Option<MarkFlags> {
        self.marks.get(offset)
    }

    /// Add `flags` to every character in `range`.
    pub fn add_marks(&mut self, range: Range<usize>, flags: MarkFlags) -> Result<()> {
        self.check_range(&range)?;
        self.marks.update_range(range, |current| current | flags)
    }

    /// Remove `flags` from every character in `range`.
    pub fn remove_marks(&mut self, range: Range<usize>, flags: MarkFlags) -> Result<()> {
        self.check_range(&range)?;
        self.marks.update_range(range, |current| current - flags)
    }

    /// Ranges carrying any of `flags`.
    #[must_use]
    pub fn marked_ranges(&self, flags: MarkFlags) -> Vec<Range<usize>> {
        self.marks
            .runs()
            .filter(|(_, marks)| marks.intersects(flags))
            .map(|(range, _)| range)
            .collect()
    }

    // ------------------------------------------------------------------
    // Observers
    // ------------------------------------------------------------------

    /// Register `observer` to run after every edit.
    pub fn subscribe<F>(&mut self, observer: F) -> ObserverId
    where
        F: FnMut(&Document, &EditEvent) + Send + 'static,
    {
        self.observers.add(Box::new(observer))
    }

    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        self.observers.remove(id)
    }

    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    // ------------------------------------------------------------------
    // Validation
    // ------------------------------------------------------------------

    fn check_offset(&self, offset: usize) -> Result<()> {
        if offset > self.len() {
            return Err(Error::InvalidRange {
                begin: offset,
                end: offset,
                len: self.len(),
            });
        }
        Ok(())
    }

    fn check_range(&self, range: &Range<usize>) -> Result<()> {
        if range.start > range.end || range.end > self.len() {
            return Err(Error::InvalidRange {
                begin: range.start,
                end: range.end,
                len: self.len(),
            });
        }
        Ok(())
    }

    /// Re-derive the line index and compare every parallel structure.
    ///
    /// A failure means index maintenance has a bug; the document is no longer
    /// trustworthy.
    pub fn check_integrity(&self) -> Result<()> {
        self.lines.check(&self.store)?;
        let len = self.store.len();
        if self.classes.len() != len || self.marks.len() != len {
            return Err(Error::Integrity(format!(
                "side tables hold {} classes and {} marks for {len} characters",
                self.classes.len(),
                self.marks.len()
            )));
        }
        let selection = self.selection.get();
        if selection.end() > len {
            return Err(Error::Integrity(format!(
                "selection {selection:?} exceeds length {len}"
            )));
        }
        Ok(())
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.store, f)
    }
}
