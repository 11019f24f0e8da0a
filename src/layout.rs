//! Mapping between character offsets and visual positions.
//!
//! A [`LayoutStrategy`] decides how document lines become visual lines.
//! [`LogicalLayout`] keeps one visual line per document line;
//! [`WrappedLayout`] soft-wraps at a display width. Both measure columns in
//! terminal cells and never place a position inside a grapheme cluster.

use crate::text::Document;
use crate::unicode::{WidthMethod, display_width, graphemes};
use std::ops::Range;

/// A visual line and a display column within it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    #[must_use]
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// How document lines map onto visual lines.
pub trait LayoutStrategy {
    /// Number of visual lines.
    fn line_count(&self, doc: &Document) -> usize;

    /// Offset of the first character of visual `line`.
    fn line_head_offset(&self, doc: &Document, line: usize) -> Option<usize>;

    /// Visual position of `offset` (clamped to the document).
    fn position_of_offset(&self, doc: &Document, offset: usize) -> Position;

    /// Offset nearest to `position`, snapped to a cluster boundary.
    ///
    /// Lines past the end clamp to the last line; columns past the end of a
    /// line clamp to its end.
    fn offset_from_position(&self, doc: &Document, position: Position) -> usize;
}

/// One visual line per document line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LogicalLayout {
    pub width_method: WidthMethod,
}

/// Soft-wraps document lines at `width` cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WrappedLayout {
    pub width: usize,
    pub width_method: WidthMethod,
}

impl LogicalLayout {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl WrappedLayout {
    /// Wrap at `width` cells. A width of zero is treated as one.
    #[must_use]
    pub fn new(width: usize) -> Self {
        Self {
            width: width.max(1),
            width_method: WidthMethod::default(),
        }
    }

    #[must_use]
    pub fn width_method(mut self, method: WidthMethod) -> Self {
        self.width_method = method;
        self
    }

    /// Start offsets of every visual row of document `line`.
    fn rows(&self, doc: &Document, line: usize) -> Vec<usize> {
        let Ok(content) = doc.line_content_range(line) else {
            return Vec::new();
        };
        let mut rows = vec![content.start];
        let mut row_width = 0;
        for (offset, width) in clusters(doc, content, self.width_method) {
            if row_width > 0 && row_width + width > self.width {
                rows.push(offset);
                row_width = 0;
            }
            row_width += width;
        }
        rows
    }

    /// Document line and row index of visual `line`, clamped to the last row.
    fn locate(&self, doc: &Document, line: usize) -> (usize, Vec<usize>, usize) {
        let last = doc.line_count() - 1;
        let mut remaining = line;
        let mut logical = 0;
        loop {
            let rows = self.rows(doc, logical);
            if remaining < rows.len() || logical == last {
                let row = remaining.min(rows.len() - 1);
                return (logical, rows, row);
            }
            remaining -= rows.len();
            logical += 1;
        }
    }
}

impl Default for WrappedLayout {
    fn default() -> Self {
        Self::new(80)
    }
}

/// `(start offset, display width)` of every cluster in `range`.
fn clusters(doc: &Document, range: Range<usize>, method: WidthMethod) -> Vec<(usize, usize)> {
    let text: String = doc.store().chars_in(range.clone()).collect();
    let mut offset = range.start;
    graphemes(&text)
        .map(|cluster| {
            let start = offset;
            offset += cluster.chars().count();
            (start, display_width(cluster, method))
        })
        .collect()
}

/// Cells between `range.start` and `range.end`.
fn width_of(doc: &Document, range: Range<usize>, method: WidthMethod) -> usize {
    clusters(doc, range, method).iter().map(|&(_, w)| w).sum()
}

/// Offset within `range` at display `column`, snapped to the start of the
/// cluster covering it.
fn offset_at_column(doc: &Document, range: Range<usize>, column: usize, method: WidthMethod) -> usize {
    let mut width = 0;
    for (offset, cluster_width) in clusters(doc, range.clone(), method) {
        if width + cluster_width > column {
            return offset;
        }
        width += cluster_width;
    }
    range.end
}

/// Start of the cluster containing `offset`.
fn snap_back(doc: &Document, offset: usize) -> usize {
    let offset = offset.min(doc.len());
    if doc.is_divisible(offset) {
        offset
    } else {
        doc.prev_cluster_index(offset)
    }
}

impl LayoutStrategy for LogicalLayout {
    fn line_count(&self, doc: &Document) -> usize {
        doc.line_count()
    }

    fn line_head_offset(&self, doc: &Document, line: usize) -> Option<usize> {
        doc.line_head_offset(line).ok()
    }

    fn position_of_offset(&self, doc: &Document, offset: usize) -> Position {
        let offset = snap_back(doc, offset);
        let line = doc.line_index().line_of_offset(offset);
        let head = doc.line_index().line_head(line).unwrap_or(0);
        Position::new(line, width_of(doc, head..offset, self.width_method))
    }

    fn offset_from_position(&self, doc: &Document, position: Position) -> usize {
        let line = position.line.min(doc.line_count() - 1);
        match doc.line_content_range(line) {
            Ok(content) => offset_at_column(doc, content, position.column, self.width_method),
            Err(_) => doc.len(),
        }
    }
}

impl LayoutStrategy for WrappedLayout {
    fn line_count(&self, doc: &Document) -> usize {
        (0..doc.line_count())
            .map(|line| self.rows(doc, line).len())
            .sum()
    }

    fn line_head_offset(&self, doc: &Document, line: usize) -> Option<usize> {
        let mut remaining = line;
        for logical in 0..doc.line_count() {
            let rows = self.rows(doc, logical);
            if let Some(&head) = rows.get(remaining) {
                return Some(head);
            }
            remaining -= rows.len();
        }
        None
    }

    fn position_of_offset(&self, doc: &Document, offset: usize) -> Position {
        let offset = snap_back(doc, offset);
        let logical = doc.line_index().line_of_offset(offset);
        let preceding: usize = (0..logical).map(|line| self.rows(doc, line).len()).sum();
        let rows = self.rows(doc, logical);
        let row = rows.partition_point(|&start| start <= offset).max(1) - 1;
        let column = width_of(doc, rows[row]..offset, self.width_method);
        Position::new(preceding + row, column)
    }

    fn offset_from_position(&self, doc: &Document, position: Position) -> usize {
        let (logical, rows, row) = self.locate(doc, position.line);
        let content_end = doc
            .line_content_range(logical)
            .map_or(doc.len(), |content| content.end);
        let row_end = rows.get(row + 1).copied().unwrap_or(content_end);
        let offset = offset_at_column(doc, rows[row]..row_end, position.column, self.width_method);
        // The end of a wrapped row is the head of the next one.
        if offset == row_end && row_end != content_end {
            doc.prev_cluster_index(row_end)
        } else {
            offset
        }
    }
}
