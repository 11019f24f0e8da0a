//! Grapheme cluster boundaries over gap-buffered text.
//!
//! Stored text is a sequence of `char`s, so surrogate pairs never exist and
//! cannot be split. What remains to protect are extended grapheme clusters:
//! base + combining marks, variation sequences, ZWJ emoji, regional indicator
//! pairs and `\r\n`.

use crate::storage::TextStore;
use unicode_segmentation::{GraphemeCursor, UnicodeSegmentation};

/// Characters of context examined on each side of a queried offset.
const CONTEXT_CHARS: usize = 64;

/// Iterate over grapheme clusters in a string.
pub fn graphemes(s: &str) -> impl Iterator<Item = &str> {
    s.graphemes(true)
}

/// Whether a cursor or edit boundary is allowed at `offset`.
///
/// Offsets `0` and `len` are always divisible; offsets past the end are not.
#[must_use]
pub fn is_divisible(store: &TextStore, offset: usize) -> bool {
    let len = store.len();
    if offset == 0 || offset == len {
        return true;
    }
    if offset > len {
        return false;
    }

    let mut start = offset.saturating_sub(CONTEXT_CHARS);
    // Regional indicators pair from the start of their run, so the window
    // must not open on the second half of a pair.
    let indicators_before = store
        .chars_in(0..start)
        .rev()
        .take_while(|&c| is_regional_indicator(c))
        .count();
    if indicators_before % 2 == 1 {
        start -= 1;
    }

    let end = (offset + CONTEXT_CHARS).min(len);
    let window: String = store.chars_in(start..end).collect();
    let byte_offset: usize = store
        .chars_in(start..offset)
        .map(char::len_utf8)
        .sum();

    // The window is handed over as the whole text, so the cursor never asks
    // for pre-context or a further chunk.
    let mut cursor = GraphemeCursor::new(byte_offset, window.len(), true);
    match cursor.is_boundary(&window, 0) {
        Ok(boundary) => boundary,
        Err(err) => {
            tracing::debug!(?err, offset, "grapheme cursor rejected window");
            true
        }
    }
}

fn is_regional_indicator(c: char) -> bool {
    ('\u{1F1E6}'..='\u{1F1FF}').contains(&c)
}

/// Offset of the next cluster boundary after `offset` (`len` at the end).
#[must_use]
pub fn next_cluster_index(store: &TextStore, offset: usize) -> usize {
    let len = store.len();
    let mut next = offset.saturating_add(1);
    while next < len && !is_divisible(store, next) {
        next += 1;
    }
    next.min(len)
}

/// Offset of the previous cluster boundary before `offset` (`0` at the start).
#[must_use]
pub fn prev_cluster_index(store: &TextStore, offset: usize) -> usize {
    let mut prev = offset.min(store.len()).saturating_sub(1);
    while prev > 0 && !is_divisible(store, prev) {
        prev -= 1;
    }
    prev
}
