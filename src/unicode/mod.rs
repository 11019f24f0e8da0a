//! Unicode utilities: cluster boundaries, display width, line breaks.

mod grapheme;
mod search;
mod width;

pub use grapheme::{graphemes, is_divisible, next_cluster_index, prev_cluster_index};
pub use search::{
    LineBreakResult, LineEnding, chars_match, find_line_breaks, is_line_break, is_line_head,
};
pub use width::{WidthMethod, display_width, display_width_char};
