//! Display width of characters and clusters, in cells.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Width calculation method for ambiguous-width characters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WidthMethod {
    /// POSIX-like wcwidth: ambiguous width = 1.
    #[default]
    WcWidth,
    /// Unicode East Asian Width: ambiguous width = 2.
    Unicode,
}

/// Display width of a cluster string.
#[must_use]
pub fn display_width(s: &str, method: WidthMethod) -> usize {
    match method {
        WidthMethod::WcWidth => UnicodeWidthStr::width(s),
        WidthMethod::Unicode => UnicodeWidthStr::width_cjk(s),
    }
}

/// Display width of a single character. Control characters are zero wide.
#[inline]
#[must_use]
pub fn display_width_char(c: char, method: WidthMethod) -> usize {
    if c.is_ascii() && (' '..='~').contains(&c) {
        return 1;
    }
    match method {
        WidthMethod::WcWidth => UnicodeWidthChar::width(c).unwrap_or(0),
        WidthMethod::Unicode => UnicodeWidthChar::width_cjk(c).unwrap_or(0),
    }
}
