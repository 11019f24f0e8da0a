//! Character matching and line-break scanning.
//!
//! Line breaks are LF (`\n`), CR (`\r`) and CRLF (`\r\n`); a CRLF pair is a
//! single terminator.

/// Kind of line terminator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
    Cr,
}

impl LineEnding {
    /// The character sequence of this terminator.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
            Self::Cr => "\r",
        }
    }

    /// Number of characters in the terminator.
    #[must_use]
    pub fn len(self) -> usize {
        match self {
            Self::CrLf => 2,
            Self::Lf | Self::Cr => 1,
        }
    }

    /// The most frequent terminator in `chars`, `Lf` when there is none.
    ///
    /// Ties prefer `Lf`, then `CrLf`.
    pub fn detect<I>(chars: I) -> Self
    where
        I: IntoIterator<Item = char>,
    {
        let breaks = find_line_breaks(chars);
        let count = |kind: LineEnding| breaks.kinds.iter().filter(|&&k| k == kind).count();
        let (lf, crlf, cr) = (count(Self::Lf), count(Self::CrLf), count(Self::Cr));
        if lf >= crlf && lf >= cr {
            Self::Lf
        } else if crlf >= cr {
            Self::CrLf
        } else {
            Self::Cr
        }
    }
}

/// Result of a line break scan over characters.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LineBreakResult {
    /// Character offsets where terminators start.
    pub positions: Vec<usize>,
    /// Kind of each terminator.
    pub kinds: Vec<LineEnding>,
}

impl LineBreakResult {
    /// Offsets of the line heads that follow each terminator.
    pub fn heads(&self) -> impl Iterator<Item = usize> + '_ {
        self.positions
            .iter()
            .zip(&self.kinds)
            .map(|(&pos, kind)| pos + kind.len())
    }
}

/// True for `\r` and `\n`.
#[inline]
#[must_use]
pub fn is_line_break(c: char) -> bool {
    c == '\n' || c == '\r'
}

/// Whether a line starts between `prev` and `next`.
///
/// `prev` is the character before the position (`None` at the start of the
/// text), `next` the character at it (`None` at the end).
#[inline]
#[must_use]
pub fn is_line_head(prev: Option<char>, next: Option<char>) -> bool {
    match prev {
        Some('\n') => true,
        Some('\r') => next != Some('\n'),
        _ => false,
    }
}

/// Find all line breaks in a character sequence.
#[must_use]
pub fn find_line_breaks<I>(chars: I) -> LineBreakResult
where
    I: IntoIterator<Item = char>,
{
    let mut result = LineBreakResult::default();
    let mut chars = chars.into_iter().enumerate().peekable();

    while let Some((i, ch)) = chars.next() {
        let kind = match ch {
            '\n' => LineEnding::Lf,
            '\r' if chars.next_if(|&(_, next)| next == '\n').is_some() => LineEnding::CrLf,
            '\r' => LineEnding::Cr,
            _ => continue,
        };
        result.positions.push(i);
        result.kinds.push(kind);
    }

    result
}

/// Compare two characters, optionally ignoring case.
#[inline]
#[must_use]
pub fn chars_match(a: char, b: char, case_sensitive: bool) -> bool {
    if a == b {
        return true;
    }
    if case_sensitive {
        return false;
    }
    if a.is_ascii() && b.is_ascii() {
        return a.eq_ignore_ascii_case(&b);
    }
    a.to_lowercase().eq(b.to_lowercase())
}
