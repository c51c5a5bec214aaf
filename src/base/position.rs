/// Position tracking for parse errors
///
/// Stores the source location (line/column) where XML parsing failed,
/// for error reporting and editor caret placement.
/// A position in source text (1-indexed, as displayed to users)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Compute the position of a byte offset within `text`.
    ///
    /// Columns count characters, not bytes. Offsets past the end of the
    /// text clamp to the final position.
    pub fn at_offset(text: &str, offset: usize) -> Self {
        let offset = offset.min(text.len());
        let prefix = &text[..floor_char_boundary(text, offset)];

        let line_start = prefix.rfind('\n').map(|i| i + 1).unwrap_or(0);
        let line = prefix.matches('\n').count() + 1;
        let column = prefix[line_start..].chars().count() + 1;

        Self { line, column }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Largest char boundary not exceeding `index`.
fn floor_char_boundary(text: &str, index: usize) -> usize {
    let mut i = index.min(text.len());
    while i > 0 && !text.is_char_boundary(i) {
        i -= 1;
    }
    i
}
