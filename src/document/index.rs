// src/document/index.rs

use std::fmt;

use crate::document::tags::Tag;

/// A location in a text region: 1-based line, 0-based character column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Start of `line`.
    pub const fn line_start(line: usize) -> Self {
        Self { line, column: 0 }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.line, self.column)
    }
}

/// Symbolic index into a text region, resolved by the document at the
/// moment an operation is applied.
///
/// Lines and columns past the end clamp to the nearest valid location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextIndex {
    At(Position),
    /// End of the given line, before its line break.
    LineEnd(usize),
    /// End of the whole region.
    End,
    /// Just after the last character carrying the tag.
    TagEnd(Tag),
}

impl From<Position> for TextIndex {
    fn from(pos: Position) -> Self {
        TextIndex::At(pos)
    }
}
