//! Row/column coordinates into a file's post-change text.
//!
//! Both coordinates are 0-based. Columns are byte offsets into the line, which
//! is what regex match offsets and the line lengths reported by
//! [`crate::comments::line_regions`] both measure.

/// A location in a file: 0-based row, then 0-based byte column.
///
/// Ordering is lexicographic on `(row, column)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub row: u32,
    pub column: u32,
}

impl Position {
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }
}

/// An inclusive span between two positions.
///
/// No normalization is applied: a range whose `start` sorts after its `end`
/// simply contains nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// The whole of line `row`, from column 0 through column `len` inclusive.
    pub const fn line(row: u32, len: u32) -> Self {
        Self {
            start: Position::new(row, 0),
            end: Position::new(row, len),
        }
    }

    /// True iff `start <= point <= end`.
    pub fn contains(&self, point: Position) -> bool {
        self.start <= point && point <= self.end
    }
}
