//! Operation targets
//!
//! A zero on any axis means "keep the cursor's value for that axis".

use sheetwalk_core::Coordinate;

/// A single-cell target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct At {
    pub row: u32,
    pub col: u32,
}

impl At {
    /// The cursor itself
    pub const CURSOR: At = At { row: 0, col: 0 };

    /// An explicit cell
    pub fn cell(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// A row, keeping the cursor's column
    pub fn row(row: u32) -> Self {
        Self { row, col: 0 }
    }

    /// A column, keeping the cursor's row
    pub fn col(col: u32) -> Self {
        Self { row: 0, col }
    }
}

impl From<(u32, u32)> for At {
    fn from((row, col): (u32, u32)) -> Self {
        Self { row, col }
    }
}

impl From<Coordinate> for At {
    fn from(coord: Coordinate) -> Self {
        Self {
            row: coord.row,
            col: coord.col,
        }
    }
}

/// A range target: a start cell plus an optional end corner
///
/// The end corner only counts when both `end_row` and `end_col` are set;
/// otherwise the span is the start cell alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: At,
    pub end_row: u32,
    pub end_col: u32,
}

impl Span {
    /// The cursor cell
    pub const CURSOR: Span = Span {
        start: At::CURSOR,
        end_row: 0,
        end_col: 0,
    };

    /// A rectangle from (row, col) to (end_row, end_col)
    pub fn range(row: u32, col: u32, end_row: u32, end_col: u32) -> Self {
        Self {
            start: At::cell(row, col),
            end_row,
            end_col,
        }
    }

    /// Extend to an end corner
    pub fn to(self, end_row: u32, end_col: u32) -> Self {
        Self {
            end_row,
            end_col,
            ..self
        }
    }

    /// Check if the span is more than its start cell
    pub fn is_rectangle(&self) -> bool {
        self.end_row > 0 && self.end_col > 0
    }
}

impl From<At> for Span {
    fn from(start: At) -> Self {
        Self {
            start,
            end_row: 0,
            end_col: 0,
        }
    }
}

impl From<(u32, u32)> for Span {
    fn from(cell: (u32, u32)) -> Self {
        At::from(cell).into()
    }
}

impl From<(u32, u32, u32, u32)> for Span {
    fn from((row, col, end_row, end_col): (u32, u32, u32, u32)) -> Self {
        Self::range(row, col, end_row, end_col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_rectangle_needs_both_ends() {
        assert!(Span::range(1, 1, 3, 3).is_rectangle());
        assert!(!Span::range(1, 1, 3, 0).is_rectangle());
        assert!(!Span::from(At::row(4)).is_rectangle());
        assert_eq!(At::CURSOR, At::default());
    }
}
