//! Error types for sheetwalk-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in sheetwalk-core
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid cell address format
    #[error("Invalid cell address: {0}")]
    InvalidAddress(String),

    /// Invalid cell range format
    #[error("Invalid cell range: {0}")]
    InvalidRange(String),

    /// Sheet not found by name
    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    /// Duplicate sheet name
    #[error("Sheet name already exists: {0}")]
    DuplicateSheetName(String),

    /// A workbook must keep at least one worksheet
    #[error("Cannot delete '{0}': a workbook must contain at least one worksheet")]
    LastSheet(String),

    /// A value grid does not match the rectangle it is written to
    #[error("Grid of {actual_rows}x{actual_cols} does not fit range {range} ({rows}x{cols})")]
    ShapeMismatch {
        range: String,
        rows: u32,
        cols: u32,
        actual_rows: usize,
        actual_cols: usize,
    },

    /// A table row has a different width than the table header
    #[error("Row has {actual} cells, table has {expected} columns")]
    RowWidth { expected: usize, actual: usize },

    /// Merged cell conflict
    #[error("Range {0} overlaps an existing merged region")]
    MergedCellConflict(String),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a new "other" error with a message
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::Other(msg.into())
    }
}
