//! Error types for sheetwalk

use thiserror::Error;

/// Result type alias for accessor operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by [`crate::SheetAccessor`]
#[derive(Debug, Error)]
pub enum Error {
    /// The spreadsheet engine rejected a call; the text is the engine's own
    #[error("{0}")]
    Engine(Box<dyn std::error::Error + Send + Sync + 'static>),

    /// Address, table or worksheet error raised before reaching the engine
    #[error(transparent)]
    Core(#[from] sheetwalk_core::Error),

    /// The accessor was closed
    #[error("accessor is closed")]
    Closed,

    /// A table written at the cursor would end past the last addressable cell
    #[error("table of {rows} rows and {columns} columns does not fit below {start}")]
    TableTooLarge {
        start: sheetwalk_core::Coordinate,
        rows: usize,
        columns: usize,
    },

    /// The document has no worksheets to bind to
    #[error("document has no worksheets")]
    NoWorksheets,
}

impl Error {
    pub(crate) fn engine<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::Engine(Box::new(err))
    }

    /// Check if this is engine noise from a bulk write (`HRESULT` in the text)
    pub fn is_hresult_noise(&self) -> bool {
        matches!(self, Error::Engine(err) if err.to_string().contains("HRESULT"))
    }
}
