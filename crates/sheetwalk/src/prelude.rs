//! Prelude module - common imports for sheetwalk users
//!
//! ```rust
//! use sheetwalk::prelude::*;
//! ```

// Main types
pub use crate::{At, SheetAccessor, Span, SpreadsheetEngine};

// Cell and table types
pub use crate::{CellValue, Coordinate, GridValue, TabularBlock};

// Style types
pub use crate::{
    BorderEdge, BorderSpec, BorderWeight, FormatSpec, HeaderFooterPosition, HorizontalAlignment,
    Orientation, PageSetup, SaveFormat,
};

// Notifications
pub use crate::{Notice, Notifier, Severity};

// Engines
pub use crate::MemoryWorkbook;

// Error types
pub use crate::{Error, Result};
