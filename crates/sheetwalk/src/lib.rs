//! # sheetwalk
//!
//! A cursor-based facade over a spreadsheet application.
//!
//! [`SheetAccessor`] binds one open document and one active worksheet to an
//! implicit current cell. Reads, writes and formatting default to that cell,
//! navigation moves it, and tables move in and out of the worksheet in one
//! bulk transfer. The application itself sits behind
//! [`sheetwalk_core::SpreadsheetEngine`]: [`MemoryWorkbook`] runs in process,
//! and `sheetwalk-excel-com` drives Excel.
//!
//! ## Example
//!
//! ```rust
//! use sheetwalk::prelude::*;
//!
//! let mut sheet = SheetAccessor::with_notifier(MemoryWorkbook::new(), |_: &Notice| {}).unwrap();
//!
//! let mut table = TabularBlock::new(["Name", "Age"]);
//! table.push_text_row(["Ann", "30"]).unwrap();
//! table.push_row([Some("Bo"), None]).unwrap();
//! assert!(sheet.import_table(&table).unwrap());
//!
//! sheet.set_format(&FormatSpec::new().bold(true), Span::range(1, 1, 1, 2)).unwrap();
//!
//! let back = sheet.export_range(0, 0).unwrap();
//! assert_eq!(back.columns(), ["Name", "Age"]);
//! assert_eq!(back.text(1, 1), "");
//! ```

pub mod accessor;
pub mod error;
mod marshal;
pub mod notify;
pub mod prelude;
pub mod target;

pub use accessor::{SheetAccessor, SAVE_FAILED_TEXT, SAVE_FAILED_TITLE};
pub use error::{Error, Result};
pub use notify::{ConsoleNotifier, Notice, Notifier, Severity, TracingNotifier};
pub use target::{At, Span};

// Re-export core types
pub use sheetwalk_core::{
    build_address, column_letters, letters_to_column, BorderEdge, BorderSpec, BorderWeight,
    CellValue, Coordinate, FormatSpec, GridValue, HeaderFooterPosition, HorizontalAlignment,
    MemoryWorkbook, Orientation, PageSetup, SaveFormat, SpreadsheetEngine, TabularBlock,
};
