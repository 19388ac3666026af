//! # sheetwalk-core
//!
//! Core types shared by every sheetwalk crate:
//! - [`column_letters`], [`build_address`] and friends - the A1 address codec
//! - [`Coordinate`] and [`CellRange`] - 1-based cell positions and rectangles
//! - [`CellValue`] and [`GridValue`] - values written to and read from cells
//! - [`FormatSpec`], [`BorderSpec`], [`PageSetup`] - the style attributes an engine applies
//! - [`TabularBlock`] - a named-column table exchanged with a cell range
//! - [`SpreadsheetEngine`] - the boundary to the spreadsheet application
//! - [`MemoryWorkbook`] - an in-process engine
//!
//! ## Example
//!
//! ```rust
//! use sheetwalk_core::{build_address, column_letters, letters_to_column};
//!
//! assert_eq!(column_letters(28), "AB");
//! assert_eq!(letters_to_column("AB").unwrap(), 28);
//! assert_eq!(build_address(3, 2, 5, 4), "B3:D5");
//! ```

pub mod cell;
pub mod engine;
pub mod error;
pub mod memory;
pub mod style;
pub mod table;

pub use cell::{
    build_address, column_letters, letters_to_column, CellRange, CellValue, Coordinate, Grid,
    GridValue,
};
pub use engine::{SaveFormat, SpreadsheetEngine};
pub use error::{Error, Result};
pub use memory::{MemorySheet, MemoryWorkbook, PrintJob};
pub use style::{
    BorderEdge, BorderSpec, BorderWeight, FormatSpec, HeaderFooter, HeaderFooterPosition,
    HorizontalAlignment, Margins, Orientation, PageSetup,
};
pub use table::TabularBlock;
