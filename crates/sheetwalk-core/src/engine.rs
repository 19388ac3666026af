//! The boundary to a spreadsheet application
//!
//! A [`SpreadsheetEngine`] is one open document in some spreadsheet
//! application. Worksheets are identified by name and ranges by A1-style
//! address strings built with [`crate::build_address`]. Every call is
//! synchronous and returns once the application has finished it.

use std::path::Path;

use crate::cell::{CellValue, Grid};
use crate::style::{BorderSpec, FormatSpec, PageSetup};

/// File format used by [`SpreadsheetEngine::save_as`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SaveFormat {
    /// The application's default format for the file name
    #[default]
    Native,
    /// Legacy Excel 97-2003 workbook (`.xls`)
    Excel97,
}

/// One open spreadsheet document
pub trait SpreadsheetEngine {
    /// Error reported by the application
    ///
    /// The `Display` text is matched against known-benign markers, so
    /// implementations should keep the application's own message in it.
    type Error: std::error::Error + Send + Sync + 'static;

    /// File name of the document
    fn document_name(&mut self) -> Result<String, Self::Error>;

    /// Names of all worksheets, in tab order
    fn worksheet_names(&mut self) -> Result<Vec<String>, Self::Error>;

    /// Add a worksheet, optionally naming it
    fn add_worksheet(&mut self, name: Option<&str>) -> Result<(), Self::Error>;

    /// Delete a worksheet
    fn delete_worksheet(&mut self, sheet: &str) -> Result<(), Self::Error>;

    /// Make a worksheet the active one
    fn activate_worksheet(&mut self, sheet: &str) -> Result<(), Self::Error>;

    /// Rename a worksheet
    fn rename_worksheet(&mut self, sheet: &str, new_name: &str) -> Result<(), Self::Error>;

    /// Row and column count of the used range
    fn used_extent(&mut self, sheet: &str) -> Result<(u32, u32), Self::Error>;

    /// Display text of one cell, `None` when the application has none
    fn cell_text(&mut self, sheet: &str, row: u32, col: u32)
        -> Result<Option<String>, Self::Error>;

    /// Write one cell; [`CellValue::Empty`] clears it
    fn set_cell(
        &mut self,
        sheet: &str,
        row: u32,
        col: u32,
        value: &CellValue,
    ) -> Result<(), Self::Error>;

    /// Read a rectangle of values in one call
    fn range_values(&mut self, sheet: &str, range: &str) -> Result<Grid, Self::Error>;

    /// Write a rectangle of values in one call
    fn set_range_values(&mut self, sheet: &str, range: &str, values: &Grid)
        -> Result<(), Self::Error>;

    /// Store formula text in every cell of a range
    fn set_formula(&mut self, sheet: &str, range: &str, formula: &str) -> Result<(), Self::Error>;

    /// Delete a range, shifting the cells below it up
    fn delete_range(&mut self, sheet: &str, range: &str) -> Result<(), Self::Error>;

    /// Apply formatting to a range
    fn apply_format(&mut self, sheet: &str, range: &str, format: &FormatSpec)
        -> Result<(), Self::Error>;

    /// Apply a border to a range
    fn set_border(&mut self, sheet: &str, range: &str, border: &BorderSpec)
        -> Result<(), Self::Error>;

    /// Set the number format of a range
    fn set_number_format(&mut self, sheet: &str, range: &str, format: &str)
        -> Result<(), Self::Error>;

    /// Merge (`true`) or unmerge (`false`) a range
    fn merge_cells(&mut self, sheet: &str, range: &str, merge: bool) -> Result<(), Self::Error>;

    /// Set the width of every column the range touches
    fn set_column_width(&mut self, sheet: &str, range: &str, width: f64)
        -> Result<(), Self::Error>;

    /// Insert a row above `row`, shifting cells down
    fn insert_row(&mut self, sheet: &str, row: u32) -> Result<(), Self::Error>;

    /// Apply print settings to a worksheet
    fn page_setup(&mut self, sheet: &str, setup: &PageSetup) -> Result<(), Self::Error>;

    /// Print a worksheet
    fn print_out(&mut self, sheet: &str, copies: u32, preview: bool) -> Result<(), Self::Error>;

    /// Secondary print entry point, used when [`print_out`](Self::print_out) fails
    fn print_out_ex(&mut self, sheet: &str, copies: u32, preview: bool)
        -> Result<(), Self::Error>;

    /// Run a macro stored in the document
    fn run_macro(&mut self, name: &str) -> Result<(), Self::Error>;

    /// Save the document in place
    fn save(&mut self) -> Result<(), Self::Error>;

    /// Save the document under a new path
    fn save_as(&mut self, path: &Path, format: SaveFormat) -> Result<(), Self::Error>;

    /// Close the document without saving and release the application
    fn close(&mut self) -> Result<(), Self::Error>;
}
