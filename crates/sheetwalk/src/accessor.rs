//! The cursor-bound sheet accessor

use std::path::Path;

use sheetwalk_core::{
    build_address, BorderSpec, CellValue, Coordinate, FormatSpec, PageSetup, SaveFormat,
    SpreadsheetEngine,
};

use crate::error::{Error, Result};
use crate::notify::{self, Notice, Notifier, Severity};
use crate::target::{At, Span};

/// Shown when a save fails, usually because the file is open elsewhere
pub const SAVE_FAILED_TEXT: &str = "File not writable, please close Excel first!\nA fájl nem írható, zárd be az Excelt mentés előtt!";

/// Title of the save failure notice
pub const SAVE_FAILED_TITLE: &str = "Close Excel!";

/// One open document, one active worksheet and a cursor
///
/// Most operations take an [`At`] or [`Span`]. For each axis a value above
/// zero moves the cursor there; zero keeps the cursor's value. The resolved
/// position becomes the new cursor, so later calls can omit it.
///
/// # Example
///
/// ```rust
/// use sheetwalk::prelude::*;
///
/// let mut sheet = SheetAccessor::with_notifier(MemoryWorkbook::new(), |_: &Notice| {}).unwrap();
/// sheet.set_cell("Name", At::cell(1, 1)).unwrap();
/// sheet.set_next_cell("Age").unwrap();
/// sheet.to_new_line(1);
/// sheet.set_cell("Ann", At::CURSOR).unwrap();
/// sheet.set_next_cell(30).unwrap();
///
/// assert_eq!(sheet.get_cell(At::cell(2, 2)).unwrap(), "30");
/// sheet.close().unwrap();
/// ```
pub struct SheetAccessor<E: SpreadsheetEngine> {
    engine: Option<E>,
    sheet: String,
    cursor: Coordinate,
    notifier: Box<dyn Notifier>,
}

impl<E: SpreadsheetEngine> std::fmt::Debug for SheetAccessor<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetAccessor")
            .field("sheet", &self.sheet)
            .field("cursor", &self.cursor)
            .field("closed", &self.engine.is_none())
            .finish()
    }
}

impl<E: SpreadsheetEngine> SheetAccessor<E> {
    /// Bind to the document's first worksheet, notifying through [`notify::detect`]
    pub fn new(engine: E) -> Result<Self> {
        Self::from_parts(engine, notify::detect())
    }

    /// Bind to the document's first worksheet with an explicit notifier
    pub fn with_notifier<N: Notifier + 'static>(engine: E, notifier: N) -> Result<Self> {
        Self::from_parts(engine, Box::new(notifier))
    }

    fn from_parts(mut engine: E, notifier: Box<dyn Notifier>) -> Result<Self> {
        let sheet = engine
            .worksheet_names()
            .map_err(Error::engine)?
            .into_iter()
            .next()
            .ok_or(Error::NoWorksheets)?;
        engine.activate_worksheet(&sheet).map_err(Error::engine)?;
        tracing::info!(%sheet, "bound to worksheet");

        Ok(Self {
            engine: Some(engine),
            sheet,
            cursor: Coordinate::ORIGIN,
            notifier,
        })
    }

    // === Internal plumbing ===

    /// Resolve a target against the cursor and commit the result
    fn resolve(&mut self, at: At) -> Coordinate {
        if at.row > 0 {
            self.cursor.row = at.row;
        }
        if at.col > 0 {
            self.cursor.col = at.col;
        }
        self.cursor
    }

    /// Resolve a span's start and build its address
    fn resolve_span(&mut self, span: Span) -> String {
        let start = self.resolve(span.start);
        let address = build_address(start.row, start.col, span.end_row, span.end_col);
        tracing::debug!(%address, "resolved span");
        address
    }

    /// Run one engine call against the active worksheet
    pub(crate) fn with_engine<T>(
        &mut self,
        call: impl FnOnce(&mut E, &str) -> std::result::Result<T, E::Error>,
    ) -> Result<T> {
        let engine = self.engine.as_mut().ok_or(Error::Closed)?;
        call(engine, &self.sheet).map_err(Error::engine)
    }

    pub(crate) fn notify(&self, notice: Notice) {
        self.notifier.notify(&notice);
    }

    fn notify_save_failed(&self) {
        self.notify(Notice::new(
            SAVE_FAILED_TEXT,
            SAVE_FAILED_TITLE,
            Severity::Information,
        ));
    }

    // === Cursor ===

    /// The cursor position
    pub fn cursor(&self) -> Coordinate {
        self.cursor
    }

    /// The cursor row
    pub fn active_row(&self) -> u32 {
        self.cursor.row
    }

    /// The cursor column
    pub fn active_column(&self) -> u32 {
        self.cursor.col
    }

    /// Move the cursor without touching the worksheet
    pub fn move_to(&mut self, at: impl Into<At>) -> Coordinate {
        self.resolve(at.into())
    }

    /// Move the cursor `columns` to the right
    pub fn to_next_cell(&mut self, columns: u32) {
        self.cursor.col = self.cursor.col.saturating_add(columns);
    }

    /// Move the cursor `rows` down and back to column 1
    pub fn to_new_line(&mut self, rows: u32) {
        self.cursor.row = self.cursor.row.saturating_add(rows);
        self.cursor.col = 1;
    }

    // === Cells ===

    /// Display text of a cell, empty when the cell has none
    pub fn get_cell(&mut self, at: impl Into<At>) -> Result<String> {
        let pos = self.resolve(at.into());
        let text = self.with_engine(|engine, sheet| engine.cell_text(sheet, pos.row, pos.col))?;
        Ok(text.unwrap_or_default())
    }

    /// Write a cell; empty text and [`CellValue::Empty`] clear it
    pub fn set_cell(&mut self, value: impl Into<CellValue>, at: impl Into<At>) -> Result<()> {
        let value = value.into().normalized();
        let pos = self.resolve(at.into());
        self.with_engine(|engine, sheet| engine.set_cell(sheet, pos.row, pos.col, &value))
    }

    /// Step one column right, then read
    pub fn get_next_cell(&mut self) -> Result<String> {
        self.to_next_cell(1);
        self.get_cell(At::CURSOR)
    }

    /// Step one column right, then write
    pub fn set_next_cell(&mut self, value: impl Into<CellValue>) -> Result<()> {
        self.to_next_cell(1);
        self.set_cell(value, At::CURSOR)
    }

    /// Store formula text in a range
    pub fn set_formula(&mut self, formula: &str, span: impl Into<Span>) -> Result<()> {
        let address = self.resolve_span(span.into());
        self.with_engine(|engine, sheet| engine.set_formula(sheet, &address, formula))
    }

    // === Ranges ===

    /// Delete a range, shifting the cells below it up
    pub fn delete_range(&mut self, span: impl Into<Span>) -> Result<()> {
        let address = self.resolve_span(span.into());
        self.with_engine(|engine, sheet| engine.delete_range(sheet, &address))
    }

    /// Apply formatting to a range
    pub fn set_format(&mut self, format: &FormatSpec, span: impl Into<Span>) -> Result<()> {
        let address = self.resolve_span(span.into());
        self.with_engine(|engine, sheet| engine.apply_format(sheet, &address, format))
    }

    /// Apply a border to a range
    pub fn set_border(&mut self, border: BorderSpec, span: impl Into<Span>) -> Result<()> {
        let address = self.resolve_span(span.into());
        self.with_engine(|engine, sheet| engine.set_border(sheet, &address, &border))
    }

    /// Set the number format of a range
    pub fn set_number_format(&mut self, format: &str, span: impl Into<Span>) -> Result<()> {
        let address = self.resolve_span(span.into());
        self.with_engine(|engine, sheet| engine.set_number_format(sheet, &address, format))
    }

    /// Merge (`true`) or unmerge (`false`) a range
    pub fn merge_cells(&mut self, merge: bool, span: impl Into<Span>) -> Result<()> {
        let address = self.resolve_span(span.into());
        self.with_engine(|engine, sheet| engine.merge_cells(sheet, &address, merge))
    }

    /// Set the width of column `col`, or of `col..=end_col` when `end_col` is set
    ///
    /// `col` becomes the cursor column (zero keeps it). The address is built
    /// on the cursor row.
    pub fn set_column_width(&mut self, col: u32, width: f64, end_col: u32) -> Result<()> {
        let pos = self.resolve(At::col(col));
        let end_row = if end_col > 0 { pos.row } else { 0 };
        let address = build_address(pos.row, pos.col, end_row, end_col);
        self.with_engine(|engine, sheet| engine.set_column_width(sheet, &address, width))
    }

    /// Insert a row above `row`
    pub fn insert_row(&mut self, row: u32) -> Result<()> {
        self.with_engine(|engine, sheet| engine.insert_row(sheet, row.max(1)))
    }

    // === Worksheets ===

    /// Name of the active worksheet
    pub fn sheet_name(&self) -> &str {
        &self.sheet
    }

    /// Names of all worksheets
    pub fn worksheet_names(&mut self) -> Result<Vec<String>> {
        let engine = self.engine.as_mut().ok_or(Error::Closed)?;
        engine.worksheet_names().map_err(Error::engine)
    }

    /// Make `name` the active worksheet and reset the cursor to A1
    pub fn select_worksheet(&mut self, name: &str) -> Result<()> {
        let sheet = self
            .worksheet_names()?
            .into_iter()
            .find(|s| s.eq_ignore_ascii_case(name))
            .ok_or_else(|| sheetwalk_core::Error::SheetNotFound(name.to_string()))?;

        let engine = self.engine.as_mut().ok_or(Error::Closed)?;
        engine.activate_worksheet(&sheet).map_err(Error::engine)?;
        tracing::info!(%sheet, "selected worksheet");
        self.sheet = sheet;
        self.cursor = Coordinate::ORIGIN;
        Ok(())
    }

    /// Add a worksheet; the active worksheet stays as it is
    pub fn add_worksheet(&mut self, name: Option<&str>) -> Result<()> {
        self.with_engine(|engine, sheet| {
            engine.add_worksheet(name)?;
            engine.activate_worksheet(sheet)
        })
    }

    /// Delete a worksheet, the active one when `name` is `None`
    ///
    /// Deleting the active worksheet selects the first remaining one.
    pub fn delete_worksheet(&mut self, name: Option<&str>) -> Result<()> {
        let target = name.unwrap_or(&self.sheet).to_string();
        let was_active = target.eq_ignore_ascii_case(&self.sheet);
        self.with_engine(|engine, _| engine.delete_worksheet(&target))?;
        tracing::info!(sheet = %target, "deleted worksheet");

        if was_active {
            let first = self
                .worksheet_names()?
                .into_iter()
                .next()
                .ok_or(Error::NoWorksheets)?;
            self.select_worksheet(&first)?;
        }
        Ok(())
    }

    /// Rename the active worksheet
    pub fn rename_worksheet(&mut self, new_name: &str) -> Result<()> {
        self.with_engine(|engine, sheet| engine.rename_worksheet(sheet, new_name))?;
        self.sheet = new_name.to_string();
        Ok(())
    }

    /// Rows in the used range of the active worksheet
    pub fn row_count(&mut self) -> Result<u32> {
        Ok(self.with_engine(|engine, sheet| engine.used_extent(sheet))?.0)
    }

    /// Columns in the used range of the active worksheet
    pub fn column_count(&mut self) -> Result<u32> {
        Ok(self.with_engine(|engine, sheet| engine.used_extent(sheet))?.1)
    }

    // === Document ===

    /// File name of the document
    pub fn file_name(&mut self) -> Result<String> {
        self.with_engine(|engine, _| engine.document_name())
    }

    /// Apply print settings to the active worksheet
    pub fn page_setup(&mut self, setup: &PageSetup) -> Result<()> {
        self.with_engine(|engine, sheet| engine.page_setup(sheet, setup))
    }

    /// Print the active worksheet
    ///
    /// Falls back to the engine's secondary print call when the first one
    /// fails; a failure there is returned.
    pub fn print(&mut self, copies: u32, preview: bool) -> Result<()> {
        self.with_engine(|engine, sheet| match engine.print_out(sheet, copies, preview) {
            Ok(()) => Ok(()),
            Err(err) => {
                tracing::warn!(error = %err, "print failed, retrying with the secondary call");
                engine.print_out_ex(sheet, copies, preview)
            }
        })
    }

    /// Run a macro stored in the document
    pub fn run_macro(&mut self, name: &str) -> Result<()> {
        self.with_engine(|engine, _| engine.run_macro(name))
    }

    /// Save in place
    ///
    /// A failed save is reported through the notifier and returns `false`.
    pub fn save(&mut self) -> Result<bool> {
        let engine = self.engine.as_mut().ok_or(Error::Closed)?;
        match engine.save() {
            Ok(()) => {
                tracing::info!(sheet = %self.sheet, "saved document");
                Ok(true)
            }
            Err(err) => {
                tracing::warn!(error = %err, "save failed");
                self.notify_save_failed();
                Ok(false)
            }
        }
    }

    /// Save under a new path
    ///
    /// A failed save is reported through the notifier and returns `false`.
    pub fn save_as(&mut self, path: &Path, format: SaveFormat) -> Result<bool> {
        let engine = self.engine.as_mut().ok_or(Error::Closed)?;
        match engine.save_as(path, format) {
            Ok(()) => {
                tracing::info!(path = %path.display(), ?format, "saved document");
                Ok(true)
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "save as failed");
                self.notify_save_failed();
                Ok(false)
            }
        }
    }

    // === Lifetime ===

    /// The engine, until the accessor is closed
    pub fn engine(&self) -> Option<&E> {
        self.engine.as_ref()
    }

    /// Check if the accessor was closed
    pub fn is_closed(&self) -> bool {
        self.engine.is_none()
    }

    /// Close the document and release the engine
    ///
    /// The engine is released even when its close call fails. Closing again
    /// does nothing.
    pub fn close(&mut self) -> Result<()> {
        if let Some(mut engine) = self.engine.take() {
            tracing::info!(sheet = %self.sheet, "closing document");
            engine.close().map_err(Error::engine)?;
        }
        Ok(())
    }
}

impl<E: SpreadsheetEngine> Drop for SheetAccessor<E> {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            tracing::warn!(error = %err, "failed to close document on drop");
        }
    }
}
