//! An in-process spreadsheet engine
//!
//! [`MemoryWorkbook`] implements [`SpreadsheetEngine`] without any external
//! application. It backs the test suites and dry runs, and it can be told to
//! fail saves, bulk writes or prints to exercise error paths.

mod sheet;

use std::path::{Path, PathBuf};

use crate::cell::{CellRange, CellValue, Grid, GridValue};
use crate::engine::{SaveFormat, SpreadsheetEngine};
use crate::error::{Error, Result};
use crate::style::{BorderSpec, FormatSpec, PageSetup};

pub use sheet::{MemoryCell, MemorySheet};

/// A recorded print request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintJob {
    pub sheet: String,
    pub copies: u32,
    pub preview: bool,
    /// Printed through the secondary entry point
    pub fallback: bool,
}

/// A workbook held entirely in memory
#[derive(Debug, Clone)]
pub struct MemoryWorkbook {
    name: String,
    sheets: Vec<MemorySheet>,
    active: usize,
    next_sheet_number: u32,
    save_count: usize,
    saved_as: Vec<(PathBuf, SaveFormat)>,
    print_jobs: Vec<PrintJob>,
    macros_run: Vec<String>,
    save_failure: Option<String>,
    bulk_write_failure: Option<String>,
    print_failure: Option<String>,
    closed: bool,
}

impl Default for MemoryWorkbook {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryWorkbook {
    /// Create a new workbook named "Book1" with one sheet, "Sheet1"
    pub fn new() -> Self {
        Self::with_sheets("Book1", ["Sheet1"])
    }

    /// Create a workbook with the given sheets, the first one active
    ///
    /// An empty list still produces one sheet, "Sheet1".
    pub fn with_sheets<I, S>(name: &str, sheets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut sheets: Vec<MemorySheet> = sheets.into_iter().map(MemorySheet::new).collect();
        if sheets.is_empty() {
            sheets.push(MemorySheet::new("Sheet1"));
        }
        let next_sheet_number = sheets.len() as u32 + 1;
        Self {
            name: name.to_string(),
            sheets,
            active: 0,
            next_sheet_number,
            save_count: 0,
            saved_as: Vec::new(),
            print_jobs: Vec::new(),
            macros_run: Vec::new(),
            save_failure: None,
            bulk_write_failure: None,
            print_failure: None,
            closed: false,
        }
    }

    // === Fault injection ===

    /// Make every save and save-as fail with `message`
    pub fn fail_saves<S: Into<String>>(&mut self, message: S) {
        self.save_failure = Some(message.into());
    }

    /// Make every bulk range write fail with `message`
    pub fn fail_bulk_writes<S: Into<String>>(&mut self, message: S) {
        self.bulk_write_failure = Some(message.into());
    }

    /// Make the primary print entry point fail with `message`
    pub fn fail_print_out<S: Into<String>>(&mut self, message: S) {
        self.print_failure = Some(message.into());
    }

    /// Remove every injected failure
    pub fn clear_failures(&mut self) {
        self.save_failure = None;
        self.bulk_write_failure = None;
        self.print_failure = None;
    }

    // === Inspection ===

    /// Get a worksheet by name (case-insensitive)
    pub fn sheet(&self, name: &str) -> Option<&MemorySheet> {
        self.sheet_index(name).map(|i| &self.sheets[i])
    }

    /// Name of the active worksheet
    pub fn active_sheet_name(&self) -> &str {
        self.sheets[self.active].name()
    }

    /// Number of in-place saves
    pub fn save_count(&self) -> usize {
        self.save_count
    }

    /// Paths passed to save-as, in order
    pub fn saved_as(&self) -> &[(PathBuf, SaveFormat)] {
        &self.saved_as
    }

    /// Print requests that went through
    pub fn print_jobs(&self) -> &[PrintJob] {
        &self.print_jobs
    }

    /// Macros run, in order
    pub fn macros_run(&self) -> &[String] {
        &self.macros_run
    }

    /// Check if the workbook was closed
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    // === Internal helpers ===

    fn sheet_index(&self, name: &str) -> Option<usize> {
        self.sheets
            .iter()
            .position(|s| s.name().eq_ignore_ascii_case(name))
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            Err(Error::other(format!("workbook '{}' is closed", self.name)))
        } else {
            Ok(())
        }
    }

    fn sheet_mut(&mut self, name: &str) -> Result<&mut MemorySheet> {
        self.ensure_open()?;
        let index = self
            .sheet_index(name)
            .ok_or_else(|| Error::SheetNotFound(name.to_string()))?;
        Ok(&mut self.sheets[index])
    }

    fn sheet_ref(&self, name: &str) -> Result<&MemorySheet> {
        self.ensure_open()?;
        self.sheet(name)
            .ok_or_else(|| Error::SheetNotFound(name.to_string()))
    }

    fn next_sheet_name(&mut self) -> String {
        loop {
            let candidate = format!("Sheet{}", self.next_sheet_number);
            self.next_sheet_number += 1;
            if self.sheet_index(&candidate).is_none() {
                return candidate;
            }
        }
    }

    fn check_save(&self) -> Result<()> {
        self.ensure_open()?;
        match &self.save_failure {
            Some(message) => Err(Error::other(message.clone())),
            None => Ok(()),
        }
    }
}

impl SpreadsheetEngine for MemoryWorkbook {
    type Error = Error;

    fn document_name(&mut self) -> Result<String> {
        self.ensure_open()?;
        Ok(self.name.clone())
    }

    fn worksheet_names(&mut self) -> Result<Vec<String>> {
        self.ensure_open()?;
        Ok(self.sheets.iter().map(|s| s.name().to_string()).collect())
    }

    /// Inserts before the active sheet and activates the new one
    fn add_worksheet(&mut self, name: Option<&str>) -> Result<()> {
        self.ensure_open()?;
        let name = match name.filter(|n| !n.is_empty()) {
            Some(name) if self.sheet_index(name).is_some() => {
                return Err(Error::DuplicateSheetName(name.to_string()))
            }
            Some(name) => name.to_string(),
            None => self.next_sheet_name(),
        };
        self.sheets.insert(self.active, MemorySheet::new(name));
        Ok(())
    }

    fn delete_worksheet(&mut self, sheet: &str) -> Result<()> {
        self.ensure_open()?;
        let index = self
            .sheet_index(sheet)
            .ok_or_else(|| Error::SheetNotFound(sheet.to_string()))?;
        if self.sheets.len() == 1 {
            return Err(Error::LastSheet(sheet.to_string()));
        }
        self.sheets.remove(index);
        if index < self.active {
            self.active -= 1;
        }
        self.active = self.active.min(self.sheets.len() - 1);
        Ok(())
    }

    fn activate_worksheet(&mut self, sheet: &str) -> Result<()> {
        self.ensure_open()?;
        self.active = self
            .sheet_index(sheet)
            .ok_or_else(|| Error::SheetNotFound(sheet.to_string()))?;
        Ok(())
    }

    fn rename_worksheet(&mut self, sheet: &str, new_name: &str) -> Result<()> {
        self.ensure_open()?;
        if let Some(existing) = self.sheet_index(new_name) {
            if !self.sheets[existing].name().eq_ignore_ascii_case(sheet) {
                return Err(Error::DuplicateSheetName(new_name.to_string()));
            }
        }
        self.sheet_mut(sheet)?.set_name(new_name);
        Ok(())
    }

    fn used_extent(&mut self, sheet: &str) -> Result<(u32, u32)> {
        Ok(self.sheet_ref(sheet)?.used_extent())
    }

    fn cell_text(&mut self, sheet: &str, row: u32, col: u32) -> Result<Option<String>> {
        Ok(self.sheet_ref(sheet)?.text_at(row, col))
    }

    fn set_cell(&mut self, sheet: &str, row: u32, col: u32, value: &CellValue) -> Result<()> {
        self.sheet_mut(sheet)?
            .set_value(row, col, GridValue::from(value.clone()));
        Ok(())
    }

    fn range_values(&mut self, sheet: &str, range: &str) -> Result<Grid> {
        let range = CellRange::parse(range)?;
        Ok(self.sheet_ref(sheet)?.range_values(&range))
    }

    fn set_range_values(&mut self, sheet: &str, range: &str, values: &Grid) -> Result<()> {
        self.ensure_open()?;
        if let Some(message) = &self.bulk_write_failure {
            return Err(Error::other(message.clone()));
        }
        let range = CellRange::parse(range)?;
        self.sheet_mut(sheet)?.set_range_values(&range, values)
    }

    fn set_formula(&mut self, sheet: &str, range: &str, formula: &str) -> Result<()> {
        let range = CellRange::parse(range)?;
        self.sheet_mut(sheet)?.set_formula(&range, formula);
        Ok(())
    }

    fn delete_range(&mut self, sheet: &str, range: &str) -> Result<()> {
        let range = CellRange::parse(range)?;
        self.sheet_mut(sheet)?.delete_range(&range);
        Ok(())
    }

    fn apply_format(&mut self, sheet: &str, range: &str, format: &FormatSpec) -> Result<()> {
        let range = CellRange::parse(range)?;
        self.sheet_mut(sheet)?.apply_format(&range, format);
        Ok(())
    }

    fn set_border(&mut self, sheet: &str, range: &str, border: &BorderSpec) -> Result<()> {
        let range = CellRange::parse(range)?;
        self.sheet_mut(sheet)?.set_border(&range, border);
        Ok(())
    }

    fn set_number_format(&mut self, sheet: &str, range: &str, format: &str) -> Result<()> {
        let range = CellRange::parse(range)?;
        self.sheet_mut(sheet)?.set_number_format(&range, format);
        Ok(())
    }

    fn merge_cells(&mut self, sheet: &str, range: &str, merge: bool) -> Result<()> {
        let range = CellRange::parse(range)?;
        let sheet = self.sheet_mut(sheet)?;
        if merge {
            sheet.merge(&range)
        } else {
            sheet.unmerge(&range);
            Ok(())
        }
    }

    fn set_column_width(&mut self, sheet: &str, range: &str, width: f64) -> Result<()> {
        let range = CellRange::parse(range)?;
        self.sheet_mut(sheet)?.set_column_width(&range, width);
        Ok(())
    }

    fn insert_row(&mut self, sheet: &str, row: u32) -> Result<()> {
        self.sheet_mut(sheet)?.insert_row(row.max(1));
        Ok(())
    }

    fn page_setup(&mut self, sheet: &str, setup: &PageSetup) -> Result<()> {
        self.sheet_mut(sheet)?.set_page_setup(setup);
        Ok(())
    }

    fn print_out(&mut self, sheet: &str, copies: u32, preview: bool) -> Result<()> {
        let sheet = self.sheet_ref(sheet)?.name().to_string();
        if let Some(message) = &self.print_failure {
            return Err(Error::other(message.clone()));
        }
        self.print_jobs.push(PrintJob {
            sheet,
            copies,
            preview,
            fallback: false,
        });
        Ok(())
    }

    fn print_out_ex(&mut self, sheet: &str, copies: u32, preview: bool) -> Result<()> {
        let sheet = self.sheet_ref(sheet)?.name().to_string();
        self.print_jobs.push(PrintJob {
            sheet,
            copies,
            preview,
            fallback: true,
        });
        Ok(())
    }

    fn run_macro(&mut self, name: &str) -> Result<()> {
        self.ensure_open()?;
        self.macros_run.push(name.to_string());
        Ok(())
    }

    fn save(&mut self) -> Result<()> {
        self.check_save()?;
        self.save_count += 1;
        tracing::debug!(workbook = %self.name, "saved in memory");
        Ok(())
    }

    fn save_as(&mut self, path: &Path, format: SaveFormat) -> Result<()> {
        self.check_save()?;
        if let Some(file_name) = path.file_name() {
            self.name = file_name.to_string_lossy().into_owned();
        }
        self.saved_as.push((path.to_path_buf(), format));
        tracing::debug!(workbook = %self.name, path = %path.display(), "saved as");
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.closed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_workbook() {
        let mut wb = MemoryWorkbook::new();
        assert_eq!(wb.document_name().unwrap(), "Book1");
        assert_eq!(wb.worksheet_names().unwrap(), vec!["Sheet1"]);
        assert_eq!(wb.active_sheet_name(), "Sheet1");
    }

    #[test]
    fn test_add_worksheet_inserts_before_active() {
        let mut wb = MemoryWorkbook::new();
        wb.add_worksheet(None).unwrap();
        wb.add_worksheet(Some("Data")).unwrap();
        assert_eq!(
            wb.worksheet_names().unwrap(),
            vec!["Data", "Sheet2", "Sheet1"]
        );
        assert!(matches!(
            wb.add_worksheet(Some("data")),
            Err(Error::DuplicateSheetName(_))
        ));
    }

    #[test]
    fn test_delete_worksheet() {
        let mut wb = MemoryWorkbook::with_sheets("Book1", ["A", "B", "C"]);
        wb.activate_worksheet("C").unwrap();
        wb.delete_worksheet("A").unwrap();
        assert_eq!(wb.active_sheet_name(), "C");

        wb.delete_worksheet("C").unwrap();
        assert_eq!(wb.active_sheet_name(), "B");

        assert!(matches!(wb.delete_worksheet("B"), Err(Error::LastSheet(_))));
        assert!(matches!(
            wb.delete_worksheet("Nope"),
            Err(Error::SheetNotFound(_))
        ));
    }

    #[test]
    fn test_rename_worksheet() {
        let mut wb = MemoryWorkbook::with_sheets("Book1", ["A", "B"]);
        wb.rename_worksheet("A", "Summary").unwrap();
        assert!(wb.sheet("summary").is_some());
        assert!(wb.rename_worksheet("Summary", "B").is_err());
        // Case-only rename of the same sheet is allowed
        wb.rename_worksheet("B", "b").unwrap();
    }

    #[test]
    fn test_bulk_round_trip() {
        let mut wb = MemoryWorkbook::new();
        let grid = vec![
            vec![GridValue::from("Name"), GridValue::from("Age")],
            vec![GridValue::from("Ann"), GridValue::Number(30.0)],
        ];
        wb.set_range_values("Sheet1", "B2:C3", &grid).unwrap();
        assert_eq!(wb.range_values("Sheet1", "B2:C3").unwrap(), grid);
        assert_eq!(wb.used_extent("Sheet1").unwrap(), (3, 3));
        assert_eq!(
            wb.cell_text("Sheet1", 3, 3).unwrap().as_deref(),
            Some("30")
        );
        assert_eq!(wb.cell_text("Sheet1", 9, 9).unwrap(), None);
    }

    #[test]
    fn test_injected_failures() {
        let mut wb = MemoryWorkbook::new();
        wb.fail_saves("file is read-only");
        wb.fail_bulk_writes("Exception from HRESULT: 0x800A03EC");
        assert_eq!(wb.save().unwrap_err().to_string(), "file is read-only");
        assert!(wb
            .set_range_values("Sheet1", "A1", &vec![vec![GridValue::from("x")]])
            .unwrap_err()
            .to_string()
            .contains("HRESULT"));

        wb.clear_failures();
        wb.save().unwrap();
        assert_eq!(wb.save_count(), 1);
    }

    #[test]
    fn test_save_as_renames_document() {
        let mut wb = MemoryWorkbook::new();
        wb.save_as(Path::new("/tmp/out/report.xls"), SaveFormat::Excel97)
            .unwrap();
        assert_eq!(wb.document_name().unwrap(), "report.xls");
        assert_eq!(
            wb.saved_as(),
            &[(PathBuf::from("/tmp/out/report.xls"), SaveFormat::Excel97)]
        );
    }

    #[test]
    fn test_closed_workbook_rejects_calls() {
        let mut wb = MemoryWorkbook::new();
        wb.close().unwrap();
        assert!(wb.is_closed());
        assert!(wb.worksheet_names().is_err());
        assert!(wb.set_cell("Sheet1", 1, 1, &CellValue::from("x")).is_err());
    }
}
