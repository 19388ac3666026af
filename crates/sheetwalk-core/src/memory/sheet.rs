//! Worksheet storage for the in-memory engine

use std::collections::{BTreeMap, BTreeSet};

use ahash::AHashMap;

use crate::cell::{CellRange, Coordinate, Grid, GridValue};
use crate::error::{Error, Result};
use crate::style::{BorderSpec, FormatSpec, PageSetup};

/// Everything stored for one cell
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryCell {
    /// The cell's value
    pub value: GridValue,
    /// Formula text; formulas are stored, never evaluated
    pub formula: Option<String>,
    /// Number format string
    pub number_format: Option<String>,
    /// Accumulated formatting
    pub format: FormatSpec,
    /// Borders applied to this cell, in application order
    pub borders: Vec<BorderSpec>,
}

impl MemoryCell {
    fn holds_content(&self) -> bool {
        !self.value.is_empty() || self.formula.is_some()
    }

    fn is_bare(&self) -> bool {
        !self.holds_content()
            && self.number_format.is_none()
            && self.format.is_empty()
            && self.borders.is_empty()
    }
}

/// A worksheet held by [`super::MemoryWorkbook`]
///
/// Storage is sparse: only touched cells are kept, keyed by 1-based
/// (row, column).
#[derive(Debug, Clone)]
pub struct MemorySheet {
    name: String,
    cells: AHashMap<(u32, u32), MemoryCell>,
    column_widths: BTreeMap<u32, f64>,
    autofit_columns: BTreeSet<u32>,
    merged: Vec<CellRange>,
    page_setup: PageSetup,
}

impl MemorySheet {
    /// Create an empty worksheet
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            cells: AHashMap::new(),
            column_widths: BTreeMap::new(),
            autofit_columns: BTreeSet::new(),
            merged: Vec::new(),
            page_setup: PageSetup::default(),
        }
    }

    /// Get the sheet name
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn set_name<S: Into<String>>(&mut self, name: S) {
        self.name = name.into();
    }

    /// Get the stored data of a cell
    pub fn cell(&self, row: u32, col: u32) -> Option<&MemoryCell> {
        self.cells.get(&(row, col))
    }

    /// Get a cell value, [`GridValue::Empty`] if unset
    pub fn value_at(&self, row: u32, col: u32) -> GridValue {
        self.cell(row, col)
            .map(|c| c.value.clone())
            .unwrap_or_default()
    }

    /// Display text of a cell, `None` if the cell was never written
    ///
    /// Formula cells have no computed value and display as an empty string.
    pub fn text_at(&self, row: u32, col: u32) -> Option<String> {
        self.cell(row, col)
            .filter(|c| c.holds_content())
            .map(|c| c.value.to_string())
    }

    /// Formula text of a cell
    pub fn formula_at(&self, row: u32, col: u32) -> Option<&str> {
        self.cell(row, col)?.formula.as_deref()
    }

    /// Number format of a cell
    pub fn number_format_at(&self, row: u32, col: u32) -> Option<&str> {
        self.cell(row, col)?.number_format.as_deref()
    }

    /// Formatting of a cell
    pub fn format_at(&self, row: u32, col: u32) -> Option<&FormatSpec> {
        self.cell(row, col).map(|c| &c.format)
    }

    /// Borders of a cell
    pub fn borders_at(&self, row: u32, col: u32) -> &[BorderSpec] {
        self.cell(row, col)
            .map(|c| c.borders.as_slice())
            .unwrap_or_default()
    }

    /// Custom width of a column
    pub fn column_width(&self, col: u32) -> Option<f64> {
        self.column_widths.get(&col).copied()
    }

    /// Check if a column was auto-fitted
    pub fn is_autofit(&self, col: u32) -> bool {
        self.autofit_columns.contains(&col)
    }

    /// Merged regions
    pub fn merged_regions(&self) -> &[CellRange] {
        &self.merged
    }

    /// Current print settings
    pub fn page_setup(&self) -> &PageSetup {
        &self.page_setup
    }

    /// Row and column count of the used range, anchored at A1
    ///
    /// An empty sheet reports `(1, 1)`, like a spreadsheet application's
    /// used range of a blank sheet.
    pub fn used_extent(&self) -> (u32, u32) {
        self.cells
            .iter()
            .filter(|(_, c)| c.holds_content())
            .fold((1, 1), |(rows, cols), (&(r, c), _)| {
                (rows.max(r), cols.max(c))
            })
    }

    /// Number of cells holding a value or formula
    pub fn cell_count(&self) -> usize {
        self.cells.values().filter(|c| c.holds_content()).count()
    }

    // === Mutation (driven by the engine) ===

    fn cell_mut(&mut self, row: u32, col: u32) -> &mut MemoryCell {
        self.cells.entry((row, col)).or_default()
    }

    fn prune(&mut self, row: u32, col: u32) {
        if self.cells.get(&(row, col)).is_some_and(MemoryCell::is_bare) {
            self.cells.remove(&(row, col));
        }
    }

    fn for_each_cell(&mut self, range: &CellRange, mut f: impl FnMut(&mut MemoryCell)) {
        for row in range.start.row..=range.end.row {
            for col in range.start.col..=range.end.col {
                f(self.cell_mut(row, col));
                self.prune(row, col);
            }
        }
    }

    pub(crate) fn set_value(&mut self, row: u32, col: u32, value: GridValue) {
        let cell = self.cell_mut(row, col);
        cell.value = value;
        cell.formula = None;
        self.prune(row, col);
    }

    pub(crate) fn range_values(&self, range: &CellRange) -> Grid {
        (range.start.row..=range.end.row)
            .map(|row| {
                (range.start.col..=range.end.col)
                    .map(|col| self.value_at(row, col))
                    .collect()
            })
            .collect()
    }

    pub(crate) fn set_range_values(&mut self, range: &CellRange, values: &Grid) -> Result<()> {
        let fits = values.len() == range.row_count() as usize
            && values
                .iter()
                .all(|row| row.len() == range.col_count() as usize);
        if !fits {
            return Err(Error::ShapeMismatch {
                range: range.to_a1_string(),
                rows: range.row_count(),
                cols: range.col_count(),
                actual_rows: values.len(),
                actual_cols: values.first().map_or(0, Vec::len),
            });
        }

        for (row, row_values) in (range.start.row..).zip(values) {
            for (col, value) in (range.start.col..).zip(row_values) {
                self.set_value(row, col, value.clone());
            }
        }
        Ok(())
    }

    pub(crate) fn set_formula(&mut self, range: &CellRange, formula: &str) {
        self.for_each_cell(range, |cell| {
            cell.value = GridValue::Empty;
            cell.formula = Some(formula.to_string());
        });
    }

    pub(crate) fn apply_format(&mut self, range: &CellRange, format: &FormatSpec) {
        self.for_each_cell(range, |cell| cell.format.merge(format));
        if format.autofit_columns {
            self.autofit_columns
                .extend(range.start.col..=range.end.col);
        }
    }

    pub(crate) fn set_border(&mut self, range: &CellRange, border: &BorderSpec) {
        self.for_each_cell(range, |cell| cell.borders.push(*border));
    }

    pub(crate) fn set_number_format(&mut self, range: &CellRange, format: &str) {
        self.for_each_cell(range, |cell| cell.number_format = Some(format.to_string()));
    }

    pub(crate) fn set_column_width(&mut self, range: &CellRange, width: f64) {
        for col in range.start.col..=range.end.col {
            self.column_widths.insert(col, width);
        }
    }

    pub(crate) fn set_page_setup(&mut self, setup: &PageSetup) {
        self.page_setup = setup.clone();
    }

    pub(crate) fn merge(&mut self, range: &CellRange) -> Result<()> {
        if range.start == range.end || self.merged.contains(range) {
            return Ok(());
        }
        if self.merged.iter().any(|m| m.overlaps(range)) {
            return Err(Error::MergedCellConflict(range.to_a1_string()));
        }
        self.merged.push(*range);
        Ok(())
    }

    pub(crate) fn unmerge(&mut self, range: &CellRange) {
        self.merged.retain(|m| !m.overlaps(range));
    }

    /// Remove the range and move the cells below it up by its height
    pub(crate) fn delete_range(&mut self, range: &CellRange) {
        let height = range.row_count();
        let cells = std::mem::take(&mut self.cells);
        self.cells = cells
            .into_iter()
            .filter_map(|((row, col), cell)| {
                let in_columns = col >= range.start.col && col <= range.end.col;
                if !in_columns || row < range.start.row {
                    Some(((row, col), cell))
                } else if row <= range.end.row {
                    None
                } else {
                    Some(((row - height, col), cell))
                }
            })
            .collect();
        self.merged
            .retain(|m| !range.contains(&m.start) && !range.contains(&m.end));
    }

    /// Move every cell at or below `row` down by one
    pub(crate) fn insert_row(&mut self, row: u32) {
        let cells = std::mem::take(&mut self.cells);
        self.cells = cells
            .into_iter()
            .map(|((r, c), cell)| if r >= row { ((r + 1, c), cell) } else { ((r, c), cell) })
            .collect();
        for region in &mut self.merged {
            if region.start.row >= row {
                region.start = Coordinate::new(region.start.row + 1, region.start.col);
            }
            if region.end.row >= row {
                region.end = Coordinate::new(region.end.row + 1, region.end.col);
            }
        }
    }
}
