//! Moving tables in and out of a worksheet in one bulk transfer

use sheetwalk_core::{build_address, Grid, GridValue, SpreadsheetEngine, TabularBlock};

use crate::accessor::SheetAccessor;
use crate::error::{Error, Result};
use crate::notify::{Notice, Severity};

impl<E: SpreadsheetEngine> SheetAccessor<E> {
    /// Read `A1:(rows, cols)` as a table
    ///
    /// A zero count falls back to the used range. The first row holds the
    /// column names; a blank header cell is named `COLUMN<j>` with `j`
    /// counted from 1. Empty cells come back as empty strings.
    pub fn export_range(&mut self, row_count: u32, col_count: u32) -> Result<TabularBlock> {
        let (rows, cols) = if row_count == 0 || col_count == 0 {
            let (used_rows, used_cols) = self.with_engine(|engine, sheet| engine.used_extent(sheet))?;
            (
                if row_count > 0 { row_count } else { used_rows },
                if col_count > 0 { col_count } else { used_cols },
            )
        } else {
            (row_count, col_count)
        };

        let address = build_address(1, 1, rows, cols);
        let grid = self.with_engine(|engine, sheet| engine.range_values(sheet, &address))?;
        tracing::debug!(%address, rows = grid.len(), "exported range");

        let mut grid = grid.into_iter();
        let header = grid.next().unwrap_or_default();
        let mut table = TabularBlock::new(header.iter().enumerate().map(|(j, value)| {
            if value.is_blank() {
                format!("COLUMN{}", j + 1)
            } else {
                value.to_string()
            }
        }));
        for row in grid {
            table.push_row(row.iter().map(|value| Some(value.to_string())))?;
        }
        Ok(table)
    }

    /// Write a table at the cursor: a caption row, then one row per record
    ///
    /// Returns `true` when the write went through. Engine noise whose text
    /// contains `HRESULT` is ignored and also returns `true`. Any other engine
    /// failure is reported through the notifier and returns `false`.
    pub fn import_table(&mut self, table: &TabularBlock) -> Result<bool> {
        if table.column_count() == 0 {
            return Ok(true);
        }

        let start = self.cursor();
        let too_large = || Error::TableTooLarge {
            start,
            rows: table.row_count(),
            columns: table.column_count(),
        };
        let end_row = u32::try_from(table.row_count())
            .ok()
            .and_then(|rows| start.row.checked_add(rows))
            .ok_or_else(too_large)?;
        let end_col = u32::try_from(table.column_count() - 1)
            .ok()
            .and_then(|cols| start.col.checked_add(cols))
            .ok_or_else(too_large)?;
        let address = build_address(start.row, start.col, end_row, end_col);

        let mut grid: Grid = Vec::with_capacity(table.row_count() + 1);
        grid.push(
            table
                .columns()
                .iter()
                .map(|caption| GridValue::from(caption.as_str()))
                .collect(),
        );
        for i in 0..table.row_count() {
            grid.push(table.row_text(i).map(GridValue::from).collect());
        }

        match self.with_engine(|engine, sheet| engine.set_range_values(sheet, &address, &grid)) {
            Ok(()) => {
                tracing::debug!(%address, rows = grid.len(), "imported table");
                Ok(true)
            }
            Err(err) if err.is_hresult_noise() => {
                tracing::debug!(%address, error = %err, "ignored bulk write noise");
                Ok(true)
            }
            Err(Error::Engine(err)) => {
                tracing::warn!(%address, error = %err, "bulk write failed");
                self.notify(Notice::new(err.to_string(), "Exception", Severity::Error));
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }
}
