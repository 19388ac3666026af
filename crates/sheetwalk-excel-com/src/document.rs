//! An Excel workbook driven through the bridge

use std::path::Path;

use excel_com_protocol::{CellValue, Command as BridgeCommand, ResponseData, SheetRef};
use sheetwalk_core::{
    BorderSpec, FormatSpec, Grid, GridValue, PageSetup, SaveFormat, SpreadsheetEngine,
};

use crate::bridge::{linux_to_wine_path, BridgeError, ExcelBridge, Result};

/// One open workbook in the Excel COM bridge.
///
/// The document owns its bridge; closing the document shuts the bridge down.
#[derive(Debug)]
pub struct ExcelDocument {
    bridge: ExcelBridge,
    workbook: u64,
    closed: bool,
}

impl ExcelDocument {
    /// Create a new empty workbook.
    pub fn create(mut bridge: ExcelBridge) -> Result<Self> {
        let data = bridge.send_command(BridgeCommand::CreateWorkbook)?;
        Self::from_handle(bridge, data)
    }

    /// Open an existing workbook from a Linux path.
    pub fn open(mut bridge: ExcelBridge, path: &Path, password: Option<&str>) -> Result<Self> {
        tracing::info!(path = %path.display(), "opening workbook");
        let data = bridge.send_command(BridgeCommand::OpenWorkbook {
            path: linux_to_wine_path(path),
            password: password.map(str::to_string),
        })?;
        Self::from_handle(bridge, data)
    }

    fn from_handle(bridge: ExcelBridge, data: Option<ResponseData>) -> Result<Self> {
        match data {
            Some(ResponseData::WorkbookHandle { workbook }) => Ok(Self {
                bridge,
                workbook,
                closed: false,
            }),
            _ => Err(BridgeError::UnexpectedResponse),
        }
    }

    /// Get the internal handle ID.
    pub fn handle(&self) -> u64 {
        self.workbook
    }

    fn send(&mut self, command: BridgeCommand) -> Result<Option<ResponseData>> {
        if self.closed {
            return Err(BridgeError::Closed);
        }
        self.bridge.send_command(command)
    }

    fn run(&mut self, command: BridgeCommand) -> Result<()> {
        self.send(command).map(|_| ())
    }
}

impl SpreadsheetEngine for ExcelDocument {
    type Error = BridgeError;

    fn document_name(&mut self) -> Result<String> {
        let workbook = self.workbook;
        match self.send(BridgeCommand::WorkbookName { workbook })? {
            Some(ResponseData::Name { name }) => Ok(name),
            _ => Err(BridgeError::UnexpectedResponse),
        }
    }

    fn worksheet_names(&mut self) -> Result<Vec<String>> {
        let workbook = self.workbook;
        match self.send(BridgeCommand::ListSheets { workbook })? {
            Some(ResponseData::Names { names }) => Ok(names),
            _ => Err(BridgeError::UnexpectedResponse),
        }
    }

    fn add_worksheet(&mut self, name: Option<&str>) -> Result<()> {
        let workbook = self.workbook;
        self.run(BridgeCommand::AddSheet {
            workbook,
            name: name.map(str::to_string),
        })
    }

    fn delete_worksheet(&mut self, sheet: &str) -> Result<()> {
        let workbook = self.workbook;
        self.run(BridgeCommand::DeleteSheet {
            workbook,
            sheet: SheetRef::from(sheet),
        })
    }

    fn activate_worksheet(&mut self, sheet: &str) -> Result<()> {
        let workbook = self.workbook;
        self.run(BridgeCommand::ActivateSheet {
            workbook,
            sheet: SheetRef::from(sheet),
        })
    }

    fn rename_worksheet(&mut self, sheet: &str, new_name: &str) -> Result<()> {
        let workbook = self.workbook;
        self.run(BridgeCommand::RenameSheet {
            workbook,
            sheet: SheetRef::from(sheet),
            name: new_name.to_string(),
        })
    }

    fn used_extent(&mut self, sheet: &str) -> Result<(u32, u32)> {
        let workbook = self.workbook;
        match self.send(BridgeCommand::UsedExtent {
            workbook,
            sheet: SheetRef::from(sheet),
        })? {
            Some(ResponseData::Extent { rows, columns }) => Ok((rows, columns)),
            _ => Err(BridgeError::UnexpectedResponse),
        }
    }

    fn cell_text(&mut self, sheet: &str, row: u32, col: u32) -> Result<Option<String>> {
        let workbook = self.workbook;
        match self.send(BridgeCommand::GetCellText {
            workbook,
            sheet: SheetRef::from(sheet),
            cell: sheetwalk_core::build_address(row, col, 0, 0),
        })? {
            Some(ResponseData::Text { text }) => Ok(Some(text)),
            None => Ok(None),
            _ => Err(BridgeError::UnexpectedResponse),
        }
    }

    fn set_cell(
        &mut self,
        sheet: &str,
        row: u32,
        col: u32,
        value: &sheetwalk_core::CellValue,
    ) -> Result<()> {
        let workbook = self.workbook;
        self.run(BridgeCommand::SetCellValue {
            workbook,
            sheet: SheetRef::from(sheet),
            cell: sheetwalk_core::build_address(row, col, 0, 0),
            value: CellValue::from(value),
        })
    }

    fn range_values(&mut self, sheet: &str, range: &str) -> Result<Grid> {
        let workbook = self.workbook;
        match self.send(BridgeCommand::GetRangeValues {
            workbook,
            sheet: SheetRef::from(sheet),
            range: range.to_string(),
        })? {
            Some(ResponseData::Values { values }) => Ok(values
                .into_iter()
                .map(|row| row.into_iter().map(GridValue::from).collect())
                .collect()),
            _ => Err(BridgeError::UnexpectedResponse),
        }
    }

    fn set_range_values(&mut self, sheet: &str, range: &str, values: &Grid) -> Result<()> {
        let workbook = self.workbook;
        tracing::debug!(range, rows = values.len(), "bulk write");
        self.run(BridgeCommand::SetRangeValues {
            workbook,
            sheet: SheetRef::from(sheet),
            range: range.to_string(),
            values: values
                .iter()
                .map(|row| row.iter().map(CellValue::from).collect())
                .collect(),
        })
    }

    fn set_formula(&mut self, sheet: &str, range: &str, formula: &str) -> Result<()> {
        let workbook = self.workbook;
        self.run(BridgeCommand::SetFormula {
            workbook,
            sheet: SheetRef::from(sheet),
            range: range.to_string(),
            formula: formula.to_string(),
        })
    }

    fn delete_range(&mut self, sheet: &str, range: &str) -> Result<()> {
        let workbook = self.workbook;
        self.run(BridgeCommand::DeleteRange {
            workbook,
            sheet: SheetRef::from(sheet),
            range: range.to_string(),
        })
    }

    fn apply_format(&mut self, sheet: &str, range: &str, format: &FormatSpec) -> Result<()> {
        let workbook = self.workbook;
        self.run(BridgeCommand::ApplyFormat {
            workbook,
            sheet: SheetRef::from(sheet),
            range: range.to_string(),
            format: format.clone(),
        })
    }

    fn set_border(&mut self, sheet: &str, range: &str, border: &BorderSpec) -> Result<()> {
        let workbook = self.workbook;
        self.run(BridgeCommand::SetBorder {
            workbook,
            sheet: SheetRef::from(sheet),
            range: range.to_string(),
            border: *border,
        })
    }

    fn set_number_format(&mut self, sheet: &str, range: &str, format: &str) -> Result<()> {
        let workbook = self.workbook;
        self.run(BridgeCommand::SetNumberFormat {
            workbook,
            sheet: SheetRef::from(sheet),
            range: range.to_string(),
            format: format.to_string(),
        })
    }

    fn merge_cells(&mut self, sheet: &str, range: &str, merge: bool) -> Result<()> {
        let workbook = self.workbook;
        self.run(BridgeCommand::MergeCells {
            workbook,
            sheet: SheetRef::from(sheet),
            range: range.to_string(),
            merge,
        })
    }

    fn set_column_width(&mut self, sheet: &str, range: &str, width: f64) -> Result<()> {
        let workbook = self.workbook;
        self.run(BridgeCommand::SetColumnWidth {
            workbook,
            sheet: SheetRef::from(sheet),
            range: range.to_string(),
            width,
        })
    }

    fn insert_row(&mut self, sheet: &str, row: u32) -> Result<()> {
        let workbook = self.workbook;
        self.run(BridgeCommand::InsertRow {
            workbook,
            sheet: SheetRef::from(sheet),
            row,
        })
    }

    fn page_setup(&mut self, sheet: &str, setup: &PageSetup) -> Result<()> {
        let workbook = self.workbook;
        self.run(BridgeCommand::PageSetup {
            workbook,
            sheet: SheetRef::from(sheet),
            setup: setup.clone(),
        })
    }

    fn print_out(&mut self, sheet: &str, copies: u32, preview: bool) -> Result<()> {
        let workbook = self.workbook;
        self.run(BridgeCommand::PrintOut {
            workbook,
            sheet: SheetRef::from(sheet),
            copies,
            preview,
        })
    }

    fn print_out_ex(&mut self, sheet: &str, copies: u32, preview: bool) -> Result<()> {
        let workbook = self.workbook;
        self.run(BridgeCommand::PrintOutEx {
            workbook,
            sheet: SheetRef::from(sheet),
            copies,
            preview,
        })
    }

    fn run_macro(&mut self, name: &str) -> Result<()> {
        let workbook = self.workbook;
        self.run(BridgeCommand::RunMacro {
            workbook,
            name: name.to_string(),
        })
    }

    fn save(&mut self) -> Result<()> {
        let workbook = self.workbook;
        self.run(BridgeCommand::SaveWorkbook { workbook })
    }

    fn save_as(&mut self, path: &Path, format: SaveFormat) -> Result<()> {
        let workbook = self.workbook;
        self.run(BridgeCommand::SaveWorkbookAs {
            workbook,
            path: linux_to_wine_path(path),
            format,
        })
    }

    /// Close without saving, then shut the bridge down. Closing twice does
    /// nothing.
    fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        let workbook = self.workbook;
        let closed = self.run(BridgeCommand::CloseWorkbook {
            workbook,
            save: false,
        });
        self.closed = true;
        let shutdown = self.bridge.shutdown();
        closed.and(shutdown)
    }
}
