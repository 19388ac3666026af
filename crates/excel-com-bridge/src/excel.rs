//! The Excel object model, one method per protocol command

#![cfg(windows)]

use std::collections::HashMap;

use windows::Win32::System::Variant::VARIANT;

use excel_com_protocol::{CellError, CellValue, SheetRef};
use sheetwalk_core::{BorderSpec, FormatSpec, PageSetup, SaveFormat};

use crate::dispatch::{
    variant_bool, variant_empty, variant_f64, variant_get_bool, variant_get_error,
    variant_get_f64, variant_get_grid, variant_get_string, variant_grid, variant_i32,
    variant_is_empty, variant_missing, variant_str, ComResult, DispatchObject,
};
use crate::xl;

/// An `Excel.Application` instance and the workbooks opened through it
pub struct ExcelApp {
    app: DispatchObject,
    workbooks_collection: DispatchObject,
    workbooks: HashMap<u64, DispatchObject>,
    next_handle: u64,
}

impl ExcelApp {
    /// Start Excel hidden, with alerts and screen updates off
    pub fn new() -> ComResult<Self> {
        let app = DispatchObject::create("Excel.Application")?;
        app.put("Visible", variant_bool(false))?;
        app.put("DisplayAlerts", variant_bool(false))?;
        app.put("ScreenUpdating", variant_bool(false))?;
        let workbooks_collection = app.child("Workbooks")?;

        Ok(Self {
            app,
            workbooks_collection,
            workbooks: HashMap::new(),
            next_handle: 1,
        })
    }

    fn register(&mut self, workbook: DispatchObject) -> u64 {
        let handle = self.next_handle;
        self.next_handle += 1;
        self.workbooks.insert(handle, workbook);
        handle
    }

    fn workbook(&self, handle: u64) -> ComResult<&DispatchObject> {
        self.workbooks
            .get(&handle)
            .ok_or_else(|| format!("Unknown workbook handle: {handle}"))
    }

    fn sheet(&self, handle: u64, sheet: &SheetRef) -> ComResult<DispatchObject> {
        let sheets = self.workbook(handle)?.child("Worksheets")?;
        let key = match sheet {
            // Worksheets are 1-based in Excel
            SheetRef::Index(index) => variant_i32(to_i32(*index)? + 1),
            SheetRef::Name(name) => variant_str(name),
        };
        sheets.child_with("Item", &[key])
    }

    fn range(&self, handle: u64, sheet: &SheetRef, address: &str) -> ComResult<DispatchObject> {
        self.sheet(handle, sheet)?
            .child_with("Range", &[variant_str(address)])
    }

    // === Workbooks ===

    pub fn create_workbook(&mut self) -> ComResult<u64> {
        let workbook = self.workbooks_collection.call_child("Add", &[])?;
        Ok(self.register(workbook))
    }

    pub fn open_workbook(&mut self, path: &str, password: Option<&str>) -> ComResult<u64> {
        // Open(Filename, UpdateLinks, ReadOnly, Format, Password)
        let mut args = vec![variant_str(path)];
        if let Some(password) = password {
            args.extend([variant_missing(), variant_missing(), variant_missing()]);
            args.push(variant_str(password));
        }
        let workbook = self.workbooks_collection.call_child("Open", &args)?;
        Ok(self.register(workbook))
    }

    pub fn workbook_name(&self, handle: u64) -> ComResult<String> {
        self.workbook(handle)?.get_string("Name")
    }

    pub fn save(&self, handle: u64) -> ComResult<()> {
        self.workbook(handle)?.call("Save", &[]).map(|_| ())
    }

    pub fn save_as(&self, handle: u64, path: &str, format: SaveFormat) -> ComResult<()> {
        let file_format = xl::file_format(path, format).map_or_else(variant_missing, variant_i32);
        self.workbook(handle)?
            .call("SaveAs", &[variant_str(path), file_format])
            .map(|_| ())
    }

    pub fn close_workbook(&mut self, handle: u64, save: bool) -> ComResult<()> {
        let workbook = self
            .workbooks
            .remove(&handle)
            .ok_or_else(|| format!("Unknown workbook handle: {handle}"))?;
        workbook.call("Close", &[variant_bool(save)]).map(|_| ())
    }

    pub fn run_macro(&self, handle: u64, name: &str) -> ComResult<()> {
        // Application.Run resolves unqualified names against the active workbook
        self.workbook(handle)?.call("Activate", &[])?;
        self.app.call("Run", &[variant_str(name)]).map(|_| ())
    }

    /// Close every workbook without saving and quit Excel
    pub fn shutdown(mut self) -> ComResult<()> {
        let handles: Vec<u64> = self.workbooks.keys().copied().collect();
        for handle in handles {
            if let Err(e) = self.close_workbook(handle, false) {
                eprintln!("[excel-com-bridge] closing workbook {handle}: {e}");
            }
        }
        self.app.call("Quit", &[]).map(|_| ())
    }

    // === Worksheets ===

    pub fn sheet_names(&self, handle: u64) -> ComResult<Vec<String>> {
        let sheets = self.workbook(handle)?.child("Worksheets")?;
        let count = sheets.get_i32("Count")?;
        (1..=count)
            .map(|i| sheets.child_with("Item", &[variant_i32(i)])?.get_string("Name"))
            .collect()
    }

    /// `Worksheets.Add` places the sheet before the active one and activates it
    pub fn add_sheet(&self, handle: u64, name: Option<&str>) -> ComResult<()> {
        let sheet = self
            .workbook(handle)?
            .child("Worksheets")?
            .call_child("Add", &[])?;
        if let Some(name) = name {
            sheet.put("Name", variant_str(name))?;
        }
        Ok(())
    }

    pub fn delete_sheet(&self, handle: u64, sheet: &SheetRef) -> ComResult<()> {
        self.sheet(handle, sheet)?.call("Delete", &[]).map(|_| ())
    }

    pub fn activate_sheet(&self, handle: u64, sheet: &SheetRef) -> ComResult<()> {
        self.sheet(handle, sheet)?.call("Activate", &[]).map(|_| ())
    }

    pub fn rename_sheet(&self, handle: u64, sheet: &SheetRef, name: &str) -> ComResult<()> {
        self.sheet(handle, sheet)?.put("Name", variant_str(name))
    }

    /// Last used row and column, counted from A1
    pub fn used_extent(&self, handle: u64, sheet: &SheetRef) -> ComResult<(u32, u32)> {
        let used = self.sheet(handle, sheet)?.child("UsedRange")?;
        let rows = used.get_i32("Row")? + used.child("Rows")?.get_i32("Count")? - 1;
        let columns = used.get_i32("Column")? + used.child("Columns")?.get_i32("Count")? - 1;
        Ok((rows.max(1) as u32, columns.max(1) as u32))
    }

    // === Cells and ranges ===

    /// Display text of a cell, `None` when it shows nothing
    pub fn cell_text(&self, handle: u64, sheet: &SheetRef, cell: &str) -> ComResult<Option<String>> {
        let text = self.range(handle, sheet, cell)?.get_string("Text")?;
        Ok(Some(text).filter(|t| !t.is_empty()))
    }

    pub fn set_cell_value(
        &self,
        handle: u64,
        sheet: &SheetRef,
        cell: &str,
        value: &CellValue,
    ) -> ComResult<()> {
        self.range(handle, sheet, cell)?
            .put("Value", cell_value_to_variant(value))
    }

    /// Every value of a range in one `Value2` read
    pub fn range_values(
        &self,
        handle: u64,
        sheet: &SheetRef,
        range: &str,
    ) -> ComResult<Vec<Vec<CellValue>>> {
        let value = self.range(handle, sheet, range)?.get("Value2")?;
        match variant_get_grid(&value)? {
            Some(rows) => Ok(rows
                .iter()
                .map(|row| row.iter().map(variant_to_cell_value).collect())
                .collect()),
            // A one-cell range reads as a scalar
            None => Ok(vec![vec![variant_to_cell_value(&value)]]),
        }
    }

    /// Write a rectangle of values in one `Value2` assignment
    pub fn set_range_values(
        &self,
        handle: u64,
        sheet: &SheetRef,
        range: &str,
        values: &[Vec<CellValue>],
    ) -> ComResult<()> {
        let rows: Vec<Vec<VARIANT>> = values
            .iter()
            .map(|row| row.iter().map(cell_value_to_variant).collect())
            .collect();
        let grid = variant_grid(&rows)?;
        self.range(handle, sheet, range)?.put("Value2", grid)
    }

    pub fn set_formula(
        &self,
        handle: u64,
        sheet: &SheetRef,
        range: &str,
        formula: &str,
    ) -> ComResult<()> {
        self.range(handle, sheet, range)?
            .put("Formula", variant_str(formula))
    }

    pub fn delete_range(&self, handle: u64, sheet: &SheetRef, range: &str) -> ComResult<()> {
        self.range(handle, sheet, range)?
            .call("Delete", &[variant_i32(xl::SHIFT_UP)])
            .map(|_| ())
    }

    pub fn apply_format(
        &self,
        handle: u64,
        sheet: &SheetRef,
        range: &str,
        format: &FormatSpec,
    ) -> ComResult<()> {
        let range = self.range(handle, sheet, range)?;

        if let Some(align) = format.horizontal {
            range.put("HorizontalAlignment", variant_i32(xl::h_align(align)))?;
        }
        if format.bold.is_some()
            || format.italic.is_some()
            || format.font_size.is_some()
            || format.font_name.is_some()
        {
            let font = range.child("Font")?;
            if let Some(bold) = format.bold {
                font.put("Bold", variant_bool(bold))?;
            }
            if let Some(italic) = format.italic {
                font.put("Italic", variant_bool(italic))?;
            }
            if let Some(size) = format.font_size {
                font.put("Size", variant_f64(size))?;
            }
            if let Some(name) = &format.font_name {
                font.put("Name", variant_str(name))?;
            }
        }
        if let Some(index) = format.background_color_index {
            range.child("Interior")?.put("ColorIndex", variant_i32(index))?;
        }
        if let Some(wrap) = format.wrap_text {
            range.put("WrapText", variant_bool(wrap))?;
        }
        if format.autofit_columns {
            range.child("EntireColumn")?.call("AutoFit", &[])?;
        }
        Ok(())
    }

    pub fn set_border(
        &self,
        handle: u64,
        sheet: &SheetRef,
        range: &str,
        border: &BorderSpec,
    ) -> ComResult<()> {
        let borders = self.range(handle, sheet, range)?.child("Borders")?;
        // The collection itself covers the outline and the inner grid
        let target = match xl::border_index(border.edge) {
            Some(index) => borders.child_with("Item", &[variant_i32(index)])?,
            None => borders,
        };
        target.put("LineStyle", variant_i32(xl::CONTINUOUS))?;
        target.put("Weight", variant_i32(border.weight.0))
    }

    pub fn set_number_format(
        &self,
        handle: u64,
        sheet: &SheetRef,
        range: &str,
        format: &str,
    ) -> ComResult<()> {
        self.range(handle, sheet, range)?
            .put("NumberFormat", variant_str(format))
    }

    pub fn merge_cells(
        &self,
        handle: u64,
        sheet: &SheetRef,
        range: &str,
        merge: bool,
    ) -> ComResult<()> {
        let range = self.range(handle, sheet, range)?;
        let method = if merge { "Merge" } else { "UnMerge" };
        range.call(method, &[]).map(|_| ())
    }

    pub fn set_column_width(
        &self,
        handle: u64,
        sheet: &SheetRef,
        range: &str,
        width: f64,
    ) -> ComResult<()> {
        self.range(handle, sheet, range)?
            .child("EntireColumn")?
            .put("ColumnWidth", variant_f64(width))
    }

    pub fn insert_row(&self, handle: u64, sheet: &SheetRef, row: u32) -> ComResult<()> {
        self.sheet(handle, sheet)?
            .child_with("Rows", &[variant_i32(to_i32(row)?)])?
            .call("Insert", &[variant_i32(xl::SHIFT_DOWN)])
            .map(|_| ())
    }

    // === Printing ===

    pub fn page_setup(&self, handle: u64, sheet: &SheetRef, setup: &PageSetup) -> ComResult<()> {
        let page = self.sheet(handle, sheet)?.child("PageSetup")?;

        if let Some(orientation) = setup.orientation {
            page.put("Orientation", variant_i32(xl::orientation(orientation)))?;
        }

        let margins = setup.margins;
        page.put("LeftMargin", variant_f64(margins.left))?;
        page.put("RightMargin", variant_f64(margins.right))?;
        page.put("TopMargin", variant_f64(margins.top))?;
        page.put("BottomMargin", variant_f64(margins.bottom))?;

        if let Some(header) = &setup.header {
            page.put(&xl::header_property(header), variant_str(&header.text))?;
        }
        if let Some(footer) = &setup.footer {
            page.put(&xl::footer_property(footer), variant_str(&footer.text))?;
        }
        Ok(())
    }

    /// `PrintOut` or `PrintOutEx`, both take (From, To, Copies, Preview)
    pub fn print(
        &self,
        method: &str,
        handle: u64,
        sheet: &SheetRef,
        copies: u32,
        preview: bool,
    ) -> ComResult<()> {
        let args = [
            variant_missing(),
            variant_missing(),
            variant_i32(to_i32(copies.max(1))?),
            variant_bool(preview),
        ];
        self.sheet(handle, sheet)?.call(method, &args).map(|_| ())
    }
}

fn to_i32(n: u32) -> ComResult<i32> {
    i32::try_from(n).map_err(|_| format!("{n} is out of range"))
}

fn cell_value_to_variant(value: &CellValue) -> VARIANT {
    match value {
        CellValue::Null => variant_empty(),
        CellValue::Bool(b) => variant_bool(*b),
        CellValue::Number(n) => variant_f64(*n),
        CellValue::String(s) => variant_str(s),
        // Error values cannot be written
        CellValue::Error(_) => variant_empty(),
    }
}

fn variant_to_cell_value(variant: &VARIANT) -> CellValue {
    if variant_is_empty(variant) {
        CellValue::Null
    } else if let Some(b) = variant_get_bool(variant) {
        CellValue::Bool(b)
    } else if let Some(n) = variant_get_f64(variant) {
        CellValue::Number(n)
    } else if let Some(s) = variant_get_string(variant) {
        CellValue::String(s)
    } else if let Some(scode) = variant_get_error(variant) {
        CellValue::Error(CellError {
            code: xl::error_code(scode).to_string(),
        })
    } else {
        CellValue::Null
    }
}
