//! Shared protocol types for communication between the native Linux client
//! and the Windows COM bridge process running under WINE.
//!
//! The protocol is JSON-over-stdio: one JSON object per line in each direction.
//! Every request carries an id; the matching response echoes it.

use serde::{Deserialize, Serialize};
use sheetwalk_core::{BorderSpec, FormatSpec, GridValue, PageSetup, SaveFormat};

/// A command sent from the Linux client to the WINE bridge process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    /// Monotonically increasing request ID for correlating responses.
    pub id: u64,
    /// The command to execute.
    #[serde(flatten)]
    pub command: Command,
}

/// Commands the client can send to the bridge.
///
/// Ranges are A1-style addresses such as `"B3"` or `"B3:D5"`. Paths are
/// Windows paths as seen by WINE.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "cmd", content = "params")]
pub enum Command {
    /// Initialize COM and create the Excel.Application instance.
    Init,

    /// Create a new empty workbook. Returns a workbook handle.
    CreateWorkbook,

    /// Open an existing workbook. Returns a workbook handle.
    OpenWorkbook {
        path: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        password: Option<String>,
    },

    /// File name of the workbook. Returns a name.
    WorkbookName { workbook: u64 },

    /// Worksheet names in tab order. Returns names.
    ListSheets { workbook: u64 },

    /// Add a worksheet before the active one.
    AddSheet {
        workbook: u64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },

    DeleteSheet { workbook: u64, sheet: SheetRef },

    ActivateSheet { workbook: u64, sheet: SheetRef },

    RenameSheet {
        workbook: u64,
        sheet: SheetRef,
        name: String,
    },

    /// Row and column count of the used range. Returns an extent.
    UsedExtent { workbook: u64, sheet: SheetRef },

    /// Display text of one cell. Returns text, or no data for an empty cell.
    GetCellText {
        workbook: u64,
        sheet: SheetRef,
        cell: String,
    },

    /// Set a cell's value; `Null` clears it.
    SetCellValue {
        workbook: u64,
        sheet: SheetRef,
        cell: String,
        value: CellValue,
    },

    /// Read a rectangle of values. Returns values.
    GetRangeValues {
        workbook: u64,
        sheet: SheetRef,
        range: String,
    },

    /// Write a rectangle of values in one call.
    SetRangeValues {
        workbook: u64,
        sheet: SheetRef,
        range: String,
        values: Vec<Vec<CellValue>>,
    },

    /// Set the formula of every cell in a range (e.g., "=SUM(A1:A10)").
    SetFormula {
        workbook: u64,
        sheet: SheetRef,
        range: String,
        formula: String,
    },

    /// Delete a range, shifting cells up.
    DeleteRange {
        workbook: u64,
        sheet: SheetRef,
        range: String,
    },

    ApplyFormat {
        workbook: u64,
        sheet: SheetRef,
        range: String,
        format: FormatSpec,
    },

    SetBorder {
        workbook: u64,
        sheet: SheetRef,
        range: String,
        border: BorderSpec,
    },

    SetNumberFormat {
        workbook: u64,
        sheet: SheetRef,
        range: String,
        format: String,
    },

    MergeCells {
        workbook: u64,
        sheet: SheetRef,
        range: String,
        merge: bool,
    },

    SetColumnWidth {
        workbook: u64,
        sheet: SheetRef,
        range: String,
        width: f64,
    },

    /// Insert a row above `row`, shifting cells down.
    InsertRow {
        workbook: u64,
        sheet: SheetRef,
        row: u32,
    },

    PageSetup {
        workbook: u64,
        sheet: SheetRef,
        setup: PageSetup,
    },

    /// Print through `Worksheet.PrintOut`.
    PrintOut {
        workbook: u64,
        sheet: SheetRef,
        copies: u32,
        preview: bool,
    },

    /// Print through `Worksheet.PrintOutEx`.
    PrintOutEx {
        workbook: u64,
        sheet: SheetRef,
        copies: u32,
        preview: bool,
    },

    RunMacro { workbook: u64, name: String },

    /// Save the workbook in place.
    SaveWorkbook { workbook: u64 },

    /// Save the workbook to a file path (Windows path).
    SaveWorkbookAs {
        workbook: u64,
        path: String,
        #[serde(default)]
        format: SaveFormat,
    },

    /// Close a workbook, optionally saving it first.
    CloseWorkbook {
        workbook: u64,
        #[serde(default)]
        save: bool,
    },

    /// Shut down the bridge: close all workbooks, quit Excel, uninitialize COM.
    Shutdown,
}

/// Reference to a worksheet, by 0-based index or by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SheetRef {
    Index(u32),
    Name(String),
}

impl From<&str> for SheetRef {
    fn from(name: &str) -> Self {
        SheetRef::Name(name.to_string())
    }
}

impl From<u32> for SheetRef {
    fn from(index: u32) -> Self {
        SheetRef::Index(index)
    }
}

/// A cell value that can be sent to/from Excel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Error(CellError),
}

/// Excel error values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellError {
    pub code: String,
}

/// A response sent from the WINE bridge back to the Linux client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    /// The request ID this response corresponds to.
    pub id: u64,
    /// The result of the command.
    #[serde(flatten)]
    pub result: ResponseResult,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum ResponseResult {
    #[serde(rename = "ok")]
    Ok {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        data: Option<ResponseData>,
    },
    /// The application's own message, e.g. a COM exception text.
    #[serde(rename = "error")]
    Error { message: String },
}

/// Data returned in successful responses.
///
/// Variants are told apart by their field name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseData {
    /// Handle to a newly created/opened workbook.
    WorkbookHandle { workbook: u64 },
    /// Display text of a cell.
    Text { text: String },
    /// A rectangle of values, row-major.
    Values { values: Vec<Vec<CellValue>> },
    /// Worksheet names.
    Names { names: Vec<String> },
    /// Used-range size.
    Extent { rows: u32, columns: u32 },
    /// A document name.
    Name { name: String },
}

impl Response {
    pub fn ok(id: u64, data: Option<ResponseData>) -> Self {
        Self {
            id,
            result: ResponseResult::Ok { data },
        }
    }

    pub fn error(id: u64, message: impl Into<String>) -> Self {
        Self {
            id,
            result: ResponseResult::Error {
                message: message.into(),
            },
        }
    }
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<&sheetwalk_core::CellValue> for CellValue {
    fn from(value: &sheetwalk_core::CellValue) -> Self {
        match value {
            sheetwalk_core::CellValue::Empty => CellValue::Null,
            sheetwalk_core::CellValue::Text(s) => CellValue::String(s.clone()),
            sheetwalk_core::CellValue::Integer(n) => CellValue::Number(*n as f64),
        }
    }
}

impl From<&GridValue> for CellValue {
    fn from(value: &GridValue) -> Self {
        match value {
            GridValue::Empty => CellValue::Null,
            GridValue::Text(s) => CellValue::String(s.clone()),
            GridValue::Number(n) => CellValue::Number(*n),
            GridValue::Bool(b) => CellValue::Bool(*b),
        }
    }
}

impl From<CellValue> for GridValue {
    /// Error values come through as their code text (e.g. `#DIV/0!`).
    fn from(value: CellValue) -> Self {
        match value {
            CellValue::Null => GridValue::Empty,
            CellValue::Bool(b) => GridValue::Bool(b),
            CellValue::Number(n) => GridValue::Number(n),
            CellValue::String(s) => GridValue::Text(s),
            CellValue::Error(e) => GridValue::Text(e.code),
        }
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellValue::Null => write!(f, "<empty>"),
            CellValue::Bool(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            CellValue::Number(n) => write!(f, "{n}"),
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Error(e) => write!(f, "{}", e.code),
        }
    }
}
