//! Cell value types

use std::fmt;

/// A value written into a single cell
///
/// `Empty` and empty text both clear the target cell.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellValue {
    /// Clears the cell
    #[default]
    Empty,
    /// Text value
    Text(String),
    /// Whole number
    Integer(i64),
}

impl CellValue {
    /// Check if writing this value clears the cell
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.is_empty(),
            CellValue::Integer(_) => false,
        }
    }

    /// Collapse empty text to [`CellValue::Empty`]
    pub fn normalized(self) -> Self {
        if self.is_empty() {
            CellValue::Empty
        } else {
            self
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Integer(n)
    }
}

impl From<i32> for CellValue {
    fn from(n: i32) -> Self {
        CellValue::Integer(n as i64)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(CellValue::Empty)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Integer(n) => write!(f, "{n}"),
        }
    }
}

/// A cell value as the spreadsheet engine holds it
///
/// This is what bulk range reads return. Numbers are stored as `f64`, the
/// way spreadsheet applications store them.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GridValue {
    /// No value
    #[default]
    Empty,
    /// Text value
    Text(String),
    /// Numeric value
    Number(f64),
    /// Boolean value
    Bool(bool),
}

/// A rectangular block of values, outer `Vec` is rows
pub type Grid = Vec<Vec<GridValue>>;

impl GridValue {
    /// Check if the cell holds nothing
    pub fn is_empty(&self) -> bool {
        matches!(self, GridValue::Empty)
    }

    /// Check if the cell is empty or holds only whitespace
    pub fn is_blank(&self) -> bool {
        match self {
            GridValue::Empty => true,
            GridValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Try to get the value as a string slice
    pub fn as_str(&self) -> Option<&str> {
        match self {
            GridValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get the value as a number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            GridValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl From<CellValue> for GridValue {
    fn from(value: CellValue) -> Self {
        match value.normalized() {
            CellValue::Empty => GridValue::Empty,
            CellValue::Text(s) => GridValue::Text(s),
            CellValue::Integer(n) => GridValue::Number(n as f64),
        }
    }
}

impl From<&str> for GridValue {
    fn from(s: &str) -> Self {
        GridValue::Text(s.to_string())
    }
}

impl From<String> for GridValue {
    fn from(s: String) -> Self {
        GridValue::Text(s)
    }
}

impl From<f64> for GridValue {
    fn from(n: f64) -> Self {
        GridValue::Number(n)
    }
}

impl From<bool> for GridValue {
    fn from(b: bool) -> Self {
        GridValue::Bool(b)
    }
}

/// Empty cells display as an empty string
impl fmt::Display for GridValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridValue::Empty => Ok(()),
            GridValue::Text(s) => write!(f, "{s}"),
            GridValue::Number(n) => write!(f, "{n}"),
            GridValue::Bool(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
        }
    }
}
