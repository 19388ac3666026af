//! Named-column tables exchanged with cell ranges

use crate::error::{Error, Result};

/// An in-memory table: ordered named columns and ordered rows
///
/// Cells are text. `None` stands for a null cell and is written to a sheet as
/// an empty string. Indices are 0-based.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TabularBlock {
    columns: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl TabularBlock {
    /// Create an empty table with the given column names
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row; its width must match the column count
    pub fn push_row<I, S>(&mut self, row: I) -> Result<()>
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        let row: Vec<Option<String>> = row.into_iter().map(|c| c.map(Into::into)).collect();
        if row.len() != self.columns.len() {
            return Err(Error::RowWidth {
                expected: self.columns.len(),
                actual: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// Append a row of non-null text cells
    pub fn push_text_row<I, S>(&mut self, row: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push_row(row.into_iter().map(Some))
    }

    /// Column names, in order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows, in order
    pub fn rows(&self) -> &[Vec<Option<String>>] {
        &self.rows
    }

    /// Number of data rows (the header is not counted)
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Position of a column by name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Raw cell, `None` when out of bounds or null
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col)?.as_deref()
    }

    /// Cell text, empty for null or out-of-bounds cells
    pub fn text(&self, row: usize, col: usize) -> &str {
        self.cell(row, col).unwrap_or_default()
    }

    /// Iterate over one row as text, null cells as empty strings
    pub fn row_text(&self, row: usize) -> impl Iterator<Item = &str> + '_ {
        self.rows
            .get(row)
            .into_iter()
            .flatten()
            .map(|c| c.as_deref().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_push_rows() {
        let mut table = TabularBlock::new(["Name", "Age"]);
        table.push_text_row(["Ann", "30"]).unwrap();
        table.push_row([Some("Bo"), None]).unwrap();

        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.column_index("Age"), Some(1));
        assert_eq!(table.cell(1, 1), None);
        assert_eq!(table.text(1, 1), "");
        assert_eq!(table.row_text(0).collect::<Vec<_>>(), vec!["Ann", "30"]);
    }

    #[test]
    fn test_push_row_width_mismatch() {
        let mut table = TabularBlock::new(["Name", "Age"]);
        let err = table.push_text_row(["Ann"]).unwrap_err();
        assert!(matches!(
            err,
            Error::RowWidth {
                expected: 2,
                actual: 1
            }
        ));
        assert_eq!(table.row_count(), 0);
    }
}
