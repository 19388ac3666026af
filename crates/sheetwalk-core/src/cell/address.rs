//! Column letters, coordinates and A1-style address strings
//!
//! Everything here is 1-based on both axes, the way a spreadsheet application
//! numbers its rows and columns. Address strings are never stored; they are
//! rebuilt from coordinates whenever an engine needs one.

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Convert a 1-based column index to letters (1 = A, 26 = Z, 27 = AA, etc.)
///
/// Index 0 is treated as 1 and yields `"A"`. Callers use 0 to mean "no
/// column given", so the codec clamps instead of rejecting it.
///
/// # Examples
/// ```
/// use sheetwalk_core::column_letters;
///
/// assert_eq!(column_letters(1), "A");
/// assert_eq!(column_letters(27), "AA");
/// assert_eq!(column_letters(0), "A");
/// ```
pub fn column_letters(index: u32) -> String {
    let mut result = String::new();
    let mut n = index.max(1);

    while n > 0 {
        let rem = (n - 1) % 26;
        result.insert(0, (b'A' + rem as u8) as char);
        n = (n - rem) / 26;
    }

    result
}

/// Convert column letters to a 1-based index (A = 1, Z = 26, AA = 27, etc.)
///
/// Letters are case-insensitive.
pub fn letters_to_column(letters: &str) -> Result<u32> {
    if letters.is_empty() {
        return Err(Error::InvalidAddress("empty column letters".into()));
    }

    let mut col: u32 = 0;
    for c in letters.chars() {
        if !c.is_ascii_alphabetic() {
            return Err(Error::InvalidAddress(format!(
                "invalid column letter '{}'",
                c
            )));
        }
        let digit = c.to_ascii_uppercase() as u32 - 'A' as u32 + 1;
        col = col
            .checked_mul(26)
            .and_then(|v| v.checked_add(digit))
            .ok_or_else(|| Error::InvalidAddress(format!("column '{}' is too large", letters)))?;
    }

    Ok(col)
}

/// Build an A1-style address for a cell or a rectangle.
///
/// Returns `B3` for `(3, 2, 0, 0)` and `B3:D5` for `(3, 2, 5, 4)`. The end
/// corner is only used when both `end_row` and `end_col` are non-zero. No
/// bounds checking is done against any sheet.
pub fn build_address(row: u32, col: u32, end_row: u32, end_col: u32) -> String {
    let start = format!("{}{}", column_letters(col), row);
    if end_row > 0 && end_col > 0 {
        format!("{}:{}{}", start, column_letters(end_col), end_row)
    } else {
        start
    }
}

/// A 1-based (row, column) cell position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coordinate {
    /// Row number, starting at 1
    pub row: u32,
    /// Column number, starting at 1 (A)
    pub col: u32,
}

impl Coordinate {
    /// The top-left cell, A1
    pub const ORIGIN: Coordinate = Coordinate { row: 1, col: 1 };

    /// Create a new coordinate
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// Parse a cell address from A1-style notation
    ///
    /// `$` markers are accepted and ignored.
    ///
    /// # Examples
    /// ```
    /// use sheetwalk_core::Coordinate;
    ///
    /// let addr = Coordinate::parse("$B$3").unwrap();
    /// assert_eq!(addr, Coordinate::new(3, 2));
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::InvalidAddress("empty address".into()));
        }

        let bytes = s.as_bytes();
        let mut pos = 0;

        if bytes.get(pos) == Some(&b'$') {
            pos += 1;
        }

        let col_start = pos;
        while pos < bytes.len() && bytes[pos].is_ascii_alphabetic() {
            pos += 1;
        }

        if pos == col_start {
            return Err(Error::InvalidAddress(format!(
                "no column letters in '{}'",
                s
            )));
        }

        let col = letters_to_column(&s[col_start..pos])?;

        if bytes.get(pos) == Some(&b'$') {
            pos += 1;
        }

        let row_str = &s[pos..];
        if row_str.is_empty() {
            return Err(Error::InvalidAddress(format!("no row number in '{}'", s)));
        }

        let row: u32 = row_str
            .parse()
            .map_err(|_| Error::InvalidAddress(format!("invalid row number in '{}'", s)))?;

        if row == 0 {
            return Err(Error::InvalidAddress(format!(
                "row number must be >= 1 in '{}'",
                s
            )));
        }

        Ok(Self { row, col })
    }

    /// Format as A1-style string
    pub fn to_a1_string(&self) -> String {
        build_address(self.row, self.col, 0, 0)
    }
}

impl Default for Coordinate {
    fn default() -> Self {
        Self::ORIGIN
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1_string())
    }
}

impl FromStr for Coordinate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// A contiguous rectangle of cells (e.g., "A1:B10")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellRange {
    /// Start address (top-left)
    pub start: Coordinate,
    /// End address (bottom-right)
    pub end: Coordinate,
}

impl CellRange {
    /// Create a new cell range
    pub fn new(start: Coordinate, end: Coordinate) -> Self {
        // Normalize so start is top-left and end is bottom-right
        Self {
            start: Coordinate::new(start.row.min(end.row), start.col.min(end.col)),
            end: Coordinate::new(start.row.max(end.row), start.col.max(end.col)),
        }
    }

    /// Create a single-cell range
    pub fn single(addr: Coordinate) -> Self {
        Self {
            start: addr,
            end: addr,
        }
    }

    /// Parse a range from A1:B10 notation, or a single A1 cell
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();

        match s.split_once(':') {
            Some((start, end)) => {
                let start = Coordinate::parse(start)
                    .map_err(|e| Error::InvalidRange(format!("{s}: {e}")))?;
                let end = Coordinate::parse(end)
                    .map_err(|e| Error::InvalidRange(format!("{s}: {e}")))?;
                Ok(Self::new(start, end))
            }
            None => Ok(Self::single(Coordinate::parse(s)?)),
        }
    }

    /// Check if a cell is within this range
    pub fn contains(&self, addr: &Coordinate) -> bool {
        addr.row >= self.start.row
            && addr.row <= self.end.row
            && addr.col >= self.start.col
            && addr.col <= self.end.col
    }

    /// Check if this range overlaps with another
    pub fn overlaps(&self, other: &CellRange) -> bool {
        self.start.row <= other.end.row
            && self.end.row >= other.start.row
            && self.start.col <= other.end.col
            && self.end.col >= other.start.col
    }

    /// Get the number of rows in the range
    pub fn row_count(&self) -> u32 {
        self.end.row - self.start.row + 1
    }

    /// Get the number of columns in the range
    pub fn col_count(&self) -> u32 {
        self.end.col - self.start.col + 1
    }

    /// Format as A1:B10 string
    pub fn to_a1_string(&self) -> String {
        if self.start == self.end {
            self.start.to_a1_string()
        } else {
            build_address(self.start.row, self.start.col, self.end.row, self.end.col)
        }
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1_string())
    }
}

impl FromStr for CellRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_column_letters() {
        assert_eq!(column_letters(1), "A");
        assert_eq!(column_letters(2), "B");
        assert_eq!(column_letters(26), "Z");
        assert_eq!(column_letters(27), "AA");
        assert_eq!(column_letters(28), "AB");
        assert_eq!(column_letters(52), "AZ");
        assert_eq!(column_letters(702), "ZZ");
        assert_eq!(column_letters(703), "AAA");
        assert_eq!(column_letters(16384), "XFD");
    }

    #[test]
    fn test_column_letters_clamps_zero() {
        assert_eq!(column_letters(0), column_letters(1));
        assert_eq!(column_letters(0), "A");
    }

    #[test]
    fn test_letters_to_column() {
        assert_eq!(letters_to_column("A").unwrap(), 1);
        assert_eq!(letters_to_column("Z").unwrap(), 26);
        assert_eq!(letters_to_column("AA").unwrap(), 27);
        assert_eq!(letters_to_column("ZZ").unwrap(), 702);
        assert_eq!(letters_to_column("XFD").unwrap(), 16384);

        // Case insensitive
        assert_eq!(letters_to_column("xfd").unwrap(), 16384);
    }

    #[test]
    fn test_letters_to_column_errors() {
        assert!(letters_to_column("").is_err());
        assert!(letters_to_column("A1").is_err());
        assert!(letters_to_column("ZZZZZZZZZZ").is_err()); // overflows u32
    }

    #[test]
    fn test_build_address() {
        assert_eq!(build_address(3, 2, 0, 0), "B3");
        assert_eq!(build_address(3, 2, 5, 4), "B3:D5");
        assert_eq!(build_address(1, 0, 0, 0), "A1");
        // Half an end corner is ignored
        assert_eq!(build_address(3, 2, 5, 0), "B3");
        assert_eq!(build_address(3, 2, 0, 4), "B3");
    }

    #[test]
    fn test_coordinate_parse() {
        assert_eq!(Coordinate::parse("A1").unwrap(), Coordinate::ORIGIN);
        assert_eq!(Coordinate::parse("c100").unwrap(), Coordinate::new(100, 3));
        assert_eq!(Coordinate::parse("$AA$7").unwrap(), Coordinate::new(7, 27));
        assert_eq!(Coordinate::new(100, 3).to_string(), "C100");
    }

    #[test]
    fn test_coordinate_parse_errors() {
        assert!(Coordinate::parse("").is_err());
        assert!(Coordinate::parse("A").is_err());
        assert!(Coordinate::parse("1").is_err());
        assert!(Coordinate::parse("A0").is_err());
        assert!(Coordinate::parse("A1B").is_err());
    }

    #[test]
    fn test_cell_range_parse() {
        let range = CellRange::parse("B3:D5").unwrap();
        assert_eq!(range.start, Coordinate::new(3, 2));
        assert_eq!(range.end, Coordinate::new(5, 4));
        assert_eq!(range.row_count(), 3);
        assert_eq!(range.col_count(), 3);
        assert_eq!(range.to_string(), "B3:D5");

        // Reversed corners are normalized
        let range = CellRange::parse("D5:B3").unwrap();
        assert_eq!(range.start, Coordinate::new(3, 2));

        let range = CellRange::parse("C3").unwrap();
        assert_eq!(range.start, range.end);
        assert_eq!(range.to_string(), "C3");
    }

    #[test]
    fn test_cell_range_contains_and_overlaps() {
        let range = CellRange::parse("B2:D4").unwrap();
        assert!(range.contains(&Coordinate::new(2, 2)));
        assert!(range.contains(&Coordinate::new(4, 4)));
        assert!(!range.contains(&Coordinate::new(1, 1)));
        assert!(!range.contains(&Coordinate::new(5, 2)));

        assert!(range.overlaps(&CellRange::parse("D4:F6").unwrap()));
        assert!(!range.overlaps(&CellRange::parse("E1:F9").unwrap()));
    }

    proptest! {
        #[test]
        fn prop_letters_round_trip(n in 1u32..5_000_000) {
            prop_assert_eq!(letters_to_column(&column_letters(n)).unwrap(), n);
        }

        #[test]
        fn prop_letters_strictly_increasing(n in 1u32..5_000_000) {
            let a = column_letters(n);
            let b = column_letters(n + 1);
            prop_assert!((a.len(), &a) < (b.len(), &b));
        }
    }
}
