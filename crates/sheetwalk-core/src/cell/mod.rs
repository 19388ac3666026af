//! Cell-related types and utilities
//!
//! This module contains:
//! - the address codec ([`column_letters`], [`letters_to_column`], [`build_address`])
//! - [`Coordinate`] - a cell's 1-based location
//! - [`CellRange`] - a rectangular block of cells (e.g., "A1:B10")
//! - [`CellValue`] - a value written into a cell
//! - [`GridValue`] - a value as the engine holds it

mod address;
mod value;

pub use address::{build_address, column_letters, letters_to_column, CellRange, Coordinate};
pub use value::{CellValue, Grid, GridValue};
