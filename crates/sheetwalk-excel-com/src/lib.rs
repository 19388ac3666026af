//! Native Linux client library for Excel COM automation via a WINE bridge process.
//!
//! This crate spawns a Windows `.exe` under WINE that automates Excel through COM,
//! communicating over JSON-over-stdio. [`ExcelDocument`] exposes one open
//! workbook as a [`sheetwalk_core::SpreadsheetEngine`].
//!
//! # Architecture
//!
//! ```text
//! SheetAccessor (sheetwalk)
//!     └── ExcelDocument (this crate)
//!           └── ExcelBridge
//!                 └── spawns: wine excel-com-bridge.exe
//!                       └── COM: Excel.Application
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use sheetwalk_core::SpreadsheetEngine;
//! use sheetwalk_excel_com::{ExcelBridge, ExcelBridgeConfig, ExcelDocument};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let bridge = ExcelBridge::start(ExcelBridgeConfig::from_env())?;
//!     let mut doc = ExcelDocument::open(bridge, "report.xls".as_ref(), None)?;
//!     println!("{:?}", doc.worksheet_names()?);
//!     doc.close()?;
//!     Ok(())
//! }
//! ```

mod bridge;
mod document;

pub use bridge::{linux_to_wine_path, BridgeError, ExcelBridge, ExcelBridgeConfig, Result};
pub use document::ExcelDocument;
