//! Output sinks and renderers for tables.
//!
//! A [`TableSink`] consumes the ordered column names and the ordered,
//! normalized rows of a [`Table`]. Sinks are only opened after the whole
//! document has been converted, so a failed conversion never leaves a
//! half-written output behind.
//!
//! # Example
//!
//! ```no_run
//! use xml2table::{convert_file, render::*, FlattenConfig};
//!
//! let table = convert_file("catalog.xml", &FlattenConfig::default())?;
//!
//! // Spreadsheet
//! write_xlsx(&table, "catalog.xlsx", &XlsxOptions::default())?;
//!
//! // JSON
//! let json = to_json(&table, JsonFormat::Pretty)?;
//!
//! // Plain-text preview
//! println!("{}", to_text(&table, &TextOptions::default()));
//! # Ok::<(), xml2table::Error>(())
//! ```

mod json;
mod options;
mod text;
#[cfg(feature = "xlsx")]
mod xlsx;

pub use json::{to_json, JsonFormat, JsonSink};
pub use options::{TextOptions, XlsxOptions};
pub use text::to_text;
#[cfg(feature = "xlsx")]
pub use xlsx::{column_name, write_xlsx, XlsxSink, MAX_SHEET_COLUMNS, MAX_SHEET_ROWS};

use crate::error::Result;
use crate::model::Table;

/// A destination for a normalized table.
pub trait TableSink {
    /// Consume one table.
    fn write_table(&mut self, table: &Table) -> Result<()>;
}
