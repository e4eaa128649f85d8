//! JSON renderer implementation.

use crate::error::Result;
use crate::model::Table;
use std::io::Write;

use super::TableSink;

/// JSON output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JsonFormat {
    /// Compact single-line JSON
    Compact,
    /// Pretty-printed with 2-space indentation
    #[default]
    Pretty,
}

/// Convert a table to a JSON array of objects, keys in column order.
pub fn to_json(table: &Table, format: JsonFormat) -> Result<String> {
    let json = match format {
        JsonFormat::Compact => serde_json::to_string(table)?,
        JsonFormat::Pretty => serde_json::to_string_pretty(table)?,
    };
    Ok(json)
}

/// Writes each table as one JSON document followed by a newline.
pub struct JsonSink<W: Write> {
    writer: W,
    format: JsonFormat,
}

impl<W: Write> JsonSink<W> {
    /// Create a sink over a writer.
    pub fn new(writer: W, format: JsonFormat) -> Self {
        Self { writer, format }
    }

    /// Flush and return the underlying writer.
    pub fn into_inner(mut self) -> Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

impl<W: Write> TableSink for JsonSink<W> {
    fn write_table(&mut self, table: &Table) -> Result<()> {
        match self.format {
            JsonFormat::Compact => serde_json::to_writer(&mut self.writer, table)?,
            JsonFormat::Pretty => serde_json::to_writer_pretty(&mut self.writer, table)?,
        }
        writeln!(self.writer)?;
        Ok(())
    }
}
