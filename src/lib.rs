//! # xml2table
//!
//! Flatten arbitrary XML documents into rectangular tables.
//!
//! The pipeline has two stages after parsing: the [`Flattener`] walks the
//! element tree and emits one [`FlatRow`] per record combination, keyed by
//! dotted paths such as `book.author.name` or `book.@id`; [`normalize`] then
//! aligns those rows on the union of their keys, filling gaps with
//! [`Scalar::Null`]. The resulting [`Table`] can be written as a spreadsheet,
//! JSON or a text preview.
//!
//! ## Quick Start
//!
//! ```no_run
//! use xml2table::{convert_file, render, FlattenConfig};
//!
//! let table = convert_file("catalog.xml", &FlattenConfig::default())?;
//! println!("{} rows, {} columns", table.row_count(), table.column_count());
//!
//! render::write_xlsx(&table, "catalog.xlsx", &render::XlsxOptions::default())?;
//! # Ok::<(), xml2table::Error>(())
//! ```
//!
//! ## Repeating elements
//!
//! Siblings sharing a tag repeat: each occurrence becomes its own row.
//! Independent repeating groups under one parent are combined by Cartesian
//! product.
//!
//! ```
//! use xml2table::{convert_str, FlattenConfig};
//!
//! let xml = "<a><tag>x</tag><tag>y</tag><cat>p</cat><cat>q</cat></a>";
//! let table = convert_str(xml, &FlattenConfig::default())?;
//! assert_eq!(table.row_count(), 4);
//! assert_eq!(table.columns(), ["a.tag", "a.cat"]);
//! # Ok::<(), xml2table::Error>(())
//! ```
//!
//! ## Features
//!
//! - `xlsx` (default): spreadsheet sink
//! - `async`: async file entry point with Tokio

pub mod config;
pub mod error;
pub mod flatten;
pub mod model;
pub mod normalize;
pub mod parser;
pub mod render;
pub mod source;

// Re-exports
pub use config::{FlattenConfig, RecordMode};
pub use error::{Error, Result};
pub use flatten::Flattener;
pub use model::{ChildGroup, FlatRow, Record, Scalar, Table, XmlNode};
pub use normalize::{collect_columns, normalize};

use log::{debug, warn};
use std::path::Path;

/// Parse and flatten an XML string without normalizing.
pub fn flatten_str(xml: &str, config: &FlattenConfig) -> Result<Vec<FlatRow>> {
    let root = parser::parse_str(xml, config)?;
    Ok(Flattener::new(config.clone()).flatten(&root))
}

/// Convert an XML string to a table.
///
/// # Example
///
/// ```
/// use xml2table::{convert_str, FlattenConfig, Scalar};
///
/// let table = convert_str(r#"<a x="1"><b>t</b><c>u</c></a>"#, &FlattenConfig::default())?;
/// assert_eq!(table.columns(), ["a.@x", "a.b", "a.c"]);
/// assert_eq!(table.get(0, "a.@x"), Some(&Scalar::Int(1)));
/// # Ok::<(), xml2table::Error>(())
/// ```
pub fn convert_str(xml: &str, config: &FlattenConfig) -> Result<Table> {
    let rows = flatten_str(xml, config)?;
    if rows.is_empty() {
        warn!("no data found in XML document");
    }
    Ok(normalize(rows))
}

/// Convert raw XML bytes to a table, detecting the text encoding.
pub fn convert_bytes(data: &[u8], config: &FlattenConfig) -> Result<Table> {
    let xml = source::decode_xml_bytes(data)?;
    convert_str(&xml, config)
}

/// Convert an XML file to a table.
///
/// # Example
///
/// ```no_run
/// use xml2table::{convert_file, FlattenConfig};
///
/// let table = convert_file("data.xml", &FlattenConfig::default())?;
/// for record in table.records() {
///     println!("{:?}", record.values());
/// }
/// # Ok::<(), xml2table::Error>(())
/// ```
pub fn convert_file(path: impl AsRef<Path>, config: &FlattenConfig) -> Result<Table> {
    let path = path.as_ref();
    debug!("converting {}", path.display());
    let xml = source::read_file(path)?;
    convert_str(&xml, config)
}

/// Convert an XML file and write the table to an `.xlsx` file.
///
/// The input is fully converted before the output file is created, so a
/// parse failure leaves no output behind.
#[cfg(feature = "xlsx")]
pub fn convert_file_to_xlsx(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    config: &FlattenConfig,
) -> Result<Table> {
    let table = convert_file(input, config)?;
    render::write_xlsx(&table, output, &render::XlsxOptions::default())?;
    Ok(table)
}

/// Convert an XML file to a table, reading it asynchronously.
///
/// Only the read is asynchronous; parsing and flattening run inline.
#[cfg(feature = "async")]
pub async fn convert_file_async(
    path: impl AsRef<Path>,
    config: &FlattenConfig,
) -> Result<Table> {
    let data = tokio::fs::read(path.as_ref()).await?;
    convert_bytes(&data, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_str_scenario() {
        let table = convert_str("<a><b>1</b><b>2</b></a>", &FlattenConfig::default()).unwrap();
        assert_eq!(table.columns(), ["a.b"]);
        assert_eq!(table.get(0, "a.b"), Some(&Scalar::Int(1)));
        assert_eq!(table.get(1, "a.b"), Some(&Scalar::Int(2)));
    }

    #[test]
    fn test_convert_bytes_with_bom() {
        let mut data = vec![0xEF, 0xBB, 0xBF];
        data.extend_from_slice(b"<r><v>true</v></r>");
        let table = convert_bytes(&data, &FlattenConfig::default()).unwrap();
        assert_eq!(table.get(0, "r.v"), Some(&Scalar::Bool(true)));
    }

    #[test]
    fn test_convert_str_malformed() {
        let err = convert_str("<a><b></a>", &FlattenConfig::default()).unwrap_err();
        assert!(err.is_parse_error());
    }

    #[test]
    fn test_flatten_str_keeps_empty_occurrences() {
        let config = FlattenConfig::default();
        let rows = flatten_str("<a><b>1</b><b/><b>3</b></a>", &config).unwrap();
        assert_eq!(rows.len(), 3);
        assert!(rows[1].is_empty());

        let rows = flatten_str(r#"<a id="k"><b>1</b><b/><b>3</b></a>"#, &config).unwrap();
        assert_eq!(rows.len(), 3);
    }

    #[test]
    fn test_empty_occurrence_normalizes_to_nulls() {
        let table = convert_str("<a><b>1</b><b/><b>3</b></a>", &FlattenConfig::default()).unwrap();
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.get(1, "a.b"), Some(&Scalar::Null));
        assert_eq!(table.get(2, "a.b"), Some(&Scalar::Int(3)));
    }
}
