//! XLSX spreadsheet writer.
//!
//! Produces a minimal SpreadsheetML package: one worksheet per table with a
//! header row of column names, inline strings, typed numeric and boolean
//! cells, and no cell at all for nulls.

use crate::error::{Error, Result};
use crate::model::{Scalar, Table};
use log::debug;
use quick_xml::escape::escape;
use std::fs::{self, File};
use std::io::{BufWriter, Seek, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::options::XlsxOptions;
use super::TableSink;

const SPREADSHEET_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const RELATIONSHIP_NS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const PACKAGE_RELATIONSHIP_NS: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships";

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

const STYLES_XML: &str = r#"<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><fonts count="2"><font><sz val="11"/><name val="Calibri"/></font><font><b/><sz val="11"/><name val="Calibri"/></font></fonts><fills count="2"><fill><patternFill patternType="none"/></fill><fill><patternFill patternType="gray125"/></fill></fills><borders count="1"><border><left/><right/><top/><bottom/><diagonal/></border></borders><cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs><cellXfs count="2"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/><xf numFmtId="0" fontId="1" fillId="0" borderId="0" xfId="0" applyFont="1"/></cellXfs><cellStyles count="1"><cellStyle name="Normal" xfId="0" builtinId="0"/></cellStyles></styleSheet>"#;

/// Excel's limit on worksheet name length.
const MAX_SHEET_NAME_LEN: usize = 31;

/// Rows per worksheet Excel can open, header row included.
pub const MAX_SHEET_ROWS: usize = 1_048_576;

/// Columns per worksheet Excel can open (`XFD`).
pub const MAX_SHEET_COLUMNS: usize = 16_384;

/// Writes tables as worksheets of one XLSX workbook.
///
/// Each [`TableSink::write_table`] call adds a worksheet; the package is
/// completed by [`XlsxSink::finish`].
pub struct XlsxSink<W: Write + Seek> {
    zip: ZipWriter<W>,
    options: XlsxOptions,
    sheet_names: Vec<String>,
}

impl<W: Write + Seek> XlsxSink<W> {
    /// Create a sink over a seekable writer.
    pub fn new(writer: W, options: XlsxOptions) -> Self {
        Self {
            zip: ZipWriter::new(writer),
            options,
            sheet_names: Vec::new(),
        }
    }

    /// Add a worksheet with an explicit name.
    ///
    /// Fails with [`Error::Render`] before writing anything when the table
    /// does not fit in a worksheet.
    pub fn add_sheet(&mut self, name: &str, table: &Table) -> Result<()> {
        check_sheet_size(table.row_count(), table.column_count())?;

        let index = self.sheet_names.len() + 1;
        let name = self.unique_sheet_name(name, index);

        self.zip.start_file(
            format!("xl/worksheets/sheet{}.xml", index),
            file_options(),
        )?;
        self.zip
            .write_all(worksheet_xml(table, &self.options).as_bytes())?;

        debug!(
            "wrote worksheet '{}' ({} rows, {} columns)",
            name,
            table.row_count(),
            table.column_count()
        );
        self.sheet_names.push(name);
        Ok(())
    }

    /// Write the workbook parts and return the underlying writer.
    ///
    /// A workbook needs at least one sheet, so an empty one is added when
    /// no table was written.
    pub fn finish(mut self) -> Result<W> {
        if self.sheet_names.is_empty() {
            let name = self.options.sheet_name.clone();
            self.add_sheet(&name, &Table::new())?;
        }

        let count = self.sheet_names.len();
        let parts = [
            ("[Content_Types].xml", content_types_xml(count)),
            ("_rels/.rels", package_rels_xml()),
            ("xl/workbook.xml", workbook_xml(&self.sheet_names)),
            ("xl/_rels/workbook.xml.rels", workbook_rels_xml(count)),
            ("xl/styles.xml", format!("{}{}", XML_DECLARATION, STYLES_XML)),
        ];

        for (path, content) in parts {
            self.zip.start_file(path, file_options())?;
            self.zip.write_all(content.as_bytes())?;
        }

        Ok(self.zip.finish()?)
    }

    fn unique_sheet_name(&self, requested: &str, index: usize) -> String {
        let mut name = sanitize_sheet_name(requested);
        if name.is_empty() {
            name = format!("Sheet{}", index);
        }
        if self.sheet_names.iter().any(|n| n.eq_ignore_ascii_case(&name)) {
            let suffix = format!(" ({})", index);
            let keep = MAX_SHEET_NAME_LEN.saturating_sub(suffix.chars().count());
            name = name.chars().take(keep).collect::<String>() + &suffix;
        }
        name
    }
}

impl<W: Write + Seek> TableSink for XlsxSink<W> {
    fn write_table(&mut self, table: &Table) -> Result<()> {
        let name = if self.sheet_names.is_empty() {
            self.options.sheet_name.clone()
        } else {
            format!("Sheet{}", self.sheet_names.len() + 1)
        };
        self.add_sheet(&name, table)
    }
}

/// Write a table to an `.xlsx` file.
///
/// A table too large for a worksheet is rejected before the file is
/// created. On any later failure the partially written file is removed.
pub fn write_xlsx(table: &Table, path: impl AsRef<Path>, options: &XlsxOptions) -> Result<()> {
    check_sheet_size(table.row_count(), table.column_count())?;

    let path = path.as_ref();
    let file = File::create(path)?;

    let result = write_workbook(BufWriter::new(file), table, options);

    if result.is_err() {
        let _ = fs::remove_file(path);
    }
    result
}

fn write_workbook<W: Write + Seek>(writer: W, table: &Table, options: &XlsxOptions) -> Result<()> {
    let mut sink = XlsxSink::new(writer, options.clone());
    sink.write_table(table)?;
    let mut writer = sink.finish()?;
    writer.flush()?;
    Ok(())
}

fn file_options() -> SimpleFileOptions {
    SimpleFileOptions::default().compression_method(CompressionMethod::Deflated)
}

/// Spreadsheet column letters for a zero-based index (`0` → `A`, `26` → `AA`).
pub fn column_name(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    letters.reverse();
    String::from_utf8_lossy(&letters).into_owned()
}

/// Reject tables larger than a worksheet; the header takes one row.
fn check_sheet_size(rows: usize, columns: usize) -> Result<()> {
    if columns > MAX_SHEET_COLUMNS {
        return Err(Error::Render(format!(
            "{} columns exceed the worksheet limit of {}",
            columns, MAX_SHEET_COLUMNS
        )));
    }
    if rows.saturating_add(1) > MAX_SHEET_ROWS {
        return Err(Error::Render(format!(
            "{} rows plus header exceed the worksheet limit of {}",
            rows, MAX_SHEET_ROWS
        )));
    }
    Ok(())
}

fn worksheet_xml(table: &Table, options: &XlsxOptions) -> String {
    let mut xml = String::with_capacity(256 + table.row_count() * table.column_count() * 24);
    xml.push_str(XML_DECLARATION);
    xml.push_str(&format!(r#"<worksheet xmlns="{}">"#, SPREADSHEET_NS));

    if options.freeze_header && table.column_count() > 0 {
        xml.push_str(r#"<sheetViews><sheetView workbookViewId="0"><pane ySplit="1" topLeftCell="A2" activePane="bottomLeft" state="frozen"/></sheetView></sheetViews>"#);
    }

    xml.push_str("<sheetData>");

    if table.column_count() > 0 {
        let style = if options.bold_header { r#" s="1""# } else { "" };
        xml.push_str(r#"<row r="1">"#);
        for (col, name) in table.columns().iter().enumerate() {
            xml.push_str(&format!(
                r#"<c r="{}1" t="inlineStr"{}><is>{}</is></c>"#,
                column_name(col),
                style,
                text_element(name)
            ));
        }
        xml.push_str("</row>");
    }

    for (i, row) in table.rows().iter().enumerate() {
        let r = i + 2;
        xml.push_str(&format!(r#"<row r="{}">"#, r));
        for (col, value) in row.iter().enumerate() {
            let cell_ref = format!("{}{}", column_name(col), r);
            match value {
                Scalar::Null => {}
                Scalar::Bool(b) => xml.push_str(&format!(
                    r#"<c r="{}" t="b"><v>{}</v></c>"#,
                    cell_ref,
                    u8::from(*b)
                )),
                Scalar::Int(n) => {
                    xml.push_str(&format!(r#"<c r="{}"><v>{}</v></c>"#, cell_ref, n))
                }
                Scalar::Float(f) => xml.push_str(&format!(
                    r#"<c r="{}"><v>{}</v></c>"#,
                    cell_ref,
                    format_float(*f)
                )),
                Scalar::String(s) => xml.push_str(&format!(
                    r#"<c r="{}" t="inlineStr"><is>{}</is></c>"#,
                    cell_ref,
                    text_element(s)
                )),
            }
        }
        xml.push_str("</row>");
    }

    xml.push_str("</sheetData></worksheet>");
    xml
}

/// `<t>` element with escaped text; control characters XML 1.0 forbids
/// are dropped.
fn text_element(text: &str) -> String {
    let cleaned: String = text
        .chars()
        .filter(|c| !c.is_control() || matches!(c, '\t' | '\n' | '\r'))
        .collect();
    let preserve = cleaned.starts_with(char::is_whitespace) || cleaned.ends_with(char::is_whitespace);
    if preserve {
        format!(r#"<t xml:space="preserve">{}</t>"#, escape(cleaned.as_str()))
    } else {
        format!("<t>{}</t>", escape(cleaned.as_str()))
    }
}

fn format_float(f: f64) -> String {
    let magnitude = f.abs();
    if magnitude != 0.0 && !(1e-5..1e15).contains(&magnitude) {
        format!("{:e}", f)
    } else {
        format!("{}", f)
    }
}

fn sanitize_sheet_name(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '[' | ']' | ':' | '*' | '?' | '/' | '\\'))
        .take(MAX_SHEET_NAME_LEN)
        .collect::<String>()
        .trim_matches('\'')
        .to_string()
}

fn content_types_xml(sheet_count: usize) -> String {
    let mut xml = String::from(XML_DECLARATION);
    xml.push_str(r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#);
    xml.push_str(r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#);
    xml.push_str(r#"<Default Extension="xml" ContentType="application/xml"/>"#);
    xml.push_str(r#"<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>"#);
    for i in 1..=sheet_count {
        xml.push_str(&format!(
            r#"<Override PartName="/xl/worksheets/sheet{}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#,
            i
        ));
    }
    xml.push_str(r#"<Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>"#);
    xml.push_str("</Types>");
    xml
}

fn package_rels_xml() -> String {
    format!(
        r#"{}<Relationships xmlns="{}"><Relationship Id="rId1" Type="{}/officeDocument" Target="xl/workbook.xml"/></Relationships>"#,
        XML_DECLARATION, PACKAGE_RELATIONSHIP_NS, RELATIONSHIP_NS
    )
}

fn workbook_xml(sheet_names: &[String]) -> String {
    let mut xml = String::from(XML_DECLARATION);
    xml.push_str(&format!(
        r#"<workbook xmlns="{}" xmlns:r="{}"><sheets>"#,
        SPREADSHEET_NS, RELATIONSHIP_NS
    ));
    for (i, name) in sheet_names.iter().enumerate() {
        xml.push_str(&format!(
            r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
            escape(name.as_str()),
            i + 1,
            i + 1
        ));
    }
    xml.push_str("</sheets></workbook>");
    xml
}

fn workbook_rels_xml(sheet_count: usize) -> String {
    let mut xml = String::from(XML_DECLARATION);
    xml.push_str(&format!(r#"<Relationships xmlns="{}">"#, PACKAGE_RELATIONSHIP_NS));
    for i in 1..=sheet_count {
        xml.push_str(&format!(
            r#"<Relationship Id="rId{}" Type="{}/worksheet" Target="worksheets/sheet{}.xml"/>"#,
            i, RELATIONSHIP_NS, i
        ));
    }
    xml.push_str(&format!(
        r#"<Relationship Id="rId{}" Type="{}/styles" Target="styles.xml"/>"#,
        sheet_count + 1,
        RELATIONSHIP_NS
    ));
    xml.push_str("</Relationships>");
    xml
}
