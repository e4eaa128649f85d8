//! Rectangular, column-aligned table.

use super::{FlatRow, Scalar};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

/// A normalized table.
///
/// Every row holds exactly one value per column, so rectangularity is
/// structural: missing fields are stored as [`Scalar::Null`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Scalar>>,
}

/// A borrowed view of one table row.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    columns: &'a [String],
    values: &'a [Scalar],
}

impl<'a> Record<'a> {
    /// Get the value of a column by name.
    pub fn get(&self, column: &str) -> Option<&'a Scalar> {
        self.columns
            .iter()
            .position(|c| c == column)
            .and_then(|i| self.values.get(i))
    }

    /// Values in column order.
    pub fn values(&self) -> &'a [Scalar] {
        self.values
    }

    /// `(column, value)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a Scalar)> + 'a {
        let columns = self.columns;
        let values = self.values;
        columns.iter().map(String::as_str).zip(values.iter())
    }
}

impl Serialize for Record<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (column, value) in self.iter() {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

impl Table {
    /// Create an empty table (no rows, no columns).
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from columns and aligned rows.
    ///
    /// Callers guarantee every row has `columns.len()` values.
    pub(crate) fn from_parts(columns: Vec<String>, rows: Vec<Vec<Scalar>>) -> Self {
        debug_assert!(rows.iter().all(|r| r.len() == columns.len()));
        Self { columns, rows }
    }

    /// Column names in first-seen order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Row values, each aligned to [`Table::columns`].
    pub fn rows(&self) -> &[Vec<Scalar>] {
        &self.rows
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Check if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by name.
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Get a single cell.
    pub fn get(&self, row: usize, column: &str) -> Option<&Scalar> {
        let col = self.column_index(column)?;
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Get one row as a record.
    pub fn record(&self, row: usize) -> Option<Record<'_>> {
        self.rows.get(row).map(|values| Record {
            columns: &self.columns,
            values,
        })
    }

    /// Iterate rows as records.
    pub fn records(&self) -> impl Iterator<Item = Record<'_>> {
        self.rows.iter().map(move |values| Record {
            columns: &self.columns,
            values,
        })
    }

    /// Convert back to flat rows that each cover every column.
    pub fn to_flat_rows(&self) -> Vec<FlatRow> {
        self.records()
            .map(|record| record.iter().map(|(c, v)| (c, v.clone())).collect())
            .collect()
    }

    /// Count of non-null values per column.
    pub fn filled_counts(&self) -> Vec<usize> {
        (0..self.columns.len())
            .map(|i| self.rows.iter().filter(|r| !r[i].is_null()).count())
            .collect()
    }
}

impl Serialize for Table {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;
        for record in self.records() {
            seq.serialize_element(&record)?;
        }
        seq.end()
    }
}
