//! Aligning flat rows into a rectangular table.

use crate::model::{FlatRow, Scalar, Table};
use log::debug;
use std::collections::{HashMap, HashSet};

/// Union of all row keys, in the order each key is first seen.
pub fn collect_columns(rows: &[FlatRow]) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut columns = Vec::new();

    for row in rows {
        for key in row.keys() {
            if seen.insert(key) {
                columns.push(key.to_string());
            }
        }
    }

    columns
}

/// Rewrite every row to cover the full column set, filling gaps with
/// [`Scalar::Null`].
///
/// Rows keep their order. Zero input rows give an empty table with zero
/// columns. Normalizing a table's own rows again yields the same table.
///
/// # Example
///
/// ```
/// use xml2table::{normalize, FlatRow, Scalar};
///
/// let mut first = FlatRow::new();
/// first.insert("a.b", Scalar::Int(1));
/// let mut second = FlatRow::new();
/// second.insert("a.c", Scalar::from("x"));
///
/// let table = normalize(vec![first, second]);
/// assert_eq!(table.columns(), ["a.b", "a.c"]);
/// assert_eq!(table.get(0, "a.c"), Some(&Scalar::Null));
/// ```
pub fn normalize(rows: Vec<FlatRow>) -> Table {
    let columns = collect_columns(&rows);
    let index: HashMap<&str, usize> = columns
        .iter()
        .enumerate()
        .map(|(i, c)| (c.as_str(), i))
        .collect();

    let aligned: Vec<Vec<Scalar>> = rows
        .into_iter()
        .map(|row| {
            let mut values = vec![Scalar::Null; columns.len()];
            for (key, value) in row {
                if let Some(&i) = index.get(key.as_str()) {
                    values[i] = value;
                }
            }
            values
        })
        .collect();

    debug!(
        "normalized {} rows into {} columns",
        aligned.len(),
        columns.len()
    );
    Table::from_parts(columns, aligned)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(entries: &[(&str, Scalar)]) -> FlatRow {
        entries.iter().map(|(k, v)| (*k, v.clone())).collect()
    }

    #[test]
    fn test_collect_columns_first_seen() {
        let rows = vec![
            row(&[("b", Scalar::Int(1)), ("a", Scalar::Int(2))]),
            row(&[("c", Scalar::Int(3)), ("a", Scalar::Int(4))]),
        ];
        assert_eq!(collect_columns(&rows), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_missing_fields_are_null() {
        let table = normalize(vec![
            row(&[("name", Scalar::from("x")), ("email", Scalar::from("e"))]),
            row(&[("name", Scalar::from("y"))]),
        ]);

        assert_eq!(table.row_count(), 2);
        assert_eq!(table.get(1, "email"), Some(&Scalar::Null));
        assert!(table.rows().iter().all(|r| r.len() == table.column_count()));
    }

    #[test]
    fn test_empty_input() {
        let table = normalize(Vec::new());
        assert_eq!(table.row_count(), 0);
        assert_eq!(table.column_count(), 0);
    }

    #[test]
    fn test_idempotent() {
        let table = normalize(vec![
            row(&[("a", Scalar::Int(1))]),
            row(&[("b", Scalar::Bool(true))]),
            row(&[("a", Scalar::Float(2.5)), ("c", Scalar::Null)]),
        ]);

        let again = normalize(table.to_flat_rows());
        assert_eq!(again, table);
    }

    #[test]
    fn test_explicit_null_is_kept_as_column() {
        let table = normalize(vec![row(&[("a", Scalar::Null)])]);
        assert_eq!(table.columns(), ["a"]);
        assert_eq!(table.get(0, "a"), Some(&Scalar::Null));
    }
}
