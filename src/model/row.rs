//! Flat key-value rows produced by the flattener.

use super::Scalar;
use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// An insertion-ordered mapping from dotted path to scalar value.
///
/// Inserting a key that is already present replaces its value but keeps
/// the key at its original position. Equality ignores order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatRow {
    entries: IndexMap<String, Scalar>,
}

impl FlatRow {
    /// Create an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a value.
    pub fn insert(&mut self, key: impl Into<String>, value: Scalar) {
        self.entries.insert(key.into(), value);
    }

    /// Copy every entry of `other` into this row, replacing existing keys.
    pub fn merge(&mut self, other: &FlatRow) {
        self.entries.reserve(other.len());
        for (key, value) in &other.entries {
            match self.entries.get_mut(key.as_str()) {
                Some(existing) => *existing = value.clone(),
                None => {
                    self.entries.insert(key.clone(), value.clone());
                }
            }
        }
    }

    /// Get a value by path.
    pub fn get(&self, key: &str) -> Option<&Scalar> {
        self.entries.get(key)
    }

    /// Check whether a path is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Paths in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Scalar)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the row has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Scalar)> for FlatRow {
    fn from_iter<I: IntoIterator<Item = (K, Scalar)>>(iter: I) -> Self {
        let mut row = FlatRow::new();
        for (key, value) in iter {
            row.insert(key, value);
        }
        row
    }
}

impl IntoIterator for FlatRow {
    type Item = (String, Scalar);
    type IntoIter = indexmap::map::IntoIter<String, Scalar>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Serialize for FlatRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_keeps_position() {
        let mut row = FlatRow::new();
        row.insert("a", Scalar::Int(1));
        row.insert("b", Scalar::Int(2));
        row.insert("a", Scalar::Int(3));

        assert_eq!(row.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(row.get("a"), Some(&Scalar::Int(3)));
        assert_eq!(row.len(), 2);
    }

    #[test]
    fn test_merge_overrides() {
        let mut base: FlatRow = vec![("x", Scalar::from("base")), ("y", Scalar::Int(1))]
            .into_iter()
            .collect();
        let other: FlatRow = vec![("y", Scalar::Int(2)), ("z", Scalar::Null)]
            .into_iter()
            .collect();

        base.merge(&other);
        assert_eq!(base.keys().collect::<Vec<_>>(), vec!["x", "y", "z"]);
        assert_eq!(base.get("y"), Some(&Scalar::Int(2)));
        assert!(base.contains_key("z"));
    }

    #[test]
    fn test_wide_row_merge() {
        let wide: FlatRow = (0..20_000)
            .map(|i| (format!("r.c{}", i), Scalar::Int(i)))
            .collect();
        let mut row = FlatRow::new();
        row.insert("r.c0", Scalar::Null);
        row.merge(&wide);

        assert_eq!(row.len(), 20_000);
        assert_eq!(row.get("r.c0"), Some(&Scalar::Int(0)));
        assert_eq!(row.keys().last(), Some("r.c19999"));
    }

    #[test]
    fn test_serialize_in_order() {
        let row: FlatRow = vec![("b", Scalar::Int(1)), ("a", Scalar::Null)]
            .into_iter()
            .collect();
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"{"b":1,"a":null}"#);
    }
}
