//! Flattening an XML tree into flat rows.
//!
//! Every element contributes its own scalars (attributes and text) to each
//! row it takes part in. Children are grouped by tag name; the rows of each
//! group are combined with the rows of every other group by Cartesian
//! product, so two independent repeating groups of sizes `a` and `b` under
//! one parent yield `a × b` rows.

use crate::config::{FlattenConfig, RecordMode};
use crate::model::{FlatRow, Scalar, XmlNode};
use log::debug;

/// Turns [`XmlNode`] trees into ordered sequences of [`FlatRow`]s.
///
/// The flattener only holds its configuration, so one instance can be shared
/// freely and separate instances can use different settings side by side.
///
/// # Complexity
///
/// Row count is the product of the group variant counts at every level.
/// Documents with many independent repeating siblings can therefore produce
/// exponentially many rows; there is no upper bound on the output size.
///
/// # Example
///
/// ```
/// use xml2table::{parser::parse_str, FlattenConfig, Flattener, Scalar};
///
/// let config = FlattenConfig::default();
/// let root = parse_str("<a><b>1</b><b>2</b></a>", &config)?;
/// let rows = Flattener::new(config).flatten(&root);
///
/// assert_eq!(rows.len(), 2);
/// assert_eq!(rows[1].get("a.b"), Some(&Scalar::Int(2)));
/// # Ok::<(), xml2table::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Flattener {
    config: FlattenConfig,
}

impl Flattener {
    /// Create a flattener with the given configuration.
    pub fn new(config: FlattenConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    pub fn config(&self) -> &FlattenConfig {
        &self.config
    }

    /// Flatten a document root into rows.
    ///
    /// Every occurrence keeps its row, including rows that carry no entry.
    /// When no row carries any entry at all the document has no columns, and
    /// the result is empty.
    pub fn flatten(&self, root: &XmlNode) -> Vec<FlatRow> {
        let rows: Vec<FlatRow> = match self.config.record_mode {
            RecordMode::Root => self.flatten_element(root, ""),
            RecordMode::RepeatedChildren => match record_tag(root) {
                Some(tag) => {
                    debug!("using <{}> children of <{}> as records", tag, root.name);
                    root.children
                        .iter()
                        .filter(|child| child.name == tag)
                        .flat_map(|record| self.flatten_element(record, ""))
                        .collect()
                }
                None => self.flatten_element(root, ""),
            },
        };

        if rows.iter().all(FlatRow::is_empty) {
            debug!("<{}> holds no text or attributes", root.name);
            return Vec::new();
        }

        debug!("flattened <{}> into {} rows", root.name, rows.len());
        rows
    }

    /// Flatten one element whose parent sits at `parent_path`.
    ///
    /// Always returns at least one row.
    fn flatten_element(&self, node: &XmlNode, parent_path: &str) -> Vec<FlatRow> {
        let path = self.config.child_path(parent_path, &node.name);
        let base = self.own_scalars(node, &path);

        let groups = node.child_groups();
        if groups.is_empty() {
            return vec![base];
        }

        let variant_sets: Vec<Vec<FlatRow>> = groups
            .iter()
            .map(|group| {
                group
                    .members
                    .iter()
                    .flat_map(|member| self.flatten_element(member, &path))
                    .collect()
            })
            .collect();

        cartesian_product(variant_sets)
            .into_iter()
            .map(|combo| {
                let mut row = base.clone();
                row.merge(&combo);
                row
            })
            .collect()
    }

    /// Attribute and text entries of a single element.
    fn own_scalars(&self, node: &XmlNode, path: &str) -> FlatRow {
        let mut row = FlatRow::new();

        if self.config.include_attributes {
            for (name, value) in &node.attributes {
                row.insert(self.config.attribute_path(path, name), Scalar::coerce(value));
            }
        }

        if let Some(text) = &node.text {
            row.insert(path, Scalar::coerce(text));
        }

        row
    }
}

/// Most frequent child tag of `root`, ties going to the first seen.
fn record_tag(root: &XmlNode) -> Option<&str> {
    let mut best: Option<(&str, usize)> = None;
    for group in root.child_groups() {
        let count = group.members.len();
        if best.is_none_or(|(_, n)| count > n) {
            best = Some((group.name, count));
        }
    }
    best.map(|(name, _)| name)
}

/// Every combination picking one row from each set, merged left to right.
fn cartesian_product(sets: Vec<Vec<FlatRow>>) -> Vec<FlatRow> {
    let mut combined = vec![FlatRow::new()];

    for set in sets {
        let mut next = Vec::with_capacity(combined.len() * set.len());
        for existing in &combined {
            for variant in &set {
                let mut row = existing.clone();
                row.merge(variant);
                next.push(row);
            }
        }
        combined = next;
    }

    combined
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flatten(node: &XmlNode) -> Vec<FlatRow> {
        Flattener::default().flatten(node)
    }

    #[test]
    fn test_leaf_text() {
        let rows = flatten(&XmlNode::new("a").with_text("hello"));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("a"), Some(&Scalar::from("hello")));
    }

    #[test]
    fn test_repeating_group_one_row_each() {
        let node = XmlNode::new("a")
            .with_child(XmlNode::new("b").with_text("1"))
            .with_child(XmlNode::new("b").with_text("2"));

        let rows = flatten(&node);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("a.b"), Some(&Scalar::Int(1)));
        assert_eq!(rows[1].get("a.b"), Some(&Scalar::Int(2)));
    }

    #[test]
    fn test_attributes_and_siblings_merge() {
        let node = XmlNode::new("a")
            .with_attribute("x", "1")
            .with_child(XmlNode::new("b").with_text("t"))
            .with_child(XmlNode::new("c").with_text("u"));

        let rows = flatten(&node);
        assert_eq!(rows.len(), 1);
        assert_eq!(
            rows[0].keys().collect::<Vec<_>>(),
            vec!["a.@x", "a.b", "a.c"]
        );
        assert_eq!(rows[0].get("a.@x"), Some(&Scalar::Int(1)));
    }

    #[test]
    fn test_cartesian_product_of_groups() {
        let node = XmlNode::new("book")
            .with_attribute("id", "1")
            .with_child(XmlNode::new("tag").with_text("x"))
            .with_child(XmlNode::new("tag").with_text("y"))
            .with_child(XmlNode::new("category").with_text("p"))
            .with_child(XmlNode::new("category").with_text("q"));

        let rows = flatten(&node);
        assert_eq!(rows.len(), 4);

        let pairs: Vec<(String, String)> = rows
            .iter()
            .map(|r| {
                (
                    r.get("book.tag").unwrap().to_string(),
                    r.get("book.category").unwrap().to_string(),
                )
            })
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("x".to_string(), "p".to_string()),
                ("x".to_string(), "q".to_string()),
                ("y".to_string(), "p".to_string()),
                ("y".to_string(), "q".to_string()),
            ]
        );
        assert!(rows.iter().all(|r| r.get("book.@id") == Some(&Scalar::Int(1))));
    }

    #[test]
    fn test_nested_repeats_disambiguated_by_ancestor() {
        // Each author carries its own books; books never pair with another author.
        let node = XmlNode::new("lib")
            .with_child(
                XmlNode::new("author")
                    .with_child(XmlNode::new("name").with_text("A"))
                    .with_child(XmlNode::new("book").with_text("a1"))
                    .with_child(XmlNode::new("book").with_text("a2")),
            )
            .with_child(
                XmlNode::new("author")
                    .with_child(XmlNode::new("name").with_text("B"))
                    .with_child(XmlNode::new("book").with_text("b1")),
            );

        let rows = flatten(&node);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].get("lib.author.name"), Some(&Scalar::from("A")));
        assert_eq!(rows[1].get("lib.author.book"), Some(&Scalar::from("a2")));
        assert_eq!(rows[2].get("lib.author.name"), Some(&Scalar::from("B")));
        assert_eq!(rows[2].get("lib.author.book"), Some(&Scalar::from("b1")));
    }

    #[test]
    fn test_empty_elements_contribute_nothing() {
        let node = XmlNode::new("a")
            .with_child(XmlNode::new("b").with_text("1"))
            .with_child(XmlNode::new("c"));

        let rows = flatten(&node);
        assert_eq!(rows.len(), 1);
        assert!(!rows[0].contains_key("a.c"));
    }

    #[test]
    fn test_empty_document_has_no_rows() {
        assert!(flatten(&XmlNode::new("root")).is_empty());

        let only_empty_children = XmlNode::new("root")
            .with_child(XmlNode::new("x"))
            .with_child(XmlNode::new("x"));
        assert!(flatten(&only_empty_children).is_empty());
    }

    #[test]
    fn test_empty_occurrence_keeps_its_row() {
        let group = |root: XmlNode| {
            root.with_child(XmlNode::new("b").with_text("1"))
                .with_child(XmlNode::new("b"))
                .with_child(XmlNode::new("b").with_text("3"))
        };

        let plain = flatten(&group(XmlNode::new("a")));
        let with_id = flatten(&group(XmlNode::new("a").with_attribute("id", "k")));

        assert_eq!(plain.len(), 3);
        assert_eq!(with_id.len(), 3);
        assert!(plain[1].is_empty());
        assert_eq!(with_id[1].keys().collect::<Vec<_>>(), vec!["a.@id"]);
    }

    #[test]
    fn test_empty_record_keeps_its_row() {
        let node = XmlNode::new("items")
            .with_child(XmlNode::new("item").with_child(XmlNode::new("n").with_text("x")))
            .with_child(XmlNode::new("item"))
            .with_child(XmlNode::new("item").with_child(XmlNode::new("n").with_text("z")));

        let config = FlattenConfig::default().with_record_mode(RecordMode::RepeatedChildren);
        let rows = Flattener::new(config).flatten(&node);

        assert_eq!(rows.len(), 3);
        assert!(rows[1].is_empty());
        assert_eq!(rows[2].get("item.n"), Some(&Scalar::from("z")));
    }

    #[test]
    fn test_attributes_excluded() {
        let node = XmlNode::new("a")
            .with_attribute("x", "1")
            .with_child(XmlNode::new("b").with_attribute("y", "2"));

        let rows = Flattener::new(FlattenConfig::default().with_attributes(false)).flatten(&node);
        assert!(rows.is_empty());
    }

    #[test]
    fn test_custom_delimiter_and_prefix() {
        let node = XmlNode::new("a")
            .with_child(XmlNode::new("b").with_attribute("id", "k").with_text("v"));
        let config = FlattenConfig::new()
            .with_path_delimiter("/")
            .with_attribute_prefix("_");

        let rows = Flattener::new(config).flatten(&node);
        assert_eq!(rows[0].keys().collect::<Vec<_>>(), vec!["a/b/_id", "a/b"]);
    }

    #[test]
    fn test_repeated_children_record_mode() {
        let node = XmlNode::new("catalog")
            .with_child(XmlNode::new("meta").with_text("m"))
            .with_child(XmlNode::new("book").with_child(XmlNode::new("title").with_text("One")))
            .with_child(XmlNode::new("book").with_child(XmlNode::new("title").with_text("Two")));

        let config = FlattenConfig::default().with_record_mode(RecordMode::RepeatedChildren);
        let rows = Flattener::new(config).flatten(&node);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].keys().collect::<Vec<_>>(), vec!["book.title"]);
        assert_eq!(rows[1].get("book.title"), Some(&Scalar::from("Two")));
    }

    #[test]
    fn test_record_tag_ties_go_to_first() {
        let node = XmlNode::new("r")
            .with_child(XmlNode::new("x"))
            .with_child(XmlNode::new("y"));
        assert_eq!(record_tag(&node), Some("x"));
        assert_eq!(record_tag(&XmlNode::new("r")), None);
    }

    #[test]
    fn test_cartesian_product_of_nothing() {
        let rows = cartesian_product(Vec::new());
        assert_eq!(rows.len(), 1);
        assert!(rows[0].is_empty());
    }
}
