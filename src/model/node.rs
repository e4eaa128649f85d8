//! Owned XML element tree.

use std::collections::HashMap;

/// An XML element with its attributes, children and text content.
///
/// Attributes and children keep document order. `text` holds the element's
/// own trimmed character data, or `None` when it has none.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlNode {
    /// Tag name (local part when namespaces are stripped)
    pub name: String,

    /// Attributes as `(name, value)` pairs, values already unescaped
    pub attributes: Vec<(String, String)>,

    /// Child elements
    pub children: Vec<XmlNode>,

    /// Text content
    pub text: Option<String>,
}

/// Children sharing one tag name, in document order.
#[derive(Debug, Clone)]
pub struct ChildGroup<'a> {
    /// Shared tag name
    pub name: &'a str,
    /// Members of the group
    pub members: Vec<&'a XmlNode>,
}

impl ChildGroup<'_> {
    /// A group with more than one member repeats.
    pub fn is_repeating(&self) -> bool {
        self.members.len() > 1
    }
}

impl XmlNode {
    /// Create an empty element.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set the text content.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Append an attribute.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Append a child element.
    pub fn with_child(mut self, child: XmlNode) -> Self {
        self.children.push(child);
        self
    }

    /// Look up an attribute value by name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// True when the element has no attributes, no children and no text.
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty() && self.children.is_empty() && self.text.is_none()
    }

    /// Group children by tag name, ordered by each name's first occurrence.
    pub fn child_groups(&self) -> Vec<ChildGroup<'_>> {
        let mut groups: Vec<ChildGroup<'_>> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();

        for child in &self.children {
            match index.get(child.name.as_str()) {
                Some(&i) => groups[i].members.push(child),
                None => {
                    index.insert(child.name.as_str(), groups.len());
                    groups.push(ChildGroup {
                        name: child.name.as_str(),
                        members: vec![child],
                    });
                }
            }
        }

        groups
    }

    /// Total number of elements in this subtree, including `self`.
    pub fn element_count(&self) -> usize {
        1 + self.children.iter().map(|c| c.element_count()).sum::<usize>()
    }

    /// Depth of this subtree (a leaf has depth 1).
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(|c| c.depth()).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_groups_first_seen_order() {
        let node = XmlNode::new("book")
            .with_child(XmlNode::new("tag").with_text("a"))
            .with_child(XmlNode::new("title").with_text("T"))
            .with_child(XmlNode::new("tag").with_text("b"));

        let groups = node.child_groups();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].name, "tag");
        assert_eq!(groups[0].members.len(), 2);
        assert!(groups[0].is_repeating());
        assert_eq!(groups[1].name, "title");
        assert!(!groups[1].is_repeating());
    }

    #[test]
    fn test_is_empty() {
        assert!(XmlNode::new("a").is_empty());
        assert!(!XmlNode::new("a").with_attribute("x", "1").is_empty());
        assert!(!XmlNode::new("a").with_text("t").is_empty());
    }

    #[test]
    fn test_counts() {
        let node = XmlNode::new("a").with_child(
            XmlNode::new("b").with_child(XmlNode::new("c")),
        );
        assert_eq!(node.element_count(), 3);
        assert_eq!(node.depth(), 3);
        assert_eq!(node.attribute("missing"), None);
    }
}
