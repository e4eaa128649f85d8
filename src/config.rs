//! Flattening configuration.

/// Default string between path segments.
pub const DEFAULT_PATH_DELIMITER: &str = ".";

/// Default marker placed before an attribute's own name.
pub const DEFAULT_ATTRIBUTE_PREFIX: &str = "@";

/// Which element(s) a row is generated from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RecordMode {
    /// Flatten the whole document from the root element; paths start with
    /// the root tag.
    #[default]
    Root,
    /// Treat the most frequent child tag of the root as the record element
    /// and flatten each occurrence on its own; paths start with the record
    /// tag. Ties go to the tag seen first.
    RepeatedChildren,
}

/// Options controlling how an XML tree is flattened.
///
/// # Example
///
/// ```
/// use xml2table::FlattenConfig;
///
/// let config = FlattenConfig::new()
///     .with_path_delimiter("/")
///     .with_attributes(false);
/// assert_eq!(config.path_delimiter, "/");
/// ```
#[derive(Debug, Clone)]
pub struct FlattenConfig {
    /// Inserted between path segments
    pub path_delimiter: String,

    /// Whether attribute entries are emitted at all
    pub include_attributes: bool,

    /// Inserted before an attribute's own name in its path
    pub attribute_prefix: String,

    /// Use local names for elements and attributes (`ns:book` → `book`)
    pub strip_namespaces: bool,

    /// Record selection
    pub record_mode: RecordMode,
}

impl Default for FlattenConfig {
    fn default() -> Self {
        Self {
            path_delimiter: DEFAULT_PATH_DELIMITER.to_string(),
            include_attributes: true,
            attribute_prefix: DEFAULT_ATTRIBUTE_PREFIX.to_string(),
            strip_namespaces: true,
            record_mode: RecordMode::Root,
        }
    }
}

impl FlattenConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the path delimiter.
    pub fn with_path_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.path_delimiter = delimiter.into();
        self
    }

    /// Enable or disable attribute entries.
    pub fn with_attributes(mut self, include: bool) -> Self {
        self.include_attributes = include;
        self
    }

    /// Set the attribute prefix.
    pub fn with_attribute_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.attribute_prefix = prefix.into();
        self
    }

    /// Enable or disable namespace stripping.
    pub fn with_strip_namespaces(mut self, strip: bool) -> Self {
        self.strip_namespaces = strip;
        self
    }

    /// Set the record mode.
    pub fn with_record_mode(mut self, mode: RecordMode) -> Self {
        self.record_mode = mode;
        self
    }

    /// Join a parent path and a segment.
    pub fn child_path(&self, parent: &str, name: &str) -> String {
        if parent.is_empty() {
            name.to_string()
        } else {
            format!("{}{}{}", parent, self.path_delimiter, name)
        }
    }

    /// Path of an attribute on the element at `element_path`.
    pub fn attribute_path(&self, element_path: &str, name: &str) -> String {
        format!(
            "{}{}{}{}",
            element_path, self.path_delimiter, self.attribute_prefix, name
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FlattenConfig::default();
        assert_eq!(config.path_delimiter, ".");
        assert_eq!(config.attribute_prefix, "@");
        assert!(config.include_attributes);
        assert!(config.strip_namespaces);
        assert_eq!(config.record_mode, RecordMode::Root);
    }

    #[test]
    fn test_paths() {
        let config = FlattenConfig::default();
        assert_eq!(config.child_path("", "a"), "a");
        assert_eq!(config.child_path("a", "b"), "a.b");
        assert_eq!(config.attribute_path("a", "x"), "a.@x");
    }

    #[test]
    fn test_custom_paths() {
        let config = FlattenConfig::new()
            .with_path_delimiter("/")
            .with_attribute_prefix("attr_");
        assert_eq!(config.child_path("a", "b"), "a/b");
        assert_eq!(config.attribute_path("a/b", "id"), "a/b/attr_id");
    }
}
