//! Conversion configuration

use indexmap::IndexSet;

/// Mark types recognized by TipTap's starter kit and common extensions
pub const DEFAULT_MARKS: [&str; 10] = [
    "bold",
    "italic",
    "strike",
    "underline",
    "code",
    "link",
    "textStyle",
    "highlight",
    "subscript",
    "superscript",
];

/// Nesting limit applied unless configured otherwise
pub const DEFAULT_MAX_DEPTH: u16 = 256;

/// Closed set of element names that denote inline marks rather than nodes
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MarkRegistry {
    names: IndexSet<String>,
}

impl Default for MarkRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_MARKS)
    }
}

impl MarkRegistry {
    /// Create a registry from mark type names
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Registry with no marks; every element becomes a node
    pub fn empty() -> Self {
        Self {
            names: IndexSet::new(),
        }
    }

    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        self.names.insert(name.into())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Configuration shared by the serializer, the markup parser and the JSON loader
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Element names treated as mark wrappers
    pub marks: MarkRegistry,
    /// Maximum nesting depth (0 means unlimited)
    pub max_depth: u16,
    /// Spaces per nesting level for block content
    pub indent: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            marks: MarkRegistry::default(),
            max_depth: DEFAULT_MAX_DEPTH,
            indent: 2,
        }
    }
}

impl Config {
    /// Default limits with a custom mark registry
    pub fn with_marks(marks: MarkRegistry) -> Self {
        Self {
            marks,
            ..Self::default()
        }
    }

    /// Default registry and indentation, no depth limit
    pub fn unlimited() -> Self {
        Self {
            max_depth: 0,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn max_depth(mut self, max_depth: u16) -> Self {
        self.max_depth = max_depth;
        self
    }

    #[must_use]
    pub fn indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Whether `depth` is past the configured limit
    pub(crate) fn exceeds_depth(&self, depth: usize) -> bool {
        self.max_depth > 0 && depth > usize::from(self.max_depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry() {
        let marks = MarkRegistry::default();
        assert_eq!(marks.len(), 10);
        assert!(marks.contains("bold"));
        assert!(marks.contains("textStyle"));
        assert!(!marks.contains("paragraph"));
        assert!(!marks.contains("Bold"));
    }

    #[test]
    fn test_custom_registry() {
        let mut marks = MarkRegistry::new(["em"]);
        assert!(marks.insert("strong"));
        assert!(!marks.insert("em"));
        assert_eq!(marks.iter().collect::<Vec<_>>(), vec!["em", "strong"]);
        assert!(!marks.contains("bold"));
    }

    #[test]
    fn test_empty_registry() {
        let marks = MarkRegistry::empty();
        assert!(marks.is_empty());
        assert!(!marks.contains("bold"));
    }

    #[test]
    fn test_depth_limit() {
        let config = Config::default().max_depth(2);
        assert!(!config.exceeds_depth(2));
        assert!(config.exceeds_depth(3));
        assert!(!Config::unlimited().exceeds_depth(usize::MAX));
    }

    #[test]
    fn test_builder() {
        let config = Config::with_marks(MarkRegistry::empty()).indent(4);
        assert_eq!(config.indent, 4);
        assert_eq!(config.max_depth, 256);
        assert!(config.marks.is_empty());
    }
}
