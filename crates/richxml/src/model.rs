//! Rich-text document model
//!
//! The JSON shape matches ProseMirror's `Node.toJSON()`: every node has a
//! `type`, optional `attrs` and `content`, and text nodes carry `text` and
//! `marks`. Optional fields that are absent stay absent on output.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Node or mark attributes, in insertion order
pub type Attrs = Map<String, Value>;

/// Node type of text leaves
pub const TEXT_TYPE: &str = "text";

/// Node type of the document root
pub const DOC_TYPE: &str = "doc";

/// Inline formatting annotation on a text node
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Mark {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attrs: Option<Attrs>,
}

impl Mark {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            attrs: None,
        }
    }

    #[must_use]
    pub fn with_attrs(mut self, attrs: Attrs) -> Self {
        self.attrs = Some(attrs);
        self
    }

    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            kind: self.kind,
            attrs: self.attrs.filter(|attrs| !attrs.is_empty()),
        }
    }
}

/// One unit of the document tree: a block, an inline node or a text leaf
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attrs: Option<Attrs>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Vec<Node>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Outermost mark first
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marks: Option<Vec<Mark>>,
}

impl Node {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Self::default()
        }
    }

    /// Text leaf without marks
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: TEXT_TYPE.to_string(),
            text: Some(text.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_attrs(mut self, attrs: Attrs) -> Self {
        self.attrs = Some(attrs);
        self
    }

    #[must_use]
    pub fn with_content(mut self, content: Vec<Self>) -> Self {
        self.content = Some(content);
        self
    }

    #[must_use]
    pub fn with_marks(mut self, marks: Vec<Mark>) -> Self {
        self.marks = Some(marks);
        self
    }

    pub fn is_text(&self) -> bool {
        self.kind == TEXT_TYPE
    }

    /// Child nodes, empty when `content` is absent
    pub fn children(&self) -> &[Self] {
        self.content.as_deref().unwrap_or_default()
    }

    /// Marks of a text node, outermost first
    pub fn mark_list(&self) -> &[Mark] {
        self.marks.as_deref().unwrap_or_default()
    }

    /// Collapse empty `attrs`, `content` and `marks` into absent ones
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            kind: self.kind,
            attrs: self.attrs.filter(|attrs| !attrs.is_empty()),
            content: normalize_content(self.content),
            text: self.text,
            marks: self
                .marks
                .filter(|marks| !marks.is_empty())
                .map(|marks| marks.into_iter().map(Mark::normalized).collect()),
        }
    }
}

/// Root container of a document
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "type", default = "doc_type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attrs: Option<Attrs>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Vec<Node>>,
}

fn doc_type() -> String {
    DOC_TYPE.to_string()
}

impl Default for Document {
    fn default() -> Self {
        Self::empty()
    }
}

impl Document {
    pub fn new(content: Vec<Node>) -> Self {
        Self {
            kind: doc_type(),
            attrs: None,
            content: Some(content),
        }
    }

    /// Document with no content at all
    pub fn empty() -> Self {
        Self {
            kind: doc_type(),
            attrs: None,
            content: None,
        }
    }

    #[must_use]
    pub fn with_attrs(mut self, attrs: Attrs) -> Self {
        self.attrs = Some(attrs);
        self
    }

    pub fn children(&self) -> &[Node] {
        self.content.as_deref().unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.children().is_empty()
    }

    /// Total number of nodes below the root
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack: Vec<&Node> = self.children().iter().collect();
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children());
        }
        count
    }

    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            kind: self.kind,
            attrs: self.attrs.filter(|attrs| !attrs.is_empty()),
            content: normalize_content(self.content),
        }
    }
}

fn normalize_content(content: Option<Vec<Node>>) -> Option<Vec<Node>> {
    content
        .filter(|nodes| !nodes.is_empty())
        .map(|nodes| nodes.into_iter().map(Node::normalized).collect())
}
