//! Semantic XML to document tree
//!
//! Walks the generic XML tree: whitespace-only text runs are dropped,
//! elements named in the mark registry fold into the marks of the text
//! they wrap, and every other element becomes a node.

use indexmap::IndexMap;
use tracing::{debug, instrument, trace};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::escape::attr_from_str;
use crate::model::{Attrs, Document, Mark, Node, DOC_TYPE};
use crate::xml::parser::parse_fragment;
use crate::xml::{Content, Element};

/// Parse XML text into a document; a sole top-level `doc` element is unwrapped
#[instrument(level = "debug", skip_all, fields(len = input.len()))]
pub fn deserialize(input: &str, config: &Config) -> Result<Document> {
    let items = parse_fragment(input, config.max_depth)?;
    let builder = TreeBuilder { config };

    let mut significant = items.iter().filter(|item| !item.is_blank_text());
    let (attrs, source) = match (significant.next(), significant.next()) {
        (Some(Content::Element(root)), None) if root.name == DOC_TYPE => {
            trace!("unwrapping doc element");
            (to_attrs(&root.attributes), root.children.as_slice())
        }
        _ => (None, items.as_slice()),
    };

    let content = builder.build_children(source, &[])?;
    let doc = Document {
        kind: DOC_TYPE.to_string(),
        attrs,
        content: (!content.is_empty()).then_some(content),
    };

    debug!(nodes = doc.node_count(), "parsed document");
    Ok(doc)
}

struct TreeBuilder<'a> {
    config: &'a Config,
}

impl TreeBuilder<'_> {
    fn build_children(&self, children: &[Content], marks: &[Mark]) -> Result<Vec<Node>> {
        let mut nodes = Vec::new();
        self.collect(children, marks, &mut nodes)?;
        Ok(nodes)
    }

    /// Append the nodes for `children`, in order, to `out`
    fn collect(&self, children: &[Content], marks: &[Mark], out: &mut Vec<Node>) -> Result<()> {
        for child in children {
            match child {
                Content::Text(text) if text.trim().is_empty() => {}
                Content::Text(text) => {
                    let mut node = Node::text(text.as_str());
                    if !marks.is_empty() {
                        node.marks = Some(marks.to_vec());
                    }
                    out.push(node);
                }
                Content::Element(element) if element.name.is_empty() => {
                    return Err(Error::conversion("element has no tag name"));
                }
                Content::Element(element) if self.config.marks.contains(&element.name) => {
                    trace!(mark = %element.name, "expanding mark wrapper");
                    let mut nested = Vec::with_capacity(marks.len() + 1);
                    nested.extend_from_slice(marks);
                    nested.push(Mark {
                        kind: element.name.clone(),
                        attrs: to_attrs(&element.attributes),
                    });
                    self.collect(&element.children, &nested, out)?;
                }
                Content::Element(element) => out.push(self.build_node(element)?),
            }
        }
        Ok(())
    }

    fn build_node(&self, element: &Element) -> Result<Node> {
        let content = self.build_children(&element.children, &[])?;
        Ok(Node {
            kind: element.name.clone(),
            attrs: to_attrs(&element.attributes),
            content: (!content.is_empty()).then_some(content),
            ..Node::default()
        })
    }
}

fn to_attrs(attributes: &IndexMap<String, String>) -> Option<Attrs> {
    if attributes.is_empty() {
        return None;
    }
    Some(
        attributes
            .iter()
            .map(|(key, raw)| (key.clone(), attr_from_str(raw)))
            .collect(),
    )
}
