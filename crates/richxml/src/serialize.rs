//! Document tree to semantic XML
//!
//! The root `doc` wrapper is never written. Element-only content is laid
//! out one child per line, indented one level deeper than its parent;
//! content holding any text node is written inline so no layout
//! whitespace leaks into text. Traversal uses an explicit work stack, so
//! arbitrarily deep trees cannot overflow the call stack.

use tracing::{debug, instrument, warn};

use crate::config::Config;
use crate::escape::{attr_to_string, escape_attr, escape_text};
use crate::model::{Attrs, Document, Node};

enum Step<'a> {
    Node(&'a Node, usize),
    Emit(String),
}

/// Serialize the document's children to XML text
#[instrument(level = "debug", skip_all)]
pub fn serialize(doc: &Document, config: &Config) -> String {
    let children = doc.children();
    let mut stack = Vec::new();

    if is_inline(children) {
        stack.extend(children.iter().rev().map(|node| Step::Node(node, 0)));
    } else {
        for (i, node) in children.iter().enumerate().rev() {
            stack.push(Step::Node(node, 0));
            if i > 0 {
                stack.push(Step::Emit("\n".to_string()));
            }
        }
    }

    let mut out = String::new();
    while let Some(step) = stack.pop() {
        match step {
            Step::Emit(text) => out.push_str(&text),
            Step::Node(node, _) if node.is_text() => write_text(&mut out, node, config),
            Step::Node(node, depth) => {
                out.push('<');
                out.push_str(&node.kind);
                write_attrs(&mut out, node.attrs.as_ref());

                let children = node.children();
                if children.is_empty() {
                    out.push_str(" />");
                    continue;
                }
                out.push('>');

                let close = format!("</{}>", node.kind);
                if is_inline(children) {
                    stack.push(Step::Emit(close));
                    stack.extend(children.iter().rev().map(|child| Step::Node(child, depth + 1)));
                } else {
                    stack.push(Step::Emit(format!("\n{}{close}", pad(depth, config))));
                    let lead = format!("\n{}", pad(depth + 1, config));
                    for child in children.iter().rev() {
                        stack.push(Step::Node(child, depth + 1));
                        stack.push(Step::Emit(lead.clone()));
                    }
                }
            }
        }
    }

    debug!(bytes = out.len(), "serialized document");
    out
}

/// Inline content: at least one direct child is a text node
fn is_inline(children: &[Node]) -> bool {
    children.iter().any(Node::is_text)
}

fn pad(depth: usize, config: &Config) -> String {
    " ".repeat(depth.saturating_mul(config.indent))
}

/// Write a text node wrapped in its marks, first mark outermost
fn write_text(out: &mut String, node: &Node, config: &Config) {
    let marks = node.mark_list();

    for mark in marks {
        if !config.marks.contains(&mark.kind) {
            warn!(mark = %mark.kind, "mark type is not registered and will parse back as a node");
        }
        out.push('<');
        out.push_str(&mark.kind);
        write_attrs(out, mark.attrs.as_ref());
        out.push('>');
    }

    out.push_str(&escape_text(node.text.as_deref().unwrap_or_default()));

    for mark in marks.iter().rev() {
        out.push_str("</");
        out.push_str(&mark.kind);
        out.push('>');
    }
}

fn write_attrs(out: &mut String, attrs: Option<&Attrs>) {
    let Some(attrs) = attrs else {
        return;
    };
    for (key, value) in attrs {
        out.push(' ');
        out.push_str(key);
        out.push_str("='");
        out.push_str(&escape_attr(&attr_to_string(value)));
        out.push('\'');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Mark;
    use serde_json::json;

    fn attrs(value: serde_json::Value) -> Attrs {
        match value {
            serde_json::Value::Object(map) => map,
            _ => Attrs::new(),
        }
    }

    fn to_xml(doc: &Document) -> String {
        serialize(doc, &Config::default())
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(to_xml(&Document::empty()), "");
        assert_eq!(to_xml(&Document::new(vec![])), "");
    }

    #[test]
    fn test_paragraph() {
        let doc = Document::new(vec![
            Node::new("paragraph").with_content(vec![Node::text("Hello")])
        ]);
        assert_eq!(to_xml(&doc), "<paragraph>Hello</paragraph>");
    }

    #[test]
    fn test_marks_nest_first_outermost() {
        let doc = Document::new(vec![Node::new("paragraph").with_content(vec![
            Node::text("x").with_marks(vec![Mark::new("bold"), Mark::new("italic")]),
        ])]);
        assert_eq!(
            to_xml(&doc),
            "<paragraph><bold><italic>x</italic></bold></paragraph>"
        );
    }

    #[test]
    fn test_mark_attributes() {
        let doc = Document::new(vec![Node::text("colored").with_marks(vec![
            Mark::new("textStyle").with_attrs(attrs(json!({"color": "#FF0000"}))),
        ])]);
        assert_eq!(
            to_xml(&doc),
            "<textStyle color='#FF0000'>colored</textStyle>"
        );
    }

    #[test]
    fn test_self_closing_and_attrs() {
        let doc = Document::new(vec![
            Node::new("horizontalRule"),
            Node::new("image").with_attrs(attrs(json!({"src": "a.png", "width": 20, "alt": null}))),
            Node::new("paragraph").with_attrs(Attrs::new()).with_content(vec![]),
        ]);
        assert_eq!(
            to_xml(&doc),
            "<horizontalRule />\n<image src='a.png' width='20' alt='null' />\n<paragraph />"
        );
    }

    #[test]
    fn test_structured_attribute_is_json() {
        let doc = Document::new(vec![
            Node::new("box").with_attrs(attrs(json!({"color": {"r": 1, "g": 2}, "it": "it's"})))
        ]);
        assert_eq!(
            to_xml(&doc),
            r#"<box color='{"r":1,"g":2}' it='it&apos;s' />"#
        );
    }

    #[test]
    fn test_block_content_is_indented() {
        let doc = Document::new(vec![Node::new("bulletList").with_content(vec![
            Node::new("listItem").with_content(vec![
                Node::new("paragraph").with_content(vec![Node::text("one")])
            ]),
            Node::new("listItem").with_content(vec![Node::new("paragraph")]),
        ])]);
        let expected = "\
<bulletList>
  <listItem>
    <paragraph>one</paragraph>
  </listItem>
  <listItem>
    <paragraph />
  </listItem>
</bulletList>";
        assert_eq!(to_xml(&doc), expected);
    }

    #[test]
    fn test_custom_indent() {
        let doc = Document::new(vec![
            Node::new("blockquote").with_content(vec![Node::new("paragraph")])
        ]);
        let config = Config::default().indent(4);
        assert_eq!(
            serialize(&doc, &config),
            "<blockquote>\n    <paragraph />\n</blockquote>"
        );
    }

    #[test]
    fn test_mixed_content_stays_inline() {
        let doc = Document::new(vec![Node::new("paragraph").with_content(vec![
            Node::text("a"),
            Node::new("hardBreak"),
            Node::text("b"),
        ])]);
        assert_eq!(to_xml(&doc), "<paragraph>a<hardBreak />b</paragraph>");
    }

    #[test]
    fn test_text_is_escaped() {
        let doc = Document::new(vec![
            Node::new("paragraph").with_content(vec![Node::text(r#"1 < 2 & "q""#)])
        ]);
        assert_eq!(
            to_xml(&doc),
            "<paragraph>1 &lt; 2 &amp; &quot;q&quot;</paragraph>"
        );
    }

    #[test]
    fn test_deep_tree() {
        let mut node = Node::new("leaf");
        for _ in 0..3_000 {
            node = Node::new("blockquote").with_content(vec![node]);
        }
        let doc = Document::new(vec![node]);
        let xml = serialize(&doc, &Config::default().indent(0));
        assert!(xml.contains("<leaf />"));
        assert_eq!(xml.matches("</blockquote>").count(), 3_000);
    }
}
