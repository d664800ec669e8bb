//! JSON side of the conversion
//!
//! serde_json's fixed recursion limit is switched off and the parse runs
//! on a growable stack, so nesting is bounded by `Config::max_depth` alone.

use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::config::Config;
use crate::error::{Error, Pos, Result};
use crate::model::{Document, Node, DOC_TYPE};

/// Containers allowed on top of two per node level: the doc object, a mark
/// list with its mark and attrs objects, and structured attribute values
const NESTING_HEADROOM: usize = 36;

/// Load a document from ProseMirror JSON
#[instrument(level = "debug", skip_all, fields(len = input.len()))]
pub fn from_json(input: &str, config: &Config) -> Result<Document> {
    if config.max_depth > 0 {
        check_nesting(input, config.max_depth)?;
    }
    let doc: Document = from_str_unbounded(input)?;
    if doc.kind != DOC_TYPE {
        warn!(root = %doc.kind, "root node is not a doc; unwrapping it anyway");
    }
    check_nodes(&doc, config)?;
    debug!(nodes = doc.node_count(), "loaded document");
    Ok(doc)
}

/// Write a document as pretty-printed JSON
pub fn to_json(doc: &Document) -> Result<String> {
    serde_json::to_string_pretty(doc).map_err(Error::from)
}

/// Deserialize without serde_json's recursion limit
pub(crate) fn from_str_unbounded<T>(input: &str) -> serde_json::Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    let mut de = serde_json::Deserializer::from_str(input);
    de.disable_recursion_limit();
    let value = T::deserialize(serde_stacker::Deserializer::new(&mut de))?;
    de.end()?;
    Ok(value)
}

/// Reject raw JSON nested far deeper than any document within `max` levels
fn check_nesting(input: &str, max: u16) -> Result<()> {
    let limit = 2 * usize::from(max) + NESTING_HEADROOM;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    let (mut line, mut col) = (1u32, 1u32);

    for (offset, ch) in input.char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
        } else {
            match ch {
                '"' => in_string = true,
                '{' | '[' => {
                    depth += 1;
                    if depth > limit {
                        return Err(Error::max_depth(max, Pos::new(offset, line, col)));
                    }
                }
                '}' | ']' => depth = depth.saturating_sub(1),
                _ => {}
            }
        }

        if ch == '\n' {
            line = line.saturating_add(1);
            col = 1;
        } else {
            col = col.saturating_add(1);
        }
    }

    Ok(())
}

fn check_nodes(doc: &Document, config: &Config) -> Result<()> {
    let mut stack: Vec<(&Node, usize)> = doc.children().iter().map(|node| (node, 1)).collect();

    while let Some((node, depth)) = stack.pop() {
        if node.kind.is_empty() {
            return Err(Error::conversion("node type must not be empty"));
        }
        if node.mark_list().iter().any(|mark| mark.kind.is_empty()) {
            return Err(Error::conversion("mark type must not be empty"));
        }
        if config.exceeds_depth(depth) {
            return Err(Error::max_depth(config.max_depth, Pos::default()));
        }
        stack.extend(node.children().iter().map(|child| (child, depth + 1)));
    }

    Ok(())
}
