//! richxml - ProseMirror/TipTap JSON documents as semantic XML
//!
//! Node types become element names, node attributes become XML
//! attributes, and inline marks become wrapper elements around text.
//!
//! # Quick Start
//!
//! ```
//! use richxml::{from_json, from_xml, to_xml};
//! # fn main() -> Result<(), richxml::Error> {
//! let doc = from_json(
//!     r#"{"type":"doc","content":[{"type":"paragraph","content":[{"type":"text","text":"Hello"}]}]}"#,
//! )?;
//! let xml = to_xml(&doc);
//! assert_eq!(xml, "<paragraph>Hello</paragraph>");
//! assert_eq!(from_xml(&xml)?, doc);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub use error::{Error, ErrorKind, Pos, Result, Span};

pub mod config;
pub use config::{Config, MarkRegistry, DEFAULT_MARKS, DEFAULT_MAX_DEPTH};

pub mod model;
pub use model::{Attrs, Document, Mark, Node};

pub mod escape;
pub mod xml;

pub mod deserialize;
pub mod json;
pub mod serialize;

pub mod convert;
pub use convert::{convert, convert_with_config, Format};

pub mod validate;
pub use validate::{validate, validate_json_syntax, validate_with_config, validate_xml_syntax};

/// Serialize a document to XML, without the `doc` wrapper
pub fn to_xml(doc: &Document) -> String {
    serialize::serialize(doc, &Config::default())
}

/// Serialize a document to XML with custom configuration
pub fn to_xml_with_config(doc: &Document, config: &Config) -> String {
    serialize::serialize(doc, config)
}

/// Parse XML into a document; the `doc` wrapper is optional
pub fn from_xml(input: &str) -> Result<Document> {
    deserialize::deserialize(input, &Config::default())
}

/// Parse XML into a document with custom configuration
pub fn from_xml_with_config(input: &str, config: &Config) -> Result<Document> {
    deserialize::deserialize(input, config)
}

/// Load a document from ProseMirror JSON
pub fn from_json(input: &str) -> Result<Document> {
    json::from_json(input, &Config::default())
}

/// Load a document from ProseMirror JSON with custom configuration
pub fn from_json_with_config(input: &str, config: &Config) -> Result<Document> {
    json::from_json(input, config)
}

/// Write a document as pretty-printed JSON
pub fn to_json(doc: &Document) -> Result<String> {
    json::to_json(doc)
}
