//! Format conversion utilities

use crate::config::Config;
use crate::deserialize::deserialize;
use crate::error::Result;
use crate::json::{from_json, to_json};
use crate::serialize::serialize;
use crate::validate::validate_with_config;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Json,
    Xml,
}

impl Format {
    /// Guess the format from a file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "xml" => Some(Self::Xml),
            _ => None,
        }
    }
}

/// Convert a document between JSON and XML text
pub fn convert(input: &str, from: Format, to: Format) -> Result<String> {
    convert_with_config(input, from, to, &Config::default())
}

/// Convert a document between JSON and XML text with custom configuration
///
/// Converting a format to itself only checks the syntax and returns the
/// input unchanged.
pub fn convert_with_config(
    input: &str,
    from: Format,
    to: Format,
    config: &Config,
) -> Result<String> {
    match (from, to) {
        (Format::Json, Format::Xml) => {
            let doc = from_json(input, config)?;
            Ok(serialize(&doc, config))
        }
        (Format::Xml, Format::Json) => {
            let doc = deserialize(input, config)?;
            to_json(&doc)
        }
        (format, _) => {
            validate_with_config(input, format, config)?;
            Ok(input.to_string())
        }
    }
}
