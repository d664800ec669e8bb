//! Cheap syntax checks for live feedback
//!
//! Each check parses and discards the result, reporting the first problem
//! only. Empty XML is valid: it is what an empty document serializes to.

use serde::de::IgnoredAny;

use crate::config::{Config, DEFAULT_MAX_DEPTH};
use crate::convert::Format;
use crate::error::{Error, Result};
use crate::json::from_str_unbounded;
use crate::xml::parser::parse_fragment;

/// Check that `input` is well-formed JSON, however deeply nested
pub fn validate_json_syntax(input: &str) -> Result<()> {
    from_str_unbounded::<IgnoredAny>(input)
        .map(|_| ())
        .map_err(Error::from)
}

/// Check that `input` is a well-formed XML fragment
pub fn validate_xml_syntax(input: &str) -> Result<()> {
    parse_fragment(input, DEFAULT_MAX_DEPTH).map(|_| ())
}

/// Check `input` against the syntax of `format`
pub fn validate(input: &str, format: Format) -> Result<()> {
    validate_with_config(input, format, &Config::default())
}

/// Check `input` against the syntax of `format`, nesting XML up to
/// `config.max_depth`
pub fn validate_with_config(input: &str, format: Format, config: &Config) -> Result<()> {
    match format {
        Format::Json => validate_json_syntax(input),
        Format::Xml => parse_fragment(input, config.max_depth).map(|_| ()),
    }
}
