//! Escaping rules for XML text and attribute values
//!
//! Attribute values are written single-quoted, so double quotes pass
//! through untouched and JSON-encoded values stay readable.

use serde_json::Value;
use thiserror::Error;

/// Failure to decode an entity or character reference
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum UnescapeError {
    #[error("unterminated entity reference")]
    Unterminated,
    #[error("unknown entity: &{0};")]
    Unknown(String),
    #[error("invalid character reference: &{0};")]
    InvalidCharRef(String),
}

/// Escape text content
pub fn escape_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escape a single-quoted attribute value
pub fn escape_attr(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Render an attribute value as raw (unescaped) attribute text
///
/// Strings are used as-is, other primitives are stringified, and objects
/// and arrays are JSON-encoded.
pub fn attr_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Recover an attribute value from raw (unescaped) attribute text
///
/// Text shaped like a JSON object or array is parsed back; anything else,
/// including JSON-shaped text that fails to parse, stays a string. A string
/// attribute that happens to look like `{...}` is therefore re-typed.
pub fn attr_from_str(raw: &str) -> Value {
    if looks_structured(raw.trim()) {
        if let Ok(value) = serde_json::from_str::<Value>(raw) {
            return value;
        }
    }
    Value::String(raw.to_string())
}

fn looks_structured(s: &str) -> bool {
    (s.starts_with('{') && s.ends_with('}')) || (s.starts_with('[') && s.ends_with(']'))
}

/// Decode predefined entities and numeric character references
pub fn unescape(input: &str) -> Result<String, UnescapeError> {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(amp) = rest.find('&') {
        let (before, after) = rest.split_at(amp);
        out.push_str(before);

        let after = after.strip_prefix('&').unwrap_or(after);
        let Some(semi) = after.find(';') else {
            return Err(UnescapeError::Unterminated);
        };
        let (entity, tail) = after.split_at(semi);
        out.push(decode_entity(entity)?);
        rest = tail.strip_prefix(';').unwrap_or(tail);
    }

    out.push_str(rest);
    Ok(out)
}

fn decode_entity(entity: &str) -> Result<char, UnescapeError> {
    match entity {
        "amp" => Ok('&'),
        "lt" => Ok('<'),
        "gt" => Ok('>'),
        "quot" => Ok('"'),
        "apos" => Ok('\''),
        _ if entity.starts_with('#') => decode_char_ref(entity)
            .ok_or_else(|| UnescapeError::InvalidCharRef(entity.to_string())),
        _ if entity.is_empty() || entity.contains(char::is_whitespace) => {
            Err(UnescapeError::Unterminated)
        }
        _ => Err(UnescapeError::Unknown(entity.to_string())),
    }
}

fn decode_char_ref(entity: &str) -> Option<char> {
    let code = if let Some(hex) = entity
        .strip_prefix("#x")
        .or_else(|| entity.strip_prefix("#X"))
    {
        u32::from_str_radix(hex, 16).ok()?
    } else {
        entity.strip_prefix('#')?.parse::<u32>().ok()?
    };
    char::from_u32(code).filter(|ch| *ch != '\0')
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_escape_text() {
        assert_eq!(
            escape_text(r#"a < b & "c" 'd' > e"#),
            "a &lt; b &amp; &quot;c&quot; &apos;d&apos; &gt; e"
        );
    }

    #[test]
    fn test_escape_attr_keeps_double_quotes() {
        assert_eq!(escape_attr(r#"{"a":"it's"}"#), r#"{"a":"it&apos;s"}"#);
        assert_eq!(escape_attr("x<y&z"), "x&lt;y&amp;z");
    }

    #[test]
    fn test_attr_to_string() {
        assert_eq!(attr_to_string(&json!("#FF0000")), "#FF0000");
        assert_eq!(attr_to_string(&json!(2)), "2");
        assert_eq!(attr_to_string(&json!(true)), "true");
        assert_eq!(attr_to_string(&Value::Null), "null");
        assert_eq!(attr_to_string(&json!({"r": 1, "g": 2})), r#"{"r":1,"g":2}"#);
        assert_eq!(attr_to_string(&json!([1, "a"])), r#"[1,"a"]"#);
    }

    #[test]
    fn test_attr_from_str() {
        assert_eq!(attr_from_str(r#"{"r":1,"g":2}"#), json!({"r": 1, "g": 2}));
        assert_eq!(attr_from_str(" [1, 2] "), json!([1, 2]));
        assert_eq!(attr_from_str("{not json}"), json!("{not json}"));
        // primitives are never re-typed
        assert_eq!(attr_from_str("2"), json!("2"));
        assert_eq!(attr_from_str("true"), json!("true"));
    }

    #[test]
    fn test_unescape() -> Result<(), UnescapeError> {
        assert_eq!(unescape("a &lt; b &amp;&amp; c")?, "a < b && c");
        assert_eq!(unescape("&quot;&apos;&gt;")?, "\"'>");
        assert_eq!(unescape("&#65;&#x42;&#X43;")?, "ABC");
        assert_eq!(unescape("plain")?, "plain");
        Ok(())
    }

    #[test]
    fn test_unescape_errors() {
        assert_eq!(unescape("a & b"), Err(UnescapeError::Unterminated));
        assert_eq!(unescape("&amp"), Err(UnescapeError::Unterminated));
        assert_eq!(
            unescape("&nbsp;"),
            Err(UnescapeError::Unknown("nbsp".to_string()))
        );
        assert_eq!(
            unescape("&#xD800;"),
            Err(UnescapeError::InvalidCharRef("#xD800".to_string()))
        );
    }

    #[test]
    fn test_escape_then_unescape() -> Result<(), UnescapeError> {
        let text = r#"<tag attr="v">'&'</tag>"#;
        assert_eq!(unescape(&escape_text(text))?, text);
        assert_eq!(unescape(&escape_attr(text))?, text);
        Ok(())
    }
}
