//! XML parser implementation
//!
//! Parses a fragment: any number of top-level elements and text runs.
//! Declarations, processing instructions, comments and DOCTYPE are
//! skipped; CDATA sections become text. Text runs are kept verbatim,
//! whitespace-only ones included.

use indexmap::IndexMap;

use crate::error::{Error, Result};
use crate::escape::unescape;
use crate::xml::cursor::Cursor;
use crate::xml::model::{Content, Element};

/// XML parser
#[derive(Debug)]
pub struct Parser<'a> {
    cursor: Cursor<'a>,
    max_depth: u16,
    depth: usize,
}

impl<'a> Parser<'a> {
    /// Create a parser with a depth limit (0 means unlimited)
    pub const fn with_max_depth(input: &'a [u8], max_depth: u16) -> Self {
        Self {
            cursor: Cursor::new(input),
            max_depth,
            depth: 0,
        }
    }

    /// Parse the whole input as a sequence of top-level content items
    pub fn parse_fragment(&mut self) -> Result<Vec<Content>> {
        self.parse_content(None)
    }

    fn parse_content(&mut self, parent: Option<&str>) -> Result<Vec<Content>> {
        let mut children = Vec::new();

        loop {
            if self.cursor.is_eof() {
                return match parent {
                    Some(name) => Err(self.error_here(format!("unterminated element <{name}>"))),
                    None => Ok(children),
                };
            }

            if self.cursor.starts_with(b"</") {
                let Some(name) = parent else {
                    return Err(self.error_here("unexpected closing tag"));
                };
                self.parse_closing_tag(name)?;
                return Ok(children);
            }

            if self.cursor.current() == Some(b'<') {
                match self.parse_markup()? {
                    Some(Content::Text(text)) => push_text(&mut children, text),
                    Some(element) => children.push(element),
                    None => {}
                }
                continue;
            }

            let text = self.parse_text()?;
            push_text(&mut children, text);
        }
    }

    /// Parse whatever starts at `<`; `None` for skipped markup
    fn parse_markup(&mut self) -> Result<Option<Content>> {
        if self.cursor.starts_with(b"<?") {
            self.cursor.advance_by(2);
            self.skip_until(b"?>")?;
            return Ok(None);
        }

        if self.cursor.starts_with(b"<!--") {
            self.cursor.advance_by(4);
            self.skip_until(b"-->")?;
            return Ok(None);
        }

        if self.cursor.starts_with(b"<![CDATA[") {
            self.cursor.advance_by(9);
            let start = self.cursor.pos();
            while !self.cursor.starts_with(b"]]>") {
                if self.cursor.is_eof() {
                    return Err(self.error_here("unterminated CDATA section"));
                }
                self.cursor.advance();
            }
            let text = self.text_from(start)?;
            self.cursor.advance_by(3);
            return Ok(Some(Content::Text(text)));
        }

        if self.cursor.starts_with(b"<!") {
            self.cursor.advance_by(2);
            self.skip_until(b">")?;
            return Ok(None);
        }

        self.parse_element().map(|element| Some(Content::Element(element)))
    }

    fn parse_element(&mut self) -> Result<Element> {
        let open = self.cursor.position();
        self.expect_byte(b'<')?;

        self.depth += 1;
        if self.max_depth > 0 && self.depth > usize::from(self.max_depth) {
            return Err(Error::max_depth(self.max_depth, open));
        }

        let name = self.parse_name()?;
        let attributes = self.parse_attributes()?;

        let children = if self.cursor.consume(b'/') {
            self.expect_byte(b'>')?;
            Vec::new()
        } else {
            self.expect_byte(b'>')?;
            self.parse_content(Some(&name))?
        };

        self.depth -= 1;
        Ok(Element {
            name,
            attributes,
            children,
        })
    }

    fn parse_closing_tag(&mut self, expected: &str) -> Result<()> {
        let start = self.cursor.position();
        self.cursor.advance_by(2);
        let name = self.parse_name()?;
        if name != expected {
            return Err(Error::xml(
                start,
                format!("mismatched closing tag: expected </{expected}>, found </{name}>"),
            ));
        }
        self.cursor.skip_whitespace();
        self.expect_byte(b'>')
    }

    fn parse_attributes(&mut self) -> Result<IndexMap<String, String>> {
        let mut attrs = IndexMap::new();

        loop {
            let separated = self.skip_whitespace();
            match self.cursor.current() {
                Some(b'/' | b'>') => break,
                Some(_) if !separated => {
                    return Err(self.error_here("expected whitespace before attribute"));
                }
                Some(_) => {}
                None => return Err(self.error_here("unexpected end of input")),
            }

            let start = self.cursor.position();
            let name = self.parse_name()?;
            self.cursor.skip_whitespace();
            self.expect_byte(b'=')?;
            self.cursor.skip_whitespace();
            let value = self.parse_attribute_value()?;

            if attrs.contains_key(&name) {
                return Err(Error::xml(start, format!("duplicate attribute: {name}")));
            }
            attrs.insert(name, value);
        }

        Ok(attrs)
    }

    fn parse_attribute_value(&mut self) -> Result<String> {
        let quote = match self.cursor.current() {
            Some(q @ (b'"' | b'\'')) => q,
            _ => return Err(self.error_here("expected quoted attribute value")),
        };
        self.cursor.advance();

        let start_pos = self.cursor.position();
        let start = self.cursor.pos();
        while let Some(b) = self.cursor.current() {
            if b == quote {
                let raw = self.text_from(start)?;
                self.cursor.advance();
                return unescape(&raw).map_err(|err| Error::xml(start_pos, err.to_string()));
            }
            if b == b'<' {
                return Err(self.error_here("'<' not allowed in attribute value"));
            }
            self.cursor.advance();
        }

        Err(self.error_here("unterminated attribute value"))
    }

    fn parse_text(&mut self) -> Result<String> {
        let start_pos = self.cursor.position();
        let start = self.cursor.pos();
        while let Some(b) = self.cursor.current() {
            if b == b'<' {
                break;
            }
            self.cursor.advance();
        }

        let raw = self.text_from(start)?;
        unescape(&raw).map_err(|err| Error::xml(start_pos, err.to_string()))
    }

    fn parse_name(&mut self) -> Result<String> {
        let start = self.cursor.pos();

        match self.cursor.current() {
            Some(b) if is_name_start(b) => self.cursor.advance(),
            Some(_) => return Err(self.error_here("invalid name")),
            None => return Err(self.error_here("expected name")),
        }

        while let Some(b) = self.cursor.current() {
            if is_name_char(b) {
                self.cursor.advance();
            } else {
                break;
            }
        }

        self.text_from(start)
    }

    fn skip_until(&mut self, pattern: &[u8]) -> Result<()> {
        while !self.cursor.is_eof() {
            if self.cursor.starts_with(pattern) {
                self.cursor.advance_by(pattern.len());
                return Ok(());
            }
            self.cursor.advance();
        }
        Err(self.error_here("unterminated markup"))
    }

    fn expect_byte(&mut self, expected: u8) -> Result<()> {
        if self.cursor.consume(expected) {
            return Ok(());
        }
        let found = match self.cursor.current() {
            Some(b) => format!("'{}'", char::from(b).escape_default()),
            None => "end of input".to_string(),
        };
        Err(self.error_here(format!(
            "expected '{}', found {found}",
            char::from(expected)
        )))
    }

    /// Skip whitespace, reporting whether any was consumed
    fn skip_whitespace(&mut self) -> bool {
        let before = self.cursor.pos();
        self.cursor.skip_whitespace();
        self.cursor.pos() != before
    }

    fn text_from(&self, start: usize) -> Result<String> {
        std::str::from_utf8(self.cursor.slice_from(start))
            .map(str::to_string)
            .map_err(|_| self.error_here("invalid utf-8"))
    }

    fn error_here(&self, message: impl Into<String>) -> Error {
        Error::xml(self.cursor.position(), message)
    }
}

/// Parse an XML fragment with a depth limit
pub fn parse_fragment(input: &str, max_depth: u16) -> Result<Vec<Content>> {
    Parser::with_max_depth(input.as_bytes(), max_depth).parse_fragment()
}

fn push_text(children: &mut Vec<Content>, text: String) {
    if text.is_empty() {
        return;
    }
    if let Some(Content::Text(last)) = children.last_mut() {
        last.push_str(&text);
    } else {
        children.push(Content::Text(text));
    }
}

fn is_name_start(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'_' | b':') || b >= 0x80
}

fn is_name_char(b: u8) -> bool {
    is_name_start(b) || matches!(b, b'0'..=b'9' | b'-' | b'.')
}
