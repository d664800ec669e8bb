//! Error types for richxml

use std::fmt;
use thiserror::Error;

/// Position in source text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pos {
    pub offset: usize,
    pub line: u32,
    pub col: u32,
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

impl Pos {
    pub const fn new(offset: usize, line: u32, col: u32) -> Self {
        Self { offset, line, col }
    }

    /// Whether this position points into real input (lines start at 1)
    pub const fn is_known(&self) -> bool {
        self.line > 0
    }
}

/// Span representing a range in source text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Span {
    pub start: Pos,
    pub end: Pos,
}

impl Span {
    pub const fn point(pos: Pos) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    pub const fn empty() -> Self {
        Self {
            start: Pos::new(0, 0, 0),
            end: Pos::new(0, 0, 0),
        }
    }
}

/// Error kind for categorizing failures
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed JSON text
    JsonSyntax,
    /// Malformed XML text
    XmlSyntax,
    /// Well-formed input the document mapping cannot translate
    Conversion,
    MaxDepthExceeded { max: u16 },
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::JsonSyntax => write!(f, "invalid json"),
            Self::XmlSyntax => write!(f, "invalid xml"),
            Self::Conversion => write!(f, "conversion failed"),
            Self::MaxDepthExceeded { max } => write!(f, "max depth exceeded: {max}"),
        }
    }
}

/// Main error type for richxml
#[derive(Error, Clone, Debug, PartialEq)]
pub struct Error {
    kind: ErrorKind,
    span: Span,
    message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, span: Span) -> Self {
        let message = kind.to_string();
        Self {
            kind,
            span,
            message,
        }
    }

    pub fn with_message(kind: ErrorKind, span: Span, message: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            message: message.into(),
        }
    }

    /// XML syntax error at a position
    pub fn xml(pos: Pos, message: impl Into<String>) -> Self {
        Self::with_message(ErrorKind::XmlSyntax, Span::point(pos), message)
    }

    /// Conversion error with no source location
    pub fn conversion(message: impl Into<String>) -> Self {
        Self::with_message(ErrorKind::Conversion, Span::empty(), message)
    }

    pub fn max_depth(max: u16, pos: Pos) -> Self {
        Self::new(ErrorKind::MaxDepthExceeded { max }, Span::point(pos))
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.span.start.is_known() {
            write!(f, "error at {}: {}", self.span.start, self.message)
        } else {
            write!(f, "error: {}", self.message)
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        use serde_json::error::Category;

        let kind = match err.classify() {
            Category::Data => ErrorKind::Conversion,
            Category::Syntax | Category::Eof | Category::Io => ErrorKind::JsonSyntax,
        };
        let line = u32::try_from(err.line()).unwrap_or(u32::MAX);
        let col = u32::try_from(err.column()).unwrap_or(u32::MAX);

        // serde_json appends the location itself; we carry it in the span instead
        let full = err.to_string();
        let suffix = format!(" at line {} column {}", err.line(), err.column());
        let message = full.strip_suffix(&suffix).unwrap_or(&full).to_string();

        Self::with_message(kind, Span::point(Pos::new(0, line, col)), message)
    }
}

/// Result type alias for richxml
pub type Result<T> = std::result::Result<T, Error>;
