//! Parse errors.

use std::fmt;

use gs_event::HandlerError;

/// A fatal parse error at a byte offset of the source.
#[derive(Debug)]
pub struct ParseError {
    /// What went wrong.
    pub kind: ParseErrorKind,
    /// Byte offset of the offending character (or of the end of input).
    pub offset: usize,
}

impl ParseError {
    /// Create a new parse error.
    pub fn new(kind: ParseErrorKind, offset: usize) -> Self {
        Self { kind, offset }
    }
}

/// Broad class of a [`ParseErrorKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Malformed token: quoting, bounds, escapes.
    Lexical,
    /// Well-formed tokens in the wrong place.
    Grammar,
    /// The handler refused an event.
    Handler,
}

/// Parse error kinds.
#[derive(Debug)]
pub enum ParseErrorKind {
    /// Quoted name, value or text not closed.
    UnterminatedQuoted,
    /// Bounded string opener without its closing quote.
    UnterminatedBoundMarker,
    /// Bounded string without its closing bound.
    UnterminatedBounded,
    /// Text run of a mixed body not closed.
    UnterminatedMixedText,
    /// Backslash at end of input.
    UnterminatedEscape,
    /// Backslash followed by a character with no escape meaning.
    InvalidEscape(char),
    /// `\u` not followed by six hex digits of a valid code point.
    InvalidCodePoint(String),
    /// Character not allowed here.
    UnexpectedChar(char),
    /// Input ended where a node-like value was expected.
    UnexpectedEof,
    /// Input ended inside a node head or tail.
    NodeNotEnded,
    /// Character after a body that is neither an attribute nor `>`.
    InvalidTailChar(char),
    /// List body without `]`.
    ListNotEnded,
    /// Map body without `}`.
    MapNotEnded,
    /// Mixed body without its closing backquote.
    MixedNotEnded,
    /// Map entry that is neither a key nor a node.
    InvalidMapEntry(char),
    /// Special marker or garbage where an attribute name was expected.
    MissingAttributeName,
    /// `=` not followed by a value.
    MissingAttributeValue,
    /// Error raised by the handler.
    Handler(HandlerError),
}

impl ParseErrorKind {
    /// Lexical, grammar or handler error.
    pub fn category(&self) -> ErrorCategory {
        use ParseErrorKind::*;
        match self {
            UnterminatedQuoted
            | UnterminatedBoundMarker
            | UnterminatedBounded
            | UnterminatedMixedText
            | UnterminatedEscape
            | InvalidEscape(_)
            | InvalidCodePoint(_) => ErrorCategory::Lexical,
            UnexpectedChar(_)
            | UnexpectedEof
            | NodeNotEnded
            | InvalidTailChar(_)
            | ListNotEnded
            | MapNotEnded
            | MixedNotEnded
            | InvalidMapEntry(_)
            | MissingAttributeName
            | MissingAttributeValue => ErrorCategory::Grammar,
            Handler(_) => ErrorCategory::Handler,
        }
    }
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseErrorKind::UnterminatedQuoted => write!(f, "quoted name or value not ended"),
            ParseErrorKind::UnterminatedBoundMarker => write!(f, "string bound not ended"),
            ParseErrorKind::UnterminatedBounded => write!(f, "bounded string not ended"),
            ParseErrorKind::UnterminatedMixedText => write!(f, "mixed text not ended"),
            ParseErrorKind::UnterminatedEscape => write!(f, "invalid escape sequence"),
            ParseErrorKind::InvalidEscape(c) => write!(f, "unknown escaped character: {c:?}"),
            ParseErrorKind::InvalidCodePoint(hex) => write!(f, "invalid code point: \\u{hex}"),
            ParseErrorKind::UnexpectedChar(c) => write!(f, "invalid char found: {c:?}"),
            ParseErrorKind::UnexpectedEof => write!(f, "unexpected end of input"),
            ParseErrorKind::NodeNotEnded => write!(f, "node not ended"),
            ParseErrorKind::InvalidTailChar(c) => write!(f, "invalid character in tail node: {c:?}"),
            ParseErrorKind::ListNotEnded => write!(f, "list body not ended"),
            ParseErrorKind::MapNotEnded => write!(f, "map body not ended"),
            ParseErrorKind::MixedNotEnded => write!(f, "mixed body not ended"),
            ParseErrorKind::InvalidMapEntry(c) => write!(f, "invalid character in body map: {c:?}"),
            ParseErrorKind::MissingAttributeName => write!(f, "not an attribute"),
            ParseErrorKind::MissingAttributeValue => write!(f, "no attribute value found"),
            ParseErrorKind::Handler(e) => write!(f, "{e}"),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.kind, self.offset)
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            ParseErrorKind::Handler(e) => Some(e),
            _ => None,
        }
    }
}
