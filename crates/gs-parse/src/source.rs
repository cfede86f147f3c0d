//! Character sources for the parser.

use gs_event::{is_raw_char, is_space};

use crate::error::{ParseError, ParseErrorKind};

/// Input the parser pulls characters and lexical runs from.
///
/// Run readers are called after the character that introduces the run has
/// been read, and leave the source just past the run.
pub trait Source {
    /// Current byte offset.
    fn offset(&self) -> usize;

    /// Whether the input is consumed.
    fn is_ended(&self) -> bool;

    /// Read one character.
    fn read_char(&mut self) -> Option<char>;

    /// Skip whitespace, then read one character.
    fn read_char_no_space(&mut self) -> Option<char>;

    /// Append `first` and the raw characters following it to `out`.
    fn read_raw_chars(&mut self, first: char, out: &mut String);

    /// Decode a quoted run up to the unescaped `quote` into `out`.
    fn read_quoted_chars(&mut self, quote: char, out: &mut String) -> Result<(), ParseError>;

    /// Read a bounded run whose opener (`|` or `!`) was the last character read.
    ///
    /// The marker between the opener and `quote` goes to `marker`, the verbatim
    /// content up to the repeated bound goes to `out`.
    fn read_bounded_chars(&mut self, quote: char, out: &mut String, marker: &mut String) -> Result<(), ParseError>;

    /// Decode mixed text starting with `first`, stopping before `<` or a backquote.
    fn read_mixed_text(&mut self, first: char, out: &mut String) -> Result<(), ParseError>;

    /// Build an error located at the last character read.
    fn error(&self, kind: ParseErrorKind) -> ParseError;
}

/// [`Source`] over an in-memory string.
#[derive(Debug, Clone)]
pub struct StrSource<'src> {
    source: &'src str,
    /// The remaining source text (suffix of `source`).
    remaining: &'src str,
    pos: usize,
    /// Offset of the last character read.
    last: usize,
}

impl<'src> StrSource<'src> {
    /// Create a source over `source`.
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            remaining: source,
            pos: 0,
            last: 0,
        }
    }

    #[inline]
    fn peek(&self) -> Option<char> {
        self.remaining.chars().next()
    }

    #[inline]
    fn advance(&mut self) -> Option<char> {
        self.last = self.pos;
        let c = self.peek()?;
        self.advance_by(c.len_utf8());
        Some(c)
    }

    #[inline]
    fn advance_by(&mut self, n: usize) {
        self.pos += n;
        self.remaining = &self.remaining[n..];
    }

    /// Decode the escape sequence after a backslash.
    fn read_escaped(&mut self, out: &mut String) -> Result<(), ParseError> {
        let Some(c) = self.advance() else {
            return Err(self.error(ParseErrorKind::UnterminatedEscape));
        };
        let decoded = match c {
            '\\' | '\'' | '"' | '`' | '<' => c,
            'b' => '\u{8}',
            'f' => '\u{c}',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'u' => return self.read_code_point(out),
            other => return Err(self.error(ParseErrorKind::InvalidEscape(other))),
        };
        out.push(decoded);
        Ok(())
    }

    /// `\u` takes exactly six hex digits naming a full code point.
    fn read_code_point(&mut self, out: &mut String) -> Result<(), ParseError> {
        let len = self
            .remaining
            .char_indices()
            .nth(6)
            .map_or(self.remaining.len(), |(i, _)| i);
        let hex = &self.remaining[..len];
        self.last = self.pos;
        let decoded = if hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
            u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
        } else {
            None
        };
        match decoded {
            Some(c) => {
                out.push(c);
                self.advance_by(len);
                Ok(())
            }
            None => Err(self.error(ParseErrorKind::InvalidCodePoint(hex.to_owned()))),
        }
    }
}

impl Source for StrSource<'_> {
    #[inline]
    fn offset(&self) -> usize {
        self.pos
    }

    #[inline]
    fn is_ended(&self) -> bool {
        self.remaining.is_empty()
    }

    fn read_char(&mut self) -> Option<char> {
        self.advance()
    }

    fn read_char_no_space(&mut self) -> Option<char> {
        let skip = self.remaining.len() - self.remaining.trim_start_matches(is_space).len();
        self.advance_by(skip);
        self.advance()
    }

    fn read_raw_chars(&mut self, first: char, out: &mut String) {
        out.push(first);
        let len = self
            .remaining
            .find(|c: char| !is_raw_char(c))
            .unwrap_or(self.remaining.len());
        out.push_str(&self.remaining[..len]);
        self.advance_by(len);
    }

    fn read_quoted_chars(&mut self, quote: char, out: &mut String) -> Result<(), ParseError> {
        loop {
            // Copy the plain run in one go.
            let len = self
                .remaining
                .find(|c: char| c == quote || c == '\\')
                .unwrap_or(self.remaining.len());
            out.push_str(&self.remaining[..len]);
            self.advance_by(len);
            match self.advance() {
                Some('\\') => self.read_escaped(out)?,
                Some(_) => return Ok(()),
                None => return Err(self.error(ParseErrorKind::UnterminatedQuoted)),
            }
        }
    }

    fn read_bounded_chars(&mut self, quote: char, out: &mut String, marker: &mut String) -> Result<(), ParseError> {
        let start = self.last;
        let Some(end_marker) = self.remaining.find(quote) else {
            return Err(self.error(ParseErrorKind::UnterminatedBoundMarker));
        };
        marker.push_str(&self.remaining[..end_marker]);
        self.advance_by(end_marker + quote.len_utf8());
        let bound = &self.source[start..self.pos];
        let Some(close) = self.remaining.find(bound) else {
            return Err(self.error(ParseErrorKind::UnterminatedBounded));
        };
        out.push_str(&self.remaining[..close]);
        self.last = self.pos + close;
        self.advance_by(close + bound.len());
        Ok(())
    }

    fn read_mixed_text(&mut self, first: char, out: &mut String) -> Result<(), ParseError> {
        if first == '\\' {
            self.read_escaped(out)?;
        } else {
            out.push(first);
        }
        loop {
            let len = self
                .remaining
                .find(['\\', '<', '`'])
                .unwrap_or(self.remaining.len());
            out.push_str(&self.remaining[..len]);
            self.advance_by(len);
            match self.peek() {
                Some('\\') => {
                    self.advance();
                    self.read_escaped(out)?;
                }
                Some(_) => return Ok(()),
                None => {
                    self.last = self.pos;
                    return Err(self.error(ParseErrorKind::UnterminatedMixedText));
                }
            }
        }
    }

    fn error(&self, kind: ParseErrorKind) -> ParseError {
        ParseError::new(kind, self.last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quoted(s: &str) -> Result<String, ParseError> {
        let mut src = StrSource::new(s);
        assert_eq!(src.read_char(), Some('"'));
        let mut out = String::new();
        src.read_quoted_chars('"', &mut out)?;
        Ok(out)
    }

    #[test]
    fn test_read_char_no_space() {
        let mut src = StrSource::new(" \t\r\n a");
        assert_eq!(src.read_char_no_space(), Some('a'));
        assert!(src.is_ended());
        assert_eq!(src.read_char_no_space(), None);
    }

    #[test]
    fn test_raw_chars() {
        let mut src = StrSource::new("ab-c.d/e:f_9 x");
        let first = src.read_char().unwrap();
        let mut out = String::new();
        src.read_raw_chars(first, &mut out);
        assert_eq!(out, "ab-c.d/e:f_9");
        assert_eq!(src.offset(), 12);
    }

    #[test]
    fn test_quoted_escapes() {
        assert_eq!(quoted(r#""a\"b""#).unwrap(), "a\"b");
        assert_eq!(
            quoted(r#""\\ \" \' \` \< \b \f \n \r \t""#).unwrap(),
            "\\ \" ' ` < \u{8} \u{c} \n \r \t"
        );
        assert_eq!(quoted(r#""\u0000E9""#).unwrap(), "é");
        assert_eq!(quoted(r#""\u00FFFCa""#).unwrap(), "\u{FFFC}a");
    }

    #[test]
    fn test_quoted_errors() {
        let err = quoted(r#""abc"#).unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::UnterminatedQuoted));
        let err = quoted(r#""\q""#).unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::InvalidEscape('q')));
        assert_eq!(err.offset, 2);
        let err = quoted(r#""\u00E9""#).unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::InvalidCodePoint(_)));
        let err = quoted(r#""\u110000""#).unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::InvalidCodePoint(ref h) if h == "110000"));
        let err = quoted(r#""\"#).unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::UnterminatedEscape));
    }

    #[test]
    fn test_bounded() {
        let mut src = StrSource::new("|.' a'|' |.'>");
        assert_eq!(src.read_char(), Some('|'));
        let (mut out, mut marker) = (String::new(), String::new());
        src.read_bounded_chars('\'', &mut out, &mut marker).unwrap();
        assert_eq!(out, " a'|' ");
        assert_eq!(marker, ".");
        assert_eq!(src.read_char(), Some('>'));
    }

    #[test]
    fn test_bounded_errors() {
        let mut src = StrSource::new("!xyz");
        src.read_char();
        let err = src
            .read_bounded_chars('"', &mut String::new(), &mut String::new())
            .unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::UnterminatedBoundMarker));

        let mut src = StrSource::new("!x\"text!x");
        src.read_char();
        let err = src
            .read_bounded_chars('"', &mut String::new(), &mut String::new())
            .unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::UnterminatedBounded));
    }

    #[test]
    fn test_mixed_text_stops_before_markers() {
        let mut src = StrSource::new(r"a\`b\<c<d>`");
        let first = src.read_char().unwrap();
        let mut out = String::new();
        src.read_mixed_text(first, &mut out).unwrap();
        assert_eq!(out, "a`b<c");
        assert_eq!(src.read_char(), Some('<'));
    }

    #[test]
    fn test_mixed_text_unterminated() {
        let mut src = StrSource::new("abc");
        let first = src.read_char().unwrap();
        let err = src.read_mixed_text(first, &mut String::new()).unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::UnterminatedMixedText));
        assert_eq!(err.offset, 3);
    }
}
