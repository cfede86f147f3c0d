//! Scalar escaping for GS output.
//!
//! Only the characters the parser would otherwise misread are escaped; every
//! other character, control characters included, is written as is.

use std::borrow::Cow;

/// Escape a string for a quoted run delimited by `quote`.
///
/// Returns the escaped content (without surrounding quotes).
pub fn escape_quoted(s: &str, quote: char) -> Cow<'_, str> {
    escape_with(s, |c| c == '\\' || c == quote)
}

/// Escape a text run of a mixed body: `\`, `<` and backquote.
pub fn escape_mixed(s: &str) -> Cow<'_, str> {
    escape_with(s, |c| matches!(c, '\\' | '<' | '`'))
}

fn escape_with(s: &str, needs_escape: impl Fn(char) -> bool) -> Cow<'_, str> {
    if !s.chars().any(&needs_escape) {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        if needs_escape(c) {
            result.push('\\');
        }
        result.push(c);
    }
    Cow::Owned(result)
}

/// Bound framing `content` for a bounded run: `open`, marker, `close`.
///
/// When the bound occurs in the content, a counter is appended to the marker
/// (`marker0`, `marker1`, ...) until it does not.
pub fn bound_for(open: char, marker: &str, close: char, content: &str) -> String {
    let mut bound = format!("{open}{marker}{close}");
    let mut counter = 0usize;
    while content.contains(bound.as_str()) {
        bound = format!("{open}{marker}{counter}{close}");
        counter += 1;
    }
    bound
}
