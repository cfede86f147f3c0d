//! Lexical predicates of the GS grammar.
//!
//! These are pure functions over a single character (or a whole string built
//! from them) so the parser, the builder and the serializer all agree on what
//! may be written without delimiters.

use std::borrow::Cow;

/// Whether `c` may appear in a raw (undelimited) name, value or text.
///
/// Raw characters are ASCII letters, digits and `- . / : _`.
#[inline]
pub fn is_raw_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '/' | ':' | '_')
}

/// Whether `c` is insignificant whitespace between tokens.
#[inline]
pub fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

/// Whether `s` can be written raw.
///
/// The empty string is never raw: an empty raw token cannot be told apart
/// from a missing token.
pub fn is_raw(s: &str) -> bool {
    !s.is_empty() && s.chars().all(is_raw_char)
}

/// Collapse every run of whitespace into a single space.
///
/// Used to normalize formattable content. Applying it twice gives the same
/// result as applying it once.
pub fn collapse_spaces(s: &str) -> Cow<'_, str> {
    let mut prev_space = false;
    let needs_work = s.chars().any(|c| {
        let hit = is_space(c) && (prev_space || c != ' ');
        prev_space = is_space(c);
        hit
    });
    if !needs_work {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut in_run = false;
    for c in s.chars() {
        if is_space(c) {
            if !in_run {
                out.push(' ');
                in_run = true;
            }
        } else {
            out.push(c);
            in_run = false;
        }
    }
    Cow::Owned(out)
}
