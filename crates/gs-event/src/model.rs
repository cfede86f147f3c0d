//! Scalar building blocks of the event model.

use std::fmt;

use crate::grammar::is_raw;

/// How a name, value or text is delimited in GS text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Escaping {
    /// No delimiters; the content only holds raw characters.
    #[default]
    Raw,
    /// Quoted with `'` (names, values) or `"` (text), backslash-escaped.
    Quoted,
    /// Framed by `|marker'` (names, values) or `!marker"` (text), copied verbatim.
    Bounded(String),
}

impl Escaping {
    /// Pick the escaping for `s`: raw when possible, quoted otherwise.
    pub fn select(s: &str) -> Self {
        if is_raw(s) { Self::Raw } else { Self::Quoted }
    }

    /// Whether `s` may be written with this escaping.
    pub fn accepts(&self, s: &str) -> bool {
        match self {
            Self::Raw => is_raw(s),
            Self::Quoted | Self::Bounded(_) => true,
        }
    }

    /// Move the bounded marker out, leaving an empty one behind.
    ///
    /// Lets a producer refill the marker buffer instead of allocating a new one.
    pub fn take_marker(&mut self) -> String {
        match self {
            Self::Bounded(marker) => {
                let mut m = std::mem::take(marker);
                m.clear();
                m
            }
            _ => String::new(),
        }
    }

    /// Overwrite with `other`, reusing the marker allocation when possible.
    pub fn set(&mut self, other: &Escaping) {
        if let (Self::Bounded(mine), Self::Bounded(theirs)) = (&mut *self, other) {
            mine.clear();
            mine.push_str(theirs);
            return;
        }
        *self = other.clone();
    }
}

/// Marker that turns a node or attribute into a special one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecialType {
    /// `#`
    Comment,
    /// `&`
    Meta,
    /// `%`
    Instruction,
    /// `?`
    Syntax,
}

impl SpecialType {
    /// Map a marker character to its special type.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '#' => Some(Self::Comment),
            '&' => Some(Self::Meta),
            '%' => Some(Self::Instruction),
            '?' => Some(Self::Syntax),
            _ => None,
        }
    }

    /// The marker character.
    pub fn as_char(self) -> char {
        match self {
            Self::Comment => '#',
            Self::Meta => '&',
            Self::Instruction => '%',
            Self::Syntax => '?',
        }
    }

    /// The marker as a string slice.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Comment => "#",
            Self::Meta => "&",
            Self::Instruction => "%",
            Self::Syntax => "?",
        }
    }
}

impl fmt::Display for SpecialType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a node is written with `<...>` markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NodeKind {
    /// Explicit `<...>` node, possibly named, with attributes.
    #[default]
    Standard,
    /// Bare value: raw or quoted text, `[...]`, `{...}` or a mixed body.
    Simple,
}

/// Shape of a node's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BodyType {
    /// No body: `<a>`.
    #[default]
    Empty,
    /// `[ ... ]`
    List,
    /// `{ ... }`
    Map,
    /// A single text value.
    Text,
    /// `` `...` ``
    Mixed,
    /// `` ~`...` ``
    MixedFormattable,
}

impl BodyType {
    /// Whether the body interleaves text runs and nodes.
    #[inline]
    pub fn is_mixed(self) -> bool {
        matches!(self, Self::Mixed | Self::MixedFormattable)
    }

    /// Whether the body has an explicit open and close mark.
    #[inline]
    pub fn is_container(self) -> bool {
        matches!(self, Self::List | Self::Map | Self::Mixed | Self::MixedFormattable)
    }

    /// Opening mark of a container body.
    pub fn open_mark(self) -> Option<&'static str> {
        match self {
            Self::List => Some("["),
            Self::Map => Some("{"),
            Self::Mixed => Some("`"),
            Self::MixedFormattable => Some("~`"),
            Self::Empty | Self::Text => None,
        }
    }

    /// Closing mark of a container body.
    pub fn close_mark(self) -> Option<&'static str> {
        match self {
            Self::List => Some("]"),
            Self::Map => Some("}"),
            Self::Mixed | Self::MixedFormattable => Some("`"),
            Self::Empty | Self::Text => None,
        }
    }
}

/// A node name, attribute name or map key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Name {
    /// Decoded text.
    pub text: String,
    /// How the text is delimited.
    pub escaping: Escaping,
}

impl Name {
    /// Create a name with an explicit escaping.
    pub fn new(text: impl Into<String>, escaping: Escaping) -> Self {
        Self {
            text: text.into(),
            escaping,
        }
    }

    /// Create a name whose escaping is selected from its content.
    pub fn auto(text: impl Into<String>) -> Self {
        let text = text.into();
        let escaping = Escaping::select(&text);
        Self { text, escaping }
    }

    /// Whether the name is empty (anonymous node).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Overwrite in place, keeping the buffer.
    pub fn set(&mut self, text: &str, escaping: &Escaping) {
        self.text.clear();
        self.text.push_str(text);
        self.escaping.set(escaping);
    }

    /// Overwrite from another name, keeping the buffer.
    pub fn copy_from(&mut self, other: &Name) {
        self.set(&other.text, &other.escaping);
    }

    pub(crate) fn clear(&mut self) {
        self.text.clear();
        self.escaping = Escaping::Raw;
    }
}

/// An attribute value or a text body.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Value {
    /// Decoded text; `None` for a flag attribute written without `=`.
    pub text: Option<String>,
    /// How the text is delimited.
    pub escaping: Escaping,
    /// Whether whitespace inside the text may be normalized.
    pub formattable: bool,
}

impl Value {
    /// Create a value.
    pub fn new(text: impl Into<String>, escaping: Escaping, formattable: bool) -> Self {
        Self {
            text: Some(text.into()),
            escaping,
            formattable,
        }
    }

    /// The text, or `""` for a flag.
    pub fn as_str(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    /// Overwrite in place, keeping the buffer.
    pub fn set(&mut self, text: Option<&str>, escaping: &Escaping, formattable: bool) {
        match (text, &mut self.text) {
            (Some(t), Some(buf)) => {
                buf.clear();
                buf.push_str(t);
            }
            (Some(t), slot) => *slot = Some(t.to_owned()),
            (None, slot) => *slot = None,
        }
        self.escaping.set(escaping);
        self.formattable = formattable;
    }

    /// Overwrite from another value, keeping the buffer.
    pub fn copy_from(&mut self, other: &Value) {
        self.set(other.text.as_deref(), &other.escaping, other.formattable);
    }

    /// Mutable access to the text buffer, emptied and marked present.
    pub fn text_buf(&mut self) -> &mut String {
        let buf = self.text.get_or_insert_with(String::new);
        buf.clear();
        buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_escaping() {
        assert_eq!(Escaping::select("en"), Escaping::Raw);
        assert_eq!(Escaping::select(""), Escaping::Quoted);
        assert_eq!(Escaping::select("a b"), Escaping::Quoted);
    }

    #[test]
    fn test_accepts() {
        assert!(!Escaping::Raw.accepts(""));
        assert!(Escaping::Quoted.accepts(""));
        assert!(Escaping::Bounded("x".into()).accepts("'\""));
    }

    #[test]
    fn test_special_round_trip() {
        for c in ['#', '&', '%', '?'] {
            let special = SpecialType::from_char(c).unwrap();
            assert_eq!(special.as_char(), c);
        }
        assert_eq!(SpecialType::from_char('!'), None);
    }

    #[test]
    fn test_value_set_keeps_flag() {
        let mut v = Value::new("x", Escaping::Raw, false);
        v.set(None, &Escaping::Raw, false);
        assert_eq!(v.text, None);
        assert_eq!(v.as_str(), "");
        v.set(Some("y z"), &Escaping::Quoted, true);
        assert_eq!(v.text.as_deref(), Some("y z"));
        assert!(v.formattable);
    }
}
