//! Serialization options.

use std::fmt;
use std::str::FromStr;

/// How whitespace is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    /// Only the separators needed to keep tokens apart.
    #[default]
    Minified,
    /// Single spaces between tokens, no line breaks.
    Pretty,
    /// One child of a list or map per line, indented by depth.
    Indented,
    /// Indented within a line width.
    Formatted,
}

impl Method {
    /// Name accepted by [`FromStr`].
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Minified => "minified",
            Method::Pretty => "pretty",
            Method::Indented => "indented",
            Method::Formatted => "formatted",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = OptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "minified" => Ok(Method::Minified),
            "pretty" => Ok(Method::Pretty),
            "indented" => Ok(Method::Indented),
            "formatted" => Ok(Method::Formatted),
            other => Err(OptionError::UnknownMethod(other.to_owned())),
        }
    }
}

/// Indentation unit: nothing, a tab, or one to five spaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Indent {
    /// No indentation; lines still break.
    Empty,
    /// One tab per level.
    Tab,
    /// One space per level.
    Space1,
    /// Two spaces per level.
    #[default]
    Space2,
    /// Three spaces per level.
    Space3,
    /// Four spaces per level.
    Space4,
    /// Five spaces per level.
    Space5,
}

impl Indent {
    /// `n` spaces, for `n` in `0..=5`.
    pub fn spaces(n: u8) -> Option<Self> {
        Some(match n {
            0 => Indent::Empty,
            1 => Indent::Space1,
            2 => Indent::Space2,
            3 => Indent::Space3,
            4 => Indent::Space4,
            5 => Indent::Space5,
            _ => return None,
        })
    }

    /// The whitespace of one level.
    pub fn as_str(self) -> &'static str {
        match self {
            Indent::Empty => "",
            Indent::Tab => "\t",
            Indent::Space1 => " ",
            Indent::Space2 => "  ",
            Indent::Space3 => "   ",
            Indent::Space4 => "    ",
            Indent::Space5 => "     ",
        }
    }
}

impl FromStr for Indent {
    type Err = OptionError;

    /// `"tab"` or a number of spaces from `"0"` to `"5"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "tab" || s == "\t" {
            return Ok(Indent::Tab);
        }
        s.parse::<u8>()
            .ok()
            .and_then(Indent::spaces)
            .ok_or_else(|| OptionError::UnknownIndent(s.to_owned()))
    }
}

/// Invalid textual option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionError {
    /// Not one of `minified`, `pretty`, `indented` or `formatted`.
    UnknownMethod(String),
    /// Not `tab` or a number of spaces from 0 to 5.
    UnknownIndent(String),
}

impl fmt::Display for OptionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionError::UnknownMethod(s) => {
                write!(f, "unknown method {s:?} (expected minified, pretty, indented or formatted)")
            }
            OptionError::UnknownIndent(s) => write!(f, "unknown indent {s:?} (expected tab or 0 to 5)"),
        }
    }
}

impl std::error::Error for OptionError {}

/// Options for [`build_serializer`](crate::build_serializer).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializeOptions {
    /// Whitespace layout (default: minified)
    pub method: Method,

    /// Collapse whitespace runs in formattable content (default: false)
    pub unformat: bool,

    /// Indentation unit for indented and formatted output (default: two spaces)
    pub indent: Indent,

    /// Line width for formatted output (default: 256)
    pub line_width: usize,
}

impl Default for SerializeOptions {
    fn default() -> Self {
        Self {
            method: Method::Minified,
            unformat: false,
            indent: Indent::Space2,
            line_width: 256,
        }
    }
}

impl SerializeOptions {
    /// Minified output; same as [`Default`].
    pub fn minified() -> Self {
        Self::default()
    }

    /// Pretty output on one line.
    pub fn pretty() -> Self {
        Self {
            method: Method::Pretty,
            ..Self::default()
        }
    }

    /// Indented output using `indent` per level.
    pub fn indented(indent: Indent) -> Self {
        Self {
            method: Method::Indented,
            indent,
            ..Self::default()
        }
    }

    /// Indented output bounded by `line_width`.
    pub fn formatted(indent: Indent, line_width: usize) -> Self {
        Self {
            method: Method::Formatted,
            indent,
            line_width,
            ..Self::default()
        }
    }

    /// Turn whitespace collapsing of formattable content on or off.
    pub fn with_unformat(mut self, unformat: bool) -> Self {
        self.unformat = unformat;
        self
    }
}
