//! Errors of the convenience functions.

use std::fmt;

use gs_build::BuildError;
use gs_event::HandlerError;
use gs_parse::ParseError;

/// Any failure of [`reformat`](crate::reformat) or [`build_string`](crate::build_string).
#[derive(Debug)]
pub enum Error {
    Parse(ParseError),
    Build(BuildError),
    /// Output could not be written.
    Handler(HandlerError),
}

impl Error {
    /// The handler error behind this one, wherever it surfaced.
    pub fn handler_error(&self) -> Option<&HandlerError> {
        match self {
            Error::Parse(ParseError {
                kind: gs_parse::ParseErrorKind::Handler(e),
                ..
            })
            | Error::Build(BuildError::Handler(e))
            | Error::Handler(e) => Some(e),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Parse(e) => write!(f, "parse error: {e}"),
            Error::Build(e) => write!(f, "build error: {e}"),
            Error::Handler(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Parse(e) => Some(e),
            Error::Build(e) => Some(e),
            Error::Handler(e) => Some(e),
        }
    }
}

impl From<ParseError> for Error {
    fn from(e: ParseError) -> Self {
        Error::Parse(e)
    }
}

impl From<BuildError> for Error {
    fn from(e: BuildError) -> Self {
        Error::Build(e)
    }
}

impl From<HandlerError> for Error {
    fn from(e: HandlerError) -> Self {
        Error::Handler(e)
    }
}
