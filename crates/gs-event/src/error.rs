//! Error returned by handlers and writers.

use std::fmt;

/// Failure raised by a handler, a decorator or a writer.
///
/// Producers stop at the first error and hand it back to their caller
/// unchanged; there is no partial output mode.
#[derive(Debug)]
pub enum HandlerError {
    /// The underlying output failed.
    Io(std::io::Error),
    /// The requested transformation is not supported for this input.
    Unsupported(String),
    /// Any other handler-defined failure.
    Custom(String),
}

impl HandlerError {
    /// Create a custom error.
    pub fn custom(msg: impl fmt::Display) -> Self {
        Self::Custom(msg.to_string())
    }
}

impl fmt::Display for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandlerError::Io(e) => write!(f, "write failed: {e}"),
            HandlerError::Unsupported(what) => write!(f, "unsupported: {what}"),
            HandlerError::Custom(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for HandlerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HandlerError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for HandlerError {
    fn from(e: std::io::Error) -> Self {
        HandlerError::Io(e)
    }
}
