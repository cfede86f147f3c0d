//! Builder errors.

use std::fmt;

use gs_event::HandlerError;

use crate::builder::BuilderState;

/// Error during building.
#[derive(Debug)]
pub enum BuildError {
    /// The operation is not allowed in the current state.
    IllegalState {
        operation: &'static str,
        state: BuilderState,
    },
    /// A child-building closure called `end()` more times than it opened constructs.
    UnbalancedEnd { expected: usize, actual: usize },
    /// Constructs were left open by a child-building closure or at `finish()`.
    UnclosedConstruct { expected: usize, actual: usize },
    /// The handler refused an event.
    Handler(HandlerError),
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::IllegalState { operation, state } => {
                write!(f, "{operation} not allowed in '{state}' state")
            }
            BuildError::UnbalancedEnd { expected, actual } => {
                write!(f, "too many end() calls: depth {actual}, expected {expected}")
            }
            BuildError::UnclosedConstruct { expected, actual } => {
                write!(f, "not enough end() calls: depth {actual}, expected {expected}")
            }
            BuildError::Handler(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for BuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BuildError::Handler(e) => Some(e),
            _ => None,
        }
    }
}

impl From<HandlerError> for BuildError {
    fn from(e: HandlerError) -> Self {
        BuildError::Handler(e)
    }
}
