//! Parser for GS (generic syntax).
//!
//! [`Parser`] reads GS text from a [`Source`] and reports it to a
//! [`gs_event::LogicalHandler`] as `start_node`/`end_node` pairs. Parsing stops
//! at the first error; nothing is recovered.

mod diagnostic;
mod error;
mod parser;
mod source;

pub use error::{ErrorCategory, ParseError, ParseErrorKind};
pub use parser::Parser;
pub use source::{Source, StrSource};
