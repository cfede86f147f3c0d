//! Programmatic production of GS events.
//!
//! [`Builder`] is the counterpart of the parser: application code calls
//! `node`, `attribute`, `list`, `text`, `end` and friends, and the builder
//! reports the same `start_node`/`end_node` stream a parser would produce for
//! the equivalent text. Every call is checked against an explicit state
//! machine; calls that would produce malformed GS fail with a [`BuildError`].

mod builder;
mod error;

pub use builder::{Builder, BuilderState};
pub use error::BuildError;

#[cfg(test)]
mod tests;
