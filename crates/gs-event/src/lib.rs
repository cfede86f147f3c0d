//! Event model for GS (generic syntax).
//!
//! GS text and programmatic builders are both turned into the same stream of
//! structural events. This crate holds the pieces every stage shares:
//!
//! - **grammar.rs** - stateless character predicates and escaping selection
//! - **model.rs** - names, values, node kinds, special types, body types
//! - **node.rs** - the depth-indexed node pool and borrowed event views
//! - **handler.rs** - the logical and syntax handler traits
//! - **error.rs** - the error every handler can return

mod error;
mod grammar;
mod handler;
mod model;
mod node;

pub use error::HandlerError;
pub use grammar::{collapse_spaces, is_raw, is_raw_char, is_space};
pub use handler::{LogicalHandler, MultiHandler, SyntaxHandler};
pub use model::{BodyType, Escaping, Name, NodeKind, SpecialType, Value};
pub use node::{EventAttribute, EventNode, NodePool, NodeRecord};
