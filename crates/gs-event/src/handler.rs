//! The two event interfaces.
//!
//! A [`LogicalHandler`] receives the tree: one `start_node`/`end_node` pair per
//! node, nested bodies fully reported in between. A [`SyntaxHandler`] receives
//! the flat token stream a serializer needs, including whitespace.

use crate::error::HandlerError;
use crate::model::{BodyType, Name, SpecialType, Value};
use crate::node::EventNode;

/// Consumer of tree-shaped events.
///
/// `node` is borrowed for the call only; see [`crate::NodePool`].
pub trait LogicalHandler {
    /// A node starts. `text` is present exactly when the body type is `Text`.
    fn start_node(&mut self, node: EventNode<'_>, text: Option<&Value>) -> Result<(), HandlerError>;

    /// A node ends. Tail attributes are only visible here.
    fn end_node(&mut self, node: EventNode<'_>) -> Result<(), HandlerError>;
}

impl<H: LogicalHandler + ?Sized> LogicalHandler for &mut H {
    fn start_node(&mut self, node: EventNode<'_>, text: Option<&Value>) -> Result<(), HandlerError> {
        (**self).start_node(node, text)
    }

    fn end_node(&mut self, node: EventNode<'_>) -> Result<(), HandlerError> {
        (**self).end_node(node)
    }
}

impl<H: LogicalHandler + ?Sized> LogicalHandler for Box<H> {
    fn start_node(&mut self, node: EventNode<'_>, text: Option<&Value>) -> Result<(), HandlerError> {
        (**self).start_node(node, text)
    }

    fn end_node(&mut self, node: EventNode<'_>) -> Result<(), HandlerError> {
        (**self).end_node(node)
    }
}

/// Consumer of flat, whitespace-aware tokens.
///
/// A node arrives as `head_node`, its head `attribute`s, then either
/// `start_body` ... `end_body` or a `text`, then its tail `attribute`s and
/// `tail_node`. Simple nodes skip the head and tail tokens. A node declared in
/// a map body is preceded by its `property`.
pub trait SyntaxHandler {
    /// `<` followed by the special marker and the name.
    fn head_node(&mut self, name: &Name, special: Option<SpecialType>) -> Result<(), HandlerError>;

    /// One attribute, with optional whitespace around its `=`.
    fn attribute(
        &mut self,
        name: &Name,
        value: &Value,
        special: Option<SpecialType>,
        space_before: Option<&str>,
        space_after: Option<&str>,
    ) -> Result<(), HandlerError>;

    /// A text body, or a text run when `in_mixed` is set.
    fn text(&mut self, text: &Value, in_mixed: bool) -> Result<(), HandlerError>;

    /// Opening mark of a list, map or mixed body.
    fn start_body(&mut self, body: BodyType) -> Result<(), HandlerError>;

    /// A map key; `is_null` when no value follows.
    fn property(&mut self, name: &Name, is_null: bool, space_before: Option<&str>) -> Result<(), HandlerError>;

    /// Closing mark of a list, map or mixed body.
    fn end_body(&mut self, body: BodyType) -> Result<(), HandlerError>;

    /// `>` closing a standard node.
    fn tail_node(&mut self) -> Result<(), HandlerError>;

    /// Insignificant whitespace.
    fn white_spaces(&mut self, spaces: &str) -> Result<(), HandlerError>;
}

impl<S: SyntaxHandler + ?Sized> SyntaxHandler for &mut S {
    fn head_node(&mut self, name: &Name, special: Option<SpecialType>) -> Result<(), HandlerError> {
        (**self).head_node(name, special)
    }

    fn attribute(
        &mut self,
        name: &Name,
        value: &Value,
        special: Option<SpecialType>,
        space_before: Option<&str>,
        space_after: Option<&str>,
    ) -> Result<(), HandlerError> {
        (**self).attribute(name, value, special, space_before, space_after)
    }

    fn text(&mut self, text: &Value, in_mixed: bool) -> Result<(), HandlerError> {
        (**self).text(text, in_mixed)
    }

    fn start_body(&mut self, body: BodyType) -> Result<(), HandlerError> {
        (**self).start_body(body)
    }

    fn property(&mut self, name: &Name, is_null: bool, space_before: Option<&str>) -> Result<(), HandlerError> {
        (**self).property(name, is_null, space_before)
    }

    fn end_body(&mut self, body: BodyType) -> Result<(), HandlerError> {
        (**self).end_body(body)
    }

    fn tail_node(&mut self) -> Result<(), HandlerError> {
        (**self).tail_node()
    }

    fn white_spaces(&mut self, spaces: &str) -> Result<(), HandlerError> {
        (**self).white_spaces(spaces)
    }
}

/// Dispatches every logical event to several handlers, in order.
#[derive(Debug, Default)]
pub struct MultiHandler<H> {
    targets: Vec<H>,
}

impl<H: LogicalHandler> MultiHandler<H> {
    /// Create a dispatcher over `targets`.
    pub fn new(targets: Vec<H>) -> Self {
        Self { targets }
    }

    /// Add a target at the end.
    pub fn push(&mut self, target: H) {
        self.targets.push(target);
    }

    /// The targets, in dispatch order.
    pub fn targets(&self) -> &[H] {
        &self.targets
    }

    /// Give the targets back.
    pub fn into_targets(self) -> Vec<H> {
        self.targets
    }
}

impl<H: LogicalHandler> LogicalHandler for MultiHandler<H> {
    fn start_node(&mut self, node: EventNode<'_>, text: Option<&Value>) -> Result<(), HandlerError> {
        for t in &mut self.targets {
            t.start_node(node, text)?;
        }
        Ok(())
    }

    fn end_node(&mut self, node: EventNode<'_>) -> Result<(), HandlerError> {
        for t in &mut self.targets {
            t.end_node(node)?;
        }
        Ok(())
    }
}
