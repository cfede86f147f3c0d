//! Whitespace normalization of formattable content.
//!
//! Formattable attribute values and texts get every run of spaces, tabs,
//! carriage returns and line feeds collapsed to one space. Other content
//! passes through untouched. Applying it twice is the same as applying it
//! once.

use std::borrow::Cow;

use gs_event::{
    BodyType, EventNode, HandlerError, LogicalHandler, Name, NodePool, SpecialType, SyntaxHandler, Value,
    collapse_spaces,
};

/// Collapse whitespace of a formattable value in place.
fn unformat_value(value: &mut Value) {
    if !value.formattable {
        return;
    }
    let Some(text) = value.text.as_mut() else {
        return;
    };
    let collapsed = match collapse_spaces(text) {
        Cow::Owned(s) => Some(s),
        Cow::Borrowed(_) => None,
    };
    if let Some(s) = collapsed {
        *text = s;
    }
}

/// [`LogicalHandler`] re-emitting nodes with unformatted content.
///
/// Nodes are copied into a pool of its own before being forwarded, so the
/// downstream handler sees the same pooling contract as from a parser.
#[derive(Debug)]
pub struct UnformatLh<H> {
    handler: H,
    pool: NodePool,
    text: Value,
}

impl<H: LogicalHandler> UnformatLh<H> {
    pub fn new(handler: H) -> Self {
        Self {
            handler,
            pool: NodePool::new(),
            text: Value::default(),
        }
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn into_handler(self) -> H {
        self.handler
    }
}

impl<H: LogicalHandler> LogicalHandler for UnformatLh<H> {
    fn start_node(&mut self, node: EventNode<'_>, text: Option<&Value>) -> Result<(), HandlerError> {
        let record = self.pool.push(node.kind(), node.special());
        record.copy_head_from(&node);
        for att in node.head_attributes() {
            unformat_value(record.push_attribute_from(att).value_mut());
        }
        let text = match text {
            Some(t) if t.formattable => {
                self.text.copy_from(t);
                unformat_value(&mut self.text);
                Some(&self.text)
            }
            other => other,
        };
        match self.pool.top() {
            Some(copy) => self.handler.start_node(copy, text),
            None => Ok(()),
        }
    }

    fn end_node(&mut self, node: EventNode<'_>) -> Result<(), HandlerError> {
        if let Some(record) = self.pool.top_mut() {
            for att in node.tail_attributes() {
                unformat_value(record.push_attribute_from(att).value_mut());
            }
        }
        let result = match self.pool.top() {
            Some(copy) => self.handler.end_node(copy),
            None => Ok(()),
        };
        self.pool.pop();
        result
    }
}

/// [`SyntaxHandler`] forwarding tokens with unformatted content.
#[derive(Debug, Default)]
pub struct UnformatSh<S> {
    handler: S,
    value: Value,
}

impl<S> UnformatSh<S> {
    pub fn new(handler: S) -> Self {
        Self {
            handler,
            value: Value::default(),
        }
    }

    pub fn handler(&self) -> &S {
        &self.handler
    }

    pub fn into_handler(self) -> S {
        self.handler
    }

    /// `value`, or its unformatted copy when it is formattable.
    fn unformatted<'a>(scratch: &'a mut Value, value: &'a Value) -> &'a Value {
        if value.formattable && value.text.is_some() {
            scratch.copy_from(value);
            unformat_value(scratch);
            scratch
        } else {
            value
        }
    }
}

impl<S: SyntaxHandler> SyntaxHandler for UnformatSh<S> {
    fn head_node(&mut self, name: &Name, special: Option<SpecialType>) -> Result<(), HandlerError> {
        self.handler.head_node(name, special)
    }

    fn attribute(
        &mut self,
        name: &Name,
        value: &Value,
        special: Option<SpecialType>,
        space_before: Option<&str>,
        space_after: Option<&str>,
    ) -> Result<(), HandlerError> {
        let value = Self::unformatted(&mut self.value, value);
        self.handler.attribute(name, value, special, space_before, space_after)
    }

    fn text(&mut self, text: &Value, in_mixed: bool) -> Result<(), HandlerError> {
        let text = Self::unformatted(&mut self.value, text);
        self.handler.text(text, in_mixed)
    }

    fn start_body(&mut self, body: BodyType) -> Result<(), HandlerError> {
        self.handler.start_body(body)
    }

    fn property(&mut self, name: &Name, is_null: bool, space_before: Option<&str>) -> Result<(), HandlerError> {
        self.handler.property(name, is_null, space_before)
    }

    fn end_body(&mut self, body: BodyType) -> Result<(), HandlerError> {
        self.handler.end_body(body)
    }

    fn tail_node(&mut self) -> Result<(), HandlerError> {
        self.handler.tail_node()
    }

    fn white_spaces(&mut self, spaces: &str) -> Result<(), HandlerError> {
        self.handler.white_spaces(spaces)
    }
}
