//! Logical-to-syntax handlers.
//!
//! Each handler here turns `start_node`/`end_node` pairs into the flat token
//! stream of a [`SyntaxHandler`], deciding where whitespace goes:
//!
//! - [`MinifiedLh`] writes no whitespace beyond what keeps tokens apart
//! - [`PrettyLh`] adds single spaces between attributes and around bodies
//! - [`IndentLh`] puts children of lists and maps on their own indented lines
//! - [`FormatLh`] lays out like [`IndentLh`] within a line width

use gs_event::{BodyType, EventAttribute, EventNode, HandlerError, LogicalHandler, SyntaxHandler, Value};

use crate::options::Indent;

/// Emit the tokens opening `node`.
///
/// `spaced` inserts the single spaces of the pretty layout.
fn start_tokens<S: SyntaxHandler>(
    handler: &mut S,
    node: EventNode<'_>,
    text: Option<&Value>,
    spaced: bool,
) -> Result<(), HandlerError> {
    if let Some(holder) = node.holder() {
        let is_null = node.is_simple() && node.body_type() == BodyType::Empty;
        handler.property(holder, is_null, None)?;
        if is_null {
            return Ok(());
        }
        if spaced {
            handler.white_spaces(" ")?;
        }
    }
    if !node.is_simple() {
        handler.head_node(node.name(), node.special())?;
        if !spaced && node.name().is_empty() && !node.head_attributes().is_empty() {
            // `<a=1>` would read as a node named `a`.
            handler.white_spaces(" ")?;
        }
        attributes(handler, node.head_attributes(), spaced)?;
        if spaced && node.body_type() != BodyType::Empty {
            handler.white_spaces(" ")?;
        }
    }
    match node.body_type() {
        BodyType::Empty => Ok(()),
        BodyType::Text => match text {
            Some(text) => handler.text(text, node.is_simple() && node.in_mixed()),
            None => Ok(()),
        },
        body => handler.start_body(body),
    }
}

/// Emit the tokens closing `node`: body end, tail attributes, `>`.
fn end_tokens<S: SyntaxHandler>(handler: &mut S, node: EventNode<'_>, spaced: bool) -> Result<(), HandlerError> {
    let body = node.body_type();
    if body.is_container() {
        handler.end_body(body)?;
    }
    if !node.is_simple() {
        attributes(handler, node.tail_attributes(), spaced)?;
        handler.tail_node()?;
    }
    Ok(())
}

fn attributes<S: SyntaxHandler>(handler: &mut S, atts: &[EventAttribute], spaced: bool) -> Result<(), HandlerError> {
    for att in atts {
        if spaced {
            handler.white_spaces(" ")?;
        }
        handler.attribute(att.name(), att.value(), att.special(), None, None)?;
    }
    Ok(())
}

macro_rules! layout_accessors {
    ($ty:ident) => {
        impl<S> $ty<S> {
            /// The downstream syntax handler.
            pub fn handler(&self) -> &S {
                &self.handler
            }

            /// Mutable access to the downstream handler.
            pub fn handler_mut(&mut self) -> &mut S {
                &mut self.handler
            }

            /// Consume the layout and return the downstream handler.
            pub fn into_handler(self) -> S {
                self.handler
            }
        }
    };
}

/// Minified layout.
#[derive(Debug, Default)]
pub struct MinifiedLh<S> {
    handler: S,
}

impl<S> MinifiedLh<S> {
    pub fn new(handler: S) -> Self {
        Self { handler }
    }
}

layout_accessors!(MinifiedLh);

impl<S: SyntaxHandler> LogicalHandler for MinifiedLh<S> {
    fn start_node(&mut self, node: EventNode<'_>, text: Option<&Value>) -> Result<(), HandlerError> {
        start_tokens(&mut self.handler, node, text, false)
    }

    fn end_node(&mut self, node: EventNode<'_>) -> Result<(), HandlerError> {
        end_tokens(&mut self.handler, node, false)
    }
}

/// Pretty layout: single spaces between attributes, after map keys and
/// before bodies, without line breaks.
#[derive(Debug, Default)]
pub struct PrettyLh<S> {
    handler: S,
}

impl<S> PrettyLh<S> {
    pub fn new(handler: S) -> Self {
        Self { handler }
    }
}

layout_accessors!(PrettyLh);

impl<S: SyntaxHandler> LogicalHandler for PrettyLh<S> {
    fn start_node(&mut self, node: EventNode<'_>, text: Option<&Value>) -> Result<(), HandlerError> {
        start_tokens(&mut self.handler, node, text, true)
    }

    fn end_node(&mut self, node: EventNode<'_>) -> Result<(), HandlerError> {
        end_tokens(&mut self.handler, node, true)
    }
}

/// Indentation strings per depth, built on first use.
#[derive(Debug, Clone)]
pub struct IndentMemo {
    unit: Indent,
    levels: Vec<String>,
}

impl IndentMemo {
    pub fn new(unit: Indent) -> Self {
        Self {
            unit,
            levels: vec![String::new()],
        }
    }

    pub fn unit(&self) -> Indent {
        self.unit
    }

    /// `depth` repetitions of the unit.
    pub fn get(&mut self, depth: usize) -> &str {
        while self.levels.len() <= depth {
            let mut next = self.levels[self.levels.len() - 1].clone();
            next.push_str(self.unit.as_str());
            self.levels.push(next);
        }
        &self.levels[depth]
    }
}

/// Indented layout.
///
/// Children of list and map bodies each go on their own line, indented one
/// unit deeper than their parent. Mixed bodies are left on one line since
/// their whitespace is content.
#[derive(Debug)]
pub struct IndentLh<S> {
    handler: S,
    indents: IndentMemo,
}

impl<S> IndentLh<S> {
    pub fn new(handler: S, indent: Indent) -> Self {
        Self {
            handler,
            indents: IndentMemo::new(indent),
        }
    }
}

layout_accessors!(IndentLh);

impl<S: SyntaxHandler> IndentLh<S> {
    fn add_indent(&mut self, parent: Option<EventNode<'_>>) -> Result<(), HandlerError> {
        match parent {
            Some(p) => {
                let spaces = self.indents.get(p.depth() + 1);
                self.handler.white_spaces(spaces)
            }
            None => Ok(()),
        }
    }
}

impl<S: SyntaxHandler> LogicalHandler for IndentLh<S> {
    fn start_node(&mut self, node: EventNode<'_>, text: Option<&Value>) -> Result<(), HandlerError> {
        if node.holder().is_some() || !node.in_mixed() {
            self.add_indent(node.parent())?;
        }
        start_tokens(&mut self.handler, node, text, true)?;
        if matches!(node.body_type(), BodyType::List | BodyType::Map) {
            self.handler.white_spaces("\n")?;
        }
        Ok(())
    }

    fn end_node(&mut self, node: EventNode<'_>) -> Result<(), HandlerError> {
        if matches!(node.body_type(), BodyType::List | BodyType::Map) {
            self.add_indent(node.parent())?;
        }
        end_tokens(&mut self.handler, node, true)?;
        if !node.in_mixed() {
            self.handler.white_spaces("\n")?;
        }
        Ok(())
    }
}

/// Indented layout bounded by a line width.
///
/// Formattable content is never reflowed: a formattable value or text longer
/// than the line width is rejected with [`HandlerError::Unsupported`].
#[derive(Debug)]
pub struct FormatLh<S> {
    inner: IndentLh<S>,
    line_width: usize,
}

impl<S> FormatLh<S> {
    pub fn new(handler: S, indent: Indent, line_width: usize) -> Self {
        Self {
            inner: IndentLh::new(handler, indent),
            line_width,
        }
    }

    pub fn line_width(&self) -> usize {
        self.line_width
    }

    pub fn handler(&self) -> &S {
        self.inner.handler()
    }

    pub fn into_handler(self) -> S {
        self.inner.into_handler()
    }

    fn check(&self, value: &Value) -> Result<(), HandlerError> {
        if !value.formattable {
            return Ok(());
        }
        let len = value.as_str().chars().count();
        if len > self.line_width {
            return Err(HandlerError::Unsupported(format!(
                "formattable content of {len} chars exceeds line width {}; reflow is not implemented",
                self.line_width
            )));
        }
        Ok(())
    }
}

impl<S: SyntaxHandler> LogicalHandler for FormatLh<S> {
    fn start_node(&mut self, node: EventNode<'_>, text: Option<&Value>) -> Result<(), HandlerError> {
        for att in node.head_attributes() {
            self.check(att.value())?;
        }
        if let Some(text) = text {
            self.check(text)?;
        }
        self.inner.start_node(node, text)
    }

    fn end_node(&mut self, node: EventNode<'_>) -> Result<(), HandlerError> {
        for att in node.tail_attributes() {
            self.check(att.value())?;
        }
        self.inner.end_node(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    #[test]
    fn test_indent_memo_levels() {
        let mut memo = IndentMemo::new(Indent::Tab);
        assert_eq!(memo.get(0), "");
        assert_eq!(memo.get(3), "\t\t\t");
        assert_eq!(memo.get(1), "\t");
    }

    proptest! {
        #[test]
        fn indent_is_unit_repeated(spaces in 0u8..=5, depth in 0usize..40) {
            let unit = Indent::spaces(spaces).unwrap();
            let mut memo = IndentMemo::new(unit);
            prop_assert_eq!(memo.get(depth), unit.as_str().repeat(depth));
        }
    }
}
