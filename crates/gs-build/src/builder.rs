//! Fluent GS event builder.

use std::cmp::Ordering;
use std::fmt;

use gs_event::{BodyType, Escaping, LogicalHandler, Name, NodeKind, NodePool, SpecialType, Value};
use tracing::{debug, trace};

use crate::error::BuildError;

/// Where the builder stands in the document being built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuilderState {
    /// Between top-level nodes.
    Root,
    /// A standard node is open and still accepts head attributes or a body.
    InHeadNode,
    /// An attribute was declared and may receive a value.
    InAttribute,
    InList,
    InMixed,
    InMap,
    /// A map key was declared and waits for its value.
    InProperty,
    /// The body of a standard node is done; only tail attributes may follow.
    InTailNode,
}

impl fmt::Display for BuilderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BuilderState::Root => "root",
            BuilderState::InHeadNode => "head node",
            BuilderState::InAttribute => "attribute",
            BuilderState::InList => "list",
            BuilderState::InMixed => "mixed",
            BuilderState::InMap => "map",
            BuilderState::InProperty => "property",
            BuilderState::InTailNode => "tail node",
        })
    }
}

/// Escaping used when the caller gave none: raw when the content allows it,
/// quoted otherwise. Formattable content is never raw.
fn auto_escaping(text: &str, escaping: Option<Escaping>, formattable: bool) -> Escaping {
    match escaping {
        Some(Escaping::Raw) | None if formattable => Escaping::Quoted,
        Some(escaping) => escaping,
        None => Escaping::select(text),
    }
}

/// Builder reporting nodes to a [`LogicalHandler`].
///
/// Every operation returns `&mut Self` so calls chain with `?`:
///
/// ```ignore
/// b.node("html")?.attribute("lang")?.value("en")?.list_with(|b| {
///     b.node("body")?.mixed(false)?.text("hello")?.end()?;
///     Ok(())
/// })?.end()?;
/// ```
///
/// A node's `start_node` is reported once its head is complete, that is
/// when its body starts or when it ends; `end_node` carries the tail
/// attributes. Like the parser, the builder reuses one record per depth.
#[derive(Debug)]
pub struct Builder<H> {
    handler: H,
    pool: NodePool,
    state: BuilderState,
    /// State to restore when the innermost construct closes.
    stack: Vec<BuilderState>,
    /// The innermost node is open but its `start_node` was not reported yet.
    pending_start: bool,
    text: Value,
    /// Pending map key.
    key: Name,
}

impl<H: LogicalHandler> Builder<H> {
    /// Create a builder reporting to `handler`.
    pub fn new(handler: H) -> Self {
        Self {
            handler,
            pool: NodePool::new(),
            state: BuilderState::Root,
            stack: Vec::new(),
            pending_start: false,
            text: Value::default(),
            key: Name::default(),
        }
    }

    /// The current state.
    pub fn state(&self) -> BuilderState {
        self.state
    }

    /// Number of constructs currently open.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// The handler receiving events.
    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Mutable access to the handler.
    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    /// Check that everything was closed and return the handler.
    pub fn finish(self) -> Result<H, BuildError> {
        if self.state != BuilderState::Root || !self.stack.is_empty() {
            debug!(state = %self.state, depth = self.stack.len(), "finish with open constructs");
            return Err(BuildError::UnclosedConstruct {
                expected: 0,
                actual: self.stack.len(),
            });
        }
        Ok(self.handler)
    }

    /// Open a standard node; the escaping of `name` is selected from its content.
    ///
    /// An empty name opens an anonymous node. A node still open in the head
    /// or tail state is ended first.
    pub fn node(&mut self, name: &str) -> Result<&mut Self, BuildError> {
        self.open_node("node", None, name, Escaping::select(name))
    }

    /// Open a standard node with an explicit name escaping.
    pub fn node_esc(&mut self, name: &str, escaping: Escaping) -> Result<&mut Self, BuildError> {
        self.open_node("node", None, name, escaping)
    }

    /// Open a comment, meta, instruction or syntax node.
    pub fn node_special(&mut self, special: SpecialType, name: &str) -> Result<&mut Self, BuildError> {
        self.open_node("node_special", Some(special), name, Escaping::select(name))
    }

    /// Declare an attribute; without a following [`value`](Self::value) it is a flag.
    ///
    /// Issued while the list, map or mixed body of a standard node is open,
    /// it closes that body and starts the node's tail attributes.
    pub fn attribute(&mut self, name: &str) -> Result<&mut Self, BuildError> {
        self.open_attribute("attribute", None, name, Escaping::select(name))
    }

    /// Declare an attribute with an explicit name escaping.
    pub fn attribute_esc(&mut self, name: &str, escaping: Escaping) -> Result<&mut Self, BuildError> {
        self.open_attribute("attribute", None, name, escaping)
    }

    /// Declare a special attribute such as `#note` or `&lang`.
    pub fn attribute_special(&mut self, special: SpecialType, name: &str) -> Result<&mut Self, BuildError> {
        self.open_attribute("attribute", Some(special), name, Escaping::select(name))
    }

    /// Set the value of the attribute just declared.
    pub fn value(&mut self, value: &str) -> Result<&mut Self, BuildError> {
        self.value_with(value, None, false)
    }

    /// Set the value of the attribute just declared, with an explicit escaping
    /// and formattable flag.
    pub fn value_with(
        &mut self,
        value: &str,
        escaping: Option<Escaping>,
        formattable: bool,
    ) -> Result<&mut Self, BuildError> {
        let from = self.state;
        if self.state != BuilderState::InAttribute {
            return Err(self.illegal("value"));
        }
        let in_tail = self.stack.last() == Some(&BuilderState::InTailNode);
        let escaping = auto_escaping(value, escaping, formattable);
        let Some(att) = self.pool.top_mut().and_then(|r| r.last_attribute_mut(in_tail)) else {
            return Err(self.illegal("value"));
        };
        att.value_mut().set(Some(value), &escaping, formattable);
        self.pop_state();
        self.moved("value", from);
        Ok(self)
    }

    /// Add text: the body of the open node, an item of a list, the value of a
    /// map key, a run of a mixed body, or a top-level simple node.
    pub fn text(&mut self, text: &str) -> Result<&mut Self, BuildError> {
        self.text_with(text, None, false)
    }

    /// Add text with an explicit escaping and formattable flag.
    ///
    /// A standard node's text is never raw. Runs of a mixed body are always
    /// quoted and formattable exactly when the mixed body is.
    pub fn text_with(&mut self, text: &str, escaping: Option<Escaping>, formattable: bool) -> Result<&mut Self, BuildError> {
        let from = self.state;
        self.close_attribute();
        if self.state == BuilderState::InTailNode {
            self.end_node()?;
        }
        match self.state {
            BuilderState::InHeadNode => {
                let escaping = match auto_escaping(text, escaping, formattable) {
                    Escaping::Raw => Escaping::Quoted,
                    other => other,
                };
                self.text.set(Some(text), &escaping, formattable);
                if let Some(record) = self.pool.top_mut() {
                    record.set_body_type(BodyType::Text);
                }
                self.emit_start(true)?;
                self.state = BuilderState::InTailNode;
            }
            BuilderState::Root | BuilderState::InList | BuilderState::InProperty => {
                let held = self.state == BuilderState::InProperty;
                self.text
                    .set(Some(text), &auto_escaping(text, escaping, formattable), formattable);
                self.simple_node(BodyType::Text, held)?;
                if held {
                    self.state = BuilderState::InMap;
                }
            }
            BuilderState::InMixed => {
                let formattable = self
                    .pool
                    .top()
                    .is_some_and(|n| n.body_type() == BodyType::MixedFormattable);
                self.text.set(Some(text), &Escaping::Quoted, formattable);
                self.simple_node(BodyType::Text, false)?;
            }
            _ => return Err(self.illegal("text")),
        }
        self.moved("text", from);
        Ok(self)
    }

    /// Open a list body.
    ///
    /// In a mixed body the list is wrapped in an anonymous node.
    pub fn list(&mut self) -> Result<&mut Self, BuildError> {
        let from = self.state;
        self.open_body("list", BodyType::List)?;
        self.moved("list", from);
        Ok(self)
    }

    /// Open a map body.
    pub fn map(&mut self) -> Result<&mut Self, BuildError> {
        let from = self.state;
        self.open_body("map", BodyType::Map)?;
        self.moved("map", from);
        Ok(self)
    }

    /// Open a mixed body.
    pub fn mixed(&mut self, formattable: bool) -> Result<&mut Self, BuildError> {
        let from = self.state;
        let body = if formattable { BodyType::MixedFormattable } else { BodyType::Mixed };
        self.open_body("mixed", body)?;
        self.moved("mixed", from);
        Ok(self)
    }

    /// Open a list body and fill it with `children`.
    ///
    /// The list stays open: `children` must leave as many constructs open as
    /// it found, and the caller ends the list.
    pub fn list_with<F>(&mut self, children: F) -> Result<&mut Self, BuildError>
    where
        F: FnOnce(&mut Self) -> Result<(), BuildError>,
    {
        self.list()?;
        self.children(children)
    }

    /// Open a map body and fill it with `children`; see [`list_with`](Self::list_with).
    pub fn map_with<F>(&mut self, children: F) -> Result<&mut Self, BuildError>
    where
        F: FnOnce(&mut Self) -> Result<(), BuildError>,
    {
        self.map()?;
        self.children(children)
    }

    /// Open a mixed body and fill it with `children`; see [`list_with`](Self::list_with).
    pub fn mixed_with<F>(&mut self, formattable: bool, children: F) -> Result<&mut Self, BuildError>
    where
        F: FnOnce(&mut Self) -> Result<(), BuildError>,
    {
        self.mixed(formattable)?;
        self.children(children)
    }

    /// Declare a map key; its value is the next node, text or body.
    ///
    /// Outside a map body a map is opened first. A key still waiting for a
    /// value gets a new map as its value, so `property("a")?.property("b")`
    /// builds `{a={b=...}}`.
    pub fn property(&mut self, name: &str) -> Result<&mut Self, BuildError> {
        self.property_esc(name, Escaping::select(name))
    }

    /// Declare a map key with an explicit escaping.
    pub fn property_esc(&mut self, name: &str, escaping: Escaping) -> Result<&mut Self, BuildError> {
        let from = self.state;
        self.close_attribute();
        match self.state {
            BuilderState::InMap => {}
            BuilderState::InHeadNode
            | BuilderState::Root
            | BuilderState::InList
            | BuilderState::InMixed
            | BuilderState::InProperty => {
                self.open_body("property", BodyType::Map)?;
            }
            _ => return Err(self.illegal("property")),
        }
        self.key.set(name, &escaping);
        self.state = BuilderState::InProperty;
        self.moved("property", from);
        Ok(self)
    }

    /// Declare a map key without value, as in `{key}`.
    ///
    /// Legal wherever [`property`](Self::property) is.
    pub fn null_property(&mut self, name: &str) -> Result<&mut Self, BuildError> {
        self.property(name)?;
        self.close_pending_key()?;
        Ok(self)
    }

    /// Close the innermost construct: a pending attribute, then a body, then a node.
    pub fn end(&mut self) -> Result<&mut Self, BuildError> {
        let from = self.state;
        self.close_attribute();
        match self.state {
            BuilderState::InProperty => {
                self.close_pending_key()?;
                self.close_body()?;
            }
            BuilderState::InList | BuilderState::InMap | BuilderState::InMixed => self.close_body()?,
            BuilderState::InHeadNode | BuilderState::InTailNode => self.end_node()?,
            _ => return Err(self.illegal("end")),
        }
        self.moved("end", from);
        Ok(self)
    }

    fn open_node(
        &mut self,
        operation: &'static str,
        special: Option<SpecialType>,
        name: &str,
        escaping: Escaping,
    ) -> Result<&mut Self, BuildError> {
        let from = self.state;
        self.close_attribute();
        if matches!(self.state, BuilderState::InHeadNode | BuilderState::InTailNode) {
            self.end_node()?;
        }
        let held = self.state == BuilderState::InProperty;
        self.push_state(self.state);
        let record = self.pool.push(NodeKind::Standard, special);
        record.name_mut().set(name, &escaping);
        if held {
            record.set_holder(&self.key);
        }
        self.pending_start = true;
        self.state = BuilderState::InHeadNode;
        self.moved(operation, from);
        Ok(self)
    }

    fn open_attribute(
        &mut self,
        operation: &'static str,
        special: Option<SpecialType>,
        name: &str,
        escaping: Escaping,
    ) -> Result<&mut Self, BuildError> {
        let from = self.state;
        let in_tail = match self.state {
            BuilderState::InHeadNode => {
                self.push_state(BuilderState::InHeadNode);
                false
            }
            BuilderState::InTailNode => {
                self.push_state(BuilderState::InTailNode);
                true
            }
            BuilderState::InAttribute => self.stack.last() == Some(&BuilderState::InTailNode),
            BuilderState::InList | BuilderState::InMap | BuilderState::InMixed | BuilderState::InProperty => {
                // Only the body of a standard node can be followed by attributes.
                if self.stack.last() != Some(&BuilderState::InHeadNode) {
                    return Err(self.illegal(operation));
                }
                if self.state == BuilderState::InProperty {
                    self.close_pending_key()?;
                }
                self.stack.pop();
                self.push_state(BuilderState::InTailNode);
                true
            }
            BuilderState::Root => return Err(self.illegal(operation)),
        };
        let Some(record) = self.pool.top_mut() else {
            return Err(self.illegal(operation));
        };
        record.push_attribute(special, in_tail).name_mut().set(name, &escaping);
        self.state = BuilderState::InAttribute;
        self.moved(operation, from);
        Ok(self)
    }

    /// Open a body in the current state and enter it.
    fn open_body(&mut self, operation: &'static str, body: BodyType) -> Result<(), BuildError> {
        self.close_attribute();
        match self.state {
            BuilderState::InMixed => {
                // Mixed content only holds text runs and `<...>` nodes.
                self.push_state(BuilderState::InMixed);
                self.pool.push(NodeKind::Standard, None);
                self.pending_start = true;
                self.open_owned_body(body)?;
            }
            BuilderState::InHeadNode => self.open_owned_body(body)?,
            BuilderState::Root | BuilderState::InList | BuilderState::InProperty => {
                let held = self.state == BuilderState::InProperty;
                self.push_state(self.state);
                let record = self.pool.push(NodeKind::Simple, None);
                record.set_body_type(body);
                if held {
                    record.set_holder(&self.key);
                }
                self.emit_start(false)?;
            }
            _ => return Err(self.illegal(operation)),
        }
        self.state = match body {
            BodyType::List => BuilderState::InList,
            BodyType::Map => BuilderState::InMap,
            _ => BuilderState::InMixed,
        };
        Ok(())
    }

    /// Give the standard node in head state its body and report its start.
    fn open_owned_body(&mut self, body: BodyType) -> Result<(), BuildError> {
        if let Some(record) = self.pool.top_mut() {
            record.set_body_type(body);
        }
        self.emit_start(false)?;
        self.push_state(BuilderState::InHeadNode);
        Ok(())
    }

    /// Leave a list, map or mixed body, ending its node.
    fn close_body(&mut self) -> Result<(), BuildError> {
        self.pop_state();
        if self.state == BuilderState::InHeadNode {
            return self.end_node();
        }
        self.emit_end()?;
        if self.state == BuilderState::InProperty {
            self.state = BuilderState::InMap;
        }
        Ok(())
    }

    /// End the standard node in head or tail state.
    fn end_node(&mut self) -> Result<(), BuildError> {
        if self.pending_start {
            self.emit_start(false)?;
        }
        self.emit_end()?;
        self.pop_state();
        if self.state == BuilderState::InProperty {
            self.state = BuilderState::InMap;
        }
        Ok(())
    }

    /// Report the pending key as a key without value.
    fn close_pending_key(&mut self) -> Result<(), BuildError> {
        self.simple_node(BodyType::Empty, true)?;
        self.state = BuilderState::InMap;
        Ok(())
    }

    /// Report a complete simple node; text bodies take the scratch text.
    fn simple_node(&mut self, body: BodyType, held: bool) -> Result<(), BuildError> {
        let record = self.pool.push(NodeKind::Simple, None);
        record.set_body_type(body);
        if held {
            record.set_holder(&self.key);
        }
        self.emit_start(body == BodyType::Text)?;
        self.emit_end()
    }

    fn emit_start(&mut self, with_text: bool) -> Result<(), BuildError> {
        self.pending_start = false;
        let Some(node) = self.pool.top() else {
            return Ok(());
        };
        let text = with_text.then_some(&self.text);
        self.handler.start_node(node, text)?;
        Ok(())
    }

    fn emit_end(&mut self) -> Result<(), BuildError> {
        if let Some(node) = self.pool.top() {
            self.handler.end_node(node)?;
        }
        self.pool.pop();
        Ok(())
    }

    fn children<F>(&mut self, children: F) -> Result<&mut Self, BuildError>
    where
        F: FnOnce(&mut Self) -> Result<(), BuildError>,
    {
        let expected = self.stack.len();
        children(self)?;
        let actual = self.stack.len();
        match actual.cmp(&expected) {
            Ordering::Equal => Ok(self),
            Ordering::Less => Err(BuildError::UnbalancedEnd { expected, actual }),
            Ordering::Greater => Err(BuildError::UnclosedConstruct { expected, actual }),
        }
    }

    fn close_attribute(&mut self) {
        if self.state == BuilderState::InAttribute {
            self.pop_state();
        }
    }

    fn push_state(&mut self, state: BuilderState) {
        self.stack.push(state);
    }

    fn pop_state(&mut self) {
        self.state = self.stack.pop().unwrap_or(BuilderState::Root);
    }

    fn illegal(&self, operation: &'static str) -> BuildError {
        debug!(operation, state = %self.state, "builder operation rejected");
        BuildError::IllegalState {
            operation,
            state: self.state,
        }
    }

    fn moved(&self, operation: &'static str, from: BuilderState) {
        trace!(operation, from = %from, to = %self.state, "builder transition");
    }
}
