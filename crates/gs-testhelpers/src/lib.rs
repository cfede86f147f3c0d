//! Test helpers for the GS crates.
//!
//! Pooled events cannot be kept past a callback, so tests record them as
//! owned values with [`Recorder`] and compare the recording field by field.

use std::sync::Once;

use gs_event::{
    BodyType, EventAttribute, EventNode, HandlerError, LogicalHandler, Name, NodeKind, SpecialType, Value,
};

/// Owned copy of an [`EventAttribute`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedAttribute {
    pub name: Name,
    pub value: Value,
    pub special: Option<SpecialType>,
    pub offset: usize,
    pub in_tail: bool,
}

impl From<&EventAttribute> for RecordedAttribute {
    fn from(att: &EventAttribute) -> Self {
        Self {
            name: att.name().clone(),
            value: att.value().clone(),
            special: att.special(),
            offset: att.offset(),
            in_tail: att.in_tail(),
        }
    }
}

/// Owned copy of an [`EventNode`] as seen by one callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedNode {
    pub kind: NodeKind,
    pub special: Option<SpecialType>,
    pub name: Name,
    pub body: BodyType,
    pub depth: usize,
    pub holder: Option<Name>,
    pub head: Vec<RecordedAttribute>,
    pub tail: Vec<RecordedAttribute>,
    /// Text handed to `start_node`; always `None` for `end_node`.
    pub text: Option<Value>,
}

impl RecordedNode {
    fn capture(node: EventNode<'_>, text: Option<&Value>) -> Self {
        Self {
            kind: node.kind(),
            special: node.special(),
            name: node.name().clone(),
            body: node.body_type(),
            depth: node.depth(),
            holder: node.holder().cloned(),
            head: node.head_attributes().iter().map(Into::into).collect(),
            tail: node.tail_attributes().iter().map(Into::into).collect(),
            text: text.cloned(),
        }
    }

    /// Text of the body, `""` when there is none.
    pub fn text_str(&self) -> &str {
        self.text.as_ref().map_or("", Value::as_str)
    }
}

/// One recorded logical event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recorded {
    Start(RecordedNode),
    End(RecordedNode),
}

impl Recorded {
    /// The node of this event.
    pub fn node(&self) -> &RecordedNode {
        match self {
            Recorded::Start(n) | Recorded::End(n) => n,
        }
    }

    pub fn is_start(&self) -> bool {
        matches!(self, Recorded::Start(_))
    }
}

/// [`LogicalHandler`] storing every event as an owned [`Recorded`].
#[derive(Debug, Default)]
pub struct Recorder {
    pub events: Vec<Recorded>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// The `start_node` events, in order.
    pub fn starts(&self) -> impl Iterator<Item = &RecordedNode> {
        self.events.iter().filter(|e| e.is_start()).map(Recorded::node)
    }

    /// Compact one-line-per-event outline, handy in assertions.
    ///
    /// `+` starts and `-` ends a node, followed by its depth, its name (or
    /// `_` when anonymous) and its body type.
    pub fn outline(&self) -> Vec<String> {
        self.events
            .iter()
            .map(|e| {
                let n = e.node();
                let sign = if e.is_start() { '+' } else { '-' };
                let name = if n.name.is_empty() { "_" } else { n.name.text.as_str() };
                format!("{sign}{} {name} {:?}", n.depth, n.body)
            })
            .collect()
    }
}

impl LogicalHandler for Recorder {
    fn start_node(&mut self, node: EventNode<'_>, text: Option<&Value>) -> Result<(), HandlerError> {
        self.events.push(Recorded::Start(RecordedNode::capture(node, text)));
        Ok(())
    }

    fn end_node(&mut self, node: EventNode<'_>) -> Result<(), HandlerError> {
        self.events.push(Recorded::End(RecordedNode::capture(node, None)));
        Ok(())
    }
}

/// Install a `tracing` subscriber writing to the test output, once per process.
///
/// Honors `RUST_LOG`.
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}
