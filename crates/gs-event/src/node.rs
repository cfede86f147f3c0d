//! Pooled event records.
//!
//! Producers (the parser, the builder, re-emitting decorators) own a
//! [`NodePool`]: one [`NodeRecord`] per depth, created the first time that
//! depth is reached and reset, never reallocated, for every later node at the
//! same depth. Handlers see a record through an [`EventNode`] borrowed for the
//! duration of one callback. Nothing received in a callback may be kept past
//! it: the next sibling or child overwrites the same record. Copy what you
//! need into owned values.

use std::ops::Deref;

use crate::model::{BodyType, Escaping, Name, NodeKind, SpecialType, Value};

/// One attribute of a node, in its head or in its tail.
#[derive(Debug, Clone, Default)]
pub struct EventAttribute {
    name: Name,
    value: Value,
    special: Option<SpecialType>,
    offset: usize,
    in_tail: bool,
}

impl EventAttribute {
    /// Attribute name.
    #[inline]
    pub fn name(&self) -> &Name {
        &self.name
    }

    /// Attribute value; `value().text` is `None` for a flag attribute.
    #[inline]
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Special marker, if any.
    #[inline]
    pub fn special(&self) -> Option<SpecialType> {
        self.special
    }

    /// Position among the attributes of the same list, starting at 0.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Whether the attribute was written after the body.
    #[inline]
    pub fn in_tail(&self) -> bool {
        self.in_tail
    }

    /// Mutable name, for producers.
    pub fn name_mut(&mut self) -> &mut Name {
        &mut self.name
    }

    /// Mutable value, for producers.
    pub fn value_mut(&mut self) -> &mut Value {
        &mut self.value
    }

    fn reset(&mut self, special: Option<SpecialType>, offset: usize, in_tail: bool) {
        self.name.clear();
        self.value.set(None, &Escaping::Raw, false);
        self.special = special;
        self.offset = offset;
        self.in_tail = in_tail;
    }
}

/// Attribute records of one list, reused across nodes.
#[derive(Debug, Clone, Default)]
struct AttributeList {
    items: Vec<EventAttribute>,
    len: usize,
}

impl AttributeList {
    fn clear(&mut self) {
        self.len = 0;
    }

    fn push(&mut self, special: Option<SpecialType>, in_tail: bool) -> &mut EventAttribute {
        if self.len == self.items.len() {
            self.items.push(EventAttribute::default());
        }
        let offset = self.len;
        self.len += 1;
        let att = &mut self.items[offset];
        att.reset(special, offset, in_tail);
        att
    }

    fn as_slice(&self) -> &[EventAttribute] {
        &self.items[..self.len]
    }

    fn last_mut(&mut self) -> Option<&mut EventAttribute> {
        self.len.checked_sub(1).map(|i| &mut self.items[i])
    }
}

/// Mutable node record owned by a [`NodePool`].
#[derive(Debug, Clone, Default)]
pub struct NodeRecord {
    kind: NodeKind,
    special: Option<SpecialType>,
    name: Name,
    body: BodyType,
    depth: usize,
    holder: Name,
    has_holder: bool,
    head: AttributeList,
    tail: AttributeList,
}

impl NodeRecord {
    fn with_depth(depth: usize) -> Self {
        Self {
            depth,
            ..Self::default()
        }
    }

    /// Standard or simple node.
    #[inline]
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Whether the node is written without `<...>` markers.
    #[inline]
    pub fn is_simple(&self) -> bool {
        self.kind == NodeKind::Simple
    }

    /// Special marker of a standard node.
    #[inline]
    pub fn special(&self) -> Option<SpecialType> {
        self.special
    }

    /// Node name; empty for anonymous and simple nodes.
    #[inline]
    pub fn name(&self) -> &Name {
        &self.name
    }

    /// Body shape.
    #[inline]
    pub fn body_type(&self) -> BodyType {
        self.body
    }

    /// Whether the body is mixed content.
    #[inline]
    pub fn is_body_mixed(&self) -> bool {
        self.body.is_mixed()
    }

    /// 0 for root-level nodes, parent depth + 1 otherwise.
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Map key this node was declared under, when its parent is a map.
    #[inline]
    pub fn holder(&self) -> Option<&Name> {
        self.has_holder.then_some(&self.holder)
    }

    /// Attributes written before the body.
    #[inline]
    pub fn head_attributes(&self) -> &[EventAttribute] {
        self.head.as_slice()
    }

    /// Attributes written after the body. Always empty in `start_node`.
    #[inline]
    pub fn tail_attributes(&self) -> &[EventAttribute] {
        self.tail.as_slice()
    }

    /// Mutable name, for producers.
    pub fn name_mut(&mut self) -> &mut Name {
        &mut self.name
    }

    /// Set the body shape.
    pub fn set_body_type(&mut self, body: BodyType) {
        self.body = body;
    }

    /// Set the map key this node is declared under.
    pub fn set_holder(&mut self, holder: &Name) {
        self.holder.copy_from(holder);
        self.has_holder = true;
    }

    /// Append an attribute to the head or the tail list and return it for filling.
    pub fn push_attribute(&mut self, special: Option<SpecialType>, in_tail: bool) -> &mut EventAttribute {
        if in_tail {
            self.tail.push(special, true)
        } else {
            self.head.push(special, false)
        }
    }

    /// Append a copy of `att` to the list it came from.
    pub fn push_attribute_from(&mut self, att: &EventAttribute) -> &mut EventAttribute {
        let copy = self.push_attribute(att.special, att.in_tail);
        copy.name.copy_from(&att.name);
        copy.value.copy_from(&att.value);
        copy
    }

    /// Last attribute pushed to the head or the tail list.
    pub fn last_attribute_mut(&mut self, in_tail: bool) -> Option<&mut EventAttribute> {
        if in_tail {
            self.tail.last_mut()
        } else {
            self.head.last_mut()
        }
    }

    /// Copy kind, special type, name, body and holder of `other`; attributes are left empty.
    pub fn copy_head_from(&mut self, other: &NodeRecord) {
        self.kind = other.kind;
        self.special = other.special;
        self.name.copy_from(&other.name);
        self.body = other.body;
        match other.holder() {
            Some(holder) => self.set_holder(holder),
            None => self.has_holder = false,
        }
    }

    fn reset(&mut self, kind: NodeKind, special: Option<SpecialType>) {
        self.kind = kind;
        self.special = special;
        self.name.clear();
        self.body = BodyType::Empty;
        self.has_holder = false;
        self.head.clear();
        self.tail.clear();
    }
}

/// Depth-indexed arena of node records.
#[derive(Debug, Default)]
pub struct NodePool {
    records: Vec<NodeRecord>,
    open: usize,
}

impl NodePool {
    /// Create an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a node one level below the current one and return its reset record.
    pub fn push(&mut self, kind: NodeKind, special: Option<SpecialType>) -> &mut NodeRecord {
        let depth = self.open;
        if depth == self.records.len() {
            self.records.push(NodeRecord::with_depth(depth));
        }
        self.open += 1;
        let record = &mut self.records[depth];
        record.reset(kind, special);
        record
    }

    /// Close the innermost node. Its record stays allocated for reuse.
    pub fn pop(&mut self) {
        debug_assert!(self.open > 0, "pop on an empty node pool");
        self.open = self.open.saturating_sub(1);
    }

    /// Forget every open node, keeping the records.
    pub fn clear(&mut self) {
        self.open = 0;
    }

    /// Number of open nodes.
    #[inline]
    pub fn open(&self) -> usize {
        self.open
    }

    /// Whether no node is open.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.open == 0
    }

    /// Number of records ever allocated, which is the deepest depth reached + 1.
    #[inline]
    pub fn allocated(&self) -> usize {
        self.records.len()
    }

    /// View of the innermost open node.
    pub fn top(&self) -> Option<EventNode<'_>> {
        (self.open > 0).then(|| EventNode {
            chain: &self.records[..self.open],
        })
    }

    /// Mutable record of the innermost open node.
    pub fn top_mut(&mut self) -> Option<&mut NodeRecord> {
        self.open.checked_sub(1).map(|i| &mut self.records[i])
    }
}

/// Borrowed view of a pooled node, valid for one handler callback.
///
/// Dereferences to the [`NodeRecord`]; [`EventNode::parent`] walks up to the
/// enclosing nodes, which are still open while their child is reported.
#[derive(Debug, Clone, Copy)]
pub struct EventNode<'a> {
    chain: &'a [NodeRecord],
}

impl<'a> EventNode<'a> {
    /// The record behind this view.
    #[inline]
    pub fn record(&self) -> &'a NodeRecord {
        // A view is only ever built over a non-empty chain.
        &self.chain[self.chain.len() - 1]
    }

    /// The enclosing node, `None` at root level.
    pub fn parent(&self) -> Option<EventNode<'a>> {
        let len = self.chain.len();
        (len > 1).then(|| EventNode {
            chain: &self.chain[..len - 1],
        })
    }

    /// Whether the parent node has a mixed body.
    pub fn in_mixed(&self) -> bool {
        self.parent().is_some_and(|p| p.is_body_mixed())
    }

    /// First head attribute named `name` with the given special type.
    pub fn attribute(&self, name: &str, special: Option<SpecialType>) -> Option<&'a EventAttribute> {
        self.record()
            .head_attributes()
            .iter()
            .find(|a| a.name.text == name && a.special == special)
    }

    /// Text of the standard head attribute `name`; `None` if absent or a flag.
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.attribute(name, None).and_then(|a| a.value.text.as_deref())
    }
}

impl Deref for EventNode<'_> {
    type Target = NodeRecord;

    fn deref(&self) -> &NodeRecord {
        self.record()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_reuses_records_per_depth() {
        let mut pool = NodePool::new();
        pool.push(NodeKind::Standard, None).name_mut().set("a", &Escaping::Raw);
        pool.push(NodeKind::Simple, None);
        assert_eq!(pool.top().unwrap().depth(), 1);
        assert_eq!(pool.top().unwrap().parent().unwrap().name().text, "a");
        pool.pop();
        pool.push(NodeKind::Simple, None);
        pool.pop();
        pool.pop();
        pool.push(NodeKind::Standard, Some(SpecialType::Comment));
        let top = pool.top().unwrap();
        assert_eq!(top.depth(), 0);
        assert!(top.name().is_empty());
        assert_eq!(top.special(), Some(SpecialType::Comment));
        assert_eq!(pool.allocated(), 2);
    }

    #[test]
    fn test_attribute_offsets_per_list() {
        let mut pool = NodePool::new();
        let rec = pool.push(NodeKind::Standard, None);
        for (i, n) in ["a", "b", "c"].iter().enumerate() {
            let att = rec.push_attribute(None, false);
            att.name_mut().set(n, &Escaping::Raw);
            assert_eq!(att.offset(), i);
        }
        let tail = rec.push_attribute(None, true);
        assert_eq!(tail.offset(), 0);
        assert!(tail.in_tail());

        let offsets: Vec<_> = rec.head_attributes().iter().map(|a| a.offset()).collect();
        assert_eq!(offsets, [0, 1, 2]);
        assert_eq!(rec.tail_attributes().len(), 1);

        // A reset record drops its attributes but keeps their storage.
        let rec = {
            pool.pop();
            pool.push(NodeKind::Standard, None)
        };
        assert!(rec.head_attributes().is_empty());
        assert!(rec.tail_attributes().is_empty());
        let att = rec.push_attribute(None, false);
        assert_eq!(att.offset(), 0);
        assert!(att.name().is_empty());
        assert_eq!(att.value().text, None);
    }

    #[test]
    fn test_lookup_attribute() {
        let mut pool = NodePool::new();
        let rec = pool.push(NodeKind::Standard, None);
        let att = rec.push_attribute(None, false);
        att.name_mut().set("lang", &Escaping::Raw);
        att.value_mut().set(Some("en"), &Escaping::Raw, false);
        let att = rec.push_attribute(Some(SpecialType::Meta), false);
        att.name_mut().set("lang", &Escaping::Raw);
        let att = rec.push_attribute(None, false);
        att.name_mut().set("flag", &Escaping::Raw);

        let node = pool.top().unwrap();
        assert_eq!(node.attr("lang"), Some("en"));
        assert_eq!(node.attr("flag"), None);
        assert!(node.attribute("flag", None).is_some());
        assert_eq!(node.attribute("lang", Some(SpecialType::Meta)).unwrap().offset(), 1);
        assert!(node.attribute("missing", None).is_none());
    }

    #[test]
    fn test_holder_is_reset() {
        let mut pool = NodePool::new();
        pool.push(NodeKind::Simple, None).set_holder(&Name::auto("key"));
        assert_eq!(pool.top().unwrap().holder().unwrap().text, "key");
        pool.pop();
        pool.push(NodeKind::Simple, None);
        assert!(pool.top().unwrap().holder().is_none());
    }
}
