//! Recursive-descent GS parser.

use gs_event::{
    BodyType, Escaping, HandlerError, LogicalHandler, Name, NodeKind, NodePool, NodeRecord, SpecialType, Value,
    is_raw_char, is_space,
};
use tracing::{debug, trace};

use crate::error::{ParseError, ParseErrorKind};
use crate::source::{Source, StrSource};


/// Parser reporting GS text to a [`LogicalHandler`].
///
/// Nodes are reported from a depth-indexed [`NodePool`] that lives as long as
/// the parser, so repeated calls to [`Parser::parse`] reuse the same records.
pub struct Parser<H> {
    handler: H,
    pool: NodePool,
    /// Scratch value for text bodies.
    text: Value,
    /// Key of the map entry being parsed.
    holder: Name,
}

impl<H: LogicalHandler> Parser<H> {
    /// Create a parser reporting to `handler`.
    pub fn new(handler: H) -> Self {
        Self {
            handler,
            pool: NodePool::new(),
            text: Value::default(),
            holder: Name::default(),
        }
    }

    /// The handler receiving events.
    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Mutable access to the handler, e.g. to reset it between documents.
    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    /// Consume the parser and return its handler.
    pub fn into_handler(self) -> H {
        self.handler
    }

    /// Parse a whole GS document held in memory.
    pub fn parse(&mut self, source: &str) -> Result<(), ParseError> {
        self.parse_source(&mut StrSource::new(source))
    }

    /// Parse a whole GS document from any [`Source`].
    ///
    /// The first error aborts the parse; events already delivered are not
    /// retracted.
    pub fn parse_source<S: Source>(&mut self, src: &mut S) -> Result<(), ParseError> {
        self.pool.clear();
        let result = self.parse_document(src);
        if let Err(e) = &result {
            debug!(offset = e.offset, error = %e.kind, "parse failed");
            self.pool.clear();
        }
        result
    }

    fn parse_document<S: Source>(&mut self, src: &mut S) -> Result<(), ParseError> {
        while let Some(c) = src.read_char_no_space() {
            self.parse_node_like(src, c, false)?;
        }
        Ok(())
    }

    /// Parse a node or a simple node starting at `c`.
    ///
    /// `held` attaches the current map key to the node.
    fn parse_node_like<S: Source>(&mut self, src: &mut S, c: char, held: bool) -> Result<(), ParseError> {
        match c {
            '<' => return self.parse_node(src, held),
            '[' => {
                self.open(NodeKind::Simple, None, held).set_body_type(BodyType::List);
                self.start(src, false)?;
                self.parse_list(src)?;
                return self.end(src);
            }
            '{' => {
                self.open(NodeKind::Simple, None, held).set_body_type(BodyType::Map);
                self.start(src, false)?;
                self.parse_map(src)?;
                return self.end(src);
            }
            c if is_raw_char(c) => {
                self.open(NodeKind::Simple, None, held).set_body_type(BodyType::Text);
                src.read_raw_chars(c, self.text.text_buf());
                self.text.escaping = Escaping::Raw;
                self.text.formattable = false;
                self.start(src, true)?;
                return self.end(src);
            }
            _ => {}
        }

        let (formattable, c) = match c {
            '~' => (true, src.read_char()),
            c => (false, Some(c)),
        };
        match c {
            Some('`') => {
                let body = if formattable { BodyType::MixedFormattable } else { BodyType::Mixed };
                self.open(NodeKind::Simple, None, held).set_body_type(body);
                self.start(src, false)?;
                self.parse_mixed(src)?;
                self.end(src)
            }
            Some(c @ ('"' | '!')) => {
                self.open(NodeKind::Simple, None, held).set_body_type(BodyType::Text);
                self.fill_text(src, c, formattable)?;
                self.start(src, true)?;
                self.end(src)
            }
            Some(c) => Err(src.error(ParseErrorKind::UnexpectedChar(c))),
            None => Err(src.error(ParseErrorKind::UnexpectedEof)),
        }
    }

    /// Parse a standard node; the `<` has been read.
    fn parse_node<S: Source>(&mut self, src: &mut S, held: bool) -> Result<(), ParseError> {
        let Some(mut c) = src.read_char() else {
            return Err(src.error(ParseErrorKind::NodeNotEnded));
        };
        let special = SpecialType::from_char(c);
        if special.is_some() {
            let Some(next) = src.read_char() else {
                return Err(src.error(ParseErrorKind::NodeNotEnded));
            };
            c = next;
        }

        let record = self.open(NodeKind::Standard, special, held);
        let next = if fill_name(src, c, record.name_mut())? || is_space(c) {
            src.read_char_no_space()
        } else {
            Some(c)
        };
        let c = fill_attributes(src, record, next, false)?;

        match c {
            '>' => {
                self.start(src, false)?;
                return self.end(src);
            }
            '[' => {
                self.set_body(BodyType::List);
                self.start(src, false)?;
                self.parse_list(src)?;
            }
            '{' => {
                self.set_body(BodyType::Map);
                self.start(src, false)?;
                self.parse_map(src)?;
            }
            _ => {
                let (formattable, c) = match c {
                    '~' => (true, src.read_char()),
                    c => (false, Some(c)),
                };
                match c {
                    Some('`') => {
                        self.set_body(if formattable { BodyType::MixedFormattable } else { BodyType::Mixed });
                        self.start(src, false)?;
                        self.parse_mixed(src)?;
                    }
                    Some(c @ ('"' | '!')) => {
                        self.set_body(BodyType::Text);
                        self.fill_text(src, c, formattable)?;
                        self.start(src, true)?;
                    }
                    Some(c) => return Err(src.error(ParseErrorKind::UnexpectedChar(c))),
                    None => return Err(src.error(ParseErrorKind::NodeNotEnded)),
                }
            }
        }
        self.finish_tail(src)
    }

    /// Read the tail attributes and the closing `>` of the innermost node, then end it.
    fn finish_tail<S: Source>(&mut self, src: &mut S) -> Result<(), ParseError> {
        let c = src.read_char_no_space();
        let Some(record) = self.pool.top_mut() else {
            return Err(src.error(ParseErrorKind::NodeNotEnded));
        };
        match fill_attributes(src, record, c, true)? {
            '>' => self.end(src),
            other => Err(src.error(ParseErrorKind::InvalidTailChar(other))),
        }
    }

    fn parse_list<S: Source>(&mut self, src: &mut S) -> Result<(), ParseError> {
        loop {
            match src.read_char_no_space() {
                Some(']') => return Ok(()),
                Some(c) => self.parse_node_like(src, c, false)?,
                None => return Err(src.error(ParseErrorKind::ListNotEnded)),
            }
        }
    }

    fn parse_map<S: Source>(&mut self, src: &mut S) -> Result<(), ParseError> {
        let mut c = src.read_char_no_space();
        loop {
            match c {
                Some('}') => return Ok(()),
                Some('<') => self.parse_node(src, false)?,
                Some(k) => {
                    if !fill_name(src, k, &mut self.holder)? {
                        return Err(src.error(ParseErrorKind::InvalidMapEntry(k)));
                    }
                    c = src.read_char_no_space();
                    if c != Some('=') {
                        // A key without value is an empty simple node.
                        self.open(NodeKind::Simple, None, true);
                        self.start(src, false)?;
                        self.end(src)?;
                        continue;
                    }
                    let Some(v) = src.read_char_no_space() else {
                        return Err(src.error(ParseErrorKind::MapNotEnded));
                    };
                    self.parse_node_like(src, v, true)?;
                }
                None => return Err(src.error(ParseErrorKind::MapNotEnded)),
            }
            c = src.read_char_no_space();
        }
    }

    fn parse_mixed<S: Source>(&mut self, src: &mut S) -> Result<(), ParseError> {
        let formattable = self
            .pool
            .top()
            .is_some_and(|n| n.body_type() == BodyType::MixedFormattable);
        loop {
            match src.read_char() {
                Some('`') => return Ok(()),
                Some('<') => self.parse_node(src, false)?,
                Some(c) => {
                    self.open(NodeKind::Simple, None, false).set_body_type(BodyType::Text);
                    src.read_mixed_text(c, self.text.text_buf())?;
                    self.text.escaping = Escaping::Quoted;
                    self.text.formattable = formattable;
                    self.start(src, true)?;
                    self.end(src)?;
                }
                None => return Err(src.error(ParseErrorKind::MixedNotEnded)),
            }
        }
    }

    /// Read a `"` or `!` text into the scratch value.
    fn fill_text<S: Source>(&mut self, src: &mut S, c: char, formattable: bool) -> Result<(), ParseError> {
        if c == '!' {
            let mut marker = self.text.escaping.take_marker();
            src.read_bounded_chars('"', self.text.text_buf(), &mut marker)?;
            self.text.escaping = Escaping::Bounded(marker);
        } else {
            src.read_quoted_chars('"', self.text.text_buf())?;
            self.text.escaping = Escaping::Quoted;
        }
        self.text.formattable = formattable;
        Ok(())
    }

    fn open(&mut self, kind: NodeKind, special: Option<SpecialType>, held: bool) -> &mut NodeRecord {
        let record = self.pool.push(kind, special);
        if held {
            record.set_holder(&self.holder);
        }
        record
    }

    fn set_body(&mut self, body: BodyType) {
        if let Some(record) = self.pool.top_mut() {
            record.set_body_type(body);
        }
    }

    fn start<S: Source>(&mut self, src: &S, with_text: bool) -> Result<(), ParseError> {
        let Some(node) = self.pool.top() else {
            return Ok(());
        };
        trace!(depth = node.depth(), body = ?node.body_type(), "start node");
        let text = with_text.then_some(&self.text);
        emitted(src, self.handler.start_node(node, text))
    }

    fn end<S: Source>(&mut self, src: &S) -> Result<(), ParseError> {
        if let Some(node) = self.pool.top() {
            trace!(depth = node.depth(), "end node");
            emitted(src, self.handler.end_node(node))?;
        }
        self.pool.pop();
        Ok(())
    }
}

fn emitted<S: Source>(src: &S, result: Result<(), HandlerError>) -> Result<(), ParseError> {
    result.map_err(|e| ParseError::new(ParseErrorKind::Handler(e), src.offset()))
}

/// Read a raw, `'` quoted or `|` bounded name starting at `c`.
///
/// Returns `false`, with `name` emptied and nothing consumed, when `c` starts
/// no name.
fn fill_name<S: Source>(src: &mut S, c: char, name: &mut Name) -> Result<bool, ParseError> {
    name.text.clear();
    match c {
        '\'' => {
            src.read_quoted_chars('\'', &mut name.text)?;
            name.escaping = Escaping::Quoted;
        }
        '|' => {
            let mut marker = name.escaping.take_marker();
            src.read_bounded_chars('\'', &mut name.text, &mut marker)?;
            name.escaping = Escaping::Bounded(marker);
        }
        c if is_raw_char(c) => {
            src.read_raw_chars(c, &mut name.text);
            name.escaping = Escaping::Raw;
        }
        _ => {
            name.escaping = Escaping::Raw;
            return Ok(false);
        }
    }
    Ok(true)
}

/// Read an attribute value starting at `c`; same forms as names.
fn fill_value<S: Source>(src: &mut S, c: char, value: &mut Value) -> Result<bool, ParseError> {
    match c {
        '\'' => {
            src.read_quoted_chars('\'', value.text_buf())?;
            value.escaping = Escaping::Quoted;
        }
        '|' => {
            let mut marker = value.escaping.take_marker();
            src.read_bounded_chars('\'', value.text_buf(), &mut marker)?;
            value.escaping = Escaping::Bounded(marker);
        }
        c if is_raw_char(c) => {
            src.read_raw_chars(c, value.text_buf());
            value.escaping = Escaping::Raw;
        }
        _ => return Ok(false),
    }
    Ok(true)
}

/// Characters that end an attribute list: `>` or the start of a body.
fn ends_attributes(c: char) -> bool {
    matches!(c, '>' | '[' | '{' | '"' | '!' | '`' | '~')
}

/// Read attributes into the head or tail list of `record`, starting at `c`.
///
/// Returns the character that ended the list.
fn fill_attributes<S: Source>(
    src: &mut S,
    record: &mut NodeRecord,
    mut c: Option<char>,
    in_tail: bool,
) -> Result<char, ParseError> {
    loop {
        let Some(ch) = c else {
            return Err(src.error(ParseErrorKind::NodeNotEnded));
        };
        if ends_attributes(ch) {
            return Ok(ch);
        }
        let special = SpecialType::from_char(ch);
        let first = if special.is_some() { src.read_char() } else { Some(ch) };
        let att = record.push_attribute(special, in_tail);
        let named = match first {
            Some(first) => fill_name(src, first, att.name_mut())?,
            None => false,
        };
        if !named {
            return Err(src.error(ParseErrorKind::MissingAttributeName));
        }

        c = src.read_char_no_space();
        if c == Some('=') {
            let mut v = src.read_char_no_space();
            let formattable = v == Some('~');
            if formattable {
                v = src.read_char();
            }
            let value = att.value_mut();
            let filled = match v {
                Some(v) => fill_value(src, v, value)?,
                None => false,
            };
            if !filled {
                return Err(src.error(ParseErrorKind::MissingAttributeValue));
            }
            value.formattable = formattable;
            c = src.read_char_no_space();
        }
    }
}
