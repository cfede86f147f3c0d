//! Character-level output for the serializer.

use std::io;

use gs_event::HandlerError;

use crate::scalar::{escape_mixed, escape_quoted};

/// Destination of serialized GS text.
///
/// The serializer decides what to write; a writer only knows how to frame
/// and escape each kind of run.
pub trait Writer {
    /// A syntax mark such as `<`, `[` or `=`.
    fn mark(&mut self, mark: &str) -> Result<(), HandlerError>;

    /// Unquoted characters.
    ///
    /// Two raw runs in a row must stay two tokens: a single space is inserted
    /// between them.
    fn raw_chars(&mut self, text: &str) -> Result<(), HandlerError>;

    /// A run between two `quote` characters, with `\` and `quote` escaped.
    fn quoted_chars(&mut self, text: &str, quote: char) -> Result<(), HandlerError>;

    /// A run framed by `bound` on both sides, written verbatim.
    fn bounded_chars(&mut self, text: &str, bound: &str) -> Result<(), HandlerError>;

    /// A text run of a mixed body, with `\`, `<` and backquote escaped.
    fn mixed_text(&mut self, text: &str) -> Result<(), HandlerError>;

    /// Whitespace.
    fn space(&mut self, spaces: &str) -> Result<(), HandlerError>;
}

impl<W: Writer + ?Sized> Writer for &mut W {
    fn mark(&mut self, mark: &str) -> Result<(), HandlerError> {
        (**self).mark(mark)
    }

    fn raw_chars(&mut self, text: &str) -> Result<(), HandlerError> {
        (**self).raw_chars(text)
    }

    fn quoted_chars(&mut self, text: &str, quote: char) -> Result<(), HandlerError> {
        (**self).quoted_chars(text, quote)
    }

    fn bounded_chars(&mut self, text: &str, bound: &str) -> Result<(), HandlerError> {
        (**self).bounded_chars(text, bound)
    }

    fn mixed_text(&mut self, text: &str) -> Result<(), HandlerError> {
        (**self).mixed_text(text)
    }

    fn space(&mut self, spaces: &str) -> Result<(), HandlerError> {
        (**self).space(spaces)
    }
}

/// [`Writer`] building a `String`.
#[derive(Debug, Default, Clone)]
pub struct StringWriter {
    out: String,
    /// The last write was a raw run.
    need_sep: bool,
}

impl StringWriter {
    /// Create an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// The output written so far.
    pub fn as_str(&self) -> &str {
        &self.out
    }

    /// Consume the writer and return the output.
    pub fn into_string(self) -> String {
        self.out
    }

    /// Clear the output so the writer can be reused.
    pub fn reset(&mut self) {
        self.out.clear();
        self.need_sep = false;
    }
}

impl Writer for StringWriter {
    fn mark(&mut self, mark: &str) -> Result<(), HandlerError> {
        self.need_sep = false;
        self.out.push_str(mark);
        Ok(())
    }

    fn raw_chars(&mut self, text: &str) -> Result<(), HandlerError> {
        if self.need_sep {
            self.out.push(' ');
        }
        self.out.push_str(text);
        self.need_sep = true;
        Ok(())
    }

    fn quoted_chars(&mut self, text: &str, quote: char) -> Result<(), HandlerError> {
        self.need_sep = false;
        self.out.push(quote);
        self.out.push_str(&escape_quoted(text, quote));
        self.out.push(quote);
        Ok(())
    }

    fn bounded_chars(&mut self, text: &str, bound: &str) -> Result<(), HandlerError> {
        self.need_sep = false;
        self.out.push_str(bound);
        self.out.push_str(text);
        self.out.push_str(bound);
        Ok(())
    }

    fn mixed_text(&mut self, text: &str) -> Result<(), HandlerError> {
        self.need_sep = false;
        self.out.push_str(&escape_mixed(text));
        Ok(())
    }

    fn space(&mut self, spaces: &str) -> Result<(), HandlerError> {
        self.need_sep = false;
        self.out.push_str(spaces);
        Ok(())
    }
}

/// [`Writer`] over any [`io::Write`].
///
/// Writes go straight through; wrap the target in a `BufWriter` when it is
/// unbuffered.
#[derive(Debug)]
pub struct IoWriter<W> {
    inner: W,
    need_sep: bool,
}

impl<W: io::Write> IoWriter<W> {
    /// Wrap `inner`.
    pub fn new(inner: W) -> Self {
        Self { inner, need_sep: false }
    }

    /// The inner writer.
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Flush and return the inner writer.
    pub fn into_inner(mut self) -> Result<W, HandlerError> {
        self.inner.flush()?;
        Ok(self.inner)
    }

    fn put(&mut self, s: &str) -> Result<(), HandlerError> {
        self.inner.write_all(s.as_bytes())?;
        Ok(())
    }
}

impl<W: io::Write> Writer for IoWriter<W> {
    fn mark(&mut self, mark: &str) -> Result<(), HandlerError> {
        self.need_sep = false;
        self.put(mark)
    }

    fn raw_chars(&mut self, text: &str) -> Result<(), HandlerError> {
        if self.need_sep {
            self.put(" ")?;
        }
        self.need_sep = true;
        self.put(text)
    }

    fn quoted_chars(&mut self, text: &str, quote: char) -> Result<(), HandlerError> {
        self.need_sep = false;
        let mut buf = [0u8; 4];
        let mark = quote.encode_utf8(&mut buf);
        self.put(mark)?;
        self.put(&escape_quoted(text, quote))?;
        self.put(mark)
    }

    fn bounded_chars(&mut self, text: &str, bound: &str) -> Result<(), HandlerError> {
        self.need_sep = false;
        self.put(bound)?;
        self.put(text)?;
        self.put(bound)
    }

    fn mixed_text(&mut self, text: &str) -> Result<(), HandlerError> {
        self.need_sep = false;
        self.put(&escape_mixed(text))
    }

    fn space(&mut self, spaces: &str) -> Result<(), HandlerError> {
        self.need_sep = false;
        self.put(spaces)
    }
}

/// [`Writer`] duplicating every call to several writers, in order.
#[derive(Debug, Default)]
pub struct MultiWriter<W> {
    targets: Vec<W>,
}

impl<W: Writer> MultiWriter<W> {
    /// Write to each of `targets`.
    pub fn new(targets: Vec<W>) -> Self {
        Self { targets }
    }

    /// Add a writer after the existing ones.
    pub fn push(&mut self, target: W) {
        self.targets.push(target);
    }

    /// The writers, in call order.
    pub fn targets(&self) -> &[W] {
        &self.targets
    }

    /// Consume the fan-out and return its writers.
    pub fn into_targets(self) -> Vec<W> {
        self.targets
    }

    fn each(&mut self, mut f: impl FnMut(&mut W) -> Result<(), HandlerError>) -> Result<(), HandlerError> {
        self.targets.iter_mut().try_for_each(|w| f(w))
    }
}

impl<W: Writer> Writer for MultiWriter<W> {
    fn mark(&mut self, mark: &str) -> Result<(), HandlerError> {
        self.each(|w| w.mark(mark))
    }

    fn raw_chars(&mut self, text: &str) -> Result<(), HandlerError> {
        self.each(|w| w.raw_chars(text))
    }

    fn quoted_chars(&mut self, text: &str, quote: char) -> Result<(), HandlerError> {
        self.each(|w| w.quoted_chars(text, quote))
    }

    fn bounded_chars(&mut self, text: &str, bound: &str) -> Result<(), HandlerError> {
        self.each(|w| w.bounded_chars(text, bound))
    }

    fn mixed_text(&mut self, text: &str) -> Result<(), HandlerError> {
        self.each(|w| w.mixed_text(text))
    }

    fn space(&mut self, spaces: &str) -> Result<(), HandlerError> {
        self.each(|w| w.space(spaces))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_runs_are_separated() {
        let mut w = StringWriter::new();
        w.raw_chars("a").unwrap();
        w.raw_chars("b").unwrap();
        w.mark("=").unwrap();
        w.raw_chars("c").unwrap();
        w.quoted_chars("d", '\'').unwrap();
        w.raw_chars("e").unwrap();
        assert_eq!(w.as_str(), "a b=c'd'e");
    }

    #[test]
    fn test_reset() {
        let mut w = StringWriter::new();
        w.raw_chars("a").unwrap();
        w.reset();
        w.raw_chars("b").unwrap();
        assert_eq!(w.into_string(), "b");
    }

    #[test]
    fn test_io_writer_matches_string_writer() {
        fn write_all(w: &mut impl Writer) {
            w.mark("<").unwrap();
            w.raw_chars("a").unwrap();
            w.raw_chars("b").unwrap();
            w.quoted_chars("it's", '\'').unwrap();
            w.bounded_chars("x\"y", "!\"").unwrap();
            w.mixed_text("1<2").unwrap();
            w.space("\n").unwrap();
        }
        let mut s = StringWriter::new();
        write_all(&mut s);
        let mut io = IoWriter::new(Vec::new());
        write_all(&mut io);
        let bytes = io.into_inner().unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), s.as_str());
        assert_eq!(s.as_str(), "<a b'it\\'s'!\"x\"y!\"1\\<2\n");
    }

    #[test]
    fn test_multi_writer() {
        let mut multi = MultiWriter::new(vec![StringWriter::new(), StringWriter::new()]);
        multi.mark("<").unwrap();
        multi.raw_chars("x").unwrap();
        multi.mark(">").unwrap();
        for w in multi.targets() {
            assert_eq!(w.as_str(), "<x>");
        }
    }
}
