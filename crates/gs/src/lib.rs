#![doc = include_str!("../README.md")]

use std::io;

use tracing::debug;

mod error;

pub use error::Error;
pub use gs_build::{BuildError, Builder, BuilderState};
pub use gs_event::{
    BodyType, EventAttribute, EventNode, Escaping, HandlerError, LogicalHandler, MultiHandler, Name, NodeKind,
    SpecialType, SyntaxHandler, Value,
};
pub use gs_format::{
    Indent, IoWriter, Method, MultiWriter, OptionError, SerializeOptions, Serializer, SerializerPipeline,
    StringWriter, Writer, build_serializer,
};
pub use gs_parse::{ErrorCategory, ParseError, ParseErrorKind, Parser, Source, StrSource};

/// Parse `source` and serialize it again as `options` say.
pub fn reformat(source: &str, options: &SerializeOptions) -> Result<String, Error> {
    debug!(method = %options.method, unformat = options.unformat, bytes = source.len(), "reformat");
    let mut parser = Parser::new(build_serializer(StringWriter::new(), options));
    parser.parse(source)?;
    Ok(parser.into_handler().into_writer().into_string())
}

/// Parse `source` and serialize it into `out`, which is returned once flushed.
pub fn reformat_to<W: io::Write>(source: &str, options: &SerializeOptions, out: W) -> Result<W, Error> {
    debug!(method = %options.method, unformat = options.unformat, bytes = source.len(), "reformat to writer");
    let mut parser = Parser::new(build_serializer(IoWriter::new(out), options));
    parser.parse(source)?;
    Ok(parser.into_handler().into_writer().into_inner()?)
}

/// Check that `source` is well-formed GS without producing output.
pub fn check(source: &str) -> Result<(), ParseError> {
    Parser::new(Discard).parse(source)
}

/// Run `build` on a fresh [`Builder`] and serialize what it builds.
///
/// Every construct opened by `build` must be closed.
pub fn build_string<F>(options: &SerializeOptions, build: F) -> Result<String, Error>
where
    F: FnOnce(&mut Builder<SerializerPipeline<StringWriter>>) -> Result<(), BuildError>,
{
    let mut builder = Builder::new(build_serializer(StringWriter::new(), options));
    build(&mut builder)?;
    Ok(builder.finish()?.into_writer().into_string())
}

/// Handler ignoring every event.
struct Discard;

impl LogicalHandler for Discard {
    fn start_node(&mut self, _node: EventNode<'_>, _text: Option<&Value>) -> Result<(), HandlerError> {
        Ok(())
    }

    fn end_node(&mut self, _node: EventNode<'_>) -> Result<(), HandlerError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests;
