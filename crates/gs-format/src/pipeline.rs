//! Serializer pipelines built from [`SerializeOptions`].

use gs_event::{EventNode, HandlerError, LogicalHandler, Value};
use tracing::trace;

use crate::layout::{FormatLh, IndentLh, MinifiedLh, PrettyLh};
use crate::options::{Method, SerializeOptions};
use crate::serializer::Serializer;
use crate::unformat::{UnformatLh, UnformatSh};
use crate::writer::Writer;

/// Logical handler serializing to `W`, one variant per method and unformat
/// combination.
#[derive(Debug)]
pub enum SerializerPipeline<W> {
    Minified(MinifiedLh<Serializer<W>>),
    MinifiedUnformat(UnformatLh<MinifiedLh<Serializer<W>>>),
    Pretty(PrettyLh<Serializer<W>>),
    PrettyUnformat(PrettyLh<UnformatSh<Serializer<W>>>),
    Indented(IndentLh<Serializer<W>>),
    IndentedUnformat(IndentLh<UnformatSh<Serializer<W>>>),
    Formatted(FormatLh<Serializer<W>>),
    /// Unformatting runs first so the width check sees collapsed content.
    FormattedUnformat(UnformatLh<FormatLh<Serializer<W>>>),
}

/// Build the logical handler serializing to `writer` as `options` say.
pub fn build_serializer<W: Writer>(writer: W, options: &SerializeOptions) -> SerializerPipeline<W> {
    trace!(
        method = %options.method,
        indent = ?options.indent,
        unformat = options.unformat,
        "building serializer"
    );
    let ser = Serializer::new(writer);
    let indent = options.indent;
    match (options.method, options.unformat) {
        (Method::Minified, false) => SerializerPipeline::Minified(MinifiedLh::new(ser)),
        (Method::Minified, true) => SerializerPipeline::MinifiedUnformat(UnformatLh::new(MinifiedLh::new(ser))),
        (Method::Pretty, false) => SerializerPipeline::Pretty(PrettyLh::new(ser)),
        (Method::Pretty, true) => SerializerPipeline::PrettyUnformat(PrettyLh::new(UnformatSh::new(ser))),
        (Method::Indented, false) => SerializerPipeline::Indented(IndentLh::new(ser, indent)),
        (Method::Indented, true) => SerializerPipeline::IndentedUnformat(IndentLh::new(UnformatSh::new(ser), indent)),
        (Method::Formatted, false) => {
            SerializerPipeline::Formatted(FormatLh::new(ser, indent, options.line_width))
        }
        (Method::Formatted, true) => SerializerPipeline::FormattedUnformat(UnformatLh::new(FormatLh::new(
            ser,
            indent,
            options.line_width,
        ))),
    }
}

impl<W: Writer> SerializerPipeline<W> {
    /// The writer receiving the output.
    pub fn writer(&self) -> &W {
        match self {
            SerializerPipeline::Minified(h) => h.handler().writer(),
            SerializerPipeline::MinifiedUnformat(h) => h.handler().handler().writer(),
            SerializerPipeline::Pretty(h) => h.handler().writer(),
            SerializerPipeline::PrettyUnformat(h) => h.handler().handler().writer(),
            SerializerPipeline::Indented(h) => h.handler().writer(),
            SerializerPipeline::IndentedUnformat(h) => h.handler().handler().writer(),
            SerializerPipeline::Formatted(h) => h.handler().writer(),
            SerializerPipeline::FormattedUnformat(h) => h.handler().handler().writer(),
        }
    }

    /// Consume the pipeline and return its writer.
    pub fn into_writer(self) -> W {
        match self {
            SerializerPipeline::Minified(h) => h.into_handler().into_writer(),
            SerializerPipeline::MinifiedUnformat(h) => h.into_handler().into_handler().into_writer(),
            SerializerPipeline::Pretty(h) => h.into_handler().into_writer(),
            SerializerPipeline::PrettyUnformat(h) => h.into_handler().into_handler().into_writer(),
            SerializerPipeline::Indented(h) => h.into_handler().into_writer(),
            SerializerPipeline::IndentedUnformat(h) => h.into_handler().into_handler().into_writer(),
            SerializerPipeline::Formatted(h) => h.into_handler().into_writer(),
            SerializerPipeline::FormattedUnformat(h) => h.into_handler().into_handler().into_writer(),
        }
    }
}

impl<W: Writer> LogicalHandler for SerializerPipeline<W> {
    fn start_node(&mut self, node: EventNode<'_>, text: Option<&Value>) -> Result<(), HandlerError> {
        match self {
            SerializerPipeline::Minified(h) => h.start_node(node, text),
            SerializerPipeline::MinifiedUnformat(h) => h.start_node(node, text),
            SerializerPipeline::Pretty(h) => h.start_node(node, text),
            SerializerPipeline::PrettyUnformat(h) => h.start_node(node, text),
            SerializerPipeline::Indented(h) => h.start_node(node, text),
            SerializerPipeline::IndentedUnformat(h) => h.start_node(node, text),
            SerializerPipeline::Formatted(h) => h.start_node(node, text),
            SerializerPipeline::FormattedUnformat(h) => h.start_node(node, text),
        }
    }

    fn end_node(&mut self, node: EventNode<'_>) -> Result<(), HandlerError> {
        match self {
            SerializerPipeline::Minified(h) => h.end_node(node),
            SerializerPipeline::MinifiedUnformat(h) => h.end_node(node),
            SerializerPipeline::Pretty(h) => h.end_node(node),
            SerializerPipeline::PrettyUnformat(h) => h.end_node(node),
            SerializerPipeline::Indented(h) => h.end_node(node),
            SerializerPipeline::IndentedUnformat(h) => h.end_node(node),
            SerializerPipeline::Formatted(h) => h.end_node(node),
            SerializerPipeline::FormattedUnformat(h) => h.end_node(node),
        }
    }
}
