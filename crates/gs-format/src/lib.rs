//! Serialization of GS events.
//!
//! Logical events (from a parser or a builder) go through a layout handler
//! that decides where whitespace goes, optionally through an unformat
//! decorator, into a [`Serializer`] that renders tokens with a [`Writer`]:
//!
//! ```text
//! LogicalHandler -> [UnformatLh] -> MinifiedLh | PrettyLh | IndentLh | FormatLh
//!                -> [UnformatSh] -> Serializer -> Writer
//! ```
//!
//! [`build_serializer`] assembles the right chain from [`SerializeOptions`].

mod layout;
mod options;
mod pipeline;
mod scalar;
mod serializer;
mod unformat;
mod writer;

pub use layout::{FormatLh, IndentLh, IndentMemo, MinifiedLh, PrettyLh};
pub use options::{Indent, Method, OptionError, SerializeOptions};
pub use pipeline::{SerializerPipeline, build_serializer};
pub use scalar::{bound_for, escape_mixed, escape_quoted};
pub use serializer::{Serializer, write_name_value, write_text};
pub use unformat::{UnformatLh, UnformatSh};
pub use writer::{IoWriter, MultiWriter, StringWriter, Writer};
