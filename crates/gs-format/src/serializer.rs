//! Terminal syntax handler rendering tokens through a [`Writer`].

use gs_event::{BodyType, Escaping, HandlerError, Name, SpecialType, SyntaxHandler, Value, is_raw};

use crate::scalar::bound_for;
use crate::writer::{StringWriter, Writer};

/// [`SyntaxHandler`] writing GS text.
///
/// Whitespace is written only when it arrives as a token; put one of the
/// layout handlers ([`MinifiedLh`](crate::MinifiedLh),
/// [`PrettyLh`](crate::PrettyLh), [`IndentLh`](crate::IndentLh)) in front
/// of it to serialize logical events.
#[derive(Debug, Default)]
pub struct Serializer<W = StringWriter> {
    out: W,
}

impl<W: Writer> Serializer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn writer(&self) -> &W {
        &self.out
    }

    pub fn writer_mut(&mut self) -> &mut W {
        &mut self.out
    }

    pub fn into_writer(self) -> W {
        self.out
    }
}

impl<W: Writer> SyntaxHandler for Serializer<W> {
    fn head_node(&mut self, name: &Name, special: Option<SpecialType>) -> Result<(), HandlerError> {
        self.out.mark("<")?;
        if let Some(special) = special {
            self.out.mark(special.as_str())?;
        }
        if !name.is_empty() {
            write_name_value(&mut self.out, &name.text, &name.escaping)?;
        }
        Ok(())
    }

    fn attribute(
        &mut self,
        name: &Name,
        value: &Value,
        special: Option<SpecialType>,
        space_before: Option<&str>,
        space_after: Option<&str>,
    ) -> Result<(), HandlerError> {
        let out = &mut self.out;
        if let Some(special) = special {
            out.mark(special.as_str())?;
        }
        write_name_value(out, &name.text, &name.escaping)?;
        if let Some(text) = &value.text {
            if let Some(sp) = space_before {
                out.space(sp)?;
            }
            out.mark("=")?;
            if let Some(sp) = space_after {
                out.space(sp)?;
            }
            if value.formattable {
                out.mark("~")?;
            }
            write_name_value(out, text, &value.escaping)?;
        }
        Ok(())
    }

    fn text(&mut self, text: &Value, in_mixed: bool) -> Result<(), HandlerError> {
        if in_mixed {
            return self.out.mixed_text(text.as_str());
        }
        if text.formattable {
            self.out.mark("~")?;
        }
        write_text(&mut self.out, text.as_str(), &text.escaping)
    }

    fn start_body(&mut self, body: BodyType) -> Result<(), HandlerError> {
        match body.open_mark() {
            Some(mark) => self.out.mark(mark),
            None => Ok(()),
        }
    }

    fn property(&mut self, name: &Name, is_null: bool, space_before: Option<&str>) -> Result<(), HandlerError> {
        write_name_value(&mut self.out, &name.text, &name.escaping)?;
        if !is_null {
            if let Some(sp) = space_before {
                self.out.space(sp)?;
            }
            self.out.mark("=")?;
        }
        Ok(())
    }

    fn end_body(&mut self, body: BodyType) -> Result<(), HandlerError> {
        match body.close_mark() {
            Some(mark) => self.out.mark(mark),
            None => Ok(()),
        }
    }

    fn tail_node(&mut self) -> Result<(), HandlerError> {
        self.out.mark(">")
    }

    fn white_spaces(&mut self, spaces: &str) -> Result<(), HandlerError> {
        self.out.space(spaces)
    }
}

/// Write a name, attribute value or map key.
///
/// A `Raw` escaping that the content does not fit falls back to quoting.
pub fn write_name_value<W: Writer + ?Sized>(out: &mut W, text: &str, escaping: &Escaping) -> Result<(), HandlerError> {
    match escaping {
        Escaping::Raw if is_raw(text) => out.raw_chars(text),
        Escaping::Raw | Escaping::Quoted => out.quoted_chars(text, '\''),
        Escaping::Bounded(marker) => out.bounded_chars(text, &bound_for('|', marker, '\'', text)),
    }
}

/// Write a text body (`"` quoted, `!` bounded or raw).
pub fn write_text<W: Writer + ?Sized>(out: &mut W, text: &str, escaping: &Escaping) -> Result<(), HandlerError> {
    match escaping {
        Escaping::Raw if is_raw(text) => out.raw_chars(text),
        Escaping::Raw | Escaping::Quoted => out.quoted_chars(text, '"'),
        Escaping::Bounded(marker) => out.bounded_chars(text, &bound_for('!', marker, '"', text)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(f: impl FnOnce(&mut Serializer) -> Result<(), HandlerError>) -> String {
        let mut ser = Serializer::new(StringWriter::new());
        f(&mut ser).unwrap();
        ser.into_writer().into_string()
    }

    #[test]
    fn test_head_and_attributes() {
        let out = render(|s| {
            s.head_node(&Name::auto("a"), Some(SpecialType::Comment))?;
            s.attribute(&Name::auto("x"), &Value::new("1", Escaping::Raw, false), None, None, None)?;
            s.attribute(&Name::auto("flag"), &Value::default(), Some(SpecialType::Meta), None, None)?;
            s.attribute(
                &Name::auto("y"),
                &Value::new("a  b", Escaping::Quoted, true),
                None,
                Some(" "),
                Some(" "),
            )?;
            s.tail_node()
        });
        insta::assert_snapshot!(out, @"<#a x=1&flag y = ~'a  b'>");
    }

    #[test]
    fn test_raw_escaping_falls_back_to_quotes() {
        let out = render(|s| s.property(&Name::new("not raw", Escaping::Raw), true, None));
        assert_eq!(out, "'not raw'");
    }

    #[test]
    fn test_bounded_text_grows_marker() {
        let out = render(|s| s.text(&Value::new(r#"x!"y"#, Escaping::Bounded(String::new()), false), false));
        assert_eq!(out, r#"!0"x!"y!0""#);
    }

    #[test]
    fn test_mixed_text_is_escaped() {
        let out = render(|s| {
            s.start_body(BodyType::MixedFormattable)?;
            s.text(&Value::new("a<b`", Escaping::Quoted, true), true)?;
            s.end_body(BodyType::MixedFormattable)
        });
        assert_eq!(out, r"~`a\<b\``");
    }
}
