//! Diagnostic rendering for parse errors.

use ariadne::{Color, Config, IndexType, Label, Report, ReportKind, Source};

use crate::error::{ErrorCategory, ParseError, ParseErrorKind};

fn ariadne_config() -> Config {
    let config = Config::default().with_index_type(IndexType::Byte);
    if std::env::var("NO_COLOR").is_ok() {
        config.with_color(false)
    } else {
        config
    }
}

impl ParseError {
    /// Render this error with ariadne.
    ///
    /// Returns a string containing the formatted error message with source context.
    pub fn render(&self, filename: &str, source: &str) -> String {
        let mut output = Vec::new();
        self.write_report(filename, source, &mut output);
        String::from_utf8(output).unwrap_or_else(|_| format!("{}", self))
    }

    /// Write the error report to a writer.
    pub fn write_report<W: std::io::Write>(&self, filename: &str, source: &str, writer: W) {
        let range = self.range(source);
        let label = Label::new((filename, range.clone()))
            .with_message(self.label())
            .with_color(Color::Red);
        let mut report = Report::build(ReportKind::Error, (filename, range))
            .with_config(ariadne_config())
            .with_message(self.kind.to_string())
            .with_label(label);
        if let Some(help) = self.help() {
            report = report.with_help(help);
        }
        let _ = report
            .finish()
            .write((filename, Source::from(source)), writer);
    }

    /// Byte range covering the offending character, clamped to the source.
    fn range(&self, source: &str) -> std::ops::Range<usize> {
        let start = self.offset.min(source.len());
        let end = source[start..]
            .chars()
            .next()
            .map_or(start, |c| start + c.len_utf8());
        start..end
    }

    fn label(&self) -> &'static str {
        match &self.kind {
            ParseErrorKind::UnexpectedEof
            | ParseErrorKind::NodeNotEnded
            | ParseErrorKind::ListNotEnded
            | ParseErrorKind::MapNotEnded
            | ParseErrorKind::MixedNotEnded
            | ParseErrorKind::UnterminatedMixedText => "input ends here",
            ParseErrorKind::UnterminatedQuoted
            | ParseErrorKind::UnterminatedBoundMarker
            | ParseErrorKind::UnterminatedBounded => "string never closed",
            ParseErrorKind::UnterminatedEscape
            | ParseErrorKind::InvalidEscape(_)
            | ParseErrorKind::InvalidCodePoint(_) => "invalid escape",
            ParseErrorKind::Handler(_) => "rejected here",
            _ => match self.kind.category() {
                ErrorCategory::Grammar => "unexpected",
                _ => "here",
            },
        }
    }

    fn help(&self) -> Option<&'static str> {
        match &self.kind {
            ParseErrorKind::InvalidEscape(_) | ParseErrorKind::UnterminatedEscape => {
                Some("valid escapes are: \\\\, \\', \\\", \\`, \\<, \\b, \\f, \\n, \\r, \\t, \\uXXXXXX")
            }
            ParseErrorKind::InvalidCodePoint(_) => Some("\\u takes exactly six hex digits, e.g. \\u0000E9"),
            ParseErrorKind::InvalidTailChar(_) => Some("a body may only be followed by attributes and '>'"),
            ParseErrorKind::NodeNotEnded => Some("add a closing '>'"),
            ParseErrorKind::ListNotEnded => Some("add a closing ']'"),
            ParseErrorKind::MapNotEnded => Some("add a closing '}'"),
            ParseErrorKind::MixedNotEnded | ParseErrorKind::UnterminatedMixedText => Some("add a closing '`'"),
            ParseErrorKind::UnterminatedBounded => Some("repeat the opening bound to close the string"),
            _ => None,
        }
    }
}
