//! GS command-line tool
//!
//! Examples:
//!   gs doc.gs                       - minify to stdout
//!   gs doc.gs -m indented --indent 4
//!   gs - --check < doc.gs           - syntax check only
//!   gs doc.gs -m pretty --in-place

use std::io::{self, Read};

use clap::{ArgAction, Parser};
use gs::{ErrorCategory, HandlerError, Indent, Method, ParseError, ParseErrorKind, SerializeOptions};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

// ============================================================================
// Exit codes
// ============================================================================

const EXIT_SUCCESS: i32 = 0;
const EXIT_SYNTAX_ERROR: i32 = 1;
const EXIT_IO_ERROR: i32 = 3;

// ============================================================================
// CLI arguments
// ============================================================================

/// Reformat and check GS documents.
#[derive(Debug, Parser)]
#[command(name = "gs", version, about = "Reformat and check GS documents")]
struct Args {
    /// Input file path (or "-" for stdin)
    #[arg(default_value = "-")]
    input: String,

    /// Output file (or "-" for stdout)
    #[arg(short, long, conflicts_with = "in_place")]
    output: Option<String>,

    /// Modify input file in place
    #[arg(long)]
    in_place: bool,

    /// Layout: minified, pretty, indented or formatted
    #[arg(short, long, default_value_t = Method::Minified)]
    method: Method,

    /// Indentation unit: "tab" or 0 to 5 spaces
    #[arg(long, default_value = "2")]
    indent: Indent,

    /// Line width for the formatted layout
    #[arg(long, default_value_t = 256)]
    line_width: usize,

    /// Collapse whitespace in formattable content
    #[arg(long)]
    unformat: bool,

    /// Only check the syntax; write nothing
    #[arg(long, conflicts_with_all = ["output", "in_place"])]
    check: bool,

    /// Log more (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn serialize_options(&self) -> SerializeOptions {
        SerializeOptions {
            method: self.method,
            unformat: self.unformat,
            indent: self.indent,
            line_width: self.line_width,
        }
    }

    fn filename(&self) -> &str {
        if self.input == "-" { "<stdin>" } else { &self.input }
    }
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(&args) {
        Ok(()) => std::process::exit(EXIT_SUCCESS),
        Err(e) => {
            match &e {
                CliError::ParseDiagnostic { error, source } => {
                    error.write_report(args.filename(), source, io::stderr());
                }
                _ => eprintln!("error: {e}"),
            }
            std::process::exit(e.exit_code());
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(args: &Args) -> Result<(), CliError> {
    if args.in_place && args.input == "-" {
        return Err(CliError::Usage("--in-place cannot be used with stdin".into()));
    }
    if let Some(output) = &args.output
        && args.input != "-"
        && output != "-"
        && is_same_file(&args.input, output)
    {
        return Err(CliError::Usage(
            "input and output are the same file\nhint: use --in-place to modify in place".into(),
        ));
    }

    let source = read_input(&args.input)?;
    debug!(input = args.filename(), bytes = source.len(), "read input");

    if args.check {
        return match gs::check(&source) {
            Ok(()) => {
                info!(input = args.filename(), "syntax ok");
                Ok(())
            }
            Err(error) => Err(CliError::ParseDiagnostic { error, source }),
        };
    }

    let options = args.serialize_options();
    let output = gs::reformat(&source, &options).map_err(|e| CliError::from_gs(e, &source))?;

    if args.in_place {
        std::fs::write(&args.input, &output)?;
    } else {
        write_output(args.output.as_deref().unwrap_or("-"), &output)?;
    }
    Ok(())
}

fn read_input(path: &str) -> Result<String, io::Error> {
    if path == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        std::fs::read_to_string(path)
    }
}

fn write_output(path: &str, content: &str) -> Result<(), io::Error> {
    if path == "-" {
        print!("{content}");
        Ok(())
    } else {
        std::fs::write(path, content)
    }
}

fn is_same_file(a: &str, b: &str) -> bool {
    match (std::fs::canonicalize(a), std::fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

// ============================================================================
// Error handling
// ============================================================================

#[derive(Debug)]
enum CliError {
    Io(io::Error),
    /// Syntax error, reported with its source context.
    ParseDiagnostic { error: ParseError, source: String },
    /// The serializer could not render the document.
    Unsupported(String),
    Usage(String),
}

impl CliError {
    fn from_gs(e: gs::Error, source: &str) -> Self {
        match e {
            gs::Error::Parse(error) if error.kind.category() != ErrorCategory::Handler => CliError::ParseDiagnostic {
                error,
                source: source.to_owned(),
            },
            gs::Error::Parse(ParseError {
                kind: ParseErrorKind::Handler(HandlerError::Io(e)),
                ..
            })
            | gs::Error::Handler(HandlerError::Io(e)) => CliError::Io(e),
            other => CliError::Unsupported(other.to_string()),
        }
    }

    fn exit_code(&self) -> i32 {
        match self {
            CliError::Io(_) => EXIT_IO_ERROR,
            CliError::ParseDiagnostic { .. } => EXIT_SYNTAX_ERROR,
            CliError::Unsupported(_) => EXIT_SYNTAX_ERROR,
            CliError::Usage(_) => EXIT_SYNTAX_ERROR,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Io(e) => write!(f, "{e}"),
            CliError::ParseDiagnostic { error, .. } => write!(f, "{error}"),
            CliError::Unsupported(e) => write!(f, "{e}"),
            CliError::Usage(e) => write!(f, "{e}"),
        }
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        CliError::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use clap::CommandFactory;

    #[test]
    fn test_command_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["gs"]).unwrap();
        assert_eq!(args.input, "-");
        assert_eq!(args.filename(), "<stdin>");
        assert_eq!(args.serialize_options(), SerializeOptions::default());
    }

    #[test]
    fn test_layout_flags() {
        let args = Args::try_parse_from([
            "gs",
            "doc.gs",
            "-m",
            "formatted",
            "--indent",
            "tab",
            "--line-width",
            "80",
            "--unformat",
            "-vv",
        ])
        .unwrap();
        assert_eq!(args.verbose, 2);
        assert_eq!(
            args.serialize_options(),
            SerializeOptions::formatted(Indent::Tab, 80).with_unformat(true)
        );
    }

    #[test]
    fn test_rejected_flags() {
        assert!(Args::try_parse_from(["gs", "-m", "tidy"]).is_err());
        assert!(Args::try_parse_from(["gs", "--indent", "8"]).is_err());
        assert!(Args::try_parse_from(["gs", "a.gs", "--check", "--in-place"]).is_err());
        assert!(Args::try_parse_from(["gs", "a.gs", "-o", "b.gs", "--in-place"]).is_err());
    }

    #[test]
    fn test_in_place_needs_a_file() {
        let args = Args::try_parse_from(["gs", "--in-place"]).unwrap();
        let err = run(&args).unwrap_err();
        assert!(matches!(err, CliError::Usage(_)));
        assert_eq!(err.exit_code(), EXIT_SYNTAX_ERROR);
    }

    #[test]
    fn test_error_exit_codes() {
        let err = CliError::from_gs(gs::reformat("<a", &SerializeOptions::default()).unwrap_err(), "<a");
        assert!(matches!(err, CliError::ParseDiagnostic { .. }));
        assert_eq!(err.exit_code(), EXIT_SYNTAX_ERROR);

        let err = CliError::from(io::Error::other("disk full"));
        assert_eq!(err.exit_code(), EXIT_IO_ERROR);
    }
}
