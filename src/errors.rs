//! yabai3 Error Handling
//!
//! Every grammar violation is a single `ParseError` created at a reader
//! position. Errors carry the file, the 1-based line and column, and a byte
//! span so that they render both as `file:line:column: message` and as a full
//! `miette` diagnostic with the offending source underlined.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use miette::{Diagnostic, LabeledSpan, NamedSource, SourceSpan};
use thiserror::Error;

use crate::syntax::{reader::EOF, Section};

// ============================================================================
// ERROR KINDS - What went wrong
// ============================================================================

/// All grammar violations the parser can report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    #[error("expected {expected} received {found}")]
    UnexpectedByte { expected: String, found: String },
    #[error("expected {expected} received {found}")]
    ExpectedKeyword {
        expected: &'static str,
        found: String,
    },
    #[error("expected whitespace received {found}")]
    ExpectedWhitespace { found: String },
    #[error("invalid identifier, received {found}")]
    InvalidIdentifier { found: String },
    #[error("expected [0-9.] received {found}")]
    InvalidNumber { found: String },
    #[error("number {value} is out of range")]
    NumberOutOfRange { value: String },
    #[error("invalid bool value {value}, must be on or off")]
    InvalidBool { value: String },
    #[error("invalid gap type {value}, must be inner or outer")]
    InvalidGapType { value: String },
    #[error("could not find variable name")]
    MissingVariableName,
    #[error("invalid variable name {value}: must start with $")]
    InvalidVariableName { value: String },
    #[error("unterminated string")]
    UnterminatedString,
    #[error("expected a command received {found}")]
    MissingCommand { found: String },
    #[error("unexpected content \"{content}\"")]
    UnexpectedContent { content: String },
}

impl ErrorKind {
    /// Error code suffix for diagnostic codes.
    pub const fn code_suffix(&self) -> &'static str {
        match self {
            Self::UnexpectedByte { .. } => "unexpected_byte",
            Self::ExpectedKeyword { .. } => "expected_keyword",
            Self::ExpectedWhitespace { .. } => "expected_whitespace",
            Self::InvalidIdentifier { .. } => "invalid_identifier",
            Self::InvalidNumber { .. } => "invalid_number",
            Self::NumberOutOfRange { .. } => "number_out_of_range",
            Self::InvalidBool { .. } => "invalid_bool",
            Self::InvalidGapType { .. } => "invalid_gap_type",
            Self::MissingVariableName => "missing_variable_name",
            Self::InvalidVariableName { .. } => "invalid_variable_name",
            Self::UnterminatedString => "unterminated_string",
            Self::MissingCommand { .. } => "missing_command",
            Self::UnexpectedContent { .. } => "unexpected_content",
        }
    }

    fn primary_label(&self) -> &'static str {
        match self {
            Self::UnexpectedByte { .. } | Self::ExpectedKeyword { .. } => "unexpected input",
            Self::ExpectedWhitespace { .. } => "whitespace expected here",
            Self::InvalidIdentifier { .. } => "identifier expected here",
            Self::InvalidNumber { .. } => "malformed number",
            Self::NumberOutOfRange { .. } => "too large",
            Self::InvalidBool { .. } => "invalid bool",
            Self::InvalidGapType { .. } => "invalid gap type",
            Self::MissingVariableName | Self::InvalidVariableName { .. } => {
                "variable name expected here"
            }
            Self::UnterminatedString => "string starts here",
            Self::MissingCommand { .. } => "command expected here",
            Self::UnexpectedContent { .. } => "not a statement",
        }
    }

    fn help(&self) -> Option<String> {
        match self {
            Self::InvalidBool { .. } => Some("use `on` or `off`".into()),
            Self::InvalidGapType { .. } => Some("use `gaps inner <n>` or `gaps outer <n>`".into()),
            Self::InvalidVariableName { value } => Some(format!("did you mean `${value}`?")),
            Self::UnterminatedString => Some("add a closing `\"`".into()),
            Self::MissingCommand { .. } => {
                Some("a for_window rule needs a command, e.g. `floating enable`".into())
            }
            _ => None,
        }
    }
}

/// Renders a byte the way error messages show it.
pub fn describe_byte(byte: u8) -> String {
    match byte {
        EOF => "EOF".into(),
        b'\n' => "newline".into(),
        b'\t' => "tab".into(),
        b' ' => "space".into(),
        b if b.is_ascii_graphic() => (b as char).to_string(),
        b => format!("0x{b:02x}"),
    }
}

// ============================================================================
// PARSE ERROR - Where it went wrong
// ============================================================================

/// File, line, and column of an error. Lines and columns start at 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub file: String,
    pub line: usize,
    pub column: usize,
}

/// Source information attached to a diagnostic.
#[derive(Debug, Clone)]
pub struct SourceInfo {
    pub source: Arc<NamedSource<String>>,
    pub primary_span: SourceSpan,
}

/// Diagnostic enhancement data
#[derive(Debug, Clone)]
pub struct DiagnosticInfo {
    pub help: Option<String>,
    pub error_code: String,
}

/// A hard parse failure. The whole document fails with exactly one of these.
#[derive(Debug)]
pub struct ParseError {
    pub kind: ErrorKind,
    pub location: Location,
    pub source_info: SourceInfo,
    pub diagnostic_info: DiagnosticInfo,
}

impl ParseError {
    pub fn new(
        kind: ErrorKind,
        location: Location,
        source: Arc<NamedSource<String>>,
        span: Section,
    ) -> Self {
        let diagnostic_info = DiagnosticInfo {
            help: kind.help(),
            error_code: format!("yabai3::parse::{}", kind.code_suffix()),
        };
        Self {
            kind,
            location,
            source_info: SourceInfo {
                source,
                primary_span: span.into(),
            },
            diagnostic_info,
        }
    }

    pub fn file(&self) -> &str {
        &self.location.file
    }

    pub fn line(&self) -> usize {
        self.location.line
    }

    pub fn column(&self) -> usize {
        self.location.column
    }

    /// The underlying message without the location prefix.
    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

impl std::error::Error for ParseError {}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}: {}",
            self.location.file, self.location.line, self.location.column, self.kind
        )
    }
}

impl Diagnostic for ParseError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(&self.diagnostic_info.error_code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diagnostic_info
            .help
            .as_ref()
            .map(|h| Box::new(h) as Box<dyn fmt::Display + 'a>)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let labels = vec![LabeledSpan::new_with_span(
            Some(self.kind.primary_label().into()),
            self.source_info.primary_span,
        )];
        Some(Box::new(labels.into_iter()))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&*self.source_info.source)
    }
}

/// Context-aware error creation. Implemented by the reader so that every
/// error is built from the reader's own file name and source text.
pub trait ErrorReporting {
    /// Create an error located at the start of `span`.
    fn report(&self, kind: ErrorKind, span: Section) -> ParseError;

    /// The span of the byte under the cursor (empty at end of input).
    fn here(&self) -> Section;

    fn report_here(&self, kind: ErrorKind) -> ParseError {
        self.report(kind, self.here())
    }

    fn unexpected_byte(&self, expected: &str, found: u8) -> ParseError {
        self.report_here(ErrorKind::UnexpectedByte {
            expected: expected.into(),
            found: describe_byte(found),
        })
    }
}

// ============================================================================
// LOAD ERRORS - Reading configuration from disk
// ============================================================================

/// Failure to obtain a parsed document from a path.
#[derive(Debug, Error, Diagnostic)]
pub enum LoadError {
    #[error("{}: {source}", .path.display())]
    #[diagnostic(code(yabai3::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] ParseError),
    #[error("no config file found (searched {})", display_paths(.searched))]
    #[diagnostic(
        code(yabai3::config::not_found),
        help("pass --config <path> to choose a file explicitly")
    )]
    NotFound { searched: Vec<PathBuf> },
}

fn display_paths(paths: &[PathBuf]) -> String {
    if paths.is_empty() {
        return "nothing".into();
    }
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

// ============================================================================
// ERROR FORMATTING UTILITIES
// ============================================================================

/// Prints an error with full miette diagnostics to stderr.
pub fn print_error<E>(error: E)
where
    E: Diagnostic + Send + Sync + 'static,
{
    let report = miette::Report::new(error);
    eprintln!("{report:?}");
}
