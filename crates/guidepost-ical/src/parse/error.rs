//! Parse error types.

use std::fmt;

/// What went wrong while parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    MissingPropertyName,
    InvalidPropertyName,
    InvalidParameter,
    UnclosedQuote,
    MissingColon,
    MissingBegin,
    MissingEnd,
    MismatchedComponent,
    InvalidDate,
    InvalidTime,
    InvalidDateTime,
    InvalidDuration,
    UnknownTimezone,
}

impl ParseErrorKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MissingPropertyName => "missing property name",
            Self::InvalidPropertyName => "invalid property name",
            Self::InvalidParameter => "invalid parameter",
            Self::UnclosedQuote => "unclosed quoted parameter value",
            Self::MissingColon => "missing ':' separator",
            Self::MissingBegin => "missing BEGIN",
            Self::MissingEnd => "missing END",
            Self::MismatchedComponent => "mismatched BEGIN/END",
            Self::InvalidDate => "invalid DATE value",
            Self::InvalidTime => "invalid TIME value",
            Self::InvalidDateTime => "invalid DATE-TIME value",
            Self::InvalidDuration => "invalid DURATION value",
            Self::UnknownTimezone => "unknown timezone identifier",
        }
    }
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parse failure with the line it occurred on.
///
/// Value-level parsers (dates, durations) report line 0; the document
/// parser fills in the real line when it propagates them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub line: usize,
    pub context: Option<String>,
}

impl ParseError {
    #[must_use]
    pub const fn new(kind: ParseErrorKind, line: usize) -> Self {
        Self {
            kind,
            line,
            context: None,
        }
    }

    /// Creates a value-level error with no line attribution.
    #[must_use]
    pub const fn value(kind: ParseErrorKind) -> Self {
        Self::new(kind, 0)
    }

    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Attributes the error to a line if it does not have one yet.
    #[must_use]
    pub fn at_line(mut self, line: usize) -> Self {
        if self.line == 0 {
            self.line = line;
        }
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.line == 0 {
            write!(f, "{}", self.kind)?;
        } else {
            write!(f, "{} at line {}", self.kind, self.line)?;
        }
        if let Some(context) = &self.context {
            write!(f, ": {context}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

pub type ParseResult<T> = std::result::Result<T, ParseError>;
