//! Error types and diagnostics.
//!
//! Parsing is the only fallible stage of the crate. Errors carry line,
//! column and byte offset so callers can point at the offending markup.
//! In recovery mode the parser collects `ParseDiagnostic`s on the
//! `Document` instead of failing.
//!
//! Queries never fail: a missing node or an unmatched name is an empty
//! result, and an unknown charset label is `None`.

use std::fmt;

/// Severity level for a parse diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorSeverity {
    /// A non-fatal issue that doesn't prevent parsing.
    Warning,
    /// A recoverable error. The document is malformed but a tree was built.
    Error,
    /// An unrecoverable error; parsing stopped.
    Fatal,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
            Self::Fatal => write!(f, "fatal error"),
        }
    }
}

/// Source location within a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLocation {
    /// 1-based line number.
    pub line: u32,
    /// 1-based column number (in characters, not bytes).
    pub column: u32,
    /// 0-based byte offset from the start of the input.
    pub byte_offset: usize,
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A single diagnostic emitted during parsing.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{severity}: {message} at {location}")]
pub struct ParseDiagnostic {
    /// The severity of this diagnostic.
    pub severity: ErrorSeverity,
    /// Human-readable message.
    pub message: String,
    /// Where in the source this happened.
    pub location: SourceLocation,
}

/// The error returned when a document cannot be turned into a node graph.
#[derive(Debug, Clone, thiserror::Error)]
#[error("parse error at {location}: {message}")]
pub struct ParseError {
    /// The primary error message.
    pub message: String,
    /// Where in the source the fatal error occurred.
    pub location: SourceLocation,
    /// Diagnostics collected before the fatal error.
    pub diagnostics: Vec<ParseDiagnostic>,
}

impl ParseError {
    /// Creates an error with no location, used for failures detected before
    /// the parser has consumed any input (e.g. undecodable bytes).
    pub(crate) fn at_start(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            location: SourceLocation::default(),
            diagnostics: Vec::new(),
        }
    }
}

/// An error that occurs during encoding detection or transcoding.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("encoding error: {message}")]
pub struct EncodingError {
    /// A human-readable description of the encoding error.
    pub message: String,
}

impl EncodingError {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<EncodingError> for ParseError {
    fn from(err: EncodingError) -> Self {
        Self::at_start(err.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_location_display() {
        let loc = SourceLocation {
            line: 10,
            column: 5,
            byte_offset: 42,
        };
        assert_eq!(loc.to_string(), "10:5");
    }

    #[test]
    fn test_parse_error_display() {
        let err = ParseError {
            message: "unexpected end of input".to_string(),
            location: SourceLocation {
                line: 1,
                column: 15,
                byte_offset: 14,
            },
            diagnostics: vec![],
        };
        assert_eq!(
            err.to_string(),
            "parse error at 1:15: unexpected end of input"
        );
    }

    #[test]
    fn test_parse_diagnostic_display() {
        let diag = ParseDiagnostic {
            severity: ErrorSeverity::Warning,
            message: "end tag 'p' has no open element".to_string(),
            location: SourceLocation {
                line: 3,
                column: 10,
                byte_offset: 50,
            },
        };
        assert_eq!(
            diag.to_string(),
            "warning: end tag 'p' has no open element at 3:10"
        );
    }

    #[test]
    fn test_encoding_error_converts_to_parse_error() {
        let err: ParseError = EncodingError::new("input is not valid UTF-8").into();
        assert_eq!(err.location, SourceLocation::default());
        assert_eq!(err.message, "input is not valid UTF-8");
    }

    #[test]
    fn test_errors_implement_error_trait() {
        let err = ParseError::at_start("test");
        let _: &dyn std::error::Error = &err;
        let err = EncodingError::new("test");
        let _: &dyn std::error::Error = &err;
    }
}
