//! The ParseError type returned when a source document cannot be read.

use std::fmt;

use crate::error::Diagnostic;

/// Error type for loading a source document.
///
/// The JSON reader stops at the first problem, so a load fails with exactly
/// one diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    diagnostic: Diagnostic,
}

impl ParseError {
    /// Returns the diagnostic describing the failure.
    pub fn diagnostic(&self) -> &Diagnostic {
        &self.diagnostic
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.diagnostic, f)
    }
}

impl std::error::Error for ParseError {}

impl From<Diagnostic> for ParseError {
    fn from(diagnostic: Diagnostic) -> Self {
        Self { diagnostic }
    }
}

impl From<serde_json::Error> for ParseError {
    fn from(err: serde_json::Error) -> Self {
        Diagnostic::from(err).into()
    }
}
