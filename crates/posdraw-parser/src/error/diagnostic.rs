//! Diagnostics produced while loading a source document.

use std::fmt;

use crate::error::{ErrorCode, Severity};

/// A one-based line and column position inside the source document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Location {
    line: usize,
    column: usize,
}

impl Location {
    /// Creates a new location.
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Returns the one-based line.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Returns the one-based column.
    pub fn column(&self) -> usize {
        self.column
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// A single error or warning, with optional code, location and help text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    severity: Severity,
    code: Option<ErrorCode>,
    message: String,
    location: Option<Location>,
    help: Option<String>,
}

impl Diagnostic {
    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            code: None,
            message: message.into(),
            location: None,
            help: None,
        }
    }

    /// Creates an error diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Creates a warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    /// Attaches an error code.
    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Attaches a source location.
    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Attaches help text.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn location(&self) -> Option<Location> {
        self.location
    }

    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)
    }
}

impl From<serde_json::Error> for Diagnostic {
    fn from(err: serde_json::Error) -> Self {
        let code = ErrorCode::from(err.classify());
        let mut diagnostic = Diagnostic::error(format!("{}: {err}", code.description()))
            .with_code(code)
            .with_help(code.help());

        // serde_json reports line 0 when it has no position (I/O failures).
        if err.line() > 0 {
            diagnostic = diagnostic.with_location(Location::new(err.line(), err.column()));
        }

        diagnostic
    }
}
