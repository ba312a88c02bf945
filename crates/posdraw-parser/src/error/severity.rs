//! How serious a diagnostic is.

use std::fmt;

/// Severity of a [`Diagnostic`](super::Diagnostic).
///
/// Errors stop a document from being converted. Warnings describe documents
/// that load but convert to an empty diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        })
    }
}
