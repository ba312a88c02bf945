//! Error adapter for converting PosDrawError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI. Loader
//! diagnostics, errors and warnings alike, render through
//! [`DiagnosticAdapter`]; every other error renders through [`ErrorAdapter`].

use std::{fmt, path::Path};

use miette::{Diagnostic as MietteDiagnostic, Severity as MietteSeverity};

use posdraw::PosDrawError;
use posdraw_parser::error::{Diagnostic, Severity};

/// Adapter for a single loader diagnostic.
///
/// JSON positions are already part of the diagnostic message, so no source
/// snippet is attached.
pub struct DiagnosticAdapter<'a> {
    diag: &'a Diagnostic,
    path: &'a Path,
}

impl<'a> DiagnosticAdapter<'a> {
    /// Create a new diagnostic adapter for the document at `path`.
    pub fn new(diag: &'a Diagnostic, path: &'a Path) -> Self {
        Self { diag, path }
    }
}

impl fmt::Debug for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosticAdapter")
            .field("diag", &self.diag)
            .field("path", &self.path)
            .finish()
    }
}

impl fmt::Display for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.diag.message())
    }
}

impl std::error::Error for DiagnosticAdapter<'_> {}

impl MietteDiagnostic for DiagnosticAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diag
            .code()
            .map(|c| Box::new(c) as Box<dyn fmt::Display>)
    }

    fn severity(&self) -> Option<MietteSeverity> {
        Some(match self.diag.severity() {
            Severity::Error => MietteSeverity::Error,
            Severity::Warning => MietteSeverity::Warning,
        })
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diag
            .help()
            .map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }
}

/// Adapter for non-diagnostic [`PosDrawError`] variants.
///
/// This adapter handles errors that don't carry loader diagnostics, such as
/// I/O errors, export errors and configuration errors.
pub struct ErrorAdapter<'a>(pub &'a PosDrawError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            PosDrawError::Io(_) => "posdraw::io",
            PosDrawError::Parse { .. } => return None,
            PosDrawError::Export(_) => "posdraw::export",
            PosDrawError::Check(_) => "posdraw::check",
            PosDrawError::Config(_) => "posdraw::config",
            PosDrawError::Batch { .. } => "posdraw::batch",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match &self.0 {
            PosDrawError::Config(_) => "check the command-line inputs and the TOML file passed with --config or found in posdraw/config.toml",
            PosDrawError::Batch { .. } => "the errors above list each failed document",
            _ => return None,
        };
        Some(Box::new(help))
    }
}

/// A reportable error that can be rendered by miette.
///
/// This enum wraps either a single diagnostic or a non-diagnostic error,
/// providing a uniform interface for error rendering.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// A loader diagnostic for one document.
    Diagnostic(DiagnosticAdapter<'a>),
    /// A simple error without diagnostic detail.
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Diagnostic(d) => fmt::Display::fmt(d, f),
            Reportable::Error(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Diagnostic(_) => None,
            Reportable::Error(e) => e.source(),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.code(),
            Reportable::Error(e) => e.code(),
        }
    }

    fn severity(&self) -> Option<MietteSeverity> {
        match self {
            Reportable::Diagnostic(d) => d.severity(),
            Reportable::Error(e) => e.severity(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.help(),
            Reportable::Error(e) => e.help(),
        }
    }
}

/// Convert a [`PosDrawError`] into a reportable error.
///
/// [`PosDrawError::Parse`] reports its loader diagnostic against the
/// document path; other variants report the error itself.
pub fn to_reportable(err: &PosDrawError) -> Reportable<'_> {
    match err {
        PosDrawError::Parse {
            err: parse_err,
            path,
        } => Reportable::Diagnostic(DiagnosticAdapter::new(parse_err.diagnostic(), path)),
        _ => Reportable::Error(ErrorAdapter(err)),
    }
}

/// Render `err` with miette's graphical handler.
pub fn render(err: &PosDrawError) -> String {
    render_report(&to_reportable(err))
}

/// Render a loader warning for the document at `path`.
pub fn render_warning(warning: &Diagnostic, path: &Path) -> String {
    render_report(&DiagnosticAdapter::new(warning, path))
}

fn render_report(diagnostic: &dyn MietteDiagnostic) -> String {
    let mut writer = String::new();
    miette::GraphicalReportHandler::new()
        .render_report(&mut writer, diagnostic)
        .expect("Writing to String buffer is infallible");
    writer
}

#[cfg(test)]
mod tests {
    use posdraw::LoadOutcome;
    use posdraw_parser::error::{ErrorCode, Location, ParseError};

    use super::*;

    #[test]
    fn test_parse_diagnostic() {
        let diag = Diagnostic::error("expected value at line 1 column 2")
            .with_code(ErrorCode::E001)
            .with_location(Location::new(1, 2))
            .with_help("try this");
        let err = PosDrawError::new_parse_error(ParseError::from(diag), "a.pos");

        match to_reportable(&err) {
            Reportable::Diagnostic(d) => {
                assert_eq!(d.to_string(), "a.pos: expected value at line 1 column 2");
                assert_eq!(d.code().map(|c| c.to_string()), Some("E001".to_string()));
                assert_eq!(d.help().map(|h| h.to_string()), Some("try this".to_string()));
                assert_eq!(d.severity(), Some(MietteSeverity::Error));
            }
            Reportable::Error(_) => panic!("Expected Diagnostic"),
        }
    }

    #[test]
    fn test_non_parse_error() {
        let err = PosDrawError::Batch {
            failed: 2,
            total: 5,
        };

        match to_reportable(&err) {
            Reportable::Error(e) => {
                assert_eq!(e.to_string(), "2 of 5 documents failed to convert");
                assert_eq!(
                    e.code().map(|c| c.to_string()),
                    Some("posdraw::batch".to_string())
                );
            }
            Reportable::Diagnostic(_) => panic!("Expected Error"),
        }
    }

    #[test]
    fn test_missing_collection_warning() {
        let warning = LoadOutcome::NoElementsFound
            .warning()
            .expect("Expected a warning");
        let adapter = DiagnosticAdapter::new(&warning, Path::new("blank.pos"));

        assert_eq!(adapter.severity(), Some(MietteSeverity::Warning));
        assert_eq!(adapter.code().map(|c| c.to_string()), Some("W001".to_string()));
        assert!(adapter.to_string().starts_with("blank.pos: no element collection found"));

        let rendered = render_warning(&warning, Path::new("blank.pos"));
        assert!(rendered.contains("W001"));
    }

    #[test]
    fn test_render_includes_code() {
        let err = PosDrawError::Config("bad color".to_string());

        let rendered = render(&err);
        assert!(rendered.contains("posdraw::config"));
        assert!(rendered.contains("bad color"));
    }
}
