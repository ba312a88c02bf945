//! Error types for posdraw operations.
//!
//! This module provides the main error type [`PosDrawError`] which wraps
//! the error conditions that can occur while converting a document.

use std::{io, path::PathBuf};

use thiserror::Error;

use posdraw_parser::error::ParseError;

use crate::check::CheckError;

/// The main error type for posdraw operations.
///
/// # Diagnostic Variants
///
/// The `Parse` variant carries the structured diagnostics produced by the
/// loader together with the path of the offending document, so callers can
/// render each diagnostic on its own.
#[derive(Debug, Error)]
pub enum PosDrawError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{}: {err}", path.display())]
    Parse { err: ParseError, path: PathBuf },

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error + Send + Sync>),

    #[error("Check failed: {0}")]
    Check(#[from] CheckError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{failed} of {total} documents failed to convert")]
    Batch { failed: usize, total: usize },
}

impl From<crate::drawio::Error> for PosDrawError {
    fn from(error: crate::drawio::Error) -> Self {
        Self::Export(Box::new(error))
    }
}

impl PosDrawError {
    /// Create a new `Parse` error for the document at `path`.
    pub fn new_parse_error(err: ParseError, path: impl Into<PathBuf>) -> Self {
        Self::Parse {
            err,
            path: path.into(),
        }
    }
}
