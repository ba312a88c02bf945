//! Error and diagnostic system for the pos loader.
//!
//! This module provides an error handling system with:
//! - Error codes for documentation and searchability
//! - Source locations (line and column) when the JSON reader knows them
//! - Severity levels
//!
//! # Overview
//!
//! The error system is built around the [`Diagnostic`] type, which represents
//! a single error or warning message with optional error code, location, and
//! help text. Diagnostics are wrapped in [`ParseError`] for returning from a
//! load.
//!
//! # Example
//!
//! ```
//! # use posdraw_parser::error::{Diagnostic, ErrorCode, Location};
//!
//! let diag = Diagnostic::error("expected `,` or `}`")
//!     .with_code(ErrorCode::E001)
//!     .with_location(Location::new(3, 17))
//!     .with_help("the source file is not valid JSON");
//! ```

mod diagnostic;
mod error_code;
mod parse_error;
mod severity;

pub use diagnostic::{Diagnostic, Location};
pub use error_code::ErrorCode;
pub use parse_error::ParseError;
pub use severity::Severity;
