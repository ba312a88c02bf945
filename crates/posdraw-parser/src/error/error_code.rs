//! Error codes for the pos loader diagnostic system.
//!
//! Every code describes why a source document could not be read:
//! - `E001` - Invalid JSON syntax
//! - `E002` - Unexpected end of input
//! - `E003` - Read failure
//! - `E004` - JSON data error
//!
//! and why a document that did load converts to nothing:
//! - `W001` - No element collection

use std::fmt;

use serde_json::error::Category;

/// Error codes for categorizing diagnostic errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Invalid JSON syntax.
    ///
    /// The document contains something that is not valid JSON at this position.
    E001,

    /// Unexpected end of input.
    ///
    /// The document ended before the JSON value was complete, which usually
    /// means the file was truncated.
    E002,

    /// Read failure.
    ///
    /// The underlying reader failed while the document was being parsed.
    E003,

    /// JSON data error.
    ///
    /// The JSON was well formed but a value could not be represented.
    E004,

    /// No element collection.
    ///
    /// The document is valid JSON but has no object at
    /// `diagram.elements.elements`.
    W001,
}

impl ErrorCode {
    /// Returns the numeric code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "E001",
            ErrorCode::E002 => "E002",
            ErrorCode::E003 => "E003",
            ErrorCode::E004 => "E004",
            ErrorCode::W001 => "W001",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "invalid JSON syntax",
            ErrorCode::E002 => "unexpected end of input",
            ErrorCode::E003 => "read failure",
            ErrorCode::E004 => "invalid JSON data",
            ErrorCode::W001 => "no element collection",
        }
    }

    /// Returns a hint for fixing documents that fail with this code.
    pub fn help(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "the source file is not valid JSON; check that it is a pos document",
            ErrorCode::E002 => "the source file looks truncated; try exporting it again",
            ErrorCode::E003 => "check that the file is readable and not being written to",
            ErrorCode::E004 => "the document contains a value that cannot be represented",
            ErrorCode::W001 => {
                "pos documents keep their shapes under `diagram.elements.elements`; the output is an empty diagram"
            }
        }
    }
}

impl From<Category> for ErrorCode {
    fn from(category: Category) -> Self {
        match category {
            Category::Syntax => ErrorCode::E001,
            Category::Eof => ErrorCode::E002,
            Category::Io => ErrorCode::E003,
            Category::Data => ErrorCode::E004,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
