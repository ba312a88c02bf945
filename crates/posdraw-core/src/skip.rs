//! Per-element skip diagnostics.
//!
//! A single bad record never aborts a conversion. Instead it is described by a
//! [`SkippedElement`] and left out of the output. Skips are informational:
//! they are logged and reported, and the rest of the document is still
//! converted.

use std::fmt;

/// Why an element was left out of the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The record could not be decoded (wrong JSON types, not an object, ...).
    Malformed(String),

    /// The record has no `name`, so its kind is unknown.
    MissingKind,

    /// A shape record lacks one of the `props` fields needed for its geometry.
    MissingGeometry { field: &'static str },

    /// A connector references an endpoint that was not emitted as a node.
    MissingEndpoint {
        source: Option<String>,
        target: Option<String>,
    },

    /// The record identifier collides with one of the reserved root cells.
    ReservedId,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Malformed(detail) => write!(f, "malformed record: {detail}"),
            SkipReason::MissingKind => write!(f, "record has no `name`"),
            SkipReason::MissingGeometry { field } => {
                write!(f, "shape is missing geometry field `props.{field}`")
            }
            SkipReason::MissingEndpoint { source, target } => write!(
                f,
                "source `{}` or target `{}` not found among emitted nodes",
                source.as_deref().unwrap_or("<none>"),
                target.as_deref().unwrap_or("<none>"),
            ),
            SkipReason::ReservedId => write!(f, "identifier is reserved for a root cell"),
        }
    }
}

/// An element that was excluded from the output, with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedElement {
    id: String,
    reason: SkipReason,
}

impl SkippedElement {
    /// Creates a new skip record.
    pub fn new(id: impl Into<String>, reason: SkipReason) -> Self {
        Self {
            id: id.into(),
            reason,
        }
    }

    /// Returns the identifier of the skipped record.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns why the record was skipped.
    pub fn reason(&self) -> &SkipReason {
        &self.reason
    }
}

impl fmt::Display for SkippedElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "element `{}` skipped: {}", self.id, self.reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_endpoint_display() {
        let skipped = SkippedElement::new(
            "link1",
            SkipReason::MissingEndpoint {
                source: Some("A".to_string()),
                target: None,
            },
        );

        assert_eq!(
            skipped.to_string(),
            "element `link1` skipped: source `A` or target `<none>` not found among emitted nodes"
        );
    }

    #[test]
    fn test_missing_geometry_display() {
        let reason = SkipReason::MissingGeometry { field: "w" };
        assert_eq!(reason.to_string(), "shape is missing geometry field `props.w`");
    }
}
