//! Read-only summaries of pos element collections.
//!
//! Used to look at a document before converting it: which kinds it
//! contains, how many of each, and what a typical record of each kind
//! carries.

use std::fmt;

use indexmap::IndexMap;

use posdraw_core::{
    collection::ElementCollection,
    element::ElementRecord,
    geometry::{Bounds, format_coordinate},
};

/// One representative record of a kind.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementSample {
    id: String,
    bounds: Option<Bounds>,
    text: Option<String>,
    endpoints: Option<(Option<String>, Option<String>)>,
}

impl ElementSample {
    fn from_record(record: &ElementRecord) -> Self {
        let endpoints = record.kind().is_linker().then(|| {
            (
                record.from().and_then(|end| end.id()).map(str::to_string),
                record.to().and_then(|end| end.id()).map(str::to_string),
            )
        });

        Self {
            id: record.id().to_string(),
            bounds: record.props().and_then(|props| props.bounds().ok()),
            text: record.first_text().map(str::to_string),
            endpoints,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the geometry when all four `props` fields are present.
    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    /// Returns the raw text of the first text block.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Returns the `from` / `to` identifiers of a connector sample.
    pub fn endpoints(&self) -> Option<(Option<&str>, Option<&str>)> {
        self.endpoints
            .as_ref()
            .map(|(from, to)| (from.as_deref(), to.as_deref()))
    }
}

/// Per-kind statistics of an element collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceSummary {
    total: usize,
    rejected: usize,
    kinds: IndexMap<String, usize>,
    samples: IndexMap<String, ElementSample>,
}

impl SourceSummary {
    /// Summarizes `collection`, keeping kinds in first-seen order.
    pub fn from_collection(collection: &ElementCollection) -> Self {
        let mut summary = Self {
            total: collection.len() + collection.rejected().len(),
            rejected: collection.rejected().len(),
            ..Self::default()
        };

        for record in collection.iter() {
            let kind = record.kind().name();
            *summary.kinds.entry(kind.to_string()).or_default() += 1;
            if !summary.samples.contains_key(kind) {
                summary
                    .samples
                    .insert(kind.to_string(), ElementSample::from_record(record));
            }
        }

        summary
    }

    /// Number of entries in the collection, rejected ones included.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Number of entries that could not be decoded.
    pub fn rejected(&self) -> usize {
        self.rejected
    }

    /// Returns the count of each kind in first-seen order.
    pub fn kinds(&self) -> &IndexMap<String, usize> {
        &self.kinds
    }

    /// Returns the first record seen for `kind`.
    pub fn sample(&self, kind: &str) -> Option<&ElementSample> {
        self.samples.get(kind)
    }
}

impl fmt::Display for SourceSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total elements: {}", self.total)?;
        if self.rejected > 0 {
            writeln!(f, "Undecodable elements: {}", self.rejected)?;
        }

        writeln!(f, "Element kinds:")?;
        for (kind, count) in &self.kinds {
            writeln!(f, "  {kind}: {count}")?;
        }

        for (kind, sample) in &self.samples {
            writeln!(f)?;
            writeln!(f, "{kind} sample:")?;
            writeln!(f, "  id: {}", sample.id)?;
            if let Some(bounds) = sample.bounds {
                writeln!(
                    f,
                    "  geometry: x={}, y={}, w={}, h={}",
                    format_coordinate(bounds.min_x()),
                    format_coordinate(bounds.min_y()),
                    format_coordinate(bounds.width()),
                    format_coordinate(bounds.height()),
                )?;
            }
            if let Some(text) = &sample.text {
                writeln!(f, "  text: {text}")?;
            }
            if let Some((from, to)) = sample.endpoints() {
                writeln!(
                    f,
                    "  link: {} -> {}",
                    from.unwrap_or("N/A"),
                    to.unwrap_or("N/A")
                )?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn sample_collection() -> ElementCollection {
        let Some(entries) = json!({
            "A": {"name": "rect", "props": {"x": 0, "y": 0, "w": 100, "h": 50}, "textBlock": [{"text": "Start"}]},
            "L": {"name": "linker", "from": {"id": "A"}, "to": {}},
            "B": {"name": "rect"},
            "X": {"name": 5},
        })
        .as_object()
        .cloned() else {
            panic!("Expected object");
        };
        ElementCollection::from_entries(entries)
    }

    #[test]
    fn test_counts_in_first_seen_order() {
        let summary = SourceSummary::from_collection(&sample_collection());

        assert_eq!(summary.total(), 4);
        assert_eq!(summary.rejected(), 1);

        let kinds: Vec<(&str, usize)> = summary
            .kinds()
            .iter()
            .map(|(kind, count)| (kind.as_str(), *count))
            .collect();
        assert_eq!(kinds, vec![("rect", 2), ("linker", 1)]);
    }

    #[test]
    fn test_samples() {
        let summary = SourceSummary::from_collection(&sample_collection());

        let rect = summary.sample("rect").expect("rect sample");
        assert_eq!(rect.id(), "A");
        assert_eq!(rect.text(), Some("Start"));
        assert!(rect.bounds().is_some());
        assert_eq!(rect.endpoints(), None);

        let linker = summary.sample("linker").expect("linker sample");
        assert_eq!(linker.endpoints(), Some((Some("A"), None)));
    }

    #[test]
    fn test_display() {
        let text = SourceSummary::from_collection(&sample_collection()).to_string();

        assert!(text.starts_with("Total elements: 4\n"));
        assert!(text.contains("  rect: 2\n"));
        assert!(text.contains("  geometry: x=0, y=0, w=100, h=50\n"));
        assert!(text.contains("  link: A -> N/A\n"));
    }
}
