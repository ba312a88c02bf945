//! Source loaders for pos documents.
//!
//! A pos document is one JSON value. The element collection lives at
//! [`ELEMENTS_PATH`]; everything else in the document (page settings, image
//! payloads, themes) is of no interest to the converter.
//!
//! Two loaders implement [`SourceLoader`]:
//!
//! - [`FullDocumentLoader`] parses the whole document into a value tree and
//!   projects the collection out of it.
//! - [`ElementSubtreeLoader`] walks the document with a streaming
//!   deserializer, descends only along the collection path, and checks every
//!   other value without building it.
//!
//! Both loaders read the whole input, resolve repeated keys the same way
//! (the last occurrence wins), and feed the same record decoder, so they
//! yield identical results for the same bytes.

use std::{
    fmt,
    io::{BufReader, Read},
};

use indexmap::IndexMap;
use log::{debug, trace};
use serde::de::{self, DeserializeSeed, MapAccess, SeqAccess, Visitor};
use serde_json::Value;

use posdraw_core::collection::ElementCollection;

use crate::error::{Diagnostic, ErrorCode, ParseError};

/// Key path from the document root to the element collection.
pub const ELEMENTS_PATH: [&str; 3] = ["diagram", "elements", "elements"];

/// Result of loading a source document.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// The element collection was present and decoded.
    Found(ElementCollection),
    /// Some level of [`ELEMENTS_PATH`] was missing or not an object.
    NoElementsFound,
}

impl LoadOutcome {
    /// Returns the collection, if one was found.
    pub fn collection(&self) -> Option<&ElementCollection> {
        match self {
            LoadOutcome::Found(collection) => Some(collection),
            LoadOutcome::NoElementsFound => None,
        }
    }

    /// Consumes the outcome, treating a missing collection as empty.
    pub fn into_collection(self) -> ElementCollection {
        match self {
            LoadOutcome::Found(collection) => collection,
            LoadOutcome::NoElementsFound => ElementCollection::default(),
        }
    }

    /// Returns the warning for a document without an element collection.
    ///
    /// ```
    /// # use posdraw_parser::{LoadOutcome, error::ErrorCode};
    /// let warning = LoadOutcome::NoElementsFound.warning().unwrap();
    /// assert_eq!(warning.code(), Some(ErrorCode::W001));
    /// ```
    pub fn warning(&self) -> Option<Diagnostic> {
        match self {
            LoadOutcome::Found(_) => None,
            LoadOutcome::NoElementsFound => Some(
                Diagnostic::warning(format!(
                    "no element collection found at `{}`",
                    ELEMENTS_PATH.join(".")
                ))
                .with_code(ErrorCode::W001)
                .with_help(ErrorCode::W001.help()),
            ),
        }
    }

    fn from_entries(entries: Option<impl IntoIterator<Item = (String, Value)>>) -> Self {
        match entries {
            Some(entries) => {
                let collection = ElementCollection::from_entries(entries);
                debug!(
                    records = collection.len(),
                    rejected = collection.rejected().len();
                    "Element collection decoded"
                );
                LoadOutcome::Found(collection)
            }
            None => {
                debug!(path:% = ELEMENTS_PATH.join("."); "Element collection not found");
                LoadOutcome::NoElementsFound
            }
        }
    }
}

/// A strategy for reading the element collection out of a source document.
pub trait SourceLoader: fmt::Debug + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Reads the whole input and returns the element collection.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] if the input is not a single well-formed JSON
    /// value or cannot be read.
    fn load(&self, reader: &mut dyn Read) -> Result<LoadOutcome, ParseError>;
}

/// Loads the whole document into memory before projecting the collection.
#[derive(Debug, Clone, Copy, Default)]
pub struct FullDocumentLoader;

impl FullDocumentLoader {
    fn project(mut value: Value) -> Option<serde_json::Map<String, Value>> {
        for segment in ELEMENTS_PATH {
            value = match value {
                Value::Object(mut map) => map.remove(segment)?,
                _ => return None,
            };
        }

        match value {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }
}

impl SourceLoader for FullDocumentLoader {
    fn name(&self) -> &'static str {
        "full"
    }

    fn load(&self, reader: &mut dyn Read) -> Result<LoadOutcome, ParseError> {
        let value: Value = serde_json::from_reader(BufReader::new(reader))?;
        trace!("Source document parsed into value tree");

        Ok(LoadOutcome::from_entries(Self::project(value)))
    }
}

/// Streams the document, materializing only the element collection.
#[derive(Debug, Clone, Copy, Default)]
pub struct ElementSubtreeLoader;

impl SourceLoader for ElementSubtreeLoader {
    fn name(&self) -> &'static str {
        "subtree"
    }

    fn load(&self, reader: &mut dyn Read) -> Result<LoadOutcome, ParseError> {
        let mut deserializer = serde_json::Deserializer::from_reader(BufReader::new(reader));
        let entries = PathSeed::new(&ELEMENTS_PATH).deserialize(&mut deserializer)?;
        deserializer.end()?;

        Ok(LoadOutcome::from_entries(entries))
    }
}

type Entries = IndexMap<String, Value>;

/// Deserializes the object found at `path` below the current value.
///
/// Produces `None` when the current value is not an object or the path does
/// not continue inside it.
struct PathSeed<'p> {
    path: &'p [&'p str],
}

impl<'p> PathSeed<'p> {
    fn new(path: &'p [&'p str]) -> Self {
        Self { path }
    }
}

impl<'de> DeserializeSeed<'de> for PathSeed<'_> {
    type Value = Option<Entries>;

    fn deserialize<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        deserializer.deserialize_any(PathVisitor { path: self.path })
    }
}

struct PathVisitor<'p> {
    path: &'p [&'p str],
}

impl<'de> Visitor<'de> for PathVisitor<'_> {
    type Value = Option<Entries>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("any JSON value")
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_i64<E: de::Error>(self, _: i64) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_u64<E: de::Error>(self, _: u64) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_f64<E: de::Error>(self, _: f64) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_str<E: de::Error>(self, _: &str) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        while seq.next_element_seed(Discard)?.is_some() {}
        Ok(None)
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let Some((segment, rest)) = self.path.split_first() else {
            // End of the path: this object is the element collection.
            let mut entries = Entries::new();
            while let Some((id, value)) = map.next_entry::<String, Value>()? {
                entries.insert(id, value);
            }
            return Ok(Some(entries));
        };

        let mut found = None;
        while let Some(key) = map.next_key::<String>()? {
            if key == *segment {
                // Repeated keys: the last occurrence decides.
                found = map.next_value_seed(PathSeed::new(rest))?;
            } else {
                map.next_value_seed(Discard)?;
            }
        }

        Ok(found)
    }
}

/// Reads one value and drops it.
///
/// Unlike `IgnoredAny`, strings and numbers go through the regular parse, so
/// invalid UTF-8, lone surrogates and out-of-range numbers fail here the same
/// way they fail when building a `Value`.
#[derive(Clone, Copy)]
struct Discard;

impl<'de> DeserializeSeed<'de> for Discard {
    type Value = ();

    fn deserialize<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }
}

impl<'de> Visitor<'de> for Discard {
    type Value = ();

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("any JSON value")
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<(), E> {
        Ok(())
    }

    fn visit_i64<E: de::Error>(self, _: i64) -> Result<(), E> {
        Ok(())
    }

    fn visit_u64<E: de::Error>(self, _: u64) -> Result<(), E> {
        Ok(())
    }

    fn visit_f64<E: de::Error>(self, _: f64) -> Result<(), E> {
        Ok(())
    }

    fn visit_str<E: de::Error>(self, _: &str) -> Result<(), E> {
        Ok(())
    }

    fn visit_unit<E: de::Error>(self) -> Result<(), E> {
        Ok(())
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<(), A::Error>
    where
        A: SeqAccess<'de>,
    {
        while seq.next_element_seed(Discard)?.is_some() {}
        Ok(())
    }

    fn visit_map<A>(self, mut map: A) -> Result<(), A::Error>
    where
        A: MapAccess<'de>,
    {
        while map.next_key_seed(Discard)?.is_some() {
            map.next_value_seed(Discard)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load_both(source: &str) -> (LoadOutcome, LoadOutcome) {
        let full = FullDocumentLoader
            .load(&mut source.as_bytes())
            .expect("full load failed");
        let subtree = ElementSubtreeLoader
            .load(&mut source.as_bytes())
            .expect("subtree load failed");
        (full, subtree)
    }

    fn ids(outcome: &LoadOutcome) -> Vec<String> {
        outcome
            .collection()
            .map(|c| c.iter().map(|r| r.id().to_string()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_loads_collection_in_document_order() {
        let source = r#"{
            "page": {"width": 1000},
            "diagram": {
                "image": "aGVsbG8=",
                "elements": {
                    "theme": {},
                    "elements": {
                        "Z": {"name": "rect"},
                        "A": {"name": "linker"}
                    }
                }
            }
        }"#;

        let (full, subtree) = load_both(source);
        assert_eq!(ids(&full), vec!["Z", "A"]);
        assert_eq!(full, subtree);
    }

    #[test]
    fn test_missing_path_is_no_elements_found() {
        for source in [
            r#"{}"#,
            r#"{"diagram": {}}"#,
            r#"{"diagram": {"elements": {}}}"#,
            r#"{"diagram": {"elements": {"elements": []}}}"#,
            r#"{"diagram": 3}"#,
            r#"[1, 2, 3]"#,
            r#""text""#,
        ] {
            let (full, subtree) = load_both(source);
            assert_eq!(full, LoadOutcome::NoElementsFound, "{source}");
            assert_eq!(subtree, LoadOutcome::NoElementsFound, "{source}");
        }
    }

    #[test]
    fn test_warning_only_without_collection() {
        let (found, _) = load_both(r#"{"diagram": {"elements": {"elements": {}}}}"#);
        assert_eq!(found.warning(), None);

        let (missing, _) = load_both(r#"{"diagram": {}}"#);
        let warning = missing.warning().expect("Expected a warning");
        assert_eq!(warning.severity(), crate::error::Severity::Warning);
        assert_eq!(warning.code(), Some(ErrorCode::W001));
        assert!(warning.message().contains("diagram.elements.elements"));
        assert!(warning.help().is_some());
    }

    #[test]
    fn test_empty_collection_is_found() {
        let (full, subtree) = load_both(r#"{"diagram": {"elements": {"elements": {}}}}"#);
        assert_eq!(full, LoadOutcome::Found(ElementCollection::default()));
        assert_eq!(full, subtree);
    }

    #[test]
    fn test_last_duplicate_wins_along_path() {
        let source = r#"{
            "diagram": {"elements": {"elements": {"A": {"name": "rect"}}}},
            "diagram": {"elements": {"elements": {"B": {"name": "rect"}}}}
        }"#;

        let (full, subtree) = load_both(source);
        assert_eq!(ids(&full), vec!["B"]);
        assert_eq!(full, subtree);
    }

    #[test]
    fn test_later_non_object_duplicate_hides_collection() {
        let source = r#"{
            "diagram": {"elements": {"elements": {"A": {"name": "rect"}}}},
            "diagram": null
        }"#;

        let (full, subtree) = load_both(source);
        assert_eq!(full, LoadOutcome::NoElementsFound);
        assert_eq!(subtree, LoadOutcome::NoElementsFound);
    }

    #[test]
    fn test_trailing_garbage_fails_both() {
        let source = r#"{"diagram": {}} x"#;
        assert!(FullDocumentLoader.load(&mut source.as_bytes()).is_err());
        assert!(ElementSubtreeLoader.load(&mut source.as_bytes()).is_err());
    }

    #[test]
    fn test_syntax_error_outside_path_fails_subtree() {
        let source = r#"{"page": {"width": 10,}, "diagram": {}}"#;
        assert!(ElementSubtreeLoader.load(&mut source.as_bytes()).is_err());
    }

    #[test]
    fn test_loader_names() {
        assert_eq!(FullDocumentLoader.name(), "full");
        assert_eq!(ElementSubtreeLoader.name(), "subtree");
    }
}
