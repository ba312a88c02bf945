//! The element collection of a pos document.
//!
//! [`ElementCollection`] maps record identifiers to decoded
//! [`ElementRecord`]s in document order. Records that fail to decode are not
//! fatal: they are kept aside as [`SkippedElement`]s so the converter can
//! report them next to its own skips.

use indexmap::IndexMap;
use log::debug;
use serde_json::Value;

use crate::{element::ElementRecord, skip::SkippedElement};

/// Ordered mapping from identifier to element record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementCollection {
    records: IndexMap<String, ElementRecord>,
    rejected: Vec<SkippedElement>,
}

impl ElementCollection {
    /// Decodes raw `(id, value)` entries in iteration order.
    ///
    /// A repeated identifier replaces the earlier record but keeps its
    /// original position, matching how JSON objects with duplicate keys are
    /// read.
    ///
    /// # Examples
    ///
    /// ```
    /// # use posdraw_core::collection::ElementCollection;
    /// # use serde_json::json;
    /// let collection = ElementCollection::from_entries([
    ///     ("A".to_string(), json!({"name": "rect"})),
    ///     ("B".to_string(), json!({"props": {}})),
    /// ]);
    /// assert_eq!(collection.len(), 1);
    /// assert_eq!(collection.rejected().len(), 1);
    /// ```
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        let mut collection = Self::default();

        for (id, value) in entries {
            match ElementRecord::from_value(id.clone(), value) {
                Ok(record) => {
                    collection.records.insert(id, record);
                }
                Err(reason) => {
                    debug!(id, reason:% = reason; "Rejected element record");
                    collection.records.shift_remove(&id);
                    collection.rejected.push(SkippedElement::new(id, reason));
                }
            }
        }

        collection
    }

    /// Returns the number of decoded records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` when no record decoded successfully.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Looks up a record by identifier.
    pub fn get(&self, id: &str) -> Option<&ElementRecord> {
        self.records.get(id)
    }

    /// Iterates over records in document order.
    pub fn iter(&self) -> impl Iterator<Item = &ElementRecord> {
        self.records.values()
    }

    /// Returns records that could not be decoded, in document order.
    pub fn rejected(&self) -> &[SkippedElement] {
        &self.rejected
    }
}
