//! # posdraw parser
//!
//! Loader for pos diagram documents. A pos document is a JSON file whose
//! element collection lives at `diagram.elements.elements`; this crate reads
//! that collection into a [`posdraw_core::collection::ElementCollection`].
//!
//! Two [`SourceLoader`] strategies are available. [`FullDocumentLoader`]
//! parses the whole document, [`ElementSubtreeLoader`] streams it and only
//! keeps the collection. [`LoadStrategy`] chooses between them.
//!
//! ## Usage
//!
//! ```
//! # use posdraw_parser::{load, LoadOutcome, LoadStrategy, ParseError};
//!
//! fn main() -> Result<(), ParseError> {
//!     let source = r#"{"diagram": {"elements": {"elements": {
//!         "A": {"name": "rect", "props": {"x": 0, "y": 0, "w": 100, "h": 50}}
//!     }}}}"#;
//!
//!     let outcome = load(&mut source.as_bytes(), LoadStrategy::Subtree)?;
//!     assert_eq!(outcome.collection().map(|c| c.len()), Some(1));
//!     Ok(())
//! }
//! ```

pub mod error;
mod loader;
mod strategy;

pub use error::ParseError;
pub use loader::{
    ELEMENTS_PATH, ElementSubtreeLoader, FullDocumentLoader, LoadOutcome, SourceLoader,
};
pub use strategy::{DEFAULT_SUBTREE_THRESHOLD, LoadStrategy};

use std::io::Read;

use log::debug;

/// Load a source document with the given strategy.
///
/// [`LoadStrategy::Auto`] cannot see the size of an arbitrary reader and
/// therefore streams.
///
/// # Errors
///
/// Returns [`ParseError`] if the document is not well-formed JSON or the
/// reader fails.
pub fn load(reader: &mut dyn Read, strategy: LoadStrategy) -> Result<LoadOutcome, ParseError> {
    let loader = strategy.loader();
    debug!(strategy:% = strategy, loader = loader.name(); "Loading source document");
    loader.load(reader)
}
