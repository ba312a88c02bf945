//! Selection between the full and subtree loaders.

use std::{fmt, str::FromStr};

use serde::Deserialize;

use crate::loader::{ElementSubtreeLoader, FullDocumentLoader, SourceLoader};

/// Documents at or above this many bytes are streamed under [`LoadStrategy::Auto`].
pub const DEFAULT_SUBTREE_THRESHOLD: u64 = 16 * 1024 * 1024;

static FULL_LOADER: FullDocumentLoader = FullDocumentLoader;
static SUBTREE_LOADER: ElementSubtreeLoader = ElementSubtreeLoader;

/// How a source document should be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadStrategy {
    /// Parse the whole document into memory.
    Full,
    /// Stream the document and keep only the element collection.
    Subtree,
    /// Pick by document size.
    #[default]
    Auto,
}

impl LoadStrategy {
    /// Resolves [`LoadStrategy::Auto`] to a concrete strategy.
    ///
    /// A document of unknown size is streamed. Explicit strategies are
    /// returned unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// # use posdraw_parser::LoadStrategy;
    /// assert_eq!(LoadStrategy::Auto.resolve(Some(10), 100), LoadStrategy::Full);
    /// assert_eq!(LoadStrategy::Auto.resolve(Some(100), 100), LoadStrategy::Subtree);
    /// assert_eq!(LoadStrategy::Full.resolve(None, 100), LoadStrategy::Full);
    /// ```
    pub fn resolve(self, size: Option<u64>, threshold: u64) -> LoadStrategy {
        match self {
            LoadStrategy::Auto => match size {
                Some(size) if size < threshold => LoadStrategy::Full,
                _ => LoadStrategy::Subtree,
            },
            strategy => strategy,
        }
    }

    /// Returns the loader for this strategy.
    ///
    /// [`LoadStrategy::Auto`] without a size maps to the subtree loader.
    pub fn loader(self) -> &'static dyn SourceLoader {
        match self {
            LoadStrategy::Full => &FULL_LOADER,
            LoadStrategy::Subtree | LoadStrategy::Auto => &SUBTREE_LOADER,
        }
    }
}

impl From<LoadStrategy> for &'static str {
    fn from(strategy: LoadStrategy) -> Self {
        match strategy {
            LoadStrategy::Full => "full",
            LoadStrategy::Subtree => "subtree",
            LoadStrategy::Auto => "auto",
        }
    }
}

impl fmt::Display for LoadStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str((*self).into())
    }
}

impl FromStr for LoadStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "full" => Ok(LoadStrategy::Full),
            "subtree" => Ok(LoadStrategy::Subtree),
            "auto" => Ok(LoadStrategy::Auto),
            other => Err(format!(
                "unknown load strategy `{other}` (expected full, subtree or auto)"
            )),
        }
    }
}
