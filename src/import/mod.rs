//! Import edges and the collectors that discover them.
//!
//! # Module Structure
//!
//! ```text
//! import/
//! ├── collection  # ImportCollection, SharedImportCollection
//! ├── collector/  # ImportCollector trait + built-in collectors
//! ├── error       # CollectError, ResolveError
//! ├── finder      # ImportFinder (registry + dependency walk)
//! └── resolve     # Node-style module resolution for scripts
//! ```

mod collection;
pub mod collector;
mod error;
mod finder;
pub mod resolve;

pub use collection::{ImportCollection, SharedImportCollection};
pub use collector::{ImportCollector, ScriptImportCollector, StylesheetDialect, StylesheetImportCollector};
pub use error::{CollectError, ResolveError};
pub use finder::{DependencyTree, ImportFinder};

use crate::file::File;

/// A directed edge: `source` depends on `target` through the literal `raw`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    raw: String,
    target: File,
    source: File,
    is_virtual: bool,
}

impl Import {
    pub fn new(raw: impl Into<String>, target: File, source: File, is_virtual: bool) -> Self {
        Self {
            raw: raw.into(),
            target,
            source,
            is_virtual,
        }
    }

    /// Import path as written in the source file.
    #[inline]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The file being imported.
    #[inline]
    pub fn imported_file(&self) -> &File {
        &self.target
    }

    /// The file declaring the import.
    #[inline]
    pub fn source(&self) -> &File {
        &self.source
    }

    /// Whether the target is merged into the importer's output instead of
    /// being compiled on its own.
    #[inline]
    pub fn is_virtual(&self) -> bool {
        self.is_virtual
    }
}
