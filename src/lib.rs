//! Import graph collection for asset bundling.
//!
//! Collectors scan source files for import directives (`@import` in LESS,
//! `require`/`import` in scripts) and append the discovered edges to an
//! [`ImportCollection`]. An [`ImportFinder`] dispatches files to collectors
//! and walks the resulting dependency closure; a [`CachedImportCollector`]
//! replays edges for files whose content has not changed.

pub mod cache;
pub mod cli;
pub mod config;
pub mod file;
pub mod import;
pub mod logger;
pub mod plugin;

pub use cache::{CachedImportCollector, ImportCache};
pub use config::ResolverConfig;
pub use file::File;
pub use import::{
    CollectError, DependencyTree, Import, ImportCollection, ImportCollector, ImportFinder,
    ScriptImportCollector, StylesheetImportCollector,
};
