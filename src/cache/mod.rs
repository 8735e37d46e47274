//! Content-addressed caching of collected imports.
//!
//! A [`CachedImportCollector`] wraps any collector and replays the edges it
//! recorded for a file as long as the file's blake3 hash is unchanged. The
//! shared [`ImportCache`] can be persisted between runs as JSON.

mod collector;
mod hash;
mod store;

pub use collector::CachedImportCollector;
pub use hash::ContentHash;
pub use store::{CacheError, CachedEntry, CachedImport, ImportCache};
