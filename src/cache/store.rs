//! Shared edge store and its JSON persistence.

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::ContentHash;
use crate::debug;
use crate::file::File;
use crate::import::Import;

/// Bumped whenever the on-disk layout changes; older files load as empty.
const CACHE_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("IO error when accessing cache `{}`", .0.display())]
    Io(PathBuf, #[source] io::Error),

    #[error("corrupt import cache `{}`", .0.display())]
    Json(PathBuf, #[source] serde_json::Error),
}

/// One recorded edge, stored without its source (the entry key holds it).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedImport {
    pub raw: String,
    pub target: String,
    #[serde(rename = "virtual")]
    pub is_virtual: bool,
}

impl CachedImport {
    fn record(import: &Import) -> Self {
        Self {
            raw: import.raw().to_string(),
            target: import.imported_file().path.clone(),
            is_virtual: import.is_virtual(),
        }
    }

    /// Rebuild the edge as declared by `source`.
    pub fn replay(&self, source: &File) -> Import {
        Import::new(
            self.raw.clone(),
            File::new(self.target.clone()),
            source.clone(),
            self.is_virtual,
        )
    }
}

/// Edges recorded for one file at one content hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedEntry {
    pub hash: String,
    pub imports: Vec<CachedImport>,
}

#[derive(Debug, Serialize, Deserialize)]
struct CacheFile {
    version: u32,
    entries: BTreeMap<String, CachedEntry>,
}

/// Thread-safe map from `(collector, file)` to recorded edges.
#[derive(Debug, Default)]
pub struct ImportCache {
    entries: DashMap<String, CachedEntry>,
}

impl ImportCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(namespace: &str, file: &File) -> String {
        format!("{namespace}:{}", file.cleaned())
    }

    /// Recorded edges for `file`, if its content still hashes to `hash`.
    pub fn lookup(&self, namespace: &str, file: &File, hash: ContentHash) -> Option<Vec<Import>> {
        let entry = self.entries.get(&Self::key(namespace, file))?;
        if entry.hash != hash.to_hex() {
            return None;
        }
        Some(entry.imports.iter().map(|i| i.replay(file)).collect())
    }

    /// Record the edges collected for `file` at `hash`, replacing older ones.
    pub fn record<'a>(
        &self,
        namespace: &str,
        file: &File,
        hash: ContentHash,
        imports: impl IntoIterator<Item = &'a Import>,
    ) {
        let entry = CachedEntry {
            hash: hash.to_hex(),
            imports: imports.into_iter().map(CachedImport::record).collect(),
        };
        self.entries.insert(Self::key(namespace, file), entry);
    }

    pub fn invalidate(&self, namespace: &str, file: &File) {
        self.entries.remove(&Self::key(namespace, file));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Load a cache file. A missing file or an older layout yields an empty cache.
    pub fn load(path: &Path) -> Result<Self, CacheError> {
        let cache = Self::new();
        if !path.exists() {
            return Ok(cache);
        }

        let json = fs::read_to_string(path).map_err(|e| CacheError::Io(path.to_path_buf(), e))?;
        let file: CacheFile =
            serde_json::from_str(&json).map_err(|e| CacheError::Json(path.to_path_buf(), e))?;

        if file.version != CACHE_VERSION {
            debug!("cache"; "discarding v{} cache {}", file.version, path.display());
            return Ok(cache);
        }

        for (key, entry) in file.entries {
            cache.entries.insert(key, entry);
        }
        debug!("cache"; "restored {} entries from {}", cache.len(), path.display());
        Ok(cache)
    }

    /// Write the cache as pretty JSON, creating parent directories.
    ///
    /// Skips the write when the file already holds the same content.
    pub fn save(&self, path: &Path) -> Result<(), CacheError> {
        let io_err = |e| CacheError::Io(path.to_path_buf(), e);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let file = CacheFile {
            version: CACHE_VERSION,
            entries: self
                .entries
                .iter()
                .map(|e| (e.key().clone(), e.value().clone()))
                .collect(),
        };
        let json = serde_json::to_string_pretty(&file)
            .map_err(|e| CacheError::Json(path.to_path_buf(), e))?;

        if fs::read_to_string(path).is_ok_and(|existing| existing == json) {
            debug!("cache"; "unchanged, skipping write");
            return Ok(());
        }

        fs::write(path, json).map_err(io_err)?;
        debug!("cache"; "saved {} entries", file.entries.len());
        Ok(())
    }
}
