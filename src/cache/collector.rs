//! Cache-backed decorator around any [`ImportCollector`].

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{ContentHash, ImportCache};
use crate::debug;
use crate::file::File;
use crate::import::collector::{decode_source, read_bytes};
use crate::import::{CollectError, ImportCollection, ImportCollector};

/// Replays recorded edges while a file's content hash is unchanged.
///
/// `supports` is delegated untouched. On a hit the recorded edges are
/// appended in their original order, so callers see the same collection
/// either way. Read errors surface exactly as from the inner collector.
/// File content is read once; the hash and the scan share those bytes.
pub struct CachedImportCollector<C> {
    inner: C,
    cache: Arc<ImportCache>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl<C: ImportCollector> CachedImportCollector<C> {
    pub fn new(inner: C, cache: Arc<ImportCache>) -> Self {
        Self {
            inner,
            cache,
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
        }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> usize {
        self.misses.load(Ordering::Relaxed)
    }

    /// Replay or scan `content`, whose bytes hash to `hash`.
    ///
    /// The recorded edges always come from the same bytes as the key.
    /// Disk-dependent collectors bypass the cache entirely.
    fn collect_hashed(
        &self,
        cwd: &Path,
        file: &File,
        content: &str,
        hash: ContentHash,
        imports: &mut ImportCollection,
    ) -> Result<(), CollectError> {
        if self.inner.depends_on_disk() {
            return self.inner.collect_content(cwd, file, content, imports);
        }

        if let Some(recorded) = self.cache.lookup(self.name(), file, hash) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!("cache"; "hit {} ({})", file, hash);
            imports.extend(recorded);
            return Ok(());
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let mut local = ImportCollection::new();
        self.inner.collect_content(cwd, file, content, &mut local)?;
        self.cache.record(self.name(), file, hash, &local);
        imports.extend(local);
        Ok(())
    }
}

impl<C: ImportCollector> ImportCollector for CachedImportCollector<C> {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn supports(&self, file: &File) -> bool {
        self.inner.supports(file)
    }

    fn collect_content(
        &self,
        cwd: &Path,
        file: &File,
        content: &str,
        imports: &mut ImportCollection,
    ) -> Result<(), CollectError> {
        self.collect_hashed(cwd, file, content, ContentHash::of(content.as_bytes()), imports)
    }

    fn collect(
        &self,
        cwd: &Path,
        file: &File,
        imports: &mut ImportCollection,
    ) -> Result<(), CollectError> {
        let bytes = read_bytes(cwd, file)?;
        let hash = ContentHash::of(&bytes);
        self.collect_hashed(cwd, file, &decode_source(&bytes), hash, imports)
    }

    fn depends_on_disk(&self) -> bool {
        self.inner.depends_on_disk()
    }

    fn is_cached(&self) -> bool {
        !self.inner.depends_on_disk()
    }
}
