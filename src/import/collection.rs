//! Append-only import multimaps.
//!
//! [`ImportCollection`] is the single-threaded store handed to collectors.
//! [`SharedImportCollection`] is its concurrent counterpart for parallel
//! passes: appends lock only the bucket of the importing file.

use dashmap::DashMap;
use rustc_hash::FxHashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::Import;
use crate::file::File;

/// Ordered multimap from an importing file to its outgoing edges.
///
/// Edges are never deduplicated. Iteration yields edges in insertion order,
/// and [`sources`](Self::sources) yields importers in order of first append.
#[derive(Debug, Clone, Default)]
pub struct ImportCollection {
    imports: Vec<Import>,
    by_source: FxHashMap<File, Vec<usize>>,
    sources: Vec<File>,
}

impl ImportCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one edge.
    pub fn add_import(&mut self, import: Import) {
        let index = self.imports.len();
        match self.by_source.get_mut(import.source()) {
            Some(indices) => indices.push(index),
            None => {
                self.sources.push(import.source().clone());
                self.by_source.insert(import.source().clone(), vec![index]);
            }
        }
        self.imports.push(import);
    }

    /// Edges declared by `source`, in append order.
    pub fn imports_for<'a>(&'a self, source: &File) -> impl Iterator<Item = &'a Import> + use<'a> {
        self.by_source
            .get(source)
            .into_iter()
            .flatten()
            .map(|&index| &self.imports[index])
    }

    /// All edges, in append order.
    pub fn iter(&self) -> std::slice::Iter<'_, Import> {
        self.imports.iter()
    }

    /// Importing files, in order of their first edge.
    pub fn sources(&self) -> &[File] {
        &self.sources
    }

    pub fn len(&self) -> usize {
        self.imports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.imports.is_empty()
    }
}

impl Extend<Import> for ImportCollection {
    fn extend<T: IntoIterator<Item = Import>>(&mut self, iter: T) {
        for import in iter {
            self.add_import(import);
        }
    }
}

impl IntoIterator for ImportCollection {
    type Item = Import;
    type IntoIter = std::vec::IntoIter<Import>;

    fn into_iter(self) -> Self::IntoIter {
        self.imports.into_iter()
    }
}

impl<'a> IntoIterator for &'a ImportCollection {
    type Item = &'a Import;
    type IntoIter = std::slice::Iter<'a, Import>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// ============================================================================
// Concurrent collection
// ============================================================================

/// Thread-safe append-only collection, bucketed per importing file.
///
/// Every edge gets a global sequence number on append, so converting back
/// with [`into_collection`](Self::into_collection) reproduces append order.
#[derive(Debug, Default)]
pub struct SharedImportCollection {
    buckets: DashMap<File, Vec<(usize, Import)>>,
    next: AtomicUsize,
}

impl SharedImportCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one edge.
    pub fn add_import(&self, import: Import) {
        let seq = self.next.fetch_add(1, Ordering::Relaxed);
        self.buckets
            .entry(import.source().clone())
            .or_default()
            .push((seq, import));
    }

    /// Append every edge of a locally built collection, keeping its order.
    pub fn append(&self, local: ImportCollection) {
        for import in local {
            self.add_import(import);
        }
    }

    /// Snapshot of the edges declared by `source`.
    pub fn imports_for(&self, source: &File) -> Vec<Import> {
        self.buckets
            .get(source)
            .map(|bucket| bucket.iter().map(|(_, import)| import.clone()).collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.buckets.iter().map(|bucket| bucket.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Convert into an [`ImportCollection`] in global append order.
    pub fn into_collection(self) -> ImportCollection {
        let mut all: Vec<(usize, Import)> = self
            .buckets
            .into_iter()
            .flat_map(|(_, bucket)| bucket)
            .collect();
        all.sort_by_key(|(seq, _)| *seq);

        let mut collection = ImportCollection::new();
        collection.extend(all.into_iter().map(|(_, import)| import));
        collection
    }

    /// Convert into an [`ImportCollection`] laid out source by source in the
    /// given order; sources not listed follow in append order.
    pub fn into_ordered(self, order: &[File]) -> ImportCollection {
        let buckets = self.buckets;
        let mut collection = ImportCollection::new();

        for source in order {
            if let Some((_, bucket)) = buckets.remove(source) {
                collection.extend(bucket.into_iter().map(|(_, import)| import));
            }
        }

        let rest = Self {
            buckets,
            next: AtomicUsize::new(0),
        };
        collection.extend(rest.into_collection());
        collection
    }
}
