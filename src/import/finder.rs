//! Collector registry and dependency walk.
//!
//! [`ImportFinder`] owns the ordered list of collectors for one working
//! directory. Every collector whose `supports` accepts a file runs on it, in
//! registration order.

use rayon::prelude::*;
use rustc_hash::FxHashSet;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use super::{CollectError, ImportCollection, ImportCollector, SharedImportCollection};
use crate::debug;
use crate::file::File;

/// Result of a dependency walk.
#[derive(Debug, Default)]
pub struct DependencyTree {
    files: Vec<File>,
    missing: Vec<File>,
    imports: ImportCollection,
}

impl DependencyTree {
    /// Scanned files, in breadth-first visit order (roots first).
    pub fn files(&self) -> &[File] {
        &self.files
    }

    /// Referenced files that do not exist on disk.
    pub fn missing(&self) -> &[File] {
        &self.missing
    }

    /// Every edge found during the walk.
    pub fn imports(&self) -> &ImportCollection {
        &self.imports
    }

    pub fn into_imports(self) -> ImportCollection {
        self.imports
    }
}

/// Ordered set of collectors bound to a working directory.
pub struct ImportFinder {
    cwd: PathBuf,
    collectors: Vec<Box<dyn ImportCollector>>,
}

impl ImportFinder {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: cwd.into(),
            collectors: Vec::new(),
        }
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub fn add_collector(&mut self, collector: Box<dyn ImportCollector>) {
        debug!("finder"; "registered {} collector{}", collector.name(),
            if collector.is_cached() { " (cached)" } else { "" });
        self.collectors.push(collector);
    }

    pub fn collectors(&self) -> &[Box<dyn ImportCollector>] {
        &self.collectors
    }

    /// Run every supporting collector on `file`.
    pub fn collect(&self, file: &File, imports: &mut ImportCollection) -> Result<(), CollectError> {
        for collector in self.collectors.iter().filter(|c| c.supports(file)) {
            collector.collect(&self.cwd, file, imports)?;
        }
        Ok(())
    }

    /// Breadth-first closure over the imports reachable from `roots`.
    ///
    /// Each file is scanned at most once. Files missing on disk end up in
    /// [`DependencyTree::missing`]. The first read error aborts the walk.
    pub fn all(&self, roots: &[File]) -> Result<DependencyTree, CollectError> {
        let mut tree = DependencyTree::default();
        let mut seen: FxHashSet<File> = FxHashSet::default();
        let mut queue: VecDeque<File> = roots
            .iter()
            .filter(|root| seen.insert((*root).clone()))
            .cloned()
            .collect();

        while let Some(file) = queue.pop_front() {
            if !self.exists(&file) {
                debug!("finder"; "missing {}", file);
                tree.missing.push(file);
                continue;
            }

            let before = tree.imports.len();
            self.collect(&file, &mut tree.imports)?;

            for import in tree.imports.iter().skip(before) {
                let target = import.imported_file();
                if seen.insert(target.clone()) {
                    queue.push_back(target.clone());
                }
            }
            tree.files.push(file);
        }

        Ok(tree)
    }

    /// Same closure as [`all`](Self::all), scanning each breadth-first layer
    /// in parallel.
    ///
    /// File order and edge order match the sequential walk.
    pub fn all_parallel(&self, roots: &[File]) -> Result<DependencyTree, CollectError> {
        let shared = SharedImportCollection::new();
        let mut seen: FxHashSet<File> = FxHashSet::default();
        let mut files = Vec::new();
        let mut missing = Vec::new();
        let mut frontier: Vec<File> = roots
            .iter()
            .filter(|root| seen.insert((*root).clone()))
            .cloned()
            .collect();

        while !frontier.is_empty() {
            let scanned: Vec<bool> = frontier
                .par_iter()
                .map(|file| {
                    if !self.exists(file) {
                        return Ok(false);
                    }
                    let mut local = ImportCollection::new();
                    self.collect(file, &mut local)?;
                    shared.append(local);
                    Ok(true)
                })
                .collect::<Result<_, CollectError>>()?;

            let mut next = Vec::new();
            for (file, was_scanned) in frontier.into_iter().zip(scanned) {
                if !was_scanned {
                    debug!("finder"; "missing {}", file);
                    missing.push(file);
                    continue;
                }
                for import in shared.imports_for(&file) {
                    let target = import.imported_file();
                    if seen.insert(target.clone()) {
                        next.push(target.clone());
                    }
                }
                files.push(file);
            }
            frontier = next;
        }

        let imports = shared.into_ordered(&files);
        Ok(DependencyTree {
            files,
            missing,
            imports,
        })
    }

    fn exists(&self, file: &File) -> bool {
        self.cwd.join(&file.path).is_file()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::{ScriptImportCollector, StylesheetImportCollector};
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, path: &str, content: &str) {
        let full = root.join(path);
        fs::create_dir_all(full.parent().unwrap()).unwrap();
        fs::write(full, content).unwrap();
    }

    fn site() -> TempDir {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "styles/main.less", "@import 'vars';\n@import 'layout/grid';\n@import 'gone';");
        touch(dir.path(), "styles/vars.less", "@color: red;");
        touch(dir.path(), "styles/layout/grid.less", "@import '../vars';\n@import 'cols';");
        touch(dir.path(), "styles/layout/cols.less", "");
        dir
    }

    fn finder(dir: &TempDir) -> ImportFinder {
        let mut finder = ImportFinder::new(dir.path());
        finder.add_collector(Box::new(StylesheetImportCollector::less()));
        finder.add_collector(Box::new(ScriptImportCollector::javascript()));
        finder
    }

    fn paths(files: &[File]) -> Vec<&str> {
        files.iter().map(|f| f.path.as_str()).collect()
    }

    #[test]
    fn test_collect_dispatches_by_support() {
        let dir = site();
        let finder = finder(&dir);
        let mut imports = ImportCollection::new();

        finder.collect(&File::new("styles/vars.less"), &mut imports).unwrap();
        assert!(imports.is_empty());

        finder.collect(&File::new("styles/main.less"), &mut imports).unwrap();
        assert_eq!(imports.len(), 3);

        // unsupported extension: nothing runs, nothing is read
        finder.collect(&File::new("nope.png"), &mut imports).unwrap();
        assert_eq!(imports.len(), 3);
    }

    #[test]
    fn test_every_supporting_collector_runs() {
        let dir = site();
        let mut finder = finder(&dir);
        finder.add_collector(Box::new(StylesheetImportCollector::less()));

        let mut imports = ImportCollection::new();
        finder.collect(&File::new("styles/main.less"), &mut imports).unwrap();
        assert_eq!(imports.len(), 6);
    }

    #[test]
    fn test_all_walks_breadth_first() {
        let dir = site();
        let tree = finder(&dir).all(&[File::new("styles/main.less")]).unwrap();

        assert_eq!(
            paths(tree.files()),
            [
                "styles/main.less",
                "styles/vars.less",
                "styles/layout/grid.less",
                "styles/layout/cols.less",
            ]
        );
        assert_eq!(paths(tree.missing()), ["styles/gone.less"]);
        assert_eq!(tree.imports().len(), 5);
    }

    #[test]
    fn test_all_deduplicates_roots() {
        let dir = site();
        let roots = [File::new("styles/vars.less"), File::new("styles/./vars.less")];
        let tree = finder(&dir).all(&roots).unwrap();
        assert_eq!(paths(tree.files()), ["styles/vars.less"]);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let dir = site();
        let finder = finder(&dir);
        let roots = [File::new("styles/main.less"), File::new("styles/layout/cols.less")];

        let sequential = finder.all(&roots).unwrap();
        let parallel = finder.all_parallel(&roots).unwrap();

        assert_eq!(sequential.files(), parallel.files());
        assert_eq!(sequential.missing(), parallel.missing());
        let seq: Vec<_> = sequential.imports().iter().collect();
        let par: Vec<_> = parallel.imports().iter().collect();
        assert_eq!(seq, par);
    }

    #[test]
    fn test_unreadable_file_errors() {
        let dir = site();
        // a directory named like a stylesheet passes `supports` but cannot be read
        fs::create_dir_all(dir.path().join("styles/odd.less")).unwrap();
        let finder = finder(&dir);

        let mut imports = ImportCollection::new();
        let result = finder.collect(&File::new("styles/odd.less"), &mut imports);
        assert!(matches!(result, Err(CollectError::Read { .. })));
    }
}
