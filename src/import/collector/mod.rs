//! The collector seam: one implementation per source dialect.
//!
//! A collector reads one file, finds its import directives and appends the
//! resulting edges to a caller-owned [`ImportCollection`]. Collectors hold no
//! per-call state, so a single instance may serve many threads.

mod script;
mod stylesheet;

pub use script::ScriptImportCollector;
pub use stylesheet::{StylesheetDialect, StylesheetImportCollector};

use std::fs;
use std::path::Path;

use super::{CollectError, ImportCollection};
use crate::file::File;

/// Extracts import edges from files of one dialect.
pub trait ImportCollector: Send + Sync {
    /// Short dialect name, used in logs and as the cache namespace.
    fn name(&self) -> &'static str;

    /// Whether this collector handles `file`. Pure, no I/O.
    fn supports(&self, file: &File) -> bool;

    /// Append every import declared by `content`, the text of `file`.
    ///
    /// Directives the collector does not recognize are skipped silently.
    fn collect_content(
        &self,
        cwd: &Path,
        file: &File,
        content: &str,
        imports: &mut ImportCollection,
    ) -> Result<(), CollectError>;

    /// Read `cwd/file.path` and append every import it declares.
    ///
    /// Read failures propagate.
    fn collect(
        &self,
        cwd: &Path,
        file: &File,
        imports: &mut ImportCollection,
    ) -> Result<(), CollectError> {
        let content = read_source(cwd, file)?;
        self.collect_content(cwd, file, &content, imports)
    }

    /// Whether the edges depend on the filesystem beyond `file`'s content,
    /// e.g. because specifiers are resolved against files on disk. Such
    /// edges must not be replayed from a content-keyed cache.
    fn depends_on_disk(&self) -> bool {
        false
    }

    /// Whether edges may be replayed from a cache instead of a fresh scan.
    fn is_cached(&self) -> bool {
        false
    }
}

/// Read a source file as text. Invalid UTF-8 is replaced, not rejected.
pub(crate) fn read_source(cwd: &Path, file: &File) -> Result<String, CollectError> {
    Ok(decode_source(&read_bytes(cwd, file)?))
}

/// Raw bytes of `cwd/file.path`.
pub(crate) fn read_bytes(cwd: &Path, file: &File) -> Result<Vec<u8>, CollectError> {
    let path = cwd.join(&file.path);
    fs::read(&path).map_err(|err| CollectError::read(path, err))
}

/// Decode source bytes, replacing invalid UTF-8.
pub(crate) fn decode_source(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Pick the quoted path out of a match with one single- and one
/// double-quoted alternative. The single-quoted group wins a tie; a match
/// with neither group (or only empty ones) yields `None`.
pub(crate) fn pick_quoted<'a>(single: Option<&'a str>, double: Option<&'a str>) -> Option<&'a str> {
    single
        .filter(|s| !s.is_empty())
        .or_else(|| double.filter(|s| !s.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_pick_quoted_prefers_single() {
        assert_eq!(pick_quoted(Some("a"), Some("b")), Some("a"));
        assert_eq!(pick_quoted(None, Some("b")), Some("b"));
        assert_eq!(pick_quoted(Some(""), Some("b")), Some("b"));
        assert_eq!(pick_quoted(Some(""), Some("")), None);
        assert_eq!(pick_quoted(None, None), None);
    }

    #[test]
    fn test_read_source_lossy() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.less"), b"@import \"x\";\xff").unwrap();
        let text = read_source(dir.path(), &File::new("a.less")).unwrap();
        assert!(text.starts_with("@import \"x\";"));
    }

    #[test]
    fn test_read_source_missing() {
        let dir = TempDir::new().unwrap();
        let err = read_source(dir.path(), &File::new("nope.less")).unwrap_err();
        assert!(matches!(err, CollectError::Read { .. }));
    }
}
