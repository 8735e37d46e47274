//! Project-relative file paths.
//!
//! A [`File`] is the node type of the import graph. Paths are plain `/`
//! separated strings relative to the working directory of a resolution pass,
//! so two files compare equal when their cleaned paths match.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// An asset path relative to the working directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct File {
    /// Path as given, relative to the working directory.
    pub path: String,
    /// Parent directory of `path` (`"."` for top-level files).
    pub dir: String,
    /// Extension without the leading dot, empty when there is none.
    pub extension: String,
}

impl File {
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        let dir = dirname(&path);
        let extension = extension(&path).to_string();
        Self {
            path,
            dir,
            extension,
        }
    }

    /// Collapse `.`/`..` segments and repeated separators.
    ///
    /// Leading `..` segments that cannot be collapsed are kept, a leading `/`
    /// is kept, and an empty result becomes `"."`.
    ///
    /// # Examples
    /// ```
    /// use assetgraph::File;
    /// assert_eq!(File::clean("a/../b"), "b");
    /// assert_eq!(File::clean("a/./b"), "a/b");
    /// assert_eq!(File::clean("../a//b/"), "../a/b");
    /// ```
    pub fn clean(path: &str) -> String {
        let rooted = path.starts_with('/');
        let mut parts: Vec<&str> = Vec::new();

        for segment in path.split('/') {
            match segment {
                "" | "." => {}
                ".." => match parts.last() {
                    Some(&last) if last != ".." => {
                        parts.pop();
                    }
                    // `/..` is `/`
                    _ if rooted => {}
                    _ => parts.push(".."),
                },
                other => parts.push(other),
            }
        }

        let joined = parts.join("/");
        if rooted {
            format!("/{joined}")
        } else if joined.is_empty() {
            ".".to_string()
        } else {
            joined
        }
    }

    /// Cleaned form of this file's path.
    #[inline]
    pub fn cleaned(&self) -> String {
        Self::clean(&self.path)
    }

    /// Final path segment.
    pub fn name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}

fn dirname(path: &str) -> String {
    match path.rsplit_once('/') {
        Some(("", _)) => "/".to_string(),
        Some((dir, _)) => dir.to_string(),
        None => ".".to_string(),
    }
}

fn extension(path: &str) -> &str {
    let name = path.rsplit('/').next().unwrap_or(path);
    match name.rsplit_once('.') {
        // dotfiles such as `.babelrc` have no extension
        Some(("", _)) | None => "",
        Some((_, ext)) => ext,
    }
}

impl PartialEq for File {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path || self.cleaned() == other.cleaned()
    }
}

impl Eq for File {}

impl Hash for File {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.cleaned().hash(state);
    }
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

impl From<String> for File {
    fn from(path: String) -> Self {
        Self::new(path)
    }
}

impl From<&str> for File {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl From<File> for String {
    fn from(file: File) -> Self {
        file.path
    }
}
