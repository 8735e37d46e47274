//! Errors raised while collecting imports.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure of a single `collect` call.
#[derive(Debug, Error)]
pub enum CollectError {
    #[error("failed to read `{}`", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl CollectError {
    pub fn read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }
}

/// A module specifier that does not resolve to a file on disk.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("cannot find module `{specifier}` imported from `{from}`")]
    NotFound { specifier: String, from: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_error_display() {
        let err = CollectError::read(
            "site/main.less",
            io::Error::new(io::ErrorKind::NotFound, "missing"),
        );
        let display = format!("{err}");
        assert!(display.contains("failed to read"));
        assert!(display.contains("site/main.less"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_resolve_error_display() {
        let err = ResolveError::NotFound {
            specifier: "./missing".into(),
            from: "src".into(),
        };
        assert_eq!(
            err.to_string(),
            "cannot find module `./missing` imported from `src`"
        );
    }
}
