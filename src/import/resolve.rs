//! Node-style module resolution for script imports.
//!
//! Specifiers resolve against the working directory of the pass:
//!
//! | Specifier        | Lookup                                          |
//! |------------------|-------------------------------------------------|
//! | `/x`             | `x` from the working directory, file then dir   |
//! | `./x`, `../x`    | relative to the importing file, file then dir   |
//! | `x`              | `node_modules/x`, file (`.js`) then dir         |
//!
//! Loading as a file tries the path itself, then each candidate extension,
//! then `.json` and `.node`. Loading as a directory follows `package.json`
//! `main` before falling back to `index.{js,json,node}`.

use serde::Deserialize;
use std::fs;
use std::path::Path;

use super::ResolveError;
use crate::file::File;

const INDEX_FILES: [&str; 3] = ["index.js", "index.json", "index.node"];
const FALLBACK_EXTENSIONS: [&str; 2] = [".json", ".node"];
const NODE_MODULES: &str = "node_modules";

#[derive(Debug, Default, Deserialize)]
struct PackageJson {
    #[serde(default)]
    main: Option<String>,
}

/// Resolves module specifiers to cleaned paths relative to `cwd`.
#[derive(Debug, Clone, Copy)]
pub struct ModuleResolver<'a> {
    cwd: &'a Path,
}

impl<'a> ModuleResolver<'a> {
    pub const fn new(cwd: &'a Path) -> Self {
        Self { cwd }
    }

    /// Resolve `specifier` as imported from a file in `from_dir`.
    pub fn resolve(
        &self,
        specifier: &str,
        from_dir: &str,
        extensions: &[String],
    ) -> Result<String, ResolveError> {
        let found = if let Some(rooted) = specifier.strip_prefix('/') {
            self.load(&File::clean(rooted), extensions)
        } else if is_relative(specifier) {
            self.load(&File::clean(&format!("{from_dir}/{specifier}")), extensions)
        } else {
            self.load_node_module(specifier)
        };

        found.ok_or_else(|| ResolveError::NotFound {
            specifier: specifier.to_string(),
            from: from_dir.to_string(),
        })
    }

    fn load(&self, path: &str, extensions: &[String]) -> Option<String> {
        self.load_as_file(path, extensions)
            .or_else(|| self.load_as_directory(path, extensions))
    }

    fn load_node_module(&self, specifier: &str) -> Option<String> {
        let module = File::clean(&format!("{NODE_MODULES}/{specifier}"));
        let js = [".js".to_string()];
        self.load(&module, &js)
    }

    fn load_as_file(&self, path: &str, extensions: &[String]) -> Option<String> {
        if self.is_file(path) {
            return Some(path.to_string());
        }

        extensions
            .iter()
            .map(String::as_str)
            .chain(FALLBACK_EXTENSIONS)
            .map(|ext| format!("{path}{ext}"))
            .find(|candidate| self.is_file(candidate))
    }

    fn load_index(&self, dir: &str) -> Option<String> {
        INDEX_FILES
            .iter()
            .map(|index| format!("{dir}/{index}"))
            .find(|candidate| self.is_file(candidate))
    }

    fn load_as_directory(&self, dir: &str, extensions: &[String]) -> Option<String> {
        let manifest = self.cwd.join(dir).join("package.json");
        if !manifest.is_file() {
            return self.load_index(dir);
        }

        // an unreadable manifest behaves like one without `main`
        let package: PackageJson = fs::read_to_string(&manifest)
            .ok()
            .and_then(|text| serde_json::from_str(&text).ok())
            .unwrap_or_default();

        let main = File::clean(&format!("{dir}/{}", package.main.unwrap_or_default()));
        self.load_as_file(&main, extensions)
            .or_else(|| self.load_index(&main))
    }

    fn is_file(&self, path: &str) -> bool {
        self.cwd.join(path).is_file()
    }
}

/// `.`, `..`, `./x` and `../x` are relative to the importing file.
fn is_relative(specifier: &str) -> bool {
    matches!(specifier, "." | "..") || specifier.starts_with("./") || specifier.starts_with("../")
}
