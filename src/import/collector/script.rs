//! `require(...)` and ES `import ... from` collection for scripts.

use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

use super::{ImportCollector, pick_quoted};
use crate::debug;
use crate::file::File;
use crate::import::resolve::ModuleResolver;
use crate::import::{CollectError, Import, ImportCollection};

/// CommonJS `require('x')` not preceded by an identifier character.
static REQUIRE_CALL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[^a-z0-9_]require\(('([^']+)'|"([^"]+)")\)"#).unwrap()
});

/// ES `import x from 'y';` and bare `import 'y';`.
static ES_IMPORT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"import(.*from)?\s+["'](.*)["'];"#).unwrap());

/// Collects script dependencies, resolving each specifier on disk.
///
/// Unresolvable specifiers are dropped. Script imports are never virtual:
/// each target is bundled as a module of its own.
#[derive(Debug, Clone)]
pub struct ScriptImportCollector {
    name: &'static str,
    extension: String,
    candidates: Vec<String>,
    es_imports: bool,
}

impl ScriptImportCollector {
    /// CommonJS `.js` files.
    pub fn javascript() -> Self {
        Self {
            name: "js",
            extension: "js".into(),
            candidates: vec![".js".into()],
            es_imports: false,
        }
    }

    /// TypeScript `.ts` files: `require` plus ES imports.
    pub fn typescript() -> Self {
        Self {
            name: "ts",
            extension: "ts".into(),
            candidates: vec![".ts".into(), ".d.ts".into()],
            es_imports: true,
        }
    }

    /// Specifiers declared in `content`, `require` calls first.
    pub fn specifiers<'a>(&self, content: &'a str) -> Vec<&'a str> {
        let mut found: Vec<&str> = REQUIRE_CALL
            .captures_iter(content)
            .filter_map(|caps| {
                pick_quoted(
                    caps.get(2).map(|m| m.as_str()),
                    caps.get(3).map(|m| m.as_str()),
                )
            })
            .collect();

        if self.es_imports {
            found.extend(
                ES_IMPORT
                    .captures_iter(content)
                    .filter_map(|caps| caps.get(2).map(|m| m.as_str()))
                    .filter(|s| !s.is_empty()),
            );
        }

        found
    }
}

impl ImportCollector for ScriptImportCollector {
    fn name(&self) -> &'static str {
        self.name
    }

    fn supports(&self, file: &File) -> bool {
        file.extension == self.extension
    }

    fn collect_content(
        &self,
        cwd: &Path,
        file: &File,
        content: &str,
        imports: &mut ImportCollection,
    ) -> Result<(), CollectError> {
        let resolver = ModuleResolver::new(cwd);

        for specifier in self.specifiers(content) {
            match resolver.resolve(specifier, &file.dir, &self.candidates) {
                Ok(target) => {
                    imports.add_import(Import::new(specifier, File::new(target), file.clone(), false));
                }
                Err(err) => debug!("collect"; "{}", err),
            }
        }

        Ok(())
    }

    fn depends_on_disk(&self) -> bool {
        true
    }
}
