//! `@import` collection for stylesheet dialects (LESS by default).

use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

use super::{ImportCollector, pick_quoted};
use crate::debug;
use crate::file::File;
use crate::import::{CollectError, Import, ImportCollection};

/// `@import`, optional `(reference, ...)` clause, optional `url(`, quoted path.
///
/// Groups 4 and 5 hold the single- and double-quoted path. The scan is
/// lexical: directives inside comments or strings match too.
static IMPORT_DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"@import (\([a-z,\s]*\)\s*)?(url\()?('([^']+)'|"([^"]+)")"#).unwrap()
});

/// How one stylesheet dialect treats its imports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StylesheetDialect {
    /// Extension handled, without the dot (`less`).
    pub extension: String,
    /// Appended to extension-less imports, with the dot (`.less`).
    pub default_extension: String,
    /// Whether the compiler inlines every import into the importer's output.
    /// Extension-less imports are virtual regardless.
    pub inlined: bool,
}

impl StylesheetDialect {
    /// LESS: the compiler squashes everything into one output.
    pub fn less() -> Self {
        Self {
            extension: "less".into(),
            default_extension: ".less".into(),
            inlined: true,
        }
    }

    /// Build the edge for `raw` imported from `source`.
    fn import_for(&self, source: &File, raw: &str) -> Import {
        let target = File::new(File::clean(&format!("{}/{}", source.dir, raw)));

        if target.extension.is_empty() {
            let partial = File::new(format!("{}{}", target.path, self.default_extension));
            Import::new(raw, partial, source.clone(), true)
        } else {
            Import::new(raw, target, source.clone(), self.inlined)
        }
    }
}

/// Collects `@import` directives from stylesheets of one dialect.
#[derive(Debug, Clone)]
pub struct StylesheetImportCollector {
    dialect: StylesheetDialect,
}

impl StylesheetImportCollector {
    pub fn new(dialect: StylesheetDialect) -> Self {
        Self { dialect }
    }

    pub fn less() -> Self {
        Self::new(StylesheetDialect::less())
    }

    pub fn dialect(&self) -> &StylesheetDialect {
        &self.dialect
    }

    /// Append the imports found in `content`, declared by `file`.
    pub fn scan(&self, file: &File, content: &str, imports: &mut ImportCollection) {
        for caps in IMPORT_DIRECTIVE.captures_iter(content) {
            let single = caps.get(4).map(|m| m.as_str());
            let double = caps.get(5).map(|m| m.as_str());
            let Some(raw) = pick_quoted(single, double) else {
                debug!("collect"; "skipping empty import in {}", file);
                continue;
            };

            // a transport protocol never points at a local file
            if raw.contains("://") {
                continue;
            }

            imports.add_import(self.dialect.import_for(file, raw));
        }
    }
}

impl ImportCollector for StylesheetImportCollector {
    fn name(&self) -> &'static str {
        "stylesheet"
    }

    fn supports(&self, file: &File) -> bool {
        file.extension == self.dialect.extension
    }

    fn collect_content(
        &self,
        _cwd: &Path,
        file: &File,
        content: &str,
        imports: &mut ImportCollection,
    ) -> Result<(), CollectError> {
        self.scan(file, content, imports);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn scan(path: &str, content: &str) -> ImportCollection {
        let mut imports = ImportCollection::new();
        StylesheetImportCollector::less().scan(&File::new(path), content, &mut imports);
        imports
    }

    fn targets(imports: &ImportCollection) -> Vec<&str> {
        imports
            .iter()
            .map(|i| i.imported_file().path.as_str())
            .collect()
    }

    #[test]
    fn test_supports_by_extension() {
        let collector = StylesheetImportCollector::less();
        assert!(collector.supports(&File::new("a/b.less")));
        assert!(!collector.supports(&File::new("a/b.css")));
        assert!(!collector.supports(&File::new("a/less")));
    }

    #[test]
    fn test_extensionless_import_is_virtual_partial() {
        let imports = scan("styles/main.less", r#"@import "foo/bar";"#);
        assert_eq!(imports.len(), 1);
        let import = imports.iter().next().unwrap();
        assert_eq!(import.raw(), "foo/bar");
        assert_eq!(import.imported_file().path, "styles/foo/bar.less");
        assert_eq!(import.source().path, "styles/main.less");
        assert!(import.is_virtual());
    }

    #[test]
    fn test_import_with_extension_is_cleaned_and_virtual() {
        let imports = scan("styles/main.less", r#"@import "../common/./vars.less";"#);
        let import = imports.iter().next().unwrap();
        assert_eq!(import.imported_file().path, "common/vars.less");
        assert!(import.is_virtual());
    }

    #[test]
    fn test_non_inlined_dialect_keeps_real_imports() {
        let collector = StylesheetImportCollector::new(StylesheetDialect {
            extension: "scss".into(),
            default_extension: ".scss".into(),
            inlined: false,
        });
        let mut imports = ImportCollection::new();
        collector.scan(
            &File::new("main.scss"),
            r#"@import "theme.css"; @import "mixins";"#,
            &mut imports,
        );
        let flags: Vec<_> = imports.iter().map(Import::is_virtual).collect();
        assert_eq!(flags, [false, true]);
        assert_eq!(targets(&imports), ["theme.css", "mixins.scss"]);
    }

    #[test]
    fn test_transport_protocol_is_skipped() {
        let imports = scan(
            "main.less",
            r#"@import "https://example.com/a.less"; @import url('//cdn/x.less');"#,
        );
        assert_eq!(targets(&imports), ["cdn/x.less"]);
    }

    #[test]
    fn test_url_wrapper_and_single_quotes() {
        let imports = scan("main.less", "@import url('foo.less');\n@import 'bar';");
        assert_eq!(targets(&imports), ["foo.less", "bar.less"]);
    }

    #[test]
    fn test_media_clause() {
        let imports = scan(
            "a/main.less",
            r#"@import (reference) "foo"; @import (css, optional) url("b.less");"#,
        );
        assert_eq!(targets(&imports), ["a/foo.less", "a/b.less"]);
    }

    #[test]
    fn test_no_imports_appends_nothing() {
        let imports = scan("main.less", "body { color: red; }");
        assert!(imports.is_empty());
    }

    #[test]
    fn test_source_order_and_duplicates() {
        let imports = scan(
            "main.less",
            "@import 'c';\n@import \"a\";\n@import 'b';\n@import 'a';",
        );
        assert_eq!(targets(&imports), ["c.less", "a.less", "b.less", "a.less"]);
    }

    #[test]
    fn test_matches_inside_comments() {
        let imports = scan("main.less", "// @import \"commented\";\n");
        assert_eq!(targets(&imports), ["commented.less"]);
    }

    #[test]
    fn test_malformed_directives_are_ignored() {
        let imports = scan("main.less", "@import foo;\n@import(\"x\");\n@import \"\";");
        assert!(imports.is_empty());
    }

    #[test]
    fn test_collect_reads_from_cwd() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("styles")).unwrap();
        fs::write(dir.path().join("styles/main.less"), "@import 'vars';").unwrap();

        let mut imports = ImportCollection::new();
        StylesheetImportCollector::less()
            .collect(dir.path(), &File::new("styles/main.less"), &mut imports)
            .unwrap();
        assert_eq!(targets(&imports), ["styles/vars.less"]);
    }

    #[test]
    fn test_collect_missing_file_errors() {
        let dir = TempDir::new().unwrap();
        let mut imports = ImportCollection::new();
        let result =
            StylesheetImportCollector::less().collect(dir.path(), &File::new("x.less"), &mut imports);
        assert!(matches!(result, Err(CollectError::Read { .. })));
        assert!(imports.is_empty());
    }
}
