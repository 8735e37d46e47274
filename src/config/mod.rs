//! Resolver configuration (`assetgraph.toml`).
//!
//! # Sections
//!
//! | Section    | Purpose                                        |
//! |------------|------------------------------------------------|
//! | top level  | `dev` mode, `parallel` walk, `cache_file`      |
//! | `[less]`   | Stylesheet dialect (extension, default ext)    |
//! | `[script]` | Which script collectors to register            |
//!
//! Every field has a default, so an empty or missing file is valid.

mod error;

pub use error::ConfigError;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::import::StylesheetDialect;
use crate::log;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "assetgraph.toml";

/// Root configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Development mode: collectors are wrapped in the import cache.
    pub dev: bool,

    /// Scan each breadth-first layer in parallel.
    pub parallel: bool,

    /// Import cache location, relative to the working directory.
    pub cache_file: PathBuf,

    pub less: LessConfig,

    pub script: ScriptConfig,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            dev: false,
            parallel: false,
            cache_file: PathBuf::from(".assetgraph/imports.json"),
            less: LessConfig::default(),
            script: ScriptConfig::default(),
        }
    }
}

/// `[less]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LessConfig {
    /// Handled extension, without the dot.
    pub extension: String,
    /// Appended to extension-less imports.
    pub default_extension: String,
}

impl Default for LessConfig {
    fn default() -> Self {
        let dialect = StylesheetDialect::less();
        Self {
            extension: dialect.extension,
            default_extension: dialect.default_extension,
        }
    }
}

impl LessConfig {
    /// The dialect described by this section. Imports are always inlined.
    pub fn dialect(&self) -> StylesheetDialect {
        let default_extension = if self.default_extension.starts_with('.') {
            self.default_extension.clone()
        } else {
            format!(".{}", self.default_extension)
        };
        StylesheetDialect {
            extension: self.extension.trim_start_matches('.').to_string(),
            default_extension,
            inlined: true,
        }
    }
}

/// `[script]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptConfig {
    pub javascript: bool,
    pub typescript: bool,
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            javascript: true,
            typescript: true,
        }
    }
}

impl ResolverConfig {
    /// Parse configuration from a TOML string, ignoring unknown fields.
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(Self::parse_with_ignored(content)?.0)
    }

    /// Load `path`, warning about unknown fields.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            log!("warning"; "unknown fields in {}: {}", path.display(), ignored.join(", "));
        }
        Ok(config)
    }

    /// Load the explicit `path`, or `cwd/assetgraph.toml` when it exists.
    ///
    /// An explicit path that cannot be read is an error; a missing default
    /// file yields the default configuration.
    pub fn load(cwd: &Path, path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_path(&cwd.join(path)),
            None => {
                let default = cwd.join(CONFIG_FILE);
                if default.is_file() {
                    Self::from_path(&default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path<'_>| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Absolute cache location for a pass rooted at `cwd`.
    pub fn cache_path(&self, cwd: &Path) -> PathBuf {
        cwd.join(&self.cache_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(ResolverConfig::from_str("").unwrap(), ResolverConfig::default());
    }

    #[test]
    fn test_parse_sections() {
        let config = ResolverConfig::from_str(
            r#"
            dev = true
            cache_file = "tmp/cache.json"

            [less]
            extension = "less"
            default_extension = "less"

            [script]
            typescript = false
            "#,
        )
        .unwrap();

        assert!(config.dev);
        assert!(!config.parallel);
        assert_eq!(config.cache_file, PathBuf::from("tmp/cache.json"));
        assert!(config.script.javascript);
        assert!(!config.script.typescript);
        assert_eq!(config.less.dialect().default_extension, ".less");
    }

    #[test]
    fn test_unknown_fields_are_collected() {
        let (_, mut ignored) =
            ResolverConfig::parse_with_ignored("dev = true\nbogus = 1\n[less]\nflavor = \"x\"\n")
                .unwrap();
        ignored.sort();
        assert_eq!(ignored, ["bogus", "less.flavor"]);
    }

    #[test]
    fn test_invalid_toml() {
        let result = ResolverConfig::from_str("dev = ");
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn test_load_default_and_explicit() {
        let dir = TempDir::new().unwrap();
        assert_eq!(
            ResolverConfig::load(dir.path(), None).unwrap(),
            ResolverConfig::default()
        );

        fs::write(dir.path().join(CONFIG_FILE), "parallel = true").unwrap();
        assert!(ResolverConfig::load(dir.path(), None).unwrap().parallel);

        let missing = ResolverConfig::load(dir.path(), Some(Path::new("other.toml")));
        assert!(matches!(missing, Err(ConfigError::Io(..))));
    }
}
