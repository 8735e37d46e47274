//! The `assetgraph` command: resolve and print an import closure.

mod args;

pub use args::Cli;

use anyhow::{Context, Result};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::cache::ImportCache;
use crate::config::ResolverConfig;
use crate::file::File;
use crate::import::{DependencyTree, ImportFinder};
use crate::{debug, log, plugin};

/// Run a resolution pass as described by `cli`, writing to stdout.
pub fn run(cli: &Cli) -> Result<()> {
    let cwd = match &cli.cwd {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().context("Failed to get current working directory")?,
    };

    let mut config = ResolverConfig::load(&cwd, cli.config.as_deref())?;
    apply_overrides(&mut config, cli);

    let roots: Vec<File> = cli.files.iter().map(|p| root_file(&cwd, p)).collect();
    let tree = resolve(&cwd, &config, &roots)?;

    let stdout = io::stdout();
    write_tree(&mut stdout.lock(), &tree, cli.edges)?;
    Ok(())
}

/// CLI flags win over the config file.
fn apply_overrides(config: &mut ResolverConfig, cli: &Cli) {
    if let Some(dev) = cli.dev {
        config.dev = dev;
    }
    if let Some(parallel) = cli.parallel {
        config.parallel = parallel;
    }
}

/// Turn a user-supplied path into a cwd-relative [`File`].
fn root_file(cwd: &Path, path: &Path) -> File {
    let relative = path.strip_prefix(cwd).unwrap_or(path);
    File::new(File::clean(&relative.to_string_lossy().replace('\\', "/")))
}

/// Build the finder for `config`, walk from `roots`, and persist the cache
/// in dev mode.
pub fn resolve(cwd: &Path, config: &ResolverConfig, roots: &[File]) -> Result<DependencyTree> {
    let cache_path: PathBuf = config.cache_path(cwd);
    let cache = if config.dev {
        Arc::new(ImportCache::load(&cache_path)?)
    } else {
        Arc::new(ImportCache::new())
    };

    let mut finder = ImportFinder::new(cwd);
    plugin::activate_builtin(&mut finder, config, Arc::clone(&cache));

    let tree = if config.parallel {
        finder.all_parallel(roots)?
    } else {
        finder.all(roots)?
    };

    debug!("resolve"; "{} files, {} imports, {} missing",
        tree.files().len(), tree.imports().len(), tree.missing().len());
    for file in tree.missing() {
        log!("warning"; "not found: {}", file);
    }

    if config.dev {
        cache
            .save(&cache_path)
            .with_context(|| format!("Failed to save import cache to {}", cache_path.display()))?;
    }

    Ok(tree)
}

/// Print one file per line, or one edge per line with `edges`.
pub fn write_tree(out: &mut impl Write, tree: &DependencyTree, edges: bool) -> io::Result<()> {
    if edges {
        for import in tree.imports() {
            let marker = if import.is_virtual() { " (virtual)" } else { "" };
            writeln!(out, "{} -> {}{}", import.source(), import.imported_file(), marker)?;
        }
    } else {
        for file in tree.files() {
            writeln!(out, "{file}")?;
        }
    }
    Ok(())
}
