//! Command-line interface definitions.

use clap::{ColorChoice, Parser};
use std::path::PathBuf;

/// Print the import closure of asset files
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Entry files, relative to the working directory
    #[arg(required = true, value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
    pub files: Vec<PathBuf>,

    /// Working directory all paths are relative to (default: current directory)
    #[arg(short = 'C', long, value_hint = clap::ValueHint::DirPath)]
    pub cwd: Option<PathBuf>,

    /// Config file path (default: assetgraph.toml when present)
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Development mode: reuse and update the import cache
    #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub dev: Option<bool>,

    /// Scan each dependency layer in parallel
    #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub parallel: Option<bool>,

    /// Print `source -> target` edges instead of the file list
    #[arg(short, long)]
    pub edges: bool,

    /// Enable verbose output for debugging
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_parse_flags() {
        let cli = Cli::try_parse_from(["assetgraph", "-d", "--edges", "a.less", "b.js"]).unwrap();
        assert_eq!(cli.files, [PathBuf::from("a.less"), PathBuf::from("b.js")]);
        assert_eq!(cli.dev, Some(true));
        assert_eq!(cli.parallel, None);
        assert!(cli.edges);
    }

    #[test]
    fn test_explicit_false() {
        let cli = Cli::try_parse_from(["assetgraph", "--dev", "false", "a.less"]).unwrap();
        assert_eq!(cli.dev, Some(false));
    }

    #[test]
    fn test_verbose_and_version_flags() {
        Cli::command().debug_assert();

        let cli = Cli::try_parse_from(["assetgraph", "-v", "a.less"]).unwrap();
        assert!(cli.verbose);

        let err = Cli::try_parse_from(["assetgraph", "-V"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_files_required() {
        assert!(Cli::try_parse_from(["assetgraph", "--edges"]).is_err());
    }
}
