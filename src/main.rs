//! assetgraph - print the import closure of asset files.

use anyhow::Result;
use assetgraph::{cli, logger};
use clap::{ColorChoice, Parser};

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    cli::run(&cli)
}
