//! Export Diff CLI
//!
//! Compares two PuppetDB export archives and exits non-zero when they differ.

mod cli;
mod commands;
mod error;
mod extract;
mod logging;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("{}: failed to initialize logging: {}", "warning".yellow(), e);
    }
    tracing::debug!(command = ?cli.command, "Starting export-diff");

    execute_command(cli.command)
}

fn execute_command(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Compare {
            left,
            right,
            json,
            keep_extracted,
        } => commands::run_compare(&left, &right, json, keep_extracted),
        Commands::Entry {
            kind,
            left,
            right,
            json,
        } => commands::run_entry(kind.into(), &left, &right, json),
    }
}
