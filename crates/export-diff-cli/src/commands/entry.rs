//! Entry command implementation

use std::path::Path;

use colored::Colorize;
use export_diff_core::{Diff, EntryKind, compare_entry, render_divergence};
use serde_json::json;

use crate::error::{CliError, Result};

/// Run the entry command
///
/// Normalizes both documents as `kind` and prints the points where they
/// diverge.
pub fn run_entry(kind: EntryKind, left: &Path, right: &Path, json: bool) -> Result<()> {
    let left_content = std::fs::read_to_string(left)?;
    let right_content = std::fs::read_to_string(right)?;
    tracing::debug!(%kind, left = %left.display(), right = %right.display(), "Comparing documents");

    let diff = compare_entry(kind, &left_content, &right_content)?;

    if json {
        let output = json!({
            "kind": kind,
            "equal": diff.is_equal(),
            "diff": diff.divergence().map(|d| d.to_json()),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        match &diff {
            Diff::Equal => println!("{} documents are equivalent", "OK".green().bold()),
            Diff::Divergent(divergence) => {
                print!("{}", render_divergence(divergence));
                println!();
                println!(
                    "{} documents differ at {} points",
                    "FAIL".red().bold(),
                    divergence.leaf_count()
                );
            }
        }
    }

    match diff {
        Diff::Equal => Ok(()),
        Diff::Divergent(divergence) => Err(CliError::EntriesDiffer {
            points: divergence.leaf_count(),
        }),
    }
}
