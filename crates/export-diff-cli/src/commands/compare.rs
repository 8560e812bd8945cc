//! Compare command implementation

use std::path::Path;

use colored::Colorize;
use export_diff_core::{compare_archives, render_text};

use crate::error::{CliError, Result};
use crate::extract::ArchiveSource;

/// Run the compare command
///
/// Prints the report to stdout and fails with
/// [`CliError::ComparisonFailed`] when it carries any finding.
pub fn run_compare(left: &Path, right: &Path, json: bool, keep_extracted: bool) -> Result<()> {
    let left_source = ArchiveSource::open(left, keep_extracted)?;
    let right_source = ArchiveSource::open(right, keep_extracted)?;

    if keep_extracted {
        for (archive, source) in [(left, &left_source), (right, &right_source)] {
            if let Some(dir) = source.extracted_to() {
                eprintln!(
                    "{} {} to {}",
                    "Extracted".dimmed(),
                    archive.display(),
                    dir.display()
                );
            }
        }
    }

    let report = compare_archives(left_source.root(), right_source.root())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report.to_json())?);
    } else {
        print!("{}", render_text(&report));
        println!();
        if report.passed() {
            println!("{} archives hold the same data", "OK".green().bold());
        } else {
            println!(
                "{} archives differ ({} findings)",
                "FAIL".red().bold(),
                report.finding_count()
            );
        }
    }

    if report.passed() {
        Ok(())
    } else {
        Err(CliError::ComparisonFailed {
            findings: report.finding_count(),
        })
    }
}
