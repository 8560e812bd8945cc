//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use export_diff_core::EntryKind;

/// Export Diff - Check that two PuppetDB export archives hold the same data
#[derive(Parser, Debug)]
#[command(name = "export-diff")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Compare two export archives
    ///
    /// Each side may be an extracted archive directory or a .tar.gz/.tgz
    /// export file. Exits non-zero when any finding is reported.
    ///
    /// Examples:
    ///   export-diff compare before.tar.gz after.tar.gz
    ///   export-diff compare ./export1 ./export2 --json
    Compare {
        /// Left-hand archive (the original export)
        left: PathBuf,

        /// Right-hand archive (the export to verify)
        right: PathBuf,

        /// Output as JSON for scripting
        #[arg(long, env = "EXPORT_DIFF_JSON")]
        json: bool,

        /// Leave unpacked tarballs on disk and print where they are
        #[arg(long, env = "EXPORT_DIFF_KEEP_EXTRACTED")]
        keep_extracted: bool,
    },

    /// Compare two single export documents
    Entry {
        /// How to normalize the documents
        #[arg(value_enum)]
        kind: DocumentKind,

        /// Left-hand document
        left: PathBuf,

        /// Right-hand document
        right: PathBuf,

        /// Output as JSON for scripting
        #[arg(long, env = "EXPORT_DIFF_JSON")]
        json: bool,
    },
}

/// Document kinds accepted by the `entry` command
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// export-metadata.json
    Metadata,
    /// A catalogs/*.json document
    Catalog,
}

impl From<DocumentKind> for EntryKind {
    fn from(kind: DocumentKind) -> Self {
        match kind {
            DocumentKind::Metadata => EntryKind::Metadata,
            DocumentKind::Catalog => EntryKind::DataRecord,
        }
    }
}
