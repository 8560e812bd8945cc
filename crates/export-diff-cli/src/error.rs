//! Error types for export-diff-cli

use std::path::PathBuf;

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from export-diff-core
    #[error(transparent)]
    Core(#[from] export_diff_core::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON rendering error
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// A tarball could not be unpacked
    #[error("Failed to extract {path}: {source}")]
    Extract {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The archives were compared and did not match
    #[error("archives differ ({findings} findings)")]
    ComparisonFailed { findings: usize },

    /// The two documents were compared and did not match
    #[error("documents differ at {points} points")]
    EntriesDiffer { points: usize },
}

impl CliError {
    pub fn extract(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Extract {
            path: path.into(),
            source,
        }
    }
}
