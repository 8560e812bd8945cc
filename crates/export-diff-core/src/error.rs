//! Error types for export-diff-core

use std::path::PathBuf;

use crate::classify::EntryKind;

/// Result type for export-diff-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while comparing export archives
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An archive root is missing, not a directory, or cannot be walked.
    #[error("Archive root {path} is not readable: {message}")]
    Extraction { path: PathBuf, message: String },

    #[error("Failed to parse {kind} entry: {message}")]
    Parse { kind: EntryKind, message: String },

    #[error("Unexpected {kind} structure at {path}: expected {expected}")]
    Shape {
        kind: EntryKind,
        path: String,
        expected: String,
    },

    #[error("{0} entries cannot be normalized")]
    NotNormalizable(EntryKind),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub fn extraction(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Extraction {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn parse(kind: EntryKind, message: impl Into<String>) -> Self {
        Self::Parse {
            kind,
            message: message.into(),
        }
    }

    pub fn shape(kind: EntryKind, path: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::Shape {
            kind,
            path: path.into(),
            expected: expected.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
