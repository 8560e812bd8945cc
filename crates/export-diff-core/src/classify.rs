//! Entry classification by archive-relative path

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::layout::{CATALOGS_PREFIX, JSON_SUFFIX, METADATA_PATH};

/// Semantic type of an archive entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// The export metadata document.
    Metadata,
    /// A catalog document.
    DataRecord,
    /// A file matching no known rule.
    Unrecognized,
    /// A directory; traversed, never diffed.
    Directory,
}

impl EntryKind {
    /// Classify a root-relative, `/`-separated path.
    ///
    /// Directory paths carry a trailing `/`, the way tar listings render them.
    pub fn classify(relative_path: &str) -> Self {
        if relative_path.ends_with('/') {
            Self::Directory
        } else if relative_path == METADATA_PATH {
            Self::Metadata
        } else if relative_path.starts_with(CATALOGS_PREFIX) && relative_path.ends_with(JSON_SUFFIX)
        {
            Self::DataRecord
        } else {
            Self::Unrecognized
        }
    }

    /// Whether the normalizer knows how to handle this kind.
    pub fn is_comparable(&self) -> bool {
        matches!(self, Self::Metadata | Self::DataRecord)
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Metadata => "metadata",
            Self::DataRecord => "catalog",
            Self::Unrecognized => "unrecognized",
            Self::Directory => "directory",
        };
        f.write_str(name)
    }
}

/// One file or directory found under an archive root.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Entry {
    pub relative_path: String,
    pub kind: EntryKind,
}

impl Entry {
    pub fn new(relative_path: impl Into<String>) -> Self {
        let relative_path = relative_path.into();
        let kind = EntryKind::classify(&relative_path);
        Self {
            relative_path,
            kind,
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}
