//! Archive comparison
//!
//! Walks two extracted archive trees, pairs entries by root-relative path,
//! and runs every recognized pair through normalization and diffing. Per-entry
//! problems are accumulated into the [`ComparisonReport`]; only unreadable
//! archive roots abort the run.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::classify::{Entry, EntryKind};
use crate::diff::{Diff, diff};
use crate::error::{Error, Result};
use crate::normalize::normalize;
use crate::report::{ComparisonReport, ContentFinding, Side, StructuralFinding};
use crate::value::Value;

/// Every entry found under one extracted archive root.
#[derive(Debug, Clone)]
pub struct ArchiveTree {
    root: PathBuf,
    entries: Vec<Entry>,
}

impl ArchiveTree {
    /// Walk `root` recursively, in file name order, without following links.
    pub fn scan(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        let metadata = fs::metadata(root).map_err(|e| Error::extraction(root, e.to_string()))?;
        if !metadata.is_dir() {
            return Err(Error::extraction(root, "not a directory"));
        }

        let mut entries = Vec::new();
        for item in WalkDir::new(root)
            .min_depth(1)
            .follow_links(false)
            .sort_by_file_name()
        {
            let item = item.map_err(|e| Error::extraction(root, e.to_string()))?;
            let relative = item
                .path()
                .strip_prefix(root)
                .map_err(|e| Error::extraction(root, e.to_string()))?;

            let mut relative_path = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            if item.file_type().is_dir() {
                relative_path.push('/');
            }
            entries.push(Entry::new(relative_path));
        }

        Ok(Self {
            root: root.to_path_buf(),
            entries,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Root-relative paths of every non-directory entry.
    pub fn file_paths(&self) -> BTreeSet<&str> {
        self.entries
            .iter()
            .filter(|e| !e.is_dir())
            .map(|e| e.relative_path.as_str())
            .collect()
    }

    fn read(&self, relative_path: &str) -> Result<String> {
        let path = self.root.join(relative_path);
        fs::read_to_string(&path).map_err(|e| Error::io(path, e))
    }
}

/// Compare two extracted archive trees.
///
/// Fails only when either root is not a readable directory tree.
pub fn compare_archives(left_root: &Path, right_root: &Path) -> Result<ComparisonReport> {
    let left = ArchiveTree::scan(left_root)?;
    let right = ArchiveTree::scan(right_root)?;
    tracing::debug!(
        left = %left_root.display(),
        right = %right_root.display(),
        left_entries = left.entries.len(),
        right_entries = right.entries.len(),
        "Scanned archive trees"
    );

    let mut report = ComparisonReport::new(left_root, right_root);
    let right_files = right.file_paths();

    for entry in left.entries() {
        if entry.is_dir() {
            continue;
        }

        let path = &entry.relative_path;
        if !right_files.contains(path.as_str()) {
            tracing::warn!("Entry {} is missing from {}", path, right_root.display());
            report
                .structural
                .push(StructuralFinding::MissingEntry { path: path.clone() });
            continue;
        }

        if !entry.kind.is_comparable() {
            tracing::warn!("Unrecognized file found in archive: {}", path);
            report
                .structural
                .push(StructuralFinding::UnrecognizedEntry { path: path.clone() });
            continue;
        }

        tracing::debug!(%path, kind = %entry.kind, "Comparing entry");
        compare_pair(entry, &left, &right, &mut report);
    }

    let left_files = left.file_paths();
    for path in right_files.difference(&left_files) {
        tracing::warn!("Entry {} is extra in {}", path, right_root.display());
        report.structural.push(StructuralFinding::ExtraEntry {
            path: (*path).to_string(),
        });
    }

    tracing::info!(
        passed = report.passed(),
        compared = report.entries_compared,
        structural = report.structural.len(),
        content = report.content.len(),
        "Archive comparison finished"
    );
    Ok(report)
}

fn compare_pair(
    entry: &Entry,
    left: &ArchiveTree,
    right: &ArchiveTree,
    report: &mut ComparisonReport,
) {
    let path = &entry.relative_path;
    let load = |tree: &ArchiveTree, side: Side| -> std::result::Result<Value, ContentFinding> {
        tree.read(path)
            .and_then(|content| normalize(entry.kind, &content))
            .map_err(|e| ContentFinding::Invalid {
                path: path.clone(),
                side,
                message: e.to_string(),
            })
    };

    let (left_value, right_value) = match (load(left, Side::Left), load(right, Side::Right)) {
        (Ok(l), Ok(r)) => (l, r),
        (l, r) => {
            tracing::warn!("Entry {} could not be normalized", path);
            report.content.extend(l.err());
            report.content.extend(r.err());
            return;
        }
    };

    report.entries_compared += 1;
    if let Diff::Divergent(divergence) = diff(&left_value, &right_value) {
        tracing::warn!("Entry {} diverges at {} points", path, divergence.leaf_count());
        report.content.push(ContentFinding::Divergent {
            path: path.clone(),
            kind: entry.kind,
            divergence,
        });
    }
}

/// Normalize and diff a single pair of documents of the given kind.
pub fn compare_entry(kind: EntryKind, left_content: &str, right_content: &str) -> Result<Diff> {
    let left = normalize(kind, left_content)?;
    let right = normalize(kind, right_content)?;
    Ok(diff(&left, &right))
}
