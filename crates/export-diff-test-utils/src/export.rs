//! [`TestExport`] builder for extracted export archive trees.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::write::GzEncoder;
use serde_json::Value;
use tempfile::TempDir;

/// Logical root directory inside every export archive.
pub const ARCHIVE_ROOT: &str = "puppetdb-bak";

/// A temporary directory holding one extracted export archive.
///
/// # Example
///
/// ```rust,no_run
/// use export_diff_test_utils::{TestExport, samples};
///
/// let export = TestExport::new();
/// export.write_metadata(&samples::metadata("2013-02-01T00:00:00.000Z"));
/// export.write_catalog("web01.example.com", &samples::catalog("web01.example.com"));
/// export.assert_file_exists("puppetdb-bak/export-metadata.json");
/// ```
pub struct TestExport {
    temp_dir: TempDir,
}

impl Default for TestExport {
    fn default() -> Self {
        Self::new()
    }
}

impl TestExport {
    /// Create an empty archive tree containing only the logical root.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join(ARCHIVE_ROOT)).unwrap();
        Self { temp_dir }
    }

    /// Return the extraction root (the directory containing `puppetdb-bak/`).
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write `content` at `relative` (root-relative), creating parents.
    pub fn write_file(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.root().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    /// Write a pretty-printed JSON document at `relative`.
    pub fn write_json(&self, relative: &str, value: &Value) -> PathBuf {
        self.write_file(relative, &serde_json::to_string_pretty(value).unwrap())
    }

    /// Write `puppetdb-bak/export-metadata.json`.
    pub fn write_metadata(&self, metadata: &Value) -> PathBuf {
        self.write_json(&format!("{ARCHIVE_ROOT}/export-metadata.json"), metadata)
    }

    /// Write `puppetdb-bak/catalogs/<certname>.json`.
    pub fn write_catalog(&self, certname: &str, catalog: &Value) -> PathBuf {
        self.write_json(&format!("{ARCHIVE_ROOT}/catalogs/{certname}.json"), catalog)
    }

    /// Remove the file or directory at `relative`.
    pub fn remove(&self, relative: &str) {
        let path = self.root().join(relative);
        if path.is_dir() {
            fs::remove_dir_all(&path).unwrap();
        } else {
            fs::remove_file(&path).unwrap();
        }
    }

    /// Pack the tree into a gzip-compressed tarball at `dest`, the way the
    /// export command ships it.
    pub fn pack_tar_gz(&self, dest: &Path) -> PathBuf {
        let file = File::create(dest).unwrap();
        let encoder = GzEncoder::new(file, Compression::default());
        let mut builder = tar::Builder::new(encoder);
        builder
            .append_dir_all(ARCHIVE_ROOT, self.root().join(ARCHIVE_ROOT))
            .unwrap();
        builder.into_inner().unwrap().finish().unwrap();
        dest.to_path_buf()
    }

    /// Assert that `relative` exists under the root.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, relative: &str) {
        let full_path = self.root().join(relative);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }
}
