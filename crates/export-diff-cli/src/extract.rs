//! Resolving command-line archive arguments to extracted directory trees

use std::fs::File;
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use tempfile::TempDir;

use crate::error::{CliError, Result};

const TARBALL_SUFFIXES: &[&str] = &[".tar.gz", ".tgz"];

/// An archive ready for comparison.
///
/// Directories are used in place. Tarballs are unpacked into a temporary
/// directory that lives as long as this value, unless it was opened with
/// `keep` set.
#[derive(Debug)]
pub struct ArchiveSource {
    root: PathBuf,
    extracted: Option<TempDir>,
}

impl ArchiveSource {
    pub fn open(path: &Path, keep: bool) -> Result<Self> {
        if path.is_dir() || !is_tarball(path) {
            return Ok(Self {
                root: path.to_path_buf(),
                extracted: None,
            });
        }

        let dir = tempfile::Builder::new()
            .prefix("export-diff-")
            .keep(keep)
            .tempdir()?;
        tracing::debug!(
            archive = %path.display(),
            into = %dir.path().display(),
            "Unpacking export tarball"
        );

        let file = File::open(path).map_err(|e| CliError::extract(path, e))?;
        let mut archive = tar::Archive::new(GzDecoder::new(file));
        archive
            .unpack(dir.path())
            .map_err(|e| CliError::extract(path, e))?;

        Ok(Self {
            root: dir.path().to_path_buf(),
            extracted: Some(dir),
        })
    }

    /// Directory holding the archive contents.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Where the tarball was unpacked, if it was one.
    pub fn extracted_to(&self) -> Option<&Path> {
        self.extracted.as_ref().map(TempDir::path)
    }
}

fn is_tarball(path: &Path) -> bool {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    TARBALL_SUFFIXES.iter().any(|suffix| name.ends_with(suffix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use export_diff_test_utils::{TestExport, samples};

    #[test]
    fn test_is_tarball() {
        assert!(is_tarball(Path::new("/tmp/export.tar.gz")));
        assert!(is_tarball(Path::new("export.TGZ")));
        assert!(!is_tarball(Path::new("export.tar")));
        assert!(!is_tarball(Path::new("export")));
    }

    #[test]
    fn test_directory_used_in_place() {
        let export = TestExport::new();
        let source = ArchiveSource::open(export.root(), false).unwrap();
        assert_eq!(source.root(), export.root());
        assert!(source.extracted_to().is_none());
    }

    #[test]
    fn test_tarball_is_unpacked() {
        let export = TestExport::new();
        export.write_metadata(&samples::metadata("2026-01-01T00:00:00Z"));
        let out = tempfile::TempDir::new().unwrap();
        let tarball = out.path().join("export.tar.gz");
        export.pack_tar_gz(&tarball);

        let source = ArchiveSource::open(&tarball, false).unwrap();
        assert!(
            source
                .root()
                .join("puppetdb-bak/export-metadata.json")
                .is_file()
        );
        assert!(source.extracted_to().is_some());
    }

    #[test]
    fn test_dropping_source_removes_extraction() {
        let export = TestExport::new();
        let out = tempfile::TempDir::new().unwrap();
        let tarball = out.path().join("export.tgz");
        export.pack_tar_gz(&tarball);

        let source = ArchiveSource::open(&tarball, false).unwrap();
        let root = source.root().to_path_buf();
        drop(source);
        assert!(!root.exists());
    }

    #[test]
    fn test_corrupt_tarball_is_extract_error() {
        let out = tempfile::TempDir::new().unwrap();
        let tarball = out.path().join("broken.tar.gz");
        std::fs::write(&tarball, b"not gzip").unwrap();

        let err = ArchiveSource::open(&tarball, false).unwrap_err();
        assert!(matches!(err, CliError::Extract { .. }));
    }
}
