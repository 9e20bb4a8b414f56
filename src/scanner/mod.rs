//! Artifact discovery
//!
//! Walks the build output root and yields every file whose name ends with
//! the artifact extension. Traversal is recursive, exhaustive, and sorted by
//! file name at each level so a run visits candidates in a deterministic
//! order. Unreadable subentries are skipped with a diagnostic; only a root
//! that cannot be traversed at all fails the scan.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// A candidate artifact file discovered under the output root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactFile {
    /// Directory containing the file
    pub directory: PathBuf,

    /// File name within `directory`
    pub filename: String,
}

impl ArtifactFile {
    /// Full path to the file
    pub fn path(&self) -> PathBuf {
        self.directory.join(&self.filename)
    }
}

/// Errors that can occur while scanning the output root
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("output root is not a directory: {0}")]
    RootMissing(PathBuf),

    #[error("failed to traverse output root {root}: {source}")]
    Traversal {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// Scan `root` recursively for files ending in `extension`
///
/// Read-only; the returned set is complete and ordered deterministically.
pub fn scan_artifacts(root: &Path, extension: &str) -> Result<Vec<ArtifactFile>, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::RootMissing(root.to_path_buf()));
    }

    let mut artifacts = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(false)
        .sort_by(|a, b| a.file_name().cmp(b.file_name()))
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                // The root passed the is_dir check above, so depth-0 errors
                // mean the root itself became untraversable mid-scan.
                if err.depth() == 0 {
                    return Err(ScanError::Traversal {
                        root: root.to_path_buf(),
                        source: err,
                    });
                }
                eprintln!("Skipping unreadable entry under {}: {}", root.display(), err);
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        // A lossy conversion would yield a filename whose reconstructed path
        // no longer exists on disk, failing the later rename; treat non-UTF-8
        // names like unreadable entries and keep scanning.
        let filename = match entry.file_name().to_str() {
            Some(name) => name.to_string(),
            None => {
                eprintln!(
                    "Skipping non-UTF-8 filename under {}: {:?}",
                    root.display(),
                    entry.file_name()
                );
                continue;
            }
        };
        if !filename.ends_with(extension) {
            continue;
        }

        let directory = entry
            .path()
            .parent()
            .unwrap_or(root)
            .to_path_buf();

        artifacts.push(ArtifactFile {
            directory,
            filename,
        });
    }

    Ok(artifacts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_scan_finds_nested_artifacts() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("release")).unwrap();
        fs::create_dir_all(dir.path().join("debug")).unwrap();
        fs::write(dir.path().join("release/app-release.apk"), b"r").unwrap();
        fs::write(dir.path().join("debug/app-debug.apk"), b"d").unwrap();
        fs::write(dir.path().join("release/output.json"), b"{}").unwrap();

        let found = scan_artifacts(dir.path(), ".apk").unwrap();
        let names: Vec<_> = found.iter().map(|a| a.filename.as_str()).collect();
        assert_eq!(names, vec!["app-debug.apk", "app-release.apk"]);
    }

    #[test]
    fn test_scan_order_is_deterministic() {
        let dir = TempDir::new().unwrap();
        for name in ["c.apk", "a.apk", "b.apk"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }

        let first = scan_artifacts(dir.path(), ".apk").unwrap();
        let second = scan_artifacts(dir.path(), ".apk").unwrap();
        assert_eq!(first, second);

        let names: Vec<_> = first.iter().map(|a| a.filename.as_str()).collect();
        assert_eq!(names, vec!["a.apk", "b.apk", "c.apk"]);
    }

    #[test]
    fn test_missing_root_is_fatal() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("no-such-dir");
        let err = scan_artifacts(&missing, ".apk").unwrap_err();
        assert!(matches!(err, ScanError::RootMissing(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_filename_skipped() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("good_v1.0.0-release.apk"), b"g").unwrap();
        let bad = dir
            .path()
            .join(OsStr::from_bytes(b"bad\xff_v1.0.0-release.apk"));
        fs::write(&bad, b"b").unwrap();

        let found = scan_artifacts(dir.path(), ".apk").unwrap();
        let names: Vec<_> = found.iter().map(|a| a.filename.as_str()).collect();
        assert_eq!(names, vec!["good_v1.0.0-release.apk"]);
        assert!(bad.exists());
    }

    #[test]
    fn test_extension_filter_only() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("metadata.txt"), b"m").unwrap();
        fs::write(dir.path().join("anything_at_all.apk"), b"a").unwrap();

        let found = scan_artifacts(dir.path(), ".apk").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].filename, "anything_at_all.apk");
        assert_eq!(found[0].directory, dir.path());
    }
}
