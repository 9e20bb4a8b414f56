//! Environment metadata publishing
//!
//! After an artifact is renamed, two assignments are appended to the CI
//! orchestrator's environment sink: `APP_VERSION` with the dotted version,
//! and `APK_FILE_PATH_<flavor>` with the absolute destination path. The sink
//! is append-only from this tool's perspective; lines are written unquoted
//! as `KEY=VALUE`, one per assignment, with no deduplication or read-back.
//!
//! When several artifacts are processed in one run, each appends its own
//! `APP_VERSION` line and the orchestrator observes the last one. That
//! last-write-wins behavior is preserved from the original pipeline.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::parser::ParsedArtifact;

/// Key for the published version assignment
pub const APP_VERSION_KEY: &str = "APP_VERSION";

/// Key prefix for per-flavor artifact path assignments
pub const APK_PATH_KEY_PREFIX: &str = "APK_FILE_PATH_";

/// Environment variable naming the orchestrator-provided environment file
pub const ENV_FILE_VAR: &str = "GITHUB_ENV";

/// A single `KEY=VALUE` assignment for the environment sink
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentAssignment {
    pub key: String,
    pub value: String,
}

/// Errors that can occur while publishing assignments
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("no environment file configured: set GITHUB_ENV or pass --env-file")]
    SinkUnconfigured,

    #[error("failed to append to environment file {path}: {error}")]
    Append {
        path: PathBuf,
        #[source]
        error: io::Error,
    },
}

/// Append-only sink for environment assignments
///
/// The file-backed implementation talks to the real orchestrator; the
/// in-memory one substitutes for it in tests and dry runs.
pub trait EnvironmentSink {
    fn append(&mut self, assignment: &EnvironmentAssignment) -> Result<(), PublishError>;
}

/// Sink backed by the orchestrator-provided environment file
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Resolve the sink from the orchestrator-provided environment variable
    pub fn from_env() -> Option<Self> {
        std::env::var_os(ENV_FILE_VAR).map(|path| Self::new(PathBuf::from(path)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl EnvironmentSink for FileSink {
    fn append(&mut self, assignment: &EnvironmentAssignment) -> Result<(), PublishError> {
        let append_line = || -> io::Result<()> {
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.path)?;
            writeln!(file, "{}={}", assignment.key, assignment.value)
        };

        append_line().map_err(|error| PublishError::Append {
            path: self.path.clone(),
            error,
        })
    }
}

/// In-memory sink for tests and dry runs
#[derive(Debug, Default)]
pub struct MemorySink {
    pub assignments: Vec<EnvironmentAssignment>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last value appended for `key`, mirroring what an orchestrator that
    /// reads the file top to bottom would observe
    pub fn last_value(&self, key: &str) -> Option<&str> {
        self.assignments
            .iter()
            .rev()
            .find(|a| a.key == key)
            .map(|a| a.value.as_str())
    }
}

impl EnvironmentSink for MemorySink {
    fn append(&mut self, assignment: &EnvironmentAssignment) -> Result<(), PublishError> {
        self.assignments.push(assignment.clone());
        Ok(())
    }
}

/// Build the two assignments published for one renamed artifact
///
/// Pure; `destination` must already be the absolute path of the renamed file.
pub fn assignments_for(parsed: &ParsedArtifact, destination: &Path) -> Vec<EnvironmentAssignment> {
    vec![
        EnvironmentAssignment {
            key: APP_VERSION_KEY.to_string(),
            value: parsed.version.dotted(),
        },
        EnvironmentAssignment {
            key: format!("{}{}", APK_PATH_KEY_PREFIX, parsed.flavor),
            value: destination.display().to_string(),
        },
    ]
}

/// Publish both assignments for a renamed artifact, returning what was sent
pub fn publish_artifact(
    sink: &mut dyn EnvironmentSink,
    parsed: &ParsedArtifact,
    destination: &Path,
) -> Result<Vec<EnvironmentAssignment>, PublishError> {
    let assignments = assignments_for(parsed, destination);
    for assignment in &assignments {
        sink.append(assignment)?;
    }
    Ok(assignments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{ParseOutcome, parse_filename};
    use tempfile::TempDir;

    fn parsed(filename: &str) -> ParsedArtifact {
        match parse_filename(filename, ".apk") {
            ParseOutcome::Parsed(p) => p,
            ParseOutcome::NoMatch { .. } => panic!("fixture must parse"),
        }
    }

    #[test]
    fn test_assignments_for_renamed_artifact() {
        let p = parsed("App_v2.3.9-release.apk");
        let dest = Path::new("/out/release/NovelDokusha_v2.3.9_release.apk");
        let assignments = assignments_for(&p, dest);

        assert_eq!(assignments.len(), 2);
        assert_eq!(assignments[0].key, "APP_VERSION");
        assert_eq!(assignments[0].value, "2.3.9");
        assert_eq!(assignments[1].key, "APK_FILE_PATH_release");
        assert_eq!(
            assignments[1].value,
            "/out/release/NovelDokusha_v2.3.9_release.apk"
        );
    }

    #[test]
    fn test_flavor_used_verbatim_in_key() {
        let p = parsed("App_v1.0.0-x86_64-release.apk");
        let assignments = assignments_for(&p, Path::new("/out/a.apk"));
        assert_eq!(assignments[1].key, "APK_FILE_PATH_x86_64-release");
    }

    #[test]
    fn test_file_sink_appends_without_truncating() {
        let dir = TempDir::new().unwrap();
        let env_file = dir.path().join("github_env");
        std::fs::write(&env_file, "EXISTING=1\n").unwrap();

        let mut sink = FileSink::new(env_file.clone());
        let p = parsed("App_v1.0.0-release.apk");
        publish_artifact(&mut sink, &p, Path::new("/out/NovelDokusha_v1.0.0_release.apk"))
            .unwrap();

        let contents = std::fs::read_to_string(&env_file).unwrap();
        assert_eq!(
            contents,
            "EXISTING=1\nAPP_VERSION=1.0.0\nAPK_FILE_PATH_release=/out/NovelDokusha_v1.0.0_release.apk\n"
        );
    }

    #[test]
    fn test_file_sink_creates_missing_file() {
        let dir = TempDir::new().unwrap();
        let env_file = dir.path().join("github_env");

        let mut sink = FileSink::new(env_file.clone());
        sink.append(&EnvironmentAssignment {
            key: "APP_VERSION".to_string(),
            value: "9.9.9".to_string(),
        })
        .unwrap();

        assert_eq!(
            std::fs::read_to_string(&env_file).unwrap(),
            "APP_VERSION=9.9.9\n"
        );
    }

    #[test]
    fn test_memory_sink_last_value_wins() {
        let mut sink = MemorySink::new();
        for version in ["1.0.0", "2.0.0"] {
            sink.append(&EnvironmentAssignment {
                key: APP_VERSION_KEY.to_string(),
                value: version.to_string(),
            })
            .unwrap();
        }
        assert_eq!(sink.last_value(APP_VERSION_KEY), Some("2.0.0"));
        assert_eq!(sink.assignments.len(), 2);
    }
}
