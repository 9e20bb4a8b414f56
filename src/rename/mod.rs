//! Canonical renaming
//!
//! Computes the published filename for a parsed artifact and moves the file
//! into place within its own directory. The canonical form always joins
//! version and flavor with an underscore, regardless of the separator used
//! in the source filename:
//!
//! ```text
//! <canonical base> "_v" <major> "." <minor> "." <patch> "_" <flavor> <ext>
//! ```

use std::fs;
use std::io;
use std::path::PathBuf;

use crate::parser::ParsedArtifact;
use crate::scanner::ArtifactFile;

/// A computed source/destination pair for one artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenamePlan {
    pub source: PathBuf,
    pub destination: PathBuf,
}

/// Errors that can occur while renaming an artifact
#[derive(Debug, thiserror::Error)]
pub enum RenameError {
    /// The destination already exists; recoverable at artifact granularity
    #[error("destination already exists: {0}")]
    DuplicateArtifact(PathBuf),

    /// The move itself failed; fatal to the run
    #[error("failed to move {source} to {destination}: {error}")]
    Move {
        source: PathBuf,
        destination: PathBuf,
        #[source]
        error: io::Error,
    },
}

/// Compute the canonical published filename for a parsed artifact
pub fn canonical_filename(
    canonical_base: &str,
    extension: &str,
    parsed: &ParsedArtifact,
) -> String {
    format!(
        "{}_v{}_{}{}",
        canonical_base,
        parsed.version.dotted(),
        parsed.flavor,
        extension
    )
}

/// Build the rename plan for an artifact, keeping it in its own directory
pub fn plan_rename(
    file: &ArtifactFile,
    parsed: &ParsedArtifact,
    canonical_base: &str,
    extension: &str,
) -> RenamePlan {
    let destination = file
        .directory
        .join(canonical_filename(canonical_base, extension, parsed));
    RenamePlan {
        source: file.path(),
        destination,
    }
}

/// Execute a rename plan
///
/// The move either fully succeeds or leaves the source untouched. A
/// pre-existing destination aborts the move for this artifact only.
pub fn execute_rename(plan: &RenamePlan) -> Result<(), RenameError> {
    if plan.destination.exists() {
        return Err(RenameError::DuplicateArtifact(plan.destination.clone()));
    }

    fs::rename(&plan.source, &plan.destination).map_err(|error| RenameError::Move {
        source: plan.source.clone(),
        destination: plan.destination.clone(),
        error,
    })
}
