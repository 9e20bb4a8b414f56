//! Finishing pipeline
//!
//! Runs the full pass over the output root: scan for candidates, parse each
//! filename, rename matches to the canonical form, and publish metadata for
//! the new locations. The flow is strictly linear per artifact and fully
//! synchronous; per-artifact failures (no parse, pre-existing destination)
//! are logged and skipped, while infrastructure failures (untraversable
//! root, failed move, unwritable sink) abort the run.

use std::fs;
use std::io;

use thiserror::Error;

use crate::config::{ConfigError, LaneConfig};
use crate::parser::{parse_filename, ParseOutcome};
use crate::publish::{assignments_for, publish_artifact, EnvironmentSink, PublishError};
use crate::rename::{execute_rename, plan_rename, RenameError};
use crate::scanner::{scan_artifacts, ScanError};
use crate::summary::{ProcessedArtifact, RunSummary};

/// Pipeline errors
///
/// Only infrastructure-level failures surface here; grammar mismatches and
/// duplicate destinations are contained per artifact and recorded in the
/// run summary instead.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("scan error: {0}")]
    Scan(#[from] ScanError),

    #[error("rename error: {0}")]
    Rename(RenameError),

    #[error("publish error: {0}")]
    Publish(#[from] PublishError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl PipelineError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            PipelineError::Config(_) => 1,
            PipelineError::Scan(_) => 20,
            PipelineError::Rename(_) => 40,
            PipelineError::Publish(_) => 50,
            PipelineError::Io(_) => 1,
        }
    }
}

/// Result type for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Run the full finishing pass
///
/// With `dry_run` set, rename plans and would-be assignments are computed
/// and reported but nothing is moved and the sink is never touched.
pub fn run_pipeline(
    config: &LaneConfig,
    sink: &mut dyn EnvironmentSink,
    dry_run: bool,
) -> PipelineResult<RunSummary> {
    let candidates = scan_artifacts(&config.root, &config.extension)?;

    let mut summary = RunSummary::new(config.root.clone(), dry_run);
    summary.candidates = candidates.len();

    for file in candidates {
        let parsed = match parse_filename(&file.filename, &config.extension) {
            ParseOutcome::Parsed(parsed) => parsed,
            ParseOutcome::NoMatch { filename } => {
                println!("Skipping {}: does not match the artifact naming pattern", filename);
                summary.record_no_match(filename);
                continue;
            }
        };

        let plan = plan_rename(&file, &parsed, &config.canonical_base, &config.extension);

        if dry_run {
            if plan.destination.exists() {
                println!(
                    "[dry-run] {} would collide with existing {}",
                    file.filename,
                    plan.destination.display()
                );
                summary.record_duplicate(file.filename);
                continue;
            }

            println!(
                "[dry-run] would rename {} -> {}",
                plan.source.display(),
                plan.destination.display()
            );
            for assignment in assignments_for(&parsed, &plan.destination) {
                println!("[dry-run] would set {}={}", assignment.key, assignment.value);
            }
            summary.record_processed(ProcessedArtifact {
                source: plan.source,
                destination: plan.destination,
                version: parsed.version.dotted(),
                flavor: parsed.flavor,
            });
            continue;
        }

        match execute_rename(&plan) {
            Ok(()) => {}
            Err(RenameError::DuplicateArtifact(destination)) => {
                println!(
                    "Skipping {}: destination {} already exists",
                    file.filename,
                    destination.display()
                );
                summary.record_duplicate(file.filename);
                continue;
            }
            Err(err) => return Err(PipelineError::Rename(err)),
        }

        // Publish the absolute path of the file as it now exists on disk.
        let destination = fs::canonicalize(&plan.destination)?;
        let assignments = publish_artifact(sink, &parsed, &destination)?;
        for assignment in &assignments {
            println!("Setting env variable: {}={}", assignment.key, assignment.value);
        }
        println!(
            "Processed {} -> {}",
            file.filename,
            destination.display()
        );

        summary.record_processed(ProcessedArtifact {
            source: plan.source,
            destination,
            version: parsed.version.dotted(),
            flavor: parsed.flavor,
        });
    }

    Ok(summary)
}
