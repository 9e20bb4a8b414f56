//! dokusha-apk-lane - APK artifact finishing step for CI
//!
//! This crate implements the post-build finishing pass of the NovelDokusha
//! CI pipeline: discover freshly built APKs under the build output root,
//! parse their structured filenames, rename each match to the canonical
//! published form, and append version and path metadata to the CI
//! orchestrator's environment file.

pub mod config;
pub mod parser;
pub mod pipeline;
pub mod publish;
pub mod rename;
pub mod scanner;
pub mod summary;

pub use config::LaneConfig;
pub use parser::{parse_filename, ParseOutcome, ParsedArtifact, Version};
pub use pipeline::{run_pipeline, PipelineError, PipelineResult};
pub use publish::{EnvironmentAssignment, EnvironmentSink, FileSink, MemorySink};
pub use rename::{canonical_filename, plan_rename, RenameError, RenamePlan};
pub use scanner::{scan_artifacts, ArtifactFile, ScanError};
pub use summary::{ProcessedArtifact, RunSummary};
