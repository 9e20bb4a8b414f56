//! Run summary
//!
//! Aggregates the outcome of one finishing pass: which candidates were
//! renamed and published, which were skipped, and which versions were seen.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Schema version for the JSON summary output
pub const RUN_SUMMARY_SCHEMA_VERSION: u32 = 1;

/// One successfully renamed and published artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessedArtifact {
    /// Original path of the file as discovered
    pub source: PathBuf,

    /// Final path after renaming
    pub destination: PathBuf,

    /// Dotted version string published for this artifact
    pub version: String,

    /// Flavor identifier published for this artifact
    pub flavor: String,
}

/// Summary of a full finishing pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Schema version
    pub schema_version: u32,

    /// Output root that was scanned
    pub root: PathBuf,

    /// When the summary was created
    pub created_at: DateTime<Utc>,

    /// Whether this was a dry run (nothing renamed or published)
    pub dry_run: bool,

    /// Total candidates discovered by the scanner
    pub candidates: usize,

    /// Artifacts renamed and published, in processing order
    pub processed: Vec<ProcessedArtifact>,

    /// Filenames skipped because they did not match the grammar
    pub skipped_no_match: Vec<String>,

    /// Filenames skipped because the canonical destination already existed
    pub skipped_duplicate: Vec<String>,

    /// Distinct versions seen across processed artifacts, in first-seen order.
    /// More than one entry means the final APP_VERSION assignment only
    /// reflects the last artifact processed.
    pub versions_seen: Vec<String>,
}

impl RunSummary {
    pub fn new(root: PathBuf, dry_run: bool) -> Self {
        Self {
            schema_version: RUN_SUMMARY_SCHEMA_VERSION,
            root,
            created_at: Utc::now(),
            dry_run,
            candidates: 0,
            processed: Vec::new(),
            skipped_no_match: Vec::new(),
            skipped_duplicate: Vec::new(),
            versions_seen: Vec::new(),
        }
    }

    pub fn record_processed(&mut self, artifact: ProcessedArtifact) {
        if !self.versions_seen.contains(&artifact.version) {
            self.versions_seen.push(artifact.version.clone());
        }
        self.processed.push(artifact);
    }

    pub fn record_no_match(&mut self, filename: String) {
        self.skipped_no_match.push(filename);
    }

    pub fn record_duplicate(&mut self, filename: String) {
        self.skipped_duplicate.push(filename);
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Render a human-readable summary
    pub fn to_human(&self) -> String {
        let mut out = String::new();

        let heading = if self.dry_run {
            "Dry run summary"
        } else {
            "Run summary"
        };
        out.push_str(&format!("{} for {}\n", heading, self.root.display()));
        out.push_str(&format!(
            "  Candidates: {}  Processed: {}  No match: {}  Duplicates: {}\n",
            self.candidates,
            self.processed.len(),
            self.skipped_no_match.len(),
            self.skipped_duplicate.len(),
        ));

        for artifact in &self.processed {
            out.push_str(&format!(
                "  {} ({}) -> {}\n",
                artifact.flavor,
                artifact.version,
                artifact.destination.display()
            ));
        }
        for filename in &self.skipped_no_match {
            out.push_str(&format!("  Skipped (no match): {}\n", filename));
        }
        for filename in &self.skipped_duplicate {
            out.push_str(&format!("  Skipped (duplicate): {}\n", filename));
        }

        if self.versions_seen.len() > 1 {
            out.push_str(&format!(
                "  Warning: multiple versions in one run ({}); APP_VERSION reflects the last one\n",
                self.versions_seen.join(", ")
            ));
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn processed(version: &str, flavor: &str) -> ProcessedArtifact {
        ProcessedArtifact {
            source: Path::new("/out/src.apk").to_path_buf(),
            destination: Path::new("/out/dst.apk").to_path_buf(),
            version: version.to_string(),
            flavor: flavor.to_string(),
        }
    }

    #[test]
    fn test_versions_seen_is_distinct_in_order() {
        let mut summary = RunSummary::new(Path::new("/out").to_path_buf(), false);
        summary.record_processed(processed("1.0.0", "arm64"));
        summary.record_processed(processed("1.0.0", "x86_64"));
        summary.record_processed(processed("2.0.0", "release"));
        assert_eq!(summary.versions_seen, vec!["1.0.0", "2.0.0"]);
    }

    #[test]
    fn test_human_summary_warns_on_divergent_versions() {
        let mut summary = RunSummary::new(Path::new("/out").to_path_buf(), false);
        summary.candidates = 2;
        summary.record_processed(processed("1.0.0", "arm64"));
        summary.record_processed(processed("2.0.0", "x86_64"));

        let human = summary.to_human();
        assert!(human.contains("multiple versions in one run"));
        assert!(human.contains("1.0.0, 2.0.0"));
    }

    #[test]
    fn test_json_round_trips() {
        let mut summary = RunSummary::new(Path::new("/out").to_path_buf(), true);
        summary.candidates = 1;
        summary.record_no_match("build-debug.apk".to_string());

        let json = summary.to_json().unwrap();
        let back: RunSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(back.schema_version, RUN_SUMMARY_SCHEMA_VERSION);
        assert!(back.dry_run);
        assert_eq!(back.skipped_no_match, vec!["build-debug.apk"]);
    }
}
