//! Artifact filename parser
//!
//! Parses built artifact filenames against the grammar:
//!
//! ```text
//! <base> "_v" <major> "." <minor> "." <patch> "-" <flavor> <extension>
//! ```
//!
//! `<major>`, `<minor>` and `<patch>` are maximal digit runs. `<base>` and
//! `<flavor>` are arbitrary non-empty sequences that never contain the
//! literal extension (`.apk` by convention, configurable). When a filename
//! contains more than one plausible `_v<digits>.<digits>.<digits>-` anchor,
//! the rightmost one wins: the scan walks `_v` occurrences right to left and
//! stops at the first that is followed by a full version triple, a `-`, and
//! a non-empty flavor.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A three-component semantic version extracted from an artifact filename
///
/// Components are stored as integers, so leading zeros in the source
/// filename (e.g. `_v01.2.3-`) are normalized away: the renamed file and
/// the published assignments always carry the canonical `1.2.3` rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl Version {
    /// Render as the dotted `major.minor.patch` string published to the sink
    pub fn dotted(&self) -> String {
        format!("{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Semantic fields extracted from a matching artifact filename
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedArtifact {
    /// Everything before the winning `_v` anchor
    pub base_name: String,

    /// The version triple following the anchor
    pub version: Version,

    /// Everything between the version's trailing `-` and the final
    /// extension, including any internal hyphens, underscores or dots
    pub flavor: String,
}

/// Outcome of a parse attempt
///
/// A non-match is an expected per-candidate result, not an error: the caller
/// logs a skip diagnostic and moves on to the next candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    /// The filename matched the grammar
    Parsed(ParsedArtifact),
    /// The filename does not match the grammar
    NoMatch {
        /// The original filename, for skip diagnostics
        filename: String,
    },
}

impl ParseOutcome {
    /// Returns true if the filename matched the grammar
    pub fn is_match(&self) -> bool {
        matches!(self, ParseOutcome::Parsed(_))
    }
}

/// Parse a candidate filename against the artifact grammar
///
/// `extension` is the literal suffix that marks an artifact, including the
/// leading dot; the same value the scanner filtered on. Total and
/// deterministic: every input produces a `ParseOutcome`, and the same input
/// always produces the same outcome.
pub fn parse_filename(filename: &str, extension: &str) -> ParseOutcome {
    match try_parse(filename, extension) {
        Some(parsed) => ParseOutcome::Parsed(parsed),
        None => ParseOutcome::NoMatch {
            filename: filename.to_string(),
        },
    }
}

fn try_parse(filename: &str, extension: &str) -> Option<ParsedArtifact> {
    let stem = filename.strip_suffix(extension)?;

    // Neither base nor flavor may contain the literal extension, so any
    // remaining occurrence disqualifies the whole filename.
    if stem.contains(extension) {
        return None;
    }

    // Rightmost-anchor scan: walk `_v` occurrences right to left and accept
    // the first one followed by `<digits>.<digits>.<digits>-<flavor>`.
    let mut search_end = stem.len();
    while let Some(pos) = stem[..search_end].rfind("_v") {
        if pos > 0 {
            if let Some((version, flavor)) = match_anchor(&stem[pos + 2..]) {
                if !flavor.is_empty() {
                    return Some(ParsedArtifact {
                        base_name: stem[..pos].to_string(),
                        version,
                        flavor: flavor.to_string(),
                    });
                }
            }
        }
        search_end = pos + 1;
    }

    None
}

/// Match `<digits>.<digits>.<digits>-` at the start of `s`, returning the
/// version and the remainder after the `-`
fn match_anchor(s: &str) -> Option<(Version, &str)> {
    let (major, s) = take_digits(s)?;
    let s = s.strip_prefix('.')?;
    let (minor, s) = take_digits(s)?;
    let s = s.strip_prefix('.')?;
    let (patch, s) = take_digits(s)?;
    let rest = s.strip_prefix('-')?;
    Some((
        Version {
            major,
            minor,
            patch,
        },
        rest,
    ))
}

/// Take the maximal leading ASCII digit run, returning its value and the rest
fn take_digits(s: &str) -> Option<(u64, &str)> {
    let end = s
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(s.len());
    if end == 0 {
        return None;
    }
    let value = s[..end].parse().ok()?;
    Some((value, &s[end..]))
}
