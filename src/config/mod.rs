//! Lane configuration
//!
//! Optional TOML file (`.ci/apk-lane.toml`) with serde defaults; CLI flags
//! override file values. The defaults preserve the historical pipeline
//! contract: scan `app/build/outputs/apk` for `.apk` files and publish under
//! the `NovelDokusha` canonical base name.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Default output root, relative to the working directory
pub const DEFAULT_ROOT: &str = "app/build/outputs/apk";

/// Default artifact extension
pub const DEFAULT_EXTENSION: &str = ".apk";

/// Default canonical base name for published artifacts
pub const DEFAULT_CANONICAL_BASE: &str = "NovelDokusha";

/// Default config file location
pub const DEFAULT_CONFIG_PATH: &str = ".ci/apk-lane.toml";

/// Lane configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaneConfig {
    /// Output root to scan for artifacts
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Artifact extension, including the leading dot
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Base name used for canonical published filenames
    #[serde(default = "default_canonical_base")]
    pub canonical_base: String,

    /// Environment file to append assignments to. When unset, the sink is
    /// resolved from the GITHUB_ENV environment variable at run time.
    #[serde(default)]
    pub env_file: Option<PathBuf>,
}

fn default_root() -> PathBuf {
    PathBuf::from(DEFAULT_ROOT)
}

fn default_extension() -> String {
    DEFAULT_EXTENSION.to_string()
}

fn default_canonical_base() -> String {
    DEFAULT_CANONICAL_BASE.to_string()
}

impl Default for LaneConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            extension: default_extension(),
            canonical_base: default_canonical_base(),
            env_file: None,
        }
    }
}

/// Errors that can occur when loading or validating the lane config
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to read config file: {0}")]
    Io(#[from] io::Error),

    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

impl LaneConfig {
    /// Load configuration from a specific path
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: LaneConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from an explicit path (must exist) or fall back to the default
    /// location, using built-in defaults if no file is present there
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_PATH);
                if default_path.exists() {
                    Self::from_file(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.extension.starts_with('.') || self.extension.len() < 2 {
            return Err(ConfigError::InvalidValue {
                field: "extension".to_string(),
                reason: "must be a non-empty suffix starting with '.'".to_string(),
            });
        }
        if self.canonical_base.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "canonical_base".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
