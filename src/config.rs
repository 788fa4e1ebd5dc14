//! Configuration System
//!
//! Layered configuration for record and replay: built-in defaults, the user's
//! global config file, an explicit `--config` file, then `LAYOUT_MIRROR__*`
//! environment variables (highest precedence).

use crate::logging::LoggingConfig;
use crate::tree::path::invalid_component_reason;
use crate::tree::WalkerConfig;
use serde::{Deserialize, Serialize};

mod facade;
mod merge_policy;
mod sources;

pub use facade::ConfigLoader;

/// Default name of the replay staging directory, relative to the target root
pub const DEFAULT_STAGING_DIR: &str = ".layout-mirror-staging";

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MirrorConfig {
    /// Directory scan settings
    #[serde(default)]
    pub scan: ScanConfig,

    /// Replay settings
    #[serde(default)]
    pub replay: ReplayConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Directory scan settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanConfig {
    /// File or directory names skipped during scans (exact match)
    #[serde(default)]
    pub ignore_patterns: Vec<String>,
}

impl ScanConfig {
    /// Walker configuration for this scan
    pub fn walker_config(&self) -> WalkerConfig {
        WalkerConfig {
            ignore_patterns: self.ignore_patterns.clone(),
            exclude_paths: Vec::new(),
        }
    }
}

/// Replay settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayConfig {
    /// Directory under the target root used to park files while breaking
    /// rename cycles
    #[serde(default = "default_staging_dir")]
    pub staging_dir: String,

    /// Remove directories left empty by moves
    #[serde(default)]
    pub prune_empty_dirs: bool,
}

fn default_staging_dir() -> String {
    DEFAULT_STAGING_DIR.to_string()
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            staging_dir: default_staging_dir(),
            prune_empty_dirs: false,
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Scan(String),
    Replay(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Scan(msg) => write!(f, "scan: {}", msg),
            ValidationError::Replay(msg) => write!(f, "replay: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl MirrorConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        for pattern in &self.scan.ignore_patterns {
            if pattern.is_empty() {
                errors.push(ValidationError::Scan(
                    "ignore pattern cannot be empty".to_string(),
                ));
            }
        }

        if let Some(reason) = invalid_component_reason(&self.replay.staging_dir) {
            errors.push(ValidationError::Replay(format!(
                "staging_dir '{}' must be a single directory name ({})",
                self.replay.staging_dir, reason
            )));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
