//! Error types for layout mirroring.

use crate::types::{Fingerprint, RelativePath};
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while fingerprinting a directory tree
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Hash collision between '{original}' and '{new}' (fingerprint {fingerprint})")]
    DuplicateFingerprint {
        fingerprint: Fingerprint,
        original: RelativePath,
        new: RelativePath,
    },

    #[error("Path is not valid UTF-8: {0}")]
    NonUtf8Path(PathBuf),
}

impl ScanError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ScanError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors raised by record and replay
#[derive(Debug, Error)]
pub enum MirrorError {
    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error("Malformed layout file {path}: {message}")]
    Format { path: PathBuf, message: String },

    #[error("Move conflict moving '{from}' to '{to}': {reason}")]
    MoveConflict {
        from: RelativePath,
        to: RelativePath,
        reason: String,
    },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl MirrorError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        MirrorError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn format(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        MirrorError::Format {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl From<config::ConfigError> for MirrorError {
    fn from(err: config::ConfigError) -> Self {
        MirrorError::Config(err.to_string())
    }
}
