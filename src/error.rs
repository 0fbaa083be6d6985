//! Error types for the follow-graph analyzer

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by loading, validation and export.
///
/// Resource limits (follower cap, node cap, edge cap) are never reported
/// through this type: truncation is the expected behaviour.
#[derive(Debug, Error)]
pub enum GraphError {
    /// Reading or writing a file failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input document does not match the follow-graph schema.
    #[error("malformed input: {reason}")]
    MalformedInput { reason: String },

    /// A configuration value was rejected before any computation started.
    #[error("invalid configuration for `{field}`: {reason}")]
    InvalidConfig {
        field: &'static str,
        reason: String,
    },

    /// Encoding an output payload failed.
    #[error("failed to serialize output: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl GraphError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedInput {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, GraphError>;
