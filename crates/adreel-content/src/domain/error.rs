//! Content error types.

use std::path::PathBuf;

use adreel_core::error::DomainError;
use thiserror::Error;

/// Errors raised while loading an ad document.
#[derive(Debug, Error)]
pub enum ContentError {
    /// The document could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// The path that failed.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The document is not valid YAML for an ad.
    #[error("malformed ad document: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// The document parsed but violates an ad invariant.
    #[error("invalid ad: {0}")]
    Invalid(#[from] DomainError),
}
