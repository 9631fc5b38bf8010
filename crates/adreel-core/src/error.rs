//! Domain error types.

use thiserror::Error;

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A validation error in domain logic.
    #[error("validation error: {0}")]
    Validation(String),

    /// A failure in a platform facility (speech process, I/O).
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}
