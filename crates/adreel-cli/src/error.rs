//! adreel — CLI error types.

use adreel_content::domain::error::ContentError;
use adreel_core::error::DomainError;
use thiserror::Error;

/// Startup and runtime errors for the terminal player.
#[derive(Debug, Error)]
pub enum AppError {
    /// An environment variable is invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The ad document could not be loaded.
    #[error("content error: {0}")]
    Content(#[from] ContentError),

    /// The player could not be built.
    #[error("playback error: {0}")]
    Playback(#[from] DomainError),

    /// Terminal I/O failed.
    #[error("terminal error: {0}")]
    Io(#[from] std::io::Error),

    /// A snapshot could not be encoded.
    #[error("encoding error: {0}")]
    Encode(#[from] serde_json::Error),
}
