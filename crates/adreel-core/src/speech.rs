//! Text-to-speech abstraction.
//!
//! The host speech facility is an exclusive resource: an engine speaks at most
//! one utterance at a time, and starting a new one supersedes the previous.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// A voice offered by the speech facility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voice {
    /// Engine-specific identifier passed back to the engine to select the voice.
    pub id: String,
    /// Human-readable voice name.
    pub name: String,
    /// BCP 47-ish language tag as reported by the engine (`en-in`, `en-gb`).
    pub language: String,
}

impl Voice {
    /// Creates a voice whose identifier is its name.
    #[must_use]
    pub fn new(name: impl Into<String>, language: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: name.clone(),
            name,
            language: language.into(),
        }
    }
}

/// A single speech request with its delivery parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    /// The text to speak.
    pub text: String,
    /// The voice to use; `None` leaves the choice to the engine's default.
    pub voice: Option<Voice>,
    /// Speaking rate relative to normal (1.0).
    pub rate: f32,
    /// Pitch relative to normal (1.0).
    pub pitch: f32,
    /// Volume in `[0.0, 1.0]`.
    pub volume: f32,
}

/// How an utterance ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeechOutcome {
    /// The utterance was spoken to the end.
    Completed,
    /// The utterance was cancelled or superseded before it finished.
    Cancelled,
}

/// Trait over a platform text-to-speech facility.
#[async_trait]
pub trait SpeechEngine: Send + Sync {
    /// Lists the voices the engine can speak with.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the facility cannot be queried.
    async fn voices(&self) -> Result<Vec<Voice>, DomainError>;

    /// Speaks an utterance, resolving once it has ended.
    ///
    /// Any utterance already in flight is superseded and resolves as
    /// [`SpeechOutcome::Cancelled`].
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if speech could not be started.
    async fn speak(&self, utterance: Utterance) -> Result<SpeechOutcome, DomainError>;

    /// Cancels the utterance in flight, if any. Idempotent.
    fn cancel(&self);
}
