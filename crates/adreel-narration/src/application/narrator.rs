//! The voiceover service.
//!
//! Serializes access to the speech engine with a cancel-before-speak
//! discipline: every narration first cancels whatever is in flight.

use std::fmt;
use std::sync::Arc;

use adreel_core::error::DomainError;
use adreel_core::speech::{SpeechEngine, SpeechOutcome};
use tracing::{info, instrument, warn};

use crate::domain::request::NarrationRequest;
use crate::domain::voice::select_voice;

/// Issues voiceover requests against a speech engine.
#[derive(Clone)]
pub struct VoiceNarrator {
    engine: Arc<dyn SpeechEngine>,
}

impl VoiceNarrator {
    /// Creates a narrator over `engine`.
    #[must_use]
    pub fn new(engine: Arc<dyn SpeechEngine>) -> Self {
        Self { engine }
    }

    /// Speaks the request's script, resolving once when speech ends.
    ///
    /// Cancels any utterance in flight, then selects the best voice from the
    /// request's preferences. If no voice matches, or the voice list cannot be
    /// read, the engine's default voice is used.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the engine could not start
    /// speaking.
    #[instrument(skip_all, fields(script_chars = request.script().len()))]
    pub async fn narrate(&self, request: &NarrationRequest) -> Result<SpeechOutcome, DomainError> {
        self.engine.cancel();

        let voices = match self.engine.voices().await {
            Ok(voices) => voices,
            Err(error) => {
                warn!(%error, "could not enumerate voices; using the default voice");
                Vec::new()
            }
        };

        let voice = select_voice(&voices, request.preferences()).cloned();
        match &voice {
            Some(voice) => info!(
                voice = %voice.name,
                language = %voice.language,
                "narration voice selected"
            ),
            None => info!(
                available = voices.len(),
                "no preferred voice; using the default voice"
            ),
        }

        let utterance = request.delivery().utterance(request.script(), voice);
        let outcome = self.engine.speak(utterance).await?;
        info!(?outcome, "narration ended");
        Ok(outcome)
    }

    /// Cancels the utterance in flight, if any. Idempotent.
    pub fn cancel(&self) {
        self.engine.cancel();
    }
}

impl fmt::Debug for VoiceNarrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VoiceNarrator").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use adreel_core::error::DomainError;
    use adreel_core::speech::{SpeechOutcome, Voice};
    use adreel_test_support::{FailingSpeechEngine, ScriptedSpeechEngine};

    use super::VoiceNarrator;
    use crate::domain::delivery::Delivery;
    use crate::domain::request::NarrationRequest;
    use crate::domain::voice::VoicePreference;

    fn request() -> NarrationRequest {
        NarrationRequest::new(
            "Experience Dubai like never before.",
            VoicePreference::default_chain(),
            Delivery::default(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_narrate_speaks_with_preferred_voice_and_completes() {
        // Arrange
        let engine = Arc::new(ScriptedSpeechEngine::new(vec![
            Voice::new("Samantha", "en-US"),
            Voice::new("Veena", "en-IN"),
        ]));
        let narrator = VoiceNarrator::new(engine.clone());
        let request = request();

        // Act
        let task = tokio::spawn(async move { narrator.narrate(&request).await });
        while engine.spoken().is_empty() {
            tokio::task::yield_now().await;
        }
        assert!(engine.finish_current());
        let outcome = task.await.unwrap();

        // Assert
        assert_eq!(outcome.unwrap(), SpeechOutcome::Completed);
        let spoken = engine.spoken();
        assert_eq!(spoken.len(), 1);
        assert_eq!(spoken[0].voice.as_ref().unwrap().name, "Veena");
        assert_eq!(spoken[0].text, "Experience Dubai like never before.");
        assert!((spoken[0].rate - 0.9).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn test_narrate_cancels_before_speaking() {
        // Arrange
        let engine = Arc::new(ScriptedSpeechEngine::new(Vec::new()));
        let narrator = VoiceNarrator::new(engine.clone());
        let request = request();

        // Act
        let task = tokio::spawn(async move { narrator.narrate(&request).await });
        while engine.spoken().is_empty() {
            tokio::task::yield_now().await;
        }

        // Assert
        assert_eq!(engine.cancel_calls(), 1);
        assert!(engine.spoken()[0].voice.is_none());
        engine.finish_current();
        task.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_second_narration_supersedes_first() {
        // Arrange
        let engine = Arc::new(ScriptedSpeechEngine::new(Vec::new()));
        let first = VoiceNarrator::new(engine.clone());
        let second = first.clone();
        let request_a = request();
        let request_b = request();

        // Act
        let first_task = tokio::spawn(async move { first.narrate(&request_a).await });
        while engine.spoken().is_empty() {
            tokio::task::yield_now().await;
        }
        let second_task = tokio::spawn(async move { second.narrate(&request_b).await });
        let first_outcome = first_task.await.unwrap().unwrap();
        while engine.spoken().len() < 2 {
            tokio::task::yield_now().await;
        }
        engine.finish_current();
        let second_outcome = second_task.await.unwrap().unwrap();

        // Assert
        assert_eq!(first_outcome, SpeechOutcome::Cancelled);
        assert_eq!(second_outcome, SpeechOutcome::Completed);
        assert_eq!(engine.max_in_flight(), 1);
    }

    #[tokio::test]
    async fn test_narrate_propagates_speak_failure() {
        // Arrange
        let narrator = VoiceNarrator::new(Arc::new(FailingSpeechEngine));

        // Act
        let result = narrator.narrate(&request()).await;

        // Assert
        match result {
            Err(DomainError::Infrastructure(message)) => assert!(message.contains("unreachable")),
            other => panic!("expected Infrastructure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_cancel_is_idempotent() {
        // Arrange
        let engine = Arc::new(ScriptedSpeechEngine::new(Vec::new()));
        let narrator = VoiceNarrator::new(engine.clone());

        // Act
        narrator.cancel();
        narrator.cancel();

        // Assert
        assert_eq!(engine.cancel_calls(), 2);
        assert!(!engine.finish_current());
    }
}
