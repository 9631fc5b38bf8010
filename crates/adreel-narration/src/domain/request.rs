//! The voiceover request issued once per playback session.

use adreel_core::error::DomainError;

use super::delivery::Delivery;
use super::voice::VoicePreference;

/// Script, ranked voice preferences, and delivery for one voiceover.
#[derive(Debug, Clone, PartialEq)]
pub struct NarrationRequest {
    script: String,
    preferences: Vec<VoicePreference>,
    delivery: Delivery,
}

impl NarrationRequest {
    /// Builds a request, collapsing the script's line breaks and runs of
    /// whitespace into single spaces.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the script is blank or the
    /// delivery parameters are out of range.
    pub fn new(
        script: &str,
        preferences: Vec<VoicePreference>,
        delivery: Delivery,
    ) -> Result<Self, DomainError> {
        let script = script.split_whitespace().collect::<Vec<_>>().join(" ");
        if script.is_empty() {
            return Err(DomainError::Validation("narration script is empty".into()));
        }
        delivery.validate()?;
        Ok(Self {
            script,
            preferences,
            delivery,
        })
    }

    /// The normalized script text.
    #[must_use]
    pub fn script(&self) -> &str {
        &self.script
    }

    /// Voice preferences, highest priority first.
    #[must_use]
    pub fn preferences(&self) -> &[VoicePreference] {
        &self.preferences
    }

    /// Delivery parameters.
    #[must_use]
    pub fn delivery(&self) -> Delivery {
        self.delivery
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_normalizes_whitespace() {
        // Act
        let request = NarrationRequest::new(
            "\n  Experience Dubai\nlike never before.\n\n",
            VoicePreference::default_chain(),
            Delivery::default(),
        )
        .unwrap();

        // Assert
        assert_eq!(request.script(), "Experience Dubai like never before.");
        assert_eq!(request.preferences().len(), 3);
    }

    #[test]
    fn test_new_rejects_blank_script() {
        let result = NarrationRequest::new(" \n\t ", Vec::new(), Delivery::default());

        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_new_rejects_invalid_delivery() {
        let delivery = Delivery {
            volume: 3.0,
            ..Delivery::default()
        };

        let result = NarrationRequest::new("Hello", Vec::new(), delivery);

        assert!(matches!(result, Err(DomainError::Validation(_))));
    }
}
