//! Fixed delivery parameters for the voiceover.

use adreel_core::error::DomainError;
use adreel_core::speech::{Utterance, Voice};
use serde::{Deserialize, Serialize};

/// How the script is spoken.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Delivery {
    /// Speaking rate relative to normal.
    pub rate: f32,
    /// Pitch relative to normal.
    pub pitch: f32,
    /// Volume in `[0.0, 1.0]`.
    pub volume: f32,
}

impl Default for Delivery {
    /// Slightly slow, slightly raised, full volume.
    fn default() -> Self {
        Self {
            rate: 0.9,
            pitch: 1.05,
            volume: 1.0,
        }
    }
}

impl Delivery {
    /// Checks that every parameter is within the range speech engines accept.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` naming the first out-of-range parameter.
    pub fn validate(&self) -> Result<(), DomainError> {
        if !(0.1..=10.0).contains(&self.rate) {
            return Err(DomainError::Validation(format!(
                "delivery rate {} must be within 0.1..=10",
                self.rate
            )));
        }
        if !(0.0..=2.0).contains(&self.pitch) {
            return Err(DomainError::Validation(format!(
                "delivery pitch {} must be within 0..=2",
                self.pitch
            )));
        }
        if !(0.0..=1.0).contains(&self.volume) {
            return Err(DomainError::Validation(format!(
                "delivery volume {} must be within 0..=1",
                self.volume
            )));
        }
        Ok(())
    }

    /// Builds an utterance for `text` with these parameters.
    #[must_use]
    pub fn utterance(&self, text: impl Into<String>, voice: Option<Voice>) -> Utterance {
        Utterance {
            text: text.into(),
            voice,
            rate: self.rate,
            pitch: self.pitch,
            volume: self.volume,
        }
    }
}
