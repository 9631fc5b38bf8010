//! Ranked voice preferences and best-match selection.

use adreel_core::speech::Voice;
use serde::{Deserialize, Serialize};

/// A predicate over the voices the engine offers. Matching is case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", content = "pattern", rename_all = "snake_case")]
pub enum VoicePreference {
    /// The voice name contains the pattern.
    NameContains(String),
    /// The voice language contains the pattern.
    LanguageContains(String),
    /// The voice language starts with the pattern.
    LanguagePrefix(String),
    /// Any voice at all.
    Any,
}

impl VoicePreference {
    /// Returns whether `voice` satisfies this preference.
    #[must_use]
    pub fn matches(&self, voice: &Voice) -> bool {
        match self {
            Self::NameContains(pattern) => contains_ignore_case(&voice.name, pattern),
            Self::LanguageContains(pattern) => contains_ignore_case(&voice.language, pattern),
            Self::LanguagePrefix(pattern) => voice
                .language
                .to_lowercase()
                .starts_with(&pattern.to_lowercase()),
            Self::Any => true,
        }
    }

    /// The Indian-English-first chain used by the reference ad:
    /// name contains `en-in`, then language contains `en-in`, then any English.
    #[must_use]
    pub fn default_chain() -> Vec<Self> {
        vec![
            Self::NameContains("en-in".into()),
            Self::LanguageContains("en-in".into()),
            Self::LanguagePrefix("en".into()),
        ]
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Picks the first voice matching the highest-priority preference.
///
/// Returns `None` when nothing matches; the caller then leaves the choice to
/// the engine's default voice.
#[must_use]
pub fn select_voice<'a>(voices: &'a [Voice], preferences: &[VoicePreference]) -> Option<&'a Voice> {
    preferences
        .iter()
        .find_map(|preference| voices.iter().find(|voice| preference.matches(voice)))
}
