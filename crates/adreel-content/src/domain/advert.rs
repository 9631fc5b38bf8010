//! A loaded, validated ad.

use adreel_narration::domain::delivery::Delivery;
use adreel_narration::domain::request::NarrationRequest;
use adreel_narration::domain::voice::VoicePreference;
use adreel_sequencer::domain::frame::Frame;
use adreel_sequencer::domain::sequence::FrameSequence;
use serde::Deserialize;

use super::error::ContentError;

/// An ad ready to play: its frames and its voiceover.
#[derive(Debug, Clone, PartialEq)]
pub struct Advert {
    /// Title shown above the frames.
    pub title: String,
    /// Optional line shown above the title.
    pub presenter: Option<String>,
    /// Optional blurb shown under the title.
    pub tagline: Option<String>,
    /// Short selling points shown under every frame.
    pub highlights: Vec<String>,
    /// How to reach the advertiser.
    pub contact: Option<Contact>,
    /// The validated frame timeline.
    pub sequence: FrameSequence,
    /// The voiceover issued once per playback session.
    pub narration: NarrationRequest,
}

/// Advertiser contact details. Every line is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Contact {
    /// Business name.
    #[serde(default)]
    pub name: Option<String>,
    /// Phone number, as displayed.
    #[serde(default)]
    pub phone: Option<String>,
    /// Email address.
    #[serde(default)]
    pub email: Option<String>,
    /// Website.
    #[serde(default)]
    pub web: Option<String>,
}

/// On-disk shape of an ad document.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct AdvertDocument {
    title: String,
    #[serde(default)]
    presenter: Option<String>,
    #[serde(default)]
    tagline: Option<String>,
    #[serde(default)]
    highlights: Vec<String>,
    #[serde(default)]
    contact: Option<Contact>,
    frames: Vec<Frame>,
    narration: NarrationDocument,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct NarrationDocument {
    script: String,
    #[serde(default = "VoicePreference::default_chain")]
    voice_preferences: Vec<VoicePreference>,
    #[serde(default)]
    delivery: Delivery,
}

impl Advert {
    /// Parses and validates an ad document.
    ///
    /// Missing `voice_preferences` fall back to the Indian-English chain and
    /// a missing `delivery` to the default delivery.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::Parse` for malformed YAML and
    /// `ContentError::Invalid` for an empty timeline, a non-positive frame
    /// duration, a blank script, or out-of-range delivery.
    pub fn from_yaml(source: &str) -> Result<Self, ContentError> {
        let document: AdvertDocument = serde_yaml::from_str(source)?;
        let sequence = FrameSequence::new(document.frames)?;
        let narration = NarrationRequest::new(
            &document.narration.script,
            document.narration.voice_preferences,
            document.narration.delivery,
        )?;
        Ok(Self {
            title: document.title,
            presenter: document.presenter,
            tagline: document.tagline,
            highlights: document.highlights,
            contact: document.contact,
            sequence,
            narration,
        })
    }
}
