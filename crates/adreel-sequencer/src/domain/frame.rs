//! A single timed frame of the ad.

use serde::{Deserialize, Serialize};

/// One timed slide of display content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Seconds this frame remains active. Must be positive and finite.
    pub duration: f64,
    /// Primary display text.
    pub headline: String,
    /// Secondary display text.
    pub subheadline: String,
    /// Optional short label shown above the headline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    /// Optional short label shown below the subheadline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
}

impl Frame {
    /// Creates a frame without badge or footer.
    #[must_use]
    pub fn new(duration: f64, headline: impl Into<String>, subheadline: impl Into<String>) -> Self {
        Self {
            duration,
            headline: headline.into(),
            subheadline: subheadline.into(),
            badge: None,
            footer: None,
        }
    }

    /// Sets the badge label.
    #[must_use]
    pub fn with_badge(mut self, badge: impl Into<String>) -> Self {
        self.badge = Some(badge.into());
        self
    }

    /// Sets the footer label.
    #[must_use]
    pub fn with_footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(footer.into());
        self
    }
}
