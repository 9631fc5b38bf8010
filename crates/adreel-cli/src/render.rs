//! Terminal presentation of playback snapshots.

use std::fmt::Write as _;

use adreel_content::domain::advert::{Advert, Contact};
use adreel_playback::domain::snapshot::PlaybackSnapshot;
use adreel_playback::domain::state::{PlaybackPhase, StopReason};
use adreel_sequencer::domain::frame::Frame;
use serde::Serialize;

use crate::config::OutputMode;
use crate::error::AppError;

/// Shown whenever the host cannot speak the voiceover.
pub const NARRATION_UNAVAILABLE: &str =
    "Voiceover unavailable on this device. Visuals still playable.";

const BAR_WIDTH: usize = 30;

/// Formats seconds as `MM:SS`, truncating fractions.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_clock(seconds: f64) -> String {
    let whole = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{:02}:{:02}", whole / 60, whole % 60)
}

/// Draws a fixed-width bar filled to `percent`.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn progress_bar(percent: f64, width: usize) -> String {
    let ratio = if percent.is_finite() {
        percent.clamp(0.0, 100.0) / 100.0
    } else {
        0.0
    };
    let filled = ((width as f64) * ratio).round() as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled.min(width)))
}

/// One JSON output line: the snapshot plus the frame it points at.
#[derive(Debug, Serialize)]
struct SnapshotLine<'a> {
    #[serde(flatten)]
    snapshot: &'a PlaybackSnapshot,
    frame: Option<&'a Frame>,
}

/// Encodes a snapshot and its active frame as a single JSON line.
///
/// # Errors
///
/// Returns the encoder's error; snapshots contain no maps with non-string
/// keys, so this does not fail in practice.
pub fn render_json(
    advert: &Advert,
    snapshot: &PlaybackSnapshot,
) -> Result<String, serde_json::Error> {
    serde_json::to_string(&SnapshotLine {
        snapshot,
        frame: advert.sequence.get(snapshot.active_frame_index),
    })
}

/// Turns the stream of snapshots into terminal output.
///
/// Text mode draws a full frame card when the phase, frame, or voiceover
/// state changes and a single progress line when only the displayed second
/// changes; repeated snapshots produce nothing. JSON mode writes every snapshot.
#[derive(Debug)]
pub struct Renderer<'a> {
    mode: OutputMode,
    advert: &'a Advert,
    last_card: Option<(PlaybackPhase, usize, bool)>,
    last_second: Option<String>,
}

impl<'a> Renderer<'a> {
    /// Creates a renderer for `advert`.
    #[must_use]
    pub fn new(mode: OutputMode, advert: &'a Advert) -> Self {
        Self {
            mode,
            advert,
            last_card: None,
            last_second: None,
        }
    }

    /// Renders `snapshot`, or returns `None` if nothing visible changed.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Encode` if JSON encoding fails.
    pub fn render(&mut self, snapshot: &PlaybackSnapshot) -> Result<Option<String>, AppError> {
        if self.mode == OutputMode::Json {
            return Ok(Some(render_json(self.advert, snapshot)?));
        }

        let card_key = (
            snapshot.phase,
            snapshot.active_frame_index,
            snapshot.narration_in_flight,
        );
        let second = format_clock(snapshot.elapsed_seconds.min(snapshot.total_seconds));

        if self.last_card != Some(card_key) {
            self.last_card = Some(card_key);
            self.last_second = Some(second);
            return Ok(Some(self.card(snapshot)));
        }
        if self.last_second.as_deref() != Some(second.as_str()) {
            self.last_second = Some(second);
            return Ok(Some(status_line(self.advert, snapshot)));
        }
        Ok(None)
    }

    fn card(&self, snapshot: &PlaybackSnapshot) -> String {
        let advert = self.advert;
        let mut out = String::new();

        if let Some(presenter) = &advert.presenter {
            let _ = writeln!(out, "{presenter}");
        }
        let _ = writeln!(
            out,
            "{} · Duration • {}",
            advert.title,
            format_clock(snapshot.total_seconds)
        );
        let idle = snapshot.phase == PlaybackPhase::Idle;
        if let Some(tagline) = advert.tagline.as_ref().filter(|_| idle) {
            let _ = writeln!(out, "{tagline}");
        }
        let _ = writeln!(out, "{}", "=".repeat(BAR_WIDTH + 2));

        if let Some(frame) = advert.sequence.get(snapshot.active_frame_index) {
            if let Some(badge) = &frame.badge {
                let _ = writeln!(out, "[{badge}]");
            }
            let _ = writeln!(out, "{}", frame.headline);
            let _ = writeln!(out, "{}", frame.subheadline);
            if let Some(footer) = &frame.footer {
                let _ = writeln!(out, "{footer}");
            }
        }
        if !advert.highlights.is_empty() {
            let _ = writeln!(out, "* {}", advert.highlights.join("  * "));
        }
        let contact = advert
            .contact
            .as_ref()
            .filter(|_| !snapshot.is_playing())
            .and_then(contact_line);
        if let Some(contact) = contact {
            let _ = writeln!(out, "{contact}");
        }

        out.push_str(&status_line(advert, snapshot));
        if !snapshot.narration_available {
            let _ = write!(out, "\n{NARRATION_UNAVAILABLE}");
        }
        out
    }
}

/// Progress bar, elapsed clock, frame counter, and phase on one line.
#[must_use]
pub fn status_line(advert: &Advert, snapshot: &PlaybackSnapshot) -> String {
    format!(
        "{} {} / {}  frame {}/{}  {}",
        progress_bar(snapshot.progress_percent, BAR_WIDTH),
        format_clock(snapshot.elapsed_seconds.min(snapshot.total_seconds)),
        format_clock(snapshot.total_seconds),
        snapshot.active_frame_index + 1,
        advert.sequence.len(),
        phase_label(snapshot)
    )
}

/// Joins the advertiser's contact details into one line, or `None` if there
/// are none.
#[must_use]
pub fn contact_line(contact: &Contact) -> Option<String> {
    let parts: Vec<String> = [
        contact.name.clone(),
        contact.phone.as_ref().map(|phone| format!("Call: {phone}")),
        contact.email.as_ref().map(|email| format!("Email: {email}")),
        contact.web.as_ref().map(|web| format!("Web: {web}")),
    ]
    .into_iter()
    .flatten()
    .collect();
    (!parts.is_empty()).then(|| parts.join(" · "))
}

fn phase_label(snapshot: &PlaybackSnapshot) -> &'static str {
    match (snapshot.phase, snapshot.stop_reason) {
        (PlaybackPhase::Idle, _) => "ready",
        (PlaybackPhase::Playing, _) if snapshot.narration_in_flight => "playing with voiceover",
        (PlaybackPhase::Playing, _) => "playing",
        (PlaybackPhase::Stopped, _) if snapshot.narration_in_flight => {
            "finished, voiceover still speaking"
        }
        (PlaybackPhase::Stopped, Some(StopReason::NarrationFinished)) => "voiceover finished",
        (PlaybackPhase::Stopped, Some(StopReason::Requested)) => "stopped",
        (PlaybackPhase::Stopped, _) => "finished",
    }
}
