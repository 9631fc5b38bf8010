//! Read model published to the presentation layer.

use serde::Serialize;
use uuid::Uuid;

use super::state::{PlaybackPhase, StopReason};

/// Everything the presentation surface needs to render one moment of playback.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaybackSnapshot {
    /// Lifecycle phase.
    pub phase: PlaybackPhase,
    /// Current session, while one is playing.
    pub session_id: Option<Uuid>,
    /// Elapsed seconds, clamped to `[0, total_seconds]`.
    pub elapsed_seconds: f64,
    /// Total duration of the frame sequence.
    pub total_seconds: f64,
    /// Index of the frame to display.
    pub active_frame_index: usize,
    /// Progress through the sequence, in `[0, 100]`.
    pub progress_percent: f64,
    /// Whether the host can speak the voiceover at all.
    pub narration_available: bool,
    /// Whether the voiceover of the current session is still speaking.
    pub narration_in_flight: bool,
    /// Why the last session stopped, once it has.
    pub stop_reason: Option<StopReason>,
}

impl PlaybackSnapshot {
    /// Whether the tick is active.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.phase == PlaybackPhase::Playing
    }
}
