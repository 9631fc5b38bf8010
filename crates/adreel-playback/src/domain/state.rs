//! Playback state machine.
//!
//! `Idle --begin--> Playing --finish--> Stopped`, with `clear` returning to
//! `Idle` from anywhere. A new `begin` re-enters `Playing` from either rest
//! state. Time is injected as monotonic `Instant`s so the machine is fully
//! deterministic.

use std::time::Instant;

use adreel_core::platform::Capabilities;
use adreel_sequencer::domain::sequence::FrameSequence;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::snapshot::PlaybackSnapshot;

/// Lifecycle phase of the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackPhase {
    /// Nothing has played since the last reset.
    Idle,
    /// The tick is running.
    Playing,
    /// The last session ran to its end or was stopped.
    Stopped,
}

/// Why a session left `Playing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Elapsed time reached the total duration.
    TimelineElapsed,
    /// The voiceover finished speaking.
    NarrationFinished,
    /// The user stopped playback.
    Requested,
}

/// Result of applying one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// No session is playing; the tick should end.
    NotPlaying,
    /// Time moved forward within the sequence.
    Advanced {
        /// Whether the active frame changed on this tick.
        frame_changed: bool,
    },
    /// Elapsed time reached the total duration.
    Completed,
}

/// The session currently playing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveSession {
    /// Session identifier.
    pub id: Uuid,
    /// Monotonic start marker.
    pub started_at: Instant,
}

/// Mutable playback state for one session.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    phase: PlaybackPhase,
    elapsed_seconds: f64,
    active_frame_index: usize,
    progress_percent: f64,
    session: Option<ActiveSession>,
    /// Session whose voiceover is still speaking. Outlives `session` when
    /// the timeline ends first.
    narrating: Option<Uuid>,
    stop_reason: Option<StopReason>,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            phase: PlaybackPhase::Idle,
            elapsed_seconds: 0.0,
            active_frame_index: 0,
            progress_percent: 0.0,
            session: None,
            narrating: None,
            stop_reason: None,
        }
    }
}

impl PlaybackState {
    /// Creates an idle state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> PlaybackPhase {
        self.phase
    }

    /// Whether the tick is active.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.phase == PlaybackPhase::Playing
    }

    /// Elapsed seconds, clamped to the sequence total.
    #[must_use]
    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed_seconds
    }

    /// Index of the active frame.
    #[must_use]
    pub fn active_frame_index(&self) -> usize {
        self.active_frame_index
    }

    /// Progress through the sequence, in `[0, 100]`.
    #[must_use]
    pub fn progress_percent(&self) -> f64 {
        self.progress_percent
    }

    /// The playing session's identifier.
    #[must_use]
    pub fn session_id(&self) -> Option<Uuid> {
        self.session.map(|session| session.id)
    }

    /// Whether the session's voiceover is still speaking.
    #[must_use]
    pub fn narration_in_flight(&self) -> bool {
        self.narrating.is_some()
    }

    /// Why the last session stopped.
    #[must_use]
    pub fn stop_reason(&self) -> Option<StopReason> {
        self.stop_reason
    }

    /// Starts a fresh session at `started_at`, discarding any previous state.
    pub fn begin(&mut self, session_id: Uuid, started_at: Instant) {
        *self = Self {
            phase: PlaybackPhase::Playing,
            session: Some(ActiveSession {
                id: session_id,
                started_at,
            }),
            ..Self::default()
        };
    }

    /// Marks the playing session's voiceover as speaking.
    pub fn narration_started(&mut self) {
        self.narrating = self.session_id();
    }

    /// Clears the in-flight voiceover if it belongs to `session_id`.
    ///
    /// Returns `false` for any other session, including ones replaced by a
    /// later `begin` or silenced by a cancelling stop.
    pub fn narration_ended(&mut self, session_id: Uuid) -> bool {
        if self.narrating == Some(session_id) {
            self.narrating = None;
            true
        } else {
            false
        }
    }

    /// Recomputes elapsed time, active frame, and progress from `now`.
    ///
    /// Elapsed is derived from the start marker on every call rather than
    /// accumulated, and never decreases within a session.
    pub fn advance(&mut self, sequence: &FrameSequence, now: Instant) -> TickOutcome {
        let Some(session) = self.session.filter(|_| self.is_playing()) else {
            return TickOutcome::NotPlaying;
        };

        let since_start = now.saturating_duration_since(session.started_at).as_secs_f64();
        let elapsed = since_start
            .min(sequence.total_duration())
            .max(self.elapsed_seconds);
        let position = sequence.position_at(elapsed);
        let frame_changed = position.index != self.active_frame_index;

        self.elapsed_seconds = elapsed;
        self.active_frame_index = position.index;
        self.progress_percent = position.progress_percent;

        if elapsed >= sequence.total_duration() {
            TickOutcome::Completed
        } else {
            TickOutcome::Advanced { frame_changed }
        }
    }

    /// Ends the playing session with end-of-sequence values.
    ///
    /// The voiceover stays in flight unless `speech_cancelled` is set; it
    /// is cleared later by [`Self::narration_ended`]. Returns `false`,
    /// changing nothing, if no session is playing.
    pub fn finish(
        &mut self,
        sequence: &FrameSequence,
        reason: StopReason,
        speech_cancelled: bool,
    ) -> bool {
        if !self.is_playing() {
            return false;
        }
        self.phase = PlaybackPhase::Stopped;
        self.elapsed_seconds = sequence.total_duration();
        self.active_frame_index = sequence.last_index();
        self.progress_percent = 100.0;
        self.session = None;
        if speech_cancelled {
            self.narrating = None;
        }
        self.stop_reason = Some(reason);
        true
    }

    /// Returns to `Idle` with every field at its rest value.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Builds the read model for the presentation layer.
    #[must_use]
    pub fn snapshot(
        &self,
        sequence: &FrameSequence,
        capabilities: Capabilities,
    ) -> PlaybackSnapshot {
        PlaybackSnapshot {
            phase: self.phase,
            session_id: self.session_id(),
            elapsed_seconds: self.elapsed_seconds,
            total_seconds: sequence.total_duration(),
            active_frame_index: self.active_frame_index,
            progress_percent: self.progress_percent,
            narration_available: capabilities.narration,
            narration_in_flight: self.narration_in_flight(),
            stop_reason: self.stop_reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use adreel_core::clock::Clock;
    use adreel_sequencer::domain::frame::Frame;
    use adreel_test_support::ManualClock;

    use super::*;

    fn sequence() -> FrameSequence {
        FrameSequence::new(
            (0..6)
                .map(|n| Frame::new(10.0, format!("Headline {n}"), "Sub"))
                .collect(),
        )
        .unwrap()
    }

    fn playing(clock: &ManualClock) -> PlaybackState {
        let mut state = PlaybackState::new();
        state.begin(Uuid::new_v4(), clock.now());
        state
    }

    #[test]
    fn test_new_state_is_idle_at_rest() {
        // Act
        let state = PlaybackState::new();

        // Assert
        assert_eq!(state.phase(), PlaybackPhase::Idle);
        assert!(!state.is_playing());
        assert_eq!(state.active_frame_index(), 0);
        assert!(state.elapsed_seconds().abs() < f64::EPSILON);
        assert!(state.session_id().is_none());
        assert!(state.stop_reason().is_none());
    }

    #[test]
    fn test_advance_follows_the_reference_timeline() {
        // Arrange
        let sequence = sequence();
        let clock = ManualClock::new();
        let mut state = playing(&clock);

        // Act / Assert
        assert_eq!(
            state.advance(&sequence, clock.now()),
            TickOutcome::Advanced {
                frame_changed: false
            }
        );
        assert_eq!(state.active_frame_index(), 0);

        clock.advance_secs(10.0);
        assert_eq!(
            state.advance(&sequence, clock.now()),
            TickOutcome::Advanced {
                frame_changed: true
            }
        );
        assert_eq!(state.active_frame_index(), 1);

        clock.advance_secs(25.0);
        state.advance(&sequence, clock.now());
        assert_eq!(state.active_frame_index(), 3);
        assert!((state.progress_percent() - 58.333_333).abs() < 1e-4);

        clock.advance_secs(25.0);
        assert_eq!(state.advance(&sequence, clock.now()), TickOutcome::Completed);
        assert_eq!(state.active_frame_index(), 5);
        assert!((state.progress_percent() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_advance_clamps_elapsed_to_total() {
        // Arrange
        let sequence = sequence();
        let clock = ManualClock::new();
        let mut state = playing(&clock);

        // Act
        clock.advance(Duration::from_secs(95));
        let outcome = state.advance(&sequence, clock.now());

        // Assert
        assert_eq!(outcome, TickOutcome::Completed);
        assert!((state.elapsed_seconds() - 60.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_advance_never_moves_elapsed_backwards() {
        // Arrange
        let sequence = sequence();
        let clock = ManualClock::new();
        let start = clock.now();
        let mut state = playing(&clock);
        clock.advance_secs(12.0);
        state.advance(&sequence, clock.now());

        // Act
        state.advance(&sequence, start);

        // Assert
        assert!((state.elapsed_seconds() - 12.0).abs() < 1e-9);
        assert_eq!(state.active_frame_index(), 1);
    }

    #[test]
    fn test_advance_when_not_playing_changes_nothing() {
        // Arrange
        let sequence = sequence();
        let clock = ManualClock::new();
        let mut state = PlaybackState::new();

        // Act
        clock.advance_secs(20.0);
        let outcome = state.advance(&sequence, clock.now());

        // Assert
        assert_eq!(outcome, TickOutcome::NotPlaying);
        assert_eq!(state, PlaybackState::new());
    }

    #[test]
    fn test_finish_forces_end_of_sequence_values() {
        // Arrange
        let sequence = sequence();
        let clock = ManualClock::new();
        let mut state = playing(&clock);
        state.narration_started();
        clock.advance_secs(4.0);
        state.advance(&sequence, clock.now());

        // Act
        let finished = state.finish(&sequence, StopReason::Requested, true);

        // Assert
        assert!(finished);
        assert_eq!(state.phase(), PlaybackPhase::Stopped);
        assert!((state.elapsed_seconds() - 60.0).abs() < f64::EPSILON);
        assert_eq!(state.active_frame_index(), 5);
        assert!(state.session_id().is_none());
        assert!(!state.narration_in_flight());
        assert_eq!(state.stop_reason(), Some(StopReason::Requested));
    }

    #[test]
    fn test_finish_without_cancel_keeps_voiceover_until_it_ends() {
        // Arrange
        let sequence = sequence();
        let clock = ManualClock::new();
        let mut state = playing(&clock);
        let session_id = state.session_id().unwrap();
        state.narration_started();

        // Act
        state.finish(&sequence, StopReason::TimelineElapsed, false);
        let in_flight_after_stop = state.narration_in_flight();
        let other_session_ended = state.narration_ended(Uuid::new_v4());
        let own_session_ended = state.narration_ended(session_id);

        // Assert
        assert!(in_flight_after_stop);
        assert!(!other_session_ended);
        assert!(own_session_ended);
        assert!(!state.narration_in_flight());
        assert_eq!(state.phase(), PlaybackPhase::Stopped);
        assert_eq!(state.stop_reason(), Some(StopReason::TimelineElapsed));
    }

    #[test]
    fn test_begin_forgets_previous_voiceover() {
        // Arrange
        let clock = ManualClock::new();
        let mut state = playing(&clock);
        let first = state.session_id().unwrap();
        state.narration_started();

        // Act
        state.begin(Uuid::new_v4(), clock.now());

        // Assert
        assert!(!state.narration_in_flight());
        assert!(!state.narration_ended(first));
    }

    #[test]
    fn test_finish_is_a_no_op_unless_playing() {
        // Arrange
        let sequence = sequence();
        let mut idle = PlaybackState::new();
        let clock = ManualClock::new();
        let mut stopped = playing(&clock);
        stopped.finish(&sequence, StopReason::TimelineElapsed, false);
        let stopped_before = stopped.clone();

        // Act / Assert
        assert!(!idle.finish(&sequence, StopReason::Requested, true));
        assert_eq!(idle, PlaybackState::new());
        assert!(!stopped.finish(&sequence, StopReason::Requested, true));
        assert_eq!(stopped, stopped_before);
    }

    #[test]
    fn test_clear_restores_rest_values_from_any_phase() {
        // Arrange
        let sequence = sequence();
        let clock = ManualClock::new();
        let mut state = playing(&clock);
        clock.advance_secs(33.0);
        state.advance(&sequence, clock.now());

        // Act
        state.clear();

        // Assert
        assert_eq!(state, PlaybackState::new());
    }

    #[test]
    fn test_begin_restarts_from_stopped() {
        // Arrange
        let sequence = sequence();
        let clock = ManualClock::new();
        let mut state = playing(&clock);
        state.finish(&sequence, StopReason::Requested, true);
        let session_id = Uuid::new_v4();

        // Act
        state.begin(session_id, clock.now());

        // Assert
        assert!(state.is_playing());
        assert_eq!(state.session_id(), Some(session_id));
        assert_eq!(state.active_frame_index(), 0);
        assert!(state.stop_reason().is_none());
    }

    #[test]
    fn test_snapshot_reflects_state_and_capabilities() {
        // Arrange
        let sequence = sequence();
        let clock = ManualClock::new();
        let mut state = playing(&clock);
        clock.advance_secs(35.0);
        state.advance(&sequence, clock.now());

        // Act
        let snapshot = state.snapshot(&sequence, Capabilities { narration: false });

        // Assert
        assert!(snapshot.is_playing());
        assert_eq!(snapshot.session_id, state.session_id());
        assert_eq!(snapshot.active_frame_index, 3);
        assert!((snapshot.total_seconds - 60.0).abs() < f64::EPSILON);
        assert!(!snapshot.narration_available);
    }
}
