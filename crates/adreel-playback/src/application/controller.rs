//! The playback controller.
//!
//! Runs two independent tokio tasks per session: a fixed-cadence tick that
//! advances the frame timeline, and a one-shot narration task. Whichever
//! signals the end first stops the session. The tick never cancels speech on
//! a natural timeout, and a finished narration is never cancelled again.
//! Starting a session or resetting tears down both tasks first, so at most
//! one of each exists at any time.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use adreel_core::clock::Clock;
use adreel_core::error::DomainError;
use adreel_core::platform::{Capabilities, Platform};
use adreel_core::speech::SpeechOutcome;
use adreel_narration::application::narrator::VoiceNarrator;
use adreel_narration::domain::request::NarrationRequest;
use adreel_sequencer::domain::sequence::FrameSequence;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::domain::snapshot::PlaybackSnapshot;
use crate::domain::state::{PlaybackState, StopReason, TickOutcome};

/// Default tick cadence.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(200);

/// Controller tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackConfig {
    /// How often the timeline is recomputed while playing.
    pub tick_interval: Duration,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            tick_interval: DEFAULT_TICK_INTERVAL,
        }
    }
}

/// Cloneable handle to the player. Dropping the last handle tears down any
/// running session.
#[derive(Clone)]
pub struct PlaybackController {
    shared: Arc<Shared>,
}

struct Shared {
    sequence: Arc<FrameSequence>,
    clock: Arc<dyn Clock>,
    narrator: Option<VoiceNarrator>,
    request: NarrationRequest,
    capabilities: Capabilities,
    tick_interval: Duration,
    inner: Mutex<Inner>,
    snapshots: watch::Sender<PlaybackSnapshot>,
}

#[derive(Default)]
struct Inner {
    state: PlaybackState,
    ticker: Option<JoinHandle<()>>,
    narration: Option<JoinHandle<()>>,
}

impl PlaybackController {
    /// Creates an idle controller.
    ///
    /// The narration facility is taken from `platform`; without one, sessions
    /// play visuals only.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the tick interval is zero.
    pub fn new(
        sequence: FrameSequence,
        request: NarrationRequest,
        platform: &Platform,
        config: PlaybackConfig,
    ) -> Result<Self, DomainError> {
        if config.tick_interval.is_zero() {
            return Err(DomainError::Validation(
                "tick interval must be greater than zero".into(),
            ));
        }

        let capabilities = platform.capabilities();
        let state = PlaybackState::new();
        let (snapshots, _) = watch::channel(state.snapshot(&sequence, capabilities));

        Ok(Self {
            shared: Arc::new(Shared {
                sequence: Arc::new(sequence),
                clock: platform.clock(),
                narrator: platform.speech().map(VoiceNarrator::new),
                request,
                capabilities,
                tick_interval: config.tick_interval,
                inner: Mutex::new(Inner {
                    state,
                    ..Inner::default()
                }),
                snapshots,
            }),
        })
    }

    /// The frame sequence being played.
    #[must_use]
    pub fn sequence(&self) -> &FrameSequence {
        &self.shared.sequence
    }

    /// Host capabilities, fixed for the controller's lifetime.
    #[must_use]
    pub fn capabilities(&self) -> Capabilities {
        self.shared.capabilities
    }

    /// The latest published snapshot.
    #[must_use]
    pub fn snapshot(&self) -> PlaybackSnapshot {
        self.shared.snapshots.borrow().clone()
    }

    /// Subscribes to snapshots; a new one is published after every change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<PlaybackSnapshot> {
        self.shared.snapshots.subscribe()
    }

    /// Whether a tick task is currently running.
    #[must_use]
    pub fn is_ticking(&self) -> bool {
        self.shared
            .lock_inner()
            .ticker
            .as_ref()
            .is_some_and(|ticker| !ticker.is_finished())
    }

    /// Starts a new session, first tearing down any previous one.
    ///
    /// Returns the new session's identifier.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    #[instrument(skip(self))]
    pub fn start(&self) -> Uuid {
        let shared = &self.shared;
        let session_id = Uuid::now_v7();

        let mut inner = shared.lock_inner();
        shared.teardown(&mut inner);
        inner.state.begin(session_id, shared.clock.now());

        inner.ticker = Some(tokio::spawn(run_ticker(
            Arc::downgrade(shared),
            session_id,
            shared.tick_interval,
        )));

        match &shared.narrator {
            Some(narrator) => {
                inner.state.narration_started();
                inner.narration = Some(tokio::spawn(run_narration(
                    Arc::downgrade(shared),
                    narrator.clone(),
                    shared.request.clone(),
                    session_id,
                )));
            }
            None => info!("voiceover unavailable; playing visuals only"),
        }

        shared.publish(&inner.state);
        info!(
            %session_id,
            total_seconds = shared.sequence.total_duration(),
            frames = shared.sequence.len(),
            "playback session started"
        );
        session_id
    }

    /// Stops the playing session, leaving the end-of-sequence frame on screen.
    ///
    /// Speech is cancelled only when `cancel_speech` is set. Returns `false`
    /// if nothing was playing.
    #[instrument(skip(self))]
    pub fn stop(&self, cancel_speech: bool) -> bool {
        let mut inner = self.shared.lock_inner();
        self.shared
            .finish(&mut inner, StopReason::Requested, cancel_speech)
    }

    /// Returns to `Idle` from any state, cancelling the tick and any speech.
    /// Idempotent.
    #[instrument(skip(self))]
    pub fn reset(&self) {
        let mut inner = self.shared.lock_inner();
        self.shared.teardown(&mut inner);
        self.shared.publish(&inner.state);
        info!("playback reset");
    }
}

impl fmt::Debug for PlaybackController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaybackController")
            .field("capabilities", &self.shared.capabilities)
            .field("tick_interval", &self.shared.tick_interval)
            .finish_non_exhaustive()
    }
}

impl Shared {
    fn lock_inner(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, state: &PlaybackState) {
        self.snapshots
            .send_replace(state.snapshot(&self.sequence, self.capabilities));
    }

    /// Aborts both tasks, cancels speech, and clears the state.
    fn teardown(&self, inner: &mut Inner) {
        if let Some(ticker) = inner.ticker.take() {
            ticker.abort();
        }
        if let Some(narration) = inner.narration.take() {
            narration.abort();
        }
        if let Some(narrator) = &self.narrator {
            narrator.cancel();
        }
        inner.state.clear();
    }

    /// Shared terminal transition for every stop path.
    fn finish(&self, inner: &mut Inner, reason: StopReason, cancel_speech: bool) -> bool {
        if !inner.state.finish(&self.sequence, reason, cancel_speech) {
            return false;
        }

        if let Some(ticker) = inner.ticker.take() {
            ticker.abort();
        }
        // Without cancellation the narration task is released, not aborted:
        // speech may finish on its own and then only clears the in-flight flag.
        let narration = inner.narration.take();
        if cancel_speech {
            if let Some(narration) = narration {
                narration.abort();
            }
            if let Some(narrator) = &self.narrator {
                narrator.cancel();
            }
        }

        self.publish(&inner.state);
        info!(?reason, cancel_speech, "playback session stopped");
        true
    }

    /// Applies one tick. Returns whether the ticker should keep running.
    fn on_tick(&self, session_id: Uuid) -> bool {
        let mut inner = self.lock_inner();
        if inner.state.session_id() != Some(session_id) {
            return false;
        }

        match inner.state.advance(&self.sequence, self.clock.now()) {
            TickOutcome::Advanced { frame_changed } => {
                if frame_changed {
                    debug!(
                        frame = inner.state.active_frame_index(),
                        elapsed_seconds = inner.state.elapsed_seconds(),
                        "frame advanced"
                    );
                }
                self.publish(&inner.state);
                true
            }
            TickOutcome::Completed => {
                // The ticker is ending on its own; release its handle first.
                drop(inner.ticker.take());
                self.finish(&mut inner, StopReason::TimelineElapsed, false);
                false
            }
            TickOutcome::NotPlaying => false,
        }
    }

    fn on_narration_ended(&self, session_id: Uuid, outcome: Result<SpeechOutcome, DomainError>) {
        let mut inner = self.lock_inner();
        let playing = inner.state.session_id() == Some(session_id);
        if !inner.state.narration_ended(session_id) {
            debug!(%session_id, "ignoring narration outcome from a replaced session");
            return;
        }

        if !playing {
            // The session stopped without cancelling speech; only its voiceover was left.
            match outcome {
                Ok(outcome) => {
                    info!(%session_id, ?outcome, "voiceover ended after the session stopped");
                }
                Err(error) => {
                    warn!(%session_id, %error, "voiceover failed after the session stopped");
                }
            }
            self.publish(&inner.state);
            return;
        }
        drop(inner.narration.take());

        match outcome {
            Ok(SpeechOutcome::Completed) => {
                self.finish(&mut inner, StopReason::NarrationFinished, false);
            }
            Ok(SpeechOutcome::Cancelled) => self.publish(&inner.state),
            Err(error) => {
                warn!(%error, "voiceover failed; continuing with visuals only");
                self.publish(&inner.state);
            }
        }
    }
}

impl Drop for Shared {
    fn drop(&mut self) {
        let inner = self.inner.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(ticker) = inner.ticker.take() {
            ticker.abort();
        }
        let narration = inner.narration.take();
        let speaking = narration.is_some() || inner.state.narration_in_flight();
        if let Some(narration) = narration {
            narration.abort();
        }
        if let Some(narrator) = self.narrator.as_ref().filter(|_| speaking) {
            narrator.cancel();
        }
    }
}

async fn run_ticker(shared: Weak<Shared>, session_id: Uuid, period: Duration) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;
        let Some(shared) = shared.upgrade() else {
            break;
        };
        if !shared.on_tick(session_id) {
            break;
        }
    }
}

async fn run_narration(
    shared: Weak<Shared>,
    narrator: VoiceNarrator,
    request: NarrationRequest,
    session_id: Uuid,
) {
    let outcome = narrator.narrate(&request).await;
    if let Some(shared) = shared.upgrade() {
        shared.on_narration_ended(session_id, outcome);
    }
}
