//! Test speech engines — fake `SpeechEngine` implementations for tests.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use adreel_core::error::DomainError;
use adreel_core::speech::{SpeechEngine, SpeechOutcome, Utterance, Voice};
use async_trait::async_trait;
use tokio::sync::oneshot;

#[derive(Debug, Default)]
struct EngineState {
    current: Option<(u64, oneshot::Sender<SpeechOutcome>)>,
    next_id: u64,
    /// Utterances that have started and not yet been resolved or dropped.
    live: HashSet<u64>,
    spoken: Vec<Utterance>,
    cancel_calls: usize,
    max_in_flight: usize,
}

impl EngineState {
    fn resolve_current(&mut self, outcome: SpeechOutcome) -> bool {
        match self.current.take() {
            Some((id, sender)) => {
                self.live.remove(&id);
                sender.send(outcome).is_ok()
            }
            None => false,
        }
    }
}

/// A speech engine whose utterances only finish when the test says so.
///
/// Records every utterance and cancel call, and tracks how many utterances
/// are unresolved so tests can assert that no more than one is ever in
/// flight.
#[derive(Debug)]
pub struct ScriptedSpeechEngine {
    voices: Vec<Voice>,
    state: Arc<Mutex<EngineState>>,
}

impl ScriptedSpeechEngine {
    /// Creates an engine offering `voices`.
    #[must_use]
    pub fn new(voices: Vec<Voice>) -> Self {
        Self {
            voices,
            state: Arc::new(Mutex::new(EngineState::default())),
        }
    }

    /// Completes the utterance in flight. Returns `false` if there was none.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn finish_current(&self) -> bool {
        self.state
            .lock()
            .unwrap()
            .resolve_current(SpeechOutcome::Completed)
    }

    /// Returns every utterance passed to `speak`, in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn spoken(&self) -> Vec<Utterance> {
        self.state.lock().unwrap().spoken.clone()
    }

    /// Number of `cancel` calls so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn cancel_calls(&self) -> usize {
        self.state.lock().unwrap().cancel_calls
    }

    /// Number of utterances started and not yet resolved or dropped.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn in_flight(&self) -> usize {
        self.state.lock().unwrap().live.len()
    }

    /// Highest number of simultaneously unresolved utterances observed.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn max_in_flight(&self) -> usize {
        self.state.lock().unwrap().max_in_flight
    }
}

/// Removes an utterance from the live set when its `speak` future completes
/// or is dropped.
struct InFlightGuard {
    id: u64,
    state: Arc<Mutex<EngineState>>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        if let Ok(mut state) = self.state.lock() {
            state.live.remove(&self.id);
        }
    }
}

#[async_trait]
impl SpeechEngine for ScriptedSpeechEngine {
    async fn voices(&self) -> Result<Vec<Voice>, DomainError> {
        Ok(self.voices.clone())
    }

    async fn speak(&self, utterance: Utterance) -> Result<SpeechOutcome, DomainError> {
        let (sender, receiver) = oneshot::channel();
        let guard = {
            let mut state = self.state.lock().unwrap();
            state.resolve_current(SpeechOutcome::Cancelled);
            let id = state.next_id;
            state.next_id += 1;
            state.current = Some((id, sender));
            state.live.insert(id);
            state.spoken.push(utterance);
            state.max_in_flight = state.max_in_flight.max(state.live.len());
            InFlightGuard {
                id,
                state: Arc::clone(&self.state),
            }
        };

        let outcome = receiver.await.unwrap_or(SpeechOutcome::Cancelled);
        drop(guard);
        Ok(outcome)
    }

    fn cancel(&self) {
        let mut state = self.state.lock().unwrap();
        state.cancel_calls += 1;
        state.resolve_current(SpeechOutcome::Cancelled);
    }
}

/// A speech engine that fails every request. Useful for testing degraded
/// narration paths.
#[derive(Debug)]
pub struct FailingSpeechEngine;

#[async_trait]
impl SpeechEngine for FailingSpeechEngine {
    async fn voices(&self) -> Result<Vec<Voice>, DomainError> {
        Err(DomainError::Infrastructure("speech service unreachable".into()))
    }

    async fn speak(&self, _utterance: Utterance) -> Result<SpeechOutcome, DomainError> {
        Err(DomainError::Infrastructure("speech service unreachable".into()))
    }

    fn cancel(&self) {}
}
