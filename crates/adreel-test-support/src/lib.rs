//! Shared test fakes and utilities for the adreel ad player.

mod clock;
mod speech;

pub use clock::{ManualClock, TokioClock};
pub use speech::{FailingSpeechEngine, ScriptedSpeechEngine};
