//! Platform capability provider.
//!
//! Bundles the optional host facilities the player depends on so they can be
//! injected (and faked in tests) instead of being probed ad hoc.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::clock::{Clock, SystemClock};
use crate::speech::SpeechEngine;

/// Capability flags exposed to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Capabilities {
    /// Whether a speech facility is available for the voiceover.
    pub narration: bool,
}

/// Host facilities available to the player.
#[derive(Clone)]
pub struct Platform {
    clock: Arc<dyn Clock>,
    speech: Option<Arc<dyn SpeechEngine>>,
}

impl Platform {
    /// Creates a platform from a clock and an optional speech engine.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, speech: Option<Arc<dyn SpeechEngine>>) -> Self {
        Self { clock, speech }
    }

    /// A platform with the system clock and no speech facility.
    #[must_use]
    pub fn silent() -> Self {
        Self::new(Arc::new(SystemClock), None)
    }

    /// Returns the monotonic clock.
    #[must_use]
    pub fn clock(&self) -> Arc<dyn Clock> {
        Arc::clone(&self.clock)
    }

    /// Returns the speech engine, if the host has one.
    #[must_use]
    pub fn speech(&self) -> Option<Arc<dyn SpeechEngine>> {
        self.speech.clone()
    }

    /// Reports which optional facilities are present.
    #[must_use]
    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            narration: self.speech.is_some(),
        }
    }
}

impl fmt::Debug for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Platform")
            .field("capabilities", &self.capabilities())
            .finish_non_exhaustive()
    }
}
