//! adreel — Voice Narrator.
//!
//! Issues the single long-form voiceover request for a playback session,
//! picking the best available voice from a ranked preference list.

pub mod application;
pub mod domain;
