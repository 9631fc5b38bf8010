//! adreel Speech — host text-to-speech backends.
//!
//! Implements the core `SpeechEngine` trait on top of the `espeak-ng`
//! command-line synthesizer.

pub mod espeak;
