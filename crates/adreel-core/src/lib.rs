//! adreel Core — shared playback abstractions.
//!
//! This crate defines the traits and types that the sequencer, narration,
//! and playback crates depend on. It contains no infrastructure code.

pub mod clock;
pub mod error;
pub mod platform;
pub mod speech;
