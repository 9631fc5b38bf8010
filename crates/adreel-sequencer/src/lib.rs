//! adreel — Frame Sequencer.
//!
//! Owns the ordered list of display frames and converts elapsed playback
//! time into the active frame and a progress percentage.

pub mod domain;
