//! Domain model for the Playback Controller.

pub mod snapshot;
pub mod state;
