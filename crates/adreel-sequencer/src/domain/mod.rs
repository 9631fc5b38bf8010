//! Domain model for the Frame Sequencer.

pub mod frame;
pub mod sequence;
