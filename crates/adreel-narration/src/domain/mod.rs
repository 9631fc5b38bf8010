//! Domain model for the Voice Narrator.

pub mod delivery;
pub mod request;
pub mod voice;
