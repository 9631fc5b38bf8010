//! adreel — Ad content.
//!
//! Loads an ad from a YAML document: its frames, voiceover script, ranked
//! voice preferences, and delivery. The reference Dubai visa ad is embedded.

pub mod application;
pub mod domain;
