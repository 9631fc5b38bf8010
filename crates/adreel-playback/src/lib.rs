//! adreel — Playback Controller.
//!
//! Owns the only mutable lifecycle state in the player: starts, stops, and
//! resets sessions, drives the frame timeline from a periodic tick, and races
//! it against the voiceover's completion.

pub mod application;
pub mod domain;
