//! Application services for the Voice Narrator.

pub mod narrator;
