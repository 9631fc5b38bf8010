//! Application services for the Playback Controller.

pub mod controller;
