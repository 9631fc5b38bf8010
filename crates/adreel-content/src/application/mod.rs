//! Loading ad content from its sources.

pub mod loader;
