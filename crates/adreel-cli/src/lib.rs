//! adreel — terminal player.
//!
//! Library half of the `adreel` binary so the session loop can be driven
//! from integration tests.

pub mod config;
pub mod error;
pub mod input;
pub mod render;
pub mod session;
