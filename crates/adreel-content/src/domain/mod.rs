//! Domain model for ad content.

pub mod advert;
pub mod error;
