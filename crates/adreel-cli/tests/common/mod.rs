//! Shared helpers for player integration tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use adreel_content::application::loader::builtin_advert;
use adreel_content::domain::advert::Advert;
use adreel_core::platform::Platform;
use adreel_core::speech::SpeechEngine;
use adreel_playback::application::controller::{PlaybackConfig, PlaybackController};
use adreel_test_support::TokioClock;

/// The embedded reference ad.
pub fn advert() -> Advert {
    builtin_advert().unwrap()
}

/// A controller on tokio's (pausable) clock with the default cadence.
pub fn controller(advert: &Advert, speech: Option<Arc<dyn SpeechEngine>>) -> PlaybackController {
    let platform = Platform::new(Arc::new(TokioClock), speech);
    PlaybackController::new(
        advert.sequence.clone(),
        advert.narration.clone(),
        &platform,
        PlaybackConfig {
            tick_interval: Duration::from_millis(200),
        },
    )
    .unwrap()
}

/// Splits captured stdout into lines.
pub fn lines(output: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(output)
        .lines()
        .map(str::to_owned)
        .collect()
}

/// Parses captured JSON-mode stdout, one value per line.
pub fn json_lines(output: &[u8]) -> Vec<serde_json::Value> {
    lines(output)
        .iter()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}
