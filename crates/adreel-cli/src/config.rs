//! Environment configuration.

use std::path::PathBuf;
use std::time::Duration;

use adreel_playback::application::controller::DEFAULT_TICK_INTERVAL;
use adreel_speech::espeak::DEFAULT_PROGRAM;

use crate::error::AppError;

/// How snapshots are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Human-readable frame cards and progress lines.
    #[default]
    Text,
    /// One JSON snapshot per line.
    Json,
}

/// Player settings, read from `ADREEL_*` environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Ad document to play; the embedded ad when `None`.
    pub content: Option<PathBuf>,
    /// Whether to look for a speech program at all.
    pub voiceover: bool,
    /// Speech program to run.
    pub tts_program: String,
    /// Tick cadence.
    pub tick_interval: Duration,
    /// Output format.
    pub output: OutputMode,
    /// Start playing immediately and exit when the session stops.
    pub autoplay: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            content: None,
            voiceover: true,
            tts_program: DEFAULT_PROGRAM.to_owned(),
            tick_interval: DEFAULT_TICK_INTERVAL,
            output: OutputMode::Text,
            autoplay: false,
        }
    }
}

impl Config {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` naming the first invalid variable.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`. Unset and empty variables
    /// take their defaults.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` naming the first invalid variable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        let content = get("ADREEL_CONTENT").map(PathBuf::from);

        let voiceover = match get("ADREEL_VOICEOVER") {
            Some(value) => parse_switch("ADREEL_VOICEOVER", &value)?,
            None => defaults.voiceover,
        };

        let tts_program = get("ADREEL_TTS_PROGRAM")
            .map_or(defaults.tts_program, |value| value.trim().to_owned());

        let tick_interval = match get("ADREEL_TICK_MS") {
            Some(value) => {
                let millis: u64 = value.trim().parse().map_err(|e| {
                    AppError::Config(format!("ADREEL_TICK_MS must be a whole number: {e}"))
                })?;
                if millis == 0 {
                    return Err(AppError::Config(
                        "ADREEL_TICK_MS must be greater than zero".into(),
                    ));
                }
                Duration::from_millis(millis)
            }
            None => defaults.tick_interval,
        };

        let output = match get("ADREEL_OUTPUT") {
            Some(value) => match value.trim().to_ascii_lowercase().as_str() {
                "text" => OutputMode::Text,
                "json" => OutputMode::Json,
                other => {
                    return Err(AppError::Config(format!(
                        "ADREEL_OUTPUT must be `text` or `json`, got `{other}`"
                    )));
                }
            },
            None => defaults.output,
        };

        let autoplay = match get("ADREEL_AUTOPLAY") {
            Some(value) => parse_switch("ADREEL_AUTOPLAY", &value)?,
            None => defaults.autoplay,
        };

        Ok(Self {
            content,
            voiceover,
            tts_program,
            tick_interval,
            output,
            autoplay,
        })
    }
}

fn parse_switch(key: &str, value: &str) -> Result<bool, AppError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Ok(true),
        "off" | "false" | "no" | "0" => Ok(false),
        other => Err(AppError::Config(format!(
            "{key} must be on/off, got `{other}`"
        ))),
    }
}
