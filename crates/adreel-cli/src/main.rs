//! adreel terminal player entry point.

use std::error::Error;
use std::sync::Arc;

use adreel_cli::config::Config;
use adreel_cli::session::{self, SessionOptions};
use adreel_content::application::loader::resolve_advert;
use adreel_core::clock::SystemClock;
use adreel_core::platform::Platform;
use adreel_core::speech::SpeechEngine;
use adreel_playback::application::controller::{PlaybackConfig, PlaybackController};
use adreel_speech::espeak::EspeakEngine;
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Logs go to stderr; stdout belongs to the player.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting adreel player");

    let config = Config::from_env()?;
    let advert = resolve_advert(config.content.as_deref())?;

    let speech: Option<Arc<dyn SpeechEngine>> = if config.voiceover {
        EspeakEngine::detect(config.tts_program.as_str())
            .await
            .map(|engine| Arc::new(engine) as Arc<dyn SpeechEngine>)
    } else {
        tracing::info!("voiceover disabled by configuration");
        None
    };
    let platform = Platform::new(Arc::new(SystemClock), speech);
    tracing::info!(narration = platform.capabilities().narration, "platform ready");

    let controller = PlaybackController::new(
        advert.sequence.clone(),
        advert.narration.clone(),
        &platform,
        PlaybackConfig {
            tick_interval: config.tick_interval,
        },
    )?;

    let options = SessionOptions {
        output: config.output,
        autoplay: config.autoplay,
    };
    // Autoplay never reads stdin: a pending blocking read would hold the
    // runtime open after the session ends.
    if options.autoplay {
        session::run(
            &controller,
            &advert,
            options,
            tokio::io::empty(),
            std::io::stdout(),
        )
        .await?;
    } else {
        session::run(
            &controller,
            &advert,
            options,
            BufReader::new(tokio::io::stdin()),
            std::io::stdout(),
        )
        .await?;
    }

    Ok(())
}
