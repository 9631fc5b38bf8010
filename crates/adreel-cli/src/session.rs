//! The interactive player loop.
//!
//! Multiplexes user actions from an input stream with snapshots published
//! by the controller, writing rendered output as it goes.

use std::io::Write;

use adreel_content::domain::advert::Advert;
use adreel_playback::application::controller::PlaybackController;
use adreel_playback::domain::state::PlaybackPhase;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{info, warn};

use crate::config::OutputMode;
use crate::error::AppError;
use crate::input::{Command, HELP};
use crate::render::Renderer;

/// How the loop behaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionOptions {
    /// Output format.
    pub output: OutputMode,
    /// Start immediately and return once the session stops.
    pub autoplay: bool,
}

/// Runs the player until the user quits or input ends, resetting the
/// controller on the way out.
///
/// With autoplay the loop instead returns once the session has stopped and
/// its voiceover is silent. A voiceover that outlives the timeline is left
/// to finish on its own, and nothing is reset.
///
/// # Errors
///
/// Returns `AppError::Io` if reading input or writing output fails, and
/// `AppError::Encode` if a JSON snapshot cannot be encoded.
pub async fn run<R, W>(
    controller: &PlaybackController,
    advert: &Advert,
    options: SessionOptions,
    input: R,
    mut output: W,
) -> Result<(), AppError>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut renderer = Renderer::new(options.output, advert);
    let mut snapshots = controller.subscribe();
    let mut lines = input.lines();
    let mut input_open = true;
    let mut played_out = false;

    if options.output == OutputMode::Text && !options.autoplay {
        writeln!(output, "{HELP}")?;
    }
    let initial = snapshots.borrow_and_update().clone();
    if let Some(text) = renderer.render(&initial)? {
        writeln!(output, "{text}")?;
    }
    output.flush()?;

    if options.autoplay {
        controller.start();
    }

    loop {
        tokio::select! {
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = snapshots.borrow_and_update().clone();
                if let Some(text) = renderer.render(&snapshot)? {
                    writeln!(output, "{text}")?;
                    output.flush()?;
                }
                if options.autoplay
                    && snapshot.phase == PlaybackPhase::Stopped
                    && !snapshot.narration_in_flight
                {
                    info!(reason = ?snapshot.stop_reason, "autoplay session ended");
                    played_out = true;
                    break;
                }
            }
            line = lines.next_line(), if input_open => {
                let Some(line) = line? else {
                    input_open = false;
                    if options.autoplay {
                        continue;
                    }
                    break;
                };
                match Command::parse(&line) {
                    Some(Command::Quit) => break,
                    Some(command) => apply(controller, command),
                    None if line.trim().is_empty() => {}
                    None => {
                        warn!(input = %line.trim(), "unrecognised command");
                        if options.output == OutputMode::Text {
                            writeln!(output, "{HELP}")?;
                            output.flush()?;
                        }
                    }
                }
            }
        }
    }

    if !played_out {
        controller.reset();
    }
    Ok(())
}

fn apply(controller: &PlaybackController, command: Command) {
    match command {
        Command::Play => {
            controller.start();
        }
        Command::Stop => {
            if !controller.stop(true) {
                info!("stop ignored; nothing is playing");
            }
        }
        Command::Reset => controller.reset(),
        Command::Quit => {}
    }
}
