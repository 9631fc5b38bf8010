//! `espeak-ng` implementation of the `SpeechEngine` trait.
//!
//! Each utterance runs as one child process. The engine keeps at most one
//! child alive: a new utterance or a cancel kills the previous one, and a
//! dropped `speak` future kills its child as well.

use std::process::Stdio;
use std::sync::{Mutex, MutexGuard, PoisonError};

use adreel_core::error::DomainError;
use adreel_core::speech::{SpeechEngine, SpeechOutcome, Utterance, Voice};
use async_trait::async_trait;
use tokio::process::Command;
use tokio::sync::oneshot;
use tracing::{debug, warn};

/// Default program name.
pub const DEFAULT_PROGRAM: &str = "espeak-ng";

/// espeak's default speed in words per minute.
const NORMAL_WORDS_PER_MINUTE: f32 = 175.0;
/// espeak's default pitch on its 0-99 scale.
const NORMAL_PITCH: f32 = 50.0;
/// espeak's default amplitude on its 0-200 scale.
const NORMAL_AMPLITUDE: f32 = 100.0;

#[derive(Debug, Default)]
struct Current {
    next_id: u64,
    active: Option<(u64, oneshot::Sender<()>)>,
}

/// Speech engine that shells out to `espeak-ng`.
#[derive(Debug)]
pub struct EspeakEngine {
    program: String,
    current: Mutex<Current>,
}

impl EspeakEngine {
    /// Creates an engine for `program` without checking that it exists.
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            current: Mutex::new(Current::default()),
        }
    }

    /// Probes `program --version` and returns an engine only if it runs.
    pub async fn detect(program: impl Into<String>) -> Option<Self> {
        let program = program.into();
        let status = Command::new(&program)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;

        match status {
            Ok(status) if status.success() => {
                debug!(%program, "speech program detected");
                Some(Self::new(program))
            }
            Ok(status) => {
                warn!(%program, %status, "speech program exited unsuccessfully");
                None
            }
            Err(error) => {
                debug!(%program, %error, "speech program not available");
                None
            }
        }
    }

    /// The program this engine runs.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    fn lock(&self) -> MutexGuard<'_, Current> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers a new utterance, superseding the previous one.
    fn register(&self) -> (u64, oneshot::Receiver<()>) {
        let (sender, receiver) = oneshot::channel();
        let mut current = self.lock();
        if let Some((_, previous)) = current.active.take() {
            let _ = previous.send(());
        }
        let id = current.next_id;
        current.next_id += 1;
        current.active = Some((id, sender));
        (id, receiver)
    }

    /// Forgets utterance `id` if it is still the active one.
    fn release(&self, id: u64) {
        let mut current = self.lock();
        if current.active.as_ref().is_some_and(|(active, _)| *active == id) {
            current.active = None;
        }
    }
}

#[async_trait]
impl SpeechEngine for EspeakEngine {
    async fn voices(&self) -> Result<Vec<Voice>, DomainError> {
        let output = Command::new(&self.program)
            .arg("--voices")
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| DomainError::Infrastructure(format!("{}: {e}", self.program)))?;

        if !output.status.success() {
            return Err(DomainError::Infrastructure(format!(
                "{} --voices exited with {}",
                self.program, output.status
            )));
        }

        Ok(parse_voices(&String::from_utf8_lossy(&output.stdout)))
    }

    async fn speak(&self, utterance: Utterance) -> Result<SpeechOutcome, DomainError> {
        let (id, cancelled) = self.register();

        let spawned = Command::new(&self.program)
            .args(speak_args(&utterance))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn();
        let mut child = match spawned {
            Ok(child) => child,
            Err(error) => {
                self.release(id);
                return Err(DomainError::Infrastructure(format!(
                    "{}: {error}",
                    self.program
                )));
            }
        };

        tokio::select! {
            status = child.wait() => {
                self.release(id);
                let status = status
                    .map_err(|e| DomainError::Infrastructure(format!("{}: {e}", self.program)))?;
                if status.success() {
                    Ok(SpeechOutcome::Completed)
                } else {
                    Err(DomainError::Infrastructure(format!(
                        "{} exited with {status}",
                        self.program
                    )))
                }
            }
            _ = cancelled => {
                if let Err(error) = child.kill().await {
                    warn!(%error, "failed to stop speech process");
                }
                Ok(SpeechOutcome::Cancelled)
            }
        }
    }

    fn cancel(&self) {
        if let Some((_, sender)) = self.lock().active.take() {
            let _ = sender.send(());
        }
    }
}

/// Builds the espeak command line for an utterance.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn speak_args(utterance: &Utterance) -> Vec<String> {
    let speed = (NORMAL_WORDS_PER_MINUTE * utterance.rate).round().clamp(80.0, 450.0) as i32;
    let pitch = (NORMAL_PITCH * utterance.pitch).round().clamp(0.0, 99.0) as i32;
    let amplitude = (NORMAL_AMPLITUDE * utterance.volume).round().clamp(0.0, 200.0) as i32;

    let mut args = Vec::with_capacity(9);
    if let Some(voice) = &utterance.voice {
        args.push("-v".to_owned());
        args.push(voice.id.clone());
    }
    args.extend([
        "-s".to_owned(),
        speed.to_string(),
        "-p".to_owned(),
        pitch.to_string(),
        "-a".to_owned(),
        amplitude.to_string(),
        "--".to_owned(),
        utterance.text.clone(),
    ]);
    args
}

/// Parses the table printed by `espeak-ng --voices`.
///
/// ```text
/// Pty Language       Age/Gender VoiceName          File                 Other Languages
///  5  en-gb           --/M      English_(Great_Britain) gmw/en
/// ```
///
/// The voice file is used as the identifier; rows that do not have at least
/// the five leading columns are skipped.
#[must_use]
pub fn parse_voices(listing: &str) -> Vec<Voice> {
    listing
        .lines()
        .skip_while(|line| !line.trim_start().starts_with("Pty"))
        .skip(1)
        .filter_map(|line| {
            let columns: Vec<&str> = line.split_whitespace().collect();
            match columns.as_slice() {
                [_priority, language, _age_gender, name, file, ..] => Some(Voice {
                    id: (*file).to_owned(),
                    name: name.replace('_', " "),
                    language: (*language).to_owned(),
                }),
                _ => None,
            }
        })
        .collect()
}
