//! User actions read from the terminal.

/// Printed for unrecognised input.
pub const HELP: &str = "commands: play (p), stop (s), reset (r), quit (q)";

/// One user action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Start a new session, replacing any running one.
    Play,
    /// Stop the running session and silence the voiceover.
    Stop,
    /// Return to the first frame.
    Reset,
    /// Leave the player.
    Quit,
}

impl Command {
    /// Parses one input line. Case and surrounding whitespace are ignored.
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim().to_ascii_lowercase().as_str() {
            "play" | "p" | "replay" => Some(Self::Play),
            "stop" | "s" => Some(Self::Stop),
            "reset" | "r" => Some(Self::Reset),
            "quit" | "q" | "exit" => Some(Self::Quit),
            _ => None,
        }
    }
}
