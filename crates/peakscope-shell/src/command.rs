//! Interactive playback commands.

use std::str::FromStr;
use std::time::Duration;

use crate::error::ShellError;

/// Slowest and fastest allowed playback interval.
pub const MIN_INTERVAL: Duration = Duration::from_millis(200);
pub const MAX_INTERVAL: Duration = Duration::from_millis(2000);

/// Clamp a playback interval to `MIN_INTERVAL..=MAX_INTERVAL`.
pub fn clamp_interval(interval: Duration) -> Duration {
    interval.clamp(MIN_INTERVAL, MAX_INTERVAL)
}

/// A user command for the playback driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Play,
    Pause,
    Toggle,
    Next,
    Prev,
    Reset,
    /// Jump to a 0-based step index.
    Seek(usize),
    /// Change the tick interval.
    Speed(Duration),
    Quit,
}

impl FromStr for Command {
    type Err = ShellError;

    /// Parse one line of interactive input.
    ///
    /// `seek`/`g` take a 1-based step number, as shown by the renderer.
    /// `speed` takes milliseconds and is clamped to the allowed range.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let name = words.next().unwrap_or("").to_ascii_lowercase();
        let arg = words.next();
        let unknown = || ShellError::UnknownCommand(line.trim().to_string());

        let command = match (name.as_str(), arg) {
            ("play", None) => Command::Play,
            ("pause", None) => Command::Pause,
            ("t" | "toggle" | "", None) => Command::Toggle,
            ("n" | "next", None) => Command::Next,
            ("p" | "prev", None) => Command::Prev,
            ("r" | "reset", None) => Command::Reset,
            ("q" | "quit" | "exit", None) => Command::Quit,
            ("g" | "seek", Some(n)) => {
                let step = n.parse::<usize>().map_err(|_| unknown())?;
                Command::Seek(step.saturating_sub(1))
            }
            ("speed", Some(ms)) => {
                let ms = ms.parse::<u64>().map_err(|_| unknown())?;
                Command::Speed(clamp_interval(Duration::from_millis(ms)))
            }
            _ => return Err(unknown()),
        };

        if words.next().is_some() {
            return Err(unknown());
        }
        Ok(command)
    }
}

/// One-line help for the interactive prompt.
pub const HELP: &str =
    "commands: n(ext) p(rev) play pause t(oggle)/<enter> r(eset) g|seek <step> speed <ms> q(uit)";
