//! Line commands accepted by the headless runner

use std::str::FromStr;
use stillness_core::{Input, Orchestrator, SessionState};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Left,
    Right,
    Select,
    Play,
    Pause,
    Resume,
    Back,
    Edit(u8),
    Theme,
    Status,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown command '{0}' (try 'help')")]
pub struct ParseCommandError(pub String);

impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let word = words.next().unwrap_or_default().to_ascii_lowercase();
        let command = match word.as_str() {
            "left" | "l" => Command::Left,
            "right" | "r" => Command::Right,
            "select" | "s" | "ok" => Command::Select,
            "play" => Command::Play,
            "pause" => Command::Pause,
            "resume" => Command::Resume,
            "back" | "b" => Command::Back,
            "edit" | "e" => {
                let level = words
                    .next()
                    .and_then(|w| w.parse::<u8>().ok())
                    .filter(|l| (1..=3).contains(l))
                    .ok_or_else(|| ParseCommandError(line.trim().to_string()))?;
                Command::Edit(level)
            }
            "theme" => Command::Theme,
            "status" | "" => Command::Status,
            "help" | "?" => Command::Help,
            "quit" | "q" | "exit" => Command::Quit,
            _ => return Err(ParseCommandError(line.trim().to_string())),
        };
        Ok(command)
    }
}

impl Command {
    /// Orchestrator input for this command, if it has one
    pub fn input(self) -> Option<Input> {
        match self {
            Command::Left => Some(Input::Step { delta: -1 }),
            Command::Right => Some(Input::Step { delta: 1 }),
            Command::Select => Some(Input::Confirm),
            Command::Play => Some(Input::Play),
            Command::Pause => Some(Input::Pause),
            Command::Resume => Some(Input::Resume),
            Command::Back => Some(Input::Back),
            Command::Edit(level) => Some(Input::Edit { level }),
            Command::Theme => Some(Input::ToggleTheme),
            Command::Status | Command::Help | Command::Quit => None,
        }
    }
}

pub const HELP: &str = "\
commands:
  left | right     rotate the active ring
  select           confirm the highlighted item
  play             start the session (or return from an edit)
  pause | resume   control a running session
  back             previous ring
  edit <1-3>       change mode, ambiance or duration while playing
  theme            toggle light/dark
  status           show where the session is
  quit";

/// One-line summary of what the user sees
pub fn describe(app: &Orchestrator) -> String {
    let session = app.session();
    match session.state() {
        SessionState::Selecting => {
            let ring = app.ring(session.level());
            let highlighted = ring
                .and_then(|r| r.highlighted_item())
                .map(|item| item.display_label())
                .unwrap_or_default();
            let edit = if session.recall().is_some() { " (editing)" } else { "" };
            format!(
                "[ring {}{}] {} | center: {}",
                session.level(),
                edit,
                highlighted,
                app.center_label()
            )
        }
        SessionState::Playing | SessionState::Paused => {
            let mode = session.mode().map(|m| m.display_label()).unwrap_or_default();
            let ambiance = session
                .ambiance()
                .map(|a| a.display_label())
                .unwrap_or_default();
            format!(
                "[{}] {} / {} | {}",
                session.state(),
                mode,
                ambiance,
                app.center_label()
            )
        }
        state => format!("[{}]", state),
    }
}
