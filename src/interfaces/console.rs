//! Line-oriented stand-in for the menu-bar interactions.

use crate::application::display::DisplaySelector;
use crate::domain::asset::Asset;
use crate::domain::display::PinToggle;
use std::io::BufRead;
use std::str::FromStr;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    ToggleMode,
    TogglePinned(Asset),
    Status,
    Quit,
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let verb = parts.next().unwrap_or_default().to_lowercase();
        let arg = parts.next();

        match (verb.as_str(), arg) {
            ("mode" | "m", None) => Ok(Command::ToggleMode),
            ("pin" | "p", Some(asset)) => Ok(Command::TogglePinned(asset.parse()?)),
            ("status" | "s", None) => Ok(Command::Status),
            ("quit" | "q" | "exit", None) => Ok(Command::Quit),
            _ => anyhow::bail!(
                "Unknown command: {:?}. Use 'mode', 'pin <ASSET>', 'status' or 'quit'",
                s.trim()
            ),
        }
    }
}

/// Forwards stdin lines from a dedicated thread so a pending read never
/// keeps the runtime alive on shutdown.
pub fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!("CommandConsole: stdin read failed: {}", e);
                    break;
                }
            }
        }
        debug!("CommandConsole: stdin closed");
    });
    rx
}

/// Applies commands to the selector until `quit` or end of input.
pub struct CommandConsole {
    lines: mpsc::UnboundedReceiver<String>,
}

impl CommandConsole {
    pub fn new(lines: mpsc::UnboundedReceiver<String>) -> Self {
        Self { lines }
    }

    pub async fn run(&mut self, selector: &DisplaySelector) {
        while let Some(line) = self.lines.recv().await {
            if line.trim().is_empty() {
                continue;
            }

            match line.parse::<Command>() {
                Ok(Command::Quit) => {
                    info!("CommandConsole: Quit requested");
                    break;
                }
                Ok(command) => apply(selector, command),
                Err(e) => warn!("CommandConsole: {}", e),
            }
        }
    }
}

pub fn apply(selector: &DisplaySelector, command: Command) {
    match command {
        Command::ToggleMode => {
            let mode = selector.toggle_mode();
            info!("CommandConsole: Display mode {:?}", mode);
        }
        Command::TogglePinned(asset) => match selector.toggle_pinned(asset) {
            Ok(PinToggle::Pinned) => info!("CommandConsole: Pinned {}", asset),
            Ok(PinToggle::Unpinned) => info!("CommandConsole: Unpinned {}", asset),
            Err(e) => warn!("CommandConsole: Pin toggle rejected: {}", e),
        },
        Command::Status => selector.refresh(),
        Command::Quit => {}
    }
}
