pub mod console;
pub mod status_line;

pub use console::{Command, CommandConsole, spawn_stdin_reader};
pub use status_line::StatusLineRenderer;
