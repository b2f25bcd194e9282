//! Command line front end.
//!
//! This module renders the help/version/license texts (`help`), writes
//! progress over a single console line (`console`) and drives one
//! invocation of an [`Application`](crate::app::Application) (`runner`).
//! It also decides whether a program starts in CLI or GUI mode.
pub mod console;
pub mod help;
pub mod runner;

pub use runner::{CliDriver, Outcome, run};

/// Front end chosen at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Cli,
    Gui,
}

/// Token that forces the desktop window even when other arguments exist.
pub const GUI_TOKEN: &str = "gui";

/// Pick the front end from the argument tokens (program name excluded).
///
/// An explicit `gui` token wins. Any other argument, or input piped on
/// stdin, means CLI. A bare launch from a terminal opens the window.
/// Builds without the `gui` feature always run the CLI.
pub fn select_mode<S: AsRef<str>>(tokens: &[S], stdin_is_terminal: bool) -> Mode {
    if !cfg!(feature = "gui") {
        return Mode::Cli;
    }
    if tokens.iter().any(|t| t.as_ref() == GUI_TOKEN) {
        Mode::Gui
    } else if !tokens.is_empty() || !stdin_is_terminal {
        Mode::Cli
    } else {
        Mode::Gui
    }
}
