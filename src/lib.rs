#![doc = r#"
Hydra: write one action, run it from the command line or a desktop window.

A program built on this crate describes itself once (an [`Application`]:
program information, option declarations, an action factory and optionally a
widget layout). [`run`] then decides at startup whether to drive it as a
command line tool or as an egui window, and both front ends feed the same
[`Action`] lifecycle: `standardize`, `validate`, `action`.

Stability
---------
The API is young and may change between minor releases.

Add dependency
--------------
```toml
[dependencies]
hydra = "0.3"                                         # CLI and GUI
# hydra = { version = "0.3", default-features = false }  # CLI only
```

Quick start
-----------
```rust,no_run
use hydra::{Action, Application, InputMap, OptionDecl, ProgramInfo, ProgressSink, Problems};

struct Hello {
    program: ProgramInfo,
}

struct Greet;

impl Action for Greet {
    fn validate(&self, inputs: &InputMap) -> hydra::Result<()> {
        let mut problems = Problems::new();
        problems.require(inputs, "name", "Name required");
        problems.into_result()
    }

    fn action(&mut self, inputs: &InputMap, progress: &mut dyn ProgressSink) -> hydra::Result<String> {
        progress.progress("Greeting...", None);
        Ok(format!("Hello {}!", inputs.value("name")))
    }
}

impl Application for Hello {
    fn program(&self) -> &ProgramInfo {
        &self.program
    }

    fn options(&self) -> Vec<OptionDecl> {
        vec![OptionDecl::value("name", 'n', "Who to greet")]
    }

    fn action_for(&self, _inputs: &InputMap) -> hydra::Result<Box<dyn Action>> {
        Ok(Box::new(Greet))
    }
}

fn main() {
    hydra::run(Hello {
        program: ProgramInfo {
            name: "Hello".into(),
            version: "1.0.0".into(),
            usage: "hello --name NAME".into(),
            config: Some("{path}hello.ini".into()),
            error_log: Some("{path}hello.err".into()),
            ..Default::default()
        },
    })
}
```

Startup
-------
A literal `gui` argument opens the window. Any other argument, or input piped
on stdin, runs the command line front end. A bare launch from a terminal opens
the window. Without the `gui` feature the command line is always used.

Reserved flags
--------------
Every program accepts `-h/--help`, `-V/--version`, `-l/--license`,
`-q/--quiet` and `-v/--verbose`. Verbose mode prints a diagnostic trace on
failure and installs a `tracing` subscriber at DEBUG level on stderr.

Error handling
--------------
Fallible functions return `hydra::Result<T>`. Failures are printed (CLI) or
shown in a dialog (GUI) and, when `ProgramInfo::error_log` is set, written to
the error log. The process exit status does not reflect task failures.

Feature flags
-------------
- `gui` (default): builds the desktop front end on eframe/egui.
- `full`: enables every optional front end.

Useful modules
--------------
- [`app`]: the `Application` trait.
- [`core`](crate::core): argument parsing, configuration, progress, the action lifecycle.
- [`cli`]: help texts, console progress and mode selection.
- [`widgets`]: widget declarations for the window.
- [`error`]: crate-level `Error` and `Result`.
"#]

use std::io::{self, IsTerminal};

pub mod app;
pub mod cli;
pub mod core;
pub mod error;
pub mod types;
pub mod widgets;

// GUI module (only available with gui feature)
#[cfg(feature = "gui")]
pub mod gui;

// Curated public API surface
pub use app::{Application, Hosted, invoke, load_configuration};
pub use cli::{CliDriver, Mode, Outcome, select_mode};
pub use crate::core::action::{Action, Problems};
pub use crate::core::config::Configuration;
pub use crate::core::files::{STDIN, STDOUT, open_input, open_output};
pub use crate::core::inputs::InputMap;
pub use crate::core::options::OptionSet;
pub use crate::core::parser::parse_arguments;
pub use crate::core::progress::{ProgressSink, ProgressThrottle, Timing, now_ms};
pub use error::{Error, Result};
pub use types::{InputValue, OptionDecl, OptionKind, ProgramInfo};
pub use widgets::{BrowseMode, Element, HelpBlock, Tab, Widget, WidgetKind};

/// Run `app` with the process arguments, choosing the front end at startup.
///
/// Failures are reported to the user and the error log; the process still
/// terminates normally.
pub fn run<A: Application>(app: A) {
    let app = Hosted::from_exe(app);
    let args: Vec<String> = std::env::args().skip(1).collect();

    match select_mode(&args, io::stdin().is_terminal()) {
        Mode::Cli => {
            if let Outcome::Failed(message) = cli::run(&app, &args) {
                tracing::debug!("Run failed: {}", message);
            }
        }
        Mode::Gui => run_gui(app),
    }
}

#[cfg(feature = "gui")]
fn run_gui<A: Application>(app: Hosted<A>) {
    let program = app.program().clone();
    if let Err(e) = gui::run(std::sync::Arc::new(app)) {
        tracing::error!("GUI failed: {}", e);
        eprintln!("ERROR: {}", e);
        if let Err(log_err) = crate::core::error_log::record(&program, &e) {
            eprintln!("ERROR: {}", log_err);
        }
    }
}

#[cfg(not(feature = "gui"))]
fn run_gui<A: Application>(app: Hosted<A>) {
    cli::run(&app, &[] as &[String]);
}
