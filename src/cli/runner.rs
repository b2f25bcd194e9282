use std::io::{self, IsTerminal, Write};

use tracing::{debug, info};

use crate::app::{Application, invoke, load_configuration};
use crate::core::error_log;
use crate::core::options::{HELP, LICENSE, QUIET, VERBOSE, VERSION};
use crate::core::parser::parse_arguments;
use crate::core::progress::{ProgressSink, ProgressThrottle};
use crate::error::{Error, Result};

use super::console::{ConsoleProgress, fit_line, LINE_WIDTH};
use super::help::{fit, render_help, render_license, render_version};

/// What a CLI run ended with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Help,
    Version,
    License,
    Completed(String),
    Failed(String),
}

/// Drives one command line invocation against an [`Application`].
pub struct CliDriver<'a, W: Write> {
    app: &'a dyn Application,
    out: W,
    interactive: bool,
    throttle: ProgressThrottle,
}

impl<'a, W: Write> CliDriver<'a, W> {
    /// `interactive` tells whether standard input is a terminal; with no
    /// flags on an interactive terminal the help text is shown.
    pub fn new(app: &'a dyn Application, out: W, interactive: bool) -> Self {
        Self {
            app,
            out,
            interactive,
            throttle: ProgressThrottle::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Run with `args` (program name excluded). Failures are printed and
    /// written to the error log; they are returned as `Outcome::Failed`.
    pub fn run<S: AsRef<str>>(&mut self, args: &[S]) -> Outcome {
        let mut verbose = false;
        match self.try_run(args, &mut verbose) {
            Ok(outcome) => outcome,
            Err(err) => {
                self.report_failure(&err, verbose);
                Outcome::Failed(err.to_string())
            }
        }
    }

    fn try_run<S: AsRef<str>>(&mut self, args: &[S], verbose: &mut bool) -> Result<Outcome> {
        let conf = load_configuration(self.app)?;
        let options = self.app.option_set()?;
        let inputs = parse_arguments(&options, &conf, args)?;

        *verbose = inputs.flag(VERBOSE);
        if *verbose {
            init_logging();
        }
        let program = self.app.program();

        if inputs.flag(HELP) || (inputs.count() == 0 && self.interactive) {
            write!(self.out, "{}", render_help(program, &options))?;
            return Ok(Outcome::Help);
        }
        if inputs.flag(VERSION) {
            write!(self.out, "{}", render_version(program))?;
            return Ok(Outcome::Version);
        }
        if inputs.flag(LICENSE) {
            write!(self.out, "{}", render_license(program))?;
            return Ok(Outcome::License);
        }

        let quiet = inputs.flag(QUIET);
        if !quiet {
            writeln!(self.out)?;
        }

        let mut sink = ConsoleProgress::new(&mut self.out, &mut self.throttle, quiet);
        let message = invoke(self.app, inputs, &mut sink)?;
        sink.progress("", None);

        if !quiet {
            writeln!(self.out, "{}", message)?;
            writeln!(self.out)?;
        }
        Ok(Outcome::Completed(message))
    }

    fn report_failure(&mut self, err: &Error, verbose: bool) {
        debug!("Invocation failed: {:?}", err);
        let _ = writeln!(self.out, "{}", pad_line(&format!("ERROR: {}", err)));
        if verbose {
            let _ = writeln!(self.out, "{}", error_log::diagnostic(err));
        }
        if let Err(log_err) = error_log::record(self.app.program(), err) {
            let _ = writeln!(self.out, "{}", fit_line(&format!("ERROR: {}", log_err)));
        }
        let _ = self.out.flush();
    }
}

/// Pad to at least the console width so a pending progress line is erased.
fn pad_line(text: &str) -> String {
    let len = text.chars().count();
    if len >= LINE_WIDTH {
        return text.to_string();
    }
    fit(text, LINE_WIDTH)
}

fn init_logging() {
    // A subscriber may already be installed by the host program.
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(io::stderr)
        .try_init();
    info!("Verbose output enabled");
}

/// Run the CLI on the process streams.
pub fn run<S: AsRef<str>>(app: &dyn Application, args: &[S]) -> Outcome {
    let interactive = io::stdin().is_terminal();
    CliDriver::new(app, io::stdout().lock(), interactive).run(args)
}
