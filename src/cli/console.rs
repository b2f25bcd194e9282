use std::io::Write;

use crate::core::progress::{ProgressSink, ProgressThrottle, Timing};

/// Console width used for progress and error lines.
pub const LINE_WIDTH: usize = 80;

/// Pad to the console width and leave the last column free so `\r` can
/// return to the start of the same line.
pub fn fit_line(text: &str) -> String {
    super::help::fit(text, LINE_WIDTH)
        .chars()
        .take(LINE_WIDTH - 1)
        .collect()
}

/// Writes throttled progress updates over a single console line.
pub struct ConsoleProgress<'a, W: Write> {
    out: &'a mut W,
    throttle: &'a mut ProgressThrottle,
    quiet: bool,
}

impl<'a, W: Write> ConsoleProgress<'a, W> {
    pub fn new(out: &'a mut W, throttle: &'a mut ProgressThrottle, quiet: bool) -> Self {
        Self {
            out,
            throttle,
            quiet,
        }
    }
}

impl<W: Write> ProgressSink for ConsoleProgress<'_, W> {
    fn progress(&mut self, text: &str, timing: Option<Timing>) {
        if self.quiet {
            return;
        }
        if let Some(line) = self.throttle.update(text, timing) {
            // Progress output is best effort.
            let _ = write!(self.out, "{}\r", fit_line(&line));
            let _ = self.out.flush();
        }
    }
}
