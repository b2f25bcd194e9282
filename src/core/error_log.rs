//! Error reports and the optional error log file.
use std::error::Error as StdError;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use tracing::{debug, error};

use crate::error::Result;
use crate::types::ProgramInfo;

/// Diagnostic trace for `err`: its debug form followed by the cause chain.
pub fn diagnostic(err: &(dyn StdError + 'static)) -> String {
    let mut out = format!("{:?}", err);
    let mut source = err.source();
    if source.is_some() {
        out.push_str("\n\nCaused by:");
    }
    let mut i = 0;
    while let Some(cause) = source {
        let _ = write!(out, "\n    {}: {}", i, cause);
        source = cause.source();
        i += 1;
    }
    out
}

/// Full report as written to the error log.
pub fn render_report(program: &ProgramInfo, err: &(dyn StdError + 'static)) -> String {
    format!(
        "{} {} - {}\n\n{}\n\n{}\n",
        program.name,
        program.version,
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        err,
        diagnostic(err)
    )
}

/// Overwrite the error log at `path` with `report`.
pub fn write_error_log(path: &Path, report: &str) -> Result<()> {
    fs::write(path, report)?;
    debug!("Error log written to {:?}", path);
    Ok(())
}

/// Persist `err` to the program's error log, if one is configured.
///
/// A failure to write is returned so the caller can surface it; it never
/// replaces the original error.
pub fn record(program: &ProgramInfo, err: &(dyn StdError + 'static)) -> Result<()> {
    let Some(path) = program.error_log.as_deref() else {
        return Ok(());
    };
    let report = render_report(program, err);
    write_error_log(Path::new(path), &report).inspect_err(|e| {
        error!("Could not write error log {}: {}", path, e);
    })
}
