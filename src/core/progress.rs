//! Progress text formatting and throttling.
//!
//! Both front ends feed progress updates through [`format_progress`], which
//! suppresses updates arriving within [`MIN_UPDATE_INTERVAL_MS`] of the
//! previous one and, when timing information is supplied, appends elapsed
//! time, estimated remaining time and percentage complete.

/// Minimum spacing between two emitted updates.
pub const MIN_UPDATE_INTERVAL_MS: i64 = 100;

/// Timing details attached to a progress update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// Unix timestamp in milliseconds when the task started.
    pub started_ms: i64,
    pub processed: u64,
    pub total: u64,
}

impl Timing {
    pub fn new(started_ms: i64, processed: u64, total: u64) -> Self {
        Self {
            started_ms,
            processed,
            total,
        }
    }

    fn is_complete(&self) -> bool {
        self.processed == self.total
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressUpdate {
    pub timestamp_ms: i64,
    pub text: String,
}

/// Current Unix time in milliseconds.
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Format a progress update at the current time. See [`format_progress_at`].
pub fn format_progress(
    last_update_ms: i64,
    text: &str,
    timing: Option<Timing>,
) -> Option<ProgressUpdate> {
    format_progress_at(now_ms(), last_update_ms, text, timing)
}

/// Format a progress update as of `now_ms`.
///
/// Returns `None` when the update should be suppressed: fewer than
/// [`MIN_UPDATE_INTERVAL_MS`] elapsed since `last_update_ms`, timing was
/// given, and the task is not complete.
pub fn format_progress_at(
    now_ms: i64,
    last_update_ms: i64,
    text: &str,
    timing: Option<Timing>,
) -> Option<ProgressUpdate> {
    let due = now_ms - last_update_ms >= MIN_UPDATE_INTERVAL_MS;
    let text = match timing {
        None => text.to_string(),
        Some(t) if due || t.is_complete() => format!("{}{}", text, timing_suffix(now_ms, &t)),
        Some(_) => return None,
    };

    Some(ProgressUpdate {
        timestamp_ms: now_ms,
        text,
    })
}

fn timing_suffix(now_ms: i64, t: &Timing) -> String {
    let elapsed = (now_ms - t.started_ms).max(0) as f64 / 1000.0;
    let remaining = if t.processed == 0 {
        0.0
    } else {
        elapsed / t.processed as f64 * t.total.saturating_sub(t.processed) as f64
    };
    let percent = if t.total == 0 {
        0
    } else {
        100 * t.processed / t.total
    };

    format!(
        " | Time: {}/{} | Progress: {}%",
        format_clock(elapsed),
        format_clock(remaining),
        percent
    )
}

/// Render seconds as `MM:SS`, or `H:MM:SS` from one hour up.
pub fn format_clock(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    let (h, m, s) = (total / 3600, (total / 60) % 60, total % 60);
    if total >= 3600 {
        format!("{}:{:02}:{:02}", h, m, s)
    } else {
        format!("{:02}:{:02}", m, s)
    }
}

/// Caller-held throttle state: the timestamp of the last emitted update.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProgressThrottle {
    pub last_update_ms: i64,
}

impl ProgressThrottle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Format `text`, recording the emission time; `None` when suppressed.
    pub fn update(&mut self, text: &str, timing: Option<Timing>) -> Option<String> {
        self.update_at(now_ms(), text, timing)
    }

    pub fn update_at(&mut self, now_ms: i64, text: &str, timing: Option<Timing>) -> Option<String> {
        let update = format_progress_at(now_ms, self.last_update_ms, text, timing)?;
        self.last_update_ms = update.timestamp_ms;
        Some(update.text)
    }
}

/// Receives progress updates from a running action.
pub trait ProgressSink {
    fn progress(&mut self, text: &str, timing: Option<Timing>);
}

impl<F> ProgressSink for F
where
    F: FnMut(&str, Option<Timing>),
{
    fn progress(&mut self, text: &str, timing: Option<Timing>) {
        self(text, timing)
    }
}
