use std::fmt;
use std::sync::{Arc, Mutex};

use once_cell::sync::{Lazy, OnceCell};
use tracing::{Event, Subscriber, field::Visit};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry};

/// Entries kept in memory; older ones are dropped.
pub const MAX_LOG_ENTRIES: usize = 1000;

#[derive(Clone, Debug)]
pub struct LogEntry {
    pub level: tracing::Level,
    pub timestamp: String,
    pub message: String,
    pub target: String,
}

impl LogEntry {
    pub fn new(level: tracing::Level, message: String, target: String) -> Self {
        let timestamp = chrono::Local::now().format("%H:%M:%S").to_string();
        Self {
            level,
            timestamp,
            message,
            target,
        }
    }
}

static LOG_BUFFER: Lazy<Arc<Mutex<Vec<LogEntry>>>> = Lazy::new(|| Arc::new(Mutex::new(Vec::new())));

static LOGGING_INIT: OnceCell<()> = OnceCell::new();

/// Pending entries captured since the last drain.
pub fn get_log_buffer() -> Arc<Mutex<Vec<LogEntry>>> {
    LOG_BUFFER.clone()
}

/// Move pending entries onto `into`, keeping at most [`MAX_LOG_ENTRIES`].
pub fn drain_into(into: &mut Vec<LogEntry>) -> bool {
    let drained: Vec<LogEntry> = match LOG_BUFFER.lock() {
        Ok(mut buf) => buf.drain(..).collect(),
        Err(_) => return false,
    };
    if drained.is_empty() {
        return false;
    }
    into.extend(drained);
    trim(into);
    true
}

fn trim(entries: &mut Vec<LogEntry>) {
    let len = entries.len();
    if len > MAX_LOG_ENTRIES {
        entries.drain(0..(len - MAX_LOG_ENTRIES));
    }
}

/// Install the capturing subscriber once per process.
pub fn init_gui_logging() {
    LOGGING_INIT.get_or_init(|| {
        let mut filter = EnvFilter::new("debug");
        for directive in ["eframe=info", "winit=info", "wgpu=warn", "egui_glow=info"] {
            if let Ok(d) = directive.parse() {
                filter = filter.add_directive(d);
            }
        }
        let subscriber = Registry::default().with(GuiLogLayer::new()).with(filter);
        // A subscriber may already be installed by the host program.
        let _ = tracing::subscriber::set_global_default(subscriber);
    });
}

/// Captures events for the Log window.
#[derive(Default)]
pub struct GuiLogLayer;

impl GuiLogLayer {
    pub fn new() -> Self {
        Self
    }
}

struct MessageVisitor {
    message: String,
}

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        }
    }
}

impl<S> Layer<S> for GuiLogLayer
where
    S: Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();

        let mut visitor = MessageVisitor {
            message: String::new(),
        };
        event.record(&mut visitor);

        let message = if visitor.message.is_empty() {
            metadata.target().to_string()
        } else {
            visitor.message
        };
        let entry = LogEntry::new(*metadata.level(), message, metadata.target().to_string());

        if let Ok(mut buf) = LOG_BUFFER.lock() {
            buf.push(entry);
            trim(&mut buf);
        }
    }
}
