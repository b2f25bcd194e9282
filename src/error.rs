//! Crate-level error type and `Result` alias for stable, structured error handling.
//! Covers configuration loading and validation, argument parsing, input
//! validation raised by actions, and task execution failures.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{path} not found.")]
    ConfigNotFound { path: String },

    #[error("Malformed line {line} in {path}: {text}")]
    ConfigSyntax {
        path: String,
        line: usize,
        text: String,
    },

    #[error("The following errors occurred when parsing {path}\n\n{message}")]
    ConfigInvalid { path: String, message: String },

    #[error("Unknown argument: {0}")]
    UnknownArgument(String),

    #[error("Invalid argument type: {0}")]
    InvalidKind(String),

    #[error("Duplicate option declaration: {0}")]
    DuplicateOption(String),

    #[error("Invalid option name: {0:?}")]
    InvalidOption(String),

    /// Raised by `Action::validate`; the message may span several lines.
    #[error("{0}")]
    Validation(String),

    /// Raised by `Action::action`.
    #[error("{0}")]
    Action(String),

    #[error("Empty STDIN")]
    EmptyStdin,

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("External error: {0}")]
    External(String),
}

impl Error {
    pub fn external<E: std::fmt::Display>(e: E) -> Self {
        Error::External(e.to_string())
    }

    pub fn action<S: Into<String>>(message: S) -> Self {
        Error::Action(message.into())
    }
}
