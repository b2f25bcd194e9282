//! Shared types used across hydra.
//! Includes option declarations (`OptionDecl`, `OptionKind`), runtime input
//! values (`InputValue`) and the program constants (`ProgramInfo`).
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

use crate::error::Error;

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionKind {
    /// Present or absent; never takes a value.
    Boolean,
    /// Takes exactly one value; the last occurrence wins.
    Value,
    /// Collects every value following the flag.
    Multiple,
}

impl std::fmt::Display for OptionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OptionKind::Boolean => "boolean",
            OptionKind::Value => "value",
            OptionKind::Multiple => "multiple",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for OptionKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "boolean" => Ok(OptionKind::Boolean),
            "value" => Ok(OptionKind::Value),
            "multiple" => Ok(OptionKind::Multiple),
            other => Err(Error::InvalidKind(other.to_string())),
        }
    }
}

/// Static description of one command line flag (and, by default, one widget).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionDecl {
    pub long: String,
    pub short: Option<char>,
    pub description: String,
    pub kind: OptionKind,
}

impl OptionDecl {
    pub fn new(
        long: impl Into<String>,
        short: impl Into<Option<char>>,
        description: impl Into<String>,
        kind: OptionKind,
    ) -> Self {
        Self {
            long: long.into(),
            short: short.into(),
            description: description.into(),
            kind,
        }
    }

    pub fn boolean(long: &str, short: impl Into<Option<char>>, description: &str) -> Self {
        Self::new(long, short, description, OptionKind::Boolean)
    }

    pub fn value(long: &str, short: impl Into<Option<char>>, description: &str) -> Self {
        Self::new(long, short, description, OptionKind::Value)
    }

    pub fn multiple(long: &str, short: impl Into<Option<char>>, description: &str) -> Self {
        Self::new(long, short, description, OptionKind::Multiple)
    }
}

/// Current value of one input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InputValue {
    Flag(bool),
    Value(String),
    Multiple(Vec<String>),
}

impl InputValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            InputValue::Value(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            InputValue::Flag(b) => !b,
            InputValue::Value(s) => s.is_empty(),
            InputValue::Multiple(v) => v.is_empty(),
        }
    }
}

impl From<bool> for InputValue {
    fn from(b: bool) -> Self {
        InputValue::Flag(b)
    }
}

impl From<&str> for InputValue {
    fn from(s: &str) -> Self {
        InputValue::Value(s.to_string())
    }
}

impl From<String> for InputValue {
    fn from(s: String) -> Self {
        InputValue::Value(s)
    }
}

impl From<Vec<String>> for InputValue {
    fn from(v: Vec<String>) -> Self {
        InputValue::Multiple(v)
    }
}

/// Placeholder in `ProgramInfo` paths, replaced by the executable's directory.
pub const PATH_PLACEHOLDER: &str = "{path}";

/// Program constants shown in help, version, license and about texts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgramInfo {
    pub name: String,
    pub version: String,
    pub date: String,
    pub purpose: String,
    pub url: Option<String>,
    pub copyright: String,
    pub license: Option<String>,
    /// Usage lines; separate several commands with `\n`.
    pub usage: String,
    /// Configuration file supplying option defaults
    pub config: Option<String>,
    /// Error log written on failure
    pub error_log: Option<String>,
    /// Window icon (GUI only)
    pub icon_file: Option<String>,
}

impl ProgramInfo {
    /// Replace `{path}` in the configured paths with `base`.
    pub fn resolve_paths(&mut self, base: &Path) {
        let mut base = base.to_string_lossy().into_owned();
        if !base.is_empty() && !base.ends_with(std::path::MAIN_SEPARATOR) {
            base.push(std::path::MAIN_SEPARATOR);
        }
        for slot in [&mut self.config, &mut self.error_log, &mut self.icon_file] {
            if let Some(p) = slot.as_mut() {
                *p = p.replace(PATH_PLACEHOLDER, &base);
            }
        }
    }

    /// Resolve `{path}` against the directory holding the running executable.
    pub fn resolve_paths_from_exe(&mut self) {
        let dir = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
            .unwrap_or_default();
        self.resolve_paths(&dir);
    }
}
