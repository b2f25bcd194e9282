//! Flat ini-style configuration.
//!
//! Sections are only a grouping aid: every key from every section lands in
//! one map and later sections win. Keys are lower-cased.
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Configuration {
    path: Option<PathBuf>,
    values: BTreeMap<String, String>,
}

impl Configuration {
    /// Configuration with no file behind it.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|_| Error::ConfigNotFound {
            path: path.display().to_string(),
        })?;
        let mut conf = Self::parse(&text, &path.display().to_string())?;
        conf.path = Some(path.to_path_buf());
        debug!("Loaded {} configuration value(s) from {:?}", conf.len(), path);
        Ok(conf)
    }

    /// Load `path` if given, otherwise an empty configuration.
    pub fn load_optional(path: Option<&str>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::empty()),
        }
    }

    /// Parse configuration text; `origin` names the source in error messages.
    pub fn parse(text: &str, origin: &str) -> Result<Self> {
        let mut defaults: BTreeMap<String, String> = BTreeMap::new();
        let mut values: BTreeMap<String, String> = BTreeMap::new();
        let mut in_defaults = false;
        let mut seen_section = false;
        let mut last_key: Option<String> = None;

        let syntax = |line: usize, text: &str| Error::ConfigSyntax {
            path: origin.to_string(),
            line,
            text: text.to_string(),
        };

        for (n, raw) in text.lines().enumerate() {
            let line_no = n + 1;
            let trimmed = raw.trim();

            if trimmed.is_empty() {
                last_key = None;
                continue;
            }
            if trimmed.starts_with('#') || trimmed.starts_with(';') {
                continue;
            }

            // Indented lines continue the previous value.
            if raw.starts_with(char::is_whitespace) {
                if let Some(key) = &last_key {
                    let target = if in_defaults { &mut defaults } else { &mut values };
                    if let Some(v) = target.get_mut(key) {
                        v.push('\n');
                        v.push_str(trimmed);
                        continue;
                    }
                }
            }

            if let Some(section) = trimmed.strip_prefix('[') {
                let name = section
                    .strip_suffix(']')
                    .ok_or_else(|| syntax(line_no, raw))?
                    .trim();
                in_defaults = name == "DEFAULT";
                seen_section = true;
                last_key = None;
                continue;
            }

            if !seen_section {
                return Err(syntax(line_no, raw));
            }

            let split = trimmed
                .find(['=', ':'])
                .ok_or_else(|| syntax(line_no, raw))?;
            let key = trimmed[..split].trim().to_lowercase();
            let value = trimmed[split + 1..].trim().to_string();
            if key.is_empty() {
                return Err(syntax(line_no, raw));
            }

            let target = if in_defaults { &mut defaults } else { &mut values };
            target.insert(key.clone(), value);
            last_key = Some(key);
        }

        defaults.extend(values);
        Ok(Self {
            path: None,
            values: defaults,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Name used in messages: the file path, or "configuration".
    pub fn origin(&self) -> String {
        self.path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "configuration".to_string())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Build the `ConfigInvalid` error for this file from accumulated problems.
    pub fn invalid(&self, message: impl Into<String>) -> Error {
        Error::ConfigInvalid {
            path: self.origin(),
            message: message.into(),
        }
    }
}
