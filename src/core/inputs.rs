use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::config::Configuration;
use crate::core::files;
use crate::error::Result;
use crate::types::InputValue;

/// Merged runtime inputs for one action invocation.
///
/// Seeded from configuration defaults, then overwritten by parsed command
/// line tokens or widget values. `count` holds the number of recognized
/// flags supplied on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputMap {
    values: BTreeMap<String, InputValue>,
    #[serde(rename = "_count")]
    count: usize,
}

impl InputMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every configuration key becomes a `Value` input.
    pub fn from_config(conf: &Configuration) -> Self {
        let values = conf
            .iter()
            .map(|(k, v)| (k.to_string(), InputValue::Value(v.to_string())))
            .collect();
        Self { values, count: 0 }
    }

    pub fn get(&self, name: &str) -> Option<&InputValue> {
        self.values.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut InputValue> {
        self.values.get_mut(name)
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<InputValue>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn remove(&mut self, name: &str) -> Option<InputValue> {
        self.values.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Boolean input; anything but `Flag(true)` reads as false.
    pub fn flag(&self, name: &str) -> bool {
        matches!(self.values.get(name), Some(InputValue::Flag(true)))
    }

    /// Single-value input; missing or non-string inputs read as "".
    pub fn value(&self, name: &str) -> &str {
        match self.values.get(name) {
            Some(InputValue::Value(s)) => s,
            _ => "",
        }
    }

    pub fn values(&self, name: &str) -> &[String] {
        match self.values.get(name) {
            Some(InputValue::Multiple(v)) => v,
            _ => &[],
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn set_count(&mut self, count: usize) {
        self.count = count;
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &InputValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Replace `name` with its expanded file list. See [`files::expand`].
    pub fn expand(&mut self, name: &str) -> Result<&[String]> {
        let current = self
            .values
            .remove(name)
            .unwrap_or(InputValue::Value(String::new()));
        let expanded = files::expand(&current)?;
        self.values
            .insert(name.to_string(), InputValue::Multiple(expanded));
        Ok(self.values(name))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
