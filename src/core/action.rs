//! The action lifecycle shared by both front ends.
//!
//! An action standardizes its inputs, validates them and then performs the
//! task. A failure in any phase aborts the remaining ones.
use tracing::{debug, trace};

use crate::core::inputs::InputMap;
use crate::core::progress::ProgressSink;
use crate::error::{Error, Result};

pub trait Action: Send {
    /// Normalize raw inputs, e.g. expand file lists. Must only touch `inputs`.
    fn standardize(&mut self, _inputs: &mut InputMap) -> Result<()> {
        Ok(())
    }

    /// Reject missing or malformed inputs without performing the task.
    fn validate(&self, _inputs: &InputMap) -> Result<()> {
        Ok(())
    }

    /// Perform the task and return a message for the user.
    fn action(&mut self, inputs: &InputMap, progress: &mut dyn ProgressSink) -> Result<String>;

    /// Run the three phases in order.
    fn execute(&mut self, inputs: &mut InputMap, progress: &mut dyn ProgressSink) -> Result<String> {
        trace!("Standardizing inputs");
        self.standardize(inputs)?;
        trace!("Validating inputs");
        self.validate(inputs)?;
        debug!("Inputs accepted, performing action");
        self.action(inputs, progress)
    }
}

/// Collects validation problems and reports them together.
#[derive(Debug, Default)]
pub struct Problems {
    messages: Vec<String>,
}

impl Problems {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }

    /// Record `message` when `ok` is false.
    pub fn check(&mut self, ok: bool, message: impl Into<String>) {
        if !ok {
            self.push(message);
        }
    }

    /// Record `message` when the named value is empty.
    pub fn require(&mut self, inputs: &InputMap, name: &str, message: impl Into<String>) {
        self.check(!inputs.value(name).is_empty(), message);
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// One `Error::Validation` with the messages joined by newlines.
    pub fn into_result(self) -> Result<()> {
        if self.messages.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation(self.messages.join("\n")))
        }
    }
}
