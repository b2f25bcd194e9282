//! The `Application` trait: everything a program supplies to the framework.
use std::path::Path;

use tracing::{debug, info};

use crate::core::action::Action;
use crate::core::config::Configuration;
use crate::core::inputs::InputMap;
use crate::core::options::OptionSet;
use crate::core::progress::ProgressSink;
use crate::error::Result;
use crate::types::{OptionDecl, ProgramInfo};
use crate::widgets::{Element, HelpBlock, default_layout};

pub trait Application: Send + Sync + 'static {
    fn program(&self) -> &ProgramInfo;

    /// Program-specific options; the reserved flags are added automatically.
    fn options(&self) -> Vec<OptionDecl> {
        Vec::new()
    }

    /// Reject a loaded configuration, typically with `Configuration::invalid`.
    fn validate_config(&self, _conf: &Configuration) -> Result<()> {
        Ok(())
    }

    /// Choose and construct the action for these inputs.
    fn action_for(&self, inputs: &InputMap) -> Result<Box<dyn Action>>;

    /// Widgets shown by the desktop front end.
    fn layout(&self, _conf: &Configuration) -> Result<Vec<Element>> {
        Ok(default_layout(&self.option_set()?))
    }

    /// Extra content for the help window.
    fn help(&self) -> Vec<HelpBlock> {
        Vec::new()
    }

    fn option_set(&self) -> Result<OptionSet> {
        OptionSet::with_reserved(self.options())
    }
}

/// An application whose `{path}` placeholders have been resolved.
pub struct Hosted<A> {
    inner: A,
    program: ProgramInfo,
}

impl<A: Application> Hosted<A> {
    pub fn new(inner: A, base: &Path) -> Self {
        let mut program = inner.program().clone();
        program.resolve_paths(base);
        Self { inner, program }
    }

    /// Resolve against the directory of the running executable.
    pub fn from_exe(inner: A) -> Self {
        let mut program = inner.program().clone();
        program.resolve_paths_from_exe();
        Self { inner, program }
    }

    pub fn inner(&self) -> &A {
        &self.inner
    }
}

impl<A: Application> Application for Hosted<A> {
    fn program(&self) -> &ProgramInfo {
        &self.program
    }

    fn options(&self) -> Vec<OptionDecl> {
        self.inner.options()
    }

    fn validate_config(&self, conf: &Configuration) -> Result<()> {
        self.inner.validate_config(conf)
    }

    fn action_for(&self, inputs: &InputMap) -> Result<Box<dyn Action>> {
        self.inner.action_for(inputs)
    }

    fn layout(&self, conf: &Configuration) -> Result<Vec<Element>> {
        self.inner.layout(conf)
    }

    fn help(&self) -> Vec<HelpBlock> {
        self.inner.help()
    }

    fn option_set(&self) -> Result<OptionSet> {
        self.inner.option_set()
    }
}

/// Load and validate the program's configuration.
pub fn load_configuration(app: &dyn Application) -> Result<Configuration> {
    let Some(path) = app.program().config.as_deref() else {
        return Ok(Configuration::empty());
    };
    let conf = Configuration::load(path)?;
    app.validate_config(&conf)?;
    Ok(conf)
}

/// Run one invocation: pick the action, then execute its lifecycle.
pub fn invoke(
    app: &dyn Application,
    mut inputs: InputMap,
    progress: &mut dyn ProgressSink,
) -> Result<String> {
    let mut action = app.action_for(&inputs)?;
    debug!("Invoking action for {}", app.program().name);
    let message = action.execute(&mut inputs, progress)?;
    info!("Action completed: {}", message);
    Ok(message)
}
