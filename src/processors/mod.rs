//! Processors: the runtime side of each step kind
//!
//! A [`Processor`] carries a name, a description and a [`ViewModel`]; the view
//! model holds the configuration and does the actual work. The pipeline only
//! talks to these two traits, so every step kind is handled the same way.

pub mod custom;
pub mod json_formatter;
pub mod presets;
pub mod text_joiner;
pub mod text_splitter;

pub use custom::{preview, CustomProcessor, CustomScriptViewModel};
pub use json_formatter::{JsonFormatter, JsonFormatterViewModel};
pub use text_joiner::{TextJoiner, TextJoinerViewModel};
pub use text_splitter::{TextSplitter, TextSplitterViewModel};

use crate::core::config::{StepConfig, StepKind};
use crate::error::{ConfigError, ProcessError};
use crate::script::{BoaEngine, ScriptEngine};
use std::fmt::Debug;
use std::sync::Arc;

/// Business logic of a processor: process, configure, validate
pub trait ViewModel: Debug + Send {
    /// Transform `input`; the output is also kept as the last result
    fn process(&mut self, input: &str) -> Result<String, ProcessError>;

    /// Current configuration
    fn configuration(&self) -> StepConfig;

    /// Replace the configuration; fails if the config is for another kind
    fn load_configuration(&mut self, config: &StepConfig) -> Result<(), ConfigError>;

    /// Check that the current configuration can run
    fn validate(&self) -> Result<(), ConfigError>;

    /// Output of the most recent successful `process` call
    fn last_result(&self) -> Option<&str>;
}

/// A runnable step kind
pub trait Processor: Debug + Send {
    fn name(&self) -> String;

    fn description(&self) -> &'static str;

    fn kind(&self) -> StepKind;

    fn view_model(&self) -> &dyn ViewModel;

    fn view_model_mut(&mut self) -> &mut dyn ViewModel;
}

/// Builds processors from step kinds and configurations
#[derive(Debug, Clone)]
pub struct ProcessorFactory {
    engine: Arc<dyn ScriptEngine>,
}

impl Default for ProcessorFactory {
    fn default() -> Self {
        Self::with_engine(Arc::new(BoaEngine::default()))
    }
}

impl ProcessorFactory {
    /// Factory whose custom processors run scripts on `engine`
    pub fn with_engine(engine: Arc<dyn ScriptEngine>) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> Arc<dyn ScriptEngine> {
        Arc::clone(&self.engine)
    }

    /// Create an unconfigured processor for `kind`
    pub fn create(&self, kind: StepKind) -> Box<dyn Processor> {
        match kind {
            StepKind::FormatJson => Box::new(JsonFormatter::new()),
            StepKind::SplitText => Box::new(TextSplitter::new()),
            StepKind::JoinText => Box::new(TextJoiner::new()),
            StepKind::CustomScript => Box::new(CustomProcessor::new(self.engine(), "", "")),
        }
    }

    /// Create a processor for the config's kind and load the config into it
    pub fn build(&self, config: &StepConfig) -> Result<Box<dyn Processor>, ConfigError> {
        let mut processor = self.create(config.kind());
        processor.view_model_mut().load_configuration(config)?;
        Ok(processor)
    }
}

/// Error for a config handed to the wrong view model
pub(crate) fn kind_mismatch(expected: StepKind, config: &StepConfig) -> ConfigError {
    ConfigError::KindMismatch {
        expected,
        found: config.kind(),
    }
}
