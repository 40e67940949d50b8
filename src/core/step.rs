//! Step domain model

use crate::core::config::{StepConfig, StepKind};
use crate::error::ConfigError;
use crate::processors::{Processor, ProcessorFactory, ViewModel};

/// A single step in a pipeline
#[derive(Debug)]
pub struct PipelineStep {
    /// Step identifier, unique within its pipeline
    pub id: String,

    /// Optional label shown instead of the processor name
    pub display_name: Option<String>,

    /// Runtime processor; its view model holds the step configuration
    runtime: Box<dyn Processor>,
}

impl PipelineStep {
    /// Create a step, building its processor from `config`
    pub fn new(
        id: impl Into<String>,
        config: StepConfig,
        factory: &ProcessorFactory,
    ) -> Result<Self, ConfigError> {
        let runtime = factory.build(&config)?;
        Ok(Self {
            id: id.into(),
            display_name: None,
            runtime,
        })
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.display_name = if name.is_empty() { None } else { Some(name) };
        self
    }

    pub fn kind(&self) -> StepKind {
        self.runtime.kind()
    }

    /// Current configuration, read back from the processor
    pub fn config(&self) -> StepConfig {
        self.runtime.view_model().configuration()
    }

    pub fn set_config(&mut self, config: StepConfig) -> Result<(), ConfigError> {
        self.runtime.view_model_mut().load_configuration(&config)
    }

    pub fn processor(&self) -> &dyn Processor {
        self.runtime.as_ref()
    }

    pub fn view_model(&self) -> &dyn ViewModel {
        self.runtime.view_model()
    }

    pub fn view_model_mut(&mut self) -> &mut dyn ViewModel {
        self.runtime.view_model_mut()
    }

    /// Name used in listings and error messages
    pub fn label(&self) -> String {
        match &self.display_name {
            Some(name) => name.clone(),
            None => self.runtime.name(),
        }
    }
}
