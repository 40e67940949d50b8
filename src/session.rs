//! Application session: one pipeline, one processor store, one set of settings

use crate::core::{Pipeline, PipelineStep, StepConfig, StepKind};
use crate::error::{PipelineError, ProcessError, StoreError};
use crate::persistence::CustomProcessorStore;
use crate::processors::{self, ProcessorFactory};
use crate::script::BoaEngine;
use crate::settings::Settings;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Prefix of custom processor entries in [`Session::available_tools`]
pub const CUSTOM_TOOL_PREFIX: &str = "Custom: ";

/// Owns everything a front end works on
#[derive(Debug)]
pub struct Session {
    settings: Settings,
    factory: ProcessorFactory,
    pipeline: Pipeline,
    store: CustomProcessorStore,
}

impl Session {
    /// Open a session on the store under `settings.conf_dir`
    pub fn open(settings: Settings) -> Result<Self, StoreError> {
        let factory = ProcessorFactory::with_engine(Arc::new(BoaEngine::new(settings.script)));
        let store = CustomProcessorStore::open(&settings.conf_dir)?;
        Ok(Self::with_parts(settings, factory, store))
    }

    /// Assemble a session from existing parts
    pub fn with_parts(settings: Settings, factory: ProcessorFactory, store: CustomProcessorStore) -> Self {
        Self {
            settings,
            factory,
            pipeline: Pipeline::new("Pipeline"),
            store,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn factory(&self) -> &ProcessorFactory {
        &self.factory
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    pub fn pipeline_mut(&mut self) -> &mut Pipeline {
        &mut self.pipeline
    }

    pub fn store(&self) -> &CustomProcessorStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut CustomProcessorStore {
        &mut self.store
    }

    /// Built-in tools followed by one `Custom: <name>` entry per stored processor
    pub fn available_tools(&self) -> Vec<String> {
        let factory = &self.factory;
        let mut tools: Vec<String> = [StepKind::FormatJson, StepKind::SplitText, StepKind::JoinText]
            .into_iter()
            .map(|kind| factory.create(kind).name())
            .collect();
        tools.extend(
            self.store
                .processors()
                .into_iter()
                .map(|def| format!("{}{}", CUSTOM_TOOL_PREFIX, def.name)),
        );
        tools
    }

    /// Append a step and return its id
    pub fn add_step(&mut self, config: StepConfig, display_name: Option<&str>) -> Result<String, PipelineError> {
        let index = self.pipeline.len();
        let name = config.display_name();
        let id = self.pipeline.next_step_id();

        let mut step = PipelineStep::new(id.clone(), config, &self.factory)
            .map_err(|cause| PipelineError::StepInvalid { index, name, cause })?;
        if let Some(label) = display_name {
            step = step.with_display_name(label);
        }

        info!("Added step {} ({})", id, step.label());
        self.pipeline.add_step(step);
        Ok(id)
    }

    /// Append a step running the stored custom processor `name`
    pub fn add_custom_step(&mut self, name: &str, display_name: Option<&str>) -> Result<String, PipelineError> {
        let def = self
            .store
            .find(name)
            .ok_or_else(|| PipelineError::UnknownProcessor(name.to_string()))?;
        self.add_step(def.to_step_config(), display_name)
    }

    pub fn execute(&mut self, input: &str) -> Result<String, PipelineError> {
        self.pipeline.execute(input)
    }

    /// Replace the current pipeline with the one at `path`; unchanged on failure
    pub fn load_pipeline(&mut self, path: impl AsRef<Path>) -> Result<(), PipelineError> {
        self.pipeline.load_from_file(path, &self.factory)
    }

    pub fn save_pipeline(&self, path: impl AsRef<Path>) -> Result<(), PipelineError> {
        self.pipeline.save_to_file(path)
    }

    /// Try a script on `input` without storing it
    pub fn preview(&self, script: &str, input: &str) -> Result<String, ProcessError> {
        processors::preview(self.factory.engine(), script, input)
    }
}
