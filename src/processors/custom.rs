//! Custom script processor

use super::{kind_mismatch, Processor, ViewModel};
use crate::core::config::{CustomProcessorConfig, StepConfig, StepKind};
use crate::error::{ConfigError, ProcessError, ScriptError, ScriptPhase};
use crate::script::ScriptEngine;
use std::sync::Arc;

/// Processor whose transform is a user script
#[derive(Debug)]
pub struct CustomProcessor {
    view_model: CustomScriptViewModel,
}

impl CustomProcessor {
    pub fn new(engine: Arc<dyn ScriptEngine>, name: impl Into<String>, script: impl Into<String>) -> Self {
        Self {
            view_model: CustomScriptViewModel::new(engine, name, script),
        }
    }
}

impl Processor for CustomProcessor {
    fn name(&self) -> String {
        if self.view_model.name.is_empty() {
            "Custom Processor".to_string()
        } else {
            self.view_model.name.clone()
        }
    }

    fn description(&self) -> &'static str {
        "Custom processor driven by a JavaScript function"
    }

    fn kind(&self) -> StepKind {
        StepKind::CustomScript
    }

    fn view_model(&self) -> &dyn ViewModel {
        &self.view_model
    }

    fn view_model_mut(&mut self) -> &mut dyn ViewModel {
        &mut self.view_model
    }
}

#[derive(Debug)]
pub struct CustomScriptViewModel {
    engine: Arc<dyn ScriptEngine>,
    name: String,
    script: String,
    last_result: Option<String>,
}

impl CustomScriptViewModel {
    pub fn new(engine: Arc<dyn ScriptEngine>, name: impl Into<String>, script: impl Into<String>) -> Self {
        Self {
            engine,
            name: name.into(),
            script: script.into(),
            last_result: None,
        }
    }
}

impl ViewModel for CustomScriptViewModel {
    fn process(&mut self, input: &str) -> Result<String, ProcessError> {
        if self.script.is_empty() {
            return Err(ScriptError::new(ScriptPhase::Compile, "no script defined").into());
        }
        let output = self.engine.run(&self.script, input)?;
        self.last_result = Some(output.clone());
        Ok(output)
    }

    fn configuration(&self) -> StepConfig {
        StepConfig::CustomScript(CustomProcessorConfig {
            name: self.name.clone(),
            script: self.script.clone(),
        })
    }

    fn load_configuration(&mut self, config: &StepConfig) -> Result<(), ConfigError> {
        match config {
            StepConfig::CustomScript(c) => {
                self.name = c.name.clone();
                self.script = c.script.clone();
                Ok(())
            }
            other => Err(kind_mismatch(StepKind::CustomScript, other)),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        CustomProcessorConfig {
            name: self.name.clone(),
            script: self.script.clone(),
        }
        .validate()
    }

    fn last_result(&self) -> Option<&str> {
        self.last_result.as_deref()
    }
}

/// Run `script` once on `input` through a throwaway view model
pub fn preview(engine: Arc<dyn ScriptEngine>, script: &str, input: &str) -> Result<String, ProcessError> {
    CustomScriptViewModel::new(engine, "Preview", script).process(input)
}
