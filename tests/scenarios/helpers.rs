//! Test utility functions for text-pipeline

use text_pipeline::core::{Pipeline, PipelineStep, StepConfig};
use text_pipeline::error::{ScriptError, ScriptPhase};
use text_pipeline::processors::ProcessorFactory;
use text_pipeline::script::ScriptEngine;

use std::sync::{Arc, Mutex};

/// Script that makes [`RecordingEngine`] fail
pub const FAIL: &str = "FAIL";

/// Script engine double that records every call.
///
/// Each run appends the script text to the input; the script [`FAIL`]
/// raises a runtime error instead.
#[derive(Debug, Default)]
pub struct RecordingEngine {
    calls: Mutex<Vec<(String, String)>>,
}

impl RecordingEngine {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// `(script, input)` pairs in call order
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl ScriptEngine for RecordingEngine {
    fn run(&self, script: &str, input: &str) -> Result<String, ScriptError> {
        self.calls
            .lock()
            .unwrap()
            .push((script.to_string(), input.to_string()));

        if script == FAIL {
            return Err(ScriptError::new(ScriptPhase::Runtime, "requested failure"));
        }
        Ok(format!("{}{}", input, script))
    }
}

/// Factory whose custom steps run on `engine`
pub fn recording_factory(engine: &Arc<RecordingEngine>) -> ProcessorFactory {
    let engine: Arc<dyn ScriptEngine> = engine.clone();
    ProcessorFactory::with_engine(engine)
}

/// Build a pipeline with ids `step_1..step_n`
pub fn build_pipeline(factory: &ProcessorFactory, configs: Vec<StepConfig>) -> Pipeline {
    let mut pipeline = Pipeline::new("scenario");
    for config in configs {
        let step = PipelineStep::new(pipeline.next_step_id(), config, factory).expect("config matches its kind");
        pipeline.add_step(step);
    }
    pipeline
}

/// Custom step config with a generated name
pub fn script_step(script: &str) -> StepConfig {
    StepConfig::custom_script(format!("script {}", script), script)
}
