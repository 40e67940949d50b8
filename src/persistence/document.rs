//! JSON pipeline documents
//!
//! ```json
//! {
//!   "name": "csv to list",
//!   "steps": [
//!     {"id": "step_1", "type": "text_splitter", "config": {"Delimiter": ","}, "name": ""}
//!   ]
//! }
//! ```
//!
//! `config` carries only the fields of the step's kind; the kind itself
//! travels in the sibling `type` field.

use super::write_atomic;
use crate::core::{Pipeline, PipelineStep, StepConfig, StepKind};
use crate::error::PipelineError;
use crate::processors::ProcessorFactory;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use tracing::{debug, info};

/// Serialized form of a [`Pipeline`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineDocument {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub steps: Vec<StepRecord>,
}

/// Serialized form of a [`PipelineStep`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    #[serde(default)]
    pub id: String,

    /// Step kind tag, kept as text so unknown kinds get a dedicated error
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default)]
    pub config: Value,

    /// Display name; empty when the processor name is used
    #[serde(default)]
    pub name: String,
}

impl PipelineDocument {
    pub fn from_pipeline(pipeline: &Pipeline) -> Result<Self, PipelineError> {
        let steps = pipeline
            .steps()
            .iter()
            .map(|step| {
                Ok(StepRecord {
                    id: step.id.clone(),
                    kind: step.kind().as_str().to_string(),
                    config: step.config().to_value()?,
                    name: step.display_name.clone().unwrap_or_default(),
                })
            })
            .collect::<Result<Vec<_>, serde_json::Error>>()?;

        Ok(Self {
            name: pipeline.name.clone(),
            steps,
        })
    }

    /// Rebuild a runnable pipeline. The first bad step aborts the whole load.
    pub fn into_pipeline(self, factory: &ProcessorFactory) -> Result<Pipeline, PipelineError> {
        let mut steps = Vec::with_capacity(self.steps.len());

        for (index, record) in self.steps.into_iter().enumerate() {
            let kind: StepKind = record
                .kind
                .parse()
                .map_err(PipelineError::UnknownStepKind)?;

            let config = StepConfig::decode(kind, record.config)
                .map_err(|cause| PipelineError::ConfigDecode { index, cause })?;

            let step = PipelineStep::new(record.id, config, factory)
                .map_err(|cause| PipelineError::ConfigDecode { index, cause })?
                .with_display_name(record.name);

            debug!("Loaded step {} ({})", index + 1, step.label());
            steps.push(step);
        }

        Ok(Pipeline::with_steps(self.name, steps))
    }
}

pub fn to_json(pipeline: &Pipeline) -> Result<String, PipelineError> {
    let document = PipelineDocument::from_pipeline(pipeline)?;
    Ok(serde_json::to_string_pretty(&document)?)
}

pub fn from_json(json: &str, factory: &ProcessorFactory) -> Result<Pipeline, PipelineError> {
    let document: PipelineDocument = serde_json::from_str(json)?;
    document.into_pipeline(factory)
}

/// Write `pipeline` to `path`, replacing any previous file atomically
pub fn save_pipeline(pipeline: &Pipeline, path: &Path) -> Result<(), PipelineError> {
    let json = to_json(pipeline)?;
    write_atomic(path, json.as_bytes()).map_err(|cause| PipelineError::Io {
        path: path.to_path_buf(),
        cause,
    })?;
    info!("Saved pipeline '{}' to {}", pipeline.name, path.display());
    Ok(())
}

pub fn load_pipeline(path: &Path, factory: &ProcessorFactory) -> Result<Pipeline, PipelineError> {
    let json = std::fs::read_to_string(path).map_err(|cause| PipelineError::Io {
        path: path.to_path_buf(),
        cause,
    })?;
    let pipeline = from_json(&json, factory)?;
    info!(
        "Loaded pipeline '{}' ({} steps) from {}",
        pipeline.name,
        pipeline.len(),
        path.display()
    );
    Ok(pipeline)
}
