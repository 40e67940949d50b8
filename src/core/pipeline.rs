//! Pipeline domain model

use crate::core::{state::PipelineState, step::PipelineStep};
use crate::error::PipelineError;
use crate::execution::PipelineExecutor;
use crate::persistence;
use crate::processors::ProcessorFactory;
use std::path::Path;

/// An ordered sequence of steps; order is execution order
#[derive(Debug, Default)]
pub struct Pipeline {
    /// Pipeline name
    pub name: String,

    steps: Vec<PipelineStep>,
}

impl Pipeline {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
        }
    }

    /// Build a pipeline from already constructed steps
    pub fn with_steps(name: impl Into<String>, steps: Vec<PipelineStep>) -> Self {
        Self {
            name: name.into(),
            steps,
        }
    }

    pub fn add_step(&mut self, step: PipelineStep) {
        self.steps.push(step);
    }

    /// Remove the step at `index`, if there is one
    pub fn remove_step(&mut self, index: usize) -> Option<PipelineStep> {
        if index < self.steps.len() {
            Some(self.steps.remove(index))
        } else {
            None
        }
    }

    /// Swap the step with its predecessor. Returns false when it is already first or out of range.
    pub fn move_step_up(&mut self, index: usize) -> bool {
        if index == 0 || index >= self.steps.len() {
            return false;
        }
        self.steps.swap(index - 1, index);
        true
    }

    /// Swap the step with its successor. Returns false when it is already last or out of range.
    pub fn move_step_down(&mut self, index: usize) -> bool {
        if index + 1 >= self.steps.len() {
            return false;
        }
        self.steps.swap(index, index + 1);
        true
    }

    pub fn step(&self, index: usize) -> Option<&PipelineStep> {
        self.steps.get(index)
    }

    pub fn step_mut(&mut self, index: usize) -> Option<&mut PipelineStep> {
        self.steps.get_mut(index)
    }

    pub fn steps(&self) -> &[PipelineStep] {
        &self.steps
    }

    pub(crate) fn steps_mut(&mut self) -> &mut [PipelineStep] {
        &mut self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Next free identifier of the form `step_<n>`
    pub fn next_step_id(&self) -> String {
        let mut n = self.steps.len() + 1;
        loop {
            let id = format!("step_{}", n);
            if !self.steps.iter().any(|s| s.id == id) {
                return id;
            }
            n += 1;
        }
    }

    /// Numbered step labels, e.g. `1. Text Splitter`
    pub fn display_steps(&self) -> Vec<String> {
        self.steps
            .iter()
            .enumerate()
            .map(|(i, step)| format!("{}. {}", i + 1, step.label()))
            .collect()
    }

    /// Current validation state, recomputed on every call
    pub fn state(&self) -> PipelineState {
        match self.validate() {
            Ok(()) => PipelineState::Validated,
            Err(PipelineError::EmptyPipeline) => PipelineState::Empty,
            Err(_) => PipelineState::Unvalidated,
        }
    }

    /// Validate every step in order, stopping at the first failure
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.steps.is_empty() {
            return Err(PipelineError::EmptyPipeline);
        }

        for (index, step) in self.steps.iter().enumerate() {
            step.view_model()
                .validate()
                .map_err(|cause| PipelineError::StepInvalid {
                    index,
                    name: step.label(),
                    cause,
                })?;
        }

        Ok(())
    }

    /// Run `input` through every step and return the final output
    pub fn execute(&mut self, input: &str) -> Result<String, PipelineError> {
        PipelineExecutor::new().execute(self, input)
    }

    /// Serialize to the pretty-printed JSON document
    pub fn to_json(&self) -> Result<String, PipelineError> {
        persistence::to_json(self)
    }

    pub fn from_json(json: &str, factory: &ProcessorFactory) -> Result<Self, PipelineError> {
        persistence::from_json(json, factory)
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), PipelineError> {
        persistence::save_pipeline(self, path.as_ref())
    }

    /// Read a pipeline document from disk
    pub fn from_file(path: impl AsRef<Path>, factory: &ProcessorFactory) -> Result<Self, PipelineError> {
        persistence::load_pipeline(path.as_ref(), factory)
    }

    /// Replace this pipeline with the one stored at `path`.
    ///
    /// On failure `self` is left exactly as it was.
    pub fn load_from_file(
        &mut self,
        path: impl AsRef<Path>,
        factory: &ProcessorFactory,
    ) -> Result<(), PipelineError> {
        *self = Self::from_file(path, factory)?;
        Ok(())
    }
}
