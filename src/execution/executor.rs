//! Pipeline executor - folds the input through every step in order

use crate::core::Pipeline;
use crate::error::PipelineError;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Events that can occur during pipeline execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionEvent {
    PipelineStarted {
        pipeline_name: String,
        step_count: usize,
    },
    StepStarted {
        index: usize,
        step_id: String,
        name: String,
    },
    StepCompleted {
        index: usize,
        step_id: String,
        output_len: usize,
    },
    StepFailed {
        index: usize,
        step_id: String,
        error: String,
    },
    PipelineCompleted {
        pipeline_name: String,
        success: bool,
    },
}

/// Type for event handlers
pub type EventHandler = Arc<dyn Fn(ExecutionEvent) + Send + Sync>;

/// Runs pipelines, reporting progress to the registered handlers
#[derive(Default)]
pub struct PipelineExecutor {
    event_handlers: Vec<EventHandler>,
}

impl fmt::Debug for PipelineExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineExecutor")
            .field("event_handlers", &self.event_handlers.len())
            .finish()
    }
}

impl PipelineExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an event handler
    pub fn add_event_handler<F>(&mut self, handler: F)
    where
        F: Fn(ExecutionEvent) + Send + Sync + 'static,
    {
        self.event_handlers.push(Arc::new(handler));
    }

    fn emit_event(&self, event: ExecutionEvent) {
        for handler in &self.event_handlers {
            handler(event.clone());
        }
    }

    /// Validate `pipeline`, then run `input` through its steps.
    ///
    /// Nothing runs when validation fails. The first failing step stops the
    /// run and no intermediate output is returned.
    pub fn execute(&self, pipeline: &mut Pipeline, input: &str) -> Result<String, PipelineError> {
        if let Err(e) = pipeline.validate() {
            warn!("Pipeline '{}' failed validation: {}", pipeline.name, e);
            return Err(e);
        }

        let pipeline_name = pipeline.name.clone();
        info!("Starting pipeline execution: {} ({} steps)", pipeline_name, pipeline.len());
        self.emit_event(ExecutionEvent::PipelineStarted {
            pipeline_name: pipeline_name.clone(),
            step_count: pipeline.len(),
        });

        let mut current = input.to_string();
        for (index, step) in pipeline.steps_mut().iter_mut().enumerate() {
            let name = step.label();
            debug!("Executing step {} ({}): {}", index + 1, step.id, name);
            self.emit_event(ExecutionEvent::StepStarted {
                index,
                step_id: step.id.clone(),
                name: name.clone(),
            });

            match step.view_model_mut().process(&current) {
                Ok(output) => {
                    self.emit_event(ExecutionEvent::StepCompleted {
                        index,
                        step_id: step.id.clone(),
                        output_len: output.len(),
                    });
                    current = output;
                }
                Err(cause) => {
                    warn!("Step {} ({}) failed: {}", index + 1, name, cause);
                    self.emit_event(ExecutionEvent::StepFailed {
                        index,
                        step_id: step.id.clone(),
                        error: cause.to_string(),
                    });
                    self.emit_event(ExecutionEvent::PipelineCompleted {
                        pipeline_name,
                        success: false,
                    });
                    return Err(PipelineError::StepExecutionFailed { index, name, cause });
                }
            }
        }

        info!("Pipeline '{}' completed", pipeline_name);
        self.emit_event(ExecutionEvent::PipelineCompleted {
            pipeline_name,
            success: true,
        });
        Ok(current)
    }
}
