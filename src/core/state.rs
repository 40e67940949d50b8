//! Pipeline validation state

use serde::{Deserialize, Serialize};

/// Where a pipeline stands with respect to validation
///
/// Computed on demand by [`Pipeline::state`](crate::core::Pipeline::state);
/// nothing is cached between calls, and execution validates again anyway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelineState {
    /// No steps; can never run
    Empty,
    /// At least one step fails validation
    Unvalidated,
    /// Every step passed validation
    Validated,
}

impl PipelineState {
    pub fn is_runnable(&self) -> bool {
        matches!(self, PipelineState::Validated)
    }
}
