//! text-pipeline - ordered text transformation pipelines with scriptable steps

pub mod cli;
pub mod core;
pub mod error;
pub mod execution;
pub mod persistence;
pub mod processors;
pub mod script;
pub mod session;
pub mod settings;

// Re-export commonly used types
pub use core::{IndentStyle, Pipeline, PipelineState, PipelineStep, StepConfig, StepKind};
pub use error::{ConfigError, PipelineError, ProcessError, ScriptError, ScriptPhase, StoreError};
pub use execution::{ExecutionEvent, PipelineExecutor};
pub use persistence::{CustomProcessorDefinition, CustomProcessorStore};
pub use processors::{Processor, ProcessorFactory, ViewModel};
pub use script::{BoaEngine, ScriptEngine, ScriptLimits};
pub use session::Session;
pub use settings::Settings;
