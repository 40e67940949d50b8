//! Pipeline execution

pub mod executor;

pub use executor::{EventHandler, ExecutionEvent, PipelineExecutor};
