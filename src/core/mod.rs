//! Core domain models for the text pipeline
//!
//! This module defines the fundamental data structures that represent
//! pipelines, steps, and their configuration.

pub mod config;
pub mod pipeline;
pub mod state;
pub mod step;

pub use config::{
    CustomProcessorConfig, IndentStyle, JsonFormatterConfig, StepConfig, StepKind, TextJoinerConfig,
    TextSplitterConfig,
};
pub use pipeline::*;
pub use state::*;
pub use step::*;
