//! Error types shared by the pipeline, processors, script engine and store

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while running or loading a pipeline
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("pipeline must contain at least one step")]
    EmptyPipeline,

    #[error("unknown step type: {0}")]
    UnknownStepKind(String),

    #[error("step {} ({name}) is invalid: {cause}", .index + 1)]
    StepInvalid {
        index: usize,
        name: String,
        #[source]
        cause: ConfigError,
    },

    #[error("step {} ({name}) failed: {cause}", .index + 1)]
    StepExecutionFailed {
        index: usize,
        name: String,
        #[source]
        cause: ProcessError,
    },

    #[error("configuration of step {} could not be loaded: {cause}", .index + 1)]
    ConfigDecode {
        index: usize,
        #[source]
        cause: ConfigError,
    },

    #[error("malformed pipeline document: {0}")]
    Document(#[from] serde_json::Error),

    #[error("I/O error on {}: {cause}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        cause: std::io::Error,
    },

    #[error("no custom processor named '{0}'")]
    UnknownProcessor(String),
}

/// Errors raised when a step configuration is decoded, loaded or validated
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("processor name cannot be empty")]
    EmptyName,

    #[error("script cannot be empty")]
    EmptyScript,

    #[error("invalid indentation type: {0}")]
    InvalidIndent(String),

    #[error("expected a {expected} configuration, got {found}")]
    KindMismatch {
        expected: crate::core::StepKind,
        found: crate::core::StepKind,
    },

    #[error("invalid configuration: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Errors raised by a processor while transforming its input
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("malformed JSON at offset {offset}: {detail}")]
    MalformedJson { offset: usize, detail: String },

    #[error(transparent)]
    Script(#[from] ScriptError),
}

/// Phase of script execution in which a failure happened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptPhase {
    /// The script text failed to parse or to load into the interpreter
    Compile,
    /// No callable was bound to `process` after loading
    MissingProcess,
    /// The `process` call raised during evaluation
    Runtime,
}

impl fmt::Display for ScriptPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let phase = match self {
            ScriptPhase::Compile => "compile",
            ScriptPhase::MissingProcess => "missing process function",
            ScriptPhase::Runtime => "runtime",
        };
        f.write_str(phase)
    }
}

/// A custom script failure
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("script error ({phase}): {message}")]
pub struct ScriptError {
    pub phase: ScriptPhase,
    pub message: String,
}

impl ScriptError {
    pub fn new(phase: ScriptPhase, message: impl Into<String>) -> Self {
        Self {
            phase,
            message: message.into(),
        }
    }
}

/// Errors raised by the custom processor store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O error on {}: {cause}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        cause: std::io::Error,
    },

    #[error("could not encode {}: {cause}", .path.display())]
    Encode {
        path: PathBuf,
        #[source]
        cause: serde_json::Error,
    },

    #[error("no custom processor at index {index} (store holds {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error(transparent)]
    Invalid(#[from] ConfigError),
}
