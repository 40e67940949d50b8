//! Script execution for custom processors
//!
//! A custom processor's script is turned into a `process(input)` function and
//! run in a fresh interpreter per call. The [`ScriptEngine`] trait is the only
//! thing the rest of the crate sees, so the interpreter (and its execution
//! budget) can change without touching the pipeline.

pub mod boa;

pub use boa::BoaEngine;

use crate::error::ScriptError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::sync::OnceLock;

/// Trait for running a user script against one input string
pub trait ScriptEngine: Debug + Send + Sync {
    /// Run `script` with `input` bound and return the textual result
    fn run(&self, script: &str, input: &str) -> Result<String, ScriptError>;
}

/// Execution budget applied to every script run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptLimits {
    /// Maximum iterations of any single loop
    ///
    /// Counted per loop, not per script: nested loops multiply, and iteration
    /// done inside built-ins (`Array.prototype.fill`, `String.prototype.repeat`)
    /// is not counted at all.
    pub loop_iteration_limit: u64,

    /// Maximum call depth
    pub recursion_limit: usize,
}

impl Default for ScriptLimits {
    fn default() -> Self {
        Self {
            loop_iteration_limit: 10_000_000,
            recursion_limit: 512,
        }
    }
}

/// Default entry point appended when a script never defines `process`
const DEFAULT_PROCESS: &str = "function process(input) { return input; }";

fn defines_process() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\bfunction\s+process\b|\b(?:var|let|const)\s+process\s*=").expect("process pattern is valid")
    })
}

/// Normalize a user script so that it defines `process(input)`
///
/// A bare statement sequence (no `function` keyword and no arrow) becomes the
/// body of `process`. Anything that still lacks a `process` definition gets a
/// pass-through default appended.
pub fn prepare_script(script: &str) -> String {
    let mut prepared = if !script.contains("function") && !script.contains("=>") {
        format!("function process(input) {{ {} }}", script)
    } else {
        script.to_string()
    };

    if !defines_process().is_match(&prepared) {
        prepared.push('\n');
        prepared.push_str(DEFAULT_PROCESS);
    }

    prepared
}
