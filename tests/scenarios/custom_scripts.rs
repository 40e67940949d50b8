//! Test: custom script steps on the real engine

use crate::helpers::*;
use std::sync::Arc;
use text_pipeline::core::StepConfig;
use text_pipeline::error::{PipelineError, ProcessError, ScriptError, ScriptPhase};
use text_pipeline::processors::ProcessorFactory;
use text_pipeline::script::{BoaEngine, ScriptLimits};

fn script_phase(err: PipelineError) -> ScriptPhase {
    match err {
        PipelineError::StepExecutionFailed {
            cause: ProcessError::Script(ScriptError { phase, .. }),
            ..
        } => phase,
        other => panic!("expected a script failure, got {:?}", other),
    }
}

#[test]
fn test_uppercase_script() {
    let mut pipeline = build_pipeline(
        &ProcessorFactory::default(),
        vec![StepConfig::custom_script("Upper", "return input.toUpperCase();")],
    );
    assert_eq!(pipeline.execute("hi").unwrap(), "HI");
}

#[test]
fn test_syntax_error_is_compile_failure() {
    let mut pipeline = build_pipeline(
        &ProcessorFactory::default(),
        vec![StepConfig::custom_script("Broken", "return input.toUpperCase(;")],
    );
    assert_eq!(script_phase(pipeline.execute("hi").unwrap_err()), ScriptPhase::Compile);
}

#[test]
fn test_explicit_process_function_is_not_wrapped() {
    let script = "function helper(s) { return s + '!'; }\nfunction process(input) { return helper(input); }";
    let mut pipeline = build_pipeline(
        &ProcessorFactory::default(),
        vec![StepConfig::custom_script("Shout", script)],
    );
    assert_eq!(pipeline.execute("hey").unwrap(), "hey!");
}

#[test]
fn test_const_and_let_entry_points() {
    let mut pipeline = build_pipeline(
        &ProcessorFactory::default(),
        vec![
            StepConfig::custom_script("Double", "const process = (s) => s.length * 2;"),
            StepConfig::custom_script("Mark", "let process = function (s) { return s + '!'; };"),
        ],
    );
    assert_eq!(pipeline.execute("abcd").unwrap(), "8!");
}

#[test]
fn test_globals_do_not_leak_between_steps() {
    let mut pipeline = build_pipeline(
        &ProcessorFactory::default(),
        vec![
            StepConfig::custom_script("Set", "globalThis.leak = 'set'; return input;"),
            StepConfig::custom_script("Read", "return typeof leak;"),
        ],
    );
    assert_eq!(pipeline.execute("x").unwrap(), "undefined");
}

#[test]
fn test_host_bindings_are_absent() {
    let mut pipeline = build_pipeline(
        &ProcessorFactory::default(),
        vec![StepConfig::custom_script(
            "Capabilities",
            "return [typeof require, typeof fetch, typeof console, typeof Deno].join(',');",
        )],
    );
    assert_eq!(
        pipeline.execute("").unwrap(),
        "undefined,undefined,undefined,undefined"
    );
}

#[test]
fn test_endless_loop_is_stopped_by_budget() {
    let limits = ScriptLimits {
        loop_iteration_limit: 10_000,
        recursion_limit: 64,
    };
    let factory = ProcessorFactory::with_engine(Arc::new(BoaEngine::new(limits)));
    let mut pipeline = build_pipeline(
        &factory,
        vec![StepConfig::custom_script("Spin", "while (true) {} return input;")],
    );
    assert_eq!(script_phase(pipeline.execute("x").unwrap_err()), ScriptPhase::Runtime);
}

#[test]
fn test_script_output_feeds_next_step() {
    let mut pipeline = build_pipeline(
        &ProcessorFactory::default(),
        vec![
            StepConfig::custom_script("Commas", "return input.split(' ').join(',');"),
            StepConfig::split_text(","),
            StepConfig::join_text(" / "),
        ],
    );
    assert_eq!(pipeline.execute("one two three").unwrap(), "one / two / three");
}
