//! Test: validation and execution failures

use crate::helpers::*;
use text_pipeline::core::{IndentStyle, PipelineState, StepConfig};
use text_pipeline::error::{ConfigError, PipelineError, ProcessError, ScriptPhase};

#[test]
fn test_empty_pipeline_never_runs() {
    let engine = RecordingEngine::new();
    let mut pipeline = build_pipeline(&recording_factory(&engine), vec![]);

    assert!(matches!(pipeline.validate(), Err(PipelineError::EmptyPipeline)));
    assert!(matches!(pipeline.execute("input"), Err(PipelineError::EmptyPipeline)));
    assert_eq!(pipeline.state(), PipelineState::Empty);
    assert_eq!(engine.call_count(), 0);
}

#[test]
fn test_failing_step_stops_the_run() {
    let engine = RecordingEngine::new();
    let mut pipeline = build_pipeline(
        &recording_factory(&engine),
        vec![script_step("a"), script_step("b"), script_step(FAIL), script_step("c")],
    );

    let err = pipeline.execute(">").unwrap_err();
    match &err {
        PipelineError::StepExecutionFailed { index, name, cause } => {
            assert_eq!(*index, 2);
            assert_eq!(name, "script FAIL");
            assert!(matches!(cause, ProcessError::Script(e) if e.phase == ScriptPhase::Runtime));
        }
        other => panic!("unexpected error: {:?}", other),
    }

    assert_eq!(
        engine.calls(),
        vec![
            ("a".to_string(), ">".to_string()),
            ("b".to_string(), ">a".to_string()),
            (FAIL.to_string(), ">ab".to_string()),
        ]
    );
}

#[test]
fn test_invalid_step_blocks_every_step() {
    let engine = RecordingEngine::new();
    let mut pipeline = build_pipeline(
        &recording_factory(&engine),
        vec![script_step("a"), StepConfig::custom_script("Empty", "")],
    );

    match pipeline.execute("x") {
        Err(PipelineError::StepInvalid { index, name, cause }) => {
            assert_eq!(index, 1);
            assert_eq!(name, "Empty");
            assert!(matches!(cause, ConfigError::EmptyScript));
        }
        other => panic!("unexpected result: {:?}", other),
    }
    assert_eq!(engine.call_count(), 0);
    assert_eq!(pipeline.state(), PipelineState::Unvalidated);
}

#[test]
fn test_malformed_json_reports_offset() {
    let factory = recording_factory(&RecordingEngine::new());
    let mut pipeline = build_pipeline(&factory, vec![StepConfig::format_json(IndentStyle::TwoSpaces)]);

    match pipeline.execute("{bad json") {
        Err(PipelineError::StepExecutionFailed {
            index: 0,
            cause: ProcessError::MalformedJson { offset, detail },
            ..
        }) => {
            assert!(offset <= 2);
            assert!(!detail.is_empty());
        }
        other => panic!("unexpected result: {:?}", other),
    }
    assert_eq!(pipeline.step(0).unwrap().view_model().last_result(), None);
}

#[test]
fn test_error_message_names_step() {
    let engine = RecordingEngine::new();
    let mut pipeline = build_pipeline(&recording_factory(&engine), vec![script_step(FAIL)]);
    pipeline.step_mut(0).unwrap().display_name = Some("Explode".to_string());

    let message = pipeline.execute("x").unwrap_err().to_string();
    assert_eq!(message, "step 1 (Explode) failed: script error (runtime): requested failure");
}
