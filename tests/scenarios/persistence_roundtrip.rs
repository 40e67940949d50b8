//! Test: saving and loading pipeline files

use crate::helpers::*;
use tempfile::tempdir;
use text_pipeline::core::{IndentStyle, Pipeline, StepConfig};
use text_pipeline::error::PipelineError;
use text_pipeline::processors::ProcessorFactory;

fn sample(factory: &ProcessorFactory) -> Pipeline {
    let mut pipeline = build_pipeline(
        factory,
        vec![
            StepConfig::split_text(","),
            StepConfig::custom_script("Upper", "return input.toUpperCase();"),
            StepConfig::join_text(" | "),
        ],
    );
    pipeline.name = "csv".to_string();
    pipeline.step_mut(1).unwrap().display_name = Some("Shout".to_string());
    pipeline
}

#[test]
fn test_reloaded_pipeline_behaves_the_same() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("csv.json");
    let factory = ProcessorFactory::default();

    let mut original = sample(&factory);
    original.save_to_file(&path).unwrap();
    let mut reloaded = Pipeline::from_file(&path, &factory).unwrap();

    assert!(reloaded.validate().is_ok());
    assert_eq!(reloaded.name, "csv");
    assert_eq!(reloaded.display_steps(), original.display_steps());
    for input in ["a, b ,c", "", ",,", "single"] {
        assert_eq!(original.execute(input).unwrap(), reloaded.execute(input).unwrap());
    }
}

#[test]
fn test_unknown_kind_leaves_pipeline_untouched() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.json");
    std::fs::write(
        &path,
        r#"{"name": "bad", "steps": [
            {"id": "step_1", "type": "text_splitter", "config": {"Delimiter": ","}, "name": ""},
            {"id": "step_2", "type": "html_sanitizer", "config": {}, "name": ""}
        ]}"#,
    )
    .unwrap();

    let factory = ProcessorFactory::default();
    let mut pipeline = sample(&factory);
    let err = pipeline.load_from_file(&path, &factory).unwrap_err();

    assert!(matches!(err, PipelineError::UnknownStepKind(ref kind) if kind == "html_sanitizer"));
    assert_eq!(pipeline.name, "csv");
    assert_eq!(pipeline.len(), 3);
}

#[test]
fn test_reads_documents_written_by_older_versions() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("old.json");
    std::fs::write(
        &path,
        r#"{
  "steps": [
    {"id": "step_1", "type": "json_formatter", "config": {"IndentType": "Tabulations"}, "name": ""},
    {"id": "step_2", "type": "custom_processor", "config": {"name": "Len", "script": "return input.length;"}, "name": "Length"}
  ],
  "name": "legacy"
}"#,
    )
    .unwrap();

    let mut pipeline = Pipeline::from_file(&path, &ProcessorFactory::default()).unwrap();
    assert_eq!(pipeline.step(0).unwrap().config(), StepConfig::format_json(IndentStyle::Tabs));
    assert_eq!(pipeline.display_steps(), vec!["1. JSON Formatter".to_string(), "2. Length".to_string()]);
    // "[\n\t1\n]\n"
    assert_eq!(pipeline.execute("[1]").unwrap(), "7");
}

#[test]
fn test_save_into_missing_directory_fails_cleanly() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("p.json");
    let pipeline = sample(&ProcessorFactory::default());

    let err = pipeline.save_to_file(&path).unwrap_err();
    assert!(matches!(err, PipelineError::Io { .. }));
    assert!(!path.exists());
}

#[test]
fn test_resave_replaces_previous_content() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("p.json");
    let factory = ProcessorFactory::default();

    let mut pipeline = sample(&factory);
    pipeline.save_to_file(&path).unwrap();
    pipeline.remove_step(1);
    pipeline.save_to_file(&path).unwrap();

    let reloaded = Pipeline::from_file(&path, &factory).unwrap();
    assert_eq!(reloaded.len(), 2);
}
