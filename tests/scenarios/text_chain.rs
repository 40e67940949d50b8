//! Test: built-in steps alone and chained

use crate::helpers::*;
use text_pipeline::core::{IndentStyle, StepConfig};
use text_pipeline::processors::ProcessorFactory;

#[test]
fn test_split_keeps_empty_tokens() {
    let mut pipeline = build_pipeline(&ProcessorFactory::default(), vec![StepConfig::split_text(",")]);
    assert_eq!(pipeline.execute("a,b,,c").unwrap(), "a\nb\n\nc");
}

#[test]
fn test_join_drops_blank_lines() {
    let mut pipeline = build_pipeline(&ProcessorFactory::default(), vec![StepConfig::join_text(", ")]);
    assert_eq!(pipeline.execute("a\n \nb\nc").unwrap(), "a, b, c");
}

#[test]
fn test_format_json_two_spaces() {
    let mut pipeline = build_pipeline(
        &ProcessorFactory::default(),
        vec![StepConfig::format_json(IndentStyle::TwoSpaces)],
    );
    assert_eq!(pipeline.execute(r#"{"a":1}"#).unwrap(), "{\n  \"a\": 1\n}\n");
}

#[test]
fn test_format_json_tabs_and_nesting() {
    let mut pipeline = build_pipeline(
        &ProcessorFactory::default(),
        vec![StepConfig::format_json(IndentStyle::Tabs)],
    );
    assert_eq!(
        pipeline.execute(r#"{"b":[1,2],"a":{}}"#).unwrap(),
        "{\n\t\"a\": {},\n\t\"b\": [\n\t\t1,\n\t\t2\n\t]\n}\n"
    );
}

#[test]
fn test_split_then_join() {
    let mut pipeline = build_pipeline(
        &ProcessorFactory::default(),
        vec![StepConfig::split_text(","), StepConfig::join_text(" | ")],
    );
    assert_eq!(pipeline.execute("a,b,c").unwrap(), "a | b | c");
}

#[test]
fn test_empty_split_delimiter_means_newline() {
    let mut pipeline = build_pipeline(
        &ProcessorFactory::default(),
        vec![StepConfig::split_text(""), StepConfig::join_text("+")],
    );
    assert_eq!(pipeline.execute("x\ny").unwrap(), "x+y");
}

#[test]
fn test_repeated_runs_are_identical() {
    let mut pipeline = build_pipeline(
        &ProcessorFactory::default(),
        vec![
            StepConfig::split_text(";"),
            StepConfig::join_text(","),
            StepConfig::custom_script("Wrap", "return '[' + input + ']';"),
        ],
    );
    let first = pipeline.execute("1;2;;3").unwrap();
    let second = pipeline.execute("1;2;;3").unwrap();
    assert_eq!(first, "[1,2,3]");
    assert_eq!(first, second);
}

#[test]
fn test_last_result_is_cached_per_step() {
    let mut pipeline = build_pipeline(
        &ProcessorFactory::default(),
        vec![StepConfig::split_text(","), StepConfig::join_text("-")],
    );
    pipeline.execute("a,b").unwrap();

    assert_eq!(pipeline.step(0).unwrap().view_model().last_result(), Some("a\nb"));
    assert_eq!(pipeline.step(1).unwrap().view_model().last_result(), Some("a-b"));
}
