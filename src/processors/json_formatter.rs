//! JSON formatter processor

use super::{kind_mismatch, Processor, ViewModel};
use crate::core::config::{IndentStyle, JsonFormatterConfig, StepConfig, StepKind};
use crate::error::{ConfigError, ProcessError};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;

/// Re-indents JSON documents
#[derive(Debug, Default)]
pub struct JsonFormatter {
    view_model: JsonFormatterViewModel,
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Processor for JsonFormatter {
    fn name(&self) -> String {
        "JSON Formatter".to_string()
    }

    fn description(&self) -> &'static str {
        "Formats JSON documents with configurable indentation"
    }

    fn kind(&self) -> StepKind {
        StepKind::FormatJson
    }

    fn view_model(&self) -> &dyn ViewModel {
        &self.view_model
    }

    fn view_model_mut(&mut self) -> &mut dyn ViewModel {
        &mut self.view_model
    }
}

#[derive(Debug, Default)]
pub struct JsonFormatterViewModel {
    indent: IndentStyle,
    last_result: Option<String>,
}

impl ViewModel for JsonFormatterViewModel {
    fn process(&mut self, input: &str) -> Result<String, ProcessError> {
        // An empty editor formats to nothing rather than to an error
        let formatted = if input.is_empty() {
            String::new()
        } else {
            format_json(input, self.indent)?
        };
        self.last_result = Some(formatted.clone());
        Ok(formatted)
    }

    fn configuration(&self) -> StepConfig {
        StepConfig::FormatJson(JsonFormatterConfig {
            indent: self.indent,
        })
    }

    fn load_configuration(&mut self, config: &StepConfig) -> Result<(), ConfigError> {
        match config {
            StepConfig::FormatJson(c) => {
                self.indent = c.indent;
                Ok(())
            }
            other => Err(kind_mismatch(StepKind::FormatJson, other)),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        Ok(())
    }

    fn last_result(&self) -> Option<&str> {
        self.last_result.as_deref()
    }
}

/// Parse `input` as one JSON document and pretty print it with `indent`
///
/// Object keys come out sorted. The output ends with a newline.
pub fn format_json(input: &str, indent: IndentStyle) -> Result<String, ProcessError> {
    let value: Value = serde_json::from_str(input).map_err(|e| ProcessError::MalformedJson {
        offset: byte_offset(input, e.line(), e.column()),
        detail: e.to_string(),
    })?;
    let value = sort_keys(value);

    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(indent.unit());
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    value
        .serialize(&mut serializer)
        .map_err(|e| ProcessError::MalformedJson {
            offset: 0,
            detail: e.to_string(),
        })?;
    buffer.push(b'\n');

    String::from_utf8(buffer).map_err(|e| ProcessError::MalformedJson {
        offset: e.utf8_error().valid_up_to(),
        detail: e.to_string(),
    })
}

/// Rebuild objects with their keys in sorted order, whatever map backs `Value`
fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, sort_keys(value)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

/// Convert serde_json's 1-based line/column into a byte offset
fn byte_offset(input: &str, line: usize, column: usize) -> usize {
    let line_start: usize = input
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();
    (line_start + column.saturating_sub(1)).min(input.len())
}
