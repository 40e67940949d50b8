//! Text splitter processor

use super::{kind_mismatch, Processor, ViewModel};
use crate::core::config::{StepConfig, StepKind, TextSplitterConfig};
use crate::error::{ConfigError, ProcessError};

/// Splits text on a delimiter and writes one token per line
#[derive(Debug, Default)]
pub struct TextSplitter {
    view_model: TextSplitterViewModel,
}

impl TextSplitter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Processor for TextSplitter {
    fn name(&self) -> String {
        "Text Splitter".to_string()
    }

    fn description(&self) -> &'static str {
        "Splits text on a configurable delimiter"
    }

    fn kind(&self) -> StepKind {
        StepKind::SplitText
    }

    fn view_model(&self) -> &dyn ViewModel {
        &self.view_model
    }

    fn view_model_mut(&mut self) -> &mut dyn ViewModel {
        &mut self.view_model
    }
}

#[derive(Debug)]
pub struct TextSplitterViewModel {
    delimiter: String,
    last_result: Option<String>,
}

impl Default for TextSplitterViewModel {
    fn default() -> Self {
        Self {
            delimiter: "\n".to_string(),
            last_result: None,
        }
    }
}

impl ViewModel for TextSplitterViewModel {
    fn process(&mut self, input: &str) -> Result<String, ProcessError> {
        let output = split_text(input, &self.delimiter);
        self.last_result = Some(output.clone());
        Ok(output)
    }

    fn configuration(&self) -> StepConfig {
        StepConfig::SplitText(TextSplitterConfig {
            delimiter: self.delimiter.clone(),
        })
    }

    fn load_configuration(&mut self, config: &StepConfig) -> Result<(), ConfigError> {
        match config {
            StepConfig::SplitText(c) => {
                self.delimiter = c.delimiter.clone();
                Ok(())
            }
            other => Err(kind_mismatch(StepKind::SplitText, other)),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        Ok(())
    }

    fn last_result(&self) -> Option<&str> {
        self.last_result.as_deref()
    }
}

/// Split on `delimiter` (newline when empty) and rejoin with newlines.
/// Empty tokens are kept.
pub fn split_text(input: &str, delimiter: &str) -> String {
    let delimiter = if delimiter.is_empty() { "\n" } else { delimiter };
    input.split(delimiter).collect::<Vec<_>>().join("\n")
}
