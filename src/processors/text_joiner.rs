//! Text joiner processor

use super::{kind_mismatch, Processor, ViewModel};
use crate::core::config::{StepConfig, StepKind, TextJoinerConfig};
use crate::error::{ConfigError, ProcessError};

/// Joins the non-blank lines of its input with a delimiter
#[derive(Debug, Default)]
pub struct TextJoiner {
    view_model: TextJoinerViewModel,
}

impl TextJoiner {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Processor for TextJoiner {
    fn name(&self) -> String {
        "Text Joiner".to_string()
    }

    fn description(&self) -> &'static str {
        "Joins lines of text with a delimiter"
    }

    fn kind(&self) -> StepKind {
        StepKind::JoinText
    }

    fn view_model(&self) -> &dyn ViewModel {
        &self.view_model
    }

    fn view_model_mut(&mut self) -> &mut dyn ViewModel {
        &mut self.view_model
    }
}

#[derive(Debug)]
pub struct TextJoinerViewModel {
    delimiter: String,
    last_result: Option<String>,
}

impl Default for TextJoinerViewModel {
    fn default() -> Self {
        Self {
            delimiter: " ".to_string(),
            last_result: None,
        }
    }
}

impl ViewModel for TextJoinerViewModel {
    fn process(&mut self, input: &str) -> Result<String, ProcessError> {
        let output = join_lines(input, &self.delimiter);
        self.last_result = Some(output.clone());
        Ok(output)
    }

    fn configuration(&self) -> StepConfig {
        StepConfig::JoinText(TextJoinerConfig {
            delimiter: self.delimiter.clone(),
        })
    }

    fn load_configuration(&mut self, config: &StepConfig) -> Result<(), ConfigError> {
        match config {
            StepConfig::JoinText(c) => {
                self.delimiter = c.delimiter.clone();
                Ok(())
            }
            other => Err(kind_mismatch(StepKind::JoinText, other)),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        Ok(())
    }

    fn last_result(&self) -> Option<&str> {
        self.last_result.as_deref()
    }
}

/// Trim every line, drop the blank ones, join the rest with `delimiter`
pub fn join_lines(input: &str, delimiter: &str) -> String {
    input
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(delimiter)
}
