//! Step kinds and their configuration
//!
//! Each [`StepKind`] has exactly one configuration type. [`StepConfig`] is the
//! closed union over them; a new kind is added by adding a variant here, a
//! config struct, and an entry in the processor factory.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// The kind of a pipeline step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StepKind {
    /// Re-indent a JSON document
    #[serde(rename = "json_formatter")]
    FormatJson,
    /// Split text on a delimiter, one token per line
    #[serde(rename = "text_splitter")]
    SplitText,
    /// Join non-blank lines with a delimiter
    #[serde(rename = "text_joiner")]
    JoinText,
    /// User supplied script
    #[serde(rename = "custom_processor")]
    CustomScript,
}

impl StepKind {
    pub const ALL: [StepKind; 4] = [
        StepKind::FormatJson,
        StepKind::SplitText,
        StepKind::JoinText,
        StepKind::CustomScript,
    ];

    /// The tag written in the `type` field of a pipeline document
    pub fn as_str(&self) -> &'static str {
        match self {
            StepKind::FormatJson => "json_formatter",
            StepKind::SplitText => "text_splitter",
            StepKind::JoinText => "text_joiner",
            StepKind::CustomScript => "custom_processor",
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StepKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StepKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

/// Indentation used by the JSON formatter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndentStyle {
    #[default]
    #[serde(rename = "2 espaces", alias = "2 spaces")]
    TwoSpaces,
    #[serde(rename = "4 espaces", alias = "4 spaces")]
    FourSpaces,
    #[serde(rename = "Tabulations", alias = "tabs")]
    Tabs,
}

impl IndentStyle {
    /// The indentation unit written for each nesting level
    pub fn unit(&self) -> &'static [u8] {
        match self {
            IndentStyle::TwoSpaces => b"  ",
            IndentStyle::FourSpaces => b"    ",
            IndentStyle::Tabs => b"\t",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            IndentStyle::TwoSpaces => "2 spaces",
            IndentStyle::FourSpaces => "4 spaces",
            IndentStyle::Tabs => "tabs",
        }
    }
}

impl fmt::Display for IndentStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for IndentStyle {
    type Err = ConfigError;

    /// Accepts both the stored labels and the short forms `2`, `4`, `tab`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "2" | "2 spaces" | "2 espaces" => Ok(IndentStyle::TwoSpaces),
            "4" | "4 spaces" | "4 espaces" => Ok(IndentStyle::FourSpaces),
            "tab" | "tabs" | "tabulations" => Ok(IndentStyle::Tabs),
            _ => Err(ConfigError::InvalidIndent(s.to_string())),
        }
    }
}

/// JSON formatter configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonFormatterConfig {
    #[serde(rename = "IndentType", alias = "indentType", alias = "indent_type")]
    pub indent: IndentStyle,
}

/// Text splitter configuration; an empty delimiter splits on newlines
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextSplitterConfig {
    #[serde(rename = "Delimiter", alias = "delimiter", default)]
    pub delimiter: String,
}

/// Text joiner configuration; an empty delimiter concatenates lines
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextJoinerConfig {
    #[serde(rename = "Delimiter", alias = "delimiter", default)]
    pub delimiter: String,
}

/// Custom script processor configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomProcessorConfig {
    #[serde(rename = "Name", alias = "name")]
    pub name: String,

    #[serde(rename = "Script", alias = "script")]
    pub script: String,
}

impl CustomProcessorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.is_empty() {
            return Err(ConfigError::EmptyName);
        }
        if self.script.is_empty() {
            return Err(ConfigError::EmptyScript);
        }
        Ok(())
    }
}

/// Configuration of one step, tagged by its kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepConfig {
    FormatJson(JsonFormatterConfig),
    SplitText(TextSplitterConfig),
    JoinText(TextJoinerConfig),
    CustomScript(CustomProcessorConfig),
}

impl StepConfig {
    pub fn format_json(indent: IndentStyle) -> Self {
        StepConfig::FormatJson(JsonFormatterConfig { indent })
    }

    pub fn split_text(delimiter: impl Into<String>) -> Self {
        StepConfig::SplitText(TextSplitterConfig {
            delimiter: delimiter.into(),
        })
    }

    pub fn join_text(delimiter: impl Into<String>) -> Self {
        StepConfig::JoinText(TextJoinerConfig {
            delimiter: delimiter.into(),
        })
    }

    pub fn custom_script(name: impl Into<String>, script: impl Into<String>) -> Self {
        StepConfig::CustomScript(CustomProcessorConfig {
            name: name.into(),
            script: script.into(),
        })
    }

    pub fn kind(&self) -> StepKind {
        match self {
            StepConfig::FormatJson(_) => StepKind::FormatJson,
            StepConfig::SplitText(_) => StepKind::SplitText,
            StepConfig::JoinText(_) => StepKind::JoinText,
            StepConfig::CustomScript(_) => StepKind::CustomScript,
        }
    }

    /// Check the invariants of this configuration
    ///
    /// The formatter's indentation is a closed enum and both text steps accept
    /// any delimiter, so only custom scripts can fail here.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            StepConfig::FormatJson(_) | StepConfig::SplitText(_) | StepConfig::JoinText(_) => Ok(()),
            StepConfig::CustomScript(config) => config.validate(),
        }
    }

    /// Human-readable summary of the step and its settings
    pub fn display_name(&self) -> String {
        match self {
            StepConfig::FormatJson(c) => format!("JSON Formatter (indent: {})", c.indent),
            StepConfig::SplitText(c) => {
                let delimiter = if c.delimiter.is_empty() {
                    "\\n (default)".to_string()
                } else {
                    escape_delimiter(&c.delimiter)
                };
                format!("Text Splitter (delimiter: {})", delimiter)
            }
            StepConfig::JoinText(c) => {
                let delimiter = if c.delimiter.is_empty() {
                    "(empty)".to_string()
                } else {
                    escape_delimiter(&c.delimiter)
                };
                format!("Text Joiner (delimiter: {})", delimiter)
            }
            StepConfig::CustomScript(c) => format!("Custom Processor ({})", c.name),
        }
    }

    /// Decode the kind-specific `config` object of a stored step
    pub fn decode(kind: StepKind, value: Value) -> Result<Self, ConfigError> {
        let config = match kind {
            StepKind::FormatJson => StepConfig::FormatJson(serde_json::from_value(value)?),
            StepKind::SplitText => StepConfig::SplitText(serde_json::from_value(value)?),
            StepKind::JoinText => StepConfig::JoinText(serde_json::from_value(value)?),
            StepKind::CustomScript => StepConfig::CustomScript(serde_json::from_value(value)?),
        };
        Ok(config)
    }

    /// Encode only the kind-specific fields; the kind travels separately
    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        match self {
            StepConfig::FormatJson(c) => serde_json::to_value(c),
            StepConfig::SplitText(c) => serde_json::to_value(c),
            StepConfig::JoinText(c) => serde_json::to_value(c),
            StepConfig::CustomScript(c) => serde_json::to_value(c),
        }
    }
}

fn escape_delimiter(delimiter: &str) -> String {
    delimiter.replace('\n', "\\n").replace('\t', "\\t")
}
