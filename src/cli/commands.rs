//! CLI command definitions

use crate::core::IndentStyle;
use clap::{ArgGroup, Args, Subcommand};
use std::path::PathBuf;

/// Run a pipeline on some input
#[derive(Debug, Args, Clone)]
pub struct RunCommand {
    /// Path to pipeline JSON file
    #[arg(short, long)]
    pub pipeline: PathBuf,

    /// Read input from this file instead of stdin
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Print execution events to stderr
    #[arg(long)]
    pub trace: bool,
}

/// Validate a pipeline file
#[derive(Debug, Args, Clone)]
pub struct ValidateCommand {
    /// Path to pipeline JSON file
    #[arg(short, long)]
    pub pipeline: PathBuf,

    /// Output the normalized document as JSON
    #[arg(long)]
    pub json: bool,
}

/// List the steps of a pipeline
#[derive(Debug, Args, Clone)]
pub struct StepsCommand {
    /// Path to pipeline JSON file
    #[arg(short, long)]
    pub pipeline: PathBuf,
}

/// Create an empty pipeline file
#[derive(Debug, Args, Clone)]
pub struct NewCommand {
    /// Path of the pipeline file to create
    #[arg(short, long)]
    pub pipeline: PathBuf,

    /// Pipeline name
    #[arg(long, default_value = "Pipeline")]
    pub name: String,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

/// Append a step to a pipeline file
#[derive(Debug, Args, Clone)]
pub struct AddStepCommand {
    /// Path to pipeline JSON file
    #[arg(short, long)]
    pub pipeline: PathBuf,

    /// Kind of step to add
    #[arg(short, long, value_enum)]
    pub kind: StepKindArg,

    /// Indentation for json-formatter steps (2, 4 or tab)
    #[arg(long, value_parser = parse_indent)]
    pub indent: Option<IndentStyle>,

    /// Delimiter for text-splitter / text-joiner steps (\n and \t are unescaped)
    #[arg(short, long)]
    pub delimiter: Option<String>,

    /// Stored custom processor to use for custom steps
    #[arg(long, required_if_eq("kind", "custom"))]
    pub processor: Option<String>,

    /// Display name for the step
    #[arg(long)]
    pub label: Option<String>,
}

/// Remove a step from a pipeline file
#[derive(Debug, Args, Clone)]
pub struct RemoveStepCommand {
    /// Path to pipeline JSON file
    #[arg(short, long)]
    pub pipeline: PathBuf,

    /// 1-based position of the step
    #[arg(long)]
    pub index: usize,
}

/// Move a step one position up or down
#[derive(Debug, Args, Clone)]
#[command(group(ArgGroup::new("direction").required(true).args(["up", "down"])))]
pub struct MoveStepCommand {
    /// Path to pipeline JSON file
    #[arg(short, long)]
    pub pipeline: PathBuf,

    /// 1-based position of the step
    #[arg(long)]
    pub index: usize,

    #[arg(long)]
    pub up: bool,

    #[arg(long)]
    pub down: bool,
}

/// Manage stored custom processors
#[derive(Debug, Args, Clone)]
pub struct ProcessorsCommand {
    #[command(subcommand)]
    pub action: ProcessorsAction,
}

#[derive(Debug, Subcommand, Clone)]
pub enum ProcessorsAction {
    /// List stored processors
    List {
        /// Print the scripts as well
        #[arg(long)]
        scripts: bool,
    },

    /// Store a new processor
    Add {
        /// Processor name (defaults to the preset's name)
        #[arg(long, required_unless_present = "preset")]
        name: Option<String>,

        #[command(flatten)]
        source: ScriptSource,

        /// Start from a built-in example script
        #[arg(long, conflicts_with_all = ["script", "script_file"])]
        preset: Option<String>,
    },

    /// Delete a stored processor
    Remove {
        #[command(flatten)]
        target: ProcessorRef,
    },

    /// Rename a stored processor
    Rename {
        #[command(flatten)]
        target: ProcessorRef,

        /// New name
        #[arg(long)]
        to: String,
    },

    /// Change the name and/or script of a stored processor
    Edit {
        #[command(flatten)]
        target: ProcessorRef,

        /// New name
        #[arg(long)]
        new_name: Option<String>,

        #[command(flatten)]
        source: ScriptSource,
    },

    /// Run a script on some input without storing it
    Test {
        /// Stored processor to test
        #[arg(long, conflicts_with_all = ["script", "script_file"])]
        name: Option<String>,

        #[command(flatten)]
        source: ScriptSource,

        /// Input text (stdin when omitted)
        #[arg(short, long)]
        input: Option<String>,
    },

    /// Show the built-in example scripts
    Presets,
}

/// Where a script comes from
#[derive(Debug, Args, Clone, Default)]
pub struct ScriptSource {
    /// Script text
    #[arg(long, conflicts_with = "script_file")]
    pub script: Option<String>,

    /// Read the script from a file
    #[arg(long)]
    pub script_file: Option<PathBuf>,
}

/// Selects a stored processor by position or name
#[derive(Debug, Args, Clone)]
#[group(required = true, multiple = false)]
pub struct ProcessorRef {
    /// 1-based position in `processors list`
    #[arg(long)]
    pub index: Option<usize>,

    /// Processor name
    #[arg(long)]
    pub name: Option<String>,
}

/// Step kind argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum StepKindArg {
    JsonFormatter,
    TextSplitter,
    TextJoiner,
    Custom,
}

/// Parse an indentation argument
pub fn parse_indent(s: &str) -> Result<IndentStyle, String> {
    s.parse().map_err(|e: crate::error::ConfigError| e.to_string())
}

/// Turn the two-character sequences `\n`, `\t` and `\\` into the characters they name
pub fn unescape_delimiter(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
