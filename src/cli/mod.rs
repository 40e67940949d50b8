//! Command-line interface

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use commands::{
    AddStepCommand, MoveStepCommand, NewCommand, ProcessorsCommand, RemoveStepCommand, RunCommand, StepsCommand,
    ValidateCommand,
};
use std::ffi::OsString;
use std::path::PathBuf;

/// Text transformation pipelines
#[derive(Debug, Parser, Clone)]
#[command(name = "text-pipeline")]
#[command(version)]
#[command(about = "Build and run text transformation pipelines", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory holding custom processors and settings.yaml
    #[arg(long, global = true)]
    pub conf_dir: Option<PathBuf>,

    /// Path to a settings YAML file
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,
}

/// Available commands
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run a pipeline
    Run(RunCommand),

    /// Validate a pipeline file
    Validate(ValidateCommand),

    /// List the steps of a pipeline
    Steps(StepsCommand),

    /// Create an empty pipeline file
    New(NewCommand),

    /// Append a step to a pipeline file
    AddStep(AddStepCommand),

    /// Remove a step from a pipeline file
    RemoveStep(RemoveStepCommand),

    /// Move a step up or down
    MoveStep(MoveStepCommand),

    /// Manage stored custom processors
    Processors(ProcessorsCommand),
}

impl Cli {
    /// Parse CLI arguments from environment
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Parse CLI arguments from a slice
    pub fn try_parse_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(itr)
    }
}
