use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;
use text_pipeline::cli::commands::{
    unescape_delimiter, AddStepCommand, MoveStepCommand, NewCommand, ProcessorRef, ProcessorsAction,
    RemoveStepCommand, RunCommand, ScriptSource, StepKindArg, StepsCommand, ValidateCommand,
};
use text_pipeline::cli::output::*;
use text_pipeline::cli::{Cli, Command};
use text_pipeline::core::{Pipeline, StepConfig};
use text_pipeline::execution::PipelineExecutor;
use text_pipeline::persistence::CustomProcessorStore;
use text_pipeline::processors::presets::{self, PRESETS};
use text_pipeline::{Session, Settings};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn main() -> Result<()> {
    let cli = Cli::from_args();

    // Initialize logging; RUST_LOG overrides --verbose
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set logging subscriber")?;

    let settings = Settings::load(cli.settings.as_deref(), cli.conf_dir.as_deref())?;

    // Execute command
    match &cli.command {
        Command::Run(cmd) => run_pipeline(cmd, settings)?,
        Command::Validate(cmd) => validate_pipeline(cmd, settings)?,
        Command::Steps(cmd) => list_steps(cmd, settings)?,
        Command::New(cmd) => new_pipeline(cmd)?,
        Command::AddStep(cmd) => add_step(cmd, settings)?,
        Command::RemoveStep(cmd) => remove_step(cmd, settings)?,
        Command::MoveStep(cmd) => move_step(cmd, settings)?,
        Command::Processors(cmd) => manage_processors(&cmd.action, settings)?,
    }

    Ok(())
}

fn open_session(settings: Settings) -> Result<Session> {
    let conf_dir = settings.conf_dir.clone();
    Session::open(settings)
        .with_context(|| format!("Failed to open custom processor store in {}", conf_dir.display()))
}

fn open_pipeline(settings: Settings, path: &Path) -> Result<Session> {
    let mut session = open_session(settings)?;
    session
        .load_pipeline(path)
        .with_context(|| format!("Failed to load pipeline {}", path.display()))?;
    Ok(session)
}

fn save_pipeline(session: &Session, path: &Path) -> Result<()> {
    session
        .save_pipeline(path)
        .with_context(|| format!("Failed to save pipeline {}", path.display()))
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read input {}", path.display()))
        }
        None => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .context("Failed to read input from stdin")?;
            Ok(input)
        }
    }
}

fn run_pipeline(cmd: &RunCommand, settings: Settings) -> Result<()> {
    let mut session = open_pipeline(settings, &cmd.pipeline)?;
    let input = read_input(cmd.input.as_deref())?;

    let mut executor = PipelineExecutor::new();
    if cmd.trace {
        executor.add_event_handler(|event| eprintln!("{}", format_execution_event(&event)));
    }

    let pipeline = session.pipeline_mut();
    match executor.execute(pipeline, &input) {
        Ok(output) => {
            print!("{}", output);
            if !output.ends_with('\n') {
                println!();
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("{} {} {}", CROSS, style(&pipeline.name).bold(), style("failed").red());
            eprintln!("  {}", style(e).red());
            std::process::exit(1);
        }
    }
}

fn validate_pipeline(cmd: &ValidateCommand, settings: Settings) -> Result<()> {
    let session = open_pipeline(settings, &cmd.pipeline)?;
    let pipeline = session.pipeline();

    match pipeline.validate() {
        Ok(()) => {
            println!("{} Pipeline {} is valid", CHECK, style(&pipeline.name).bold());
            for line in pipeline.display_steps() {
                println!("  {}", line);
            }

            if cmd.json {
                println!("\n{}", pipeline.to_json()?);
            }
            Ok(())
        }
        Err(e) => {
            println!("{} Validation failed:", CROSS);
            println!("  {}", style(e).red());
            std::process::exit(1);
        }
    }
}

fn list_steps(cmd: &StepsCommand, settings: Settings) -> Result<()> {
    let session = open_pipeline(settings, &cmd.pipeline)?;
    print_steps(session.pipeline());
    Ok(())
}

fn print_steps(pipeline: &Pipeline) {
    if pipeline.is_empty() {
        println!("{} Pipeline {} has no steps", INFO, style(&pipeline.name).bold());
        return;
    }

    println!("{} {}:", INFO, style(&pipeline.name).bold());
    for (line, step) in pipeline.display_steps().iter().zip(pipeline.steps()) {
        println!(
            "  {} {} {}",
            line,
            style(&step.id).dim(),
            style(step.config().display_name()).dim()
        );
    }
    if !pipeline.state().is_runnable() {
        println!("{} Some steps are not valid yet; run `validate` for details", WARN);
    }
}

fn new_pipeline(cmd: &NewCommand) -> Result<()> {
    if cmd.pipeline.exists() && !cmd.force {
        anyhow::bail!("{} already exists (use --force to overwrite)", cmd.pipeline.display());
    }

    Pipeline::new(cmd.name.clone())
        .save_to_file(&cmd.pipeline)
        .with_context(|| format!("Failed to write {}", cmd.pipeline.display()))?;
    println!("{} Created pipeline {} in {}", CHECK, style(&cmd.name).bold(), cmd.pipeline.display());
    Ok(())
}

fn add_step(cmd: &AddStepCommand, settings: Settings) -> Result<()> {
    let mut session = open_pipeline(settings, &cmd.pipeline)?;
    let label = cmd.label.as_deref();

    let id = match cmd.kind {
        StepKindArg::JsonFormatter => {
            let indent = cmd.indent.unwrap_or(session.settings().default_indent);
            session.add_step(StepConfig::format_json(indent), label)?
        }
        StepKindArg::TextSplitter => {
            let delimiter = cmd.delimiter.as_deref().map(unescape_delimiter).unwrap_or_else(|| "\n".to_string());
            session.add_step(StepConfig::split_text(delimiter), label)?
        }
        StepKindArg::TextJoiner => {
            let delimiter = cmd.delimiter.as_deref().map(unescape_delimiter).unwrap_or_else(|| " ".to_string());
            session.add_step(StepConfig::join_text(delimiter), label)?
        }
        StepKindArg::Custom => {
            let name = cmd
                .processor
                .as_deref()
                .context("--processor is required for custom steps")?;
            session.add_custom_step(name, label)?
        }
    };

    save_pipeline(&session, &cmd.pipeline)?;
    println!("{} Added {}", CHECK, style(id).green());
    print_steps(session.pipeline());
    Ok(())
}

/// Convert a 1-based position into an index below `len`
fn zero_based(position: usize, len: usize, what: &str) -> Result<usize> {
    if position == 0 || position > len {
        anyhow::bail!("No {} at position {} (there are {})", what, position, len);
    }
    Ok(position - 1)
}

fn remove_step(cmd: &RemoveStepCommand, settings: Settings) -> Result<()> {
    let mut session = open_pipeline(settings, &cmd.pipeline)?;
    let index = zero_based(cmd.index, session.pipeline().len(), "step")?;

    if let Some(step) = session.pipeline_mut().remove_step(index) {
        println!("{} Removed {} ({})", CHECK, style(&step.id).green(), step.label());
    }
    save_pipeline(&session, &cmd.pipeline)?;
    print_steps(session.pipeline());
    Ok(())
}

fn move_step(cmd: &MoveStepCommand, settings: Settings) -> Result<()> {
    let mut session = open_pipeline(settings, &cmd.pipeline)?;
    let index = zero_based(cmd.index, session.pipeline().len(), "step")?;

    let moved = if cmd.up {
        session.pipeline_mut().move_step_up(index)
    } else {
        session.pipeline_mut().move_step_down(index)
    };
    if !moved {
        println!("{} Step {} is already at the {}", WARN, cmd.index, if cmd.up { "top" } else { "bottom" });
        return Ok(());
    }

    save_pipeline(&session, &cmd.pipeline)?;
    print_steps(session.pipeline());
    Ok(())
}

fn read_script(source: &ScriptSource) -> Result<Option<String>> {
    if let Some(script) = &source.script {
        return Ok(Some(script.clone()));
    }
    match &source.script_file {
        Some(path) => std::fs::read_to_string(path)
            .map(Some)
            .with_context(|| format!("Failed to read script {}", path.display())),
        None => Ok(None),
    }
}

fn resolve_processor(store: &CustomProcessorStore, target: &ProcessorRef) -> Result<usize> {
    match (&target.index, &target.name) {
        (Some(position), _) => zero_based(*position, store.len(), "custom processor"),
        (None, Some(name)) => store
            .position(name)
            .with_context(|| format!("No custom processor named '{}'", name)),
        (None, None) => anyhow::bail!("Select a processor with --index or --name"),
    }
}

fn manage_processors(action: &ProcessorsAction, settings: Settings) -> Result<()> {
    if let ProcessorsAction::Presets = action {
        for preset in PRESETS {
            println!("{} {}", style(preset.key).cyan(), style(preset.name).bold());
            println!("{}\n", style(indent(preset.script, "    ")).dim());
        }
        return Ok(());
    }

    let mut session = open_session(settings)?;

    match action {
        ProcessorsAction::List { scripts } => {
            let store = session.store();
            if store.is_empty() {
                println!("{} No custom processors in {}", INFO, store.processors_dir().display());
                return Ok(());
            }
            println!("{} Custom processors in {}:", INFO, store.processors_dir().display());
            for (i, def) in store.processors().iter().enumerate() {
                println!("{}", format_processor(i + 1, def));
                if *scripts {
                    println!("{}", style(indent(&def.script, "      ")).dim());
                }
            }
        }
        ProcessorsAction::Add { name, source, preset } => {
            let preset = match preset {
                Some(key) => Some(presets::find(key).with_context(|| {
                    let keys: Vec<&str> = PRESETS.iter().map(|p| p.key).collect();
                    format!("Unknown preset '{}' (available: {})", key, keys.join(", "))
                })?),
                None => None,
            };

            let script = match (read_script(source)?, preset) {
                (Some(script), _) => script,
                (None, Some(preset)) => preset.script.to_string(),
                (None, None) => anyhow::bail!("A script is required (--script, --script-file or --preset)"),
            };
            let name = match (name, preset) {
                (Some(name), _) => name.clone(),
                (None, Some(preset)) => preset.name.to_string(),
                (None, None) => anyhow::bail!("A name is required"),
            };

            session.store_mut().add_processor(name.clone(), script)?;
            println!("{} Added custom processor {}", CHECK, style(name).bold());
        }
        ProcessorsAction::Remove { target } => {
            let index = resolve_processor(session.store(), target)?;
            let removed = session.store_mut().remove_processor(index)?;
            println!("{} Removed custom processor {}", CHECK, style(removed.name).bold());
        }
        ProcessorsAction::Rename { target, to } => {
            let index = resolve_processor(session.store(), target)?;
            session.store_mut().rename_processor(index, to.clone())?;
            println!("{} Renamed custom processor to {}", CHECK, style(to).bold());
        }
        ProcessorsAction::Edit {
            target,
            new_name,
            source,
        } => {
            let index = resolve_processor(session.store(), target)?;
            let script = read_script(source)?;
            if new_name.is_none() && script.is_none() {
                anyhow::bail!("Nothing to change (use --new-name, --script or --script-file)");
            }

            let current = session
                .store()
                .get(index)
                .context("Custom processor disappeared while editing")?;
            let name = new_name.clone().unwrap_or(current.name);
            let script = script.unwrap_or(current.script);
            session.store_mut().edit_processor(index, name.clone(), script)?;
            println!("{} Updated custom processor {}", CHECK, style(name).bold());
        }
        ProcessorsAction::Test { name, source, input } => {
            let script = match name {
                Some(name) => {
                    session
                        .store()
                        .find(name)
                        .with_context(|| format!("No custom processor named '{}'", name))?
                        .script
                }
                None => read_script(source)?
                    .context("A script is required (--name, --script or --script-file)")?,
            };
            let input = match input {
                Some(text) => text.clone(),
                None => read_input(None)?,
            };

            match session.preview(&script, &input) {
                Ok(output) => println!("{}", output),
                Err(e) => {
                    eprintln!("{} {}", CROSS, style(e).red());
                    std::process::exit(1);
                }
            }
        }
        ProcessorsAction::Presets => {}
    }

    Ok(())
}
