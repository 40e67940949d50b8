//! CLI output formatting

use crate::execution::ExecutionEvent;
use crate::persistence::CustomProcessorDefinition;
use console::Emoji;

// Re-export style
pub use console::style;

// Emojis for output
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "✓ ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "✗ ");
pub static SPINNER: Emoji<'_, '_> = Emoji("⏳ ", "~ ");
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "i ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "! ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", "> ");

/// Format an execution event for display
pub fn format_execution_event(event: &ExecutionEvent) -> String {
    match event {
        ExecutionEvent::PipelineStarted {
            pipeline_name,
            step_count,
        } => format!(
            "{} Starting pipeline {} ({} steps)",
            ROCKET,
            style(pipeline_name).bold(),
            step_count
        ),
        ExecutionEvent::StepStarted { index, name, .. } => {
            format!("{} {}. {}", SPINNER, index + 1, style(name).cyan())
        }
        ExecutionEvent::StepCompleted {
            index,
            step_id,
            output_len,
        } => format!(
            "{} {}. {} {}",
            CHECK,
            index + 1,
            style(step_id).green(),
            style(format!("({} bytes)", output_len)).dim()
        ),
        ExecutionEvent::StepFailed { index, step_id, error } => format!(
            "{} {}. {}: {}",
            CROSS,
            index + 1,
            style(step_id).red(),
            style(error).dim()
        ),
        ExecutionEvent::PipelineCompleted {
            pipeline_name,
            success,
        } => {
            let status = if *success {
                format!("{} completed", style("successfully").green())
            } else {
                style("failed").red().to_string()
            };
            format!("{} Pipeline {} {}", INFO, style(pipeline_name).bold(), status)
        }
    }
}

/// One line of `processors list`
pub fn format_processor(position: usize, def: &CustomProcessorDefinition) -> String {
    format!(
        "  {}. {} {}",
        position,
        style(&def.name).bold(),
        style(format!("[{}.json]", def.slug())).dim()
    )
}

/// Indent every line of `text`
pub fn indent(text: &str, prefix: &str) -> String {
    text.lines()
        .map(|line| format!("{}{}", prefix, line))
        .collect::<Vec<_>>()
        .join("\n")
}
