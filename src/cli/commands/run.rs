//! Run command implementation.
//!
//! The `devsetup run` command checks prerequisites and then provisions.

use crate::cli::args::RunArgs;
use crate::error::Result;
use crate::logging::Logger;
use crate::plan::build_pipeline;
use crate::runner::{Pipeline, PipelineStatus};
use crate::shell::{CommandRunner, HostEnvironment, ShellExecutor};
use crate::ui::SetupTheme;

use super::dispatcher::{Command, CommandContext, CommandResult};

/// The run command implementation.
pub struct RunCommand {
    args: RunArgs,
}

impl RunCommand {
    /// Create a new run command.
    pub fn new(args: RunArgs) -> Self {
        Self { args }
    }
}

impl Command for RunCommand {
    fn execute(&self, ctx: &CommandContext) -> Result<CommandResult> {
        let config = ctx.load_config()?;
        let env = HostEnvironment::capture()?;
        let pipeline = build_pipeline(&config, &env);

        if self.args.dry_run {
            print_plan(&pipeline, &ctx.theme);
            return Ok(CommandResult::success());
        }

        let mut logger = Logger::open(&config.settings.log_path, ctx.theme.clone())?;
        let mut runner = CommandRunner::new(ShellExecutor::in_dir(&ctx.project_root), env);

        let report = pipeline.run(&mut runner, &mut logger);
        logger.flush();

        match &report.status {
            PipelineStatus::Completed => tracing::debug!(
                "Run completed in {:?}: {} executed, {} skipped",
                report.duration,
                report.executed().len(),
                report.skipped().len()
            ),
            PipelineStatus::Halted { step, .. } => {
                tracing::debug!("Run halted by '{}' after {:?}", step, report.duration)
            }
            PipelineStatus::Failed { step, message } => tracing::debug!(
                "Run failed at {}: {}",
                step.as_deref().unwrap_or("preflight"),
                message
            ),
        }

        Ok(CommandResult::from_exit_code(report.exit_code()))
    }
}

/// Print what a run would do, without touching the host.
fn print_plan(pipeline: &Pipeline, theme: &SetupTheme) {
    println!("{}", theme.format_header("Prerequisites"));
    for prereq in pipeline.prerequisites() {
        println!(
            "  {} {}",
            theme.highlight.apply_to(&prereq.name),
            theme.dim.apply_to(format!(">= {}", prereq.min_version))
        );
        println!("{}", theme.format_command(&prereq.command));
    }

    println!();
    println!("{}", theme.format_header("Steps"));
    for preview in pipeline.sequencer().preview() {
        println!(
            "  {}",
            theme.format_step(&preview.name, &preview.title, preview.satisfied)
        );
        if preview.satisfied {
            continue;
        }
        for action in &preview.actions {
            println!("{}", theme.format_command(action));
        }
    }
}
