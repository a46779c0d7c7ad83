//! List command implementation.
//!
//! The `devsetup list` command shows every step with its current status.

use crate::cli::args::ListArgs;
use crate::error::Result;
use crate::plan::build_steps;
use crate::runner::StepSequencer;
use crate::shell::HostEnvironment;

use super::dispatcher::{Command, CommandContext, CommandResult};

/// The list command implementation.
pub struct ListCommand {
    args: ListArgs,
}

impl ListCommand {
    /// Create a new list command.
    pub fn new(args: ListArgs) -> Self {
        Self { args }
    }
}

impl Command for ListCommand {
    fn execute(&self, ctx: &CommandContext) -> Result<CommandResult> {
        let config = ctx.load_config()?;
        let env = HostEnvironment::capture()?;
        let sequencer = StepSequencer::new(build_steps(&config, &env));
        let previews = sequencer.preview();

        if self.args.json {
            let json = serde_json::to_string_pretty(&previews).map_err(anyhow::Error::from)?;
            println!("{}", json);
            return Ok(CommandResult::success());
        }

        let theme = &ctx.theme;

        println!("  {}", theme.highlight.apply_to("Steps:"));
        for preview in &previews {
            println!(
                "    {} {}",
                theme.format_step(&preview.name, &preview.title, preview.satisfied),
                theme.dim.apply_to(format!("[{}]", preview.policy))
            );
            if self.args.actions {
                for action in &preview.actions {
                    println!("    {}", theme.format_command(action));
                }
            }
        }

        Ok(CommandResult::success())
    }
}
