//! Check command implementation.
//!
//! The `devsetup check` command runs only the preflight checks. Results go
//! to the console; the run log is left alone.

use crate::error::Result;
use crate::logging::Logger;
use crate::requirements::PreflightChecker;
use crate::shell::{CommandRunner, HostEnvironment, ShellExecutor};

use super::dispatcher::{Command, CommandContext, CommandResult};

/// The check command implementation.
#[derive(Debug, Default)]
pub struct CheckCommand;

impl CheckCommand {
    /// Create a new check command.
    pub fn new() -> Self {
        Self
    }
}

impl Command for CheckCommand {
    fn execute(&self, ctx: &CommandContext) -> Result<CommandResult> {
        let config = ctx.load_config()?;
        let checker = PreflightChecker::new(config.settings.version_compare);
        let mut runner = CommandRunner::new(
            ShellExecutor::in_dir(&ctx.project_root),
            HostEnvironment::capture()?,
        );
        let mut logger = Logger::console(ctx.theme.clone());

        match checker.check_all(&config.prerequisites, &mut runner, &mut logger) {
            Ok(reports) => {
                tracing::debug!("{} prerequisites satisfied", reports.len());
                Ok(CommandResult::success())
            }
            Err(e) if e.is_reported() => Ok(CommandResult::failure(e.exit_code())),
            Err(e) => Err(e),
        }
    }
}
