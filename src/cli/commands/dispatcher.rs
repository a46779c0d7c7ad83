//! Command dispatching.
//!
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandContext`] for what every command needs
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::path::PathBuf;

use crate::cli::args::{Cli, Commands, RunArgs};
use crate::config::{load_config, validate, DevsetupConfig};
use crate::error::Result;
use crate::ui::SetupTheme;

/// Trait for command implementations.
pub trait Command {
    /// Execute the command.
    fn execute(&self, ctx: &CommandContext) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug, PartialEq, Eq)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }

    /// Create a result from an exit code.
    pub fn from_exit_code(exit_code: i32) -> Self {
        if exit_code == 0 {
            Self::success()
        } else {
            Self::failure(exit_code)
        }
    }
}

/// Shared inputs for every command.
#[derive(Debug, Clone)]
pub struct CommandContext {
    /// Project root; relative config paths resolve against it.
    pub project_root: PathBuf,

    /// Explicit config file, if given.
    pub config_override: Option<PathBuf>,

    /// Terminal theme.
    pub theme: SetupTheme,
}

impl CommandContext {
    /// Create a context.
    pub fn new(project_root: PathBuf, config_override: Option<PathBuf>, theme: SetupTheme) -> Self {
        Self {
            project_root,
            config_override,
            theme,
        }
    }

    /// Load and validate the configuration.
    pub fn load_config(&self) -> Result<DevsetupConfig> {
        let config = load_config(&self.project_root, self.config_override.as_deref())?;
        validate(&config)?;
        Ok(config)
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    context: CommandContext,
}

impl CommandDispatcher {
    /// Create a new dispatcher.
    pub fn new(context: CommandContext) -> Self {
        Self { context }
    }

    /// Dispatch and execute a command.
    ///
    /// With no subcommand, `run` executes with default arguments.
    pub fn dispatch(&self, cli: &Cli) -> Result<CommandResult> {
        match &cli.command {
            Some(Commands::Run(args)) => {
                super::run::RunCommand::new(args.clone()).execute(&self.context)
            }
            Some(Commands::Check) => super::check::CheckCommand::new().execute(&self.context),
            Some(Commands::List(args)) => {
                super::list::ListCommand::new(args.clone()).execute(&self.context)
            }
            None => super::run::RunCommand::new(RunArgs::default()).execute(&self.context),
        }
    }
}
