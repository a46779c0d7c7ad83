//! Shell command execution and the child-process environment.

pub mod command;
pub mod environment;
pub mod mock;
pub mod runner;

pub use command::{
    execute, CommandExecutor, CommandOptions, CommandResult, ShellExecutor,
};
pub use environment::HostEnvironment;
pub use mock::{MockCall, MockExecutor};
pub use runner::CommandRunner;

/// Quote a path or argument for the host shell when it contains whitespace.
pub fn quote_arg(arg: &str) -> String {
    if arg.chars().any(char::is_whitespace) && !arg.starts_with('"') {
        format!("\"{}\"", arg)
    } else {
        arg.to_string()
    }
}
