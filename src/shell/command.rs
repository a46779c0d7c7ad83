//! Shell command execution.

use crate::error::{DevsetupError, Result};
use std::collections::HashMap;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use super::environment::HostEnvironment;

/// Result of executing a shell command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output (empty unless captured).
    pub stdout: String,

    /// Standard error (empty unless captured).
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether command succeeded (exit code 0).
    pub success: bool,
}

impl CommandResult {
    /// Create a success result.
    pub fn success(stdout: String, stderr: String, duration: Duration) -> Self {
        Self {
            exit_code: Some(0),
            stdout,
            stderr,
            duration,
            success: true,
        }
    }

    /// Create a failure result.
    pub fn failure(
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
        duration: Duration,
    ) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
            duration,
            success: false,
        }
    }
}

/// Options for command execution.
#[derive(Debug, Clone, Default)]
pub struct CommandOptions {
    /// Working directory.
    pub cwd: Option<PathBuf>,

    /// Environment variables (merged with system env).
    pub env: HashMap<String, String>,

    /// Capture stdout (if false, inherits from parent).
    pub capture_stdout: bool,

    /// Capture stderr (if false, inherits from parent).
    pub capture_stderr: bool,
}

/// Something that can run a shell command line.
///
/// [`ShellExecutor`] spawns real processes; [`MockExecutor`](super::MockExecutor)
/// records calls for tests.
pub trait CommandExecutor {
    /// Run `command` with the given environment snapshot.
    ///
    /// When `capture` is false the child inherits stdin, stdout and stderr so
    /// the user sees its output in real time. A command that cannot be
    /// started is an error; a non-zero exit is a failed [`CommandResult`].
    fn execute(
        &mut self,
        command: &str,
        env: &HostEnvironment,
        capture: bool,
    ) -> Result<CommandResult>;
}

/// Executes commands through the host shell.
#[derive(Debug, Clone, Default)]
pub struct ShellExecutor {
    cwd: Option<PathBuf>,
}

impl ShellExecutor {
    /// Create an executor that runs in the current directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an executor that runs every command in `cwd`.
    pub fn in_dir(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: Some(cwd.into()),
        }
    }
}

impl CommandExecutor for ShellExecutor {
    fn execute(
        &mut self,
        command: &str,
        env: &HostEnvironment,
        capture: bool,
    ) -> Result<CommandResult> {
        let options = CommandOptions {
            cwd: self.cwd.clone(),
            env: env.command_env()?,
            capture_stdout: capture,
            capture_stderr: capture,
        };
        execute(command, &options)
    }
}

/// Execute a shell command.
pub fn execute(command: &str, options: &CommandOptions) -> Result<CommandResult> {
    let start = Instant::now();

    let shell = detect_shell();

    let mut cmd = Command::new(&shell);
    cmd.arg(shell_flag());
    push_command_line(&mut cmd, command);

    if let Some(cwd) = &options.cwd {
        cmd.current_dir(cwd);
    }

    for (key, value) in &options.env {
        cmd.env(key, value);
    }

    cmd.stdin(Stdio::inherit());

    if options.capture_stdout {
        cmd.stdout(Stdio::piped());
    } else {
        cmd.stdout(Stdio::inherit());
    }

    if options.capture_stderr {
        cmd.stderr(Stdio::piped());
    } else {
        cmd.stderr(Stdio::inherit());
    }

    tracing::debug!("Spawning `{} {} {}`", shell, shell_flag(), command);

    let output = cmd.output().map_err(|source| DevsetupError::CommandSpawn {
        command: command.to_string(),
        source,
    })?;

    let duration = start.elapsed();

    let stdout = if options.capture_stdout {
        String::from_utf8_lossy(&output.stdout).to_string()
    } else {
        String::new()
    };

    let stderr = if options.capture_stderr {
        String::from_utf8_lossy(&output.stderr).to_string()
    } else {
        String::new()
    };

    if output.status.success() {
        Ok(CommandResult::success(stdout, stderr, duration))
    } else {
        Ok(CommandResult::failure(
            output.status.code(),
            stdout,
            stderr,
            duration,
        ))
    }
}

/// Detect the host shell.
fn detect_shell() -> String {
    if cfg!(target_os = "windows") {
        std::env::var("COMSPEC").unwrap_or_else(|_| "cmd.exe".to_string())
    } else {
        std::env::var("SHELL").unwrap_or_else(|_| "/bin/sh".to_string())
    }
}

/// Get the flag to pass commands to the shell.
fn shell_flag() -> &'static str {
    if cfg!(target_os = "windows") {
        "/C"
    } else {
        "-c"
    }
}

// cmd.exe does its own parsing of the command line, so it must receive the
// string verbatim rather than MSVC-escaped.
#[cfg(windows)]
fn push_command_line(cmd: &mut Command, command: &str) {
    use std::os::windows::process::CommandExt;
    cmd.raw_arg(command);
}

#[cfg(not(windows))]
fn push_command_line(cmd: &mut Command, command: &str) {
    cmd.arg(command);
}
