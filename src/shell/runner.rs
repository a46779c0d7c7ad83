//! Mandatory command execution with run-log reporting.

use crate::error::{describe_exit, DevsetupError, Result};
use crate::logging::Logger;

use super::command::{CommandExecutor, ShellExecutor};
use super::environment::HostEnvironment;

/// Runs commands that must succeed.
///
/// Every command gets the runner's [`HostEnvironment`] snapshot. Success is
/// logged with the literal command text; failure logs exactly one error line
/// naming the command plus one line with the underlying reason, and is
/// returned as a fatal error.
#[derive(Debug)]
pub struct CommandRunner<E: CommandExecutor = ShellExecutor> {
    executor: E,
    env: HostEnvironment,
}

impl<E: CommandExecutor> CommandRunner<E> {
    /// Create a runner around an executor and an environment snapshot.
    pub fn new(executor: E, env: HostEnvironment) -> Self {
        Self { executor, env }
    }

    /// The environment snapshot passed to child processes.
    pub fn env(&self) -> &HostEnvironment {
        &self.env
    }

    /// Mutable access to the snapshot (PATH augmentation).
    pub fn env_mut(&mut self) -> &mut HostEnvironment {
        &mut self.env
    }

    /// The underlying executor.
    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Consume the runner, returning its executor.
    pub fn into_executor(self) -> E {
        self.executor
    }

    /// Run a command with inherited standard streams.
    pub fn run(&mut self, command: &str, logger: &mut Logger) -> Result<()> {
        tracing::debug!("Running command: {}", command);

        match self.executor.execute(command, &self.env, false) {
            Ok(result) if result.success => {
                logger.info(format!("Command executed: {}", command));
                Ok(())
            }
            Ok(result) => {
                logger.error(format!("Error executing command: {}", command));
                logger.error(format!("Process finished with {}", describe_exit(&result.exit_code)));
                Err(DevsetupError::CommandFailed {
                    command: command.to_string(),
                    code: result.exit_code,
                })
            }
            Err(DevsetupError::CommandSpawn { command, source }) => {
                logger.error(format!("Error executing command: {}", command));
                logger.error(source.to_string());
                Err(DevsetupError::CommandSpawn { command, source })
            }
            Err(e) => Err(e),
        }
    }

    /// Run a command with captured output and return its trimmed stdout.
    ///
    /// Nothing is logged; a non-zero exit is returned as
    /// [`DevsetupError::CommandFailed`].
    pub fn probe(&mut self, command: &str) -> Result<String> {
        tracing::debug!("Probing: {}", command);

        let result = self.executor.execute(command, &self.env, true)?;
        if result.success {
            Ok(result.stdout.trim().to_string())
        } else {
            tracing::debug!("Probe `{}` failed: {}", command, result.stderr.trim());
            Err(DevsetupError::CommandFailed {
                command: command.to_string(),
                code: result.exit_code,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::MockExecutor;

    fn runner(executor: MockExecutor) -> CommandRunner<MockExecutor> {
        CommandRunner::new(executor, HostEnvironment::new("/tmp", "/data"))
    }

    #[test]
    fn success_logs_literal_command() {
        let mut runner = runner(MockExecutor::new());
        let mut logger = Logger::in_memory();

        runner.run("npm install -g pyright", &mut logger).unwrap();

        assert_eq!(
            logger.messages(),
            vec!["Command executed: npm install -g pyright"]
        );
        assert_eq!(runner.executor().commands(), vec!["npm install -g pyright"]);
    }

    #[test]
    fn failure_logs_one_error_with_command_text() {
        let mut runner = runner(MockExecutor::new().fail_on("msiexec", 1603));
        let mut logger = Logger::in_memory();

        let err = runner
            .run("msiexec /i nvim-win64.msi /qn", &mut logger)
            .unwrap_err();

        assert!(matches!(
            err,
            DevsetupError::CommandFailed {
                code: Some(1603),
                ..
            }
        ));
        let with_command: Vec<_> = logger
            .errors()
            .into_iter()
            .filter(|m| m.contains("msiexec /i nvim-win64.msi /qn"))
            .collect();
        assert_eq!(with_command.len(), 1);
        assert!(logger.errors().iter().any(|m| m.contains("exit code 1603")));
    }

    #[test]
    fn spawn_error_logs_underlying_reason() {
        let mut runner = runner(MockExecutor::new().missing("curl"));
        let mut logger = Logger::in_memory();

        let err = runner.run("curl -L -o a b", &mut logger).unwrap_err();

        assert!(matches!(err, DevsetupError::CommandSpawn { .. }));
        assert!(err.is_reported());
        assert_eq!(logger.errors().len(), 2);
        assert_eq!(logger.errors()[0], "Error executing command: curl -L -o a b");
    }

    #[test]
    fn probe_returns_trimmed_stdout() {
        let mut runner = runner(MockExecutor::new().respond("git --version", "git version 2.43.0\n"));

        let out = runner.probe("git --version").unwrap();

        assert_eq!(out, "git version 2.43.0");
        assert_eq!(runner.executor().probes(), vec!["git --version"]);
        assert!(runner.executor().commands().is_empty());
    }

    #[test]
    fn probe_failure_is_an_error() {
        let mut runner = runner(MockExecutor::new().fail_on("node", 127));
        assert!(runner.probe("node --version").is_err());
    }

    #[test]
    fn env_mut_changes_snapshot_for_later_commands() {
        let mut runner = runner(MockExecutor::new());
        runner
            .env_mut()
            .augment_path(&[std::path::PathBuf::from("/opt/msys/bin")]);
        assert_eq!(runner.env().path_entries().len(), 1);
    }
}
