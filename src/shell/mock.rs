//! Mock executor for testing.
//!
//! `MockExecutor` implements [`CommandExecutor`] without spawning anything.
//! It records every command line and answers according to substring rules
//! configured up front.
//!
//! # Example
//!
//! ```
//! use devsetup::shell::{CommandExecutor, HostEnvironment, MockExecutor};
//!
//! let mut exec = MockExecutor::new()
//!     .respond("node --version", "v20.11.0")
//!     .fail_on("npm install", 1);
//! let env = HostEnvironment::new("/tmp", "/data");
//!
//! let out = exec.execute("node --version", &env, true).unwrap();
//! assert_eq!(out.stdout, "v20.11.0");
//! assert!(!exec.execute("npm install -g pyright", &env, false).unwrap().success);
//! assert_eq!(exec.commands(), vec!["npm install -g pyright"]);
//! ```

use std::time::Duration;

use crate::error::{DevsetupError, Result};

use super::command::{CommandExecutor, CommandResult};
use super::environment::HostEnvironment;

/// A recorded call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockCall {
    /// The command line.
    pub command: String,
    /// Whether output was captured (probe) or inherited (run).
    pub captured: bool,
    /// PATH entries visible to the call.
    pub path: Vec<std::path::PathBuf>,
}

/// Executor that records calls instead of spawning processes.
#[derive(Debug, Default)]
pub struct MockExecutor {
    calls: Vec<MockCall>,
    failures: Vec<(String, i32)>,
    missing: Vec<String>,
    responses: Vec<(String, String)>,
}

impl MockExecutor {
    /// Create an executor where every command succeeds with empty output.
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands containing `pattern` exit with `code`.
    pub fn fail_on(mut self, pattern: &str, code: i32) -> Self {
        self.failures.push((pattern.to_string(), code));
        self
    }

    /// Commands containing `pattern` cannot be started.
    pub fn missing(mut self, pattern: &str) -> Self {
        self.missing.push(pattern.to_string());
        self
    }

    /// Commands containing `pattern` print `stdout`.
    pub fn respond(mut self, pattern: &str, stdout: &str) -> Self {
        self.responses.push((pattern.to_string(), stdout.to_string()));
        self
    }

    /// Every call, in order.
    pub fn calls(&self) -> &[MockCall] {
        &self.calls
    }

    /// Command lines run with inherited streams, in order.
    pub fn commands(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter(|c| !c.captured)
            .map(|c| c.command.as_str())
            .collect()
    }

    /// Command lines run as captured probes, in order.
    pub fn probes(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter(|c| c.captured)
            .map(|c| c.command.as_str())
            .collect()
    }

    /// Whether any inherited-stream command contained `pattern`.
    pub fn ran(&self, pattern: &str) -> bool {
        self.commands().iter().any(|c| c.contains(pattern))
    }
}

impl CommandExecutor for MockExecutor {
    fn execute(
        &mut self,
        command: &str,
        env: &HostEnvironment,
        capture: bool,
    ) -> Result<CommandResult> {
        self.calls.push(MockCall {
            command: command.to_string(),
            captured: capture,
            path: env.path_entries().to_vec(),
        });

        if self.missing.iter().any(|p| command.contains(p.as_str())) {
            return Err(DevsetupError::CommandSpawn {
                command: command.to_string(),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "program not found",
                ),
            });
        }

        if let Some((_, code)) = self.failures.iter().find(|(p, _)| command.contains(p.as_str())) {
            return Ok(CommandResult::failure(
                Some(*code),
                String::new(),
                String::new(),
                Duration::ZERO,
            ));
        }

        let stdout = self
            .responses
            .iter()
            .find(|(p, _)| command.contains(p.as_str()))
            .map(|(_, out)| out.clone())
            .unwrap_or_default();

        Ok(CommandResult::success(stdout, String::new(), Duration::ZERO))
    }
}
