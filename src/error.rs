//! Error types for devsetup operations.
//!
//! This module defines [`DevsetupError`], the primary error type used
//! throughout the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Prerequisite and command failures are fatal and abort the pipeline
//! - Both are logged at the point of failure, so callers must not log them again
//!   (see [`DevsetupError::is_reported`])
//! - Use `anyhow::Error` (via `DevsetupError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for devsetup operations.
#[derive(Debug, Error)]
pub enum DevsetupError {
    /// An explicitly requested configuration file does not exist.
    #[error("Configuration not found at {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration structure or values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// A required tool could not be probed at all.
    #[error("{name} is not installed. Please install it and run the script again.")]
    PrerequisiteMissing { name: String },

    /// A required tool is installed but below its version floor.
    #[error(
        "{name} version {required} or higher is required. Please update {name} and run the script again."
    )]
    PrerequisiteOutdated {
        name: String,
        required: String,
        found: String,
    },

    /// Probe output could not be compared with the version floor.
    #[error("Could not determine the version of {name} from '{output}'")]
    PrerequisiteUnparseable { name: String, output: String },

    /// Shell command exited with a non-zero status.
    #[error("Command failed with {}: {command}", describe_exit(.code))]
    CommandFailed { command: String, code: Option<i32> },

    /// Shell command could not be started.
    #[error("Could not start command '{command}': {source}")]
    CommandSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// A host environment value needed to build the plan is unavailable.
    #[error("Environment variable {name} is not set and no fallback is available")]
    EnvironmentMissing { name: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DevsetupError {
    /// Whether this error has already been written to the run log.
    ///
    /// The preflight checker and the command runner log their own failures.
    pub fn is_reported(&self) -> bool {
        matches!(
            self,
            DevsetupError::PrerequisiteMissing { .. }
                | DevsetupError::PrerequisiteOutdated { .. }
                | DevsetupError::PrerequisiteUnparseable { .. }
                | DevsetupError::CommandFailed { .. }
                | DevsetupError::CommandSpawn { .. }
        )
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            DevsetupError::ConfigNotFound { .. }
            | DevsetupError::ConfigParseError { .. }
            | DevsetupError::ConfigValidationError { .. } => 2,
            _ => 1,
        }
    }
}

/// Human-readable exit status.
pub(crate) fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

/// Result type alias for devsetup operations.
pub type Result<T> = std::result::Result<T, DevsetupError>;
