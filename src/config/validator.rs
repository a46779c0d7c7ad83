//! Configuration validation rules.
//!
//! - Prerequisites need a name, a probe command, and a version floor
//! - Sources must be non-empty
//! - Config file names must be bare file names
//! - Language server packages must be non-empty

use std::collections::HashSet;
use std::path::Path;

use crate::config::schema::{ConfigSource, DevsetupConfig};
use crate::error::{DevsetupError, Result};

/// Validation error with context.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Rule identifier
    pub rule: String,
    /// Human-readable error message
    pub message: String,
}

impl ValidationError {
    fn new(rule: &str, message: impl Into<String>) -> Self {
        Self {
            rule: rule.to_string(),
            message: message.into(),
        }
    }
}

/// Validate a configuration and return all errors.
pub fn validate_config(config: &DevsetupConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    errors.extend(validate_prerequisites(config));
    errors.extend(validate_sources(config));
    errors.extend(validate_config_files(config));
    errors.extend(validate_language_servers(config));

    errors
}

fn validate_prerequisites(config: &DevsetupConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for (index, prereq) in config.prerequisites.iter().enumerate() {
        if prereq.name.trim().is_empty() {
            errors.push(ValidationError::new(
                "prerequisite-name",
                format!("Prerequisite #{} has no name", index + 1),
            ));
        } else if !seen.insert(prereq.name.as_str()) {
            errors.push(ValidationError::new(
                "duplicate-prerequisite",
                format!("Prerequisite '{}' is listed more than once", prereq.name),
            ));
        }

        if prereq.command.trim().is_empty() {
            errors.push(ValidationError::new(
                "prerequisite-command",
                format!("Prerequisite '{}' has no probe command", prereq.name),
            ));
        }

        if prereq.min_version.trim().is_empty() {
            errors.push(ValidationError::new(
                "prerequisite-version",
                format!("Prerequisite '{}' has no min_version", prereq.name),
            ));
        }
    }

    errors
}

fn validate_sources(config: &DevsetupConfig) -> Vec<ValidationError> {
    let sources = &config.sources;
    let mut required = vec![
        ("editor_installer_url", &sources.editor_installer_url),
        ("toolchain_installer_url", &sources.toolchain_installer_url),
        ("font_archive_url", &sources.font_archive_url),
        ("framework_repo", &sources.framework_repo),
        ("framework_branch", &sources.framework_branch),
    ];
    if config.settings.config_source == ConfigSource::Remote {
        required.push(("remote_config_base_url", &sources.remote_config_base_url));
    }

    required
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| {
            ValidationError::new("empty-source", format!("sources.{} must not be empty", field))
        })
        .collect()
}

fn validate_config_files(config: &DevsetupConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for file in &config.config_files {
        let bare = Path::new(&file.name).file_name().and_then(|n| n.to_str());
        if bare != Some(file.name.as_str()) {
            errors.push(ValidationError::new(
                "config-file-name",
                format!("Config file '{}' must be a plain file name", file.name),
            ));
        }

        if file.target.is_absolute() {
            errors.push(ValidationError::new(
                "config-file-target",
                format!(
                    "Config file '{}' target must be relative to the framework directory",
                    file.name
                ),
            ));
        }
    }

    errors
}

fn validate_language_servers(config: &DevsetupConfig) -> Vec<ValidationError> {
    config
        .language_servers
        .iter()
        .filter(|pkg| pkg.trim().is_empty() || pkg.chars().any(char::is_whitespace))
        .map(|pkg| {
            ValidationError::new(
                "language-server",
                format!("Language server package '{}' is not a single npm package", pkg),
            )
        })
        .collect()
}

/// Validate and return Result (for convenience).
///
/// # Errors
///
/// Returns `ConfigValidationError` if any validation rules fail.
pub fn validate(config: &DevsetupConfig) -> Result<()> {
    let errors = validate_config(config);

    if errors.is_empty() {
        Ok(())
    } else {
        let messages: Vec<_> = errors.iter().map(|e| e.message.clone()).collect();
        Err(DevsetupError::ConfigValidationError {
            message: messages.join("; "),
        })
    }
}
