//! Configuration file discovery and loading.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::schema::DevsetupConfig;
use crate::error::{DevsetupError, Result};

/// Directory under the project root holding the config file.
pub const CONFIG_DIR: &str = ".devsetup";

/// Config file name inside [`CONFIG_DIR`].
pub const CONFIG_FILE: &str = "config.yml";

/// Default config file location for a project root.
pub fn default_config_path(project_root: &Path) -> PathBuf {
    project_root.join(CONFIG_DIR).join(CONFIG_FILE)
}

/// Find the project root by walking up from `start`.
///
/// Looks for a `.devsetup` directory first, then a `.git` directory.
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        if current.join(CONFIG_DIR).is_dir() {
            return Some(current);
        }

        if current.join(".git").exists() {
            return Some(current);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load a single config file.
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist.
/// Returns `ConfigParseError` if the YAML is invalid.
pub fn load_config_file(path: &Path) -> Result<DevsetupConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            DevsetupError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            DevsetupError::Io(e)
        }
    })?;

    parse_config(&content, path)
}

/// Parse YAML content. Blank content yields the defaults.
pub fn parse_config(content: &str, source_path: &Path) -> Result<DevsetupConfig> {
    if content.trim().is_empty() {
        return Ok(DevsetupConfig::default());
    }

    serde_yaml::from_str(content).map_err(|e| DevsetupError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load the configuration for a project.
///
/// With `config_override` only that file is read and it must exist. Without
/// it, `.devsetup/config.yml` under `project_root` is read if present;
/// otherwise the built-in defaults apply. Relative working paths are then
/// resolved against `project_root`.
pub fn load_config(project_root: &Path, config_override: Option<&Path>) -> Result<DevsetupConfig> {
    let mut config = match config_override {
        Some(path) => load_config_file(path)?,
        None => {
            let path = default_config_path(project_root);
            if path.is_file() {
                load_config_file(&path)?
            } else {
                tracing::debug!("No config at {}, using defaults", path.display());
                DevsetupConfig::default()
            }
        }
    };

    resolve_relative_paths(&mut config, project_root);
    Ok(config)
}

/// Anchor the project-relative paths (log file, work dir, staged configs).
///
/// Host locations such as the editor or fonts directory are left untouched.
pub fn resolve_relative_paths(config: &mut DevsetupConfig, project_root: &Path) {
    for path in [
        &mut config.settings.log_path,
        &mut config.settings.work_dir,
        &mut config.paths.config_source_dir,
    ] {
        if path.is_relative() {
            *path = project_root.join(&*path);
        }
    }
}
