//! Environment snapshot handed to every child process.
//!
//! The snapshot is taken once at startup. Steps that make newly installed
//! tools visible (the toolchain PATH step) extend the snapshot instead of
//! mutating the process environment, so later commands in the same run find
//! those tools while the parent environment stays untouched.

use std::collections::HashMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::anyhow;

use crate::error::{DevsetupError, Result};

/// Host environment values consumed by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostEnvironment {
    temp_dir: PathBuf,
    local_app_data: PathBuf,
    path: Vec<PathBuf>,
}

impl HostEnvironment {
    /// Create a snapshot from explicit values.
    pub fn new(temp_dir: impl Into<PathBuf>, local_app_data: impl Into<PathBuf>) -> Self {
        Self {
            temp_dir: temp_dir.into(),
            local_app_data: local_app_data.into(),
            path: Vec::new(),
        }
    }

    /// Set the PATH entries of the snapshot.
    pub fn with_path(mut self, path: Vec<PathBuf>) -> Self {
        self.path = path;
        self
    }

    /// Capture the snapshot from the real process environment.
    pub fn capture() -> Result<Self> {
        Self::from_lookup(|key: &str| std::env::var_os(key))
    }

    /// Capture the snapshot with a custom variable lookup.
    ///
    /// `TEMP` falls back to the OS temp directory and `LOCALAPPDATA` to the
    /// platform's local data directory.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let temp_dir = lookup("TEMP")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(std::env::temp_dir);

        let local_app_data = lookup("LOCALAPPDATA")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .or_else(dirs::data_local_dir)
            .ok_or_else(|| DevsetupError::EnvironmentMissing {
                name: "LOCALAPPDATA".to_string(),
            })?;

        let path = lookup("PATH")
            .map(|p| std::env::split_paths(&p).collect())
            .unwrap_or_default();

        Ok(Self {
            temp_dir,
            local_app_data,
            path,
        })
    }

    /// System temp directory (`TEMP`).
    pub fn temp_dir(&self) -> &Path {
        &self.temp_dir
    }

    /// Per-user local application data directory (`LOCALAPPDATA`).
    pub fn local_app_data(&self) -> &Path {
        &self.local_app_data
    }

    /// PATH entries in search order.
    pub fn path_entries(&self) -> &[PathBuf] {
        &self.path
    }

    /// Append each directory to PATH unless an equivalent entry is present.
    ///
    /// Returns the directories that were actually added.
    pub fn augment_path(&mut self, dirs: &[PathBuf]) -> Vec<PathBuf> {
        let mut added = Vec::new();
        for dir in dirs {
            if !self.path.iter().any(|p| same_entry(p, dir)) {
                self.path.push(dir.clone());
                added.push(dir.clone());
            }
        }
        added
    }

    /// Variables to set on child processes.
    pub fn command_env(&self) -> Result<HashMap<String, String>> {
        let joined = std::env::join_paths(&self.path)
            .map_err(|e| anyhow!("PATH entry cannot be joined: {}", e))?;
        let mut env = HashMap::new();
        env.insert("PATH".to_string(), joined.to_string_lossy().into_owned());
        env.insert(
            "TEMP".to_string(),
            self.temp_dir.to_string_lossy().into_owned(),
        );
        Ok(env)
    }
}

// PATH lookups on the target host are case-insensitive and tolerate a
// trailing separator.
fn same_entry(a: &Path, b: &Path) -> bool {
    fn normalize(p: &Path) -> String {
        p.to_string_lossy()
            .trim_end_matches(['\\', '/'])
            .to_ascii_lowercase()
    }
    normalize(a) == normalize(b)
}
