//! Configuration schema types.
//!
//! This module contains the struct definitions that map to
//! `.devsetup/config.yml`. Every field has a default, so an empty file (or
//! no file at all) yields the stock Windows editor setup.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::requirements::{default_prerequisites, Prerequisite, VersionCompare};

/// Root configuration structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DevsetupConfig {
    /// Global settings.
    pub settings: Settings,

    /// Tools checked before any step runs, in order.
    pub prerequisites: Vec<Prerequisite>,

    /// Host filesystem locations.
    pub paths: PathsConfig,

    /// Download and clone sources.
    pub sources: SourcesConfig,

    /// Editor configuration files placed after the framework is cloned.
    pub config_files: Vec<ConfigFile>,

    /// npm packages installed globally as language servers.
    pub language_servers: Vec<String>,
}

impl Default for DevsetupConfig {
    fn default() -> Self {
        Self {
            settings: Settings::default(),
            prerequisites: default_prerequisites(),
            paths: PathsConfig::default(),
            sources: SourcesConfig::default(),
            config_files: default_config_files(),
            language_servers: vec![
                "pyright".to_string(),
                "typescript-language-server".to_string(),
            ],
        }
    }
}

/// Global settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Run log file, appended to on every run.
    pub log_path: PathBuf,

    /// Directory installers and archives are downloaded into.
    pub work_dir: PathBuf,

    /// Whether installers run unattended.
    pub installer_mode: InstallerMode,

    /// Where editor configuration files come from.
    pub config_source: ConfigSource,

    /// How prerequisite versions are compared.
    pub version_compare: VersionCompare,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_path: PathBuf::from("debug.log"),
            work_dir: PathBuf::from("."),
            installer_mode: InstallerMode::default(),
            config_source: ConfigSource::default(),
            version_compare: VersionCompare::default(),
        }
    }
}

/// Installer interaction mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallerMode {
    /// Pass quiet flags where the installer supports them.
    #[default]
    Silent,
    /// Let installers show their UI.
    Interactive,
}

/// Origin of the editor configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    /// Copy from `paths.config_source_dir`.
    #[default]
    Staged,
    /// Download from `sources.remote_config_base_url`.
    Remote,
}

/// Host filesystem locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Editor install directory; its presence means the editor is installed.
    pub editor_dir: PathBuf,

    /// Toolchain install directory; its presence means it is installed.
    pub toolchain_dir: PathBuf,

    /// Toolchain directories added to PATH for later commands.
    pub toolchain_bin_dirs: Vec<PathBuf>,

    /// System font directory.
    pub fonts_dir: PathBuf,

    /// Framework directory. Defaults to `<LOCALAPPDATA>/nvim`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub framework_dir: Option<PathBuf>,

    /// Directory holding the staged configuration files.
    pub config_source_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            editor_dir: PathBuf::from(r"C:\Program Files\Neovim"),
            toolchain_dir: PathBuf::from(r"C:\msys64"),
            toolchain_bin_dirs: vec![
                PathBuf::from(r"C:\msys64\usr\bin"),
                PathBuf::from(r"C:\msys64\mingw64\bin"),
            ],
            fonts_dir: PathBuf::from(r"C:\Windows\Fonts"),
            framework_dir: None,
            config_source_dir: PathBuf::from("configs"),
        }
    }
}

/// Download and clone sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    /// Editor MSI installer.
    pub editor_installer_url: String,

    /// Toolchain installer executable.
    pub toolchain_installer_url: String,

    /// Font zip archive.
    pub font_archive_url: String,

    /// Framework git repository.
    pub framework_repo: String,

    /// Framework branch or tag to clone.
    pub framework_branch: String,

    /// Base URL for remote configuration files.
    pub remote_config_base_url: String,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            editor_installer_url:
                "https://github.com/neovim/neovim/releases/latest/download/nvim-win64.msi"
                    .to_string(),
            toolchain_installer_url: "https://github.com/msys2/msys2-installer/releases/download/2024-01-13/msys2-x86_64-20240113.exe".to_string(),
            font_archive_url: "https://download.jetbrains.com/fonts/JetBrainsMono-2.242.zip"
                .to_string(),
            framework_repo: "https://github.com/NvChad/NvChad".to_string(),
            framework_branch: "v2.0".to_string(),
            remote_config_base_url:
                "https://raw.githubusercontent.com/tsmith165/nvchad-windows-installer/main/configs"
                    .to_string(),
        }
    }
}

/// One configuration file placed inside the framework directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigFile {
    /// File name, looked up in the staged dir or under the remote base URL.
    pub name: String,

    /// Destination directory relative to the framework directory.
    pub target: PathBuf,
}

impl ConfigFile {
    /// Create a config file entry.
    pub fn new(name: impl Into<String>, target: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            target: target.into(),
        }
    }
}

fn default_config_files() -> Vec<ConfigFile> {
    vec![
        ConfigFile::new("chadrc.lua", "lua/custom"),
        ConfigFile::new("plugins.lua", "lua/custom"),
        ConfigFile::new("lspconfig.lua", "lua/plugins/configs"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config: DevsetupConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, DevsetupConfig::default());
        assert_eq!(config.prerequisites.len(), 3);
        assert_eq!(config.settings.log_path, PathBuf::from("debug.log"));
    }

    #[test]
    fn partial_settings_keep_other_defaults() {
        let yaml = r#"
settings:
  installer_mode: interactive
  version_compare: numeric
"#;
        let config: DevsetupConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.settings.installer_mode, InstallerMode::Interactive);
        assert_eq!(config.settings.version_compare, VersionCompare::Numeric);
        assert_eq!(config.settings.config_source, ConfigSource::Staged);
        assert_eq!(config.paths.toolchain_dir, PathBuf::from(r"C:\msys64"));
    }

    #[test]
    fn prerequisites_replace_defaults() {
        let yaml = r#"
prerequisites:
  - name: Python
    command: python --version
    min_version: "3.8"
"#;
        let config: DevsetupConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            config.prerequisites,
            vec![Prerequisite::new("Python", "python --version", "3.8")]
        );
    }

    #[test]
    fn unknown_installer_mode_is_rejected() {
        let yaml = "settings:\n  installer_mode: loud\n";
        assert!(serde_yaml::from_str::<DevsetupConfig>(yaml).is_err());
    }

    #[test]
    fn default_config_files_target_framework_dirs() {
        let files = DevsetupConfig::default().config_files;
        assert_eq!(files[0], ConfigFile::new("chadrc.lua", "lua/custom"));
        assert_eq!(files[2].target, PathBuf::from("lua/plugins/configs"));
    }
}
