//! Configuration loading, parsing, and validation.
//!
//! - Schema definitions in [`schema`]
//! - File discovery and loading in [`loader`]
//! - Validation in [`validator`]
//!
//! # Example
//!
//! ```
//! use devsetup::config::{load_config, validate};
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! let dir = temp.path().join(".devsetup");
//! fs::create_dir_all(&dir).unwrap();
//! fs::write(dir.join("config.yml"), "language_servers: [pyright]").unwrap();
//!
//! let config = load_config(temp.path(), None).unwrap();
//! validate(&config).unwrap();
//! assert_eq!(config.language_servers, vec!["pyright".to_string()]);
//! ```
//!
//! # Configuration File Location
//!
//! `.devsetup/config.yml` under the project root, or the file given with
//! `--config`. Without a file the built-in defaults describe the stock
//! Windows editor setup.

pub mod loader;
pub mod schema;
pub mod validator;

pub use loader::{
    default_config_path, find_project_root, load_config, load_config_file, parse_config,
    resolve_relative_paths,
};
pub use schema::{
    ConfigFile, ConfigSource, DevsetupConfig, InstallerMode, PathsConfig, Settings,
    SourcesConfig,
};
pub use validator::{validate, validate_config, ValidationError};
