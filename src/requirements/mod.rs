//! Preflight requirement checking.
//!
//! This module verifies that the external tools the provisioning steps rely
//! on are installed and recent enough, before anything on the host changes.
//!
//! # Modules
//!
//! - [`prerequisite`] - Prerequisite definitions and defaults
//! - [`version`] - Version token extraction and comparators
//! - [`checker`] - The fail-fast preflight checker

pub mod checker;
pub mod prerequisite;
pub mod version;

pub use checker::{PreflightChecker, PreflightReport};
pub use prerequisite::{default_prerequisites, Prerequisite};
pub use version::{
    dotted_numeric_compare, extract_version, legacy_lexical_compare, VersionCompare,
};
