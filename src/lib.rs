//! devsetup - Idempotent provisioning of a Windows editor environment.
//!
//! One run checks that the required tools are present, then walks a fixed
//! list of steps (editor, toolchain, font, editor framework, its
//! configuration, language servers). Each step decides from the filesystem
//! whether it still has work to do, so the run can be repeated safely.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Configuration loading, parsing, and validation
//! - [`error`] - Error types and result aliases
//! - [`logging`] - Timestamped run log
//! - [`plan`] - The provisioning steps built from configuration
//! - [`requirements`] - Preflight prerequisite checks
//! - [`runner`] - Pipeline and step sequencing
//! - [`shell`] - Shell command execution and the child environment
//! - [`steps`] - Steps, idempotency policies, and actions
//! - [`ui`] - Terminal styling
//!
//! # Example
//!
//! ```
//! use devsetup::logging::Logger;
//! use devsetup::runner::StepSequencer;
//! use devsetup::shell::{CommandRunner, HostEnvironment, MockExecutor};
//! use devsetup::steps::{Action, Step};
//!
//! let steps = vec![Step::new("lsp", "LSPs").action(Action::Run {
//!     command: "npm install -g pyright".to_string(),
//! })];
//! let mut runner = CommandRunner::new(MockExecutor::new(), HostEnvironment::new("/tmp", "/data"));
//! let mut logger = Logger::in_memory();
//!
//! let report = StepSequencer::new(steps).run(&mut runner, &mut logger);
//! assert_eq!(report.exit_code(), 0);
//! assert_eq!(runner.executor().commands(), vec!["npm install -g pyright"]);
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod plan;
pub mod requirements;
pub mod runner;
pub mod shell;
pub mod steps;
pub mod ui;

pub use error::{DevsetupError, Result};
