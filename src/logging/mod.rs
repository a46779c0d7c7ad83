//! Run log.
//!
//! The [`Logger`] is the durable record of a provisioning run: every checked
//! condition, command and error is appended to a single file with a
//! timestamp and mirrored to the console. Developer diagnostics go through
//! `tracing` instead and never reach the run log.

pub mod logger;

pub use logger::{LogEntry, LogLevel, Logger};
