//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait and is routed by
//! [`CommandDispatcher`]. All of them share the config loading in
//! [`CommandContext`].

pub mod check;
pub mod dispatcher;
pub mod list;
pub mod run;

pub use dispatcher::{Command, CommandContext, CommandDispatcher, CommandResult};
