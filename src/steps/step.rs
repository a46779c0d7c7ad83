//! Provisioning step definitions.

use std::path::{Path, PathBuf};

use super::action::Action;

/// How a step decides whether its actions need to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Idempotency {
    /// Skip the step when this directory already exists.
    SkipIfPresent { path: PathBuf },

    /// No check; the actions run on every invocation.
    Always,

    /// Recursively delete this directory if it exists, then always run.
    ///
    /// Existing state is destroyed unconditionally.
    Reinstall { path: PathBuf },
}

impl Idempotency {
    /// Whether the step's target state is already in place.
    ///
    /// Only [`Idempotency::SkipIfPresent`] can be satisfied.
    pub fn is_satisfied(&self) -> bool {
        match self {
            Idempotency::SkipIfPresent { path } => directory_exists(path),
            Idempotency::Always | Idempotency::Reinstall { .. } => false,
        }
    }

    /// Short description for listings.
    pub fn describe(&self) -> String {
        match self {
            Idempotency::SkipIfPresent { path } => format!("skip if {} exists", path.display()),
            Idempotency::Always => "always runs".to_string(),
            Idempotency::Reinstall { path } => {
                format!("removes {} and reinstalls", path.display())
            }
        }
    }
}

/// Whether `path` exists and is a directory.
pub fn directory_exists(path: &Path) -> bool {
    std::fs::metadata(path).map(|m| m.is_dir()).unwrap_or(false)
}

/// One installation step of the pipeline.
///
/// Steps are built once when the pipeline is constructed and never change
/// afterwards.
#[derive(Debug, Clone)]
pub struct Step {
    /// Identifier used in listings (e.g. "editor").
    pub name: String,

    /// Human name used in log lines (e.g. "NeoVim").
    pub title: String,

    /// Skip / always / reinstall policy.
    pub idempotency: Idempotency,

    /// Ordered side effects.
    pub actions: Vec<Action>,

    start_message: Option<String>,
    done_message: Option<String>,
}

impl Step {
    /// Create a step with no actions that always runs.
    pub fn new(name: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            idempotency: Idempotency::Always,
            actions: Vec::new(),
            start_message: None,
            done_message: None,
        }
    }

    /// Set the idempotency policy.
    pub fn idempotency(mut self, idempotency: Idempotency) -> Self {
        self.idempotency = idempotency;
        self
    }

    /// Append an action.
    pub fn action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    /// Append several actions.
    pub fn actions(mut self, actions: impl IntoIterator<Item = Action>) -> Self {
        self.actions.extend(actions);
        self
    }

    /// Override the line logged before the actions run.
    pub fn starting_with(mut self, message: impl Into<String>) -> Self {
        self.start_message = Some(message.into());
        self
    }

    /// Override the line logged after the actions complete.
    pub fn done_with(mut self, message: impl Into<String>) -> Self {
        self.done_message = Some(message.into());
        self
    }

    /// Line logged before the actions run.
    pub fn start_message(&self) -> String {
        self.start_message
            .clone()
            .unwrap_or_else(|| format!("Installing {}...", self.title))
    }

    /// Line logged after the actions complete.
    pub fn done_message(&self) -> String {
        self.done_message
            .clone()
            .unwrap_or_else(|| format!("{} installation completed.", self.title))
    }

    /// Whether the step would be skipped right now.
    pub fn is_satisfied(&self) -> bool {
        self.idempotency.is_satisfied()
    }
}
