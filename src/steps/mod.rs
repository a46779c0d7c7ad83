//! Provisioning steps.
//!
//! - [`Step`] - A named step with an idempotency policy and ordered actions
//! - [`Idempotency`] - Skip-if-present, always, or destructive reinstall
//! - [`Action`] - Individual side effects (commands, downloads, file copies)
//! - [`StepOutcome`] - What happened when a step was evaluated
//!
//! # Example
//!
//! ```
//! use devsetup::steps::{Action, Idempotency, Step};
//!
//! let step = Step::new("editor", "NeoVim")
//!     .idempotency(Idempotency::SkipIfPresent {
//!         path: r"C:\Program Files\Neovim".into(),
//!     })
//!     .action(Action::Run {
//!         command: "msiexec /i nvim-win64.msi /qn".to_string(),
//!     });
//!
//! assert_eq!(step.start_message(), "Installing NeoVim...");
//! assert_eq!(step.actions.len(), 1);
//! ```

pub mod action;
pub mod step;

pub use action::{Action, ActionFlow};
pub use step::{directory_exists, Idempotency, Step};

/// Result of evaluating one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// All actions ran.
    Completed,

    /// The idempotency check was satisfied; no action ran.
    Skipped,

    /// A non-fatal problem stopped this step; the pipeline went on.
    Recovered { message: String },

    /// The step ended the run successfully (two-run installer protocol).
    Halted { message: String },
}

impl StepOutcome {
    /// Whether any of the step's actions ran.
    pub fn executed(&self) -> bool {
        !matches!(self, StepOutcome::Skipped)
    }
}

impl std::fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            StepOutcome::Completed => "completed",
            StepOutcome::Skipped => "skipped",
            StepOutcome::Recovered { .. } => "recovered",
            StepOutcome::Halted { .. } => "halted",
        };
        write!(f, "{}", s)
    }
}
