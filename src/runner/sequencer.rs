//! Step sequencing.
//!
//! Steps are evaluated exactly once, top to bottom. The first fatal error
//! ends the run; a halting step ends it successfully. Errors travel back to
//! the loop as values, so the log is flushed on every exit path.

use std::fs;
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::error::{DevsetupError, Result};
use crate::logging::Logger;
use crate::shell::{CommandExecutor, CommandRunner};
use crate::steps::{ActionFlow, Idempotency, Step, StepOutcome};

/// How a pipeline run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineStatus {
    /// Every step ran or was skipped.
    Completed,
    /// A step asked the user to finish something and ended the run early.
    Halted { step: String, message: String },
    /// A fatal error stopped the run.
    Failed {
        step: Option<String>,
        message: String,
    },
}

/// Outcome of one evaluated step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRecord {
    /// Step name.
    pub name: String,
    /// What happened.
    pub outcome: StepOutcome,
}

/// Result of a pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    /// Evaluated steps in order. Steps after a halt or failure are absent.
    pub records: Vec<StepRecord>,
    /// Final status.
    pub status: PipelineStatus,
    /// Wall-clock duration.
    pub duration: Duration,
}

impl PipelineReport {
    /// Report for a run that failed before any step was evaluated.
    pub fn failed_before_steps(error: &DevsetupError, duration: Duration) -> Self {
        Self {
            records: Vec::new(),
            status: PipelineStatus::Failed {
                step: None,
                message: error.to_string(),
            },
            duration,
        }
    }

    /// Process exit code: 0 on completion or halt, 1 on failure.
    pub fn exit_code(&self) -> i32 {
        match self.status {
            PipelineStatus::Completed | PipelineStatus::Halted { .. } => 0,
            PipelineStatus::Failed { .. } => 1,
        }
    }

    /// Whether the run ended without a fatal error.
    pub fn success(&self) -> bool {
        self.exit_code() == 0
    }

    /// Names of steps whose actions ran, in order.
    pub fn executed(&self) -> Vec<&str> {
        self.records
            .iter()
            .filter(|r| r.outcome.executed())
            .map(|r| r.name.as_str())
            .collect()
    }

    /// Names of steps skipped by their idempotency check, in order.
    pub fn skipped(&self) -> Vec<&str> {
        self.records
            .iter()
            .filter(|r| r.outcome == StepOutcome::Skipped)
            .map(|r| r.name.as_str())
            .collect()
    }
}

/// Preview of a step for listings and dry runs.
#[derive(Debug, Clone, Serialize)]
pub struct StepPreview {
    /// Step name.
    pub name: String,
    /// Step title.
    pub title: String,
    /// Whether the step would be skipped now.
    pub satisfied: bool,
    /// Idempotency description.
    pub policy: String,
    /// Action descriptions in order.
    pub actions: Vec<String>,
}

/// Owns the ordered step list and drives it.
#[derive(Debug, Clone, Default)]
pub struct StepSequencer {
    steps: Vec<Step>,
}

impl StepSequencer {
    /// Create a sequencer for the given steps.
    pub fn new(steps: Vec<Step>) -> Self {
        Self { steps }
    }

    /// The steps in execution order.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Describe what a run would do right now, without doing it.
    pub fn preview(&self) -> Vec<StepPreview> {
        self.steps
            .iter()
            .map(|step| StepPreview {
                name: step.name.clone(),
                title: step.title.clone(),
                satisfied: step.is_satisfied(),
                policy: step.idempotency.describe(),
                actions: step.actions.iter().map(|a| a.describe()).collect(),
            })
            .collect()
    }

    /// Run every step in order.
    pub fn run<E: CommandExecutor>(
        &self,
        runner: &mut CommandRunner<E>,
        logger: &mut Logger,
    ) -> PipelineReport {
        let start = Instant::now();
        let mut records = Vec::with_capacity(self.steps.len());

        for step in &self.steps {
            tracing::debug!("Evaluating step '{}'", step.name);

            match self.run_step(step, runner, logger) {
                Ok(StepOutcome::Halted { message }) => {
                    records.push(StepRecord {
                        name: step.name.clone(),
                        outcome: StepOutcome::Halted {
                            message: message.clone(),
                        },
                    });
                    return PipelineReport {
                        records,
                        status: PipelineStatus::Halted {
                            step: step.name.clone(),
                            message,
                        },
                        duration: start.elapsed(),
                    };
                }
                Ok(outcome) => records.push(StepRecord {
                    name: step.name.clone(),
                    outcome,
                }),
                Err(e) => {
                    if !e.is_reported() {
                        logger.error(format!("{} failed: {}", step.title, e));
                    }
                    return PipelineReport {
                        records,
                        status: PipelineStatus::Failed {
                            step: Some(step.name.clone()),
                            message: e.to_string(),
                        },
                        duration: start.elapsed(),
                    };
                }
            }
        }

        logger.info("Setup completed successfully!");
        PipelineReport {
            records,
            status: PipelineStatus::Completed,
            duration: start.elapsed(),
        }
    }

    /// Evaluate a single step.
    pub fn run_step<E: CommandExecutor>(
        &self,
        step: &Step,
        runner: &mut CommandRunner<E>,
        logger: &mut Logger,
    ) -> Result<StepOutcome> {
        match &step.idempotency {
            Idempotency::SkipIfPresent { .. } => {
                logger.info(format!("Checking if {} is installed...", step.title));
                if step.is_satisfied() {
                    logger.info(format!("{} is already installed.", step.title));
                    return Ok(StepOutcome::Skipped);
                }
            }
            Idempotency::Reinstall { path } => {
                logger.info(format!("Checking if {} is installed...", step.title));
                if path.is_dir() {
                    logger.info(format!("Removing existing {} installation...", step.title));
                    fs::remove_dir_all(path)?;
                    logger.info(format!("Existing {} installation removed.", step.title));
                }
            }
            Idempotency::Always => {}
        }

        logger.info(step.start_message());

        for action in &step.actions {
            match action.execute(runner, logger)? {
                ActionFlow::Continue => {}
                ActionFlow::Recovered(message) => {
                    logger.error(message.clone());
                    return Ok(StepOutcome::Recovered { message });
                }
                ActionFlow::Halt(message) => {
                    logger.info(message.clone());
                    return Ok(StepOutcome::Halted { message });
                }
            }
        }

        logger.info(step.done_message());
        Ok(StepOutcome::Completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::{HostEnvironment, MockExecutor};
    use crate::steps::Action;
    use tempfile::TempDir;

    fn runner(executor: MockExecutor) -> CommandRunner<MockExecutor> {
        CommandRunner::new(executor, HostEnvironment::new("/tmp", "/data"))
    }

    fn run(command: &str) -> Action {
        Action::Run {
            command: command.to_string(),
        }
    }

    #[test]
    fn satisfied_step_never_runs_its_actions() {
        let temp = TempDir::new().unwrap();
        let step = Step::new("editor", "NeoVim")
            .idempotency(Idempotency::SkipIfPresent {
                path: temp.path().to_path_buf(),
            })
            .action(run("install-editor"));
        let mut runner = runner(MockExecutor::new());
        let mut logger = Logger::in_memory();

        let report = StepSequencer::new(vec![step]).run(&mut runner, &mut logger);

        assert!(runner.executor().commands().is_empty());
        assert_eq!(report.skipped(), vec!["editor"]);
        assert!(logger
            .messages()
            .contains(&"NeoVim is already installed."));
    }

    #[test]
    fn steps_run_in_declared_order() {
        let steps = vec![
            Step::new("a", "A").action(run("one")),
            Step::new("b", "B").actions([run("two"), run("three")]),
            Step::new("c", "C").action(run("four")),
        ];
        let mut runner = runner(MockExecutor::new());
        let mut logger = Logger::in_memory();

        let report = StepSequencer::new(steps).run(&mut runner, &mut logger);

        assert_eq!(report.status, PipelineStatus::Completed);
        assert_eq!(
            runner.executor().commands(),
            vec!["one", "two", "three", "four"]
        );
        assert_eq!(
            logger.messages().last(),
            Some(&"Setup completed successfully!")
        );
    }

    #[test]
    fn fatal_command_stops_later_steps() {
        let steps = vec![
            Step::new("a", "A").actions([run("ok"), run("broken"), run("never")]),
            Step::new("b", "B").action(run("later")),
        ];
        let mut runner = runner(MockExecutor::new().fail_on("broken", 1));
        let mut logger = Logger::in_memory();

        let report = StepSequencer::new(steps).run(&mut runner, &mut logger);

        assert_eq!(report.exit_code(), 1);
        assert_eq!(runner.executor().commands(), vec!["ok", "broken"]);
        assert_eq!(
            logger.errors().iter().filter(|m| m.contains("broken")).count(),
            1
        );
        // Nothing is logged after the failure's own lines.
        assert!(logger.messages().last().unwrap().contains("exit code 1"));
    }

    #[test]
    fn halt_exits_successfully_without_later_steps() {
        let steps = vec![
            Step::new("toolchain", "msys2").actions([
                run("start installer"),
                Action::Halt {
                    message: "Please finish and run again.".to_string(),
                },
                run("unreachable"),
            ]),
            Step::new("font", "Font").action(run("curl font")),
        ];
        let mut runner = runner(MockExecutor::new());
        let mut logger = Logger::in_memory();

        let report = StepSequencer::new(steps).run(&mut runner, &mut logger);

        assert_eq!(report.exit_code(), 0);
        assert!(matches!(report.status, PipelineStatus::Halted { .. }));
        assert_eq!(runner.executor().commands(), vec!["start installer"]);
        assert_eq!(
            logger.messages().last(),
            Some(&"Please finish and run again.")
        );
    }

    #[test]
    fn recovered_step_logs_error_and_continues() {
        let temp = TempDir::new().unwrap();
        let steps = vec![
            Step::new("font", "Font").action(Action::InstallFonts {
                archive: temp.path().join("font.zip"),
                extracted_dir: temp.path().join("fonts"),
                fonts_dir: temp.path().join("out"),
                extension: "ttf".to_string(),
                missing_message: "Skipping font installation.".to_string(),
            }),
            Step::new("lsp", "LSP").action(run("npm install -g pyright")),
        ];
        let mut runner = runner(MockExecutor::new());
        let mut logger = Logger::in_memory();

        let report = StepSequencer::new(steps).run(&mut runner, &mut logger);

        assert_eq!(report.status, PipelineStatus::Completed);
        assert_eq!(logger.errors(), vec!["Skipping font installation."]);
        assert!(runner.executor().ran("pyright"));
        assert_eq!(
            report.records[0].outcome,
            StepOutcome::Recovered {
                message: "Skipping font installation.".to_string()
            }
        );
    }

    #[test]
    fn reinstall_removes_existing_directory_first() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("nvim");
        fs::create_dir_all(target.join("lua")).unwrap();
        fs::write(target.join("lua/old.lua"), "old").unwrap();

        let step = Step::new("framework", "NVChad")
            .idempotency(Idempotency::Reinstall {
                path: target.clone(),
            })
            .action(run("git clone"));
        let mut runner = runner(MockExecutor::new());
        let mut logger = Logger::in_memory();

        let report = StepSequencer::new(vec![step]).run(&mut runner, &mut logger);

        assert_eq!(report.executed(), vec!["framework"]);
        assert!(!target.exists());
        assert!(runner.executor().ran("git clone"));
        assert!(logger
            .messages()
            .contains(&"Removing existing NVChad installation..."));
    }

    #[test]
    fn reinstall_without_existing_directory_still_runs() {
        let temp = TempDir::new().unwrap();
        let step = Step::new("framework", "NVChad")
            .idempotency(Idempotency::Reinstall {
                path: temp.path().join("nvim"),
            })
            .action(run("git clone"));
        let mut runner = runner(MockExecutor::new());
        let mut logger = Logger::in_memory();

        StepSequencer::new(vec![step]).run(&mut runner, &mut logger);

        assert!(runner.executor().ran("git clone"));
        assert!(!logger
            .messages()
            .iter()
            .any(|m| m.starts_with("Removing existing")));
    }

    #[test]
    fn filesystem_error_is_logged_once_by_sequencer() {
        let temp = TempDir::new().unwrap();
        let step = Step::new("config", "NVChad config").action(Action::CopyFile {
            from: temp.path().join("missing.lua"),
            to: temp.path().join("out.lua"),
        });
        let mut runner = runner(MockExecutor::new());
        let mut logger = Logger::in_memory();

        let report = StepSequencer::new(vec![step]).run(&mut runner, &mut logger);

        assert_eq!(report.exit_code(), 1);
        assert_eq!(logger.errors().len(), 1);
        assert!(logger.errors()[0].starts_with("NVChad config failed:"));
    }

    #[test]
    fn preview_reports_satisfaction_and_actions() {
        let temp = TempDir::new().unwrap();
        let steps = vec![
            Step::new("editor", "NeoVim")
                .idempotency(Idempotency::SkipIfPresent {
                    path: temp.path().to_path_buf(),
                })
                .action(run("msiexec")),
            Step::new("lsp", "LSP").action(run("npm install -g pyright")),
        ];

        let preview = StepSequencer::new(steps).preview();

        assert!(preview[0].satisfied);
        assert!(!preview[1].satisfied);
        assert_eq!(preview[1].actions, vec!["npm install -g pyright"]);
    }
}
