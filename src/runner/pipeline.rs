//! Preflight followed by step sequencing.

use std::time::Instant;

use crate::logging::Logger;
use crate::requirements::{PreflightChecker, Prerequisite};
use crate::shell::{CommandExecutor, CommandRunner};

use super::sequencer::{PipelineReport, StepSequencer};

/// A complete provisioning run: prerequisites first, then steps.
///
/// If any prerequisite fails, no step is evaluated and nothing on the host
/// changes.
#[derive(Debug, Clone)]
pub struct Pipeline {
    prerequisites: Vec<Prerequisite>,
    checker: PreflightChecker,
    sequencer: StepSequencer,
}

impl Pipeline {
    /// Create a pipeline.
    pub fn new(
        prerequisites: Vec<Prerequisite>,
        checker: PreflightChecker,
        sequencer: StepSequencer,
    ) -> Self {
        Self {
            prerequisites,
            checker,
            sequencer,
        }
    }

    /// Prerequisites in check order.
    pub fn prerequisites(&self) -> &[Prerequisite] {
        &self.prerequisites
    }

    /// The step sequencer.
    pub fn sequencer(&self) -> &StepSequencer {
        &self.sequencer
    }

    /// Run preflight, then every step.
    pub fn run<E: CommandExecutor>(
        &self,
        runner: &mut CommandRunner<E>,
        logger: &mut Logger,
    ) -> PipelineReport {
        let start = Instant::now();

        if let Err(e) = self
            .checker
            .check_all(&self.prerequisites, runner, logger)
        {
            tracing::debug!("Preflight failed: {}", e);
            return PipelineReport::failed_before_steps(&e, start.elapsed());
        }

        let mut report = self.sequencer.run(runner, logger);
        report.duration = start.elapsed();
        report
    }
}
