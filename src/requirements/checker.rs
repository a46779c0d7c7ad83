//! Preflight checker.
//!
//! Runs before any mutating step. Prerequisites are checked in declared
//! order and the first failure ends the check: later prerequisites are not
//! probed and only that failure is reported.

use std::cmp::Ordering;

use crate::error::{DevsetupError, Result};
use crate::logging::Logger;
use crate::shell::{CommandExecutor, CommandRunner};

use super::prerequisite::Prerequisite;
use super::version::{extract_version, VersionCompare};

/// A prerequisite that passed, with what was observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreflightReport {
    /// Prerequisite name.
    pub name: String,
    /// Raw probe output (trimmed).
    pub output: String,
    /// Version token compared with the floor.
    pub version: String,
}

/// Checks prerequisites against their version floors.
#[derive(Debug, Clone, Copy, Default)]
pub struct PreflightChecker {
    policy: VersionCompare,
}

impl PreflightChecker {
    /// Create a checker with the given comparison policy.
    pub fn new(policy: VersionCompare) -> Self {
        Self { policy }
    }

    /// Check every prerequisite, stopping at the first failure.
    ///
    /// Success for each is logged as `"<name> version: <output>"`. The
    /// failure, if any, is logged once and returned.
    pub fn check_all<E: CommandExecutor>(
        &self,
        prerequisites: &[Prerequisite],
        runner: &mut CommandRunner<E>,
        logger: &mut Logger,
    ) -> Result<Vec<PreflightReport>> {
        let mut reports = Vec::with_capacity(prerequisites.len());
        for prereq in prerequisites {
            match self.check_one(prereq, runner) {
                Ok(report) => {
                    logger.info(format!("{} version: {}", report.name, report.output));
                    reports.push(report);
                }
                Err(e) => {
                    logger.error(e.to_string());
                    return Err(e);
                }
            }
        }
        Ok(reports)
    }

    /// Probe and compare a single prerequisite without logging.
    pub fn check_one<E: CommandExecutor>(
        &self,
        prereq: &Prerequisite,
        runner: &mut CommandRunner<E>,
    ) -> Result<PreflightReport> {
        let output = match runner.probe(&prereq.command) {
            Ok(output) => output,
            Err(DevsetupError::CommandFailed { .. }) | Err(DevsetupError::CommandSpawn { .. }) => {
                return Err(DevsetupError::PrerequisiteMissing {
                    name: prereq.name.clone(),
                });
            }
            Err(e) => return Err(e),
        };

        let version = extract_version(&output);
        tracing::debug!(
            "{}: observed {} (floor {}, {:?})",
            prereq.name,
            version,
            prereq.min_version,
            self.policy
        );

        match self.policy.compare(&version, &prereq.min_version) {
            Some(Ordering::Less) => Err(DevsetupError::PrerequisiteOutdated {
                name: prereq.name.clone(),
                required: prereq.min_version.clone(),
                found: version,
            }),
            Some(_) => Ok(PreflightReport {
                name: prereq.name.clone(),
                output,
                version,
            }),
            None => Err(DevsetupError::PrerequisiteUnparseable {
                name: prereq.name.clone(),
                output,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::{HostEnvironment, MockExecutor};

    fn runner(executor: MockExecutor) -> CommandRunner<MockExecutor> {
        CommandRunner::new(executor, HostEnvironment::new("/tmp", "/data"))
    }

    fn prereqs() -> Vec<Prerequisite> {
        vec![
            Prerequisite::new("Node.js", "node --version", "v14.0.0"),
            Prerequisite::new("Git", "git --version", "2.0.0"),
        ]
    }

    #[test]
    fn passing_prerequisites_log_observed_versions() {
        let mut runner = runner(
            MockExecutor::new()
                .respond("node", "v20.11.0")
                .respond("git", "git version 2.43.0"),
        );
        let mut logger = Logger::in_memory();

        let reports = PreflightChecker::default()
            .check_all(&prereqs(), &mut runner, &mut logger)
            .unwrap();

        assert_eq!(reports.len(), 2);
        assert_eq!(reports[1].version, "2.43.0");
        assert_eq!(
            logger.messages(),
            vec!["Node.js version: v20.11.0", "Git version: git version 2.43.0"]
        );
    }

    #[test]
    fn missing_tool_stops_before_later_prerequisites() {
        let mut runner = runner(MockExecutor::new().missing("node"));
        let mut logger = Logger::in_memory();

        let err = PreflightChecker::default()
            .check_all(&prereqs(), &mut runner, &mut logger)
            .unwrap_err();

        assert!(matches!(err, DevsetupError::PrerequisiteMissing { .. }));
        assert_eq!(runner.executor().probes(), vec!["node --version"]);
        assert_eq!(
            logger.errors(),
            vec!["Node.js is not installed. Please install it and run the script again."]
        );
    }

    #[test]
    fn non_zero_probe_counts_as_missing() {
        let mut runner = runner(MockExecutor::new().fail_on("git", 1));
        let prereq = Prerequisite::new("Git", "git --version", "2.0.0");

        let err = PreflightChecker::default()
            .check_one(&prereq, &mut runner)
            .unwrap_err();

        assert!(matches!(err, DevsetupError::PrerequisiteMissing { .. }));
    }

    #[test]
    fn outdated_tool_is_distinct_from_missing() {
        let mut runner = runner(MockExecutor::new().respond("git", "git version 1.9.5"));
        let prereq = Prerequisite::new("Git", "git --version", "2.0.0");

        let err = PreflightChecker::default()
            .check_one(&prereq, &mut runner)
            .unwrap_err();

        assert!(matches!(
            err,
            DevsetupError::PrerequisiteOutdated { ref found, .. } if found == "1.9.5"
        ));
    }

    #[test]
    fn lexical_policy_accepts_single_digit_major() {
        // 9.x passes a 14.x floor under the legacy comparator.
        let mut runner = runner(MockExecutor::new().respond("node", "v9.0.0"));
        let prereq = Prerequisite::new("Node.js", "node --version", "v14.0.0");

        assert!(PreflightChecker::new(VersionCompare::Lexical)
            .check_one(&prereq, &mut runner)
            .is_ok());
    }

    #[test]
    fn numeric_policy_rejects_single_digit_major() {
        let mut runner = runner(MockExecutor::new().respond("node", "v9.0.0"));
        let prereq = Prerequisite::new("Node.js", "node --version", "v14.0.0");

        let err = PreflightChecker::new(VersionCompare::Numeric)
            .check_one(&prereq, &mut runner)
            .unwrap_err();

        assert!(matches!(err, DevsetupError::PrerequisiteOutdated { .. }));
    }

    #[test]
    fn numeric_policy_reports_unparseable_output() {
        let mut runner = runner(MockExecutor::new().respond("tool", "dev build"));
        let prereq = Prerequisite::new("Tool", "tool --version", "1.0");

        let err = PreflightChecker::new(VersionCompare::Numeric)
            .check_one(&prereq, &mut runner)
            .unwrap_err();

        assert!(matches!(err, DevsetupError::PrerequisiteUnparseable { .. }));
    }
}
