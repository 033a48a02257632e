//! Test run controller: the loop between "firmware is on the device"
//! and "we have a verdict".
//!
//! The controller reads report lines off the transport one at a time,
//! decodes them, dispatches each decoded report to its verifier and
//! tallies the outcome. It stops the moment the expected number of
//! reports has been accepted, or when its time budget runs out.

use std::io;
use std::time::{Duration, Instant};

use log::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::protocol::Report;
use crate::transport::{ReadOutcome, Transport};
use crate::types::{TestId, Verdict};
use crate::verifier::Registry;

/// Hard faults that abort a run
#[derive(Error, Debug)]
pub enum RunError {
    /// The firmware reported a test id the verifier table does not
    /// know. This is a harness/firmware build mismatch, not a test
    /// failure, and must not be masked as one.
    #[error("firmware reported unknown test id {0}")]
    UnknownTestId(TestId),
    #[error("transport error: {0}")]
    Transport(#[from] io::Error),
}

/// How the run loop ended
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// All expected reports were accepted
    Completed,
    /// The transport closed or the run deadline expired first
    TimedOut,
}

/// Outcome of one accepted report
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOutcome {
    pub test_id: TestId,
    pub passed: bool,
}

/// Aggregated result of a completed (or expired) run
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RunOutcome {
    pub completion: Completion,
    pub executed: usize,
    pub passed: usize,
    pub reports: Vec<ReportOutcome>,
}

impl RunOutcome {
    pub fn verdict(&self) -> Verdict {
        if self.completion == Completion::Completed && self.passed == self.executed {
            Verdict::Pass
        } else {
            Verdict::Fail
        }
    }
}

/// Loop parameters for one run
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Number of distinct reports to accept before concluding. Usually
    /// the registry size; a smaller value stops the run early.
    pub expected_total: usize,
    /// Wall-clock budget for the whole run; `None` leaves only the
    /// transport's per-read timeout as the liveness bound
    pub deadline: Option<Duration>,
}

/// Drives one `RUNNING` phase to completion.
///
/// Undecodable lines are discarded without advancing any counter; the
/// device emits garbage while it comes out of reset and occasional line
/// noise is expected. A report whose id is missing from the registry
/// aborts the run with [`RunError::UnknownTestId`].
pub fn run(
    transport: &mut dyn Transport,
    registry: &Registry,
    config: &RunConfig,
) -> Result<RunOutcome, RunError> {
    let started = Instant::now();
    let mut outcome = RunOutcome {
        completion: Completion::Completed,
        executed: 0,
        passed: 0,
        reports: Vec::with_capacity(config.expected_total),
    };

    while outcome.executed < config.expected_total {
        if let Some(deadline) = config.deadline {
            if started.elapsed() >= deadline {
                warn!(
                    "Run deadline expired after {} of {} reports",
                    outcome.executed, config.expected_total
                );
                outcome.completion = Completion::TimedOut;
                return Ok(outcome);
            }
        }

        let line = match transport.read_line()? {
            ReadOutcome::Line(line) => line,
            // Keep waiting; the deadline above bounds the loop
            ReadOutcome::TimedOut => continue,
            ReadOutcome::Closed => {
                warn!(
                    "Transport closed after {} of {} reports",
                    outcome.executed, config.expected_total
                );
                outcome.completion = Completion::TimedOut;
                return Ok(outcome);
            }
        };

        let report = match Report::parse(&line) {
            Ok(report) => report,
            Err(e) => {
                // Reset glitches and line noise land here
                debug!("Discarding line {:?}: {}", line.trim_end(), e);
                continue;
            }
        };

        let Some(check) = registry.get(report.test_id) else {
            return Err(RunError::UnknownTestId(report.test_id));
        };

        let passed = check.kind.verify(&report.values);
        outcome.executed += 1;
        if passed {
            outcome.passed += 1;
        }
        info!(
            "Test {}: {} ({}/{})",
            report.test_id,
            if passed { "PASS" } else { "FAIL" },
            outcome.executed,
            config.expected_total
        );
        outcome.reports.push(ReportOutcome {
            test_id: report.test_id,
            passed,
        });
    }

    Ok(outcome)
}
