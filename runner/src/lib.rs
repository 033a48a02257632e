use serde::{Deserialize, Serialize};

use rfstest_core::controller::Completion;
use rfstest_core::session::SessionOutcome;
use rfstest_core::types::{TestId, Verdict};

/// One accepted report in the run report
#[derive(Serialize, Deserialize, Debug)]
pub struct ReportEntry {
    pub test_id: TestId,
    pub passed: bool,
}

/// JSON summary of one harness run
#[derive(Serialize, Deserialize, Debug)]
pub struct RunReport {
    pub suite: String,
    pub image: String,
    pub verdict: Verdict,
    pub executed: usize,
    pub passed: usize,
    pub expected: usize,
    pub timed_out: bool,
    pub generated_at: String,
    pub tests: Vec<ReportEntry>,
}

impl RunReport {
    pub fn new(suite: &str, image: &str, expected: usize, outcome: &SessionOutcome) -> Self {
        let run = outcome.run.as_ref();
        Self {
            suite: suite.to_string(),
            image: image.to_string(),
            verdict: outcome.verdict,
            executed: run.map_or(0, |r| r.executed),
            passed: run.map_or(0, |r| r.passed),
            expected,
            timed_out: run.is_some_and(|r| r.completion == Completion::TimedOut),
            generated_at: chrono::Utc::now().to_rfc3339(),
            tests: run.map_or_else(Vec::new, |r| {
                r.reports
                    .iter()
                    .map(|t| ReportEntry {
                        test_id: t.test_id,
                        passed: t.passed,
                    })
                    .collect()
            }),
        }
    }
}
