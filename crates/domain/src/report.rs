//! Run results handed to reporters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::target::Target;
use crate::testing::{Test, TestStatus};

/// Verdict counts of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Number of tests.
    pub total: usize,
    /// Tests answered with an expected status.
    pub ok: usize,
    /// Tests that got no response.
    pub err: usize,
    /// Tests answered with an unexpected status.
    pub fail: usize,
}

impl RunSummary {
    /// Tallies the verdicts of `tests`. Unexecuted tests count towards
    /// `total` only.
    #[must_use]
    pub fn from_tests(tests: &[Test]) -> Self {
        tests.iter().fold(
            Self {
                total: tests.len(),
                ..Self::default()
            },
            |mut summary, test| {
                match test.test_status {
                    Some(TestStatus::Ok) => summary.ok += 1,
                    Some(TestStatus::Err) => summary.err += 1,
                    Some(TestStatus::Fail) => summary.fail += 1,
                    None => {}
                }
                summary
            },
        )
    }

    /// Returns true if every test passed.
    #[must_use]
    pub const fn all_ok(&self) -> bool {
        self.ok == self.total
    }

    /// Get pass rate as percentage.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn pass_rate(&self) -> f64 {
        if self.total == 0 {
            100.0
        } else {
            (self.ok as f64 / self.total as f64) * 100.0
        }
    }
}

/// Everything a reporter needs about one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// The tested target.
    pub target: Target,
    /// When the first probe was scheduled.
    pub started_at: DateTime<Utc>,
    /// When the last probe finished.
    pub finished_at: DateTime<Utc>,
    /// Executed tests, in input order.
    pub tests: Vec<Test>,
    /// Verdict counts.
    pub summary: RunSummary,
}

impl RunReport {
    /// Creates a report and tallies its summary.
    #[must_use]
    pub fn new(
        target: Target,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
        tests: Vec<Test>,
    ) -> Self {
        let summary = RunSummary::from_tests(&tests);
        Self {
            target,
            started_at,
            finished_at,
            tests,
            summary,
        }
    }

    /// Returns the tests with the given verdict.
    pub fn with_status(&self, status: TestStatus) -> impl Iterator<Item = &Test> {
        self.tests
            .iter()
            .filter(move |t| t.test_status == Some(status))
    }
}
