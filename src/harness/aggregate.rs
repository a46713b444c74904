//! Run aggregator
//!
//! Visits cases one at a time in discovery order, never stopping early, and
//! tallies the results into a `RunSummary`.

use std::time::Duration;

use tracing::info;

use super::compare::{self, ComparisonOutcome};
use super::config::HarnessConfig;
use super::discovery::{TestCase, TestDiscovery};
use super::error::HarnessResult;
use super::report::TestReporter;

/// Totals for one harness run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub failed: usize,
    /// Sum of per-case elapsed times (harness overhead excluded)
    pub total_elapsed: Duration,
}

impl RunSummary {
    /// Fold one case outcome into the totals.
    pub fn record(&mut self, outcome: &ComparisonOutcome) {
        self.total += 1;
        if !outcome.passed {
            self.failed += 1;
        }
        self.total_elapsed += outcome.elapsed;
    }

    pub fn passed(&self) -> usize {
        self.total - self.failed
    }

    /// A run succeeds iff no case failed.
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    /// Process exit status for this run.
    pub fn exit_code(&self) -> i32 {
        if self.is_success() { 0 } else { 1 }
    }
}

/// Evaluate every case against `binary` and summarize.
pub async fn run_all<I, R>(binary: &str, cases: I, timeout: Option<Duration>, reporter: &mut R) -> RunSummary
where
    I: IntoIterator<Item = TestCase>,
    R: TestReporter + ?Sized,
{
    let mut summary = RunSummary::default();
    for case in cases {
        reporter.on_case_start(&case);
        let outcome = compare::evaluate(binary, &case, timeout).await;
        summary.record(&outcome);
        reporter.on_case_complete(&case, &outcome);
    }

    info!(
        total = summary.total,
        passed = summary.passed(),
        failed = summary.failed,
        elapsed = ?summary.total_elapsed,
        "run complete"
    );
    reporter.on_run_complete(&summary);
    summary
}

/// Discover cases, then run them all.
///
/// Discovery errors abort before any case runs or any progress is reported.
pub async fn run_suite<D, R>(
    config: &HarnessConfig,
    binary: &str,
    discovery: &D,
    reporter: &mut R,
) -> HarnessResult<RunSummary>
where
    D: TestDiscovery + ?Sized,
    R: TestReporter + ?Sized,
{
    let cases = discovery.cases()?;
    reporter.on_run_start(&config.root_dir, binary);
    Ok(run_all(binary, cases, config.timeout, reporter).await)
}

// ============================================================================
// Tests
// ============================================================================
