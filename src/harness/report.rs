//! Run reporting
//!
//! ## TestReporter Trait
//!
//! The aggregator emits events through `TestReporter` instead of printing, so
//! the console rendering, quiet mode and test doubles are all just reporters.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::aggregate::RunSummary;
use super::compare::{ComparisonOutcome, FailureDetail};
use super::discovery::TestCase;

const BLUE: &str = "\x1b[34m";
const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";

/// Trait for reporting harness progress and results.
pub trait TestReporter {
    /// Called once before any case runs
    fn on_run_start(&mut self, _root: &Path, _binary: &str) {}

    /// Called right before a case is evaluated
    fn on_case_start(&mut self, case: &TestCase);

    /// Called after a case has been evaluated
    fn on_case_complete(&mut self, case: &TestCase, outcome: &ComparisonOutcome);

    /// Called when every case has been attempted
    fn on_run_complete(&mut self, summary: &RunSummary);
}

/// Per-case event as exposed to front-ends.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseEvent {
    pub input_path: PathBuf,
    pub passed: bool,
    pub elapsed_secs: f64,
    pub failure_detail: Option<FailureDetail>,
}

impl CaseEvent {
    pub fn new(case: &TestCase, outcome: &ComparisonOutcome) -> Self {
        Self {
            input_path: case.input_path().to_path_buf(),
            passed: outcome.passed,
            elapsed_secs: outcome.elapsed.as_secs_f64(),
            failure_detail: outcome.failure_detail.clone(),
        }
    }
}

/// Reporter that just records what happened.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    pub started: Vec<PathBuf>,
    pub events: Vec<CaseEvent>,
    pub summary: Option<RunSummary>,
}

impl TestReporter for CollectingReporter {
    fn on_case_start(&mut self, case: &TestCase) {
        self.started.push(case.input_path().to_path_buf());
    }

    fn on_case_complete(&mut self, case: &TestCase, outcome: &ComparisonOutcome) {
        self.events.push(CaseEvent::new(case, outcome));
    }

    fn on_run_complete(&mut self, summary: &RunSummary) {
        self.summary = Some(summary.clone());
    }
}

/// Default console reporter
///
/// ```text
/// Testing problems/fibs
/// =====================
///
///  => Binary: python problems/fibs/fibs.py
///
///  => Testing problems/fibs/testdata/01.in ... OK [0.031]s
///  => Testing problems/fibs/testdata/02.in ... Fail
///
///  => Total time: 0.062s
///  => 1 out of 2 tests failed
/// ```
pub struct ConsoleReporter<W: Write = io::Stdout> {
    out: W,
    pub verbose: bool,
    pub quiet: bool,
    pub color: bool,
}

impl ConsoleReporter {
    pub fn stdout(verbose: bool, quiet: bool) -> Self {
        Self::new(io::stdout(), verbose, quiet)
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W, verbose: bool, quiet: bool) -> Self {
        Self {
            out,
            verbose,
            quiet,
            color: true,
        }
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn log(&mut self, message: &str, color: &str, newline: bool) {
        if self.quiet {
            return;
        }
        let written = if self.color {
            write!(self.out, "{}{}{}", color, message, RESET)
        } else {
            write!(self.out, "{}", message)
        };
        // Console output is best effort; a closed stdout must not fail the run.
        let _ = written
            .and_then(|()| if newline { writeln!(self.out) } else { Ok(()) })
            .and_then(|()| self.out.flush());
    }

    fn blank(&mut self) {
        if !self.quiet {
            let _ = writeln!(self.out);
        }
    }

    fn info(&mut self, message: &str, newline: bool) {
        self.log(&format!(" => {}", message), BLUE, newline);
    }

    fn success(&mut self, message: &str) {
        self.log(&format!(" => {}", message), GREEN, true);
    }

    fn error(&mut self, message: &str) {
        self.log(&format!(" => {}", message), RED, true);
    }
}

impl<W: Write> TestReporter for ConsoleReporter<W> {
    fn on_run_start(&mut self, root: &Path, binary: &str) {
        let title = format!("Testing {}", root.display());
        let underline = "=".repeat(title.chars().count());
        self.log(&title, GREEN, true);
        self.log(&underline, GREEN, true);
        self.blank();
        self.info(&format!("Binary: {}", binary), true);
        self.blank();
    }

    fn on_case_start(&mut self, case: &TestCase) {
        self.info(&format!("Testing {} ... ", case.input_path().display()), false);
    }

    fn on_case_complete(&mut self, _case: &TestCase, outcome: &ComparisonOutcome) {
        if outcome.passed {
            self.log(&format!("OK [{:.3}]s", outcome.elapsed.as_secs_f64()), GREEN, true);
            return;
        }

        match &outcome.failure_detail {
            Some(FailureDetail::Timeout) => self.log("Timeout", RED, true),
            _ => self.log("Fail", RED, true),
        }
        if self.verbose {
            if let Some(detail) = &outcome.failure_detail {
                self.log(&detail.diagnostic(), RED, true);
            }
        }
    }

    fn on_run_complete(&mut self, summary: &RunSummary) {
        self.blank();
        self.info(&format!("Total time: {:.3}s", summary.total_elapsed.as_secs_f64()), true);
        if summary.is_success() {
            self.success(&format!("All {} tests passed", summary.total));
        } else {
            self.error(&format!("{} out of {} tests failed", summary.failed, summary.total));
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
