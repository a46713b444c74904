//! Test comparator
//!
//! Runs one case through the process runner and classifies the result. Every
//! per-case problem ends up in the returned `ComparisonOutcome`; nothing here
//! returns an error.

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use tracing::debug;

use super::discovery::TestCase;
use super::process::{self, InputFeed, RunResult};

/// Why a case failed. Exactly one reason is reported per outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureDetail {
    /// The deadline elapsed and the child was killed
    Timeout,
    /// The command could not be started
    LaunchFailed(String),
    NonZeroExit { code: i32, stderr: String },
    UnreadableExpected { path: PathBuf, reason: String },
    /// Trimmed output differs from trimmed expected content
    Mismatch { expected: String, actual: String },
}

impl FailureDetail {
    /// Short, stable label for the failure kind.
    pub fn label(&self) -> &'static str {
        match self {
            FailureDetail::Timeout => "timeout",
            FailureDetail::LaunchFailed(_) => "launch failure",
            FailureDetail::NonZeroExit { .. } => "non-zero exit",
            FailureDetail::UnreadableExpected { .. } => "unreadable expected file",
            FailureDetail::Mismatch { .. } => "output mismatch",
        }
    }

    /// Multi-line diagnostic text for verbose reporting.
    pub fn diagnostic(&self) -> String {
        match self {
            FailureDetail::Timeout => "    Program exceeded the time limit and was terminated".to_string(),
            FailureDetail::LaunchFailed(reason) => format!("    Program could not be started: {}", reason),
            FailureDetail::NonZeroExit { code, stderr } => match shell_exit_hint(*code) {
                Some(hint) => format!("    Program returned with code {} ({}):\n{}", code, hint, stderr),
                None => format!("    Program returned with code {}:\n{}", code, stderr),
            },
            FailureDetail::UnreadableExpected { path, reason } => {
                format!("    Cannot read expected output {}: {}", path.display(), reason)
            }
            FailureDetail::Mismatch { expected, actual } => {
                format!("    Result was:\n{}\n but expected:\n{}\n", actual, expected)
            }
        }
    }
}

/// Exit codes the shell itself uses when it cannot run the command.
fn shell_exit_hint(code: i32) -> Option<&'static str> {
    match code {
        126 => Some("command found but not executable"),
        127 => Some("command not found"),
        _ => None,
    }
}

impl fmt::Display for FailureDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classified result of one case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonOutcome {
    pub passed: bool,
    pub elapsed: Duration,
    pub failure_detail: Option<FailureDetail>,
}

impl ComparisonOutcome {
    fn pass(elapsed: Duration) -> Self {
        Self {
            passed: true,
            elapsed,
            failure_detail: None,
        }
    }

    fn fail(elapsed: Duration, detail: FailureDetail) -> Self {
        Self {
            passed: false,
            elapsed,
            failure_detail: Some(detail),
        }
    }
}

/// Feed `case`'s input file to `binary` and compare against its expected output.
pub async fn evaluate(binary: &str, case: &TestCase, timeout: Option<Duration>) -> ComparisonOutcome {
    let feed = InputFeed::File(case.input_path().to_path_buf());
    let run = process::run(binary, Some(feed), timeout).await;
    let expected = tokio::fs::read(case.expected_output_path()).await;

    let outcome = classify(&run, expected, case);
    debug!(
        input = %case.input_path().display(),
        passed = outcome.passed,
        failure = outcome.failure_detail.as_ref().map(FailureDetail::label),
        "case evaluated"
    );
    outcome
}

/// Decide the outcome of a finished run.
///
/// Checks in priority order: timeout, launch failure, non-zero exit,
/// unreadable expected file, content mismatch.
pub fn classify(run: &RunResult, expected: io::Result<Vec<u8>>, case: &TestCase) -> ComparisonOutcome {
    let elapsed = run.elapsed;

    if run.timed_out {
        return ComparisonOutcome::fail(elapsed, FailureDetail::Timeout);
    }
    if let Some(reason) = &run.launch_error {
        return ComparisonOutcome::fail(elapsed, FailureDetail::LaunchFailed(reason.clone()));
    }
    if !run.success() {
        return ComparisonOutcome::fail(
            elapsed,
            FailureDetail::NonZeroExit {
                code: run.exit_code,
                stderr: run.stderr_text().into_owned(),
            },
        );
    }

    let expected = match expected {
        Ok(bytes) => bytes,
        Err(e) => {
            return ComparisonOutcome::fail(
                elapsed,
                FailureDetail::UnreadableExpected {
                    path: case.expected_output_path().to_path_buf(),
                    reason: e.to_string(),
                },
            );
        }
    };

    if outputs_match(&run.output, &expected) {
        ComparisonOutcome::pass(elapsed)
    } else {
        ComparisonOutcome::fail(
            elapsed,
            FailureDetail::Mismatch {
                expected: String::from_utf8_lossy(expected.trim_ascii()).into_owned(),
                actual: String::from_utf8_lossy(run.output.trim_ascii()).into_owned(),
            },
        )
    }
}

/// Leading/trailing whitespace is ignored; everything in between must match byte for byte.
pub fn outputs_match(actual: &[u8], expected: &[u8]) -> bool {
    actual.trim_ascii() == expected.trim_ascii()
}

// ============================================================================
// Tests
// ============================================================================
