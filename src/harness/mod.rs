//! Test harness engine
//!
//! Executes a program once per discovered test case, captures its output under
//! an optional deadline and compares it with the expected-output file.
//!
//! ## Modules
//!
//! - `process` - supervised child process runner
//! - `discovery` - test case discovery and input/expected pairing
//! - `compare` - single-case evaluation and failure classification
//! - `aggregate` - sequential run over all cases, `RunSummary`
//! - `report` - `TestReporter` trait and console rendering
//! - `config` - explicit `HarnessConfig` value
//!
//! ## Flow
//!
//! `aggregate::run_suite` asks a `TestDiscovery` for cases, then for each case
//! `compare::evaluate` pipes the input file into the binary via
//! `process::run`, reads the expected file and classifies the outcome.

// Per-case problems are values, not panics
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod aggregate;
pub mod compare;
pub mod config;
pub mod discovery;
pub mod error;
pub mod process;
pub mod report;

pub use aggregate::{RunSummary, run_all, run_suite};
pub use compare::{ComparisonOutcome, FailureDetail, evaluate};
pub use config::{HarnessConfig, timeout_from_secs};
pub use discovery::{FilesystemDiscovery, TestCase, TestDiscovery, discover, expected_path_for};
pub use error::{HarnessError, HarnessResult};
pub use process::{InputFeed, RunResult, run};
pub use report::{CaseEvent, CollectingReporter, ConsoleReporter, TestReporter};
