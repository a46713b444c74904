#![forbid(unsafe_code)]
//! Porunga - a test framework for simple algorithms
//!
//! Runs a solution program once per test case found under `testdata/`, pipes
//! the case's `.in` file to its stdin, and compares the trimmed output with
//! the matching `.out` file.
//!
//! ## Panic Policy
//!
//! This codebase follows explicit error handling:
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` and `harness` modules
//!   enforce `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! - **Per-case failures**: a crashing, hanging or missing solution is a failed case, never a harness error.

pub mod cli;
pub mod harness;
pub mod lang;
pub mod version;

pub use harness::{ComparisonOutcome, HarnessConfig, RunResult, RunSummary, TestCase};
pub use lang::{BuildPlan, Language};
