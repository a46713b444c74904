//! CLI module for porunga
//!
//! ## Commands
//!
//! - `test [DIR]` - Run the solution in DIR against `DIR/testdata`
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};

use crate::harness::config::DEFAULT_TIMEOUT_SECS;
use crate::version::PORUNGA_VERSION;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    /// Create a new CLI error with a message and exit code.
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }

    /// Create a failure that prints nothing (quiet mode).
    pub fn silent() -> Self {
        Self::new("", ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

// ============================================================================
// Clap CLI definition
// ============================================================================

/// A test framework for simple algorithms
#[derive(Parser, Debug)]
#[command(name = "porunga")]
#[command(version = PORUNGA_VERSION)]
#[command(about = "A test framework for simple algorithms", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a solution against its test data
    Test(TestArgs),
}

/// Arguments of the `test` subcommand
#[derive(Args, Debug, Clone, PartialEq)]
pub struct TestArgs {
    /// Problem directory (default: current directory)
    #[arg(value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Solution language: c, cpp, java, objc, python, ruby
    #[arg(short, long, value_name = "LANG", default_value = "python")]
    pub lang: String,

    /// Scan testdata/ recursively
    #[arg(short, long)]
    pub all: bool,

    /// Show failure details
    #[arg(short, long)]
    pub verbose: bool,

    /// Print nothing
    #[arg(short, long)]
    pub quiet: bool,

    /// Run a single input file instead of scanning testdata/
    #[arg(short, long, value_name = "FILE")]
    pub case: Option<PathBuf>,

    /// Per-case time limit in seconds (0 disables it)
    #[arg(short, long, value_name = "SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: f64,
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    match cli.command {
        Command::Test(args) => commands::test(args),
    }
}

// ============================================================================
// Tests
// ============================================================================
