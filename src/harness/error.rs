//! Run-level harness errors
//!
//! Only failures that abort the whole run live here. Anything that goes wrong
//! while evaluating a single case is captured in its `ComparisonOutcome`.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that terminate a harness run before (or instead of) executing cases.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("test data directory '{}' does not exist", .0.display())]
    MissingTestData(PathBuf),

    #[error("failed to scan '{}': {source}", path.display())]
    Scan {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid timeout {0}: expected a finite number of seconds >= 0")]
    InvalidTimeout(f64),

    #[error("failed to start async runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

/// Result alias for run-level harness operations.
pub type HarnessResult<T> = Result<T, HarnessError>;
