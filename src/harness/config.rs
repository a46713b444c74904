//! Harness configuration
//!
//! A single explicit value built by the CLI and handed to discovery and
//! aggregation. Nothing reads configuration from shared state.

use std::path::PathBuf;
use std::time::Duration;

use super::error::{HarnessError, HarnessResult};

/// Default per-case wall-clock limit in seconds.
pub const DEFAULT_TIMEOUT_SECS: f64 = 3.0;

/// Name of the subdirectory scanned for test cases.
pub const TEST_DATA_DIR: &str = "testdata";

/// Harness configuration
#[derive(Debug, Clone, PartialEq)]
pub struct HarnessConfig {
    /// Directory holding the program under test and its `testdata/` folder
    pub root_dir: PathBuf,
    /// Walk every subdirectory of `testdata/` instead of only its top level
    pub recursive: bool,
    /// Run exactly this input file instead of scanning
    pub explicit_case: Option<PathBuf>,
    /// Per-case deadline; `None` waits for the child to exit on its own
    pub timeout: Option<Duration>,
    /// Surface failure diagnostics (stderr, expected vs actual)
    pub verbose: bool,
    /// Suppress all console output
    pub quiet: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("."),
            recursive: false,
            explicit_case: None,
            timeout: Some(Duration::from_secs_f64(DEFAULT_TIMEOUT_SECS)),
            verbose: false,
            quiet: false,
        }
    }
}

impl HarnessConfig {
    /// Create a config rooted at `root_dir` with default settings
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            ..Self::default()
        }
    }

    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn with_explicit_case(mut self, case: Option<PathBuf>) -> Self {
        self.explicit_case = case;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }
}

/// Convert a user-supplied number of seconds into an optional deadline.
///
/// Zero disables the deadline. Negative, NaN and infinite values are rejected.
pub fn timeout_from_secs(secs: f64) -> HarnessResult<Option<Duration>> {
    if !secs.is_finite() || secs < 0.0 {
        return Err(HarnessError::InvalidTimeout(secs));
    }
    if secs == 0.0 {
        return Ok(None);
    }
    Duration::try_from_secs_f64(secs)
        .map(Some)
        .map_err(|_| HarnessError::InvalidTimeout(secs))
}
