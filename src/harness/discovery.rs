//! Test case discovery
//!
//! Cases live under `<root>/testdata/` as `name.in` / `name.out` pairs (or
//! `name.IN` / `name.OUT`). Discovery pairs every input file with the expected
//! output path derived from its suffix; it never checks that the expected file
//! exists. A missing expected file is a per-case failure reported later.

use std::collections::HashSet;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::config::{HarnessConfig, TEST_DATA_DIR};
use super::error::{HarnessError, HarnessResult};

/// Recognized input suffixes and the expected-output suffix each maps to.
const SUFFIX_PAIRS: [(&str, &str); 2] = [("in", "out"), ("IN", "OUT")];

/// A paired input / expected-output file set.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TestCase {
    input_path: PathBuf,
    expected_output_path: PathBuf,
}

impl TestCase {
    /// Build a case from an input path, deriving the expected path.
    ///
    /// Returns `None` when the input has no recognized suffix.
    pub fn from_input(input_path: impl Into<PathBuf>) -> Option<Self> {
        let input_path = input_path.into();
        let expected_output_path = expected_path_for(&input_path)?;
        Some(Self {
            input_path,
            expected_output_path,
        })
    }

    pub fn input_path(&self) -> &Path {
        &self.input_path
    }

    pub fn expected_output_path(&self) -> &Path {
        &self.expected_output_path
    }
}

/// Derive the expected-output path by pure suffix substitution.
///
/// `case.in` → `case.out`, `case.IN` → `case.OUT`; anything else → `None`.
pub fn expected_path_for(input: &Path) -> Option<PathBuf> {
    let extension = input.extension().and_then(OsStr::to_str)?;
    let (_, output_suffix) = SUFFIX_PAIRS.iter().find(|(input_suffix, _)| *input_suffix == extension)?;
    Some(input.with_extension(output_suffix))
}

/// Source of test cases.
///
/// Each call to `cases` performs a fresh scan; nothing is cached between calls.
pub trait TestDiscovery {
    fn cases(&self) -> HarnessResult<Vec<TestCase>>;
}

/// Filesystem-backed discovery rooted at a problem directory.
#[derive(Debug, Clone)]
pub struct FilesystemDiscovery {
    pub root_dir: PathBuf,
    pub recursive: bool,
    pub explicit_case: Option<PathBuf>,
}

impl FilesystemDiscovery {
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            recursive: false,
            explicit_case: None,
        }
    }
}

impl From<&HarnessConfig> for FilesystemDiscovery {
    fn from(config: &HarnessConfig) -> Self {
        Self {
            root_dir: config.root_dir.clone(),
            recursive: config.recursive,
            explicit_case: config.explicit_case.clone(),
        }
    }
}

impl TestDiscovery for FilesystemDiscovery {
    fn cases(&self) -> HarnessResult<Vec<TestCase>> {
        discover(&self.root_dir, self.recursive, self.explicit_case.as_deref())
    }
}

/// Discover the test cases for `root_dir`.
///
/// An explicit case short-circuits the scan and yields at most that one case.
/// Otherwise `root_dir/testdata` is scanned once per input suffix (top level
/// only, or every subdirectory when `recursive`), and the combined matches are
/// deduplicated while keeping first-seen order.
pub fn discover(root_dir: &Path, recursive: bool, explicit_case: Option<&Path>) -> HarnessResult<Vec<TestCase>> {
    if let Some(case) = explicit_case {
        return Ok(TestCase::from_input(case).into_iter().collect());
    }

    let test_dir = root_dir.join(TEST_DATA_DIR);
    if !test_dir.is_dir() {
        return Err(HarnessError::MissingTestData(test_dir));
    }

    let mut matches = Vec::new();
    for (input_suffix, _) in SUFFIX_PAIRS {
        scan_for_suffix(&test_dir, input_suffix, recursive, &mut matches)?;
    }
    let inputs = dedup_preserving_order(matches);

    let cases: Vec<TestCase> = inputs.into_iter().filter_map(TestCase::from_input).collect();
    debug!(dir = %test_dir.display(), recursive, count = cases.len(), "discovered test cases");
    Ok(cases)
}

/// Collect files ending in `.{suffix}` under `dir`.
///
/// Files of a directory come before the contents of its subdirectories.
fn scan_for_suffix(dir: &Path, suffix: &str, recursive: bool, found: &mut Vec<PathBuf>) -> HarnessResult<()> {
    let scan_err = |source| HarnessError::Scan {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).map_err(scan_err)? {
        let entry = entry.map_err(scan_err)?;
        let file_type = entry.file_type().map_err(scan_err)?;
        entries.push((entry.path(), file_type.is_dir()));
    }
    entries.sort();

    let mut subdirs = Vec::new();
    for (path, is_dir) in entries {
        if is_dir {
            if recursive {
                subdirs.push(path);
            }
        } else if path.extension() == Some(OsStr::new(suffix)) && path.is_file() {
            found.push(path);
        }
    }

    for subdir in subdirs {
        scan_for_suffix(&subdir, suffix, recursive, found)?;
    }
    Ok(())
}

fn dedup_preserving_order(paths: Vec<PathBuf>) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    paths.into_iter().filter(|path| seen.insert(path.clone())).collect()
}

// ============================================================================
// Tests
// ============================================================================
