//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::env;
use std::fmt::Display;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::harness::{self, ConsoleReporter, FilesystemDiscovery, HarnessConfig, HarnessError};
use crate::lang::{self, Language};

use super::{CliError, CliResult, ExitCode, TestArgs};

/// Run the solution for a problem directory against its test data.
///
/// Configuration problems (bad language, bad timeout, failed compilation,
/// unusable test data directory) abort with exit code 1. Otherwise the exit
/// code is 0 iff every case passed.
pub fn test(args: TestArgs) -> CliResult<ExitCode> {
    let quiet = args.quiet;
    let fatal = |err: &dyn Display| fatal_error(quiet, err);

    let root_dir = resolve_root(args.dir.as_deref()).map_err(|e| fatal(&e))?;
    let timeout = harness::timeout_from_secs(args.timeout).map_err(|e| fatal(&e))?;
    let config = HarnessConfig::new(root_dir)
        .with_recursive(args.all)
        .with_explicit_case(args.case)
        .with_timeout(timeout)
        .with_verbose(args.verbose)
        .with_quiet(quiet);

    let language = Language::from_name(&args.lang).map_err(|e| fatal(&e))?;
    let plan = language.plan(&config.root_dir.to_string_lossy());
    debug!(%language, run = %plan.run_command, compile = ?plan.compile_command, "resolved build plan");
    lang::compile(&plan).map_err(|e| fatal(&e))?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| fatal(&HarnessError::Runtime(e)))?;

    let discovery = FilesystemDiscovery::from(&config);
    let mut reporter = ConsoleReporter::stdout(config.verbose, config.quiet);
    let summary = runtime
        .block_on(harness::run_suite(&config, &plan.run_command, &discovery, &mut reporter))
        .map_err(|e| fatal(&e))?;

    Ok(ExitCode(summary.exit_code()))
}

/// Problem directory to test. Defaults to the current directory.
///
/// Paths without a final name component (`.`, `..`) are made absolute so the
/// solution name can be derived from them.
fn resolve_root(dir: Option<&Path>) -> std::io::Result<PathBuf> {
    match dir {
        None => env::current_dir(),
        Some(dir) if dir.file_name().is_none() => std::path::absolute(dir),
        Some(dir) => Ok(dir.to_path_buf()),
    }
}

fn fatal_error(quiet: bool, err: &dyn Display) -> CliError {
    if quiet {
        CliError::silent()
    } else {
        CliError::failure(format!("\x1b[31mERROR: {}\x1b[0m", err))
    }
}

// ============================================================================
// Tests
// ============================================================================
