//! Supervised process runner
//!
//! Launches one shell command, feeds it an optional stdin payload, streams its
//! output into in-memory buffers and enforces an optional wall-clock deadline.
//!
//! ## Capture policy
//!
//! stdout and stderr are always captured into two separate buffers, whether or
//! not a deadline is set. `RunResult::output` is stdout only and is what gets
//! compared; `RunResult::stderr` exists for failure diagnostics.
//!
//! ## Deadline handling
//!
//! With a deadline the runner races `Child::wait` against `tokio::time::timeout`
//! instead of polling. When the deadline wins, the child's process group is
//! killed and the child reaped before `run` returns. Whatever output arrived up
//! to that point is kept. After a natural exit the group is killed as well, so
//! background jobs never outlive the call.

use std::borrow::Cow;
use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Synthetic exit code reported when the command could not be started at all.
pub const LAUNCH_FAILURE_EXIT_CODE: i32 = 127;

/// Exit code reported when the child was ended by a signal (no exit code).
pub const SIGNALED_EXIT_CODE: i32 = -1;

/// How long output readers may keep draining after a normal exit.
const DRAIN_GRACE_EXITED: Duration = Duration::from_millis(500);

/// How long output readers may keep draining after a forced kill.
const DRAIN_GRACE_KILLED: Duration = Duration::from_millis(100);

const READ_CHUNK: usize = 8 * 1024;

type SharedBuffer = Arc<Mutex<Vec<u8>>>;

/// Source for the child's standard input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputFeed {
    /// Connect this file directly as stdin (same as `cat file | command`)
    File(PathBuf),
    /// Write these bytes to stdin, then close it
    Bytes(Vec<u8>),
}

/// Outcome of a single supervised invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunResult {
    /// Captured stdout, in the order it was produced
    pub output: Vec<u8>,
    /// Captured stderr, kept for diagnostics only
    pub stderr: Vec<u8>,
    pub exit_code: i32,
    pub timed_out: bool,
    pub elapsed: Duration,
    /// Set when the command never started; `exit_code` is then `LAUNCH_FAILURE_EXIT_CODE`
    pub launch_error: Option<String>,
}

impl RunResult {
    fn launch_failure(message: String, elapsed: Duration) -> Self {
        Self {
            output: Vec::new(),
            stderr: Vec::new(),
            exit_code: LAUNCH_FAILURE_EXIT_CODE,
            timed_out: false,
            elapsed,
            launch_error: Some(message),
        }
    }

    /// A run succeeded iff it started, finished before the deadline and exited 0.
    pub fn success(&self) -> bool {
        self.launch_error.is_none() && !self.timed_out && self.exit_code == 0
    }

    pub fn output_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.output)
    }

    pub fn stderr_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.stderr)
    }
}

/// Run `command` through the platform shell.
///
/// A `timeout` of `None` or zero waits for the child to exit naturally, and
/// `timed_out` is then always false. Launch problems never surface as `Err`:
/// they come back as a `RunResult` with `launch_error` set.
pub async fn run(command: &str, input: Option<InputFeed>, timeout: Option<Duration>) -> RunResult {
    let start = Instant::now();
    let deadline = timeout.filter(|limit| !limit.is_zero());

    let (stdin, pending_input) = match prepare_stdin(input) {
        Ok(prepared) => prepared,
        Err(message) => {
            warn!(command, %message, "could not prepare child stdin");
            return RunResult::launch_failure(message, start.elapsed());
        }
    };

    let mut cmd = shell_command(command);
    cmd.stdin(stdin)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = match cmd.spawn() {
        Ok(child) => child,
        Err(e) => {
            warn!(command, error = %e, "failed to spawn child");
            return RunResult::launch_failure(format!("failed to start '{}': {}", command, e), start.elapsed());
        }
    };
    let pid = child.id();
    debug!(command, ?pid, ?deadline, "spawned child");

    let writer = match (pending_input, child.stdin.take()) {
        (Some(bytes), Some(mut stdin)) => Some(tokio::spawn(async move {
            // A child that stops reading early closes the pipe; that is not our failure.
            let _ = stdin.write_all(&bytes).await;
        })),
        _ => None,
    };

    let stdout_buf = SharedBuffer::default();
    let stderr_buf = SharedBuffer::default();
    let readers: Vec<JoinHandle<()>> = [
        child.stdout.take().map(|out| spawn_pump(out, Arc::clone(&stdout_buf))),
        child.stderr.take().map(|err| spawn_pump(err, Arc::clone(&stderr_buf))),
    ]
    .into_iter()
    .flatten()
    .collect();

    let (status, timed_out) = match deadline {
        None => (child.wait().await, false),
        Some(limit) => match tokio::time::timeout(limit, child.wait()).await {
            Ok(status) => (status, false),
            Err(_) => {
                debug!(command, ?pid, ?limit, "deadline elapsed, terminating child");
                (terminate(&mut child, pid).await, true)
            }
        },
    };

    let exit_code = match status {
        Ok(status) => exit_code_of(status),
        Err(e) => {
            warn!(command, error = %e, "failed to collect child exit status");
            SIGNALED_EXIT_CODE
        }
    };

    let grace = if timed_out {
        DRAIN_GRACE_KILLED
    } else {
        // Background jobs left behind by the shell would otherwise hold the pipes open
        kill_process_group(pid);
        DRAIN_GRACE_EXITED
    };
    drain(readers, grace).await;
    if let Some(writer) = writer {
        writer.abort();
    }

    let elapsed = start.elapsed();
    debug!(command, exit_code, timed_out, ?elapsed, "child finished");

    RunResult {
        output: take(&stdout_buf),
        stderr: take(&stderr_buf),
        exit_code,
        timed_out,
        elapsed,
        launch_error: None,
    }
}

fn prepare_stdin(input: Option<InputFeed>) -> Result<(Stdio, Option<Vec<u8>>), String> {
    match input {
        None => Ok((Stdio::null(), None)),
        Some(InputFeed::File(path)) => std::fs::File::open(&path)
            .map(|file| (Stdio::from(file), None))
            .map_err(|e| format!("cannot open input '{}': {}", path.display(), e)),
        Some(InputFeed::Bytes(bytes)) => Ok((Stdio::piped(), Some(bytes))),
    }
}

/// Plain `std` command that runs `command` through the platform shell.
#[cfg(unix)]
pub(crate) fn shell(command: &str) -> std::process::Command {
    let mut cmd = std::process::Command::new("sh");
    cmd.arg("-c").arg(command);
    cmd
}

#[cfg(not(unix))]
pub(crate) fn shell(command: &str) -> std::process::Command {
    let mut cmd = std::process::Command::new("cmd");
    cmd.arg("/C").arg(command);
    cmd
}

fn shell_command(command: &str) -> Command {
    let mut cmd = shell(command);
    // Own process group, so a timeout can take down the whole pipeline.
    #[cfg(unix)]
    std::os::unix::process::CommandExt::process_group(&mut cmd, 0);
    Command::from(cmd)
}

/// Kill the child (and on unix its process group), then reap it.
async fn terminate(child: &mut Child, pid: Option<u32>) -> std::io::Result<ExitStatus> {
    kill_process_group(pid);
    if let Err(e) = child.kill().await {
        debug!(error = %e, "kill after deadline reported an error");
    }
    child.wait().await
}

#[cfg(unix)]
fn kill_process_group(pid: Option<u32>) {
    use nix::sys::signal::{Signal, killpg};
    use nix::unistd::Pid;

    let Some(raw) = pid.and_then(|pid| i32::try_from(pid).ok()) else {
        return;
    };
    if let Err(errno) = killpg(Pid::from_raw(raw), Signal::SIGKILL) {
        debug!(pid = raw, %errno, "killpg failed");
    }
}

#[cfg(not(unix))]
fn kill_process_group(_pid: Option<u32>) {}

fn exit_code_of(status: ExitStatus) -> i32 {
    status.code().unwrap_or(SIGNALED_EXIT_CODE)
}

fn spawn_pump<R>(mut reader: R, sink: SharedBuffer) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut chunk = vec![0u8; READ_CHUNK];
        loop {
            match reader.read(&mut chunk).await {
                Ok(0) => break,
                Ok(n) => lock(&sink).extend_from_slice(&chunk[..n]),
                Err(e) => {
                    debug!(error = %e, "output stream read failed");
                    break;
                }
            }
        }
    })
}

/// Wait for the readers to hit EOF within one shared grace period.
///
/// Readers still open at the deadline are detached.
async fn drain(readers: Vec<JoinHandle<()>>, grace: Duration) {
    let deadline = tokio::time::Instant::now() + grace;
    for mut reader in readers {
        if tokio::time::timeout_at(deadline, &mut reader).await.is_err() {
            debug!("output reader still open after grace period, detaching");
            reader.abort();
        }
    }
}

fn lock(buffer: &SharedBuffer) -> MutexGuard<'_, Vec<u8>> {
    buffer.lock().unwrap_or_else(PoisonError::into_inner)
}

fn take(buffer: &SharedBuffer) -> Vec<u8> {
    std::mem::take(&mut *lock(buffer))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(all(test, unix))]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_captures_stdout() {
        let result = run("echo hello", None, None).await;
        assert!(result.success());
        assert_eq!(result.output_text(), "hello\n");
        assert!(!result.timed_out);
    }

    #[tokio::test]
    async fn test_stderr_captured_separately() {
        let result = run("echo out; echo err >&2", None, None).await;
        assert_eq!(result.output_text(), "out\n");
        assert_eq!(result.stderr_text(), "err\n");
    }

    #[tokio::test]
    async fn test_file_feed_becomes_stdin() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("case.in");
        fs::write(&input, "3 5\n").unwrap();

        let result = run("cat", Some(InputFeed::File(input)), None).await;
        assert!(result.success());
        assert_eq!(result.output, b"3 5\n");
    }

    #[tokio::test]
    async fn test_bytes_feed_becomes_stdin() {
        let result = run("tr a-z A-Z", Some(InputFeed::Bytes(b"shout".to_vec())), None).await;
        assert!(result.success());
        assert_eq!(result.output_text(), "SHOUT");
    }

    #[tokio::test]
    async fn test_non_zero_exit_code() {
        let result = run("exit 3", None, None).await;
        assert_eq!(result.exit_code, 3);
        assert!(!result.success());
        assert!(result.launch_error.is_none());
    }

    #[tokio::test]
    async fn test_missing_binary_reports_shell_not_found() {
        let result = run("definitely-not-a-real-binary-xyz", None, None).await;
        assert_eq!(result.exit_code, 127);
        assert!(!result.success());
    }

    #[tokio::test]
    async fn test_unreadable_input_is_launch_failure() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope.in");

        let result = run("cat", Some(InputFeed::File(missing)), None).await;
        assert_eq!(result.exit_code, LAUNCH_FAILURE_EXIT_CODE);
        assert!(result.launch_error.as_deref().unwrap().contains("nope.in"));
        assert!(!result.success());
    }

    #[tokio::test]
    async fn test_timeout_kills_and_keeps_partial_output() {
        let started = Instant::now();
        let result = run("echo partial; sleep 5", None, Some(Duration::from_millis(300))).await;

        assert!(result.timed_out);
        assert!(!result.success());
        assert!(result.output_text().contains("partial"));
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[tokio::test]
    async fn test_fast_command_under_deadline_not_timed_out() {
        let result = run("echo quick", None, Some(Duration::from_secs(5))).await;
        assert!(!result.timed_out);
        assert!(result.success());
        assert_eq!(result.output_text(), "quick\n");
    }

    #[tokio::test]
    async fn test_zero_timeout_means_no_deadline() {
        let result = run("sleep 0.2; echo done", None, Some(Duration::ZERO)).await;
        assert!(!result.timed_out);
        assert!(result.success());
        assert_eq!(result.output_text(), "done\n");
    }

    #[tokio::test]
    async fn test_background_job_holding_pipes_does_not_delay_exit() {
        let started = Instant::now();
        let result = run("sleep 3 & echo hi; echo err >&2", None, None).await;

        assert!(result.success());
        assert_eq!(result.output_text(), "hi\n");
        assert_eq!(result.stderr_text(), "err\n");
        assert!(result.elapsed < Duration::from_millis(700), "elapsed {:?}", result.elapsed);
        assert!(started.elapsed() < Duration::from_millis(700));
    }

    #[tokio::test]
    async fn test_drain_shares_one_deadline() {
        let stuck = || tokio::spawn(std::future::pending::<()>());
        let started = Instant::now();
        drain(vec![stuck(), stuck(), stuck()], Duration::from_millis(100)).await;
        assert!(started.elapsed() < Duration::from_millis(250));
    }

    /// Wait briefly for `pid` to disappear (or become a zombie awaiting its new parent).
    #[cfg(target_os = "linux")]
    async fn terminated(pid: &str) -> bool {
        let stat = PathBuf::from(format!("/proc/{}/stat", pid));
        for _ in 0..50 {
            match fs::read_to_string(&stat) {
                Err(_) => return true,
                Ok(s) if s.rsplit(')').next().is_some_and(|rest| rest.trim_start().starts_with('Z')) => return true,
                Ok(_) => tokio::time::sleep(Duration::from_millis(20)).await,
            }
        }
        false
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_timeout_reaps_background_pipeline() {
        let dir = tempdir().unwrap();
        let pid_file = dir.path().join("pid");
        let script = format!("sleep 30 & echo $! > {}; wait", pid_file.display());

        let result = run(&script, None, Some(Duration::from_millis(300))).await;
        assert!(result.timed_out);

        let pid = fs::read_to_string(&pid_file).unwrap().trim().to_string();
        assert!(terminated(&pid).await, "background sleep {} survived the timeout", pid);
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_background_job_killed_after_natural_exit() {
        let dir = tempdir().unwrap();
        let pid_file = dir.path().join("pid");
        let script = format!("sleep 30 > /dev/null 2>&1 & echo $! > {}", pid_file.display());

        let result = run(&script, None, None).await;
        assert!(result.success());

        let pid = fs::read_to_string(&pid_file).unwrap().trim().to_string();
        assert!(terminated(&pid).await, "background sleep {} outlived the run", pid);
    }
}
