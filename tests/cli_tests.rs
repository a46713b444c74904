//! Integration tests for the `porunga` binary

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

fn porunga(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_porunga"))
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .unwrap()
}

fn python_available() -> bool {
    Command::new("python")
        .arg("--version")
        .output()
        .map(|out| out.status.success())
        .unwrap_or(false)
}

/// Lay out `<tmp>/fibs/fibs.py` plus test data, returning the problem dir.
fn fibs_problem(root: &Path, expected_02: &str) -> std::path::PathBuf {
    let dir = root.join("fibs");
    fs::create_dir_all(dir.join("testdata")).unwrap();
    fs::write(
        dir.join("fibs.py"),
        "import sys\nn = int(sys.stdin.read().split()[0])\na, b = 1, 1\nfor _ in range(n - 1):\n    a, b = b, a + b\nprint(a)\n",
    )
    .unwrap();
    fs::write(dir.join("testdata/01.in"), "1\n").unwrap();
    fs::write(dir.join("testdata/01.out"), "1\n").unwrap();
    fs::write(dir.join("testdata/02.in"), "10\n").unwrap();
    fs::write(dir.join("testdata/02.out"), expected_02).unwrap();
    dir
}

#[test]
fn test_help_lists_test_command() {
    let out = porunga(&["--help"]);
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).contains("test"));
}

#[test]
fn test_unknown_language_exits_non_zero() {
    let tmp = tempfile::tempdir().unwrap();
    let out = porunga(&["test", tmp.path().to_str().unwrap(), "-l", "cobol"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("Wrong language specified"));
}

#[test]
fn test_missing_testdata_exits_non_zero() {
    let tmp = tempfile::tempdir().unwrap();
    let out = porunga(&["test", tmp.path().to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("ERROR"));
}

#[test]
fn test_quiet_suppresses_error_text() {
    let tmp = tempfile::tempdir().unwrap();
    let out = porunga(&["test", tmp.path().to_str().unwrap(), "-q"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(out.stdout.is_empty());
    assert!(out.stderr.is_empty());
}

#[test]
fn test_python_solution_all_pass() {
    if !python_available() {
        return; // Skip if no python interpreter on PATH
    }
    let tmp = tempfile::tempdir().unwrap();
    let dir = fibs_problem(tmp.path(), "55\n");

    let out = porunga(&["test", dir.to_str().unwrap()]);
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(out.status.success(), "{}", stdout);
    assert!(stdout.contains("All 2 tests passed"));
}

#[test]
fn test_python_solution_failure_exit_code() {
    if !python_available() {
        return; // Skip if no python interpreter on PATH
    }
    let tmp = tempfile::tempdir().unwrap();
    let dir = fibs_problem(tmp.path(), "56\n");

    let out = porunga(&["test", dir.to_str().unwrap(), "-v"]);
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert_eq!(out.status.code(), Some(1));
    assert!(stdout.contains("1 out of 2 tests failed"));
    assert!(stdout.contains("but expected"));
}
