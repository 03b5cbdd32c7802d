// Exercises the compiled binary's argument handling. The interactive form
// itself needs a TTY and is covered headlessly in headless_integration.rs.

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn help_lists_collector_options() {
    Command::cargo_bin("formpilot")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--collector-url"))
        .stdout(predicate::str::contains("--idle-threshold-ms"))
        .stdout(predicate::str::contains("--no-telemetry"));
}

#[test]
fn version_is_printed() {
    Command::cargo_bin("formpilot")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn refuses_to_run_without_a_tty() {
    Command::cargo_bin("formpilot")
        .unwrap()
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("stdin must be a tty"));
}

#[test]
fn rejects_non_numeric_threshold() {
    Command::cargo_bin("formpilot")
        .unwrap()
        .args(["--idle-threshold-ms", "soon"])
        .assert()
        .failure();
}
