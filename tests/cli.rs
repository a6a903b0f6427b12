use assert_cmd::prelude::*;
use std::process::Command;

fn awscredget() -> Command {
    let mut cmd = Command::cargo_bin("awscredget").unwrap();
    cmd.env_remove("AWSCREDGET_DURATION")
        .env_remove("AWSCREDGET_FORMAT")
        .env_remove("AWSCREDGET_MAX_DURATION");
    cmd
}

#[test]
fn invalid_duration_fails_without_stdout() {
    let output = awscredget().args(["-d", "1"]).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid duration"), "stderr: {stderr}");
}

#[test]
fn unknown_format_fails_without_stdout() {
    let output = awscredget().args(["-f", "yaml"]).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown output format: yaml"), "stderr: {stderr}");
}

#[test]
fn usage_error_exits_2() {
    awscredget()
        .args(["-d", "soon"])
        .assert()
        .failure()
        .code(2)
        .stdout("");
}
