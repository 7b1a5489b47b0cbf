//! Short bounded runs against the real counters.

use assert_cmd::prelude::*;
use predicates::prelude::*;

use crate::util::{cpuload_command, no_cfg_cpuload_command};

#[test]
fn test_bounded_run() {
    let output = no_cfg_cpuload_command()
        .args(["-n", "2", "-r", "250ms"])
        .output()
        .unwrap();

    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.lines().count(), 2);
    assert!(stdout.lines().all(|line| line.starts_with("cpu ")));
}

#[test]
fn test_json_run() {
    let output = no_cfg_cpuload_command()
        .args(["-n", "2", "-r", "250ms", "--json"])
        .output()
        .unwrap();

    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    for line in stdout.lines() {
        let sample: serde_json::Value = serde_json::from_str(line).unwrap();
        let total = sample["total_usage"].as_f64().unwrap();
        assert!((0.0..=1.0).contains(&total));
        assert!(sample["usage_per_core"].is_array());
    }
}

#[test]
fn test_logical_config() {
    cpuload_command(&["-C", "./tests/valid_configs/logical.toml", "-n", "1"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("cpu "));
}

#[test]
fn test_missing_config_uses_defaults() {
    cpuload_command(&["-C", "./tests/valid_configs/does_not_exist.toml", "-n", "1"])
        .assert()
        .success();
}
