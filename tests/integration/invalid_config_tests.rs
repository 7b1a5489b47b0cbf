//! These tests are for testing some invalid config-file-specific options.

use assert_cmd::prelude::*;
use predicates::prelude::*;

use crate::util::cpuload_command;

#[test]
fn test_toml_mismatch_type() {
    cpuload_command(&["-C", "./tests/invalid_configs/toml_mismatch_type.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid type"));
}

#[test]
fn test_broken_toml() {
    cpuload_command(&["-C", "./tests/invalid_configs/broken.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration file error"));
}

#[test]
fn test_small_config_rate() {
    cpuload_command(&["-C", "./tests/invalid_configs/small_rate.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("'rate' must be greater"));
}

#[test]
fn test_invalid_config_rate() {
    cpuload_command(&["-C", "./tests/invalid_configs/invalid_rate.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "'rate' was set with an invalid value",
        ));
}
