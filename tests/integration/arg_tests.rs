//! These tests are mostly here just to ensure that invalid results will be
//! caught when passing arguments.

use assert_cmd::prelude::*;
use predicates::prelude::*;

use crate::util::{cpuload_command, no_cfg_cpuload_command};

#[test]
fn test_small_rate() {
    no_cfg_cpuload_command()
        .arg("-r")
        .arg("249")
        .assert()
        .failure()
        .stderr(predicate::str::contains("'--rate' must be greater"));
}

#[test]
fn test_small_human_rate() {
    no_cfg_cpuload_command()
        .arg("-r")
        .arg("100ms")
        .assert()
        .failure()
        .stderr(predicate::str::contains("'--rate' must be greater"));
}

#[test]
fn test_invalid_rate() {
    no_cfg_cpuload_command()
        .arg("-r")
        .arg("sometime")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "'--rate' was set with an invalid value",
        ));
}

#[test]
fn test_invalid_count() {
    no_cfg_cpuload_command()
        .arg("-n")
        .arg("lots")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value 'lots'"));
}

#[test]
fn test_help() {
    cpuload_command(&["--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--logical"))
        .stdout(predicate::str::contains("--rate"));
}

#[test]
fn test_version() {
    cpuload_command(&["--version"])
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}
