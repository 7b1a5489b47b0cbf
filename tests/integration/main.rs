//! Integration tests for cpuload.

mod util;

mod arg_tests;
mod invalid_config_tests;

#[cfg(target_os = "linux")]
mod valid_config_tests;
