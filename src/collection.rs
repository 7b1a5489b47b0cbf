//! This is the main file to house data collection functions.

pub mod cpu;
pub mod error;
