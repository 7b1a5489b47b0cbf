//! A periodic CPU utilization sampler.
//!
//! The kernel exposes monotonically increasing tick counters per core and
//! for the whole host. [`UtilizationSampler`](collection::cpu::UtilizationSampler)
//! diffs consecutive reads of those counters into system, user, idle and
//! per-core load fractions, optionally averaging SMT siblings so there is
//! one entry per physical core.
//!
//! The sampler has no timer of its own. Something else (the `cpuload`
//! binary, or your own loop) calls `sample()` once per interval.

pub mod collection;
pub mod options;

pub mod utils {
    pub mod logging;
}
