//! CPU tick counters from `/proc/stat`.
//!
//! Linux reports ten columns per CPU line; they are folded into the four
//! states used everywhere else:
//! - user: `user`
//! - nice: `nice`
//! - system: `system + irq + softirq + steal`
//! - idle: `idle + iowait`
//!
//! `guest` and `guest_nice` are already counted inside `user` and `nice`.

use std::{fs, path::PathBuf};

use sysinfo::System;

use super::{CoreCounters, CoreTopology, CounterSource, RawCounterSnapshot, TickCounters};
use crate::collection::error::{CollectionError, CollectionResult};

const PROC_STAT: &str = "/proc/stat";

/// Per-core records from `/proc/stat`, indexed by CPU number. An offline CPU
/// has no line, which leaves a gap at its number.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StatCores(Vec<Option<TickCounters>>);

impl StatCores {
    /// How many CPUs have a record.
    pub fn online(&self) -> usize {
        self.0.iter().flatten().count()
    }

    fn insert(&mut self, id: usize, counters: TickCounters) {
        if id >= self.0.len() {
            self.0.resize(id + 1, None);
        }
        self.0[id] = Some(counters);
    }
}

impl CoreCounters for StatCores {
    fn core_count(&self) -> usize {
        self.0.len()
    }

    fn core(&self, index: usize) -> Option<TickCounters> {
        self.0.get(index).copied().flatten()
    }
}

/// Reads counters from `/proc/stat` (or another file in the same format).
#[derive(Debug, Clone)]
pub struct ProcStatSource {
    path: PathBuf,
}

impl Default for ProcStatSource {
    fn default() -> Self {
        Self {
            path: PathBuf::from(PROC_STAT),
        }
    }
}

impl ProcStatSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads from `path` instead of `/proc/stat`.
    pub fn with_path<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    fn read(&self) -> CollectionResult<RawCounterSnapshot<StatCores>> {
        let contents = fs::read_to_string(&self.path)?;
        parse_proc_stat(&contents)
    }
}

impl CounterSource for ProcStatSource {
    type Buffer = StatCores;

    fn per_core(&self) -> CollectionResult<StatCores> {
        self.read().map(|snapshot| snapshot.per_core)
    }

    fn aggregate(&self) -> CollectionResult<TickCounters> {
        self.read().map(|snapshot| snapshot.aggregate)
    }

    fn topology(&self) -> CollectionResult<CoreTopology> {
        let logical = self.per_core()?.online();
        let physical = System::physical_core_count().ok_or(CollectionError::Unsupported)?;

        Ok(CoreTopology { physical, logical })
    }

    /// Both records live in the same file, so read it once.
    fn acquire(&self) -> CollectionResult<RawCounterSnapshot<StatCores>> {
        self.read()
    }
}

/// Parses the counters out of the contents of `/proc/stat`.
///
/// The `cpu` line is the aggregate record and each `cpuN` line the record of
/// CPU `N`. Offline CPUs have no line at all, so which CPUs are present can
/// change from one read to the next.
pub fn parse_proc_stat(contents: &str) -> CollectionResult<RawCounterSnapshot<StatCores>> {
    let mut aggregate = None;
    let mut per_core = StatCores::default();

    for line in contents.lines() {
        let Some((label, values)) = line.split_once(char::is_whitespace) else {
            continue;
        };

        let Some(suffix) = label.strip_prefix("cpu") else {
            continue;
        };

        if suffix.is_empty() {
            aggregate = Some(parse_cpu_values(values, line)?);
        } else if let Ok(id) = suffix.parse::<usize>() {
            per_core.insert(id, parse_cpu_values(values, line)?);
        }
    }

    let aggregate =
        aggregate.ok_or_else(|| CollectionError::malformed("no aggregate cpu line found"))?;

    Ok(RawCounterSnapshot {
        per_core,
        aggregate,
    })
}

/// Parses the values after a `cpu` label. Missing trailing columns (older
/// kernels) count as zero, but the first four must be present.
fn parse_cpu_values(values: &str, line: &str) -> CollectionResult<TickCounters> {
    let mut columns = [0_u64; 8];
    let mut count = 0;

    for (column, value) in columns.iter_mut().zip(values.split_whitespace()) {
        *column = value
            .parse()
            .map_err(|_| CollectionError::malformed(format!("bad value in '{line}'")))?;
        count += 1;
    }

    if count < 4 {
        return Err(CollectionError::malformed(format!(
            "expected at least 4 values in '{line}'"
        )));
    }

    let [user, nice, system, idle, iowait, irq, softirq, steal] = columns;

    Ok(TickCounters {
        user,
        system: system
            .saturating_add(irq)
            .saturating_add(softirq)
            .saturating_add(steal),
        nice,
        idle: idle.saturating_add(iowait),
    })
}
