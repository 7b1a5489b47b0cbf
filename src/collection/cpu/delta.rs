//! Turning two counter snapshots into utilization fractions.
//!
//! Per-core and aggregate values handle a zero tick total
//! differently: a core that saw no ticks is dropped from the result, while
//! the aggregate loads keep whatever they were last set to.

use super::{CoreCounters, CounterWidth, RawCounterSnapshot, TickCounters};

/// The busy fraction of one core, or `None` if no ticks were counted.
///
/// Without a previous record the absolute counters are used, as if the
/// previous record were all zeroes.
pub fn core_usage(
    current: &TickCounters, previous: Option<&TickCounters>, width: CounterWidth,
) -> Option<f64> {
    let (in_use, total) = match previous {
        Some(previous) => {
            let delta = current.since(previous, width);
            (delta.in_use(), delta.total())
        }
        None => (current.in_use(), current.total()),
    };

    if total == 0 {
        None
    } else {
        Some(in_use as f64 / total as f64)
    }
}

/// The busy fraction of every core in `current` that counted any ticks,
/// in core order.
///
/// Cores are matched by index. A core with no counterpart in `previous`
/// (the array grew, or the core just came online) is diffed against zero.
pub fn per_core_usage<B: CoreCounters>(
    current: &B, previous: Option<&B>, width: CounterWidth,
) -> Vec<f64> {
    (0..current.core_count())
        .filter_map(|index| {
            let now = current.core(index)?;
            let then = previous.and_then(|previous| previous.core(index));

            core_usage(&now, then.as_ref(), width)
        })
        .collect()
}

/// Host-wide system, user and idle loads.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AggregateLoad {
    pub system: f64,
    pub user: f64,
    pub idle: f64,
}

impl AggregateLoad {
    /// Updates the loads from the ticks between `previous` and `current`.
    ///
    /// If no ticks passed at all, the loads are left as they were.
    pub fn advance(
        &mut self, current: &TickCounters, previous: &TickCounters, width: CounterWidth,
    ) {
        let delta = current.since(previous, width);
        let total = delta.total();

        if total == 0 {
            return;
        }

        let total = total as f64;
        self.system = delta.system as f64 / total;
        self.user = delta.user as f64 / total;
        self.idle = delta.idle as f64 / total;
    }

    pub fn total_usage(&self) -> f64 {
        self.system + self.user
    }
}

/// The result of diffing one snapshot against the state before it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Delta {
    pub usage_per_core: Vec<f64>,
    pub load: AggregateLoad,
}

/// Diffs `current` against the previous per-core array and aggregate record.
///
/// `held` is the aggregate load from the last cycle, which is carried over
/// unchanged if the aggregate counters did not move.
pub fn delta<B: CoreCounters>(
    current: &RawCounterSnapshot<B>, previous_per_core: Option<&B>,
    previous_aggregate: &TickCounters, held: AggregateLoad, width: CounterWidth,
) -> Delta {
    let mut load = held;
    load.advance(&current.aggregate, previous_aggregate, width);

    Delta {
        usage_per_core: per_core_usage(&current.per_core, previous_per_core, width),
        load,
    }
}
