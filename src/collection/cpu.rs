//! Data collection for CPU utilization.
//!
//! Raw tick counters come from a [`CounterSource`], which is the only part
//! that talks to the kernel. A [`UtilizationSampler`] diffs consecutive
//! snapshots into load fractions and folds SMT siblings for display.

pub mod delta;
pub mod sampler;
pub mod topology;

cfg_if::cfg_if! {
    if #[cfg(target_os = "linux")] {
        pub mod linux;
        pub use self::linux::ProcStatSource as PlatformSource;
    } else if #[cfg(target_os = "macos")] {
        pub mod macos;
        pub use self::macos::MachSource as PlatformSource;
    } else {
        pub mod unsupported;
        pub use self::unsupported::UnsupportedSource as PlatformSource;
    }
}

use std::fmt;

use serde::Serialize;

pub use self::{delta::AggregateLoad, sampler::UtilizationSampler, topology::fold};
use super::error::CollectionResult;

/// One record of scheduler ticks attributed to each CPU state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickCounters {
    pub user: u64,
    pub system: u64,
    pub nice: u64,
    pub idle: u64,
}

impl TickCounters {
    pub const fn new(user: u64, system: u64, nice: u64, idle: u64) -> Self {
        Self {
            user,
            system,
            nice,
            idle,
        }
    }

    /// Ticks spent doing work (user, system and nice).
    pub fn in_use(&self) -> u64 {
        self.user
            .saturating_add(self.system)
            .saturating_add(self.nice)
    }

    /// All ticks, busy or idle.
    pub fn total(&self) -> u64 {
        self.in_use().saturating_add(self.idle)
    }

    /// The ticks accumulated since `earlier`, field by field, for counters
    /// of the given width.
    pub fn since(&self, earlier: &TickCounters, width: CounterWidth) -> TickCounters {
        TickCounters {
            user: width.ticks_since(self.user, earlier.user),
            system: width.ticks_since(self.system, earlier.system),
            nice: width.ticks_since(self.nice, earlier.nice),
            idle: width.ticks_since(self.idle, earlier.idle),
        }
    }

    /// Whether any field of `self` was read before the same field of
    /// `later`, i.e. `self` is an older read than `later`.
    pub fn precedes(&self, later: &TickCounters, width: CounterWidth) -> bool {
        [
            (self.user, later.user),
            (self.system, later.system),
            (self.nice, later.nice),
            (self.idle, later.idle),
        ]
        .into_iter()
        .any(|(ours, theirs)| width.is_behind(ours, theirs))
    }
}

/// How wide the kernel's tick counters are, which decides what a counter
/// that went backwards means.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CounterWidth {
    /// 32-bit counters that wrap around to zero after `u32::MAX`.
    U32,
    /// 64-bit counters. These never wrap in practice, so going backwards
    /// means the counter restarted from zero.
    #[default]
    U64,
}

impl CounterWidth {
    /// The ticks between `then` and `now`.
    pub fn ticks_since(self, now: u64, then: u64) -> u64 {
        match self {
            CounterWidth::U32 => u64::from((now as u32).wrapping_sub(then as u32)),
            CounterWidth::U64 => now.checked_sub(then).unwrap_or(now),
        }
    }

    /// Whether `now` is an earlier reading of the same counter than `then`.
    ///
    /// For wrapping counters, a backwards distance of less than half the
    /// range counts as earlier; anything else is a wrap.
    pub fn is_behind(self, now: u64, then: u64) -> bool {
        match self {
            CounterWidth::U32 => {
                let back = (then as u32).wrapping_sub(now as u32);
                back != 0 && back < 1 << 31
            }
            CounterWidth::U64 => now < then,
        }
    }
}

/// Read access to a per-core counter array, wherever its memory lives.
///
/// The core count is a property of one particular array and may differ
/// between two reads from the same source.
pub trait CoreCounters {
    /// How many core slots this array has. A slot may be empty, e.g. for
    /// an offline core.
    fn core_count(&self) -> usize;

    /// The counters of core `index`, or `None` if that slot has no record.
    fn core(&self, index: usize) -> Option<TickCounters>;
}

impl CoreCounters for Vec<TickCounters> {
    fn core_count(&self) -> usize {
        self.len()
    }

    fn core(&self, index: usize) -> Option<TickCounters> {
        self.get(index).copied()
    }
}

/// One full read of all counters: the per-core array plus the host-wide
/// aggregate record, which the kernel reports separately.
#[derive(Debug)]
pub struct RawCounterSnapshot<B> {
    pub per_core: B,
    pub aggregate: TickCounters,
}

/// Physical and logical core counts as reported by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CoreTopology {
    pub physical: usize,
    pub logical: usize,
}

impl CoreTopology {
    /// Whether the host exposes more than one logical core per physical one.
    pub fn has_smt(&self) -> bool {
        self.physical != self.logical
    }
}

/// The kernel boundary. Implementors perform blocking queries and hand back
/// owned results; whatever the per-core buffer needs to release itself must
/// happen in its [`Drop`].
pub trait CounterSource {
    /// The owned per-core counter array.
    type Buffer: CoreCounters;

    /// Queries the per-core tick counter array.
    fn per_core(&self) -> CollectionResult<Self::Buffer>;

    /// Queries the host-wide tick counter record.
    fn aggregate(&self) -> CollectionResult<TickCounters>;

    /// The width of the tick counters this source reports.
    const WIDTH: CounterWidth = CounterWidth::U64;

    /// Queries the physical and logical core counts.
    fn topology(&self) -> CollectionResult<CoreTopology>;

    /// Takes a full snapshot. Fails if either query fails; a per-core buffer
    /// that was already acquired is released on the way out.
    fn acquire(&self) -> CollectionResult<RawCounterSnapshot<Self::Buffer>> {
        let per_core = self.per_core()?;
        let aggregate = self.aggregate()?;

        Ok(RawCounterSnapshot {
            per_core,
            aggregate,
        })
    }
}

/// Utilization over one sampling interval. Every field is a fraction in
/// `[0, 1]` of that interval.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct UtilizationSample {
    /// One entry per reported core, after any SMT folding. Cores whose tick
    /// total did not move are left out.
    pub usage_per_core: Vec<f64>,
    pub system_load: f64,
    pub user_load: f64,
    pub idle_load: f64,
    /// `system_load + user_load`.
    pub total_usage: f64,
}

impl fmt::Display for UtilizationSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cpu {:5.1}% | user {:5.1}% sys {:5.1}% idle {:5.1}% | cores [",
            self.total_usage * 100.0,
            self.user_load * 100.0,
            self.system_load * 100.0,
            self.idle_load * 100.0,
        )?;

        for (index, usage) in self.usage_per_core.iter().enumerate() {
            if index > 0 {
                write!(f, " ")?;
            }
            write!(f, "{:.0}%", usage * 100.0)?;
        }

        write!(f, "]")
    }
}
