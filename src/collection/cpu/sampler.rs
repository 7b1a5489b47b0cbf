//! The periodic CPU utilization sampler.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, Mutex, MutexGuard, PoisonError,
};

use super::{
    delta::{delta, AggregateLoad, Delta},
    topology::{fold, probe_smt},
    CoreCounters, CounterSource, RawCounterSnapshot, TickCounters, UtilizationSample,
};
use crate::options::settings::{SettingsStore, SHOW_LOGICAL_CORES};

/// Everything carried from one cycle to the next.
struct SamplerState<B> {
    /// The per-core array from the last good cycle. Holding it keeps its
    /// memory alive; replacing it releases it.
    previous_per_core: Option<B>,
    previous_aggregate: TickCounters,
    usage_per_core: Vec<f64>,
    load: AggregateLoad,
    core_count: Option<usize>,
}

impl<B> Default for SamplerState<B> {
    fn default() -> Self {
        Self {
            previous_per_core: None,
            previous_aggregate: TickCounters::default(),
            usage_per_core: Vec::new(),
            load: AggregateLoad::default(),
            core_count: None,
        }
    }
}

/// Converts kernel tick counters into utilization samples.
///
/// The sampler does not schedule itself; something else calls
/// [`UtilizationSampler::sample`] once per interval. Calls may overlap. The
/// kernel queries run unlocked, while the delta and the swap of the held
/// snapshot happen under one lock. The held snapshot only ever moves
/// forward: a snapshot that was read before the one already held is
/// dropped.
pub struct UtilizationSampler<S: CounterSource> {
    source: S,
    settings: Arc<dyn SettingsStore>,
    has_smt: bool,
    /// How many snapshots have been applied. Only changed under the state
    /// lock.
    applied: AtomicU64,
    state: Mutex<SamplerState<S::Buffer>>,
}

impl<S: CounterSource> UtilizationSampler<S> {
    /// Creates a sampler, probing the host topology once.
    pub fn new(source: S, settings: Arc<dyn SettingsStore>) -> Self {
        let has_smt = probe_smt(&source);

        Self {
            source,
            settings,
            has_smt,
            applied: AtomicU64::new(0),
            state: Mutex::new(SamplerState::default()),
        }
    }

    /// Takes one sample.
    ///
    /// Returns `None` if the counters could not be read this cycle. The
    /// failure is logged, and the held snapshot is left as it was so the
    /// next good cycle diffs against the last good one.
    ///
    /// If an overlapping call applied a snapshot that was read after this
    /// one, this snapshot is discarded and `None` is returned as well.
    pub fn sample(&self) -> Option<UtilizationSample> {
        let seen = self.applied.load(Ordering::Acquire);
        let snapshot = match self.source.acquire() {
            Ok(snapshot) => snapshot,
            Err(err) => {
                log::error!("skipping cpu sample: {err}");
                return None;
            }
        };

        let show_logical_cores = self.settings.bool(SHOW_LOGICAL_CORES).unwrap_or(false);

        let mut state = self.lock_state();

        if self.applied.load(Ordering::Relaxed) != seen
            && snapshot
                .aggregate
                .precedes(&state.previous_aggregate, S::WIDTH)
        {
            log::debug!("discarding cpu snapshot read before the one already applied");
            return None;
        }

        let core_count = snapshot.per_core.core_count();
        if let Some(previous_count) = state.core_count {
            if previous_count != core_count {
                log::debug!("cpu core count changed from {previous_count} to {core_count}");
            }
        }

        let Delta {
            usage_per_core,
            load,
        } = delta(
            &snapshot,
            state.previous_per_core.as_ref(),
            &state.previous_aggregate,
            state.load,
            S::WIDTH,
        );

        let RawCounterSnapshot {
            per_core,
            aggregate,
        } = snapshot;

        state.usage_per_core = usage_per_core;
        state.load = load;
        state.previous_aggregate = aggregate;
        state.previous_per_core = Some(per_core);
        state.core_count = Some(core_count);
        self.applied.fetch_add(1, Ordering::Release);

        Some(UtilizationSample {
            usage_per_core: fold(&state.usage_per_core, show_logical_cores, self.has_smt),
            system_load: load.system,
            user_load: load.user,
            idle_load: load.idle,
            total_usage: load.total_usage(),
        })
    }

    /// Whether the host was found to have SMT siblings at construction.
    pub fn has_smt(&self) -> bool {
        self.has_smt
    }

    /// The unfolded per-core usage computed by the last good cycle.
    pub fn last_usage_per_core(&self) -> Vec<f64> {
        self.lock_state().usage_per_core.clone()
    }

    /// The counter source this sampler reads from.
    pub fn source(&self) -> &S {
        &self.source
    }

    fn lock_state(&self) -> MutexGuard<'_, SamplerState<S::Buffer>> {
        // State is only ever replaced field by field after the delta is
        // fully computed, so a poisoned lock still holds usable data.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
