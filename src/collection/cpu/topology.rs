//! Collapsing logical cores into physical cores for display.

use super::CounterSource;

/// Folds per-logical-core usage into per-physical-core usage.
///
/// The input is passed through untouched if logical cores were asked for or
/// the host has no SMT. Otherwise adjacent entries `(2k, 2k + 1)` are
/// averaged; an unpaired trailing entry is dropped.
pub fn fold(usage_per_core: &[f64], show_logical_cores: bool, has_smt: bool) -> Vec<f64> {
    if show_logical_cores || !has_smt {
        return usage_per_core.to_vec();
    }

    usage_per_core
        .chunks_exact(2)
        .map(|pair| (pair[0] + pair[1]) / 2.0)
        .collect()
}

/// Asks the source whether the host has SMT siblings. A failed probe is
/// logged and treated as no SMT, so nothing gets folded.
pub(crate) fn probe_smt<S: CounterSource>(source: &S) -> bool {
    match source.topology() {
        Ok(topology) => {
            log::debug!(
                "cpu topology: {} physical, {} logical",
                topology.physical,
                topology.logical
            );
            topology.has_smt()
        }
        Err(err) => {
            log::warn!("could not determine cpu topology, not folding cores: {err}");
            false
        }
    }
}
