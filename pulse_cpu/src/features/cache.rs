//! Cache hierarchy model: warming, working-set pressure, and the
//! effective memory latency multiplier.
//!
//! Each operation pushes an access record into the bounded ring, then
//! nudges every level's hit ratio toward its profile target by
//! `(target − current) / warmup`, where `warmup` grows with working-set
//! pressure: a working set larger than L3 warms proportionally slower.
//! Warming is therefore monotonically non-decreasing under an identical
//! access pattern until the target is reached.
//!
//! The time multiplier weighs each level's latency by the probability of
//! first hitting there:
//! `l1·1 + (1−l1)·l2·m2 + (1−l1)(1−l2)·l3·m3 + (1−l1)(1−l2)(1−l3)·m_mem`.

use crate::profile::{CacheSpec, TechnologySpecs};
use crate::state::{AccessRecord, CacheState};

/// Cache stage outcome.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CacheOutcome {
    /// Time multiplier from memory latency (≥ 1).
    pub multiplier: f64,
    /// Combined hit ratio across the hierarchy after warming.
    pub combined_hit_ratio: f64,
}

/// Record one access, warm the hierarchy, and compute the latency
/// multiplier.
pub fn warm_and_classify(
    spec: &CacheSpec,
    tech: &TechnologySpecs,
    state: &mut CacheState,
    record: AccessRecord,
) -> CacheOutcome {
    state.history.push(record);

    // Working sets beyond L3 capacity slow convergence proportionally.
    let l3_bytes = u64::from(tech.cache_l3_mb) * 1024 * 1024;
    let pressure = (state.history.working_set_bytes() as f64 / l3_bytes as f64).max(1.0);
    let warmup = f64::from(spec.warmup_operations) * pressure;

    state.l1_hit_ratio = warm(state.l1_hit_ratio, spec.targets.l1, warmup);
    state.l2_hit_ratio = warm(state.l2_hit_ratio, spec.targets.l2, warmup);
    state.l3_hit_ratio = warm(state.l3_hit_ratio, spec.targets.l3, warmup);

    let l1 = state.l1_hit_ratio;
    let l2 = state.l2_hit_ratio;
    let l3 = state.l3_hit_ratio;
    let multiplier = (l1
        + (1.0 - l1) * l2 * spec.l2_latency_multiplier
        + (1.0 - l1) * (1.0 - l2) * l3 * spec.l3_latency_multiplier
        + (1.0 - l1) * (1.0 - l2) * (1.0 - l3) * spec.memory_latency_multiplier)
        .max(1.0);

    CacheOutcome { multiplier, combined_hit_ratio: state.combined_hit_ratio() }
}

fn warm(current: f64, target: f64, warmup: f64) -> f64 {
    (current + (target - current) / warmup).clamp(0.0, 1.0)
}

// ─── Tests ──────────────────────────────────────────────────────────
