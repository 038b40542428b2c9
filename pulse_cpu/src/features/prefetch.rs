//! Hardware prefetch model.
//!
//! The prefetcher hides part of the memory latency the cache stage just
//! charged: `sequential_accuracy × prefetch_distance × per_line_cost`.
//! The saving is bounded by the memory penalty actually incurred, so the
//! stage can never drive processing time negative.

use crate::profile::PrefetchSpec;

/// Latency hidden for one operation, given the memory penalty the cache
/// stage added [s].
pub fn saving_s(spec: &PrefetchSpec, memory_penalty_s: f64) -> f64 {
    let raw = spec.sequential_accuracy
        * f64::from(spec.prefetch_distance)
        * spec.per_line_cost_s;
    raw.min(memory_penalty_s.max(0.0))
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::test_support::reference_profile;

    #[test]
    fn saving_is_accuracy_times_distance_times_cost() {
        let spec = reference_profile().engine_specific.prefetch;
        // 0.9 · 8 · 2 µs = 14.4 µs, well under a 1 ms memory penalty.
        let saving = saving_s(&spec, 0.001);
        assert!((saving - 14.4e-6).abs() < 1e-12);
    }

    #[test]
    fn saving_is_bounded_by_the_memory_penalty() {
        let spec = reference_profile().engine_specific.prefetch;
        assert_eq!(saving_s(&spec, 1e-6), 1e-6);
        assert_eq!(saving_s(&spec, 0.0), 0.0);
    }

    #[test]
    fn negative_penalty_is_treated_as_zero() {
        let spec = reference_profile().engine_specific.prefetch;
        assert_eq!(saving_s(&spec, -1.0), 0.0);
    }
}
