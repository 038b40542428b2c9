//! Memory bandwidth contention model.
//!
//! Active cores beyond the contention threshold each degrade effective
//! bandwidth by a fixed fraction. On top of that, a deterministic seeded
//! draw occasionally produces a severe contention event with its own
//! multiplicative penalty — the draw only happens when the operation is
//! actually contended, so uncontended workloads consume no randomness and
//! stay bit-stable.

use rand::Rng;
use rand::rngs::StdRng;

use crate::profile::MemoryBandwidthSpec;

/// Bandwidth stage outcome.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandwidthOutcome {
    /// Time multiplier applied (≥ 1).
    pub multiplier: f64,
    /// A severe contention event fired.
    pub severe: bool,
}

/// Contention multiplier for an operation on `active_cores` cores.
pub fn contention_multiplier(
    spec: &MemoryBandwidthSpec,
    active_cores: u32,
    rng: &mut StdRng,
) -> BandwidthOutcome {
    if active_cores <= spec.contention_threshold {
        return BandwidthOutcome { multiplier: 1.0, severe: false };
    }

    let extra = f64::from(active_cores - spec.contention_threshold);
    let mut multiplier = 1.0 + spec.per_core_degradation * extra;
    let severe = rng.r#gen::<f64>() < spec.severe_contention_probability;
    if severe {
        multiplier *= spec.severe_contention_penalty;
    }
    BandwidthOutcome { multiplier, severe }
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::test_support::reference_profile;
    use rand::SeedableRng;

    #[test]
    fn below_threshold_is_uncontended() {
        let spec = reference_profile().engine_specific.memory_bandwidth;
        let mut rng = StdRng::seed_from_u64(spec.rng_seed);
        let out = contention_multiplier(&spec, spec.contention_threshold, &mut rng);
        assert_eq!(out.multiplier, 1.0);
        assert!(!out.severe);
    }

    #[test]
    fn degradation_scales_with_extra_cores() {
        let mut spec = reference_profile().engine_specific.memory_bandwidth;
        spec.severe_contention_probability = 0.0;
        let mut rng = StdRng::seed_from_u64(spec.rng_seed);
        let out = contention_multiplier(&spec, spec.contention_threshold + 4, &mut rng);
        assert!((out.multiplier - (1.0 + 0.04 * 4.0)).abs() < 1e-12);
    }

    #[test]
    fn severe_events_multiply_the_penalty() {
        let mut spec = reference_profile().engine_specific.memory_bandwidth;
        spec.severe_contention_probability = 1.0;
        let mut rng = StdRng::seed_from_u64(spec.rng_seed);
        let out = contention_multiplier(&spec, spec.contention_threshold + 1, &mut rng);
        assert!(out.severe);
        assert!((out.multiplier - (1.0 + 0.04) * 1.5).abs() < 1e-12);
    }

    #[test]
    fn identical_seeds_draw_identical_sequences() {
        let mut spec = reference_profile().engine_specific.memory_bandwidth;
        spec.severe_contention_probability = 0.5;
        let mut a = StdRng::seed_from_u64(spec.rng_seed);
        let mut b = StdRng::seed_from_u64(spec.rng_seed);
        for _ in 0..100 {
            let out_a = contention_multiplier(&spec, 16, &mut a);
            let out_b = contention_multiplier(&spec, 16, &mut b);
            assert_eq!(out_a, out_b);
        }
    }
}
