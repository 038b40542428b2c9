//! Simultaneous multithreading model.
//!
//! When the workload asked for more cores than physically granted and SMT
//! is enabled, the spare hardware threads recover part of the shortfall:
//! speedup `1 + (threads_per_core − 1) · efficiency_factor`, capped at the
//! profile's maximum benefit. A workload that fit on physical cores gains
//! nothing — the advantage only exists where threads oversubscribe cores.

use crate::profile::HyperthreadingSpec;

/// Time divisor for the SMT stage (≥ 1).
pub fn smt_speedup(spec: &HyperthreadingSpec, requested_cores: u32, granted_cores: u32) -> f64 {
    if !spec.enabled || requested_cores <= granted_cores {
        return 1.0;
    }
    (1.0 + f64::from(spec.threads_per_core - 1) * spec.efficiency_factor).min(spec.max_benefit)
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::test_support::reference_profile;

    #[test]
    fn no_benefit_when_cores_suffice() {
        let spec = reference_profile().engine_specific.hyperthreading;
        assert_eq!(smt_speedup(&spec, 8, 8), 1.0);
        assert_eq!(smt_speedup(&spec, 4, 8), 1.0);
    }

    #[test]
    fn oversubscription_gains_capped_benefit() {
        let spec = reference_profile().engine_specific.hyperthreading;
        let speedup = smt_speedup(&spec, 32, 24);
        // 1 + 1·0.30 = 1.30, also the cap.
        assert!((speedup - 1.30).abs() < 1e-12);
        assert!(speedup <= spec.max_benefit);
    }

    #[test]
    fn disabled_smt_never_helps() {
        let mut spec = reference_profile().engine_specific.hyperthreading;
        spec.enabled = false;
        assert_eq!(smt_speedup(&spec, 48, 24), 1.0);
    }

    #[test]
    fn cap_binds_aggressive_configurations() {
        let mut spec = reference_profile().engine_specific.hyperthreading;
        spec.threads_per_core = 8;
        spec.efficiency_factor = 0.9;
        assert_eq!(smt_speedup(&spec, 48, 24), spec.max_benefit);
    }
}
