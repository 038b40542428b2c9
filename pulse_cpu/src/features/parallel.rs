//! Amdahl parallel execution model.
//!
//! Speedup for a parallelizable fraction `p` on `N` cores with scaling
//! efficiency `e`: `1 / ((1−p) + p/(N·e))`, reduced by the fixed
//! synchronization overhead plus a per-core term. Core count is the
//! minimum of physical cores, the per-complexity cap, and the scheduler's
//! desired core count; single-core execution carries no overhead.

use pulse::op::ComplexityClass;

use crate::profile::ParallelSpec;

/// Parallel stage outcome.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParallelOutcome {
    /// Cores actually used (≤ physical).
    pub cores_used: u32,
    /// Cores the workload asked for before the physical cap.
    pub requested_cores: u32,
    /// Parallelizable fraction applied.
    pub parallelizable: f64,
    /// Time divisor applied.
    pub speedup: f64,
}

/// Compute the Amdahl speedup for one operation.
pub fn amdahl(spec: &ParallelSpec, physical_cores: u32, class: ComplexityClass) -> ParallelOutcome {
    // Tables are validated to cover every class; the fallbacks are inert.
    let class_ratio =
        spec.parallelizability_by_complexity.get(&class).copied().unwrap_or(0.0);
    let class_cores = spec.max_cores_for_complexity.get(&class).copied().unwrap_or(1);

    let p = spec.max_parallelizable_ratio.min(class_ratio);
    let requested = spec.desired_cores.min(class_cores).max(1);
    let n = requested.min(physical_cores).max(1);

    if n == 1 {
        return ParallelOutcome {
            cores_used: 1,
            requested_cores: requested,
            parallelizable: p,
            speedup: 1.0,
        };
    }

    let efficiency = efficiency_for(spec, n);
    let ideal = 1.0 / ((1.0 - p) + p / (f64::from(n) * efficiency));
    let overhead = 1.0 + spec.sync_overhead + spec.overhead_per_core * f64::from(n - 1);
    ParallelOutcome {
        cores_used: n,
        requested_cores: requested,
        parallelizable: p,
        speedup: ideal / overhead,
    }
}

/// Scaling efficiency at `n` cores: the curve entry at the largest key ≤ n.
pub fn efficiency_for(spec: &ParallelSpec, n: u32) -> f64 {
    spec.efficiency_curve
        .range(..=n)
        .next_back()
        .map(|(_, efficiency)| *efficiency)
        .unwrap_or(1.0)
}

// ─── Tests ──────────────────────────────────────────────────────────
