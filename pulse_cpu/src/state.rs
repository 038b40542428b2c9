//! Accumulating engine state.
//!
//! Everything here is owned by one engine and mutated only by its own
//! pipeline: cache warmth, die temperature, boost windows, core
//! utilization, and the running counters behind the metrics export.
//! [`EngineState::from_profile`] is both the constructor and the reset
//! path, so a reset engine is bit-identical to a fresh one (including the
//! re-seeded contention RNG).

use heapless::Deque;
use pulse::time::Tick;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::profile::{AccessPattern, CpuProfile};

/// Capacity of the access-pattern ring buffer.
pub const ACCESS_HISTORY_LEN: usize = 100;

/// One recorded memory access, kept in a fixed-capacity ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessRecord {
    /// Bytes touched by the operation.
    pub data_size_bytes: u64,
    /// Dominant access pattern of the operation type.
    pub pattern: AccessPattern,
}

/// Bounded ring of recent accesses plus a running byte total.
///
/// The byte total is the working-set estimate: the sum of distinct bytes
/// touched over the ring window.
#[derive(Debug)]
pub struct AccessHistory {
    ring: Deque<AccessRecord, ACCESS_HISTORY_LEN>,
    total_bytes: u64,
}

impl Default for AccessHistory {
    fn default() -> Self {
        Self { ring: Deque::new(), total_bytes: 0 }
    }
}

impl AccessHistory {
    /// Push a record, evicting the oldest when full.
    pub fn push(&mut self, record: AccessRecord) {
        if self.ring.is_full() {
            if let Some(evicted) = self.ring.pop_front() {
                self.total_bytes = self.total_bytes.saturating_sub(evicted.data_size_bytes);
            }
        }
        self.total_bytes = self.total_bytes.saturating_add(record.data_size_bytes);
        // Cannot fail: a slot was just freed if the ring was full.
        let _ = self.ring.push_back(record);
    }

    /// Records currently held.
    pub fn len(&self) -> usize {
        self.ring.len()
    }

    /// True when no accesses have been recorded.
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    /// Working-set estimate: bytes touched across the window.
    pub fn working_set_bytes(&self) -> u64 {
        self.total_bytes
    }

    /// Iterate over records, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &AccessRecord> {
        self.ring.iter()
    }
}

/// Cache hierarchy warmth.
#[derive(Debug)]
pub struct CacheState {
    /// Current L1 hit ratio [0, 1].
    pub l1_hit_ratio: f64,
    /// Current L2 hit ratio [0, 1].
    pub l2_hit_ratio: f64,
    /// Current L3 hit ratio [0, 1].
    pub l3_hit_ratio: f64,
    /// Access-pattern ring (≤ 100 records) and working-set estimate.
    pub history: AccessHistory,
}

impl CacheState {
    fn from_profile(profile: &CpuProfile) -> Self {
        let cold = profile.engine_specific.cache.cold_start;
        Self {
            l1_hit_ratio: cold.l1,
            l2_hit_ratio: cold.l2,
            l3_hit_ratio: cold.l3,
            history: AccessHistory::default(),
        }
    }

    /// Combined hit ratio across the three levels.
    pub fn combined_hit_ratio(&self) -> f64 {
        let l1 = self.l1_hit_ratio;
        let l2 = self.l2_hit_ratio;
        let l3 = self.l3_hit_ratio;
        l1 + (1.0 - l1) * l2 + (1.0 - l1) * (1.0 - l2) * l3
    }
}

/// Die temperature and throttle state.
#[derive(Debug)]
pub struct ThermalState {
    /// Current die temperature [°C].
    pub current_temp_c: f64,
    /// Ambient temperature [°C] (lower clamp for the die).
    pub ambient_c: f64,
    /// Net heat currently stored in the die [°C above ambient].
    pub heat_accumulation: f64,
    /// Throttling currently engaged.
    pub throttle_active: bool,
    /// Effective clock fraction while throttled.
    pub throttle_factor: f64,
    /// Lifetime heat generated by work [°C], never dissipated away.
    pub accumulated_work_heat: f64,
}

impl ThermalState {
    fn from_profile(profile: &CpuProfile) -> Self {
        let thermal = &profile.engine_specific.thermal;
        Self {
            current_temp_c: thermal.ambient_c,
            ambient_c: thermal.ambient_c,
            heat_accumulation: 0.0,
            throttle_active: false,
            throttle_factor: 1.0,
            accumulated_work_heat: 0.0,
        }
    }
}

/// SIMD usage counters plus profile capability echoes.
#[derive(Debug)]
pub struct VectorizationState {
    /// Vector register width [bits] (from the profile).
    pub vector_width_bits: u32,
    /// Achieved SIMD efficiency (from the profile).
    pub simd_efficiency: f64,
    /// Supported instruction sets (from the profile).
    pub supported_instructions: Vec<String>,
    /// Operations that took the vector path.
    pub vector_ops_count: u64,
    /// Operations that stayed scalar.
    pub scalar_ops_count: u64,
    /// Running average of applied vector speedups.
    pub average_speedup: f64,
}

impl VectorizationState {
    fn from_profile(profile: &CpuProfile) -> Self {
        let v = &profile.engine_specific.vectorization;
        Self {
            vector_width_bits: v.vector_width_bits,
            simd_efficiency: v.simd_efficiency,
            supported_instructions: v.supported_instructions.clone(),
            vector_ops_count: 0,
            scalar_ops_count: 0,
            average_speedup: 1.0,
        }
    }

    /// Fold one applied speedup into the counters.
    pub fn record(&mut self, ratio: f64, speedup: f64) {
        if ratio > 0.0 {
            self.vector_ops_count += 1;
        } else {
            self.scalar_ops_count += 1;
        }
        let n = (self.vector_ops_count + self.scalar_ops_count) as f64;
        self.average_speedup += (speedup - self.average_speedup) / n;
    }
}

/// Boost clock window.
#[derive(Debug)]
pub struct BoostState {
    /// Clock chosen for the most recent operation [GHz].
    pub current_clock_ghz: f64,
    /// A boost clock is currently applied.
    pub boost_active: bool,
    /// Tick at which the current boost window opened.
    pub boost_start_tick: Option<Tick>,
}

impl BoostState {
    fn from_profile(profile: &CpuProfile) -> Self {
        Self {
            current_clock_ghz: profile.baseline_performance.base_clock_ghz,
            boost_active: false,
            boost_start_tick: None,
        }
    }
}

/// Deterministic contention draw plus counters.
pub struct BandwidthState {
    /// Seeded generator for the severe-contention draw.
    pub rng: StdRng,
    /// Severe contention events observed.
    pub severe_events: u64,
}

impl std::fmt::Debug for BandwidthState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BandwidthState")
            .field("severe_events", &self.severe_events)
            .finish_non_exhaustive()
    }
}

impl BandwidthState {
    fn from_profile(profile: &CpuProfile) -> Self {
        Self {
            rng: StdRng::seed_from_u64(profile.engine_specific.memory_bandwidth.rng_seed),
            severe_events: 0,
        }
    }
}

/// Branch predictor counters.
#[derive(Debug, Default)]
pub struct BranchState {
    /// Operations that went through the predictor model.
    pub predicted_operations: u64,
    /// Accumulated estimated misprediction penalty [s].
    pub total_penalty_s: f64,
}

/// Prefetcher counters.
#[derive(Debug, Default)]
pub struct PrefetchState {
    /// Accumulated latency hidden by prefetching [s].
    pub total_saving_s: f64,
}

/// Complete mutable engine state.
#[derive(Debug)]
pub struct EngineState {
    pub cache: CacheState,
    pub thermal: ThermalState,
    pub vectorization: VectorizationState,
    pub boost: BoostState,
    pub bandwidth: BandwidthState,
    pub branch: BranchState,
    pub prefetch: PrefetchState,
    /// Per-core utilization snapshot of the most recent operation [0, 1].
    pub core_utilization: Vec<f64>,
    /// Cores used by the most recent operation.
    pub active_cores: u32,
    /// Operations processed since the last reset.
    pub operations_processed: u64,
}

impl EngineState {
    /// Cold-start state for the given profile. Also the reset path.
    pub fn from_profile(profile: &CpuProfile) -> Self {
        Self {
            cache: CacheState::from_profile(profile),
            thermal: ThermalState::from_profile(profile),
            vectorization: VectorizationState::from_profile(profile),
            boost: BoostState::from_profile(profile),
            bandwidth: BandwidthState::from_profile(profile),
            branch: BranchState::default(),
            prefetch: PrefetchState::default(),
            core_utilization: vec![0.0; profile.baseline_performance.cores as usize],
            active_cores: 0,
            operations_processed: 0,
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::test_support::reference_profile;

    #[test]
    fn access_history_is_bounded_and_tracks_bytes() {
        let mut history = AccessHistory::default();
        for _ in 0..(ACCESS_HISTORY_LEN + 50) {
            history.push(AccessRecord { data_size_bytes: 1000, pattern: AccessPattern::Sequential });
        }
        assert_eq!(history.len(), ACCESS_HISTORY_LEN);
        assert_eq!(history.working_set_bytes(), 1000 * ACCESS_HISTORY_LEN as u64);
    }

    #[test]
    fn eviction_subtracts_evicted_bytes() {
        let mut history = AccessHistory::default();
        history.push(AccessRecord { data_size_bytes: 5000, pattern: AccessPattern::Random });
        for _ in 0..ACCESS_HISTORY_LEN {
            history.push(AccessRecord { data_size_bytes: 10, pattern: AccessPattern::Random });
        }
        // The 5000-byte record has been evicted.
        assert_eq!(history.working_set_bytes(), 10 * ACCESS_HISTORY_LEN as u64);
    }

    #[test]
    fn cold_start_matches_profile() {
        let profile = reference_profile();
        let state = EngineState::from_profile(&profile);
        assert_eq!(state.cache.l1_hit_ratio, 0.30);
        assert_eq!(state.cache.l2_hit_ratio, 0.20);
        assert_eq!(state.cache.l3_hit_ratio, 0.10);
        assert_eq!(state.thermal.current_temp_c, 22.0);
        assert!(!state.thermal.throttle_active);
        assert_eq!(state.boost.current_clock_ghz, 2.6);
        assert_eq!(state.core_utilization.len(), 24);
        assert_eq!(state.operations_processed, 0);
    }

    #[test]
    fn combined_hit_ratio_formula() {
        let profile = reference_profile();
        let state = EngineState::from_profile(&profile);
        // 0.30 + 0.70·0.20 + 0.70·0.80·0.10 = 0.496
        assert!((state.cache.combined_hit_ratio() - 0.496).abs() < 1e-12);
    }

    #[test]
    fn vectorization_counters_average() {
        let profile = reference_profile();
        let mut state = EngineState::from_profile(&profile);
        state.vectorization.record(0.9, 4.0);
        state.vectorization.record(0.0, 1.0);
        assert_eq!(state.vectorization.vector_ops_count, 1);
        assert_eq!(state.vectorization.scalar_ops_count, 1);
        // Average walks from 1.0 to 4.0 then back toward 2.5.
        assert!((state.vectorization.average_speedup - 2.5).abs() < 1e-12);
    }
}
