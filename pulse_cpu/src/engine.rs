//! The CPU engine: the fixed twelve-stage processing pipeline.
//!
//! [`CpuEngine::process_operation`] composes the feature models in a
//! fixed order — base time, language, vectorization, cache, branch
//! prediction, prefetch, parallel, NUMA, hyperthreading, memory
//! bandwidth, boost, thermal — gated by the current [`FeatureSet`]. The
//! result is deterministic given the engine's prior state and profile.
//!
//! Processing never fails for valid operations: unknown languages,
//! operation types, and table misses substitute the profile's explicit
//! fallbacks and surface a `fallback_used` metric instead of an error.

use std::collections::BTreeMap;
use std::time::Duration;

use pulse::op::{Operation, OperationResult, metrics as keys};
use pulse::time::{Tick, ticks_for};
use tracing::debug;

use crate::error::ProfileResult;
use crate::features::{
    ComplexityLevel, FeatureSet, bandwidth, boost, branch, cache, hyperthreading, lookup, numa,
    parallel, prefetch, thermal, vectorization,
};
use crate::profile::CpuProfile;
use crate::state::{AccessRecord, EngineState};

/// Floor for intermediate and final processing times [s]. Keeps every
/// stage's arithmetic finite and the tick conversion at least one tick.
const MIN_TIME_S: f64 = 1e-12;

/// Ceiling for intermediate and final processing times [s].
const MAX_TIME_S: f64 = 1e6;

/// Profile-driven CPU performance engine.
///
/// Single-owner: not safe for concurrent `process_operation` on shared
/// state. Wrap one engine per component (see
/// [`CpuComponent`](crate::CpuComponent)) or serialize access externally.
pub struct CpuEngine {
    profile: CpuProfile,
    state: EngineState,
    level: ComplexityLevel,
    features: FeatureSet,
}

impl CpuEngine {
    /// Build an engine from a profile, validating it first. Starts at the
    /// Maximum complexity level with cold state.
    pub fn new(profile: CpuProfile) -> ProfileResult<Self> {
        profile.validate()?;
        let state = EngineState::from_profile(&profile);
        Ok(Self {
            profile,
            state,
            level: ComplexityLevel::Maximum,
            features: ComplexityLevel::Maximum.features(),
        })
    }

    /// Replace the profile. On validation failure the engine keeps its
    /// current profile and state; on success the state is reset cold.
    pub fn load_profile(&mut self, profile: CpuProfile) -> ProfileResult<()> {
        profile.validate()?;
        self.profile = profile;
        self.reset_state();
        Ok(())
    }

    /// The active profile.
    pub fn profile(&self) -> &CpuProfile {
        &self.profile
    }

    /// Read-only view of the accumulating state.
    pub fn state(&self) -> &EngineState {
        &self.state
    }

    /// Return to cold start: ambient temperature, cold cache ratios, zero
    /// utilization, boost inactive at base clock, cleared history and
    /// counters, re-seeded contention RNG.
    pub fn reset_state(&mut self) {
        self.state = EngineState::from_profile(&self.profile);
        debug!("engine state reset to cold start");
    }

    // ── Complexity dial ──

    /// Select a dial level, replacing the feature set wholesale.
    pub fn set_complexity_level(&mut self, level: ComplexityLevel) {
        self.level = level;
        self.features = level.features();
    }

    /// The most recently selected dial level.
    pub fn complexity_level(&self) -> ComplexityLevel {
        self.level
    }

    /// Enable individual features on top of the current set.
    pub fn enable_feature(&mut self, feature: FeatureSet) {
        self.features |= feature;
    }

    /// Disable individual features.
    pub fn disable_feature(&mut self, feature: FeatureSet) {
        self.features &= !feature;
    }

    /// True when every flag in `feature` is enabled.
    pub fn is_feature_enabled(&self, feature: FeatureSet) -> bool {
        self.features.contains(feature)
    }

    /// The currently enabled feature set.
    pub fn enabled_features(&self) -> FeatureSet {
        self.features
    }

    // ── Pipeline ──

    /// Process one operation at `current_tick`.
    ///
    /// Mutates the engine's accumulating state (cache warmth, thermals,
    /// boost window, counters) and returns the simulated processing time
    /// with per-stage metrics.
    pub fn process_operation(&mut self, op: &Operation, current_tick: Tick) -> OperationResult {
        let spec = &self.profile.engine_specific;
        let baseline = &self.profile.baseline_performance;
        let features = self.features;
        let mut metrics = BTreeMap::new();
        let mut fallback_used = false;

        // 1. Base time from the complexity class.
        let (complexity_factor, fb) = lookup::complexity_factor(&spec.complexity, op.complexity);
        fallback_used |= fb;
        let applied_complexity =
            if features.contains(FeatureSet::COMPLEXITY) { complexity_factor } else { 1.0 };
        let base_time_s = clamp_time(baseline.base_processing_time_s * applied_complexity);
        let mut time_s = base_time_s;

        // 2. Language factor (reciprocal of the throughput multiplier).
        let (language_factor, fb) = lookup::language_time_factor(&spec.language, &op.language);
        fallback_used |= fb;
        let applied_language =
            if features.contains(FeatureSet::LANGUAGE) { language_factor } else { 1.0 };
        time_s = clamp_time(time_s * applied_language);

        // 3. SIMD vectorization.
        let mut vector_ratio = 0.0;
        let mut vector_speedup = 1.0;
        if features.contains(FeatureSet::VECTORIZATION) {
            let out = vectorization::speedup_for(&spec.vectorization, &op.op_type);
            fallback_used |= out.fallback;
            self.state.vectorization.record(out.ratio, out.speedup);
            vector_ratio = out.ratio;
            vector_speedup = out.speedup;
            time_s = clamp_time(time_s / out.speedup);
        }

        // 4. Cache hierarchy. Remember the penalty for the prefetch stage.
        let mut memory_penalty_s = 0.0;
        if features.contains(FeatureSet::CACHE) {
            let (pattern, _) = branch::pattern_for(&spec.branch_prediction, &op.op_type);
            let out = cache::warm_and_classify(
                &spec.cache,
                &self.profile.technology_specs,
                &mut self.state.cache,
                AccessRecord { data_size_bytes: op.data_size_bytes, pattern },
            );
            memory_penalty_s = time_s * (out.multiplier - 1.0);
            time_s = clamp_time(time_s * out.multiplier);
            metrics.insert(keys::MEMORY_MULTIPLIER.into(), out.multiplier);
        }

        // 5. Branch prediction penalty.
        if features.contains(FeatureSet::BRANCH_PREDICTION) {
            let out = branch::penalty(&spec.branch_prediction, &op.op_type);
            fallback_used |= out.fallback;
            self.state.branch.predicted_operations += 1;
            self.state.branch.total_penalty_s += out.penalty_s;
            time_s = clamp_time(time_s + out.penalty_s);
            metrics.insert(keys::BRANCH_ACCURACY.into(), out.accuracy);
            metrics.insert(keys::BRANCH_PENALTY_MS.into(), out.penalty_s * 1e3);
        }

        // 6. Prefetch recovers part of the memory penalty.
        if features.contains(FeatureSet::PREFETCH) {
            let saving_s = prefetch::saving_s(&spec.prefetch, memory_penalty_s);
            self.state.prefetch.total_saving_s += saving_s;
            time_s = clamp_time(time_s - saving_s);
            metrics.insert(keys::PREFETCH_SAVING_MS.into(), saving_s * 1e3);
        }

        // 7. Amdahl parallel execution.
        let parallel_out = if features.contains(FeatureSet::PARALLEL) {
            parallel::amdahl(&spec.parallel, baseline.cores, op.complexity)
        } else {
            parallel::ParallelOutcome {
                cores_used: 1,
                requested_cores: 1,
                parallelizable: 0.0,
                speedup: 1.0,
            }
        };
        time_s = clamp_time(time_s / parallel_out.speedup);

        let active_cores = parallel_out.cores_used;
        self.state.active_cores = active_cores;
        for (i, slot) in self.state.core_utilization.iter_mut().enumerate() {
            *slot = if (i as u32) < active_cores { 1.0 } else { 0.0 };
        }
        let utilization = f64::from(active_cores) / f64::from(baseline.cores.max(1));

        // 8. NUMA cross-socket penalty.
        if features.contains(FeatureSet::NUMA) {
            let multiplier = numa::cross_socket_multiplier(&spec.numa, active_cores);
            time_s = clamp_time(time_s * multiplier);
            metrics.insert(keys::NUMA_MULTIPLIER.into(), multiplier);
        }

        // 9. Hyperthreading recovers oversubscribed requests.
        if features.contains(FeatureSet::HYPERTHREADING) {
            let speedup = hyperthreading::smt_speedup(
                &spec.hyperthreading,
                parallel_out.requested_cores,
                active_cores,
            );
            time_s = clamp_time(time_s / speedup);
            metrics.insert(keys::HT_FACTOR.into(), 1.0 / speedup);
        }

        // 10. Memory bandwidth contention, shaped by the utilization band.
        if features.contains(FeatureSet::MEMORY_BANDWIDTH) {
            let out = bandwidth::contention_multiplier(
                &spec.memory_bandwidth,
                active_cores,
                &mut self.state.bandwidth.rng,
            );
            if out.severe {
                self.state.bandwidth.severe_events += 1;
            }
            let load_factor = self.profile.load_curves.factor_for(utilization);
            time_s = clamp_time(time_s * out.multiplier * load_factor);
            metrics.insert(keys::BANDWIDTH_MULTIPLIER.into(), out.multiplier);
            metrics.insert(keys::SEVERE_CONTENTION.into(), if out.severe { 1.0 } else { 0.0 });
            metrics.insert(keys::LOAD_FACTOR.into(), load_factor);
        }

        // 11. Boost clock selection.
        if features.contains(FeatureSet::BOOST) {
            let out = boost::effective_clock(
                &spec.boost,
                baseline,
                &spec.thermal,
                &mut self.state.boost,
                self.state.thermal.current_temp_c,
                active_cores,
                current_tick,
            );
            time_s = clamp_time(time_s * out.time_factor);
            metrics.insert(keys::BOOST_CLOCK_GHZ.into(), out.clock_ghz);
        }

        // 12. Thermal accumulation and throttling.
        let mut thermal_factor = 1.0;
        if features.contains(FeatureSet::THERMAL) {
            let out = thermal::accumulate(
                &spec.thermal,
                self.profile.technology_specs.thermal_limit_c,
                &mut self.state.thermal,
                active_cores,
                time_s,
            );
            thermal_factor = out.factor;
            time_s = clamp_time(time_s * out.factor);
        }

        self.state.operations_processed += 1;

        // Required keys are present in every result; stage extras only
        // when their stage ran.
        metrics.insert(keys::BASE_TIME_MS.into(), base_time_s * 1e3);
        metrics.insert(keys::COMPLEXITY_FACTOR.into(), applied_complexity);
        metrics.insert(keys::LANGUAGE_FACTOR.into(), applied_language);
        metrics.insert(keys::VECTORIZATION_RATIO.into(), vector_ratio);
        metrics.insert(keys::VECTOR_SPEEDUP.into(), vector_speedup);
        metrics.insert(keys::CACHE_HIT_RATIO.into(), self.state.cache.combined_hit_ratio());
        metrics.insert(keys::THERMAL_FACTOR.into(), thermal_factor);
        metrics.insert(keys::UTILIZATION.into(), utilization);
        metrics.insert(keys::ACTIVE_CORES.into(), f64::from(active_cores));
        metrics.insert(keys::TEMPERATURE_C.into(), self.state.thermal.current_temp_c);
        metrics.insert(keys::PARALLEL_SPEEDUP.into(), parallel_out.speedup);
        metrics.insert(keys::PROCESSING_TIME_MS.into(), time_s * 1e3);
        if fallback_used {
            metrics.insert(keys::FALLBACK_USED.into(), 1.0);
        }

        let processing_time = Duration::from_secs_f64(time_s);
        OperationResult {
            operation_id: op.id.clone(),
            processing_time,
            completion_tick: current_tick + ticks_for(processing_time),
            metrics,
        }
    }

    /// Aggregate counters snapshot for observability.
    pub fn metrics(&self) -> EngineMetrics {
        EngineMetrics {
            operations_processed: self.state.operations_processed,
            vector_ops: self.state.vectorization.vector_ops_count,
            scalar_ops: self.state.vectorization.scalar_ops_count,
            average_vector_speedup: self.state.vectorization.average_speedup,
            l1_hit_ratio: self.state.cache.l1_hit_ratio,
            l2_hit_ratio: self.state.cache.l2_hit_ratio,
            l3_hit_ratio: self.state.cache.l3_hit_ratio,
            current_temp_c: self.state.thermal.current_temp_c,
            throttle_active: self.state.thermal.throttle_active,
            current_clock_ghz: self.state.boost.current_clock_ghz,
            active_cores: self.state.active_cores,
            severe_contention_events: self.state.bandwidth.severe_events,
            total_branch_penalty_s: self.state.branch.total_penalty_s,
            total_prefetch_saving_s: self.state.prefetch.total_saving_s,
        }
    }
}

#[inline]
fn clamp_time(time_s: f64) -> f64 {
    if time_s.is_finite() { time_s.clamp(MIN_TIME_S, MAX_TIME_S) } else { MAX_TIME_S }
}

/// Aggregate engine counters.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineMetrics {
    pub operations_processed: u64,
    pub vector_ops: u64,
    pub scalar_ops: u64,
    pub average_vector_speedup: f64,
    pub l1_hit_ratio: f64,
    pub l2_hit_ratio: f64,
    pub l3_hit_ratio: f64,
    pub current_temp_c: f64,
    pub throttle_active: bool,
    pub current_clock_ghz: f64,
    pub active_cores: u32,
    pub severe_contention_events: u64,
    pub total_branch_penalty_s: f64,
    pub total_prefetch_saving_s: f64,
}

// ─── Tests ──────────────────────────────────────────────────────────
