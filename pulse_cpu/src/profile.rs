//! CPU profile schema, loader, and validation.
//!
//! Profiles are versioned JSON documents (`profiles/cpu/<name>.json`)
//! describing one calibrated CPU: baseline performance, technology specs,
//! utilization load curves, and one sub-section per engine feature model.
//! Every scalar the engine uses at runtime comes from here — the pipeline
//! contains no inline hardware numbers.
//!
//! Enumerated tables carry no implicit runtime defaults: a table that is
//! empty or missing a required key is a loader error. Where the engine
//! tolerates unknown *operation inputs* (an unrecognized language or
//! op_type), the fallback it applies is itself an explicit profile field.

use std::collections::BTreeMap;
use std::path::Path;

use pulse::op::ComplexityClass;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ProfileError, ProfileResult};

/// Profile schema major version this loader accepts.
pub const SUPPORTED_MAJOR_VERSION: u32 = 2;

// ─── Schema ─────────────────────────────────────────────────────────

/// A complete, calibrated CPU description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CpuProfile {
    /// Schema version (`"2.1"`); unknown majors are rejected.
    pub version: String,
    pub baseline_performance: BaselinePerformance,
    pub technology_specs: TechnologySpecs,
    pub load_curves: LoadCurves,
    pub engine_specific: EngineSpecific,
}

/// Headline performance figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BaselinePerformance {
    /// Processing time of a unit operation at O(1) [s].
    pub base_processing_time_s: f64,
    /// Physical core count.
    pub cores: u32,
    /// Sustained all-core clock [GHz].
    pub base_clock_ghz: f64,
    /// Peak advertised boost clock [GHz].
    pub boost_clock_ghz: f64,
}

/// Die and platform characteristics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TechnologySpecs {
    /// L1 data cache per core [KiB].
    pub cache_l1_kb: u32,
    /// L2 cache per core [KiB].
    pub cache_l2_kb: u32,
    /// Shared L3 cache [MiB].
    pub cache_l3_mb: u32,
    /// Memory channels per socket.
    pub memory_channels: u32,
    /// Thermal design power [W].
    pub tdp_w: f64,
    /// Absolute junction temperature limit [°C].
    pub thermal_limit_c: f64,
    /// Process node (e.g. `"14nm"`).
    pub process: String,
    /// Socket name (e.g. `"LGA3647"`).
    pub socket: String,
    /// Maximum supported memory [GiB].
    pub max_memory_gb: u32,
}

/// Utilization band: at or below `threshold`, apply `factor`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoadBand {
    /// Upper utilization bound of the band [0, 1].
    pub threshold: f64,
    /// Time multiplier while in the band.
    pub factor: f64,
}

/// Utilization load curve: optimal → warning → critical.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoadCurves {
    pub optimal: LoadBand,
    pub warning: LoadBand,
    pub critical: LoadBand,
}

impl LoadCurves {
    /// Factor for the band containing `utilization`.
    pub fn factor_for(&self, utilization: f64) -> f64 {
        if utilization <= self.optimal.threshold {
            self.optimal.factor
        } else if utilization <= self.warning.threshold {
            self.warning.factor
        } else {
            self.critical.factor
        }
    }
}

/// One sub-section per engine feature model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineSpecific {
    pub language: LanguageSpec,
    pub complexity: ComplexitySpec,
    pub vectorization: VectorizationSpec,
    pub cache: CacheSpec,
    pub branch_prediction: BranchPredictionSpec,
    pub prefetch: PrefetchSpec,
    pub parallel: ParallelSpec,
    pub numa: NumaSpec,
    pub hyperthreading: HyperthreadingSpec,
    pub memory_bandwidth: MemoryBandwidthSpec,
    pub boost: BoostSpec,
    pub thermal: ThermalSpec,
}

/// Language throughput multipliers: higher = faster. The engine applies
/// the reciprocal as a time factor, so `python = 0.3` runs slower than
/// `cpp = 1.3`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LanguageSpec {
    /// Throughput multiplier per recognized language.
    pub multipliers: BTreeMap<String, f64>,
    /// Throughput multiplier applied to unrecognized languages.
    pub fallback_multiplier: f64,
}

/// Complexity-class time factors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ComplexitySpec {
    /// Time factor per complexity class. Must cover every class.
    pub factors: BTreeMap<ComplexityClass, f64>,
    /// Factor substituted when a lookup cannot be satisfied.
    pub fallback_factor: f64,
}

/// SIMD capability description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VectorizationSpec {
    /// Vector register width [bits].
    pub vector_width_bits: u32,
    /// Scalar operand width [bits].
    pub scalar_width_bits: u32,
    /// Fraction of theoretical SIMD speedup actually achieved [0, 1].
    pub simd_efficiency: f64,
    /// Supported instruction set extensions, informational.
    pub supported_instructions: Vec<String>,
    /// Vectorizable fraction per operation type [0, 1].
    pub operation_vectorizability: BTreeMap<String, f64>,
    /// Vectorizable fraction for unlisted operation types.
    pub default_vectorizability: f64,
}

/// Hit ratios for the three cache levels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CacheRatios {
    pub l1: f64,
    pub l2: f64,
    pub l3: f64,
}

/// Cache hierarchy behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CacheSpec {
    /// Hit ratios immediately after reset.
    pub cold_start: CacheRatios,
    /// Hit ratios a fully warmed cache converges to.
    pub targets: CacheRatios,
    /// Warming constant: each operation closes `1/warmup_operations` of
    /// the gap to the target (scaled by working-set pressure).
    pub warmup_operations: u32,
    /// Latency multiplier for an L2 hit, relative to L1.
    pub l2_latency_multiplier: f64,
    /// Latency multiplier for an L3 hit, relative to L1.
    pub l3_latency_multiplier: f64,
    /// Latency multiplier for a memory access, relative to L1.
    pub memory_latency_multiplier: f64,
}

/// Dominant access pattern of an operation type, used by the branch
/// predictor model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessPattern {
    /// Tight loops over contiguous data.
    Sequential,
    /// Data-dependent, unpredictable branching.
    Random,
    /// Deep call/return chains.
    CallHeavy,
}

/// Branch predictor model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BranchPredictionSpec {
    /// Pipeline depth flushed on a misprediction [stages].
    pub pipeline_depth: u32,
    /// Cost per flushed stage at the expected misprediction rate [s].
    pub misprediction_penalty_s: f64,
    /// Predictor accuracy on loop branches [0, 1].
    pub loop_accuracy: f64,
    /// Predictor accuracy on data-dependent branches [0, 1].
    pub random_accuracy: f64,
    /// Predictor accuracy on call/return branches [0, 1].
    pub call_return_accuracy: f64,
    /// Dominant access pattern per operation type.
    pub operation_patterns: BTreeMap<String, AccessPattern>,
    /// Pattern assumed for unlisted operation types.
    pub default_pattern: AccessPattern,
}

/// Hardware prefetcher model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PrefetchSpec {
    /// Fraction of sequential accesses the prefetcher predicts [0, 1].
    pub sequential_accuracy: f64,
    /// Cache lines fetched ahead.
    pub prefetch_distance: u32,
    /// Memory latency hidden per prefetched line [s].
    pub per_line_cost_s: f64,
}

/// Amdahl parallel execution model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParallelSpec {
    /// Hard cap on the parallelizable fraction [0, 1].
    pub max_parallelizable_ratio: f64,
    /// Cores the scheduler aims to use when the workload allows it.
    pub desired_cores: u32,
    /// Fixed synchronization overhead fraction.
    pub sync_overhead: f64,
    /// Additional overhead fraction per core beyond the first.
    pub overhead_per_core: f64,
    /// Parallelizable fraction per complexity class. Must cover every class.
    pub parallelizability_by_complexity: BTreeMap<ComplexityClass, f64>,
    /// Core cap per complexity class. Must cover every class.
    pub max_cores_for_complexity: BTreeMap<ComplexityClass, u32>,
    /// Scaling efficiency by core count; looked up at the largest key ≤ N.
    /// Must contain key `1`.
    pub efficiency_curve: BTreeMap<u32, f64>,
}

/// Socket topology.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NumaSpec {
    /// Socket count.
    pub sockets: u32,
    /// Physical cores per socket.
    pub cores_per_socket: u32,
    /// Fraction of accesses served from local memory [0, 1].
    pub local_memory_ratio: f64,
    /// Latency multiplier for a remote access (≥ 1).
    pub cross_socket_penalty: f64,
}

/// Simultaneous multithreading model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HyperthreadingSpec {
    /// SMT available and enabled.
    pub enabled: bool,
    /// Hardware threads per physical core.
    pub threads_per_core: u32,
    /// Throughput gain fraction per extra thread [0, 1].
    pub efficiency_factor: f64,
    /// Cap on the SMT speedup (≥ 1).
    pub max_benefit: f64,
}

/// Memory bandwidth contention model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MemoryBandwidthSpec {
    /// Active-core count above which bandwidth contention begins.
    pub contention_threshold: u32,
    /// Time degradation fraction per core above the threshold.
    pub per_core_degradation: f64,
    /// Probability of a severe contention event [0, 1].
    pub severe_contention_probability: f64,
    /// Multiplier applied on a severe contention event (≥ 1).
    pub severe_contention_penalty: f64,
    /// Seed for the deterministic contention draw; reset re-seeds.
    pub rng_seed: u64,
}

/// Turbo/boost clock behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BoostSpec {
    /// Single-core boost clock [GHz].
    pub single_core_boost_ghz: f64,
    /// All-core boost clock [GHz].
    pub all_core_boost_ghz: f64,
    /// Simulated time the boost window stays open [s].
    pub boost_duration_s: f64,
    /// Headroom below the throttle point required to boost [°C].
    pub thermal_headroom_c: f64,
}

/// Heat accumulation and dissipation model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThermalSpec {
    /// Ambient (and post-reset die) temperature [°C].
    pub ambient_c: f64,
    /// Temperature at which throttling engages [°C].
    pub throttle_temp_c: f64,
    /// Effective clock fraction while throttled (0, 1).
    pub throttle_factor: f64,
    /// Heating per core-second of simulated work [°C].
    pub heat_generation_rate: f64,
    /// Cooling system capacity.
    pub cooling_capacity: f64,
    /// Fraction of cooling capacity realized [0, 1].
    pub cooling_efficiency: f64,
}

// ─── Loading ────────────────────────────────────────────────────────

impl CpuProfile {
    /// Parse and validate a profile from a JSON string.
    pub fn from_json_str(json: &str) -> ProfileResult<Self> {
        let profile: CpuProfile = serde_json::from_str(json)?;
        profile.validate()?;
        Ok(profile)
    }

    /// Load and validate a profile from a JSON file.
    pub fn load(path: &Path) -> ProfileResult<Self> {
        let json = std::fs::read_to_string(path)?;
        let profile = Self::from_json_str(&json)?;
        info!(path = %path.display(), version = %profile.version, "CPU profile loaded");
        Ok(profile)
    }

    /// Load every `*.json` profile in a directory, sorted by file stem.
    pub fn load_dir(dir: &Path) -> ProfileResult<Vec<(String, Self)>> {
        let mut profiles = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|e| e == "json") {
                let name = path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default();
                profiles.push((name, Self::load(&path)?));
            }
        }
        profiles.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(profiles)
    }

    // ── Validation ──

    /// Check version, table completeness, and numeric ranges.
    ///
    /// Called by every loading path; a profile that fails here never
    /// reaches an engine.
    pub fn validate(&self) -> ProfileResult<()> {
        self.validate_version()?;
        self.baseline_performance.validate()?;
        self.technology_specs.validate()?;
        self.load_curves.validate()?;
        self.engine_specific.validate(&self.baseline_performance)?;
        Ok(())
    }

    fn validate_version(&self) -> ProfileResult<()> {
        let major = self
            .version
            .split('.')
            .next()
            .and_then(|m| m.parse::<u32>().ok());
        if major != Some(SUPPORTED_MAJOR_VERSION) {
            return Err(ProfileError::UnsupportedVersion {
                version: self.version.clone(),
                expected_major: SUPPORTED_MAJOR_VERSION,
            });
        }
        Ok(())
    }
}

fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> ProfileResult<()> {
    if !value.is_finite() || value < min || value > max {
        return Err(ProfileError::OutOfRange { field, value, min, max });
    }
    Ok(())
}

fn check_ratio(field: &'static str, value: f64) -> ProfileResult<()> {
    check_range(field, value, 0.0, 1.0)
}

fn check_positive(field: &'static str, value: f64) -> ProfileResult<()> {
    check_range(field, value, f64::MIN_POSITIVE, f64::MAX)
}

fn check_covers_all_classes<V>(
    table: &'static str,
    map: &BTreeMap<ComplexityClass, V>,
) -> ProfileResult<()> {
    if map.is_empty() {
        return Err(ProfileError::EmptyTable { table });
    }
    if let Some(class) = ComplexityClass::ALL.iter().find(|c| !map.contains_key(c)) {
        return Err(ProfileError::MissingKey { table, key: class.to_string() });
    }
    Ok(())
}

impl BaselinePerformance {
    fn validate(&self) -> ProfileResult<()> {
        check_positive("baseline_performance.base_processing_time_s", self.base_processing_time_s)?;
        check_range("baseline_performance.cores", self.cores as f64, 1.0, 1024.0)?;
        check_positive("baseline_performance.base_clock_ghz", self.base_clock_ghz)?;
        check_range(
            "baseline_performance.boost_clock_ghz",
            self.boost_clock_ghz,
            self.base_clock_ghz,
            f64::MAX,
        )?;
        Ok(())
    }
}

impl TechnologySpecs {
    fn validate(&self) -> ProfileResult<()> {
        check_range("technology_specs.cache_l1_kb", self.cache_l1_kb as f64, 1.0, f64::MAX)?;
        check_range("technology_specs.cache_l2_kb", self.cache_l2_kb as f64, 1.0, f64::MAX)?;
        check_range("technology_specs.cache_l3_mb", self.cache_l3_mb as f64, 1.0, f64::MAX)?;
        check_range("technology_specs.memory_channels", self.memory_channels as f64, 1.0, 64.0)?;
        check_positive("technology_specs.tdp_w", self.tdp_w)?;
        check_range("technology_specs.thermal_limit_c", self.thermal_limit_c, 40.0, 150.0)?;
        Ok(())
    }
}

impl LoadCurves {
    fn validate(&self) -> ProfileResult<()> {
        check_ratio("load_curves.optimal.threshold", self.optimal.threshold)?;
        check_ratio("load_curves.warning.threshold", self.warning.threshold)?;
        check_ratio("load_curves.critical.threshold", self.critical.threshold)?;
        if !(self.optimal.threshold < self.warning.threshold
            && self.warning.threshold <= self.critical.threshold)
        {
            return Err(ProfileError::OutOfRange {
                field: "load_curves.warning.threshold",
                value: self.warning.threshold,
                min: self.optimal.threshold,
                max: self.critical.threshold,
            });
        }
        check_positive("load_curves.optimal.factor", self.optimal.factor)?;
        check_positive("load_curves.warning.factor", self.warning.factor)?;
        check_positive("load_curves.critical.factor", self.critical.factor)?;
        Ok(())
    }
}

impl EngineSpecific {
    fn validate(&self, baseline: &BaselinePerformance) -> ProfileResult<()> {
        // Language table.
        if self.language.multipliers.is_empty() {
            return Err(ProfileError::EmptyTable { table: "language_multipliers" });
        }
        for mult in self.language.multipliers.values() {
            check_positive("engine_specific.language.multipliers", *mult)?;
        }
        check_positive(
            "engine_specific.language.fallback_multiplier",
            self.language.fallback_multiplier,
        )?;

        // Complexity table must cover every class.
        check_covers_all_classes("complexity_factors", &self.complexity.factors)?;
        for factor in self.complexity.factors.values() {
            check_positive("engine_specific.complexity.factors", *factor)?;
        }
        check_positive("engine_specific.complexity.fallback_factor", self.complexity.fallback_factor)?;

        // Vectorization.
        let v = &self.vectorization;
        check_range("vectorization.vector_width_bits", v.vector_width_bits as f64, 1.0, 4096.0)?;
        check_range("vectorization.scalar_width_bits", v.scalar_width_bits as f64, 1.0, 256.0)?;
        check_ratio("vectorization.simd_efficiency", v.simd_efficiency)?;
        if v.operation_vectorizability.is_empty() {
            return Err(ProfileError::EmptyTable { table: "operation_vectorizability" });
        }
        for ratio in v.operation_vectorizability.values() {
            check_ratio("vectorization.operation_vectorizability", *ratio)?;
        }
        check_ratio("vectorization.default_vectorizability", v.default_vectorizability)?;

        // Cache.
        let c = &self.cache;
        for (field, value) in [
            ("cache.cold_start.l1", c.cold_start.l1),
            ("cache.cold_start.l2", c.cold_start.l2),
            ("cache.cold_start.l3", c.cold_start.l3),
            ("cache.targets.l1", c.targets.l1),
            ("cache.targets.l2", c.targets.l2),
            ("cache.targets.l3", c.targets.l3),
        ] {
            check_ratio(field, value)?;
        }
        check_range("cache.warmup_operations", c.warmup_operations as f64, 1.0, f64::MAX)?;
        check_range("cache.l2_latency_multiplier", c.l2_latency_multiplier, 1.0, f64::MAX)?;
        check_range("cache.l3_latency_multiplier", c.l3_latency_multiplier, 1.0, f64::MAX)?;
        check_range("cache.memory_latency_multiplier", c.memory_latency_multiplier, 1.0, f64::MAX)?;

        // Branch prediction.
        let b = &self.branch_prediction;
        check_range("branch_prediction.pipeline_depth", b.pipeline_depth as f64, 1.0, 100.0)?;
        check_range("branch_prediction.misprediction_penalty_s", b.misprediction_penalty_s, 0.0, f64::MAX)?;
        check_ratio("branch_prediction.loop_accuracy", b.loop_accuracy)?;
        check_ratio("branch_prediction.random_accuracy", b.random_accuracy)?;
        check_ratio("branch_prediction.call_return_accuracy", b.call_return_accuracy)?;

        // Prefetch.
        check_ratio("prefetch.sequential_accuracy", self.prefetch.sequential_accuracy)?;
        check_range("prefetch.per_line_cost_s", self.prefetch.per_line_cost_s, 0.0, f64::MAX)?;

        // Parallel.
        let p = &self.parallel;
        check_ratio("parallel.max_parallelizable_ratio", p.max_parallelizable_ratio)?;
        check_range("parallel.desired_cores", p.desired_cores as f64, 1.0, baseline.cores as f64 * 8.0)?;
        check_range("parallel.sync_overhead", p.sync_overhead, 0.0, 1.0)?;
        check_range("parallel.overhead_per_core", p.overhead_per_core, 0.0, 1.0)?;
        check_covers_all_classes(
            "parallelizability_by_complexity",
            &p.parallelizability_by_complexity,
        )?;
        for ratio in p.parallelizability_by_complexity.values() {
            check_ratio("parallel.parallelizability_by_complexity", *ratio)?;
        }
        check_covers_all_classes("max_cores_for_complexity", &p.max_cores_for_complexity)?;
        for cores in p.max_cores_for_complexity.values() {
            check_range("parallel.max_cores_for_complexity", *cores as f64, 1.0, f64::MAX)?;
        }
        if p.efficiency_curve.is_empty() {
            return Err(ProfileError::EmptyTable { table: "efficiency_curve" });
        }
        if !p.efficiency_curve.contains_key(&1) {
            return Err(ProfileError::MissingKey { table: "efficiency_curve", key: "1".into() });
        }
        for eff in p.efficiency_curve.values() {
            check_range("parallel.efficiency_curve", *eff, f64::MIN_POSITIVE, 1.0)?;
        }

        // NUMA.
        let n = &self.numa;
        check_range("numa.sockets", n.sockets as f64, 1.0, 16.0)?;
        check_range("numa.cores_per_socket", n.cores_per_socket as f64, 1.0, f64::MAX)?;
        check_ratio("numa.local_memory_ratio", n.local_memory_ratio)?;
        check_range("numa.cross_socket_penalty", n.cross_socket_penalty, 1.0, f64::MAX)?;

        // Hyperthreading.
        let h = &self.hyperthreading;
        check_range("hyperthreading.threads_per_core", h.threads_per_core as f64, 1.0, 16.0)?;
        check_ratio("hyperthreading.efficiency_factor", h.efficiency_factor)?;
        check_range("hyperthreading.max_benefit", h.max_benefit, 1.0, f64::MAX)?;

        // Memory bandwidth.
        let m = &self.memory_bandwidth;
        check_range("memory_bandwidth.contention_threshold", m.contention_threshold as f64, 1.0, f64::MAX)?;
        check_range("memory_bandwidth.per_core_degradation", m.per_core_degradation, 0.0, 1.0)?;
        check_ratio("memory_bandwidth.severe_contention_probability", m.severe_contention_probability)?;
        check_range("memory_bandwidth.severe_contention_penalty", m.severe_contention_penalty, 1.0, f64::MAX)?;

        // Boost.
        let bo = &self.boost;
        check_range(
            "boost.single_core_boost_ghz",
            bo.single_core_boost_ghz,
            baseline.base_clock_ghz,
            f64::MAX,
        )?;
        check_range(
            "boost.all_core_boost_ghz",
            bo.all_core_boost_ghz,
            baseline.base_clock_ghz,
            bo.single_core_boost_ghz,
        )?;
        check_positive("boost.boost_duration_s", bo.boost_duration_s)?;
        check_range("boost.thermal_headroom_c", bo.thermal_headroom_c, 0.0, f64::MAX)?;

        // Thermal.
        let t = &self.thermal;
        check_range("thermal.ambient_c", t.ambient_c, -40.0, 60.0)?;
        check_range("thermal.throttle_temp_c", t.throttle_temp_c, t.ambient_c, f64::MAX)?;
        check_range("thermal.throttle_factor", t.throttle_factor, f64::MIN_POSITIVE, 1.0)?;
        check_range("thermal.heat_generation_rate", t.heat_generation_rate, 0.0, f64::MAX)?;
        check_positive("thermal.cooling_capacity", t.cooling_capacity)?;
        check_ratio("thermal.cooling_efficiency", t.cooling_efficiency)?;
        Ok(())
    }
}

// ─── Tests ──────────────────────────────────────────────────────────


pub mod test_support {
    //! In-memory reference profile mirroring the shipped Intel Xeon Gold
    //! 6142 document. Used by tests and benches that need a profile
    //! without touching the filesystem.

    use super::*;

    /// A 24-core Skylake-SP-class profile assembled in memory.
    pub fn reference_profile() -> CpuProfile {
        let languages = [
            ("cpp", 1.3),
            ("c", 1.35),
            ("rust", 1.3),
            ("go", 1.0),
            ("java", 0.85),
            ("javascript", 0.55),
            ("python", 0.3),
        ];
        let complexity_factors = [
            (ComplexityClass::Constant, 1.0),
            (ComplexityClass::Logarithmic, 3.0),
            (ComplexityClass::Linear, 10.0),
            (ComplexityClass::Linearithmic, 25.0),
            (ComplexityClass::Quadratic, 100.0),
            (ComplexityClass::Cubic, 1000.0),
            (ComplexityClass::Exponential, 5000.0),
        ];
        let vectorizability = [
            ("matrix_multiply", 0.90),
            ("image_process", 0.85),
            ("compute", 0.60),
            ("string_process", 0.40),
            ("database_query", 0.20),
            ("api_route", 0.10),
        ];
        let parallelizability = [
            (ComplexityClass::Constant, 0.10),
            (ComplexityClass::Logarithmic, 0.20),
            (ComplexityClass::Linear, 0.50),
            (ComplexityClass::Linearithmic, 0.70),
            (ComplexityClass::Quadratic, 0.85),
            (ComplexityClass::Cubic, 0.92),
            (ComplexityClass::Exponential, 0.95),
        ];
        let max_cores = [
            (ComplexityClass::Constant, 1),
            (ComplexityClass::Logarithmic, 2),
            (ComplexityClass::Linear, 4),
            (ComplexityClass::Linearithmic, 8),
            (ComplexityClass::Quadratic, 16),
            (ComplexityClass::Cubic, 32),
            (ComplexityClass::Exponential, 48),
        ];
        let efficiency_curve = [
            (1, 1.0),
            (2, 0.95),
            (4, 0.88),
            (8, 0.78),
            (16, 0.65),
            (24, 0.55),
        ];
        let patterns = [
            ("matrix_multiply", AccessPattern::Sequential),
            ("image_process", AccessPattern::Sequential),
            ("compute", AccessPattern::Sequential),
            ("string_process", AccessPattern::Random),
            ("database_query", AccessPattern::Random),
            ("api_route", AccessPattern::CallHeavy),
        ];

        CpuProfile {
            version: "2.1".into(),
            baseline_performance: BaselinePerformance {
                base_processing_time_s: 0.0001,
                cores: 24,
                base_clock_ghz: 2.6,
                boost_clock_ghz: 3.7,
            },
            technology_specs: TechnologySpecs {
                cache_l1_kb: 32,
                cache_l2_kb: 1024,
                cache_l3_mb: 22,
                memory_channels: 6,
                tdp_w: 150.0,
                thermal_limit_c: 96.0,
                process: "14nm".into(),
                socket: "LGA3647".into(),
                max_memory_gb: 768,
            },
            load_curves: LoadCurves {
                optimal: LoadBand { threshold: 0.70, factor: 1.0 },
                warning: LoadBand { threshold: 0.85, factor: 1.1 },
                critical: LoadBand { threshold: 1.0, factor: 1.25 },
            },
            engine_specific: EngineSpecific {
                language: LanguageSpec {
                    multipliers: languages
                        .into_iter()
                        .map(|(k, v)| (k.to_string(), v))
                        .collect(),
                    fallback_multiplier: 1.0,
                },
                complexity: ComplexitySpec {
                    factors: complexity_factors.into_iter().collect(),
                    fallback_factor: 10.0,
                },
                vectorization: VectorizationSpec {
                    vector_width_bits: 512,
                    scalar_width_bits: 64,
                    simd_efficiency: 0.85,
                    supported_instructions: vec![
                        "SSE4.2".into(),
                        "AVX2".into(),
                        "AVX-512".into(),
                    ],
                    operation_vectorizability: vectorizability
                        .into_iter()
                        .map(|(k, v)| (k.to_string(), v))
                        .collect(),
                    default_vectorizability: 0.30,
                },
                cache: CacheSpec {
                    cold_start: CacheRatios { l1: 0.30, l2: 0.20, l3: 0.10 },
                    targets: CacheRatios { l1: 0.95, l2: 0.85, l3: 0.70 },
                    warmup_operations: 10,
                    l2_latency_multiplier: 3.0,
                    l3_latency_multiplier: 8.0,
                    memory_latency_multiplier: 20.0,
                },
                branch_prediction: BranchPredictionSpec {
                    pipeline_depth: 14,
                    misprediction_penalty_s: 0.00005,
                    loop_accuracy: 0.98,
                    random_accuracy: 0.85,
                    call_return_accuracy: 0.95,
                    operation_patterns: patterns
                        .into_iter()
                        .map(|(k, v)| (k.to_string(), v))
                        .collect(),
                    default_pattern: AccessPattern::Random,
                },
                prefetch: PrefetchSpec {
                    sequential_accuracy: 0.90,
                    prefetch_distance: 8,
                    per_line_cost_s: 0.000002,
                },
                parallel: ParallelSpec {
                    max_parallelizable_ratio: 0.95,
                    // Logical thread budget: 24 physical × 2 SMT threads.
                    desired_cores: 48,
                    sync_overhead: 0.02,
                    overhead_per_core: 0.005,
                    parallelizability_by_complexity: parallelizability.into_iter().collect(),
                    max_cores_for_complexity: max_cores.into_iter().collect(),
                    efficiency_curve: efficiency_curve.into_iter().collect(),
                },
                numa: NumaSpec {
                    sockets: 2,
                    cores_per_socket: 12,
                    local_memory_ratio: 0.80,
                    cross_socket_penalty: 1.8,
                },
                hyperthreading: HyperthreadingSpec {
                    enabled: true,
                    threads_per_core: 2,
                    efficiency_factor: 0.30,
                    max_benefit: 1.30,
                },
                memory_bandwidth: MemoryBandwidthSpec {
                    contention_threshold: 8,
                    per_core_degradation: 0.04,
                    severe_contention_probability: 0.05,
                    severe_contention_penalty: 1.5,
                    rng_seed: 6142,
                },
                boost: BoostSpec {
                    single_core_boost_ghz: 3.7,
                    all_core_boost_ghz: 3.3,
                    boost_duration_s: 10.0,
                    thermal_headroom_c: 10.0,
                },
                thermal: ThermalSpec {
                    ambient_c: 22.0,
                    throttle_temp_c: 85.0,
                    throttle_factor: 0.70,
                    heat_generation_rate: 120.0,
                    cooling_capacity: 500.0,
                    cooling_efficiency: 0.90,
                },
            },
        }
    }
}
