//! Operations, complexity classes, and operation results.
//!
//! An [`Operation`] is an immutable unit of simulated work submitted to a
//! component; an [`OperationResult`] carries the computed processing time,
//! the completion tick, and the per-stage metrics recorded by the engine
//! that processed it.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::time::Tick;

/// Asymptotic complexity class of an operation.
///
/// Serialized to the canonical source strings (`"O(1)"`, `"O(n^2)"`, …) so
/// profile tables and operation payloads stay human-readable. Declaration
/// order follows asymptotic growth, so the derived `Ord` sorts classes from
/// cheapest to most expensive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ComplexityClass {
    /// Constant time.
    #[serde(rename = "O(1)")]
    Constant,
    /// Logarithmic time.
    #[serde(rename = "O(log n)")]
    Logarithmic,
    /// Linear time.
    #[serde(rename = "O(n)")]
    Linear,
    /// Linearithmic time.
    #[serde(rename = "O(n log n)")]
    Linearithmic,
    /// Quadratic time.
    #[serde(rename = "O(n^2)")]
    Quadratic,
    /// Cubic time.
    #[serde(rename = "O(n^3)")]
    Cubic,
    /// Exponential time.
    #[serde(rename = "O(2^n)")]
    Exponential,
}

impl ComplexityClass {
    /// All classes, from cheapest to most expensive.
    pub const ALL: [ComplexityClass; 7] = [
        ComplexityClass::Constant,
        ComplexityClass::Logarithmic,
        ComplexityClass::Linear,
        ComplexityClass::Linearithmic,
        ComplexityClass::Quadratic,
        ComplexityClass::Cubic,
        ComplexityClass::Exponential,
    ];

    /// Canonical string form (matches the serde representation).
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplexityClass::Constant => "O(1)",
            ComplexityClass::Logarithmic => "O(log n)",
            ComplexityClass::Linear => "O(n)",
            ComplexityClass::Linearithmic => "O(n log n)",
            ComplexityClass::Quadratic => "O(n^2)",
            ComplexityClass::Cubic => "O(n^3)",
            ComplexityClass::Exponential => "O(2^n)",
        }
    }
}

impl fmt::Display for ComplexityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable request for simulated work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    /// Caller-assigned identifier, echoed in the result.
    pub id: String,
    /// Domain tag (`matrix_multiply`, `database_query`, `compute`, …)
    /// mapped by engines to per-feature tables.
    pub op_type: String,
    /// Asymptotic complexity class.
    pub complexity: ComplexityClass,
    /// Source language of the simulated workload. Free-form; engines fall
    /// back to a profile-declared multiplier for unrecognized values.
    pub language: String,
    /// Input data size [bytes]. Drives cache working-set pressure.
    pub data_size_bytes: u64,
}

impl Operation {
    /// Convenience constructor for the common case.
    pub fn new(
        id: impl Into<String>,
        op_type: impl Into<String>,
        complexity: ComplexityClass,
        language: impl Into<String>,
        data_size_bytes: u64,
    ) -> Self {
        Self {
            id: id.into(),
            op_type: op_type.into(),
            complexity,
            language: language.into(),
            data_size_bytes,
        }
    }
}

/// Outcome of processing one [`Operation`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationResult {
    /// Identifier of the processed operation.
    pub operation_id: String,
    /// Simulated processing duration.
    pub processing_time: Duration,
    /// Tick at which the operation completes.
    pub completion_tick: Tick,
    /// Per-stage metrics (see [`metrics`] for the key vocabulary).
    pub metrics: BTreeMap<String, f64>,
}

/// Metric key vocabulary for [`OperationResult::metrics`].
///
/// The first ten keys are present in every result regardless of which
/// pipeline stages are enabled; the remainder appear only when the
/// corresponding stage ran.
pub mod metrics {
    /// Base time after the complexity factor [ms]. Always present.
    pub const BASE_TIME_MS: &str = "base_time_ms";
    /// Applied language time factor. Always present.
    pub const LANGUAGE_FACTOR: &str = "language_factor";
    /// Applied complexity factor. Always present.
    pub const COMPLEXITY_FACTOR: &str = "complexity_factor";
    /// Vectorizable fraction of the operation. Always present.
    pub const VECTORIZATION_RATIO: &str = "vectorization_ratio";
    /// Effective SIMD speedup. Always present.
    pub const VECTOR_SPEEDUP: &str = "vector_speedup";
    /// Combined cache hit ratio across L1/L2/L3. Always present.
    pub const CACHE_HIT_RATIO: &str = "cache_hit_ratio";
    /// Thermal throttle factor (1.0 = no throttling). Always present.
    pub const THERMAL_FACTOR: &str = "thermal_factor";
    /// Fraction of cores active for this operation. Always present.
    pub const UTILIZATION: &str = "utilization";
    /// Cores used by the parallel stage. Always present.
    pub const ACTIVE_CORES: &str = "active_cores";
    /// Die temperature after the operation [°C]. Always present.
    pub const TEMPERATURE_C: &str = "temperature_c";

    /// Final simulated processing time [ms]. Always present.
    pub const PROCESSING_TIME_MS: &str = "processing_time_ms";
    /// Amdahl speedup applied by the parallel stage.
    pub const PARALLEL_SPEEDUP: &str = "parallel_speedup";
    /// Effective memory-hierarchy multiplier from the cache stage.
    pub const MEMORY_MULTIPLIER: &str = "memory_multiplier";
    /// Branch predictor accuracy used for the penalty estimate.
    pub const BRANCH_ACCURACY: &str = "branch_accuracy";
    /// Misprediction penalty added [ms].
    pub const BRANCH_PENALTY_MS: &str = "branch_penalty_ms";
    /// Prefetch saving subtracted [ms].
    pub const PREFETCH_SAVING_MS: &str = "prefetch_saving_ms";
    /// NUMA cross-socket multiplier.
    pub const NUMA_MULTIPLIER: &str = "numa_multiplier";
    /// Hyperthreading time factor.
    pub const HT_FACTOR: &str = "ht_factor";
    /// Memory bandwidth contention multiplier.
    pub const BANDWIDTH_MULTIPLIER: &str = "bandwidth_multiplier";
    /// 1.0 when the severe-contention draw fired.
    pub const SEVERE_CONTENTION: &str = "severe_contention";
    /// Utilization load-band factor folded into the bandwidth stage.
    pub const LOAD_FACTOR: &str = "load_factor";
    /// Effective clock chosen by the boost stage [GHz].
    pub const BOOST_CLOCK_GHZ: &str = "boost_clock_ghz";
    /// 1.0 when any profile table fell back to its declared default.
    pub const FALLBACK_USED: &str = "fallback_used";

    /// Keys guaranteed in every result.
    pub const REQUIRED: [&str; 10] = [
        BASE_TIME_MS,
        LANGUAGE_FACTOR,
        COMPLEXITY_FACTOR,
        VECTORIZATION_RATIO,
        VECTOR_SPEEDUP,
        CACHE_HIT_RATIO,
        THERMAL_FACTOR,
        UTILIZATION,
        ACTIVE_CORES,
        TEMPERATURE_C,
    ];
}
