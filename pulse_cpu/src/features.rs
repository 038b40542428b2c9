//! Feature models and the complexity dial.
//!
//! Each submodule is one hardware feature model: a pure function over
//! profile parameters and (where needed) engine state, combined by the
//! engine pipeline in a fixed order. The [`FeatureSet`] bitflags select
//! which models run; [`ComplexityLevel`] maps the four-level dial onto
//! feature sets.

pub mod bandwidth;
pub mod boost;
pub mod branch;
pub mod cache;
pub mod hyperthreading;
pub mod lookup;
pub mod numa;
pub mod parallel;
pub mod prefetch;
pub mod thermal;
pub mod vectorization;

use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;

bitflags! {
    /// Pipeline stages that can be individually enabled.
    ///
    /// Flag order matches the pipeline order.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FeatureSet: u16 {
        /// Stage 1: complexity-class base factor.
        const COMPLEXITY = 1 << 0;
        /// Stage 2: language time factor.
        const LANGUAGE = 1 << 1;
        /// Stage 3: SIMD vectorization.
        const VECTORIZATION = 1 << 2;
        /// Stage 4: cache hierarchy.
        const CACHE = 1 << 3;
        /// Stage 5: branch prediction penalty.
        const BRANCH_PREDICTION = 1 << 4;
        /// Stage 6: hardware prefetch.
        const PREFETCH = 1 << 5;
        /// Stage 7: Amdahl parallel execution.
        const PARALLEL = 1 << 6;
        /// Stage 8: NUMA cross-socket penalty.
        const NUMA = 1 << 7;
        /// Stage 9: hyperthreading.
        const HYPERTHREADING = 1 << 8;
        /// Stage 10: memory bandwidth contention.
        const MEMORY_BANDWIDTH = 1 << 9;
        /// Stage 11: boost clocks.
        const BOOST = 1 << 10;
        /// Stage 12: thermal accumulation and throttling.
        const THERMAL = 1 << 11;
    }
}

impl FeatureSet {
    /// Names of the enabled features, in pipeline order.
    pub fn names(&self) -> Vec<&'static str> {
        self.iter_names().map(|(name, _)| name).collect()
    }
}

/// Accuracy-versus-speed dial. Each level enables a fixed feature subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ComplexityLevel {
    /// Base factor, language factor, and parallel speedup only.
    Minimal,
    /// Minimal plus vectorization, cache, and thermal.
    Basic,
    /// Basic plus branch prediction, prefetch, bandwidth, and boost.
    Advanced,
    /// All twelve feature models.
    Maximum,
}

impl ComplexityLevel {
    /// Feature set enabled by this level.
    pub fn features(self) -> FeatureSet {
        let minimal = FeatureSet::COMPLEXITY | FeatureSet::LANGUAGE | FeatureSet::PARALLEL;
        let basic = minimal | FeatureSet::VECTORIZATION | FeatureSet::CACHE | FeatureSet::THERMAL;
        let advanced = basic
            | FeatureSet::BRANCH_PREDICTION
            | FeatureSet::PREFETCH
            | FeatureSet::MEMORY_BANDWIDTH
            | FeatureSet::BOOST;
        match self {
            ComplexityLevel::Minimal => minimal,
            ComplexityLevel::Basic => basic,
            ComplexityLevel::Advanced => advanced,
            ComplexityLevel::Maximum => FeatureSet::all(),
        }
    }
}

impl fmt::Display for ComplexityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ComplexityLevel::Minimal => "minimal",
            ComplexityLevel::Basic => "basic",
            ComplexityLevel::Advanced => "advanced",
            ComplexityLevel::Maximum => "maximum",
        };
        f.write_str(name)
    }
}

impl FromStr for ComplexityLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "minimal" => Ok(ComplexityLevel::Minimal),
            "basic" => Ok(ComplexityLevel::Basic),
            "advanced" => Ok(ComplexityLevel::Advanced),
            "maximum" => Ok(ComplexityLevel::Maximum),
            other => Err(format!("unknown complexity level {other:?}")),
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_are_strictly_nested() {
        let minimal = ComplexityLevel::Minimal.features();
        let basic = ComplexityLevel::Basic.features();
        let advanced = ComplexityLevel::Advanced.features();
        let maximum = ComplexityLevel::Maximum.features();

        assert!(basic.contains(minimal) && basic != minimal);
        assert!(advanced.contains(basic) && advanced != basic);
        assert!(maximum.contains(advanced) && maximum != advanced);
        assert_eq!(maximum, FeatureSet::all());
    }

    #[test]
    fn minimal_enables_exactly_three_stages() {
        let minimal = ComplexityLevel::Minimal.features();
        assert_eq!(minimal.iter().count(), 3);
        assert!(minimal.contains(FeatureSet::COMPLEXITY));
        assert!(minimal.contains(FeatureSet::LANGUAGE));
        assert!(minimal.contains(FeatureSet::PARALLEL));
    }

    #[test]
    fn level_round_trips_through_strings() {
        for level in [
            ComplexityLevel::Minimal,
            ComplexityLevel::Basic,
            ComplexityLevel::Advanced,
            ComplexityLevel::Maximum,
        ] {
            assert_eq!(level.to_string().parse::<ComplexityLevel>().unwrap(), level);
        }
        assert!("ultra".parse::<ComplexityLevel>().is_err());
    }
}
