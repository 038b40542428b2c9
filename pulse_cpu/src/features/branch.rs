//! Branch prediction model.
//!
//! The expected misprediction penalty follows the classic shape
//! `rate × pipeline_depth × penalty`: the predictor accuracy is chosen by
//! the operation's dominant access pattern (loop branches predict almost
//! perfectly, data-dependent branches poorly, call/return in between).
//! Pattern classification is table-driven per operation type with an
//! explicit profile default for unlisted types.

use crate::profile::{AccessPattern, BranchPredictionSpec};

/// Branch stage outcome.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BranchOutcome {
    /// Pattern the operation type classified to.
    pub pattern: AccessPattern,
    /// Predictor accuracy for that pattern [0, 1].
    pub accuracy: f64,
    /// Expected misprediction penalty added to the operation [s].
    pub penalty_s: f64,
    /// Operation type was not in the pattern table.
    pub fallback: bool,
}

/// Classify an operation type to its dominant access pattern.
pub fn pattern_for(spec: &BranchPredictionSpec, op_type: &str) -> (AccessPattern, bool) {
    match spec.operation_patterns.get(op_type) {
        Some(pattern) => (*pattern, false),
        None => (spec.default_pattern, true),
    }
}

/// Predictor accuracy for a pattern.
pub fn accuracy_for(spec: &BranchPredictionSpec, pattern: AccessPattern) -> f64 {
    match pattern {
        AccessPattern::Sequential => spec.loop_accuracy,
        AccessPattern::Random => spec.random_accuracy,
        AccessPattern::CallHeavy => spec.call_return_accuracy,
    }
}

/// Expected misprediction penalty for one operation.
pub fn penalty(spec: &BranchPredictionSpec, op_type: &str) -> BranchOutcome {
    let (pattern, fallback) = pattern_for(spec, op_type);
    let accuracy = accuracy_for(spec, pattern);
    let penalty_s =
        (1.0 - accuracy) * f64::from(spec.pipeline_depth) * spec.misprediction_penalty_s;
    BranchOutcome { pattern, accuracy, penalty_s: penalty_s.max(0.0), fallback }
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::test_support::reference_profile;

    #[test]
    fn sequential_work_is_cheapest() {
        let spec = reference_profile().engine_specific.branch_prediction;
        let loops = penalty(&spec, "matrix_multiply");
        let random = penalty(&spec, "database_query");
        let calls = penalty(&spec, "api_route");
        assert_eq!(loops.pattern, AccessPattern::Sequential);
        assert_eq!(random.pattern, AccessPattern::Random);
        assert_eq!(calls.pattern, AccessPattern::CallHeavy);
        assert!(loops.penalty_s < calls.penalty_s);
        assert!(calls.penalty_s < random.penalty_s);
    }

    #[test]
    fn penalty_follows_rate_depth_cost() {
        let spec = reference_profile().engine_specific.branch_prediction;
        let out = penalty(&spec, "database_query");
        let expected = (1.0 - spec.random_accuracy)
            * f64::from(spec.pipeline_depth)
            * spec.misprediction_penalty_s;
        assert!((out.penalty_s - expected).abs() < 1e-15);
    }

    #[test]
    fn unknown_type_falls_back_to_default_pattern() {
        let spec = reference_profile().engine_specific.branch_prediction;
        let (pattern, fallback) = pattern_for(&spec, "unheard_of");
        assert_eq!(pattern, spec.default_pattern);
        assert!(fallback);
    }

    #[test]
    fn perfect_predictor_has_zero_penalty() {
        let mut spec = reference_profile().engine_specific.branch_prediction;
        spec.loop_accuracy = 1.0;
        assert_eq!(penalty(&spec, "matrix_multiply").penalty_s, 0.0);
    }
}
