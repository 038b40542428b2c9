//! Complexity-factor and language-factor table lookups.
//!
//! Both lookups tolerate unknown operation inputs by substituting the
//! profile's explicit fallback and flagging the substitution; neither is
//! ever an error at processing time.

use pulse::op::ComplexityClass;

use crate::profile::{ComplexitySpec, LanguageSpec};

/// Time factor for a complexity class. The boolean is true when the
/// fallback factor was substituted.
pub fn complexity_factor(spec: &ComplexitySpec, class: ComplexityClass) -> (f64, bool) {
    match spec.factors.get(&class) {
        Some(factor) => (*factor, false),
        None => (spec.fallback_factor, true),
    }
}

/// Applied language time factor: the reciprocal of the profile's
/// throughput multiplier, so slower languages yield larger factors.
/// The boolean is true when the fallback multiplier was substituted.
pub fn language_time_factor(spec: &LanguageSpec, language: &str) -> (f64, bool) {
    match spec.multipliers.get(language) {
        Some(multiplier) => (1.0 / multiplier, false),
        None => (1.0 / spec.fallback_multiplier, true),
    }
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::test_support::reference_profile;

    #[test]
    fn known_complexity_has_no_fallback() {
        let spec = reference_profile().engine_specific.complexity;
        let (factor, fallback) = complexity_factor(&spec, ComplexityClass::Quadratic);
        assert_eq!(factor, 100.0);
        assert!(!fallback);
    }

    #[test]
    fn slower_language_gets_larger_time_factor() {
        let spec = reference_profile().engine_specific.language;
        let (cpp, _) = language_time_factor(&spec, "cpp");
        let (python, _) = language_time_factor(&spec, "python");
        assert!(python > cpp);
        assert!((python - 1.0 / 0.3).abs() < 1e-12);
    }

    #[test]
    fn unknown_language_uses_fallback_and_flags_it() {
        let spec = reference_profile().engine_specific.language;
        let (factor, fallback) = language_time_factor(&spec, "cobol");
        assert_eq!(factor, 1.0 / spec.fallback_multiplier);
        assert!(fallback);
        assert!(factor > 0.0);
    }
}
