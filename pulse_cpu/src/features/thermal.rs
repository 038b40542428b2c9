//! Thermal accumulation and throttling model.
//!
//! Work heats the die in proportion to `active_cores × time ×
//! heat_generation_rate`; the cooling system removes heat in proportion
//! to the temperature delta above ambient over the same span. The die
//! temperature is clamped to `[ambient, thermal_limit]`. At or above the
//! throttle point the effective clock drops to `throttle_factor`, which
//! stretches processing time by its reciprocal.

use crate::profile::ThermalSpec;
use crate::state::ThermalState;

/// Thermal stage outcome.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThermalOutcome {
    /// Time multiplier (1.0 unthrottled, `1/throttle_factor` throttled).
    pub factor: f64,
    /// Die temperature after the operation [°C].
    pub temp_c: f64,
    /// Throttling engaged for this operation.
    pub throttled: bool,
}

/// Accumulate one operation's heat and evaluate throttling.
pub fn accumulate(
    spec: &ThermalSpec,
    thermal_limit_c: f64,
    state: &mut ThermalState,
    active_cores: u32,
    time_s: f64,
) -> ThermalOutcome {
    let work_heat = f64::from(active_cores.max(1)) * time_s * spec.heat_generation_rate;
    state.accumulated_work_heat += work_heat;

    let dissipated = spec.cooling_capacity
        * spec.cooling_efficiency
        * (state.current_temp_c - state.ambient_c)
        * time_s;

    let temp_c =
        (state.current_temp_c + work_heat - dissipated).clamp(state.ambient_c, thermal_limit_c);
    state.current_temp_c = temp_c;
    state.heat_accumulation = temp_c - state.ambient_c;

    if temp_c >= spec.throttle_temp_c {
        state.throttle_active = true;
        state.throttle_factor = spec.throttle_factor;
        ThermalOutcome { factor: 1.0 / spec.throttle_factor, temp_c, throttled: true }
    } else {
        state.throttle_active = false;
        state.throttle_factor = 1.0;
        ThermalOutcome { factor: 1.0, temp_c, throttled: false }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::test_support::reference_profile;
    use crate::state::EngineState;

    #[test]
    fn work_heats_the_die() {
        let profile = reference_profile();
        let spec = &profile.engine_specific.thermal;
        let mut state = EngineState::from_profile(&profile);

        let out = accumulate(spec, 96.0, &mut state.thermal, 16, 0.001);
        assert!(out.temp_c > spec.ambient_c);
        assert!(!out.throttled);
        assert_eq!(out.factor, 1.0);
    }

    #[test]
    fn temperature_never_exceeds_the_limit() {
        let profile = reference_profile();
        let spec = &profile.engine_specific.thermal;
        let mut state = EngineState::from_profile(&profile);

        for _ in 0..10_000 {
            accumulate(spec, 96.0, &mut state.thermal, 24, 0.01);
            assert!(state.thermal.current_temp_c <= 96.0);
            assert!(state.thermal.current_temp_c >= spec.ambient_c);
        }
    }

    #[test]
    fn idle_die_cools_back_toward_ambient() {
        let profile = reference_profile();
        let spec = &profile.engine_specific.thermal;
        let mut state = EngineState::from_profile(&profile);
        state.thermal.current_temp_c = 60.0;

        let mut no_heat = spec.clone();
        no_heat.heat_generation_rate = 0.0;
        for _ in 0..100 {
            accumulate(&no_heat, 96.0, &mut state.thermal, 1, 0.001);
        }
        assert!(state.thermal.current_temp_c < 60.0);
        assert!(state.thermal.current_temp_c >= spec.ambient_c);
    }

    #[test]
    fn throttle_engages_at_the_throttle_point() {
        let profile = reference_profile();
        let spec = &profile.engine_specific.thermal;
        let mut state = EngineState::from_profile(&profile);
        state.thermal.current_temp_c = spec.throttle_temp_c;

        let out = accumulate(spec, 96.0, &mut state.thermal, 24, 0.001);
        assert!(out.throttled);
        assert!((out.factor - 1.0 / spec.throttle_factor).abs() < 1e-12);
        assert!(state.thermal.throttle_active);
    }

    #[test]
    fn equilibrium_sits_where_heat_matches_cooling() {
        let profile = reference_profile();
        let spec = &profile.engine_specific.thermal;
        let mut state = EngineState::from_profile(&profile);

        for _ in 0..100_000 {
            accumulate(spec, 96.0, &mut state.thermal, 16, 0.0001);
        }
        // ΔT_eq = cores·rate / (capacity·efficiency) = 16·120 / 450 ≈ 4.27.
        let delta = state.thermal.current_temp_c - spec.ambient_c;
        assert!((delta - 16.0 * 120.0 / 450.0).abs() < 0.1, "ΔT = {delta}");
    }
}
