//! Boost clock model.
//!
//! A single active core with thermal headroom runs at the single-core
//! boost clock. Multi-core work runs at the all-core boost clock while
//! the boost window — opened at the first boost activation — has not
//! exhausted its simulated duration; afterwards it falls back to the base
//! clock until the engine is reset. Time scales by
//! `base_clock / effective_clock`.

use pulse::time::{Tick, duration_of};

use crate::profile::{BaselinePerformance, BoostSpec, ThermalSpec};
use crate::state::BoostState;

/// Boost stage outcome.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoostOutcome {
    /// Clock chosen for this operation [GHz].
    pub clock_ghz: f64,
    /// Time multiplier (`base_clock / clock`, ≤ 1 while boosting).
    pub time_factor: f64,
}

/// Pick the effective clock for one operation and update the boost window.
pub fn effective_clock(
    spec: &BoostSpec,
    baseline: &BaselinePerformance,
    thermal: &ThermalSpec,
    state: &mut BoostState,
    current_temp_c: f64,
    active_cores: u32,
    tick: Tick,
) -> BoostOutcome {
    let headroom_ok = current_temp_c <= thermal.throttle_temp_c - spec.thermal_headroom_c;

    let clock_ghz = if active_cores <= 1 && headroom_ok {
        state.boost_start_tick.get_or_insert(tick);
        state.boost_active = true;
        spec.single_core_boost_ghz
    } else if headroom_ok && window_open(spec, state, tick) {
        state.boost_start_tick.get_or_insert(tick);
        state.boost_active = true;
        spec.all_core_boost_ghz
    } else {
        state.boost_active = false;
        baseline.base_clock_ghz
    };

    state.current_clock_ghz = clock_ghz;
    BoostOutcome { clock_ghz, time_factor: baseline.base_clock_ghz / clock_ghz }
}

/// The boost window is open until `boost_duration_s` of simulated time
/// has passed since it first opened.
fn window_open(spec: &BoostSpec, state: &BoostState, tick: Tick) -> bool {
    match state.boost_start_tick {
        Some(start) => {
            duration_of(tick.saturating_sub(start)).as_secs_f64() < spec.boost_duration_s
        }
        None => true,
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
