//! Duration↔tick conversions and scaling presets.
//!
//! Simulation time is discretized into [`TICK_DURATION`](crate::consts::TICK_DURATION)
//! steps. Conversions here are the single place where durations become tick
//! counts; an operation of positive duration always occupies at least one
//! tick, and a round trip through ticks loses less than one tick of
//! precision.

use std::time::Duration;

use crate::consts::{TICK_DURATION, TICK_DURATION_NS};

/// A point in simulated time, counted in ticks since simulation start.
pub type Tick = u64;

/// Number of ticks an operation of duration `d` occupies.
///
/// Ceiling division: any positive duration costs at least one tick.
/// Zero duration costs zero ticks.
#[inline]
pub fn ticks_for(d: Duration) -> Tick {
    let ns = d.as_nanos();
    if ns == 0 {
        return 0;
    }
    ns.div_ceil(TICK_DURATION_NS as u128) as Tick
}

/// Simulated duration spanned by `ticks` (saturating on overflow).
#[inline]
pub fn duration_of(ticks: Tick) -> Duration {
    Duration::from_nanos(ticks.saturating_mul(TICK_DURATION_NS))
}

/// Wall-clock interval between ticks at the given scaling factor.
///
/// `scaling > 1` runs faster than real time (the interval shrinks);
/// `scaling < 1` is slow motion. The caller guarantees `scaling` is
/// finite and positive.
#[inline]
pub fn scaled_tick_interval(scaling: f64) -> Duration {
    let interval = TICK_DURATION.div_f64(scaling);
    interval.max(Duration::from_nanos(1))
}

/// Named scaling factors for common simulation speeds.
pub mod presets {
    /// 1:1 with wall-clock time.
    pub const REAL_TIME: f64 = 1.0;
    /// Ten times slower than real time.
    pub const SLOW_MOTION: f64 = 0.1;
    /// Ten times faster than real time.
    pub const FAST_FORWARD: f64 = 10.0;
    /// Hundred-fold speedup for batch runs.
    pub const BATCH: f64 = 100.0;
}
