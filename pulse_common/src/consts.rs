//! System-wide constants for the PULSE workspace.
//!
//! Single source of truth for all numeric limits.
//! Imported by all crates — no duplication permitted.

use std::time::Duration;

use static_assertions::const_assert;

/// Duration of one simulation tick. Build-time constant; changing it is a
/// breaking change to the simulation contract, not a runtime setting.
pub const TICK_DURATION: Duration = Duration::from_micros(TICK_DURATION_US);

/// Tick duration in microseconds.
pub const TICK_DURATION_US: u64 = 10;

/// Tick duration in nanoseconds.
pub const TICK_DURATION_NS: u64 = TICK_DURATION_US * 1_000;

/// Hard per-component timeout for delivering one tick. A send that does
/// not complete within half a tick is dropped, logged, and never retried.
pub const TICK_DELIVERY_TIMEOUT: Duration = Duration::from_nanos(TICK_DURATION_NS / 2);

/// Minimum inbound tick channel capacity per component.
pub const MIN_TICK_CHANNEL_CAPACITY: usize = 100;

/// Default inbound tick channel capacity per component.
pub const DEFAULT_TICK_CHANNEL_CAPACITY: usize = 256;

/// Default operation input channel capacity per component.
pub const DEFAULT_OPERATION_CHANNEL_CAPACITY: usize = 1024;

/// Consecutive missed tick deliveries after which a component is
/// considered unhealthy.
pub const MISSED_TICK_THRESHOLD: u32 = 3;

/// Rolling window length for per-tick wall-time statistics [ticks].
pub const TICK_STATS_WINDOW: usize = 100;

const_assert!(DEFAULT_TICK_CHANNEL_CAPACITY >= MIN_TICK_CHANNEL_CAPACITY);
const_assert!(TICK_DURATION_US > 0);
