//! Common re-exports for PULSE crates.

pub use crate::consts::{
    DEFAULT_OPERATION_CHANNEL_CAPACITY, DEFAULT_TICK_CHANNEL_CAPACITY, MIN_TICK_CHANNEL_CAPACITY,
    MISSED_TICK_THRESHOLD, TICK_DELIVERY_TIMEOUT, TICK_DURATION, TICK_DURATION_US,
    TICK_STATS_WINDOW,
};
pub use crate::op::{ComplexityClass, Operation, OperationResult};
pub use crate::time::{Tick, duration_of, scaled_tick_interval, ticks_for};
