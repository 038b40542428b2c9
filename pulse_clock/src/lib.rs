//! # PULSE Global Tick Coordinator
//!
//! Owns simulation time, discretized into fixed 10 µs ticks, and delivers
//! every tick to every registered component with bounded delivery latency
//! and graceful degradation when components lag.
//!
//! ## Architecture
//!
//! One coordinator task drives a periodic timer at
//! `TICK_DURATION / scaling_factor`. Each tick is fanned out in parallel to
//! every registered component over its bounded FIFO channel with a hard
//! per-send timeout of half a tick. Components run their own worker tasks
//! and process ticks on their own schedule; the coordinator never waits for
//! processing, only for delivery.
//!
//! ## Degradation contract
//!
//! A timed-out delivery drops that tick for that component: it is logged at
//! ERROR, counted against the component's health, and never retried. The
//! simulation as a whole never aborts on a dropped tick — only [`TickCoordinator::stop`]
//! or the external shutdown signal ends the loop.

pub mod component;
pub mod coordinator;
pub mod error;
pub mod scaling;

pub use component::{Component, ComponentHandle, ComponentRuntime};
pub use coordinator::{
    CoordinatorState, DeliveryStatus, PerformanceMetrics, TickCoordinator, TickStats,
};
pub use error::{ClockResult, CoordinatorError};
pub use scaling::{AutoScaler, AutoScalerConfig};
