//! PULSE Common Library
//!
//! This crate provides the shared data model and constants for all PULSE
//! workspace crates: simulation ticks, operations, operation results, and
//! duration↔tick conversions.
//!
//! # Module Structure
//!
//! - [`consts`] - System-wide constants (tick duration, channel bounds)
//! - [`op`] - Operations, complexity classes, and operation results
//! - [`time`] - Duration↔tick conversions and scaling presets
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! Add to your `Cargo.toml` with alias for shorter imports:
//! ```toml
//! [dependencies]
//! pulse = { package = "pulse_common", path = "../pulse_common" }
//! ```
//!
//! Then import:
//! ```rust
//! use pulse_common::consts::TICK_DURATION;
//! use pulse_common::op::{Operation, OperationResult};
//! ```

pub mod consts;
pub mod op;
pub mod prelude;
pub mod time;
