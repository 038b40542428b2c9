//! # PULSE CPU Engine
//!
//! Profile-driven CPU performance model. Given an [`Operation`](pulse::op::Operation)
//! and the current tick, [`CpuEngine::process_operation`] returns a
//! deterministic-given-state processing duration composed from twelve
//! independent hardware feature models: complexity factors, language
//! multipliers, SIMD vectorization, the cache hierarchy, branch
//! prediction, prefetch, Amdahl parallelism, NUMA, hyperthreading, memory
//! bandwidth contention, boost clocks, and thermal behavior.
//!
//! Every scalar in the pipeline traces to a [`CpuProfile`] field; the
//! engine holds no hardcoded hardware numbers. Accuracy versus speed is
//! selected through a four-level [`ComplexityLevel`] dial or per-feature
//! switches.
//!
//! The engine is single-owner: it is not safe for concurrent
//! `process_operation` on shared state. [`CpuComponent`] packages one
//! engine per component, which satisfies the contract by construction.

pub mod component;
pub mod engine;
pub mod error;
pub mod features;
pub mod profile;
pub mod state;

pub use component::CpuComponent;
pub use engine::{CpuEngine, EngineMetrics};
pub use error::{ProfileError, ProfileResult};
pub use features::{ComplexityLevel, FeatureSet};
pub use profile::CpuProfile;
