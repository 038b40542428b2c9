//! SIMD vectorization model.
//!
//! Effective speedup for an operation whose vectorizable fraction is `r`:
//! `1 + r · (lanes − 1) · simd_efficiency`, where `lanes` is the vector
//! width divided by the scalar operand width. Fully scalar operations
//! (`r = 0`) keep a speedup of exactly 1.

use crate::profile::VectorizationSpec;

/// Vectorization stage outcome.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VectorOutcome {
    /// Vectorizable fraction of the operation [0, 1].
    pub ratio: f64,
    /// Time divisor applied (≥ 1).
    pub speedup: f64,
    /// Operation type was not in the vectorizability table.
    pub fallback: bool,
}

/// Compute the SIMD speedup for one operation type.
pub fn speedup_for(spec: &VectorizationSpec, op_type: &str) -> VectorOutcome {
    let (ratio, fallback) = match spec.operation_vectorizability.get(op_type) {
        Some(ratio) => (*ratio, false),
        None => (spec.default_vectorizability, true),
    };
    let lanes = f64::from(spec.vector_width_bits) / f64::from(spec.scalar_width_bits);
    let speedup = (1.0 + ratio * (lanes - 1.0) * spec.simd_efficiency).max(1.0);
    VectorOutcome { ratio, speedup, fallback }
}

// ─── Tests ──────────────────────────────────────────────────────────
