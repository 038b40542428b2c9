//! Error types for coordinator operations.

use thiserror::Error;

use crate::coordinator::CoordinatorState;

/// Errors surfaced by [`TickCoordinator`](crate::TickCoordinator) operations.
///
/// Tick delivery timeouts and component panics are deliberately *not* here:
/// those are logged, degrade component health, and never abort the
/// simulation.
#[derive(Error, Debug)]
pub enum CoordinatorError {
    /// A component with this id is already registered.
    #[error("component already registered: {id}")]
    DuplicateComponent {
        /// Component identifier.
        id: String,
    },

    /// No component with this id is registered.
    #[error("component not found: {id}")]
    ComponentNotFound {
        /// Component identifier.
        id: String,
    },

    /// A lifecycle operation was invoked in a state that does not allow it.
    #[error("{operation} not allowed in state {state:?}")]
    InvalidState {
        /// Operation that was attempted.
        operation: &'static str,
        /// State the coordinator was in.
        state: CoordinatorState,
    },

    /// Scaling factor must be finite and strictly positive.
    #[error("invalid scaling factor {value} (must be finite and > 0)")]
    InvalidScalingFactor {
        /// Rejected value.
        value: f64,
    },
}

/// Result type for coordinator operations.
pub type ClockResult<T> = Result<T, CoordinatorError>;
