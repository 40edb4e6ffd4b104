//! Runtime error types.

use std::fmt;

use op_core::OperationFailed;
use thiserror::Error;

/// Errors surfaced by the scheduler while driving tasks and observers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// An observer handler returned an error during microtask dispatch.
    #[error("observer handler failed: {0}")]
    Handler(String),

    /// An operation failure escaped a spawned sequence unhandled.
    #[error("unhandled operation failure: {0}")]
    Operation(String),

    /// Suspended tasks remain but nothing can wake them.
    #[error("scheduler stalled: suspended tasks remain but nothing can wake them")]
    Stalled,
}

impl<E: fmt::Display> From<OperationFailed<E>> for RuntimeError {
    fn from(err: OperationFailed<E>) -> Self {
        RuntimeError::Operation(err.into_reason().to_string())
    }
}
