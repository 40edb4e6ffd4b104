//! Operation failure error.
//!
//! The error taxonomy has exactly one kind: a settled-as-rejected
//! operation surfaces its reason through `OperationFailed`.

use thiserror::Error;

/// The failure signaled when a rejected operation's result is awaited.
///
/// Carries the rejection reason supplied by the work function. In the
/// callback consumption style failures are delivered to the failure
/// observer and never escalate; in the suspend-and-resume style they
/// are re-signaled at the suspension point as this error.
///
/// # Examples
///
/// ```
/// use op_core::OperationFailed;
///
/// let err = OperationFailed("boom");
/// assert_eq!(err.to_string(), "operation failed: boom");
/// assert_eq!(err.into_reason(), "boom");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("operation failed: {0}")]
pub struct OperationFailed<E>(pub E);

impl<E> OperationFailed<E> {
    /// The rejection reason, by reference.
    pub fn reason(&self) -> &E {
        &self.0
    }

    /// Consumes the error and returns the rejection reason.
    pub fn into_reason(self) -> E {
        self.0
    }
}
