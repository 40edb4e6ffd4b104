//! Terminal outcome of a settled operation.

use crate::{OpState, OperationFailed};

/// The terminal value stored when an operation settles.
///
/// Exactly one variant exists per settlement: a fulfilled operation
/// stores its value, a rejected one stores its reason, never both.
///
/// # Examples
///
/// ```
/// use op_core::Outcome;
///
/// let ok: Outcome<&str, String> = Outcome::Success("done");
/// assert!(ok.is_success());
/// assert_eq!(ok.into_result().unwrap(), "done");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T, E> {
    /// The operation fulfilled with a value.
    Success(T),
    /// The operation rejected with a reason.
    Failure(E),
}

impl<T, E> Outcome<T, E> {
    /// The settled state this outcome corresponds to.
    pub fn state(&self) -> OpState {
        match self {
            Outcome::Success(_) => OpState::Fulfilled,
            Outcome::Failure(_) => OpState::Rejected,
        }
    }

    /// Returns true for a fulfilled outcome.
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    /// Returns true for a rejected outcome.
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failure(_))
    }

    /// The fulfillment value, if any.
    pub fn success(&self) -> Option<&T> {
        match self {
            Outcome::Success(value) => Some(value),
            Outcome::Failure(_) => None,
        }
    }

    /// The rejection reason, if any.
    pub fn failure(&self) -> Option<&E> {
        match self {
            Outcome::Success(_) => None,
            Outcome::Failure(reason) => Some(reason),
        }
    }

    /// Converts the outcome into a `Result`, wrapping the rejection
    /// reason in [`OperationFailed`].
    pub fn into_result(self) -> Result<T, OperationFailed<E>> {
        match self {
            Outcome::Success(value) => Ok(value),
            Outcome::Failure(reason) => Err(OperationFailed(reason)),
        }
    }
}
