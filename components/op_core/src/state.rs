//! Operation lifecycle state.
//!
//! An operation starts Pending and transitions exactly once to either
//! Fulfilled or Rejected. Once settled it never changes state again.

/// The lifecycle state of an asynchronous operation.
///
/// State transitions are monotonic and single-fire: Pending may move to
/// Fulfilled or Rejected, and a settled state is final.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpState {
    /// The initial state; the operation has not yet settled.
    Pending,
    /// The operation completed successfully with a value.
    Fulfilled,
    /// The operation failed with a reason.
    Rejected,
}

impl OpState {
    /// Returns true once the operation has left the Pending state.
    pub fn is_settled(self) -> bool {
        !matches!(self, OpState::Pending)
    }
}
