//! Suspend-and-resume access to an operation's outcome.
//!
//! Both futures here are thin observers of the same settlement event
//! the callback style subscribes to: polling a pending operation
//! registers the task's waker in the cell, and settlement wakes every
//! registered task so the scheduler resumes them first-settled-first.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use op_core::{OperationFailed, Outcome};

use crate::operation::Operation;

/// Future resolving to the terminal [`Outcome`] of an operation.
///
/// Never fails; a rejected operation resolves to `Outcome::Failure`.
#[derive(Debug)]
pub struct SettledFuture<T, E> {
    op: Operation<T, E>,
}

impl<T, E> SettledFuture<T, E> {
    pub(crate) fn new(op: Operation<T, E>) -> Self {
        Self { op }
    }
}

impl<T: Clone + 'static, E: Clone + 'static> Future for SettledFuture<T, E> {
    type Output = Outcome<T, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match self.op.try_outcome() {
            Some(outcome) => Poll::Ready(outcome),
            None => {
                self.op.register_waker(cx.waker());
                Poll::Pending
            }
        }
    }
}

/// Future resolving to the operation's value, or failing with
/// [`OperationFailed`] carrying the rejection reason.
///
/// This is the suspend-and-resume accessor: `op.result().await?`
/// re-signals a rejection at the suspension point, where a wrapping
/// `match` (or `?`) can intercept it or let it propagate.
#[derive(Debug)]
pub struct ResultFuture<T, E> {
    settled: SettledFuture<T, E>,
}

impl<T, E> ResultFuture<T, E> {
    pub(crate) fn new(op: Operation<T, E>) -> Self {
        Self {
            settled: SettledFuture::new(op),
        }
    }
}

impl<T: Clone + 'static, E: Clone + 'static> Future for ResultFuture<T, E> {
    type Output = Result<T, OperationFailed<E>>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.settled)
            .poll(cx)
            .map(Outcome::into_result)
    }
}

/// A drop guard that runs a closure exactly once when its scope exits.
///
/// Gives the suspend style its guaranteed finalization step: the
/// closure runs on the success path, on an intercepted failure, and
/// while an uncaught failure is propagating.
///
/// # Examples
///
/// ```
/// use op_runtime::Finalizer;
/// use std::cell::Cell;
///
/// let ran = Cell::new(false);
/// {
///     let _finish = Finalizer::new(|| ran.set(true));
/// }
/// assert!(ran.get());
/// ```
pub struct Finalizer<F: FnOnce()> {
    action: Option<F>,
}

impl<F: FnOnce()> Finalizer<F> {
    /// Arms the guard with the finalization closure.
    pub fn new(action: F) -> Self {
        Self {
            action: Some(action),
        }
    }
}

impl<F: FnOnce()> Drop for Finalizer<F> {
    fn drop(&mut self) {
        if let Some(action) = self.action.take() {
            action();
        }
    }
}
