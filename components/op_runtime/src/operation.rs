//! Operation settlement cell and observer registration.
//!
//! An [`Operation`] is a one-shot settlement cell: it starts Pending
//! and is settled exactly once by the [`Settler`] handed to its work
//! function. Settlement is a guarded one-time transition; repeat calls
//! to `succeed`/`fail` are silent no-ops. Observers registered before
//! settlement are dispatched in attachment order, and observers
//! registered after settlement see the stored terminal outcome.

use std::cell::RefCell;
use std::fmt;
use std::mem;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::task::Waker;

use op_core::{OpState, Outcome};
use tracing::trace;

use crate::error::RuntimeError;
use crate::future::{ResultFuture, SettledFuture};
use crate::microtask::{Microtask, MicrotaskQueue};

static NEXT_OPERATION_ID: AtomicU64 = AtomicU64::new(0);

/// The result type observer handlers return.
///
/// A handler that fails does not stop its observer's settled callback
/// from running; the error is surfaced through the scheduler afterward.
pub type HandlerResult = Result<(), RuntimeError>;

type SuccessHandler<T> = Box<dyn FnOnce(T) -> HandlerResult>;
type FailureHandler<E> = Box<dyn FnOnce(E) -> HandlerResult>;
type SettledHandler = Box<dyn FnOnce() -> HandlerResult>;

/// One registration of callbacks against an operation.
struct Observer<T, E> {
    on_success: Option<SuccessHandler<T>>,
    on_failure: Option<FailureHandler<E>>,
    on_settled: Option<SettledHandler>,
}

/// Shared interior of an operation.
struct Inner<T, E> {
    state: OpState,
    outcome: Option<Outcome<T, E>>,
    observers: Vec<Observer<T, E>>,
    wakers: Vec<Waker>,
}

impl<T, E> Inner<T, E> {
    fn new() -> Self {
        Self {
            state: OpState::Pending,
            outcome: None,
            observers: Vec::new(),
            wakers: Vec::new(),
        }
    }
}

/// A single unit of asynchronous work and its eventual outcome.
///
/// Clonable: multiple independent consumers (callback observers and
/// suspended sequences alike) share the same settlement cell and all
/// observe the same terminal outcome. There is no pooling or reuse; a
/// settled operation is immutable.
pub struct Operation<T, E> {
    id: u64,
    inner: Rc<RefCell<Inner<T, E>>>,
    queue: MicrotaskQueue,
}

impl<T, E> Clone for Operation<T, E> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            inner: Rc::clone(&self.inner),
            queue: self.queue.clone(),
        }
    }
}

impl<T, E> fmt::Debug for Operation<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operation")
            .field("id", &self.id)
            .field("state", &self.inner.borrow().state)
            .finish()
    }
}

impl<T, E> Operation<T, E> {
    /// The process-unique id of this operation.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// The current lifecycle state.
    pub fn state(&self) -> OpState {
        self.inner.borrow().state
    }

    /// Returns true once the operation has settled.
    pub fn is_settled(&self) -> bool {
        self.state().is_settled()
    }

    /// Returns true if observers are still waiting for settlement.
    pub fn has_pending_observers(&self) -> bool {
        !self.inner.borrow().observers.is_empty()
    }

    /// A future resolving to the terminal [`Outcome`] once settled.
    ///
    /// This is the infallible suspension point, useful as the anchor
    /// for finalization logic.
    pub fn settled(&self) -> SettledFuture<T, E> {
        SettledFuture::new(self.clone())
    }

    /// A future resolving to the value, or failing with
    /// [`OperationFailed`](op_core::OperationFailed) when rejected.
    pub fn result(&self) -> ResultFuture<T, E> {
        ResultFuture::new(self.clone())
    }

    /// Registers a waker to be woken when the operation settles.
    pub(crate) fn register_waker(&self, waker: &Waker) {
        let mut inner = self.inner.borrow_mut();
        if !inner.wakers.iter().any(|known| known.will_wake(waker)) {
            inner.wakers.push(waker.clone());
        }
    }
}

impl<T: Clone + 'static, E: Clone + 'static> Operation<T, E> {
    /// The stored terminal outcome, once settled.
    pub fn try_outcome(&self) -> Option<Outcome<T, E>> {
        self.inner.borrow().outcome.clone()
    }

    /// Registers a success observer; fires with the value iff the
    /// operation settles Fulfilled.
    pub fn on_success<F>(&self, f: F)
    where
        F: FnOnce(T) -> HandlerResult + 'static,
    {
        self.register(Observer {
            on_success: Some(Box::new(f)),
            on_failure: None,
            on_settled: None,
        });
    }

    /// Registers a failure observer; fires with the reason iff the
    /// operation settles Rejected.
    pub fn on_failure<F>(&self, f: F)
    where
        F: FnOnce(E) -> HandlerResult + 'static,
    {
        self.register(Observer {
            on_success: None,
            on_failure: Some(Box::new(f)),
            on_settled: None,
        });
    }

    /// Registers a settled observer; fires exactly once after either
    /// outcome, regardless of which way the operation settled.
    pub fn on_settled<F>(&self, f: F)
    where
        F: FnOnce() -> HandlerResult + 'static,
    {
        self.register(Observer {
            on_success: None,
            on_failure: None,
            on_settled: Some(Box::new(f)),
        });
    }

    /// Registers a full observer chain in one call.
    ///
    /// Per settlement the outcome handler runs first, then the settled
    /// handler runs unconditionally, even when the outcome handler
    /// returned an error.
    pub fn attach_callbacks<S, F, D>(&self, on_success: S, on_failure: F, on_settled: D)
    where
        S: FnOnce(T) -> HandlerResult + 'static,
        F: FnOnce(E) -> HandlerResult + 'static,
        D: FnOnce() -> HandlerResult + 'static,
    {
        self.register(Observer {
            on_success: Some(Box::new(on_success)),
            on_failure: Some(Box::new(on_failure)),
            on_settled: Some(Box::new(on_settled)),
        });
    }

    fn register(&self, observer: Observer<T, E>) {
        let mut inner = self.inner.borrow_mut();
        if inner.outcome.is_none() {
            inner.observers.push(observer);
            return;
        }

        // Already settled: dispatch immediately, still through the
        // queue so the observer never runs inside the registration.
        let outcome = inner.outcome.clone();
        drop(inner);
        if let Some(outcome) = outcome {
            trace!(id = self.id, "observer attached after settlement");
            self.queue
                .enqueue(Microtask::new(move || run_observer(observer, outcome)));
        }
    }
}

/// Dispatches one observer against a terminal outcome.
///
/// The settled handler runs no matter what the outcome handler
/// returned; the first error wins when both fail.
fn run_observer<T, E>(observer: Observer<T, E>, outcome: Outcome<T, E>) -> HandlerResult {
    let Observer {
        on_success,
        on_failure,
        on_settled,
    } = observer;

    let handled = match outcome {
        Outcome::Success(value) => match on_success {
            Some(f) => f(value),
            None => Ok(()),
        },
        Outcome::Failure(reason) => match on_failure {
            Some(f) => f(reason),
            None => Ok(()),
        },
    };

    let settled = match on_settled {
        Some(f) => f(),
        None => Ok(()),
    };

    handled.and(settled)
}

/// The single-writer half of an operation.
///
/// Handed to the work function at creation time; only the settler may
/// settle the cell. The first `succeed`/`fail` call wins and every
/// later call of either kind is ignored.
pub struct Settler<T, E> {
    op: Operation<T, E>,
}

impl<T, E> Clone for Settler<T, E> {
    fn clone(&self) -> Self {
        Self {
            op: self.op.clone(),
        }
    }
}

impl<T, E> fmt::Debug for Settler<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settler").field("id", &self.op.id).finish()
    }
}

impl<T: Clone + 'static, E: Clone + 'static> Settler<T, E> {
    /// Settles the operation as Fulfilled with a value.
    pub fn succeed(&self, value: T) {
        self.settle(Outcome::Success(value));
    }

    /// Settles the operation as Rejected with a reason.
    pub fn fail(&self, reason: E) {
        self.settle(Outcome::Failure(reason));
    }

    fn settle(&self, outcome: Outcome<T, E>) {
        let mut inner = self.op.inner.borrow_mut();
        if inner.state.is_settled() {
            trace!(id = self.op.id, "repeat settlement ignored");
            return;
        }

        inner.state = outcome.state();
        inner.outcome = Some(outcome.clone());
        let observers = mem::take(&mut inner.observers);
        let wakers = mem::take(&mut inner.wakers);
        drop(inner);

        trace!(
            id = self.op.id,
            state = ?outcome.state(),
            observers = observers.len(),
            wakers = wakers.len(),
            "operation settled"
        );

        // Observers go through the queue, never inline; attachment
        // order is preserved.
        for observer in observers {
            let outcome = outcome.clone();
            self.op
                .queue
                .enqueue(Microtask::new(move || run_observer(observer, outcome)));
        }
        for waker in wakers {
            waker.wake();
        }
    }
}

/// Factory for operations bound to one scheduler's microtask queue.
///
/// Clonable so work running inside a task can create further
/// operations on the same scheduler.
#[derive(Debug, Clone)]
pub struct Runner {
    queue: MicrotaskQueue,
}

impl Runner {
    pub(crate) fn new(queue: MicrotaskQueue) -> Self {
        Self { queue }
    }

    /// Creates an operation, invoking the work function exactly once,
    /// synchronously, with a fresh [`Settler`].
    ///
    /// The work function must eventually call `succeed` or `fail`;
    /// until it does the operation stays Pending. It may also settle
    /// synchronously before `create` returns.
    pub fn create<T, E>(&self, work: impl FnOnce(Settler<T, E>)) -> Operation<T, E>
    where
        T: Clone + 'static,
        E: Clone + 'static,
    {
        let (op, settler) = self.deferred();
        work(settler);
        op
    }

    /// Creates a pending operation together with its settler, for work
    /// that settles from outside the creation call.
    pub fn deferred<T, E>(&self) -> (Operation<T, E>, Settler<T, E>)
    where
        T: Clone + 'static,
        E: Clone + 'static,
    {
        let op = Operation {
            id: NEXT_OPERATION_ID.fetch_add(1, Ordering::Relaxed),
            inner: Rc::new(RefCell::new(Inner::new())),
            queue: self.queue.clone(),
        };
        trace!(id = op.id, "operation created");
        (op.clone(), Settler { op })
    }
}
