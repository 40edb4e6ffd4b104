//! Single-threaded cooperative scheduler.
//!
//! The scheduler drives two kinds of work, following the classic
//! task/microtask event loop model: spawned tasks (suspended
//! sequences, polled as futures) and microtasks (deferred observer
//! callbacks). Each cycle polls one ready task, then drains the
//! microtask queue completely. Wakes are recorded in a FIFO ready
//! list, so independent suspended sequences resume in the order their
//! operations settled.

use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};
use std::task::{Context, Poll, Wake, Waker};

use tracing::{trace, warn};

use crate::error::RuntimeError;
use crate::microtask::{Microtask, MicrotaskQueue};
use crate::operation::Runner;

type LocalFuture = Pin<Box<dyn Future<Output = Result<(), RuntimeError>>>>;

/// FIFO list of task ids whose wakers have fired.
///
/// Mutex-guarded so it can be shared through `Arc` wakers; the
/// scheduler itself is single-threaded and the lock is uncontended.
#[derive(Debug, Default)]
struct ReadyList {
    ids: Mutex<VecDeque<usize>>,
}

impl ReadyList {
    fn push(&self, id: usize) {
        // The list is only ever touched from the scheduler's thread;
        // recover from a poisoned lock rather than unwinding again.
        let mut ids = self.ids.lock().unwrap_or_else(PoisonError::into_inner);
        // A task woken twice before being polled runs once.
        if !ids.contains(&id) {
            ids.push_back(id);
        }
    }

    fn pop(&self) -> Option<usize> {
        self.ids
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
    }
}

struct TaskWaker {
    id: usize,
    ready: Arc<ReadyList>,
}

impl Wake for TaskWaker {
    fn wake(self: Arc<Self>) {
        self.ready.push(self.id);
    }

    fn wake_by_ref(self: &Arc<Self>) {
        self.ready.push(self.id);
    }
}

/// The cooperative scheduler.
///
/// Owns the microtask queue shared with every operation its
/// [`Runner`] creates, plus the set of spawned tasks. No parallelism:
/// everything runs on the calling thread, and a task runs until its
/// next suspension point before anything else gets a turn.
///
/// # Examples
///
/// ```
/// use op_runtime::Scheduler;
///
/// let mut scheduler = Scheduler::new();
/// let runner = scheduler.runner();
/// let op = runner.create::<&str, String>(|settler| settler.succeed("ok"));
///
/// let value = scheduler
///     .block_on(async move { Ok(op.result().await?) })
///     .unwrap();
/// assert_eq!(value, "ok");
/// ```
#[derive(Default)]
pub struct Scheduler {
    queue: MicrotaskQueue,
    tasks: HashMap<usize, LocalFuture>,
    ready: Arc<ReadyList>,
    next_task: usize,
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("pending_tasks", &self.tasks.len())
            .field("queued_microtasks", &self.queue.len())
            .finish()
    }
}

impl Scheduler {
    /// Creates a new scheduler with empty queues.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hands out the operation factory bound to this scheduler.
    pub fn runner(&self) -> Runner {
        Runner::new(self.queue.clone())
    }

    /// Adds a microtask to the queue directly.
    pub fn enqueue_microtask(&self, microtask: Microtask) {
        self.queue.enqueue(microtask);
    }

    /// Returns true if no microtasks are queued.
    pub fn is_microtask_queue_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Returns the number of spawned tasks that have not completed.
    pub fn pending_tasks(&self) -> usize {
        self.tasks.len()
    }

    /// Registers an independent suspended sequence.
    ///
    /// The task is polled on the next cycle and re-polled whenever an
    /// operation it awaits settles. An `Err` return stops the
    /// scheduler and propagates out of [`run_until_done`].
    ///
    /// [`run_until_done`]: Scheduler::run_until_done
    pub fn spawn(&mut self, fut: impl Future<Output = Result<(), RuntimeError>> + 'static) {
        let id = self.next_task;
        self.next_task += 1;
        self.tasks.insert(id, Box::pin(fut));
        self.ready.push(id);
        trace!(task = id, "task spawned");
    }

    /// Runs until every task has completed and the microtask queue is
    /// drained.
    ///
    /// Fails with [`RuntimeError::Stalled`] when suspended tasks
    /// remain but nothing can wake them, and propagates the first
    /// error returned by a task or an observer handler.
    pub fn run_until_done(&mut self) -> Result<(), RuntimeError> {
        loop {
            self.drain_microtasks()?;

            let Some(id) = self.ready.pop() else {
                if self.tasks.is_empty() {
                    return Ok(());
                }
                warn!(suspended = self.tasks.len(), "scheduler stalled");
                return Err(RuntimeError::Stalled);
            };
            self.poll_task(id)?;
        }
    }

    /// Drives one future to completion on this scheduler.
    ///
    /// Spawned tasks and microtasks are serviced while the future is
    /// pending. An uncaught operation failure inside the future
    /// propagates to the caller as [`RuntimeError::Operation`].
    pub fn block_on<T, F>(&mut self, fut: F) -> Result<T, RuntimeError>
    where
        T: 'static,
        F: Future<Output = Result<T, RuntimeError>> + 'static,
    {
        use std::cell::RefCell;
        use std::rc::Rc;

        let slot: Rc<RefCell<Option<T>>> = Rc::new(RefCell::new(None));
        let out = slot.clone();
        self.spawn(async move {
            let value = fut.await?;
            *out.borrow_mut() = Some(value);
            Ok(())
        });
        self.run_until_done()?;
        let value = slot.borrow_mut().take();
        value.ok_or(RuntimeError::Stalled)
    }

    /// Processes one cycle: one ready task, then all microtasks.
    pub fn process_one_cycle(&mut self) -> Result<(), RuntimeError> {
        if let Some(id) = self.ready.pop() {
            self.poll_task(id)?;
        }
        self.drain_microtasks()
    }

    fn poll_task(&mut self, id: usize) -> Result<(), RuntimeError> {
        // Stale wake: the task already completed.
        let Some(mut fut) = self.tasks.remove(&id) else {
            return Ok(());
        };

        let waker = Waker::from(Arc::new(TaskWaker {
            id,
            ready: Arc::clone(&self.ready),
        }));
        let mut cx = Context::from_waker(&waker);

        match fut.as_mut().poll(&mut cx) {
            Poll::Ready(result) => {
                trace!(task = id, ok = result.is_ok(), "task completed");
                result
            }
            Poll::Pending => {
                trace!(task = id, "task suspended");
                self.tasks.insert(id, fut);
                Ok(())
            }
        }
    }

    /// Drains the microtask queue completely, including microtasks
    /// enqueued by the ones being run.
    fn drain_microtasks(&mut self) -> Result<(), RuntimeError> {
        while let Some(microtask) = self.queue.dequeue() {
            microtask.run()?;
        }
        Ok(())
    }
}
