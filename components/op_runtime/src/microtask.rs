//! Microtask queue shared between the scheduler and its operations.
//!
//! Observer callbacks are never run inline from within settlement;
//! settling an operation enqueues one microtask per observer, and the
//! scheduler drains the queue in FIFO order after each task poll.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::error::RuntimeError;

/// A deferred callback, drained by the scheduler in FIFO order.
///
/// Microtasks are fallible: an observer handler that fails surfaces its
/// error through the scheduler rather than unwinding.
pub struct Microtask {
    callback: Box<dyn FnOnce() -> Result<(), RuntimeError>>,
}

impl Microtask {
    /// Creates a new Microtask from a closure.
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce() -> Result<(), RuntimeError> + 'static,
    {
        Self {
            callback: Box::new(f),
        }
    }

    /// Executes the microtask.
    pub fn run(self) -> Result<(), RuntimeError> {
        (self.callback)()
    }
}

impl std::fmt::Debug for Microtask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Microtask {{ ... }}")
    }
}

/// A clonable handle to the scheduler's microtask queue.
///
/// Every operation created by a [`Runner`](crate::Runner) holds one of
/// these so settlement can defer observer dispatch. Clones share the
/// same underlying queue.
#[derive(Debug, Clone, Default)]
pub struct MicrotaskQueue {
    queue: Rc<RefCell<VecDeque<Microtask>>>,
}

impl MicrotaskQueue {
    /// Creates a new empty MicrotaskQueue.
    pub fn new() -> Self {
        Self {
            queue: Rc::new(RefCell::new(VecDeque::new())),
        }
    }

    /// Adds a microtask to the end of the queue.
    pub fn enqueue(&self, microtask: Microtask) {
        self.queue.borrow_mut().push_back(microtask);
    }

    /// Removes and returns the next microtask from the queue.
    pub fn dequeue(&self) -> Option<Microtask> {
        self.queue.borrow_mut().pop_front()
    }

    /// Returns true if the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.queue.borrow().is_empty()
    }

    /// Returns the number of queued microtasks.
    pub fn len(&self) -> usize {
        self.queue.borrow().len()
    }
}
