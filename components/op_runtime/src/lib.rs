//! Single-threaded cooperative runtime for asynchronous operations.
//!
//! This crate provides the runtime around a one-shot settlement cell:
//! - [`Operation`] - A unit of asynchronous work and its eventual outcome
//! - [`Runner`] - Factory that invokes a work function and hands it a [`Settler`]
//! - [`Scheduler`] - Cooperative scheduler driving tasks and deferred observers
//! - [`SettledFuture`] / [`ResultFuture`] - Suspend-and-resume access to an outcome
//!
//! An operation settles exactly once, by whichever of `succeed`/`fail`
//! runs first. Observers attached in callback style and sequences
//! suspended on a future both see the same terminal outcome; observer
//! callbacks are always dispatched through the microtask queue, never
//! inline from within settlement.
//!
//! # Examples
//!
//! ## Callback style
//!
//! ```
//! use op_runtime::Scheduler;
//!
//! let mut scheduler = Scheduler::new();
//! let runner = scheduler.runner();
//!
//! let op = runner.create::<i32, String>(|settler| settler.succeed(42));
//! op.on_success(|value| {
//!     assert_eq!(value, 42);
//!     Ok(())
//! });
//! scheduler.run_until_done().unwrap();
//! ```
//!
//! ## Suspend-and-resume style
//!
//! ```
//! use op_runtime::Scheduler;
//!
//! let mut scheduler = Scheduler::new();
//! let runner = scheduler.runner();
//!
//! let op = runner.create::<i32, String>(|settler| settler.succeed(42));
//! let value = scheduler
//!     .block_on(async move { Ok(op.result().await?) })
//!     .unwrap();
//! assert_eq!(value, 42);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod error;
pub mod future;
pub mod microtask;
pub mod operation;
pub mod scheduler;

// Re-export main types at crate root
pub use error::RuntimeError;
pub use future::{Finalizer, ResultFuture, SettledFuture};
pub use microtask::{Microtask, MicrotaskQueue};
pub use operation::{HandlerResult, Operation, Runner, Settler};
pub use scheduler::Scheduler;
