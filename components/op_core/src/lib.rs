//! Core types for asynchronous operation settlement.
//!
//! This crate provides the foundational types shared by every component
//! of the operation runtime: the lifecycle state of an operation, the
//! terminal outcome stored when it settles, and the single failure
//! error of the taxonomy.
//!
//! # Overview
//!
//! - [`OpState`] - Lifecycle state of an operation
//! - [`Outcome`] - Terminal value of a settled operation
//! - [`OperationFailed`] - Failure error carrying the rejection reason
//!
//! # Examples
//!
//! ```
//! use op_core::{OpState, Outcome};
//!
//! let outcome: Outcome<i32, String> = Outcome::Success(42);
//! assert_eq!(outcome.state(), OpState::Fulfilled);
//! assert_eq!(outcome.success(), Some(&42));
//! assert!(outcome.failure().is_none());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod error;
mod outcome;
mod state;

pub use error::OperationFailed;
pub use outcome::Outcome;
pub use state::OpState;
