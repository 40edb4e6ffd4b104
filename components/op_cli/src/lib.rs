//! Operation Runtime CLI Library
//!
//! Provides the argument surface and the lifecycle demonstration the
//! `oprun` binary runs.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cli;
pub mod demo;
pub mod error;

pub use cli::{Cli, Style};
pub use error::{CliError, CliResult};
