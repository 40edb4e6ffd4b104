//! Error types for the CLI

use op_runtime::RuntimeError;
use thiserror::Error;

/// CLI-specific errors
#[derive(Debug, Error)]
pub enum CliError {
    /// The scheduler reported an error while running the demonstration
    #[error("runtime error: {0}")]
    Runtime(#[from] RuntimeError),
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;
