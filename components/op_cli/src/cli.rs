//! Command-line argument definitions.

use clap::{Parser, ValueEnum};

/// How the demonstration consumes the operation's outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Style {
    /// Callback chaining: success, failure and settled observers.
    Callback,
    /// Sequential suspend-and-resume with catch and finalization.
    Await,
    /// Run both styles against the same operation.
    Both,
}

/// Drive one asynchronous operation through its lifecycle.
#[derive(Debug, Parser)]
#[command(name = "oprun", version, about)]
pub struct Cli {
    /// Settle the operation with a failure instead of a success.
    #[arg(long)]
    pub fail: bool,

    /// Which consumption style to demonstrate.
    #[arg(long, value_enum, default_value_t = Style::Both)]
    pub style: Style,

    /// Enable runtime trace output.
    #[arg(long, short)]
    pub verbose: bool,
}
