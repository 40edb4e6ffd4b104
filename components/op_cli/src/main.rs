//! Operation Runtime CLI
//!
//! Entry point for the lifecycle demonstration. Parses CLI arguments
//! and hands off to the demo runner.

use clap::Parser;
use op_cli::{demo, Cli};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::TRACE
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    if let Err(e) = demo::run(cli.fail, cli.style) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
    Ok(())
}
