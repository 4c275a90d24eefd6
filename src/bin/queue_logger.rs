//! Interactive front end: reads lines from stdin and logs them to a file.
//!
//! Usage: `queue-logger <logfile> [level]`

use clap::Parser;
use rust_queue_logger::cli::{self, Cli};
use std::io;

fn main() -> anyhow::Result<()> {
    let stdin = io::stdin();
    cli::run(Cli::parse(), stdin.lock(), io::stdout(), io::stderr())?;
    Ok(())
}
