//! Command-line front end: `queue-logger <logfile> [level]`
//!
//! Kept in the library so the whole session can be driven with in-memory
//! readers and writers.

use crate::config::{LevelSource, LoggerConfig};
use crate::frontend::{Frontend, StopReason};
use anyhow::Context;
use clap::Parser;
use std::io::{BufRead, Write};
use std::path::PathBuf;

/// Printed to the error stream when the level argument is not recognized.
pub const UNKNOWN_LEVEL_WARNING: &str = "Unknown log level, using Info by default.";

#[derive(Debug, Parser)]
#[command(
    name = "queue-logger",
    version,
    about = "Append stdin lines to a log file through a background writer",
    after_help = "Levels: Info, Warning, Error\n\n\
                  Input lines:\n  \
                  <level>: <message>   queue a message\n  \
                  Set level: <level>   change the threshold\n  \
                  exit                 flush and quit"
)]
pub struct Cli {
    /// Log file, opened for appending
    pub logfile: PathBuf,

    /// Initial threshold (case-insensitive)
    pub level: Option<String>,
}

/// Run one session: open the log, feed it `input`, then drain and flush.
///
/// Acknowledgements go to `out`, the unknown-level warning to `err`.
pub fn run<R, W, E>(cli: Cli, input: R, out: W, mut err: E) -> anyhow::Result<StopReason>
where
    R: BufRead,
    W: Write,
    E: Write,
{
    let (config, source) = LoggerConfig::from_cli(cli.logfile, cli.level.as_deref());
    if source == LevelSource::Unrecognized {
        writeln!(err, "{}", UNKNOWN_LEVEL_WARNING)?;
    }

    let mut logger = config
        .open()
        .with_context(|| format!("cannot start logger for {}", config.path.display()))?;

    let frontend = Frontend::new(logger.handle());
    let result = frontend.run(input, out);

    // Drain whatever was queued, even if reading input failed.
    logger.shutdown().context("failed to flush pending log records")?;
    result.context("failed to process input")
}
