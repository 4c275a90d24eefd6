//! # Rust Queue Logger
//!
//! A level-filtered file logger. Producers queue messages tagged with a
//! [`Severity`]; a single background dispatcher drains the queue and appends
//! one formatted, flushed line per record to the log file:
//!
//! ```text
//! [2025-01-08 10:30:45] Warning: disk almost full
//! ```
//!
//! ## Features
//!
//! - **Non-blocking producers**: file I/O happens on the dispatcher thread
//! - **Ordered**: records from one producer are written in the order queued
//! - **No loss on shutdown**: everything accepted before shutdown is written
//! - **Live threshold changes** that apply to every record dequeued afterwards

pub mod cli;
pub mod config;
pub mod core;
pub mod frontend;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::config::LoggerConfig;
    pub use crate::core::{
        DispatcherState, LogHandle, Logger, LoggerBuilder, LoggerError, LoggerMetrics,
        RecordOutcome, Result, Severity, Sink,
    };
    pub use crate::sinks::FileSink;
}

pub use config::{LevelSource, LoggerConfig};
pub use core::{
    DispatcherState, LogHandle, Logger, LoggerBuilder, LoggerError, LoggerMetrics, Record,
    RecordOutcome, RecordQueue, Result, Severity, Sink,
};
pub use frontend::{parse_line, Command, Frontend, StopReason};
pub use sinks::FileSink;
