//! Core logger types and traits

pub mod dispatcher;
pub mod error;
pub mod line_format;
pub mod logger;
pub mod metrics;
pub mod queue;
pub mod record;
pub mod severity;
pub mod sink;

pub use dispatcher::{Dispatcher, DispatcherState, DEFAULT_THREAD_NAME};
pub use error::{LoggerError, Result};
pub use line_format::{format_line, LINE_TIMESTAMP_FORMAT};
pub use logger::{LogHandle, Logger, LoggerBuilder};
pub use metrics::LoggerMetrics;
pub use queue::RecordQueue;
pub use record::Record;
pub use severity::Severity;
pub use sink::{RecordOutcome, Sink};
