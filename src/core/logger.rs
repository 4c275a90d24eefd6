//! Main logger implementation

use super::{
    dispatcher::{Dispatcher, DispatcherState, DEFAULT_THREAD_NAME},
    error::{LoggerError, Result},
    metrics::LoggerMetrics,
    queue::RecordQueue,
    record::Record,
    severity::Severity,
    sink::Sink,
};
use crate::sinks::FileSink;
use std::path::PathBuf;
use std::sync::{Arc, Weak};
use std::time::Duration;

/// Cloneable producer side of a [`Logger`].
///
/// Every clone feeds the same queue and controls the same sink threshold,
/// so handles can be moved into as many threads as needed.
///
/// A handle does not keep the sink alive. Once the owning [`Logger`] is
/// dropped the sink is released (for a file sink, the file is closed),
/// `log` fails with [`LoggerError::QueueClosed`], `set_threshold` does
/// nothing and `threshold` returns `None`.
#[derive(Clone)]
pub struct LogHandle {
    queue: Arc<RecordQueue>,
    sink: Weak<dyn Sink>,
    metrics: Arc<LoggerMetrics>,
}

impl LogHandle {
    /// Queue a record for the dispatcher.
    ///
    /// Fails with [`LoggerError::QueueClosed`] once shutdown has been
    /// signaled. Filtering happens later, in the sink, against the threshold
    /// in force when the record is dequeued.
    pub fn log(&self, severity: Severity, message: impl Into<String>) -> Result<()> {
        match self.queue.push(Record::new(message, severity)) {
            Ok(()) => {
                self.metrics.record_enqueued();
                Ok(())
            }
            Err(e) => {
                self.metrics.record_rejected();
                Err(e)
            }
        }
    }

    #[inline]
    pub fn info(&self, message: impl Into<String>) -> Result<()> {
        self.log(Severity::Info, message)
    }

    #[inline]
    pub fn warning(&self, message: impl Into<String>) -> Result<()> {
        self.log(Severity::Warning, message)
    }

    #[inline]
    pub fn error(&self, message: impl Into<String>) -> Result<()> {
        self.log(Severity::Error, message)
    }

    /// Change the sink threshold right away, bypassing the queue.
    ///
    /// Records already written are unaffected; records still queued are
    /// judged against the new threshold when they are dequeued.
    pub fn set_threshold(&self, threshold: Severity) {
        if let Some(sink) = self.sink.upgrade() {
            sink.set_threshold(threshold);
        }
    }

    /// Current sink threshold, or `None` once the logger is gone.
    pub fn threshold(&self) -> Option<Severity> {
        self.sink.upgrade().map(|sink| sink.threshold())
    }

    pub fn is_closed(&self) -> bool {
        self.queue.is_closed()
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }
}

/// Queue-backed logger with a single background writer.
///
/// Shutdown happens in two phases: [`close`](Logger::close) stops accepting
/// records, then [`shutdown`](Logger::shutdown) additionally waits until the
/// dispatcher has written everything that was accepted. Dropping the logger
/// runs `shutdown`.
///
/// # Example
///
/// ```no_run
/// use rust_queue_logger::{Logger, Severity};
///
/// let mut logger = Logger::open("app.log", Severity::Warning)?;
/// logger.info("not written")?;
/// logger.error("written")?;
/// logger.shutdown()?;
/// # Ok::<(), rust_queue_logger::LoggerError>(())
/// ```
pub struct Logger {
    handle: LogHandle,
    sink: Arc<dyn Sink>,
    dispatcher: Dispatcher,
}

impl Logger {
    /// Open (or create) `path` for appending and start the dispatcher.
    pub fn open(path: impl Into<PathBuf>, threshold: Severity) -> Result<Self> {
        Self::builder().path(path).threshold(threshold).build()
    }

    /// Start a dispatcher feeding an existing sink.
    pub fn with_sink(sink: Arc<dyn Sink>) -> Result<Self> {
        Self::start(sink, DEFAULT_THREAD_NAME)
    }

    fn start(sink: Arc<dyn Sink>, thread_name: &str) -> Result<Self> {
        let queue = Arc::new(RecordQueue::new());
        let metrics = Arc::new(LoggerMetrics::new());
        let dispatcher = Dispatcher::spawn(
            thread_name,
            Arc::clone(&queue),
            Arc::clone(&sink),
            Arc::clone(&metrics),
        )?;

        Ok(Self {
            handle: LogHandle {
                queue,
                sink: Arc::downgrade(&sink),
                metrics,
            },
            sink,
            dispatcher,
        })
    }

    /// Create a builder for Logger
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    /// A producer handle for other threads.
    pub fn handle(&self) -> LogHandle {
        self.handle.clone()
    }

    pub fn log(&self, severity: Severity, message: impl Into<String>) -> Result<()> {
        self.handle.log(severity, message)
    }

    #[inline]
    pub fn info(&self, message: impl Into<String>) -> Result<()> {
        self.handle.info(message)
    }

    #[inline]
    pub fn warning(&self, message: impl Into<String>) -> Result<()> {
        self.handle.warning(message)
    }

    #[inline]
    pub fn error(&self, message: impl Into<String>) -> Result<()> {
        self.handle.error(message)
    }

    pub fn set_threshold(&self, threshold: Severity) {
        self.sink.set_threshold(threshold);
    }

    pub fn threshold(&self) -> Severity {
        self.sink.threshold()
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        self.handle.metrics()
    }

    pub fn dispatcher_state(&self) -> DispatcherState {
        self.dispatcher.state()
    }

    /// Phase one of shutdown: reject new records and wake the dispatcher.
    ///
    /// Idempotent. Returns without waiting for queued records to be written.
    pub fn close(&self) {
        self.handle.queue.close();
    }

    /// Close the queue and wait until every accepted record reached the sink.
    pub fn shutdown(&mut self) -> Result<()> {
        self.close();
        self.dispatcher.join()?;
        self.sink.flush()
    }

    /// [`shutdown`](Logger::shutdown) with an upper bound on the wait.
    ///
    /// Returns `true` if the dispatcher finished draining within `timeout`.
    pub fn shutdown_timeout(&mut self, timeout: Duration) -> bool {
        self.close();
        if !self.dispatcher.join_timeout(timeout) {
            return false;
        }
        if let Err(e) = self.sink.flush() {
            eprintln!("[LOGGER ERROR] Failed to flush during shutdown: {}", e);
            return false;
        }
        true
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if self.dispatcher.is_joined() {
            return;
        }

        if let Err(e) = self.shutdown() {
            eprintln!("[LOGGER ERROR] Shutdown failed: {}", e);
        }

        let metrics = self.metrics();
        if metrics.failed() > 0 {
            eprintln!(
                "[LOGGER WARNING] Logger shutting down with {} failed records (failure rate: {:.2}%)",
                metrics.failed(),
                metrics.failure_rate()
            );
        }
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```no_run
/// use rust_queue_logger::prelude::*;
///
/// let logger = Logger::builder()
///     .path("service.log")
///     .threshold(Severity::Warning)
///     .thread_name("service-log")
///     .build()?;
/// # Ok::<(), LoggerError>(())
/// ```
pub struct LoggerBuilder {
    path: Option<PathBuf>,
    sink: Option<Arc<dyn Sink>>,
    threshold: Severity,
    thread_name: String,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            path: None,
            sink: None,
            threshold: Severity::Info,
            thread_name: DEFAULT_THREAD_NAME.to_string(),
        }
    }

    /// Log to a file, opened for appending by `build`
    #[must_use = "builder methods return a new value"]
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Log to a custom sink instead of a file
    #[must_use = "builder methods return a new value"]
    pub fn sink(mut self, sink: Arc<dyn Sink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Initial threshold
    ///
    /// Applied to the sink by `build`, including a custom sink.
    #[must_use = "builder methods return a new value"]
    pub fn threshold(mut self, threshold: Severity) -> Self {
        self.threshold = threshold;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }

    /// Open the sink and start the dispatcher.
    ///
    /// Exactly one of `path` and `sink` must be set. File open failures are
    /// returned here, before any thread is started.
    pub fn build(self) -> Result<Logger> {
        if self.thread_name.is_empty() {
            return Err(LoggerError::config("LoggerBuilder", "thread name is empty"));
        }

        let sink: Arc<dyn Sink> = match (self.path, self.sink) {
            (Some(path), None) => Arc::new(FileSink::new(path, self.threshold)?),
            (None, Some(sink)) => {
                sink.set_threshold(self.threshold);
                sink
            }
            (Some(_), Some(_)) => {
                return Err(LoggerError::config(
                    "LoggerBuilder",
                    "both a path and a custom sink were given",
                ))
            }
            (None, None) => {
                return Err(LoggerError::config(
                    "LoggerBuilder",
                    "either a path or a sink is required",
                ))
            }
        };

        Logger::start(sink, &self.thread_name)
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RecordOutcome;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct MemorySink {
        threshold: Mutex<Severity>,
        lines: Mutex<Vec<(Severity, String)>>,
    }

    impl Sink for MemorySink {
        fn record(&self, message: &str, severity: Severity) -> Result<RecordOutcome> {
            if severity < *self.threshold.lock() {
                return Ok(RecordOutcome::Filtered);
            }
            self.lines.lock().push((severity, message.to_string()));
            Ok(RecordOutcome::Written)
        }

        fn set_threshold(&self, threshold: Severity) {
            *self.threshold.lock() = threshold;
        }

        fn threshold(&self) -> Severity {
            *self.threshold.lock()
        }

        fn flush(&self) -> Result<()> {
            Ok(())
        }

        fn name(&self) -> &str {
            "memory"
        }
    }

    #[test]
    fn test_builder_requires_destination() {
        let err = Logger::builder().build().err().expect("build should fail");
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));

        let err = Logger::builder()
            .path("ignored.log")
            .sink(Arc::new(MemorySink::default()))
            .build()
            .err()
            .expect("build should fail");
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_builder_applies_threshold_to_custom_sink() {
        let sink = Arc::new(MemorySink::default());
        let mut logger = Logger::builder()
            .sink(sink.clone())
            .threshold(Severity::Warning)
            .build()
            .expect("build logger");

        assert_eq!(logger.threshold(), Severity::Warning);
        logger.info("dropped").unwrap();
        logger.warning("kept").unwrap();
        logger.shutdown().unwrap();

        assert_eq!(
            *sink.lines.lock(),
            vec![(Severity::Warning, "kept".to_string())]
        );
        assert_eq!(logger.metrics().filtered(), 1);
        assert_eq!(logger.metrics().written(), 1);
    }

    #[test]
    fn test_log_after_close_rejected() {
        let sink = Arc::new(MemorySink::default());
        let mut logger = Logger::with_sink(sink.clone()).unwrap();
        let handle = logger.handle();

        logger.info("accepted").unwrap();
        logger.close();
        logger.close();

        assert!(matches!(handle.error("late"), Err(LoggerError::QueueClosed)));
        assert!(handle.is_closed());

        logger.shutdown().unwrap();
        assert_eq!(sink.lines.lock().len(), 1);
        assert_eq!(logger.metrics().rejected(), 1);
        assert_eq!(logger.dispatcher_state(), DispatcherState::Terminated);
    }

    #[test]
    fn test_shutdown_twice_is_harmless() {
        let mut logger = Logger::with_sink(Arc::new(MemorySink::default())).unwrap();
        logger.shutdown().unwrap();
        logger.shutdown().unwrap();
        assert!(logger.shutdown_timeout(Duration::from_millis(10)));
    }

    #[test]
    fn test_drop_drains_queue() {
        let sink = Arc::new(MemorySink::default());
        {
            let logger = Logger::with_sink(sink.clone()).unwrap();
            for i in 0..100 {
                logger.info(format!("message {}", i)).unwrap();
            }
        }

        let lines = sink.lines.lock();
        assert_eq!(lines.len(), 100);
        assert_eq!(lines[99].1, "message 99");
    }

    #[test]
    fn test_handle_does_not_keep_sink_alive() {
        let sink: Arc<dyn Sink> = Arc::new(MemorySink::default());
        let weak = Arc::downgrade(&sink);
        let logger = Logger::with_sink(sink).unwrap();
        let handle = logger.handle();

        handle.set_threshold(Severity::Error);
        assert_eq!(handle.threshold(), Some(Severity::Error));
        assert_eq!(logger.threshold(), Severity::Error);

        drop(logger);
        assert_eq!(weak.strong_count(), 0);
        assert_eq!(handle.threshold(), None);
        handle.set_threshold(Severity::Info);
        assert!(matches!(handle.info("late"), Err(LoggerError::QueueClosed)));
    }
}
