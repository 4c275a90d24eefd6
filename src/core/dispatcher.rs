//! Background dispatcher that drains the record queue into a sink

use super::{
    error::{LoggerError, Result},
    metrics::LoggerMetrics,
    queue::RecordQueue,
    record::Record,
    sink::{RecordOutcome, Sink},
};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Default name of the dispatcher thread
pub const DEFAULT_THREAD_NAME: &str = "log-dispatcher";

/// Lifecycle of the dispatcher loop.
///
/// `Terminated` is final: it is reached only after the queue was closed and
/// observed empty, and no sink call happens afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum DispatcherState {
    /// Blocked until a record arrives or the queue is closed
    Waiting = 0,
    /// Handing queued records to the sink
    Draining = 1,
    /// Loop exited
    Terminated = 2,
}

impl DispatcherState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => DispatcherState::Waiting,
            1 => DispatcherState::Draining,
            _ => DispatcherState::Terminated,
        }
    }
}

/// Owner of the single consumer thread.
pub struct Dispatcher {
    handle: Option<thread::JoinHandle<()>>,
    state: Arc<AtomicU8>,
}

impl Dispatcher {
    /// Start the consumer thread.
    pub fn spawn(
        thread_name: impl Into<String>,
        queue: Arc<RecordQueue>,
        sink: Arc<dyn Sink>,
        metrics: Arc<LoggerMetrics>,
    ) -> Result<Self> {
        let state = Arc::new(AtomicU8::new(DispatcherState::Waiting as u8));
        let state_clone = Arc::clone(&state);

        let handle = thread::Builder::new()
            .name(thread_name.into())
            .spawn(move || {
                queue.drain_with(
                    |record| Self::dispatch(sink.as_ref(), record, &metrics),
                    |s| state_clone.store(s as u8, Ordering::Release),
                );
            })
            .map_err(LoggerError::IoError)?;

        Ok(Self {
            handle: Some(handle),
            state,
        })
    }

    pub fn state(&self) -> DispatcherState {
        DispatcherState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Hand one record to the sink.
    ///
    /// A failing or panicking sink costs only the record at hand; the loop
    /// carries on with the next one.
    fn dispatch(sink: &dyn Sink, record: Record, metrics: &LoggerMetrics) {
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            sink.record(record.message(), record.severity())
        }));

        match result {
            Ok(Ok(RecordOutcome::Written)) => {
                metrics.record_written();
            }
            Ok(Ok(RecordOutcome::Filtered)) => {
                metrics.record_filtered();
            }
            Ok(Err(e)) => {
                eprintln!("[LOGGER ERROR] Sink '{}' failed: {}", sink.name(), e);
                metrics.record_failed();
            }
            Err(panic_info) => {
                let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = panic_info.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "Unknown panic".to_string()
                };
                eprintln!(
                    "[LOGGER CRITICAL] Sink '{}' panicked: {}. Dispatcher continues.",
                    sink.name(),
                    panic_msg
                );
                metrics.record_failed();
            }
        }
    }

    /// Wait for the thread to exit. The queue must have been closed first,
    /// otherwise this blocks forever.
    pub fn join(&mut self) -> Result<()> {
        match self.handle.take() {
            Some(handle) => handle.join().map_err(|_| LoggerError::WorkerPanicked),
            None => Ok(()),
        }
    }

    /// Like [`join`](Self::join) but gives up after `timeout`.
    ///
    /// Returns `false` if the thread is still running (it is left detached)
    /// or if it panicked.
    pub fn join_timeout(&mut self, timeout: Duration) -> bool {
        let Some(handle) = self.handle.take() else {
            return true;
        };

        let start = Instant::now();
        loop {
            if handle.is_finished() {
                if let Err(e) = handle.join() {
                    eprintln!("[LOGGER ERROR] Dispatcher thread panicked during shutdown: {:?}", e);
                    return false;
                }
                return true;
            }

            if start.elapsed() >= timeout {
                eprintln!(
                    "[LOGGER WARNING] Dispatcher thread did not finish within {:?}. \
                     Some records may not be written.",
                    timeout
                );
                return false;
            }

            thread::sleep(Duration::from_millis(10));
        }
    }

    pub fn is_joined(&self) -> bool {
        self.handle.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Severity;
    use parking_lot::Mutex;

    struct PanickyMemorySink {
        lines: Mutex<Vec<String>>,
    }

    impl Sink for PanickyMemorySink {
        fn record(&self, message: &str, severity: Severity) -> Result<RecordOutcome> {
            match message {
                "panic" => panic!("sink exploded"),
                "fail" => Err(LoggerError::other("simulated failure")),
                _ => {
                    self.lines.lock().push(format!("{}: {}", severity, message));
                    Ok(RecordOutcome::Written)
                }
            }
        }

        fn set_threshold(&self, _threshold: Severity) {}

        fn threshold(&self) -> Severity {
            Severity::Info
        }

        fn flush(&self) -> Result<()> {
            Ok(())
        }

        fn name(&self) -> &str {
            "panicky"
        }
    }

    #[test]
    fn test_sink_failures_are_isolated() {
        let queue = Arc::new(RecordQueue::new());
        let sink = Arc::new(PanickyMemorySink {
            lines: Mutex::new(Vec::new()),
        });
        let metrics = Arc::new(LoggerMetrics::new());

        let mut dispatcher = Dispatcher::spawn(
            DEFAULT_THREAD_NAME,
            Arc::clone(&queue),
            sink.clone(),
            Arc::clone(&metrics),
        )
        .expect("spawn dispatcher");

        for message in ["one", "panic", "two", "fail", "three"] {
            queue.push(Record::new(message, Severity::Warning)).unwrap();
        }
        queue.close();
        dispatcher.join().expect("dispatcher should not die");

        assert_eq!(
            *sink.lines.lock(),
            vec!["Warning: one", "Warning: two", "Warning: three"]
        );
        assert_eq!(metrics.written(), 3);
        assert_eq!(metrics.failed(), 2);
        assert_eq!(dispatcher.state(), DispatcherState::Terminated);
        assert!(dispatcher.is_joined());
    }

    #[test]
    fn test_join_timeout_on_idle_open_queue() {
        let queue = Arc::new(RecordQueue::new());
        let sink = Arc::new(PanickyMemorySink {
            lines: Mutex::new(Vec::new()),
        });
        let mut dispatcher = Dispatcher::spawn(
            "idle-dispatcher",
            Arc::clone(&queue),
            sink,
            Arc::new(LoggerMetrics::new()),
        )
        .expect("spawn dispatcher");

        thread::sleep(Duration::from_millis(20));
        assert_eq!(dispatcher.state(), DispatcherState::Waiting);
        assert!(!dispatcher.join_timeout(Duration::from_millis(30)));

        // detached thread exits once the queue closes
        queue.close();
    }

    #[test]
    fn test_state_roundtrip() {
        for state in [
            DispatcherState::Waiting,
            DispatcherState::Draining,
            DispatcherState::Terminated,
        ] {
            assert_eq!(DispatcherState::from_u8(state as u8), state);
        }
    }
}
