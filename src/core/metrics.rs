//! Logger metrics for observability
//!
//! Counters for every stage a record passes through: accepted by the queue,
//! rejected after close, and the sink's verdict once the dispatcher hands
//! it over.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters describing logger activity
///
/// # Example
///
/// ```
/// use rust_queue_logger::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
///
/// metrics.record_enqueued();
/// metrics.record_written();
///
/// assert_eq!(metrics.enqueued(), 1);
/// assert_eq!(metrics.written(), 1);
/// assert_eq!(metrics.pending(), 0);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Records accepted by the queue
    enqueued: AtomicU64,

    /// Records refused because the queue was already closed
    rejected: AtomicU64,

    /// Records the sink wrote out
    written: AtomicU64,

    /// Records the sink ignored because of its threshold
    filtered: AtomicU64,

    /// Records lost to a sink error or panic
    failed: AtomicU64,
}

impl LoggerMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            enqueued: AtomicU64::new(0),
            rejected: AtomicU64::new(0),
            written: AtomicU64::new(0),
            filtered: AtomicU64::new(0),
            failed: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn enqueued(&self) -> u64 {
        self.enqueued.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn rejected(&self) -> u64 {
        self.rejected.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn written(&self) -> u64 {
        self.written.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn filtered(&self) -> u64 {
        self.filtered.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    /// Records accepted but not yet handled by the sink
    pub fn pending(&self) -> u64 {
        self.enqueued()
            .saturating_sub(self.written() + self.filtered() + self.failed())
    }

    /// Record an accepted enqueue, returning the previous count
    #[inline]
    pub fn record_enqueued(&self) -> u64 {
        self.enqueued.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_rejected(&self) -> u64 {
        self.rejected.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_written(&self) -> u64 {
        self.written.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_filtered(&self) -> u64 {
        self.filtered.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_failed(&self) -> u64 {
        self.failed.fetch_add(1, Ordering::Relaxed)
    }

    /// Share of handled records that failed, as a percentage (0.0 - 100.0)
    ///
    /// Returns 0.0 if the sink has not handled anything yet.
    pub fn failure_rate(&self) -> f64 {
        let failed = self.failed() as f64;
        let handled = self.written() as f64 + self.filtered() as f64 + failed;
        if handled == 0.0 {
            0.0
        } else {
            (failed / handled) * 100.0
        }
    }

    /// Reset all counters to zero
    pub fn reset(&self) {
        self.enqueued.store(0, Ordering::Relaxed);
        self.rejected.store(0, Ordering::Relaxed);
        self.written.store(0, Ordering::Relaxed);
        self.filtered.store(0, Ordering::Relaxed);
        self.failed.store(0, Ordering::Relaxed);
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for LoggerMetrics {
    /// Create a snapshot of the current counter values
    fn clone(&self) -> Self {
        Self {
            enqueued: AtomicU64::new(self.enqueued()),
            rejected: AtomicU64::new(self.rejected()),
            written: AtomicU64::new(self.written()),
            filtered: AtomicU64::new(self.filtered()),
            failed: AtomicU64::new(self.failed()),
        }
    }
}
