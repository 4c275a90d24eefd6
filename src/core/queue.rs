//! Unbounded record queue shared by producers and the dispatcher
//!
//! One lock guards both the pending records and the `closing` flag; a
//! condition variable wakes the consumer when either changes. Closing is a
//! one-way transition: afterwards `push` fails, but everything already
//! queued is still handed to the consumer before [`RecordQueue::drain_with`]
//! returns.

use super::dispatcher::DispatcherState;
use super::error::{LoggerError, Result};
use super::record::Record;
use parking_lot::{Condvar, Mutex, MutexGuard};
use std::collections::VecDeque;

#[derive(Default)]
struct QueueState {
    records: VecDeque<Record>,
    closing: bool,
}

#[derive(Default)]
pub struct RecordQueue {
    state: Mutex<QueueState>,
    available: Condvar,
}

impl RecordQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record at the tail and wake the consumer.
    ///
    /// Returns [`LoggerError::QueueClosed`] once [`close`](Self::close) has
    /// been called; the record is dropped in that case.
    pub fn push(&self, record: Record) -> Result<()> {
        {
            let mut state = self.state.lock();
            if state.closing {
                return Err(LoggerError::QueueClosed);
            }
            state.records.push_back(record);
        }
        self.available.notify_all();
        Ok(())
    }

    /// Signal shutdown and wake every waiter.
    ///
    /// Returns `true` only for the call that actually closed the queue;
    /// later calls have no effect. Does not wait for the queue to drain.
    pub fn close(&self) -> bool {
        let newly_closed = {
            let mut state = self.state.lock();
            !std::mem::replace(&mut state.closing, true)
        };
        self.available.notify_all();
        newly_closed
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closing
    }

    pub fn len(&self) -> usize {
        self.state.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().records.is_empty()
    }

    /// Consume records in FIFO order until the queue is closed and empty.
    ///
    /// Blocks on the condition variable while there is nothing to do. The
    /// queue lock is released while `handle` runs, so producers are never
    /// held up by the consumer's I/O. `observe` is told about every state
    /// change; the last one is always [`DispatcherState::Terminated`].
    pub fn drain_with<H, O>(&self, mut handle: H, mut observe: O)
    where
        H: FnMut(Record),
        O: FnMut(DispatcherState),
    {
        let mut state = self.state.lock();
        loop {
            observe(DispatcherState::Waiting);
            while state.records.is_empty() && !state.closing {
                self.available.wait(&mut state);
            }

            observe(DispatcherState::Draining);
            while let Some(record) = state.records.pop_front() {
                MutexGuard::unlocked(&mut state, || handle(record));
            }

            // Empty here, and the emptiness was observed under the lock.
            if state.closing {
                break;
            }
        }
        drop(state);
        observe(DispatcherState::Terminated);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Severity;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    fn record(text: &str) -> Record {
        Record::new(text, Severity::Info)
    }

    #[test]
    fn test_push_after_close_rejected() {
        let queue = RecordQueue::new();
        queue.push(record("before")).unwrap();
        assert!(queue.close());

        let err = queue.push(record("after")).unwrap_err();
        assert!(matches!(err, LoggerError::QueueClosed));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_close_is_idempotent() {
        let queue = RecordQueue::new();
        assert!(!queue.is_closed());
        assert!(queue.close());
        assert!(!queue.close());
        assert!(queue.is_closed());
    }

    #[test]
    fn test_drain_delivers_everything_queued_before_close() {
        let queue = RecordQueue::new();
        for i in 0..5 {
            queue.push(record(&format!("m{}", i))).unwrap();
        }
        queue.close();

        let mut seen = Vec::new();
        let mut states = Vec::new();
        queue.drain_with(|r| seen.push(r.message().to_string()), |s| states.push(s));

        assert_eq!(seen, vec!["m0", "m1", "m2", "m3", "m4"]);
        assert!(queue.is_empty());
        assert_eq!(states.last(), Some(&DispatcherState::Terminated));
        assert_eq!(
            states.iter().filter(|s| **s == DispatcherState::Terminated).count(),
            1
        );
    }

    #[test]
    fn test_drain_waits_for_producer() {
        let queue = Arc::new(RecordQueue::new());
        let consumer_queue = Arc::clone(&queue);

        let consumer = thread::spawn(move || {
            let mut seen = Vec::new();
            consumer_queue.drain_with(|r| seen.push(r.message().to_string()), |_| {});
            seen
        });

        thread::sleep(Duration::from_millis(20));
        queue.push(record("late")).unwrap();
        thread::sleep(Duration::from_millis(20));
        queue.push(record("later")).unwrap();
        queue.close();

        let seen = consumer.join().expect("consumer panicked");
        assert_eq!(seen, vec!["late", "later"]);
    }

    #[test]
    fn test_lock_released_while_handling() {
        let queue = RecordQueue::new();
        queue.push(record("first")).unwrap();
        queue.close();

        let mut lengths = Vec::new();
        // parking_lot mutexes are not reentrant: touching the queue from the
        // handler would deadlock if the lock were still held.
        queue.drain_with(|_| lengths.push(queue.len()), |_| {});
        assert_eq!(lengths, vec![0]);
    }
}
