//! Bounded-latency hand-off queue between log callers and the dispatch worker
//!
//! Many producers, one consumer. Producers never block waiting for space;
//! shutdown has bounded latency: drain waits are capped by a configurable
//! timeout, and anything still queued past the deadline is discarded and
//! counted so the tradeoff stays observable.

use super::log_record::LogRecord;
use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

/// Default maximum time `shutdown(true)` waits for the queue to drain.
pub const DEFAULT_QUEUE_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

pub struct AsyncQueue {
    queue: Mutex<VecDeque<LogRecord>>,
    items: Condvar,
    drained: Condvar,
    shutdown: AtomicBool,
    shutdown_timeout_ms: AtomicU64,
    dropped_on_shutdown: AtomicU64,
    peak_depth: AtomicUsize,
}

impl AsyncQueue {
    pub fn new() -> Self {
        Self::with_shutdown_timeout(DEFAULT_QUEUE_SHUTDOWN_TIMEOUT)
    }

    pub fn with_shutdown_timeout(timeout: Duration) -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            items: Condvar::new(),
            drained: Condvar::new(),
            shutdown: AtomicBool::new(false),
            shutdown_timeout_ms: AtomicU64::new(timeout.as_millis() as u64),
            dropped_on_shutdown: AtomicU64::new(0),
            peak_depth: AtomicUsize::new(0),
        }
    }

    /// Enqueue a record and wake the consumer.
    ///
    /// Returns `false` once shutdown has been initiated; never blocks the
    /// producer waiting for space.
    pub fn push(&self, record: LogRecord) -> bool {
        if self.shutdown.load(Ordering::Acquire) {
            return false;
        }

        {
            let mut queue = self.queue.lock();
            queue.push_back(record);
            let depth = queue.len();
            self.peak_depth.fetch_max(depth, Ordering::Relaxed);
        }
        self.items.notify_one();
        true
    }

    /// Block the single consumer until a record is available or shutdown is
    /// signaled. Returns `None` only when shutdown is signaled AND the queue
    /// is empty, so no queued work is ever abandoned by the consumer.
    pub fn pop(&self) -> Option<LogRecord> {
        let mut queue = self.queue.lock();

        self.items
            .wait_while(&mut queue, |q| q.is_empty() && !self.shutdown.load(Ordering::Acquire));

        let record = queue.pop_front()?;
        if queue.is_empty() {
            self.drained.notify_all();
        }
        Some(record)
    }

    /// Initiate graceful shutdown.
    ///
    /// With `wait_for_drain`, blocks until the queue empties or the
    /// configured timeout elapses; on timeout the remainder is discarded
    /// into the dropped-on-shutdown count. Returns whether the queue fully
    /// drained.
    pub fn shutdown(&self, wait_for_drain: bool) -> bool {
        self.shutdown.store(true, Ordering::Release);
        self.items.notify_all();

        if !wait_for_drain {
            return self.is_empty();
        }

        let timeout = Duration::from_millis(self.shutdown_timeout_ms.load(Ordering::Relaxed));
        let mut queue = self.queue.lock();
        self.drained
            .wait_while_for(&mut queue, |q| !q.is_empty(), timeout);

        if queue.is_empty() {
            true
        } else {
            self.dropped_on_shutdown
                .fetch_add(queue.len() as u64, Ordering::Relaxed);
            queue.clear();
            false
        }
    }

    pub fn is_shutting_down(&self) -> bool {
        self.shutdown.load(Ordering::Acquire)
    }

    pub fn set_shutdown_timeout(&self, timeout: Duration) {
        self.shutdown_timeout_ms
            .store(timeout.as_millis() as u64, Ordering::Relaxed);
    }

    /// Records discarded because drain exceeded the shutdown timeout.
    pub fn dropped_on_shutdown(&self) -> u64 {
        self.dropped_on_shutdown.load(Ordering::Relaxed)
    }

    pub fn len(&self) -> usize {
        self.queue.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.lock().is_empty()
    }

    /// High-water mark of queue depth since creation.
    pub fn peak_depth(&self) -> usize {
        self.peak_depth.load(Ordering::Relaxed)
    }
}

impl Default for AsyncQueue {
    fn default() -> Self {
        Self::new()
    }
}
