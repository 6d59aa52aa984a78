//! Sink capability and the reference-counted handle used for safe removal
//!
//! The engine never inspects sink internals: a sink is anything that accepts
//! a formatted write. `SinkEntry`/`SinkGuard` implement the drain protocol:
//! a removed entry is never selected for new writes, and it is physically
//! erased only once its active-writer count has returned to zero.

use super::log_level::LogLevel;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// An output destination capability.
///
/// Write failures are the sink's own responsibility; the engine neither
/// catches nor retries on its behalf.
pub trait Sink: Send + Sync {
    fn write(&self, logger_name: &str, level: LogLevel, message: &str);

    /// Cloud-aware sinks opt in to cloud-only redaction routing.
    fn is_cloud(&self) -> bool {
        false
    }
}

/// Reference-counted sink wrapper for thread-safe removal.
pub(crate) struct SinkEntry {
    pub(crate) sink: Arc<dyn Sink>,
    pub(crate) name: Option<String>,
    /// Monotonic false -> true; a removed entry is invisible to new writers.
    removed: AtomicBool,
    /// Callers currently mid-write through this handle.
    active_writers: AtomicUsize,
}

impl SinkEntry {
    pub(crate) fn new(sink: Arc<dyn Sink>, name: Option<String>) -> Self {
        Self {
            sink,
            name,
            removed: AtomicBool::new(false),
            active_writers: AtomicUsize::new(0),
        }
    }

    pub(crate) fn mark_removed(&self) {
        self.removed.store(true, Ordering::Release);
    }

    pub(crate) fn is_removed(&self) -> bool {
        self.removed.load(Ordering::Acquire)
    }

    pub(crate) fn active_writers(&self) -> usize {
        self.active_writers.load(Ordering::Acquire)
    }

    /// Drained means: marked removed and no writer still inside.
    pub(crate) fn is_drained(&self) -> bool {
        self.is_removed() && self.active_writers() == 0
    }
}

/// RAII guard over a sink entry's active-writer counter.
///
/// Acquisition fails on an entry already marked removed, which closes the
/// race between removal and a new write starting.
pub(crate) struct SinkGuard {
    entry: Arc<SinkEntry>,
}

impl SinkGuard {
    pub(crate) fn acquire(entry: &Arc<SinkEntry>) -> Option<Self> {
        entry.active_writers.fetch_add(1, Ordering::AcqRel);
        if entry.is_removed() {
            // Lost the race with removal; back out before any write happens.
            entry.active_writers.fetch_sub(1, Ordering::AcqRel);
            return None;
        }
        Some(Self {
            entry: Arc::clone(entry),
        })
    }

    pub(crate) fn sink(&self) -> &dyn Sink {
        self.entry.sink.as_ref()
    }
}

impl Drop for SinkGuard {
    fn drop(&mut self) {
        self.entry.active_writers.fetch_sub(1, Ordering::AcqRel);
    }
}
