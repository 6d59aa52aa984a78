//! Dispatch metrics for observability
//!
//! The engine never pushes metrics; external registries pull a
//! [`MetricsSnapshot`] of the counts it is responsible for.

use super::log_level::LogLevel;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Counters maintained by the dispatch path.
#[derive(Debug)]
pub struct DispatchMetrics {
    /// Records that completed sink fan-out. Disjoint from
    /// dropped-on-shutdown: a queued record lands in exactly one of the two.
    dispatched: AtomicU64,

    /// Records dropped by the custom predicate or the filter chain
    filtered: AtomicU64,

    /// Records rejected by the minimum-level fast path
    level_suppressed: AtomicU64,
}

impl DispatchMetrics {
    pub const fn new() -> Self {
        Self {
            dispatched: AtomicU64::new(0),
            filtered: AtomicU64::new(0),
            level_suppressed: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn dispatched(&self) -> u64 {
        self.dispatched.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn filtered(&self) -> u64 {
        self.filtered.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn level_suppressed(&self) -> u64 {
        self.level_suppressed.load(Ordering::Relaxed)
    }

    #[inline]
    pub(crate) fn record_dispatched(&self) {
        self.dispatched.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_filtered(&self) {
        self.filtered.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_level_suppressed(&self) {
        self.level_suppressed.fetch_add(1, Ordering::Relaxed);
    }

    /// Reset all counters to zero
    pub fn reset(&self) {
        self.dispatched.store(0, Ordering::Relaxed);
        self.filtered.store(0, Ordering::Relaxed);
        self.level_suppressed.store(0, Ordering::Relaxed);
    }
}

impl Default for DispatchMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time view of a logger's observable state, pulled by external
/// metrics/health consumers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub logger_name: String,
    pub current_level: LogLevel,
    pub dispatched: u64,
    pub filtered: u64,
    pub level_suppressed: u64,
    /// Pending records in the async queue; 0 for synchronous loggers.
    pub queue_depth: usize,
    /// High-water mark of the async queue; 0 for synchronous loggers.
    pub queue_peak_depth: usize,
    /// Records discarded because shutdown drain exceeded its timeout.
    pub dropped_on_shutdown: u64,
}
