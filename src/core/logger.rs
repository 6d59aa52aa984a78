//! Main logger implementation
//!
//! The logger owns an ordered collection of sink handles, the level-control
//! state machine, the filter chain and the redaction configuration, and
//! exposes the emission API plus the sink/level administration API. All
//! state is interior-mutable so one logger can be shared across threads
//! behind an `Arc`.
//!
//! Locking discipline: the minimum level is a lock-free atomic (the
//! level-rejected fast path takes no lock at all); the sink collection sits
//! behind a read-write lock so concurrent dispatch never serializes against
//! itself; everything cold (filters, history, callbacks, overrides,
//! redaction) shares one admin mutex, acquired before the sink lock wherever
//! both are needed.

use super::{
    async_queue::AsyncQueue,
    level_control::{LevelChangeCallback, LevelChangeEntry},
    log_level::LogLevel,
    log_record::LogRecord,
    metrics::{DispatchMetrics, MetricsSnapshot},
    redaction::RedactionConfig,
    sink::{Sink, SinkEntry, SinkGuard},
};
use crate::core::error::Result;
use crate::filters::LogFilter;
use chrono::Utc;
use parking_lot::{Mutex, RwLock};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Default shutdown timeout used when an async logger is dropped without an
/// explicit `shutdown()` call.
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Upper bound on waiting for a removed sink's in-flight writes to finish.
const SINK_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);
const SINK_DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

const DEFAULT_MAX_HISTORY_ENTRIES: usize = 100;

type FilterFunc = Box<dyn Fn(&LogRecord) -> bool + Send + Sync>;

struct TemporaryLevel {
    original_level: LogLevel,
    revert_at: Instant,
}

/// Cold-path state behind the admin mutex.
struct AdminState {
    filters: Vec<Arc<dyn LogFilter>>,
    filter_func: Option<FilterFunc>,
    redaction: RedactionConfig,
    temp_level: Option<TemporaryLevel>,
    level_history: VecDeque<LevelChangeEntry>,
    max_history_entries: usize,
    level_change_callbacks: Vec<LevelChangeCallback>,
    sink_level_overrides: HashMap<usize, LogLevel>,
    sink_level_overrides_by_name: HashMap<String, LogLevel>,
}

impl AdminState {
    fn new() -> Self {
        Self {
            filters: Vec::new(),
            filter_func: None,
            redaction: RedactionConfig::new(),
            temp_level: None,
            level_history: VecDeque::new(),
            max_history_entries: DEFAULT_MAX_HISTORY_ENTRIES,
            level_change_callbacks: Vec::new(),
            sink_level_overrides: HashMap::new(),
            sink_level_overrides_by_name: HashMap::new(),
        }
    }

    fn record_level_change(&mut self, old_level: LogLevel, new_level: LogLevel, reason: String) {
        self.level_history.push_back(LevelChangeEntry {
            old_level,
            new_level,
            timestamp: Utc::now(),
            reason,
        });
        while self.level_history.len() > self.max_history_entries {
            self.level_history.pop_front();
        }
    }

    fn fire_callbacks(&self, old_level: LogLevel, new_level: LogLevel) {
        for callback in &self.level_change_callbacks {
            callback(old_level, new_level);
        }
    }
}

struct LoggerCore {
    name: String,
    min_level: AtomicU8,
    /// Mirrors `admin.temp_level.is_some()` so the emission path can skip
    /// the admin lock entirely while no override is armed.
    temp_level_armed: AtomicBool,
    sinks: RwLock<Vec<Arc<SinkEntry>>>,
    admin: Mutex<AdminState>,
    metrics: DispatchMetrics,
}

impl LoggerCore {
    fn new(name: String) -> Self {
        Self {
            name,
            min_level: AtomicU8::new(LogLevel::Trace as u8),
            temp_level_armed: AtomicBool::new(false),
            sinks: RwLock::new(Vec::new()),
            admin: Mutex::new(AdminState::new()),
            metrics: DispatchMetrics::new(),
        }
    }

    fn get_level(&self) -> LogLevel {
        LogLevel::from_u8(self.min_level.load(Ordering::Acquire))
    }

    /// Lazily revert an expired temporary override. Called at the start of
    /// every emission and explicit level query, which makes reversion
    /// self-correcting without a timer thread.
    fn check_temporary_level_expiry(&self) {
        if !self.temp_level_armed.load(Ordering::Acquire) {
            return;
        }

        let mut admin = self.admin.lock();
        let expired = matches!(&admin.temp_level, Some(t) if Instant::now() >= t.revert_at);
        if !expired {
            return;
        }

        let original = admin
            .temp_level
            .take()
            .map(|t| t.original_level)
            .unwrap_or_else(|| self.get_level());
        self.temp_level_armed.store(false, Ordering::Release);

        let current = LogLevel::from_u8(self.min_level.swap(original as u8, Ordering::AcqRel));
        admin.record_level_change(current, original, "Temporary level expired".to_string());
        admin.fire_callbacks(current, original);
    }

    /// Evaluate the custom predicate and then the filter chain; the first
    /// failing predicate short-circuits a decision to drop.
    fn passes_filters(&self, record: &LogRecord) -> bool {
        let admin = self.admin.lock();

        if let Some(func) = &admin.filter_func {
            if !func(record) {
                return false;
            }
        }

        admin.filters.iter().all(|f| f.should_log(record))
    }

    /// Fan a record out to every non-removed sink, honoring per-sink level
    /// overrides and redaction routing. Runs on the calling thread in sync
    /// mode and on the dispatch worker in async mode.
    fn fan_out(&self, record: &LogRecord) {
        // Unconfigured loggers take the plain path with no per-record
        // clones; the snapshot is only taken when something is set.
        let snapshot = {
            let admin = self.admin.lock();
            if admin.redaction.is_empty()
                && admin.sink_level_overrides.is_empty()
                && admin.sink_level_overrides_by_name.is_empty()
            {
                None
            } else {
                Some((
                    admin.redaction.clone(),
                    admin.sink_level_overrides.clone(),
                    admin.sink_level_overrides_by_name.clone(),
                ))
            }
        };

        // Redacted copy is computed once and reused for every sink that
        // needs it.
        let (redacted, cloud_only) = match &snapshot {
            Some((redaction, _, _)) if !redaction.is_empty() => {
                let copy = redaction.apply(&record.message);
                (
                    (copy != record.message).then_some(copy),
                    redaction.cloud_only(),
                )
            }
            _ => (None, false),
        };

        let sinks = self.sinks.read();
        for (index, entry) in sinks.iter().enumerate() {
            if entry.is_removed() {
                continue;
            }

            // A sink override can only raise the effective threshold; the
            // record already cleared the logger's own minimum.
            if let Some((_, index_overrides, name_overrides)) = &snapshot {
                let mut required = index_overrides.get(&index).copied();
                if let Some(name) = &entry.name {
                    if let Some(&by_name) = name_overrides.get(name) {
                        required = Some(required.map_or(by_name, |r| r.max(by_name)));
                    }
                }
                if matches!(required, Some(min) if record.level < min) {
                    continue;
                }
            }

            if let Some(guard) = SinkGuard::acquire(entry) {
                let use_redacted =
                    redacted.is_some() && (!cloud_only || guard.sink().is_cloud());
                let message = match (&redacted, use_redacted) {
                    (Some(copy), true) => copy.as_str(),
                    _ => record.message.as_str(),
                };
                guard.sink().write(&record.logger_name, record.level, message);
            }
        }
    }

    fn wait_for_sink_drain(entry: &Arc<SinkEntry>) {
        let deadline = Instant::now() + SINK_DRAIN_TIMEOUT;
        while entry.active_writers() > 0 && Instant::now() < deadline {
            thread::sleep(SINK_DRAIN_POLL_INTERVAL);
        }
    }
}

pub struct Logger {
    core: Arc<LoggerCore>,
    queue: Option<Arc<AsyncQueue>>,
    worker: Option<thread::JoinHandle<()>>,
}

impl Logger {
    /// Create a synchronous logger: `log()` completes its full sink fan-out
    /// before returning.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            core: Arc::new(LoggerCore::new(name.into())),
            queue: None,
            worker: None,
        }
    }

    /// Create an asynchronous logger: filter-passed records are handed to a
    /// queue and fanned out by a single background dispatch worker.
    pub fn with_async(name: impl Into<String>) -> Self {
        Self::with_async_config(name, AsyncQueue::new())
    }

    fn with_async_config(name: impl Into<String>, queue: AsyncQueue) -> Self {
        let core = Arc::new(LoggerCore::new(name.into()));
        let queue = Arc::new(queue);

        let worker_core = Arc::clone(&core);
        let worker_queue = Arc::clone(&queue);
        let worker = thread::spawn(move || {
            while let Some(record) = worker_queue.pop() {
                worker_core.fan_out(&record);
                worker_core.metrics.record_dispatched();
            }
        });

        Self {
            core,
            queue: Some(queue),
            worker: Some(worker),
        }
    }

    #[must_use]
    pub fn builder(name: impl Into<String>) -> LoggerBuilder {
        LoggerBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.core.name
    }

    pub fn is_async(&self) -> bool {
        self.queue.is_some()
    }

    // ------------------------------------------------------------------
    // Emission
    // ------------------------------------------------------------------

    pub fn log(&self, level: LogLevel, message: impl Into<String>) {
        self.dispatch(level, message.into(), HashMap::new());
    }

    /// Log with explicit context fields carried on the record.
    pub fn log_with_fields(
        &self,
        level: LogLevel,
        message: impl Into<String>,
        fields: HashMap<String, String>,
    ) {
        self.dispatch(level, message.into(), fields);
    }

    fn dispatch(&self, level: LogLevel, message: String, fields: HashMap<String, String>) {
        self.core.check_temporary_level_expiry();

        // Primary fast path: below the minimum level nothing is allocated
        // and no sink is visited.
        if level < self.core.get_level() {
            self.core.metrics.record_level_suppressed();
            return;
        }

        let record = LogRecord::new(self.core.name.clone(), level, message).with_fields(fields);

        if !self.core.passes_filters(&record) {
            self.core.metrics.record_filtered();
            return;
        }

        // Dispatched is counted after fan-out in both modes: a record still
        // queued is not dispatched yet, and one discarded by the shutdown
        // drain timeout is counted only in dropped_on_shutdown.
        match &self.queue {
            Some(queue) => {
                queue.push(record);
            }
            None => {
                self.core.fan_out(&record);
                self.core.metrics.record_dispatched();
            }
        }
    }

    #[inline]
    pub fn trace(&self, message: impl Into<String>) {
        self.log(LogLevel::Trace, message);
    }

    #[inline]
    pub fn debug(&self, message: impl Into<String>) {
        self.log(LogLevel::Debug, message);
    }

    #[inline]
    pub fn info(&self, message: impl Into<String>) {
        self.log(LogLevel::Info, message);
    }

    #[inline]
    pub fn warn(&self, message: impl Into<String>) {
        self.log(LogLevel::Warn, message);
    }

    #[inline]
    pub fn error(&self, message: impl Into<String>) {
        self.log(LogLevel::Error, message);
    }

    #[inline]
    pub fn critical(&self, message: impl Into<String>) {
        self.log(LogLevel::Critical, message);
    }

    // ------------------------------------------------------------------
    // Sink lifecycle
    // ------------------------------------------------------------------

    pub fn add_sink(&self, sink: Arc<dyn Sink>) {
        let mut sinks = self.core.sinks.write();
        sinks.push(Arc::new(SinkEntry::new(sink, None)));
    }

    /// Add a sink under a name usable for by-name removal and level
    /// overrides. Duplicate names are permitted; lookups return the first
    /// match.
    pub fn add_sink_named(&self, sink: Arc<dyn Sink>, name: impl Into<String>) {
        let mut sinks = self.core.sinks.write();
        sinks.push(Arc::new(SinkEntry::new(sink, Some(name.into()))));
    }

    /// Remove the first non-removed sink with the given name.
    ///
    /// With `wait_for_completion` the call polls the handle's active-writer
    /// count (up to 5 s) before erasing it; the structural lock is not held
    /// while waiting. A drain timeout is not an error: the handle stays
    /// invisible to new writers and erasure is deferred. Returns `false` if
    /// no matching active handle was found.
    pub fn remove_sink(&self, name: &str, wait_for_completion: bool) -> bool {
        let target = {
            let sinks = self.core.sinks.write();
            match sinks
                .iter()
                .find(|e| e.name.as_deref() == Some(name) && !e.is_removed())
            {
                Some(entry) => {
                    entry.mark_removed();
                    Arc::clone(entry)
                }
                None => return false,
            }
        };

        if wait_for_completion {
            LoggerCore::wait_for_sink_drain(&target);
        }

        self.core.sinks.write().retain(|e| !e.is_drained());
        true
    }

    /// Remove the sink at the given index. Same drain semantics as
    /// [`Logger::remove_sink`].
    pub fn remove_sink_at(&self, index: usize, wait_for_completion: bool) -> bool {
        let target = {
            let sinks = self.core.sinks.write();
            match sinks.get(index) {
                Some(entry) if !entry.is_removed() => {
                    entry.mark_removed();
                    Arc::clone(entry)
                }
                _ => return false,
            }
        };

        if wait_for_completion {
            LoggerCore::wait_for_sink_drain(&target);
        }

        self.core.sinks.write().retain(|e| !e.is_drained());
        true
    }

    /// Mark every sink removed, drain each, erase all, and reset sink-level
    /// overrides (index-keyed overrides are meaningless once the collection
    /// is rebuilt).
    pub fn clear_sinks(&self) {
        let marked: Vec<Arc<SinkEntry>> = {
            let sinks = self.core.sinks.write();
            for entry in sinks.iter() {
                entry.mark_removed();
            }
            sinks.iter().map(Arc::clone).collect()
        };

        for entry in &marked {
            LoggerCore::wait_for_sink_drain(entry);
        }

        self.core.sinks.write().clear();

        let mut admin = self.core.admin.lock();
        admin.sink_level_overrides.clear();
        admin.sink_level_overrides_by_name.clear();
    }

    /// Number of sinks not marked removed.
    pub fn sink_count(&self) -> usize {
        let sinks = self.core.sinks.read();
        sinks.iter().filter(|e| !e.is_removed()).count()
    }

    /// Require a higher minimum level for the sink at `index` than the
    /// logger's own threshold. The override can only raise, never lower,
    /// effective filtering for that sink.
    pub fn set_sink_level(&self, index: usize, level: LogLevel) {
        let mut admin = self.core.admin.lock();
        if index < self.core.sinks.read().len() {
            admin.sink_level_overrides.insert(index, level);
        }
    }

    /// Same as [`Logger::set_sink_level`], keyed by sink name.
    pub fn set_sink_level_by_name(&self, name: impl Into<String>, level: LogLevel) {
        let mut admin = self.core.admin.lock();
        admin.sink_level_overrides_by_name.insert(name.into(), level);
    }

    pub fn clear_sink_level_overrides(&self) {
        let mut admin = self.core.admin.lock();
        admin.sink_level_overrides.clear();
        admin.sink_level_overrides_by_name.clear();
    }

    // ------------------------------------------------------------------
    // Level control
    // ------------------------------------------------------------------

    /// Direct, silent level change: no history entry, no callbacks. Meant
    /// for initial configuration.
    pub fn set_level(&self, level: LogLevel) {
        self.core.min_level.store(level as u8, Ordering::Release);
    }

    pub fn get_level(&self) -> LogLevel {
        self.core.check_temporary_level_expiry();
        self.core.get_level()
    }

    /// Atomically swap the level; if it actually changed, append a history
    /// entry and invoke every registered change callback.
    ///
    /// While a temporary override is active this changes the current level
    /// but deliberately leaves the captured original untouched: expiry or
    /// cancellation still restores the pre-override level.
    pub fn set_level_dynamic(&self, level: LogLevel, reason: impl Into<String>) {
        self.core.check_temporary_level_expiry();

        let old_level =
            LogLevel::from_u8(self.core.min_level.swap(level as u8, Ordering::AcqRel));
        if old_level == level {
            return;
        }

        let mut admin = self.core.admin.lock();
        admin.record_level_change(old_level, level, reason.into());
        admin.fire_callbacks(old_level, level);
    }

    /// Apply a time-bounded level override that self-reverts.
    ///
    /// From the normal state the present level is captured as the original
    /// to restore; nested calls extend or replace the active override
    /// without re-capturing, so the true original is never lost. Reversion
    /// happens lazily on the next call into the logger after the deadline.
    pub fn set_level_temporary(
        &self,
        level: LogLevel,
        duration: Duration,
        reason: impl Into<String>,
    ) {
        let mut admin = self.core.admin.lock();

        let original_level = match &admin.temp_level {
            Some(active) => active.original_level,
            None => self.core.get_level(),
        };
        admin.temp_level = Some(TemporaryLevel {
            original_level,
            revert_at: Instant::now() + duration,
        });
        self.core.temp_level_armed.store(true, Ordering::Release);

        let old_level =
            LogLevel::from_u8(self.core.min_level.swap(level as u8, Ordering::AcqRel));

        let reason = reason.into();
        let secs = duration.as_secs();
        let full_reason = if reason.is_empty() {
            format!("Temporary level change for {}s", secs)
        } else {
            format!("{} (temporary, {}s)", reason, secs)
        };

        admin.record_level_change(old_level, level, full_reason);
        admin.fire_callbacks(old_level, level);
    }

    /// Cancel an active temporary override, restoring the captured original
    /// level immediately. No-op when none is active.
    pub fn cancel_temporary_level(&self) {
        let mut admin = self.core.admin.lock();

        let Some(active) = admin.temp_level.take() else {
            return;
        };
        self.core.temp_level_armed.store(false, Ordering::Release);

        let original = active.original_level;
        let current =
            LogLevel::from_u8(self.core.min_level.swap(original as u8, Ordering::AcqRel));

        admin.record_level_change(current, original, "Temporary level cancelled".to_string());
        admin.fire_callbacks(current, original);
    }

    pub fn has_temporary_level(&self) -> bool {
        self.core.check_temporary_level_expiry();
        self.core.admin.lock().temp_level.is_some()
    }

    /// Time left until the active override reverts; zero when none is
    /// active.
    pub fn remaining_temporary_duration(&self) -> Duration {
        self.core.check_temporary_level_expiry();
        let admin = self.core.admin.lock();
        match &admin.temp_level {
            Some(t) => t.revert_at.saturating_duration_since(Instant::now()),
            None => Duration::ZERO,
        }
    }

    pub fn register_level_change_callback(&self, callback: LevelChangeCallback) {
        self.core.admin.lock().level_change_callbacks.push(callback);
    }

    pub fn clear_level_change_callbacks(&self) {
        self.core.admin.lock().level_change_callbacks.clear();
    }

    /// The most recent `max_entries` level changes, oldest-first within
    /// that window.
    pub fn get_level_history(&self, max_entries: usize) -> Vec<LevelChangeEntry> {
        let admin = self.core.admin.lock();
        let count = max_entries.min(admin.level_history.len());
        admin
            .level_history
            .iter()
            .skip(admin.level_history.len() - count)
            .cloned()
            .collect()
    }

    pub fn clear_level_history(&self) {
        self.core.admin.lock().level_history.clear();
    }

    /// Cap the history log; oldest entries are evicted first.
    pub fn set_max_history_entries(&self, max_entries: usize) {
        let mut admin = self.core.admin.lock();
        admin.max_history_entries = max_entries;
        while admin.level_history.len() > max_entries {
            admin.level_history.pop_front();
        }
    }

    // ------------------------------------------------------------------
    // Filters
    // ------------------------------------------------------------------

    pub fn add_filter(&self, filter: Arc<dyn LogFilter>) {
        self.core.admin.lock().filters.push(filter);
    }

    /// Install the single custom predicate, replacing any previous one.
    pub fn set_filter_func<F>(&self, func: F)
    where
        F: Fn(&LogRecord) -> bool + Send + Sync + 'static,
    {
        self.core.admin.lock().filter_func = Some(Box::new(func));
    }

    /// Remove all filters and the custom predicate.
    pub fn clear_filters(&self) {
        let mut admin = self.core.admin.lock();
        admin.filters.clear();
        admin.filter_func = None;
    }

    // ------------------------------------------------------------------
    // Redaction
    // ------------------------------------------------------------------

    /// Literal substrings masked with '*' of equal length.
    pub fn set_redact_patterns(&self, patterns: Vec<String>) {
        self.core.admin.lock().redaction.set_substrings(patterns);
    }

    /// Regex patterns replaced with `***`; compiled here, rejected here if
    /// invalid, never touched on the log path.
    pub fn set_redact_regex_patterns(&self, patterns: &[String]) -> Result<()> {
        self.core.admin.lock().redaction.set_regex_patterns(patterns)
    }

    /// Named PII presets ("email", "ipv4", "credit_card", "ssn").
    pub fn set_redact_pii_presets(&self, presets: &[String]) -> Result<()> {
        self.core.admin.lock().redaction.set_pii_presets(presets)
    }

    /// Route redaction to cloud sinks only instead of all sinks.
    pub fn set_redact_cloud_only(&self, cloud_only: bool) {
        self.core.admin.lock().redaction.set_cloud_only(cloud_only);
    }

    pub fn clear_redact_patterns(&self) {
        self.core.admin.lock().redaction.clear();
    }

    // ------------------------------------------------------------------
    // Observability
    // ------------------------------------------------------------------

    pub fn metrics(&self) -> &DispatchMetrics {
        &self.core.metrics
    }

    /// Pending records in the async queue; 0 for synchronous loggers.
    pub fn queue_depth(&self) -> usize {
        self.queue.as_ref().map_or(0, |q| q.len())
    }

    /// Records discarded because shutdown drain timed out.
    pub fn dropped_on_shutdown(&self) -> u64 {
        self.queue.as_ref().map_or(0, |q| q.dropped_on_shutdown())
    }

    /// Point-in-time snapshot for external metrics/health consumers.
    pub fn snapshot(&self) -> MetricsSnapshot {
        self.core.check_temporary_level_expiry();
        MetricsSnapshot {
            logger_name: self.core.name.clone(),
            current_level: self.core.get_level(),
            dispatched: self.core.metrics.dispatched(),
            filtered: self.core.metrics.filtered(),
            level_suppressed: self.core.metrics.level_suppressed(),
            queue_depth: self.queue_depth(),
            queue_peak_depth: self.queue.as_ref().map_or(0, |q| q.peak_depth()),
            dropped_on_shutdown: self.dropped_on_shutdown(),
        }
    }

    // ------------------------------------------------------------------
    // Shutdown
    // ------------------------------------------------------------------

    /// Gracefully shut down an async logger, draining the queue for at most
    /// `timeout`. Returns whether the backlog fully drained; a synchronous
    /// logger always reports `true`. Records logged after shutdown are
    /// rejected by the queue and discarded.
    pub fn shutdown(&mut self, timeout: Duration) -> bool {
        let Some(queue) = self.queue.as_ref().map(Arc::clone) else {
            return true;
        };

        queue.set_shutdown_timeout(timeout);
        let drained = queue.shutdown(true);

        if let Some(worker) = self.worker.take() {
            // Queue is empty and flagged by now; the worker only stays alive
            // if a sink write is stuck, so bound the join.
            let deadline = Instant::now() + timeout;
            loop {
                if worker.is_finished() {
                    let _ = worker.join();
                    break;
                }
                if Instant::now() >= deadline {
                    return false;
                }
                thread::sleep(Duration::from_millis(10));
            }
        }

        drained
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if self.worker.is_some() {
            self.shutdown(DEFAULT_SHUTDOWN_TIMEOUT);
        }
    }
}

/// Builder for constructing a [`Logger`] with a fluent API.
pub struct LoggerBuilder {
    name: String,
    min_level: LogLevel,
    sinks: Vec<(Arc<dyn Sink>, Option<String>)>,
    filters: Vec<Arc<dyn LogFilter>>,
    async_mode: bool,
    queue_shutdown_timeout: Option<Duration>,
    max_history_entries: Option<usize>,
}

impl LoggerBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            min_level: LogLevel::Info,
            sinks: Vec::new(),
            filters: Vec::new(),
            async_mode: false,
            queue_shutdown_timeout: None,
            max_history_entries: None,
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn sink(mut self, sink: Arc<dyn Sink>) -> Self {
        self.sinks.push((sink, None));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn named_sink(mut self, sink: Arc<dyn Sink>, name: impl Into<String>) -> Self {
        self.sinks.push((sink, Some(name.into())));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn filter(mut self, filter: Arc<dyn LogFilter>) -> Self {
        self.filters.push(filter);
        self
    }

    /// Dispatch through a background worker instead of on the calling
    /// thread.
    #[must_use = "builder methods return a new value"]
    pub fn async_mode(mut self) -> Self {
        self.async_mode = true;
        self
    }

    /// Maximum time `shutdown` waits for the async queue to drain.
    #[must_use = "builder methods return a new value"]
    pub fn queue_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.queue_shutdown_timeout = Some(timeout);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn max_history_entries(mut self, max_entries: usize) -> Self {
        self.max_history_entries = Some(max_entries);
        self
    }

    pub fn build(self) -> Logger {
        let logger = if self.async_mode {
            let queue = match self.queue_shutdown_timeout {
                Some(timeout) => AsyncQueue::with_shutdown_timeout(timeout),
                None => AsyncQueue::new(),
            };
            Logger::with_async_config(self.name, queue)
        } else {
            Logger::new(self.name)
        };

        logger.set_level(self.min_level);
        if let Some(max) = self.max_history_entries {
            logger.set_max_history_entries(max);
        }
        for (sink, name) in self.sinks {
            match name {
                Some(name) => logger.add_sink_named(sink, name),
                None => logger.add_sink(sink),
            }
        }
        for filter in self.filters {
            logger.add_filter(filter);
        }

        logger
    }
}
