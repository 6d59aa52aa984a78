//! Flow-control gates for shedding load under burst conditions
//!
//! Three independent, composable admission gates usable standalone or
//! chained in front of `Logger::log`:
//!
//! - [`RateLimiter`]: token bucket, lazily refilled from elapsed wall time
//! - [`SamplingLimiter`]: deterministic every-Nth admission
//! - [`CombinedLimiter`]: sampling gate first, then rate gate, with drop
//!   attribution preserved by that order

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

struct Bucket {
    tokens: f64,
    last_refill: Instant,
}

/// Token-bucket rate limiter.
///
/// Capacity is the burst size (falling back to the refill rate when burst is
/// unspecified). A limiter built with zero rate and zero burst is an explicit
/// disabled state that always admits, not a zero-capacity bucket.
pub struct RateLimiter {
    max_tokens: f64,
    refill_rate: f64,
    bucket: Mutex<Bucket>,
    dropped: AtomicU64,
}

impl RateLimiter {
    pub fn new(messages_per_second: u64, burst_capacity: u64) -> Self {
        let max_tokens = if burst_capacity > 0 {
            burst_capacity
        } else {
            messages_per_second
        } as f64;

        Self {
            max_tokens,
            refill_rate: messages_per_second as f64,
            bucket: Mutex::new(Bucket {
                tokens: max_tokens,
                last_refill: Instant::now(),
            }),
            dropped: AtomicU64::new(0),
        }
    }

    /// A limiter that admits everything.
    pub fn disabled() -> Self {
        Self::new(0, 0)
    }

    pub fn is_enabled(&self) -> bool {
        self.max_tokens > 0.0
    }

    /// Admit or reject one attempt.
    ///
    /// Refill-and-check happens atomically under the bucket lock: tokens are
    /// recomputed as `min(capacity, tokens + elapsed_secs * rate)`, then one
    /// is consumed if available.
    pub fn try_log(&self) -> bool {
        if !self.is_enabled() {
            return true;
        }

        let mut bucket = self.bucket.lock();
        let now = Instant::now();
        let elapsed = now.duration_since(bucket.last_refill).as_secs_f64();
        if elapsed > 0.0 {
            bucket.tokens = (bucket.tokens + elapsed * self.refill_rate).min(self.max_tokens);
            bucket.last_refill = now;
        }

        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            true
        } else {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            false
        }
    }

    pub fn available_tokens(&self) -> u64 {
        self.bucket.lock().tokens as u64
    }

    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Refill the bucket and clear the drop counter.
    pub fn reset(&self) {
        let mut bucket = self.bucket.lock();
        bucket.tokens = self.max_tokens;
        bucket.last_refill = Instant::now();
        self.dropped.store(0, Ordering::Relaxed);
    }
}

/// Deterministic sampler admitting the 1st, (N+1)th, (2N+1)th, ... attempt.
///
/// An interval of 1 (or 0) is the disabled state: every attempt is admitted
/// without touching the counter.
pub struct SamplingLimiter {
    interval: u64,
    counter: AtomicU64,
}

impl SamplingLimiter {
    pub fn new(sample_interval: u64) -> Self {
        Self {
            interval: sample_interval.max(1),
            counter: AtomicU64::new(0),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.interval > 1
    }

    pub fn should_log(&self) -> bool {
        if !self.is_enabled() {
            return true;
        }

        let count = self.counter.fetch_add(1, Ordering::Relaxed);
        count % self.interval == 0
    }

    /// Total attempts seen while enabled.
    pub fn total_count(&self) -> u64 {
        self.counter.load(Ordering::Relaxed)
    }

    /// Derived as total attempts minus admitted attempts; not tracked
    /// separately, so it can never disagree with the counter.
    pub fn dropped_count(&self) -> u64 {
        let total = self.total_count();
        if !self.is_enabled() || total == 0 {
            return 0;
        }
        total - total.div_ceil(self.interval)
    }

    pub fn reset(&self) {
        self.counter.store(0, Ordering::Relaxed);
    }
}

/// Snapshot of a combined limiter's drop attribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimiterStats {
    pub total_messages: u64,
    pub sampling_drops: u64,
    pub rate_limited_drops: u64,
    pub logged_messages: u64,
}

/// Sampling gate composed in front of a rate gate.
///
/// The order matters for attribution: an attempt the sampler rejects never
/// reaches the bucket, so a sample admitted there but then rate-limited is
/// charged to rate limiting, not sampling.
pub struct CombinedLimiter {
    rate_limiter: RateLimiter,
    sampling_limiter: SamplingLimiter,
    logged: AtomicU64,
}

impl CombinedLimiter {
    pub fn new(messages_per_second: u64, burst_capacity: u64, sample_interval: u64) -> Self {
        Self {
            rate_limiter: RateLimiter::new(messages_per_second, burst_capacity),
            sampling_limiter: SamplingLimiter::new(sample_interval),
            logged: AtomicU64::new(0),
        }
    }

    pub fn should_log(&self) -> bool {
        if !self.sampling_limiter.should_log() {
            return false;
        }

        if !self.rate_limiter.try_log() {
            return false;
        }

        self.logged.fetch_add(1, Ordering::Relaxed);
        true
    }

    pub fn get_stats(&self) -> LimiterStats {
        LimiterStats {
            total_messages: self.sampling_limiter.total_count(),
            sampling_drops: self.sampling_limiter.dropped_count(),
            rate_limited_drops: self.rate_limiter.dropped_count(),
            logged_messages: self.logged.load(Ordering::Relaxed),
        }
    }

    pub fn reset(&self) {
        self.rate_limiter.reset();
        self.sampling_limiter.reset();
        self.logged.store(0, Ordering::Relaxed);
    }
}
