//! # Logflow
//!
//! A concurrent log dispatch and flow-control engine: named loggers fan
//! records out to pluggable sinks through a level gate, a filter chain,
//! and a redaction pass, synchronously or via a background queue.
//!
//! ## Features
//!
//! - **Safe sink lifecycle**: sinks can be added and removed while other
//!   threads are logging; removal can wait for in-flight writes to drain
//! - **Runtime level control**: permanent or self-reverting temporary level
//!   changes with an audit history and change callbacks
//! - **Flow control**: token-bucket rate limiting and 1-in-N sampling with
//!   per-cause drop accounting
//! - **Filtering**: level, field, lambda, composite, and cached regex
//!   filters over messages and ambient context
//! - **Redaction**: substring masking and regex/PII scrubbing, optionally
//!   routed to cloud sinks only
//!
//! ## Example
//!
//! ```no_run
//! use logflow::{LogLevel, Logger, Sink};
//! use std::sync::Arc;
//!
//! struct StdoutSink;
//!
//! impl Sink for StdoutSink {
//!     fn write(&self, logger_name: &str, level: LogLevel, message: &str) {
//!         println!("[{}] {}: {}", logger_name, level, message);
//!     }
//! }
//!
//! let logger = Logger::builder("app")
//!     .min_level(LogLevel::Info)
//!     .sink(Arc::new(StdoutSink))
//!     .build();
//!
//! logger.info("service started");
//! ```

pub mod core;
pub mod filters;

pub mod prelude {
    pub use crate::core::{
        handle_level_change_request, parse_level, AsyncQueue, CombinedLimiter, DispatchMetrics,
        LevelChangeCallback, LevelChangeEntry, LevelControlResponse, LimiterStats, LogContext,
        LogLevel, LogRecord, Logger, LoggerBuilder, LoggerError, MetricsSnapshot, RateLimiter,
        RedactionConfig, Result, SamplingLimiter, ScopedContext, Sink, DEFAULT_SHUTDOWN_TIMEOUT,
    };
    pub use crate::filters::{
        CompositeFilter, FieldFilter, FilterMode, FilterStats, LambdaFilter, LevelFilter,
        LogFilter, RegexFilter, RegexFilterCache, RegexFilterOptions,
    };
}

pub use core::{
    handle_level_change_request, parse_level, AsyncQueue, CombinedLimiter, DispatchMetrics,
    LevelChangeCallback, LevelChangeEntry, LevelControlResponse, LimiterStats, LogContext,
    LogLevel, LogRecord, Logger, LoggerBuilder, LoggerError, MetricsSnapshot, RateLimiter,
    RedactionConfig, Result, SamplingLimiter, ScopedContext, Sink, DEFAULT_SHUTDOWN_TIMEOUT,
    DEFAULT_QUEUE_SHUTDOWN_TIMEOUT, REDACTED,
};
pub use filters::{
    CompositeFilter, FieldFilter, FilterMode, FilterStats, LambdaFilter, LevelFilter, LogFilter,
    RegexFilter, RegexFilterCache, RegexFilterOptions,
};
