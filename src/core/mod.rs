//! Core dispatch, flow-control, and level-management types

pub mod async_queue;
pub mod error;
pub mod level_control;
pub mod log_context;
pub mod log_level;
pub mod log_record;
pub mod logger;
pub mod metrics;
pub mod rate_limiter;
pub mod redaction;
pub mod sink;

pub use async_queue::{AsyncQueue, DEFAULT_QUEUE_SHUTDOWN_TIMEOUT};
pub use error::{LoggerError, Result};
pub use level_control::{
    handle_level_change_request, parse_level, LevelChangeCallback, LevelChangeEntry,
    LevelControlResponse,
};
pub use log_context::{LogContext, ScopedContext};
pub use log_level::LogLevel;
pub use log_record::LogRecord;
pub use logger::{Logger, LoggerBuilder, DEFAULT_SHUTDOWN_TIMEOUT};
pub use metrics::{DispatchMetrics, MetricsSnapshot};
pub use rate_limiter::{CombinedLimiter, LimiterStats, RateLimiter, SamplingLimiter};
pub use redaction::{RedactionConfig, REDACTED};
pub use sink::Sink;
