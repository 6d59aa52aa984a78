//! Control-plane types for runtime level changes
//!
//! External controllers (admin endpoints, signal handlers, config watchers)
//! speak in level names and durations; everything here parses and validates
//! before ever touching logger state, and answers with a structured response
//! rather than an error.

use super::error::Result;
use super::log_level::LogLevel;
use super::logger::Logger;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// One entry in the level-change audit history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelChangeEntry {
    pub old_level: LogLevel,
    pub new_level: LogLevel,
    pub timestamp: DateTime<Utc>,
    pub reason: String,
}

/// Callback invoked with (old, new) whenever the effective level changes.
pub type LevelChangeCallback = Arc<dyn Fn(LogLevel, LogLevel) + Send + Sync>;

/// Structured response to a level-change request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelControlResponse {
    pub success: bool,
    pub message: String,
    pub logger_name: String,
    pub current_level: LogLevel,
}

impl LevelControlResponse {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Parse a textual level name.
///
/// Pure function, independent of logger state: case-insensitive, accepts
/// "warning" for Warn and "fatal" for Critical, rejects unknown strings
/// without mutating anything.
pub fn parse_level(level_str: &str) -> Result<LogLevel> {
    level_str.parse()
}

/// Apply a level-change request against a logger.
///
/// A positive duration requests a temporary override that self-reverts;
/// zero means a permanent dynamic change. Invalid level names produce a
/// failure response and leave the logger untouched.
pub fn handle_level_change_request(
    logger: &Logger,
    new_level_str: &str,
    reason: &str,
    duration_seconds: u64,
) -> LevelControlResponse {
    let level = match parse_level(new_level_str) {
        Ok(level) => level,
        Err(e) => {
            return LevelControlResponse {
                success: false,
                message: e.to_string(),
                logger_name: logger.name().to_string(),
                current_level: logger.get_level(),
            };
        }
    };

    let message = if duration_seconds > 0 {
        logger.set_level_temporary(level, Duration::from_secs(duration_seconds), reason);
        format!(
            "Log level changed temporarily for {} seconds",
            duration_seconds
        )
    } else {
        logger.set_level_dynamic(level, reason);
        "Log level changed successfully".to_string()
    };

    LevelControlResponse {
        success: true,
        message,
        logger_name: logger.name().to_string(),
        current_level: logger.get_level(),
    }
}
