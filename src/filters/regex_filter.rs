//! Regex filter with match statistics

use super::LogFilter;
use crate::core::error::{LoggerError, Result};
use crate::core::log_context::LogContext;
use crate::core::log_record::LogRecord;
use regex::RegexBuilder;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Options controlling regex filter behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RegexFilterOptions {
    /// Pass records that do NOT match instead.
    pub invert: bool,
    pub case_insensitive: bool,
    /// Maintain atomic match/miss counters (on by default via
    /// [`RegexFilterOptions::new`]).
    pub track_stats: bool,
}

impl RegexFilterOptions {
    pub fn new() -> Self {
        Self {
            invert: false,
            case_insensitive: false,
            track_stats: true,
        }
    }

    #[must_use]
    pub fn invert(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }

    #[must_use]
    pub fn case_insensitive(mut self, case_insensitive: bool) -> Self {
        self.case_insensitive = case_insensitive;
        self
    }

    #[must_use]
    pub fn track_stats(mut self, track_stats: bool) -> Self {
        self.track_stats = track_stats;
        self
    }
}

/// Snapshot of a regex filter's match statistics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FilterStats {
    pub matches: u64,
    pub misses: u64,
    pub total_checks: u64,
    /// matches / total_checks, 0.0 when nothing has been checked.
    pub match_rate: f64,
}

/// Passes iff the pattern matches (or does not match, when inverted) against
/// the message text or a named context field.
#[derive(Debug)]
pub struct RegexFilter {
    pattern: String,
    regex: regex::Regex,
    field_name: Option<String>,
    options: RegexFilterOptions,
    match_count: AtomicU64,
    miss_count: AtomicU64,
}

impl RegexFilter {
    /// Filter over the record's message text.
    pub fn new(pattern: &str, options: RegexFilterOptions) -> Result<Self> {
        Self::build(pattern, None, options)
    }

    /// Filter over a named context field (ambient context first, then the
    /// record's own fields).
    pub fn on_field(field_name: &str, pattern: &str, options: RegexFilterOptions) -> Result<Self> {
        Self::build(pattern, Some(field_name.to_string()), options)
    }

    fn build(pattern: &str, field_name: Option<String>, options: RegexFilterOptions) -> Result<Self> {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(options.case_insensitive)
            .build()
            .map_err(|e| LoggerError::invalid_pattern(pattern, e.to_string()))?;

        Ok(Self {
            pattern: pattern.to_string(),
            regex,
            field_name,
            options,
            match_count: AtomicU64::new(0),
            miss_count: AtomicU64::new(0),
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn field_name(&self) -> Option<&str> {
        self.field_name.as_deref()
    }

    pub fn options(&self) -> RegexFilterOptions {
        self.options
    }

    fn update_stats(&self, matched: bool) {
        if !self.options.track_stats {
            return;
        }
        if matched {
            self.match_count.fetch_add(1, Ordering::Relaxed);
        } else {
            self.miss_count.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn get_stats(&self) -> FilterStats {
        let matches = self.match_count.load(Ordering::Relaxed);
        let misses = self.miss_count.load(Ordering::Relaxed);
        let total_checks = matches + misses;
        let match_rate = if total_checks == 0 {
            0.0
        } else {
            matches as f64 / total_checks as f64
        };
        FilterStats {
            matches,
            misses,
            total_checks,
            match_rate,
        }
    }

    pub fn reset_stats(&self) {
        self.match_count.store(0, Ordering::Relaxed);
        self.miss_count.store(0, Ordering::Relaxed);
    }
}

impl LogFilter for RegexFilter {
    fn should_log(&self, record: &LogRecord) -> bool {
        let matched = match &self.field_name {
            None => self.regex.is_match(&record.message),
            Some(field) => {
                let target = LogContext::get(field)
                    .or_else(|| record.field(field).map(String::from))
                    .unwrap_or_default();
                self.regex.is_match(&target)
            }
        };

        self.update_stats(matched);
        if self.options.invert {
            !matched
        } else {
            matched
        }
    }
}
