//! Polymorphic filter chain evaluated per record by the logger
//!
//! Filters are predicates over a [`LogRecord`], logically ANDed with the
//! level check when installed on a logger; `CompositeFilter` nests its own
//! AND/OR across children.

pub mod cache;
pub mod regex_filter;

pub use cache::RegexFilterCache;
pub use regex_filter::{FilterStats, RegexFilter, RegexFilterOptions};

use crate::core::log_context::LogContext;
use crate::core::log_level::LogLevel;
use crate::core::log_record::LogRecord;
use std::sync::Arc;

/// One decision rule over a log record.
pub trait LogFilter: Send + Sync {
    fn should_log(&self, record: &LogRecord) -> bool;
}

/// Passes iff `record.level >= min_level`.
pub struct LevelFilter {
    min_level: LogLevel,
}

impl LevelFilter {
    pub fn new(min_level: LogLevel) -> Self {
        Self { min_level }
    }
}

impl LogFilter for LevelFilter {
    fn should_log(&self, record: &LogRecord) -> bool {
        record.level >= self.min_level
    }
}

/// Passes iff a context field equals the expected value exactly.
///
/// The calling thread's ambient context is checked first, falling back to
/// a field carried directly on the record.
pub struct FieldFilter {
    field_name: String,
    expected_value: String,
}

impl FieldFilter {
    pub fn new(field_name: impl Into<String>, expected_value: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            expected_value: expected_value.into(),
        }
    }
}

impl LogFilter for FieldFilter {
    fn should_log(&self, record: &LogRecord) -> bool {
        if let Some(value) = LogContext::get(&self.field_name) {
            return value == self.expected_value;
        }
        record.field(&self.field_name) == Some(self.expected_value.as_str())
    }
}

/// Passes iff the supplied predicate returns true.
pub struct LambdaFilter {
    predicate: Box<dyn Fn(&LogRecord) -> bool + Send + Sync>,
}

impl LambdaFilter {
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&LogRecord) -> bool + Send + Sync + 'static,
    {
        Self {
            predicate: Box::new(predicate),
        }
    }
}

impl LogFilter for LambdaFilter {
    fn should_log(&self, record: &LogRecord) -> bool {
        (self.predicate)(record)
    }
}

/// Combination mode for [`CompositeFilter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    And,
    Or,
}

/// Applies AND/OR across child filters.
///
/// An empty AND composite is vacuously true; an empty OR composite is
/// vacuously false.
pub struct CompositeFilter {
    mode: FilterMode,
    filters: Vec<Arc<dyn LogFilter>>,
}

impl CompositeFilter {
    pub fn new(mode: FilterMode) -> Self {
        Self {
            mode,
            filters: Vec::new(),
        }
    }

    pub fn add_filter(&mut self, filter: Arc<dyn LogFilter>) {
        self.filters.push(filter);
    }

    #[must_use]
    pub fn with_filter(mut self, filter: Arc<dyn LogFilter>) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl LogFilter for CompositeFilter {
    fn should_log(&self, record: &LogRecord) -> bool {
        match self.mode {
            FilterMode::And => self.filters.iter().all(|f| f.should_log(record)),
            FilterMode::Or => self.filters.iter().any(|f| f.should_log(record)),
        }
    }
}
