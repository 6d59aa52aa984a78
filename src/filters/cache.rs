//! Keyed cache of compiled regex filters
//!
//! Compiling a pattern is expensive relative to matching it; callers that
//! build filters from configuration or per-request input go through this
//! cache so identical (pattern, field, options) triples compile once.
//!
//! The cache is an explicit injected value, not ambient global state: build
//! one at process start, clone the handle wherever it is needed, and never
//! tear it down mid-run. A single lock guards lookup-or-insert, acceptable
//! because compilation is rare relative to matching.

use super::regex_filter::{RegexFilter, RegexFilterOptions};
use crate::core::error::Result;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

struct CacheInner {
    cache: Mutex<HashMap<String, Arc<RegexFilter>>>,
    precompiled: Mutex<HashMap<String, Arc<RegexFilter>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

/// Clonable handle to a shared filter cache.
#[derive(Clone)]
pub struct RegexFilterCache {
    inner: Arc<CacheInner>,
}

impl RegexFilterCache {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(CacheInner {
                cache: Mutex::new(HashMap::new()),
                precompiled: Mutex::new(HashMap::new()),
                hits: AtomicU64::new(0),
                misses: AtomicU64::new(0),
            }),
        }
    }

    fn cache_key(pattern: &str, field: Option<&str>, options: RegexFilterOptions) -> String {
        format!(
            "{}|{}|{}{}",
            pattern,
            field.unwrap_or(""),
            if options.case_insensitive { "i" } else { "" },
            if options.invert { "v" } else { "" },
        )
    }

    /// Look up a compiled filter over the message text, compiling on miss.
    pub fn get_or_create(
        &self,
        pattern: &str,
        options: RegexFilterOptions,
    ) -> Result<Arc<RegexFilter>> {
        self.lookup(pattern, None, options)
    }

    /// Look up a compiled filter over a named field, compiling on miss.
    pub fn get_or_create_for_field(
        &self,
        field_name: &str,
        pattern: &str,
        options: RegexFilterOptions,
    ) -> Result<Arc<RegexFilter>> {
        self.lookup(pattern, Some(field_name), options)
    }

    fn lookup(
        &self,
        pattern: &str,
        field: Option<&str>,
        options: RegexFilterOptions,
    ) -> Result<Arc<RegexFilter>> {
        let key = Self::cache_key(pattern, field, options);
        let mut cache = self.inner.cache.lock();

        if let Some(filter) = cache.get(&key) {
            self.inner.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(Arc::clone(filter));
        }

        self.inner.misses.fetch_add(1, Ordering::Relaxed);
        let filter = match field {
            None => Arc::new(RegexFilter::new(pattern, options)?),
            Some(field) => Arc::new(RegexFilter::on_field(field, pattern, options)?),
        };
        cache.insert(key, Arc::clone(&filter));
        Ok(filter)
    }

    /// Compile a pattern ahead of time under an explicit name.
    pub fn precompile(
        &self,
        name: &str,
        pattern: &str,
        options: RegexFilterOptions,
    ) -> Result<()> {
        let filter = Arc::new(RegexFilter::new(pattern, options)?);
        self.inner.precompiled.lock().insert(name.to_string(), filter);
        Ok(())
    }

    pub fn get_precompiled(&self, name: &str) -> Option<Arc<RegexFilter>> {
        self.inner.precompiled.lock().get(name).cloned()
    }

    pub fn hit_count(&self) -> u64 {
        self.inner.hits.load(Ordering::Relaxed)
    }

    pub fn miss_count(&self) -> u64 {
        self.inner.misses.load(Ordering::Relaxed)
    }

    pub fn len(&self) -> usize {
        self.inner.cache.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.cache.lock().is_empty()
    }

    pub fn clear(&self) {
        self.inner.cache.lock().clear();
    }
}

impl Default for RegexFilterCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_hit_returns_same_instance() {
        let cache = RegexFilterCache::new();
        let options = RegexFilterOptions::new();

        let first = cache.get_or_create(r"\d+", options).unwrap();
        let second = cache.get_or_create(r"\d+", options).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.hit_count(), 1);
        assert_eq!(cache.miss_count(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_distinct_options_are_distinct_entries() {
        let cache = RegexFilterCache::new();

        let plain = cache.get_or_create(r"x", RegexFilterOptions::new()).unwrap();
        let inverted = cache
            .get_or_create(r"x", RegexFilterOptions::new().invert(true))
            .unwrap();
        let on_field = cache
            .get_or_create_for_field("component", r"x", RegexFilterOptions::new())
            .unwrap();

        assert!(!Arc::ptr_eq(&plain, &inverted));
        assert!(!Arc::ptr_eq(&plain, &on_field));
        assert_eq!(cache.len(), 3);
        assert_eq!(cache.miss_count(), 3);
    }

    #[test]
    fn test_precompile_and_lookup() {
        let cache = RegexFilterCache::new();
        cache
            .precompile("noise", r"heartbeat", RegexFilterOptions::new())
            .unwrap();

        assert!(cache.get_precompiled("noise").is_some());
        assert!(cache.get_precompiled("unknown").is_none());
    }

    #[test]
    fn test_invalid_pattern_is_not_cached() {
        let cache = RegexFilterCache::new();
        assert!(cache.get_or_create(r"(bad", RegexFilterOptions::new()).is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_clear() {
        let cache = RegexFilterCache::new();
        cache.get_or_create(r"x", RegexFilterOptions::new()).unwrap();
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_shared_handle_sees_same_cache() {
        let cache = RegexFilterCache::new();
        let handle = cache.clone();

        cache.get_or_create(r"shared", RegexFilterOptions::new()).unwrap();
        handle.get_or_create(r"shared", RegexFilterOptions::new()).unwrap();

        assert_eq!(cache.hit_count(), 1);
        assert_eq!(cache.len(), 1);
    }
}
