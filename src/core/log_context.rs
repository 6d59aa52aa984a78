//! Thread-local ambient context for log records
//!
//! Fields set here are visible to every filter evaluated on the calling
//! thread, taking precedence over fields carried on the record itself.
//! `ScopedContext` is the RAII companion: keys it introduced are removed
//! again when it drops.

use std::cell::RefCell;
use std::collections::HashMap;

thread_local! {
    static CONTEXT: RefCell<HashMap<String, String>> = RefCell::new(HashMap::new());
}

/// Ambient per-thread key/value context.
pub struct LogContext;

impl LogContext {
    pub fn set(key: impl Into<String>, value: impl Into<String>) {
        CONTEXT.with(|ctx| {
            ctx.borrow_mut().insert(key.into(), value.into());
        });
    }

    pub fn get(key: &str) -> Option<String> {
        CONTEXT.with(|ctx| ctx.borrow().get(key).cloned())
    }

    pub fn contains(key: &str) -> bool {
        CONTEXT.with(|ctx| ctx.borrow().contains_key(key))
    }

    pub fn remove(key: &str) {
        CONTEXT.with(|ctx| {
            ctx.borrow_mut().remove(key);
        });
    }

    pub fn clear() {
        CONTEXT.with(|ctx| ctx.borrow_mut().clear());
    }

    pub fn get_all() -> HashMap<String, String> {
        CONTEXT.with(|ctx| ctx.borrow().clone())
    }
}

/// RAII guard for scoped ambient fields.
///
/// Only keys first introduced through this guard are removed on drop;
/// a key that already existed in the ambient context is left alone.
#[derive(Default)]
pub struct ScopedContext {
    scoped_keys: Vec<String>,
}

impl ScopedContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let key = key.into();
        if !LogContext::contains(&key) {
            self.scoped_keys.push(key.clone());
        }
        LogContext::set(key, value);
        self
    }

    pub fn remove(&mut self, key: &str) -> &mut Self {
        LogContext::remove(key);
        self.scoped_keys.retain(|k| k != key);
        self
    }

    pub fn get(&self, key: &str) -> Option<String> {
        LogContext::get(key)
    }
}

impl Drop for ScopedContext {
    fn drop(&mut self) {
        for key in &self.scoped_keys {
            LogContext::remove(key);
        }
    }
}
