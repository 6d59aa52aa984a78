//! Sensitive-data redaction configuration
//!
//! A pure string transform applied by the dispatch path: substring patterns
//! are masked with '*' of equal length, regex and PII-preset matches are
//! replaced with `***`. Patterns compile when configured, never on the log
//! path, and invalid input is rejected there as an error.

use super::error::{LoggerError, Result};
use regex::Regex;

/// Replacement for regex and preset matches.
pub const REDACTED: &str = "***";

/// Built-in PII presets addressable by name.
fn preset_pattern(name: &str) -> Option<&'static str> {
    match name.to_lowercase().as_str() {
        "email" => Some(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}"),
        "ipv4" => Some(r"(25[0-5]|2[0-4]\d|[01]?\d?\d)(\.(25[0-5]|2[0-4]\d|[01]?\d?\d)){3}"),
        "credit_card" => Some(r"\b(\d[ -]*?){13,16}\b"),
        "ssn" => Some(r"\b\d{3}-\d{2}-\d{4}\b"),
        _ => None,
    }
}

#[derive(Debug, Clone, Default)]
pub struct RedactionConfig {
    substrings: Vec<String>,
    regexes: Vec<Regex>,
    preset_regexes: Vec<Regex>,
    cloud_only: bool,
}

impl RedactionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the literal substring patterns.
    pub fn set_substrings(&mut self, patterns: Vec<String>) {
        self.substrings = patterns;
    }

    /// Replace the regex patterns, compiling them up front.
    pub fn set_regex_patterns(&mut self, patterns: &[String]) -> Result<()> {
        let mut compiled = Vec::with_capacity(patterns.len());
        for pattern in patterns {
            let regex = Regex::new(pattern)
                .map_err(|e| LoggerError::invalid_pattern(pattern, e.to_string()))?;
            compiled.push(regex);
        }
        self.regexes = compiled;
        Ok(())
    }

    /// Replace the named PII presets; unknown names are rejected.
    pub fn set_pii_presets(&mut self, presets: &[String]) -> Result<()> {
        let mut compiled = Vec::with_capacity(presets.len());
        for preset in presets {
            let pattern = preset_pattern(preset).ok_or_else(|| {
                LoggerError::config("redaction", format!("unknown PII preset '{}'", preset))
            })?;
            // Preset patterns are constants; compilation cannot fail.
            let regex = Regex::new(pattern)
                .map_err(|e| LoggerError::invalid_pattern(pattern, e.to_string()))?;
            compiled.push(regex);
        }
        self.preset_regexes = compiled;
        Ok(())
    }

    /// Route the redacted copy to cloud sinks only (default: all sinks).
    pub fn set_cloud_only(&mut self, cloud_only: bool) {
        self.cloud_only = cloud_only;
    }

    pub fn cloud_only(&self) -> bool {
        self.cloud_only
    }

    pub fn clear(&mut self) {
        self.substrings.clear();
        self.regexes.clear();
        self.preset_regexes.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.substrings.is_empty() && self.regexes.is_empty() && self.preset_regexes.is_empty()
    }

    /// Compute the redacted copy of a message.
    pub fn apply(&self, message: &str) -> String {
        let mut redacted = message.to_string();

        for pattern in &self.substrings {
            if pattern.is_empty() {
                continue;
            }
            let mask = "*".repeat(pattern.len());
            redacted = redacted.replace(pattern.as_str(), &mask);
        }

        for regex in self.regexes.iter().chain(self.preset_regexes.iter()) {
            redacted = regex.replace_all(&redacted, REDACTED).into_owned();
        }

        redacted
    }
}
