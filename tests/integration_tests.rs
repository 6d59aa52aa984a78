//! Integration tests for the dispatch engine
//!
//! These tests verify:
//! - Level gating and sink fan-out end to end
//! - Temporary level overrides with lazy reversion and audit history
//! - Filter chains installed on a live logger
//! - Redaction routing across cloud and local sinks
//! - Control-plane level change requests

use logflow::core::level_control::handle_level_change_request;
use logflow::core::log_context::LogContext;
use logflow::core::log_level::LogLevel;
use logflow::core::logger::Logger;
use logflow::core::sink::Sink;
use logflow::filters::{CompositeFilter, FieldFilter, FilterMode, LevelFilter};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Sink that collects every delivered message.
struct CollectingSink {
    writes: Mutex<Vec<(LogLevel, String)>>,
    cloud: bool,
}

impl CollectingSink {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            writes: Mutex::new(Vec::new()),
            cloud: false,
        })
    }

    fn cloud() -> Arc<Self> {
        Arc::new(Self {
            writes: Mutex::new(Vec::new()),
            cloud: true,
        })
    }

    fn messages(&self) -> Vec<String> {
        self.writes.lock().iter().map(|(_, m)| m.clone()).collect()
    }

    fn count(&self) -> usize {
        self.writes.lock().len()
    }
}

impl Sink for CollectingSink {
    fn write(&self, _logger_name: &str, level: LogLevel, message: &str) {
        self.writes.lock().push((level, message.to_string()));
    }

    fn is_cloud(&self) -> bool {
        self.cloud
    }
}

#[test]
fn test_level_gate_and_fan_out() {
    let first = CollectingSink::new();
    let second = CollectingSink::new();

    let logger = Logger::builder("app")
        .min_level(LogLevel::Info)
        .sink(first.clone())
        .sink(second.clone())
        .build();

    logger.debug("below threshold");
    logger.info("delivered everywhere");
    logger.error("also delivered");

    assert_eq!(first.messages(), vec!["delivered everywhere", "also delivered"]);
    assert_eq!(second.count(), 2);

    let snapshot = logger.snapshot();
    assert_eq!(snapshot.dispatched, 2);
    assert_eq!(snapshot.level_suppressed, 1);
    assert_eq!(snapshot.filtered, 0);
}

#[test]
fn test_temporary_level_expires_lazily() {
    let sink = CollectingSink::new();
    let logger = Logger::builder("app")
        .min_level(LogLevel::Warn)
        .sink(sink.clone())
        .build();

    logger.set_level_temporary(LogLevel::Debug, Duration::from_millis(50), "incident");
    assert!(logger.has_temporary_level());
    logger.debug("visible during override");

    std::thread::sleep(Duration::from_millis(80));

    // The next call observes the expiry and reverts before gating.
    logger.debug("suppressed after expiry");
    assert_eq!(logger.get_level(), LogLevel::Warn);
    assert!(!logger.has_temporary_level());
    assert_eq!(sink.messages(), vec!["visible during override"]);

    let history = logger.get_level_history(10);
    assert_eq!(history.len(), 2);
    assert!(history[0].reason.contains("incident"));
    assert_eq!(history[1].reason, "Temporary level expired");
    assert_eq!(history[1].new_level, LogLevel::Warn);
}

#[test]
fn test_composite_filter_on_logger() {
    let sink = CollectingSink::new();
    let logger = Logger::builder("app")
        .min_level(LogLevel::Trace)
        .sink(sink.clone())
        .build();

    LogContext::clear();
    let composite = CompositeFilter::new(FilterMode::Or)
        .with_filter(Arc::new(LevelFilter::new(LogLevel::Error)))
        .with_filter(Arc::new(FieldFilter::new("urgent", "true")));
    logger.add_filter(Arc::new(composite));

    logger.info("dropped quietly");
    logger.error("kept by level");

    let mut fields = HashMap::new();
    fields.insert("urgent".to_string(), "true".to_string());
    logger.log_with_fields(LogLevel::Debug, "kept by field", fields);

    assert_eq!(sink.messages(), vec!["kept by level", "kept by field"]);
    assert_eq!(logger.metrics().filtered(), 1);
}

#[test]
fn test_ambient_context_flows_through_dispatch() {
    let sink = CollectingSink::new();
    let logger = Logger::builder("app")
        .min_level(LogLevel::Trace)
        .sink(sink.clone())
        .filter(Arc::new(FieldFilter::new("tenant", "acme")))
        .build();

    LogContext::clear();
    logger.info("no tenant set");

    LogContext::set("tenant", "acme");
    logger.info("tenant matches");
    LogContext::clear();

    assert_eq!(sink.messages(), vec!["tenant matches"]);
}

#[test]
fn test_redaction_routing() {
    let local = CollectingSink::new();
    let cloud = CollectingSink::cloud();

    let logger = Logger::builder("app")
        .min_level(LogLevel::Info)
        .sink(local.clone())
        .sink(cloud.clone())
        .build();

    logger
        .set_redact_pii_presets(&["email".to_string()])
        .unwrap();
    logger.set_redact_cloud_only(true);

    logger.info("contact alice@example.com for details");

    assert_eq!(local.messages(), vec!["contact alice@example.com for details"]);
    assert_eq!(cloud.messages(), vec!["contact *** for details"]);

    // Switch to redacting everywhere.
    logger.set_redact_cloud_only(false);
    logger.info("bob@example.com again");
    assert_eq!(local.messages()[1], "*** again");
    assert_eq!(cloud.messages()[1], "*** again");
}

#[test]
fn test_invalid_redaction_pattern_leaves_config_intact() {
    let sink = CollectingSink::new();
    let logger = Logger::builder("app")
        .min_level(LogLevel::Info)
        .sink(sink.clone())
        .build();

    logger
        .set_redact_regex_patterns(&[r"\d{4}".to_string()])
        .unwrap();
    assert!(logger
        .set_redact_regex_patterns(&["(broken".to_string()])
        .is_err());

    // The previous valid set still applies.
    logger.info("pin 1234 ok");
    assert_eq!(sink.messages(), vec!["pin *** ok"]);
}

#[test]
fn test_control_plane_round_trip() {
    let logger = Logger::new("control");
    logger.set_level(LogLevel::Info);

    let response = handle_level_change_request(&logger, "warning", "noise reduction", 0);
    assert!(response.success);
    assert_eq!(response.current_level, LogLevel::Warn);
    assert_eq!(logger.get_level(), LogLevel::Warn);

    let response = handle_level_change_request(&logger, "trace", "debugging", 30);
    assert!(response.success);
    assert!(logger.has_temporary_level());
    assert_eq!(logger.get_level(), LogLevel::Trace);

    let json = response.to_json().unwrap();
    assert!(json.contains("\"logger_name\": \"control\""));

    logger.cancel_temporary_level();
    assert_eq!(logger.get_level(), LogLevel::Warn);
}

#[test]
fn test_async_end_to_end() {
    let sink = CollectingSink::new();
    let mut logger = Logger::builder("async-app")
        .min_level(LogLevel::Info)
        .sink(sink.clone())
        .async_mode()
        .build();

    for i in 0..200 {
        logger.info(format!("event {}", i));
    }

    assert!(logger.shutdown(Duration::from_secs(5)));
    assert_eq!(sink.count(), 200);
    assert_eq!(logger.dropped_on_shutdown(), 0);

    // Everything after shutdown is discarded without panicking.
    logger.info("after shutdown");
    assert_eq!(sink.count(), 200);
}

#[test]
fn test_named_sink_lifecycle() {
    let audit = CollectingSink::new();
    let debug = CollectingSink::new();

    let logger = Logger::builder("app")
        .min_level(LogLevel::Trace)
        .named_sink(audit.clone(), "audit")
        .named_sink(debug.clone(), "debug")
        .build();

    logger.set_sink_level_by_name("audit", LogLevel::Error);
    logger.info("routine");
    logger.error("incident");

    assert_eq!(audit.messages(), vec!["incident"]);
    assert_eq!(debug.count(), 2);

    assert!(logger.remove_sink("debug", true));
    logger.error("post removal");
    assert_eq!(debug.count(), 2);
    assert_eq!(audit.count(), 2);
    assert_eq!(logger.sink_count(), 1);
}
