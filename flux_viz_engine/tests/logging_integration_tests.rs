//! Integration tests for the global logging facility.
//!
//! Run with: cargo test --test logging_integration_tests

use flux_viz_engine::log::{self, LogEntry, LogSeverity, Logger};
use std::sync::{Arc, Mutex};
use serial_test::serial;

/// Test logger that captures log entries for verification.
struct TestLogger {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl TestLogger {
    fn new() -> (Self, Arc<Mutex<Vec<LogEntry>>>) {
        let entries = Arc::new(Mutex::new(Vec::new()));
        (Self { entries: entries.clone() }, entries)
    }
}

impl Logger for TestLogger {
    fn log(&self, entry: &LogEntry) {
        self.entries.lock().unwrap().push(entry.clone());
    }
}

#[test]
#[serial]
fn test_integration_custom_logger() {
    let (test_logger, entries) = TestLogger::new();
    log::set_logger(test_logger);

    log::log(LogSeverity::Info, "test::module", "Test info message".to_string());
    log::log(LogSeverity::Warn, "test::module", "Test warning message".to_string());
    log::log(LogSeverity::Error, "test::module", "Test error message".to_string());

    let captured = entries.lock().unwrap();
    assert_eq!(captured.len(), 3);
    assert_eq!(captured[0].severity, LogSeverity::Info);
    assert_eq!(captured[1].severity, LogSeverity::Warn);
    assert_eq!(captured[2].severity, LogSeverity::Error);

    log::reset_logger();
}

#[test]
#[serial]
fn test_integration_error_logging_with_location() {
    let (test_logger, entries) = TestLogger::new();
    log::set_logger(test_logger);

    log::log_detailed(
        LogSeverity::Error,
        "test::error",
        "Critical error occurred".to_string(),
        "test_file.rs",
        42,
    );

    let captured = entries.lock().unwrap();
    assert_eq!(captured.len(), 1);
    assert_eq!(captured[0].file, Some("test_file.rs"));
    assert_eq!(captured[0].line, Some(42));

    log::reset_logger();
}

#[test]
#[serial]
fn test_integration_logger_reset() {
    let (test_logger, entries) = TestLogger::new();
    log::set_logger(test_logger);

    log::log(LogSeverity::Info, "test", "Message 1".to_string());
    assert_eq!(entries.lock().unwrap().len(), 1);

    log::reset_logger();
    log::log(LogSeverity::Info, "test", "Message 2".to_string());

    // reset_logger swapped the global back to DefaultLogger, so the
    // captured buffer (owned by the now-dropped TestLogger) sees nothing new.
    assert_eq!(entries.lock().unwrap().len(), 1);
}

#[test]
#[serial]
fn test_integration_logging_all_severities() {
    let (test_logger, entries) = TestLogger::new();
    log::set_logger(test_logger);

    for severity in [
        LogSeverity::Trace,
        LogSeverity::Debug,
        LogSeverity::Info,
        LogSeverity::Warn,
        LogSeverity::Error,
    ] {
        log::log(severity, "test", format!("{:?} message", severity));
    }

    assert_eq!(entries.lock().unwrap().len(), 5);
    log::reset_logger();
}
