//! Internal logging facility for flux_viz_engine.
//!
//! This module provides a flexible logging system with:
//! - Customizable logger via the `Logger` trait
//! - Severity levels (Trace, Debug, Info, Warn, Error)
//! - Colored console output by default
//! - Thread-safe logging with RwLock
//! - File and line information for detailed ERROR logs
//!
//! Logging is a crate-wide ambient singleton (unlike `EngineConfig`, which
//! is owned by the caller) because it is cross-cutting diagnostic
//! infrastructure rather than domain state that needs to be test-injected
//! per engine instance.

use colored::*;
use std::sync::{OnceLock, RwLock};
use std::time::SystemTime;
use chrono::{DateTime, Local};

/// Logger trait for custom logging implementations.
///
/// Implement this to route engine diagnostics somewhere other than stdout
/// (a file, a host application's own log pipe, a test capture buffer).
pub trait Logger: Send + Sync {
    /// Log an entry.
    fn log(&self, entry: &LogEntry);
}

/// Log entry containing all information about a log message.
#[derive(Debug, Clone)]
pub struct LogEntry {
    /// Severity level.
    pub severity: LogSeverity,
    /// Timestamp when the log was created.
    pub timestamp: SystemTime,
    /// Source tag (e.g. `"flux::tier"`, `"flux::lod"`).
    pub source: String,
    /// Log message.
    pub message: String,
    /// Source file (only for detailed ERROR logs).
    pub file: Option<&'static str>,
    /// Source line (only for detailed ERROR logs).
    pub line: Option<u32>,
}

/// Log severity levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogSeverity {
    /// Very verbose debug information (typically disabled in release).
    Trace,
    /// Development/debugging information.
    Debug,
    /// Important informational messages.
    Info,
    /// Warning messages (potential issues, clamped configuration, ...).
    Warn,
    /// Error messages (critical issues with file:line details).
    Error,
}

/// Default logger implementation using colored console output.
///
/// Format:
/// - Normal: `[timestamp] [SEVERITY] [source] message`
/// - Error: `[timestamp] [ERROR] [source] message (file:line)`
pub struct DefaultLogger;

impl Logger for DefaultLogger {
    fn log(&self, entry: &LogEntry) {
        let datetime: DateTime<Local> = entry.timestamp.into();
        let timestamp = datetime.format("%Y-%m-%d %H:%M:%S%.3f").to_string();

        let severity_str = match entry.severity {
            LogSeverity::Trace => "TRACE".bright_black(),
            LogSeverity::Debug => "DEBUG".cyan(),
            LogSeverity::Info => "INFO ".green(),
            LogSeverity::Warn => "WARN ".yellow(),
            LogSeverity::Error => "ERROR".red().bold(),
        };

        let source = entry.source.bright_blue();

        if let (Some(file), Some(line)) = (entry.file, entry.line) {
            println!(
                "[{}] [{}] [{}] {} ({}:{})",
                timestamp, severity_str, source, entry.message, file, line
            );
        } else {
            println!("[{}] [{}] [{}] {}", timestamp, severity_str, source, entry.message);
        }
    }
}

// ===== GLOBAL LOGGER STATE =====

static LOGGER: OnceLock<RwLock<Box<dyn Logger>>> = OnceLock::new();

fn logger() -> &'static RwLock<Box<dyn Logger>> {
    LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)))
}

/// Install a custom logger, replacing whatever was registered before.
pub fn set_logger<L: Logger + 'static>(custom: L) {
    if let Ok(mut guard) = logger().write() {
        *guard = Box::new(custom);
    }
}

/// Restore the default colored-console logger.
pub fn reset_logger() {
    if let Ok(mut guard) = logger().write() {
        *guard = Box::new(DefaultLogger);
    }
}

/// Log a message without file:line information.
pub fn log(severity: LogSeverity, source: &str, message: String) {
    let entry = LogEntry {
        severity,
        timestamp: SystemTime::now(),
        source: source.to_string(),
        message,
        file: None,
        line: None,
    };
    if let Ok(guard) = logger().read() {
        guard.log(&entry);
    }
}

/// Log a message with file:line information (used by `flux_error!`).
pub fn log_detailed(severity: LogSeverity, source: &str, message: String, file: &'static str, line: u32) {
    let entry = LogEntry {
        severity,
        timestamp: SystemTime::now(),
        source: source.to_string(),
        message,
        file: Some(file),
        line: Some(line),
    };
    if let Ok(guard) = logger().read() {
        guard.log(&entry);
    }
}

// ===== LOGGING MACROS =====

/// Log a TRACE message.
#[macro_export]
macro_rules! flux_trace {
    ($source:expr, $($arg:tt)*) => {
        $crate::log::log($crate::log::LogSeverity::Trace, $source, format!($($arg)*))
    };
}

/// Log a DEBUG message.
#[macro_export]
macro_rules! flux_debug {
    ($source:expr, $($arg:tt)*) => {
        $crate::log::log($crate::log::LogSeverity::Debug, $source, format!($($arg)*))
    };
}

/// Log an INFO message.
#[macro_export]
macro_rules! flux_info {
    ($source:expr, $($arg:tt)*) => {
        $crate::log::log($crate::log::LogSeverity::Info, $source, format!($($arg)*))
    };
}

/// Log a WARN message.
#[macro_export]
macro_rules! flux_warn {
    ($source:expr, $($arg:tt)*) => {
        $crate::log::log($crate::log::LogSeverity::Warn, $source, format!($($arg)*))
    };
}

/// Log an ERROR message with file:line information.
#[macro_export]
macro_rules! flux_error {
    ($source:expr, $($arg:tt)*) => {
        $crate::log::log_detailed($crate::log::LogSeverity::Error, $source, format!($($arg)*), file!(), line!())
    };
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
