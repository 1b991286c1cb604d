//! Error types for the flux_viz_engine core.
//!
//! The taxonomy covers the failure classes a caller can observe directly
//! (`Configuration`, `Capability`, `SurfaceLifecycle`, `Fatal`); two other
//! classes named in the design (numeric NaN/Infinity, subscriber faults)
//! never surface as an `Err` — they are filtered or caught internally and
//! reported through an `EngineEvent::Error` instead (see `tier::events`).

use std::fmt;

/// Result type for flux_viz_engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors the engine can return to a caller.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Invalid threshold or budget configuration that could not be
    /// auto-corrected by clamping (clampable cases are handled silently
    /// with a warning event, not an `Err` — see `tier::thresholds`).
    Configuration(String),

    /// A requested tier or capability is not supported by the registered
    /// surfaces on this device.
    Capability(String),

    /// A surface lifecycle contract was violated (render on a destroyed
    /// surface, double registration for the same tier, ...).
    SurfaceLifecycle(String),

    /// No surfaces at all are registered; there is nothing to fall back to.
    Fatal(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Configuration(msg) => write!(f, "configuration error: {}", msg),
            Error::Capability(msg) => write!(f, "capability error: {}", msg),
            Error::SurfaceLifecycle(msg) => write!(f, "surface lifecycle error: {}", msg),
            Error::Fatal(msg) => write!(f, "fatal error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl Error {
    /// Severity an instance of this variant should be logged at.
    fn severity(&self) -> crate::log::LogSeverity {
        match self {
            Error::Configuration(_) => crate::log::LogSeverity::Warn,
            Error::Capability(_) => crate::log::LogSeverity::Warn,
            Error::SurfaceLifecycle(_) => crate::log::LogSeverity::Error,
            Error::Fatal(_) => crate::log::LogSeverity::Error,
        }
    }

    /// Log this error at its default severity, then return it unchanged.
    /// Lives on `Error` itself rather than a central engine type, since
    /// this crate has no global singleton to hang the helper off of.
    pub fn log_and_return(self, source: &str) -> Self {
        crate::log::log(self.severity(), source, self.to_string());
        self
    }
}

/// Build an `Error` of the given variant, logging it at the call site.
///
/// ```ignore
/// return Err(flux_err!(Configuration, "flux::tier", "ras_to_accel {} < vec_to_ras {}", a, b));
/// ```
#[macro_export]
macro_rules! flux_err {
    ($variant:ident, $source:expr, $($arg:tt)*) => {
        $crate::error::Error::$variant(format!($($arg)*)).log_and_return($source)
    };
}

/// Build and early-return an `Error` of the given variant.
#[macro_export]
macro_rules! flux_bail {
    ($variant:ident, $source:expr, $($arg:tt)*) => {
        return Err($crate::flux_err!($variant, $source, $($arg)*))
    };
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
