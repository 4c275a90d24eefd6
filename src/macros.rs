//! Logging macros for ergonomic message formatting.
//!
//! Each macro formats its arguments like `format!` and queues the result.
//! They expand to the `Result` returned by the underlying `log` call, so the
//! caller decides whether a closed queue matters.
//!
//! # Examples
//!
//! ```
//! use rust_queue_logger::prelude::*;
//! use rust_queue_logger::{info, warning};
//!
//! # let dir = tempfile::tempdir()?;
//! let logger = Logger::open(dir.path().join("macros.log"), Severity::Info)?;
//!
//! info!(logger, "Server started")?;
//! let port = 8080;
//! warning!(logger, "Port {} already in use, retrying", port)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

/// Queue a formatted message at an explicit severity.
///
/// Works with both [`Logger`](crate::Logger) and [`LogHandle`](crate::LogHandle).
///
/// ```
/// # use rust_queue_logger::prelude::*;
/// # let dir = tempfile::tempdir()?;
/// # let logger = Logger::open(dir.path().join("log.log"), Severity::Info)?;
/// use rust_queue_logger::log;
/// let handle = logger.handle();
/// log!(handle, Severity::Error, "Error code: {}", 500)?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $severity:expr, $($arg:tt)+) => {
        $logger.log($severity, format!($($arg)+))
    };
}

/// Queue a formatted Info message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Info, $($arg)+)
    };
}

/// Queue a formatted Warning message.
#[macro_export]
macro_rules! warning {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Warning, $($arg)+)
    };
}

/// Queue a formatted Error message.
///
/// ```
/// # use rust_queue_logger::prelude::*;
/// # let dir = tempfile::tempdir()?;
/// # let logger = Logger::open(dir.path().join("error.log"), Severity::Info)?;
/// use rust_queue_logger::error;
/// error!(logger, "Failed to connect to {}: {}", "db", "timeout")?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Error, $($arg)+)
    };
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_macros_format_and_queue() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let log_file = temp_dir.path().join("macros.log");

        let mut logger = Logger::open(&log_file, Severity::Info).unwrap();
        crate::info!(logger, "plain").unwrap();
        crate::warning!(logger, "retry {} of {}", 2, 3).unwrap();
        crate::error!(logger.handle(), "code={}", 7).unwrap();
        crate::log!(logger, Severity::Info, "{}-{}", "a", "b").unwrap();
        logger.shutdown().unwrap();

        let content = fs::read_to_string(&log_file).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].ends_with("Info: plain"));
        assert!(lines[1].ends_with("Warning: retry 2 of 3"));
        assert!(lines[2].ends_with("Error: code=7"));
        assert!(lines[3].ends_with("Info: a-b"));
    }
}
