//! Process-level logger configuration

use crate::core::{Logger, Result, Severity};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where to log and the initial threshold.
///
/// Deserializable so hosts can embed it in their own configuration files:
///
/// ```
/// use rust_queue_logger::{LoggerConfig, Severity};
///
/// let config: LoggerConfig =
///     serde_json::from_str(r#"{ "path": "app.log", "threshold": "Warning" }"#).unwrap();
/// assert_eq!(config.threshold, Severity::Warning);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerConfig {
    pub path: PathBuf,
    #[serde(default)]
    pub threshold: Severity,
}

/// Outcome of reading an optional level name from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelSource {
    /// No level was given; the default applies
    Default,
    /// The given name was recognized
    Parsed,
    /// The given name was not recognized and Info was used instead
    Unrecognized,
}

impl LoggerConfig {
    pub fn new(path: impl Into<PathBuf>, threshold: Severity) -> Self {
        Self {
            path: path.into(),
            threshold,
        }
    }

    /// Build a config from raw command-line values.
    ///
    /// The level name is matched case-insensitively; a missing or unknown
    /// name yields `Info`. The returned [`LevelSource`] tells the caller
    /// whether to warn about an unknown name.
    pub fn from_cli(path: impl Into<PathBuf>, level: Option<&str>) -> (Self, LevelSource) {
        let (threshold, source) = match level {
            None => (Severity::default(), LevelSource::Default),
            Some(name) => match name.parse::<Severity>() {
                Ok(severity) => (severity, LevelSource::Parsed),
                Err(_) => (Severity::Info, LevelSource::Unrecognized),
            },
        };
        (Self::new(path, threshold), source)
    }

    /// Open the log file and start the dispatcher.
    pub fn open(&self) -> Result<Logger> {
        Logger::builder()
            .path(self.path.clone())
            .threshold(self.threshold)
            .build()
    }
}
