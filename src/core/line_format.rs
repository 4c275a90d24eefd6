//! Log line rendering
//!
//! Every record is written as a single line:
//!
//! ```text
//! [2025-01-08 10:30:45] Warning: disk almost full
//! ```
//!
//! The timestamp is local wall-clock time at second resolution. Line breaks
//! inside a message are escaped, so a message can never start a line of its
//! own.

use super::severity::Severity;
use chrono::{DateTime, Local};
use std::borrow::Cow;

/// strftime pattern for the bracketed timestamp
pub const LINE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Render a timestamp with [`LINE_TIMESTAMP_FORMAT`].
#[must_use]
pub fn format_timestamp(timestamp: &DateTime<Local>) -> String {
    timestamp.format(LINE_TIMESTAMP_FORMAT).to_string()
}

/// Replace `\n` and `\r` with their escaped forms.
#[must_use]
pub fn escape_line_breaks(message: &str) -> Cow<'_, str> {
    if message.contains(['\n', '\r']) {
        Cow::Owned(message.replace('\n', "\\n").replace('\r', "\\r"))
    } else {
        Cow::Borrowed(message)
    }
}

/// Render one newline-terminated log line.
///
/// # Examples
///
/// ```
/// use chrono::{Local, TimeZone};
/// use rust_queue_logger::core::line_format::format_line;
/// use rust_queue_logger::Severity;
///
/// let at = Local.with_ymd_and_hms(2025, 1, 8, 9, 5, 3).unwrap();
/// let line = format_line(&at, Severity::Error, "boom");
/// assert_eq!(line, "[2025-01-08 09:05:03] Error: boom\n");
/// ```
#[must_use]
pub fn format_line(timestamp: &DateTime<Local>, severity: Severity, message: &str) -> String {
    let timestamp_str = format_timestamp(timestamp);
    let message = escape_line_breaks(message);
    let mut line =
        String::with_capacity(timestamp_str.len() + severity.name().len() + message.len() + 6);
    line.push('[');
    line.push_str(&timestamp_str);
    line.push_str("] ");
    line.push_str(severity.name());
    line.push_str(": ");
    line.push_str(&message);
    line.push('\n');
    line
}
