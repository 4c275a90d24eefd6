//! Queued log record

use super::severity::Severity;

/// One unit of log data: an immutable message tagged with a severity.
///
/// Created by a producer at enqueue time and consumed exactly once by the
/// dispatcher. The message is kept verbatim; line breaks are escaped when
/// the line is rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    message: String,
    severity: Severity,
}

impl Record {
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_kept_verbatim() {
        let record = Record::new("Hello World\twith tab\nand newline", Severity::Warning);
        assert_eq!(record.message(), "Hello World\twith tab\nand newline");
        assert_eq!(record.severity(), Severity::Warning);
    }
}
