//! Sink trait for the record destination driven by the dispatcher

use super::{error::Result, severity::Severity};

/// What a sink did with a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    /// The record passed the threshold and was written out.
    Written,
    /// The record was below the threshold and ignored.
    Filtered,
}

/// Destination for records, owning its own threshold.
///
/// Implementations must make the threshold comparison and the write atomic
/// with respect to [`Sink::set_threshold`].
pub trait Sink: Send + Sync {
    fn record(&self, message: &str, severity: Severity) -> Result<RecordOutcome>;
    fn set_threshold(&self, threshold: Severity);
    fn threshold(&self) -> Severity;
    fn flush(&self) -> Result<()>;
    fn name(&self) -> &str;
}
