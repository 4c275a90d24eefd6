//! Sink implementations

pub mod file;

pub use file::FileSink;

// Re-export the trait alongside its implementations
pub use crate::core::{RecordOutcome, Sink};
