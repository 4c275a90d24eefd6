//! File sink implementation

use crate::core::line_format::format_line;
use crate::core::{LoggerError, RecordOutcome, Result, Severity, Sink};
use chrono::Local;
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

struct FileSinkState {
    writer: BufWriter<File>,
    threshold: Severity,
}

/// Append-only log file with a minimum-severity threshold.
///
/// The writer and the threshold live behind one lock, so a threshold change
/// is never observed halfway through a `record` call. Each written line is
/// flushed before the lock is released; a crash loses at most the record in
/// flight.
pub struct FileSink {
    path: PathBuf,
    state: Mutex<FileSinkState>,
}

impl FileSink {
    /// Open `path` for appending, creating it if needed.
    ///
    /// Fails immediately with [`LoggerError::IoOperation`] when the file
    /// cannot be opened (missing directory, permissions, ...).
    pub fn new(path: impl Into<PathBuf>, threshold: Severity) -> Result<Self> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| LoggerError::io_operation("opening log file", &path, e))?;

        Ok(Self {
            path,
            state: Mutex::new(FileSinkState {
                writer: BufWriter::new(file),
                threshold,
            }),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Sink for FileSink {
    fn record(&self, message: &str, severity: Severity) -> Result<RecordOutcome> {
        let mut state = self.state.lock();
        if severity < state.threshold {
            return Ok(RecordOutcome::Filtered);
        }

        let line = format_line(&Local::now(), severity, message);
        state.writer.write_all(line.as_bytes())?;
        state.writer.flush()?;
        Ok(RecordOutcome::Written)
    }

    fn set_threshold(&self, threshold: Severity) {
        self.state.lock().threshold = threshold;
    }

    fn threshold(&self) -> Severity {
        self.state.lock().threshold
    }

    fn flush(&self) -> Result<()> {
        self.state.lock().writer.flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "file"
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        // The file itself is closed when the writer drops right after this.
        if let Err(e) = self.state.get_mut().writer.flush() {
            eprintln!(
                "[LOGGER ERROR] Final flush of '{}' failed: {}",
                self.path.display(),
                e
            );
        }
    }
}
