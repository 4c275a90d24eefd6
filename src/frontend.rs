//! Line-oriented input front end
//!
//! Each input line is one of:
//!
//! - `exit`: stop reading and let the caller shut the logger down
//! - `Set level: <name>`: change the threshold immediately
//! - `<name>: <message>`: queue `<message>` at severity `<name>`
//! - anything else: queue the whole line as an Info message
//!
//! Unknown level names map to Info in both positions.

use crate::core::{LogHandle, Result, Severity};
use std::io::{BufRead, Write};

const EXIT_COMMAND: &str = "exit";
const SET_LEVEL_PREFIX: &str = "Set level:";

/// A classified input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Log { message: String, severity: Severity },
    SetThreshold { severity: Severity, raw: String },
    Exit,
}

/// Why [`Frontend::run`] stopped reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    ExitCommand,
    EndOfInput,
}

/// Classify one line of input (without its line terminator).
pub fn parse_line(line: &str) -> Command {
    if line == EXIT_COMMAND {
        return Command::Exit;
    }

    if let Some(rest) = line.strip_prefix(SET_LEVEL_PREFIX) {
        // The character right after the colon is a separator and is skipped
        // whatever it is; nothing else is trimmed.
        let mut chars = rest.chars();
        chars.next();
        let raw = chars.as_str();
        return Command::SetThreshold {
            severity: Severity::parse_lenient(raw),
            raw: raw.to_string(),
        };
    }

    match line.split_once(':') {
        Some((prefix, rest)) => Command::Log {
            message: rest.trim_matches([' ', '\t']).to_string(),
            severity: Severity::parse_lenient(prefix),
        },
        None => Command::Log {
            message: line.to_string(),
            severity: Severity::Info,
        },
    }
}

/// Feeds parsed input lines into a logger.
pub struct Frontend {
    handle: LogHandle,
}

impl Frontend {
    pub fn new(handle: LogHandle) -> Self {
        Self { handle }
    }

    /// Process a single line, writing any acknowledgement to `out`.
    ///
    /// Returns `false` when the line asks to stop.
    pub fn handle_line<W: Write>(&self, line: &str, out: &mut W) -> Result<bool> {
        match parse_line(line) {
            Command::Exit => Ok(false),
            Command::SetThreshold { severity, raw } => {
                self.handle.set_threshold(severity);
                writeln!(out, "Default log level changed to {}", raw)?;
                out.flush()?;
                Ok(true)
            }
            Command::Log { message, severity } => {
                self.handle.log(severity, message)?;
                Ok(true)
            }
        }
    }

    /// Read `input` line by line until `exit` or end of input.
    ///
    /// Bytes that are not valid UTF-8 are replaced with U+FFFD rather than
    /// ending the session. Queued messages are not echoed. Shutting the
    /// logger down afterwards is the caller's job.
    pub fn run<R: BufRead, W: Write>(&self, mut input: R, mut out: W) -> Result<StopReason> {
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if input.read_until(b'\n', &mut buf)? == 0 {
                return Ok(StopReason::EndOfInput);
            }
            let line = String::from_utf8_lossy(strip_line_terminator(&buf));
            if !self.handle_line(&line, &mut out)? {
                return Ok(StopReason::ExitCommand);
            }
        }
    }
}

/// Drop a trailing `\n` or `\r\n`.
fn strip_line_terminator(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}
