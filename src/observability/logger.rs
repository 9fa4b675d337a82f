//! Structured JSON logger for store events
//!
//! - Structured logs (JSON)
//! - Deterministic key ordering
//! - Explicit severity levels
//! - One log line = one event
//! - Synchronous, no buffering
//!
//! Output is routed through a [`LogSink`]: disabled, stdout, or a
//! caller-supplied closure that receives each formatted line.

use std::fmt;
use std::io::{self, Write};

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Debug-level detail
    Trace = 0,
    /// Normal operations
    Info = 1,
    /// Recoverable issues
    Warn = 2,
    /// Operation failures
    Error = 3,
}

impl Severity {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Destination for formatted log lines.
pub enum LogSink {
    /// Logging disabled; events are dropped.
    Off,
    /// Events are written to stdout.
    Stdout,
    /// Events are passed to a caller-supplied sink function.
    Custom(Box<dyn Fn(&str) + Send>),
}

impl Default for LogSink {
    fn default() -> Self {
        LogSink::Off
    }
}

impl fmt::Debug for LogSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogSink::Off => write!(f, "LogSink::Off"),
            LogSink::Stdout => write!(f, "LogSink::Stdout"),
            LogSink::Custom(_) => write!(f, "LogSink::Custom"),
        }
    }
}

/// A structured logger that outputs one JSON line per event.
///
/// Fields are emitted in deterministic order (alphabetical by key) so the
/// same event always produces the same line.
#[derive(Debug, Default)]
pub struct Logger {
    sink: LogSink,
}

impl Logger {
    /// Creates a logger writing to the given sink.
    pub fn new(sink: LogSink) -> Self {
        Self { sink }
    }

    /// Returns true if events will be emitted anywhere.
    pub fn enabled(&self) -> bool {
        !matches!(self.sink, LogSink::Off)
    }

    /// Log an event with the given severity and fields.
    pub fn log(&self, severity: Severity, event: &str, fields: &[(&str, &str)]) {
        match &self.sink {
            LogSink::Off => {}
            LogSink::Stdout => {
                let line = format_line(severity, event, fields);
                let mut out = io::stdout();
                let _ = out.write_all(line.as_bytes());
                let _ = out.flush();
            }
            LogSink::Custom(f) => {
                let line = format_line(severity, event, fields);
                f(line.trim_end());
            }
        }
    }

    /// Log at TRACE level
    pub fn trace(&self, event: &str, fields: &[(&str, &str)]) {
        self.log(Severity::Trace, event, fields);
    }

    /// Log at INFO level
    pub fn info(&self, event: &str, fields: &[(&str, &str)]) {
        self.log(Severity::Info, event, fields);
    }

    /// Log at WARN level
    pub fn warn(&self, event: &str, fields: &[(&str, &str)]) {
        self.log(Severity::Warn, event, fields);
    }

    /// Log at ERROR level
    pub fn error(&self, event: &str, fields: &[(&str, &str)]) {
        self.log(Severity::Error, event, fields);
    }
}

/// Builds the JSON line for an event.
///
/// JSON is assembled manually to guarantee deterministic key ordering:
/// `event` first, then `severity`, then fields sorted alphabetically.
fn format_line(severity: Severity, event: &str, fields: &[(&str, &str)]) -> String {
    let mut output = String::with_capacity(256);

    output.push('{');

    output.push_str("\"event\":\"");
    escape_json_string(&mut output, event);
    output.push('"');

    output.push_str(",\"severity\":\"");
    output.push_str(severity.as_str());
    output.push('"');

    let mut sorted_fields: Vec<_> = fields.iter().collect();
    sorted_fields.sort_by_key(|(k, _)| *k);

    for (key, value) in sorted_fields {
        output.push_str(",\"");
        escape_json_string(&mut output, key);
        output.push_str("\":\"");
        escape_json_string(&mut output, value);
        output.push('"');
    }

    output.push('}');
    output.push('\n');
    output
}

/// Escape special characters for JSON strings
fn escape_json_string(output: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '"' => output.push_str("\\\""),
            '\\' => output.push_str("\\\\"),
            '\n' => output.push_str("\\n"),
            '\r' => output.push_str("\\r"),
            '\t' => output.push_str("\\t"),
            c if c.is_control() => {
                output.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => output.push(c),
        }
    }
}
