//! Structured event logging for store operations.

mod logger;

pub use logger::{LogSink, Logger, Severity};
