//! Store construction options.

use crate::observability::LogSink;

/// Options recognized at store construction.
#[derive(Debug, Default)]
pub struct StoreConfig {
    /// Where store events are logged
    pub logging: LogSink,
    /// Stamp `created_at`/`updated_at` on writes
    pub timestamps: bool,
    /// Mark deletes with `deleted_at` instead of removing rows
    pub soft_delete: bool,
}

impl StoreConfig {
    /// Defaults: logging off, timestamps off, hard deletes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Routes events to the given sink.
    pub fn logging(mut self, sink: LogSink) -> Self {
        self.logging = sink;
        self
    }

    /// Enables `created_at`/`updated_at` stamping.
    pub fn timestamps(mut self, enabled: bool) -> Self {
        self.timestamps = enabled;
        self
    }

    /// Switches deletes to soft deletion.
    pub fn soft_delete(mut self, enabled: bool) -> Self {
        self.soft_delete = enabled;
        self
    }
}
