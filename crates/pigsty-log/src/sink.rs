use std::sync::Arc;

use parking_lot::Mutex;

use crate::entry::LogEntry;
use crate::severity::Severity;

/// Where a [`crate::Logger`] sends entries that pass its threshold.
pub trait LogSink: Send + Sync {
    fn log_entry(&self, entry: &LogEntry);
}

impl<S: LogSink + ?Sized> LogSink for Arc<S> {
    fn log_entry(&self, entry: &LogEntry) {
        (**self).log_entry(entry)
    }
}

impl<S: LogSink + ?Sized> LogSink for Box<S> {
    fn log_entry(&self, entry: &LogEntry) {
        (**self).log_entry(entry)
    }
}

impl<S: LogSink + ?Sized> LogSink for &S {
    fn log_entry(&self, entry: &LogEntry) {
        (**self).log_entry(entry)
    }
}

/// Forwards entries to `tracing` events. `fatal` goes out at error level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

macro_rules! emit {
    ($level:ident, $entry:expr, $metadata:expr) => {
        tracing::$level!(
            severity = %$entry.severity,
            application_id = %$entry.application_id,
            environment_id = %$entry.environment_id,
            module_id = %$entry.module_id,
            trace_id = $entry.trace_id.as_deref(),
            timestamp = $entry.timestamp,
            metadata = %$metadata,
            "{}",
            $entry.message
        )
    };
}

impl LogSink for TracingSink {
    fn log_entry(&self, entry: &LogEntry) {
        let metadata = serde_json::to_string(&entry.metadata).unwrap_or_default();
        match entry.severity {
            Severity::Debug => emit!(debug, entry, metadata),
            Severity::Info => emit!(info, entry, metadata),
            Severity::Warn => emit!(warn, entry, metadata),
            Severity::Error | Severity::Fatal => emit!(error, entry, metadata),
        }
    }
}

/// Keeps every entry in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: Mutex<Vec<LogEntry>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.entries
            .lock()
            .iter()
            .map(|entry| entry.message.clone())
            .collect()
    }

    pub fn take(&self) -> Vec<LogEntry> {
        std::mem::take(&mut *self.entries.lock())
    }
}

impl LogSink for MemorySink {
    fn log_entry(&self, entry: &LogEntry) {
        self.entries.lock().push(entry.clone());
    }
}
