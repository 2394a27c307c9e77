use pigsty_error::Metadata;
use serde::Serialize;

use crate::severity::Severity;

/// One resolved log entry, as handed to a sink.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub message: String,
    pub severity: Severity,
    pub application_id: String,
    pub environment_id: String,
    pub module_id: String,
    pub metadata: Metadata,
    /// Milliseconds since the unix epoch
    pub timestamp: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
}
