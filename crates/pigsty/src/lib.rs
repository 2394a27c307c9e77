//! pigsty: structured errors, trace parsing and error rendering.
//!
//! Re-exports the workspace crates and hosts the `pigsty` command-line tool.
pub mod input;
pub mod options;

use anyhow::Context;
use serde::Serialize;

pub use options::GroomArgs;
pub use pigsty_error::{
    Cause, ErrorBuilder, HttpStatusCode, MessageError, Metadata, StructuredError, http_status_text,
    ordered_causes, reverse_ordered_causes, status_message,
};
pub use pigsty_format::{
    FormatConfig, FormatDetails, FormatDetailsOptions, FormatModel, IndentOptions, LogMessage,
    MessageOptions, indent_text, message_to_string, render, render_diagnostic, render_friendly,
    render_model, to_format_details, to_format_model,
};
pub use pigsty_log::{
    LogEntry, LogOptions, LogSink, Logger, LoggerConfig, MemorySink, Severity, TracingSink,
    test_severity,
};
pub use pigsty_stack::{
    CallSite, Frame, GroomOptions, ParsedTrace, StackError, Trace, capture_current_trace,
    display_module_path, find_module_root, groom_lines, groom_trace, parse_line, parse_trace,
    relative_module_path,
};

/// What the command-line tool does with its input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Split a trace into message and call sites
    Parse,
    /// Drop and truncate the call-site lines of a trace
    Groom(GroomOptions),
    /// Parse a single call-site line
    Line(String),
}

/// Options for running pigsty.
#[derive(Debug, Clone)]
pub struct PigstyOptions {
    /// Trace file, stdin when absent
    pub input: Option<String>,
    pub action: Action,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ParseReport {
    #[serde(flatten)]
    trace: ParsedTrace,
    call_sites: Vec<CallSite>,
}

/// Main entry point
pub fn run_main(opts: &PigstyOptions) -> anyhow::Result<String> {
    match &opts.action {
        Action::Parse => {
            let text = input::read_input(opts.input.as_deref())?;
            let trace = parse_trace(&text);
            tracing::debug!(lines = trace.lines.len(), "trace parsed");
            let report = ParseReport {
                call_sites: trace.call_sites(),
                trace,
            };
            Ok(serde_json::to_string_pretty(&report)?)
        }
        Action::Groom(options) => {
            let text = input::read_input(opts.input.as_deref())?;
            Ok(groom_trace(&text, *options))
        }
        Action::Line(line) => {
            let site = parse_line(line).with_context(|| "not a call-site line".to_string())?;
            Ok(serde_json::to_string_pretty(&site)?)
        }
    }
}
