//! Line and trace level parsing.
//!
//! Two call-site shapes are understood, as printed by V8 style runtimes and by [`crate::Trace`]:
//!
//! ```text
//! at speedy (/home/gbusey/file.js:6:11)
//! at Object.<anonymous> (/home/gbusey/file.js:10:1)
//! at Module._compile (module.js:456:26)
//! at Function.Module._load (module.js:312:12)
//! at node.js:906:3
//! ```

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{CallSite, ParsedTrace, Result, StackError};

static WITH_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*at\s*(([^\s.]+)(\.(\S+))?)\s*\((.+):(\d+):(\d+)\)\s*$").unwrap()
});

static WITHOUT_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*at\s*(.+):(\d+):(\d+)\s*$").unwrap());

/// Parse one call-site line.
///
/// A qualified name is split on its first `.`: `Function.Module._load` yields context
/// `Function` and method `Module._load`. A name without a dot is all method.
pub fn parse_line(line: &str) -> Result<CallSite> {
    let unparsable = || StackError::UnparsableLine(line.to_string());

    if let Some(caps) = WITH_NAME.captures(line) {
        let number = |index: usize| caps[index].parse::<u32>().map_err(|_| unparsable());
        let (context, method) = match caps.get(4) {
            Some(suffix) => (Some(caps[2].to_string()), suffix.as_str().to_string()),
            None => (None, caps[1].to_string()),
        };
        return Ok(CallSite {
            module: caps[5].to_string(),
            line: number(6)?,
            column: number(7)?,
            context,
            method: Some(method),
        });
    }

    if let Some(caps) = WITHOUT_NAME.captures(line) {
        let number = |index: usize| caps[index].parse::<u32>().map_err(|_| unparsable());
        return Ok(CallSite {
            module: caps[1].to_string(),
            line: number(2)?,
            column: number(3)?,
            context: None,
            method: None,
        });
    }

    Err(unparsable())
}

/// Split a trace into its message and call-site lines.
///
/// The first line that parses as a call site starts the call history; everything above it is
/// message text and keeps its inner whitespace (it may be pretty printed JSON). A trace with no
/// call sites at all is returned as message only.
pub fn parse_trace(trace: &str) -> ParsedTrace {
    let split: Vec<&str> = trace.lines().filter(|line| !line.trim().is_empty()).collect();

    match split.iter().position(|line| parse_line(line).is_ok()) {
        Some(first) => ParsedTrace {
            message: split[..first].join("\n"),
            lines: split[first..]
                .iter()
                .map(|line| line.trim().to_string())
                .collect(),
        },
        None => {
            if !split.is_empty() {
                tracing::trace!(lines = split.len(), "trace has no call sites");
            }
            ParsedTrace {
                message: split.join("\n"),
                lines: Vec::new(),
            }
        }
    }
}

/// How much of a trace to keep when grooming it for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroomOptions {
    /// Call-site lines removed from the top, usually frames of the reporting machinery
    pub drop_count: usize,

    /// Call-site lines kept after dropping
    pub max_lines: usize,
}

impl Default for GroomOptions {
    fn default() -> Self {
        GroomOptions {
            drop_count: 0,
            max_lines: 10,
        }
    }
}

impl GroomOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_drop_count(mut self, count: usize) -> Self {
        self.drop_count = count;
        self
    }

    pub fn with_max_lines(mut self, lines: usize) -> Self {
        self.max_lines = lines;
        self
    }

    /// Same options with `count` more frames dropped
    pub fn dropping(self, count: usize) -> Self {
        self.with_drop_count(self.drop_count + count)
    }
}

/// Call-site lines of `trace` after dropping and truncating.
pub fn groom_lines(trace: &str, options: GroomOptions) -> Vec<String> {
    parse_trace(trace)
        .lines
        .into_iter()
        .skip(options.drop_count)
        .take(options.max_lines)
        .collect()
}

/// [`groom_lines`] joined with `\n`.
pub fn groom_trace(trace: &str, options: GroomOptions) -> String {
    groom_lines(trace, options).join("\n")
}
