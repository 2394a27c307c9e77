use serde::{Deserialize, Serialize};
use std::fmt;

/// One parsed line of an execution trace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallSite {
    /// File or resource identifier, a path or a bare name like `module.js`
    pub module: String,

    /// 1-based line
    pub line: u32,

    /// 1-based column
    pub column: u32,

    /// Enclosing type or namespace, when the trace exposes one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,

    /// Function name. `<anonymous>` is a real value, distinct from `None`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
}

impl CallSite {
    /// `Context.method`, `method`, or `None` for a bare location
    pub fn qualified_name(&self) -> Option<String> {
        match (&self.context, &self.method) {
            (Some(context), Some(method)) => Some(format!("{}.{}", context, method)),
            (None, Some(method)) => Some(method.clone()),
            _ => None,
        }
    }
}

/// Writes the line back in the shape it was parsed from.
impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.qualified_name() {
            Some(name) => write!(
                f,
                "at {} ({}:{}:{})",
                name, self.module, self.line, self.column
            ),
            None => write!(f, "at {}:{}:{}", self.module, self.line, self.column),
        }
    }
}

/// A trace split into its leading message and its call-site lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedTrace {
    /// Everything before the first call-site line, joined with `\n`
    pub message: String,

    /// Trimmed call-site lines, outermost call first
    pub lines: Vec<String>,
}

impl ParsedTrace {
    pub fn is_empty(&self) -> bool {
        self.message.is_empty() && self.lines.is_empty()
    }

    /// Parse every retained line. Lines that no longer parse are skipped.
    pub fn call_sites(&self) -> Vec<CallSite> {
        self.lines
            .iter()
            .filter_map(|line| crate::parse_line(line).ok())
            .collect()
    }
}
