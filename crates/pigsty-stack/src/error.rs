//! Failures raised while reading traces or locating module roots.

use std::fmt;
use std::path::PathBuf;

/// Error raised by the line-level parser and module-root discovery.
///
/// Trace-level entry points ([`crate::parse_trace`], [`crate::groom_trace`]) never return it;
/// they fold unparseable content into the trace message instead.
pub enum StackError {
    /// A line did not match either call-site shape.
    UnparsableLine(String),

    /// No ancestor directory holds a `Cargo.toml`.
    ModuleRootNotFound(PathBuf),

    /// The filesystem could not be inspected.
    Io(std::io::Error),
}

impl StackError {
    /// Check if this error came from the line parser
    pub fn is_parse_failure(&self) -> bool {
        matches!(self, StackError::UnparsableLine(_))
    }
}

impl fmt::Display for StackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StackError::UnparsableLine(line) => write!(f, "unable to parse \"{}\"", line),
            StackError::ModuleRootNotFound(path) => {
                write!(f, "could not find module root for {}", path.display())
            }
            StackError::Io(err) => write!(f, "io error: {}", err),
        }
    }
}

impl fmt::Debug for StackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StackError::UnparsableLine(line) => f.debug_tuple("UnparsableLine").field(line).finish(),
            StackError::ModuleRootNotFound(path) => {
                f.debug_tuple("ModuleRootNotFound").field(path).finish()
            }
            StackError::Io(err) => f.debug_tuple("Io").field(err).finish(),
        }
    }
}

impl std::error::Error for StackError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StackError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StackError {
    fn from(err: std::io::Error) -> Self {
        StackError::Io(err)
    }
}
