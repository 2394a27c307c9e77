//! # pigsty-stack
//!
//! Reads execution traces written in the `at <name> (<module>:<line>:<column>)` convention.
//!
//! - [`parse_line`] turns one call-site line into a [`CallSite`]
//! - [`parse_trace`] splits a whole trace into its message and call-site lines
//! - [`groom_trace`] drops and truncates call-site lines for display
//! - [`Trace`] captures the current stack and renders it in the same convention
//! - [`relative_module_path`] maps a source file to a project-relative display path
//!
//! ```rust
//! use pigsty_stack::parse_line;
//!
//! let site = parse_line("at Module.load (module.js:356:32)").unwrap();
//! assert_eq!(site.context.as_deref(), Some("Module"));
//! assert_eq!(site.method.as_deref(), Some("load"));
//! assert_eq!(site.line, 356);
//! ```
//!
//! This crate sits below the error types; it reports its own failures with [`StackError`].

mod capture;
mod error;
mod module;
mod parse;
mod site;

pub use capture::{Frame, Trace, capture_current_trace};
pub use error::StackError;
pub use module::{display_module_path, find_module_root, relative_module_path};
pub use parse::{GroomOptions, groom_lines, groom_trace, parse_line, parse_trace};
pub use site::{CallSite, ParsedTrace};

/// Result type alias using [`StackError`]
pub type Result<T> = std::result::Result<T, StackError>;
