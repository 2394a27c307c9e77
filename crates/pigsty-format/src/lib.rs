//! # pigsty-format
//!
//! Turns errors, and chains of errors, into text.
//!
//! - [`to_format_model`] mirrors an error and its causes as a serializable [`FormatModel`]
//! - [`render`] writes the chain outermost first, one indented level per cause, followed by the
//!   deepest stack the chain carries
//! - [`to_format_details`] splits the same output into message and stack for log sinks
//! - [`FormatConfig::diagnostic`] and [`FormatConfig::friendly`] are the two standing presets

mod config;
mod error;
mod message;
mod model;
mod text;

pub use config::{FormatConfig, FormatDetailsOptions};
pub use error::{
    FormatDetails, render, render_diagnostic, render_friendly, render_model, to_format_details,
};
pub use message::{LogMessage, MessageOptions, message_to_string};
pub use model::{FormatModel, to_format_model};
pub use text::{IndentOptions, indent_text};
