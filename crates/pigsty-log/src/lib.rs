//! # pigsty-log
//!
//! The broad strokes of logging; where entries end up is left to a [`LogSink`].
//!
//! A [`Logger`] drops entries below its threshold, resolves lazy messages, and turns errors into
//! their formatted text with the error's message and stack kept in the entry's metadata.
//!
//! ```
//! use pigsty_log::{LogOptions, Logger, LoggerConfig, MemorySink, Severity};
//!
//! let logger = Logger::new(
//!     LoggerConfig::new("app", "dev").with_threshold(Severity::Info),
//!     MemorySink::new(),
//! );
//! logger.debug("dropped", LogOptions::new("main"));
//! logger.info("kept", LogOptions::new("main"));
//! assert_eq!(logger.sink().messages(), vec!["kept"]);
//! ```

mod entry;
mod logger;
mod severity;
mod sink;

pub use entry::LogEntry;
pub use logger::{LogOptions, Logger, LoggerConfig, epoch_millis};
pub use severity::{Severity, test_severity};
pub use sink::{LogSink, MemorySink, TracingSink};
