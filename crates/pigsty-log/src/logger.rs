use std::time::{SystemTime, UNIX_EPOCH};

use pigsty_error::{Metadata, StructuredError};
use pigsty_format::{
    FormatDetailsOptions, LogMessage, MessageOptions, message_to_string, to_format_details,
};
use serde_json::{Value, json};

use crate::entry::LogEntry;
use crate::severity::{Severity, test_severity};
use crate::sink::LogSink;

/// Who is logging, and from which severity on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggerConfig {
    pub application_id: String,
    pub environment_id: String,
    pub threshold: Severity,
}

impl LoggerConfig {
    pub fn new(application_id: impl Into<String>, environment_id: impl Into<String>) -> Self {
        LoggerConfig {
            application_id: application_id.into(),
            environment_id: environment_id.into(),
            threshold: Severity::Debug,
        }
    }

    pub fn with_threshold(mut self, threshold: Severity) -> Self {
        self.threshold = threshold;
        self
    }
}

/// Per-call options of the logging methods.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogOptions {
    pub metadata: Option<Metadata>,
    pub module_id: String,
    /// Stack reported with a text message
    pub stack: Option<String>,
    pub trace_id: Option<String>,
}

impl LogOptions {
    pub fn new(module_id: impl Into<String>) -> Self {
        LogOptions {
            module_id: module_id.into(),
            ..Self::default()
        }
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn with_metadata_entry(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata
            .get_or_insert_with(Metadata::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }
}

/// Milliseconds since the unix epoch, zero if the system clock is before it.
pub fn epoch_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}

/// Filters, resolves and forwards log messages to a [`LogSink`].
pub struct Logger<S> {
    config: LoggerConfig,
    sink: S,
    clock: fn() -> u64,
}

impl<S: LogSink> Logger<S> {
    pub fn new(config: LoggerConfig, sink: S) -> Self {
        Logger {
            config,
            sink,
            clock: epoch_millis,
        }
    }

    /// Replace the source of entry timestamps.
    pub fn with_clock(mut self, clock: fn() -> u64) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &LoggerConfig {
        &self.config
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn debug<'a>(&self, message: impl Into<LogMessage<'a>>, options: LogOptions) {
        self.process_entry(message.into(), Severity::Debug, options);
    }

    pub fn info<'a>(&self, message: impl Into<LogMessage<'a>>, options: LogOptions) {
        self.process_entry(message.into(), Severity::Info, options);
    }

    pub fn warn<'a>(&self, message: impl Into<LogMessage<'a>>, options: LogOptions) {
        self.process_entry(message.into(), Severity::Warn, options);
    }

    pub fn error<'a>(&self, message: impl Into<LogMessage<'a>>, options: LogOptions) {
        self.process_entry(message.into(), Severity::Error, options);
    }

    pub fn fatal<'a>(&self, message: impl Into<LogMessage<'a>>, options: LogOptions) {
        self.process_entry(message.into(), Severity::Fatal, options);
    }

    pub fn log(&self, severity: Severity, message: LogMessage<'_>, options: LogOptions) {
        self.process_entry(message, severity, options);
    }

    fn process_entry(&self, message: LogMessage<'_>, severity: Severity, options: LogOptions) {
        if !test_severity(severity, self.config.threshold) {
            return;
        }
        let LogOptions {
            metadata,
            module_id,
            stack,
            trace_id,
        } = options;

        let mut merged = Metadata::new();
        let text = match message.as_error() {
            Some(error) => {
                let details = to_format_details(error, FormatDetailsOptions::new(true, true));
                let mut summary = json!({ "message": details.message.clone() });
                if let Some(stack) = &details.stack {
                    summary["stack"] = Value::String(stack.clone());
                }
                merged.insert("error".to_string(), summary);
                if let Some(own) = error
                    .downcast_ref::<StructuredError>()
                    .and_then(StructuredError::metadata)
                {
                    merged.extend(own.clone());
                }
                details.message
            }
            None => {
                if let Some(stack) = stack {
                    merged.insert("error".to_string(), json!({ "stack": stack }));
                }
                message_to_string(message, &MessageOptions::default())
            }
        };
        if let Some(metadata) = metadata {
            merged.extend(metadata);
        }

        self.sink.log_entry(&LogEntry {
            message: text,
            severity,
            application_id: self.config.application_id.clone(),
            environment_id: self.config.environment_id.clone(),
            module_id,
            metadata: merged,
            timestamp: (self.clock)(),
            trace_id,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemorySink;
    use pretty_assertions::assert_eq;

    fn fixed_clock() -> u64 {
        1_000
    }

    fn logger(threshold: Severity) -> Logger<MemorySink> {
        Logger::new(
            LoggerConfig::new("app", "test").with_threshold(threshold),
            MemorySink::new(),
        )
        .with_clock(fixed_clock)
    }

    #[test]
    fn test_threshold_filters() {
        let logger = logger(Severity::Warn);
        logger.debug("d", LogOptions::new("m"));
        logger.info("i", LogOptions::new("m"));
        logger.warn("w", LogOptions::new("m"));
        logger.error("e", LogOptions::new("m"));
        logger.fatal("f", LogOptions::new("m"));
        assert_eq!(logger.sink().messages(), vec!["w", "e", "f"]);
    }

    #[test]
    fn test_text_entry() {
        let logger = logger(Severity::Debug);
        logger.info(
            "hello",
            LogOptions::new("main")
                .with_trace_id("t-1")
                .with_metadata_entry("user", 7),
        );
        let entries = logger.sink().entries();
        assert_eq!(
            entries,
            vec![LogEntry {
                message: "hello".to_string(),
                severity: Severity::Info,
                application_id: "app".to_string(),
                environment_id: "test".to_string(),
                module_id: "main".to_string(),
                metadata: Metadata::from([("user".to_string(), json!(7))]),
                timestamp: 1_000,
                trace_id: Some("t-1".to_string()),
            }]
        );
    }

    #[test]
    fn test_lazy_message_only_built_when_logged() {
        let logger = logger(Severity::Info);
        logger.debug(
            LogMessage::lazy(|| panic!("must not be built")),
            LogOptions::new("m"),
        );
        logger.info(LogMessage::lazy(|| "built".to_string()), LogOptions::new("m"));
        assert_eq!(logger.sink().messages(), vec!["built"]);
    }

    #[test]
    fn test_text_with_stack() {
        let logger = logger(Severity::Debug);
        logger.warn("w", LogOptions::new("m").with_stack("at f (x.js:1:1)"));
        let entry = &logger.sink().entries()[0];
        assert_eq!(entry.metadata["error"], json!({ "stack": "at f (x.js:1:1)" }));
    }

    #[test]
    fn test_error_entry() {
        let error = StructuredError::builder()
            .with_message("save failed")
            .with_details("disk full")
            .with_metadata_entry("path", "/tmp/x")
            .with_metadata_entry("attempt", 1)
            .with_stack("at Store.save (store.js:10:2)")
            .build();
        let logger = logger(Severity::Debug);
        logger.error(&error, LogOptions::new("store").with_metadata_entry("attempt", 2));

        let entry = &logger.sink().entries()[0];
        assert_eq!(entry.message, "store.js::Store.save(): save failed. disk full");
        assert_eq!(
            entry.metadata,
            Metadata::from([
                ("attempt".to_string(), json!(2)),
                (
                    "error".to_string(),
                    json!({
                        "message": "store.js::Store.save(): save failed. disk full",
                        "stack": "at Store.save (store.js:10:2)"
                    })
                ),
                ("path".to_string(), json!("/tmp/x")),
            ])
        );
    }

    #[test]
    fn test_plain_error_entry() {
        let error = std::io::Error::new(std::io::ErrorKind::Other, "io");
        let logger = logger(Severity::Debug);
        logger.fatal(
            LogMessage::Error(&error),
            LogOptions::new("m").with_stack("ignored"),
        );
        let entry = &logger.sink().entries()[0];
        assert_eq!(entry.severity, Severity::Fatal);
        assert_eq!(entry.metadata["error"], json!({ "message": "io" }));
    }

    #[test]
    fn test_entry_serialization() {
        let logger = logger(Severity::Debug);
        logger.info("hello", LogOptions::new("main"));
        let value = serde_json::to_value(&logger.sink().entries()[0]).unwrap();
        assert_eq!(
            value,
            json!({
                "message": "hello",
                "severity": "info",
                "applicationId": "app",
                "environmentId": "test",
                "moduleId": "main",
                "metadata": {},
                "timestamp": 1000
            })
        );
    }
}
