use std::borrow::Cow;
use std::error::Error;
use std::fmt;

use pigsty_error::StructuredError;
use pigsty_stack::{GroomOptions, capture_current_trace};

use crate::config::FormatConfig;
use crate::error::render;

/// Anything a logger accepts as its message.
pub enum LogMessage<'a> {
    Text(Cow<'a, str>),
    /// Built only when the message is actually written
    Lazy(Box<dyn FnOnce() -> String + 'a>),
    Error(&'a (dyn Error + 'static)),
}

impl<'a> LogMessage<'a> {
    pub fn lazy(build: impl FnOnce() -> String + 'a) -> Self {
        LogMessage::Lazy(Box::new(build))
    }

    /// The error carried by this message, if any.
    pub fn as_error(&self) -> Option<&'a (dyn Error + 'static)> {
        match self {
            LogMessage::Error(error) => Some(*error),
            _ => None,
        }
    }
}

impl fmt::Debug for LogMessage<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogMessage::Text(text) => f.debug_tuple("Text").field(text).finish(),
            LogMessage::Lazy(_) => f.write_str("Lazy(..)"),
            LogMessage::Error(error) => f.debug_tuple("Error").field(&error.to_string()).finish(),
        }
    }
}

impl<'a> From<&'a str> for LogMessage<'a> {
    fn from(text: &'a str) -> Self {
        LogMessage::Text(Cow::Borrowed(text))
    }
}

impl From<String> for LogMessage<'_> {
    fn from(text: String) -> Self {
        LogMessage::Text(Cow::Owned(text))
    }
}

impl<'a> From<&'a StructuredError> for LogMessage<'a> {
    fn from(error: &'a StructuredError) -> Self {
        LogMessage::Error(error)
    }
}

impl<'a> From<&'a (dyn Error + 'static)> for LogMessage<'a> {
    fn from(error: &'a (dyn Error + 'static)) -> Self {
        LogMessage::Error(error)
    }
}

/// How [`message_to_string`] resolves a message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageOptions {
    /// Used when the message resolves to empty text
    pub default: String,

    /// Append a stack: the error's own, or the caller's for text
    pub stack: bool,
}

impl MessageOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = default.into();
        self
    }

    pub fn with_stack(mut self, enabled: bool) -> Self {
        self.stack = enabled;
        self
    }
}

/// Resolve `message` to text.
///
/// Errors are rendered with details and locations. Text and lazy messages fall back to
/// `options.default` when empty, and get the caller's stack appended when `options.stack` is set.
#[inline(never)]
pub fn message_to_string(message: LogMessage<'_>, options: &MessageOptions) -> String {
    let text = match message {
        LogMessage::Error(error) => {
            return render(error, FormatConfig::diagnostic().with_stack(options.stack));
        }
        LogMessage::Text(text) => text.into_owned(),
        LogMessage::Lazy(build) => build(),
    };
    let text = if text.is_empty() {
        options.default.clone()
    } else {
        text
    };
    if !options.stack {
        return text;
    }
    let stack = capture_current_trace(GroomOptions::default().with_drop_count(1));
    if stack.is_empty() {
        text
    } else {
        format!("{}\n{}", text, stack)
    }
}
