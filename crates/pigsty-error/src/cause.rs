//! What an error may be raised from.

use std::error::Error;
use std::fmt;

use crate::StructuredError;

type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// The originating failure handed to [`crate::ErrorBuilder::with_cause`].
///
/// Resolved once at construction into a single boxed error; nothing past the constructor sees
/// this enum.
pub enum Cause {
    /// Bare text, wrapped as a [`MessageError`]
    Message(String),

    /// Any other error
    Error(BoxError),

    /// Another structured error, which keeps its own chain and status
    Structured(Box<StructuredError>),
}

impl Cause {
    pub(crate) fn into_error(self) -> BoxError {
        match self {
            Cause::Message(message) => Box::new(MessageError::new(message)),
            Cause::Error(error) => error,
            Cause::Structured(error) => error,
        }
    }
}

impl fmt::Debug for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cause::Message(message) => f.debug_tuple("Message").field(message).finish(),
            Cause::Error(error) => f.debug_tuple("Error").field(error).finish(),
            Cause::Structured(error) => f.debug_tuple("Structured").field(error).finish(),
        }
    }
}

impl From<&str> for Cause {
    fn from(message: &str) -> Self {
        Cause::Message(message.to_string())
    }
}

impl From<String> for Cause {
    fn from(message: String) -> Self {
        Cause::Message(message)
    }
}

impl From<StructuredError> for Cause {
    fn from(error: StructuredError) -> Self {
        Cause::Structured(Box::new(error))
    }
}

impl From<BoxError> for Cause {
    fn from(error: BoxError) -> Self {
        Cause::Error(error)
    }
}

impl From<std::io::Error> for Cause {
    fn from(error: std::io::Error) -> Self {
        Cause::Error(Box::new(error))
    }
}

impl From<pigsty_stack::StackError> for Cause {
    fn from(error: pigsty_stack::StackError) -> Self {
        Cause::Error(Box::new(error))
    }
}

/// Minimal error carrying only text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageError {
    message: String,
}

impl MessageError {
    pub fn new(message: impl Into<String>) -> Self {
        MessageError {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for MessageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl Error for MessageError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_cause_becomes_message_error() {
        let error = Cause::from("disk full").into_error();
        let message = error.downcast_ref::<MessageError>().unwrap();
        assert_eq!(message.message(), "disk full");
        assert_eq!(error.to_string(), "disk full");
    }

    #[test]
    fn test_structured_cause_stays_structured() {
        let inner = StructuredError::builder()
            .with_message("inner")
            .with_stack("")
            .build();
        let error = Cause::from(inner).into_error();
        assert!(error.downcast_ref::<StructuredError>().is_some());
    }

    #[test]
    fn test_io_cause() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "nope");
        let error = Cause::from(io).into_error();
        assert!(error.downcast_ref::<std::io::Error>().is_some());
    }
}
