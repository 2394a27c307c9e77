use std::error::Error;

use pigsty_error::StructuredError;
use serde::{Deserialize, Serialize};

/// Serializable mirror of an error and its causes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatModel {
    pub message: String,

    /// Trimmed details
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,

    /// `<module>::<context>.<method>()`, structured errors only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// The cause this error wraps
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nested: Option<Box<FormatModel>>,

    /// Call-site lines of this error's own trace
    #[serde(default)]
    pub stack: Vec<String>,
}

impl FormatModel {
    /// This model and its nested models, outermost first.
    pub fn levels(&self) -> Vec<&FormatModel> {
        let mut levels = vec![self];
        let mut current = self;
        while let Some(nested) = current.nested.as_deref() {
            levels.push(nested);
            current = nested;
        }
        levels
    }

    /// The first failure of the chain.
    pub fn innermost(&self) -> &FormatModel {
        let mut current = self;
        while let Some(nested) = current.nested.as_deref() {
            current = nested;
        }
        current
    }

    pub fn depth(&self) -> usize {
        self.levels().len()
    }
}

/// Build the model of `error` and of every cause below it.
///
/// Structured errors contribute their cause, any other error its [`Error::source`].
pub fn to_format_model(error: &(dyn Error + 'static)) -> FormatModel {
    match error.downcast_ref::<StructuredError>() {
        Some(structured) => FormatModel {
            message: structured.message().to_string(),
            details: structured.details().map(|details| details.trim().to_string()),
            location: structured.location(),
            nested: structured
                .cause()
                .map(|cause| Box::new(to_format_model(cause))),
            stack: structured.parsed_trace().lines,
        },
        None => FormatModel {
            message: error.to_string(),
            nested: error
                .source()
                .map(|source| Box::new(to_format_model(source))),
            ..FormatModel::default()
        },
    }
}
