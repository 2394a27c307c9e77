//! The structured error type.

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;
use std::panic::Location;

use pigsty_stack::{
    CallSite, GroomOptions, ParsedTrace, Trace, display_module_path, parse_line, parse_trace,
};
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::{Cause, HttpStatusCode, status_message};

/// Free-form companion data, kept in key order.
pub type Metadata = BTreeMap<String, serde_json::Value>;

/// Contexts a trace reports that say nothing about where an error happened.
const UNINFORMATIVE_CONTEXTS: [&str; 3] = ["Object", "Function", "Module"];

/// Error with provenance, status, metadata and an optional wrapped cause.
///
/// Built with [`StructuredError::builder`]. All fields are fixed at construction.
pub struct StructuredError {
    message: String,
    details: Option<String>,
    cause: Option<Box<dyn Error + Send + Sync + 'static>>,
    context: Option<String>,
    method: Option<String>,
    module: Option<String>,
    status_code: Option<u16>,
    metadata: Option<Metadata>,
    stack: String,
}

impl StructuredError {
    pub fn builder() -> ErrorBuilder {
        ErrorBuilder::default()
    }

    /// Error with a message and nothing else given explicitly.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        Self::builder().with_message(message).build()
    }

    /// Error whose message is derived from a status code, e.g. `Not Found (404)`.
    #[track_caller]
    pub fn from_status(status_code: u16) -> Self {
        Self::builder().with_status_code(status_code).build()
    }

    /// Wrap `cause` with a new message.
    #[track_caller]
    pub fn wrap(cause: impl Into<Cause>, message: impl Into<String>) -> Self {
        Self::builder().with_cause(cause).with_message(message).build()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }

    /// The error this one was raised from.
    pub fn cause(&self) -> Option<&(dyn Error + Send + Sync + 'static)> {
        self.cause.as_deref()
    }

    /// The cause, when it is itself structured.
    pub fn structured_cause(&self) -> Option<&StructuredError> {
        self.cause()
            .and_then(|cause| cause.downcast_ref::<StructuredError>())
    }

    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    pub fn method(&self) -> Option<&str> {
        self.method.as_deref()
    }

    pub fn module(&self) -> Option<&str> {
        self.module.as_deref()
    }

    pub fn status_code(&self) -> Option<u16> {
        self.status_code
    }

    pub fn metadata(&self) -> Option<&Metadata> {
        self.metadata.as_ref()
    }

    /// Trace text captured at construction, or the one supplied with
    /// [`ErrorBuilder::with_stack`].
    pub fn stack(&self) -> &str {
        &self.stack
    }

    pub fn parsed_trace(&self) -> ParsedTrace {
        parse_trace(&self.stack)
    }

    /// `<module>::<context>.<method>()`, leaving out whatever is unknown.
    pub fn location(&self) -> Option<String> {
        let name = match (&self.context, &self.method) {
            (Some(context), Some(method)) => Some(format!("{}.{}()", context, method)),
            (None, Some(method)) => Some(format!("{}()", method)),
            (Some(context), None) => Some(context.clone()),
            (None, None) => None,
        };
        match (&self.module, name) {
            (Some(module), Some(name)) => Some(format!("{}::{}", module, name)),
            (Some(module), None) => Some(module.clone()),
            (None, name) => name,
        }
    }

    fn assemble(builder: ErrorBuilder, stack: String) -> Self {
        let ErrorBuilder {
            context,
            details,
            cause,
            message,
            metadata,
            method,
            module,
            mut status_code,
            stack: _,
        } = builder;

        let cause = cause.map(Cause::into_error);
        if status_code.is_none() {
            status_code = cause
                .as_deref()
                .and_then(|cause| cause.downcast_ref::<StructuredError>())
                .and_then(StructuredError::status_code);
        }

        let message = match (message, &cause, status_code) {
            (Some(message), _, _) if !message.is_empty() => message,
            (_, Some(cause), _) => cause.to_string(),
            (_, None, Some(code)) => status_message(code),
            _ => String::new(),
        };

        let frame = first_call_site(&stack);
        let derived_context = frame
            .as_ref()
            .and_then(|site| site.context.clone())
            .filter(|context| !UNINFORMATIVE_CONTEXTS.contains(&context.as_str()));
        let derived_method = frame.as_ref().and_then(|site| site.method.clone());
        let derived_module = frame.as_ref().map(|site| display_module_path(&site.module));

        StructuredError {
            message,
            details,
            cause,
            context: context.or(derived_context),
            method: method.or(derived_method),
            module: module.or(derived_module),
            status_code,
            metadata,
            stack,
        }
    }
}

fn first_call_site(stack: &str) -> Option<CallSite> {
    let parsed = parse_trace(stack);
    let first = parsed.lines.first()?;
    match parse_line(first) {
        Ok(site) => Some(site),
        Err(err) => {
            tracing::trace!(error = %err, "no provenance from trace");
            None
        }
    }
}

/// Trace for an error built at `location`.
///
/// The captured stack starts at the caller's frame and holds as many frames as a groomed trace
/// shows. When no frame matches the caller's file and line, which is the case without debug info
/// or without the `capture` feature, the location itself is the only frame.
fn capture_stack(location: &Location<'_>) -> String {
    let limit = GroomOptions::default().max_lines;
    let rendered = Trace::capture_anchored(location.file(), location.line(), limit)
        .map(|trace| trace.render())
        .filter(|text| !text.is_empty());
    rendered.unwrap_or_else(|| {
        format!(
            "at {}:{}:{}",
            location.file(),
            location.line(),
            location.column()
        )
    })
}

/// Short name of a type: `app::model::User<T>` becomes `User`.
fn short_type_name(full: &str) -> String {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base).to_string()
}

/// Collects the parts of a [`StructuredError`]. Nothing is resolved until [`build`](Self::build).
#[derive(Debug, Default)]
pub struct ErrorBuilder {
    context: Option<String>,
    details: Option<String>,
    cause: Option<Cause>,
    message: Option<String>,
    metadata: Option<Metadata>,
    method: Option<String>,
    module: Option<String>,
    status_code: Option<u16>,
    stack: Option<String>,
}

impl ErrorBuilder {
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Set the originating failure: text, another structured error, or a boxed error.
    pub fn with_cause(mut self, cause: impl Into<Cause>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    /// Set any error type as the cause.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        self.cause = Some(Cause::Error(Box::new(source)));
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Use the type name of `value` as the context.
    pub fn with_context_of<T: ?Sized>(self, _value: &T) -> Self {
        self.with_context(short_type_name(std::any::type_name::<T>()))
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    /// Use the name of a function item as the method. Closures are `<anonymous>`.
    pub fn with_method_of<F>(self, _function: F) -> Self {
        let name = short_type_name(std::any::type_name::<F>());
        if name.starts_with("{{") {
            self.with_method("<anonymous>")
        } else {
            self.with_method(name)
        }
    }

    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    pub fn with_status_code(mut self, status_code: u16) -> Self {
        self.status_code = Some(status_code);
        self
    }

    pub fn with_status(self, status: HttpStatusCode) -> Self {
        self.with_status_code(status.code())
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn with_metadata_entry(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.metadata
            .get_or_insert_with(Metadata::new)
            .insert(key.into(), value.into());
        self
    }

    /// Use `stack` as the error's trace instead of capturing one.
    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    /// Resolve message, status and provenance and produce the error.
    #[track_caller]
    pub fn build(mut self) -> StructuredError {
        let stack = match self.stack.take() {
            Some(stack) => stack,
            None => capture_stack(Location::caller()),
        };
        StructuredError::assemble(self, stack)
    }
}

impl fmt::Display for StructuredError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl fmt::Debug for StructuredError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.message)?;

        if let Some(location) = self.location() {
            writeln!(f, "    Location: {}", location)?;
        }
        if let Some(details) = &self.details {
            writeln!(f, "    Details: {}", details)?;
        }
        if let Some(status_code) = self.status_code {
            writeln!(f, "    Status: {}", status_code)?;
        }
        if let Some(metadata) = &self.metadata {
            writeln!(f, "    Metadata:")?;
            for (key, value) in metadata {
                writeln!(f, "        {}: {}", key, value)?;
            }
        }
        if let Some(cause) = &self.cause {
            writeln!(f)?;
            writeln!(f, "    Cause: {:?}", cause)?;
        }

        Ok(())
    }
}

impl Error for StructuredError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.cause
            .as_ref()
            .map(|e| e.as_ref() as &(dyn Error + 'static))
    }
}

/// Absent fields are left out rather than written as null.
impl Serialize for StructuredError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("message", &self.message)?;
        if let Some(details) = &self.details {
            map.serialize_entry("details", details)?;
        }
        if let Some(context) = &self.context {
            map.serialize_entry("context", context)?;
        }
        if let Some(method) = &self.method {
            map.serialize_entry("method", method)?;
        }
        if let Some(module) = &self.module {
            map.serialize_entry("module", module)?;
        }
        if let Some(status_code) = self.status_code {
            map.serialize_entry("statusCode", &status_code)?;
        }
        if let Some(metadata) = &self.metadata {
            map.serialize_entry("metadata", metadata)?;
        }
        if let Some(cause) = self.structured_cause() {
            map.serialize_entry("cause", cause)?;
        } else if let Some(cause) = &self.cause {
            let plain: BTreeMap<&str, String> = BTreeMap::from([("message", cause.to_string())]);
            map.serialize_entry("cause", &plain)?;
        }
        let lines = self.parsed_trace().lines;
        if !lines.is_empty() {
            map.serialize_entry("stack", &lines)?;
        }
        map.end()
    }
}
