use std::error::Error;

use serde::Serialize;

use crate::config::{FormatConfig, FormatDetailsOptions};
use crate::model::{FormatModel, to_format_model};
use crate::text::{IndentOptions, indent_text};

/// Message and stack of an error, kept apart for log sinks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormatDetails {
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

/// Render `error` and its causes as text.
///
/// Levels are written outermost first. Level `i` is indented by `i` indents and, below the
/// top, prefixed with a `[error -> error ...]` marker naming its depth. When requested, the
/// stack of the deepest level that has one follows the last level.
pub fn render(error: &(dyn Error + 'static), config: FormatConfig) -> String {
    render_model(&to_format_model(error), config)
}

pub fn render_diagnostic(error: &(dyn Error + 'static)) -> String {
    render(error, FormatConfig::diagnostic())
}

pub fn render_friendly(error: &(dyn Error + 'static)) -> String {
    render(error, FormatConfig::friendly())
}

/// [`render`] over an already built model.
pub fn render_model(model: &FormatModel, config: FormatConfig) -> String {
    let levels = if config.recurse {
        model.levels()
    } else {
        vec![model]
    };

    let mut text = levels
        .iter()
        .enumerate()
        .map(|(depth, level)| render_level(level, depth, &config))
        .collect::<Vec<_>>()
        .join("\n");

    if config.stack
        && let Some(stack) = chain_stack(&levels, &config)
    {
        text.push('\n');
        text.push_str(&stack);
    }
    text
}

/// Split `error` into its rendered message and the deepest stack its chain carries.
pub fn to_format_details(
    error: &(dyn Error + 'static),
    options: FormatDetailsOptions,
) -> FormatDetails {
    let model = to_format_model(error);
    let config = FormatConfig::from(options);
    let stack = if options.stack {
        chain_stack(&model.levels(), &config)
    } else {
        None
    };
    FormatDetails {
        message: render_model(&model, config),
        stack,
    }
}

fn render_level(level: &FormatModel, depth: usize, config: &FormatConfig) -> String {
    let mut text = String::new();
    if depth > 0 {
        text.push_str(&nesting_marker(depth));
    }
    if config.location
        && let Some(location) = &level.location
    {
        text.push_str(location);
        text.push_str(": ");
    }
    text.push_str(&level.message);

    if config.details
        && let Some(details) = level.details.as_deref().filter(|d| !d.is_empty())
    {
        if details.contains('\n') {
            text.push_str(" - details:\n");
            text.push_str(&indent_text(details, 1, IndentOptions::default()));
        } else {
            text.push_str(". ");
            text.push_str(details);
        }
    }

    indent_text(&text, depth, IndentOptions::default())
}

/// `[error -> error] ` for depth 1, one more `error` per level below.
fn nesting_marker(depth: usize) -> String {
    format!("[{}] ", vec!["error"; depth + 1].join(" -> "))
}

/// Groomed stack of the deepest level carrying one. Plain errors have no stack, so a chain
/// ending in one reports the stack of the structured error wrapping it.
fn chain_stack(levels: &[&FormatModel], config: &FormatConfig) -> Option<String> {
    levels
        .iter()
        .rev()
        .find(|level| !level.stack.is_empty())
        .and_then(|level| groomed_stack(level, config))
}

fn groomed_stack(level: &FormatModel, config: &FormatConfig) -> Option<String> {
    let lines: Vec<&str> = level
        .stack
        .iter()
        .skip(config.groom.drop_count)
        .take(config.groom.max_lines)
        .map(String::as_str)
        .collect();
    (!lines.is_empty()).then(|| lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pigsty_error::StructuredError;
    use pigsty_stack::GroomOptions;
    use pretty_assertions::assert_eq;

    fn nested_pair() -> StructuredError {
        let inner = StructuredError::builder()
            .with_message("inner\ndetails")
            .with_stack("at Inner.f1 (module1.js:100:10)")
            .build();
        StructuredError::builder()
            .with_cause(inner)
            .with_message("outer")
            .with_stack("at Outer.f1 (module1.js:200:10)")
            .build()
    }

    #[test]
    fn test_nesting_marker() {
        assert_eq!(nesting_marker(1), "[error -> error] ");
        assert_eq!(nesting_marker(2), "[error -> error -> error] ");
    }

    #[test]
    fn test_single_level_no_location() {
        let error = StructuredError::builder()
            .with_message("plain")
            .with_stack("")
            .build();
        assert_eq!(render(&error, FormatConfig::diagnostic()), "plain");
    }

    #[test]
    fn test_plain_error_renders_message() {
        let error = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        assert_eq!(render_diagnostic(&error), "disk full");
    }

    #[test]
    fn test_single_line_details() {
        let error = StructuredError::builder()
            .with_message("save failed")
            .with_details(" quota exceeded ")
            .with_stack("")
            .build();
        assert_eq!(
            render(&error, FormatConfig::friendly().with_details(true)),
            "save failed. quota exceeded"
        );
        assert_eq!(render_friendly(&error), "save failed");
    }

    #[test]
    fn test_multi_line_details() {
        let error = StructuredError::builder()
            .with_message("save failed")
            .with_details("line one\nline two")
            .with_stack("")
            .build();
        assert_eq!(
            render(&error, FormatConfig::friendly().with_details(true)),
            "save failed - details:\n   line one\n   line two"
        );
    }

    #[test]
    fn test_nested_with_location_and_stack() {
        let error = nested_pair();
        assert_eq!(
            render_diagnostic(&error),
            "module1.js::Outer.f1(): outer\n   [error -> error] module1.js::Inner.f1(): inner\n   details\nat Inner.f1 (module1.js:100:10)"
        );
    }

    #[test]
    fn test_nested_friendly() {
        assert_eq!(
            render_friendly(&nested_pair()),
            "outer\n   [error -> error] inner\n   details"
        );
    }

    #[test]
    fn test_without_recursion_uses_own_stack() {
        let config = FormatConfig::diagnostic().with_recurse(false);
        assert_eq!(
            render(&nested_pair(), config),
            "module1.js::Outer.f1(): outer\nat Outer.f1 (module1.js:200:10)"
        );
    }

    #[test]
    fn test_stack_is_groomed() {
        let error = StructuredError::builder()
            .with_message("m")
            .with_stack("at a (x.js:1:1)\nat b (x.js:2:1)\nat c (x.js:3:1)")
            .build();
        let config = FormatConfig::friendly()
            .with_stack(true)
            .with_groom(GroomOptions::new().with_drop_count(1).with_max_lines(1));
        assert_eq!(render(&error, config), "m\nat b (x.js:2:1)");
    }

    #[test]
    fn test_format_details() {
        let details = to_format_details(&nested_pair(), FormatDetailsOptions::new(true, true));
        assert_eq!(
            details,
            FormatDetails {
                message: "module1.js::Outer.f1(): outer\n   [error -> error] module1.js::Inner.f1(): inner\n   details".to_string(),
                stack: Some("at Inner.f1 (module1.js:100:10)".to_string()),
            }
        );

        let brief = to_format_details(&nested_pair(), FormatDetailsOptions::default());
        assert_eq!(brief.message, "outer\n   [error -> error] inner\n   details");
        assert_eq!(brief.stack, None);
    }

    #[test]
    fn test_stack_of_wrapper_when_cause_is_plain() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let error = StructuredError::builder()
            .with_source(io)
            .with_message("load failed")
            .with_stack("at Loader.read (/app/loader.js:12:5)")
            .build();
        assert_eq!(
            render_diagnostic(&error),
            "/app/loader.js::Loader.read(): load failed\n   [error -> error] missing\nat Loader.read (/app/loader.js:12:5)"
        );
        let details = to_format_details(&error, FormatDetailsOptions::new(true, true));
        assert_eq!(
            details.stack.as_deref(),
            Some("at Loader.read (/app/loader.js:12:5)")
        );

        let wrapped = StructuredError::builder()
            .with_cause("connection reset")
            .with_message("fetch failed")
            .with_stack("at fetch (net.js:7:1)")
            .build();
        assert_eq!(
            render(&wrapped, FormatConfig::friendly().with_stack(true)),
            "fetch failed\n   [error -> error] connection reset\nat fetch (net.js:7:1)"
        );
    }

    #[test]
    fn test_format_details_without_stack_lines() {
        let error = StructuredError::builder()
            .with_message("m")
            .with_stack("")
            .build();
        let details = to_format_details(&error, FormatDetailsOptions::new(true, true));
        assert_eq!(details.stack, None);
        assert_eq!(
            serde_json::to_value(&details).unwrap(),
            serde_json::json!({ "message": "m" })
        );
    }
}
