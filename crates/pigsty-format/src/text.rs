/// How [`indent_text`] indents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndentOptions<'a> {
    /// Text inserted once per depth
    pub indent: &'a str,

    /// Lines left untouched at the top
    pub skip: usize,
}

impl Default for IndentOptions<'_> {
    fn default() -> Self {
        IndentOptions {
            indent: "   ",
            skip: 0,
        }
    }
}

impl<'a> IndentOptions<'a> {
    pub fn with_indent(mut self, indent: &'a str) -> Self {
        self.indent = indent;
        self
    }

    pub fn with_skip(mut self, skip: usize) -> Self {
        self.skip = skip;
        self
    }
}

/// Indent every non-blank line of `text` by `depth` indents.
pub fn indent_text(text: &str, depth: usize, options: IndentOptions<'_>) -> String {
    if depth == 0 {
        return text.to_string();
    }
    let prefix = options.indent.repeat(depth);
    text.split('\n')
        .enumerate()
        .map(|(index, line)| {
            if index >= options.skip && !line.trim().is_empty() {
                format!("{}{}", prefix, line)
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
