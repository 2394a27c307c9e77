//! Shared CLI options.

use clap::Args;
use pigsty_stack::GroomOptions;

/// How much of a trace to keep.
#[derive(Args, Debug, Clone)]
pub struct GroomArgs {
    /// Call-site lines dropped from the top
    #[arg(long = "drop", default_value_t = 0)]
    pub drop_count: usize,

    /// Call-site lines kept after dropping
    #[arg(long = "max-lines", default_value_t = 10)]
    pub max_lines: usize,
}

impl Default for GroomArgs {
    fn default() -> Self {
        GroomOptions::default().into()
    }
}

impl GroomArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_drop_count(mut self, count: usize) -> Self {
        self.drop_count = count;
        self
    }

    pub fn with_max_lines(mut self, lines: usize) -> Self {
        self.max_lines = lines;
        self
    }
}

impl From<GroomOptions> for GroomArgs {
    fn from(options: GroomOptions) -> Self {
        GroomArgs {
            drop_count: options.drop_count,
            max_lines: options.max_lines,
        }
    }
}

impl From<GroomArgs> for GroomOptions {
    fn from(args: GroomArgs) -> Self {
        GroomOptions::new()
            .with_drop_count(args.drop_count)
            .with_max_lines(args.max_lines)
    }
}
