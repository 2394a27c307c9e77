use pigsty_stack::GroomOptions;

/// What [`crate::render`] includes.
///
/// Use the builder methods to customize behavior, or one of the presets
/// [`FormatConfig::diagnostic()`] and [`FormatConfig::friendly()`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatConfig {
    /// Append each level's details
    pub details: bool,

    /// Append the deepest stack the chain carries
    pub stack: bool,

    /// Prefix each level with `<module>::<context>.<method>(): `
    pub location: bool,

    /// Render every cause, not only the outermost error
    pub recurse: bool,

    /// How much of the stack to show
    pub groom: GroomOptions,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self::diagnostic()
    }
}

impl FormatConfig {
    pub fn new() -> Self {
        Self::default()
    }

    // Builder methods
    // ====================================================================

    pub fn with_details(mut self, enabled: bool) -> Self {
        self.details = enabled;
        self
    }

    pub fn with_stack(mut self, enabled: bool) -> Self {
        self.stack = enabled;
        self
    }

    pub fn with_location(mut self, enabled: bool) -> Self {
        self.location = enabled;
        self
    }

    pub fn with_recurse(mut self, enabled: bool) -> Self {
        self.recurse = enabled;
        self
    }

    pub fn with_groom(mut self, groom: GroomOptions) -> Self {
        self.groom = groom;
        self
    }

    // Preset configurations
    // ====================================================================

    /// Everything: location, details and stack
    pub fn diagnostic() -> Self {
        FormatConfig {
            details: true,
            stack: true,
            location: true,
            recurse: true,
            groom: GroomOptions::default(),
        }
    }

    /// Messages only, suitable for showing to a user
    pub fn friendly() -> Self {
        FormatConfig {
            details: false,
            stack: false,
            location: false,
            ..Self::diagnostic()
        }
    }
}

/// What [`crate::to_format_details`] includes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormatDetailsOptions {
    /// Include locations and details in the message
    pub details: bool,

    /// Include the deepest stack the chain carries
    pub stack: bool,
}

impl FormatDetailsOptions {
    pub fn new(details: bool, stack: bool) -> Self {
        FormatDetailsOptions { details, stack }
    }
}

impl From<FormatDetailsOptions> for FormatConfig {
    fn from(options: FormatDetailsOptions) -> Self {
        FormatConfig {
            details: options.details,
            location: options.details,
            stack: false,
            ..FormatConfig::diagnostic()
        }
    }
}
