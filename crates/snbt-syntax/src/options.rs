//! Format request options

use serde::{Deserialize, Serialize};

/// Widest indent a request may ask for
pub const MAX_INDENT: usize = 10;

/// Indent used when a request does not name one
pub const DEFAULT_INDENT: usize = 2;

/// How [`format_snbt`](crate::format_snbt) should render its input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatOptions {
    /// Spaces per nesting level; 0 is compact output. Values above
    /// [`MAX_INDENT`] are treated as [`MAX_INDENT`].
    #[serde(default = "default_indent")]
    pub indent: usize,

    /// Run operation calls before formatting
    #[serde(default)]
    pub resolve: bool,
}

impl FormatOptions {
    pub fn with_indent(indent: usize) -> Self {
        Self {
            indent,
            ..Self::default()
        }
    }

    /// The indent actually used
    pub fn indent(&self) -> usize {
        self.indent.min(MAX_INDENT)
    }
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            indent: default_indent(),
            resolve: false,
        }
    }
}

fn default_indent() -> usize {
    DEFAULT_INDENT
}
