//! SNBT Syntax
//!
//! The stringified tag format on top of the grammar engine:
//!
//! - **Tags**: the tag tree, including the virtual boolean and operation
//!   tags (`tag` module)
//! - **Grammar**: the SNBT rule set and [`parse_snbt`] (`grammar` module)
//! - **Formatting**: compact and indented output via [`Tag::as_string`]
//!   (`format` module)
//! - **Operations**: a registry that resolves calls such as `bool(1)`
//!   (`operations` module)
//! - **Service**: [`format_snbt`], a parse-then-format request with timings
//!
//! ```
//! use snbt_syntax::{format_snbt, parse_snbt, FormatOptions, Tag};
//!
//! let tag = parse_snbt("{name: Steve, health: 20.0f}").unwrap();
//! assert_eq!(tag.as_string(0), "{health:20.0f,name:\"Steve\"}");
//!
//! let formatted = format_snbt("[1b, 2b]", &FormatOptions::default()).unwrap();
//! assert_eq!(formatted.output, "[1b, 2b]");
//! ```

pub mod error;
pub mod format;
pub mod grammar;
pub mod operations;
pub mod options;
pub mod service;
pub mod tag;

pub use error::{SnbtError, SnbtResult};
pub use format::quote_and_escape;
pub use grammar::{grammar, parse_snbt};
pub use operations::{OperationRegistry, OperationSpec, Operations};
pub use options::FormatOptions;
pub use service::{format_snbt, Formatted};
pub use tag::{CompoundTag, ListTag, OperationTag, Tag, TagType};

/// Version information for the snbt-syntax crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
