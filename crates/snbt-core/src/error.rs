//! Error types for numeric parsing and arithmetic

use thiserror::Error;

/// Errors produced when text cannot be turned into a number.
///
/// The messages match the ones Java's `Integer.parseInt`, `Double.parseDouble`
/// and friends produce, since SNBT consumers surface them verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NumberFormatError {
    #[error("empty String")]
    Empty,

    #[error("For input string: \"{input}\"{}", radix_suffix(*.radix))]
    ForInputString { input: String, radix: u32 },

    #[error("Value out of range. Value:\"{input}\" Radix:{radix}")]
    ValueOutOfRange { input: String, radix: u32 },

    #[error("Illegal leading minus sign on unsigned string {0}.")]
    IllegalLeadingMinus(String),

    #[error("String value {input} exceeds range of unsigned {kind}.")]
    ExceedsUnsignedRange { input: String, kind: &'static str },

    #[error("out of range: {0}")]
    OutOfRange(i64),

    #[error("multiple points")]
    MultiplePoints,

    #[error("radix {0} out of range")]
    InvalidRadix(u32),
}

impl NumberFormatError {
    pub(crate) fn for_input(input: &str, radix: u32) -> Self {
        Self::ForInputString {
            input: input.to_string(),
            radix,
        }
    }
}

fn radix_suffix(radix: u32) -> String {
    if radix == 10 {
        String::new()
    } else {
        format!(" under radix {radix}")
    }
}

/// Errors raised by the fixed-width arithmetic types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ArithmeticError {
    #[error("/ by zero")]
    DivisionByZero,
}

/// Result type for number parsing
pub type NumberResult<T> = Result<T, NumberFormatError>;

/// Result type for checked arithmetic
pub type ArithmeticResult<T> = Result<T, ArithmeticError>;
