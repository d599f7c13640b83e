//! SNBT error types
//!
//! Every message a user can see while parsing, resolving or formatting SNBT
//! text is a variant here. Grammar rules report them as failure reasons;
//! the engine keeps the ones at the furthest position and hands them back
//! wrapped in [`SnbtError::Grammar`].

use crate::tag::TagType;
use snbt_core::NumberFormatError;
use snbt_grammar::GrammarError;
use thiserror::Error;

/// Errors produced by the SNBT parser, operations and format service.
#[derive(Debug, Clone, Error)]
pub enum SnbtError {
    #[error("Failed to parse number: {0}")]
    NumberParse(NumberFormatError),

    #[error("Expected a character literal of length {0}")]
    ExpectedHexEscape(usize),

    #[error("Invalid Unicode character value: {0}")]
    InvalidCodePoint(u32),

    /// `name/argc` of an unknown operation
    #[error("No such operation: {0}")]
    NoSuchOperation(String),

    #[error("Expected an integer number")]
    ExpectedIntegerType,

    #[error("Expected a floating point number")]
    ExpectedFloatType,

    #[error("Expected a non-negative number")]
    ExpectedNonNegative,

    #[error("Invalid Unicode character name")]
    InvalidCharacterName,

    #[error("Invalid array element type")]
    InvalidArrayElementType,

    #[error("Unquoted strings can't start with digits 0-9, + or -")]
    InvalidUnquotedStart,

    #[error("Expected a valid unquoted string")]
    ExpectedUnquotedString,

    #[error("Invalid string contents")]
    InvalidStringContents,

    #[error("Expected a binary number")]
    ExpectedBinaryNumeral,

    #[error("Underscore characters are not allowed at the start or end of a number")]
    UnderscoreNotAllowed,

    #[error("Expected a decimal number")]
    ExpectedDecimalNumeral,

    #[error("Expected a hexadecimal number")]
    ExpectedHexNumeral,

    #[error("Key cannot be empty")]
    EmptyKey,

    #[error("Decimal numbers can't start with 0")]
    LeadingZeroNotAllowed,

    #[error("Non-finite numbers are not allowed")]
    NonFiniteNumber,

    #[error("Mixed list: expected {expected}, got {actual}")]
    MixedList { expected: TagType, actual: TagType },

    #[error("Expected a number or a boolean")]
    ExpectedNumberOrBoolean,

    #[error("Unexpected trailing data at position {0}")]
    TrailingData(usize),

    /// Parse failure with the reasons found at the furthest position
    #[error(transparent)]
    Grammar(#[from] GrammarError),
}

impl SnbtError {
    /// Byte offset in the input the error refers to, when known.
    pub fn cursor(&self) -> Option<usize> {
        match self {
            SnbtError::Grammar(error) => error.cursor(),
            SnbtError::TrailingData(position) => Some(*position),
            _ => None,
        }
    }
}

impl From<NumberFormatError> for SnbtError {
    fn from(error: NumberFormatError) -> Self {
        SnbtError::NumberParse(error)
    }
}

/// Result type for SNBT operations
pub type SnbtResult<T> = Result<T, SnbtError>;

#[cfg(test)]
mod tests {
    use super::*;
    use snbt_grammar::reason;

    #[test]
    fn test_number_messages_wrap_java_text() {
        let error = SnbtError::from(NumberFormatError::ForInputString {
            input: "12x".to_string(),
            radix: 16,
        });
        assert_eq!(
            error.to_string(),
            "Failed to parse number: For input string: \"12x\" under radix 16"
        );
    }

    #[test]
    fn test_grammar_errors_are_transparent() {
        let error = SnbtError::from(GrammarError::Parse {
            cursor: 4,
            reason: reason(SnbtError::EmptyKey),
        });
        assert_eq!(error.to_string(), "Key cannot be empty");
        assert_eq!(error.cursor(), Some(4));
    }

    #[test]
    fn test_mixed_list_message() {
        let error = SnbtError::MixedList {
            expected: TagType::Int,
            actual: TagType::String,
        };
        assert_eq!(error.to_string(), "Mixed list: expected int, got string");
    }
}
