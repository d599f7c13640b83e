//! Error types for grammar construction, reading and top-level parsing

use std::error::Error as StdError;
use std::sync::Arc;
use thiserror::Error;

/// Why a term or rule failed at some cursor.
///
/// Reasons are collected, never thrown, while parsing runs. Any error type
/// can be used; they are shared because one failing terminal may report
/// the same reason many times during backtracking.
pub type Reason = Arc<dyn StdError + Send + Sync>;

/// Share an error value as a [`Reason`].
pub fn reason<E: StdError + Send + Sync + 'static>(error: E) -> Reason {
    Arc::new(error)
}

/// Errors surfaced by the engine itself.
#[derive(Debug, Clone, Error)]
pub enum GrammarError {
    /// Forward references that were never given a rule
    #[error("Unbound names: {}", .0.join(", "))]
    UnboundNames(Vec<String>),

    #[error("No rule called {0}")]
    NoSuchRule(String),

    /// A top-level parse finished with frames still open
    #[error("Malformed scope: {0}")]
    MalformedScope(String),

    #[error("No value for {0}")]
    MissingValue(String),

    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    /// The single distinct reason left at the deepest failure cursor
    #[error("{reason}")]
    Parse { cursor: usize, reason: Reason },

    /// Several distinct reasons at the deepest failure cursor
    #[error("Failed to parse: {}", join_reasons(.reasons))]
    Aggregate { cursor: usize, reasons: Vec<Reason> },
}

impl GrammarError {
    /// Cursor of a parse failure, if this is one
    pub fn cursor(&self) -> Option<usize> {
        match self {
            GrammarError::Parse { cursor, .. } | GrammarError::Aggregate { cursor, .. } => {
                Some(*cursor)
            }
            _ => None,
        }
    }

    /// The reasons behind a parse failure
    pub fn reasons(&self) -> Vec<Reason> {
        match self {
            GrammarError::Parse { reason, .. } => vec![Arc::clone(reason)],
            GrammarError::Aggregate { reasons, .. } => reasons.clone(),
            _ => Vec::new(),
        }
    }
}

impl From<regex::Error> for GrammarError {
    fn from(error: regex::Error) -> Self {
        GrammarError::InvalidPattern(error.to_string())
    }
}

fn join_reasons(reasons: &[Reason]) -> String {
    reasons
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Errors raised by [`StringReader`](crate::StringReader) and the reader
/// terminals.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReaderError {
    #[error("Invalid escape: {0}")]
    InvalidEscape(char),

    #[error("Expected end of quote")]
    ExpectedEndOfQuote,

    #[error("Expected start of quote")]
    ExpectedStartOfQuote,

    #[error("Expected symbol: {0}")]
    ExpectedSymbol(char),

    /// `Expected literal a|b`
    #[error("Expected literal {0}")]
    ExpectedLiteral(String),

    /// A failed parse with no recorded reason
    #[error("Input does not match the grammar")]
    NoMatch,
}

/// Result type for grammar operations
pub type GrammarResult<T> = Result<T, GrammarError>;
