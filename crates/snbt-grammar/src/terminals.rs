//! Single-character and single-word terminals over [`StringReader`]
//!
//! Every terminal skips leading whitespace before it matches.

use crate::control::Control;
use crate::error::{reason, ReaderError, Reason};
use crate::reader::StringReader;
use crate::state::ParseState;
use crate::term::{BoxedTerm, Term};
use std::fmt;

type CharPredicate = Box<dyn Fn(char) -> bool + Send + Sync>;

/// Matches one character accepted by a predicate.
pub struct TerminalCharacters {
    accept: CharPredicate,
    description: String,
    error: Reason,
}

impl TerminalCharacters {
    fn new(accept: CharPredicate, description: String) -> Self {
        let error = reason(ReaderError::ExpectedLiteral(description.clone()));
        Self {
            accept,
            description,
            error,
        }
    }
}

impl Term<StringReader> for TerminalCharacters {
    fn parse(&self, state: &mut ParseState<'_, StringReader>, _control: Control) -> bool {
        state.input_mut().skip_whitespace();
        let cursor = state.mark();
        match state.input_mut().read() {
            Some(c) if (self.accept)(c) => true,
            _ => {
                state.store_reason(cursor, &self.error);
                false
            }
        }
    }
}

impl fmt::Debug for TerminalCharacters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "terminal[{}]", self.description)
    }
}

/// Matches an unquoted word exactly.
pub struct TerminalWord {
    value: String,
    error: Reason,
}

impl Term<StringReader> for TerminalWord {
    fn parse(&self, state: &mut ParseState<'_, StringReader>, _control: Control) -> bool {
        state.input_mut().skip_whitespace();
        let cursor = state.mark();
        if state.input_mut().read_unquoted_string() == self.value {
            true
        } else {
            state.store_reason(cursor, &self.error);
            false
        }
    }
}

impl fmt::Debug for TerminalWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "terminal[{}]", self.value)
    }
}

pub fn character(value: char) -> BoxedTerm<StringReader> {
    Box::new(TerminalCharacters::new(
        Box::new(move |c| c == value),
        value.to_string(),
    ))
}

/// Either of two characters, e.g. both cases of a letter.
pub fn characters(first: char, second: char) -> BoxedTerm<StringReader> {
    Box::new(TerminalCharacters::new(
        Box::new(move |c| c == first || c == second),
        format!("{first}|{second}"),
    ))
}

/// One character accepted by `accept`; `description` names the class in
/// the error message.
pub fn char_class<F>(accept: F, description: impl Into<String>) -> BoxedTerm<StringReader>
where
    F: Fn(char) -> bool + Send + Sync + 'static,
{
    Box::new(TerminalCharacters::new(Box::new(accept), description.into()))
}

pub fn word(value: impl Into<String>) -> BoxedTerm<StringReader> {
    let value = value.into();
    let error = reason(ReaderError::ExpectedLiteral(value.clone()));
    Box::new(TerminalWord { value, error })
}
