//! Cursor over an owned string, the input type of text grammars

use crate::error::ReaderError;
use crate::state::ParseInput;

pub const SYNTAX_ESCAPE: char = '\\';
pub const SYNTAX_DOUBLE_QUOTE: char = '"';
pub const SYNTAX_SINGLE_QUOTE: char = '\'';

/// Java `Character.isWhitespace`: Unicode separators except the
/// non-breaking ones, plus the ASCII control whitespace and the
/// information separators U+001C..U+001F.
pub fn is_java_whitespace(c: char) -> bool {
    match c {
        '\u{1C}'..='\u{1F}' => true,
        '\u{85}' | '\u{A0}' | '\u{2007}' | '\u{202F}' => false,
        _ => c.is_whitespace(),
    }
}

pub fn is_quoted_string_start(c: char) -> bool {
    c == SYNTAX_DOUBLE_QUOTE || c == SYNTAX_SINGLE_QUOTE
}

pub fn is_allowed_in_unquoted_string(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '+')
}

/// Text with a byte cursor that always sits on a char boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringReader {
    string: String,
    cursor: usize,
}

impl StringReader {
    pub fn new(string: impl Into<String>) -> Self {
        Self {
            string: string.into(),
            cursor: 0,
        }
    }

    pub fn string(&self) -> &str {
        &self.string
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn set_cursor(&mut self, cursor: usize) {
        debug_assert!(self.string.is_char_boundary(cursor));
        self.cursor = cursor.min(self.string.len());
    }

    /// Text from the cursor to the end
    pub fn remaining(&self) -> &str {
        &self.string[self.cursor..]
    }

    pub fn can_read(&self) -> bool {
        self.cursor < self.string.len()
    }

    /// Whether at least `length` more characters are available
    pub fn can_read_n(&self, length: usize) -> bool {
        length == 0 || self.remaining().chars().nth(length - 1).is_some()
    }

    pub fn peek(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    pub fn peek_at(&self, offset: usize) -> Option<char> {
        self.remaining().chars().nth(offset)
    }

    pub fn read(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.cursor += c.len_utf8();
        Some(c)
    }

    pub fn skip(&mut self) {
        let _ = self.read();
    }

    pub fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(is_java_whitespace) {
            self.skip();
        }
    }

    /// Longest run of `[0-9A-Za-z_.+-]` at the cursor, possibly empty
    pub fn read_unquoted_string(&mut self) -> &str {
        let start = self.cursor;
        while self.peek().is_some_and(is_allowed_in_unquoted_string) {
            self.skip();
        }
        &self.string[start..self.cursor]
    }

    pub fn read_quoted_string(&mut self) -> Result<String, ReaderError> {
        let Some(next) = self.peek() else {
            return Ok(String::new());
        };
        if !is_quoted_string_start(next) {
            return Err(ReaderError::ExpectedStartOfQuote);
        }
        self.skip();
        self.read_string_until(next)
    }

    /// Read up to an unescaped `terminator`, consuming it. Only the
    /// terminator and the escape character itself may be escaped.
    pub fn read_string_until(&mut self, terminator: char) -> Result<String, ReaderError> {
        let mut result = String::new();
        let mut escaped = false;
        while let Some(c) = self.read() {
            if escaped {
                if c == terminator || c == SYNTAX_ESCAPE {
                    result.push(c);
                    escaped = false;
                } else {
                    return Err(ReaderError::InvalidEscape(c));
                }
            } else if c == SYNTAX_ESCAPE {
                escaped = true;
            } else if c == terminator {
                return Ok(result);
            } else {
                result.push(c);
            }
        }
        Err(ReaderError::ExpectedEndOfQuote)
    }

    /// A quoted string if one starts here, otherwise an unquoted one
    pub fn read_string(&mut self) -> Result<String, ReaderError> {
        match self.peek() {
            None => Ok(String::new()),
            Some(next) if is_quoted_string_start(next) => {
                self.skip();
                self.read_string_until(next)
            }
            Some(_) => Ok(self.read_unquoted_string().to_string()),
        }
    }

    pub fn expect(&mut self, c: char) -> Result<(), ReaderError> {
        if self.peek() == Some(c) {
            self.skip();
            Ok(())
        } else {
            Err(ReaderError::ExpectedSymbol(c))
        }
    }
}

impl ParseInput for StringReader {
    fn mark(&self) -> usize {
        self.cursor
    }

    fn restore(&mut self, cursor: usize) {
        self.set_cursor(cursor);
    }
}

impl From<&str> for StringReader {
    fn from(string: &str) -> Self {
        Self::new(string)
    }
}
