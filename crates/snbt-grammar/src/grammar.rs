//! A checked dictionary plus its entry rule

use crate::dictionary::Dictionary;
use crate::error::GrammarResult;
use crate::error_collector::LongestOnly;
use crate::reader::StringReader;
use crate::rule::NamedRule;
use crate::state::ParseState;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// A complete text grammar producing `T`.
///
/// Immutable once built; share it between threads and give every parse its
/// own [`ParseState`].
pub struct Grammar<T> {
    rules: Dictionary<StringReader>,
    top: Arc<NamedRule<StringReader, T>>,
}

impl<T> Grammar<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Fails with [`GrammarError::UnboundNames`] if any referenced rule was
    /// never defined.
    pub fn new(
        rules: Dictionary<StringReader>,
        top: Arc<NamedRule<StringReader, T>>,
    ) -> GrammarResult<Self> {
        rules.check_all_bound()?;
        debug!(rules = rules.len(), top = %top.atom(), "grammar built");
        Ok(Self { rules, top })
    }

    pub fn rules(&self) -> &Dictionary<StringReader> {
        &self.rules
    }

    pub fn top(&self) -> &NamedRule<StringReader, T> {
        &self.top
    }

    /// Run the top rule on a caller-provided state.
    pub fn parse(&self, state: &mut ParseState<'_, StringReader>) -> GrammarResult<Option<T>> {
        state.parse_top_rule(&self.top)
    }

    /// Parse from the reader's cursor and turn a failure into one error.
    ///
    /// Only reasons at the furthest cursor reached are kept. A single
    /// distinct reason becomes [`GrammarError::Parse`]; several become
    /// [`GrammarError::Aggregate`]. On success the reader is left after the
    /// value.
    pub fn parse_for_commands(&self, reader: &mut StringReader) -> GrammarResult<T> {
        let mut collector = LongestOnly::new();
        let result = {
            let mut state = ParseState::new(reader.clone(), &mut collector);
            let result = self.parse(&mut state)?;
            if result.is_some() {
                reader.set_cursor(state.mark());
            }
            result
        };
        if let Some(value) = result {
            return Ok(value);
        }

        Err(collector.to_error(reader.cursor()))
    }
}

impl<T> fmt::Debug for Grammar<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grammar")
            .field("rules", &self.rules)
            .field("top", &self.top)
            .finish()
    }
}
