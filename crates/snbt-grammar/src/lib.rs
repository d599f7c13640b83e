//! SNBT Grammar Engine
//!
//! A backtracking PEG runtime with packrat memoization:
//!
//! - **Atoms**: typed identity keys for rules and bindings (`atom` module)
//! - **Scope**: frame-structured bindings shared by terms and actions
//!   (`scope` module)
//! - **Terms**: sequence, ordered choice with cuts, optional, look-ahead and
//!   repetition (`term` module)
//! - **Rules**: named, forward-referencable rules collected in a
//!   [`Dictionary`] and driven by a [`Grammar`]
//! - **Reader terminals**: characters, words and runs over a
//!   [`StringReader`] (`terminals` and `rules` modules)
//!
//! Failures never unwind through the grammar. Terms report reasons to an
//! [`ErrorCollector`]; [`LongestOnly`] keeps those at the furthest cursor,
//! which is what [`Grammar::parse_for_commands`] reports.
//!
//! ```
//! use snbt_grammar::{alt, seq, Atom, Dictionary, Grammar, StringReader};
//! use snbt_grammar::terminals::{character, word};
//!
//! let mut rules = Dictionary::<StringReader>::new();
//! let answer: Atom<bool> = Atom::new("answer");
//! let top = rules.put_simple(
//!     answer,
//!     alt![seq![word("yes"), character('!')], word("no")],
//!     |state| state.input().string().starts_with("yes"),
//! );
//! let grammar = Grammar::new(rules, top).unwrap();
//! assert!(grammar.parse_for_commands(&mut StringReader::new("yes !")).unwrap());
//! ```

pub mod atom;
pub mod control;
pub mod dictionary;
pub mod error;
pub mod error_collector;
pub mod grammar;
pub mod reader;
pub mod rule;
pub mod rules;
pub mod scope;
pub mod state;
pub mod term;
pub mod terminals;

pub use atom::{Atom, AtomId};
pub use control::Control;
pub use dictionary::Dictionary;
pub use error::{reason, GrammarError, GrammarResult, ReaderError, Reason};
pub use error_collector::{ErrorCollector, ErrorEntry, LongestOnly, NoOp};
pub use grammar::Grammar;
pub use reader::StringReader;
pub use rule::{NamedRule, Rule, SimpleRule};
pub use scope::Scope;
pub use state::{ParseInput, ParseState};
pub use term::{BoxedTerm, Term};

/// Version information for the snbt-grammar crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
