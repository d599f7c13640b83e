//! Property tests: a list grammar agrees with an equivalent regex

use once_cell::sync::Lazy;
use proptest::prelude::*;
use regex::Regex;
use snbt_grammar::rules::GreedyPredicateRule;
use snbt_grammar::term::repeated_with_separator;
use snbt_grammar::terminals::character;
use snbt_grammar::{
    seq, Atom, Dictionary, Grammar, LongestOnly, ParseState, ReaderError, StringReader,
};

static LIST: Lazy<Grammar<Vec<String>>> = Lazy::new(|| {
    let mut rules = Dictionary::<StringReader>::new();
    let digit: Atom<String> = Atom::new("digit");
    let items: Atom<Vec<String>> = Atom::new("items");
    let list: Atom<Vec<String>> = Atom::new("list");
    let digit = rules.put_rule(
        digit,
        GreedyPredicateRule::exactly(
            |c| c.is_ascii_digit(),
            1,
            ReaderError::ExpectedLiteral("digit".to_string()),
        ),
    );
    let entries = repeated_with_separator(digit, items, character(','));
    let top = rules.put(
        list,
        seq![character('['), entries, character(']')],
        move |state| state.scope().get(items),
    );
    Grammar::new(rules, top).unwrap()
});

static REFERENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\[(?:\d(?:,\d)*)?\]").unwrap());

proptest! {
    #[test]
    fn list_grammar_matches_reference(input in "[\\[\\],0-9]{0,12}") {
        let parsed = LIST.parse_for_commands(&mut StringReader::new(input.as_str()));
        let expected = REFERENCE.find(&input).map(|m| {
            m.as_str()
                .trim_matches(|c| c == '[' || c == ']')
                .split(',')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>()
        });
        prop_assert_eq!(parsed.ok(), expected);
    }

    #[test]
    fn scope_always_balanced(input in "[\\[\\], 0-9a]{0,16}") {
        let mut collector = LongestOnly::new();
        let mut state = ParseState::new(StringReader::new(input), &mut collector);
        prop_assert!(LIST.parse(&mut state).is_ok());
        prop_assert!(state.scope().has_only_single_frame());
    }

    #[test]
    fn failures_report_a_cursor_inside_input(input in "[\\[\\],0-9]{0,12}") {
        if let Err(error) = LIST.parse_for_commands(&mut StringReader::new(input.as_str())) {
            let cursor = error.cursor();
            prop_assert!(cursor.is_some_and(|cursor| cursor <= input.len()));
        }
    }
}
