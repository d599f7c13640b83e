//! The SNBT grammar
//!
//! Rules are registered in a [`Dictionary`] once and shared through a lazily
//! built [`Grammar`]. Number rules produce intermediate literals (see
//! [`literals`]) so that typed arrays can decide element widths themselves.
//! Semantic failures inside actions are reported at the current cursor and
//! make the rule fail; they then compete with ordinary mismatches for the
//! furthest position.

pub mod literals;

use crate::error::{SnbtError, SnbtResult};
use crate::tag::{CompoundTag, ListTag, OperationTag, Tag};
use compact_str::CompactString;
use literals::{
    ArrayPrefix, Base, Exponent, FloatLiteral, IntegerLiteral, IntegerSuffix, Sign, Signedness,
    TypeSuffix,
};
use once_cell::sync::Lazy;
use snbt_grammar::rules::{GreedyPatternRule, GreedyPredicateRule, NumberRunRule, UnquotedStringRule};
use snbt_grammar::term::{
    cut, fail, marker, optional, positive_look_ahead, repeated, repeated_with_separator,
};
use snbt_grammar::terminals::{char_class, character, characters};
use snbt_grammar::{
    alt, seq, Atom, BoxedTerm, Dictionary, Grammar, GrammarResult, LongestOnly, ParseState,
    StringReader,
};
use std::sync::Arc;
use tracing::debug;

type State<'a, 'c> = &'a mut ParseState<'c, StringReader>;

static SNBT: Lazy<GrammarResult<Grammar<Tag>>> = Lazy::new(build);

/// The shared SNBT grammar.
pub fn grammar() -> SnbtResult<&'static Grammar<Tag>> {
    match &*SNBT {
        Ok(grammar) => Ok(grammar),
        Err(error) => Err(SnbtError::Grammar(error.clone())),
    }
}

/// Parse a complete SNBT value. Whitespace may follow the value, nothing
/// else.
///
/// When the value is followed by more text but some rule got further into
/// it before failing (`1e400` parses as `1` followed by `e400`), the
/// failure from further in is reported instead of the trailing data.
pub fn parse_snbt(text: &str) -> SnbtResult<Tag> {
    let grammar = grammar()?;
    let mut collector = LongestOnly::new();
    let mut state = ParseState::new(StringReader::new(text), &mut collector);
    let parsed = grammar.parse(&mut state)?;
    let mut reader = state.into_input();

    let Some(tag) = parsed else {
        return Err(collector.to_error(0).into());
    };
    reader.skip_whitespace();
    if !reader.can_read() {
        return Ok(tag);
    }
    if collector.cursor().is_some_and(|cursor| cursor > reader.cursor()) {
        return Err(collector.to_error(reader.cursor()).into());
    }
    debug!(cursor = reader.cursor(), "trailing data after value");
    Err(SnbtError::TrailingData(reader.cursor()))
}

/// Turn an action result into a rule result, reporting the error.
fn report<T>(state: State<'_, '_>, result: SnbtResult<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(error) => {
            state.store_error(error);
            None
        }
    }
}

pub(crate) const fn can_start_number(c: char) -> bool {
    matches!(c, '+' | '-' | '.' | '0'..='9')
}

fn is_binary_digit(c: char) -> bool {
    matches!(c, '0' | '1' | '_')
}

fn is_decimal_digit(c: char) -> bool {
    c.is_ascii_digit() || c == '_'
}

fn is_hex_digit(c: char) -> bool {
    c.is_ascii_hexdigit() || c == '_'
}

fn is_plain_string_char(c: char) -> bool {
    !matches!(c, '"' | '\'' | '\\')
}

/// `b`, `s`, `i` or `l` in either case, stored in `atom`.
fn width_suffixes(atom: Atom<IntegerSuffix>, signedness: Option<Signedness>) -> BoxedTerm<StringReader> {
    alt![
        seq![characters('b', 'B'), marker(atom, IntegerSuffix::new(signedness, TypeSuffix::Byte))],
        seq![characters('s', 'S'), marker(atom, IntegerSuffix::new(signedness, TypeSuffix::Short))],
        seq![characters('i', 'I'), marker(atom, IntegerSuffix::new(signedness, TypeSuffix::Int))],
        seq![characters('l', 'L'), marker(atom, IntegerSuffix::new(signedness, TypeSuffix::Long))],
    ]
}

/// One quoted-string chunk: plain text, an escape, or the quote character
/// that does not close this string.
fn string_chunk(
    rules: &mut Dictionary<StringReader>,
    plain: Atom<String>,
    escape: Atom<String>,
    contents: Atom<String>,
    other_quote: char,
) -> BoxedTerm<StringReader> {
    alt![
        rules.named_with_alias(plain, contents),
        seq![character('\\'), rules.named_with_alias(escape, contents)],
        seq![character(other_quote), marker(contents, other_quote.to_string())],
    ]
}

#[allow(clippy::too_many_lines, unused_results)]
fn build() -> GrammarResult<Grammar<Tag>> {
    let mut rules = Dictionary::<StringReader>::new();

    // Numbers

    let sign: Atom<Sign> = Atom::new("sign");
    let body = alt![
        seq![character('+'), marker(sign, Sign::Plus)],
        seq![character('-'), marker(sign, Sign::Minus)],
    ];
    rules.put(sign, body, move |state| state.scope().get(sign));

    let integer_suffix: Atom<IntegerSuffix> = Atom::new("integer_suffix");
    let body = alt![
        seq![characters('u', 'U'), width_suffixes(integer_suffix, Some(Signedness::Unsigned))],
        seq![characters('s', 'S'), width_suffixes(integer_suffix, Some(Signedness::Signed))],
        width_suffixes(integer_suffix, None),
    ];
    rules.put(integer_suffix, body, move |state| state.scope().get(integer_suffix));

    let binary_numeral: Atom<String> = Atom::new("binary_numeral");
    rules.put_rule(
        binary_numeral,
        NumberRunRule::new(is_binary_digit, SnbtError::ExpectedBinaryNumeral, SnbtError::UnderscoreNotAllowed),
    );
    let decimal_numeral: Atom<String> = Atom::new("decimal_numeral");
    rules.put_rule(
        decimal_numeral,
        NumberRunRule::new(is_decimal_digit, SnbtError::ExpectedDecimalNumeral, SnbtError::UnderscoreNotAllowed),
    );
    let hex_numeral: Atom<String> = Atom::new("hex_numeral");
    rules.put_rule(
        hex_numeral,
        NumberRunRule::new(is_hex_digit, SnbtError::ExpectedHexNumeral, SnbtError::UnderscoreNotAllowed),
    );

    let integer_literal: Atom<IntegerLiteral> = Atom::new("integer_literal");
    let body = seq![
        optional(rules.named(sign)),
        alt![
            seq![
                character('0'),
                cut(),
                alt![
                    seq![characters('x', 'X'), cut(), rules.named(hex_numeral)],
                    seq![characters('b', 'B'), rules.named(binary_numeral)],
                    seq![rules.named(decimal_numeral), cut(), fail(SnbtError::LeadingZeroNotAllowed)],
                    marker(decimal_numeral, "0".to_string()),
                ],
            ],
            rules.named(decimal_numeral),
        ],
        optional(rules.named(integer_suffix)),
    ];
    let integer_literal_rule = rules.put(integer_literal, body, move |state| {
        let scope = state.scope();
        let sign = scope.get_or_default(sign, Sign::Plus);
        let suffix = scope.get_or_default(integer_suffix, IntegerSuffix::default());
        let (base, digits) = if let Some(digits) = scope.get(decimal_numeral) {
            (Base::Decimal, digits)
        } else if let Some(digits) = scope.get(hex_numeral) {
            (Base::Hex, digits)
        } else {
            (Base::Binary, scope.get(binary_numeral)?)
        };
        Some(IntegerLiteral {
            sign,
            base,
            digits,
            suffix,
        })
    });

    let float_type_suffix: Atom<TypeSuffix> = Atom::new("float_type_suffix");
    let body = alt![
        seq![characters('f', 'F'), marker(float_type_suffix, TypeSuffix::Float)],
        seq![characters('d', 'D'), marker(float_type_suffix, TypeSuffix::Double)],
    ];
    rules.put(float_type_suffix, body, move |state| state.scope().get(float_type_suffix));

    let float_exponent_part: Atom<Exponent> = Atom::new("float_exponent_part");
    let body = seq![characters('e', 'E'), optional(rules.named(sign)), rules.named(decimal_numeral)];
    rules.put(float_exponent_part, body, move |state| {
        Some(Exponent {
            sign: state.scope().get_or_default(sign, Sign::Plus),
            digits: state.scope().get(decimal_numeral)?,
        })
    });

    let hex_float_exponent_part: Atom<Exponent> = Atom::new("hex_float_exponent_part");
    let body = seq![characters('p', 'P'), optional(rules.named(sign)), rules.named(decimal_numeral)];
    rules.put(hex_float_exponent_part, body, move |state| {
        Some(Exponent {
            sign: state.scope().get_or_default(sign, Sign::Plus),
            digits: state.scope().get(decimal_numeral)?,
        })
    });

    let float_whole_part: Atom<String> = Atom::new("float_whole_part");
    let float_fraction_part: Atom<String> = Atom::new("float_fraction_part");
    let float_literal: Atom<Tag> = Atom::new("float_literal");
    let body = seq![
        optional(rules.named(sign)),
        alt![
            seq![
                rules.named_with_alias(decimal_numeral, float_whole_part),
                character('.'),
                cut(),
                optional(rules.named_with_alias(decimal_numeral, float_fraction_part)),
                optional(rules.named(float_exponent_part)),
                optional(rules.named(float_type_suffix)),
            ],
            seq![
                character('.'),
                cut(),
                rules.named_with_alias(decimal_numeral, float_fraction_part),
                optional(rules.named(float_exponent_part)),
                optional(rules.named(float_type_suffix)),
            ],
            seq![
                rules.named_with_alias(decimal_numeral, float_whole_part),
                rules.named(float_exponent_part),
                cut(),
                optional(rules.named(float_type_suffix)),
            ],
            seq![
                rules.named_with_alias(decimal_numeral, float_whole_part),
                optional(rules.named(float_exponent_part)),
                rules.named(float_type_suffix),
            ],
            seq![
                character('0'),
                characters('x', 'X'),
                alt![
                    seq![
                        rules.named_with_alias(hex_numeral, float_whole_part),
                        optional(seq![
                            character('.'),
                            optional(rules.named_with_alias(hex_numeral, float_fraction_part)),
                        ]),
                    ],
                    seq![character('.'), rules.named_with_alias(hex_numeral, float_fraction_part)],
                ],
                positive_look_ahead(characters('p', 'P')),
                cut(),
                rules.named(hex_float_exponent_part),
                optional(rules.named(float_type_suffix)),
            ],
        ],
    ];
    rules.put(float_literal, body, move |state| {
        let scope = state.scope();
        let hex_exponent = scope.get(hex_float_exponent_part);
        let literal = FloatLiteral {
            sign: scope.get_or_default(sign, Sign::Plus),
            whole: scope.get(float_whole_part),
            fraction: scope.get(float_fraction_part),
            hex: hex_exponent.is_some(),
            exponent: hex_exponent.or_else(|| scope.get(float_exponent_part)),
            suffix: scope.get(float_type_suffix),
        };
        report(state, literal.to_tag())
    });

    // Strings

    let string_hex_2: Atom<String> = Atom::new("string_hex_2");
    let string_hex_4: Atom<String> = Atom::new("string_hex_4");
    let string_hex_8: Atom<String> = Atom::new("string_hex_8");
    for (atom, length) in [(string_hex_2, 2), (string_hex_4, 4), (string_hex_8, 8)] {
        rules.put_rule(
            atom,
            GreedyPredicateRule::exactly(|c| c.is_ascii_hexdigit(), length, SnbtError::ExpectedHexEscape(length)),
        );
    }

    let string_unicode_name: Atom<String> = Atom::new("string_unicode_name");
    rules.put_rule(
        string_unicode_name,
        GreedyPatternRule::new("[-a-zA-Z0-9 ]+", SnbtError::InvalidCharacterName)?,
    );

    let string_escape_sequence: Atom<String> = Atom::new("string_escape_sequence");
    let simple_escape = |escape: char, value: &str| {
        seq![character(escape), marker(string_escape_sequence, value.to_string())]
    };
    let body = alt![
        simple_escape('b', "\u{8}"),
        simple_escape('s', " "),
        simple_escape('t', "\t"),
        simple_escape('n', "\n"),
        simple_escape('f', "\u{c}"),
        simple_escape('r', "\r"),
        simple_escape('\\', "\\"),
        simple_escape('\'', "'"),
        simple_escape('"', "\""),
        seq![character('x'), rules.named(string_hex_2)],
        seq![character('u'), rules.named(string_hex_4)],
        seq![character('U'), rules.named(string_hex_8)],
        seq![character('N'), character('{'), rules.named(string_unicode_name), character('}')],
    ];
    rules.put(string_escape_sequence, body, move |state| {
        if let Some(escape) = state.scope().get(string_escape_sequence) {
            return Some(escape);
        }
        if let Some(hex) = state.scope().get_any(&[string_hex_2, string_hex_4, string_hex_8]) {
            let code_point = u32::from_str_radix(&hex, 16).unwrap_or(u32::MAX);
            let result = char::from_u32(code_point)
                .map(String::from)
                .ok_or(SnbtError::InvalidCodePoint(code_point));
            return report(state, result);
        }
        // Character names are not looked up
        state.store_error(SnbtError::InvalidCharacterName);
        None
    });

    let string_plain_contents: Atom<String> = Atom::new("string_plain_contents");
    rules.put_rule(
        string_plain_contents,
        GreedyPredicateRule::new(is_plain_string_char, 1, SnbtError::InvalidStringContents),
    );

    let string_chunks: Atom<Vec<String>> = Atom::new("string_chunks");
    let string_contents: Atom<String> = Atom::new("string_contents");

    let single_quoted_string_chunk: Atom<String> = Atom::new("single_quoted_string_chunk");
    let body = string_chunk(&mut rules, string_plain_contents, string_escape_sequence, string_contents, '"');
    let single_chunk_rule =
        rules.put(single_quoted_string_chunk, body, move |state| state.scope().get(string_contents));
    let single_quoted_string_contents: Atom<String> = Atom::new("single_quoted_string_contents");
    rules.put(
        single_quoted_string_contents,
        repeated(single_chunk_rule, string_chunks),
        move |state| Some(state.scope().get(string_chunks)?.concat()),
    );

    let double_quoted_string_chunk: Atom<String> = Atom::new("double_quoted_string_chunk");
    let body = string_chunk(&mut rules, string_plain_contents, string_escape_sequence, string_contents, '\'');
    let double_chunk_rule =
        rules.put(double_quoted_string_chunk, body, move |state| state.scope().get(string_contents));
    let double_quoted_string_contents: Atom<String> = Atom::new("double_quoted_string_contents");
    rules.put(
        double_quoted_string_contents,
        repeated(double_chunk_rule, string_chunks),
        move |state| Some(state.scope().get(string_chunks)?.concat()),
    );

    let quoted_string_literal: Atom<String> = Atom::new("quoted_string_literal");
    let body = alt![
        seq![
            character('"'),
            cut(),
            optional(rules.named_with_alias(double_quoted_string_contents, string_contents)),
            character('"'),
        ],
        seq![
            character('\''),
            optional(rules.named_with_alias(single_quoted_string_contents, string_contents)),
            character('\''),
        ],
    ];
    rules.put_simple(quoted_string_literal, body, move |state| {
        state.scope().get_or_default(string_contents, String::new())
    });

    let unquoted_string: Atom<String> = Atom::new("unquoted_string");
    rules.put_rule(unquoted_string, UnquotedStringRule::new(1, SnbtError::ExpectedUnquotedString));

    // Values

    let literal: Atom<Tag> = Atom::new("literal");
    let literal_rule = rules.forward(literal);

    let arguments: Atom<Vec<Tag>> = Atom::new("arguments");
    let body = repeated_with_separator(Arc::clone(&literal_rule), arguments, character(','));
    rules.put(arguments, body, move |state| state.scope().get(arguments));

    let unquoted_string_or_builtin: Atom<Tag> = Atom::new("unquoted_string_or_builtin");
    let body = seq![
        rules.named(unquoted_string),
        optional(seq![character('('), rules.named(arguments), character(')')]),
    ];
    rules.put(unquoted_string_or_builtin, body, move |state| {
        let text = state.scope().get(unquoted_string)?;
        if text.chars().next().is_none_or(can_start_number) {
            state.store_error(SnbtError::InvalidUnquotedStart);
            return None;
        }
        if let Some(arguments) = state.scope().get(arguments) {
            return Some(Tag::Operation(OperationTag::new(text, arguments)));
        }
        Some(if text.eq_ignore_ascii_case("true") {
            Tag::Boolean(true)
        } else if text.eq_ignore_ascii_case("false") {
            Tag::Boolean(false)
        } else {
            Tag::String(text)
        })
    });

    let map_key: Atom<String> = Atom::new("map_key");
    let body = alt![rules.named(quoted_string_literal), rules.named(unquoted_string)];
    rules.put(map_key, body, move |state| {
        state.scope().get_any(&[quoted_string_literal, unquoted_string])
    });

    let map_entry: Atom<(CompactString, Tag)> = Atom::new("map_entry");
    let body = seq![rules.named(map_key), character(':'), rules.named(literal)];
    let map_entry_rule = rules.put(map_entry, body, move |state| {
        let key = state.scope().get(map_key)?;
        if key.is_empty() {
            state.store_error(SnbtError::EmptyKey);
            return None;
        }
        Some((CompactString::from(key), state.scope().get(literal)?))
    });

    let map_entries: Atom<Vec<(CompactString, Tag)>> = Atom::new("map_entries");
    let body = repeated_with_separator(map_entry_rule, map_entries, character(','));
    rules.put(map_entries, body, move |state| state.scope().get(map_entries));

    let map_literal: Atom<Tag> = Atom::new("map_literal");
    let body = seq![character('{'), rules.named(map_entries), character('}')];
    rules.put(map_literal, body, move |state| {
        let entries = state.scope().get(map_entries)?;
        Some(Tag::Compound(entries.into_iter().collect::<CompoundTag>()))
    });

    let list_entries: Atom<Vec<Tag>> = Atom::new("list_entries");
    let body = repeated_with_separator(literal_rule, list_entries, character(','));
    rules.put(list_entries, body, move |state| state.scope().get(list_entries));

    let array_prefix: Atom<ArrayPrefix> = Atom::new("array_prefix");
    let body = alt![
        seq![character('B'), marker(array_prefix, ArrayPrefix::Byte)],
        seq![character('L'), marker(array_prefix, ArrayPrefix::Long)],
        seq![character('I'), marker(array_prefix, ArrayPrefix::Int)],
    ];
    rules.put(array_prefix, body, move |state| state.scope().get(array_prefix));

    let int_array_entries: Atom<Vec<IntegerLiteral>> = Atom::new("int_array_entries");
    let body = repeated_with_separator(integer_literal_rule, int_array_entries, character(','));
    rules.put(int_array_entries, body, move |state| state.scope().get(int_array_entries));

    let list_literal: Atom<Tag> = Atom::new("list_literal");
    let body = seq![
        character('['),
        alt![
            seq![rules.named(array_prefix), character(';'), rules.named(int_array_entries)],
            rules.named(list_entries),
        ],
        character(']'),
    ];
    rules.put(list_literal, body, move |state| {
        if let Some(prefix) = state.scope().get(array_prefix) {
            let entries = state.scope().get(int_array_entries)?;
            return report(state, prefix.build(&entries));
        }
        let elements = state.scope().get(list_entries)?;
        let list = ListTag::from_elements(elements).map(Tag::List);
        report(state, list)
    });

    let body = alt![
        seq![
            positive_look_ahead(char_class(can_start_number, "number")),
            alt![rules.named_with_alias(float_literal, literal), rules.named(integer_literal)],
        ],
        seq![
            positive_look_ahead(characters('"', '\'')),
            cut(),
            rules.named(quoted_string_literal),
        ],
        seq![positive_look_ahead(character('{')), cut(), rules.named_with_alias(map_literal, literal)],
        seq![positive_look_ahead(character('[')), cut(), rules.named_with_alias(list_literal, literal)],
        rules.named_with_alias(unquoted_string_or_builtin, literal),
    ];
    let top = rules.put(literal, body, move |state| {
        if let Some(text) = state.scope().get(quoted_string_literal) {
            return Some(Tag::String(text));
        }
        if let Some(integer) = state.scope().get(integer_literal) {
            return report(state, integer.to_tag());
        }
        state.scope().get(literal)
    });

    Grammar::new(rules, top)
}
