//! Parsing SNBT text into tags

use snbt_grammar::StringReader;
use snbt_syntax::{grammar, parse_snbt, CompoundTag, ListTag, OperationTag, Tag, TagType};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// `RUST_LOG=snbt_syntax=debug` shows why a parse failed.
fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .try_init();
}

fn parse(text: &str) -> Tag {
    match parse_snbt(text) {
        Ok(tag) => tag,
        Err(error) => panic!("{text:?} failed: {error}"),
    }
}

fn parse_error(text: &str) -> String {
    init_tracing();
    match parse_snbt(text) {
        Ok(tag) => panic!("{text:?} parsed as {tag:?}"),
        Err(error) => error.to_string(),
    }
}

fn assert_error_contains(text: &str, expected: &str) {
    let message = parse_error(text);
    assert!(message.contains(expected), "{text:?}: {message:?} lacks {expected:?}");
}

#[test]
fn test_decimal_integers() {
    assert_eq!(parse("1"), Tag::Int(1));
    assert_eq!(parse("+1"), Tag::Int(1));
    assert_eq!(parse("-5b"), Tag::Byte(-5));
    assert_eq!(parse("300s"), Tag::Short(300));
    assert_eq!(parse("7I"), Tag::Int(7));
    assert_eq!(parse("10L"), Tag::Long(10));
    assert_eq!(parse("10l"), Tag::Long(10));
    assert_eq!(parse("1_000"), Tag::Int(1000));
    assert_eq!(parse("0"), Tag::Int(0));
    assert_eq!(parse("0b"), Tag::Byte(0));
    assert_eq!(parse("-9223372036854775808L"), Tag::Long(i64::MIN));
}

#[test]
fn test_leading_zero_rejected() {
    assert_error_contains("01", "Decimal numbers can't start with 0");
    assert_error_contains("-007", "Decimal numbers can't start with 0");
    assert_eq!(parse("0x1"), Tag::Int(1));
    assert_eq!(parse("0b1"), Tag::Int(1));
}

#[test]
fn test_hex_and_binary_are_unsigned_by_default() {
    assert_eq!(parse("0xFFub"), Tag::Byte(-1));
    assert_eq!(parse("0xFFFFFFFF"), Tag::Int(-1));
    assert_eq!(parse("0XffffL"), Tag::Long(0xFFFF));
    assert_eq!(parse("0b1111_1111ub"), Tag::Byte(-1));
    assert_eq!(parse("0b101"), Tag::Int(5));
    assert_eq!(parse("255ub"), Tag::Byte(-1));
    assert_error_contains("-0x1", "Expected a non-negative number");
    assert_error_contains("-1ub", "Expected a non-negative number");
}

#[test]
fn test_b_after_hex_digits_is_a_digit() {
    assert_eq!(parse("0xFFb"), Tag::Int(0xFFB));
    assert_eq!(parse("0x1sb"), Tag::Byte(1));
}

#[test]
fn test_integer_ranges() {
    assert_error_contains("128b", "Value out of range");
    assert_error_contains("-129b", "Value out of range");
    assert_error_contains("0xFFsb", "Value out of range");
    assert_error_contains("2147483648", "Failed to parse number");
    assert_eq!(parse("-128b"), Tag::Byte(-128));
    assert_eq!(parse("32767s"), Tag::Short(32767));
}

#[test]
fn test_decimal_floats() {
    assert_eq!(parse("1.5"), Tag::Double(1.5));
    assert_eq!(parse("1.5f"), Tag::Float(1.5));
    assert_eq!(parse(".5"), Tag::Double(0.5));
    assert_eq!(parse("+.5F"), Tag::Float(0.5));
    assert_eq!(parse("1."), Tag::Double(1.0));
    assert_eq!(parse("1e3"), Tag::Double(1000.0));
    assert_eq!(parse("1e-3f"), Tag::Float(0.001));
    assert_eq!(parse("-1.5E+2"), Tag::Double(-150.0));
    assert_eq!(parse("2d"), Tag::Double(2.0));
    assert_eq!(parse("3F"), Tag::Float(3.0));
    assert_eq!(parse("1_0.2_5"), Tag::Double(10.25));
    assert_eq!(parse("0.1"), Tag::Double(0.1));
}

#[test]
fn test_negative_zero() {
    let Tag::Double(value) = parse("-0.0") else {
        panic!("expected a double");
    };
    assert!(value == 0.0 && value.is_sign_negative());
}

#[test]
fn test_hex_floats() {
    assert_eq!(parse("0x1.8p3"), Tag::Double(12.0));
    assert_eq!(parse("0x1p-2f"), Tag::Float(0.25));
    assert_eq!(parse("0X1P4D"), Tag::Double(16.0));
    assert_eq!(parse("-0xAp1"), Tag::Double(-20.0));
    assert_eq!(parse("0x1.p0"), Tag::Double(1.0));
}

#[test]
fn test_hex_floats_without_whole_part() {
    assert_eq!(parse("0X.8P1"), Tag::Double(1.0));
    assert_eq!(parse("0x.8p1f"), Tag::Float(1.0));
    assert_eq!(parse("-0x.4p2"), Tag::Double(-1.0));
    assert!(parse_snbt("0x.p1").is_err());
}

#[test]
fn test_non_finite_rejected() {
    assert_error_contains("1e400", "Non-finite numbers are not allowed");
    assert_error_contains("3.5e38f", "Non-finite numbers are not allowed");
    assert_error_contains("[1e400]", "Non-finite numbers are not allowed");
    assert_eq!(parse("1e-400"), Tag::Double(0.0));
}

#[test]
fn test_quoted_strings() {
    assert_eq!(parse(r#""hello world""#), Tag::from("hello world"));
    assert_eq!(parse(r#""""#), Tag::from(""));
    assert_eq!(parse("''"), Tag::from(""));
    assert_eq!(parse(r#"'say "hi"'"#), Tag::from("say \"hi\""));
    assert_eq!(parse(r#""it's""#), Tag::from("it's"));
    assert_eq!(parse(r#""a\"b""#), Tag::from("a\"b"));
    assert_eq!(parse(r"'a\'b'"), Tag::from("a'b"));
    assert_eq!(parse(r#""back\\slash""#), Tag::from("back\\slash"));
}

#[test]
fn test_escapes() {
    assert_eq!(parse(r#""\x41é\U0001F600""#), Tag::from("Aé😀"));
    assert_eq!(parse(r#""\s\t\n\r\f\b""#), Tag::from(" \t\n\r\u{c}\u{8}"));
    assert_error_contains(r#""\UFFFFFFFF""#, "Invalid Unicode character value: 4294967295");
    assert_error_contains(r#""\uD800""#, "Invalid Unicode character value");
    assert!(parse_snbt(r#""\x4""#).is_err());
}

#[test]
fn test_named_escapes_always_fail() {
    assert_error_contains(r#""\N{LATIN SMALL LETTER A}""#, "Invalid Unicode character name");
    assert_error_contains(r#""\N{SNOWMAN}""#, "Invalid Unicode character name");
}

#[test]
fn test_unquoted_strings_and_booleans() {
    assert_eq!(parse("hello"), Tag::from("hello"));
    assert_eq!(parse("a.b-c_d+e"), Tag::from("a.b-c_d+e"));
    assert_eq!(parse("_1"), Tag::from("_1"));
    assert_eq!(parse("TRUE"), Tag::Boolean(true));
    assert_eq!(parse("False"), Tag::Boolean(false));
    assert_eq!(parse("truely"), Tag::from("truely"));
}

#[test]
fn test_operations_are_kept() {
    assert_eq!(
        parse("bool(1)"),
        Tag::Operation(OperationTag::new("bool", vec![Tag::Int(1)]))
    );
    assert_eq!(parse("nothing()"), Tag::Operation(OperationTag::new("nothing", Vec::new())));
    assert_eq!(
        parse("pair( 1 , 'x' )"),
        Tag::Operation(OperationTag::new("pair", vec![Tag::Int(1), Tag::from("x")]))
    );
}

#[test]
fn test_compounds() {
    assert_eq!(parse("{}"), Tag::Compound(CompoundTag::new()));

    let tag = parse(r#" { a : 1 , "quoted key": 'v', 1a: [I; 2] } "#);
    let compound = tag.as_compound().unwrap();
    assert_eq!(compound.len(), 3);
    assert_eq!(compound.get("a"), Some(&Tag::Int(1)));
    assert_eq!(compound.get("quoted key"), Some(&Tag::from("v")));
    assert_eq!(compound.get("1a"), Some(&Tag::IntArray(vec![2])));
}

#[test]
fn test_duplicate_key_keeps_last() {
    let tag = parse("{a:1,b:2,a:3}");
    let compound = tag.as_compound().unwrap();
    assert_eq!(compound.len(), 2);
    assert_eq!(compound.get("a"), Some(&Tag::Int(3)));
}

#[test]
fn test_empty_key_rejected() {
    assert_error_contains(r#"{"": 1}"#, "Key cannot be empty");
    assert_error_contains("{'':1}", "Key cannot be empty");
}

#[test]
fn test_lists() {
    assert_eq!(parse("[]"), Tag::List(ListTag::new()));
    let tag = parse("[1, 2, 3]");
    let list = tag.as_list().unwrap();
    assert_eq!(list.element_type(), TagType::Int);
    assert_eq!(list.len(), 3);

    let nested = parse("[[], [1b]]");
    assert_eq!(nested.as_list().unwrap().element_type(), TagType::List);
}

#[test]
fn test_booleans_mix_with_bytes() {
    let tag = parse("[true, 1b]");
    assert_eq!(tag.as_list().unwrap().element_type(), TagType::Byte);
}

#[test]
fn test_mixed_list_rejected() {
    assert_eq!(parse_error(r#"[1,"a"]"#), "Mixed list: expected int, got string");
    assert_error_contains("[1b, 1s]", "Mixed list: expected byte, got short");
}

#[test]
fn test_dangling_separators_rejected() {
    assert!(parse_snbt("[1,2,]").is_err());
    assert!(parse_snbt("{a:1,}").is_err());
    assert!(parse_snbt("[I;1,]").is_err());
    assert!(parse_snbt("f(1,)").is_err());
}

#[test]
fn test_failed_parse_rewinds_reader() {
    let mut reader = StringReader::new("[1,2,]");
    let error = grammar().unwrap().parse_for_commands(&mut reader).unwrap_err();
    assert_eq!(reader.cursor(), 0);
    assert!(error.cursor().is_some_and(|cursor| cursor >= 5));
}

#[test]
fn test_typed_arrays() {
    assert_eq!(parse("[B;1b,2B,3]"), Tag::ByteArray(vec![1, 2, 3]));
    assert_eq!(parse("[I; 1, 2b, 3s]"), Tag::IntArray(vec![1, 2, 3]));
    assert_eq!(parse("[L;1,2L,3b,4i]"), Tag::LongArray(vec![1, 2, 3, 4]));
    assert_eq!(parse("[I;]"), Tag::IntArray(Vec::new()));
    assert_eq!(parse("[I; 0xFFFFFFFF]"), Tag::IntArray(vec![-1]));
    assert_eq!(parse("[L; 0xFFub]"), Tag::LongArray(vec![-1]));
}

#[test]
fn test_array_element_types_checked() {
    assert_error_contains("[B;1L]", "Invalid array element type");
    assert_error_contains("[B;1s]", "Invalid array element type");
    assert_error_contains("[I;1L]", "Invalid array element type");
    assert!(parse_snbt("[I;1.5]").is_err());
}

#[test]
fn test_list_starting_with_prefix_letter() {
    assert_eq!(
        parse("[Bob, Ian]"),
        Tag::List(ListTag::from_elements(vec![Tag::from("Bob"), Tag::from("Ian")]).unwrap())
    );
}

#[test]
fn test_bad_unquoted_start() {
    assert_error_contains("-", "Unquoted strings can't start with digits 0-9, + or -");
    assert_error_contains("{a:+x}", "Unquoted strings can't start with digits 0-9, + or -");
}

#[test]
fn test_trailing_data() {
    assert_eq!(parse_error("{a:1} x"), "Unexpected trailing data at position 6");
    assert_eq!(parse("{a:1}  \n"), parse("{a:1}"));
}

#[test]
fn test_empty_input() {
    let error = parse_snbt("").unwrap_err();
    assert_eq!(error.cursor(), Some(0));
}
