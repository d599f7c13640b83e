//! Tests for Java-compatible integer and floating-point parsing

use snbt_core::{parse_double, parse_float, JByte, JDouble, JFloat, JInt, JLong, JShort, NumberFormatError};

#[test]
fn test_integer_radixes() {
    assert_eq!(JInt::parse("7fffffff", 16), Ok(JInt::MAX));
    assert_eq!(JInt::parse("-80000000", 16), Ok(JInt::MIN));
    assert_eq!(JLong::parse("101", 2), Ok(JLong(5)));
    assert_eq!(JShort::parse("+123", 10), Ok(JShort(123)));
}

#[test]
fn test_integer_overflow_messages() {
    let error = JInt::parse("2147483648", 10).unwrap_err();
    assert_eq!(error.to_string(), "For input string: \"2147483648\"");

    let error = JByte::parse("128", 10).unwrap_err();
    assert_eq!(error.to_string(), "Value out of range. Value:\"128\" Radix:10");

    let error = JByte::parse("ff", 16).unwrap_err();
    assert_eq!(error.to_string(), "Value out of range. Value:\"ff\" Radix:16");
}

#[test]
fn test_unsigned_bit_patterns() {
    assert_eq!(JByte::parse_unsigned("ff", 16), Ok(JByte(-1)));
    assert_eq!(JShort::parse_unsigned("65535", 10), Ok(JShort(-1)));
    assert_eq!(JInt::parse_unsigned("ffffffff", 16), Ok(JInt(-1)));
    assert_eq!(JLong::parse_unsigned("18446744073709551615", 10), Ok(JLong(-1)));

    assert_eq!(
        JByte::parse_unsigned("256", 10).map_err(|e| e.to_string()),
        Err("out of range: 256".to_string())
    );
    assert_eq!(
        JInt::parse_unsigned("-1", 10),
        Err(NumberFormatError::IllegalLeadingMinus("-1".to_string()))
    );
}

#[test]
fn test_double_spot_values() {
    let cases: &[(&str, f64)] = &[
        ("0", 0.0),
        ("1", 1.0),
        ("0.1", 0.1),
        ("3.141592653589793", std::f64::consts::PI),
        ("1.7976931348623157e308", f64::MAX),
        ("4.9e-324", 5e-324),
        ("2.2250738585072014E-308", f64::MIN_POSITIVE),
        ("123456789012345678901234567890", 123456789012345678901234567890.0),
        ("9007199254740993", 9007199254740992.0),
        ("1e23", 1e23),
    ];
    for (text, expected) in cases {
        assert_eq!(parse_double(text), Ok(*expected), "parsing {text}");
    }
}

#[test]
fn test_double_overflow_and_underflow() {
    assert_eq!(parse_double("1.8e308"), Ok(f64::INFINITY));
    assert_eq!(parse_double("-1.8e308"), Ok(f64::NEG_INFINITY));
    assert_eq!(parse_double("2e-324"), Ok(0.0));
    assert_eq!(parse_double("3e-324"), Ok(5e-324));
}

#[test]
fn test_exact_bit_patterns() {
    assert_eq!(parse_double("0.1").map(f64::to_bits), Ok(0x3FB9_9999_9999_999A));
    assert_eq!(parse_double("1e400"), Ok(f64::INFINITY));
    let tiny = parse_double("1e-400").unwrap();
    assert_eq!(tiny, 0.0);
    assert!(tiny.is_sign_positive());
    assert_eq!(parse_float("16777217"), Ok(16_777_216.0));
}

#[test]
fn test_float_rounds_from_text() {
    // Rounding through double first would land on a tie and give 1.0
    assert_eq!(
        parse_float("1.00000005960464477550"),
        Ok(f32::from_bits(0x3f80_0001))
    );
    assert_eq!(parse_float("3.4028235e38"), Ok(f32::MAX));
    assert_eq!(parse_float("3.5e38"), Ok(f32::INFINITY));
    assert_eq!(parse_float("1.4e-45"), Ok(f32::from_bits(1)));
    assert_eq!(parse_float("0.1"), Ok(0.1f32));
}

#[test]
fn test_wrappers_parse_and_print() {
    let value = JDouble::parse("1.0E10").unwrap();
    assert_eq!(value.to_string(), "1.0E10");
    let value = JFloat::parse("0.5").unwrap();
    assert_eq!(value.to_string(), "0.5");
}
