//! Text to IEEE-754 conversion with Java's `Double.parseDouble` and
//! `Float.parseFloat` semantics
//!
//! Accepted syntax, in order of recognition:
//! - surrounding characters `<= ' '` are ignored
//! - an optional sign
//! - `NaN` or `Infinity`
//! - a hexadecimal significand with a mandatory binary exponent (`0x1.8p3`)
//! - a decimal significand with an optional exponent (`1.5e-7`, `.5`, `5.`)
//! - an optional trailing `f`, `F`, `d` or `D`
//!
//! Both targets round to nearest, ties to even, directly from the text. A
//! `float` is never produced by rounding the nearest `double` a second time.

mod decimal;
mod hex;
mod tables;

pub use decimal::DecimalBuffer;

use crate::error::{NumberFormatError, NumberResult};
use tables::BIG_DECIMAL_EXPONENT;

/// The outcome of reading a floating-point string, ready to be narrowed to
/// either binary format.
#[derive(Debug, Clone, PartialEq)]
pub enum BinaryConverter {
    NotANumber,
    Infinity { negative: bool },
    Zero { negative: bool },
    /// Values whose conversion needs no correction step (hex literals)
    Prepared { double: f64, float: f32 },
    Decimal(DecimalBuffer),
}

impl BinaryConverter {
    pub fn double_value(&self) -> f64 {
        match self {
            BinaryConverter::NotANumber => f64::NAN,
            BinaryConverter::Infinity { negative: true } => f64::NEG_INFINITY,
            BinaryConverter::Infinity { negative: false } => f64::INFINITY,
            BinaryConverter::Zero { negative: true } => -0.0,
            BinaryConverter::Zero { negative: false } => 0.0,
            BinaryConverter::Prepared { double, .. } => *double,
            BinaryConverter::Decimal(buffer) => buffer.double_value(),
        }
    }

    pub fn float_value(&self) -> f32 {
        match self {
            BinaryConverter::NotANumber => f32::NAN,
            BinaryConverter::Infinity { negative: true } => f32::NEG_INFINITY,
            BinaryConverter::Infinity { negative: false } => f32::INFINITY,
            BinaryConverter::Zero { negative: true } => -0.0,
            BinaryConverter::Zero { negative: false } => 0.0,
            BinaryConverter::Prepared { float, .. } => *float,
            BinaryConverter::Decimal(buffer) => buffer.float_value(),
        }
    }
}

const NAN_REP: &[u8] = b"NaN";
const INFINITY_REP: &[u8] = b"Infinity";

/// `Double.parseDouble(s)`
pub fn parse_double(s: &str) -> NumberResult<f64> {
    read_java_format_string(s).map(|converter| converter.double_value())
}

/// `Float.parseFloat(s)`
pub fn parse_float(s: &str) -> NumberResult<f32> {
    read_java_format_string(s).map(|converter| converter.float_value())
}

/// Tokenize a floating-point string without converting it yet.
pub fn read_java_format_string(s: &str) -> NumberResult<BinaryConverter> {
    let input = s.trim_matches(|c: char| c <= ' ');
    if input.is_empty() {
        return Err(NumberFormatError::Empty);
    }
    match scan(input) {
        Scan::Converted(converter) => Ok(converter),
        Scan::MultiplePoints => Err(NumberFormatError::MultiplePoints),
        Scan::Malformed => Err(NumberFormatError::for_input(input, 10)),
    }
}

enum Scan {
    Converted(BinaryConverter),
    MultiplePoints,
    Malformed,
}

fn scan(input: &str) -> Scan {
    let bytes = input.as_bytes();
    let len = bytes.len();
    let mut i = 0;
    let mut negative = false;
    let mut sign_seen = false;

    match bytes[0] {
        b'-' => {
            negative = true;
            sign_seen = true;
            i += 1;
        }
        b'+' => {
            sign_seen = true;
            i += 1;
        }
        _ => {}
    }

    let Some(&first) = bytes.get(i) else {
        return Scan::Malformed;
    };
    match first {
        b'N' => {
            return if &bytes[i..] == NAN_REP {
                Scan::Converted(BinaryConverter::NotANumber)
            } else {
                Scan::Malformed
            };
        }
        b'I' => {
            return if &bytes[i..] == INFINITY_REP {
                Scan::Converted(BinaryConverter::Infinity { negative })
            } else {
                Scan::Malformed
            };
        }
        b'0' if matches!(bytes.get(i + 1), Some(b'x' | b'X')) => {
            return match hex::parse_hex_string(input) {
                Ok(converter) => Scan::Converted(converter),
                Err(_) => Scan::Malformed,
            };
        }
        _ => {}
    }

    let mut digits = Vec::with_capacity(len);
    let mut dec_seen = false;
    let mut dec_pt: i32 = 0;
    let mut n_lead_zero: i32 = 0;
    let mut n_trail_zero: i32 = 0;

    // The decimal point position is counted from the start of the
    // significand, so the sign does not shift it
    let point_at = |i: usize| i as i32 - i32::from(sign_seen);

    while i < len {
        match bytes[i] {
            b'0' => n_lead_zero += 1,
            b'.' => {
                if dec_seen {
                    return Scan::MultiplePoints;
                }
                dec_pt = point_at(i);
                dec_seen = true;
            }
            _ => break,
        }
        i += 1;
    }

    while i < len {
        match bytes[i] {
            c @ b'1'..=b'9' => {
                digits.push(c);
                n_trail_zero = 0;
            }
            b'0' => {
                digits.push(b'0');
                n_trail_zero += 1;
            }
            b'.' => {
                if dec_seen {
                    return Scan::MultiplePoints;
                }
                dec_pt = point_at(i);
                dec_seen = true;
            }
            _ => break,
        }
        i += 1;
    }

    let n_digits = digits.len() as i32 - n_trail_zero;
    digits.truncate(n_digits as usize);
    let is_zero = n_digits == 0;
    if is_zero && n_lead_zero == 0 {
        // No digits at all, e.g. "." or "e5"
        return Scan::Malformed;
    }

    let mut dec_exp = if dec_seen {
        dec_pt - n_lead_zero
    } else {
        n_digits + n_trail_zero
    };

    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        i += 1;
        let mut exp_sign = 1;
        match bytes.get(i) {
            Some(b'-') => {
                exp_sign = -1;
                i += 1;
            }
            Some(b'+') => i += 1,
            Some(_) => {}
            None => return Scan::Malformed,
        }
        let exp_at = i;
        let really_big = i32::MAX / 10;
        let mut exp_val: i32 = 0;
        let mut exp_overflow = false;
        while let Some(&c) = bytes.get(i) {
            if exp_val >= really_big {
                exp_overflow = true;
            }
            if !c.is_ascii_digit() {
                break;
            }
            exp_val = exp_val.wrapping_mul(10).wrapping_add(i32::from(c - b'0'));
            i += 1;
        }

        let exp_limit = BIG_DECIMAL_EXPONENT + n_digits + n_trail_zero;
        if exp_overflow || exp_val > exp_limit {
            // A large positive exponent can still land in range when the
            // significand itself is tiny
            if !exp_overflow && exp_sign == 1 && dec_exp < 0 && exp_val + dec_exp < exp_limit {
                dec_exp += exp_val;
            } else {
                dec_exp = exp_sign * exp_limit;
            }
        } else {
            dec_exp += exp_sign * exp_val;
        }

        if i == exp_at {
            return Scan::Malformed;
        }
    }

    if i < len && (i != len - 1 || !matches!(bytes[i], b'f' | b'F' | b'd' | b'D')) {
        return Scan::Malformed;
    }

    if is_zero {
        return Scan::Converted(BinaryConverter::Zero { negative });
    }
    Scan::Converted(BinaryConverter::Decimal(DecimalBuffer {
        negative,
        dec_exponent: dec_exp,
        digits,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenizes_decimal_forms() {
        let converter = read_java_format_string("-0012.3400e2").unwrap();
        match converter {
            BinaryConverter::Decimal(buffer) => {
                assert!(buffer.is_negative());
                assert_eq!(buffer.digits(), "1234");
                assert_eq!(buffer.decimal_exponent(), 4);
            }
            other => panic!("expected a decimal buffer, got {other:?}"),
        }
    }

    #[test]
    fn test_leading_fraction_zeros_move_exponent() {
        match read_java_format_string("0.05").unwrap() {
            BinaryConverter::Decimal(buffer) => {
                assert_eq!(buffer.digits(), "5");
                assert_eq!(buffer.decimal_exponent(), -1);
            }
            other => panic!("expected a decimal buffer, got {other:?}"),
        }
    }

    #[test]
    fn test_special_values() {
        assert!(parse_double("NaN").unwrap().is_nan());
        assert_eq!(parse_double("-Infinity").unwrap(), f64::NEG_INFINITY);
        assert_eq!(parse_float("+Infinity").unwrap(), f32::INFINITY);
        assert!(parse_double("-0.0").unwrap().is_sign_negative());
        assert!(parse_double("nan").is_err());
        assert!(parse_double("Infinityx").is_err());
    }

    #[test]
    fn test_trims_control_characters() {
        assert_eq!(parse_double(" \t1.5\n"), Ok(1.5));
    }

    #[test]
    fn test_type_suffixes() {
        assert_eq!(parse_double("1.5d"), Ok(1.5));
        assert_eq!(parse_float("2F"), Ok(2.0));
        assert!(parse_double("1.5dd").is_err());
        assert!(parse_double("1.5x").is_err());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(parse_double(""), Err(NumberFormatError::Empty));
        assert_eq!(parse_double("   "), Err(NumberFormatError::Empty));
        assert_eq!(parse_double("1.2.3"), Err(NumberFormatError::MultiplePoints));
        assert_eq!(
            parse_double(" abc ").map_err(|e| e.to_string()),
            Err("For input string: \"abc\"".to_string())
        );
        assert!(parse_double("1e").is_err());
        assert!(parse_double("1e+").is_err());
        assert!(parse_double(".").is_err());
        assert!(parse_double("-").is_err());
    }

    #[test]
    fn test_huge_exponents_saturate() {
        assert_eq!(parse_double("1e99999999999"), Ok(f64::INFINITY));
        assert_eq!(parse_double("1e-99999999999"), Ok(0.0));
        assert_eq!(parse_double("0.0000001e310"), Ok(1e303));
    }

    #[test]
    fn test_hex_dispatch() {
        assert_eq!(parse_double("0x1p4"), Ok(16.0));
        assert_eq!(parse_double("-0X1P-1d"), Ok(-0.5));
        assert!(parse_double("0x").is_err());
    }
}
