//! Integer text parsing with Java's accepted syntax and messages

use crate::error::{NumberFormatError, NumberResult};

const MIN_RADIX: u32 = 2;
const MAX_RADIX: u32 = 36;

fn check_radix(radix: u32) -> NumberResult<()> {
    if (MIN_RADIX..=MAX_RADIX).contains(&radix) {
        Ok(())
    } else {
        Err(NumberFormatError::InvalidRadix(radix))
    }
}

/// Parse an optionally signed integer and check it against `[min, max]`.
pub(super) fn parse_signed(s: &str, radix: u32, min: i64, max: i64) -> NumberResult<i64> {
    check_radix(radix)?;
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        Some(_) => (false, s),
        None => return Err(NumberFormatError::for_input(s, radix)),
    };
    if digits.is_empty() {
        return Err(NumberFormatError::for_input(s, radix));
    }

    let limit = if negative { -i128::from(min) } else { i128::from(max) };
    let mut result: i128 = 0;
    for c in digits.chars() {
        let digit = c
            .to_digit(radix)
            .ok_or_else(|| NumberFormatError::for_input(s, radix))?;
        result = result * i128::from(radix) + i128::from(digit);
        if result > limit {
            return Err(NumberFormatError::for_input(s, radix));
        }
    }

    let value = if negative { -result } else { result };
    Ok(value as i64)
}

/// Parse an unsigned integer no larger than `max`.
pub(super) fn parse_unsigned(s: &str, radix: u32, max: u64, kind: &'static str) -> NumberResult<u64> {
    check_radix(radix)?;
    let digits = match s.as_bytes().first() {
        Some(b'-') => return Err(NumberFormatError::IllegalLeadingMinus(s.to_string())),
        Some(b'+') => &s[1..],
        Some(_) => s,
        None => return Err(NumberFormatError::for_input(s, radix)),
    };
    if digits.is_empty() {
        return Err(NumberFormatError::for_input(s, radix));
    }

    let mut result: u128 = 0;
    let mut overflow = false;
    for c in digits.chars() {
        let digit = c
            .to_digit(radix)
            .ok_or_else(|| NumberFormatError::for_input(s, radix))?;
        if !overflow {
            result = result * u128::from(radix) + u128::from(digit);
            overflow = result > u128::from(max);
        }
    }

    if overflow {
        return Err(NumberFormatError::ExceedsUnsignedRange {
            input: s.to_string(),
            kind,
        });
    }
    Ok(result as u64)
}

pub(super) fn value_out_of_range(s: &str, radix: u32) -> NumberFormatError {
    NumberFormatError::ValueOutOfRange {
        input: s.to_string(),
        radix,
    }
}

pub(super) fn out_of_range(value: i32) -> NumberFormatError {
    NumberFormatError::OutOfRange(i64::from(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_lonely_sign() {
        assert!(parse_signed("-", 10, i64::MIN, i64::MAX).is_err());
        assert!(parse_unsigned("+", 10, u64::MAX, "long").is_err());
    }

    #[test]
    fn test_long_boundaries() {
        assert_eq!(parse_signed("-9223372036854775808", 10, i64::MIN, i64::MAX), Ok(i64::MIN));
        assert!(parse_signed("9223372036854775808", 10, i64::MIN, i64::MAX).is_err());
        assert_eq!(
            parse_unsigned("18446744073709551616", 10, u64::MAX, "long")
                .map_err(|e| e.to_string()),
            Err("String value 18446744073709551616 exceeds range of unsigned long.".to_string())
        );
    }

    #[test]
    fn test_invalid_radix() {
        assert_eq!(
            parse_signed("1", 37, i64::MIN, i64::MAX),
            Err(NumberFormatError::InvalidRadix(37))
        );
    }
}
