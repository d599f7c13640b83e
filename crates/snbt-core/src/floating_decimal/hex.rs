//! Hexadecimal floating-point literals (`0x1.8p3`)
//!
//! Every hex digit is exactly four bits, so no estimate/correct cycle is
//! needed: the significand is assembled into a 53-bit integer with round and
//! sticky bits and then packed into each target format.

use super::BinaryConverter;
use crate::error::{NumberFormatError, NumberResult};
use crate::numeric::{JDouble, JFloat};
use once_cell::sync::Lazy;
use regex::Regex;

static HEX_FLOAT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<sign>[-+])?0[xX](?:(?P<whole>[0-9a-fA-F]+)\.?|(?P<left>[0-9a-fA-F]*)\.(?P<right>[0-9a-fA-F]+))[pP](?P<exp_sign>[-+])?(?P<exp>[0-9]+)[fFdD]?$",
    )
    .expect("hex float pattern is valid")
});

fn strip_leading_zeros(s: &str) -> &str {
    s.trim_start_matches('0')
}

fn hex_digit(s: &str, position: usize) -> u64 {
    s.as_bytes()
        .get(position)
        .and_then(|&b| char::from(b).to_digit(16))
        .map_or(0, u64::from)
}

pub(super) fn parse_hex_string(s: &str) -> NumberResult<BinaryConverter> {
    let captures = HEX_FLOAT_PATTERN
        .captures(s)
        .ok_or_else(|| NumberFormatError::for_input(s, 10))?;

    let negative = captures.name("sign").is_some_and(|m| m.as_str() == "-");

    let (significand_string, left_digits, right_digits) = match captures.name("whole") {
        Some(whole) => {
            let stripped = strip_leading_zeros(whole.as_str());
            (stripped.to_string(), stripped.len(), 0)
        }
        None => {
            let left = strip_leading_zeros(captures.name("left").map_or("", |m| m.as_str()));
            let right = captures.name("right").map_or("", |m| m.as_str());
            (format!("{left}{right}"), left.len(), right.len())
        }
    };
    let significand_string = strip_leading_zeros(&significand_string);
    let signif_length = significand_string.len();

    // Binary exponent contributed by the position of the leading digit
    let exponent_adjust: i64 = if left_digits >= 1 {
        4 * (left_digits as i64 - 1)
    } else {
        -4 * (right_digits as i64 - signif_length as i64 + 1)
    };

    if signif_length == 0 {
        return Ok(BinaryConverter::Zero { negative });
    }

    let positive_exponent = captures.name("exp_sign").is_none_or(|m| m.as_str() == "+");
    let exp_text = captures.name("exp").map_or("", |m| m.as_str());
    let Ok(unsigned_raw_exponent) = exp_text.parse::<i32>() else {
        // Too many exponent digits for an int: certain overflow or underflow
        return Ok(if positive_exponent {
            BinaryConverter::Infinity { negative }
        } else {
            BinaryConverter::Zero { negative }
        });
    };
    let raw_exponent = if positive_exponent {
        i64::from(unsigned_raw_exponent)
    } else {
        -i64::from(unsigned_raw_exponent)
    };
    let mut exponent = raw_exponent + exponent_adjust;

    let mut round = false;
    let mut sticky = false;
    let mut significand: u64 = 0;

    // Place the leading digit so its highest set bit lands on bit 52
    let leading_digit = hex_digit(significand_string, 0);
    let mut next_shift: i32 = match leading_digit {
        1 => {
            significand |= leading_digit << 52;
            52 - 4
        }
        2..=3 => {
            significand |= leading_digit << 51;
            exponent += 1;
            52 - 5
        }
        4..=7 => {
            significand |= leading_digit << 50;
            exponent += 2;
            52 - 6
        }
        _ => {
            significand |= leading_digit << 49;
            exponent += 3;
            52 - 7
        }
    };

    let mut i = 1;
    while i < signif_length && next_shift >= 0 {
        significand |= hex_digit(significand_string, i) << next_shift;
        next_shift -= 4;
        i += 1;
    }

    if i < signif_length {
        let current = hex_digit(significand_string, i);
        match next_shift {
            -1 => {
                significand |= (current & 0xE) >> 1;
                round = current & 0x1 != 0;
            }
            -2 => {
                significand |= (current & 0xC) >> 2;
                round = current & 0x2 != 0;
                sticky = current & 0x1 != 0;
            }
            -3 => {
                significand |= (current & 0x8) >> 3;
                round = current & 0x4 != 0;
                sticky = current & 0x3 != 0;
            }
            _ => {
                round = current & 0x8 != 0;
                sticky = current & 0x7 != 0;
            }
        }
        i += 1;
        while i < signif_length && !sticky {
            sticky = hex_digit(significand_string, i) != 0;
            i += 1;
        }
    }

    let float = pack_float(negative, exponent, significand, round, sticky);
    let double = pack_double(negative, exponent, significand, round, sticky);
    Ok(BinaryConverter::Prepared { double, float })
}

fn pack_float(negative: bool, exponent: i64, significand: u64, round: bool, sticky: bool) -> f32 {
    const THRESH_SHIFT: u32 = JDouble::SIGNIFICAND_WIDTH - JFloat::SIGNIFICAND_WIDTH - 1;

    let mut float_bits: u32 = if negative { JFloat::SIGN_BIT_MASK } else { 0 };
    let round_into = |thresh_shift: u32| -> u32 {
        let float_sticky = significand & ((1u64 << thresh_shift) - 1) != 0 || round || sticky;
        let mut i_value = (significand >> thresh_shift) as u32;
        // Low two bits are (lsb, round): bump unless exactly lsb=0 round=1
        // with nothing sticky behind it
        if i_value & 3 != 1 || float_sticky {
            i_value += 1;
        }
        i_value >> 1
    };

    if exponent >= i64::from(JFloat::MIN_EXPONENT) {
        if exponent > i64::from(JFloat::MAX_EXPONENT) {
            float_bits |= JFloat::EXP_BIT_MASK;
        } else {
            let biased = (exponent as i32 + JFloat::EXP_BIAS - 1) as u32;
            float_bits |= (biased << (JFloat::SIGNIFICAND_WIDTH - 1)) + round_into(THRESH_SHIFT);
        }
    } else if exponent >= i64::from(JFloat::MIN_SUB_EXPONENT - 1) {
        let thresh_shift = (i64::from(JDouble::SIGNIFICAND_WIDTH) - 2
            + i64::from(JFloat::MIN_SUB_EXPONENT)
            - exponent) as u32;
        float_bits |= round_into(thresh_shift);
    }
    f32::from_bits(float_bits)
}

fn pack_double(negative: bool, exponent: i64, significand: u64, round: bool, sticky: bool) -> f64 {
    if exponent > i64::from(JDouble::MAX_EXPONENT) {
        return if negative { f64::NEG_INFINITY } else { f64::INFINITY };
    }

    let fraction_bits = JDouble::SIGNIFICAND_WIDTH - 1;
    let mut round = round;
    let mut sticky = sticky;
    let mut significand = significand;

    if exponent >= i64::from(JDouble::MIN_EXPONENT) {
        let biased = (exponent + i64::from(JDouble::EXP_BIAS)) as u64;
        significand = (biased << fraction_bits) | (JDouble::SIGNIF_BIT_MASK & significand);
    } else if exponent < i64::from(JDouble::MIN_SUB_EXPONENT - 1) {
        significand = 0;
        round = false;
        sticky = false;
    } else {
        // Subnormal: shift out the bits below the smallest ULP into round
        // and sticky
        sticky = sticky || round;
        let bits_discarded =
            (53 - (exponent - i64::from(JDouble::MIN_SUB_EXPONENT) + 1)) as u32;
        round = significand & (1u64 << (bits_discarded - 1)) != 0;
        if bits_discarded > 1 {
            let mask = !(!0u64 << (bits_discarded - 1));
            sticky = sticky || significand & mask != 0;
        }
        significand >>= bits_discarded;
    }

    let least_zero = significand & 1 == 0;
    if (least_zero && round && sticky) || (!least_zero && round) {
        significand += 1;
    }
    let bits = if negative {
        significand | JDouble::SIGN_BIT_MASK
    } else {
        significand
    };
    f64::from_bits(bits)
}
