//! Decimal significand to binary conversion
//!
//! An estimate is produced with ordinary floating-point arithmetic and then
//! corrected one ULP at a time by comparing exact big-integer forms of the
//! candidate `B` and the decimal input `D`:
//!
//! ```text
//! B = bigBbits * 2^bigIntExp        D = digits * 10^exp
//! ```
//!
//! Both sides are scaled by the same powers of two and five so they become
//! integers, together with the half-ULP of the candidate. The candidate is
//! final once `|B - D|` is below the half-ULP; on an exact tie the even
//! significand wins.

use super::tables::{
    BinaryFormat, BIG_10_POW, DOUBLE_FORMAT, INT_DECIMAL_DIGITS, MAX_DECIMAL_DIGITS,
    MAX_DECIMAL_EXPONENT, MAX_NDIGITS, MAX_SMALL_TEN, MIN_DECIMAL_EXPONENT,
    SINGLE_FORMAT, SINGLE_MAX_DECIMAL_DIGITS, SINGLE_MAX_DECIMAL_EXPONENT, SINGLE_MAX_NDIGITS,
    SINGLE_MAX_SMALL_TEN, SINGLE_MIN_DECIMAL_EXPONENT, SINGLE_SMALL_10_POW, SMALL_10_POW,
    TINY_10_POW,
};
use num_bigint::BigUint;
use num_traits::{pow, Zero};
use std::cmp::Ordering;

/// A parsed decimal number `0.d1d2...dn * 10^dec_exponent`.
///
/// `digits` holds ASCII digits with no leading or trailing zeros and is never
/// empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecimalBuffer {
    pub(super) negative: bool,
    pub(super) dec_exponent: i32,
    pub(super) digits: Vec<u8>,
}

#[inline]
fn digit(c: u8) -> i32 {
    i32::from(c - b'0')
}

impl DecimalBuffer {
    pub fn is_negative(&self) -> bool {
        self.negative
    }

    pub fn decimal_exponent(&self) -> i32 {
        self.dec_exponent
    }

    /// Significant digits as text
    pub fn digits(&self) -> &str {
        std::str::from_utf8(&self.digits).unwrap_or_default()
    }

    fn signed_double(&self, value: f64) -> f64 {
        if self.negative {
            -value
        } else {
            value
        }
    }

    fn signed_float(&self, value: f32) -> f32 {
        if self.negative {
            -value
        } else {
            value
        }
    }

    /// The exact integer formed by the digits, truncated to `max_digits`
    /// with a sticky `1` appended when longer. Returns the digit count used.
    fn big_digits(&self, max_digits: usize) -> (BigUint, usize) {
        if self.digits.len() > max_digits {
            let head = BigUint::parse_bytes(&self.digits[..max_digits], 10).unwrap_or_else(BigUint::zero);
            (head * 10u32 + 1u32, max_digits + 1)
        } else {
            let value = BigUint::parse_bytes(&self.digits, 10).unwrap_or_else(BigUint::zero);
            (value, self.digits.len())
        }
    }

    /// Nearest double, ties to even
    pub fn double_value(&self) -> f64 {
        let n_digits = self.digits.len();
        let k_digits = n_digits.min(MAX_DECIMAL_DIGITS + 1);
        let i_digits = k_digits.min(INT_DECIMAL_DIGITS);

        let mut i_value = digit(self.digits[0]);
        for &c in &self.digits[1..i_digits] {
            i_value = i_value * 10 + digit(c);
        }
        let mut l_value = i64::from(i_value);
        for &c in &self.digits[i_digits..k_digits] {
            l_value = l_value * 10 + i64::from(digit(c));
        }
        let mut d_value = l_value as f64;
        let mut exp = self.dec_exponent - k_digits as i32;

        // Fast path: at most one rounding in a multiply or divide by an
        // exact power of ten
        if n_digits <= MAX_DECIMAL_DIGITS {
            if exp == 0 || d_value == 0.0 {
                return self.signed_double(d_value);
            } else if exp >= 0 {
                if exp <= MAX_SMALL_TEN {
                    return self.signed_double(d_value * SMALL_10_POW[exp as usize]);
                }
                let slop = (MAX_DECIMAL_DIGITS - k_digits) as i32;
                if exp <= MAX_SMALL_TEN + slop {
                    d_value *= SMALL_10_POW[slop as usize];
                    return self.signed_double(d_value * SMALL_10_POW[(exp - slop) as usize]);
                }
            } else if exp >= -MAX_SMALL_TEN {
                return self.signed_double(d_value / SMALL_10_POW[(-exp) as usize]);
            }
        }

        if exp > 0 {
            if self.dec_exponent > MAX_DECIMAL_EXPONENT + 1 {
                return self.signed_double(f64::INFINITY);
            }
            if exp & 15 != 0 {
                d_value *= SMALL_10_POW[(exp & 15) as usize];
            }
            exp >>= 4;
            if exp != 0 {
                let mut j = 0;
                while exp > 1 {
                    if exp & 1 != 0 {
                        d_value *= BIG_10_POW[j];
                    }
                    j += 1;
                    exp >>= 1;
                }
                // The last multiply may overflow although the true value
                // does not; retry at half scale and pin to MAX_VALUE
                let mut t = d_value * BIG_10_POW[j];
                if t.is_infinite() {
                    t = d_value / 2.0;
                    t *= BIG_10_POW[j];
                    if t.is_infinite() {
                        return self.signed_double(f64::INFINITY);
                    }
                    t = f64::MAX;
                }
                d_value = t;
            }
        } else if exp < 0 {
            exp = -exp;
            if self.dec_exponent < MIN_DECIMAL_EXPONENT - 1 {
                return self.signed_double(0.0);
            }
            if exp & 15 != 0 {
                d_value /= SMALL_10_POW[(exp & 15) as usize];
            }
            exp >>= 4;
            if exp != 0 {
                let mut j = 0;
                while exp > 1 {
                    if exp & 1 != 0 {
                        d_value *= TINY_10_POW[j];
                    }
                    j += 1;
                    exp >>= 1;
                }
                let mut t = d_value * TINY_10_POW[j];
                if t == 0.0 {
                    t = d_value * 2.0;
                    t *= TINY_10_POW[j];
                    if t == 0.0 {
                        return self.signed_double(0.0);
                    }
                    t = f64::from_bits(1);
                }
                d_value = t;
            }
        }

        let (big_digits, n_digits) = self.big_digits(MAX_NDIGITS);
        let exp = self.dec_exponent - n_digits as i32;
        let bits = correct(d_value.to_bits(), big_digits, exp, &DOUBLE_FORMAT);
        self.signed_double(f64::from_bits(bits))
    }

    /// Nearest float, ties to even
    pub fn float_value(&self) -> f32 {
        let n_digits = self.digits.len();
        let k_digits = n_digits.min(SINGLE_MAX_DECIMAL_DIGITS + 1);

        let mut i_value = digit(self.digits[0]);
        for &c in &self.digits[1..k_digits] {
            i_value = i_value * 10 + digit(c);
        }
        let mut f_value = i_value as f32;
        let mut exp = self.dec_exponent - k_digits as i32;

        if n_digits <= SINGLE_MAX_DECIMAL_DIGITS {
            if exp == 0 || f_value == 0.0 {
                return self.signed_float(f_value);
            } else if exp >= 0 {
                if exp <= SINGLE_MAX_SMALL_TEN {
                    f_value *= SINGLE_SMALL_10_POW[exp as usize];
                    return self.signed_float(f_value);
                }
                let slop = (SINGLE_MAX_DECIMAL_DIGITS - k_digits) as i32;
                if exp <= SINGLE_MAX_SMALL_TEN + slop {
                    f_value *= SINGLE_SMALL_10_POW[slop as usize];
                    f_value *= SINGLE_SMALL_10_POW[(exp - slop) as usize];
                    return self.signed_float(f_value);
                }
            } else if exp >= -SINGLE_MAX_SMALL_TEN {
                f_value /= SINGLE_SMALL_10_POW[(-exp) as usize];
                return self.signed_float(f_value);
            }
        } else if self.dec_exponent >= n_digits as i32
            && n_digits as i32 + self.dec_exponent <= MAX_DECIMAL_DIGITS as i32
        {
            // An integer of at most 15 digits is exact in a double, so one
            // multiply and one narrowing round it correctly
            let mut l_value = i64::from(i_value);
            for &c in &self.digits[k_digits..] {
                l_value = l_value * 10 + i64::from(digit(c));
            }
            let d_value = l_value as f64 * SMALL_10_POW[(self.dec_exponent - n_digits as i32) as usize];
            return self.signed_float(d_value as f32);
        }

        let mut d_value = f64::from(f_value);
        if exp > 0 {
            if self.dec_exponent > SINGLE_MAX_DECIMAL_EXPONENT + 1 {
                return self.signed_float(f32::INFINITY);
            }
            if exp & 15 != 0 {
                d_value *= SMALL_10_POW[(exp & 15) as usize];
            }
            exp >>= 4;
            let mut j = 0;
            while exp > 0 {
                if exp & 1 != 0 {
                    d_value *= BIG_10_POW[j];
                }
                j += 1;
                exp >>= 1;
            }
        } else if exp < 0 {
            exp = -exp;
            if self.dec_exponent < SINGLE_MIN_DECIMAL_EXPONENT - 1 {
                return self.signed_float(0.0);
            }
            if exp & 15 != 0 {
                d_value /= SMALL_10_POW[(exp & 15) as usize];
            }
            exp >>= 4;
            let mut j = 0;
            while exp > 0 {
                if exp & 1 != 0 {
                    d_value *= TINY_10_POW[j];
                }
                j += 1;
                exp >>= 1;
            }
        }
        let f_value = (d_value as f32).min(f32::MAX).max(f32::from_bits(1));

        let (big_digits, n_digits) = self.big_digits(SINGLE_MAX_NDIGITS);
        let exp = self.dec_exponent - n_digits as i32;
        let bits = correct(u64::from(f_value.to_bits()), big_digits, exp, &SINGLE_FORMAT);
        self.signed_float(f32::from_bits(bits as u32))
    }
}

fn pow5(exponent: i32) -> BigUint {
    pow(BigUint::from(5u32), exponent as usize)
}

/// Walk the candidate `ieee_bits` toward the decimal `digits * 10^exp` until
/// it is the nearest representable value.
fn correct(mut ieee_bits: u64, digits: BigUint, exp: i32, format: &BinaryFormat) -> u64 {
    let b5 = (-exp).max(0);
    let d5 = exp.max(0);
    let big_d0 = digits * pow5(d5);
    let b5_pow = pow5(b5);

    loop {
        let mut binexp = (ieee_bits >> format.exp_shift) as i32;
        let mut big_b_bits = ieee_bits & format.signif_bit_mask;
        if binexp > 0 {
            big_b_bits |= format.fract_hob;
        } else {
            // Subnormal: normalize so the leading one sits at the hidden bit
            let leading_zeros = big_b_bits.leading_zeros() as i32;
            let shift = leading_zeros - (63 - format.exp_shift);
            big_b_bits <<= shift;
            binexp = 1 - shift;
        }
        binexp -= format.exp_bias;

        let low_order_zeros = big_b_bits.trailing_zeros() as i32;
        big_b_bits >>= low_order_zeros;
        let big_int_exp = binexp - format.exp_shift + low_order_zeros;
        let big_int_n_bits = format.exp_shift + 1 - low_order_zeros;

        let mut b2 = b5;
        let mut d2 = d5;
        if big_int_exp >= 0 {
            b2 += big_int_exp;
        } else {
            d2 -= big_int_exp;
        }
        let mut ulp2 = b2;

        // Scale everything by one more power of two so the half-ULP is an
        // integer; subnormals have a fixed ULP
        let hulpbias = if binexp <= -format.exp_bias {
            binexp + low_order_zeros + format.exp_bias
        } else {
            1 + low_order_zeros
        };
        b2 += hulpbias;
        d2 += hulpbias;

        let common2 = b2.min(d2).min(ulp2);
        b2 -= common2;
        d2 -= common2;
        ulp2 -= common2;

        let big_b = (BigUint::from(big_b_bits) * &b5_pow) << (b2 as usize);
        let big_d = &big_d0 << (d2 as usize);

        let (diff, overvalue) = match big_b.cmp(&big_d) {
            Ordering::Greater => {
                let mut diff = big_b - big_d;
                // Just above a power of two the next value down is half an
                // ULP closer
                if big_int_n_bits == 1 && big_int_exp > -format.exp_bias + 1 {
                    ulp2 -= 1;
                    if ulp2 < 0 {
                        ulp2 = 0;
                        diff <<= 1usize;
                    }
                }
                (diff, true)
            }
            Ordering::Less => (big_d - big_b, false),
            Ordering::Equal => break,
        };

        let half_ulp = &b5_pow << (ulp2 as usize);
        match diff.cmp(&half_ulp) {
            Ordering::Less => break,
            Ordering::Equal => {
                if ieee_bits & 1 != 0 {
                    ieee_bits = step(ieee_bits, overvalue);
                }
                break;
            }
            Ordering::Greater => {
                ieee_bits = step(ieee_bits, overvalue);
                if ieee_bits == 0 || ieee_bits == format.exp_bit_mask {
                    break;
                }
            }
        }
    }
    ieee_bits
}

#[inline]
fn step(bits: u64, overvalue: bool) -> u64 {
    if overvalue {
        bits.wrapping_sub(1)
    } else {
        bits + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer(digits: &str, dec_exponent: i32) -> DecimalBuffer {
        DecimalBuffer {
            negative: false,
            dec_exponent,
            digits: digits.as_bytes().to_vec(),
        }
    }

    #[test]
    fn test_powers_of_five() {
        use num_traits::One;
        assert!(pow5(0).is_one());
        assert_eq!(pow5(3), BigUint::from(125u32));
        assert_eq!(pow5(27), BigUint::from(7_450_580_596_923_828_125u64));
    }

    #[test]
    fn test_big_digits_sticky_bit() {
        let (value, used) = buffer("123456", 6).big_digits(4);
        assert_eq!((value, used), (BigUint::from(12_341u32), 5));
        let (value, used) = buffer("12", 2).big_digits(4);
        assert_eq!((value, used), (BigUint::from(12u32), 2));
    }

    #[test]
    fn test_fast_path() {
        assert_eq!(buffer("15", 1).double_value(), 1.5);
        assert_eq!(buffer("25", -1).double_value(), 0.025);
        assert_eq!(buffer("1", 23).double_value(), 1e22);
    }

    #[test]
    fn test_correction_loop_on_long_input() {
        // 2^-1074 written out to many digits
        let digits = "4940656458412465441765687928682213723651";
        assert_eq!(buffer(digits, -323).double_value().to_bits(), 1);
    }

    #[test]
    fn test_float_tie_rounds_to_even() {
        assert_eq!(buffer("16777217", 8).float_value(), 16_777_216.0);
        assert_eq!(buffer("16777219", 8).float_value(), 16_777_220.0);
    }
}
