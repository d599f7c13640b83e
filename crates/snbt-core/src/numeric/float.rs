//! IEEE-754 bit-pattern wrappers with Java semantics

use crate::error::NumberResult;
use crate::floating_decimal;
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

macro_rules! java_float {
    (
        $(#[$meta:meta])* $name:ident, $prim:ty, $bits:ty,
        exp_bias: $bias:expr,
        significand_width: $width:expr,
        min_exponent: $min_exp:expr,
        max_exponent: $max_exp:expr,
        min_sub_exponent: $min_sub:expr,
        canonical_nan: $nan:expr
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy)]
        pub struct $name {
            bits: $bits,
        }

        impl $name {
            /// Mask of the sign bit
            pub const SIGN_BIT_MASK: $bits = 1 << (<$bits>::BITS - 1);
            /// Mask of the biased exponent field
            pub const EXP_BIT_MASK: $bits = !Self::SIGN_BIT_MASK & !Self::SIGNIF_BIT_MASK;
            /// Mask of the stored significand (fraction) bits
            pub const SIGNIF_BIT_MASK: $bits = (1 << ($width - 1)) - 1;
            /// Exponent bias
            pub const EXP_BIAS: i32 = $bias;
            /// Significand width including the implicit bit
            pub const SIGNIFICAND_WIDTH: u32 = $width;
            /// Smallest unbiased exponent of a normal value
            pub const MIN_EXPONENT: i32 = $min_exp;
            /// Largest unbiased exponent of a finite value
            pub const MAX_EXPONENT: i32 = $max_exp;
            /// Unbiased exponent of the smallest subnormal value
            pub const MIN_SUB_EXPONENT: i32 = $min_sub;

            /// Largest finite value
            pub const MAX_VALUE: $name = $name { bits: Self::EXP_BIT_MASK - 1 };
            /// Smallest positive subnormal value
            pub const MIN_VALUE: $name = $name { bits: 1 };
            /// Smallest positive normal value
            pub const MIN_NORMAL: $name = $name { bits: Self::SIGNIF_BIT_MASK + 1 };
            pub const POSITIVE_INFINITY: $name = $name { bits: Self::EXP_BIT_MASK };
            pub const NEGATIVE_INFINITY: $name = $name { bits: Self::EXP_BIT_MASK | Self::SIGN_BIT_MASK };
            pub const NAN: $name = $name { bits: $nan };
            pub const ZERO: $name = $name { bits: 0 };
            pub const NEGATIVE_ZERO: $name = $name { bits: Self::SIGN_BIT_MASK };

            pub fn new(value: $prim) -> Self {
                $name { bits: value.to_bits() }
            }

            pub const fn from_raw_bits(bits: $bits) -> Self {
                $name { bits }
            }

            pub fn value(self) -> $prim {
                <$prim>::from_bits(self.bits)
            }

            /// The exact bit pattern, NaN payload included
            pub const fn to_raw_bits(self) -> $bits {
                self.bits
            }

            /// The bit pattern with every NaN collapsed to the canonical NaN
            pub fn to_bits(self) -> $bits {
                if self.is_nan() {
                    $nan
                } else {
                    self.bits
                }
            }

            pub const fn is_nan(self) -> bool {
                (self.bits & !Self::SIGN_BIT_MASK) > Self::EXP_BIT_MASK
            }

            pub const fn is_infinite(self) -> bool {
                (self.bits & !Self::SIGN_BIT_MASK) == Self::EXP_BIT_MASK
            }

            pub const fn is_finite(self) -> bool {
                (self.bits & Self::EXP_BIT_MASK) != Self::EXP_BIT_MASK
            }

            pub const fn is_sign_negative(self) -> bool {
                self.bits & Self::SIGN_BIT_MASK != 0
            }

            /// Unbiased exponent; `MAX_EXPONENT + 1` for NaN and infinities,
            /// `MIN_EXPONENT - 1` for zero and subnormals
            pub const fn get_exponent(self) -> i32 {
                let shift = Self::SIGNIFICAND_WIDTH - 1;
                ((self.bits & Self::EXP_BIT_MASK) >> shift) as i32 - Self::EXP_BIAS
            }

            /// Total order used by Java's `compare`: `-0.0 < 0.0`, NaN above everything
            pub fn compare(self, other: Self) -> Ordering {
                let (a, b) = (self.value(), other.value());
                if a < b {
                    return Ordering::Less;
                }
                if a > b {
                    return Ordering::Greater;
                }
                // Signed view of the canonical bits orders -0.0 below 0.0
                let this_bits = self.to_bits() as i64;
                let other_bits = other.to_bits() as i64;
                let this_bits = if <$bits>::BITS == 32 { this_bits as i32 as i64 } else { this_bits };
                let other_bits = if <$bits>::BITS == 32 { other_bits as i32 as i64 } else { other_bits };
                this_bits.cmp(&other_bits)
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                self.to_bits() == other.to_bits()
            }
        }

        impl Eq for $name {}

        impl std::hash::Hash for $name {
            fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
                self.to_bits().hash(state);
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({:#x})", stringify!($name), self.bits)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let value = self.value();
                if value.is_nan() {
                    f.write_str("NaN")
                } else if value.is_infinite() {
                    f.write_str(if value > 0.0 { "Infinity" } else { "-Infinity" })
                } else {
                    f.write_str(&java_notation(&format!("{value:e}")))
                }
            }
        }

        impl From<$prim> for $name {
            fn from(value: $prim) -> Self {
                $name::new(value)
            }
        }

        impl From<$name> for $prim {
            fn from(value: $name) -> Self {
                value.value()
            }
        }

        impl Add for $name {
            type Output = $name;

            fn add(self, rhs: $name) -> $name {
                $name::new(self.value() + rhs.value())
            }
        }

        impl Sub for $name {
            type Output = $name;

            fn sub(self, rhs: $name) -> $name {
                $name::new(self.value() - rhs.value())
            }
        }

        impl Mul for $name {
            type Output = $name;

            fn mul(self, rhs: $name) -> $name {
                $name::new(self.value() * rhs.value())
            }
        }

        impl Div for $name {
            type Output = $name;

            fn div(self, rhs: $name) -> $name {
                $name::new(self.value() / rhs.value())
            }
        }

        impl Neg for $name {
            type Output = $name;

            fn neg(self) -> $name {
                $name { bits: self.bits ^ Self::SIGN_BIT_MASK }
            }
        }
    };
}

java_float!(
    /// Java `float`: IEEE-754 binary32
    JFloat, f32, u32,
    exp_bias: 127,
    significand_width: 24,
    min_exponent: -126,
    max_exponent: 127,
    min_sub_exponent: -149,
    canonical_nan: 0x7fc0_0000
);

java_float!(
    /// Java `double`: IEEE-754 binary64
    JDouble, f64, u64,
    exp_bias: 1023,
    significand_width: 53,
    min_exponent: -1022,
    max_exponent: 1023,
    min_sub_exponent: -1074,
    canonical_nan: 0x7ff8_0000_0000_0000
);

impl JFloat {
    /// `Float.parseFloat(s)`
    pub fn parse(s: &str) -> NumberResult<Self> {
        floating_decimal::parse_float(s).map(JFloat::new)
    }

    /// Widen to `double`; exact
    pub fn to_double(self) -> JDouble {
        JDouble::new(f64::from(self.value()))
    }
}

impl JDouble {
    /// `Double.parseDouble(s)`
    pub fn parse(s: &str) -> NumberResult<Self> {
        floating_decimal::parse_double(s).map(JDouble::new)
    }

    /// Narrow to `float` with round-to-nearest-even
    pub fn to_float(self) -> JFloat {
        JFloat::new(self.value() as f32)
    }
}

/// Rewrite Rust's shortest `{:e}` output (`1.5e-7`) in the layout of Java's
/// `Double.toString`: plain notation for magnitudes in `[1e-3, 1e7)`,
/// `d.dddE±n` otherwise, and always at least one fractional digit.
fn java_notation(scientific: &str) -> String {
    let (negative, unsigned) = match scientific.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, scientific),
    };
    let (mantissa, exponent) = unsigned.split_once('e').unwrap_or((unsigned, "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();

    let mut out = String::with_capacity(digits.len() + 8);
    if negative {
        out.push('-');
    }
    if digits.bytes().all(|d| d == b'0') {
        out.push_str("0.0");
        return out;
    }

    if (-3..7).contains(&exponent) {
        if exponent < 0 {
            out.push_str("0.");
            for _ in 0..(-exponent - 1) {
                out.push('0');
            }
            out.push_str(&digits);
        } else {
            let point = exponent as usize + 1;
            if digits.len() <= point {
                out.push_str(&digits);
                for _ in digits.len()..point {
                    out.push('0');
                }
                out.push_str(".0");
            } else {
                out.push_str(&digits[..point]);
                out.push('.');
                out.push_str(&digits[point..]);
            }
        }
    } else {
        out.push_str(&digits[..1]);
        out.push('.');
        if digits.len() > 1 {
            out.push_str(&digits[1..]);
        } else {
            out.push('0');
        }
        out.push('E');
        out.push_str(&exponent.to_string());
    }
    out
}
