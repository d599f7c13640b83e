//! Java-compatible fixed-width numeric value types
//!
//! SNBT literals are defined in terms of Java's primitive types, so the
//! parser needs their exact behavior: two's-complement wraparound on
//! overflow, shift distances masked to the type width, and the parsing
//! rules (and error messages) of `Integer.parseInt` and friends.
//!
//! - [`JByte`], [`JShort`], [`JInt`], [`JLong`]: signed integers
//! - [`JFloat`], [`JDouble`]: IEEE-754 bit-pattern wrappers

mod float;
mod parse;

pub use float::{JDouble, JFloat};

use crate::error::{ArithmeticError, ArithmeticResult, NumberResult};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, BitAnd, BitOr, BitXor, Mul, Neg, Not, Sub};
use std::str::FromStr;

macro_rules! java_integer {
    ($(#[$meta:meta])* $name:ident, $prim:ty, $unsigned:ty) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub $prim);

        impl $name {
            /// Smallest representable value
            pub const MIN: $name = $name(<$prim>::MIN);
            /// Largest representable value
            pub const MAX: $name = $name(<$prim>::MAX);
            /// Zero
            pub const ZERO: $name = $name(0);
            /// Width in bits
            pub const SIZE: u32 = <$prim>::BITS;

            pub const fn new(value: $prim) -> Self {
                $name(value)
            }

            pub const fn value(self) -> $prim {
                self.0
            }

            /// Widen to a 64-bit signed value
            pub const fn as_i64(self) -> i64 {
                self.0 as i64
            }

            /// Narrow a 64-bit value, keeping the low-order bits (a Java cast)
            pub const fn from_i64_wrapping(value: i64) -> Self {
                $name(value as $prim)
            }

            /// Reinterpret the bit pattern as unsigned
            pub const fn to_unsigned(self) -> $unsigned {
                self.0 as $unsigned
            }

            /// Division truncating toward zero; `MIN / -1` wraps to `MIN`
            pub fn checked_div(self, rhs: Self) -> ArithmeticResult<Self> {
                if rhs.0 == 0 {
                    return Err(ArithmeticError::DivisionByZero);
                }
                Ok($name(self.0.wrapping_div(rhs.0)))
            }

            /// Remainder with the sign of the dividend
            pub fn checked_rem(self, rhs: Self) -> ArithmeticResult<Self> {
                if rhs.0 == 0 {
                    return Err(ArithmeticError::DivisionByZero);
                }
                Ok($name(self.0.wrapping_rem(rhs.0)))
            }

            /// Left shift; the distance is masked to the type width
            pub const fn shl(self, distance: u32) -> Self {
                $name(self.0.wrapping_shl(distance))
            }

            /// Arithmetic (sign-propagating) right shift
            pub const fn shr(self, distance: u32) -> Self {
                $name(self.0.wrapping_shr(distance))
            }

            /// Logical (zero-filling) right shift, Java's `>>>`
            pub const fn ushr(self, distance: u32) -> Self {
                $name((self.0 as $unsigned).wrapping_shr(distance) as $prim)
            }

            pub const fn number_of_leading_zeros(self) -> u32 {
                self.0.leading_zeros()
            }

            pub const fn number_of_trailing_zeros(self) -> u32 {
                self.0.trailing_zeros()
            }

            pub const fn bit_count(self) -> u32 {
                self.0.count_ones()
            }

            /// Signed three-way comparison
            pub fn compare(self, other: Self) -> Ordering {
                self.0.cmp(&other.0)
            }

            /// Comparison treating both bit patterns as unsigned
            pub fn compare_unsigned(self, other: Self) -> Ordering {
                self.to_unsigned().cmp(&other.to_unsigned())
            }
        }

        impl Add for $name {
            type Output = $name;

            fn add(self, rhs: $name) -> $name {
                $name(self.0.wrapping_add(rhs.0))
            }
        }

        impl Sub for $name {
            type Output = $name;

            fn sub(self, rhs: $name) -> $name {
                $name(self.0.wrapping_sub(rhs.0))
            }
        }

        impl Mul for $name {
            type Output = $name;

            fn mul(self, rhs: $name) -> $name {
                $name(self.0.wrapping_mul(rhs.0))
            }
        }

        impl Neg for $name {
            type Output = $name;

            fn neg(self) -> $name {
                $name(self.0.wrapping_neg())
            }
        }

        impl Not for $name {
            type Output = $name;

            fn not(self) -> $name {
                $name(!self.0)
            }
        }

        impl BitAnd for $name {
            type Output = $name;

            fn bitand(self, rhs: $name) -> $name {
                $name(self.0 & rhs.0)
            }
        }

        impl BitOr for $name {
            type Output = $name;

            fn bitor(self, rhs: $name) -> $name {
                $name(self.0 | rhs.0)
            }
        }

        impl BitXor for $name {
            type Output = $name;

            fn bitxor(self, rhs: $name) -> $name {
                $name(self.0 ^ rhs.0)
            }
        }

        impl From<$prim> for $name {
            fn from(value: $prim) -> Self {
                $name(value)
            }
        }

        impl From<$name> for $prim {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = crate::error::NumberFormatError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $name::parse(s, 10)
            }
        }
    };
}

java_integer!(
    /// Java `byte`: 8-bit two's-complement integer
    JByte, i8, u8
);
java_integer!(
    /// Java `short`: 16-bit two's-complement integer
    JShort, i16, u16
);
java_integer!(
    /// Java `int`: 32-bit two's-complement integer
    JInt, i32, u32
);
java_integer!(
    /// Java `long`: 64-bit two's-complement integer
    JLong, i64, u64
);

impl JByte {
    /// `Byte.parseByte(s, radix)`
    pub fn parse(s: &str, radix: u32) -> NumberResult<Self> {
        let value = JInt::parse(s, radix)?.0;
        i8::try_from(value)
            .map(JByte)
            .map_err(|_| parse::value_out_of_range(s, radix))
    }

    /// Parse in the unsigned range `0..=255` and keep the bit pattern
    pub fn parse_unsigned(s: &str, radix: u32) -> NumberResult<Self> {
        let value = JInt::parse(s, radix)?.0;
        if value >> 8 == 0 {
            Ok(JByte(value as i8))
        } else {
            Err(parse::out_of_range(value))
        }
    }
}

impl JShort {
    /// `Short.parseShort(s, radix)`
    pub fn parse(s: &str, radix: u32) -> NumberResult<Self> {
        let value = JInt::parse(s, radix)?.0;
        i16::try_from(value)
            .map(JShort)
            .map_err(|_| parse::value_out_of_range(s, radix))
    }

    /// Parse in the unsigned range `0..=65535` and keep the bit pattern
    pub fn parse_unsigned(s: &str, radix: u32) -> NumberResult<Self> {
        let value = JInt::parse(s, radix)?.0;
        if value >> 16 == 0 {
            Ok(JShort(value as i16))
        } else {
            Err(parse::out_of_range(value))
        }
    }
}

impl JInt {
    /// `Integer.parseInt(s, radix)`
    pub fn parse(s: &str, radix: u32) -> NumberResult<Self> {
        parse::parse_signed(s, radix, i64::from(i32::MIN), i64::from(i32::MAX))
            .map(|value| JInt(value as i32))
    }

    /// `Integer.parseUnsignedInt(s, radix)`
    pub fn parse_unsigned(s: &str, radix: u32) -> NumberResult<Self> {
        parse::parse_unsigned(s, radix, u64::from(u32::MAX), "int").map(|value| JInt(value as i32))
    }

    /// Widen to `long`
    pub const fn to_long(self) -> JLong {
        JLong(self.0 as i64)
    }
}

impl JLong {
    /// `Long.parseLong(s, radix)`
    pub fn parse(s: &str, radix: u32) -> NumberResult<Self> {
        parse::parse_signed(s, radix, i64::MIN, i64::MAX).map(JLong)
    }

    /// `Long.parseUnsignedLong(s, radix)`
    pub fn parse_unsigned(s: &str, radix: u32) -> NumberResult<Self> {
        parse::parse_unsigned(s, radix, u64::MAX, "long").map(|value| JLong(value as i64))
    }

    /// Narrow to `int`, keeping the low 32 bits
    pub const fn to_int(self) -> JInt {
        JInt(self.0 as i32)
    }
}
