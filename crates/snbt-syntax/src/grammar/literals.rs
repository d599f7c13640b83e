//! Intermediate values built by the number and array rules

use crate::error::{SnbtError, SnbtResult};
use crate::tag::Tag;
use snbt_core::{JByte, JDouble, JFloat, JInt, JLong, JShort};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sign {
    #[default]
    Plus,
    Minus,
}

impl Sign {
    fn push_to(self, out: &mut String) {
        if self == Sign::Minus {
            out.push('-');
        }
    }
}

/// The `s`/`u` part of an integer suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signedness {
    Signed,
    Unsigned,
}

/// Width letter of a number suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeSuffix {
    Float,
    Double,
    Byte,
    Short,
    Int,
    Long,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IntegerSuffix {
    pub signedness: Option<Signedness>,
    pub kind: Option<TypeSuffix>,
}

impl IntegerSuffix {
    pub const fn new(signedness: Option<Signedness>, kind: TypeSuffix) -> Self {
        Self {
            signedness,
            kind: Some(kind),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Base {
    Binary,
    Decimal,
    Hex,
}

impl Base {
    pub const fn radix(self) -> u32 {
        match self {
            Base::Binary => 2,
            Base::Decimal => 10,
            Base::Hex => 16,
        }
    }

    /// Signedness when the literal has no `s`/`u` prefix
    pub const fn default_signedness(self) -> Signedness {
        match self {
            Base::Decimal => Signedness::Signed,
            Base::Binary | Base::Hex => Signedness::Unsigned,
        }
    }
}

fn push_without_underscores(out: &mut String, digits: &str) {
    out.extend(digits.chars().filter(|&c| c != '_'));
}

/// An integer literal whose width may still be decided by its context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegerLiteral {
    pub sign: Sign,
    pub base: Base,
    pub digits: String,
    pub suffix: IntegerSuffix,
}

impl IntegerLiteral {
    pub fn signedness(&self) -> Signedness {
        self.suffix
            .signedness
            .unwrap_or_else(|| self.base.default_signedness())
    }

    /// Digits ready for the Java parsers: underscores gone, sign in front.
    fn cleaned_digits(&self) -> String {
        let mut out = String::with_capacity(self.digits.len() + 1);
        self.sign.push_to(&mut out);
        push_without_underscores(&mut out, &self.digits);
        out
    }

    /// Parse as `kind`, returning the value sign-extended to 64 bits.
    ///
    /// Unsigned literals accept the full unsigned range of `kind` and keep
    /// the bit pattern.
    pub fn parse_as(&self, kind: TypeSuffix) -> SnbtResult<i64> {
        let signed = self.signedness() == Signedness::Signed;
        if !signed && self.sign == Sign::Minus {
            return Err(SnbtError::ExpectedNonNegative);
        }
        let digits = self.cleaned_digits();
        let radix = self.base.radix();
        let value = match (kind, signed) {
            (TypeSuffix::Byte, true) => JByte::parse(&digits, radix)?.as_i64(),
            (TypeSuffix::Byte, false) => JByte::parse_unsigned(&digits, radix)?.as_i64(),
            (TypeSuffix::Short, true) => JShort::parse(&digits, radix)?.as_i64(),
            (TypeSuffix::Short, false) => JShort::parse_unsigned(&digits, radix)?.as_i64(),
            (TypeSuffix::Int, true) => JInt::parse(&digits, radix)?.as_i64(),
            (TypeSuffix::Int, false) => JInt::parse_unsigned(&digits, radix)?.as_i64(),
            (TypeSuffix::Long, true) => JLong::parse(&digits, radix)?.as_i64(),
            (TypeSuffix::Long, false) => JLong::parse_unsigned(&digits, radix)?.as_i64(),
            (TypeSuffix::Float | TypeSuffix::Double, _) => {
                return Err(SnbtError::ExpectedIntegerType)
            }
        };
        Ok(value)
    }

    /// The tag for this literal on its own; int unless suffixed.
    pub fn to_tag(&self) -> SnbtResult<Tag> {
        let kind = self.suffix.kind.unwrap_or(TypeSuffix::Int);
        let value = self.parse_as(kind)?;
        Ok(match kind {
            TypeSuffix::Byte => Tag::Byte(value as i8),
            TypeSuffix::Short => Tag::Short(value as i16),
            TypeSuffix::Long => Tag::Long(value),
            _ => Tag::Int(value as i32),
        })
    }
}

/// Exponent of a float literal, decimal in both the `e` and `p` forms
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exponent {
    pub sign: Sign,
    pub digits: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FloatLiteral {
    pub sign: Sign,
    pub whole: Option<String>,
    pub fraction: Option<String>,
    pub exponent: Option<Exponent>,
    pub suffix: Option<TypeSuffix>,
    /// Hex significand with a binary `p` exponent
    pub hex: bool,
}

impl FloatLiteral {
    fn text(&self) -> String {
        let mut out = String::new();
        self.sign.push_to(&mut out);
        if self.hex {
            out.push_str("0x");
        }
        if let Some(whole) = &self.whole {
            push_without_underscores(&mut out, whole);
        }
        if let Some(fraction) = &self.fraction {
            out.push('.');
            push_without_underscores(&mut out, fraction);
        }
        if let Some(exponent) = &self.exponent {
            out.push(if self.hex { 'p' } else { 'e' });
            exponent.sign.push_to(&mut out);
            push_without_underscores(&mut out, &exponent.digits);
        }
        out
    }

    /// Convert with Java rounding; double unless suffixed with `f`.
    pub fn to_tag(&self) -> SnbtResult<Tag> {
        let text = self.text();
        match self.suffix {
            None | Some(TypeSuffix::Double) => {
                let value = JDouble::parse(&text)?.value();
                if !value.is_finite() {
                    return Err(SnbtError::NonFiniteNumber);
                }
                Ok(Tag::Double(value))
            }
            Some(TypeSuffix::Float) => {
                let value = JFloat::parse(&text)?.value();
                if !value.is_finite() {
                    return Err(SnbtError::NonFiniteNumber);
                }
                Ok(Tag::Float(value))
            }
            Some(_) => Err(SnbtError::ExpectedFloatType),
        }
    }
}

/// The `B;`, `I;` or `L;` that opens a typed array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayPrefix {
    Byte,
    Int,
    Long,
}

impl ArrayPrefix {
    const fn default_kind(self) -> TypeSuffix {
        match self {
            ArrayPrefix::Byte => TypeSuffix::Byte,
            ArrayPrefix::Int => TypeSuffix::Int,
            ArrayPrefix::Long => TypeSuffix::Long,
        }
    }

    /// Whether an element suffixed with `kind` may appear in the array.
    pub const fn allows(self, kind: TypeSuffix) -> bool {
        match self {
            ArrayPrefix::Byte => matches!(kind, TypeSuffix::Byte),
            ArrayPrefix::Int => matches!(kind, TypeSuffix::Byte | TypeSuffix::Short | TypeSuffix::Int),
            ArrayPrefix::Long => matches!(
                kind,
                TypeSuffix::Byte | TypeSuffix::Short | TypeSuffix::Int | TypeSuffix::Long
            ),
        }
    }

    fn element_value(self, entry: &IntegerLiteral) -> SnbtResult<i64> {
        let kind = match entry.suffix.kind {
            None => self.default_kind(),
            Some(kind) if self.allows(kind) => kind,
            Some(_) => return Err(SnbtError::InvalidArrayElementType),
        };
        entry.parse_as(kind)
    }

    /// Build the array; narrower elements are widened to the array type.
    pub fn build(self, entries: &[IntegerLiteral]) -> SnbtResult<Tag> {
        let values = entries
            .iter()
            .map(|entry| self.element_value(entry))
            .collect::<SnbtResult<Vec<i64>>>()?;
        Ok(match self {
            ArrayPrefix::Byte => Tag::ByteArray(values.into_iter().map(|v| v as i8).collect()),
            ArrayPrefix::Int => Tag::IntArray(values.into_iter().map(|v| v as i32).collect()),
            ArrayPrefix::Long => Tag::LongArray(values),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn literal(sign: Sign, base: Base, digits: &str, suffix: IntegerSuffix) -> IntegerLiteral {
        IntegerLiteral {
            sign,
            base,
            digits: digits.to_string(),
            suffix,
        }
    }

    #[test]
    fn test_unsigned_keeps_bit_pattern() {
        let suffix = IntegerSuffix::new(Some(Signedness::Unsigned), TypeSuffix::Byte);
        let byte = literal(Sign::Plus, Base::Hex, "FF", suffix);
        assert_eq!(byte.to_tag().unwrap(), Tag::Byte(-1));

        let int = literal(Sign::Plus, Base::Hex, "FFFF_FFFF", IntegerSuffix::default());
        assert_eq!(int.to_tag().unwrap(), Tag::Int(-1));
    }

    #[test]
    fn test_signed_range_checked() {
        let suffix = IntegerSuffix::new(Some(Signedness::Signed), TypeSuffix::Byte);
        let error = literal(Sign::Plus, Base::Hex, "FF", suffix).to_tag().unwrap_err();
        assert!(error.to_string().starts_with("Failed to parse number: "), "{error}");

        let min = literal(Sign::Minus, Base::Decimal, "128", IntegerSuffix::new(None, TypeSuffix::Byte));
        assert_eq!(min.to_tag().unwrap(), Tag::Byte(-128));
    }

    #[test]
    fn test_minus_on_unsigned() {
        let error = literal(Sign::Minus, Base::Binary, "1", IntegerSuffix::default())
            .to_tag()
            .unwrap_err();
        assert!(matches!(error, SnbtError::ExpectedNonNegative));
    }

    #[test]
    fn test_float_text() {
        let float = FloatLiteral {
            sign: Sign::Minus,
            whole: Some("1_000".to_string()),
            fraction: Some("5".to_string()),
            exponent: Some(Exponent {
                sign: Sign::Minus,
                digits: "2".to_string(),
            }),
            ..FloatLiteral::default()
        };
        assert_eq!(float.text(), "-1000.5e-2");
        assert_eq!(float.to_tag().unwrap(), Tag::Double(-10.005));
    }

    #[test]
    fn test_hex_float() {
        let float = FloatLiteral {
            whole: Some("1".to_string()),
            fraction: Some("8".to_string()),
            exponent: Some(Exponent {
                sign: Sign::Plus,
                digits: "3".to_string(),
            }),
            suffix: Some(TypeSuffix::Float),
            hex: true,
            ..FloatLiteral::default()
        };
        assert_eq!(float.text(), "0x1.8p3");
        assert_eq!(float.to_tag().unwrap(), Tag::Float(12.0));
    }

    #[test]
    fn test_overflow_is_rejected() {
        let float = FloatLiteral {
            whole: Some("1".to_string()),
            exponent: Some(Exponent {
                sign: Sign::Plus,
                digits: "39".to_string(),
            }),
            suffix: Some(TypeSuffix::Float),
            ..FloatLiteral::default()
        };
        assert!(matches!(float.to_tag(), Err(SnbtError::NonFiniteNumber)));
    }

    #[test]
    fn test_array_element_types() {
        let short = literal(Sign::Plus, Base::Decimal, "3", IntegerSuffix::new(None, TypeSuffix::Short));
        assert_eq!(ArrayPrefix::Long.build(&[short.clone()]).unwrap(), Tag::LongArray(vec![3]));
        assert!(matches!(
            ArrayPrefix::Byte.build(&[short]),
            Err(SnbtError::InvalidArrayElementType)
        ));
        assert_eq!(ArrayPrefix::Int.build(&[]).unwrap(), Tag::IntArray(Vec::new()));
    }
}
