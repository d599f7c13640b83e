//! Constants shared by the decimal and hexadecimal conversion paths

/// Exact powers of ten representable as a double
pub(super) const SMALL_10_POW: [f64; 23] = [
    1.0e0, 1.0e1, 1.0e2, 1.0e3, 1.0e4, 1.0e5, 1.0e6, 1.0e7, 1.0e8, 1.0e9, 1.0e10, 1.0e11,
    1.0e12, 1.0e13, 1.0e14, 1.0e15, 1.0e16, 1.0e17, 1.0e18, 1.0e19, 1.0e20, 1.0e21, 1.0e22,
];

/// Exact powers of ten representable as a float
pub(super) const SINGLE_SMALL_10_POW: [f32; 11] = [
    1.0e0, 1.0e1, 1.0e2, 1.0e3, 1.0e4, 1.0e5, 1.0e6, 1.0e7, 1.0e8, 1.0e9, 1.0e10,
];

pub(super) const BIG_10_POW: [f64; 5] = [1e16, 1e32, 1e64, 1e128, 1e256];
pub(super) const TINY_10_POW: [f64; 5] = [1e-16, 1e-32, 1e-64, 1e-128, 1e-256];

pub(super) const MAX_SMALL_TEN: i32 = SMALL_10_POW.len() as i32 - 1;
pub(super) const SINGLE_MAX_SMALL_TEN: i32 = SINGLE_SMALL_10_POW.len() as i32 - 1;

pub(super) const MAX_DECIMAL_DIGITS: usize = 15;
pub(super) const SINGLE_MAX_DECIMAL_DIGITS: usize = 7;
pub(super) const INT_DECIMAL_DIGITS: usize = 9;

pub(super) const MAX_DECIMAL_EXPONENT: i32 = 308;
pub(super) const MIN_DECIMAL_EXPONENT: i32 = -324;
pub(super) const BIG_DECIMAL_EXPONENT: i32 = 324;
pub(super) const SINGLE_MAX_DECIMAL_EXPONENT: i32 = 38;
pub(super) const SINGLE_MIN_DECIMAL_EXPONENT: i32 = -45;

/// Digits beyond this count cannot change the rounding of a double; the tail
/// is replaced by a single sticky `1`
pub(super) const MAX_NDIGITS: usize = 1100;
pub(super) const SINGLE_MAX_NDIGITS: usize = 200;

/// Bit layout of the binary format the correction loop works on.
#[derive(Debug, Clone, Copy)]
pub(super) struct BinaryFormat {
    pub exp_shift: i32,
    pub exp_bias: i32,
    pub signif_bit_mask: u64,
    pub fract_hob: u64,
    pub exp_bit_mask: u64,
}

pub(super) const DOUBLE_FORMAT: BinaryFormat = BinaryFormat {
    exp_shift: 52,
    exp_bias: 1023,
    signif_bit_mask: 0x000F_FFFF_FFFF_FFFF,
    fract_hob: 1 << 52,
    exp_bit_mask: 0x7FF0_0000_0000_0000,
};

pub(super) const SINGLE_FORMAT: BinaryFormat = BinaryFormat {
    exp_shift: 23,
    exp_bias: 127,
    signif_bit_mask: 0x007F_FFFF,
    fract_hob: 1 << 23,
    exp_bit_mask: 0x7F80_0000,
};
