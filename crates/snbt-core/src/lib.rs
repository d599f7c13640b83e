//! SNBT Core Library
//!
//! Numeric foundations shared by the SNBT grammar and formatter:
//!
//! - **Numeric types**: Java-compatible fixed-width integers and IEEE-754
//!   wrappers (`numeric` module)
//! - **Decimal conversion**: correctly rounded `Double.parseDouble` /
//!   `Float.parseFloat` semantics (`floating_decimal` module)
//! - **Errors**: the number-format and arithmetic error types (`error` module)
//!
//! Floats parsed here round directly from the decimal text to each target
//! width, so `JFloat::parse("16777217")` is `16777216.0` and never the
//! double-rounded neighbour.

pub mod error;
pub mod floating_decimal;
pub mod numeric;

pub use error::{ArithmeticError, ArithmeticResult, NumberFormatError, NumberResult};
pub use floating_decimal::{parse_double, parse_float, BinaryConverter, DecimalBuffer};
pub use numeric::{JByte, JDouble, JFloat, JInt, JLong, JShort};

/// Version information for the snbt-core crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
