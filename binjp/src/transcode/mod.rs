//! Encoders from parsed JSON values into other data formats.
//!
//! JSON has a single number type. Every encoder here writes a number as an
//! integer when it is integral and exactly representable, and as a float
//! otherwise, so `31` stays `31` in YAML, TOML and CBOR.

pub mod cbor;
pub mod toml;
pub mod yaml;

/// Largest magnitude at which every integer is exactly representable in f64.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// The integer a number stands for, if it is integral and exact.
///
/// Negative zero is kept as a float so its sign survives.
pub fn as_integer(n: f64) -> Option<i64> {
    if n.is_finite() && n.fract() == 0.0 && n.abs() <= MAX_EXACT_INTEGER {
        if n == 0.0 && n.is_sign_negative() {
            return None;
        }
        Some(n as i64)
    } else {
        None
    }
}
