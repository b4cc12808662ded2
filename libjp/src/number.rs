//! Numeric literal evaluation.
//!
//! Numbers are built digit by digit: the integer part as `value * 10 + d`,
//! the fraction as a separate integer divided by `10^digits`, and the
//! exponent applied as powers of ten at the end, at most `10^308` per step so
//! subnormal results stay reachable. The result is close
//! to, but not always exactly, the correctly rounded double for the literal.
//! Long mantissas and large exponents lose precision; magnitudes past the
//! `f64` range become infinite.

use crate::error::{ParseError, Result};
use crate::scanner::Scanner;

/// Fraction digits past this count are consumed but ignored. They cannot
/// move the result and would overflow the accumulator.
const MAX_FRACTION_DIGITS: i32 = 300;

/// Largest power of ten that is finite as an `f64`.
const MAX_SCALE_STEP: i32 = 308;

/// Evaluate the number literal at the cursor, leaving the cursor on the
/// first byte that cannot continue it.
pub fn parse_number(scanner: &mut Scanner<'_>) -> Result<f64> {
    let negative = scanner.peek() == Some(b'-');
    if negative {
        scanner.advance();
    }

    let mut value = match scanner.peek() {
        Some(b'0') => {
            scanner.advance();
            if scanner.at_digit() {
                return Err(ParseError::LeadingZero(scanner.error_context()));
            }
            0.0
        }
        Some(b) if b.is_ascii_digit() => {
            let mut value = 0.0;
            while let Some(d) = digit(scanner) {
                value = value * 10.0 + d;
            }
            value
        }
        _ => {
            return Err(ParseError::ExpectedDigit {
                found: scanner.describe_current(),
                context: scanner.error_context(),
            })
        }
    };

    if scanner.peek() == Some(b'.') {
        scanner.advance();
        if !scanner.at_digit() {
            return Err(ParseError::MissingFraction {
                found: scanner.describe_current(),
                context: scanner.error_context(),
            });
        }
        let mut fraction = 0.0;
        let mut digits = 0;
        while let Some(d) = digit(scanner) {
            if digits < MAX_FRACTION_DIGITS {
                fraction = fraction * 10.0 + d;
                digits += 1;
            }
        }
        value += fraction / 10f64.powi(digits);
    }

    if matches!(scanner.peek(), Some(b'e' | b'E')) {
        scanner.advance();
        let negative_exponent = match scanner.peek() {
            Some(b'-') => {
                scanner.advance();
                true
            }
            Some(b'+') => {
                scanner.advance();
                false
            }
            _ => false,
        };
        if !scanner.at_digit() {
            return Err(ParseError::MissingExponent {
                found: scanner.describe_current(),
                context: scanner.error_context(),
            });
        }
        let mut exponent: i32 = 0;
        while let Some(d) = digit(scanner) {
            exponent = exponent.saturating_mul(10).saturating_add(d as i32);
        }
        value = scale(value, exponent, negative_exponent);
    }

    Ok(if negative { -value } else { value })
}

/// Multiply or divide by `10^exponent`, in steps that stay inside the `f64`
/// range so subnormal and near-overflow results are reachable. Stops once the
/// value has collapsed to zero or infinity.
fn scale(mut value: f64, mut exponent: i32, divide: bool) -> f64 {
    while exponent > 0 && value != 0.0 && value.is_finite() {
        let step = exponent.min(MAX_SCALE_STEP);
        let factor = 10f64.powi(step);
        if divide {
            value /= factor;
        } else {
            value *= factor;
        }
        exponent -= step;
    }
    value
}

/// Consume one ASCII digit and return its value.
fn digit(scanner: &mut Scanner<'_>) -> Option<f64> {
    let b = scanner.peek().filter(u8::is_ascii_digit)?;
    scanner.advance();
    Some(f64::from(b - b'0'))
}
