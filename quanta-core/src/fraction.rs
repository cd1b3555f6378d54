//! Exact fractions
//!
//! Fractional units (inch, foot, yard, ...) convert with exact rational
//! arithmetic. This module bridges `Number` and `num-rational`'s
//! `BigRational` and renders both as plain decimal text.

use crate::number::{Number, NumberError};
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};
use std::cmp::Ordering;

/// Exact rational number
pub type Fraction = BigRational;

/// 10^n as a big integer
pub fn pow10(n: u32) -> BigInt {
    num_traits::pow(BigInt::from(10), n as usize)
}

/// Round to the nearest integer, ties to even
pub fn round_half_even(value: &Fraction) -> BigInt {
    let floor = value.floor();
    let diff = value - &floor;
    let half = Fraction::new(BigInt::one(), BigInt::from(2));
    let floor = floor.to_integer();
    match diff.cmp(&half) {
        Ordering::Less => floor,
        Ordering::Greater => floor + BigInt::one(),
        Ordering::Equal => {
            if (&floor % BigInt::from(2)).is_zero() {
                floor
            } else {
                floor + BigInt::one()
            }
        }
    }
}

/// Quantize to `places` fractional digits (ties to even), then drop
/// trailing zeros and a trailing decimal point.
pub fn to_plain_string(value: &Fraction, places: u32) -> String {
    let scaled = round_half_even(&(value * Fraction::from_integer(pow10(places))));
    if scaled.is_zero() {
        return "0".to_string();
    }

    let digits = scaled.abs().to_string();
    let places = places as usize;
    let padded = if digits.len() <= places {
        format!("{}{}", "0".repeat(places + 1 - digits.len()), digits)
    } else {
        digits
    };
    let (int_part, frac_part) = padded.split_at(padded.len() - places);
    let frac_part = frac_part.trim_end_matches('0');

    let mut out = String::with_capacity(padded.len() + 2);
    if scaled.is_negative() {
        out.push('-');
    }
    out.push_str(int_part);
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}

/// `n/d`, or just `n` when the denominator is one
pub fn format_fraction(value: &Fraction) -> String {
    if value.denom().is_one() {
        value.numer().to_string()
    } else {
        format!("{}/{}", value.numer(), value.denom())
    }
}

impl Number {
    /// Exact fraction equal to this decimal; `None` for infinities and
    /// exponents beyond `u32`
    pub fn to_fraction(&self) -> Option<Fraction> {
        let (significand, exponent) = self.to_parts()?;
        let significand: BigInt = significand.to_string().parse().ok()?;
        let scale = pow10(u32::try_from(exponent.unsigned_abs()).ok()?);
        if exponent >= 0 {
            Some(Fraction::from_integer(significand * scale))
        } else {
            Some(Fraction::new(significand, scale))
        }
    }

    /// Decimal approximation of a fraction at working precision
    pub fn from_fraction(value: &Fraction) -> Result<Self, NumberError> {
        let numer = Number::from_str(&value.numer().to_string())?;
        let denom = Number::from_str(&value.denom().to_string())?;
        numer.checked_div(&denom)
    }

    /// Plain decimal text with at most `places` fractional digits.
    /// Infinities render as `inf` / `-inf`.
    pub fn to_plain_string(&self, places: u32) -> String {
        match self.to_fraction() {
            Some(f) => to_plain_string(&f, places),
            None if self.is_negative() => "-inf".to_string(),
            None => "inf".to_string(),
        }
    }

    /// Like `to_plain_string`, but a negative value or negative zero that
    /// rounds to zero keeps its sign: `-0`.
    pub fn to_signed_plain_string(&self, places: u32) -> String {
        let text = self.to_plain_string(places);
        if text == "0" && self.is_sign_negative() {
            "-0".to_string()
        } else {
            text
        }
    }
}
