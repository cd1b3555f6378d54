//! Arbitrary precision numbers using dashu
//!
//! Uses dashu-float (DBig) for arbitrary precision decimal arithmetic at a
//! fixed working precision. On top of DBig a `Number` can also be a signed
//! infinity, so `inf` typed into a query behaves like an overflow sentinel
//! instead of crashing the evaluation.
//!
//! Operations that have no defined result (`inf - inf`, `0 * inf`, division
//! by zero) return a `NumberError`. Nothing in here panics on user input.
//!
//! Finite values stay within `10^±MAX_EXPONENT`: anything larger saturates
//! to infinity and anything smaller flushes to zero. A zero remembers the
//! sign it was produced with (`0 / -5` is `-0`), which only shows through
//! `is_sign_negative` and `to_signed_plain_string`.

use dashu_float::ops::{Abs, SquareRoot};
use dashu_float::DBig;
use dashu_int::IBig;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use thiserror::Error;

/// Error type for number operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NumberError {
    #[error("Invalid number format: {0}")]
    ParseError(String),

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Domain error: {0}")]
    DomainError(String),

    #[error("Undefined result: {0}")]
    Undefined(String),
}

/// Working precision for calculations (decimal digits)
pub const DEFAULT_PRECISION: usize = 50;

/// Taylor series terms for sin/cos after range reduction to [-π, π]
const TRIG_ITERATIONS: i64 = 60;

/// Decimal orders of magnitude a finite value may span either way
pub const MAX_EXPONENT: isize = 1_000;

/// Largest |x| handed to exp() before saturating to infinity / zero.
/// e^2400 is already far beyond `10^MAX_EXPONENT`.
const EXP_LIMIT: i64 = 2_400;

const PI_STR: &str = "3.14159265358979323846264338327950288419716939937510582097494459230781640628620899862803482534211706798214808651328230664709384460955058223172535940812848111745028410270193852110555964462294895493038196442881097566593344612847564823378678316527120190914564856692346034861045432664821339360726024914127372458700660631558817488152092096282925409171536436789259036001133053054882046652138414695194151160943305727036575959195309218611738193261179310511854807446237996274956735188575272489122793818301194912";

/// Arbitrary precision decimal number
///
/// Built on dashu-float's DBig. All operations return Results or new
/// Numbers - never panic.
#[derive(Debug, Clone)]
pub struct Number {
    inner: Repr,
    negative_zero: bool,
}

#[derive(Debug, Clone)]
enum Repr {
    Finite(DBig),
    Infinite { negative: bool },
}

impl Number {
    // ========== Construction ==========

    /// Ensure a DBig has adequate precision for calculations
    fn with_work_precision(val: DBig) -> DBig {
        val.with_precision(DEFAULT_PRECISION).value()
    }

    fn finite(val: DBig) -> Self {
        let val = Self::with_work_precision(val);
        if val == DBig::ZERO {
            return Self { inner: Repr::Finite(val), negative_zero: false };
        }
        let negative = val < DBig::ZERO;
        let magnitude = val.repr().exponent().saturating_add(val.repr().digits() as isize);
        if magnitude > MAX_EXPONENT {
            return Self::infinity(negative);
        }
        if magnitude < -MAX_EXPONENT {
            return Self::zero().with_zero_sign(negative);
        }
        Self { inner: Repr::Finite(val), negative_zero: false }
    }

    /// Mark a zero result as negative; non-zero values keep their own sign
    fn with_zero_sign(mut self, negative: bool) -> Self {
        self.negative_zero = negative && self.is_zero();
        self
    }

    /// Create from string representation
    /// Supports: "123", "3.14", ".5", "1/3", "1.5e10", "-42", "inf"
    pub fn from_str(s: &str) -> Result<Self, NumberError> {
        let s = s.trim();
        let lower = s.to_ascii_lowercase();

        match lower.trim_start_matches('+') {
            "inf" | "infinity" => return Ok(Self::infinity(false)),
            "-inf" | "-infinity" => return Ok(Self::infinity(true)),
            _ => {}
        }

        // Rational format "a/b"
        if let Some((num_str, den_str)) = s.split_once('/') {
            let num = Self::finite(parse_plain(num_str)?);
            let den = Self::finite(parse_plain(den_str)?);
            return num.checked_div(&den);
        }

        // Scientific notation: mantissa * 10^exp, kept exact
        if let Some(pos) = lower.find('e') {
            let mantissa = parse_plain(&s[..pos])?;
            let exp_str = &lower[pos + 1..];
            let exp = match exp_str.parse::<isize>() {
                Ok(exp) => Some(exp),
                Err(_) if is_integer_literal(exp_str) => None,
                Err(_) => return Err(NumberError::ParseError(s.to_string())),
            };
            if mantissa == DBig::ZERO {
                return Ok(Self::zero());
            }
            let negative = mantissa < DBig::ZERO;
            let digits = mantissa.repr().digits() as isize;
            let (significand, exponent) = mantissa.into_repr().into_parts();
            let total = exp.and_then(|exp| exponent.checked_add(exp));
            let magnitude = total.map(|total| total.saturating_add(digits));
            return Ok(match (total, magnitude) {
                (Some(total), Some(m)) if m.unsigned_abs() <= MAX_EXPONENT.unsigned_abs() => {
                    Self::finite(DBig::from_parts(significand, total))
                }
                (_, Some(m)) if m < 0 => Self::zero().with_zero_sign(negative),
                (None, _) if exp_str.starts_with('-') => Self::zero().with_zero_sign(negative),
                _ => Self::infinity(negative),
            });
        }

        Ok(Self::finite(parse_plain(s)?))
    }

    /// Create from i64 with working precision
    pub fn from_i64(n: i64) -> Self {
        Self::finite(DBig::from(n))
    }

    /// Exact value `significand * 10^exponent`
    pub fn from_parts(significand: IBig, exponent: isize) -> Self {
        Self::finite(DBig::from_parts(significand, exponent))
    }

    /// Create from f64. NaN has no decimal counterpart.
    pub fn from_f64(f: f64) -> Result<Self, NumberError> {
        if f.is_nan() {
            return Err(NumberError::Undefined("not a number".to_string()));
        }
        if f.is_infinite() {
            return Ok(Self::infinity(f < 0.0));
        }
        // `{:e}` keeps every significant digit f64 carries
        Self::from_str(&format!("{:e}", f))
    }

    pub fn zero() -> Self {
        Self::from_i64(0)
    }

    pub fn one() -> Self {
        Self::from_i64(1)
    }

    pub fn infinity(negative: bool) -> Self {
        Self { inner: Repr::Infinite { negative }, negative_zero: false }
    }

    // ========== Predicates ==========

    /// Check if zero
    pub fn is_zero(&self) -> bool {
        matches!(&self.inner, Repr::Finite(v) if *v == DBig::ZERO)
    }

    /// Check if negative
    pub fn is_negative(&self) -> bool {
        match &self.inner {
            Repr::Finite(v) => *v < DBig::ZERO,
            Repr::Infinite { negative } => *negative,
        }
    }

    /// Like `is_negative`, but also true for a negative zero
    pub fn is_sign_negative(&self) -> bool {
        self.is_negative() || self.negative_zero
    }

    pub fn is_finite(&self) -> bool {
        matches!(self.inner, Repr::Finite(_))
    }

    /// Check if value is an integer
    pub fn is_integer(&self) -> bool {
        match &self.inner {
            Repr::Finite(v) => *v == v.clone().floor(),
            Repr::Infinite { .. } => false,
        }
    }

    // ========== Basic Arithmetic ==========

    /// Addition
    pub fn add(&self, other: &Self) -> Result<Self, NumberError> {
        match (&self.inner, &other.inner) {
            (Repr::Finite(a), Repr::Finite(b)) => Ok(Self::finite(a + b)
                .with_zero_sign(self.is_sign_negative() && other.is_sign_negative())),
            (Repr::Infinite { negative: x }, Repr::Infinite { negative: y }) if x != y => {
                Err(NumberError::Undefined("inf - inf".to_string()))
            }
            (Repr::Infinite { negative }, _) | (_, Repr::Infinite { negative }) => {
                Ok(Self::infinity(*negative))
            }
        }
    }

    /// Subtraction
    pub fn sub(&self, other: &Self) -> Result<Self, NumberError> {
        self.add(&other.neg())
    }

    /// Multiplication
    pub fn mul(&self, other: &Self) -> Result<Self, NumberError> {
        match (&self.inner, &other.inner) {
            (Repr::Finite(a), Repr::Finite(b)) => Ok(Self::finite(a * b)
                .with_zero_sign(self.is_sign_negative() != other.is_sign_negative())),
            _ if self.is_zero() || other.is_zero() => {
                Err(NumberError::Undefined("0 * inf".to_string()))
            }
            _ => Ok(Self::infinity(self.is_negative() != other.is_negative())),
        }
    }

    /// Safe division (returns Result, never panics)
    pub fn checked_div(&self, other: &Self) -> Result<Self, NumberError> {
        if other.is_zero() {
            return Err(NumberError::DivisionByZero);
        }
        let negative = self.is_sign_negative() != other.is_sign_negative();
        match (&self.inner, &other.inner) {
            (Repr::Finite(a), Repr::Finite(b)) => Ok(Self::finite(a / b).with_zero_sign(negative)),
            (Repr::Finite(_), Repr::Infinite { .. }) => Ok(Self::zero().with_zero_sign(negative)),
            (Repr::Infinite { .. }, Repr::Infinite { .. }) => {
                Err(NumberError::Undefined("inf / inf".to_string()))
            }
            (Repr::Infinite { negative }, Repr::Finite(_)) => {
                Ok(Self::infinity(*negative != other.is_negative()))
            }
        }
    }

    /// Remainder with the sign of the dividend: `a - b * trunc(a / b)`
    pub fn rem(&self, other: &Self) -> Result<Self, NumberError> {
        if !self.is_finite() || !other.is_finite() {
            return Err(NumberError::Undefined("remainder of inf".to_string()));
        }
        let quotient = self.checked_div(other)?.trunc();
        self.sub(&other.mul(&quotient)?)
    }

    /// Division truncated toward zero
    pub fn div_trunc(&self, other: &Self) -> Result<Self, NumberError> {
        Ok(self.checked_div(other)?.trunc())
    }

    /// Negation
    pub fn neg(&self) -> Self {
        match &self.inner {
            Repr::Finite(v) => Self::finite(-v.clone()).with_zero_sign(!self.is_sign_negative()),
            Repr::Infinite { negative } => Self::infinity(!negative),
        }
    }

    /// Integer power by repeated squaring (exact up to working precision).
    ///
    /// Results beyond `10^±MAX_EXPONENT` saturate without being computed.
    pub fn powi(&self, exp: i64) -> Result<Self, NumberError> {
        if exp == 0 {
            return Ok(Self::one());
        }
        let odd_negative = self.is_negative() && exp % 2 != 0;
        let base = match &self.inner {
            Repr::Finite(v) => v.clone(),
            Repr::Infinite { .. } => {
                if exp < 0 {
                    return Ok(Self::zero());
                }
                return Ok(Self::infinity(odd_negative));
            }
        };
        if self.is_zero() {
            if exp < 0 {
                return Err(NumberError::DivisionByZero);
            }
            return Ok(Self::zero());
        }

        let estimate = exp as f64 * self.log10_abs();
        if estimate > (MAX_EXPONENT + 1) as f64 {
            return Ok(Self::infinity(odd_negative));
        }
        if estimate < -((MAX_EXPONENT + 1) as f64) {
            return Ok(Self::zero().with_zero_sign(odd_negative));
        }

        let mut result = Self::with_work_precision(DBig::ONE);
        let mut square = base;
        let mut remaining = exp.unsigned_abs();
        while remaining > 0 {
            if remaining & 1 == 1 {
                result = &result * &square;
            }
            remaining >>= 1;
            if remaining > 0 {
                square = &square * &square;
            }
        }

        if exp < 0 {
            Self::one().checked_div(&Self::finite(result))
        } else {
            Ok(Self::finite(result))
        }
    }

    /// Real-valued power: x^y = exp(y * ln(x)) unless y is an integer
    pub fn pow(&self, exp: &Self) -> Result<Self, NumberError> {
        if exp.is_zero() {
            return Ok(Self::one());
        }
        if let Some(e) = exp.to_i64() {
            return self.powi(e);
        }
        if !exp.is_finite() || !self.is_finite() {
            return Err(NumberError::Undefined("power with infinite operand".to_string()));
        }
        if self.is_zero() {
            if exp.is_negative() {
                return Err(NumberError::DivisionByZero);
            }
            return Ok(Self::zero());
        }
        if self.is_negative() {
            return Err(NumberError::DomainError(
                "negative base with non-integer exponent".to_string(),
            ));
        }
        self.ln()?.mul(exp)?.exp()
    }

    // ========== Transcendental Functions ==========

    /// Square root
    pub fn sqrt(&self) -> Result<Self, NumberError> {
        if self.is_negative() {
            return Err(NumberError::DomainError(
                "square root of negative number".to_string(),
            ));
        }
        match &self.inner {
            _ if self.is_zero() => Ok(Self::zero()),
            Repr::Finite(v) => Ok(Self::finite(Self::with_work_precision(v.clone()).sqrt())),
            Repr::Infinite { .. } => Ok(self.clone()),
        }
    }

    /// Natural logarithm
    pub fn ln(&self) -> Result<Self, NumberError> {
        if self.is_negative() || self.is_zero() {
            return Err(NumberError::DomainError(
                "logarithm of non-positive number".to_string(),
            ));
        }
        match &self.inner {
            Repr::Finite(v) => Ok(Self::finite(Self::with_work_precision(v.clone()).ln())),
            Repr::Infinite { .. } => Ok(self.clone()),
        }
    }

    /// Base-10 logarithm
    pub fn log10(&self) -> Result<Self, NumberError> {
        self.ln()?.checked_div(&Self::from_i64(10).ln()?)
    }

    /// Exponential function (e^x)
    pub fn exp(&self) -> Result<Self, NumberError> {
        let v = match &self.inner {
            Repr::Finite(v) => v,
            Repr::Infinite { negative: true } => return Ok(Self::zero()),
            Repr::Infinite { negative: false } => return Ok(self.clone()),
        };
        let limit = DBig::from(EXP_LIMIT);
        if *v > limit {
            return Ok(Self::infinity(false));
        }
        if *v < -limit {
            return Ok(Self::zero());
        }
        Ok(Self::finite(Self::with_work_precision(v.clone()).exp()))
    }

    /// Sine function (Taylor series after range reduction)
    pub fn sin(&self) -> Result<Self, NumberError> {
        let x = self.reduced_angle()?;
        let x_squared = &x * &x;

        let mut sum = x.clone();
        let mut term = x;
        for k in 1..TRIG_ITERATIONS {
            let denom = DBig::from((2 * k) * (2 * k + 1));
            term = -&term * &x_squared / denom;
            sum = &sum + &term;
        }

        Ok(Self::finite(sum))
    }

    /// Cosine function (Taylor series after range reduction)
    pub fn cos(&self) -> Result<Self, NumberError> {
        let x = self.reduced_angle()?;
        let x_squared = &x * &x;

        let one = Self::with_work_precision(DBig::ONE);
        let mut sum = one.clone();
        let mut term = one;
        for k in 1..TRIG_ITERATIONS {
            let denom = DBig::from((2 * k - 1) * (2 * k));
            term = -&term * &x_squared / denom;
            sum = &sum + &term;
        }

        Ok(Self::finite(sum))
    }

    /// Tangent function (sin/cos)
    pub fn tan(&self) -> Result<Self, NumberError> {
        let cos_x = self.cos()?;
        if cos_x.is_zero() {
            return Err(NumberError::DomainError(
                "tan undefined at odd multiples of π/2".to_string(),
            ));
        }
        self.sin()?.checked_div(&cos_x)
    }

    /// Map an angle into [-π, π] so the Taylor series converges quickly
    fn reduced_angle(&self) -> Result<DBig, NumberError> {
        let Repr::Finite(x) = &self.inner else {
            return Err(NumberError::DomainError("trigonometry of inf".to_string()));
        };
        let pi = pi_dbig();
        let two_pi = &pi + &pi;
        let turns = (x / &two_pi).floor();
        let mut reduced = x - &(&turns * &two_pi);
        if reduced > pi {
            reduced = &reduced - &two_pi;
        }
        Ok(Self::with_work_precision(reduced))
    }

    /// Evaluate an f64 routine for functions without a decimal implementation.
    /// A finite argument must give a finite result: overflow and poles are
    /// errors, not infinities.
    pub fn map_f64(&self, f: impl Fn(f64) -> f64) -> Result<Self, NumberError> {
        let x = self
            .to_f64()
            .ok_or_else(|| NumberError::DomainError("value out of range".to_string()))?;
        let y = f(x);
        if y.is_nan() {
            return Err(NumberError::DomainError("result is not a number".to_string()));
        }
        if y.is_infinite() && x.is_finite() {
            return Err(NumberError::DomainError("result out of range".to_string()));
        }
        Self::from_f64(y)
    }

    // ========== Mathematical Constants ==========

    /// Pi - from high-precision string constant
    pub fn pi() -> Self {
        Self::finite(pi_dbig())
    }

    /// Euler's number e
    pub fn e() -> Self {
        Self::one().exp().unwrap_or_else(|_| Self::from_i64(2))
    }

    // ========== Other Operations ==========

    /// Absolute value
    pub fn abs(&self) -> Self {
        match &self.inner {
            Repr::Finite(v) => Self::finite(Abs::abs(v.clone())),
            Repr::Infinite { .. } => Self::infinity(false),
        }
    }

    /// Floor - largest integer <= x
    pub fn floor(&self) -> Self {
        match &self.inner {
            Repr::Finite(v) => Self::finite(v.clone().floor()),
            Repr::Infinite { .. } => self.clone(),
        }
    }

    /// Ceiling - smallest integer >= x
    pub fn ceil(&self) -> Self {
        match &self.inner {
            Repr::Finite(v) => Self::finite(v.clone().ceil()),
            Repr::Infinite { .. } => self.clone(),
        }
    }

    /// Round toward zero
    pub fn trunc(&self) -> Self {
        if self.is_negative() {
            self.ceil()
        } else {
            self.floor()
        }
    }

    /// Round to the nearest integer, ties to even
    pub fn round_half_even(&self) -> Self {
        if !self.is_finite() {
            return self.clone();
        }
        let floor = self.floor();
        let half = Self::from_str("0.5").unwrap_or_else(|_| Self::zero());
        let diff = match self.sub(&floor) {
            Ok(d) => d,
            Err(_) => return floor,
        };
        let up = floor.add(&Self::one()).unwrap_or_else(|_| floor.clone());
        match diff.cmp(&half) {
            Ordering::Less => floor,
            Ordering::Greater => up,
            Ordering::Equal => {
                let floor_is_even = floor
                    .checked_div(&Self::from_i64(2))
                    .map(|h| h.is_integer())
                    .unwrap_or(true);
                if floor_is_even {
                    floor
                } else {
                    up
                }
            }
        }
    }

    /// Decimal significand and exponent, `None` for infinities
    pub fn to_parts(&self) -> Option<(IBig, isize)> {
        match &self.inner {
            Repr::Finite(v) => Some(v.clone().into_repr().into_parts()),
            Repr::Infinite { .. } => None,
        }
    }

    /// Try to convert to i64
    pub fn to_i64(&self) -> Option<i64> {
        if !self.is_integer() {
            return None;
        }

        let (significand, exponent) = self.to_parts()?;
        let sig_i64: i64 = significand.try_into().ok()?;

        if exponent == 0 {
            Some(sig_i64)
        } else if exponent > 0 && exponent <= 18 {
            sig_i64.checked_mul(10_i64.checked_pow(exponent as u32)?)
        } else if exponent < 0 && exponent >= -18 {
            let divisor = 10_i64.checked_pow((-exponent) as u32)?;
            if sig_i64 % divisor == 0 {
                Some(sig_i64 / divisor)
            } else {
                None
            }
        } else {
            None
        }
    }

    /// Convert to f64 (may lose precision)
    pub fn to_f64(&self) -> Option<f64> {
        match &self.inner {
            Repr::Finite(_) => {
                let (significand, exponent) = self.to_parts()?;
                let f: f64 = format!("{}e{}", significand, exponent).parse().ok()?;
                if f.is_finite() {
                    Some(f)
                } else {
                    None
                }
            }
            Repr::Infinite { negative: true } => Some(f64::NEG_INFINITY),
            Repr::Infinite { negative: false } => Some(f64::INFINITY),
        }
    }

    /// log10(|x|) as f64, valid far beyond the f64 range.
    /// Zero gives -inf, infinities give +inf.
    pub fn log10_abs(&self) -> f64 {
        let Some((significand, exponent)) = self.to_parts() else {
            return f64::INFINITY;
        };
        if self.is_zero() {
            return f64::NEG_INFINITY;
        }
        let digits = significand.to_string();
        let digits = digits.trim_start_matches('-');
        let head_len = digits.len().min(17);
        let head: f64 = digits[..head_len].parse().unwrap_or(1.0);
        head.log10() + (digits.len() - head_len) as f64 + exponent as f64
    }
}

fn pi_dbig() -> DBig {
    let end_pos = (DEFAULT_PRECISION + 2).min(PI_STR.len());
    parse_plain(&PI_STR[..end_pos])
        .map(Number::with_work_precision)
        .unwrap_or_else(|_| DBig::from(3))
}

/// Optionally signed run of ASCII digits
fn is_integer_literal(s: &str) -> bool {
    let digits = s.strip_prefix(['+', '-']).unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn parse_plain(s: &str) -> Result<DBig, NumberError> {
    let s = s.trim();
    let (sign, body) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s.strip_prefix('+').unwrap_or(s)),
    };
    let body = body.strip_suffix('.').unwrap_or(body);
    let canonical = if body.starts_with('.') {
        format!("{}0{}", sign, body)
    } else {
        format!("{}{}", sign, body)
    };
    if body.is_empty() || !body.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return Err(NumberError::ParseError(s.to_string()));
    }
    canonical
        .parse()
        .map_err(|_| NumberError::ParseError(s.to_string()))
}

// ========== Trait Implementations ==========

impl std::fmt::Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_plain_string(20))
    }
}

impl Serialize for Number {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Number {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Number {}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Number {
    fn cmp(&self, other: &Self) -> Ordering {
        match (&self.inner, &other.inner) {
            (Repr::Finite(a), Repr::Finite(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
            (Repr::Infinite { negative: x }, Repr::Infinite { negative: y }) => y.cmp(x),
            (Repr::Infinite { negative }, _) => {
                if *negative {
                    Ordering::Less
                } else {
                    Ordering::Greater
                }
            }
            (_, Repr::Infinite { negative }) => {
                if *negative {
                    Ordering::Greater
                } else {
                    Ordering::Less
                }
            }
        }
    }
}
