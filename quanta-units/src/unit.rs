//! Unit representation and conversion algebra

use crate::aliases;
use crate::RegistryError;
use num_traits::Zero;
use quanta_core::{Fraction, Number, NumberError};
use std::collections::BTreeSet;

/// Conversion coefficients of a unit relative to its base unit
///
/// For decimal units `to_base(v) = (a + b·v) / (c + d·v)` and
/// `from_base(v) = (a − c·v) / (d·v − b)`. Fractional units only use the
/// exact ratio `b / c`.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionParams {
    pub a: Number,
    pub b: Number,
    pub c: Number,
    pub d: Number,
}

impl ConversionParams {
    pub fn new(a: Number, b: Number, c: Number, d: Number) -> Self {
        ConversionParams { a, b, c, d }
    }

    /// (0 + 1·v) / (1 + 0·v)
    pub fn identity() -> Self {
        Self::factor(Number::one())
    }

    /// Plain scale factor: base = factor · v
    pub fn factor(factor: Number) -> Self {
        Self::new(Number::zero(), factor, Number::one(), Number::zero())
    }

    /// base = (numerator / denominator) · v
    pub fn ratio(numerator: Number, denominator: Number) -> Self {
        Self::new(Number::zero(), numerator, denominator, Number::zero())
    }

    /// True when the affine terms `a` and `d` are both zero
    pub fn is_linear(&self) -> bool {
        self.a.is_zero() && self.d.is_zero()
    }

    pub fn to_base(&self, value: &Number) -> Result<Number, NumberError> {
        let numerator = self.a.add(&term(&self.b, value)?)?;
        let denominator = self.c.add(&term(&self.d, value)?)?;
        numerator.checked_div(&denominator)
    }

    pub fn from_base(&self, value: &Number) -> Result<Number, NumberError> {
        let numerator = self.a.sub(&term(&self.c, value)?)?;
        let denominator = term(&self.d, value)?.sub(&self.b)?;
        numerator.checked_div(&denominator)
    }
}

/// coefficient · value, where a zero coefficient cancels even an infinite value
fn term(coefficient: &Number, value: &Number) -> Result<Number, NumberError> {
    if coefficient.is_zero() {
        Ok(Number::zero())
    } else {
        coefficient.mul(value)
    }
}

/// A quantity value: high precision decimal or exact fraction
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Decimal(Number),
    Exact(Fraction),
}

impl Scalar {
    pub fn to_number(&self) -> Result<Number, NumberError> {
        match self {
            Scalar::Decimal(n) => Ok(n.clone()),
            Scalar::Exact(f) => Number::from_fraction(f),
        }
    }

    /// Exact value, `None` for infinities
    pub fn to_fraction(&self) -> Option<Fraction> {
        match self {
            Scalar::Decimal(n) => n.to_fraction(),
            Scalar::Exact(f) => Some(f.clone()),
        }
    }

    pub fn is_exact(&self) -> bool {
        matches!(self, Scalar::Exact(_))
    }
}

impl From<Number> for Scalar {
    fn from(n: Number) -> Self {
        Scalar::Decimal(n)
    }
}

impl From<Fraction> for Scalar {
    fn from(f: Fraction) -> Self {
        Scalar::Exact(f)
    }
}

/// A unit of measurement, immutable once registered
#[derive(Debug, Clone, PartialEq)]
pub struct Unit {
    /// Unique stable key, e.g. "ft"
    pub id: String,
    /// Display name as ingested, e.g. "foot"
    pub name: String,
    /// Categories this unit converts within, e.g. "length"
    pub quantity_types: BTreeSet<String>,
    /// `None` marks the base unit of its quantity types
    pub base_unit: Option<String>,
    pub params: ConversionParams,
    /// Use exact rational algebra instead of decimal
    pub fractional: bool,
    /// Minor unit used for composite rendering (foot → inch)
    pub split: Option<String>,
    /// Every string that resolves to this unit
    pub aliases: BTreeSet<String>,
}

impl Unit {
    /// A base unit with no quantity types yet; its id is its first alias
    pub fn new(id: &str, name: &str) -> Self {
        Unit {
            id: id.to_string(),
            name: name.to_string(),
            quantity_types: BTreeSet::new(),
            base_unit: None,
            params: ConversionParams::identity(),
            fractional: false,
            split: None,
            aliases: BTreeSet::from([id.to_string()]),
        }
    }

    pub fn with_quantity_type(mut self, quantity_type: &str) -> Self {
        self.quantity_types.insert(quantity_type.to_string());
        self
    }

    pub fn with_base(mut self, base_unit: &str, params: ConversionParams) -> Self {
        self.base_unit = Some(base_unit.to_string());
        self.params = params;
        self
    }

    /// Exact conversion: base = (numerator / denominator) · v
    pub fn with_fraction(self, base_unit: &str, numerator: Number, denominator: Number) -> Self {
        let mut unit = self.with_base(base_unit, ConversionParams::ratio(numerator, denominator));
        unit.fractional = true;
        unit
    }

    pub fn with_alias(mut self, alias: &str) -> Self {
        self.aliases.insert(alias.to_string());
        self
    }

    pub fn with_aliases<'a>(mut self, aliases: impl IntoIterator<Item = &'a str>) -> Self {
        self.aliases.extend(aliases.into_iter().map(str::to_string));
        self
    }

    pub fn with_split(mut self, split: &str) -> Self {
        self.split = Some(split.to_string());
        self
    }

    pub fn is_base(&self) -> bool {
        self.base_unit.is_none()
    }

    /// Name as shown to users (metre → meter, litre → liter)
    pub fn display_name(&self) -> String {
        aliases::localize(&self.name)
    }

    /// Fractional units must be a pure nonzero ratio
    pub(crate) fn validate(&self) -> Result<(), RegistryError> {
        if !self.fractional {
            return Ok(());
        }
        if !self.params.is_linear() {
            return Err(RegistryError::AffineFraction(self.id.clone()));
        }
        if self.params.b.is_zero() || self.params.c.is_zero() || self.exact_ratio(false).is_none() {
            return Err(RegistryError::DegenerateRatio(self.id.clone()));
        }
        Ok(())
    }

    /// b/c (or c/b when inverted) as an exact fraction
    fn exact_ratio(&self, inverted: bool) -> Option<Fraction> {
        let b = self.params.b.to_fraction()?;
        let c = self.params.c.to_fraction()?;
        if b.is_zero() || c.is_zero() {
            return None;
        }
        Some(if inverted { c / b } else { b / c })
    }

    /// Express `value` (in this unit) in the base unit
    pub fn to_base(&self, value: &Scalar) -> Result<Scalar, NumberError> {
        if self.fractional {
            if let (Some(v), Some(ratio)) = (value.to_fraction(), self.exact_ratio(false)) {
                return Ok(Scalar::Exact(v * ratio));
            }
        }
        Ok(Scalar::Decimal(self.params.to_base(&value.to_number()?)?))
    }

    /// Express a base-unit `value` in this unit
    pub fn from_base(&self, value: &Scalar) -> Result<Scalar, NumberError> {
        if self.fractional {
            if let (Some(v), Some(ratio)) = (value.to_fraction(), self.exact_ratio(true)) {
                return Ok(Scalar::Exact(v * ratio));
            }
        }
        Ok(Scalar::Decimal(self.params.from_base(&value.to_number()?)?))
    }

    /// Convert `value` from this unit into `target`
    pub fn convert_to(&self, value: &Scalar, target: &Unit) -> Result<Scalar, NumberError> {
        target.from_base(&self.to_base(value)?)
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigInt;

    fn num(s: &str) -> Number {
        Number::from_str(s).unwrap()
    }

    fn decimal(s: &str) -> Scalar {
        Scalar::Decimal(num(s))
    }

    fn fahrenheit() -> Unit {
        Unit::new("degF", "degree Fahrenheit").with_base(
            "degK",
            ConversionParams::new(num("2298.35"), num("5"), num("9"), num("0")),
        )
    }

    fn inch() -> Unit {
        Unit::new("in", "inch").with_fraction("m", num("254"), num("10000"))
    }

    #[test]
    fn test_identity() {
        let m = Unit::new("m", "metre");
        assert!(m.is_base());
        assert_eq!(m.to_base(&decimal("12.5")).unwrap(), decimal("12.5"));
        assert_eq!(m.from_base(&decimal("12.5")).unwrap(), decimal("12.5"));
    }

    #[test]
    fn test_affine_formula() {
        let f = fahrenheit();
        let kelvin = f.to_base(&decimal("32")).unwrap().to_number().unwrap();
        assert_eq!(kelvin.to_plain_string(6), "273.15");
        let back = f.from_base(&Scalar::Decimal(kelvin)).unwrap().to_number().unwrap();
        assert_eq!(back.to_plain_string(6), "32");
    }

    #[test]
    fn test_rational_formula() {
        // (1 + 0·v) / (0 + 1·v): base = 1 / v
        let params = ConversionParams::new(num("1"), num("0"), num("0"), num("1"));
        assert_eq!(params.to_base(&num("4")).unwrap().to_plain_string(6), "0.25");
        assert_eq!(params.from_base(&num("0.25")).unwrap().to_plain_string(6), "4");
    }

    #[test]
    fn test_fractional_is_exact() {
        let inch = inch();
        let base = inch.to_base(&decimal("1")).unwrap();
        assert_eq!(
            base,
            Scalar::Exact(Fraction::new(BigInt::from(127), BigInt::from(5000)))
        );
        let third = Scalar::Exact(Fraction::new(BigInt::from(1), BigInt::from(3)));
        let round_trip = inch.from_base(&inch.to_base(&third).unwrap()).unwrap();
        assert_eq!(round_trip, third);
    }

    #[test]
    fn test_fractional_infinity_falls_back_to_decimal() {
        let inf = Scalar::Decimal(Number::infinity(false));
        let base = inch().to_base(&inf).unwrap();
        assert!(!base.is_exact());
        assert!(!base.to_number().unwrap().is_finite());
    }

    #[test]
    fn test_infinite_through_factor() {
        let km = Unit::new("km", "kilometre").with_base("m", ConversionParams::factor(num("1000")));
        let base = km.to_base(&Scalar::Decimal(Number::infinity(true))).unwrap();
        assert_eq!(base, Scalar::Decimal(Number::infinity(true)));
    }

    #[test]
    fn test_validate_rejects_affine_fraction() {
        let mut unit = inch();
        unit.params.a = num("1");
        assert_eq!(unit.validate(), Err(RegistryError::AffineFraction("in".to_string())));

        let zero = Unit::new("z", "zero").with_fraction("m", num("0"), num("1"));
        assert_eq!(zero.validate(), Err(RegistryError::DegenerateRatio("z".to_string())));
        assert_eq!(fahrenheit().validate(), Ok(()));
    }

    #[test]
    fn test_display_name_is_localized() {
        assert_eq!(Unit::new("cm", "centimetre").to_string(), "centimeter");
        assert_eq!(Unit::new("L", "litre").display_name(), "liter");
        assert_eq!(Unit::new("ft", "foot").display_name(), "foot");
    }

    #[test]
    fn test_convert_to() {
        let foot = Unit::new("ft", "foot").with_fraction("m", num("3048"), num("10000"));
        let inches = foot.convert_to(&decimal("2"), &inch()).unwrap();
        assert_eq!(inches, Scalar::Exact(Fraction::from_integer(BigInt::from(24))));
    }
}
