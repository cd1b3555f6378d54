//! Quanta Core - Fundamental types
//!
//! This crate provides the core types used throughout Quanta:
//! - `Number`: 50-digit decimal numbers with signed infinities
//! - `Fraction`: exact rationals for fractional units
//! - `QuantaError`: the error taxonomy every layer degrades from

mod error;
mod fraction;
mod number;

pub use error::{QuantaError, Result};
pub use fraction::{format_fraction, pow10, round_half_even, to_plain_string, Fraction};
pub use number::{Number, NumberError, DEFAULT_PRECISION, MAX_EXPONENT};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{Fraction, Number, NumberError, QuantaError};
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(s: &str) -> Number {
        Number::from_str(s).unwrap()
    }

    mod number_tests {
        use super::*;
        use dashu_int::IBig;

        #[test]
        fn test_from_i64() {
            let n = Number::from_i64(42);
            assert_eq!(n.to_i64(), Some(42));
        }

        #[test]
        fn test_from_str_forms() {
            assert_eq!(num("123").to_i64(), Some(123));
            assert_eq!(num("1.5e2").to_i64(), Some(150));
            assert_eq!(num(".5").to_plain_string(6), "0.5");
            assert_eq!(num("5.").to_i64(), Some(5));
            assert_eq!(num("-.25").to_plain_string(6), "-0.25");
            assert!(!num("1/3").is_integer());
            assert!(Number::from_str("abc").is_err());
            assert!(Number::from_str("").is_err());
        }

        #[test]
        fn test_scientific_keeps_exact_digits() {
            let avogadro = num("602214076e15");
            assert_eq!(avogadro, num("602214076000000000000000"));
        }

        #[test]
        fn test_infinity() {
            let inf = num("inf");
            assert!(!inf.is_finite());
            assert!(num("-infinity").is_negative());
            assert_eq!(inf.add(&Number::from_i64(1)).unwrap(), inf);
            assert!(inf.sub(&inf).is_err());
            assert!(inf.mul(&Number::zero()).is_err());
            assert_eq!(Number::from_i64(5).checked_div(&inf).unwrap(), Number::zero());
            assert_eq!(inf.to_plain_string(6), "inf");
            assert_eq!(inf.neg().to_plain_string(6), "-inf");
        }

        #[test]
        fn test_division_by_zero() {
            let result = Number::from_i64(1).checked_div(&Number::zero());
            assert_eq!(result, Err(NumberError::DivisionByZero));
        }

        #[test]
        fn test_rem_and_div_trunc() {
            let a = Number::from_i64(-7);
            let b = Number::from_i64(2);
            assert_eq!(a.rem(&b).unwrap().to_i64(), Some(-1));
            assert_eq!(a.div_trunc(&b).unwrap().to_i64(), Some(-3));
            assert_eq!(num("7.5").rem(&b).unwrap().to_plain_string(6), "1.5");
        }

        #[test]
        fn test_pow() {
            let two = Number::from_i64(2);
            assert_eq!(two.powi(10).unwrap().to_i64(), Some(1024));
            assert_eq!(two.powi(-2).unwrap().to_plain_string(6), "0.25");
            assert_eq!(num("4").pow(&num("0.5")).unwrap().to_plain_string(6), "2");
            assert!(num("-8").pow(&num("0.5")).is_err());
        }

        #[test]
        fn test_transcendentals() {
            assert_eq!(Number::pi().to_plain_string(6), "3.141593");
            assert_eq!(Number::e().to_plain_string(6), "2.718282");
            assert_eq!(Number::pi().sin().unwrap().to_plain_string(6), "0");
            assert_eq!(Number::pi().cos().unwrap().to_plain_string(6), "-1");
            assert_eq!(num("100").log10().unwrap().to_plain_string(6), "2");
            assert_eq!(num("2").sqrt().unwrap().to_plain_string(6), "1.414214");
            assert!(num("-1").ln().is_err());
        }

        #[test]
        fn test_sin_large_angle() {
            // 1000 rad reduced modulo 2π
            let s = num("1000").sin().unwrap().to_plain_string(6);
            assert_eq!(s, "0.82688");
        }

        #[test]
        fn test_round_half_even() {
            assert_eq!(num("2.5").round_half_even().to_i64(), Some(2));
            assert_eq!(num("3.5").round_half_even().to_i64(), Some(4));
            assert_eq!(num("-2.5").round_half_even().to_i64(), Some(-2));
            assert_eq!(num("2.6").round_half_even().to_i64(), Some(3));
        }

        #[test]
        fn test_f64_bridge() {
            let n = Number::from_f64(0.125).unwrap();
            assert_eq!(n.to_plain_string(6), "0.125");
            assert_eq!(num("1.5").to_f64(), Some(1.5));
            assert!(Number::from_f64(f64::NAN).is_err());
        }

        #[test]
        fn test_log10_abs() {
            assert_eq!(Number::zero().log10_abs(), f64::NEG_INFINITY);
            assert_eq!(num("inf").log10_abs(), f64::INFINITY);
            assert!((num("1000").log10_abs() - 3.0).abs() < 1e-9);
            assert!((num("-0.01").log10_abs() + 2.0).abs() < 1e-9);
            assert!((num("1e400").log10_abs() - 400.0).abs() < 1e-9);
        }

        #[test]
        fn test_ordering() {
            assert!(num("-inf") < num("-1e100"));
            assert!(num("1e100") < num("inf"));
            assert!(num("1.5") > num("1.25"));
        }

        #[test]
        fn test_huge_literals_saturate() {
            assert!(num("1e999").is_finite());
            assert_eq!(num("1e1000"), num("inf"));
            assert_eq!(num("1e4294967297"), num("inf"));
            assert_eq!(num("-1e50000000"), num("-inf"));
            assert_eq!(num("1e99999999999999999999999"), num("inf"));
            assert!(num("1e-5000").is_zero());
            assert!(num("-1e-99999999999999999999999").is_zero());
            assert!(num("0.00001e1001").is_finite());
        }

        #[test]
        fn test_powi_saturates() {
            let ten = num("10");
            assert_eq!(ten.powi(i64::MAX).unwrap(), num("inf"));
            assert_eq!(num("-10").powi(9_000_000_000_000_000_001).unwrap(), num("-inf"));
            assert_eq!(num("-10").powi(9_000_000_000_000_000_000).unwrap(), num("inf"));
            assert!(ten.powi(-i64::MAX).unwrap().is_zero());
            assert!(num("0.5").powi(i64::MAX).unwrap().is_zero());
            assert_eq!(num("1").powi(i64::MAX).unwrap(), num("1"));
            assert_eq!(num("-1").powi(i64::MAX).unwrap(), num("-1"));
            assert_eq!(Number::zero().powi(-3), Err(NumberError::DivisionByZero));
            assert_eq!(ten.powi(20).unwrap(), num("1e20"));
        }

        #[test]
        fn test_exp_saturates() {
            assert_eq!(num("1000000").exp().unwrap(), num("inf"));
            assert!(num("-1000000").exp().unwrap().is_zero());
            assert_eq!(num("10").pow(&num("1e9")).unwrap(), num("inf"));
        }

        #[test]
        fn test_far_exponent_has_no_fraction() {
            let huge = Number::from_parts(IBig::ONE, isize::MAX / 2);
            assert!(!huge.is_finite());
            assert_eq!(huge.to_fraction(), None);
            assert_eq!(huge.to_plain_string(6), "inf");
        }

        #[test]
        fn test_signed_zero() {
            let zero = Number::zero();
            let quotient = zero.checked_div(&num("-5")).unwrap();
            assert!(quotient.is_zero());
            assert!(quotient.is_sign_negative());
            assert!(!quotient.is_negative());
            assert_eq!(quotient, zero);
            assert_eq!(quotient.to_plain_string(6), "0");
            assert_eq!(quotient.to_signed_plain_string(6), "-0");

            assert!(zero.mul(&num("-3")).unwrap().is_sign_negative());
            assert!(zero.neg().is_sign_negative());
            assert!(!zero.sub(&zero).unwrap().is_sign_negative());
            assert!(!quotient.neg().is_sign_negative());
            assert_eq!(zero.to_signed_plain_string(6), "0");
            assert_eq!(num("-0.0000001").to_signed_plain_string(6), "-0");
            assert_eq!(num("-0.5").to_signed_plain_string(6), "-0.5");
        }
    }

    mod fraction_tests {
        use super::*;
        use num_bigint::BigInt;

        fn frac(n: i64, d: i64) -> Fraction {
            Fraction::new(BigInt::from(n), BigInt::from(d))
        }

        #[test]
        fn test_to_fraction_is_exact() {
            assert_eq!(num("0.125").to_fraction(), Some(frac(1, 8)));
            assert_eq!(num("1500").to_fraction(), Some(frac(1500, 1)));
            assert_eq!(num("inf").to_fraction(), None);
        }

        #[test]
        fn test_from_fraction() {
            let third = Number::from_fraction(&frac(1, 3)).unwrap();
            assert_eq!(third.to_plain_string(6), "0.333333");
        }

        #[test]
        fn test_plain_string_quantizes_and_strips() {
            assert_eq!(to_plain_string(&frac(2, 3), 6), "0.666667");
            assert_eq!(to_plain_string(&frac(10, 1), 6), "10");
            assert_eq!(to_plain_string(&frac(-1, 8), 6), "-0.125");
            assert_eq!(to_plain_string(&frac(1, 10_000_000), 6), "0");
            assert_eq!(to_plain_string(&frac(-1, 10_000_000), 6), "0");
            // Ties go to the even digit
            assert_eq!(to_plain_string(&frac(5, 10_000_000), 6), "0");
            assert_eq!(to_plain_string(&frac(15, 10_000_000), 6), "0.000002");
        }

        #[test]
        fn test_round_half_even_fraction() {
            assert_eq!(round_half_even(&frac(5, 2)), BigInt::from(2));
            assert_eq!(round_half_even(&frac(7, 2)), BigInt::from(4));
            assert_eq!(round_half_even(&frac(-5, 2)), BigInt::from(-2));
        }

        #[test]
        fn test_format_fraction() {
            assert_eq!(format_fraction(&frac(8, 2)), "4");
            assert_eq!(format_fraction(&frac(3, 6)), "1/2");
        }
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn plain_string_never_ends_with_point(n in -1_000_000i64..1_000_000, d in 1i64..10_000) {
                let f = Fraction::new(n.into(), d.into());
                let s = to_plain_string(&f, 6);
                prop_assert!(!s.ends_with('.'));
                prop_assert!(s != "-0");
            }

            #[test]
            fn fraction_bridge_round_trips(n in -1_000_000i64..1_000_000, scale in 0u32..8) {
                let text = format!("{}e-{}", n, scale);
                let number = Number::from_str(&text).unwrap();
                let back = Number::from_fraction(&number.to_fraction().unwrap()).unwrap();
                prop_assert_eq!(back, number);
            }
        }
    }
}
