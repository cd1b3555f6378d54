//! Whitelisted math functions
//!
//! The only callables an expression can reach. Functions with a decimal
//! implementation on `Number` use it; inverse trigonometric, hyperbolic
//! and special functions go through f64 (std and libm).

use crate::EvalError;
use quanta_core::{Number, NumberError};
use std::collections::HashMap;
use std::sync::LazyLock;

/// Function metadata
#[derive(Debug, Clone, Copy)]
pub struct FunctionMeta {
    pub name: &'static str,
    pub category: &'static str,
    pub min_args: usize,
    pub max_args: usize,
}

type Implementation = fn(&[Number]) -> Result<Number, NumberError>;

struct FunctionDef {
    meta: FunctionMeta,
    call: Implementation,
}

/// Largest argument accepted by factorial()
const FACTORIAL_LIMIT: i64 = 1000;

static FUNCTIONS: LazyLock<HashMap<&'static str, FunctionDef>> = LazyLock::new(|| {
    let mut m = HashMap::new();
    let mut add = |name: &'static str, category: &'static str, args: (usize, usize), call: Implementation| {
        let meta = FunctionMeta { name, category, min_args: args.0, max_args: args.1 };
        m.insert(name, FunctionDef { meta, call });
    };

    // Number theoretic and representation
    add("abs", "number", (1, 1), |a| Ok(a[0].abs()));
    add("fabs", "number", (1, 1), |a| Ok(a[0].abs()));
    add("ceil", "number", (1, 1), |a| Ok(a[0].ceil()));
    add("floor", "number", (1, 1), |a| Ok(a[0].floor()));
    add("trunc", "number", (1, 1), |a| Ok(a[0].trunc()));
    add("round", "number", (1, 2), round);
    add("copysign", "number", (2, 2), |a| {
        let magnitude = a[0].abs();
        Ok(if a[1].is_negative() { magnitude.neg() } else { magnitude })
    });
    add("factorial", "number", (1, 1), factorial);
    add("fmod", "number", (2, 2), |a| a[0].rem(&a[1]));
    add("ldexp", "number", (2, 2), |a| {
        let exp = integer_arg(&a[1], "ldexp")?;
        a[0].mul(&Number::from_i64(2).powi(exp)?)
    });

    // Power and logarithmic
    add("exp", "power", (1, 1), |a| a[0].exp());
    add("expm1", "power", (1, 1), |a| a[0].exp()?.sub(&Number::one()));
    add("log", "power", (1, 2), |a| match a.get(1) {
        Some(base) => a[0].ln()?.checked_div(&base.ln()?),
        None => a[0].ln(),
    });
    add("log1p", "power", (1, 1), |a| a[0].add(&Number::one())?.ln());
    add("log10", "power", (1, 1), |a| a[0].log10());
    add("log2", "power", (1, 1), |a| a[0].ln()?.checked_div(&Number::from_i64(2).ln()?));
    add("pow", "power", (2, 2), |a| a[0].pow(&a[1]));
    add("sqrt", "power", (1, 1), |a| a[0].sqrt());

    // Trigonometric
    add("sin", "trigonometric", (1, 1), |a| a[0].sin());
    add("cos", "trigonometric", (1, 1), |a| a[0].cos());
    add("tan", "trigonometric", (1, 1), |a| a[0].tan());
    add("asin", "trigonometric", (1, 1), |a| a[0].map_f64(f64::asin));
    add("acos", "trigonometric", (1, 1), |a| a[0].map_f64(f64::acos));
    add("atan", "trigonometric", (1, 1), |a| a[0].map_f64(f64::atan));
    add("atan2", "trigonometric", (2, 2), |a| {
        let x = to_f64(&a[1])?;
        a[0].map_f64(|y| y.atan2(x))
    });
    add("hypot", "trigonometric", (2, 2), |a| a[0].mul(&a[0])?.add(&a[1].mul(&a[1])?)?.sqrt());

    // Angular conversion
    add("degrees", "angular", (1, 1), |a| {
        a[0].mul(&Number::from_i64(180))?.checked_div(&Number::pi())
    });
    add("radians", "angular", (1, 1), |a| {
        a[0].mul(&Number::pi())?.checked_div(&Number::from_i64(180))
    });

    // Hyperbolic
    add("sinh", "hyperbolic", (1, 1), |a| a[0].map_f64(f64::sinh));
    add("cosh", "hyperbolic", (1, 1), |a| a[0].map_f64(f64::cosh));
    add("tanh", "hyperbolic", (1, 1), |a| a[0].map_f64(f64::tanh));
    add("asinh", "hyperbolic", (1, 1), |a| a[0].map_f64(f64::asinh));
    add("acosh", "hyperbolic", (1, 1), |a| a[0].map_f64(f64::acosh));
    add("atanh", "hyperbolic", (1, 1), |a| a[0].map_f64(f64::atanh));

    // Special
    add("erf", "special", (1, 1), |a| a[0].map_f64(libm::erf));
    add("erfc", "special", (1, 1), |a| a[0].map_f64(libm::erfc));
    add("gamma", "special", (1, 1), |a| a[0].map_f64(libm::tgamma));
    add("lgamma", "special", (1, 1), |a| a[0].map_f64(libm::lgamma));

    m
});

fn to_f64(n: &Number) -> Result<f64, NumberError> {
    n.to_f64()
        .ok_or_else(|| NumberError::DomainError("value out of range".to_string()))
}

fn integer_arg(n: &Number, name: &str) -> Result<i64, NumberError> {
    n.to_i64()
        .ok_or_else(|| NumberError::DomainError(format!("{}() expects an integer", name)))
}

fn round(args: &[Number]) -> Result<Number, NumberError> {
    let Some(places) = args.get(1) else {
        return Ok(args[0].round_half_even());
    };
    let scale = Number::from_i64(10).powi(integer_arg(places, "round")?)?;
    args[0].mul(&scale)?.round_half_even().checked_div(&scale)
}

fn factorial(args: &[Number]) -> Result<Number, NumberError> {
    let n = integer_arg(&args[0], "factorial")?;
    if !(0..=FACTORIAL_LIMIT).contains(&n) {
        return Err(NumberError::DomainError(format!(
            "factorial() needs 0 <= n <= {}",
            FACTORIAL_LIMIT
        )));
    }
    (2..=n).try_fold(Number::one(), |acc, k| acc.mul(&Number::from_i64(k)))
}

/// Call a whitelisted function by name
pub fn call(name: &str, args: &[Number]) -> Result<Number, EvalError> {
    let def = FUNCTIONS
        .get(name)
        .ok_or_else(|| EvalError::UnknownFunction(name.to_string()))?;

    let FunctionMeta { min_args, max_args, .. } = def.meta;
    if args.len() < min_args || args.len() > max_args {
        let expected = if min_args == max_args {
            min_args.to_string()
        } else {
            format!("{} to {}", min_args, max_args)
        };
        return Err(EvalError::Arity { name: name.to_string(), expected, got: args.len() });
    }

    Ok((def.call)(args)?)
}

/// Metadata of every callable function, sorted by name
pub fn function_names() -> Vec<FunctionMeta> {
    let mut metas: Vec<FunctionMeta> = FUNCTIONS.values().map(|def| def.meta).collect();
    metas.sort_by_key(|meta| meta.name);
    metas
}
