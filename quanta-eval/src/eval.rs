//! Tree-walking evaluator

use crate::ast::{BinOp, Expr, UnaryOp};
use crate::{functions, EvalError};
use quanta_core::Number;

/// Evaluate an expression tree
pub fn eval(expr: &Expr) -> Result<Number, EvalError> {
    match expr {
        Expr::Number(text) => Ok(Number::from_str(text)?),
        Expr::Constant(name) => constant(name),
        Expr::UnaryOp(UnaryOp::Neg, inner) => Ok(eval(inner)?.neg()),
        Expr::BinaryOp(left, op, right) => {
            let a = eval(left)?;
            let b = eval(right)?;
            let result = match op {
                BinOp::Add => a.add(&b),
                BinOp::Sub => a.sub(&b),
                BinOp::Mul => a.mul(&b),
                BinOp::Div => a.checked_div(&b),
                BinOp::FloorDiv => a.div_trunc(&b),
                BinOp::Rem => a.rem(&b),
                BinOp::Pow => a.pow(&b),
            };
            Ok(result?)
        }
        Expr::FunctionCall(name, args) => {
            let values = args.iter().map(eval).collect::<Result<Vec<_>, _>>()?;
            functions::call(name, &values)
        }
    }
}

/// Names that evaluate to a constant
pub const CONSTANTS: &[&str] = &["e", "pi", "inf", "infinity"];

fn constant(name: &str) -> Result<Number, EvalError> {
    match name {
        "e" => Ok(Number::e()),
        "pi" => Ok(Number::pi()),
        "inf" | "infinity" => Ok(Number::infinity(false)),
        _ => Err(EvalError::UndefinedName(name.to_string())),
    }
}
