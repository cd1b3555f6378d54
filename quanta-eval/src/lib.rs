//! Quanta Eval - sandboxed arithmetic
//!
//! `evaluate` turns a unit-less expression such as `5 * cos(pi + 2)` or
//! `0b1010 + 0xA - 050` into a `Number`. The text goes through a few
//! repair passes (integer literals, dangling operators, unbalanced
//! parentheses), a lexer and a recursive-descent parser build an `Expr`
//! tree, and the tree is walked against the whitelisted function table.
//! Names outside that table and the constants `e`, `pi`, `inf` are errors.

mod ast;
mod error;
mod eval;
mod functions;
mod lexer;
mod literals;
mod parser;

pub use ast::{BinOp, Expr, UnaryOp};
pub use error::EvalError;
pub use eval::CONSTANTS;
pub use functions::{function_names, FunctionMeta};
pub use lexer::{tokenize, Token, MAX_TOKENS};
pub use literals::{
    balance_parentheses, rewrite_integer_literals, trim_dangling_operators, RIGHT_TRIMMABLE,
};
pub use parser::{parse, MAX_DEPTH};

use quanta_core::Number;
use tracing::trace;

/// Evaluate an arithmetic expression
pub fn evaluate(input: &str) -> Result<Number, EvalError> {
    let text = rewrite_integer_literals(input);
    let text = balance_parentheses(trim_dangling_operators(&text));
    trace!(input, rewritten = %text, "evaluating");

    let expr = parse(&text)?;
    eval::eval(&expr)
}
