//! Evaluator errors

use quanta_core::{NumberError, QuantaError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("empty expression")]
    Empty,

    #[error("expression has more than {0} tokens")]
    TooLong(usize),

    #[error("unexpected character {0:?} at offset {1}")]
    UnexpectedChar(char, usize),

    #[error("unexpected token '{0}'")]
    UnexpectedToken(String),

    #[error("unexpected end of expression")]
    UnexpectedEnd,

    #[error("undefined name: {0}")]
    UndefinedName(String),

    #[error("unknown function: {0}")]
    UnknownFunction(String),

    #[error("{name}() takes {expected} argument(s), {got} given")]
    Arity {
        name: String,
        expected: String,
        got: usize,
    },

    #[error("expression nested deeper than {0} levels")]
    TooDeep(usize),

    #[error(transparent)]
    Number(#[from] NumberError),
}

impl From<EvalError> for QuantaError {
    fn from(err: EvalError) -> Self {
        QuantaError::Evaluation(err.to_string())
    }
}
