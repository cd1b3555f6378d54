//! Error taxonomy shared by the Quanta crates
//!
//! None of these reach the caller of a query: unknown units degrade to
//! unit-less answers, evaluation errors trigger the token-stripping
//! fallback and bad configuration values fall back to defaults. They are
//! still typed so each layer can decide how to degrade.

use crate::NumberError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuantaError {
    /// Name or alias not present in the registry
    #[error("unknown unit: {0}")]
    UnknownUnit(String),

    /// Malformed or disallowed expression
    #[error("cannot evaluate expression: {0}")]
    Evaluation(String),

    /// Invalid configuration value
    #[error("invalid value {value:?} for {key}")]
    Configuration { key: String, value: String },

    /// Invalid unit definition, rejected at registration time
    #[error("invalid unit definition: {0}")]
    Registry(String),

    #[error(transparent)]
    Number(#[from] NumberError),
}

pub type Result<T, E = QuantaError> = std::result::Result<T, E>;
