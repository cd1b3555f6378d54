//! Registry errors

use quanta_core::QuantaError;
use thiserror::Error;

/// Invalid unit definition, rejected at registration or when the
/// registry is built
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("fractional unit {0} cannot use the affine coefficients a and d")]
    AffineFraction(String),

    #[error("fractional unit {0} needs a finite nonzero ratio b/c")]
    DegenerateRatio(String),

    #[error("unit {unit} is defined against unregistered base unit {base}")]
    UnknownBase { unit: String, base: String },

    #[error("unit {unit} splits into unregistered unit {split}")]
    UnknownSplit { unit: String, split: String },
}

/// Name or alias not present in the registry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown unit: {0}")]
pub struct UnknownUnit(pub String);

impl From<RegistryError> for QuantaError {
    fn from(err: RegistryError) -> Self {
        QuantaError::Registry(err.to_string())
    }
}

impl From<UnknownUnit> for QuantaError {
    fn from(err: UnknownUnit) -> Self {
        QuantaError::UnknownUnit(err.0)
    }
}
