//! Quanta Units - unit registry and conversion algebra
//!
//! Units convert through the base unit of their quantity type, either with
//! an affine decimal formula `(a + b·v) / (c + d·v)` or, for fractional
//! units such as inch and foot, with an exact rational ratio.
//!
//! ```text
//! catalog::records() ─▶ record::ingest ─▶ extra::register_extra_units ─▶ build()
//! ```

pub mod aliases;
pub mod catalog;
mod error;
pub mod extra;
pub mod record;
mod registry;
mod unit;

pub use error::{RegistryError, UnknownUnit};
pub use record::{BaseConversion, BaseUnitRef, SkipReason, UnitRecord};
pub use registry::{UnitRegistry, UnitRegistryBuilder};
pub use unit::{ConversionParams, Scalar, Unit};

use quanta_core::QuantaError;

/// Registry built from the built-in catalog plus the extra units
pub fn standard_registry() -> Result<UnitRegistry, QuantaError> {
    let mut builder = UnitRegistryBuilder::new();
    record::ingest(&mut builder, catalog::records()?)?;
    extra::register_extra_units(&mut builder)?;
    Ok(builder.build()?)
}
