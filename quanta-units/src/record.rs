//! Unit records and ingestion filters
//!
//! A `UnitRecord` is the serialized description of one unit as it comes
//! from a catalog. `ingest` filters out records that would only add noise
//! (deprecated, historical or regional variants) and registers the rest.

use crate::{ConversionParams, RegistryError, Unit, UnitRegistryBuilder};
use quanta_core::Number;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Words that exclude a unit when they appear in its name
const NAME_DENYLIST: &[&str] = &[
    "benoits", "chain", "clarke", "clarkes", "clarks", "fathoms", "german", "indian", "sears",
    "survey", "imperial", "link", "rankine",
];

/// Annotations of survey and regional variants
const ANNOTATION_DENYLIST: &[&str] = &[
    "chUS", "ftUS", "inUS", "lkUS", "ftGC", "ftMA", "ftSe", "ftBnA", "ftBnB", "ftCla", "ftInd",
];

/// How a record relates to its base unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum BaseConversion {
    /// base = factor · v
    Factor { factor: Number },
    /// base = (numerator / denominator) · v, kept exact
    Fraction { numerator: Number, denominator: Number },
    /// base = (a + b·v) / (c + d·v)
    Formula { a: Number, b: Number, c: Number, d: Number },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseUnitRef {
    pub id: String,
    #[serde(flatten)]
    pub conversion: BaseConversion,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitRecord {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub annotation: Option<String>,
    #[serde(default)]
    pub quantity_types: Vec<String>,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(default)]
    pub base_unit: Option<BaseUnitRef>,
}

/// Why a record was not registered
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    Deprecated,
    ParenthesizedAnnotation,
    DeniedName(&'static str),
    DeniedAnnotation,
    NumericSegment,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Deprecated => write!(f, "deprecated"),
            SkipReason::ParenthesizedAnnotation => write!(f, "annotation contains '('"),
            SkipReason::DeniedName(word) => write!(f, "name contains '{}'", word),
            SkipReason::DeniedAnnotation => write!(f, "regional annotation"),
            SkipReason::NumericSegment => write!(f, "numeric path segment"),
        }
    }
}

impl UnitRecord {
    pub fn new(id: &str) -> Self {
        UnitRecord {
            id: id.to_string(),
            name: None,
            annotation: None,
            quantity_types: Vec::new(),
            deprecated: false,
            base_unit: None,
        }
    }

    /// Name shown for the unit, falling back to the id
    pub fn display_name(&self) -> String {
        self.name.as_deref().unwrap_or(&self.id).replace("picro", "pico")
    }

    /// `Some(reason)` when the record should not be registered
    pub fn skip_reason(&self) -> Option<SkipReason> {
        if self.deprecated {
            return Some(SkipReason::Deprecated);
        }

        if let Some(annotation) = &self.annotation {
            if annotation.contains('(') {
                return Some(SkipReason::ParenthesizedAnnotation);
            }
            if ANNOTATION_DENYLIST.contains(&annotation.as_str()) {
                return Some(SkipReason::DeniedAnnotation);
            }
        }

        let name = self.display_name().to_lowercase();
        if let Some(word) = name
            .split_whitespace()
            .find_map(|w| NAME_DENYLIST.iter().copied().find(|denied| *denied == w))
        {
            return Some(SkipReason::DeniedName(word));
        }

        // Counted units such as "1/min"
        let annotation = self.annotation.as_deref().unwrap_or(&self.id);
        if annotation
            .split('/')
            .any(|segment| !segment.is_empty() && segment.chars().all(|c| c.is_ascii_digit()))
        {
            return Some(SkipReason::NumericSegment);
        }

        None
    }

    /// Build the unit this record describes
    pub fn to_unit(&self) -> Unit {
        let mut unit = Unit::new(&self.id, &self.display_name());
        if let Some(annotation) = &self.annotation {
            unit = unit.with_alias(annotation);
        }
        for quantity_type in &self.quantity_types {
            unit = unit.with_quantity_type(quantity_type);
        }

        match &self.base_unit {
            None => unit,
            Some(BaseUnitRef { id, conversion }) => match conversion {
                BaseConversion::Factor { factor } => {
                    unit.with_base(id, ConversionParams::factor(factor.clone()))
                }
                BaseConversion::Fraction { numerator, denominator } => {
                    unit.with_fraction(id, numerator.clone(), denominator.clone())
                }
                BaseConversion::Formula { a, b, c, d } => unit.with_base(
                    id,
                    ConversionParams::new(a.clone(), b.clone(), c.clone(), d.clone()),
                ),
            },
        }
    }
}

/// Register every record that passes the filters; returns how many were kept
pub fn ingest(
    builder: &mut UnitRegistryBuilder,
    records: impl IntoIterator<Item = UnitRecord>,
) -> Result<usize, RegistryError> {
    let mut kept = 0;
    for record in records {
        if let Some(reason) = record.skip_reason() {
            debug!(id = %record.id, %reason, "skipping unit record");
            continue;
        }
        builder.register(record.to_unit())?;
        kept += 1;
    }
    Ok(kept)
}
