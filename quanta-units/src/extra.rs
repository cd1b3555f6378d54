//! Units synthesized in code, registered after the catalog records

use crate::{ConversionParams, RegistryError, Unit, UnitRegistryBuilder};
use quanta_core::Number;
use tracing::debug;

const DIGITAL_STORAGE: &str = "digital storage";

/// (step, [(exponent, prefix, full prefix)])
const STORAGE_PREFIXES: &[(i64, &[(u32, &str, &str)])] = &[
    (
        1024,
        &[
            (0, "", ""),
            (1, "ki", "kibi"),
            (2, "Mi", "mebi"),
            (3, "Gi", "gibi"),
            (4, "Ti", "tebi"),
            (5, "Pi", "pebi"),
        ],
    ),
    (
        1000,
        &[
            (0, "", ""),
            (1, "k", "kilo"),
            (2, "M", "mega"),
            (3, "G", "giga"),
            (4, "T", "tera"),
            (5, "P", "peta"),
        ],
    ),
];

/// US kitchen measures in cubic metres
const KITCHEN_VOLUMES: &[(&str, &str, &str)] = &[
    ("cup", "cup", "0.0002365882365"),
    ("tbsp", "tablespoon", "0.00001478676478125"),
    ("tsp", "teaspoon", "0.00000492892159375"),
];

/// Capacitance sub-units in farad
const CAPACITANCE: &[(&str, &str, &str)] = &[
    ("mF", "millifarad", "0.001"),
    ("uF", "microfarad", "0.000001"),
    ("nF", "nanofarad", "0.000000001"),
    ("pF", "picofarad", "0.000000000001"),
];

/// Register bit/byte prefixes, kitchen volumes, capacitance sub-units
/// and the foot/inch split
pub fn register_extra_units(builder: &mut UnitRegistryBuilder) -> Result<(), RegistryError> {
    let before = builder.len();

    register_storage(builder)?;

    if builder.contains("m3") {
        for (id, name, factor) in KITCHEN_VOLUMES {
            builder.register(scaled(id, name, "volume", "m3", factor))?;
        }
    }

    if builder.contains("F") {
        for (id, name, factor) in CAPACITANCE {
            builder.register(scaled(id, name, "capacitance", "F", factor))?;
        }
    }

    if builder.contains("in") {
        if let Some(foot) = builder.get_mut("ft") {
            foot.split = Some("in".to_string());
        }
    }

    debug!(added = builder.len() - before, "registered extra units");
    Ok(())
}

/// Bits and bytes at binary and decimal prefixes. The plain byte is the
/// base; a bit is an eighth of a byte.
fn register_storage(builder: &mut UnitRegistryBuilder) -> Result<(), RegistryError> {
    for (step, prefixes) in STORAGE_PREFIXES {
        for (exponent, prefix, full_prefix) in *prefixes {
            let multiplier = Number::from_i64(step.pow(*exponent));
            let lower = prefix.to_lowercase();

            let id = format!("{prefix}bit");
            let name = format!("{full_prefix}bit");
            let aliases = [format!("{lower}b"), format!("{prefix}b"), name.clone()];
            let bit = Unit::new(&id, &name)
                .with_quantity_type(DIGITAL_STORAGE)
                .with_base(
                    "byte",
                    ConversionParams::ratio(multiplier.clone(), Number::from_i64(8)),
                )
                .with_aliases(aliases.iter().map(String::as_str));
            builder.register(bit)?;

            let id = format!("{prefix}byte");
            let name = format!("{full_prefix}byte");
            let aliases = [format!("{lower}B"), format!("{prefix}B"), name.clone()];
            let mut byte = Unit::new(&id, &name)
                .with_quantity_type(DIGITAL_STORAGE)
                .with_aliases(aliases.iter().map(String::as_str));
            if *exponent > 0 {
                byte = byte.with_base("byte", ConversionParams::factor(multiplier));
            }
            builder.register(byte)?;
        }
    }
    Ok(())
}

fn scaled(id: &str, name: &str, quantity_type: &str, base: &str, factor: &str) -> Unit {
    // Factors are compile-time literals
    let factor = Number::from_str(factor).unwrap_or_else(|_| Number::one());
    Unit::new(id, name)
        .with_quantity_type(quantity_type)
        .with_base(base, ConversionParams::factor(factor))
}
