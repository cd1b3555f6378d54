//! Built-in unit catalog
//!
//! A static record source covering everyday units. It also carries a few
//! survey, regional and deprecated records that ingestion is expected to
//! drop.

use crate::record::{BaseConversion, BaseUnitRef, UnitRecord};
use quanta_core::{Number, NumberError};

#[derive(Debug, Clone, Copy)]
enum Def {
    Base,
    Factor(&'static str, &'static str),
    Fraction(&'static str, &'static str, &'static str),
    Formula(&'static str, [&'static str; 4]),
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    id: &'static str,
    annotation: &'static str,
    name: &'static str,
    types: &'static [&'static str],
    def: Def,
    deprecated: bool,
}

const fn entry(id: &'static str, name: &'static str, types: &'static [&'static str], def: Def) -> Entry {
    Entry {
        id,
        annotation: id,
        name,
        types,
        def,
        deprecated: false,
    }
}

const fn base(id: &'static str, name: &'static str, types: &'static [&'static str]) -> Entry {
    entry(id, name, types, Def::Base)
}

const fn factor(
    id: &'static str,
    name: &'static str,
    types: &'static [&'static str],
    base: &'static str,
    factor: &'static str,
) -> Entry {
    entry(id, name, types, Def::Factor(base, factor))
}

const fn fraction(
    id: &'static str,
    name: &'static str,
    types: &'static [&'static str],
    base: &'static str,
    numerator: &'static str,
    denominator: &'static str,
) -> Entry {
    entry(id, name, types, Def::Fraction(base, numerator, denominator))
}

const fn formula(
    id: &'static str,
    name: &'static str,
    types: &'static [&'static str],
    base: &'static str,
    params: [&'static str; 4],
) -> Entry {
    entry(id, name, types, Def::Formula(base, params))
}

const LENGTH: &[&str] = &["length"];
const DISTANCE: &[&str] = &["length", "distance"];
const AREA: &[&str] = &["area"];
const VOLUME: &[&str] = &["volume"];
const MASS: &[&str] = &["mass"];
const TIME: &[&str] = &["time"];
const TEMPERATURE: &[&str] = &["thermodynamic temperature"];
const VELOCITY: &[&str] = &["velocity"];
const PRESSURE: &[&str] = &["pressure"];
const ENERGY: &[&str] = &["energy"];
const POWER: &[&str] = &["power"];
const FREQUENCY: &[&str] = &["frequency"];
const ANGLE: &[&str] = &["plane angle"];
const CAPACITANCE: &[&str] = &["capacitance"];
const CONDUCTANCE: &[&str] = &["conductance"];
const DIMENSIONLESS: &[&str] = &["dimensionless"];

static ENTRIES: &[Entry] = &[
    // length
    base("m", "metre", DISTANCE),
    factor("km", "kilometre", DISTANCE, "m", "1000"),
    factor("dm", "decimetre", LENGTH, "m", "0.1"),
    factor("cm", "centimetre", LENGTH, "m", "0.01"),
    factor("mm", "millimetres", LENGTH, "m", "0.001"),
    factor("um", "micrometre", LENGTH, "m", "0.000001"),
    factor("nm", "nanometre", LENGTH, "m", "0.000000001"),
    fraction("in", "inch", LENGTH, "m", "254", "10000"),
    fraction("ft", "foot", LENGTH, "m", "3048", "10000"),
    fraction("yd", "yard", LENGTH, "m", "9144", "10000"),
    fraction("mi", "mile", DISTANCE, "m", "1609344", "1000"),
    fraction("mil", "mil, a thousandth of an inch", LENGTH, "m", "254", "10000000"),
    factor("nmi", "nautical mile", DISTANCE, "m", "1852"),
    factor("AU", "astronomical unit", DISTANCE, "m", "149597870700"),
    factor("ly", "light year", DISTANCE, "m", "9460730472580800"),
    fraction("ftUS", "US survey foot", LENGTH, "m", "1200", "3937"),
    fraction("ftInd", "foot", LENGTH, "m", "3047996", "10000000"),
    Entry {
        annotation: "ft(Br)",
        ..factor("ftBr", "British foot", LENGTH, "m", "0.3047997")
    },
    fraction("ch", "chain", LENGTH, "m", "201168", "10000"),
    // area
    base("m2", "square metres", AREA),
    factor("km2", "square kilometres", AREA, "m2", "1000000"),
    factor("dm2", "square decimetres", AREA, "m2", "0.01"),
    factor("cm2", "square centimetres", AREA, "m2", "0.0001"),
    factor("mm2", "square millimetres", AREA, "m2", "0.000001"),
    factor("ha", "hectare", AREA, "m2", "10000"),
    factor("acre", "acre", AREA, "m2", "4046.8564224"),
    fraction("ft2", "square foot", AREA, "m2", "9290304", "100000000"),
    fraction("in2", "square inch", AREA, "m2", "64516", "100000000"),
    factor("mi2", "square mile", AREA, "m2", "2589988.110336"),
    // volume
    base("m3", "cubic metres", VOLUME),
    factor("L", "litre", VOLUME, "m3", "0.001"),
    factor("mL", "millilitre", VOLUME, "m3", "0.000001"),
    factor("dm3", "cubic decimetres", VOLUME, "m3", "0.001"),
    factor("cm3", "cubic centimetres", VOLUME, "m3", "0.000001"),
    factor("mm3", "cubic millimetres", VOLUME, "m3", "0.000000001"),
    fraction("ft3", "cubic foot", VOLUME, "m3", "28316846592", "1000000000000"),
    fraction("in3", "cubic inch", VOLUME, "m3", "16387064", "1000000000000"),
    factor("galUS", "US gallon", VOLUME, "m3", "0.003785411784"),
    factor("galUK", "UK gallon", VOLUME, "m3", "0.00454609"),
    factor("flozUS", "US fluid ounce", VOLUME, "m3", "0.0000295735295625"),
    factor("flozUK", "UK fluid ounce", VOLUME, "m3", "0.0000284130625"),
    // mass
    base("kg", "kilogram", MASS),
    factor("g", "gram", MASS, "kg", "0.001"),
    factor("mg", "milligram", MASS, "kg", "0.000001"),
    factor("t", "tonne", MASS, "kg", "1000"),
    factor("lbm", "pounds mass", MASS, "kg", "0.45359237"),
    factor("ozm", "ounce mass", MASS, "kg", "0.028349523125"),
    factor("st", "stone", MASS, "kg", "6.35029318"),
    // time
    base("s", "second", TIME),
    factor("ms", "millisecond", TIME, "s", "0.001"),
    factor("min", "minute", TIME, "s", "60"),
    factor("h", "hour", TIME, "s", "3600"),
    factor("d", "day", TIME, "s", "86400"),
    factor("wk", "week", TIME, "s", "604800"),
    factor("yr", "year", TIME, "s", "31557600"),
    // temperature
    Entry {
        annotation: "K",
        ..base("degK", "degrees Kelvin", TEMPERATURE)
    },
    formula("degC", "degrees Celsius", TEMPERATURE, "degK", ["273.15", "1", "1", "0"]),
    formula("degF", "degree Fahrenheit", TEMPERATURE, "degK", ["2298.35", "5", "9", "0"]),
    formula("degR", "degrees Rankine", TEMPERATURE, "degK", ["0", "5", "9", "0"]),
    // velocity
    base("m/s", "metre per second", VELOCITY),
    factor("mm/s", "millimetre per second", VELOCITY, "m/s", "0.001"),
    formula("km/h", "kilometre per hour", VELOCITY, "m/s", ["0", "1000", "3600", "0"]),
    factor("miPh", "miles per hour", VELOCITY, "m/s", "0.44704"),
    factor("ft/s", "foot per second", VELOCITY, "m/s", "0.3048"),
    formula("knot", "knot", VELOCITY, "m/s", ["0", "1852", "3600", "0"]),
    // pressure
    base("Pa", "pascal", PRESSURE),
    factor("kPa", "kilopascal", PRESSURE, "Pa", "1000"),
    factor("bar", "bar", PRESSURE, "Pa", "100000"),
    factor("atm", "standard atmosphere", PRESSURE, "Pa", "101325"),
    factor("psi", "pound per square inch", PRESSURE, "Pa", "6894.757293168"),
    // energy
    base("J", "joule", ENERGY),
    factor("kJ", "kilojoule", ENERGY, "J", "1000"),
    factor("cal", "calorie", ENERGY, "J", "4.184"),
    factor("kcal", "kilocalorie", ENERGY, "J", "4184"),
    factor("Wh", "watt hour", ENERGY, "J", "3600"),
    factor("kWh", "kilowatt hour", ENERGY, "J", "3600000"),
    // power
    base("W", "watt", POWER),
    factor("kW", "kilowatt", POWER, "W", "1000"),
    factor("hp", "horsepower", POWER, "W", "745.69987158227022"),
    // frequency
    base("Hz", "hertz", FREQUENCY),
    factor("kHz", "kilohertz", FREQUENCY, "Hz", "1000"),
    factor("MHz", "megahertz", FREQUENCY, "Hz", "1000000"),
    factor("GHz", "gigahertz", FREQUENCY, "Hz", "1000000000"),
    formula("rpm", "revolution per minute", FREQUENCY, "Hz", ["0", "1", "60", "0"]),
    factor("1/min", "per minute", FREQUENCY, "Hz", "0.016666666666666666666666666666667"),
    // plane angle
    base("rad", "radian", ANGLE),
    factor("dega", "degree of angle", ANGLE, "rad", "0.017453292519943295769236907684886"),
    // electrical
    base("F", "farad", CAPACITANCE),
    Entry {
        deprecated: true,
        ..base("mho", "mho", CONDUCTANCE)
    },
    // dimensionless
    base("Euc", "euclid", DIMENSIONLESS),
    Entry {
        annotation: "%",
        ..factor("percent", "percent", DIMENSIONLESS, "Euc", "0.01")
    },
    factor("ppm", "part per million", DIMENSIONLESS, "Euc", "0.000001"),
];

impl Entry {
    fn to_record(self) -> Result<UnitRecord, NumberError> {
        let base_unit = match self.def {
            Def::Base => None,
            Def::Factor(id, factor) => Some(BaseUnitRef {
                id: id.to_string(),
                conversion: BaseConversion::Factor {
                    factor: Number::from_str(factor)?,
                },
            }),
            Def::Fraction(id, numerator, denominator) => Some(BaseUnitRef {
                id: id.to_string(),
                conversion: BaseConversion::Fraction {
                    numerator: Number::from_str(numerator)?,
                    denominator: Number::from_str(denominator)?,
                },
            }),
            Def::Formula(id, [a, b, c, d]) => Some(BaseUnitRef {
                id: id.to_string(),
                conversion: BaseConversion::Formula {
                    a: Number::from_str(a)?,
                    b: Number::from_str(b)?,
                    c: Number::from_str(c)?,
                    d: Number::from_str(d)?,
                },
            }),
        };

        Ok(UnitRecord {
            id: self.id.to_string(),
            name: Some(self.name.to_string()),
            annotation: Some(self.annotation.to_string()),
            quantity_types: self.types.iter().map(|t| t.to_string()).collect(),
            deprecated: self.deprecated,
            base_unit,
        })
    }
}

/// The catalog as unit records, in declaration order
pub fn records() -> Result<Vec<UnitRecord>, NumberError> {
    ENTRIES.iter().map(|entry| entry.to_record()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::SkipReason;
    use std::collections::HashSet;

    #[test]
    fn test_records_parse() {
        let records = records().unwrap();
        assert_eq!(records.len(), ENTRIES.len());

        let ids: HashSet<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids.len(), records.len(), "duplicate catalog id");
    }

    #[test]
    fn test_base_references_exist() {
        let records = records().unwrap();
        let ids: HashSet<&str> = records.iter().map(|r| r.id.as_str()).collect();
        for record in &records {
            if let Some(base) = &record.base_unit {
                assert!(ids.contains(base.id.as_str()), "{} -> {}", record.id, base.id);
            }
        }
    }

    #[test]
    fn test_filtered_records() {
        let records = records().unwrap();
        let skipped: Vec<(&str, SkipReason)> = records
            .iter()
            .filter_map(|r| r.skip_reason().map(|reason| (r.id.as_str(), reason)))
            .collect();
        assert_eq!(
            skipped,
            vec![
                ("ftUS", SkipReason::DeniedAnnotation),
                ("ftInd", SkipReason::DeniedAnnotation),
                ("ftBr", SkipReason::ParenthesizedAnnotation),
                ("ch", SkipReason::DeniedName("chain")),
                ("degR", SkipReason::DeniedName("rankine")),
                ("1/min", SkipReason::NumericSegment),
                ("mho", SkipReason::Deprecated),
            ]
        );
    }
}
