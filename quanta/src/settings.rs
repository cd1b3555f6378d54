//! Converter settings
//!
//! Every key is optional. A value that cannot be used is reported with a
//! warning and the default is kept, so a bad environment never stops a
//! query from being answered.

use quanta_core::QuantaError;
use std::collections::BTreeSet;
use tracing::warn;

pub const DECIMAL_SEPARATOR: &str = "DECIMAL_SEPARATOR";
pub const UNITS_SIDE: &str = "UNITS_SIDE";
pub const MAX_MAGNITUDE: &str = "MAX_MAGNITUDE";
pub const UNITS_BLACKLIST: &str = "UNITS_BLACKLIST";
pub const BASE_16: &str = "BASE_16";
pub const BASE_8: &str = "BASE_8";
pub const BASE_2: &str = "BASE_2";
pub const DEBUG_CONVERTER: &str = "DEBUG_CONVERTER";

const TRUTHY: &[&str] = &["true", "1", "yes", "t", "y"];

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Replaces `.` in rendered numbers
    pub decimal_separator: char,
    /// Render `unit value` instead of `value unit`
    pub units_left: bool,
    /// Largest allowed |log10| difference between source and target quantity
    pub max_magnitude: u32,
    /// Lowercase substrings of target names to suppress
    pub blacklist: Vec<String>,
    pub base16: bool,
    pub base8: bool,
    pub base2: bool,
    pub debug: bool,
    /// Fractional digits kept when rendering decimals
    pub output_decimals: u32,
    /// Largest denominator rendered before approximating
    pub fraction_limit: u32,
    /// Maximum deviation in percent of an approximated fraction
    pub max_fraction_deviation: u32,
    /// Denominators a split remainder may have
    pub split_denominators: BTreeSet<u32>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            decimal_separator: '.',
            units_left: false,
            max_magnitude: 3,
            blacklist: Vec::new(),
            base16: true,
            base8: true,
            base2: true,
            debug: false,
            output_decimals: 6,
            fraction_limit: 64,
            max_fraction_deviation: 10,
            split_denominators: BTreeSet::from([1, 2, 4, 8, 16, 32, 64]),
        }
    }
}

impl Settings {
    /// Read settings from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`, defaulting anything missing or invalid
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut settings = Settings::default();

        if let Some(value) = lookup(DECIMAL_SEPARATOR).filter(|v| !v.is_empty()) {
            match parse_separator(&value) {
                Ok(separator) => settings.decimal_separator = separator,
                Err(err) => warn!(%err, "using default decimal separator"),
            }
        }

        if let Some(value) = lookup(UNITS_SIDE) {
            settings.units_left = value.trim().eq_ignore_ascii_case("left");
        }

        if let Some(value) = lookup(MAX_MAGNITUDE) {
            match parse_magnitude(&value) {
                Ok(magnitude) => settings.max_magnitude = magnitude,
                Err(err) => warn!(%err, default = settings.max_magnitude, "using default maximum magnitude"),
            }
        }

        if let Some(value) = lookup(UNITS_BLACKLIST) {
            settings.blacklist = value
                .to_lowercase()
                .split_whitespace()
                .map(str::to_string)
                .collect();
        }

        settings.base16 = flag(&lookup, BASE_16, settings.base16);
        settings.base8 = flag(&lookup, BASE_8, settings.base8);
        settings.base2 = flag(&lookup, BASE_2, settings.base2);
        settings.debug = lookup(DEBUG_CONVERTER).is_some_and(|v| !v.is_empty());

        settings
    }

    pub fn with_decimal_separator(mut self, separator: char) -> Self {
        self.decimal_separator = separator;
        self
    }

    pub fn with_units_left(mut self, left: bool) -> Self {
        self.units_left = left;
        self
    }

    pub fn with_max_magnitude(mut self, magnitude: u32) -> Self {
        self.max_magnitude = magnitude;
        self
    }

    pub fn with_blacklist<'a>(mut self, words: impl IntoIterator<Item = &'a str>) -> Self {
        self.blacklist = words.into_iter().map(str::to_lowercase).collect();
        self
    }

    /// True when `name` contains a blacklisted substring
    pub fn is_blacklisted(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        self.blacklist.iter().any(|word| name.contains(word.as_str()))
    }
}

fn parse_separator(value: &str) -> Result<char, QuantaError> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(separator), None) => Ok(separator),
        _ => Err(invalid(DECIMAL_SEPARATOR, value)),
    }
}

fn parse_magnitude(value: &str) -> Result<u32, QuantaError> {
    value.trim().parse().map_err(|_| invalid(MAX_MAGNITUDE, value))
}

/// Missing keys keep `default`; present keys are true only when truthy
fn flag(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: bool) -> bool {
    match lookup(key) {
        Some(value) => TRUTHY.contains(&value.trim().to_lowercase().as_str()),
        None => default,
    }
}

fn invalid(key: &str, value: &str) -> QuantaError {
    QuantaError::Configuration {
        key: key.to_string(),
        value: value.to_string(),
    }
}
