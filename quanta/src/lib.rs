//! Quanta - free-text quantity queries
//!
//! A query such as `4'2-1/4" in ft` flows through three stages:
//!
//! ```text
//! normalize ─▶ resolve ─▶ format
//! ```
//!
//! Normalization rewrites idioms into plain arithmetic plus unit names,
//! resolution splits quantity from units and evaluates the quantity, and
//! formatting renders each conversion as display records. No stage fails a
//! query: unknown units fall back to arithmetic and broken arithmetic
//! loses trailing tokens until it evaluates.

pub mod format;
pub mod normalize;
pub mod resolve;
pub mod settings;

pub use format::{format_number, format_units, fraction_to_string, ResultItem};
pub use normalize::normalize;
pub use resolve::{resolve, Conversion};
pub use settings::Settings;

use quanta_core::QuantaError;
use quanta_units::UnitRegistry;
use std::sync::Arc;
use tracing::debug;

/// Query engine over a shared, read-only unit registry
#[derive(Debug, Clone)]
pub struct Converter {
    registry: Arc<UnitRegistry>,
    settings: Settings,
}

impl Converter {
    pub fn new(registry: UnitRegistry, settings: Settings) -> Self {
        Self::with_shared_registry(Arc::new(registry), settings)
    }

    /// Share one registry between converters with different settings
    pub fn with_shared_registry(registry: Arc<UnitRegistry>, settings: Settings) -> Self {
        Self { registry, settings }
    }

    pub fn with_standard_registry(settings: Settings) -> Result<Self, QuantaError> {
        Ok(Self::new(quanta_units::standard_registry()?, settings))
    }

    pub fn registry(&self) -> &Arc<UnitRegistry> {
        &self.registry
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Normalize and resolve `query` into conversions
    pub fn convert(&self, query: &str) -> Vec<Conversion<'_>> {
        let normalized = normalize(query);
        debug!(query, normalized = %normalized, "normalized query");
        resolve(&self.registry, &normalized)
    }

    /// Display records for `query`, rendered one conversion at a time
    pub fn query(&self, query: &str) -> impl Iterator<Item = ResultItem> + '_ {
        self.convert(query)
            .into_iter()
            .flat_map(move |conversion| self.render(&conversion))
    }

    /// Display records for a single conversion
    pub fn render(&self, conversion: &Conversion<'_>) -> Vec<ResultItem> {
        let (Some(from), Some(to)) = (conversion.from, conversion.to) else {
            return format_number(&conversion.quantity, &self.settings);
        };

        if self.settings.is_blacklisted(&to.name) {
            debug!(to = %to.id, "target unit blacklisted");
            return Vec::new();
        }

        format_units(&self.registry, from, &conversion.quantity, to, &self.settings)
            .unwrap_or_else(|err| {
                debug!(%err, from = %from.id, to = %to.id, "conversion failed");
                Vec::new()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn converter(settings: Settings) -> Converter {
        Converter::with_standard_registry(settings).unwrap()
    }

    fn titles_with(query: &str, settings: Settings) -> Vec<String> {
        converter(settings).query(query).map(|item| item.title).collect()
    }

    fn left(query: &str) -> Vec<String> {
        titles_with(query, Settings::default().with_units_left(true))
    }

    fn right(query: &str) -> Vec<String> {
        titles_with(query, Settings::default())
    }

    fn assert_title(titles: &[String], expected: &str) {
        assert!(
            titles.iter().any(|t| t == expected),
            "{expected:?} not in {titles:#?}"
        );
    }

    #[test]
    fn test_metric() {
        assert_eq!(left("10 meter in cm"), vec!["meter 10 = centimeter 1000"]);
        assert_eq!(left("10 metre in cm"), vec!["meter 10 = centimeter 1000"]);
        assert_eq!(right("(10 * 20) mm in cm"), vec!["200 millimeters = 20 centimeter"]);
    }

    #[test]
    fn test_foot_inch_notation() {
        assert_title(&left(r#"4'2" in inch"#), "inch 50 = inch 50");
        assert_title(&left(r#"4'2 1/4" in ft"#), "inch 50.25 = foot 4 inch 9/4");
        assert_title(&left(r#"4'2-1/4" in ft"#), "inch 50.25 = foot 4 inch 9/4");
    }

    #[test]
    fn test_split_titles() {
        assert_title(&left(r#"11""#), "inch 11 = foot 0 inch 11");
        assert_title(&left(r#"12""#), "inch 12 = foot 1 inch 0");
        assert_title(&left(r#"13""#), "inch 13 = foot 1 inch 1");
        assert_title(&left(r#"16""#), "inch 16 = foot 1 inch 4");
        assert_title(&left("113 in to ft"), "inch 113 = foot 9 inch 5");
        assert_title(&right("113.125 in to ft"), "113.125 inch = 9 foot 5 1/8 inch");
    }

    #[test]
    fn test_approximated_value() {
        let items: Vec<ResultItem> = converter(Settings::default())
            .query("113.125 in to ft")
            .collect();
        assert!(!items.is_empty());
        assert!(items.iter().all(|item| item.value == "~603/64"));
        assert!(items.iter().all(|item| item.uid == "in to ft"));
    }

    #[test]
    fn test_single_target_keyword() {
        assert_eq!(
            left("100 pounds to ounces"),
            vec!["pounds mass 100 = ounce mass 1600"]
        );
    }

    #[test]
    fn test_keyword_substring() {
        assert_title(&right("10 ft to i"), "10 foot = 3048 millimeters");
    }

    #[test]
    fn test_fractions() {
        assert_title(&right(r#"1/4""#), "0.25 inch = 1/4 inch");
        assert_title(&right(r#"1/200""#), "0.005 inch = 5 mil, a thousandth of an inch");
    }

    #[test]
    fn test_temperature() {
        assert_title(&right("0f in c"), "0 degree Fahrenheit = -17.777778 degrees Celsius");
        assert_title(&right("10f in c"), "10 degree Fahrenheit = -12.222222 degrees Celsius");
        assert_title(&left("0f"), "degree Fahrenheit 0 = degree Fahrenheit -0");
    }

    #[test]
    fn test_unopened_group() {
        let items: Vec<ResultItem> = converter(Settings::default())
            .query("1 + 2 / 3 * 4) mm^2 in cm^2")
            .collect();
        assert!(items
            .iter()
            .any(|item| item.from_id.as_deref() == Some("mm2") && item.to_id.as_deref() == Some("cm2")));
    }

    #[test]
    fn test_constant_powers_stay_arithmetic() {
        let titles = right("1 * cos(pi/2) - sin(pi^2)");
        assert!(titles[0].starts_with("0.4303"), "{titles:?}");
    }

    #[test]
    fn test_huge_values_saturate() {
        assert_eq!(right("10^9000000000000000000"), vec!["inf"]);
        assert_eq!(right("1e4294967297"), vec!["inf"]);
        assert_eq!(right("1e50000000"), vec!["inf"]);
        assert_eq!(right("exp(1000000)"), vec!["inf"]);
        assert_eq!(right("-10^9000000000000000001"), vec!["-inf"]);
        assert_eq!(right("1e-50000000")[0], "0");
        assert_eq!(right("2^-9000000000000000000")[0], "0");
        assert_eq!(right("10^9000000000000000000 m in cm"), vec!["inf meter = inf centimeter"]);
    }

    #[test]
    fn test_overflowing_functions_degrade() {
        assert_eq!(right("gamma(200)")[0], "0");
        assert_eq!(right("2 + gamma(200)")[0], "2");
    }

    #[test]
    fn test_length_and_depth_limits() {
        let long = ["1"; 1100].join(" + ");
        assert_eq!(right(&long)[0], "1024");

        let deep = "(".repeat(5000) + "1" + &")".repeat(5000);
        assert_eq!(right(&deep)[0], "0");

        let depth = quanta_eval::MAX_DEPTH + 1;
        let nested = "(".repeat(depth) + "1" + &")".repeat(depth);
        assert_eq!(right(&nested)[0], "0");
    }

    #[test]
    fn test_unitless() {
        let cases = [
            ("0x1f", "31"),
            ("1-0.5", "0.5"),
            ("sqrt(4)*2", "4"),
            ("cos(pi / 3)", "0.5"),
            ("log(10, 10)", "1"),
            ("(sqrt(sqrt(5)^2)^2^2)^(1/2)", "5"),
            ("(sqrt(sqrt(5)^2)^2^2)^1/2", "12.5"),
            ("0b1010 + 0xA - 050", "-20"),
        ];
        for (query, expected) in cases {
            let titles = right(query);
            assert_eq!(titles.first().map(String::as_str), Some(expected), "{query}");
        }
    }

    #[test]
    fn test_integer_bases() {
        assert_eq!(right("0x1f"), vec!["31", "0x1f", "0o37", "0b11111"]);
        let settings = Settings {
            base16: false,
            base8: false,
            base2: false,
            ..Settings::default()
        };
        assert_eq!(titles_with("0x1f", settings), vec!["31"]);
    }

    #[test]
    fn test_decimal_separator() {
        let comma = || Settings::default().with_decimal_separator(',');
        assert_eq!(titles_with("1.23", comma()), vec!["1,23"]);
        assert_eq!(titles_with("1.23 * 2", comma()), vec!["2,46"]);
        assert_eq!(titles_with("2 * 1.23", comma()), vec!["2,46"]);
    }

    #[test]
    fn test_magnitude_filter() {
        assert!(right("1 km in mm").is_empty());
        assert_eq!(
            titles_with("1 km in mm", Settings::default().with_max_magnitude(10)),
            vec!["1 kilometer = 1000000 millimeters"]
        );
    }

    #[test]
    fn test_magnitude_filter_drops_split_titles() {
        assert!(right("100000 mil to ft").is_empty());
        let titles = titles_with("100000 mil to ft", Settings::default().with_max_magnitude(10));
        assert_title(&titles, "100000 mil, a thousandth of an inch = 8 foot 4 inch");
    }

    #[test]
    fn test_blacklist() {
        let settings = Settings::default().with_blacklist(["centi"]);
        assert!(titles_with("10 meter in cm", settings).is_empty());

        let settings = Settings::default().with_blacklist(["gram"]);
        let items: Vec<ResultItem> = converter(settings).query("2 kg").collect();
        assert!(!items.is_empty());
        assert!(items
            .iter()
            .all(|item| !matches!(item.to_id.as_deref(), Some("g" | "mg" | "kg"))));
    }

    #[test]
    fn test_degrading_queries() {
        assert_eq!(right("10 + "), vec!["10", "0xa", "0o12", "0b1010"]);
        assert_eq!(right("* * *"), vec!["0", "0x0", "0o0", "0b0"]);
    }

    #[test]
    fn test_conversions() {
        let converter = converter(Settings::default());
        let conversions = converter.convert("10 meter in cm");
        assert_eq!(conversions.len(), 1);
        assert_eq!(conversions[0].from.map(|u| u.id.as_str()), Some("m"));
        assert_eq!(conversions[0].to.map(|u| u.id.as_str()), Some("cm"));
        assert!(converter.convert("2 + 2")[0].is_unitless());
    }

    #[test]
    fn test_shared_registry() {
        let first = converter(Settings::default());
        let second = Converter::with_shared_registry(
            first.registry().clone(),
            Settings::default().with_units_left(true),
        );
        assert!(Arc::ptr_eq(first.registry(), second.registry()));
        assert!(second.settings().units_left);
    }
}
