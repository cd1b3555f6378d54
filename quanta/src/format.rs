//! Result formatting
//!
//! Turns a resolved conversion into display records: decimal and exact
//! fraction renderings of the target quantity, composite split titles
//! (`9 foot 5 1/8 inch`) and the alternate integer bases of unit-less
//! answers.

use crate::settings::Settings;
use num_bigint::BigInt;
use num_traits::{One, Signed, ToPrimitive, Zero};
use quanta_core::{format_fraction, pow10, round_half_even, Fraction, Number, NumberError};
use quanta_units::{Scalar, Unit, UnitRegistry};
use serde::Serialize;
use tracing::debug;

/// Icon per quantity type
pub const ICONS: &[(&str, &str)] = &[
    ("length", "scale6.png"),
    ("height", "scale6.png"),
    ("distance", "scale6.png"),
    ("area", "scaling1.png"),
    ("time", "round27.png"),
    ("thermodynamic temperature", "thermometer19.png"),
    ("volume", "measuring3.png"),
    ("mass", "weight4.png"),
    ("velocity", "timer18.png"),
    ("level of power intensity", "treble2.png"),
    ("digital storage", "binary9.png"),
];

pub const DEFAULT_ICON: &str = "ruler9.png";
pub const CALCULATOR_ICON: &str = "calculator63.png";

/// Slack for magnitude differences that land exactly on the threshold
const MAGNITUDE_EPSILON: f64 = 1e-9;

/// One displayable answer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultItem {
    pub title: String,
    pub value: String,
    pub icon: String,
    pub uid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autocomplete: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_id: Option<String>,
}

impl ResultItem {
    /// A unit-less answer whose title, value and uid are all `text`
    fn number(text: String) -> Self {
        ResultItem {
            title: text.clone(),
            value: text.clone(),
            icon: CALCULATOR_ICON.to_string(),
            uid: text,
            autocomplete: None,
            from_id: None,
            to_id: None,
        }
    }

    fn with_separator(mut self, separator: char) -> Self {
        if separator != '.' {
            let separator = separator.to_string();
            self.title = self.title.replace('.', &separator);
            self.value = self.value.replace('.', &separator);
            self.autocomplete = self.autocomplete.map(|a| a.replace('.', &separator));
        }
        self
    }
}

/// Render an exact fraction.
///
/// Denominators above `limit` are approximated to the nearest multiple of
/// `1/limit` and prefixed with `~`; an approximation off by more than
/// `max_deviation` percent renders nothing. With `proper`, only a mixed
/// number (`2 1/4`) is rendered, and only when it has both an integer and a
/// fractional part.
pub fn fraction_to_string(
    value: &Fraction,
    proper: bool,
    limit: u32,
    max_deviation: u32,
) -> Option<String> {
    let limit = BigInt::from(limit);
    let (value, prefix) = if value.denom() > &limit && !limit.is_zero() {
        let scaled = value * Fraction::from_integer(limit.clone());
        let approx = Fraction::new(round_half_even(&scaled), limit);
        let deviation = (Fraction::from_integer(BigInt::from(100)) * &approx / value
            - Fraction::from_integer(BigInt::from(100)))
        .abs();
        if deviation > Fraction::from_integer(BigInt::from(max_deviation)) {
            return None;
        }
        (approx, "~")
    } else {
        (value.clone(), "")
    };

    if !proper {
        return Some(format!("{prefix}{}", format_fraction(&value)));
    }

    if value.numer() <= value.denom() {
        return None;
    }
    let major = value.numer() / value.denom();
    let rest = &value - Fraction::from_integer(major.clone());
    if major.is_zero() || rest.is_zero() {
        return None;
    }
    Some(format!("{prefix}{major} {}", format_fraction(&rest)))
}

/// Items for a unit-less answer: the decimal rendering plus, for integers,
/// the hexadecimal, octal and binary renderings enabled in `settings`.
pub fn format_number(quantity: &Number, settings: &Settings) -> Vec<ResultItem> {
    let text = quantity.to_plain_string(settings.output_decimals);
    let mut items = vec![ResultItem::number(text.clone())];

    if let Some(integer) = parse_integer(&text) {
        let sign = if integer.is_negative() { "-" } else { "" };
        let magnitude = integer.magnitude();
        let alternates = [
            (settings.base16, format!("{sign}0x{magnitude:x}")),
            (settings.base8, format!("{sign}0o{magnitude:o}")),
            (settings.base2, format!("{sign}0b{magnitude:b}")),
        ];
        items.extend(
            alternates
                .into_iter()
                .filter(|(enabled, _)| *enabled)
                .map(|(_, rendered)| ResultItem::number(rendered)),
        );
    }

    items
        .into_iter()
        .map(|item| item.with_separator(settings.decimal_separator))
        .collect()
}

fn parse_integer(text: &str) -> Option<BigInt> {
    let digits = text.strip_prefix('-').unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// Items for `quantity` `from` converted into `to`.
///
/// Empty when the magnitudes of source and target quantity differ by more
/// than `settings.max_magnitude` orders.
pub fn format_units(
    registry: &UnitRegistry,
    from: &Unit,
    quantity: &Number,
    to: &Unit,
    settings: &Settings,
) -> Result<Vec<ResultItem>, NumberError> {
    let base = from.to_base(&Scalar::Decimal(quantity.clone()))?;
    let converted = to.from_base(&base)?;
    let converted_decimal = converted.to_number()?;

    let magnitude = quantity.log10_abs();
    let new_magnitude = converted_decimal.log10_abs();
    if magnitude.is_finite()
        && new_magnitude.is_finite()
        && (magnitude - new_magnitude).abs() > settings.max_magnitude as f64 + MAGNITUDE_EPSILON
    {
        debug!(from = %from.id, to = %to.id, magnitude, new_magnitude, "conversion out of magnitude range");
        return Ok(Vec::new());
    }

    let decimals = settings.output_decimals;
    let to_name = to.display_name();
    let decimal = converted_decimal.to_signed_plain_string(decimals);
    let mut value = decimal.clone();
    let mut parts = vec![vec![(to_name.clone(), decimal)]];

    if to.fractional {
        if let Some(exact) = converted.to_fraction() {
            let render = |proper| {
                fraction_to_string(&exact, proper, settings.fraction_limit, settings.max_fraction_deviation)
            };
            if let Some(mixed) = render(true) {
                parts.push(vec![(to_name.clone(), mixed)]);
            }
            if let Some(plain) = render(false) {
                value = plain.clone();
                parts.push(vec![(to_name.clone(), plain)]);
            }
        }
    }

    if let Some(split) = to.split.as_deref().and_then(|id| registry.get(id)) {
        if let Some(exact_base) = split_base(from, &base, decimals) {
            parts.extend(split_parts(to, split, &exact_base, settings)?);
        }
    }

    let left = settings.units_left;
    let head = side(&from.display_name(), &quantity.to_plain_string(decimals), left);
    let mut titles: Vec<String> = Vec::with_capacity(parts.len());
    for part in parts {
        let rendered: Vec<String> = part.iter().map(|(name, q)| side(name, q, left)).collect();
        let title = format!("{head} = {}", rendered.join(" "));
        if !titles.contains(&title) {
            titles.push(title);
        }
    }

    let icon = icon(from, to);
    let autocomplete = format!("{value} {to_name}");
    Ok(titles
        .into_iter()
        .map(|title| {
            ResultItem {
                title,
                value: value.clone(),
                icon: icon.to_string(),
                uid: format!("{} to {}", from.id, to.id),
                autocomplete: Some(autocomplete.clone()),
                from_id: Some(from.id.clone()),
                to_id: Some(to.id.clone()),
            }
            .with_separator(settings.decimal_separator)
        })
        .collect())
}

/// `unit q` or `q unit`
fn side(unit: &str, quantity: &str, units_left: bool) -> String {
    if units_left {
        format!("{unit} {quantity}")
    } else {
        format!("{quantity} {unit}")
    }
}

/// Base quantity as an exact fraction for split rendering. Decimal bases
/// are first quantized to `decimals` places.
fn split_base(from: &Unit, base: &Scalar, decimals: u32) -> Option<Fraction> {
    let exact = base.to_fraction()?;
    if from.fractional || base.is_exact() {
        return Some(exact);
    }
    let scale = pow10(decimals);
    let quantized = round_half_even(&(exact * Fraction::from_integer(scale.clone())));
    Some(Fraction::new(quantized, scale))
}

/// Major/minor renderings, e.g. `[(foot, 9), (inch, 41/8)]` and
/// `[(foot, 9), (inch, 5 1/8)]`
fn split_parts(
    major_unit: &Unit,
    minor_unit: &Unit,
    base: &Fraction,
    settings: &Settings,
) -> Result<Vec<Vec<(String, String)>>, NumberError> {
    let exact_base = Scalar::Exact(base.clone());
    let one = Scalar::Exact(Fraction::one());

    let (Some(major_q), Some(minor_q)) = (
        major_unit.from_base(&exact_base)?.to_fraction(),
        minor_unit.from_base(&exact_base)?.to_fraction(),
    ) else {
        return Ok(Vec::new());
    };
    let major = major_q.trunc();

    let minor = if major.is_zero() {
        minor_q
    } else {
        let (Some(minor_per_base), Some(major_per_base)) = (
            minor_unit.from_base(&one)?.to_fraction(),
            major_unit.from_base(&one)?.to_fraction(),
        ) else {
            return Ok(Vec::new());
        };
        if major_per_base.is_zero() {
            return Ok(Vec::new());
        }
        let divisor = minor_per_base / major_per_base;
        if divisor.is_zero() {
            return Ok(Vec::new());
        }
        &minor_q - &divisor * (&minor_q / &divisor).floor()
    };

    let allowed = minor
        .denom()
        .to_u32()
        .is_some_and(|d| settings.split_denominators.contains(&d));
    if !allowed {
        debug!(unit = %major_unit.id, minor = %format_fraction(&minor), "split remainder not renderable");
        return Ok(Vec::new());
    }

    let major_name = major_unit.display_name();
    let minor_name = minor_unit.display_name();
    let major_text = major.to_integer().to_string();

    let mut parts = vec![vec![
        (major_name.clone(), major_text.clone()),
        (minor_name.clone(), format_fraction(&minor)),
    ]];
    if let Some(mixed) = fraction_to_string(
        &minor,
        true,
        settings.fraction_limit,
        settings.max_fraction_deviation,
    ) {
        parts.push(vec![(major_name, major_text), (minor_name, mixed)]);
    }
    Ok(parts)
}

/// First quantity type of the target, then of the source, with an icon
fn icon(from: &Unit, to: &Unit) -> &'static str {
    to.quantity_types
        .iter()
        .chain(from.quantity_types.iter())
        .find_map(|quantity_type| {
            ICONS
                .iter()
                .find(|(name, _)| name == quantity_type)
                .map(|(_, icon)| *icon)
        })
        .unwrap_or(DEFAULT_ICON)
}
