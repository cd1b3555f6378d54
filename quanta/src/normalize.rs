//! Query normalization
//!
//! An ordered list of pure string passes. Percentage and difference
//! idioms run after the function-alias and foot/inch passes because they
//! consume text those passes produce.

use quanta_eval::{CONSTANTS, RIGHT_TRIMMABLE};
use regex::{Captures, Regex};
use std::sync::LazyLock;

/// A named normalization pass
pub type Pass = (&'static str, fn(&str) -> String);

/// All passes, in application order
pub const PASSES: &[Pass] = &[
    ("strip_currency", strip_currency),
    ("function_aliases", function_aliases),
    ("power_operator", power_operator),
    ("trim", trim),
    ("power_units", power_units),
    ("foot_inch", foot_inch),
    ("percentage_of", percentage_of),
    ("percent_add", percent_add),
    ("percent_off", percent_off),
    ("percent_of", percent_of),
    ("difference", difference),
];

const FUNCTION_ALIASES: &[(&str, &str)] = &[
    ("deg", "degrees"),
    ("rad", "radians"),
    ("ln", "log"),
    ("arccos", "acos"),
    ("arcsin", "asin"),
    ("arctan", "atan"),
];

/// A number as typed in a percentage phrase
const NUM: &str = r"\d+[.,]?\d*";

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid pattern {pattern:?}: {e}"))
}

static FUNCTION_ALIASES_RE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"\b(deg|rad|ln|arccos|arcsin|arctan)\("));

static POWER_UNIT_RE: LazyLock<Regex> = LazyLock::new(|| compile(r"([a-z]+)\^([23])\b"));

static FOOT_INCH_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile(
        r#"(?:(?P<foot>\d+\.?\d*)')?(?P<inch_decimal>\d+[./]?\d*)?(?:[ \-](?P<inch_fraction>\d+[./]\d+)")?(?P<inch>"?)"#,
    )
});

static PERCENTAGE_OF_RE: LazyLock<Regex> =
    LazyLock::new(|| compile(&format!(r"({NUM})\s+(?:is\s+)?percentage of\s+({NUM})")));

static PERCENT_ADD_RE: LazyLock<Regex> =
    LazyLock::new(|| compile(&format!(r"({NUM})\s*([-+])\s*({NUM})%")));

static PERCENT_OFF_RE: LazyLock<Regex> =
    LazyLock::new(|| compile(&format!(r"({NUM})%\s*off\s+(?:of\s+)?({NUM})")));

static PERCENT_OF_RE: LazyLock<Regex> = LazyLock::new(|| compile(r"(?:%|pct|percent)\s+(of\s+)?"));

static DIFFERENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile(&format!(
        r"({NUM})\s+(?:to|from|difference|diff|change)\s+({NUM})"
    ))
});

/// Run every pass over `query`
pub fn normalize(query: &str) -> String {
    PASSES
        .iter()
        .fold(query.to_string(), |text, (_, pass)| pass(&text))
}

/// `$5` → `5`
pub fn strip_currency(text: &str) -> String {
    text.replace('$', "")
}

/// `ln(x)` → `log(x)`, `deg(x)` → `degrees(x)`; only in call position
pub fn function_aliases(text: &str) -> String {
    FUNCTION_ALIASES_RE
        .replace_all(text, |caps: &Captures| {
            let alias = &caps[1];
            let name = FUNCTION_ALIASES
                .iter()
                .find(|(from, _)| *from == alias)
                .map_or(alias, |(_, to)| *to);
            format!("{name}(")
        })
        .into_owned()
}

/// `**` → `^`
pub fn power_operator(text: &str) -> String {
    text.replace("**", "^")
}

/// Drop dangling operators and surrounding whitespace
pub fn trim(text: &str) -> String {
    text.trim_end_matches(RIGHT_TRIMMABLE).trim().to_string()
}

/// `m^2` → `m2`, so unit exponents do not read as arithmetic.
/// Constants keep their power: `pi^2` stays arithmetic.
pub fn power_units(text: &str) -> String {
    POWER_UNIT_RE
        .replace_all(text, |caps: &Captures| {
            if CONSTANTS.contains(&&caps[1]) {
                caps[0].to_string()
            } else {
                format!("{}{}", &caps[1], &caps[2])
            }
        })
        .into_owned()
}

/// `4'2-1/4"` → `4*12+2+1/4 inch`.
///
/// Only the first match is considered, and a match without feet, a
/// fractional inch part or a closing quote is left as typed so a bare
/// number is never taken for inches.
pub fn foot_inch(text: &str) -> String {
    FOOT_INCH_RE
        .replacen(text, 1, |caps: &Captures| {
            let foot = caps.name("foot").map(|m| m.as_str());
            let decimal = caps.name("inch_decimal").map(|m| m.as_str());
            let fraction = caps.name("inch_fraction").map(|m| m.as_str());
            let quoted = caps.name("inch").is_some_and(|m| !m.as_str().is_empty());

            if foot.is_none() && fraction.is_none() && !quoted {
                return caps[0].to_string();
            }

            let parts: Vec<String> = [
                foot.map(|f| format!("{f}*12")),
                decimal.map(str::to_string),
                fraction.map(str::to_string),
            ]
            .into_iter()
            .flatten()
            .collect();
            format!("{} inch", parts.join("+"))
        })
        .into_owned()
}

/// `5 percentage of 20` → `5/20*100 percent`
pub fn percentage_of(text: &str) -> String {
    PERCENTAGE_OF_RE
        .replace_all(text, "${1}/${2}*100 percent")
        .into_owned()
}

/// `10 + 5%` → `10 + 10*5*0.01`
pub fn percent_add(text: &str) -> String {
    PERCENT_ADD_RE
        .replace_all(text, "${1} ${2} ${1}*${3}*0.01")
        .into_owned()
}

/// `20% off 50` → `50 - 20*50*0.01`
pub fn percent_off(text: &str) -> String {
    PERCENT_OFF_RE
        .replace_all(text, "${2} - ${1}*${2}*0.01")
        .into_owned()
}

/// `20% of 50` → `20*0.01*50`, `20% x` → `20*0.01 x`
pub fn percent_of(text: &str) -> String {
    PERCENT_OF_RE
        .replace_all(text, |caps: &Captures| {
            if caps.get(1).is_some() {
                "*0.01*"
            } else {
                "*0.01 "
            }
        })
        .into_owned()
}

/// `10 to 15` → `((15/10)-1) * 100 percent`
pub fn difference(text: &str) -> String {
    DIFFERENCE_RE
        .replace_all(text, "((${2}/${1})-1) * 100 percent")
        .into_owned()
}
