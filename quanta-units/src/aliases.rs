//! Alias derivation
//!
//! A declarative table maps a key (a fragment of a unit id or name) to
//! spelling variants. The table is expanded once by a second table of
//! generic spellings (feet/ft, metres/meters, sq/square, ...) and every
//! registered unit then derives its aliases from it.

use std::collections::BTreeSet;
use std::sync::LazyLock;

/// Key → spelling variants. The key itself is always a variant too.
const ANNOTATION_REPLACEMENTS: &[(&str, &[&str])] = &[
    ("litre", &["liter", "liters", "l"]),
    ("metre", &["meter", "m"]),
    ("m2", &["meter^2"]),
    ("dm", &["decimeter"]),
    ("dm2", &["dm^2", "decimeter^2"]),
    ("dm3", &["dm^3", "decimeter^3"]),
    ("cm", &["centimeter"]),
    ("cm2", &["cm^2", "centimeter^2"]),
    ("cm3", &["cm^3", "centimeter^3"]),
    ("mm", &["milimeter"]),
    ("mm2", &["mm^2", "milimeter^2"]),
    ("mm3", &["mm^3", "milimeter^3"]),
    ("degF", &["f", "fahrenheit", "farhenheit", "farenheit"]),
    ("degC", &["c", "celsius", "celcius"]),
    ("byte", &["B", "bytes"]),
    ("bit", &["b", "bits"]),
    ("kbyte", &["KB", "kB", "kb", "kilobyte"]),
    ("Mbyte", &["MB", "megabyte"]),
    ("ozm", &["oz", "ounce", "ounces"]),
    ("lbm", &["lb", "lbs", "pound", "pounds"]),
    ("miPh", &["mph"]),
    ("ftPh", &["fps"]),
    ("foot", &["'"]),
    ("square", &["sq"]),
    ("ft2", &["ft^2", "foot^2"]),
    ("ft3", &["ft^3", "foot^3"]),
    ("inch", &["inches", "\""]),
    ("inch2", &["inch^2", "square inch"]),
    ("inch3", &["inch^3", "cube inch"]),
    ("flozUS", &["flus", "floz", "fl", "fl oz", "fl oz uk"]),
    ("flozUK", &["fluk", "fl oz uk", "fl uk"]),
];

/// Generic spellings applied to every variant above, in this order
const EXPANSIONS: &[(&str, &[&str])] = &[
    ("foot", &["feet", "ft"]),
    ("mili", &["milli"]),
    ("meter", &["metres", "meter", "meters"]),
    ("^2", &["sq", "square"]),
    ("^3", &["cube", "cubed"]),
];

/// Name fragments rewritten for display, first match only
const LOCALIZED: &[(&str, &str)] = &[("metre", "meter"), ("litre", "liter")];

/// The replacement table with every key's variants expanded and sorted
pub static REPLACEMENTS: LazyLock<Vec<(&'static str, Vec<String>)>> = LazyLock::new(|| {
    ANNOTATION_REPLACEMENTS
        .iter()
        .map(|(key, variants)| (*key, expand_variants(key, variants)))
        .collect()
});

/// Variants of `key` including the key, with every expansion applied
pub fn expand_variants(key: &str, variants: &[&str]) -> Vec<String> {
    let mut items: BTreeSet<String> = variants.iter().map(|v| v.to_string()).collect();
    items.insert(key.to_string());

    for (fragment, expansions) in EXPANSIONS {
        for expansion in *expansions {
            let snapshot: Vec<String> = items.iter().cloned().collect();
            for item in snapshot {
                items.insert(item.replace(fragment, expansion));
            }
        }
    }

    items.into_iter().collect()
}

/// Aliases derived for a unit from its id and display name.
///
/// For each key found in the name the name is rewritten with every
/// variant; otherwise a key found in the id rewrites the id.
pub fn derive(id: &str, name: &str) -> Vec<String> {
    let mut derived = Vec::new();
    for (key, variants) in REPLACEMENTS.iter() {
        for variant in variants {
            if name.contains(key) {
                derived.push(name.replace(key, variant));
            } else if id.contains(key) {
                derived.push(id.replace(key, variant));
            }
        }
    }
    derived
}

/// metre → meter, litre → liter
pub fn localize(name: &str) -> String {
    for (from, to) in LOCALIZED {
        if name.contains(from) {
            return name.replace(from, to);
        }
    }
    name.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expansion_includes_key_and_generic_spellings() {
        let variants = expand_variants("ft2", &["ft^2", "foot^2"]);
        for expected in ["ft2", "ft^2", "foot^2", "feet^2", "ftsq", "footsquare", "feetsq"] {
            assert!(variants.contains(&expected.to_string()), "missing {expected}");
        }
        let mut sorted = variants.clone();
        sorted.sort();
        assert_eq!(variants, sorted);
    }

    #[test]
    fn test_metre_variants() {
        let variants = expand_variants("metre", &["meter", "m"]);
        assert_eq!(variants, vec!["m", "meter", "meters", "metre", "metres"]);
    }

    #[test]
    fn test_derive_from_name() {
        let derived = derive("m", "metre");
        for expected in ["meter", "meters", "metres", "m"] {
            assert!(derived.contains(&expected.to_string()), "missing {expected}");
        }
    }

    #[test]
    fn test_derive_from_id_when_name_lacks_key() {
        let derived = derive("degF", "degree Fahrenheit");
        for expected in ["f", "fahrenheit", "farenheit", "degF"] {
            assert!(derived.contains(&expected.to_string()), "missing {expected}");
        }
        assert!(derive("cm", "centimetre").contains(&"centimeter".to_string()));
    }

    #[test]
    fn test_derive_nothing_for_unrelated_unit() {
        assert!(derive("s", "second").is_empty());
    }

    #[test]
    fn test_localize() {
        assert_eq!(localize("millimetres"), "millimeters");
        assert_eq!(localize("litre"), "liter");
        assert_eq!(localize("kilogram"), "kilogram");
    }
}
