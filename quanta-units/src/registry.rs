//! Unit registry
//!
//! `UnitRegistryBuilder` accumulates units; `build()` freezes them into an
//! immutable `UnitRegistry` with every lookup index materialized. The
//! finished registry is `Send + Sync` and never mutated, so it can be
//! shared by any number of concurrent lookups.

use crate::{aliases, RegistryError, Unit, UnknownUnit};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::{debug, info, warn};

/// Accumulates units before the registry is frozen
#[derive(Debug, Default)]
pub struct UnitRegistryBuilder {
    units: Vec<Unit>,
    positions: HashMap<String, usize>,
}

impl UnitRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a unit, deriving its spelling aliases. Registering an id again
    /// replaces the earlier unit.
    pub fn register(&mut self, mut unit: Unit) -> Result<(), RegistryError> {
        unit.validate()?;
        unit.aliases.extend(aliases::derive(&unit.id, &unit.name));

        match self.positions.get(&unit.id) {
            Some(&index) => {
                debug!(id = %unit.id, "replacing unit");
                self.units[index] = unit;
            }
            None => {
                self.positions.insert(unit.id.clone(), self.units.len());
                self.units.push(unit);
            }
        }
        Ok(())
    }

    pub fn with_unit(mut self, unit: Unit) -> Result<Self, RegistryError> {
        self.register(unit)?;
        Ok(self)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.positions.contains_key(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Unit> {
        let index = *self.positions.get(id)?;
        self.units.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Freeze into a read-only registry.
    ///
    /// Every base unit and split unit a unit refers to must be registered.
    pub fn build(self) -> Result<UnitRegistry, RegistryError> {
        for unit in &self.units {
            if let Some(base) = &unit.base_unit {
                if !self.contains(base) {
                    return Err(RegistryError::UnknownBase {
                        unit: unit.id.clone(),
                        base: base.clone(),
                    });
                }
            }
            if let Some(split) = &unit.split {
                if !self.contains(split) {
                    return Err(RegistryError::UnknownSplit {
                        unit: unit.id.clone(),
                        split: split.clone(),
                    });
                }
            }
        }

        let mut registry = UnitRegistry {
            units: self.units,
            by_name: HashMap::new(),
            by_alias: HashMap::new(),
            by_lower_alias: HashMap::new(),
            by_id: HashMap::new(),
            by_quantity_type: BTreeMap::new(),
        };

        // Later registrations win on shared keys
        for (index, unit) in registry.units.iter().enumerate() {
            registry.by_id.insert(unit.id.clone(), index);
            registry.by_name.insert(unit.name.clone(), index);
            for alias in &unit.aliases {
                registry.by_alias.insert(alias.clone(), index);
                registry.by_lower_alias.insert(alias.to_lowercase(), index);
            }
            for quantity_type in &unit.quantity_types {
                registry
                    .by_quantity_type
                    .entry(quantity_type.clone())
                    .or_default()
                    .push(index);
            }
        }

        for (quantity_type, members) in &registry.by_quantity_type {
            let bases = members.iter().filter(|&&i| registry.units[i].is_base()).count();
            if bases != 1 {
                warn!(quantity_type = %quantity_type, bases, "quantity type should have exactly one base unit");
            }
        }

        info!(
            units = registry.units.len(),
            aliases = registry.by_alias.len(),
            quantity_types = registry.by_quantity_type.len(),
            "unit registry built"
        );
        Ok(registry)
    }
}

/// Immutable index of units by name, alias, id and quantity type
#[derive(Debug, Clone)]
pub struct UnitRegistry {
    units: Vec<Unit>,
    by_name: HashMap<String, usize>,
    by_alias: HashMap<String, usize>,
    by_lower_alias: HashMap<String, usize>,
    by_id: HashMap<String, usize>,
    by_quantity_type: BTreeMap<String, Vec<usize>>,
}

impl UnitRegistry {
    pub fn builder() -> UnitRegistryBuilder {
        UnitRegistryBuilder::new()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// All units in registration order
    pub fn units(&self) -> impl Iterator<Item = &Unit> {
        self.units.iter()
    }

    /// Unit by id
    pub fn get(&self, id: &str) -> Option<&Unit> {
        self.by_id.get(id).map(|&i| &self.units[i])
    }

    /// Find a unit by name or alias.
    ///
    /// Lookup order, first hit wins: exact name, exact alias, alias equal
    /// to the lowercased input, then the case-insensitive alias index.
    pub fn resolve(&self, name: &str) -> Result<&Unit, UnknownUnit> {
        let lower = name.to_lowercase();
        self.by_name
            .get(name)
            .or_else(|| self.by_alias.get(name))
            .or_else(|| self.by_alias.get(&lower))
            .or_else(|| self.by_lower_alias.get(&lower))
            .map(|&i| &self.units[i])
            .ok_or_else(|| UnknownUnit(name.to_string()))
    }

    /// Quantity type labels, sorted
    pub fn quantity_types(&self) -> impl Iterator<Item = &str> {
        self.by_quantity_type.keys().map(String::as_str)
    }

    /// The base unit of a quantity type, if it has exactly one
    pub fn base_unit(&self, quantity_type: &str) -> Option<&Unit> {
        let mut bases = self
            .by_quantity_type
            .get(quantity_type)?
            .iter()
            .map(|&i| &self.units[i])
            .filter(|u| u.is_base());
        let base = bases.next()?;
        match bases.next() {
            Some(_) => None,
            None => Some(base),
        }
    }

    /// Units sharing any quantity type with `from`, ordered by
    /// (id length, name). A keyword keeps only units whose name or id
    /// contains it or whose aliases include it; when nothing matches,
    /// units whose id appears inside one of their own aliases are kept.
    pub fn compatible_units(&self, from: &Unit, keyword: Option<&str>) -> Vec<&Unit> {
        let indices: BTreeSet<usize> = from
            .quantity_types
            .iter()
            .filter_map(|t| self.by_quantity_type.get(t))
            .flatten()
            .copied()
            .collect();

        let mut candidates: Vec<&Unit> = indices.into_iter().map(|i| &self.units[i]).collect();
        candidates.sort_by(|a, b| (a.id.len(), &a.name).cmp(&(b.id.len(), &b.name)));

        let Some(keyword) = keyword.filter(|k| !k.is_empty()) else {
            return candidates;
        };

        let matching: Vec<&Unit> = candidates
            .iter()
            .copied()
            .filter(|u| u.name.contains(keyword) || u.id.contains(keyword) || u.aliases.contains(keyword))
            .collect();
        if !matching.is_empty() {
            return matching;
        }

        debug!(keyword, "no target matches keyword, trying id-in-alias fallback");
        candidates
            .into_iter()
            .filter(|u| u.aliases.iter().any(|alias| alias.contains(u.id.as_str())))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConversionParams;
    use quanta_core::Number;

    fn num(s: &str) -> Number {
        Number::from_str(s).unwrap()
    }

    fn length_registry() -> UnitRegistry {
        UnitRegistry::builder()
            .with_unit(Unit::new("m", "metre").with_quantity_type("length"))
            .unwrap()
            .with_unit(
                Unit::new("km", "kilometre")
                    .with_quantity_type("length")
                    .with_base("m", ConversionParams::factor(num("1000"))),
            )
            .unwrap()
            .with_unit(
                Unit::new("cm", "centimetre")
                    .with_quantity_type("length")
                    .with_base("m", ConversionParams::factor(num("0.01"))),
            )
            .unwrap()
            .with_unit(
                Unit::new("ft", "foot")
                    .with_quantity_type("length")
                    .with_fraction("m", num("3048"), num("10000"))
                    .with_split("in"),
            )
            .unwrap()
            .with_unit(
                Unit::new("in", "inch")
                    .with_quantity_type("length")
                    .with_fraction("m", num("254"), num("10000")),
            )
            .unwrap()
            .with_unit(Unit::new("s", "second").with_quantity_type("time"))
            .unwrap()
            .build()
            .unwrap()
    }

    #[test]
    fn test_resolve_order() {
        let registry = length_registry();
        assert_eq!(registry.resolve("metre").unwrap().id, "m");
        assert_eq!(registry.resolve("meters").unwrap().id, "m");
        assert_eq!(registry.resolve("KM").unwrap().id, "km");
        assert_eq!(registry.resolve("feet").unwrap().id, "ft");
        assert_eq!(registry.resolve("\"").unwrap().id, "in");
        assert_eq!(
            registry.resolve("parsec"),
            Err(UnknownUnit("parsec".to_string()))
        );
    }

    #[test]
    fn test_exact_alias_beats_lowercase() {
        let registry = UnitRegistry::builder()
            .with_unit(Unit::new("F", "farad").with_quantity_type("capacitance"))
            .unwrap()
            .with_unit(Unit::new("degF", "degree Fahrenheit").with_quantity_type("temperature"))
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(registry.resolve("F").unwrap().id, "F");
        assert_eq!(registry.resolve("f").unwrap().id, "degF");
    }

    #[test]
    fn test_last_registration_wins_on_shared_alias() {
        let registry = UnitRegistry::builder()
            .with_unit(Unit::new("kbit", "kilobit").with_alias("kb"))
            .unwrap()
            .with_unit(Unit::new("kbyte", "kilobyte").with_alias("kb"))
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(registry.resolve("kb").unwrap().id, "kbyte");
    }

    #[test]
    fn test_reregistering_replaces() {
        let registry = UnitRegistry::builder()
            .with_unit(Unit::new("x", "first"))
            .unwrap()
            .with_unit(Unit::new("x", "second"))
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("x").unwrap().name, "second");
    }

    #[test]
    fn test_compatible_units_ordering() {
        let registry = length_registry();
        let m = registry.get("m").unwrap();
        let ids: Vec<&str> = registry.compatible_units(m, None).iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, vec!["m", "cm", "ft", "in", "km"]);
    }

    #[test]
    fn test_compatible_units_keyword() {
        let registry = length_registry();
        let m = registry.get("m").unwrap();
        let ids: Vec<&str> = registry
            .compatible_units(m, Some("cm"))
            .iter()
            .map(|u| u.id.as_str())
            .collect();
        assert_eq!(ids, vec!["cm"]);

        let feet: Vec<&str> = registry
            .compatible_units(m, Some("feet"))
            .iter()
            .map(|u| u.id.as_str())
            .collect();
        assert_eq!(feet, vec!["ft"]);
    }

    #[test]
    fn test_compatible_units_keyword_fallback() {
        let registry = length_registry();
        let m = registry.get("m").unwrap();
        // Nothing contains "zz": every unit's id is one of its own aliases
        let fallback = registry.compatible_units(m, Some("zz"));
        assert_eq!(fallback.len(), 5);
    }

    #[test]
    fn test_incompatible_types_are_excluded() {
        let registry = length_registry();
        let s = registry.get("s").unwrap();
        let ids: Vec<&str> = registry.compatible_units(s, None).iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, vec!["s"]);
    }

    #[test]
    fn test_base_unit() {
        let registry = length_registry();
        assert_eq!(registry.base_unit("length").unwrap().id, "m");
        assert!(registry.base_unit("mass").is_none());
        assert_eq!(registry.quantity_types().collect::<Vec<_>>(), vec!["length", "time"]);
    }

    #[test]
    fn test_build_rejects_unknown_split() {
        let err = UnitRegistry::builder()
            .with_unit(Unit::new("ft", "foot").with_split("in"))
            .unwrap()
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::UnknownSplit {
                unit: "ft".to_string(),
                split: "in".to_string()
            }
        );
    }

    #[test]
    fn test_build_rejects_unknown_base() {
        let err = UnitRegistry::builder()
            .with_unit(Unit::new("km", "kilometre").with_base("m", ConversionParams::factor(num("1000"))))
            .unwrap()
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::UnknownBase {
                unit: "km".to_string(),
                base: "m".to_string()
            }
        );
        assert_eq!(err.to_string(), "unit km is defined against unregistered base unit m");
    }

    #[test]
    fn test_register_rejects_affine_fraction() {
        let mut unit = Unit::new("in", "inch").with_fraction("m", num("254"), num("10000"));
        unit.params.d = num("1");
        let err = UnitRegistry::builder().with_unit(unit).unwrap_err();
        assert_eq!(err, RegistryError::AffineFraction("in".to_string()));
    }

    #[test]
    fn test_registry_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<UnitRegistry>();
    }
}
