//! Unit registry and builder
//!
//! Every unit lives in one [`UnitRegistry`], assembled by a
//! [`RegistryBuilder`] and published through the [`UNITS`] static. The
//! builder validates the whole catalog up front: ladder units must sit
//! on a registered scale, every scale must name a base step backed by
//! a registered unit, and derived patterns must be unambiguous. After
//! that, conversion never discovers a half-registered dimension.

use std::collections::HashMap;
use std::sync::LazyLock;

use stratus_core::text::{closest_match, fold_key};
use stratus_core::{PropertyOverrides, MATCH_FLOOR};
use tracing::debug;

use crate::catalog;
use crate::derived::DerivedSpec;
use crate::dimension::{Dimension, UnitSystem};
use crate::scale::Scale;
use crate::unit::{Unit, UnitError, UnitKind};

/// The built-in catalog, built on first touch.
pub static UNITS: LazyLock<UnitRegistry> = LazyLock::new(|| {
    catalog::builtin()
        .build()
        .expect("built-in unit catalog is valid")
});

/// Registry of units, scales, and derived patterns.
#[derive(Debug, Clone, Default)]
pub struct UnitRegistry {
    units: HashMap<String, Unit>,
    aliases: HashMap<String, String>,
    folded: HashMap<String, String>,
    scales: HashMap<(Dimension, UnitSystem), Scale>,
    derived: Vec<DerivedSpec>,
}

impl UnitRegistry {
    // ========== Lookup ==========

    /// Exact symbol lookup.
    pub fn get(&self, symbol: &str) -> Option<&Unit> {
        self.units.get(symbol)
    }

    /// Resolve a token: exact symbol, declared alias, case- and
    /// punctuation-folded name, then fuzzy match above the similarity
    /// floor. A miss is `None`, never a guess below the floor.
    pub fn resolve(&self, token: &str) -> Option<&Unit> {
        if let Some(unit) = self.units.get(token) {
            return Some(unit);
        }
        if let Some(symbol) = self.aliases.get(token) {
            return self.units.get(symbol);
        }
        let folded = fold_key(token);
        if let Some(symbol) = self.folded.get(&folded) {
            return self.units.get(symbol);
        }
        let (best, score) = closest_match(
            &folded,
            self.folded.keys().map(|key| key.as_str()),
            MATCH_FLOOR,
        )?;
        debug!(token, matched = best, score, "fuzzy unit resolution");
        let symbol = self.folded.get(best)?;
        self.units.get(symbol)
    }

    /// All units registered under a dimension.
    pub fn subtypes_of(&self, dimension: Dimension) -> Vec<&Unit> {
        let mut units: Vec<&Unit> = self
            .units
            .values()
            .filter(|unit| unit.dimension == dimension)
            .collect();
        units.sort_by(|a, b| a.name.cmp(&b.name));
        units
    }

    pub fn scale_for(&self, dimension: Dimension, system: UnitSystem) -> Option<&Scale> {
        self.scales.get(&(dimension, system))
    }

    /// The designated base unit for a (dimension, system) pair.
    pub fn base_unit(&self, dimension: Dimension, system: UnitSystem) -> Result<&Unit, UnitError> {
        let missing = UnitError::NoBaseUnit { dimension, system };
        let scale = self
            .scale_for(dimension, system)
            .ok_or_else(|| missing.clone())?;
        let base = scale.base_index().ok_or_else(|| missing.clone())?;
        let name = &scale.steps()[base].name;
        self.named_unit(dimension, system, name).ok_or(missing)
    }

    /// Ladder unit at `position` on the pair's scale.
    pub(crate) fn unit_at(
        &self,
        dimension: Dimension,
        system: UnitSystem,
        position: usize,
    ) -> Option<&Unit> {
        let scale = self.scale_for(dimension, system)?;
        let name = &scale.step(position)?.name;
        self.named_unit(dimension, system, name)
    }

    fn named_unit(&self, dimension: Dimension, system: UnitSystem, name: &str) -> Option<&Unit> {
        self.units
            .values()
            .find(|unit| unit.dimension == dimension && unit.system == system && unit.name == name)
    }

    pub fn derived_specs(&self) -> &[DerivedSpec] {
        &self.derived
    }

    /// Most specific derived pattern for a numerator/denominator pair:
    /// exact pair beats fixed-denominator beats fixed-numerator beats
    /// the unconstrained entry. Build-time validation guarantees at
    /// most one pattern per rank.
    pub fn resolve_derived(&self, numerator: &Unit, denominator: &Unit) -> Option<&DerivedSpec> {
        self.derived
            .iter()
            .filter_map(|spec| spec.rank(numerator, denominator).map(|rank| (rank, spec)))
            .min_by_key(|(rank, _)| *rank)
            .map(|(_, spec)| spec)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    // ========== Conversion ==========

    /// Convert a magnitude between two units of one dimension.
    ///
    /// Siblings go through the scale ladder, variants through their
    /// fixed factor against the base, and cross-system cousins pivot
    /// through both base units and the dimension's anchor formula.
    pub fn convert(&self, value: f64, from: &Unit, to: &Unit) -> Result<f64, UnitError> {
        self.convert_inner(value, from, to, false)
    }

    /// Convert a difference between readings: factors apply, offsets
    /// do not (a 10 °C drop is an 18 °F drop).
    pub fn convert_delta(&self, value: f64, from: &Unit, to: &Unit) -> Result<f64, UnitError> {
        self.convert_inner(value, from, to, true)
    }

    fn convert_inner(&self, value: f64, from: &Unit, to: &Unit, delta: bool) -> Result<f64, UnitError> {
        if !from.is_compatible(to) {
            return Err(UnitError::incompatible(from, to));
        }
        if from.symbol == to.symbol {
            return Ok(value);
        }
        if from.system == to.system {
            return self.convert_within(value, from, to, delta);
        }

        let anchor = from
            .dimension
            .cross_anchor()
            .ok_or(UnitError::NoBaseUnit {
                dimension: from.dimension,
                system: to.system,
            })?;
        let base_value = self.to_base_value(value, from, delta)?;
        let crossed = match (from.system, to.system) {
            (UnitSystem::Metric, UnitSystem::Imperial) if delta => {
                anchor.delta_to_imperial(base_value)
            }
            (UnitSystem::Metric, UnitSystem::Imperial) => anchor.to_imperial(base_value),
            (UnitSystem::Imperial, UnitSystem::Metric) if delta => {
                anchor.delta_to_metric(base_value)
            }
            (UnitSystem::Imperial, UnitSystem::Metric) => anchor.to_metric(base_value),
            _ => {
                return Err(UnitError::NoBaseUnit {
                    dimension: from.dimension,
                    system: to.system,
                })
            }
        };
        let target_base = self.base_unit(to.dimension, to.system)?;
        self.convert_within(crossed, target_base, to, delta)
    }

    fn convert_within(&self, value: f64, from: &Unit, to: &Unit, delta: bool) -> Result<f64, UnitError> {
        let base = self.to_base_value(value, from, delta)?;
        self.from_base_value(base, to, delta)
    }

    fn to_base_value(&self, value: f64, unit: &Unit, delta: bool) -> Result<f64, UnitError> {
        match unit.kind {
            UnitKind::Ladder { position } => {
                let factor = self.base_factor(unit, position)?;
                Ok(value * factor)
            }
            UnitKind::Variant { factor, offset } => {
                if delta {
                    Ok(value * factor)
                } else {
                    Ok(value * factor + offset)
                }
            }
        }
    }

    fn from_base_value(&self, value: f64, unit: &Unit, delta: bool) -> Result<f64, UnitError> {
        match unit.kind {
            UnitKind::Ladder { position } => {
                let factor = self.base_factor(unit, position)?;
                Ok(value / factor)
            }
            UnitKind::Variant { factor, offset } => {
                if delta {
                    Ok(value / factor)
                } else {
                    Ok((value - offset) / factor)
                }
            }
        }
    }

    fn base_factor(&self, unit: &Unit, position: usize) -> Result<f64, UnitError> {
        let missing = UnitError::NoBaseUnit {
            dimension: unit.dimension,
            system: unit.system,
        };
        self.scale_for(unit.dimension, unit.system)
            .and_then(|scale| scale.to_base(position))
            .ok_or(missing)
    }
}

/// Assembles a [`UnitRegistry`]. Registrations are last-wins;
/// validation happens once in [`RegistryBuilder::build`].
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    units: Vec<Unit>,
    scales: Vec<(Dimension, UnitSystem, Scale)>,
    derived: Vec<DerivedSpec>,
    properties: PropertyOverrides,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        RegistryBuilder::default()
    }

    /// Register the scale for a (dimension, system) pair.
    pub fn scale(mut self, dimension: Dimension, system: UnitSystem, scale: Scale) -> Self {
        self.scales.push((dimension, system, scale));
        self
    }

    /// Register a unit. A repeated symbol overwrites the earlier entry.
    pub fn unit(mut self, unit: Unit) -> Self {
        self.units.push(unit);
        self
    }

    /// Register a derived pattern.
    pub fn derived(mut self, spec: DerivedSpec) -> Self {
        self.derived.push(spec);
        self
    }

    /// Display overrides applied per size class and per unit name.
    pub fn properties(mut self, overrides: PropertyOverrides) -> Self {
        self.properties = overrides;
        self
    }

    pub fn build(self) -> Result<UnitRegistry, UnitError> {
        let mut scales: HashMap<(Dimension, UnitSystem), Scale> = HashMap::new();
        for (dimension, system, scale) in self.scales {
            if scale.base_index().is_none() {
                return Err(UnitError::NoBaseUnit { dimension, system });
            }
            scales.insert((dimension, system), scale);
        }

        let mut units: HashMap<String, Unit> = HashMap::new();
        for mut unit in self.units {
            if let UnitKind::Ladder { .. } = unit.kind {
                let scale = scales.get(&(unit.dimension, unit.system)).ok_or(
                    UnitError::NoBaseUnit {
                        dimension: unit.dimension,
                        system: unit.system,
                    },
                )?;
                let position = scale
                    .position(&unit.name)
                    .ok_or_else(|| UnitError::UnknownUnit(unit.name.clone()))?;
                unit.kind = UnitKind::Ladder { position };
            }
            if let Some(spec) = self.properties.get(unit.display.size.name()) {
                unit.display.apply_overrides(spec)?;
            }
            if let Some(spec) = self.properties.get(&unit.name) {
                unit.display.apply_overrides(spec)?;
            }
            units.insert(unit.symbol.clone(), unit);
        }

        // Every scale's base step needs a registered unit; cousin
        // conversions pivot through it.
        for ((dimension, system), scale) in &scales {
            let base = scale
                .base_index()
                .expect("checked when the scale was inserted");
            let name = &scale.steps()[base].name;
            let backed = units
                .values()
                .any(|u| u.dimension == *dimension && u.system == *system && u.name == *name);
            if !backed {
                return Err(UnitError::NoBaseUnit {
                    dimension: *dimension,
                    system: *system,
                });
            }
        }

        // Variant factors are anchored to a base unit.
        for unit in units.values() {
            if let UnitKind::Variant { .. } = unit.kind {
                let anchored = scales
                    .get(&(unit.dimension, unit.system))
                    .and_then(|scale| scale.base_index())
                    .is_some();
                if !anchored {
                    return Err(UnitError::NoBaseUnit {
                        dimension: unit.dimension,
                        system: unit.system,
                    });
                }
            }
        }

        // Reject ambiguous derived patterns at registration.
        let mut derived: Vec<DerivedSpec> = Vec::new();
        for spec in self.derived {
            if let Some(existing) = derived.iter().find(|seen| seen.same_pattern(&spec)) {
                return Err(UnitError::AmbiguousDerived {
                    numerator: spec.numerator_pattern(),
                    denominator: spec.denominator_pattern(),
                    existing: existing.name.clone(),
                });
            }
            derived.push(spec);
        }

        let mut aliases: HashMap<String, String> = HashMap::new();
        let mut folded: HashMap<String, String> = HashMap::new();
        for unit in units.values() {
            folded.insert(fold_key(&unit.symbol), unit.symbol.clone());
            folded.insert(fold_key(&unit.name), unit.symbol.clone());
            for alias in &unit.aliases {
                aliases.insert(alias.clone(), unit.symbol.clone());
                folded.insert(fold_key(alias), unit.symbol.clone());
            }
        }

        debug!(
            units = units.len(),
            scales = scales.len(),
            derived = derived.len(),
            "unit registry built"
        );

        Ok(UnitRegistry {
            units,
            aliases,
            folded,
            scales,
            derived,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scale::ScaleStep;
    use approx::assert_relative_eq;

    fn metric_scale() -> Scale {
        Scale::new(
            vec![
                ScaleStep::new("Millimeter", 1.0),
                ScaleStep::new("Centimeter", 10.0),
                ScaleStep::new("Meter", 100.0),
                ScaleStep::new("Kilometer", 1000.0),
            ],
            "Meter",
        )
    }

    fn imperial_scale() -> Scale {
        Scale::new(
            vec![
                ScaleStep::new("Inch", 1.0),
                ScaleStep::new("Foot", 12.0),
            ],
            "Foot",
        )
    }

    fn small_registry() -> UnitRegistry {
        RegistryBuilder::new()
            .scale(Dimension::Length, UnitSystem::Metric, metric_scale())
            .scale(Dimension::Length, UnitSystem::Imperial, imperial_scale())
            .unit(Unit::ladder(
                "Millimeter",
                "mm",
                Dimension::Length,
                UnitSystem::Metric,
            ))
            .unit(Unit::ladder(
                "Centimeter",
                "cm",
                Dimension::Length,
                UnitSystem::Metric,
            ))
            .unit(
                Unit::ladder("Meter", "m", Dimension::Length, UnitSystem::Metric)
                    .alias("metre"),
            )
            .unit(Unit::ladder(
                "Kilometer",
                "km",
                Dimension::Length,
                UnitSystem::Metric,
            ))
            .unit(Unit::ladder(
                "Inch",
                "in",
                Dimension::Length,
                UnitSystem::Imperial,
            ))
            .unit(Unit::ladder(
                "Foot",
                "ft",
                Dimension::Length,
                UnitSystem::Imperial,
            ))
            .build()
            .unwrap()
    }

    #[test]
    fn test_resolve_chain() {
        let registry = small_registry();
        assert_eq!(registry.resolve("m").unwrap().name, "Meter");
        assert_eq!(registry.resolve("metre").unwrap().name, "Meter");
        assert_eq!(registry.resolve("KM").unwrap().name, "Kilometer");
        assert_eq!(registry.resolve("milimeter").unwrap().name, "Millimeter");
        assert!(registry.resolve("furlong").is_none());
    }

    #[test]
    fn test_last_registration_wins() {
        let registry = RegistryBuilder::new()
            .scale(Dimension::Length, UnitSystem::Metric, metric_scale())
            .unit(Unit::ladder("Meter", "m", Dimension::Length, UnitSystem::Metric).precision(1))
            .unit(Unit::ladder("Meter", "m", Dimension::Length, UnitSystem::Metric).precision(3))
            .build()
            .unwrap();
        assert_eq!(registry.get("m").unwrap().display.precision, 3);
    }

    #[test]
    fn test_missing_base_fails_fast() {
        let err = RegistryBuilder::new()
            .scale(
                Dimension::Length,
                UnitSystem::Metric,
                Scale::new(vec![ScaleStep::new("Millimeter", 1.0)], "Meter"),
            )
            .build()
            .unwrap_err();
        assert!(matches!(err, UnitError::NoBaseUnit { .. }));
    }

    #[test]
    fn test_unbacked_base_step_fails_fast() {
        // The scale names Meter as base but only Millimeter registers.
        let err = RegistryBuilder::new()
            .scale(Dimension::Length, UnitSystem::Metric, metric_scale())
            .unit(Unit::ladder(
                "Millimeter",
                "mm",
                Dimension::Length,
                UnitSystem::Metric,
            ))
            .build()
            .unwrap_err();
        assert!(matches!(err, UnitError::NoBaseUnit { .. }));
    }

    #[test]
    fn test_ladder_unit_off_its_scale_fails_fast() {
        let err = RegistryBuilder::new()
            .scale(Dimension::Length, UnitSystem::Metric, metric_scale())
            .unit(Unit::ladder("Meter", "m", Dimension::Length, UnitSystem::Metric))
            .unit(Unit::ladder(
                "Furlong",
                "fur",
                Dimension::Length,
                UnitSystem::Metric,
            ))
            .build()
            .unwrap_err();
        assert!(matches!(err, UnitError::UnknownUnit(name) if name == "Furlong"));
    }

    #[test]
    fn test_ambiguous_derived_rejected() {
        let err = RegistryBuilder::new()
            .derived(DerivedSpec::new("wind", Dimension::Length, Dimension::Time))
            .derived(DerivedSpec::new("speed", Dimension::Length, Dimension::Time))
            .build()
            .unwrap_err();
        assert!(matches!(err, UnitError::AmbiguousDerived { existing, .. } if existing == "wind"));
    }

    #[test]
    fn test_distinct_fixed_patterns_coexist() {
        let registry = RegistryBuilder::new()
            .derived(DerivedSpec::new("wind", Dimension::Length, Dimension::Time))
            .derived(
                DerivedSpec::new("precipitation", Dimension::Length, Dimension::Time)
                    .fixed_numerator("mm")
                    .fixed_denominator("hr"),
            )
            .build()
            .unwrap();
        assert_eq!(registry.derived_specs().len(), 2);
    }

    #[test]
    fn test_sibling_conversion() {
        let registry = small_registry();
        let mm = registry.get("mm").unwrap();
        let m = registry.get("m").unwrap();
        assert_relative_eq!(registry.convert(1000.0, mm, m).unwrap(), 1.0);
        assert_relative_eq!(registry.convert(1.0, m, mm).unwrap(), 1000.0);
    }

    #[test]
    fn test_cousin_conversion_uses_anchor() {
        let registry = small_registry();
        let ft = registry.get("ft").unwrap();
        let m = registry.get("m").unwrap();
        assert_relative_eq!(
            registry.convert(1.0, ft, m).unwrap(),
            0.3048,
            epsilon = 1e-6
        );
        assert_relative_eq!(
            registry.convert(1.0, m, ft).unwrap(),
            3.280_839_895,
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_incompatible_dimensions_error() {
        let registry = RegistryBuilder::new()
            .scale(Dimension::Length, UnitSystem::Metric, metric_scale())
            .scale(
                Dimension::Time,
                UnitSystem::Mixed,
                Scale::new(vec![ScaleStep::new("Second", 1.0)], "Second"),
            )
            .unit(Unit::ladder("Meter", "m", Dimension::Length, UnitSystem::Metric))
            .unit(Unit::ladder("Second", "s", Dimension::Time, UnitSystem::Mixed))
            .build()
            .unwrap();
        let m = registry.get("m").unwrap();
        let s = registry.get("s").unwrap();
        let err = registry.convert(1.0, m, s).unwrap_err();
        assert!(matches!(err, UnitError::IncompatibleDimension { .. }));
    }

    #[test]
    fn test_variant_conversion() {
        let registry = RegistryBuilder::new()
            .scale(
                Dimension::Time,
                UnitSystem::Mixed,
                Scale::new(vec![ScaleStep::new("Second", 1.0)], "Second"),
            )
            .unit(Unit::ladder("Second", "s", Dimension::Time, UnitSystem::Mixed))
            .unit(Unit::variant(
                "Week",
                "wk",
                Dimension::Time,
                UnitSystem::Mixed,
                604_800.0,
            ))
            .build()
            .unwrap();
        let s = registry.get("s").unwrap();
        let wk = registry.get("wk").unwrap();
        assert_relative_eq!(registry.convert(1.0, wk, s).unwrap(), 604_800.0);
        assert_relative_eq!(registry.convert(302_400.0, s, wk).unwrap(), 0.5);
    }

    #[test]
    fn test_subtypes_of() {
        let registry = small_registry();
        let names: Vec<&str> = registry
            .subtypes_of(Dimension::Length)
            .iter()
            .map(|unit| unit.name.as_str())
            .collect();
        assert_eq!(
            names,
            vec!["Centimeter", "Foot", "Inch", "Kilometer", "Meter", "Millimeter"]
        );
    }

    #[test]
    fn test_property_overrides_apply_at_build() {
        let mut overrides = PropertyOverrides::new();
        overrides.set("Meter", "max=4, precision=2");
        let registry = RegistryBuilder::new()
            .scale(Dimension::Length, UnitSystem::Metric, metric_scale())
            .unit(Unit::ladder("Meter", "m", Dimension::Length, UnitSystem::Metric))
            .properties(overrides)
            .build()
            .unwrap();
        let meter = registry.get("m").unwrap();
        assert_eq!(meter.display.max_digits, 4);
        assert_eq!(meter.display.precision, 2);
    }

    #[test]
    fn test_bad_property_override_fails_build() {
        let mut overrides = PropertyOverrides::new();
        overrides.set("Meter", "sparkle=True");
        let err = RegistryBuilder::new()
            .scale(Dimension::Length, UnitSystem::Metric, metric_scale())
            .unit(Unit::ladder("Meter", "m", Dimension::Length, UnitSystem::Metric))
            .properties(overrides)
            .build()
            .unwrap_err();
        assert!(matches!(err, UnitError::Property(_)));
    }

    #[test]
    fn test_delta_conversion_skips_offsets() {
        let registry = RegistryBuilder::new()
            .scale(
                Dimension::Temperature,
                UnitSystem::Metric,
                Scale::new(vec![ScaleStep::new("Celsius", 1.0)], "Celsius"),
            )
            .scale(
                Dimension::Temperature,
                UnitSystem::Imperial,
                Scale::new(vec![ScaleStep::new("Fahrenheit", 1.0)], "Fahrenheit"),
            )
            .unit(Unit::ladder(
                "Celsius",
                "c",
                Dimension::Temperature,
                UnitSystem::Metric,
            ))
            .unit(Unit::ladder(
                "Fahrenheit",
                "f",
                Dimension::Temperature,
                UnitSystem::Imperial,
            ))
            .build()
            .unwrap();
        let c = registry.get("c").unwrap();
        let f = registry.get("f").unwrap();
        assert_relative_eq!(registry.convert(10.0, c, f).unwrap(), 50.0);
        assert_relative_eq!(registry.convert_delta(10.0, c, f).unwrap(), 18.0);
    }

    #[test]
    fn test_base_unit_lookup() {
        let registry = small_registry();
        let base = registry
            .base_unit(Dimension::Length, UnitSystem::Metric)
            .unwrap();
        assert_eq!(base.symbol, "m");
        let err = registry
            .base_unit(Dimension::Pressure, UnitSystem::Metric)
            .unwrap_err();
        assert!(matches!(err, UnitError::NoBaseUnit { .. }));
    }
}
