//! The flat unit record and the unit-model errors
//!
//! A [`Unit`] is one concrete named unit: a dimension tag, a system
//! tag, a display token, and a closed [`UnitKind`] saying how it
//! relates to its dimension's scale. There is no unit inheritance;
//! conversion and display are ordinary functions over this record.

use std::fmt;

use serde::{Deserialize, Serialize};
use stratus_core::{DisplayProperties, PropertyError, ScalarError, SizeClass};
use thiserror::Error;

use crate::dimension::{Dimension, UnitSystem};

/// How a unit relates to its scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum UnitKind {
    /// Sits on the (dimension, system) ladder. The position is
    /// resolved by name when the registry builds.
    Ladder { position: usize },
    /// Off the ladder, tied to the base unit by a fixed formula:
    /// `base_value = value * factor + offset`.
    Variant { factor: f64, offset: f64 },
}

/// One concrete unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    /// Canonical name; for ladder units it must match the scale step.
    pub name: String,
    /// Display token ("mm", "hPa"). Doubles as the registry key.
    pub symbol: String,
    pub dimension: Dimension,
    pub system: UnitSystem,
    pub kind: UnitKind,
    /// Glyph bound tight to the magnitude ("º", "%").
    pub decorator: String,
    pub aliases: Vec<String>,
    pub display: DisplayProperties,
    /// Declared domain; construction clamps to it by default.
    pub limits: (f64, f64),
}

impl Unit {
    // ========== Construction ==========

    /// A ladder unit. Its position is resolved against the dimension's
    /// scale when the registry builds.
    pub fn ladder(name: &str, symbol: &str, dimension: Dimension, system: UnitSystem) -> Self {
        Unit::bare(
            name,
            symbol,
            dimension,
            system,
            UnitKind::Ladder { position: 0 },
        )
    }

    /// A variant unit worth `factor` base units.
    pub fn variant(
        name: &str,
        symbol: &str,
        dimension: Dimension,
        system: UnitSystem,
        factor: f64,
    ) -> Self {
        Unit::bare(
            name,
            symbol,
            dimension,
            system,
            UnitKind::Variant {
                factor,
                offset: 0.0,
            },
        )
    }

    /// A variant with an offset against the base (Kelvin).
    pub fn variant_with_offset(
        name: &str,
        symbol: &str,
        dimension: Dimension,
        system: UnitSystem,
        factor: f64,
        offset: f64,
    ) -> Self {
        Unit::bare(
            name,
            symbol,
            dimension,
            system,
            UnitKind::Variant { factor, offset },
        )
    }

    fn bare(
        name: &str,
        symbol: &str,
        dimension: Dimension,
        system: UnitSystem,
        kind: UnitKind,
    ) -> Self {
        Unit {
            name: name.to_string(),
            symbol: symbol.to_string(),
            dimension,
            system,
            kind,
            decorator: String::new(),
            aliases: Vec::new(),
            display: DisplayProperties::default(),
            limits: (f64::NEG_INFINITY, f64::INFINITY),
        }
    }

    // ========== Builder fields ==========

    pub fn alias(mut self, alias: &str) -> Self {
        self.aliases.push(alias.to_string());
        self
    }

    pub fn decorator(mut self, decorator: &str) -> Self {
        self.decorator = decorator.to_string();
        self
    }

    pub fn limits(mut self, min: f64, max: f64) -> Self {
        self.limits = (min, max);
        self
    }

    /// Seed the display record from a size-class preset. Apply before
    /// per-field display overrides.
    pub fn sized(mut self, size: SizeClass) -> Self {
        self.display = size.properties();
        self
    }

    pub fn precision(mut self, precision: u8) -> Self {
        self.display.precision = precision;
        self
    }

    pub fn max_digits(mut self, max_digits: u8) -> Self {
        self.display.max_digits = max_digits;
        self
    }

    /// Render the symbol flush against the magnitude ("72.5ºf").
    pub fn no_spacer(mut self) -> Self {
        self.display.unit_spacer = false;
        self
    }

    /// Render without the symbol; the decorator still shows.
    pub fn hide_unit(mut self) -> Self {
        self.display.show_unit = false;
        self
    }

    // ========== Queries ==========

    /// Check if two units are dimensionally compatible.
    pub fn is_compatible(&self, other: &Unit) -> bool {
        self.dimension == other.dimension
    }

    pub fn in_domain(&self, value: f64) -> bool {
        value >= self.limits.0 && value <= self.limits.1
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.limits.0, self.limits.1)
    }

    pub(crate) fn ladder_position(&self) -> Option<usize> {
        match self.kind {
            UnitKind::Ladder { position } => Some(position),
            UnitKind::Variant { .. } => None,
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol)
    }
}

/// Errors across the unit model.
#[derive(Debug, Clone, Error)]
pub enum UnitError {
    #[error("Cannot convert {from} ({from_dimension}) to {to} ({to_dimension}): incompatible dimensions")]
    IncompatibleDimension {
        from: String,
        to: String,
        from_dimension: Dimension,
        to_dimension: Dimension,
    },

    #[error("Unknown unit: {0}")]
    UnknownUnit(String),

    #[error("No base unit registered for {system} {dimension}")]
    NoBaseUnit {
        dimension: Dimension,
        system: UnitSystem,
    },

    #[error("Value {value} outside the domain [{min}, {max}] of {unit}")]
    OutOfDomain {
        value: f64,
        unit: String,
        min: f64,
        max: f64,
    },

    #[error("Derived pattern {numerator}/{denominator} is already registered as {existing}")]
    AmbiguousDerived {
        numerator: String,
        denominator: String,
        existing: String,
    },

    #[error(transparent)]
    Scalar(#[from] ScalarError),

    #[error(transparent)]
    Property(#[from] PropertyError),
}

impl UnitError {
    pub(crate) fn incompatible(from: &Unit, to: &Unit) -> Self {
        UnitError::IncompatibleDimension {
            from: from.symbol.clone(),
            to: to.symbol.clone(),
            from_dimension: from.dimension,
            to_dimension: to.dimension,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fahrenheit() -> Unit {
        Unit::ladder(
            "Fahrenheit",
            "f",
            Dimension::Temperature,
            UnitSystem::Imperial,
        )
        .decorator("º")
        .limits(-459.67, f64::INFINITY)
    }

    fn week() -> Unit {
        Unit::variant("Week", "wk", Dimension::Time, UnitSystem::Mixed, 604_800.0)
    }

    #[test]
    fn test_builder_fields() {
        let unit = fahrenheit();
        assert_eq!(unit.symbol, "f");
        assert_eq!(unit.decorator, "º");
        assert_eq!(unit.limits.0, -459.67);
        assert_eq!(unit.kind, UnitKind::Ladder { position: 0 });
    }

    #[test]
    fn test_variants_carry_their_factor() {
        let unit = week();
        assert_eq!(
            unit.kind,
            UnitKind::Variant {
                factor: 604_800.0,
                offset: 0.0
            }
        );
        assert!(unit.ladder_position().is_none());
    }

    #[test]
    fn test_domain_checks() {
        let unit = fahrenheit();
        assert!(unit.in_domain(32.0));
        assert!(!unit.in_domain(-500.0));
        assert_eq!(unit.clamp(-500.0), -459.67);
        assert_eq!(unit.clamp(72.5), 72.5);
    }

    #[test]
    fn test_compatibility_is_by_dimension() {
        assert!(!fahrenheit().is_compatible(&week()));
        assert!(fahrenheit().is_compatible(&fahrenheit()));
    }

    #[test]
    fn test_sized_seeds_display() {
        let unit = week().sized(SizeClass::Large).precision(0);
        assert_eq!(unit.display.size, SizeClass::Large);
        assert_eq!(unit.display.precision, 0);
    }

    #[test]
    fn test_error_display() {
        let err = UnitError::incompatible(&fahrenheit(), &week());
        assert_eq!(
            err.to_string(),
            "Cannot convert f (temperature) to wk (time): incompatible dimensions"
        );
    }
}
