//! Quantities: a magnitude bound to a catalog unit
//!
//! A [`Quantity`] is immutable: conversion, localization, and
//! arithmetic all hand back a fresh value. The magnitude is a
//! precision-tracked [`Scalar`]; the unit is a reference into the
//! global [`UNITS`] registry; descriptive metadata rides along in
//! [`Meta`] and survives every conversion.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Div, Mul, Sub};
use std::time::SystemTime;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use stratus_core::{format_magnitude, format_with_unit, Scalar, UnitPreferences};
use tracing::warn;

use crate::catalog::misc::cardinal;
use crate::derived::{compose, DerivedQuantity};
use crate::dimension::Dimension;
use crate::registry::UNITS;
use crate::scale::Scale;
use crate::unit::{Unit, UnitError};

/// Descriptive metadata carried by a quantity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<SystemTime>,
    #[serde(default)]
    pub calculated: bool,
    #[serde(default)]
    pub indoor: bool,
}

/// A measured value bound to a unit from the built-in catalog.
#[derive(Debug, Clone)]
pub struct Quantity {
    value: Scalar,
    unit: &'static Unit,
    meta: Meta,
}

/// What dividing two quantities produces.
#[derive(Debug, Clone)]
pub enum Quotient {
    /// Same dimension: the units cancel into a bare ratio.
    Ratio(Scalar),
    /// Different dimensions: a derived rate.
    Rate(DerivedQuantity),
}

impl Quantity {
    // ========== Construction ==========

    /// Bind a magnitude to a unit, clamping into the unit's domain.
    pub fn new(value: f64, unit: &'static Unit) -> Self {
        Quantity {
            value: Scalar::new(unit.clamp(value)),
            unit,
            meta: Meta::default(),
        }
    }

    /// Like [`Quantity::new`], but rejecting an out-of-domain
    /// magnitude instead of clamping it.
    pub fn new_strict(value: f64, unit: &'static Unit) -> Result<Self, UnitError> {
        if !unit.in_domain(value) {
            return Err(UnitError::OutOfDomain {
                value,
                unit: unit.symbol.clone(),
                min: unit.limits.0,
                max: unit.limits.1,
            });
        }
        Ok(Quantity::new(value, unit))
    }

    /// Bind an already precision-tracked scalar.
    pub fn from_scalar(value: Scalar, unit: &'static Unit) -> Self {
        Quantity {
            value: value.map(|magnitude| unit.clamp(magnitude)),
            unit,
            meta: Meta::default(),
        }
    }

    /// Parse a numeric literal, keeping its written precision.
    pub fn from_literal(literal: &str, unit: &'static Unit) -> Result<Self, UnitError> {
        Ok(Quantity::from_scalar(Scalar::from_literal(literal)?, unit))
    }

    /// Resolve a token through the global registry and bind to it.
    pub fn of(value: f64, token: &str) -> Result<Self, UnitError> {
        let unit = UNITS
            .resolve(token)
            .ok_or_else(|| UnitError::UnknownUnit(token.to_string()))?;
        Ok(Quantity::new(value, unit))
    }

    // ========== Metadata ==========

    pub fn titled(mut self, title: &str) -> Self {
        self.meta.title = Some(title.to_string());
        self
    }

    pub fn keyed(mut self, key: &str) -> Self {
        self.meta.key = Some(key.to_string());
        self
    }

    pub fn at(mut self, timestamp: SystemTime) -> Self {
        self.meta.timestamp = Some(timestamp);
        self
    }

    /// Mark as derived from other readings rather than sensed.
    pub fn calculated(mut self) -> Self {
        self.meta.calculated = true;
        self
    }

    pub fn indoor(mut self) -> Self {
        self.meta.indoor = true;
        self
    }

    pub fn with_meta(mut self, meta: Meta) -> Self {
        self.meta = meta;
        self
    }

    // ========== Accessors ==========

    pub fn value(&self) -> Scalar {
        self.value
    }

    pub fn magnitude(&self) -> f64 {
        self.value.value()
    }

    pub fn unit(&self) -> &'static Unit {
        self.unit
    }

    pub fn dimension(&self) -> Dimension {
        self.unit.dimension
    }

    pub fn meta(&self) -> &Meta {
        &self.meta
    }

    /// Explicit title, falling back to the unit name.
    pub fn title(&self) -> &str {
        self.meta.title.as_deref().unwrap_or(&self.unit.name)
    }

    // ========== Conversion ==========

    /// Convert to another unit of the same dimension, carrying
    /// metadata and tracked precision across.
    pub fn convert_to(&self, target: &'static Unit) -> Result<Quantity, UnitError> {
        let converted = UNITS.convert(self.value.value(), self.unit, target)?;
        Ok(Quantity {
            value: self.value.map(|_| converted),
            unit: target,
            meta: self.meta.clone(),
        })
    }

    /// Convert a difference rather than an absolute reading: offsets
    /// do not apply, so a 10 °C drop converts to an 18 °F drop.
    pub fn delta_to(&self, target: &'static Unit) -> Result<Quantity, UnitError> {
        let converted = UNITS.convert_delta(self.value.value(), self.unit, target)?;
        Ok(Quantity {
            value: self.value.map(|_| converted),
            unit: target,
            meta: self.meta.clone(),
        })
    }

    /// Convert to the base unit of this unit's (dimension, system).
    pub fn to_base_unit(&self) -> Result<Quantity, UnitError> {
        let base = UNITS.base_unit(self.unit.dimension, self.unit.system)?;
        self.convert_to(base)
    }

    /// Convert to the unit the preference table names for this
    /// dimension. Any miss (no entry, unresolvable token, failed
    /// conversion) returns the receiver unchanged.
    pub fn localize(&self, preferences: &UnitPreferences) -> Quantity {
        let Some(token) = preferences.unit_for(self.unit.dimension.name()) else {
            return self.clone();
        };
        let Some(target) = UNITS.resolve(token) else {
            warn!(token, dimension = %self.unit.dimension, "preferred unit did not resolve");
            return self.clone();
        };
        match self.convert_to(target) {
            Ok(localized) => localized,
            Err(error) => {
                warn!(%error, "localization failed");
                self.clone()
            }
        }
    }

    /// Carry this quantity's metadata onto `target`, keeping the
    /// target's magnitude and unit. A dimension mismatch warrants a
    /// warning, not an error; calculated measurements legitimately
    /// change kind.
    pub fn transform(&self, mut target: Quantity) -> Quantity {
        if target.unit.dimension != self.unit.dimension {
            warn!(
                from = %self.unit.dimension,
                to = %target.unit.dimension,
                "transform across dimensions"
            );
        }
        target.meta = self.meta.clone();
        target
    }

    // ========== Arithmetic ==========

    /// Add a compatible quantity, converting it to this unit first.
    pub fn try_add(&self, other: &Quantity) -> Result<Quantity, UnitError> {
        let aligned = other.convert_to(self.unit)?;
        Ok(Quantity {
            value: self.value + aligned.value,
            unit: self.unit,
            meta: self.meta.clone(),
        })
    }

    /// Subtract a compatible quantity, converting it to this unit
    /// first.
    pub fn try_sub(&self, other: &Quantity) -> Result<Quantity, UnitError> {
        let aligned = other.convert_to(self.unit)?;
        Ok(Quantity {
            value: self.value - aligned.value,
            unit: self.unit,
            meta: self.meta.clone(),
        })
    }

    /// Divide by another quantity. A same-dimension divisor cancels
    /// into a bare ratio; a cross-dimension divisor composes a derived
    /// rate.
    pub fn try_div(&self, other: &Quantity) -> Result<Quotient, UnitError> {
        if self.unit.dimension == other.unit.dimension {
            let aligned = other.convert_to(self.unit)?;
            Ok(Quotient::Ratio(self.value / aligned.value))
        } else {
            Ok(Quotient::Rate(compose(self.clone(), other.clone())))
        }
    }

    pub fn powi(&self, exp: i32) -> Quantity {
        Quantity {
            value: self.value.powi(exp),
            unit: self.unit,
            meta: self.meta.clone(),
        }
    }

    // ========== Scale stepping ==========

    /// One ladder step coarser, saturating at the top. Variant units
    /// stay put.
    pub fn scale_up(&self) -> Quantity {
        self.step_to(|scale, position| Some(scale.up(position)))
    }

    /// One ladder step finer, saturating at the bottom.
    pub fn scale_down(&self) -> Quantity {
        self.step_to(|scale, position| Some(scale.down(position)))
    }

    /// Walk coarser along the common subset until the integer digits
    /// fit the budget, saturating at the ladder top.
    pub fn best_fit(&self, max_digits: u8) -> Quantity {
        let mut current = self.clone();
        loop {
            if current.value.int_digits() <= u32::from(max_digits) {
                return current;
            }
            let stepped = current.step_to(|scale, position| scale.up_common(position));
            if stepped.unit.symbol == current.unit.symbol {
                return current;
            }
            current = stepped;
        }
    }

    /// Settle on the most natural common step: coarser while at least
    /// one whole of the next unit fits, finer while the integer part
    /// is zero.
    pub fn auto(&self) -> Quantity {
        let mut current = self.clone();
        loop {
            let stepped = current.step_to(|scale, position| scale.up_common(position));
            if stepped.unit.symbol == current.unit.symbol || stepped.value.value().abs() < 1.0 {
                break;
            }
            current = stepped;
        }
        loop {
            let magnitude = current.value.value();
            if magnitude == 0.0 || magnitude.abs() >= 1.0 {
                break;
            }
            let stepped = current.step_to(|scale, position| scale.down_common(position));
            if stepped.unit.symbol == current.unit.symbol {
                break;
            }
            current = stepped;
        }
        current
    }

    /// Decompose across the common subset, coarse to fine: 90 minutes
    /// splits into 1 hour, 30 minutes. The receiver's own unit is the
    /// finest part and keeps the remainder.
    pub fn split_into(&self) -> Vec<Quantity> {
        let Some(position) = self.unit.ladder_position() else {
            return vec![self.clone()];
        };
        let Some(scale) = UNITS.scale_for(self.unit.dimension, self.unit.system) else {
            return vec![self.clone()];
        };
        let coarser: Vec<usize> = scale
            .common_positions()
            .into_iter()
            .filter(|&step| step > position)
            .rev()
            .collect();

        let mut parts = Vec::new();
        let mut remainder = self.clone();
        for step in coarser {
            let Some(target) = UNITS.unit_at(self.unit.dimension, self.unit.system, step) else {
                continue;
            };
            let Ok(converted) = remainder.convert_to(target) else {
                continue;
            };
            let whole = converted.value.value().trunc();
            if whole == 0.0 {
                continue;
            }
            let part = Quantity::new(whole, target);
            let Ok(back) = part.convert_to(remainder.unit) else {
                continue;
            };
            remainder.value = remainder.value - back.value;
            parts.push(part);
        }
        if parts.is_empty() || remainder.value.value() != 0.0 {
            parts.push(remainder);
        }
        parts
    }

    fn step_to(&self, pick: impl Fn(&Scale, usize) -> Option<usize>) -> Quantity {
        let Some(position) = self.unit.ladder_position() else {
            return self.clone();
        };
        let Some(scale) = UNITS.scale_for(self.unit.dimension, self.unit.system) else {
            return self.clone();
        };
        let Some(next) = pick(scale, position) else {
            return self.clone();
        };
        if next == position {
            return self.clone();
        }
        let Some(target) = UNITS.unit_at(self.unit.dimension, self.unit.system, next) else {
            return self.clone();
        };
        self.convert_to(target).unwrap_or_else(|_| self.clone())
    }
}

// ========== Operators ==========

impl Add<f64> for Quantity {
    type Output = Quantity;

    fn add(mut self, rhs: f64) -> Quantity {
        self.value = self.value + Scalar::new(rhs);
        self
    }
}

impl Sub<f64> for Quantity {
    type Output = Quantity;

    fn sub(mut self, rhs: f64) -> Quantity {
        self.value = self.value - Scalar::new(rhs);
        self
    }
}

impl Mul<f64> for Quantity {
    type Output = Quantity;

    fn mul(mut self, rhs: f64) -> Quantity {
        self.value = self.value * rhs;
        self
    }
}

impl Div<f64> for Quantity {
    type Output = Quantity;

    fn div(mut self, rhs: f64) -> Quantity {
        self.value = self.value / rhs;
        self
    }
}

/// Converts the right side across, then compares at the coarser of
/// the two tracked precisions.
impl PartialEq for Quantity {
    fn eq(&self, other: &Self) -> bool {
        if self.unit.symbol == other.unit.symbol {
            return self.value == other.value;
        }
        match other.convert_to(self.unit) {
            Ok(aligned) => self.value == aligned.value,
            Err(_) => false,
        }
    }
}

impl PartialOrd for Quantity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        let aligned = if self.unit.symbol == other.unit.symbol {
            other.clone()
        } else {
            other.convert_to(self.unit).ok()?
        };
        self.value.partial_cmp(&aligned.value)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.unit.dimension == Dimension::Angle {
            let figure = format_magnitude(self.value, &self.unit.display);
            return write!(
                f,
                "{} ({}{})",
                cardinal(self.value.value()),
                figure,
                self.unit.decorator
            );
        }
        write!(
            f,
            "{}",
            format_with_unit(
                self.value,
                &self.unit.decorator,
                &self.unit.symbol,
                &self.unit.display
            )
        )
    }
}

// ========== Serde ==========

#[derive(Serialize)]
struct QuantityRef<'a> {
    value: Scalar,
    unit: &'a str,
    #[serde(flatten)]
    meta: &'a Meta,
}

#[derive(Deserialize)]
struct QuantityOwned {
    value: Scalar,
    unit: String,
    #[serde(flatten)]
    meta: Meta,
}

impl Serialize for Quantity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        QuantityRef {
            value: self.value,
            unit: &self.unit.symbol,
            meta: &self.meta,
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let repr = QuantityOwned::deserialize(deserializer)?;
        let unit = UNITS
            .resolve(&repr.unit)
            .ok_or_else(|| D::Error::custom(UnitError::UnknownUnit(repr.unit.clone())))?;
        Ok(Quantity {
            value: repr.value,
            unit,
            meta: repr.meta,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit(token: &str) -> &'static Unit {
        UNITS.resolve(token).unwrap()
    }

    #[test]
    fn test_construction_clamps_by_default() {
        let humidity = Quantity::new(140.0, unit("rh"));
        assert_eq!(humidity.magnitude(), 100.0);
        let frozen = Quantity::new(-500.0, unit("f"));
        assert_eq!(frozen.magnitude(), -459.67);
    }

    #[test]
    fn test_strict_construction_rejects() {
        let err = Quantity::new_strict(140.0, unit("rh")).unwrap_err();
        assert!(matches!(err, UnitError::OutOfDomain { value, .. } if value == 140.0));
        assert!(Quantity::new_strict(55.0, unit("rh")).is_ok());
    }

    #[test]
    fn test_literal_keeps_precision() {
        let rain = Quantity::from_literal("1.50", unit("mm")).unwrap();
        assert_eq!(rain.value().precision(), Some(2));
        assert_eq!(rain.to_string(), "1.5 mm");
    }

    #[test]
    fn test_foot_to_meter() {
        let foot = Quantity::new(1.0, unit("ft"));
        let meter = foot.convert_to(unit("m")).unwrap();
        assert_relative_eq!(meter.magnitude(), 0.3048, epsilon = 1e-6);
    }

    #[test]
    fn test_celsius_to_fahrenheit() {
        let freezing = Quantity::new(0.0, unit("c"));
        assert_eq!(freezing.convert_to(unit("f")).unwrap().magnitude(), 32.0);
        let boiling = Quantity::new(100.0, unit("c"));
        assert_eq!(boiling.convert_to(unit("f")).unwrap().magnitude(), 212.0);
    }

    #[test]
    fn test_kelvin_round_trip() {
        let ambient = Quantity::new(20.0, unit("c"));
        let kelvin = ambient.convert_to(unit("k")).unwrap();
        assert_relative_eq!(kelvin.magnitude(), 293.15);
        let back = kelvin.convert_to(unit("c")).unwrap();
        assert_relative_eq!(back.magnitude(), 20.0);
    }

    #[test]
    fn test_inch_dozen_is_a_foot() {
        let inches = Quantity::new(12.0, unit("in"));
        let foot = inches.convert_to(unit("ft")).unwrap();
        assert_relative_eq!(foot.magnitude(), 1.0);
        assert_eq!(inches, Quantity::new(1.0, unit("ft")));
    }

    #[test]
    fn test_hectopascal_to_pascal() {
        let slp = Quantity::new(1013.25, unit("hPa"));
        let pascal = slp.convert_to(unit("Pa")).unwrap();
        assert_relative_eq!(pascal.magnitude(), 101_325.0);
    }

    #[test]
    fn test_conversion_carries_metadata() {
        let outside = Quantity::new(21.5, unit("c")).titled("Outside").keyed("air.temp");
        let fahrenheit = outside.convert_to(unit("f")).unwrap();
        assert_eq!(fahrenheit.title(), "Outside");
        assert_eq!(fahrenheit.meta().key.as_deref(), Some("air.temp"));
    }

    #[test]
    fn test_title_falls_back_to_unit_name() {
        assert_eq!(Quantity::new(5.0, unit("mm")).title(), "Millimeter");
    }

    #[test]
    fn test_incompatible_conversion_errors() {
        let err = Quantity::new(1.0, unit("m"))
            .convert_to(unit("s"))
            .unwrap_err();
        assert!(matches!(err, UnitError::IncompatibleDimension { .. }));
    }

    #[test]
    fn test_delta_conversion() {
        let drop = Quantity::new(10.0, unit("c"));
        assert_relative_eq!(drop.delta_to(unit("f")).unwrap().magnitude(), 18.0);
        assert_relative_eq!(drop.delta_to(unit("k")).unwrap().magnitude(), 10.0);
    }

    #[test]
    fn test_localize_hits_preference() {
        let mut preferences = UnitPreferences::new();
        preferences.set("temperature", "f");
        let reading = Quantity::new(0.0, unit("c"));
        let localized = reading.localize(&preferences);
        assert_eq!(localized.unit().symbol, "f");
        assert_eq!(localized.magnitude(), 32.0);
    }

    #[test]
    fn test_localize_miss_returns_receiver() {
        let preferences = UnitPreferences::new();
        let reading = Quantity::new(12.0, unit("c"));
        let localized = reading.localize(&preferences);
        assert_eq!(localized.unit().symbol, "c");
        assert_eq!(localized.magnitude(), 12.0);
    }

    #[test]
    fn test_localize_is_idempotent() {
        let mut preferences = UnitPreferences::new();
        preferences.set("length", "in");
        let span = Quantity::new(254.0, unit("mm"));
        let once = span.localize(&preferences);
        let twice = once.localize(&preferences);
        assert_eq!(once.unit().symbol, twice.unit().symbol);
        assert_relative_eq!(once.magnitude(), twice.magnitude());
    }

    #[test]
    fn test_transform_carries_metadata_onto_target() {
        let source = Quantity::new(20.0, unit("c")).titled("Air").indoor();
        let derived = Quantity::new(17.0, unit("c"));
        let transformed = source.transform(derived);
        assert_eq!(transformed.title(), "Air");
        assert!(transformed.meta().indoor);
        assert_eq!(transformed.magnitude(), 17.0);
    }

    #[test]
    fn test_transform_across_dimensions_warns_not_errors() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
        let source = Quantity::new(20.0, unit("c")).titled("Air");
        let mismatched = source.transform(Quantity::new(3.0, unit("mm")));
        assert_eq!(mismatched.title(), "Air");
        assert_eq!(mismatched.unit().symbol, "mm");
    }

    #[test]
    fn test_addition_converts_right_operand() {
        let total = Quantity::new(1.0, unit("m"))
            .try_add(&Quantity::new(50.0, unit("cm")))
            .unwrap();
        assert_eq!(total.unit().symbol, "m");
        assert_relative_eq!(total.magnitude(), 1.5);
    }

    #[test]
    fn test_scalar_operators_keep_the_unit() {
        let doubled = Quantity::new(2.5, unit("mm")) * 2.0;
        assert_eq!(doubled.unit().symbol, "mm");
        assert_relative_eq!(doubled.magnitude(), 5.0);
        let shifted = Quantity::new(10.0, unit("c")) + 5.0;
        assert_relative_eq!(shifted.magnitude(), 15.0);
    }

    #[test]
    fn test_division_same_dimension_is_a_ratio() {
        let ratio = Quantity::new(1.0, unit("m"))
            .try_div(&Quantity::new(50.0, unit("cm")))
            .unwrap();
        match ratio {
            Quotient::Ratio(scalar) => assert_relative_eq!(scalar.value(), 2.0),
            Quotient::Rate(_) => panic!("same dimension must cancel"),
        }
    }

    #[test]
    fn test_division_across_dimensions_composes() {
        let quotient = Quantity::new(10.0, unit("m"))
            .try_div(&Quantity::new(2.0, unit("s")))
            .unwrap();
        match quotient {
            Quotient::Rate(rate) => {
                assert_eq!(rate.unit(), "m/s");
                assert_relative_eq!(rate.value().value(), 5.0);
            }
            Quotient::Ratio(_) => panic!("cross dimension must compose"),
        }
    }

    #[test]
    fn test_equality_rounds_to_coarser_precision() {
        let rounded = Quantity::from_literal("1.0", unit("mm")).unwrap();
        let finer = Quantity::from_literal("1.04", unit("mm")).unwrap();
        assert_eq!(rounded, finer);
        let apart = Quantity::from_literal("1.06", unit("mm")).unwrap();
        assert_ne!(rounded, apart);
    }

    #[test]
    fn test_equality_across_units() {
        assert_eq!(
            Quantity::new(1.0, unit("m")),
            Quantity::new(100.0, unit("cm"))
        );
        assert_ne!(Quantity::new(1.0, unit("m")), Quantity::new(1.0, unit("s")));
    }

    #[test]
    fn test_ordering_converts_first() {
        let mile = Quantity::new(1.0, unit("mi"));
        let kilometer = Quantity::new(1.0, unit("km"));
        assert!(mile > kilometer);
        assert!(Quantity::new(1.0, unit("m"))
            .partial_cmp(&Quantity::new(1.0, unit("s")))
            .is_none());
    }

    #[test]
    fn test_scale_stepping_saturates() {
        let span = Quantity::new(1.0, unit("km"));
        let up = span.scale_up();
        assert_eq!(up.unit().symbol, "km");
        let down = span.scale_down();
        assert_eq!(down.unit().symbol, "hm");
        assert_relative_eq!(down.magnitude(), 10.0);
    }

    #[test]
    fn test_best_fit_walks_common_steps() {
        let rain = Quantity::new(1234.0, unit("mm"));
        let fitted = rain.best_fit(3);
        assert_eq!(fitted.unit().symbol, "cm");
        assert_relative_eq!(fitted.magnitude(), 123.4);
    }

    #[test]
    fn test_auto_picks_natural_unit() {
        let stretch = Quantity::new(90.0, unit("min")).auto();
        assert_eq!(stretch.unit().symbol, "hr");
        assert_relative_eq!(stretch.magnitude(), 1.5);

        let blink = Quantity::new(0.5, unit("min")).auto();
        assert_eq!(blink.unit().symbol, "s");
        assert_relative_eq!(blink.magnitude(), 30.0);
    }

    #[test]
    fn test_split_into_decomposes() {
        let stretch = Quantity::new(90.0, unit("min"));
        let parts = stretch.split_into();
        let rendered: Vec<String> = parts.iter().map(|part| part.to_string()).collect();
        assert_eq!(rendered, vec!["1 hr", "30 min"]);

        let tick = Quantity::new(3661.0, unit("s"));
        let parts = tick.split_into();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0].unit().symbol, "hr");
        assert_eq!(parts[1].unit().symbol, "min");
        assert_eq!(parts[2].unit().symbol, "s");
        assert_relative_eq!(parts[2].magnitude(), 1.0);
    }

    #[test]
    fn test_to_base_unit() {
        let span = Quantity::new(2.0, unit("km"));
        let base = span.to_base_unit().unwrap();
        assert_eq!(base.unit().symbol, "m");
        assert_relative_eq!(base.magnitude(), 2000.0);
    }

    #[test]
    fn test_display_formats() {
        assert_eq!(Quantity::new(72.5, unit("f")).to_string(), "72.5ºf");
        assert_eq!(Quantity::new(45.0, unit("rh")).to_string(), "45%");
        assert_eq!(Quantity::new(0.0, unit("deg")).to_string(), "N (0º)");
        assert_eq!(Quantity::new(225.0, unit("deg")).to_string(), "SW (225º)");
    }

    #[test]
    fn test_serde_round_trip() {
        let reading = Quantity::from_literal("21.5", unit("c"))
            .unwrap()
            .titled("Outside")
            .calculated();
        let json = serde_json::to_string(&reading).unwrap();
        let back: Quantity = serde_json::from_str(&json).unwrap();
        assert_eq!(back, reading);
        assert_eq!(back.unit().symbol, "c");
        assert_eq!(back.title(), "Outside");
        assert!(back.meta().calculated);
    }

    #[test]
    fn test_deserialize_unknown_unit_fails() {
        let err = serde_json::from_str::<Quantity>(
            r#"{"value":{"value":1.0,"precision":null},"unit":"flurble"}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("Unknown unit"));
    }
}
