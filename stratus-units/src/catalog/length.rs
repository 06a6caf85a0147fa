//! Length units
//!
//! The metric ladder runs millimeter through kilometer, the imperial
//! one line through mile. The dimension's anchor formula ties the two
//! together at meter and foot.

use stratus_core::SizeClass;

use crate::dimension::{Dimension, UnitSystem};
use crate::quantity::Quantity;
use crate::registry::{RegistryBuilder, UNITS};
use crate::scale::{Scale, ScaleStep};
use crate::unit::Unit;

pub(crate) fn register(builder: RegistryBuilder) -> RegistryBuilder {
    builder
        .scale(Dimension::Length, UnitSystem::Metric, metric())
        .scale(Dimension::Length, UnitSystem::Imperial, imperial())
        .unit(metric_unit("Millimeter", "mm").sized(SizeClass::Tiny))
        .unit(metric_unit("Centimeter", "cm").sized(SizeClass::Small))
        .unit(metric_unit("Decimeter", "dm").sized(SizeClass::Small))
        .unit(metric_unit("Meter", "m").sized(SizeClass::Medium))
        .unit(metric_unit("Decameter", "dam").sized(SizeClass::Medium))
        .unit(metric_unit("Hectometer", "hm").sized(SizeClass::Large))
        .unit(metric_unit("Kilometer", "km").sized(SizeClass::Large))
        .unit(imperial_unit("Line", "ln").sized(SizeClass::Tiny))
        .unit(imperial_unit("Inch", "in").sized(SizeClass::Small))
        .unit(imperial_unit("Foot", "ft").sized(SizeClass::Medium))
        .unit(imperial_unit("Yard", "yd").sized(SizeClass::Medium))
        .unit(
            imperial_unit("Mile", "mi")
                .sized(SizeClass::Large)
                .precision(1),
        )
}

fn metric() -> Scale {
    Scale::new(
        vec![
            ScaleStep::new("Millimeter", 1.0),
            ScaleStep::new("Centimeter", 10.0),
            ScaleStep::new("Decimeter", 10.0).uncommon(),
            ScaleStep::new("Meter", 10.0),
            ScaleStep::new("Decameter", 10.0).uncommon(),
            ScaleStep::new("Hectometer", 10.0).uncommon(),
            ScaleStep::new("Kilometer", 10.0),
        ],
        "Meter",
    )
}

fn imperial() -> Scale {
    Scale::new(
        vec![
            ScaleStep::new("Line", 1.0).uncommon(),
            ScaleStep::new("Inch", 12.0),
            ScaleStep::new("Foot", 12.0),
            ScaleStep::new("Yard", 3.0),
            ScaleStep::new("Mile", 1760.0),
        ],
        "Foot",
    )
}

fn metric_unit(name: &str, symbol: &str) -> Unit {
    Unit::ladder(name, symbol, Dimension::Length, UnitSystem::Metric)
}

fn imperial_unit(name: &str, symbol: &str) -> Unit {
    Unit::ladder(name, symbol, Dimension::Length, UnitSystem::Imperial)
}

// ========== Accessors ==========

pub fn millimeter() -> &'static Unit {
    UNITS.get("mm").expect("built-in unit")
}

pub fn centimeter() -> &'static Unit {
    UNITS.get("cm").expect("built-in unit")
}

pub fn decimeter() -> &'static Unit {
    UNITS.get("dm").expect("built-in unit")
}

pub fn meter() -> &'static Unit {
    UNITS.get("m").expect("built-in unit")
}

pub fn decameter() -> &'static Unit {
    UNITS.get("dam").expect("built-in unit")
}

pub fn hectometer() -> &'static Unit {
    UNITS.get("hm").expect("built-in unit")
}

pub fn kilometer() -> &'static Unit {
    UNITS.get("km").expect("built-in unit")
}

pub fn line() -> &'static Unit {
    UNITS.get("ln").expect("built-in unit")
}

pub fn inch() -> &'static Unit {
    UNITS.get("in").expect("built-in unit")
}

pub fn foot() -> &'static Unit {
    UNITS.get("ft").expect("built-in unit")
}

pub fn yard() -> &'static Unit {
    UNITS.get("yd").expect("built-in unit")
}

pub fn mile() -> &'static Unit {
    UNITS.get("mi").expect("built-in unit")
}

// ========== Constructors ==========

pub fn millimeters(value: f64) -> Quantity {
    Quantity::new(value, millimeter())
}

pub fn centimeters(value: f64) -> Quantity {
    Quantity::new(value, centimeter())
}

pub fn meters(value: f64) -> Quantity {
    Quantity::new(value, meter())
}

pub fn kilometers(value: f64) -> Quantity {
    Quantity::new(value, kilometer())
}

pub fn inches(value: f64) -> Quantity {
    Quantity::new(value, inch())
}

pub fn feet(value: f64) -> Quantity {
    Quantity::new(value, foot())
}

pub fn yards(value: f64) -> Quantity {
    Quantity::new(value, yard())
}

pub fn miles(value: f64) -> Quantity {
    Quantity::new(value, mile())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_twelve_inches_make_a_foot() {
        assert_eq!(inches(12.0), feet(1.0));
    }

    #[test]
    fn test_foot_to_meter_through_the_anchor() {
        let converted = feet(1.0).convert_to(meter()).unwrap();
        assert_relative_eq!(converted.magnitude(), 0.3048, epsilon = 1e-6);
    }

    #[test]
    fn test_metric_ladder_positions() {
        let two_km = kilometers(2.0).convert_to(meter()).unwrap();
        assert_relative_eq!(two_km.magnitude(), 2000.0);
        let stride = centimeters(75.0).convert_to(millimeter()).unwrap();
        assert_relative_eq!(stride.magnitude(), 750.0);
    }

    #[test]
    fn test_mile_keeps_one_decimal() {
        assert_eq!(mile().display.precision, 1);
        assert_eq!(mile().display.size, SizeClass::Large);
    }
}
