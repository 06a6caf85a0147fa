//! Mass units
//!
//! Metric milligram through kilogram, imperial dram through ton,
//! anchored at kilogram and pound.

use crate::dimension::{Dimension, UnitSystem};
use crate::quantity::Quantity;
use crate::registry::{RegistryBuilder, UNITS};
use crate::scale::{Scale, ScaleStep};
use crate::unit::Unit;

pub(crate) fn register(builder: RegistryBuilder) -> RegistryBuilder {
    builder
        .scale(Dimension::Mass, UnitSystem::Metric, metric())
        .scale(Dimension::Mass, UnitSystem::Imperial, imperial())
        .unit(metric_unit("Milligram", "mg"))
        .unit(metric_unit("Gram", "g"))
        .unit(metric_unit("Kilogram", "kg"))
        .unit(imperial_unit("Dram", "dr"))
        .unit(imperial_unit("Ounce", "oz"))
        .unit(imperial_unit("Pound", "lbs").alias("lb"))
        .unit(imperial_unit("Hundredweight", "cwt"))
        .unit(imperial_unit("Ton", "t"))
}

fn metric() -> Scale {
    Scale::new(
        vec![
            ScaleStep::new("Milligram", 1.0),
            ScaleStep::new("Gram", 1000.0),
            ScaleStep::new("Kilogram", 1000.0),
        ],
        "Kilogram",
    )
}

fn imperial() -> Scale {
    Scale::new(
        vec![
            ScaleStep::new("Dram", 1.0).uncommon(),
            ScaleStep::new("Ounce", 16.0),
            ScaleStep::new("Pound", 16.0),
            ScaleStep::new("Hundredweight", 100.0).uncommon(),
            ScaleStep::new("Ton", 20.0),
        ],
        "Pound",
    )
}

fn metric_unit(name: &str, symbol: &str) -> Unit {
    Unit::ladder(name, symbol, Dimension::Mass, UnitSystem::Metric)
}

fn imperial_unit(name: &str, symbol: &str) -> Unit {
    Unit::ladder(name, symbol, Dimension::Mass, UnitSystem::Imperial)
}

// ========== Accessors ==========

pub fn milligram() -> &'static Unit {
    UNITS.get("mg").expect("built-in unit")
}

pub fn gram() -> &'static Unit {
    UNITS.get("g").expect("built-in unit")
}

pub fn kilogram() -> &'static Unit {
    UNITS.get("kg").expect("built-in unit")
}

pub fn dram() -> &'static Unit {
    UNITS.get("dr").expect("built-in unit")
}

pub fn ounce() -> &'static Unit {
    UNITS.get("oz").expect("built-in unit")
}

pub fn pound() -> &'static Unit {
    UNITS.get("lbs").expect("built-in unit")
}

pub fn hundredweight() -> &'static Unit {
    UNITS.get("cwt").expect("built-in unit")
}

pub fn ton() -> &'static Unit {
    UNITS.get("t").expect("built-in unit")
}

// ========== Constructors ==========

pub fn grams(value: f64) -> Quantity {
    Quantity::new(value, gram())
}

pub fn kilograms(value: f64) -> Quantity {
    Quantity::new(value, kilogram())
}

pub fn ounces(value: f64) -> Quantity {
    Quantity::new(value, ounce())
}

pub fn pounds(value: f64) -> Quantity {
    Quantity::new(value, pound())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sixteen_ounces_make_a_pound() {
        assert_eq!(ounces(16.0), pounds(1.0));
    }

    #[test]
    fn test_kilogram_to_pound_through_the_anchor() {
        let converted = kilograms(1.0).convert_to(pound()).unwrap();
        assert_relative_eq!(converted.magnitude(), 2.204_622_621_8, epsilon = 1e-6);
    }

    #[test]
    fn test_lb_alias_resolves() {
        assert_eq!(UNITS.resolve("lb").unwrap().name, "Pound");
    }
}
