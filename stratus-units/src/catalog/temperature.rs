//! Temperature units
//!
//! Celsius and Fahrenheit are each the base of a one-step ladder;
//! Kelvin rides the metric side as a variant with an offset. The
//! anchor formula is the familiar C to F line. Temperature symbols
//! render flush against the magnitude ("72.5ºf").

use crate::dimension::{Dimension, UnitSystem};
use crate::registry::{RegistryBuilder, UNITS};
use crate::scale::{Scale, ScaleStep};
use crate::unit::Unit;

pub(crate) fn register(builder: RegistryBuilder) -> RegistryBuilder {
    builder
        .scale(Dimension::Temperature, UnitSystem::Metric, single("Celsius"))
        .scale(
            Dimension::Temperature,
            UnitSystem::Imperial,
            single("Fahrenheit"),
        )
        .unit(
            Unit::ladder("Celsius", "c", Dimension::Temperature, UnitSystem::Metric)
                .decorator("º")
                .no_spacer(),
        )
        .unit(
            Unit::ladder(
                "Fahrenheit",
                "f",
                Dimension::Temperature,
                UnitSystem::Imperial,
            )
            .decorator("º")
            .no_spacer()
            .limits(-459.67, f64::INFINITY),
        )
        .unit(
            Unit::variant_with_offset(
                "Kelvin",
                "k",
                Dimension::Temperature,
                UnitSystem::Metric,
                1.0,
                -273.15,
            )
            .alias("kel")
            .no_spacer(),
        )
}

fn single(name: &str) -> Scale {
    Scale::new(vec![ScaleStep::new(name, 1.0)], name)
}

// ========== Accessors ==========

pub fn celsius() -> &'static Unit {
    UNITS.get("c").expect("built-in unit")
}

pub fn fahrenheit() -> &'static Unit {
    UNITS.get("f").expect("built-in unit")
}

pub fn kelvin() -> &'static Unit {
    UNITS.get("k").expect("built-in unit")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quantity::Quantity;
    use approx::assert_relative_eq;

    #[test]
    fn test_freezing_and_boiling_points() {
        let freezing = Quantity::new(0.0, celsius()).convert_to(fahrenheit()).unwrap();
        assert_relative_eq!(freezing.magnitude(), 32.0);
        let boiling = Quantity::new(100.0, celsius()).convert_to(fahrenheit()).unwrap();
        assert_relative_eq!(boiling.magnitude(), 212.0);
    }

    #[test]
    fn test_kelvin_offsets_through_celsius() {
        let room = Quantity::new(293.15, kelvin()).convert_to(celsius()).unwrap();
        assert_relative_eq!(room.magnitude(), 20.0, epsilon = 1e-9);
        let back = room.convert_to(kelvin()).unwrap();
        assert_relative_eq!(back.magnitude(), 293.15, epsilon = 1e-9);
    }

    #[test]
    fn test_fahrenheit_clamps_at_absolute_zero() {
        let impossible = Quantity::new(-500.0, fahrenheit());
        assert_relative_eq!(impossible.magnitude(), -459.67);
    }

    #[test]
    fn test_degree_sign_binds_tight() {
        let reading = Quantity::new(72.5, fahrenheit());
        assert_eq!(reading.to_string(), "72.5ºf");
    }

    #[test]
    fn test_kel_alias_resolves() {
        assert_eq!(UNITS.resolve("kel").unwrap().name, "Kelvin");
    }
}
