//! Station channel units
//!
//! Single-unit dimensions for the rest of a weather station's
//! payload: humidity, wind direction, battery voltage, lightning
//! strikes, solar radiation, and UV index. Each sits alone on its own
//! one-step scale.

use crate::dimension::{Dimension, UnitSystem};
use crate::quantity::Quantity;
use crate::registry::{RegistryBuilder, UNITS};
use crate::scale::{Scale, ScaleStep};
use crate::unit::Unit;

/// Sixteen-wind compass, clockwise from north.
const CARDINALS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

pub(crate) fn register(builder: RegistryBuilder) -> RegistryBuilder {
    builder
        .scale(Dimension::Percentage, UnitSystem::Mixed, single("Humidity"))
        .scale(Dimension::Angle, UnitSystem::Mixed, single("Direction"))
        .scale(Dimension::Voltage, UnitSystem::Mixed, single("Voltage"))
        .scale(Dimension::Count, UnitSystem::Mixed, single("Strike"))
        .scale(Dimension::Irradiance, UnitSystem::Mixed, single("Irradiance"))
        .scale(
            Dimension::Illuminance,
            UnitSystem::Mixed,
            single("Illuminance"),
        )
        .scale(Dimension::Index, UnitSystem::Mixed, single("UVI"))
        .unit(
            mixed_unit("Humidity", "rh", Dimension::Percentage)
                .decorator("%")
                .hide_unit()
                .precision(0)
                .limits(0.0, 100.0),
        )
        .unit(
            mixed_unit("Direction", "deg", Dimension::Angle)
                .decorator("º")
                .hide_unit()
                .precision(0),
        )
        .unit(
            mixed_unit("Voltage", "v", Dimension::Voltage)
                .max_digits(3)
                .precision(2),
        )
        .unit(mixed_unit("Strike", "strikes", Dimension::Count).precision(0))
        .unit(mixed_unit("Irradiance", "W/m²", Dimension::Irradiance).precision(0))
        .unit(mixed_unit("Illuminance", "lux", Dimension::Illuminance).precision(0))
        .unit(
            mixed_unit("UVI", "uvi", Dimension::Index)
                .hide_unit()
                .precision(0),
        )
}

fn single(name: &str) -> Scale {
    Scale::new(vec![ScaleStep::new(name, 1.0)], name)
}

fn mixed_unit(name: &str, symbol: &str, dimension: Dimension) -> Unit {
    Unit::ladder(name, symbol, dimension, UnitSystem::Mixed)
}

/// Compass point for a bearing in degrees, sixteen-wind resolution.
pub fn cardinal(degrees: f64) -> &'static str {
    let index = (degrees / 22.5).round() as isize;
    CARDINALS[index.rem_euclid(16) as usize]
}

// ========== Accessors ==========

pub fn humidity() -> &'static Unit {
    UNITS.get("rh").expect("built-in unit")
}

pub fn direction() -> &'static Unit {
    UNITS.get("deg").expect("built-in unit")
}

pub fn voltage() -> &'static Unit {
    UNITS.get("v").expect("built-in unit")
}

pub fn strike() -> &'static Unit {
    UNITS.get("strikes").expect("built-in unit")
}

pub fn irradiance() -> &'static Unit {
    UNITS.get("W/m²").expect("built-in unit")
}

pub fn illuminance() -> &'static Unit {
    UNITS.get("lux").expect("built-in unit")
}

pub fn uvi() -> &'static Unit {
    UNITS.get("uvi").expect("built-in unit")
}

// ========== Constructors ==========

pub fn relative_humidity(value: f64) -> Quantity {
    Quantity::new(value, humidity())
}

pub fn bearing(value: f64) -> Quantity {
    Quantity::new(value, direction())
}

pub fn volts(value: f64) -> Quantity {
    Quantity::new(value, voltage())
}

pub fn strikes(value: f64) -> Quantity {
    Quantity::new(value, strike())
}
