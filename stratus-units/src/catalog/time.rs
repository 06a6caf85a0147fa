//! Time units
//!
//! One mixed-system ladder from millisecond to millennium. Week and
//! month are variants off the second: months use the mean Gregorian
//! length rather than a step on the ladder.

use crate::dimension::{Dimension, UnitSystem};
use crate::quantity::Quantity;
use crate::registry::{RegistryBuilder, UNITS};
use crate::scale::{Scale, ScaleStep};
use crate::unit::Unit;

/// Mean Gregorian month in seconds (30.436875 days).
const MONTH_SECONDS: f64 = 2_629_746.0;

const WEEK_SECONDS: f64 = 604_800.0;

pub(crate) fn register(builder: RegistryBuilder) -> RegistryBuilder {
    builder
        .scale(Dimension::Time, UnitSystem::Mixed, ladder())
        .unit(mixed_unit("Millisecond", "ms"))
        .unit(mixed_unit("Second", "s").alias("sec"))
        .unit(mixed_unit("Minute", "min"))
        .unit(mixed_unit("Hour", "hr").alias("h"))
        .unit(mixed_unit("Day", "d"))
        .unit(mixed_unit("Year", "yr"))
        .unit(mixed_unit("Decade", "dec"))
        .unit(mixed_unit("Century", "cen"))
        .unit(mixed_unit("Millennium", "mel"))
        .unit(Unit::variant(
            "Week",
            "wk",
            Dimension::Time,
            UnitSystem::Mixed,
            WEEK_SECONDS,
        ))
        .unit(Unit::variant(
            "Month",
            "mth",
            Dimension::Time,
            UnitSystem::Mixed,
            MONTH_SECONDS,
        ))
}

fn ladder() -> Scale {
    Scale::new(
        vec![
            ScaleStep::new("Millisecond", 1.0),
            ScaleStep::new("Second", 1000.0),
            ScaleStep::new("Minute", 60.0),
            ScaleStep::new("Hour", 60.0),
            ScaleStep::new("Day", 24.0),
            ScaleStep::new("Year", 365.0).uncommon(),
            ScaleStep::new("Decade", 10.0).uncommon(),
            ScaleStep::new("Century", 10.0).uncommon(),
            ScaleStep::new("Millennium", 10.0).uncommon(),
        ],
        "Second",
    )
}

fn mixed_unit(name: &str, symbol: &str) -> Unit {
    Unit::ladder(name, symbol, Dimension::Time, UnitSystem::Mixed)
}

// ========== Accessors ==========

pub fn millisecond() -> &'static Unit {
    UNITS.get("ms").expect("built-in unit")
}

pub fn second() -> &'static Unit {
    UNITS.get("s").expect("built-in unit")
}

pub fn minute() -> &'static Unit {
    UNITS.get("min").expect("built-in unit")
}

pub fn hour() -> &'static Unit {
    UNITS.get("hr").expect("built-in unit")
}

pub fn day() -> &'static Unit {
    UNITS.get("d").expect("built-in unit")
}

pub fn week() -> &'static Unit {
    UNITS.get("wk").expect("built-in unit")
}

pub fn month() -> &'static Unit {
    UNITS.get("mth").expect("built-in unit")
}

pub fn year() -> &'static Unit {
    UNITS.get("yr").expect("built-in unit")
}

pub fn decade() -> &'static Unit {
    UNITS.get("dec").expect("built-in unit")
}

pub fn century() -> &'static Unit {
    UNITS.get("cen").expect("built-in unit")
}

pub fn millennium() -> &'static Unit {
    UNITS.get("mel").expect("built-in unit")
}

// ========== Constructors ==========

pub fn milliseconds(value: f64) -> Quantity {
    Quantity::new(value, millisecond())
}

pub fn seconds(value: f64) -> Quantity {
    Quantity::new(value, second())
}

pub fn minutes(value: f64) -> Quantity {
    Quantity::new(value, minute())
}

pub fn hours(value: f64) -> Quantity {
    Quantity::new(value, hour())
}

pub fn days(value: f64) -> Quantity {
    Quantity::new(value, day())
}

pub fn weeks(value: f64) -> Quantity {
    Quantity::new(value, week())
}

pub fn months(value: f64) -> Quantity {
    Quantity::new(value, month())
}

pub fn years(value: f64) -> Quantity {
    Quantity::new(value, year())
}
