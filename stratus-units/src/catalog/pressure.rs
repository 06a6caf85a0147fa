//! Pressure units
//!
//! A single metric ladder from pascal to gigapascal plus the usual
//! barometric variants. There is no imperial ladder; psi and inHg are
//! variants off the pascal like the rest.

use stratus_core::SizeClass;

use crate::dimension::{Dimension, UnitSystem};
use crate::quantity::Quantity;
use crate::registry::{RegistryBuilder, UNITS};
use crate::scale::{Scale, ScaleStep};
use crate::unit::Unit;

const ATMOSPHERE_PASCALS: f64 = 101_325.0;
const TECHNICAL_ATMOSPHERE_PASCALS: f64 = 98_066.5;
const PSI_PASCALS: f64 = 6_894.757_293_168;
const MMHG_PASCALS: f64 = 1.0 / 0.007_500_62;
const INHG_PASCALS: f64 = 1.0 / 0.000_295_30;

pub(crate) fn register(builder: RegistryBuilder) -> RegistryBuilder {
    builder
        .scale(Dimension::Pressure, UnitSystem::Metric, ladder())
        .unit(metric_unit("Pascal", "Pa").sized(SizeClass::Tiny))
        .unit(metric_unit("Decapascal", "daPa").sized(SizeClass::Small))
        .unit(
            metric_unit("Hectopascal", "hPa")
                .sized(SizeClass::Medium)
                .alias("mbar")
                .alias("mb"),
        )
        .unit(metric_unit("Kilopascal", "kPa").sized(SizeClass::Large))
        .unit(metric_unit("Megapascal", "MPa").sized(SizeClass::Huge))
        .unit(metric_unit("Gigapascal", "GPa").sized(SizeClass::Huge))
        .unit(variant("Atmosphere", "atm", ATMOSPHERE_PASCALS))
        .unit(variant(
            "TechnicalAtmosphere",
            "at",
            TECHNICAL_ATMOSPHERE_PASCALS,
        ))
        .unit(variant("PoundsPerSquareInch", "psi", PSI_PASCALS))
        .unit(variant("MillimeterOfMercury", "mmHg", MMHG_PASCALS))
        .unit(variant("InchOfMercury", "inHg", INHG_PASCALS))
}

fn ladder() -> Scale {
    Scale::new(
        vec![
            ScaleStep::new("Pascal", 1.0),
            ScaleStep::new("Decapascal", 10.0).uncommon(),
            ScaleStep::new("Hectopascal", 10.0),
            ScaleStep::new("Kilopascal", 10.0),
            ScaleStep::new("Megapascal", 1000.0).uncommon(),
            ScaleStep::new("Gigapascal", 1000.0).uncommon(),
        ],
        "Pascal",
    )
}

fn metric_unit(name: &str, symbol: &str) -> Unit {
    Unit::ladder(name, symbol, Dimension::Pressure, UnitSystem::Metric)
}

fn variant(name: &str, symbol: &str, pascals: f64) -> Unit {
    Unit::variant(name, symbol, Dimension::Pressure, UnitSystem::Metric, pascals)
}

// ========== Accessors ==========

pub fn pascal() -> &'static Unit {
    UNITS.get("Pa").expect("built-in unit")
}

pub fn decapascal() -> &'static Unit {
    UNITS.get("daPa").expect("built-in unit")
}

pub fn hectopascal() -> &'static Unit {
    UNITS.get("hPa").expect("built-in unit")
}

pub fn kilopascal() -> &'static Unit {
    UNITS.get("kPa").expect("built-in unit")
}

pub fn megapascal() -> &'static Unit {
    UNITS.get("MPa").expect("built-in unit")
}

pub fn gigapascal() -> &'static Unit {
    UNITS.get("GPa").expect("built-in unit")
}

pub fn atmosphere() -> &'static Unit {
    UNITS.get("atm").expect("built-in unit")
}

pub fn technical_atmosphere() -> &'static Unit {
    UNITS.get("at").expect("built-in unit")
}

pub fn pounds_per_square_inch() -> &'static Unit {
    UNITS.get("psi").expect("built-in unit")
}

pub fn millimeter_of_mercury() -> &'static Unit {
    UNITS.get("mmHg").expect("built-in unit")
}

pub fn inch_of_mercury() -> &'static Unit {
    UNITS.get("inHg").expect("built-in unit")
}

// ========== Constructors ==========

pub fn pascals(value: f64) -> Quantity {
    Quantity::new(value, pascal())
}

pub fn hectopascals(value: f64) -> Quantity {
    Quantity::new(value, hectopascal())
}
