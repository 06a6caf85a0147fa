//! Stratus Units - Typed Weather Quantities
//!
//! Weather measurements as typed quantities: a magnitude bound to its
//! unit, dimension, and display rules. Conversion walks per-system
//! scales and crosses systems through one anchor formula per
//! dimension; readings localize against user preferences without ever
//! failing the pipeline.
//!
//! Families:
//! - Length (mm, cm, m, km, in, ft, mi, etc.)
//! - Mass (mg, g, kg, oz, lbs, etc.)
//! - Time (ms, s, min, hr, d, wk, mth, etc.)
//! - Temperature (c, f, k)
//! - Pressure (Pa, hPa, atm, psi, inHg, etc.)
//! - Station channels (rh, deg, v, strikes, W/m², lux, uvi)
//! - Rates (m/s, mph, mm/hr, etc.)

mod derived;
mod dimension;
mod meteo;
mod parse;
mod quantity;
mod registry;
mod scale;
mod unit;

pub mod catalog;

pub use derived::{compose, DerivedQuantity, DerivedSpec, Operand};
pub use dimension::{CrossAnchor, Dimension, UnitSystem};
pub use meteo::{dewpoint, heat_index, normalize_rh, wind_chill};
pub use parse::{parse, ParsedQuantity};
pub use quantity::{Meta, Quantity, Quotient};
pub use registry::{RegistryBuilder, UnitRegistry, UNITS};
pub use scale::{Scale, ScaleStep};
pub use unit::{Unit, UnitError, UnitKind};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::catalog::length::{feet, inches, kilometers, meters, miles, millimeters};
    pub use crate::catalog::misc::{bearing, relative_humidity, volts};
    pub use crate::catalog::pressure::{hectopascals, pascals};
    pub use crate::catalog::temperature::{celsius, fahrenheit, kelvin};
    pub use crate::catalog::time::{days, hours, minutes, seconds};
    pub use crate::{
        compose, parse, Dimension, DerivedQuantity, Quantity, Quotient, UnitError, UNITS,
    };
}
