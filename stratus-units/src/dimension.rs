//! Dimension and unit-system tags
//!
//! Every unit belongs to exactly one [`Dimension`] and one
//! [`UnitSystem`]. When a dimension spans both measurement systems,
//! conversion between them goes through a single [`CrossAnchor`]
//! formula between the two base units.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The closed catalog of physical quantity kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Length,
    Mass,
    Time,
    Temperature,
    Pressure,
    Angle,
    Percentage,
    Voltage,
    Irradiance,
    Illuminance,
    Count,
    Index,
}

impl Dimension {
    /// Every dimension, in catalog order.
    pub const ALL: [Dimension; 12] = [
        Dimension::Length,
        Dimension::Mass,
        Dimension::Time,
        Dimension::Temperature,
        Dimension::Pressure,
        Dimension::Angle,
        Dimension::Percentage,
        Dimension::Voltage,
        Dimension::Irradiance,
        Dimension::Illuminance,
        Dimension::Count,
        Dimension::Index,
    ];

    /// Lowercase name; doubles as the preference-table key.
    pub fn name(self) -> &'static str {
        match self {
            Dimension::Length => "length",
            Dimension::Mass => "mass",
            Dimension::Time => "time",
            Dimension::Temperature => "temperature",
            Dimension::Pressure => "pressure",
            Dimension::Angle => "angle",
            Dimension::Percentage => "percentage",
            Dimension::Voltage => "voltage",
            Dimension::Irradiance => "irradiance",
            Dimension::Illuminance => "illuminance",
            Dimension::Count => "count",
            Dimension::Index => "index",
        }
    }

    /// Dimensional symbol used in diagnostics.
    pub fn symbol(self) -> &'static str {
        match self {
            Dimension::Length => "L",
            Dimension::Mass => "M",
            Dimension::Time => "T",
            Dimension::Temperature => "Θ",
            Dimension::Pressure => "P",
            Dimension::Angle => "∠",
            Dimension::Percentage => "%",
            Dimension::Voltage => "V",
            Dimension::Irradiance => "Ee",
            Dimension::Illuminance => "Ev",
            Dimension::Count => "N",
            Dimension::Index => "I",
        }
    }

    /// The fixed metric↔imperial formula, where one exists.
    pub fn cross_anchor(self) -> Option<CrossAnchor> {
        match self {
            Dimension::Length => Some(CrossAnchor::new(3.280_839_895_013_123)),
            Dimension::Mass => Some(CrossAnchor::new(2.204_622_621_8)),
            Dimension::Temperature => Some(CrossAnchor::with_offset(1.8, 32.0)),
            _ => None,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Which measurement system a unit belongs to.
///
/// `Mixed` covers dimensions that do not split by locale (time,
/// percentages, counts).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    Metric,
    Imperial,
    Mixed,
}

impl UnitSystem {
    pub fn name(self) -> &'static str {
        match self {
            UnitSystem::Metric => "metric",
            UnitSystem::Imperial => "imperial",
            UnitSystem::Mixed => "mixed",
        }
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One fixed conversion formula between two systems' base units:
/// `imperial = metric * factor + offset`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrossAnchor {
    pub factor: f64,
    pub offset: f64,
}

impl CrossAnchor {
    /// Anchor with a proportional factor only.
    pub fn new(factor: f64) -> Self {
        CrossAnchor {
            factor,
            offset: 0.0,
        }
    }

    /// Anchor with factor and offset (temperature).
    pub fn with_offset(factor: f64, offset: f64) -> Self {
        CrossAnchor { factor, offset }
    }

    /// Apply the formula to a metric base-unit value.
    pub fn to_imperial(self, value: f64) -> f64 {
        value * self.factor + self.offset
    }

    /// Invert the formula for an imperial base-unit value.
    pub fn to_metric(self, value: f64) -> f64 {
        (value - self.offset) / self.factor
    }

    /// Factor-only application, for converting differences rather than
    /// absolute readings.
    pub fn delta_to_imperial(self, value: f64) -> f64 {
        value * self.factor
    }

    pub fn delta_to_metric(self, value: f64) -> f64 {
        value / self.factor
    }
}
