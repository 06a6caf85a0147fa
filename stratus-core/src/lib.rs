//! Stratus Core - Fundamental types
//!
//! This crate provides the core types used throughout Stratus:
//! - `Scalar`: Precision-tracked floating point magnitudes
//! - `DisplayProperties`: Typed display records with override parsing
//! - `Preferences`: Localization targets and display overrides
//! - Fuzzy matching helpers shared by unit and preference lookup

mod config;
mod display;
mod scalar;
pub mod text;

pub use config::{Preferences, PropertyOverrides, UnitPreferences, MATCH_FLOOR};
pub use display::{format_magnitude, format_with_unit, DisplayProperties, PropertyError, SizeClass};
pub use scalar::{Scalar, ScalarError};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        DisplayProperties, Preferences, PropertyError, PropertyOverrides, Scalar, ScalarError,
        SizeClass, UnitPreferences,
    };
}
