//! Built-in unit catalog
//!
//! One module per dimension family, each registering its scales and
//! units on a shared builder. [`builtin`] assembles the whole catalog
//! plus the derived patterns for rate readings; the [`UNITS`]
//! registry builds from it on first touch.
//!
//! [`UNITS`]: crate::registry::UNITS

pub mod length;
pub mod mass;
pub mod misc;
pub mod pressure;
pub mod temperature;
pub mod time;

use crate::derived::DerivedSpec;
use crate::dimension::Dimension;
use crate::registry::RegistryBuilder;

/// The full built-in catalog wired onto a fresh builder.
pub(crate) fn builtin() -> RegistryBuilder {
    let builder = RegistryBuilder::new();
    let builder = length::register(builder);
    let builder = mass::register(builder);
    let builder = time::register(builder);
    let builder = temperature::register(builder);
    let builder = pressure::register(builder);
    let builder = misc::register(builder);
    derived(builder)
}

/// Rate patterns. Wind is the unconstrained length-over-time entry;
/// the precipitation entries pin exact unit pairs and therefore win
/// resolution for them.
fn derived(builder: RegistryBuilder) -> RegistryBuilder {
    builder
        .derived(DerivedSpec::new("wind", Dimension::Length, Dimension::Time))
        .derived(
            DerivedSpec::new("precipitation", Dimension::Length, Dimension::Time)
                .fixed_numerator("mm")
                .fixed_denominator("hr"),
        )
        .derived(
            DerivedSpec::new("precipitation", Dimension::Length, Dimension::Time)
                .fixed_numerator("in")
                .fixed_denominator("hr"),
        )
        .derived(
            DerivedSpec::new("precipitationDaily", Dimension::Length, Dimension::Time)
                .fixed_numerator("mm")
                .fixed_denominator("d"),
        )
        .derived(
            DerivedSpec::new("precipitationDaily", Dimension::Length, Dimension::Time)
                .fixed_numerator("in")
                .fixed_denominator("d"),
        )
}
