//! Typed display records for quantities
//!
//! Every quantity renders through a [`DisplayProperties`] record rather
//! than ad-hoc format strings. Providers hand overrides across as
//! `"attr=value"` text (`"max=4, precision=2, unitSpacer=False"`), which
//! [`DisplayProperties::apply_overrides`] folds into the typed record.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::scalar::{int_digits, Scalar};

/// Suffixes applied as the shortening loop divides by 1000.
const SHORTEN_SUFFIXES: [&str; 4] = ["", "k", "m", "B"];

/// Error type for override parsing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PropertyError {
    #[error("malformed override entry: {0:?} (expected attr=value)")]
    BadEntry(String),
    #[error("unknown display property: {0}")]
    UnknownKey(String),
    #[error("invalid value {value:?} for property {key}")]
    BadValue { key: String, value: String },
}

/// Rough magnitude class of a reading, used as a layout hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeClass {
    Tiny,
    Small,
    #[default]
    Medium,
    Large,
    Huge,
}

impl SizeClass {
    /// Provider key for this class (`"tiny"`, `"small"`, ...).
    pub fn name(self) -> &'static str {
        match self {
            SizeClass::Tiny => "tiny",
            SizeClass::Small => "small",
            SizeClass::Medium => "medium",
            SizeClass::Large => "large",
            SizeClass::Huge => "huge",
        }
    }

    /// Preset display record for this class. Finer units get a wider
    /// digit budget, coarser units more decimal places.
    pub fn properties(self) -> DisplayProperties {
        let (max_digits, precision) = match self {
            SizeClass::Tiny => (5, 1),
            SizeClass::Small => (4, 1),
            SizeClass::Medium => (3, 1),
            SizeClass::Large => (3, 2),
            SizeClass::Huge => (2, 2),
        };
        DisplayProperties {
            max_digits,
            precision,
            size: self,
            ..DisplayProperties::default()
        }
    }
}

/// How a quantity renders: digit budget, spacing, and shortening.
///
/// `max_digits` caps the integer digits shown before the shortening
/// loop kicks in. `precision` is the display precision, distinct from
/// the tracked precision on [`Scalar`]. The decorator (`º`, `%`) binds
/// tight to the value; the spacer sits between value and unit symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayProperties {
    pub max_digits: u8,
    pub precision: u8,
    pub unit_spacer: bool,
    pub show_unit: bool,
    pub shorten: bool,
    pub grouping: bool,
    pub size: SizeClass,
}

impl Default for DisplayProperties {
    fn default() -> Self {
        DisplayProperties {
            max_digits: 3,
            precision: 1,
            unit_spacer: true,
            show_unit: true,
            shorten: true,
            grouping: false,
            size: SizeClass::Medium,
        }
    }
}

impl DisplayProperties {
    // ========== Overrides ==========

    /// Apply a comma-separated `"attr=value"` override string.
    ///
    /// Keys match the provider convention (`max`, `precision`,
    /// `unitSpacer`, `showUnit`, `shorten`, `thousandsSeparator`,
    /// `size`). Unknown keys are rejected rather than silently set.
    pub fn apply_overrides(&mut self, spec: &str) -> Result<(), PropertyError> {
        for entry in spec.split(',') {
            let entry = entry.trim();
            if entry.is_empty() {
                continue;
            }
            let (key, value) = entry
                .split_once('=')
                .ok_or_else(|| PropertyError::BadEntry(entry.to_string()))?;
            let (key, value) = (key.trim(), value.trim());
            match key {
                "max" => self.max_digits = parse_digits(key, value)?,
                "precision" => self.precision = parse_digits(key, value)?,
                "unitSpacer" => self.unit_spacer = parse_bool(key, value)?,
                "showUnit" => self.show_unit = parse_bool(key, value)?,
                "shorten" => self.shorten = parse_bool(key, value)?,
                "thousandsSeparator" => self.grouping = parse_bool(key, value)?,
                "size" => self.size = parse_size(key, value)?,
                _ => return Err(PropertyError::UnknownKey(key.to_string())),
            }
        }
        Ok(())
    }

    /// Copy with overrides applied, for call sites that keep the base.
    pub fn with_overrides(&self, spec: &str) -> Result<Self, PropertyError> {
        let mut props = self.clone();
        props.apply_overrides(spec)?;
        Ok(props)
    }
}

fn parse_digits(key: &str, value: &str) -> Result<u8, PropertyError> {
    value.parse().map_err(|_| PropertyError::BadValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_bool(key: &str, value: &str) -> Result<bool, PropertyError> {
    match value {
        "True" | "true" => Ok(true),
        "False" | "false" => Ok(false),
        _ => Err(PropertyError::BadValue {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

fn parse_size(key: &str, value: &str) -> Result<SizeClass, PropertyError> {
    match value {
        "tiny" => Ok(SizeClass::Tiny),
        "small" => Ok(SizeClass::Small),
        "medium" => Ok(SizeClass::Medium),
        "large" => Ok(SizeClass::Large),
        "huge" => Ok(SizeClass::Huge),
        _ => Err(PropertyError::BadValue {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

// ========== Rendering ==========

/// Render a bare magnitude: shortening, display precision, grouping.
pub fn format_magnitude(value: Scalar, props: &DisplayProperties) -> String {
    render(value, props, "", None)
}

/// Render a magnitude with its decorator and unit symbol attached.
pub fn format_with_unit(
    value: Scalar,
    decorator: &str,
    symbol: &str,
    props: &DisplayProperties,
) -> String {
    let unit = if props.show_unit && !symbol.is_empty() {
        Some(symbol)
    } else {
        None
    };
    render(value, props, decorator, unit)
}

fn render(value: Scalar, props: &DisplayProperties, decorator: &str, unit: Option<&str>) -> String {
    let mut magnitude = value.value();
    let mut steps = 0usize;
    if props.shorten {
        // Walk down in steps of 1000 until the integer part fits the
        // digit budget; saturate at the last suffix rather than run out.
        while int_digits(magnitude) >= 4
            && int_digits(magnitude) > u32::from(props.max_digits)
            && steps + 1 < SHORTEN_SUFFIXES.len()
        {
            magnitude /= 1000.0;
            steps += 1;
        }
    }
    let suffix = SHORTEN_SUFFIXES[steps];

    // Decimals actually carried after rounding; a shortened whole
    // number keeps one place so "2k" reads "2.0k".
    let decimals = shown_decimals(magnitude, props.precision, steps > 0);
    let mut text = format!("{:.*}", decimals as usize, magnitude);
    if props.grouping {
        text = group_thousands(&text);
    }
    text.push_str(suffix);
    text.push_str(decorator);
    if let Some(unit) = unit {
        if props.unit_spacer {
            text.push(' ');
        }
        let _ = write!(text, "{}", unit);
    }
    text
}

/// Decimal places that survive rounding to the display precision.
fn shown_decimals(value: f64, precision: u8, shortened: bool) -> u8 {
    let factor = 10f64.powi(precision as i32);
    let rounded = (value * factor).round() / factor;
    let text = format!("{:.*}", precision as usize, rounded);
    let carried = match text.split_once('.') {
        Some((_, frac)) => frac.trim_end_matches('0').len() as u8,
        None => 0,
    };
    if carried == 0 && shortened {
        precision.min(1)
    } else {
        carried.min(precision)
    }
}

fn group_thousands(text: &str) -> String {
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text, None),
    };
    let (sign, digits) = match int_part.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", int_part),
    };
    let mut grouped = String::with_capacity(text.len() + digits.len() / 3);
    grouped.push_str(sign);
    let offset = digits.len() % 3;
    for (i, ch) in digits.chars().enumerate() {
        if i != 0 && (i + 3 - offset) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if let Some(frac) = frac_part {
        grouped.push('.');
        grouped.push_str(frac);
    }
    grouped
}
