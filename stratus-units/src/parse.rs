//! Reading text into quantities
//!
//! Accepts the formats stations and config files actually emit:
//! "10.5 mm", "25 mph", "1013.25 hPa", "2.5 mm/hr", "9.8 m/s²". The
//! magnitude keeps the decimal places it was written with.

use stratus_core::Scalar;

use crate::derived::{compose, DerivedQuantity};
use crate::quantity::Quantity;
use crate::registry::UNITS;
use crate::unit::{Unit, UnitError};

/// A parsed reading: a single quantity or a rate.
#[derive(Debug, Clone)]
pub enum ParsedQuantity {
    Atomic(Quantity),
    Rate(DerivedQuantity),
}

impl ParsedQuantity {
    pub fn magnitude(&self) -> f64 {
        match self {
            ParsedQuantity::Atomic(quantity) => quantity.magnitude(),
            ParsedQuantity::Rate(rate) => rate.magnitude(),
        }
    }

    pub fn unit(&self) -> String {
        match self {
            ParsedQuantity::Atomic(quantity) => quantity.unit().symbol.clone(),
            ParsedQuantity::Rate(rate) => rate.unit(),
        }
    }
}

/// Parse a magnitude-and-unit string.
///
/// The unit token resolves through the registry's full chain, so
/// aliases and near-miss spellings work here too. Ratios split once
/// on "/"; a superscript exponent on the denominator nests the ratio
/// that many times.
pub fn parse(text: &str) -> Result<ParsedQuantity, UnitError> {
    let text = text.trim();
    let boundary = text
        .find(|ch: char| !ch.is_ascii_digit() && !matches!(ch, '.' | '-' | '+'))
        .unwrap_or(text.len());
    let (literal, rest) = text.split_at(boundary);
    let value = Scalar::from_literal(literal.trim())?;
    let token = rest.trim();
    if token.is_empty() {
        return Err(UnitError::UnknownUnit(text.to_string()));
    }

    // Symbols may themselves contain a slash (W/m²), so an exact
    // symbol match wins before ratio splitting.
    if let Some(unit) = UNITS.get(token) {
        return Ok(ParsedQuantity::Atomic(Quantity::from_scalar(value, unit)));
    }
    if token == "mph" {
        let miles = Quantity::from_scalar(value, resolve("mi")?);
        let hours = Quantity::new(1.0, resolve("hr")?);
        return Ok(ParsedQuantity::Rate(compose(miles, hours)));
    }
    if let Some((numerator, denominator)) = token.split_once('/') {
        let numerator = Quantity::from_scalar(value, resolve(numerator.trim())?);
        let (denominator, exponent) = split_exponent(denominator.trim());
        let unit = resolve(denominator)?;
        let mut rate = compose(numerator, Quantity::new(1.0, unit));
        for _ in 1..exponent {
            rate = rate.per(Quantity::new(1.0, unit));
        }
        return Ok(ParsedQuantity::Rate(rate));
    }
    Ok(ParsedQuantity::Atomic(Quantity::from_scalar(
        value,
        resolve(token)?,
    )))
}

fn resolve(token: &str) -> Result<&'static Unit, UnitError> {
    UNITS
        .resolve(token)
        .ok_or_else(|| UnitError::UnknownUnit(token.to_string()))
}

/// Split a trailing superscript exponent off a unit token: "s²"
/// yields ("s", 2). A token without one is a first power.
fn split_exponent(token: &str) -> (&str, u32) {
    let mut boundary = token.len();
    let mut digits = Vec::new();
    for (index, ch) in token.char_indices().rev() {
        match superscript_value(ch) {
            Some(value) => {
                digits.push(value);
                boundary = index;
            }
            None => break,
        }
    }
    if digits.is_empty() {
        return (token, 1);
    }
    let mut exponent = 0u32;
    for value in digits.iter().rev() {
        exponent = exponent * 10 + value;
    }
    (&token[..boundary], exponent.max(1))
}

fn superscript_value(ch: char) -> Option<u32> {
    match ch {
        '⁰' => Some(0),
        '¹' => Some(1),
        '²' => Some(2),
        '³' => Some(3),
        '⁴' => Some(4),
        '⁵' => Some(5),
        '⁶' => Some(6),
        '⁷' => Some(7),
        '⁸' => Some(8),
        '⁹' => Some(9),
        _ => None,
    }
}
