//! Precision-tracked floating point magnitudes
//!
//! Sensor values arrive as decimal text; how many decimal places the
//! source wrote is part of the reading. `Scalar` keeps that precision
//! next to the f64 so later rounding, comparison, and formatting can
//! honor it: `1.50` carries two tracked places, `1.5` carries one.

use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for scalar construction
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScalarError {
    #[error("invalid numeric literal: {0}")]
    BadLiteral(String),
}

/// A floating-point magnitude with an optional tracked decimal precision.
///
/// Precision is how many decimal places the source intended, not a bound
/// on the stored value. `None` means untracked (full f64 comparison).
/// Arithmetic keeps the finer of the two operand precisions; equality
/// rounds both sides to the coarser one first, so `1.0 == 1.04` holds
/// when both track one decimal place.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Scalar {
    value: f64,
    precision: Option<u8>,
}

impl Scalar {
    // ========== Construction ==========

    /// Wrap a raw value with untracked precision.
    pub fn new(value: f64) -> Self {
        Scalar { value, precision: None }
    }

    /// Wrap a value with an explicit tracked precision.
    pub fn with_precision(value: f64, precision: u8) -> Self {
        Scalar { value, precision: Some(precision) }
    }

    /// Parse a decimal literal, inferring precision from its decimals.
    ///
    /// `"12"` tracks 0 places, `"1.50"` tracks 2. Scientific notation
    /// opts out of tracking entirely.
    pub fn from_literal(s: &str) -> Result<Self, ScalarError> {
        let s = s.trim();
        let value: f64 = s
            .parse()
            .map_err(|_| ScalarError::BadLiteral(s.to_string()))?;
        Ok(Scalar { value, precision: literal_precision(s) })
    }

    // ========== Accessors ==========

    pub fn value(self) -> f64 {
        self.value
    }

    pub fn precision(self) -> Option<u8> {
        self.precision
    }

    /// Same value, different tracked precision.
    pub fn to_precision(self, precision: u8) -> Self {
        Scalar { value: self.value, precision: Some(precision) }
    }

    /// Same precision, different value. Used when conversion math
    /// replaces the magnitude but the reading's precision survives.
    pub fn map(self, f: impl FnOnce(f64) -> f64) -> Self {
        Scalar { value: f(self.value), precision: self.precision }
    }

    /// A reading that never got a number ends up NaN rather than lost.
    pub fn is_unset(self) -> bool {
        self.value.is_nan()
    }

    // ========== Rounding ==========

    /// Round to `decimals` places (half away from zero, like decimal text).
    pub fn rounded(self, decimals: u8) -> f64 {
        let factor = 10f64.powi(decimals as i32);
        (self.value * factor).round() / factor
    }

    /// Round to the tracked precision; untracked values pass through.
    pub fn round_tracked(self) -> f64 {
        match self.precision {
            Some(p) => self.rounded(p),
            None => self.value,
        }
    }

    /// Digit count of the integer part (`0.4` has one, `1013.25` four).
    pub fn int_digits(self) -> u32 {
        int_digits(self.value)
    }

    pub fn abs(self) -> Self {
        Scalar { value: self.value.abs(), precision: self.precision }
    }

    pub fn powi(self, exp: i32) -> Self {
        Scalar { value: self.value.powi(exp), precision: self.precision }
    }

    pub fn powf(self, exp: f64) -> Self {
        Scalar { value: self.value.powf(exp), precision: self.precision }
    }
}

/// Integer-digit count of the magnitude, ignoring sign.
pub(crate) fn int_digits(value: f64) -> u32 {
    let mut m = value.abs();
    if m.is_nan() || m.is_infinite() {
        return 1;
    }
    let mut digits = 1;
    while m >= 10.0 {
        m /= 10.0;
        digits += 1;
    }
    digits
}

fn literal_precision(s: &str) -> Option<u8> {
    if s.contains(['e', 'E']) {
        return None;
    }
    match s.split_once('.') {
        Some((_, decimals)) => Some(decimals.len().min(u8::MAX as usize) as u8),
        None => Some(0),
    }
}

/// Finer of the two trackings wins; untracked stays out of the way.
fn combine(a: Option<u8>, b: Option<u8>) -> Option<u8> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (Some(a), None) => Some(a),
        (None, Some(b)) => Some(b),
        (None, None) => None,
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        match (self.precision, other.precision) {
            (Some(a), Some(b)) => {
                let p = a.min(b);
                self.rounded(p) == other.rounded(p)
            }
            _ => self.value == other.value,
        }
    }
}

impl PartialOrd for Scalar {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.value.partial_cmp(&other.value)
    }
}

impl Add for Scalar {
    type Output = Scalar;
    fn add(self, rhs: Scalar) -> Scalar {
        Scalar {
            value: self.value + rhs.value,
            precision: combine(self.precision, rhs.precision),
        }
    }
}

impl Sub for Scalar {
    type Output = Scalar;
    fn sub(self, rhs: Scalar) -> Scalar {
        Scalar {
            value: self.value - rhs.value,
            precision: combine(self.precision, rhs.precision),
        }
    }
}

impl Mul for Scalar {
    type Output = Scalar;
    fn mul(self, rhs: Scalar) -> Scalar {
        Scalar {
            value: self.value * rhs.value,
            precision: combine(self.precision, rhs.precision),
        }
    }
}

impl Div for Scalar {
    type Output = Scalar;
    fn div(self, rhs: Scalar) -> Scalar {
        Scalar {
            value: self.value / rhs.value,
            precision: combine(self.precision, rhs.precision),
        }
    }
}

impl Neg for Scalar {
    type Output = Scalar;
    fn neg(self) -> Scalar {
        Scalar { value: -self.value, precision: self.precision }
    }
}

impl Mul<f64> for Scalar {
    type Output = Scalar;
    fn mul(self, rhs: f64) -> Scalar {
        self.map(|v| v * rhs)
    }
}

impl Div<f64> for Scalar {
    type Output = Scalar;
    fn div(self, rhs: f64) -> Scalar {
        self.map(|v| v / rhs)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::new(value)
    }
}

impl From<Scalar> for f64 {
    fn from(scalar: Scalar) -> f64 {
        scalar.value
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.precision {
            Some(p) => {
                let mut text = format!("{:.*}", p as usize, self.value);
                if text.contains('.') {
                    text.truncate(text.trim_end_matches('0').trim_end_matches('.').len());
                }
                write!(f, "{}", text)
            }
            None => write!(f, "{}", self.value),
        }
    }
}
