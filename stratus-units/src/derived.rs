//! Derived quantities: ratio composition over two dimensions
//!
//! [`compose`] divides one quantity by another of a different
//! dimension and resolves the most specific registered
//! [`DerivedSpec`] for the pair. The ratio's value is always
//! recomputed from its parts; converting a side rebuilds the whole
//! thing rather than patching a cached number.

use std::fmt;
use std::ops::{Div, Mul};

use serde::{Deserialize, Serialize};
use stratus_core::{format_with_unit, DisplayProperties, Scalar, UnitPreferences};
use tracing::warn;

use crate::dimension::Dimension;
use crate::quantity::{Meta, Quantity};
use crate::registry::UNITS;
use crate::unit::{Unit, UnitError};

/// A registered derived pattern: a numerator/denominator dimension
/// pair, optionally pinned to exact unit tokens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedSpec {
    /// Name of the kind; doubles as the preference-table key.
    pub name: String,
    pub numerator: Dimension,
    pub denominator: Dimension,
    pub fixed_numerator: Option<String>,
    pub fixed_denominator: Option<String>,
}

impl DerivedSpec {
    pub fn new(name: &str, numerator: Dimension, denominator: Dimension) -> Self {
        DerivedSpec {
            name: name.to_string(),
            numerator,
            denominator,
            fixed_numerator: None,
            fixed_denominator: None,
        }
    }

    /// Pin the pattern to an exact numerator token.
    pub fn fixed_numerator(mut self, token: &str) -> Self {
        self.fixed_numerator = Some(token.to_string());
        self
    }

    /// Pin the pattern to an exact denominator token.
    pub fn fixed_denominator(mut self, token: &str) -> Self {
        self.fixed_denominator = Some(token.to_string());
        self
    }

    /// Specificity of this pattern for a unit pair: exact pair (1),
    /// fixed denominator (2), fixed numerator (3), unconstrained (4).
    /// `None` when the pattern does not apply at all.
    pub(crate) fn rank(&self, numerator: &Unit, denominator: &Unit) -> Option<u8> {
        if self.numerator != numerator.dimension || self.denominator != denominator.dimension {
            return None;
        }
        let pinned_n = match &self.fixed_numerator {
            Some(token) if *token != numerator.symbol => return None,
            Some(_) => true,
            None => false,
        };
        let pinned_d = match &self.fixed_denominator {
            Some(token) if *token != denominator.symbol => return None,
            Some(_) => true,
            None => false,
        };
        Some(match (pinned_n, pinned_d) {
            (true, true) => 1,
            (false, true) => 2,
            (true, false) => 3,
            (false, false) => 4,
        })
    }

    pub(crate) fn same_pattern(&self, other: &DerivedSpec) -> bool {
        self.numerator == other.numerator
            && self.denominator == other.denominator
            && self.fixed_numerator == other.fixed_numerator
            && self.fixed_denominator == other.fixed_denominator
    }

    pub(crate) fn numerator_pattern(&self) -> String {
        self.fixed_numerator
            .clone()
            .unwrap_or_else(|| self.numerator.name().to_string())
    }

    pub(crate) fn denominator_pattern(&self) -> String {
        self.fixed_denominator
            .clone()
            .unwrap_or_else(|| self.denominator.name().to_string())
    }
}

/// Numerator of a derived quantity: atomic, or itself derived, which
/// is how acceleration-shaped units (m/s²) arise.
#[derive(Debug, Clone)]
pub enum Operand {
    Atomic(Quantity),
    Derived(Box<DerivedQuantity>),
}

impl Operand {
    pub fn value(&self) -> Scalar {
        match self {
            Operand::Atomic(quantity) => quantity.value(),
            Operand::Derived(derived) => derived.value(),
        }
    }

    fn push_tokens(&self, tokens: &mut Vec<String>) {
        match self {
            Operand::Atomic(quantity) => tokens.push(quantity.unit().symbol.clone()),
            Operand::Derived(derived) => derived.push_tokens(tokens),
        }
    }

    fn times(self, factor: f64) -> Operand {
        match self {
            Operand::Atomic(quantity) => Operand::Atomic(quantity * factor),
            Operand::Derived(derived) => Operand::Derived(Box::new(*derived * factor)),
        }
    }

    fn over(self, divisor: f64) -> Operand {
        match self {
            Operand::Atomic(quantity) => Operand::Atomic(quantity / divisor),
            Operand::Derived(derived) => Operand::Derived(Box::new(*derived / divisor)),
        }
    }
}

/// A ratio of two quantities.
#[derive(Debug, Clone)]
pub struct DerivedQuantity {
    numerator: Operand,
    denominator: Quantity,
    spec: Option<&'static DerivedSpec>,
    meta: Meta,
}

/// Compose a derived quantity, resolving the most specific registered
/// pattern for the unit pair. An unmatched pair stays anonymous.
pub fn compose(numerator: Quantity, denominator: Quantity) -> DerivedQuantity {
    let spec = UNITS.resolve_derived(numerator.unit(), denominator.unit());
    DerivedQuantity {
        numerator: Operand::Atomic(numerator),
        denominator,
        spec,
        meta: Meta::default(),
    }
}

impl DerivedQuantity {
    /// Divide further, nesting this ratio as the numerator. Nested
    /// ratios stay anonymous; the pattern table only describes
    /// dimension pairs.
    pub fn per(self, denominator: Quantity) -> DerivedQuantity {
        DerivedQuantity {
            numerator: Operand::Derived(Box::new(self)),
            denominator,
            spec: None,
            meta: Meta::default(),
        }
    }

    // ========== Accessors ==========

    pub fn numerator(&self) -> &Operand {
        &self.numerator
    }

    pub fn denominator(&self) -> &Quantity {
        &self.denominator
    }

    pub fn spec(&self) -> Option<&'static DerivedSpec> {
        self.spec
    }

    pub fn meta(&self) -> &Meta {
        &self.meta
    }

    pub fn titled(mut self, title: &str) -> Self {
        self.meta.title = Some(title.to_string());
        self
    }

    pub fn calculated(mut self) -> Self {
        self.meta.calculated = true;
        self
    }

    pub fn title(&self) -> &str {
        if let Some(title) = self.meta.title.as_deref() {
            return title;
        }
        self.spec.map(|spec| spec.name.as_str()).unwrap_or("ratio")
    }

    /// The ratio's magnitude: numerator over denominator, recomputed
    /// on every call.
    pub fn value(&self) -> Scalar {
        self.numerator.value() / self.denominator.value()
    }

    pub fn magnitude(&self) -> f64 {
        self.value().value()
    }

    /// The composed unit string: tokens joined with "/", repeated
    /// adjacent tokens folded into an exponent ("m/s/s" → "m/s²"),
    /// and the customary "mph" contraction for mi over hr.
    pub fn unit(&self) -> String {
        let mut tokens = Vec::new();
        self.push_tokens(&mut tokens);
        if tokens == ["mi", "hr"] {
            return "mph".to_string();
        }
        fold_tokens(&tokens).join("/")
    }

    fn push_tokens(&self, tokens: &mut Vec<String>) {
        self.numerator.push_tokens(tokens);
        tokens.push(self.denominator.unit().symbol.clone());
    }

    // ========== Conversion ==========

    /// Convert both sides of an atomic ratio, re-resolving the
    /// pattern. A nested numerator has no single target unit, so the
    /// composed token is reported as unknown.
    pub fn convert_to(
        &self,
        numerator: &'static Unit,
        denominator: &'static Unit,
    ) -> Result<DerivedQuantity, UnitError> {
        let Operand::Atomic(current) = &self.numerator else {
            return Err(UnitError::UnknownUnit(self.unit()));
        };
        let converted_n = current.convert_to(numerator)?;
        let converted_d = self.denominator.convert_to(denominator)?;
        let spec = UNITS.resolve_derived(converted_n.unit(), converted_d.unit());
        Ok(DerivedQuantity {
            numerator: Operand::Atomic(converted_n),
            denominator: converted_d,
            spec,
            meta: self.meta.clone(),
        })
    }

    /// The magnitude this ratio takes over the given unit pair.
    pub fn value_in(
        &self,
        numerator: &'static Unit,
        denominator: &'static Unit,
    ) -> Result<f64, UnitError> {
        Ok(self.convert_to(numerator, denominator)?.magnitude())
    }

    /// Convert to the unit pair the preference table names for this
    /// kind. The entry holds "n,d" or "n/d" tokens, the bare "mph"
    /// contraction, or `*` to keep the spec's fixed unit for that
    /// side. Any miss returns the receiver unchanged.
    pub fn localize(&self, preferences: &UnitPreferences) -> DerivedQuantity {
        let key = match (&self.spec, &self.numerator) {
            (Some(spec), _) => spec.name.clone(),
            (None, Operand::Atomic(quantity)) => format!(
                "{}/{}",
                quantity.dimension().name(),
                self.denominator.dimension().name()
            ),
            (None, Operand::Derived(_)) => return self.clone(),
        };
        let (n_token, d_token) = match preferences.pair_for(&key) {
            Some(pair) => pair,
            None => match preferences.unit_for(&key) {
                Some("mph") => ("mi", "hr"),
                _ => return self.clone(),
            },
        };

        let numerator = match &self.numerator {
            Operand::Atomic(quantity) => {
                let fixed = self.spec.and_then(|spec| spec.fixed_numerator.as_deref());
                match convert_for(quantity, n_token, fixed) {
                    Some(converted) => Operand::Atomic(converted),
                    None => return self.clone(),
                }
            }
            // A nested numerator localizes through its own pattern.
            Operand::Derived(inner) => Operand::Derived(Box::new(inner.localize(preferences))),
        };
        let fixed = self.spec.and_then(|spec| spec.fixed_denominator.as_deref());
        let denominator = match convert_for(&self.denominator, d_token, fixed) {
            Some(converted) => converted,
            None => return self.clone(),
        };

        let spec = match &numerator {
            Operand::Atomic(quantity) => UNITS.resolve_derived(quantity.unit(), denominator.unit()),
            Operand::Derived(_) => None,
        };
        DerivedQuantity {
            numerator,
            denominator,
            spec,
            meta: self.meta.clone(),
        }
    }

    fn display_properties(&self) -> DisplayProperties {
        match &self.numerator {
            Operand::Atomic(quantity) => quantity.unit().display.clone(),
            Operand::Derived(inner) => inner.display_properties(),
        }
    }
}

/// Resolve one side's preferred token and convert to it. A wildcard
/// falls back to the spec's fixed token, or keeps the current unit
/// when nothing is pinned.
fn convert_for(quantity: &Quantity, token: &str, fixed: Option<&str>) -> Option<Quantity> {
    let token = if token == "*" {
        match fixed {
            Some(fixed) => fixed,
            None => return Some(quantity.clone()),
        }
    } else {
        token
    };
    let Some(unit) = UNITS.resolve(token) else {
        warn!(token, "preferred unit did not resolve");
        return None;
    };
    match quantity.convert_to(unit) {
        Ok(converted) => Some(converted),
        Err(error) => {
            warn!(%error, "localization failed");
            None
        }
    }
}

fn fold_tokens(tokens: &[String]) -> Vec<String> {
    let mut folded: Vec<String> = Vec::new();
    let mut run: Option<(&String, usize)> = None;
    for token in tokens {
        run = match run {
            Some((current, count)) if current == token => Some((current, count + 1)),
            Some((current, count)) => {
                folded.push(write_run(current, count));
                Some((token, 1))
            }
            None => Some((token, 1)),
        };
    }
    if let Some((current, count)) = run {
        folded.push(write_run(current, count));
    }
    folded
}

fn write_run(token: &str, count: usize) -> String {
    if count == 1 {
        return token.to_string();
    }
    format!("{}{}", token, superscript(count))
}

fn superscript(power: usize) -> String {
    const DIGITS: [char; 10] = ['⁰', '¹', '²', '³', '⁴', '⁵', '⁶', '⁷', '⁸', '⁹'];
    power
        .to_string()
        .chars()
        .map(|digit| DIGITS[digit as usize - '0' as usize])
        .collect()
}

impl Mul<f64> for DerivedQuantity {
    type Output = DerivedQuantity;

    /// Scales the numerator; the denominator stays fixed.
    fn mul(mut self, rhs: f64) -> DerivedQuantity {
        self.numerator = self.numerator.times(rhs);
        self
    }
}

impl Div<f64> for DerivedQuantity {
    type Output = DerivedQuantity;

    fn div(mut self, rhs: f64) -> DerivedQuantity {
        self.numerator = self.numerator.over(rhs);
        self
    }
}

impl PartialEq for DerivedQuantity {
    fn eq(&self, other: &Self) -> bool {
        self.unit() == other.unit() && self.value() == other.value()
    }
}

impl fmt::Display for DerivedQuantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let props = self.display_properties();
        write!(
            f,
            "{}",
            format_with_unit(self.value(), "", &self.unit(), &props)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn quantity(value: f64, token: &str) -> Quantity {
        Quantity::of(value, token).unwrap()
    }

    #[test]
    fn test_compose_meters_over_seconds() {
        let speed = compose(quantity(10.0, "m"), quantity(2.0, "s"));
        assert_eq!(speed.unit(), "m/s");
        assert_relative_eq!(speed.magnitude(), 5.0);
        assert_eq!(speed.spec().unwrap().name, "wind");
    }

    #[test]
    fn test_mile_over_hour_contracts_to_mph() {
        let speed = compose(quantity(1.0, "mi"), quantity(1.0, "hr"));
        assert_eq!(speed.unit(), "mph");
        assert_relative_eq!(speed.magnitude(), 1.0);
    }

    #[test]
    fn test_precipitation_beats_the_generic_pattern() {
        let rate = compose(quantity(2.5, "mm"), quantity(1.0, "hr"));
        assert_eq!(rate.spec().unwrap().name, "precipitation");
        assert_eq!(rate.unit(), "mm/hr");
        let daily = compose(quantity(12.0, "mm"), quantity(1.0, "d"));
        assert_eq!(daily.spec().unwrap().name, "precipitationDaily");
    }

    #[test]
    fn test_value_recomputes_from_parts() {
        let rate = compose(quantity(25.4, "mm"), quantity(1.0, "hr"));
        let imperial = rate
            .convert_to(
                UNITS.resolve("in").unwrap(),
                UNITS.resolve("hr").unwrap(),
            )
            .unwrap();
        assert_eq!(imperial.unit(), "in/hr");
        assert_relative_eq!(imperial.magnitude(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_nested_ratio_folds_exponent() {
        let acceleration = compose(quantity(9.8, "m"), quantity(1.0, "s")).per(quantity(1.0, "s"));
        assert_eq!(acceleration.unit(), "m/s²");
        assert_relative_eq!(acceleration.magnitude(), 9.8);
        assert!(acceleration.spec().is_none());
    }

    #[test]
    fn test_scalar_ops_hold_denominator_fixed() {
        let speed = compose(quantity(10.0, "m"), quantity(2.0, "s"));
        let doubled = speed * 2.0;
        assert_relative_eq!(doubled.magnitude(), 10.0);
        assert_relative_eq!(doubled.denominator().magnitude(), 2.0);
        let halved = doubled / 4.0;
        assert_relative_eq!(halved.magnitude(), 2.5);
    }

    #[test]
    fn test_localize_converts_both_sides() {
        let mut preferences = UnitPreferences::new();
        preferences.set("wind", "km,hr");
        let speed = compose(quantity(10.0, "m"), quantity(1.0, "s"));
        let localized = speed.localize(&preferences);
        assert_eq!(localized.unit(), "km/hr");
        assert_relative_eq!(localized.magnitude(), 36.0, epsilon = 1e-9);
    }

    #[test]
    fn test_localize_accepts_the_mph_contraction() {
        let mut preferences = UnitPreferences::new();
        preferences.set("wind", "mph");
        let speed = compose(quantity(5.0, "m"), quantity(1.0, "s"));
        let localized = speed.localize(&preferences);
        assert_eq!(localized.unit(), "mph");
        assert_relative_eq!(localized.magnitude(), 11.184_681, epsilon = 1e-4);
    }

    #[test]
    fn test_localize_wildcard_keeps_fixed_side() {
        let mut preferences = UnitPreferences::new();
        preferences.set("precipitation", "in/*");
        let rate = compose(quantity(25.4, "mm"), quantity(1.0, "hr"));
        let localized = rate.localize(&preferences);
        assert_eq!(localized.unit(), "in/hr");
        assert_relative_eq!(localized.magnitude(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_localize_miss_returns_receiver() {
        let preferences = UnitPreferences::new();
        let speed = compose(quantity(3.0, "m"), quantity(1.0, "s"));
        let localized = speed.localize(&preferences);
        assert_eq!(localized.unit(), "m/s");
        assert_relative_eq!(localized.magnitude(), 3.0);
    }

    #[test]
    fn test_localize_is_idempotent() {
        let mut preferences = UnitPreferences::new();
        preferences.set("wind", "km,hr");
        let speed = compose(quantity(10.0, "m"), quantity(1.0, "s"));
        let once = speed.localize(&preferences);
        let twice = once.localize(&preferences);
        assert_eq!(once.unit(), twice.unit());
        assert_relative_eq!(once.magnitude(), twice.magnitude());
    }

    #[test]
    fn test_equality_by_unit_and_value() {
        let left = compose(quantity(10.0, "m"), quantity(2.0, "s"));
        let right = compose(quantity(5.0, "m"), quantity(1.0, "s"));
        assert_eq!(left, right);
        let slower = compose(quantity(4.0, "m"), quantity(1.0, "s"));
        assert_ne!(left, slower);
    }

    #[test]
    fn test_display_appends_the_composed_unit() {
        let speed = compose(quantity(5.0, "m"), quantity(1.0, "s"));
        assert_eq!(speed.to_string(), "5 m/s");
    }

    #[test]
    fn test_metadata_builders() {
        let gust = compose(quantity(18.0, "m"), quantity(1.0, "s"))
            .titled("Gust")
            .calculated();
        assert_eq!(gust.title(), "Gust");
        assert!(gust.meta().calculated);
        let plain = compose(quantity(1.0, "m"), quantity(1.0, "s"));
        assert_eq!(plain.title(), "wind");
    }
}
