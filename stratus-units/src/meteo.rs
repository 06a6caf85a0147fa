//! Derived meteorological readings
//!
//! Dewpoint, heat index, and wind chill. Each formula runs in its
//! native unit, converts the answer back to the input's unit, and
//! hands back a quantity carrying the input's metadata with a fresh
//! title and the calculated flag set.

use crate::catalog::length::{kilometer, mile};
use crate::catalog::misc::humidity;
use crate::catalog::temperature::{celsius, fahrenheit, kelvin};
use crate::catalog::time::hour;
use crate::derived::DerivedQuantity;
use crate::quantity::Quantity;
use crate::unit::UnitError;

const MAGNUS_A: f64 = 243.04;
const MAGNUS_B: f64 = 17.625;

/// Rothfusz regression coefficients over °F and %.
const HEAT_INDEX_F: [f64; 9] = [
    -42.379,
    2.049_015_23,
    10.143_334_27,
    -0.224_775_41,
    -0.006_837_83,
    -0.054_817_17,
    0.001_228_74,
    0.000_852_82,
    -0.000_001_99,
];

/// The same regression restated over °C.
const HEAT_INDEX_C: [f64; 9] = [
    -8.784_694_755_56,
    1.611_394_11,
    2.338_548_838_89,
    -0.146_116_05,
    -0.012_308_094,
    -0.016_424_827_777_8,
    0.002_211_732,
    0.000_725_46,
    -0.000_003_582,
];

/// Normalize a humidity reading: a fraction scales to percent, then
/// the unit's own limits clamp to [0, 100].
pub fn normalize_rh(value: f64) -> Quantity {
    let percent = if value > 0.0 && value < 1.0 {
        value * 100.0
    } else {
        value
    };
    Quantity::new(percent, humidity())
}

/// Magnus-formula dewpoint from temperature and relative humidity.
pub fn dewpoint(temperature: &Quantity, relative_humidity: f64) -> Result<Quantity, UnitError> {
    let rh = normalize_rh(relative_humidity).magnitude();
    let t = temperature.convert_to(celsius())?.magnitude();
    let gamma = (rh / 100.0).ln() + MAGNUS_B * t / (MAGNUS_A + t);
    let dew = MAGNUS_A * gamma / (MAGNUS_B - gamma);
    let result = Quantity::new(dew, celsius()).convert_to(temperature.unit())?;
    Ok(temperature.transform(result).titled("Dewpoint").calculated())
}

/// Rothfusz heat index. Mild air (below 300 K) or very dry air
/// (under 13% humidity) returns the input unchanged.
pub fn heat_index(temperature: &Quantity, relative_humidity: f64) -> Result<Quantity, UnitError> {
    let rh = normalize_rh(relative_humidity).magnitude();
    let kelvins = temperature.convert_to(kelvin())?.magnitude();
    if kelvins < 300.0 || rh < 13.0 {
        return Ok(temperature.clone());
    }
    let fahrenheit_in = temperature.unit().symbol == "f";
    let (coefficients, t) = if fahrenheit_in {
        (HEAT_INDEX_F, temperature.magnitude())
    } else {
        (HEAT_INDEX_C, temperature.convert_to(celsius())?.magnitude())
    };
    let [c1, c2, c3, c4, c5, c6, c7, c8, c9] = coefficients;
    let index = c1
        + c2 * t
        + c3 * rh
        + c4 * t * rh
        + c5 * t * t
        + c6 * rh * rh
        + c7 * t * t * rh
        + c8 * t * rh * rh
        + c9 * t * t * rh * rh;
    let computed = if fahrenheit_in {
        Quantity::new(index, fahrenheit())
    } else {
        Quantity::new(index, celsius())
    };
    let result = computed.convert_to(temperature.unit())?;
    Ok(temperature
        .transform(result)
        .titled("Heat Index")
        .calculated())
}

/// North American wind chill. Light air (under 3 mph) returns the
/// input unchanged; the answer rounds to the input unit's display
/// precision, which is how the charts publish it.
pub fn wind_chill(temperature: &Quantity, wind: &DerivedQuantity) -> Result<Quantity, UnitError> {
    let mph = wind.value_in(mile(), hour())?;
    if mph < 3.0 {
        return Ok(temperature.clone());
    }
    let (chill, unit) = if temperature.unit().symbol == "f" {
        let t = temperature.magnitude();
        let speed = mph.powf(0.16);
        (
            35.74 + 0.6215 * t - 35.75 * speed + 0.4275 * t * speed,
            fahrenheit(),
        )
    } else {
        let t = temperature.convert_to(celsius())?.magnitude();
        let kmh = wind.value_in(kilometer(), hour())?;
        let speed = kmh.powf(0.16);
        (
            13.12 + 0.6215 * t - 11.37 * speed + 0.3965 * t * speed,
            celsius(),
        )
    };
    let computed = Quantity::new(chill, unit).convert_to(temperature.unit())?;
    let precision = temperature.unit().display.precision;
    let result = Quantity::new(computed.value().rounded(precision), temperature.unit());
    Ok(temperature
        .transform(result)
        .titled("Wind Chill")
        .calculated())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::length::miles;
    use crate::catalog::time::hours;
    use crate::derived::compose;
    use approx::assert_relative_eq;

    #[test]
    fn test_normalize_rh_accepts_fractions() {
        assert_relative_eq!(normalize_rh(0.45).magnitude(), 45.0);
        assert_relative_eq!(normalize_rh(45.0).magnitude(), 45.0);
        assert_relative_eq!(normalize_rh(140.0).magnitude(), 100.0);
    }

    #[test]
    fn test_dewpoint_at_room_conditions() {
        let dew = dewpoint(&Quantity::new(20.0, celsius()), 60.0).unwrap();
        assert_eq!(dew.unit().symbol, "c");
        assert_relative_eq!(dew.magnitude(), 12.0, epsilon = 0.05);
        assert_eq!(dew.title(), "Dewpoint");
        assert!(dew.meta().calculated);
    }

    #[test]
    fn test_dewpoint_answers_in_the_input_unit() {
        let dew = dewpoint(&Quantity::new(68.0, fahrenheit()), 60.0).unwrap();
        assert_eq!(dew.unit().symbol, "f");
        assert_relative_eq!(dew.magnitude(), 53.6, epsilon = 0.2);
    }

    #[test]
    fn test_heat_index_returns_mild_input_unchanged() {
        let mild = Quantity::new(20.0, celsius()).titled("Outside");
        let index = heat_index(&mild, 50.0).unwrap();
        assert_relative_eq!(index.magnitude(), 20.0);
        assert_eq!(index.title(), "Outside");
        assert!(!index.meta().calculated);
    }

    #[test]
    fn test_heat_index_on_a_humid_day() {
        let index = heat_index(&Quantity::new(90.0, fahrenheit()), 70.0).unwrap();
        assert_relative_eq!(index.magnitude(), 105.8, epsilon = 0.05);
        assert_eq!(index.title(), "Heat Index");
    }

    #[test]
    fn test_heat_index_in_celsius() {
        let index = heat_index(&Quantity::new(32.0, celsius()), 70.0).unwrap();
        assert_eq!(index.unit().symbol, "c");
        assert_relative_eq!(index.magnitude(), 40.4, epsilon = 0.1);
    }

    #[test]
    fn test_wind_chill_matches_the_published_chart() {
        let wind = compose(miles(10.0), hours(1.0));
        let chill = wind_chill(&Quantity::new(30.0, fahrenheit()), &wind).unwrap();
        assert_relative_eq!(chill.magnitude(), 21.2, epsilon = 1e-6);
        assert_eq!(chill.title(), "Wind Chill");
        assert!(chill.meta().calculated);
    }

    #[test]
    fn test_wind_chill_ignores_light_air() {
        let wind = compose(miles(2.0), hours(1.0));
        let reading = Quantity::new(30.0, fahrenheit());
        let chill = wind_chill(&reading, &wind).unwrap();
        assert_relative_eq!(chill.magnitude(), 30.0);
        assert!(!chill.meta().calculated);
    }

    #[test]
    fn test_wind_chill_in_celsius() {
        let wind = compose(miles(10.0), hours(1.0));
        let chill = wind_chill(&Quantity::new(-1.0, celsius()), &wind).unwrap();
        assert_eq!(chill.unit().symbol, "c");
        assert_relative_eq!(chill.magnitude(), -6.0, epsilon = 0.5);
    }
}
