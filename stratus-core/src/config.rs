//! Localization preferences and display property overrides
//!
//! Deployments carry two tables: which unit each kind of reading should
//! localize to (`"length" -> "mi"`, `"wind" -> "mi,hr"`), and per-type
//! display overrides as `"attr=value"` strings. Both deserialize from
//! plain string maps so they can ride in any config format serde reads.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::display::{DisplayProperties, PropertyError};
use crate::text::{closest_match, fold_key};

/// Keys below this similarity never match. Loose enough to absorb
/// regional spellings, tight enough to reject unrelated kinds.
pub const MATCH_FLOOR: f64 = 0.7;

/// Preferred localization target per kind of reading.
///
/// Keys are kind names (`"length"`, `"temperature"`, `"wind"`); values
/// are unit tokens, or `"numerator,denominator"` pairs for ratio kinds.
/// Lookup degrades gracefully: exact, then case-insensitive, then
/// folded, then fuzzy at [`MATCH_FLOOR`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitPreferences {
    entries: HashMap<String, String>,
}

impl UnitPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, kind: impl Into<String>, unit: impl Into<String>) {
        self.entries.insert(kind.into(), unit.into());
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up the preferred unit for a kind, falling back through
    /// progressively looser matches.
    pub fn unit_for(&self, kind: &str) -> Option<&str> {
        if let Some(unit) = self.entries.get(kind) {
            return Some(unit);
        }
        let lowered = kind.to_lowercase();
        if let Some((_, unit)) = self
            .entries
            .iter()
            .find(|(key, _)| key.to_lowercase() == lowered)
        {
            return Some(unit);
        }
        let folded = fold_key(kind);
        if let Some((_, unit)) = self
            .entries
            .iter()
            .find(|(key, _)| fold_key(key) == folded)
        {
            return Some(unit);
        }
        let (best, _) = closest_match(
            &folded,
            self.entries.keys().map(|k| k.as_str()),
            MATCH_FLOOR,
        )?;
        self.entries.get(best).map(|s| s.as_str())
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.unit_for(kind).is_some()
    }

    /// Ratio kinds store `"n,d"` (or `"n/d"`); split into the pair.
    pub fn pair_for(&self, kind: &str) -> Option<(&str, &str)> {
        let value = self.unit_for(kind)?;
        let (n, d) = value.split_once([',', '/'])?;
        Some((n.trim(), d.trim()))
    }
}

impl FromIterator<(String, String)> for UnitPreferences {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        UnitPreferences {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Display overrides per type or size class, kept as raw
/// `"attr=value"` strings until applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyOverrides {
    entries: HashMap<String, String>,
}

impl PropertyOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, spec: impl Into<String>) {
        self.entries.insert(key.into(), spec.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(|s| s.as_str())
    }

    /// Fold the override for `key` into `props`, if one exists.
    pub fn apply(&self, key: &str, props: &mut DisplayProperties) -> Result<(), PropertyError> {
        if let Some(spec) = self.entries.get(key) {
            props.apply_overrides(spec)?;
        }
        Ok(())
    }
}

impl FromIterator<(String, String)> for PropertyOverrides {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        PropertyOverrides {
            entries: iter.into_iter().collect(),
        }
    }
}

/// The two tables a deployment provides, bundled.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub units: UnitPreferences,
    #[serde(default)]
    pub properties: PropertyOverrides,
}

impl Preferences {
    pub fn new() -> Self {
        Self::default()
    }
}
