//! Bus line filters.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Departure;

/// Opaque filter identifier, unique within a session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterId(String);

impl FilterId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FilterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Restricts displayed rows to a line, optionally in one direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusFilter {
    pub id: FilterId,
    /// Matched exactly against `Departure::bus_number`.
    pub number: String,
    /// Matched exactly against `Departure::destination`; `None` matches any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
}

impl BusFilter {
    /// Whether this filter admits the departure.
    pub fn matches(&self, departure: &Departure) -> bool {
        self.number == departure.bus_number
            && self
                .direction
                .as_ref()
                .is_none_or(|d| *d == departure.destination)
    }

    /// Merge a patch into this filter.
    pub fn apply(&mut self, patch: FilterPatch) {
        if let Some(number) = patch.number {
            self.number = number;
        }
        if let Some(direction) = patch.direction {
            // An empty direction is the "all directions" choice
            self.direction = direction.filter(|d| !d.is_empty());
        }
    }
}

/// Partial update of a filter.
///
/// `direction: Some(None)` clears the direction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FilterPatch {
    #[serde(default)]
    pub number: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub direction: Option<Option<String>>,
}

impl FilterPatch {
    pub fn direction(direction: Option<String>) -> Self {
        Self {
            number: None,
            direction: Some(direction),
        }
    }
}

/// Distinguish a missing field (outer `None`) from an explicit `null`.
fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DepartureTime;

    fn dep(number: &str, dest: &str) -> Departure {
        Departure::new(DepartureTime::new(9, 0).unwrap(), number, dest)
    }

    fn filter(number: &str, direction: Option<&str>) -> BusFilter {
        BusFilter {
            id: FilterId::new("f"),
            number: number.to_string(),
            direction: direction.map(str::to_string),
        }
    }

    #[test]
    fn number_only_matches_any_direction() {
        let f = filter("12", None);
        assert!(f.matches(&dep("12", "A")));
        assert!(f.matches(&dep("12", "C")));
        assert!(!f.matches(&dep("7", "A")));
    }

    #[test]
    fn number_and_direction_must_both_match() {
        let f = filter("12", Some("A"));
        assert!(f.matches(&dep("12", "A")));
        assert!(!f.matches(&dep("12", "C")));
        assert!(!f.matches(&dep("7", "A")));
    }

    #[test]
    fn patch_sets_and_clears_direction() {
        let mut f = filter("12", None);
        f.apply(FilterPatch::direction(Some("Rive".into())));
        assert_eq!(f.direction.as_deref(), Some("Rive"));

        f.apply(FilterPatch::direction(Some(String::new())));
        assert_eq!(f.direction, None);

        f.apply(FilterPatch::direction(Some("Rive".into())));
        f.apply(FilterPatch::direction(None));
        assert_eq!(f.direction, None);
    }

    #[test]
    fn patch_json_distinguishes_null_from_missing() {
        let missing: FilterPatch = serde_json::from_str(r#"{"number":"5"}"#).unwrap();
        assert_eq!(missing.direction, None);

        let null: FilterPatch = serde_json::from_str(r#"{"direction":null}"#).unwrap();
        assert_eq!(null.direction, Some(None));

        let set: FilterPatch = serde_json::from_str(r#"{"direction":"Rive"}"#).unwrap();
        assert_eq!(set.direction, Some(Some("Rive".to_string())));
    }
}
