#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Filter combination types.
//!
//! A [`FilterCombination`] is what the user edits and what saved presets
//! come back as. It may carry client-only bookkeeping (`index`, `id`).
//! [`WireFilter`] is the subset the analyses endpoint accepts.

use serde::{Deserialize, Serialize};

/// A named set of inclusion constraints.
///
/// Empty constraint lists mean "no constraint". Unknown fields are
/// ignored on deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCombination {
    /// Position of the row in the editor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,
    /// Backend id of a saved preset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Display name. Must be non-empty before a request is issued.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub incentives: Vec<String>,
    #[serde(default)]
    pub venue: Vec<String>,
    #[serde(default)]
    pub size: Vec<String>,
    #[serde(default)]
    pub types: Vec<String>,
    /// Only consider hackathons uploaded by the logged in user.
    #[serde(default, rename = "onlyOwn")]
    pub only_own: bool,
}

impl FilterCombination {
    /// Creates an unconstrained combination with the given name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Whether no constraint is set.
    #[must_use]
    pub fn is_unconstrained(&self) -> bool {
        self.incentives.is_empty()
            && self.venue.is_empty()
            && self.size.is_empty()
            && self.types.is_empty()
            && !self.only_own
    }
}

/// The backend-accepted shape of a filter combination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireFilter {
    pub name: String,
    pub incentives: Vec<String>,
    pub venue: Vec<String>,
    pub size: Vec<String>,
    pub types: Vec<String>,
    #[serde(rename = "onlyOwn")]
    pub only_own: bool,
}

impl From<&FilterCombination> for WireFilter {
    fn from(filter: &FilterCombination) -> Self {
        Self {
            name: filter.name.clone(),
            incentives: filter.incentives.clone(),
            venue: filter.venue.clone(),
            size: filter.size.clone(),
            types: filter.types.clone(),
            only_own: filter.only_own,
        }
    }
}

impl From<FilterCombination> for WireFilter {
    fn from(filter: FilterCombination) -> Self {
        Self {
            name: filter.name,
            incentives: filter.incentives,
            venue: filter.venue,
            size: filter.size,
            types: filter.types,
            only_own: filter.only_own,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ignores_unknown_client_fields() {
        let filter: FilterCombination = serde_json::from_value(serde_json::json!({
            "index": 2,
            "name": "X",
            "incentives": ["competitive"],
            "extraClientField": 1,
            "onlyOwn": true,
        }))
        .unwrap();

        assert_eq!(filter.index, Some(2));
        assert_eq!(filter.incentives, ["competitive"]);
        assert!(filter.only_own);
        assert!(filter.venue.is_empty());
    }

    #[test]
    fn wire_filter_drops_client_only_fields() {
        let mut filter = FilterCombination::named("Online");
        filter.index = Some(0);
        filter.id = Some("abc".to_string());
        filter.venue = vec!["online".to_string()];

        let json = serde_json::to_value(WireFilter::from(&filter)).unwrap();
        let keys: Vec<&String> = json.as_object().unwrap().keys().collect();

        assert_eq!(
            keys,
            ["incentives", "name", "onlyOwn", "size", "types", "venue"]
        );
        assert_eq!(json["venue"][0], "online");
    }

    #[test]
    fn named_filter_is_unconstrained() {
        assert!(FilterCombination::named("All").is_unconstrained());

        let mut own = FilterCombination::named("Mine");
        own.only_own = true;
        assert!(!own.is_unconstrained());
    }
}
