//! Analysis request construction.
//!
//! Filter combinations are reduced to their wire-safe subset
//! ([`WireFilter`]) before being JSON-encoded into the query string.

use hackathon_survey_filters_models::{FilterCombination, WireFilter};

use crate::AnalysisError;

/// Path of the analyses endpoint.
pub const ANALYSES_PATH: &str = "/analyses";

/// A filter combination that must not be sent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestValidationError {
    /// The filter at `position` has an empty name.
    #[error("Please provide a name for all filters (filter at position {position} has no name)")]
    MissingFilterName { position: usize },
}

/// Checks filter combinations before dispatch.
///
/// Only the empty string counts as missing; a name of spaces is accepted.
///
/// # Errors
///
/// Returns [`RequestValidationError::MissingFilterName`] for the first
/// filter without a name.
pub fn validate_filters(filters: &[FilterCombination]) -> Result<(), RequestValidationError> {
    match filters.iter().position(|filter| filter.name.is_empty()) {
        Some(position) => Err(RequestValidationError::MissingFilterName { position }),
        None => Ok(()),
    }
}

/// A ready-to-send `GET /analyses` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub path: &'static str,
    /// Selected hackathon ids, in selection order.
    pub hackathons: Vec<String>,
    /// JSON array of [`WireFilter`]s.
    pub filters_json: String,
}

impl AnalysisRequest {
    /// The comma-joined `hackathons` parameter.
    #[must_use]
    pub fn hackathons_param(&self) -> String {
        self.hackathons.join(",")
    }

    /// Query parameters, in wire order.
    #[must_use]
    pub fn query_pairs(&self) -> [(&'static str, String); 2] {
        [
            ("hackathons", self.hackathons_param()),
            ("filters", self.filters_json.clone()),
        ]
    }
}

/// Builds the analyses request for a hackathon selection.
///
/// An empty `filters` slice encodes as `[]`, meaning the selected
/// hackathons are compared without narrowing. Validation is the caller's
/// job (see [`validate_filters`]).
///
/// # Errors
///
/// Returns [`AnalysisError::Json`] if the filters cannot be encoded.
pub fn build_analysis_request<I, S>(
    hackathon_ids: I,
    filters: &[FilterCombination],
) -> Result<AnalysisRequest, AnalysisError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let wire: Vec<WireFilter> = filters.iter().map(WireFilter::from).collect();
    let request = AnalysisRequest {
        path: ANALYSES_PATH,
        hackathons: hackathon_ids.into_iter().map(Into::into).collect(),
        filters_json: serde_json::to_string(&wire)?,
    };

    log::debug!(
        "Built analysis request for {} hackathon(s) with {} filter(s)",
        request.hackathons.len(),
        wire.len()
    );

    Ok(request)
}

/// Splits a comma-joined hackathon id list, ignoring blank segments.
#[must_use]
pub fn parse_hackathon_ids(ids: &str) -> Vec<String> {
    ids.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(ToString::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(value: serde_json::Value) -> FilterCombination {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn rejects_first_filter_without_name() {
        let filters = [
            FilterCombination::named("A"),
            FilterCombination::named(""),
            FilterCombination::named(""),
        ];

        assert_eq!(
            validate_filters(&filters),
            Err(RequestValidationError::MissingFilterName { position: 1 })
        );
        assert!(validate_filters(&[]).is_ok());
        assert!(validate_filters(&[FilterCombination::named(" ")]).is_ok());
    }

    #[test]
    fn serialized_filters_omit_client_fields() {
        let filters = [filter(serde_json::json!({
            "index": 0,
            "id": "saved-1",
            "name": "X",
            "incentives": ["competitive"],
            "venue": [],
            "size": [],
            "types": [],
            "onlyOwn": false,
            "extraClientField": 1,
        }))];

        let request = build_analysis_request(["h1", "h2"], &filters).unwrap();
        let [(hackathons_key, hackathons), (filters_key, encoded)] = request.query_pairs();

        assert_eq!(request.path, "/analyses");
        assert_eq!((hackathons_key, hackathons.as_str()), ("hackathons", "h1,h2"));
        assert_eq!(filters_key, "filters");
        assert!(!encoded.contains("extraClientField"));
        assert!(!encoded.contains("index"));
        assert!(!encoded.contains("saved-1"));

        let decoded: serde_json::Value = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded[0]["name"], "X");
        assert_eq!(decoded[0]["incentives"][0], "competitive");
        assert_eq!(decoded[0]["onlyOwn"], false);
    }

    #[test]
    fn empty_filters_encode_as_empty_array() {
        let request = build_analysis_request(vec!["h1".to_string()], &[]).unwrap();
        assert_eq!(request.filters_json, "[]");
    }

    #[test]
    fn parses_route_ids() {
        assert_eq!(parse_hackathon_ids("a, b,,c"), ["a", "b", "c"]);
        assert!(parse_hackathon_ids("").is_empty());
    }
}
