#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Hackathon metadata, survey upload payloads, and the auth token.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// Incentive structure of a hackathon.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Incentive {
    Cooperative,
    Competitive,
}

/// Where a hackathon took place.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
pub enum Venue {
    #[serde(rename = "in person")]
    #[strum(serialize = "in person")]
    InPerson,
    #[serde(rename = "online")]
    #[strum(serialize = "online")]
    Online,
    #[serde(rename = "hybrid")]
    #[strum(serialize = "hybrid")]
    Hybrid,
}

/// Participant count bucket: small is up to 50, medium up to 150.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum HackathonSize {
    Small,
    Medium,
    Large,
}

/// Primary focus of a hackathon.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum HackathonType {
    Prototype,
    Conceptual,
    Analysis,
    Education,
    Community,
    Ideation,
}

/// Descriptive metadata entered when uploading a hackathon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HackathonInformation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    pub incentives: Incentive,
    pub venue: Venue,
    pub size: HackathonSize,
    #[serde(default)]
    pub types: Vec<HackathonType>,
    /// Start date as entered (`YYYY-MM-DD`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl HackathonInformation {
    /// Multipart text fields for the CSV upload form, in form order.
    /// Each hackathon type becomes its own `types` field.
    #[must_use]
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("title", self.title.clone()),
            ("incentives", self.incentives.to_string()),
            ("venue", self.venue.to_string()),
            ("size", self.size.to_string()),
        ];
        fields.extend(self.types.iter().map(|t| ("types", t.to_string())));
        for (name, value) in [("start", &self.start), ("end", &self.end), ("link", &self.link)] {
            if let Some(value) = value {
                fields.push((name, value.clone()));
            }
        }
        fields
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextAnswer {
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextAnswers {
    #[serde(default)]
    pub answers: Vec<TextAnswer>,
}

/// One answered question in a Google Forms response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAnswer {
    pub question_id: String,
    pub text_answers: TextAnswers,
}

/// A single Google Forms survey response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawResponse {
    pub response_id: String,
    /// RFC 3339 timestamp, passed through untouched.
    pub create_time: String,
    pub last_submitted_time: String,
    /// Question id → answer.
    #[serde(default)]
    pub answers: BTreeMap<String, RawAnswer>,
}

/// The responses document returned by the Google Forms API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawResponses {
    #[serde(default)]
    pub responses: Vec<RawResponse>,
}

/// Upload payload for `POST /hackathons/google`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawHackathon {
    #[serde(flatten)]
    pub information: HackathonInformation,
    pub results: RawResponses,
}

/// Access token returned by `POST /users/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub token_type: String,
}

/// Username/password pair for registration and login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn information() -> HackathonInformation {
        HackathonInformation {
            id: None,
            title: "Spring Jam".to_string(),
            incentives: Incentive::Competitive,
            venue: Venue::InPerson,
            size: HackathonSize::Medium,
            types: vec![HackathonType::Prototype, HackathonType::Ideation],
            start: Some("2024-03-01".to_string()),
            end: None,
            link: None,
        }
    }

    #[test]
    fn venue_uses_form_values() {
        assert_eq!(Venue::InPerson.to_string(), "in person");
        assert_eq!(
            serde_json::to_value(Venue::InPerson).unwrap(),
            serde_json::json!("in person")
        );
        assert_eq!("online".parse::<Venue>().unwrap(), Venue::Online);
    }

    #[test]
    fn form_fields_repeat_types_and_skip_missing_dates() {
        let fields = information().form_fields();

        assert_eq!(
            fields,
            [
                ("title", "Spring Jam".to_string()),
                ("incentives", "competitive".to_string()),
                ("venue", "in person".to_string()),
                ("size", "medium".to_string()),
                ("types", "prototype".to_string()),
                ("types", "ideation".to_string()),
                ("start", "2024-03-01".to_string()),
            ]
        );
    }

    #[test]
    fn raw_hackathon_flattens_information() {
        let hackathon = RawHackathon {
            information: information(),
            results: RawResponses::default(),
        };

        let json = serde_json::to_value(&hackathon).unwrap();
        assert_eq!(json["title"], "Spring Jam");
        assert_eq!(json["types"][1], "ideation");
        assert!(json["results"]["responses"].as_array().unwrap().is_empty());
    }

    #[test]
    fn parses_google_forms_response() {
        let responses: RawResponses = serde_json::from_value(serde_json::json!({
            "responses": [{
                "responseId": "r1",
                "createTime": "2024-03-02T10:00:00Z",
                "lastSubmittedTime": "2024-03-02T10:05:00Z",
                "answers": {
                    "q1": {"questionId": "q1", "textAnswers": {"answers": [{"value": "Yes"}]}}
                }
            }]
        }))
        .unwrap();

        let answer = &responses.responses[0].answers["q1"];
        assert_eq!(answer.text_answers.answers[0].value, "Yes");
    }
}
