#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Survey analysis types shared by the request builder, the mapper, and
//! every chart/table consumer.
//!
//! Two families of types live here:
//!
//! - The raw per-hackathon payload returned by `GET /analyses`
//!   ([`HackathonAnalysis`] → [`AnalysisMeasure`] → [`StatisticalValues`]).
//! - The normalized, chart-ready tree produced by the mapper
//!   ([`MappedAnalysisSection`] → [`MappedAnalysisQuestion`] →
//!   [`HackathonValue`]), plus the section manifest that drives it.
//!
//! Wire field names follow the backend exactly; mapped output uses the
//! camel-cased names the chart components consume.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use strum_macros::{AsRefStr, Display, EnumString};

/// The kind of survey item, which decides both the shape of the mapped
/// output and the visualization that applies.
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
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum QuestionType {
    /// A single item answered on a scale.
    SingleQuestion,
    /// A matrix of sub-items sharing one answer scale.
    GroupQuestion,
    /// A composite score built from Likert sub-items.
    ScoreQuestion,
    /// A categorical item summarized as a distribution.
    CategoryQuestion,
}

impl QuestionType {
    /// Whether mapped questions of this type carry per-sub-question values
    /// instead of one value list.
    #[must_use]
    pub const fn uses_sub_questions(self) -> bool {
        matches!(self, Self::GroupQuestion)
    }
}

/// How the legal answers of a measure map to ordinal values.
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
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AnswerType {
    /// Labels mapped to integer scale points.
    StringToInt,
    /// Free integer answers.
    Int,
    /// Free-form or categorical strings.
    String,
}

/// The value attached to an answer label in a label → value mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    /// A numeric scale point.
    Number(f64),
    /// A textual value.
    Text(String),
}

impl AnswerValue {
    /// Numeric interpretation of this value. Text values are parsed, so
    /// `"5"` yields `Some(5.0)` and `"many"` yields `None`.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// The legal answer set of a measure.
///
/// Either an ordered list of labels, or a label → value mapping whose
/// insertion order is significant (it defines the displayed scale).
#[derive(Debug, Clone, PartialEq)]
pub enum Answers {
    /// Ordered labels.
    Ordered(Vec<String>),
    /// Labels with their ordinal values, in document order.
    Labeled(Vec<(String, AnswerValue)>),
}

impl Default for Answers {
    fn default() -> Self {
        Self::Ordered(Vec::new())
    }
}

impl Answers {
    /// Answer labels in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        let (ordered, labeled) = match self {
            Self::Ordered(labels) => (Some(labels.iter().map(String::as_str)), None),
            Self::Labeled(entries) => (None, Some(entries.iter().map(|(k, _)| k.as_str()))),
        };
        ordered
            .into_iter()
            .flatten()
            .chain(labeled.into_iter().flatten())
    }

    /// Number of answer labels.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Ordered(labels) => labels.len(),
            Self::Labeled(entries) => entries.len(),
        }
    }

    /// Whether there are no answer labels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Upper bound of the value scale, used as the chart maximum.
    ///
    /// Returns `None` when any answer has no numeric interpretation, in
    /// which case charts fall back to automatic scaling.
    #[must_use]
    pub fn max_numeric_value(&self) -> Option<f64> {
        let numbers: Option<Vec<f64>> = match self {
            Self::Ordered(labels) => labels.iter().map(|l| l.trim().parse().ok()).collect(),
            Self::Labeled(entries) => entries.iter().map(|(_, v)| v.as_f64()).collect(),
        };
        numbers?.into_iter().reduce(f64::max)
    }
}

impl Serialize for Answers {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Ordered(labels) => serializer.collect_seq(labels),
            Self::Labeled(entries) => serializer.collect_map(entries.iter().map(|(k, v)| (k, v))),
        }
    }
}

impl<'de> Deserialize<'de> for Answers {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(AnswersVisitor)
    }
}

struct AnswersVisitor;

impl<'de> Visitor<'de> for AnswersVisitor {
    type Value = Answers;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a sequence of answer labels or a label-to-value mapping")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Answers, A::Error> {
        let mut labels = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(label) = seq.next_element::<String>()? {
            labels.push(label);
        }
        Ok(Answers::Ordered(labels))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Answers, A::Error> {
        let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((label, value)) = map.next_entry::<String, AnswerValue>()? {
            entries.push((label, value));
        }
        Ok(Answers::Labeled(entries))
    }
}

/// Summary statistics for one (hackathon, question) or
/// (hackathon, sub-question) pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatisticalValues {
    /// Sample size. `0` is the system-wide "no data" signal.
    #[serde(default)]
    pub participants: u64,
    /// Mean answer value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average: Option<f64>,
    /// Standard deviation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deviation: Option<f64>,
    /// Answer label → frequency count. Empty when there is no data.
    #[serde(default)]
    pub distribution: BTreeMap<String, f64>,
    /// Reliability coefficient, present only on composite scores.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cronbach_alpha: Option<f64>,
}

impl StatisticalValues {
    /// Whether this pair has no data (`participants == 0`).
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.participants == 0
    }
}

/// A sub-question result as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubQuestionResult {
    /// Sub-question title, the join key across hackathons.
    pub title: String,
    /// Statistics for this sub-item.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statistical_values: Option<StatisticalValues>,
}

/// A sub-question entry, either a bare title (instrument definition) or a
/// full result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SubQuestion {
    /// Declared title only.
    Title(String),
    /// Title with statistics.
    Result(SubQuestionResult),
}

impl SubQuestion {
    /// The sub-question title.
    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            Self::Title(title) => title,
            Self::Result(result) => &result.title,
        }
    }

    /// The statistics, when this entry carries any.
    #[must_use]
    pub const fn statistical_values(&self) -> Option<&StatisticalValues> {
        match self {
            Self::Title(_) => None,
            Self::Result(result) => result.statistical_values.as_ref(),
        }
    }
}

/// One question's results for one hackathon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisMeasure {
    /// Question title, identical across hackathons in one request.
    pub title: String,
    /// Optional short label shown above the full title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Shape and visualization selector.
    pub question_type: QuestionType,
    /// Ordinal scale semantics.
    pub answer_type: AnswerType,
    /// Legal answers.
    #[serde(default)]
    pub answers: Answers,
    /// Sub-items of group and composite questions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_questions: Option<Vec<SubQuestion>>,
    /// Statistics for questions without sub-items.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statistical_values: Option<StatisticalValues>,
}

impl AnalysisMeasure {
    /// Finds a sub-question entry by title.
    #[must_use]
    pub fn sub_question(&self, title: &str) -> Option<&SubQuestion> {
        self.sub_questions
            .as_deref()
            .and_then(|subs| subs.iter().find(|s| s.title() == title))
    }
}

/// The analysis of one hackathon (or one filter combination), as returned
/// by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HackathonAnalysis {
    /// Backend identifier, absent for filter-combination entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Display title, the join key in mapped output.
    pub title: String,
    /// One entry per survey question.
    #[serde(default)]
    pub results: Vec<AnalysisMeasure>,
}

impl HackathonAnalysis {
    /// Finds the measure with the given title.
    #[must_use]
    pub fn measure(&self, title: &str) -> Option<&AnalysisMeasure> {
        self.results.iter().find(|m| m.title == title)
    }

    /// Whether the backend returned no results at all for this entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// One hackathon's statistics for a mapped question or sub-question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HackathonValue {
    /// Title of the hackathon (or filter combination).
    #[serde(rename = "hackathonTitle")]
    pub hackathon_title: String,
    /// Statistics; absent when the hackathon lacks the measure.
    #[serde(
        rename = "statisticalValues",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub statistical_values: Option<StatisticalValues>,
}

impl HackathonValue {
    /// Sample size, treating missing statistics as `0`.
    #[must_use]
    pub fn participants(&self) -> u64 {
        self.statistical_values
            .as_ref()
            .map_or(0, |values| values.participants)
    }

    /// Whether this entry has no data.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.participants() == 0
    }
}

/// One sub-question of a mapped group question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappedAnalysisSubquestion {
    /// Sub-question title.
    pub title: String,
    /// One entry per hackathon, in request order.
    pub values: Vec<HackathonValue>,
}

/// The per-hackathon payload of a mapped question. Exactly one shape
/// applies, selected by the question type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QuestionData {
    /// One entry per hackathon.
    Values(Vec<HackathonValue>),
    /// One entry per surviving sub-question.
    SubQuestions(Vec<MappedAnalysisSubquestion>),
}

/// A question in the mapped, chart-ready tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappedAnalysisQuestion {
    /// Question title.
    pub title: String,
    /// Optional short label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Question kind.
    pub question_type: QuestionType,
    /// Scale semantics.
    pub answer_type: AnswerType,
    /// Legal answers, in instrument order.
    pub answers: Answers,
    /// Values or sub-questions.
    #[serde(flatten)]
    pub data: QuestionData,
}

impl MappedAnalysisQuestion {
    /// Per-hackathon values, for questions without sub-questions.
    #[must_use]
    pub fn values(&self) -> Option<&[HackathonValue]> {
        match &self.data {
            QuestionData::Values(values) => Some(values),
            QuestionData::SubQuestions(_) => None,
        }
    }

    /// Sub-questions, for group questions.
    #[must_use]
    pub fn sub_questions(&self) -> Option<&[MappedAnalysisSubquestion]> {
        match &self.data {
            QuestionData::Values(_) => None,
            QuestionData::SubQuestions(subs) => Some(subs),
        }
    }
}

/// A section of the mapped tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappedAnalysisSection {
    /// Section heading.
    #[serde(rename = "sectionTitle")]
    pub section_title: String,
    /// Surviving questions, in manifest order.
    pub questions: Vec<MappedAnalysisQuestion>,
}

/// One manifest section: a heading and the question titles it shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisSection {
    /// Section heading.
    #[serde(alias = "sectionTitle")]
    pub section_title: String,
    /// Question titles, matching [`AnalysisMeasure::title`] exactly.
    pub questions: Vec<String>,
}

/// The ordered list of sections to extract from an analysis payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionManifest {
    /// Sections in display order.
    #[serde(default)]
    pub sections: Vec<AnalysisSection>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labeled_answers_keep_document_order() {
        let answers: Answers =
            serde_json::from_str(r#"{"Strongly disagree": 1, "Neutral": 3, "Strongly agree": 5}"#)
                .unwrap();

        let keys: Vec<&str> = answers.keys().collect();
        assert_eq!(keys, ["Strongly disagree", "Neutral", "Strongly agree"]);
        assert_eq!(answers.max_numeric_value(), Some(5.0));
    }

    #[test]
    fn ordered_answers_without_numbers_have_no_max() {
        let answers: Answers = serde_json::from_str(r#"["Yes", "No"]"#).unwrap();
        assert_eq!(answers.len(), 2);
        assert_eq!(answers.max_numeric_value(), None);
    }

    #[test]
    fn sub_questions_accept_both_wire_forms() {
        let subs: Vec<SubQuestion> = serde_json::from_str(
            r#"["Fun", {"title": "Learning", "statistical_values": {"participants": 4, "distribution": {}}}]"#,
        )
        .unwrap();

        assert_eq!(subs[0].title(), "Fun");
        assert!(subs[0].statistical_values().is_none());
        assert_eq!(subs[1].title(), "Learning");
        assert_eq!(subs[1].statistical_values().unwrap().participants, 4);
    }

    #[test]
    fn mapped_question_serializes_only_the_active_shape() {
        let question = MappedAnalysisQuestion {
            title: "Q".to_string(),
            display_name: None,
            question_type: QuestionType::SingleQuestion,
            answer_type: AnswerType::Int,
            answers: Answers::default(),
            data: QuestionData::Values(vec![HackathonValue {
                hackathon_title: "H".to_string(),
                statistical_values: None,
            }]),
        };

        let json = serde_json::to_value(&question).unwrap();
        assert_eq!(json["values"][0]["hackathonTitle"], "H");
        assert!(json.get("subQuestions").is_none());
        assert_eq!(json["question_type"], "single_question");
    }

    #[test]
    fn question_type_round_trips_through_strum() {
        assert_eq!(QuestionType::ScoreQuestion.to_string(), "score_question");
        assert_eq!(
            "group_question".parse::<QuestionType>().unwrap(),
            QuestionType::GroupQuestion
        );
        assert!(QuestionType::GroupQuestion.uses_sub_questions());
        assert!(!QuestionType::ScoreQuestion.uses_sub_questions());
    }
}
