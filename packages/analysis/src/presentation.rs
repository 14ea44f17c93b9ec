//! Display rules and chart data shaping over the mapped tree.
//!
//! Chart consumers render straight from these rows; nothing downstream
//! applies further business logic.

use std::borrow::Cow;

use hackathon_survey_analysis_models::{
    AnswerValue, Answers, HackathonValue, MappedAnalysisQuestion, MappedAnalysisSubquestion,
    QuestionType, StatisticalValues,
};
use serde::Serialize;
use strum_macros::{AsRefStr, Display, EnumString};

use crate::stats::{RoundedValue, non_empty_count, round_value};

/// Labels longer than this are truncated in chart legends and axes.
pub const MAX_LABEL_LEN: usize = 25;

const TRUNCATED_LABEL_LEN: usize = 22;

/// Reliability class of a Cronbach's alpha coefficient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, EnumString, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Reliability {
    /// α < 0.6
    Poor,
    /// 0.6 ≤ α < 0.7
    Questionable,
    /// α ≥ 0.7
    Acceptable,
}

impl Reliability {
    #[must_use]
    pub fn from_alpha(alpha: f64) -> Self {
        if alpha < 0.6 {
            Self::Poor
        } else if alpha < 0.7 {
            Self::Questionable
        } else {
            Self::Acceptable
        }
    }

    /// Hex color used to print the coefficient.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Poor => "#d32f2f",
            Self::Questionable => "#ed6c02",
            Self::Acceptable => "#2e7d32",
        }
    }
}

/// Reliability class of a score question's statistics. Other question
/// types carry no reliability.
#[must_use]
pub fn reliability_for(
    question_type: QuestionType,
    values: Option<&StatisticalValues>,
) -> Option<Reliability> {
    if question_type != QuestionType::ScoreQuestion {
        return None;
    }
    values
        .and_then(|v| v.cronbach_alpha)
        .map(Reliability::from_alpha)
}

/// The displayed scale range, `"(first - last)"`, in answer order.
///
/// Ordered answers show their first and last label, not their positions.
#[must_use]
pub fn scale_label(answers: &Answers) -> Option<String> {
    let mut keys = answers.keys();
    let first = keys.next()?;
    let last = keys.last().unwrap_or(first);
    Some(format!("({first} - {last})"))
}

/// Lower and upper end of an error bar.
#[must_use]
pub fn error_bar_extent(average: f64, deviation: f64) -> (f64, f64) {
    (average - deviation, average + deviation)
}

/// Upper bound of the value axis, when every answer value is numeric.
#[must_use]
pub fn chart_max_value(question: &MappedAnalysisQuestion) -> Option<f64> {
    question.answers.max_numeric_value()
}

/// One bar of a single-question bar chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarDatum {
    pub hackathon_title: String,
    pub average: f64,
    pub deviation: f64,
    pub participants: u64,
}

impl BarDatum {
    #[must_use]
    pub fn error_bar(&self) -> (f64, f64) {
        error_bar_extent(self.average, self.deviation)
    }
}

/// Bars per hackathon; missing statistics plot as zero.
#[must_use]
pub fn bar_chart_data(values: &[HackathonValue]) -> Vec<BarDatum> {
    values
        .iter()
        .map(|value| {
            let stats = value.statistical_values.as_ref();
            BarDatum {
                hackathon_title: value.hackathon_title.clone(),
                average: stats.and_then(|s| s.average).unwrap_or(0.0),
                deviation: stats.and_then(|s| s.deviation).unwrap_or(0.0),
                participants: value.participants(),
            }
        })
        .collect()
}

/// A (series title, average) pair within a chart row.
pub type SeriesValue = (String, f64);

/// One hackathon's bar group in a grouped bar chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupedBarRow {
    pub hackathon_title: String,
    /// Average per sub-question, in sub-question order.
    pub averages: Vec<SeriesValue>,
}

/// Grouped bar rows: one per hackathon, one bar per sub-question.
#[must_use]
pub fn grouped_bar_rows(sub_questions: &[MappedAnalysisSubquestion]) -> Vec<GroupedBarRow> {
    let Some(first) = sub_questions.first() else {
        return Vec::new();
    };

    first
        .values
        .iter()
        .enumerate()
        .map(|(i, hackathon)| GroupedBarRow {
            hackathon_title: hackathon.hackathon_title.clone(),
            averages: sub_questions
                .iter()
                .map(|sub| (sub.title.clone(), average_at(&sub.values, i)))
                .collect(),
        })
        .collect()
}

/// One radar axis: a sub-question and every hackathon's average on it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarRow {
    pub sub_question_title: String,
    pub averages: Vec<SeriesValue>,
}

/// Radar axes for sub-questions answered by more than one hackathon.
#[must_use]
pub fn radar_rows(sub_questions: &[MappedAnalysisSubquestion]) -> Vec<RadarRow> {
    sub_questions
        .iter()
        .filter(|sub| non_empty_count(&sub.values) > 1)
        .map(|sub| RadarRow {
            sub_question_title: sub.title.clone(),
            averages: sub
                .values
                .iter()
                .map(|value| (value.hackathon_title.clone(), average_of(value)))
                .collect(),
        })
        .collect()
}

fn average_of(value: &HackathonValue) -> f64 {
    value
        .statistical_values
        .as_ref()
        .and_then(|s| s.average)
        .unwrap_or(0.0)
}

fn average_at(values: &[HackathonValue], index: usize) -> f64 {
    values.get(index).map_or(0.0, average_of)
}

/// One labeled count in a distribution chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionSlice {
    pub label: String,
    pub value: f64,
}

/// Pie slices for a category question, in answer order.
///
/// Answers absent from the distribution count as zero. Without
/// statistics or with an empty distribution there are no slices.
#[must_use]
pub fn pie_slices(
    answers: &Answers,
    values: Option<&StatisticalValues>,
) -> Vec<DistributionSlice> {
    let Some(distribution) = values.map(|v| &v.distribution) else {
        return Vec::new();
    };
    if distribution.is_empty() {
        return Vec::new();
    }

    answers
        .keys()
        .map(|label| DistributionSlice {
            label: label.to_string(),
            value: distribution.get(label).copied().unwrap_or(0.0),
        })
        .collect()
}

/// Answer distribution for a detail view.
///
/// Ordered answers are looked up by label. Labeled answers are looked up
/// by their value and shown as `"label (value)"`. Without answers the
/// raw distribution is listed.
#[must_use]
pub fn distribution_rows(answers: &Answers, values: &StatisticalValues) -> Vec<DistributionSlice> {
    let distribution = &values.distribution;
    match answers {
        Answers::Ordered(labels) if labels.is_empty() => distribution
            .iter()
            .map(|(label, value)| DistributionSlice {
                label: label.clone(),
                value: *value,
            })
            .collect(),
        Answers::Ordered(labels) => labels
            .iter()
            .map(|label| DistributionSlice {
                label: label.clone(),
                value: distribution.get(label).copied().unwrap_or(0.0),
            })
            .collect(),
        Answers::Labeled(entries) => entries
            .iter()
            .map(|(label, value)| {
                let key = match value {
                    AnswerValue::Number(n) => n.to_string(),
                    AnswerValue::Text(s) => s.clone(),
                };
                DistributionSlice {
                    label: format!("{label} ({key})"),
                    value: distribution.get(&key).copied().unwrap_or(0.0),
                }
            })
            .collect(),
    }
}

/// One row of the statistics table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataTableRow {
    pub hackathon_title: String,
    /// Mean (`M`).
    pub mean: RoundedValue,
    /// Participants (`N`), absent without statistics.
    pub participants: Option<u64>,
    /// Standard deviation (`SD`).
    pub deviation: RoundedValue,
    /// Cronbach's α.
    pub alpha: RoundedValue,
    pub reliability: Reliability,
}

/// Table rows per hackathon, statistics rounded to two places.
#[must_use]
pub fn data_table_rows(values: &[HackathonValue]) -> Vec<DataTableRow> {
    values
        .iter()
        .map(|value| {
            let stats = value.statistical_values.as_ref();
            let alpha = stats.and_then(|s| s.cronbach_alpha).unwrap_or(0.0);
            DataTableRow {
                hackathon_title: value.hackathon_title.clone(),
                mean: round_value(stats.and_then(|s| s.average).unwrap_or(0.0), 2),
                participants: stats.map(|s| s.participants),
                deviation: round_value(stats.and_then(|s| s.deviation).unwrap_or(0.0), 2),
                alpha: round_value(alpha, 2),
                reliability: Reliability::from_alpha(alpha),
            }
        })
        .collect()
}

/// Shortens labels over [`MAX_LABEL_LEN`] characters to 22 characters
/// followed by `...`.
#[must_use]
pub fn truncate_label(label: &str) -> Cow<'_, str> {
    if label.chars().count() <= MAX_LABEL_LEN {
        return Cow::Borrowed(label);
    }
    let head: String = label.chars().take(TRUNCATED_LABEL_LEN).collect();
    Cow::Owned(format!("{head}..."))
}
