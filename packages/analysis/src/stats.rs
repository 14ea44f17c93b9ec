//! Derived-data helpers over mapped value lists.
//!
//! "Empty" means `participants == 0` everywhere, with missing statistics
//! counting as zero participants.

use std::fmt;

use hackathon_survey_analysis_models::{HackathonValue, MappedAnalysisQuestion, QuestionData};

/// Entries without data, in input order.
#[must_use]
pub fn empty_entries(values: &[HackathonValue]) -> Vec<&HackathonValue> {
    values.iter().filter(|value| value.is_empty()).collect()
}

/// Number of entries with at least one participant.
#[must_use]
pub fn non_empty_count(values: &[HackathonValue]) -> usize {
    values.iter().filter(|value| !value.is_empty()).count()
}

/// A statistic prepared for display.
///
/// Non-positive values (and values that round to zero) display as a bare
/// `0` instead of `0.00`, which also hides `-0.00` artifacts. Genuinely
/// negative statistics are masked by this convention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundedValue {
    Zero,
    /// Fixed-point text with exactly the requested fraction digits.
    Decimal(String),
}

impl RoundedValue {
    /// Numeric value of the displayed text.
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        match self {
            Self::Zero => 0.0,
            Self::Decimal(text) => text.parse().unwrap_or(0.0),
        }
    }
}

impl fmt::Display for RoundedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Zero => f.write_str("0"),
            Self::Decimal(text) => f.write_str(text),
        }
    }
}

/// Rounds `value` half-up to `decimals` places for display.
#[must_use]
pub fn round_value(value: f64, decimals: u32) -> RoundedValue {
    if !value.is_finite() || value <= 0.0 {
        return RoundedValue::Zero;
    }

    let prec = decimals as usize;
    let factor = 10_f64.powi(i32::try_from(decimals).unwrap_or(i32::MAX));
    let scaled = value * factor;
    // Past this point `value` has no fraction digits left to round away.
    if !scaled.is_finite() {
        return RoundedValue::Decimal(format!("{value:.prec$}"));
    }

    let rounded = scaled.round() / factor;
    if rounded <= 0.0 {
        return RoundedValue::Zero;
    }

    RoundedValue::Decimal(format!("{rounded:.prec$}"))
}

/// `sample_size` as a whole-number percentage of `population`.
///
/// A zero population yields `0` instead of a non-finite result.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn compute_percentage(population: u64, sample_size: u64) -> f64 {
    if population == 0 {
        return 0.0;
    }
    (sample_size as f64 / population as f64 * 100.0).round()
}

/// Number of non-empty hackathon entries behind a question.
///
/// Group questions sum the count over their sub-questions, so two
/// sub-questions answered by one hackathon count as two.
#[must_use]
pub fn question_non_empty_count(question: &MappedAnalysisQuestion) -> usize {
    match &question.data {
        QuestionData::Values(values) => non_empty_count(values),
        QuestionData::SubQuestions(subs) => subs.iter().map(|s| non_empty_count(&s.values)).sum(),
    }
}

/// Whether a question has enough data to be charted as a comparison.
#[must_use]
pub fn is_comparable(question: &MappedAnalysisQuestion) -> bool {
    question_non_empty_count(question) > 1
}

/// A hackathon (or filter combination) without answers for a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyNotice {
    pub hackathon_title: String,
    /// Set for group questions.
    pub sub_question: Option<String>,
}

impl fmt::Display for EmptyNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.sub_question {
            Some(sub) => write!(
                f,
                "Your filter combination \"{}\" did not return answers for subquestion \"{sub}\"",
                self.hackathon_title
            ),
            None => write!(
                f,
                "Your filter combination \"{}\" did not return answers for this question.",
                self.hackathon_title
            ),
        }
    }
}

/// Notices for every empty entry of a question, sub-question by
/// sub-question for group questions.
#[must_use]
pub fn empty_notices(question: &MappedAnalysisQuestion) -> Vec<EmptyNotice> {
    match &question.data {
        QuestionData::Values(values) => empty_entries(values)
            .into_iter()
            .map(|value| EmptyNotice {
                hackathon_title: value.hackathon_title.clone(),
                sub_question: None,
            })
            .collect(),
        QuestionData::SubQuestions(subs) => subs
            .iter()
            .flat_map(|sub| {
                empty_entries(&sub.values)
                    .into_iter()
                    .map(|value| EmptyNotice {
                        hackathon_title: value.hackathon_title.clone(),
                        sub_question: Some(sub.title.clone()),
                    })
            })
            .collect(),
    }
}
