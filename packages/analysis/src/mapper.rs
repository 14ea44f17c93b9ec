//! Reshapes per-hackathon analyses into the mapped section tree.
//!
//! The first analysis defines each question's shape (type, answers, and
//! declared sub-questions). Every value list holds one entry per analysis
//! in input order, so `values[i]` always refers to `analyses[i]`.

use hackathon_survey_analysis_models::{
    AnalysisMeasure, HackathonAnalysis, HackathonValue, MappedAnalysisQuestion,
    MappedAnalysisSection, MappedAnalysisSubquestion, QuestionData, SectionManifest,
};

/// Maps analyses onto the sections and question titles of `manifest`.
///
/// Questions missing from the first analysis are skipped. A question (or
/// sub-question) is dropped when the first analysis has no participants
/// for it, and a section without surviving questions is dropped. Section,
/// question, and hackathon order are preserved.
#[must_use]
pub fn map_sections(
    analyses: &[HackathonAnalysis],
    manifest: &SectionManifest,
) -> Vec<MappedAnalysisSection> {
    let Some(primary) = analyses.first() else {
        log::debug!("No analyses to map");
        return Vec::new();
    };

    manifest
        .sections
        .iter()
        .filter_map(|section| {
            let questions: Vec<MappedAnalysisQuestion> = section
                .questions
                .iter()
                .filter_map(|title| {
                    let Some(measure) = primary.measure(title) else {
                        log::debug!("Skipping '{title}': not in the survey results");
                        return None;
                    };
                    map_question(analyses, measure)
                })
                .collect();

            if questions.is_empty() {
                log::debug!(
                    "Dropping section '{}': no question has data",
                    section.section_title
                );
                return None;
            }

            Some(MappedAnalysisSection {
                section_title: section.section_title.clone(),
                questions,
            })
        })
        .collect()
}

fn map_question(
    analyses: &[HackathonAnalysis],
    measure: &AnalysisMeasure,
) -> Option<MappedAnalysisQuestion> {
    let data = if measure.question_type.uses_sub_questions() {
        let sub_questions = map_sub_questions(analyses, measure);
        if sub_questions.is_empty() {
            log::debug!("Dropping '{}': no sub-question has data", measure.title);
            return None;
        }
        QuestionData::SubQuestions(sub_questions)
    } else {
        let values: Vec<HackathonValue> = analyses
            .iter()
            .map(|analysis| HackathonValue {
                hackathon_title: analysis.title.clone(),
                statistical_values: analysis
                    .measure(&measure.title)
                    .and_then(|m| m.statistical_values.clone()),
            })
            .collect();

        if values.first().is_none_or(HackathonValue::is_empty) {
            log::debug!("Dropping '{}': first hackathon has no data", measure.title);
            return None;
        }
        QuestionData::Values(values)
    };

    Some(MappedAnalysisQuestion {
        title: measure.title.clone(),
        display_name: measure.display_name.clone(),
        question_type: measure.question_type,
        answer_type: measure.answer_type,
        answers: measure.answers.clone(),
        data,
    })
}

fn map_sub_questions(
    analyses: &[HackathonAnalysis],
    measure: &AnalysisMeasure,
) -> Vec<MappedAnalysisSubquestion> {
    measure
        .sub_questions
        .iter()
        .flatten()
        .filter_map(|declared| {
            let sub_title = declared.title();
            let values: Vec<HackathonValue> = analyses
                .iter()
                .map(|analysis| HackathonValue {
                    hackathon_title: analysis.title.clone(),
                    statistical_values: analysis
                        .measure(&measure.title)
                        .and_then(|m| m.sub_question(sub_title))
                        .and_then(|sub| sub.statistical_values().cloned()),
                })
                .collect();

            if values.first().is_none_or(HackathonValue::is_empty) {
                log::debug!(
                    "Dropping sub-question '{sub_title}' of '{}': first hackathon has no data",
                    measure.title
                );
                return None;
            }

            Some(MappedAnalysisSubquestion {
                title: sub_title.to_string(),
                values,
            })
        })
        .collect()
}

/// Separates analyses that returned results from those that returned
/// none, the latter reported by title.
///
/// The backend answers a filter combination that matches no hackathon with
/// an entry whose `results` is empty. Those entries must not reach
/// [`map_sections`], where an empty first entry would drop every question.
#[must_use]
pub fn split_empty_analyses(
    analyses: Vec<HackathonAnalysis>,
) -> (Vec<HackathonAnalysis>, Vec<String>) {
    let (empty, non_empty): (Vec<_>, Vec<_>) =
        analyses.into_iter().partition(HackathonAnalysis::is_empty);

    (
        non_empty,
        empty.into_iter().map(|analysis| analysis.title).collect(),
    )
}

#[cfg(test)]
mod tests {
    use hackathon_survey_analysis_models::{AnalysisSection, QuestionType};
    use serde_json::json;

    use super::*;

    fn manifest(sections: &[(&str, &[&str])]) -> SectionManifest {
        SectionManifest {
            sections: sections
                .iter()
                .map(|(title, questions)| AnalysisSection {
                    section_title: (*title).to_string(),
                    questions: questions.iter().map(ToString::to_string).collect(),
                })
                .collect(),
        }
    }

    fn single(title: &str, participants: u64) -> serde_json::Value {
        json!({
            "title": title,
            "question_type": "single_question",
            "answer_type": "string_to_int",
            "answers": {"Low": 1, "High": 5},
            "statistical_values": {
                "participants": participants,
                "average": 3.2,
                "deviation": 0.8,
                "distribution": {}
            }
        })
    }

    fn group(title: &str, participants: &[(&str, u64)]) -> serde_json::Value {
        json!({
            "title": title,
            "question_type": "group_question",
            "answer_type": "string_to_int",
            "answers": ["Disagree", "Agree"],
            "sub_questions": participants
                .iter()
                .map(|(sub, n)| json!({
                    "title": sub,
                    "statistical_values": {"participants": n, "distribution": {}}
                }))
                .collect::<Vec<_>>()
        })
    }

    fn analysis(title: &str, results: Vec<serde_json::Value>) -> HackathonAnalysis {
        serde_json::from_value(json!({"title": title, "results": results})).unwrap()
    }

    #[test]
    fn keeps_question_when_first_hackathon_has_data() {
        let analyses = [
            analysis("H1", vec![single("Q1", 5)]),
            analysis("H2", vec![single("Q1", 0)]),
        ];

        let sections = map_sections(&analyses, &manifest(&[("S1", &["Q1"])]));

        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].section_title, "S1");
        let values = sections[0].questions[0].values().unwrap();
        assert_eq!(values.len(), 2);
        assert_eq!(values[0].hackathon_title, "H1");
        assert_eq!(values[1].hackathon_title, "H2");
        assert!(values[1].is_empty());
    }

    #[test]
    fn drops_question_when_first_hackathon_is_empty() {
        let analyses = [
            analysis("H1", vec![single("Q1", 0)]),
            analysis("H2", vec![single("Q1", 5)]),
        ];

        let sections = map_sections(&analyses, &manifest(&[("S1", &["Q1"])]));

        assert!(sections.is_empty());
    }

    #[test]
    fn drops_empty_sub_questions_but_keeps_group() {
        let analyses = [
            analysis("H1", vec![group("G1", &[("A", 3), ("B", 0)])]),
            analysis("H2", vec![group("G1", &[("A", 0), ("B", 7)])]),
        ];

        let sections = map_sections(&analyses, &manifest(&[("S1", &["G1"])]));

        let question = &sections[0].questions[0];
        assert!(question.values().is_none());
        let subs = question.sub_questions().unwrap();
        assert_eq!(subs.len(), 1);
        assert_eq!(subs[0].title, "A");
        assert_eq!(subs[0].values.len(), 2);
        assert_eq!(subs[0].values[1].hackathon_title, "H2");
    }

    #[test]
    fn drops_group_when_every_sub_question_is_empty() {
        let analyses = [analysis("H1", vec![group("G1", &[("A", 0), ("B", 0)])])];

        assert!(map_sections(&analyses, &manifest(&[("S1", &["G1"])])).is_empty());
    }

    #[test]
    fn score_questions_always_use_values() {
        let mut score = single("Score", 4);
        score["question_type"] = json!("score_question");
        score["sub_questions"] = json!(["Item 1", "Item 2"]);
        score["statistical_values"]["cronbach_alpha"] = json!(0.65);
        let analyses = [analysis("H1", vec![score])];

        let sections = map_sections(&analyses, &manifest(&[("S1", &["Score"])]));

        let question = &sections[0].questions[0];
        assert_eq!(question.question_type, QuestionType::ScoreQuestion);
        assert!(question.sub_questions().is_none());
        assert_eq!(question.values().unwrap().len(), 1);
    }

    #[test]
    fn preserves_manifest_order_and_skips_unknown_titles() {
        let analyses = [
            analysis("H1", vec![single("Q2", 1), single("Q1", 1), single("Q3", 0)]),
            analysis("H2", vec![single("Q1", 1), single("Q2", 1)]),
        ];

        let sections = map_sections(
            &analyses,
            &manifest(&[
                ("Empty", &["Q3", "Missing"]),
                ("Main", &["Q1", "Missing", "Q2"]),
            ]),
        );

        assert_eq!(sections.len(), 1);
        let titles: Vec<&str> = sections[0]
            .questions
            .iter()
            .map(|q| q.title.as_str())
            .collect();
        assert_eq!(titles, ["Q1", "Q2"]);
    }

    #[test]
    fn measure_missing_in_later_hackathon_counts_as_empty() {
        let analyses = [
            analysis("H1", vec![single("Q1", 2)]),
            analysis("H2", vec![]),
        ];

        let sections = map_sections(&analyses, &manifest(&[("S", &["Q1"])]));

        let values = sections[0].questions[0].values().unwrap();
        assert!(values[1].statistical_values.is_none());
        assert_eq!(values[1].participants(), 0);
    }

    #[test]
    fn every_value_list_follows_input_order() {
        let analyses = [
            analysis("C", vec![single("Q1", 1), group("G", &[("A", 1)])]),
            analysis("A", vec![single("Q1", 1), group("G", &[("A", 1)])]),
            analysis("B", vec![single("Q1", 1), group("G", &[("A", 1)])]),
        ];

        let sections = map_sections(&analyses, &manifest(&[("S", &["Q1", "G"])]));

        for question in &sections[0].questions {
            let lists: Vec<&[HackathonValue]> = match &question.data {
                QuestionData::Values(values) => vec![values.as_slice()],
                QuestionData::SubQuestions(subs) => {
                    subs.iter().map(|s| s.values.as_slice()).collect()
                }
            };
            for values in lists {
                for (value, analysis) in values.iter().zip(&analyses) {
                    assert_eq!(value.hackathon_title, analysis.title);
                }
            }
        }
    }

    #[test]
    fn no_analyses_map_to_nothing() {
        assert!(map_sections(&[], &manifest(&[("S", &["Q1"])])).is_empty());
    }

    #[test]
    fn splits_result_less_filter_entries() {
        let analyses = vec![
            analysis("H1", vec![single("Q1", 1)]),
            analysis("No match", vec![]),
            analysis("Competitive", vec![single("Q1", 1)]),
        ];

        let (non_empty, empty) = split_empty_analyses(analyses);

        let titles: Vec<&str> = non_empty.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, ["H1", "Competitive"]);
        assert_eq!(empty, ["No match"]);
    }
}
