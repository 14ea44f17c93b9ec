//! Plain-text rendering of the analysis view.

use hackathon_survey_analysis::presentation::{
    bar_chart_data, data_table_rows, grouped_bar_rows, pie_slices, radar_rows, reliability_for,
    scale_label, truncate_label,
};
use hackathon_survey_analysis::stats::{empty_notices, is_comparable};
use hackathon_survey_analysis_models::{MappedAnalysisQuestion, QuestionType};
use hackathon_survey_session::{AnalysisView, LoadState};

const NO_ANSWERS: &str = "Your filter combinations did not return answers for this question.";
const NO_COMPARISON: &str = "We could not find any hackathons, that match your filter combinations. \
     Please consider changing or deleting your filter combinations.";

/// Notice for a filter combination that matched no hackathon.
#[must_use]
pub fn empty_filter_notice(title: &str) -> String {
    format!(
        "We could not find any hackathons, that match your filter combination {title}. \
         Please consider changing this filter combination."
    )
}

/// Renders the whole view as lines of text.
#[must_use]
pub fn render_view(view: &AnalysisView) -> String {
    let mut lines = Vec::new();

    if let Some(message) = &view.validation_message {
        lines.push(format!("! {message}"));
    }

    match view.state {
        LoadState::Initial => lines.push("No analysis loaded yet.".to_string()),
        LoadState::Loading => lines.push("Loading...".to_string()),
        LoadState::Error => {
            lines.push(view.message.clone().unwrap_or_default());
        }
        LoadState::Success => {
            lines.extend(view.empty_filters.iter().map(|t| empty_filter_notice(t)));
            if view.has_comparison() {
                for section in &view.sections {
                    lines.push(String::new());
                    lines.push(format!("== {} ==", section.section_title));
                    for question in &section.questions {
                        lines.push(String::new());
                        render_question(question, &mut lines);
                    }
                }
            } else {
                lines.push(NO_COMPARISON.to_string());
            }
        }
    }

    lines.join("\n")
}

fn render_question(question: &MappedAnalysisQuestion, lines: &mut Vec<String>) {
    if let Some(name) = &question.display_name {
        lines.push(name.clone());
    }
    match scale_label(&question.answers) {
        Some(scale) => lines.push(format!("{} {scale}", question.title)),
        None => lines.push(question.title.clone()),
    }

    if !is_comparable(question) {
        lines.push(format!("  {NO_ANSWERS}"));
        return;
    }

    match question.question_type {
        QuestionType::SingleQuestion | QuestionType::ScoreQuestion => {
            render_table(question, lines);
        }
        QuestionType::CategoryQuestion => render_distribution(question, lines),
        QuestionType::GroupQuestion => render_group(question, lines),
    }

    lines.extend(empty_notices(question).iter().map(|n| format!("  * {n}")));
}

fn render_table(question: &MappedAnalysisQuestion, lines: &mut Vec<String>) {
    let values = question.values().unwrap_or_default();

    let bars = bar_chart_data(values);

    for ((row, bar), value) in data_table_rows(values).iter().zip(&bars).zip(values) {
        let participants = row
            .participants
            .map_or_else(|| "-".to_string(), |n| n.to_string());
        let (low, high) = bar.error_bar();
        let mut line = format!(
            "  {:<25} M={} SD={} N={participants} [{low:.2}, {high:.2}]",
            truncate_label(&row.hackathon_title),
            row.mean,
            row.deviation,
        );
        // Only score questions carry a reliability coefficient.
        if let Some(reliability) =
            reliability_for(question.question_type, value.statistical_values.as_ref())
        {
            line.push_str(&format!(" α={} ({reliability})", row.alpha));
        }
        lines.push(line);
    }
}

fn render_distribution(question: &MappedAnalysisQuestion, lines: &mut Vec<String>) {
    for value in question.values().unwrap_or_default() {
        let slices = pie_slices(&question.answers, value.statistical_values.as_ref());
        if slices.is_empty() {
            continue;
        }
        lines.push(format!("  {}", value.hackathon_title));
        for slice in slices {
            lines.push(format!("    {:<25} {}", truncate_label(&slice.label), slice.value));
        }
    }
}

fn render_group(question: &MappedAnalysisQuestion, lines: &mut Vec<String>) {
    let subs = question.sub_questions().unwrap_or_default();

    // Radar view when several sub-questions are comparable, otherwise
    // one row of bars per hackathon.
    let radar = radar_rows(subs);
    if radar.len() > 2 {
        for row in radar {
            lines.push(format!("  {}", truncate_label(&row.sub_question_title)));
            for (title, average) in row.averages {
                lines.push(format!("    {:<25} {average:.2}", truncate_label(&title)));
            }
        }
        return;
    }

    for row in grouped_bar_rows(subs) {
        lines.push(format!("  {}", row.hackathon_title));
        for (title, average) in row.averages {
            lines.push(format!("    {:<25} {average:.2}", truncate_label(&title)));
        }
    }
}
