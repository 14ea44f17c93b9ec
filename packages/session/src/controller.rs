//! Analysis refresh controller.
//!
//! Each refresh validates the filters, takes a new generation number,
//! fetches, and maps. Only the latest generation may update the view, so
//! a slow response can never overwrite a newer one. A successful refresh
//! replaces the view wholesale; a failed one clears it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use hackathon_survey_analysis::{
    build_analysis_request, map_sections, split_empty_analyses, validate_filters,
};
use hackathon_survey_analysis_models::{MappedAnalysisSection, SectionManifest};
use hackathon_survey_client::AnalysisSource;
use hackathon_survey_filters_models::FilterCombination;
use strum_macros::{AsRefStr, Display, EnumString};

use crate::SessionError;

/// Banner shown when analyses cannot be loaded.
pub const LOAD_ERROR_MESSAGE: &str = "Analysis could not be loaded.";

/// Progress of the analysis view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum LoadState {
    #[default]
    Initial,
    Loading,
    Error,
    Success,
}

/// What the analysis page shows. Replaced as a whole on every change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisView {
    pub state: LoadState,
    pub sections: Vec<MappedAnalysisSection>,
    /// Titles of filter combinations that matched no hackathon.
    pub empty_filters: Vec<String>,
    /// Number of analyses that returned results.
    pub analyses_count: usize,
    /// Error banner text.
    pub message: Option<String>,
    /// Inline validation message from the last rejected refresh.
    pub validation_message: Option<String>,
}

impl AnalysisView {
    /// Whether there is anything to compare. With one or no non-empty
    /// analysis the page shows a "no matching hackathons" notice instead.
    #[must_use]
    pub const fn has_comparison(&self) -> bool {
        self.analyses_count > 1
    }
}

/// How a refresh ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The view now shows this many sections.
    Loaded { sections: usize },
    /// A newer refresh started while this one was in flight; its result
    /// was discarded.
    Stale,
}

/// Loads and maps analyses for one hackathon selection.
#[derive(Debug)]
pub struct AnalysisController<S> {
    source: S,
    manifest: SectionManifest,
    generation: AtomicU64,
    view: Mutex<AnalysisView>,
}

impl<S: AnalysisSource> AnalysisController<S> {
    #[must_use]
    pub fn new(source: S, manifest: SectionManifest) -> Self {
        Self {
            source,
            manifest,
            generation: AtomicU64::new(0),
            view: Mutex::new(AnalysisView::default()),
        }
    }

    #[must_use]
    pub const fn source(&self) -> &S {
        &self.source
    }

    #[must_use]
    pub const fn manifest(&self) -> &SectionManifest {
        &self.manifest
    }

    /// A copy of the current view.
    #[must_use]
    pub fn snapshot(&self) -> AnalysisView {
        self.lock_view().clone()
    }

    /// Fetches and maps analyses for `hackathon_ids` narrowed by `filters`.
    ///
    /// # Errors
    ///
    /// * [`SessionError::Validation`] if a filter has no name. No request
    ///   is issued and the loaded view stays as it was.
    /// * [`SessionError::Analysis`] if the request cannot be built.
    /// * [`SessionError::Client`] if loading fails. The view is cleared
    ///   and shows [`LOAD_ERROR_MESSAGE`].
    pub async fn refresh(
        &self,
        hackathon_ids: &[String],
        filters: &[FilterCombination],
    ) -> Result<RefreshOutcome, SessionError> {
        if let Err(e) = validate_filters(filters) {
            log::warn!("Refresh rejected: {e}");
            self.lock_view().validation_message = Some(e.to_string());
            return Err(e.into());
        }

        let request = build_analysis_request(hackathon_ids.iter().cloned(), filters)?;
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut view = self.lock_view();
            view.state = LoadState::Loading;
            view.validation_message = None;
        }
        log::info!(
            "Refresh #{generation}: {} hackathon(s), {} filter(s)",
            hackathon_ids.len(),
            filters.len()
        );

        let result = self.source.fetch_analyses(&request).await;

        let mut view = self.lock_view();
        if self.generation.load(Ordering::SeqCst) != generation {
            log::warn!("Discarding stale response of refresh #{generation}");
            return Ok(RefreshOutcome::Stale);
        }

        match result {
            Ok(analyses) => {
                let (analyses, empty_filters) = split_empty_analyses(analyses);
                let sections = map_sections(&analyses, &self.manifest);
                let outcome = RefreshOutcome::Loaded {
                    sections: sections.len(),
                };
                log::info!(
                    "Refresh #{generation} loaded {} analyses into {} sections",
                    analyses.len(),
                    sections.len()
                );
                *view = AnalysisView {
                    state: LoadState::Success,
                    sections,
                    empty_filters,
                    analyses_count: analyses.len(),
                    message: None,
                    validation_message: None,
                };
                Ok(outcome)
            }
            Err(e) => {
                log::error!("Refresh #{generation} failed: {e}");
                *view = AnalysisView {
                    state: LoadState::Error,
                    message: Some(LOAD_ERROR_MESSAGE.to_string()),
                    ..AnalysisView::default()
                };
                Err(e.into())
            }
        }
    }

    fn lock_view(&self) -> std::sync::MutexGuard<'_, AnalysisView> {
        self.view.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    use async_trait::async_trait;
    use hackathon_survey_analysis::AnalysisRequest;
    use hackathon_survey_analysis_models::{AnalysisSection, HackathonAnalysis};
    use hackathon_survey_client::ClientError;
    use serde_json::json;
    use tokio::sync::Notify;

    use super::*;

    /// Canned analyses by first hackathon id: `"slow"` waits until another
    /// request completes, `"down"` fails.
    #[derive(Default)]
    struct FakeSource {
        calls: AtomicUsize,
        gate: Notify,
    }

    fn analysis(title: &str, participants: u64) -> HackathonAnalysis {
        serde_json::from_value(json!({
            "title": title,
            "results": [{
                "title": "Q1",
                "question_type": "single_question",
                "answer_type": "int",
                "answers": [],
                "statistical_values": {"participants": participants, "distribution": {}}
            }]
        }))
        .unwrap()
    }

    #[async_trait]
    impl AnalysisSource for FakeSource {
        async fn fetch_analyses(
            &self,
            request: &AnalysisRequest,
        ) -> Result<Vec<HackathonAnalysis>, ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match request.hackathons.first().map(String::as_str) {
                Some("slow") => {
                    self.gate.notified().await;
                    Ok(vec![analysis("Slow", 3), analysis("Slow 2", 3)])
                }
                Some("down") => Err(ClientError::Status {
                    status: 500,
                    path: request.path.to_string(),
                }),
                _ => {
                    self.gate.notify_one();
                    Ok(vec![
                        analysis("H1", 4),
                        analysis("H2", 2),
                        serde_json::from_value(json!({"title": "No match", "results": []}))
                            .unwrap(),
                    ])
                }
            }
        }
    }

    fn controller() -> AnalysisController<FakeSource> {
        AnalysisController::new(
            FakeSource::default(),
            SectionManifest {
                sections: vec![AnalysisSection {
                    section_title: "S1".to_string(),
                    questions: vec!["Q1".to_string()],
                }],
            },
        )
    }

    fn ids(ids: &[&str]) -> Vec<String> {
        ids.iter().map(ToString::to_string).collect()
    }

    #[tokio::test]
    async fn loads_and_maps_analyses() {
        let controller = controller();

        let outcome = controller.refresh(&ids(&["h1", "h2"]), &[]).await.unwrap();

        assert_eq!(outcome, RefreshOutcome::Loaded { sections: 1 });
        let view = controller.snapshot();
        assert_eq!(view.state, LoadState::Success);
        assert_eq!(view.empty_filters, ["No match"]);
        assert_eq!(view.analyses_count, 2);
        assert!(view.has_comparison());
        assert_eq!(view.sections[0].questions[0].values().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn unnamed_filter_sends_no_request() {
        let controller = controller();
        controller.refresh(&ids(&["h1"]), &[]).await.unwrap();

        let result = controller
            .refresh(&ids(&["h1"]), &[FilterCombination::named("")])
            .await;

        assert!(matches!(result, Err(SessionError::Validation(_))));
        assert_eq!(controller.source().calls.load(Ordering::SeqCst), 1);
        let view = controller.snapshot();
        assert_eq!(view.state, LoadState::Success);
        assert_eq!(view.sections.len(), 1);
        assert!(view.validation_message.unwrap().starts_with("Please provide a name"));
    }

    #[tokio::test]
    async fn failure_clears_previous_data() {
        let controller = controller();
        controller.refresh(&ids(&["h1"]), &[]).await.unwrap();

        let result = controller.refresh(&ids(&["down"]), &[]).await;

        assert!(matches!(result, Err(SessionError::Client(_))));
        let view = controller.snapshot();
        assert_eq!(view.state, LoadState::Error);
        assert_eq!(view.message.as_deref(), Some(LOAD_ERROR_MESSAGE));
        assert!(view.sections.is_empty());
        assert!(view.empty_filters.is_empty());
    }

    #[tokio::test]
    async fn stale_response_is_discarded() {
        let controller = controller();

        let slow_ids = ids(&["slow"]);
        let slow = controller.refresh(&slow_ids, &[]);
        tokio::pin!(slow);
        // Drive the slow refresh until it is parked on the gate.
        assert!(
            tokio::time::timeout(Duration::from_millis(20), &mut slow)
                .await
                .is_err()
        );
        assert_eq!(controller.snapshot().state, LoadState::Loading);

        let fast = controller.refresh(&ids(&["h1"]), &[]).await.unwrap();
        assert_eq!(fast, RefreshOutcome::Loaded { sections: 1 });

        assert_eq!(slow.await.unwrap(), RefreshOutcome::Stale);
        let view = controller.snapshot();
        assert_eq!(view.state, LoadState::Success);
        assert_eq!(
            view.sections[0].questions[0].values().unwrap()[0].hackathon_title,
            "H1"
        );
    }
}
