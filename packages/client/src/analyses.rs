//! Analysis payload sources.

use async_trait::async_trait;
use hackathon_survey_analysis::AnalysisRequest;
use hackathon_survey_analysis_models::HackathonAnalysis;

use crate::{ClientError, HttpClient, retry};

/// Anything that can answer an analysis request with one
/// [`HackathonAnalysis`] per hackathon and filter combination.
#[async_trait]
pub trait AnalysisSource: Send + Sync {
    /// Fetches the analyses for `request`, in backend order.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the analyses cannot be loaded.
    async fn fetch_analyses(
        &self,
        request: &AnalysisRequest,
    ) -> Result<Vec<HackathonAnalysis>, ClientError>;
}

#[async_trait]
impl AnalysisSource for HttpClient {
    async fn fetch_analyses(
        &self,
        request: &AnalysisRequest,
    ) -> Result<Vec<HackathonAnalysis>, ClientError> {
        let query = request.query_pairs();
        log::info!(
            "GET {} for hackathons {}",
            request.path,
            request.hackathons_param()
        );

        let analyses: Vec<HackathonAnalysis> =
            retry::send_json(request.path, self.config.max_retries, || {
                self.request(reqwest::Method::GET, request.path).query(&query)
            })
            .await?;

        log::debug!("Received {} analyses", analyses.len());
        Ok(analyses)
    }
}
