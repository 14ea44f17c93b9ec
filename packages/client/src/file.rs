//! Offline analysis source backed by a JSON document on disk.

use std::path::PathBuf;

use async_trait::async_trait;
use hackathon_survey_analysis::AnalysisRequest;
use hackathon_survey_analysis_models::HackathonAnalysis;

use crate::{AnalysisSource, ClientError};

/// Serves a saved `GET /analyses` response, ignoring the request.
#[derive(Debug, Clone)]
pub struct FileAnalysisSource {
    path: PathBuf,
}

impl FileAnalysisSource {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl AnalysisSource for FileAnalysisSource {
    async fn fetch_analyses(
        &self,
        _request: &AnalysisRequest,
    ) -> Result<Vec<HackathonAnalysis>, ClientError> {
        log::info!("Reading analyses from {}", self.path.display());
        let text = tokio::fs::read_to_string(&self.path).await?;
        Ok(serde_json::from_str(&text)?)
    }
}
