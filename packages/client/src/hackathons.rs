//! Hackathon survey uploads.

use std::path::Path;

use hackathon_survey_hackathon_models::{HackathonInformation, RawHackathon};
use reqwest::multipart::{Form, Part};

use crate::{ClientError, HttpClient, retry};

const GOOGLE_PATH: &str = "/hackathons/google";
const CSV_PATH: &str = "/hackathons/csv";

impl HttpClient {
    /// Uploads a hackathon with responses pulled from Google Forms.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the upload is rejected or fails.
    pub async fn upload_hackathon_google(
        &self,
        hackathon: &RawHackathon,
    ) -> Result<(), ClientError> {
        log::info!(
            "Uploading '{}' with {} responses",
            hackathon.information.title,
            hackathon.results.responses.len()
        );
        retry::send(GOOGLE_PATH, 0, || {
            self.request(reqwest::Method::POST, GOOGLE_PATH).json(hackathon)
        })
        .await?;
        Ok(())
    }

    /// Uploads a hackathon with responses from a CSV export.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Io`] if the file cannot be read, or another
    /// [`ClientError`] if the upload is rejected or fails.
    pub async fn upload_hackathon_csv(
        &self,
        information: &HackathonInformation,
        csv_path: &Path,
    ) -> Result<(), ClientError> {
        if !is_csv(csv_path) {
            return Err(ClientError::InvalidUpload {
                path: csv_path.display().to_string(),
            });
        }
        let bytes = tokio::fs::read(csv_path).await?;
        let file_name = csv_path.file_name().map_or_else(
            || "responses.csv".to_string(),
            |n| n.to_string_lossy().into_owned(),
        );
        let fields = information.form_fields();

        log::info!("Uploading '{}' from {file_name}", information.title);
        retry::send(CSV_PATH, 0, || {
            let form = fields
                .iter()
                .fold(Form::new(), |form, (name, value)| form.text(*name, value.clone()))
                .part("file", Part::bytes(bytes.clone()).file_name(file_name.clone()));
            self.request(reqwest::Method::POST, CSV_PATH).multipart(form)
        })
        .await?;
        Ok(())
    }
}

/// Only `.csv` exports are accepted.
fn is_csv(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "csv")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_only_csv_files() {
        assert!(is_csv(Path::new("exports/spring.csv")));
        assert!(!is_csv(Path::new("exports/spring.xlsx")));
        assert!(!is_csv(Path::new("exports/csv")));
    }
}
